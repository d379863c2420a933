//! SlideForge Application
//!
//! Headless shell around the render pipeline: loads an operation list and
//! settings, drives frames, and reports the hit-test index.

mod app;
mod cli;

pub use app::{App, AppConfig, AppError};
pub use cli::Args;
