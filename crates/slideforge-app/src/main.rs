//! Main application entry point.

use clap::Parser;
use slideforge_app::{App, AppConfig, AppError, Args};

fn run(args: Args) -> Result<(), AppError> {
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let mut app = App::new(config);
    let count = app.load_operations_file(&args.operations)?;
    log::info!("Loaded {count} operations from {}", args.operations.display());

    if let Some(zoom) = args.zoom {
        app.zoom_to(zoom);
    }
    app.select(args.select.as_deref());
    app.tick();

    print!("{}", app.report());
    for point in &args.picks {
        println!("{}", app.describe_pick(*point));
    }

    if let Some(click) = args.picker_click {
        let picker = app.picker_mut();
        let emu = picker.commit_display(click);
        let pt = picker.value_points();
        println!(
            "picker ({:.1}, {:.1}) -> {:.0} x {:.0} EMU ({:.2}pt, {:.2}pt)",
            click.x, click.y, emu.x, emu.y, pt.x, pt.y
        );
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Starting SlideForge");

    let args = Args::parse();
    if let Err(err) = run(args) {
        log::error!("{err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}
