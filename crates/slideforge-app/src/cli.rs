//! Command-line arguments.

use clap::Parser;
use kurbo::Point;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Parser)]
#[command(
    name = "slideforge",
    about = "Render a slide operation list and inspect the hit-test index"
)]
pub struct Args {
    /// JSON array of slide operations.
    pub operations: PathBuf,

    /// JSON settings file. Missing keys keep their defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Object id to draw with the selection overlay.
    #[arg(long)]
    pub select: Option<String>,

    /// Zoom scale, clamped to the supported range.
    #[arg(long)]
    pub zoom: Option<f64>,

    /// Screen point `X,Y` to resolve against the drawn frame. Repeatable.
    #[arg(long = "pick", value_name = "X,Y", value_parser = parse_point)]
    pub picks: Vec<Point>,

    /// Click on the coordinate picker, in picker display pixels.
    #[arg(long = "picker", value_name = "X,Y", value_parser = parse_point)]
    pub picker_click: Option<Point>,
}

/// Parse `X,Y`.
fn parse_point(raw: &str) -> Result<Point, String> {
    let invalid = || format!("expected X,Y, got {raw:?}");
    let (x, y) = raw.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse().map_err(|_| invalid())?;
    let y = y.trim().parse().map_err(|_| invalid())?;
    Ok(Point::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("slideforge").chain(args.iter().copied()))
    }

    #[test]
    fn test_full_command_line() {
        let args = parse(&[
            "ops.json",
            "--config",
            "cfg.json",
            "--select",
            "box",
            "--zoom",
            "1.5",
            "--pick",
            "10,20",
            "--pick",
            "30.5, 40",
            "--picker",
            "200,100",
        ])
        .unwrap();
        assert_eq!(args.operations, PathBuf::from("ops.json"));
        assert_eq!(args.config, Some(PathBuf::from("cfg.json")));
        assert_eq!(args.select.as_deref(), Some("box"));
        assert_eq!(args.zoom, Some(1.5));
        assert_eq!(args.picks, vec![Point::new(10.0, 20.0), Point::new(30.5, 40.0)]);
        assert_eq!(args.picker_click, Some(Point::new(200.0, 100.0)));
    }

    #[test]
    fn test_only_operations_required() {
        let args = parse(&["ops.json"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.picks.is_empty());
        assert!(args.picker_click.is_none());
    }

    #[test]
    fn test_missing_operations() {
        assert!(parse(&["--zoom", "2"]).is_err());
    }

    #[test]
    fn test_bad_values() {
        assert!(parse(&["ops.json", "--pick", "10"]).is_err());
        assert!(parse(&["ops.json", "--pick", "a,b"]).is_err());
        assert!(parse(&["ops.json", "--zoom", "big"]).is_err());
        assert!(parse(&["ops.json", "--select"]).is_err());
        assert!(parse(&["ops.json", "--frobnicate"]).is_err());
        assert!(parse(&["ops.json", "extra.json"]).is_err());
    }

    #[test]
    fn test_point_parser() {
        assert_eq!(parse_point(" -1.5 , 2 "), Ok(Point::new(-1.5, 2.0)));
        assert!(parse_point("1;2").is_err());
    }
}
