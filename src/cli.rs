// ============================================================================
// RasterPaint CLI: startup overrides for the saved settings
// ============================================================================
//
// Usage examples:
//   rasterpaint                                   (saved settings)
//   rasterpaint -W 800 -H 600 -t line -s 3
//   rasterpaint --color 255,0,0 --config ./paint.cfg --no-log

use std::path::PathBuf;

use clap::Parser;

use crate::canvas::Color;
use crate::components::tools::ToolType;
use crate::ops::shapes::MAX_STROKE_WIDTH;
use crate::settings::{Settings, MAX_CANVAS_SIZE};

/// RasterPaint, a small raster paint program.
///
/// Flags override the values loaded from the settings file for this session.
#[derive(Parser, Debug, Default)]
#[command(name = "rasterpaint", about = "Single-layer raster paint program")]
pub struct CliArgs {
    /// Canvas width in pixels.
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Stroke width for the paint tools (1–64).
    #[arg(short, long)]
    pub stroke_width: Option<u32>,

    /// Primary color as r,g,b (e.g. "255,0,0").
    #[arg(short, long, value_name = "R,G,B")]
    pub color: Option<String>,

    /// Starting tool: pencil, line, rect, circle, eraser, fill,
    /// select_rect, select_circle, lasso.
    #[arg(short, long, value_name = "NAME")]
    pub tool: Option<String>,

    /// Settings file to load instead of the default location.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Do not write a session log.
    #[arg(long)]
    pub no_log: bool,
}

impl CliArgs {
    /// Settings from `--config`, or the default settings file.
    pub fn load_settings(&self) -> Settings {
        match &self.config {
            Some(path) => Settings::load_from(path),
            None => Settings::load(),
        }
    }

    /// Overlay the given flags on `settings`.
    pub fn apply(&self, mut settings: Settings) -> Result<Settings, String> {
        if let Some(w) = self.width {
            settings.canvas_width = check_canvas_side("--width", w)?;
        }
        if let Some(h) = self.height {
            settings.canvas_height = check_canvas_side("--height", h)?;
        }
        if let Some(s) = self.stroke_width {
            if !(1..=MAX_STROKE_WIDTH).contains(&s) {
                return Err(format!(
                    "--stroke-width must be between 1 and {}",
                    MAX_STROKE_WIDTH
                ));
            }
            settings.stroke_width = s;
        }
        if let Some(c) = &self.color {
            settings.primary_color = Color::parse(c)
                .ok_or_else(|| format!("invalid color '{}', expected r,g,b", c))?;
        }
        if let Some(t) = &self.tool {
            settings.default_tool =
                ToolType::from_name(t).ok_or_else(|| format!("unknown tool '{}'", t))?;
        }
        Ok(settings)
    }
}

fn check_canvas_side(flag: &str, n: u32) -> Result<u32, String> {
    if (1..=MAX_CANVAS_SIZE).contains(&n) {
        Ok(n)
    } else {
        Err(format!("{} must be between 1 and {}", flag, MAX_CANVAS_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_flags() {
        let args = CliArgs::try_parse_from([
            "rasterpaint",
            "-W",
            "100",
            "--height",
            "50",
            "-s",
            "4",
            "-c",
            "1,2,3",
            "-t",
            "fill",
            "--no-log",
        ])
        .unwrap();
        assert_eq!(args.width, Some(100));
        assert_eq!(args.height, Some(50));
        assert!(args.no_log);

        let s = args.apply(Settings::default()).unwrap();
        assert_eq!((s.canvas_width, s.canvas_height), (100, 50));
        assert_eq!(s.stroke_width, 4);
        assert_eq!(s.primary_color, Color::new(1, 2, 3));
        assert_eq!(s.default_tool, ToolType::Fill);
    }

    #[test]
    fn no_flags_keeps_settings() {
        let args = CliArgs::try_parse_from(["rasterpaint"]).unwrap();
        let base = Settings {
            stroke_width: 7,
            ..Settings::default()
        };
        assert_eq!(args.apply(base.clone()).unwrap(), base);
    }

    #[test]
    fn invalid_values_are_errors() {
        let bad_color = CliArgs {
            color: Some("red".into()),
            ..CliArgs::default()
        };
        assert!(bad_color.apply(Settings::default()).is_err());

        let bad_tool = CliArgs {
            tool: Some("spray".into()),
            ..CliArgs::default()
        };
        assert!(bad_tool.apply(Settings::default()).is_err());

        let bad_width = CliArgs {
            stroke_width: Some(0),
            ..CliArgs::default()
        };
        assert!(bad_width.apply(Settings::default()).is_err());
    }

    #[test]
    fn canvas_size_is_bounded() {
        let huge = CliArgs::try_parse_from(["rasterpaint", "-W", "100000", "-H", "100000"]).unwrap();
        assert!(huge.apply(Settings::default()).is_err());

        let zero = CliArgs {
            height: Some(0),
            ..CliArgs::default()
        };
        assert!(zero.apply(Settings::default()).is_err());

        let max = CliArgs {
            width: Some(MAX_CANVAS_SIZE),
            height: Some(1),
            ..CliArgs::default()
        };
        let s = max.apply(Settings::default()).unwrap();
        assert_eq!((s.canvas_width, s.canvas_height), (MAX_CANVAS_SIZE, 1));
    }
}
