use std::path::{Path, PathBuf};

use crate::canvas::Color;
use crate::components::tools::ToolType;
use crate::ops::shapes::MAX_STROKE_WIDTH;

/// Largest canvas side accepted from settings or the command line.
pub const MAX_CANVAS_SIZE: u32 = 8192;

/// Settings that persist across sessions.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Stroke width for the paint tools, 1..=MAX_STROKE_WIDTH.
    pub stroke_width: u32,
    pub primary_color: Color,
    /// Dash color of selection outlines.
    pub selection_color: Color,
    pub default_tool: ToolType,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 640,
            canvas_height: 480,
            stroke_width: 1,
            primary_color: Color::BLACK,
            selection_color: Color::BLACK,
            default_tool: ToolType::Pencil,
        }
    }
}

impl Settings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/rasterpaint/rasterpaint_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\RasterPaint\rasterpaint_settings.cfg
    /// On macOS:   ~/Library/Application Support/RasterPaint/rasterpaint_settings.cfg
    /// Fallback:   same directory as the executable.
    pub fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            let config_dir = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
                    PathBuf::from(home).join(".config")
                })
                .join("rasterpaint");
            return Some(config_dir.join("rasterpaint_settings.cfg"));
        }
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA")
                .or_else(|_| std::env::var("USERPROFILE"))
                .ok()?;
            return Some(
                PathBuf::from(appdata)
                    .join("RasterPaint")
                    .join("rasterpaint_settings.cfg"),
            );
        }
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("RasterPaint")
                    .join("rasterpaint_settings.cfg"),
            );
        }
        #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
        {
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|d| d.join("rasterpaint_settings.cfg")))
        }
    }

    pub fn to_config_string(&self) -> String {
        format!(
            "canvas_width={}\n\
             canvas_height={}\n\
             stroke_width={}\n\
             primary_color={}\n\
             selection_color={}\n\
             default_tool={}\n",
            self.canvas_width,
            self.canvas_height,
            self.stroke_width,
            self.primary_color.to_config_string(),
            self.selection_color.to_config_string(),
            self.default_tool.name(),
        )
    }

    /// Parse `key=value` lines. Unknown keys are ignored and bad values fall
    /// back to their defaults.
    pub fn from_config_str(content: &str) -> Self {
        let mut s = Self::default();
        for line in content.lines() {
            let Some((key, val)) = line.split_once('=') else { continue };
            let key = key.trim();
            let val = val.trim();
            match key {
                "canvas_width" => {
                    s.canvas_width = parse_canvas_side(val).unwrap_or(640);
                }
                "canvas_height" => {
                    s.canvas_height = parse_canvas_side(val).unwrap_or(480);
                }
                "stroke_width" => {
                    s.stroke_width = val
                        .parse::<u32>()
                        .map(|w| w.clamp(1, MAX_STROKE_WIDTH))
                        .unwrap_or(1);
                }
                "primary_color" => {
                    if let Some(c) = Color::parse(val) {
                        s.primary_color = c;
                    }
                }
                "selection_color" => {
                    if let Some(c) = Color::parse(val) {
                        s.selection_color = c;
                    }
                }
                "default_tool" => {
                    if let Some(t) = ToolType::from_name(val) {
                        s.default_tool = t;
                    }
                }
                _ => {}
            }
        }
        s
    }

    /// Load settings from the default location (defaults if missing or unreadable).
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_config_str(&content),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to the default location.
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::settings_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_config_string())
    }
}

/// Positive side length, capped at [`MAX_CANVAS_SIZE`].
fn parse_canvas_side(val: &str) -> Option<u32> {
    val.parse::<u32>()
        .ok()
        .filter(|&n| n > 0)
        .map(|n| n.min(MAX_CANVAS_SIZE))
}
