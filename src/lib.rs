//! RasterPaint: a single-layer raster paint engine.
//!
//! The [`components::tools::EditSession`] owns the canvas and turns host
//! input into pixel edits; everything it writes is recorded in
//! [`components::history::History`] so it can be undone.

pub mod logger;

pub mod canvas;
pub mod cli;
pub mod components;
pub mod ops;
pub mod settings;

pub use canvas::{Color, Pixel, PixelBuffer, Point};
pub use components::history::{History, Transaction};
pub use components::tools::{Action, EditSession, InputEvent, KeyCode, ToolType};
