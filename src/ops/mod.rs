pub mod clipboard;
pub mod fill;
pub mod selection;
pub mod shapes;
