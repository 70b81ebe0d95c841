//! Report output: terminal summary, JSON and the SVG figure.

pub mod json;
pub mod plot;
pub mod terminal;

pub use json::{to_json, to_json_pretty, write_json};
pub use terminal::format_report;
