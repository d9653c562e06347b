//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: frame layout, dashboard chrome and overlays
//! - `forms`: the sign-in and sign-up views
//! - `input`: keyboard event handling
//! - `styles`: color schemes and text styling
//! - `tabs`: the prescriptions and team list views

pub mod forms;
pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;

/// Terminal width at which views switch to their wide layout
pub const WIDE_LAYOUT_MIN_WIDTH: u16 = 100;

pub fn is_wide(width: u16) -> bool {
    width >= WIDE_LAYOUT_MIN_WIDTH
}
