//! Presentation helpers shared by the list views.

pub mod format;

pub use format::{format_date, format_phone, initials, truncate_string};
