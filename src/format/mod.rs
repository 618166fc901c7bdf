//! Token-substitution rendering of log entries.

pub mod formatter;
pub mod palette;
pub mod spec;

pub use formatter::Formatter;
pub use palette::Palette;
pub use spec::{FormatFn, FormatSpec};
