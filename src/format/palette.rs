use crate::domain::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Code used for fields the level table has no entry for.
pub const DIM: u8 = 90;

/// Per-level ANSI colour tables: level key -> field name -> SGR code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(BTreeMap<String, BTreeMap<String, u8>>);

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one code, creating the level table if needed.
    pub fn with(mut self, level: &str, field: &str, code: u8) -> Self {
        self.0
            .entry(level.to_string())
            .or_default()
            .insert(field.to_string(), code);
        self
    }

    /// Table for `level`, else the `default` table.
    pub fn table(&self, level: &LogLevel) -> Option<&BTreeMap<String, u8>> {
        self.0.get(&level.key()).or_else(|| self.0.get("default"))
    }

    pub fn code(&self, level: &LogLevel, field: &str) -> u8 {
        self.table(level)
            .and_then(|table| table.get(field))
            .copied()
            .unwrap_or(DIM)
    }

    /// Merges `top` over `self` table by table.
    pub fn merge(&mut self, top: &Palette) {
        for (level, fields) in &top.0 {
            let table = self.0.entry(level.clone()).or_default();
            for (field, code) in fields {
                table.insert(field.clone(), *code);
            }
        }
    }

    pub fn paint(code: u8, text: &str) -> String {
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SinkConfig;
    use crate::entry::EntryBuilder;
    use crate::format::{FormatSpec, Formatter};
    use std::sync::Arc;

    #[test]
    fn test_falls_back_to_default_table() {
        let palette = Palette::new().with("default", "event", 36);
        assert_eq!(palette.code(&LogLevel::Info, "event"), 36);
    }

    #[test]
    fn test_missing_field_is_dim() {
        let palette = Palette::new().with("warning", "event", 33);
        assert_eq!(palette.code(&LogLevel::Warning, "data"), DIM);
        assert_eq!(Palette::new().code(&LogLevel::Error, "event"), DIM);
    }

    #[test]
    fn test_table_default_key_is_not_a_field_fallback() {
        let palette = Palette::new().with("info", "default", 35);
        assert_eq!(palette.code(&LogLevel::Info, "event"), DIM);
        assert_eq!(palette.code(&LogLevel::Info, "default"), 35);
    }

    #[test]
    fn test_unlisted_field_renders_dim() {
        let mut config = SinkConfig::default();
        config.show_colours = true;
        config.format = FormatSpec::template("%event%");
        config.colours = Palette::new().with("info", "default", 35);
        let entry = EntryBuilder::new(&config).build(
            LogLevel::Info,
            Some("E"),
            "m".into(),
            None,
            None,
        );
        let rendered = Formatter::new(Arc::new(config)).render(&entry);
        assert_eq!(rendered, "\u{1b}[90mE\u{1b}[0m");
    }

    #[test]
    fn test_merge_overrides_single_code() {
        let mut palette = Palette::new().with("error", "event", 31).with("error", "message", 31);
        palette.merge(&Palette::new().with("error", "event", 35));
        assert_eq!(palette.code(&LogLevel::Error, "event"), 35);
        assert_eq!(palette.code(&LogLevel::Error, "message"), 31);
    }

    #[test]
    fn test_paint() {
        assert_eq!(Palette::paint(33, "x"), "\x1b[33mx\x1b[0m");
    }
}
