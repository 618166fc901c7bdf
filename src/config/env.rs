// Environment overrides, layered on top of an `Options` value.

use super::options::{LoggerSelection, Options};
use super::ConfigError;

/// Helper function to load and parse an optional environment variable.
/// Leaves `target` untouched if the variable doesn't exist.
pub fn load_env_var<T>(name: &str, target: &mut Option<T>) -> Result<(), ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(value) = std::env::var(name) {
        *target = Some(
            value
                .parse()
                .map_err(|e| ConfigError::Env(format!("Invalid {name}: {e}")))?,
        );
    }
    Ok(())
}

/// Helper function to load an optional string environment variable.
pub fn load_env_string_opt(name: &str, target: &mut Option<String>) {
    if let Ok(value) = std::env::var(name) {
        *target = Some(value);
    }
}

impl Options {
    /// Options built from `LUMBERJACK_*` variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Options::default().with_env_overrides()
    }

    /// Overrides fields of `self` with any `LUMBERJACK_*` variables set.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        load_env_string_opt("LUMBERJACK_APPLICATION", &mut self.application);
        load_env_string_opt(
            "LUMBERJACK_APPLICATION_VERSION",
            &mut self.application_version,
        );
        load_env_var("LUMBERJACK_LEVEL", &mut self.level)?;
        load_env_string_opt("LUMBERJACK_DEFAULT_EVENT", &mut self.default_event);
        load_env_var("LUMBERJACK_SHOW_COLOURS", &mut self.show_colours)?;

        if let Ok(logger) = std::env::var("LUMBERJACK_LOGGER") {
            self.logger = Some(LoggerSelection::Single(logger));
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        for name in [
            "LUMBERJACK_APPLICATION",
            "LUMBERJACK_APPLICATION_VERSION",
            "LUMBERJACK_LEVEL",
            "LUMBERJACK_DEFAULT_EVENT",
            "LUMBERJACK_SHOW_COLOURS",
            "LUMBERJACK_LOGGER",
        ] {
            // SAFETY: env mutation is confined to #[serial] tests
            unsafe { std::env::remove_var(name) };
        }
    }

    #[test]
    #[serial]
    fn test_env_overrides_base_options() {
        clear();
        // SAFETY: env mutation is confined to #[serial] tests
        unsafe {
            std::env::set_var("LUMBERJACK_APPLICATION", "from-env");
            std::env::set_var("LUMBERJACK_LEVEL", "2");
            std::env::set_var("LUMBERJACK_LOGGER", "file");
        }

        let options = Options::new()
            .application("from-code")
            .application_version("1")
            .with_env_overrides()
            .unwrap();

        assert_eq!(options.application.as_deref(), Some("from-env"));
        assert_eq!(options.application_version.as_deref(), Some("1"));
        assert_eq!(options.level, Some(2));
        assert!(matches!(options.logger, Some(LoggerSelection::Single(ref n)) if n == "file"));
        clear();
    }

    #[test]
    #[serial]
    fn test_invalid_env_value_is_an_error() {
        clear();
        // SAFETY: env mutation is confined to #[serial] tests
        unsafe { std::env::set_var("LUMBERJACK_SHOW_COLOURS", "sometimes") };

        let err = Options::from_env().unwrap_err();
        assert!(err.to_string().contains("LUMBERJACK_SHOW_COLOURS"));
        clear();
    }
}
