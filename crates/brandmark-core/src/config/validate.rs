//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::synthetic::color::Rgb;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.remote_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.remote_timeout_ms must be > 0".into(),
            ));
        }
        if self.synthetic.canvas_size < 64 {
            return Err(ConfigError::ValidationError(
                "synthetic.canvas_size must be >= 64".into(),
            ));
        }
        if self.synthetic.darken_percent > 100 {
            return Err(ConfigError::ValidationError(
                "synthetic.darken_percent must be between 0 and 100".into(),
            ));
        }
        for (key, value) in [
            ("synthetic.default_primary", &self.synthetic.default_primary),
            ("synthetic.default_secondary", &self.synthetic.default_secondary),
        ] {
            if Rgb::parse(value).is_none() {
                return Err(ConfigError::ValidationError(format!(
                    "{key} must be a hex color like #2563eb, got {value:?}"
                )));
            }
        }
        if !(0.0..=2.0).contains(&self.reasoning.temperature) {
            return Err(ConfigError::ValidationError(
                "reasoning.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.reasoning.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "reasoning.max_tokens must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.limits.remote_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("remote_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_small_canvas() {
        let mut config = Config::default();
        config.synthetic.canvas_size = 16;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("canvas_size"));
    }

    #[test]
    fn test_validate_rejects_darken_over_100() {
        let mut config = Config::default();
        config.synthetic.darken_percent = 150;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("darken_percent"));
    }

    #[test]
    fn test_validate_rejects_unparseable_default_color() {
        let mut config = Config::default();
        config.synthetic.default_primary = "blue".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_primary"));
    }

    #[test]
    fn test_validate_rejects_invalid_temperature() {
        let mut config = Config::default();
        config.reasoning.temperature = 3.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }
}
