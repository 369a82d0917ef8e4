use crate::conf::error::ConfigError;
use crate::conf::types::{AnalyserConfig, ConfigFile};
use crate::duration::parse_duration;
use std::fs;
use std::path::Path;

/// Reads an HCL configuration file. Settings it leaves out keep their
/// defaults.
pub fn load_config(path: &Path) -> Result<AnalyserConfig, ConfigError> {
    let s = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    parse_config(path, &s)
}

/// Parses configuration text; `path` only labels errors.
pub fn parse_config(path: &Path, s: &str) -> Result<AnalyserConfig, ConfigError> {
    let parsed: ConfigFile = hcl::from_str(s).map_err(|e| ConfigError::parse(path, e))?;
    let mut config = AnalyserConfig::default();

    if let Some(analysis) = parsed.analysis {
        if let Some(window) = analysis.window {
            config.window =
                parse_duration(&window).map_err(|source| ConfigError::InvalidWindow {
                    value: window.clone(),
                    source,
                })?;
        }
        if let Some(restore) = analysis.restore_input_order {
            config.restore_input_order = restore;
        }
    }

    if let Some(output) = parsed.output {
        if let Some(delimiter) = output.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(capacity) = output.channel_capacity {
            config.channel_capacity = capacity;
        }
    }

    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &AnalyserConfig) -> Result<(), ConfigError> {
    if config.window_millis() <= 0 {
        return Err(ConfigError::Invalid {
            field: "window",
            reason: "must be at least one millisecond",
        });
    }
    if config.channel_capacity == 0 {
        return Err(ConfigError::Invalid {
            field: "channel_capacity",
            reason: "must be greater than zero",
        });
    }
    Ok(())
}
