//! Loading of rule overrides from TOML files.

use std::{fs, path::Path};

use medieval_protect_core::{Rules, RulesError};
use thiserror::Error;

/// Reasons a configuration file could not be turned into [`Rules`].
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration file")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML or names unknown fields.
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
    /// The file parsed but describes an unplayable rule set.
    #[error("configuration rejected")]
    Invalid(#[from] RulesError),
}

/// Reads the rules stored at `path`; fields the file omits keep their stock values.
pub(crate) fn load_rules(path: &Path) -> Result<Rules, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_rules(&contents)
}

fn parse_rules(contents: &str) -> Result<Rules, ConfigError> {
    let rules: Rules = toml::from_str(contents)?;
    rules.validate()?;
    Ok(rules)
}
