use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for crawling a module.
///
/// Read from an optional `vnm.toml` in the crawl root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The file extension of documents to scan for links.
    extension: String,

    /// Whether the crawl descends into symlinked directories.
    pub follow_links: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            follow_links: false,
        }
    }
}

impl Config {
    /// The name of the configuration file, relative to the crawl root.
    pub const FILE_NAME: &'static str = "vnm.toml";

    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        toml::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Loads the configuration for the module at `root`, falling back to the
    /// defaults if there is no usable configuration file.
    #[must_use]
    pub fn load_or_default(root: &Path) -> Self {
        let path = root.join(Self::FILE_NAME);
        Self::load(&path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config from {}: {e}", path.display());
            Self::default()
        })
    }

    /// The extension (without the leading dot) of documents to scan.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Sets the document extension. A leading dot is ignored.
    pub fn set_extension(&mut self, extension: &str) {
        self.extension = extension.trim_start_matches('.').to_string();
    }
}

/// Errors raised while loading a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file: {0}")]
    Read(#[source] std::io::Error),

    /// The file is not a valid configuration.
    #[error("Failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),
}

fn default_extension() -> String {
    "md".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_extension")]
        extension: String,

        #[serde(default)]
        follow_links: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                extension,
                follow_links,
            } => {
                let mut config = Self {
                    extension: String::new(),
                    follow_links,
                };
                config.set_extension(&extension);
                config
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            extension: config.extension,
            follow_links: config.follow_links,
        }
    }
}
