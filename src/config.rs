//! Configuration to acknowledge reader preferences as well as set defaults.
//!
//! We try to find a uscode.toml in the working directory, and if present we load settings
//! from there. This provides the corpus location, filename pattern, wrapping width and
//! logging preferences. Command line arguments override whatever is loaded here.

use facet::Facet;
use std::fs;
use std::path::Path;

/// Name of the optional configuration file.
pub const CONFIG_FILE: &str = "uscode.toml";

#[derive(Facet, Clone)]
/// Reader preferences loaded from uscode.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "xml".to_string())]
    /// Directory holding one XML document per title.
    pub corpus_dir: String,
    #[facet(default = "Title_{}.xml".to_string())]
    /// Filename of a title document, with `{}` standing for the title number.
    pub file_pattern: String,
    #[facet(default = 100)]
    /// Maximum line width for section text in the detail view.
    pub wrap_width: usize,
    #[facet(default = true)]
    /// Keep loaded outlines for the rest of the session.
    pub cache_outlines: bool,
    #[facet(default = "warn".to_string())]
    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    #[facet(default = String::new())]
    /// File receiving log output in the interactive browser; empty disables it.
    pub log_file: String,
}

impl Config {
    #[must_use]
    /// Load configuration from uscode.toml if present.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from a specific file, falling back to defaults when it is missing
    /// or invalid.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(contents) = fs::read_to_string(path) {
            if let Ok(config) = facet_toml::from_str::<Self>(&contents) {
                return config;
            }
        }
        facet_toml::from_str::<Self>("").expect("default configuration is valid")
    }

    #[must_use]
    /// Log file for the interactive browser, if one is configured.
    pub fn log_file(&self) -> Option<&Path> {
        (!self.log_file.is_empty()).then(|| Path::new(self.log_file.as_str()))
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
