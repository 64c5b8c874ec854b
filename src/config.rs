use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Application configuration, derived from `VoterConsole.toml` and
/// `VOTER_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    api_base: String,
    debounce_ms: u64,
    default_page_size: u32,
    success_banner_ttl_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:3000/api".to_string(),
            debounce_ms: 300,
            default_page_size: 50,
            success_banner_ttl_ms: 3000,
        }
    }
}

impl Config {
    /// Load the config, with the environment taking precedence over the
    /// toml file and the file over the built-in defaults.
    pub fn load() -> Result<Self> {
        Ok(Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("VoterConsole.toml"))
            .merge(Env::prefixed("VOTER_"))
            .extract()?)
    }

    /// Base URL of the remote API. Session credentials are cookies scoped
    /// to this origin.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// How long the search box waits after the last keystroke before the
    /// term commits and the roster reloads.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Rows per roster page until the user picks another size.
    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    /// How long success banners stay up; error banners persist until the
    /// next action.
    pub fn success_banner_ttl(&self) -> Duration {
        Duration::from_millis(self.success_banner_ttl_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(Duration::from_millis(300), config.debounce());
        assert_eq!(50, config.default_page_size());
        assert_eq!(Duration::from_millis(3000), config.success_banner_ttl());
    }

    #[test]
    fn environment_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("VOTER_API_BASE", "https://rolls.example.org/api");
            jail.set_env("VOTER_DEBOUNCE_MS", "150");
            let config = Config::load().expect("config should load");
            assert_eq!("https://rolls.example.org/api", config.api_base());
            assert_eq!(Duration::from_millis(150), config.debounce());
            Ok(())
        });
    }

    #[test]
    fn toml_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("VoterConsole.toml", "default_page_size = 25")?;
            let config = Config::load().expect("config should load");
            assert_eq!(25, config.default_page_size());
            Ok(())
        });
    }
}
