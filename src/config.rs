use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::error::ScrapeError;
use crate::models::Site;

pub const DEFAULT_CONFIG_FILE: &str = "konbini.toml";
const ENV_PREFIX: &str = "KONBINI";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub sites: HashMap<String, SiteConfig>,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Extra attempts for a detail page that timed out.
    pub detail_retries: u32,
    pub retry_delay_ms: u64,
    /// Pause after every detail fetch.
    pub request_delay_ms: u64,
    /// Pause after every listing page.
    pub category_delay_ms: u64,
    /// Upper bound on pages followed through pagination per listing.
    pub max_pages: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        let mut sites = HashMap::new();

        sites.insert(
            Site::SevenEleven.key().to_string(),
            SiteConfig {
                name: "Seven-Eleven".to_string(),
                base_url: "https://www.sej.co.jp".to_string(),
            },
        );

        sites.insert(
            Site::FamilyMart.key().to_string(),
            SiteConfig {
                name: "FamilyMart".to_string(),
                base_url: "https://www.family.co.jp".to_string(),
            },
        );

        sites.insert(
            Site::Lawson.key().to_string(),
            SiteConfig {
                name: "Lawson".to_string(),
                base_url: "https://www.lawson.co.jp".to_string(),
            },
        );

        Config {
            sites,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            request_timeout_secs: 15,
            detail_retries: 2,
            retry_delay_ms: 5_000,
            request_delay_ms: 1_000,
            category_delay_ms: 2_000,
            max_pages: 50,
        }
    }
}

impl Config {
    /// Built-in defaults, overlaid by an optional TOML file and then by
    /// `KONBINI_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ScrapeError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ScrapeError> {
        if self.request_timeout_secs == 0 {
            return Err(ScrapeError::Config("request_timeout_secs must be positive".into()));
        }
        if self.max_pages == 0 {
            return Err(ScrapeError::Config("max_pages must be positive".into()));
        }
        for site in Site::ALL {
            self.site(site)?;
        }
        Ok(())
    }

    pub fn site(&self, site: Site) -> Result<&SiteConfig, ScrapeError> {
        self.sites
            .get(site.key())
            .ok_or_else(|| ScrapeError::Config(format!("no site entry for {}", site.key())))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn category_delay(&self) -> Duration {
        Duration::from_millis(self.category_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_cover_every_site() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.site(Site::Lawson).unwrap().base_url, "https://www.lawson.co.jp");
        assert_eq!(config.detail_retries, 2);
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "request_delay_ms = 0\nmax_pages = 3").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.request_delay_ms, 0);
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.request_timeout_secs, 15);
        assert!(config.sites.contains_key("familymart"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/konbini.toml")));
        assert!(matches!(result, Err(ScrapeError::Settings(_))));
    }
}
