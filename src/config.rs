mod types;

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

pub use self::types::*;

pub const DEFAULT_API_BASE: &str = "https://gitee.com/api/v5/";

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct Config {
    pub bind_addr: String,
    pub api_base: Url,

    /// How long a fetched upstream response is reused.
    pub cache_ttl: Duration,

    /// Maximum number of upstream responses kept in the cache.
    pub cache_capacity: u64,

    pub gitee: GiteeConfig,
}

impl Config {
    pub fn update(&mut self, args: crate::cli::Args) {
        fn set_if_some<T>(dst: &mut T, v: Option<T>) {
            if let Some(v) = v {
                *dst = v;
            }
        }

        set_if_some(&mut self.bind_addr, args.bind_addr);
        set_if_some(&mut self.gitee.access_token, args.access_token.map(Some));
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "127.0.0.1:20655".into(),
            api_base: Url::parse(DEFAULT_API_BASE).expect("the default API base is a valid URL"),
            cache_ttl: Duration::from_secs(3600),
            cache_capacity: 8192,
            gitee: Default::default(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct GiteeConfig {
    /// Omitted from upstream requests when unset.
    pub access_token: Option<String>,
}

pub fn load(search_paths: &[PathBuf]) -> Result<Config> {
    for path in search_paths {
        debug!("Trying to load {}", path.display());

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,

            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(file = %path.display(), "File not found, skipping");
                continue;
            }

            Err(e) => {
                return Err(e)
                    .context(anyhow!("could not load a config file `{}`", path.display()));
            }
        };

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| anyhow!("could not load the config file `{}`", path.display()))?;

        info!("Loaded a config file `{}`", path.display());

        return Ok(cfg);
    }

    info!("Using the default config");

    Ok(Default::default())
}

#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;

    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();

        assert_eq!(cfg.bind_addr, "127.0.0.1:20655");
        assert_eq!(cfg.api_base.as_str(), DEFAULT_API_BASE);
        assert_eq!(StdDuration::from(cfg.cache_ttl), StdDuration::from_secs(3600));
        assert_eq!(cfg.cache_capacity, 8192);
        assert!(cfg.gitee.access_token.is_none());
    }

    #[test]
    fn full_config() {
        let cfg: Config = toml::from_str(
            r#"
            bind-addr = "0.0.0.0:8080"
            api-base = "http://127.0.0.1:9000/api/v5/"
            cache-ttl = "5m"
            cache-capacity = 16

            [gitee]
            access-token = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
        assert_eq!(cfg.api_base.as_str(), "http://127.0.0.1:9000/api/v5/");
        assert_eq!(StdDuration::from(cfg.cache_ttl), StdDuration::from_secs(300));
        assert_eq!(cfg.cache_capacity, 16);
        assert_eq!(cfg.gitee.access_token.as_deref(), Some("secret"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("db-path = \"x\"").is_err());
    }

    #[test]
    fn cli_overrides_config() {
        let mut cfg = Config::default();
        cfg.update(crate::cli::Args {
            config_path: None,
            bind_addr: Some("[::1]:1234".into()),
            access_token: Some("token".into()),
        });

        assert_eq!(cfg.bind_addr, "[::1]:1234");
        assert_eq!(cfg.gitee.access_token.as_deref(), Some("token"));
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let cfg = load(&["./definitely/not/here.toml".into()]).unwrap();

        assert_eq!(cfg.bind_addr, Config::default().bind_addr);
    }
}
