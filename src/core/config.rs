use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_PORTAL_URL: &str = "https://www.nfse.gov.br";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_MAX_PAGES: u32 = 500;

#[derive(Clone, Debug)]
pub struct FaturamentoConfig {
    pub portal_url: Url,
    pub user_agent: String,
    pub timeout: Duration,
    pub max_pages: u32,
    pub output_dir: PathBuf,
    pub bind_addr: String,
}

impl Default for FaturamentoConfig {
    fn default() -> Self {
        Self {
            portal_url: Url::parse(DEFAULT_PORTAL_URL).expect("default portal url is valid"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_pages: DEFAULT_MAX_PAGES,
            output_dir: PathBuf::from("."),
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl FaturamentoConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let portal_url = match lookup("FATURAMENTO_PORTAL_URL") {
            Some(raw) => Url::parse(&raw)
                .map_err(|e| anyhow!("FATURAMENTO_PORTAL_URL is not a valid URL: {}", e))?,
            None => defaults.portal_url,
        };

        let timeout = match lookup("FATURAMENTO_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .map_err(|_| anyhow!("FATURAMENTO_TIMEOUT_SECS must be a whole number of seconds"))?,
            ),
            None => defaults.timeout,
        };

        let max_pages = match lookup("FATURAMENTO_MAX_PAGES") {
            Some(raw) => raw
                .trim()
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow!("FATURAMENTO_MAX_PAGES must be a positive integer"))?,
            None => defaults.max_pages,
        };

        let user_agent = lookup("USER_AGENT").unwrap_or(defaults.user_agent);
        let output_dir = lookup("FATURAMENTO_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);
        let bind_addr = lookup("FATURAMENTO_BIND_ADDR").unwrap_or(defaults.bind_addr);

        Ok(Self {
            portal_url,
            user_agent,
            timeout,
            max_pages,
            output_dir,
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<FaturamentoConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        FaturamentoConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.portal_url.as_str(), "https://www.nfse.gov.br/");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.max_pages, 500);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("FATURAMENTO_PORTAL_URL", "http://127.0.0.1:8080"),
            ("FATURAMENTO_TIMEOUT_SECS", "5"),
            ("FATURAMENTO_MAX_PAGES", "20"),
            ("FATURAMENTO_OUTPUT_DIR", "/tmp/out"),
            ("USER_AGENT", "test-agent"),
        ])
        .unwrap();
        assert_eq!(config.portal_url.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_pages, 20);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn test_malformed_values() {
        assert!(config_from(&[("FATURAMENTO_PORTAL_URL", "not a url")]).is_err());
        assert!(config_from(&[("FATURAMENTO_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_from(&[("FATURAMENTO_MAX_PAGES", "0")]).is_err());
    }
}
