use anyhow::{Context, Result, bail};

/// Environment variable holding the store project URL.
pub const URL_VAR: &str = "TIDYBOARD_URL";
/// Environment variable holding the store anon key.
pub const KEY_VAR: &str = "TIDYBOARD_KEY";

/// Connection settings for the hosted table store.
///
/// The key doubles as the `apikey` header and the bearer token; that is how
/// the store authenticates anonymous clients on both the REST and realtime
/// endpoints.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Project base URL without a trailing slash, e.g. `https://proj.example.co`.
    pub endpoint_url: String,
    pub api_key: String,
}

impl StoreConfig {
    pub fn new(endpoint_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let mut endpoint_url = endpoint_url.into();
        let api_key = api_key.into();
        while endpoint_url.ends_with('/') {
            endpoint_url.pop();
        }
        if endpoint_url.is_empty() {
            bail!("Store URL must not be empty");
        }
        if !endpoint_url.starts_with("https://") && !endpoint_url.starts_with("http://") {
            bail!("Store URL must start with http:// or https://, got '{endpoint_url}'");
        }
        if api_key.is_empty() {
            bail!("Store API key must not be empty");
        }
        Ok(Self {
            endpoint_url,
            api_key,
        })
    }

    /// Read settings from the environment, honoring a `.env` file in the
    /// working directory when one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let url = std::env::var(URL_VAR)
            .with_context(|| format!("{URL_VAR} is not set (store project URL)"))?;
        let key = std::env::var(KEY_VAR)
            .with_context(|| format!("{KEY_VAR} is not set (store anon key)"))?;
        Self::new(url, key)
    }

    /// REST endpoint for a table: `{url}/rest/v1/{table}`.
    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.endpoint_url, table)
    }

    /// Realtime websocket endpoint. The key rides along as a query
    /// parameter because websocket clients cannot set headers mid-upgrade.
    pub fn realtime_url(&self) -> String {
        let ws_base = if let Some(rest) = self.endpoint_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.endpoint_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.endpoint_url.clone()
        };
        format!(
            "{}/realtime/v1/websocket?apikey={}&vsn=1.0.0",
            ws_base, self.api_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_strips_trailing_slashes() {
        let config = StoreConfig::new("https://proj.example.co///", "anon-key").unwrap();
        assert_eq!(config.endpoint_url, "https://proj.example.co");
    }

    #[test]
    fn test_config_rejects_empty_values() {
        assert!(StoreConfig::new("", "anon-key").is_err());
        assert!(StoreConfig::new("https://proj.example.co", "").is_err());
    }

    #[test]
    fn test_config_rejects_bad_scheme() {
        let err = StoreConfig::new("ftp://proj.example.co", "anon-key").unwrap_err();
        assert!(err.to_string().contains("http"));
    }

    #[test]
    fn test_rest_url_shape() {
        let config = StoreConfig::new("https://proj.example.co", "anon-key").unwrap();
        assert_eq!(
            config.rest_url("tasks"),
            "https://proj.example.co/rest/v1/tasks"
        );
    }

    #[test]
    fn test_realtime_url_swaps_scheme_and_carries_key() {
        let config = StoreConfig::new("https://proj.example.co", "anon-key").unwrap();
        let url = config.realtime_url();
        assert!(url.starts_with("wss://proj.example.co/realtime/v1/websocket"));
        assert!(url.contains("apikey=anon-key"));
        assert!(url.contains("vsn=1.0.0"));

        let plain = StoreConfig::new("http://localhost:54321", "anon-key").unwrap();
        assert!(plain.realtime_url().starts_with("ws://localhost:54321/"));
    }
}
