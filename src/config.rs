use std::time::Duration;

use tracing::Level;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8765";
pub const API_META_NAME: &str = "comic-crawler-api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base: String,
    /// Delay between status requests while a task is pending or running.
    pub poll_interval: Duration,
    /// Delay before retrying a failed status request.
    pub retry_interval: Duration,
    pub health_interval: Duration,
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            poll_interval: Duration::from_secs(1),
            retry_interval: Duration::from_secs(2),
            health_interval: Duration::from_secs(30),
            log_level: Level::INFO,
        }
    }
}

/// Raw values gathered from the page and the build.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigSources<'a> {
    pub query_api: Option<&'a str>,
    pub meta_api: Option<&'a str>,
    pub build_api: Option<&'a str>,
    pub query_log: Option<&'a str>,
}

impl Config {
    /// Query string beats `<meta>`, which beats the build-time value.
    pub fn resolve(sources: ConfigSources<'_>) -> Self {
        let mut config = Config::default();

        let api = [sources.query_api, sources.meta_api, sources.build_api]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|v| !v.is_empty());
        if let Some(api) = api {
            config.api_base = api.trim_end_matches('/').to_string();
        }

        if let Some(level) = sources.query_log.and_then(|l| l.trim().parse::<Level>().ok()) {
            config.log_level = level;
        }

        config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    /// Reads `?api=`, `?log=`, the api `<meta>` tag and `COMIC_CRAWLER_API`.
    #[cfg(target_arch = "wasm32")]
    pub fn from_window() -> Self {
        let window = web_sys::window();

        let params = window
            .as_ref()
            .and_then(|w| w.location().search().ok())
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok());
        let query_api = params.as_ref().and_then(|p| p.get("api"));
        let query_log = params.as_ref().and_then(|p| p.get("log"));

        let meta_api = window
            .as_ref()
            .and_then(|w| w.document())
            .and_then(|doc| {
                doc.query_selector(&format!("meta[name=\"{API_META_NAME}\"]"))
                    .ok()
                    .flatten()
            })
            .and_then(|meta| meta.get_attribute("content"));

        Config::resolve(ConfigSources {
            query_api: query_api.as_deref(),
            meta_api: meta_api.as_deref(),
            build_api: option_env!("COMIC_CRAWLER_API"),
            query_log: query_log.as_deref(),
        })
    }
}
