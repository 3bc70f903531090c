pub mod analytics;
pub mod client;
pub mod domain;

pub mod config {
    use anyhow::Context;

    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_RETRIES: u32 = 3;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_base_url: Option<String>,
        pub api_key: Option<String>,
        pub api_timeout_secs: u64,
        pub api_retries: u32,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let api_timeout_secs = match std::env::var("DASHBOARD_API_TIMEOUT_SECS") {
                Ok(s) => s
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("DASHBOARD_API_TIMEOUT_SECS is not a number: {s}"))?,
                Err(_) => DEFAULT_TIMEOUT_SECS,
            };

            let api_retries = match std::env::var("DASHBOARD_API_RETRIES") {
                Ok(s) => s
                    .trim()
                    .parse::<u32>()
                    .with_context(|| format!("DASHBOARD_API_RETRIES is not a number: {s}"))?,
                Err(_) => DEFAULT_RETRIES,
            };

            Ok(Self {
                api_base_url: non_empty_var("DASHBOARD_API_BASE_URL"),
                api_key: non_empty_var("DASHBOARD_API_KEY"),
                api_timeout_secs,
                api_retries,
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn require_api_base_url(&self) -> anyhow::Result<&str> {
            self.api_base_url
                .as_deref()
                .context("DASHBOARD_API_BASE_URL is required")
        }
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                api_base_url: None,
                api_key: None,
                api_timeout_secs: DEFAULT_TIMEOUT_SECS,
                api_retries: DEFAULT_RETRIES,
                sentry_dsn: None,
            }
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }

}
