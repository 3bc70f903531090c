use crate::client::error::{status_of, ApiStatusError};
use crate::client::DashboardSource;
use crate::config::Settings;
use crate::domain::call::{CallAnalytics, CallEvent, MAX_RECENT_CALLS, MAX_WINDOW_DAYS};
use crate::domain::load::{Load, LoadQuery, NewLoad};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const LOADS_PATH: &[&str] = &["loads"];
const LOAD_SEARCH_PATH: &[&str] = &["loads", "search"];
const CALL_ANALYTICS_PATH: &[&str] = &["analytics", "calls"];
const RECENT_CALLS_PATH: &[&str] = &["events", "call-summary", "recent"];
const HEALTH_PATH: &[&str] = &["health"];

/// [`DashboardSource`] backed by the dashboard's JSON HTTP API.
#[derive(Debug, Clone)]
pub struct HttpDashboardClient {
    http: reqwest::Client,
    base_url: reqwest::Url,
    api_key: Option<String>,
    retries: u32,
}

impl HttpDashboardClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.require_api_base_url()?,
            settings.api_key.clone(),
            Duration::from_secs(settings.api_timeout_secs),
            settings.api_retries,
        )
    }

    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
        retries: u32,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build dashboard api http client")?;

        let base_url = reqwest::Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("invalid dashboard api base url: {base_url}"))?;
        anyhow::ensure!(
            !base_url.cannot_be_a_base(),
            "dashboard api base url must be hierarchical: {base_url}"
        );

        Ok(Self {
            http,
            base_url,
            api_key,
            retries,
        })
    }

    /// Appends `segments` to the base url. Each segment is percent-encoded, so ids
    /// containing `/`, `?` or `#` stay inside their own segment.
    fn url(&self, segments: &[&str]) -> Result<reqwest::Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("dashboard api base url cannot take a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        }
        Ok(headers)
    }

    /// Sends one request and returns the body of a successful response. Non-success
    /// statuses come back as [`ApiStatusError`].
    async fn send_once(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<&NewLoad>,
    ) -> Result<String> {
        let url = self.url(segments)?;
        let path = url.path().to_string();
        let mut req = self
            .http
            .request(method, url)
            .headers(self.headers()?)
            .query(query);
        if let Some(body) = body {
            req = req.json(body);
        }

        let res = req
            .send()
            .await
            .with_context(|| format!("dashboard api request failed: {path}"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read dashboard api response")?;

        if !status.is_success() {
            return Err(ApiStatusError { status, body: text }.into());
        }
        Ok(text)
    }

    async fn get_with_retries(&self, segments: &[&str], query: &[(&str, String)]) -> Result<String> {
        let path = segments.join("/");
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.send_once(Method::GET, segments, query, None).await {
                Ok(text) => return Ok(text),
                Err(err) => {
                    let retryable = err
                        .downcast_ref::<ApiStatusError>()
                        .map_or(true, ApiStatusError::is_retryable);
                    if !retryable || attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1).min(5));
                    tracing::warn!(attempt, %path, ?backoff, error = %err, "dashboard api fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T> {
        let text = self.get_with_retries(segments, query).await?;
        let path = segments.join("/");
        // Parse straight from text so label maps keep the payload's key order.
        serde_json::from_str::<T>(&text)
            .with_context(|| format!("dashboard api response for {path} has unexpected shape: {text}"))
    }
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    ok: bool,
}

#[async_trait::async_trait]
impl DashboardSource for HttpDashboardClient {
    fn source_name(&self) -> &'static str {
        "dashboard_http_json"
    }

    async fn health(&self) -> Result<()> {
        let health: HealthResponse = self.get_json(HEALTH_PATH, &[]).await?;
        anyhow::ensure!(health.ok, "dashboard api reports unhealthy");
        Ok(())
    }

    async fn fetch_loads(&self, query: &LoadQuery) -> Result<Vec<Load>> {
        query.validate()?;
        let loads: Vec<Load> = self
            .get_json(LOAD_SEARCH_PATH, &query.to_query_pairs())
            .await?;
        tracing::debug!(count = loads.len(), limit = query.limit, "fetched loads");
        Ok(loads)
    }

    async fn fetch_load(&self, load_id: &str) -> Result<Option<Load>> {
        let load_id = load_id.trim();
        anyhow::ensure!(!load_id.is_empty(), "load_id must be non-empty");
        match self.get_json::<Load>(&["loads", load_id], &[]).await {
            Ok(load) => Ok(Some(load)),
            Err(err) if status_of(&err) == Some(StatusCode::NOT_FOUND) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn create_load(&self, load: NewLoad) -> Result<Load> {
        let load = load.validate()?;
        // Not retried: a retry after a lost response would hit the duplicate-id check.
        match self
            .send_once(Method::POST, LOADS_PATH, &[], Some(&load))
            .await
        {
            Ok(text) => serde_json::from_str::<Load>(&text)
                .with_context(|| format!("created load response has unexpected shape: {text}")),
            Err(err) if status_of(&err) == Some(StatusCode::CONFLICT) => {
                anyhow::bail!("load_id already exists: {}", load.load_id)
            }
            Err(err) => Err(err),
        }
    }

    async fn fetch_call_analytics(&self, window_days: u32) -> Result<CallAnalytics> {
        anyhow::ensure!(
            (1..=MAX_WINDOW_DAYS).contains(&window_days),
            "analytics window must be 1..={MAX_WINDOW_DAYS} days (got {window_days})"
        );
        let analytics: CallAnalytics = self
            .get_json(CALL_ANALYTICS_PATH, &[("days", window_days.to_string())])
            .await?;
        tracing::debug!(
            window_days,
            outcomes = analytics.outcome_counts.len(),
            days = analytics.by_day.len(),
            "fetched call analytics"
        );
        Ok(analytics)
    }

    async fn fetch_recent_calls(&self, limit: u32) -> Result<Vec<CallEvent>> {
        anyhow::ensure!(
            (1..=MAX_RECENT_CALLS).contains(&limit),
            "recent calls limit must be 1..={MAX_RECENT_CALLS} (got {limit})"
        );
        let calls: Vec<CallEvent> = self
            .get_json(RECENT_CALLS_PATH, &[("limit", limit.to_string())])
            .await?;
        tracing::debug!(count = calls.len(), limit, "fetched recent calls");
        Ok(calls)
    }
}
