pub mod error;
pub mod http;

pub use error::ApiStatusError;
pub use http::HttpDashboardClient;

use crate::domain::call::{CallAnalytics, CallEvent};
use crate::domain::load::{Load, LoadQuery, NewLoad};
use anyhow::Result;

/// Upstream data the dashboard reads from, and the load registry it writes to.
#[async_trait::async_trait]
pub trait DashboardSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn health(&self) -> Result<()>;

    async fn fetch_loads(&self, query: &LoadQuery) -> Result<Vec<Load>>;

    /// `Ok(None)` when no load has that id.
    async fn fetch_load(&self, load_id: &str) -> Result<Option<Load>>;

    async fn create_load(&self, load: NewLoad) -> Result<Load>;

    async fn fetch_call_analytics(&self, window_days: u32) -> Result<CallAnalytics>;

    /// Latest calls first.
    async fn fetch_recent_calls(&self, limit: u32) -> Result<Vec<CallEvent>>;
}
