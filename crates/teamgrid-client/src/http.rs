//! HTTP transport for the Teamgrid server
//!
//! A thin reqwest wrapper that speaks the `/v1` JSON API and maps error
//! bodies onto [`ClientError`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use teamgrid_api::model::{
    DateRangeQuery, TIMELINE_DAYS_PATH, TIMELINE_GROUPS_PATH, TIMELINE_MOVE_PATH,
};
use teamgrid_api::timeline::model::{
    AssignmentGroupInfo, BatchCreateDayAssignmentsRequest, BatchDeleteDayAssignmentsRequest,
    CreateAssignmentGroupRequest, CreateDayAssignmentRequest, DayAssignmentInfo,
    MoveAssignmentBlockRequest, MoveAssignmentBlockResponse, UpdateAssignmentGroupRequest,
};
use teamgrid_common::Priority;

use crate::error::{ClientError, Result};
use crate::transport::ScheduleTransport;

/// Configuration for the HTTP transport
#[derive(Clone, Debug)]
pub struct GridClientConfig {
    /// Server address to connect to
    pub server_addr: String,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Per-request read timeout
    pub read_timeout: Duration,
    /// Context path prepended to every request path
    pub context_path: String,
}

impl Default for GridClientConfig {
    fn default() -> Self {
        Self {
            server_addr: "http://127.0.0.1:8460".to_string(),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(30),
            context_path: String::new(),
        }
    }
}

impl GridClientConfig {
    /// Config for a single server address, with default timeouts
    pub fn new(server_addr: impl Into<String>) -> Self {
        Self {
            server_addr: server_addr.into(),
            ..Default::default()
        }
    }

    /// Override the connect and read timeouts
    pub fn timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }

    /// Prefix every request path with a server context path
    pub fn context_path(mut self, path: impl Into<String>) -> Self {
        self.context_path = path.into();
        self
    }
}

/// HTTP client for the Teamgrid `/v1` API
pub struct TeamgridHttpClient {
    client: Client,
    config: GridClientConfig,
}

impl TeamgridHttpClient {
    pub fn new(config: GridClientConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .build()?;

        Ok(Self { client, config })
    }

    /// Absolute URL for an API path, honoring the configured context path.
    fn url_for(&self, path: &str) -> String {
        match self.config.context_path.as_str() {
            "" => format!("{}{}", self.config.server_addr, path),
            ctx => format!(
                "{}/{}{}",
                self.config.server_addr,
                ctx.trim_start_matches('/'),
                path
            ),
        }
    }

    async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let url = self.url_for(path);
        debug!("GET {url}");
        Self::parse(self.client.get(&url).query(query).send().await?).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url_for(path);
        debug!("POST {url}");
        Self::parse(self.client.post(&url).json(body).send().await?).await
    }

    async fn post_json_no_content<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<()> {
        let url = self.url_for(path);
        debug!("POST {url}");
        Self::expect_empty(self.client.post(&url).json(body).send().await?).await
    }

    async fn patch_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url_for(path);
        debug!("PATCH {url}");
        Self::parse(self.client.patch(&url).json(body).send().await?).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url_for(path);
        debug!("DELETE {url}");
        Self::expect_empty(self.client.delete(&url).send().await?).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        if response.status().is_success() {
            return Ok(response.json::<T>().await?);
        }
        Err(Self::error_body(response).await)
    }

    async fn expect_empty(response: Response) -> Result<()> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::error_body(response).await)
    }

    /// Map a non-success response onto [`ClientError`].
    ///
    /// A 409 carrying `existingGroupId` becomes [`ClientError::Conflict`];
    /// everything else surfaces the body's `message` field when present.
    async fn error_body(response: Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();

        if status == StatusCode::CONFLICT
            && let Some(id) = json.get("existingGroupId").and_then(|v| v.as_i64())
        {
            return ClientError::Conflict {
                existing_group_id: id,
            };
        }

        let message = json
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or(body);
        ClientError::ServerError {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl ScheduleTransport for TeamgridHttpClient {
    async fn create_day(
        &self,
        assignment_id: i64,
        date: NaiveDate,
        comment: Option<String>,
    ) -> Result<DayAssignmentInfo> {
        let request = CreateDayAssignmentRequest {
            assignment_id,
            date,
            comment,
        };
        self.post_json(TIMELINE_DAYS_PATH, &request).await
    }

    async fn create_days(
        &self,
        assignment_id: i64,
        dates: Vec<NaiveDate>,
    ) -> Result<Vec<DayAssignmentInfo>> {
        let request = BatchCreateDayAssignmentsRequest {
            assignment_id,
            dates,
        };
        self.post_json(&format!("{}/batch", TIMELINE_DAYS_PATH), &request)
            .await
    }

    async fn delete_day(&self, id: i64) -> Result<()> {
        self.delete(&format!("{}/{}", TIMELINE_DAYS_PATH, id)).await
    }

    async fn delete_days(&self, ids: Vec<i64>) -> Result<()> {
        let request = BatchDeleteDayAssignmentsRequest { ids };
        self.post_json_no_content(&format!("{}/batch-delete", TIMELINE_DAYS_PATH), &request)
            .await
    }

    async fn create_group(
        &self,
        assignment_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        priority: Priority,
        comment: Option<String>,
    ) -> Result<AssignmentGroupInfo> {
        let request = CreateAssignmentGroupRequest {
            assignment_id,
            start_date,
            end_date,
            priority,
            comment,
        };
        self.post_json(TIMELINE_GROUPS_PATH, &request).await
    }

    async fn update_group(
        &self,
        id: i64,
        priority: Option<Priority>,
        comment: Option<String>,
    ) -> Result<AssignmentGroupInfo> {
        let request = UpdateAssignmentGroupRequest { priority, comment };
        self.patch_json(&format!("{}/{}", TIMELINE_GROUPS_PATH, id), &request)
            .await
    }

    async fn move_block(
        &self,
        request: MoveAssignmentBlockRequest,
    ) -> Result<MoveAssignmentBlockResponse> {
        self.post_json(TIMELINE_MOVE_PATH, &request).await
    }

    async fn fetch_days(&self, query: &DateRangeQuery) -> Result<Vec<DayAssignmentInfo>> {
        self.get_with_query(TIMELINE_DAYS_PATH, query).await
    }

    async fn fetch_groups(&self, query: &DateRangeQuery) -> Result<Vec<AssignmentGroupInfo>> {
        self.get_with_query(TIMELINE_GROUPS_PATH, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GridClientConfig::default();
        assert_eq!(config.server_addr, "http://127.0.0.1:8460");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.read_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_overrides() {
        let config = GridClientConfig::new("http://localhost:9000")
            .timeouts(Duration::from_secs(3), Duration::from_secs(15))
            .context_path("/teamgrid");

        assert_eq!(config.server_addr, "http://localhost:9000");
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.read_timeout, Duration::from_secs(15));
        assert_eq!(config.context_path, "/teamgrid");
    }

    #[test]
    fn test_url_without_context_path() {
        let client =
            TeamgridHttpClient::new(GridClientConfig::new("http://localhost:8460")).unwrap();
        assert_eq!(
            client.url_for("/v1/timeline/days"),
            "http://localhost:8460/v1/timeline/days"
        );
    }

    #[test]
    fn test_url_with_context_path() {
        let config = GridClientConfig::new("http://localhost:8460").context_path("teamgrid");
        let client = TeamgridHttpClient::new(config).unwrap();
        assert_eq!(
            client.url_for("/v1/timeline/days"),
            "http://localhost:8460/teamgrid/v1/timeline/days"
        );
    }
}
