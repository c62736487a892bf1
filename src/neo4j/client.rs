//! Async client for the Neo4j HTTP transactional API.

use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::error::{ClientError, ClientResult};
use super::protocol::{CommitRequest, CommitResponse, StatementResult};
use super::PlanProvider;
use crate::config::ConnectionConfig;
use crate::plan::{normalize, PlanNode};

/// Plan provider backed by `POST {base}/db/{database}/tx/commit`.
///
/// Each statement runs in its own auto-commit transaction. The client holds
/// no session state, so one instance can serve concurrent requests.
///
/// # Example
///
/// ```ignore
/// use cypher_advisor::config::ConnectionConfig;
/// use cypher_advisor::neo4j::{Neo4jHttpClient, PlanProvider};
///
/// let client = Neo4jHttpClient::new(ConnectionConfig::from_env()?)?;
/// client.verify().await?;
/// let plan = client.explain("MATCH (n:Person) RETURN n", None).await?;
/// ```
pub struct Neo4jHttpClient {
    http: reqwest::Client,
    config: ConnectionConfig,
}

impl Neo4jHttpClient {
    pub fn new(config: ConnectionConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self { http, config })
    }

    /// Run one statement and return its result.
    async fn run(&self, statement: String, database: Option<&str>) -> ClientResult<StatementResult> {
        let url = self.config.commit_url(database);
        tracing::debug!(%url, %statement, "running statement");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.user, Some(&self.config.password))
            .json(&CommitRequest::single(statement))
            .send()
            .await
            .map_err(|err| self.classify_transport_error(err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.classify_transport_error(err))?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let mut commit: CommitResponse = serde_json::from_str(&body)?;

        if let Some(error) = commit.errors.first() {
            return Err(ClientError::remote(&error.code, &error.message));
        }

        if commit.results.is_empty() {
            return Ok(StatementResult::default());
        }
        Ok(commit.results.swap_remove(0))
    }

    fn classify_transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.config.timeout.as_secs())
        } else {
            ClientError::Http(err)
        }
    }
}

#[async_trait]
impl PlanProvider for Neo4jHttpClient {
    async fn explain(&self, query: &str, database: Option<&str>) -> ClientResult<PlanNode> {
        let result = self.run(format!("EXPLAIN {query}"), database).await?;
        let plan = result.plan.ok_or(ClientError::MissingPlan("EXPLAIN"))?;
        Ok(normalize(Some(&plan)))
    }

    async fn profile(
        &self,
        query: &str,
        database: Option<&str>,
    ) -> ClientResult<(PlanNode, Duration)> {
        let started = Instant::now();
        let result = self.run(format!("PROFILE {query}"), database).await?;
        let elapsed = started.elapsed();

        let plan = result.profile.ok_or(ClientError::MissingPlan("PROFILE"))?;
        Ok((normalize(Some(&plan)), elapsed))
    }

    async fn verify(&self) -> ClientResult<()> {
        self.run("RETURN 1 AS test".to_string(), None).await?;
        tracing::info!(url = %self.config.base_url, "Neo4j connection established");
        Ok(())
    }
}
