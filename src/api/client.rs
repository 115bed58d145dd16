use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{RETRY_AFTER, USER_AGENT};
use reqwest::Client;

use crate::config::ClientConfig;
use crate::error::{MoreError, MoreResult};
use crate::morelog::{LogEntry, LogLevel, MoreLogger};
use crate::thing::Thing;

use super::{expanded_things, side_table, ExpandBatch, LookupBatch, Requester};

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// [`Requester`] backed by Reddit's OAuth HTTP API.
pub struct RedditClient {
    client: Client,
    config: ClientConfig,
    logger: Arc<MoreLogger>,
}

impl RedditClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self {
            client,
            config,
            logger: Arc::new(MoreLogger::new()),
        }
    }

    pub fn with_logger(mut self, logger: Arc<MoreLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> MoreResult<serde_json::Value> {
        let url = self.config.endpoint(path);
        let mut request = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.config.user_agent)
            .query(query);
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();

            self.logger.log(
                &LogEntry::new(LogLevel::Warn, "client", format!("GET {path} -> {status}"))
                    .with_payload(serde_json::json!({ "body": body })),
            );

            return Err(match status.as_u16() {
                429 => MoreError::RateLimited {
                    retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
                },
                401 | 403 => MoreError::Auth(format!("{status}: {body}")),
                code => MoreError::Status { status: code, body },
            });
        }

        Ok(response.json::<serde_json::Value>().await?)
    }
}

#[async_trait]
impl Requester for RedditClient {
    async fn lookup(&self, fullnames: &[String]) -> MoreResult<LookupBatch> {
        let ids = fullnames.join(",");
        let listing = self
            .get_json("api/info", &[("id", ids.as_str()), ("raw_json", "1")])
            .await?;

        let children = listing
            .pointer("/data/children")
            .and_then(|c| c.as_array())
            .ok_or_else(|| anyhow::anyhow!("api/info response missing data.children"))?;

        Ok(LookupBatch {
            things: Thing::decode_all(children)?,
            side: side_table(children),
        })
    }

    async fn expand_children(&self, ids: &[String], link_id: &str) -> MoreResult<ExpandBatch> {
        let children = ids.join(",");
        let raw = self
            .get_json(
                "api/morechildren",
                &[
                    ("api_type", "json"),
                    ("children", children.as_str()),
                    ("link_id", link_id),
                    ("raw_json", "1"),
                ],
            )
            .await?;

        // Error payloads carry no things; the expander reports them.
        let side = expanded_things(&raw).map(side_table).unwrap_or_default();
        Ok(ExpandBatch { raw, side })
    }
}
