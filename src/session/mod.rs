//! Shared session state handed to every stub.

use std::sync::Arc;

use crate::api::Requester;
use crate::config::ExpandConfig;
use crate::error::{MoreError, MoreResult};
use crate::listing::CommentListing;
use crate::morelog::{LogEntry, LogLevel, MoreLogger};
use crate::stub::Stub;

/// Bundles the requester, expansion settings and logger.
///
/// Stubs hold an `Arc<Session>`; cloning a stub shares the session rather than
/// copying it.
pub struct Session {
    requester: Arc<dyn Requester>,
    config: ExpandConfig,
    logger: Arc<MoreLogger>,
}

impl Session {
    pub fn new(requester: Arc<dyn Requester>) -> Self {
        Self {
            requester,
            config: ExpandConfig::default(),
            logger: Arc::new(MoreLogger::new()),
        }
    }

    pub fn with_config(mut self, config: ExpandConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: Arc<MoreLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn shared(self) -> Arc<Session> {
        Arc::new(self)
    }

    pub fn requester(&self) -> &dyn Requester {
        self.requester.as_ref()
    }

    pub fn config(&self) -> &ExpandConfig {
        &self.config
    }

    pub fn logger(&self) -> &MoreLogger {
        &self.logger
    }

    /// A stub for `child_ids` under `parent_id` in thread `link_id`.
    pub fn stub(
        self: &Arc<Self>,
        parent_id: impl Into<String>,
        link_id: impl Into<String>,
        child_ids: Vec<String>,
    ) -> Stub {
        Stub::new(self.clone(), parent_id, child_ids).with_link_id(link_id)
    }

    /// Decodes a `Listing` of comments, e.g. the second element of a
    /// `/comments/<article>` response.
    pub fn listing_from_json(self: &Arc<Self>, value: &serde_json::Value) -> MoreResult<CommentListing> {
        if value.get("kind").and_then(|k| k.as_str()) != Some("Listing") {
            return Err(MoreError::Other(anyhow::anyhow!(
                "expected a Listing, got {}",
                value.get("kind").unwrap_or(&serde_json::Value::Null)
            )));
        }
        CommentListing::from_replies(value, self)
    }

    pub(crate) fn trace_batch(&self, source: &str, stub: &Stub, start: usize, ids: &[String]) {
        if !self.logger.enabled(LogLevel::Debug) {
            return;
        }
        self.logger.log(
            &LogEntry::new(
                LogLevel::Debug,
                source,
                format!("requesting {} of {} ids at {start}", ids.len(), stub.len()),
            )
            .with_link(stub.root_id())
            .with_payload(serde_json::json!({ "start": start, "ids": ids })),
        );
    }
}
