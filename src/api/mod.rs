//! The request seam between the expander and the remote API.

mod client;

pub use client::RedditClient;

use async_trait::async_trait;

use crate::accumulator::{Accumulator, Entity};
use crate::error::{MoreError, MoreResult};
use crate::thing::Thing;

/// Result of one `/api/info` batch.
#[derive(Debug, Clone, Default)]
pub struct LookupBatch {
    pub things: Vec<Thing>,
    pub side: Accumulator,
}

/// Result of one `/api/morechildren` batch. `raw` is the undecoded body so
/// embedded API errors can be checked before decoding.
#[derive(Debug, Clone)]
pub struct ExpandBatch {
    pub raw: serde_json::Value,
    pub side: Accumulator,
}

/// Performs the two batch requests the expander needs.
///
/// Implementations own transport concerns (auth, timeouts, rate limits); the
/// expander never retries a failed call.
#[async_trait]
pub trait Requester: Send + Sync {
    /// Looks up comments by fullname (`t1_<id>`). No replies are returned.
    async fn lookup(&self, fullnames: &[String]) -> MoreResult<LookupBatch>;

    /// Asks the server to expand bare comment ids within the thread `link_id`.
    async fn expand_children(&self, ids: &[String], link_id: &str) -> MoreResult<ExpandBatch>;
}

/// Fails with [`MoreError::Api`] when `json.errors` is non-empty.
///
/// Errors arrive as `[code, message, field]` tuples; only the first is reported.
pub fn check_json_errors(raw: &serde_json::Value) -> MoreResult<()> {
    let Some(first) = raw
        .pointer("/json/errors")
        .and_then(|e| e.as_array())
        .and_then(|errors| errors.first())
    else {
        return Ok(());
    };

    let (code, message) = match first {
        serde_json::Value::Array(parts) => (
            parts.first().and_then(|v| v.as_str()).unwrap_or("UNKNOWN"),
            parts.get(1).and_then(|v| v.as_str()).unwrap_or(""),
        ),
        serde_json::Value::String(code) => (code.as_str(), ""),
        _ => ("UNKNOWN", ""),
    };
    Err(MoreError::Api {
        code: code.to_string(),
        message: message.to_string(),
    })
}

/// The `json.data.things` array of a morechildren response.
pub fn expanded_things(raw: &serde_json::Value) -> MoreResult<&[serde_json::Value]> {
    raw.pointer("/json/data/things")
        .and_then(|t| t.as_array())
        .map(Vec::as_slice)
        .ok_or_else(|| anyhow::anyhow!("morechildren response missing json.data.things").into())
}

/// Side table keyed by each thing's fullname.
pub fn side_table(things: &[serde_json::Value]) -> Accumulator {
    let mut side = Accumulator::new();
    for thing in things {
        let (Some(kind), Some(data)) = (thing.get("kind").and_then(|k| k.as_str()), thing.get("data"))
        else {
            continue;
        };
        let Some(name) = data.get("name").and_then(|n| n.as_str()) else {
            continue;
        };
        side.insert(name, Entity::new(kind, data.clone()));
    }
    side
}
