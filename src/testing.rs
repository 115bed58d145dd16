//! Fixtures shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api::{expanded_things, side_table, ExpandBatch, LookupBatch, Requester};
use crate::config::ExpandConfig;
use crate::error::{MoreError, MoreResult};
use crate::session::Session;
use crate::thing::{Node, Thing};

pub(crate) fn comment_json(id: &str, parent_id: &str, link_id: &str) -> Value {
    json!({
        "kind": "t1",
        "data": {
            "id": id,
            "name": format!("t1_{id}"),
            "parent_id": parent_id,
            "link_id": link_id,
            "author": "tester",
            "body": format!("body of {id}"),
            "score": 1,
            "created_utc": 1_700_000_000.0,
            "replies": "",
            "unknown_field": true
        }
    })
}

pub(crate) fn more_json(id: &str, parent_id: &str, children: &[&str]) -> Value {
    json!({
        "kind": "more",
        "data": {
            "id": id,
            "name": format!("t1_{id}"),
            "parent_id": parent_id,
            "count": children.len(),
            "children": children
        }
    })
}

pub(crate) fn test_session() -> Arc<Session> {
    Session::new(Arc::new(ScriptedRequester::new())).shared()
}

pub(crate) fn nodes_from(session: &Arc<Session>, values: &[Value]) -> Vec<Node> {
    Thing::decode_all(values)
        .unwrap()
        .into_iter()
        .map(|thing| Node::from_thing(thing, session).unwrap())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Lookup(Vec<String>),
    Expand { ids: Vec<String>, link_id: String },
}

/// In-memory [`Requester`]: lookups are served from a comment table,
/// expansions from bodies keyed by the exact id list requested.
pub(crate) struct ScriptedRequester {
    info: HashMap<String, Value>,
    expansions: HashMap<String, Value>,
    failing: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedRequester {
    pub(crate) fn new() -> Self {
        Self {
            info: HashMap::new(),
            expansions: HashMap::new(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_comments(mut self, ids: &[&str]) -> Self {
        for id in ids {
            self.info
                .insert(format!("t1_{id}"), comment_json(id, "t3_x", "t3_x"));
        }
        self
    }

    pub(crate) fn failing_lookup_for(mut self, fullname: &str) -> Self {
        self.failing.insert(fullname.to_string());
        self
    }

    pub(crate) fn with_expansion(mut self, ids: &[&str], things: Vec<Value>) -> Self {
        self.expansions.insert(
            ids.join(","),
            json!({"json": {"errors": [], "data": {"things": things}}}),
        );
        self
    }

    pub(crate) fn with_expansion_error(mut self, ids: &[&str], code: &str, message: &str) -> Self {
        self.expansions.insert(
            ids.join(","),
            json!({"json": {"errors": [[code, message, "children"]]}}),
        );
        self
    }

    pub(crate) fn into_session(self, config: ExpandConfig) -> (Arc<Session>, Arc<ScriptedRequester>) {
        let requester = Arc::new(self);
        let session = Session::new(requester.clone()).with_config(config).shared();
        (session, requester)
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Requester for ScriptedRequester {
    async fn lookup(&self, fullnames: &[String]) -> MoreResult<LookupBatch> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Lookup(fullnames.to_vec()));
        if fullnames.iter().any(|f| self.failing.contains(f)) {
            return Err(MoreError::Status {
                status: 503,
                body: "unavailable".into(),
            });
        }
        let found: Vec<Value> = fullnames
            .iter()
            .filter_map(|f| self.info.get(f).cloned())
            .collect();
        Ok(LookupBatch {
            things: Thing::decode_all(&found)?,
            side: side_table(&found),
        })
    }

    async fn expand_children(&self, ids: &[String], link_id: &str) -> MoreResult<ExpandBatch> {
        self.calls.lock().unwrap().push(Call::Expand {
            ids: ids.to_vec(),
            link_id: link_id.to_string(),
        });
        let key = ids.join(",");
        let raw = self
            .expansions
            .get(&key)
            .cloned()
            .ok_or(MoreError::Status {
                status: 404,
                body: key,
            })?;
        let side = expanded_things(&raw).map(side_table).unwrap_or_default();
        Ok(ExpandBatch { raw, side })
    }
}
