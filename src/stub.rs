use std::sync::Arc;

use crate::error::MoreResult;
use crate::expand::{self, ExpandOptions, Expansion};
use crate::session::Session;
use crate::thing::MoreData;

/// Placeholder for children the server has not sent yet (a `more` thing).
///
/// `child_ids` is fixed at creation; narrowing a stub produces a new one via
/// [`Stub::remainder`]. `Clone` yields an independent placeholder that shares
/// the same session.
#[derive(Clone)]
pub struct Stub {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    /// Thread root fullname. Filled in from an ancestor when the server omits it.
    pub link_id: Option<String>,
    pub count: u64,
    child_ids: Vec<String>,
    session: Arc<Session>,
}

impl Stub {
    pub fn new(session: Arc<Session>, parent_id: impl Into<String>, child_ids: Vec<String>) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            parent_id: parent_id.into(),
            link_id: None,
            count: child_ids.len() as u64,
            child_ids,
            session,
        }
    }

    pub fn from_data(data: MoreData, session: Arc<Session>) -> Self {
        Self {
            id: data.id,
            name: data.name,
            parent_id: data.parent_id,
            link_id: None,
            count: data.count,
            child_ids: data.children,
            session,
        }
    }

    pub fn with_link_id(mut self, link_id: impl Into<String>) -> Self {
        self.link_id = Some(link_id.into());
        self
    }

    pub fn child_ids(&self) -> &[String] {
        &self.child_ids
    }

    pub fn len(&self) -> usize {
        self.child_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.child_ids.is_empty()
    }

    /// Address used for `/api/morechildren`: `link_id`, else `parent_id`.
    pub fn root_id(&self) -> &str {
        self.link_id.as_deref().unwrap_or(&self.parent_id)
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn shares_session(&self, other: &Stub) -> bool {
        Arc::ptr_eq(&self.session, &other.session)
    }

    /// A copy without the first `consumed` ids, or `None` if nothing is left.
    pub fn remainder(&self, consumed: usize) -> Option<Stub> {
        if consumed >= self.child_ids.len() {
            return None;
        }
        let mut rest = self.clone();
        rest.child_ids = self.child_ids[consumed..].to_vec();
        rest.count = rest.child_ids.len() as u64;
        Some(rest)
    }

    /// Resolves this stub within the options' budget.
    ///
    /// `skip_replies` uses the high-capacity lookup endpoint and returns
    /// comments without replies; otherwise comments come back with replies
    /// attached and any stubs the server echoes are expanded in place.
    pub async fn expand(&self, options: &ExpandOptions) -> MoreResult<Expansion> {
        expand::expand(self, options).await
    }
}

impl std::fmt::Debug for Stub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stub")
            .field("name", &self.name)
            .field("parent_id", &self.parent_id)
            .field("link_id", &self.link_id)
            .field("count", &self.count)
            .field("child_ids", &self.child_ids)
            .finish_non_exhaustive()
    }
}
