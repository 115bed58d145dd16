//! Comment listings that page through their trailing stub.

use std::sync::Arc;

use crate::accumulator::Accumulator;
use crate::error::MoreResult;
use crate::expand::{Amount, ExpandOptions};
use crate::session::Session;
use crate::stub::Stub;
use crate::thing::{Comment, Node, Thing};

/// Comments fetched so far plus the stub standing in for the rest.
///
/// Callers never see stubs as list items: [`CommentListing::fetch_more`]
/// resolves the stub and returns a longer listing whose own stub covers only
/// the ids still unfetched.
#[derive(Debug, Clone, Default)]
pub struct CommentListing {
    pub comments: Vec<Comment>,
    pub more: Option<Stub>,
    /// Entities side-loaded by every fetch that built this listing.
    pub side: Accumulator,
}

impl CommentListing {
    /// A finished listing with nothing in it.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let mut listing = CommentListing::empty();
        for node in nodes {
            match node {
                Node::Content(comment) => listing.comments.push(comment),
                // Reddit sends at most one `more` per level.
                Node::Pending(stub) => {
                    if listing.more.is_none() {
                        listing.more = Some(stub);
                    }
                }
            }
        }
        listing
    }

    /// Decodes a `replies` field: either `""` or a `Listing` of things.
    pub fn from_replies(value: &serde_json::Value, session: &Arc<Session>) -> MoreResult<Self> {
        CommentListing::from_replies_in(value, session, None)
    }

    /// Decodes replies belonging to thread `thread`, so the trailing stub is
    /// addressed to the thread root rather than its parent comment.
    pub fn from_replies_in(
        value: &serde_json::Value,
        session: &Arc<Session>,
        thread: Option<&str>,
    ) -> MoreResult<Self> {
        let Some(children) = value.pointer("/data/children").and_then(|c| c.as_array()) else {
            return Ok(CommentListing::empty());
        };
        let nodes = Thing::decode_all(children)?
            .into_iter()
            .map(|thing| Node::from_thing_in(thing, session, thread))
            .collect::<MoreResult<Vec<_>>>()?;
        Ok(CommentListing::from_nodes(nodes))
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// True once no unfetched ids remain.
    pub fn is_finished(&self) -> bool {
        self.more.as_ref().map_or(true, Stub::is_empty)
    }

    /// Returns a new listing with up to `options.amount` more comments appended.
    ///
    /// `self` is left untouched. The new listing's stub is a copy of this one
    /// minus the ids just consumed.
    pub async fn fetch_more(&self, options: &ExpandOptions) -> MoreResult<CommentListing> {
        let Some(more) = &self.more else {
            return Ok(self.clone());
        };

        let mut expansion = more.expand(options).await?;
        let mut next = self.clone();
        next.side.merge(std::mem::take(&mut expansion.side));
        next.comments.extend(expansion.into_comments());
        next.more = match options.amount {
            Amount::Unbounded => None,
            Amount::Limited(consumed) => more.remainder(consumed),
        };
        Ok(next)
    }

    /// Fetches everything left, replies included.
    pub async fn fetch_all(&self) -> MoreResult<CommentListing> {
        self.fetch_more(&ExpandOptions::all()).await
    }
}
