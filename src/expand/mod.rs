//! Stub expansion.
//!
//! Two strategies resolve a [`Stub`]'s child ids:
//!
//! | Strategy | Endpoint | Ids/request | Replies |
//! |----------|----------|-------------|---------|
//! | [`expand_flat`] | `/api/info` | 100 | no |
//! | [`expand_tree`] | `/api/morechildren` | 20 | one level, echoed stubs re-expanded |
//!
//! Both walk `child_ids` in order, one request per slice, and return an
//! [`Expansion`] carrying the comments plus every side-loaded entity gathered
//! on the way, nested branches included.

mod flat;
mod tree;

pub use flat::expand_flat;
pub use tree::expand_tree;

use crate::accumulator::Accumulator;
use crate::error::MoreResult;
use crate::stub::Stub;
use crate::thing::{Comment, Node};

/// How many child ids a caller wants resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Amount {
    #[default]
    Unbounded,
    Limited(usize),
}

impl Amount {
    pub fn is_exhausted(self) -> bool {
        matches!(self, Amount::Limited(0))
    }

    pub fn saturating_sub(self, n: usize) -> Amount {
        match self {
            Amount::Unbounded => Amount::Unbounded,
            Amount::Limited(left) => Amount::Limited(left.saturating_sub(n)),
        }
    }

    /// `min(self, limit)`.
    pub fn cap(self, limit: usize) -> usize {
        match self {
            Amount::Unbounded => limit,
            Amount::Limited(left) => left.min(limit),
        }
    }
}

impl From<usize> for Amount {
    fn from(n: usize) -> Self {
        Amount::Limited(n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpandOptions {
    pub amount: Amount,
    pub skip_replies: bool,
}

impl ExpandOptions {
    /// Everything, with replies.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_amount(mut self, amount: impl Into<Amount>) -> Self {
        self.amount = amount.into();
        self
    }

    pub fn with_skip_replies(mut self, skip: bool) -> Self {
        self.skip_replies = skip;
        self
    }
}

/// Ordered output of an expansion plus the side table gathered producing it.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub nodes: Vec<Node>,
    pub side: Accumulator,
}

impl Expansion {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends `other`'s nodes after this one's and merges its side table.
    pub fn extend(&mut self, other: Expansion) {
        self.nodes.extend(other.nodes);
        self.side.merge(other.side);
    }

    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.nodes.iter().filter_map(Node::as_comment)
    }

    pub fn into_comments(self) -> Vec<Comment> {
        self.nodes
            .into_iter()
            .filter_map(|node| match node {
                Node::Content(comment) => Some(comment),
                Node::Pending(_) => None,
            })
            .collect()
    }

    pub fn has_pending(&self) -> bool {
        self.nodes.iter().any(Node::is_pending)
    }
}

/// Entry point: flat expansion when `skip_replies` is set, tree expansion otherwise.
///
/// Completion is logged at info, failure at error, both under source "expand".
pub async fn expand(stub: &Stub, options: &ExpandOptions) -> MoreResult<Expansion> {
    let result = if options.skip_replies {
        expand_flat(stub, options.amount, 0).await
    } else {
        expand_tree(stub, options.amount, 0).await
    };

    let logger = stub.session().logger();
    match &result {
        Ok(expansion) => logger.info(
            "expand",
            &format!(
                "{}: {} comments, {} side entities",
                stub.name,
                expansion.comments().count(),
                expansion.side.len()
            ),
        ),
        Err(err) => logger.error("expand", &format!("{}: {err}", stub.name)),
    }
    result
}
