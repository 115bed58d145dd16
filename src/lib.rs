//! # more-core
//!
//! Lazy expansion of Reddit-style `more` stubs into hydrated comment trees.
//!
//! A comment listing fetched from the API often ends in a `more` placeholder
//! listing child ids the server has not sent yet. This crate turns such a
//! [`Stub`] plus a budget into real comments using the fewest batch requests:
//!
//! - without replies, through `/api/info` (100 ids per request);
//! - with replies, through `/api/morechildren` (20 ids per request),
//!   re-expanding any stubs the server hands back instead of content.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use more_core::api::RedditClient;
//! use more_core::config::ClientConfig;
//! use more_core::expand::ExpandOptions;
//! use more_core::session::Session;
//!
//! # async fn run() -> more_core::MoreResult<()> {
//! let client = RedditClient::new(
//!     ClientConfig::new("my-app/0.1").with_access_token("token"),
//! );
//! let session = Session::new(Arc::new(client)).shared();
//!
//! let stub = session.stub("t3_abc", "t3_abc", vec!["c1".into(), "c2".into()]);
//! let expansion = stub.expand(&ExpandOptions::all().with_amount(50)).await?;
//! for comment in expansion.comments() {
//!     println!("{}: {}", comment.name, comment.body);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`stub`] | The `more` placeholder and its entry point [`Stub::expand`] |
//! | [`expand`] | Flat and tree expanders, budgets, [`expand::Expansion`] results |
//! | [`slice`] | Batch slicing of child ids |
//! | [`accumulator`] | Side table of entities gathered across a whole expansion |
//! | [`thing`] | Decoding `t1`/`more` things and rebuilding reply trees |
//! | [`listing`] | Comment listings paged through their trailing stub |
//! | [`api`] | The [`api::Requester`] seam and the reqwest-backed [`api::RedditClient`] |
//! | [`session`] | Requester, config and logger shared by every stub |
//! | [`config`] | Batch limits, scheduling and client settings |
//! | [`morelog`] | Structured log entries and sinks |
//! | [`error`] | [`MoreError`] and [`MoreResult`] |

pub mod accumulator;
pub mod api;
pub mod config;
pub mod error;
pub mod expand;
pub mod listing;
pub mod morelog;
pub mod session;
pub mod slice;
pub mod stub;
pub mod thing;

#[cfg(test)]
pub(crate) mod testing;

pub use accumulator::{Accumulator, Entity};
pub use error::{MoreError, MoreResult};
pub use expand::{Amount, ExpandOptions, Expansion};
pub use listing::CommentListing;
pub use session::Session;
pub use stub::Stub;
pub use thing::{Comment, Node};
