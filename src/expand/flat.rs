use crate::error::MoreResult;
use crate::slice::next_id_slice;
use crate::stub::Stub;
use crate::thing::{comment_fullname, Comment, Node, Thing};

use super::{Amount, Expansion};

/// Resolves `stub`'s ids from `start` through the lookup endpoint.
///
/// Comments come back without replies. Requests are issued one slice at a
/// time, in `child_ids` order, until `amount` or the ids run out.
pub async fn expand_flat(stub: &Stub, amount: Amount, start: usize) -> MoreResult<Expansion> {
    let session = stub.session();
    let limit = session.config().info_batch_limit;

    let mut expansion = Expansion::empty();
    let mut amount = amount;
    let mut start = start;
    while !amount.is_exhausted() && start < stub.len() {
        let ids = next_id_slice(stub.child_ids(), start, amount, limit);
        session.trace_batch("expand:flat", stub, start, ids);

        let fullnames: Vec<String> = ids.iter().map(|id| comment_fullname(id)).collect();
        let batch = session.requester().lookup(&fullnames).await?;
        expansion.side.merge(batch.side);
        for thing in batch.things {
            // The lookup endpoint has no notion of `more`; anything else is dropped.
            if let Thing::Comment(data) = thing {
                expansion
                    .nodes
                    .push(Node::Content(Comment::from_data(data, session)?));
            }
        }

        start += ids.len();
        amount = amount.saturating_sub(ids.len());
    }
    Ok(expansion)
}
