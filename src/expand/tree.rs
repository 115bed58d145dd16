use futures::future::{try_join_all, BoxFuture, FutureExt};

use crate::api::{check_json_errors, expanded_things};
use crate::error::MoreResult;
use crate::slice::next_id_slice;
use crate::stub::Stub;
use crate::thing::{build_replies_tree, Node, Thing};

use super::{Amount, Expansion};

/// Resolves `stub`'s ids from `start` through the morechildren endpoint.
///
/// Each slice yields comments with one level of replies. When the server
/// answers part of a slice with fresh stubs, those are expanded in full
/// (regardless of `amount`) and spliced in after the slice's comments, before
/// the next slice is requested.
pub fn expand_tree(stub: &Stub, amount: Amount, start: usize) -> BoxFuture<'_, MoreResult<Expansion>> {
    async move {
        let session = stub.session();
        let limit = session.config().morechildren_batch_limit;
        let root_id = stub.root_id().to_string();

        let mut expansion = Expansion::empty();
        let mut amount = amount;
        let mut start = start;
        while !amount.is_exhausted() && start < stub.len() {
            let ids = next_id_slice(stub.child_ids(), start, amount, limit);
            session.trace_batch("expand:tree", stub, start, ids);

            let batch = session.requester().expand_children(ids, &root_id).await?;
            check_json_errors(&batch.raw)?;
            let nodes = Thing::decode_all(expanded_things(&batch.raw)?)?
                .into_iter()
                .map(|thing| Node::from_thing_in(thing, session, Some(&root_id)))
                .collect::<MoreResult<Vec<_>>>()?;
            expansion.side.merge(batch.side);

            let mut echoed = Vec::new();
            for node in build_replies_tree(nodes, &root_id) {
                match node {
                    Node::Content(comment) => expansion.nodes.push(Node::Content(comment)),
                    Node::Pending(mut child) => {
                        child.link_id = Some(root_id.clone());
                        echoed.push(child);
                    }
                }
            }
            expansion.extend(expand_echoed(&echoed, session.config().parallel_branches).await?);

            start += ids.len();
            amount = amount.saturating_sub(ids.len());
        }
        Ok(expansion)
    }
    .boxed()
}

/// Fully expands stubs the server returned in place of requested comments.
///
/// Branches are independent; each returns its own side table, merged here in
/// branch order so the result does not depend on completion order.
async fn expand_echoed(stubs: &[Stub], parallel: bool) -> MoreResult<Expansion> {
    let mut merged = Expansion::empty();
    if parallel {
        let branches =
            try_join_all(stubs.iter().map(|s| expand_tree(s, Amount::Unbounded, 0))).await?;
        for branch in branches {
            merged.extend(branch);
        }
    } else {
        for stub in stubs {
            merged.extend(expand_tree(stub, Amount::Unbounded, 0).await?);
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpandConfig;
    use crate::error::MoreError;
    use crate::testing::{comment_json, more_json, Call, ScriptedRequester};

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn names(expansion: &Expansion) -> Vec<String> {
        expansion.comments().map(|c| c.name.clone()).collect()
    }

    #[tokio::test]
    async fn batches_by_morechildren_limit() {
        let requester = ScriptedRequester::new()
            .with_expansion(&["a", "b"], vec![
                comment_json("a", "t3_x", "t3_x"),
                comment_json("b", "t3_x", "t3_x"),
            ])
            .with_expansion(&["c"], vec![comment_json("c", "t3_x", "t3_x")]);
        let (session, requester) =
            requester.into_session(ExpandConfig::new().with_morechildren_batch_limit(2));
        let stub = session.stub("t3_x", "t3_x", ids(&["a", "b", "c"]));

        let expansion = expand_tree(&stub, Amount::Unbounded, 0).await.unwrap();

        assert_eq!(names(&expansion), vec!["t1_a", "t1_b", "t1_c"]);
        assert_eq!(
            requester.calls(),
            vec![
                Call::Expand { ids: ids(&["a", "b"]), link_id: "t3_x".into() },
                Call::Expand { ids: ids(&["c"]), link_id: "t3_x".into() },
            ]
        );
    }

    #[tokio::test]
    async fn echoed_stub_is_expanded_in_place() {
        let requester = ScriptedRequester::new()
            .with_expansion(&["a", "b"], vec![
                comment_json("a", "t3_x", "t3_x"),
                more_json("b", "t3_x", &["b1", "b2"]),
            ])
            .with_expansion(&["b1", "b2"], vec![
                comment_json("b1", "t3_x", "t3_x"),
                comment_json("b2", "t3_x", "t3_x"),
            ])
            .with_expansion(&["c"], vec![comment_json("c", "t3_x", "t3_x")]);
        let (session, requester) =
            requester.into_session(ExpandConfig::new().with_morechildren_batch_limit(2));
        let stub = session.stub("t3_x", "t3_x", ids(&["a", "b", "c"]));

        let expansion = expand_tree(&stub, Amount::Unbounded, 0).await.unwrap();

        assert_eq!(names(&expansion), vec!["t1_a", "t1_b1", "t1_b2", "t1_c"]);
        assert!(!expansion.has_pending());
        assert_eq!(requester.calls().len(), 3);
        assert!(expansion.side.contains("t1_b1"));
        assert!(expansion.side.contains("t1_b"));
    }

    #[tokio::test]
    async fn echoed_stub_inherits_root_of_parent_without_link() {
        let requester = ScriptedRequester::new()
            .with_expansion(&["a"], vec![more_json("m", "t1_p", &["a1"])])
            .with_expansion(&["a1"], vec![comment_json("a1", "t1_p", "t3_x")]);
        let (session, requester) = requester.into_session(ExpandConfig::default());
        let stub = Stub::new(session, "t3_x", ids(&["a"]));

        let expansion = expand_tree(&stub, Amount::Unbounded, 0).await.unwrap();

        assert_eq!(names(&expansion), vec!["t1_a1"]);
        let calls = requester.calls();
        assert_eq!(calls[1], Call::Expand { ids: ids(&["a1"]), link_id: "t3_x".into() });
    }

    #[tokio::test]
    async fn echoed_stub_ignores_caller_amount() {
        let requester = ScriptedRequester::new()
            .with_expansion(&["a"], vec![more_json("m", "t3_x", &["a1", "a2", "a3"])])
            .with_expansion(&["a1", "a2", "a3"], vec![
                comment_json("a1", "t3_x", "t3_x"),
                comment_json("a2", "t3_x", "t3_x"),
                comment_json("a3", "t3_x", "t3_x"),
            ]);
        let (session, requester) = requester.into_session(ExpandConfig::default());
        let stub = session.stub("t3_x", "t3_x", ids(&["a", "b"]));

        let expansion = expand_tree(&stub, Amount::Limited(1), 0).await.unwrap();

        assert_eq!(names(&expansion), vec!["t1_a1", "t1_a2", "t1_a3"]);
        assert_eq!(requester.calls().len(), 2);
    }

    #[tokio::test]
    async fn replies_attach_and_nested_stub_stays_on_parent() {
        let requester = ScriptedRequester::new().with_expansion(&["a"], vec![
            comment_json("a", "t3_x", "t3_x"),
            comment_json("a1", "t1_a", "t3_x"),
            more_json("m", "t1_a", &["a2", "a3"]),
        ]);
        let (session, requester) = requester.into_session(ExpandConfig::default());
        let stub = session.stub("t3_x", "t3_x", ids(&["a"]));

        let expansion = expand_tree(&stub, Amount::Unbounded, 0).await.unwrap();

        assert_eq!(names(&expansion), vec!["t1_a"]);
        let a = expansion.comments().next().unwrap();
        assert_eq!(a.replies.comments[0].name, "t1_a1");
        let more = a.replies.more.as_ref().unwrap();
        assert_eq!(more.child_ids(), &ids(&["a2", "a3"])[..]);
        assert_eq!(more.link_id.as_deref(), Some("t3_x"));
        assert_eq!(requester.calls().len(), 1);
    }

    #[tokio::test]
    async fn nested_stub_under_comment_without_link_targets_root() {
        let mut a = comment_json("a", "t3_x", "t3_x");
        a["data"].as_object_mut().unwrap().remove("link_id");
        let requester = ScriptedRequester::new()
            .with_expansion(&["a"], vec![a, more_json("m", "t1_a", &["a1"])])
            .with_expansion(&["a1"], vec![comment_json("a1", "t1_a", "t3_x")]);
        let (session, requester) = requester.into_session(ExpandConfig::default());
        let stub = session.stub("t3_x", "t3_x", ids(&["a"]));

        let expansion = expand_tree(&stub, Amount::Unbounded, 0).await.unwrap();
        let a = expansion.comments().next().unwrap();
        assert_eq!(a.link_id, "t3_x");
        let more = a.replies.more.as_ref().unwrap();
        assert_eq!(more.root_id(), "t3_x");

        let replies = a.replies.fetch_all().await.unwrap();
        assert_eq!(replies.comments[0].name, "t1_a1");
        assert_eq!(
            requester.calls()[1],
            Call::Expand { ids: ids(&["a1"]), link_id: "t3_x".into() }
        );
    }

    #[tokio::test]
    async fn parallel_branches_keep_order() {
        let requester = ScriptedRequester::new()
            .with_expansion(&["a", "b"], vec![
                more_json("ma", "t3_x", &["a1"]),
                more_json("mb", "t3_x", &["b1"]),
            ])
            .with_expansion(&["a1"], vec![comment_json("a1", "t3_x", "t3_x")])
            .with_expansion(&["b1"], vec![comment_json("b1", "t3_x", "t3_x")]);
        let (session, requester) =
            requester.into_session(ExpandConfig::new().with_parallel_branches(true));
        let stub = session.stub("t3_x", "t3_x", ids(&["a", "b"]));

        let expansion = expand_tree(&stub, Amount::Unbounded, 0).await.unwrap();

        assert_eq!(names(&expansion), vec!["t1_a1", "t1_b1"]);
        assert_eq!(requester.calls().len(), 3);
        assert!(expansion.side.contains("t1_a1"));
        assert!(expansion.side.contains("t1_b1"));
    }

    #[tokio::test]
    async fn api_error_payload_fails() {
        let requester =
            ScriptedRequester::new().with_expansion_error(&["a"], "INVALID_ID", "bad id");
        let (session, _requester) = requester.into_session(ExpandConfig::default());
        let stub = session.stub("t3_x", "t3_x", ids(&["a"]));

        let err = expand_tree(&stub, Amount::Unbounded, 0).await.unwrap_err();
        assert!(matches!(err, MoreError::Api { ref code, .. } if code == "INVALID_ID"));
    }

    #[tokio::test]
    async fn nested_failure_fails_everything() {
        let requester = ScriptedRequester::new()
            .with_expansion(&["a"], vec![
                comment_json("a", "t3_x", "t3_x"),
                more_json("m", "t3_x", &["gone"]),
            ]);
        let (session, _requester) = requester.into_session(ExpandConfig::default());
        let stub = session.stub("t3_x", "t3_x", ids(&["a"]));

        let err = expand_tree(&stub, Amount::Unbounded, 0).await.unwrap_err();
        assert!(matches!(err, MoreError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn exhausted_inputs_issue_no_requests() {
        let (session, requester) = ScriptedRequester::new().into_session(ExpandConfig::default());
        let stub = session.stub("t3_x", "t3_x", ids(&["a"]));

        assert!(expand_tree(&stub, Amount::Limited(0), 0).await.unwrap().is_empty());
        assert!(expand_tree(&stub, Amount::Unbounded, 1).await.unwrap().is_empty());
        assert!(requester.calls().is_empty());
    }
}
