use std::collections::{HashMap, HashSet};

use super::{Comment, Node};

/// Rebuilds reply trees from the flat list returned by `/api/morechildren`.
///
/// A comment whose parent is in the batch is appended to that parent's
/// replies; a stub whose parent is in the batch becomes that parent's replies
/// stub and inherits the parent's `link_id`, or `root_id` when the parent has
/// none. Everything else stays at the top level, in response order.
pub fn build_replies_tree(nodes: Vec<Node>, root_id: &str) -> Vec<Node> {
    let present: HashSet<String> = nodes
        .iter()
        .filter_map(Node::as_comment)
        .map(|c| c.name.clone())
        .collect();

    let mut roots = Vec::new();
    let mut children: HashMap<String, Vec<Node>> = HashMap::new();
    for node in nodes {
        if present.contains(node.parent_id()) {
            children
                .entry(node.parent_id().to_string())
                .or_default()
                .push(node);
        } else {
            roots.push(node);
        }
    }

    roots
        .into_iter()
        .map(|node| match node {
            Node::Content(comment) => Node::Content(attach(comment, root_id, &mut children)),
            pending => pending,
        })
        .collect()
}

fn attach(
    mut comment: Comment,
    root_id: &str,
    children: &mut HashMap<String, Vec<Node>>,
) -> Comment {
    let Some(direct) = children.remove(&comment.name) else {
        return comment;
    };
    for child in direct {
        match child {
            Node::Content(reply) => {
                let reply = attach(reply, root_id, children);
                comment.replies.comments.push(reply);
            }
            Node::Pending(mut stub) => {
                let link_id = match comment.link_id.as_str() {
                    "" => root_id,
                    link_id => link_id,
                };
                stub.link_id = Some(link_id.to_string());
                comment.replies.more = Some(stub);
            }
        }
    }
    comment
}
