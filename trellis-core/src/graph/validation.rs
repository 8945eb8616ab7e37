//! Graph Validation
//!
//! Four independent structural checks over a node list and a link list.
//! All of them always run and their errors are concatenated in check order:
//!
//! 1. Orphan decisions: every decision node must have an outgoing link.
//! 2. Cycles: no directed cycle, tagged or not.
//! 3. Undeclared nodes: every link endpoint must be in the node list.
//! 4. Duplicates: no node may be declared twice.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::link::Link;
use super::node::{NodeId, NodeRef};
use crate::error::{ValidationError, ValidationErrors};

/// Run every check and collect all errors.
pub fn validate(nodes: &[NodeRef], links: &[Link]) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    check_orphans(nodes, links, &mut errors);
    check_cycles(links, &mut errors);
    check_undeclared(nodes, links, &mut errors);
    check_duplicates(nodes, &mut errors);

    errors
}

fn check_orphans(nodes: &[NodeRef], links: &[Link], errors: &mut ValidationErrors) {
    let sources: HashSet<NodeId> = links.iter().map(|link| link.from().id()).collect();

    for node in nodes {
        if node.decide_capability() && !sources.contains(&node.id()) {
            errors.push(ValidationError::OrphanDecision { node: node.clone() });
        }
    }
}

/// Report every cycle, each once.
///
/// For each link whose source has not been explained by an earlier cycle,
/// search depth-first (outgoing links in declaration order) for a path from
/// its target back to its source. A node is entered at most once per search,
/// so every search terminates.
fn check_cycles(links: &[Link], errors: &mut ValidationErrors) {
    let mut outgoing: IndexMap<NodeId, Vec<usize>> = IndexMap::new();
    for (index, link) in links.iter().enumerate() {
        outgoing.entry(link.from().id()).or_default().push(index);
    }

    let mut explained: HashSet<NodeId> = HashSet::new();

    for (start, link) in links.iter().enumerate() {
        if explained.contains(&link.from().id()) {
            continue;
        }

        let mut path = vec![start];
        let mut visited = HashSet::new();
        if find_path_back(
            link.to().id(),
            link.from().id(),
            links,
            &outgoing,
            &mut visited,
            &mut path,
        ) {
            let cycle: Vec<Link> = path.iter().map(|&i| links[i].clone()).collect();
            explained.extend(cycle.iter().map(|link| link.from().id()));
            errors.push(ValidationError::Cycle { links: cycle });
        }
    }
}

fn find_path_back(
    current: NodeId,
    target: NodeId,
    links: &[Link],
    outgoing: &IndexMap<NodeId, Vec<usize>>,
    visited: &mut HashSet<NodeId>,
    path: &mut Vec<usize>,
) -> bool {
    if current == target {
        return true;
    }
    if !visited.insert(current) {
        return false;
    }

    let Some(next) = outgoing.get(&current) else {
        return false;
    };
    for &index in next {
        path.push(index);
        if find_path_back(links[index].to().id(), target, links, outgoing, visited, path) {
            return true;
        }
        path.pop();
    }

    false
}

fn check_undeclared(nodes: &[NodeRef], links: &[Link], errors: &mut ValidationErrors) {
    let declared: HashSet<NodeId> = nodes.iter().map(NodeRef::id).collect();

    for link in links {
        for endpoint in [link.from(), link.to()] {
            if !declared.contains(&endpoint.id()) {
                errors.push(ValidationError::UndeclaredNode {
                    node: endpoint.clone(),
                    link: link.clone(),
                });
            }
        }
    }
}

fn check_duplicates(nodes: &[NodeRef], errors: &mut ValidationErrors) {
    let mut counts: IndexMap<NodeId, (usize, &NodeRef)> = IndexMap::new();
    for node in nodes {
        counts.entry(node.id()).or_insert((0, node)).0 += 1;
    }

    for (count, node) in counts.values() {
        if *count > 1 {
            errors.push(ValidationError::DuplicateNode {
                node: (*node).clone(),
            });
        }
    }
}
