// src/core/cycles.rs

//! Removal of dependency rules that would close a cycle.

use crate::models::Edge;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Adjacency of accepted edges: dependent -> dependencies.
type Graph<'a> = HashMap<&'a str, HashSet<&'a str>>;

/// Returns true if `target` can be reached from `start` following accepted edges.
///
/// `seen` belongs to a single query; callers pass a fresh set each time.
fn has_path(graph: &Graph<'_>, start: &str, target: &str, seen: &mut HashSet<String>) -> bool {
    let mut to_visit = vec![start];

    while let Some(current) = to_visit.pop() {
        if current == target {
            return true;
        }
        if !seen.insert(current.to_string()) {
            continue;
        }
        if let Some(next) = graph.get(current) {
            to_visit.extend(next.iter().copied());
        }
    }
    false
}

/// Drops every rule that would close a cycle among the rules accepted so far.
///
/// Rules are processed in sorted order, so the outcome only depends on the set.
/// Lines without a colon are not dependencies and are always kept. For a rule
/// `A: B` the check is whether `A` is already reachable from `B`; if it is, the
/// rule is dropped with a warning.
pub fn remove_cycles(rules: &BTreeSet<String>) -> Vec<String> {
    let mut graph: Graph<'_> = HashMap::new();
    let mut accepted = Vec::with_capacity(rules.len());

    for rule in rules {
        let Some((dependent, dependency)) = rule.split_once(':') else {
            accepted.push(rule.clone());
            continue;
        };
        let (dependent, dependency) = (dependent.trim(), dependency.trim());

        if has_path(&graph, dependency, dependent, &mut HashSet::new()) {
            log::warn!("Circular dependency detected, dropping rule '{}'", rule);
            continue;
        }

        graph.entry(dependent).or_default().insert(dependency);
        accepted.push(rule.clone());
    }

    accepted
}

/// Returns true if the edges contain a cycle. Lines without a colon are ignored.
pub fn has_cycle<'a>(rules: impl IntoIterator<Item = &'a String>) -> bool {
    let edges: Vec<Edge> = rules.into_iter().filter_map(|r| Edge::parse(r)).collect();
    let mut graph: Graph<'_> = HashMap::new();
    for edge in &edges {
        graph
            .entry(edge.dependent.as_str())
            .or_default()
            .insert(edge.dependency.as_str());
    }

    edges.iter().any(|edge| {
        has_path(
            &graph,
            edge.dependency.as_str(),
            edge.dependent.as_str(),
            &mut HashSet::new(),
        )
    })
}
