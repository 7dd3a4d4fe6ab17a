//! Breadth-first and depth-first search over a small undirected demo graph.

use std::collections::VecDeque;

use crate::catalog::{Operation, Topic};
use crate::error::VizError;
use crate::params::Params;
use crate::step::{Annotation, Snapshot, StepRecorder, StepSequence, Value};

/// Vertices are labelled `0..VERTEX_COUNT`.
pub const VERTEX_COUNT: usize = 6;

/// Undirected edges of the demo graph.
pub const EDGES: [(usize, usize); 6] = [(0, 1), (0, 2), (1, 3), (2, 4), (3, 5), (4, 5)];

const BFS: &[&str] = &[
    "function bfs(graph, start):",
    "  queue = [start]; visited = {start}",
    "  while queue is not empty:",
    "    v = queue.dequeue()",
    "    visit(v)",
    "    for u in graph.neighbors(v):",
    "      if u in visited: continue",
    "      visited.add(u); queue.enqueue(u)",
];

const DFS: &[&str] = &[
    "function dfs(graph, v, visited):",
    "  visited.add(v)",
    "  visit(v)",
    "  for u in graph.neighbors(v):",
    "    if u in visited: continue",
    "    dfs(graph, u, visited)",
];

/// Sorted adjacency lists, so neighbors are explored lowest label first.
fn adjacency() -> Vec<Vec<usize>> {
    let mut adj = vec![Vec::new(); VERTEX_COUNT];
    for (u, v) in EDGES {
        adj[u].push(v);
        adj[v].push(u);
    }
    for list in &mut adj {
        list.sort_unstable();
    }
    adj
}

fn edges_value() -> Value {
    Value::List(
        EDGES
            .iter()
            .map(|&(u, v)| Value::from(&[u, v][..]))
            .collect(),
    )
}

fn start_vertex(params: &Params, operation: Operation) -> Result<usize, VizError> {
    let start = params.index_or(0);
    if start >= VERTEX_COUNT {
        return Err(VizError::invalid(
            operation,
            format!("start vertex {start} is not in 0..{VERTEX_COUNT}"),
        ));
    }
    Ok(start)
}

pub fn bfs(params: &Params) -> Result<StepSequence, VizError> {
    let start = start_vertex(params, Operation::BreadthFirstSearch)?;
    let adj = adjacency();
    let edges = edges_value();
    let mut rec = StepRecorder::new();

    let mut queue = VecDeque::from([start]);
    let mut visited = vec![start];
    let mut order: Vec<usize> = Vec::new();

    let snap = |current: Option<usize>,
                queue: &VecDeque<usize>,
                visited: &Vec<usize>,
                order: &Vec<usize>| {
        let queued: Vec<usize> = queue.iter().copied().collect();
        Snapshot::new()
            .with("edges", edges.clone())
            .with("current", current)
            .with("queue", &queued)
            .with("visited", visited)
            .with("order", order)
    };

    rec.push(
        2,
        snap(None, &queue, &visited, &order),
        format!("Start: enqueue {start} and mark it visited"),
    );

    let mut round = 0;
    while let Some(v) = queue.pop_front() {
        round += 1;
        order.push(v);
        rec.push_annotated(
            5,
            snap(Some(v), &queue, &visited, &order),
            format!("Dequeue {v} and visit it"),
            Annotation::while_loop("queue is not empty", round),
        );
        for &u in &adj[v] {
            if visited.contains(&u) {
                rec.push(
                    7,
                    snap(Some(v), &queue, &visited, &order),
                    format!("Neighbor {u} already visited; skip"),
                );
            } else {
                visited.push(u);
                queue.push_back(u);
                rec.push(
                    8,
                    snap(Some(v), &queue, &visited, &order),
                    format!("Discover {u} from {v}: mark visited and enqueue"),
                );
            }
        }
    }

    rec.push(
        3,
        snap(None, &queue, &visited, &order),
        format!("Queue empty: BFS order is {}", Value::from(&order)),
    );
    Ok(rec.finish(Topic::Graph, Operation::BreadthFirstSearch, BFS))
}

struct DepthFirst {
    adj: Vec<Vec<usize>>,
    edges: Value,
    rec: StepRecorder,
    visited: Vec<usize>,
    order: Vec<usize>,
    stack: Vec<usize>,
}

impl DepthFirst {
    fn snap(&self, current: Option<usize>) -> Snapshot {
        Snapshot::new()
            .with("edges", self.edges.clone())
            .with("current", current)
            .with("stack", &self.stack)
            .with("visited", &self.visited)
            .with("order", &self.order)
    }

    fn visit(&mut self, v: usize) {
        self.stack.push(v);
        self.visited.push(v);
        self.order.push(v);
        let depth = self.stack.len();
        self.rec.push_annotated(
            3,
            self.snap(Some(v)),
            format!("Visit {v}"),
            Annotation::recursion(format!("dfs({v})"), depth),
        );

        let neighbors = self.adj[v].clone();
        for u in neighbors {
            if self.visited.contains(&u) {
                self.rec.push(
                    5,
                    self.snap(Some(v)),
                    format!("Neighbor {u} already visited; skip"),
                );
            } else {
                self.rec.push(
                    6,
                    self.snap(Some(v)),
                    format!("Recurse into {u} from {v}"),
                );
                self.visit(u);
            }
        }
        self.stack.pop();
    }
}

pub fn dfs(params: &Params) -> Result<StepSequence, VizError> {
    let start = start_vertex(params, Operation::DepthFirstSearch)?;
    let mut walk = DepthFirst {
        adj: adjacency(),
        edges: edges_value(),
        rec: StepRecorder::new(),
        visited: Vec::new(),
        order: Vec::new(),
        stack: Vec::new(),
    };
    walk.rec.push(
        1,
        walk.snap(None),
        format!("Start: depth-first search from {start}"),
    );
    walk.visit(start);
    let summary = format!("Done: DFS order is {}", Value::from(&walk.order));
    let done = walk.snap(None);
    walk.rec.push(1, done, summary);
    Ok(walk.rec.finish(Topic::Graph, Operation::DepthFirstSearch, DFS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn final_order(seq: &StepSequence) -> Vec<i64> {
        seq.last()
            .and_then(|s| s.snapshot.get("order"))
            .and_then(Value::as_ints)
            .unwrap()
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let adj = adjacency();
        for (u, list) in adj.iter().enumerate() {
            for &v in list {
                assert!(adj[v].contains(&u), "{u}-{v} missing reverse edge");
            }
        }
    }

    #[test]
    fn test_bfs_order_from_zero() {
        let seq = bfs(&Params::default()).unwrap();
        assert_eq!(final_order(&seq), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(
            seq.last().unwrap().snapshot.get("queue"),
            Some(&Value::List(vec![]))
        );
    }

    #[test]
    fn test_dfs_order_from_zero() {
        let seq = dfs(&Params::default()).unwrap();
        assert_eq!(final_order(&seq), vec![0, 1, 3, 5, 4, 2]);
        let deepest = seq
            .steps()
            .iter()
            .filter_map(|s| s.annotation.as_ref())
            .map(|a| a.iteration)
            .max();
        assert_eq!(deepest, Some(6));
    }

    #[test]
    fn test_each_vertex_visited_once() {
        for seq in [
            bfs(&Params::new().with_index(3)).unwrap(),
            dfs(&Params::new().with_index(3)).unwrap(),
        ] {
            let mut order = final_order(&seq);
            assert_eq!(order[0], 3);
            order.sort_unstable();
            assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
        }
    }

    #[test]
    fn test_start_out_of_range() {
        let err = bfs(&Params::new().with_index(6)).unwrap_err();
        assert!(matches!(err, VizError::InvalidParams { .. }), "Got: {err}");
        assert!(dfs(&Params::new().with_index(99)).is_err());
    }
}
