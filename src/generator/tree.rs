//! Binary search tree operations over a fixed demo tree.
//!
//! The tree is shown in level-order (heap) layout: the node at slot `p` has
//! children at `2p + 1` and `2p + 2`, with `null` marking empty slots.

use crate::catalog::{Operation, Topic};
use crate::error::VizError;
use crate::params::Params;
use crate::step::{Annotation, Snapshot, StepRecorder, StepSequence, Value};

use super::DEMO_TREE_KEYS;

const INSERT: &[&str] = &[
    "function insert(node, value):",
    "  if node == null: return new Node(value)",
    "  if value < node.value:",
    "    node.left = insert(node.left, value)",
    "  else if value > node.value:",
    "    node.right = insert(node.right, value)",
    "  return node",
];

const SEARCH: &[&str] = &[
    "function search(node, target):",
    "  if node == null: return false",
    "  if target == node.value: return true",
    "  if target < node.value:",
    "    return search(node.left, target)",
    "  return search(node.right, target)",
];

const INORDER: &[&str] = &[
    "function inorder(node):",
    "  if node == null: return",
    "  inorder(node.left)",
    "  visit(node.value)",
    "  inorder(node.right)",
];

const PREORDER: &[&str] = &[
    "function preorder(node):",
    "  if node == null: return",
    "  visit(node.value)",
    "  preorder(node.left)",
    "  preorder(node.right)",
];

const POSTORDER: &[&str] = &[
    "function postorder(node):",
    "  if node == null: return",
    "  postorder(node.left)",
    "  postorder(node.right)",
    "  visit(node.value)",
];

#[derive(Debug, Clone)]
struct Node {
    value: i64,
    left: Option<usize>,
    right: Option<usize>,
}

/// Arena-backed binary search tree.
#[derive(Debug, Clone, Default)]
struct Bst {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl Bst {
    fn from_keys(keys: &[i64]) -> Self {
        let mut bst = Bst::default();
        for &key in keys {
            bst.insert(key);
        }
        bst
    }

    fn push_node(&mut self, value: i64) -> usize {
        self.nodes.push(Node {
            value,
            left: None,
            right: None,
        });
        self.nodes.len() - 1
    }

    /// Insert without recording; returns false for duplicates.
    fn insert(&mut self, value: i64) -> bool {
        let Some(mut at) = self.root else {
            self.root = Some(self.push_node(value));
            return true;
        };
        loop {
            let node = &self.nodes[at];
            let next = if value < node.value {
                node.left
            } else if value > node.value {
                node.right
            } else {
                return false;
            };
            match next {
                Some(child) => at = child,
                None => {
                    let new = self.push_node(value);
                    if value < self.nodes[at].value {
                        self.nodes[at].left = Some(new);
                    } else {
                        self.nodes[at].right = Some(new);
                    }
                    return true;
                }
            }
        }
    }

    fn layout(&self) -> Value {
        fn place(bst: &Bst, idx: usize, pos: usize, slots: &mut Vec<Option<i64>>) {
            if slots.len() <= pos {
                slots.resize(pos + 1, None);
            }
            let node = &bst.nodes[idx];
            slots[pos] = Some(node.value);
            if let Some(left) = node.left {
                place(bst, left, 2 * pos + 1, slots);
            }
            if let Some(right) = node.right {
                place(bst, right, 2 * pos + 2, slots);
            }
        }

        let mut slots = Vec::new();
        if let Some(root) = self.root {
            place(self, root, 0, &mut slots);
        }
        Value::List(slots.into_iter().map(Value::from).collect())
    }
}

fn tree_snap(bst: &Bst, current: Option<i64>) -> Snapshot {
    Snapshot::new()
        .with("tree", bst.layout())
        .with("current", current)
}

pub fn insert(params: &Params) -> Result<StepSequence, VizError> {
    let mut bst = Bst::from_keys(&DEMO_TREE_KEYS);
    let value = params.value_or(65);
    let mut rec = StepRecorder::new();
    rec.push(
        1,
        tree_snap(&bst, None).with("value", value),
        format!("Start: insert {value} into the tree"),
    );

    let mut at = bst.root;
    let mut parent: Option<i64> = None;
    let mut depth = 1;
    while let Some(idx) = at {
        let node = bst.nodes[idx].clone();
        let call = Annotation::recursion(format!("insert({}, {value})", node.value), depth);
        let snap = tree_snap(&bst, Some(node.value)).with("value", value);
        if value < node.value {
            rec.push_annotated(3, snap, format!("{value} < {}: go left", node.value), call);
            at = node.left;
        } else if value > node.value {
            rec.push_annotated(5, snap, format!("{value} > {}: go right", node.value), call);
            at = node.right;
        } else {
            rec.push_annotated(
                7,
                snap,
                format!("{value} is already in the tree; nothing changes"),
                call,
            );
            return Ok(rec.finish(Topic::Tree, Operation::Insert, INSERT));
        }
        parent = Some(node.value);
        depth += 1;
    }

    bst.insert(value);
    let spot = match parent {
        Some(p) => format!("an empty child of {p}"),
        None => "the empty root".to_string(),
    };
    rec.push_annotated(
        2,
        tree_snap(&bst, Some(value)).with("value", value),
        format!("Reached {spot}: create node {value}"),
        Annotation::recursion(format!("insert(null, {value})"), depth),
    );
    rec.push(
        7,
        tree_snap(&bst, None).with("value", value),
        format!("Done: {value} inserted"),
    );
    Ok(rec.finish(Topic::Tree, Operation::Insert, INSERT))
}

pub fn search(params: &Params) -> Result<StepSequence, VizError> {
    let bst = Bst::from_keys(&DEMO_TREE_KEYS);
    let target = params.target_or(60);
    let mut rec = StepRecorder::new();
    let base = |current: Option<i64>| tree_snap(&bst, current).with("target", target);
    rec.push(
        1,
        base(None).with("found", Value::Null),
        format!("Start: search the tree for {target}"),
    );

    let mut at = bst.root;
    let mut depth = 1;
    while let Some(idx) = at {
        let node = &bst.nodes[idx];
        let call = Annotation::recursion(format!("search({}, {target})", node.value), depth);
        if target == node.value {
            rec.push_annotated(
                3,
                base(Some(node.value)).with("found", true),
                format!("{target} == {}: found", node.value),
                call,
            );
            return Ok(rec.finish(Topic::Tree, Operation::Search, SEARCH));
        }
        if target < node.value {
            rec.push_annotated(
                5,
                base(Some(node.value)).with("found", Value::Null),
                format!("{target} < {}: search the left subtree", node.value),
                call,
            );
            at = node.left;
        } else {
            rec.push_annotated(
                6,
                base(Some(node.value)).with("found", Value::Null),
                format!("{target} > {}: search the right subtree", node.value),
                call,
            );
            at = node.right;
        }
        depth += 1;
    }

    rec.push_annotated(
        2,
        base(None).with("found", false),
        format!("Reached an empty subtree: {target} is not in the tree"),
        Annotation::recursion(format!("search(null, {target})"), depth),
    );
    Ok(rec.finish(Topic::Tree, Operation::Search, SEARCH))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    In,
    Pre,
    Post,
}

impl Order {
    fn name(self) -> &'static str {
        match self {
            Order::In => "inorder",
            Order::Pre => "preorder",
            Order::Post => "postorder",
        }
    }

    fn visit_line(self) -> u32 {
        match self {
            Order::In => 4,
            Order::Pre => 3,
            Order::Post => 5,
        }
    }
}

struct Walker<'a> {
    bst: &'a Bst,
    order: Order,
    rec: StepRecorder,
    output: Vec<i64>,
}

impl Walker<'_> {
    fn snap(&self, current: Option<i64>) -> Snapshot {
        tree_snap(self.bst, current).with("output", &self.output)
    }

    fn walk(&mut self, idx: usize, depth: usize) {
        let node = &self.bst.nodes[idx];
        let (value, left, right) = (node.value, node.left, node.right);
        let call = format!("{}({value})", self.order.name());
        self.rec.push_annotated(
            1,
            self.snap(Some(value)),
            format!("Call {call}"),
            Annotation::recursion(call.clone(), depth),
        );

        if self.order == Order::Pre {
            self.visit(value, &call, depth);
        }
        if let Some(left) = left {
            self.walk(left, depth + 1);
        }
        if self.order == Order::In {
            self.visit(value, &call, depth);
        }
        if let Some(right) = right {
            self.walk(right, depth + 1);
        }
        if self.order == Order::Post {
            self.visit(value, &call, depth);
        }
    }

    fn visit(&mut self, value: i64, call: &str, depth: usize) {
        self.output.push(value);
        self.rec.push_annotated(
            self.order.visit_line(),
            self.snap(Some(value)),
            format!("Visit {value}; output is {}", Value::ints(&self.output)),
            Annotation::recursion(call, depth),
        );
    }
}

fn traverse(
    order: Order,
    operation: Operation,
    code: &'static [&'static str],
) -> Result<StepSequence, VizError> {
    let bst = Bst::from_keys(&DEMO_TREE_KEYS);
    let mut walker = Walker {
        bst: &bst,
        order,
        rec: StepRecorder::new(),
        output: Vec::new(),
    };
    if let Some(root) = bst.root {
        walker.walk(root, 1);
    }
    let summary = format!(
        "Done: {} traversal visited {}",
        order.name(),
        Value::ints(&walker.output)
    );
    let done = walker.snap(None);
    let mut rec = walker.rec;
    rec.push(2, done, summary);
    Ok(rec.finish(Topic::Tree, operation, code))
}

pub fn inorder(_params: &Params) -> Result<StepSequence, VizError> {
    traverse(Order::In, Operation::InorderTraversal, INORDER)
}

pub fn preorder(_params: &Params) -> Result<StepSequence, VizError> {
    traverse(Order::Pre, Operation::PreorderTraversal, PREORDER)
}

pub fn postorder(_params: &Params) -> Result<StepSequence, VizError> {
    traverse(Order::Post, Operation::PostorderTraversal, POSTORDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(seq: &StepSequence) -> Vec<i64> {
        seq.last()
            .and_then(|s| s.snapshot.get("output"))
            .and_then(Value::as_ints)
            .unwrap()
    }

    #[test]
    fn test_demo_tree_layout_is_complete() {
        let bst = Bst::from_keys(&DEMO_TREE_KEYS);
        assert_eq!(bst.layout(), Value::ints(&[50, 30, 70, 20, 40, 60, 80]));
    }

    #[test]
    fn test_traversal_orders() {
        assert_eq!(
            output(&inorder(&Params::default()).unwrap()),
            vec![20, 30, 40, 50, 60, 70, 80]
        );
        assert_eq!(
            output(&preorder(&Params::default()).unwrap()),
            vec![50, 30, 20, 40, 70, 60, 80]
        );
        assert_eq!(
            output(&postorder(&Params::default()).unwrap()),
            vec![20, 40, 30, 60, 80, 70, 50]
        );
    }

    #[test]
    fn test_traversal_marks_nodes_incrementally() {
        let seq = inorder(&Params::default()).unwrap();
        let mut previous = 0;
        for step in seq.steps() {
            let len = step
                .snapshot
                .get("output")
                .and_then(Value::as_ints)
                .map(|o| o.len())
                .unwrap();
            assert!(len == previous || len == previous + 1);
            previous = len;
        }
        // one call and one visit per node, plus the summary
        assert_eq!(seq.len(), DEMO_TREE_KEYS.len() * 2 + 1);
    }

    #[test]
    fn test_insert_places_new_leaf() {
        let seq = insert(&Params::new().with_value(65)).unwrap();
        let tree = seq.last().unwrap().snapshot.get("tree").unwrap().clone();
        let Value::List(slots) = tree else {
            panic!("tree is not a list");
        };
        // 50 -> 70 -> 60 -> right child: slot 12
        assert_eq!(slots.len(), 13);
        assert_eq!(slots[12], Value::Int(65));
        let depths: Vec<usize> = seq
            .steps()
            .iter()
            .filter_map(|s| s.annotation.as_ref().map(|a| a.iteration))
            .collect();
        assert_eq!(depths, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_insert_duplicate_leaves_tree() {
        let seq = insert(&Params::new().with_value(40)).unwrap();
        assert_eq!(
            seq.last().unwrap().snapshot.get("tree"),
            Some(&Value::ints(&[50, 30, 70, 20, 40, 60, 80]))
        );
        assert!(seq.last().unwrap().description.contains("already"));
    }

    #[test]
    fn test_search_hit_and_miss() {
        let seq = search(&Params::new().with_target(60)).unwrap();
        assert_eq!(seq.last().unwrap().snapshot.get("found"), Some(&Value::Bool(true)));
        assert_eq!(seq.len(), 4);

        let seq = search(&Params::new().with_target(65)).unwrap();
        assert_eq!(seq.last().unwrap().snapshot.get("found"), Some(&Value::Bool(false)));
    }
}
