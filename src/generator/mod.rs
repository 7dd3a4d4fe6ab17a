//! Step generation.
//!
//! [`generate`] maps a `(topic, operation, params)` triple to a
//! [`StepSequence`] through a static registration table. Generators are
//! pure: no randomness, no clocks, no I/O. Identical inputs produce
//! identical sequences, which is what lets the player step backwards by
//! indexing instead of undoing.
//!
//! Construction follows three families:
//! - [`linear`]: arrays, stacks, queues and linked lists mutate a small demo
//!   collection in place, with the mutation no earlier than step 2 so there
//!   is always a "before" frame.
//! - [`tree`] and [`graph`]: walk a fixed demo topology and mark visited
//!   nodes one at a time.
//! - [`sorting`] and [`searching`]: one step per comparison, swap or
//!   partition boundary of the textbook algorithm.

pub mod graph;
pub mod linear;
pub mod searching;
pub mod sorting;
pub mod tree;

use tracing::debug;

use crate::catalog::{Operation, Topic};
use crate::error::VizError;
use crate::params::Params;
use crate::step::StepSequence;

/// Demo array for array operations and sorting.
pub const DEMO_ARRAY: [i64; 6] = [5, 2, 8, 1, 9, 3];
/// Demo stack, bottom first.
pub const DEMO_STACK: [i64; 4] = [1, 2, 3, 4];
/// Demo queue, front first.
pub const DEMO_QUEUE: [i64; 4] = [10, 20, 30, 40];
/// Demo singly linked list, head first.
pub const DEMO_LIST: [i64; 4] = [3, 7, 1, 9];
/// Keys inserted, in order, to build the demo binary search tree.
pub const DEMO_TREE_KEYS: [i64; 7] = [50, 30, 70, 20, 40, 60, 80];
/// Sorted demo array for binary search.
pub const DEMO_SORTED: [i64; 8] = [1, 3, 5, 7, 9, 11, 13, 15];

/// A generator for one `(topic, operation)` pair.
pub type GeneratorFn = fn(&Params) -> Result<StepSequence, VizError>;

struct Entry {
    topic: Topic,
    operation: Operation,
    generate: GeneratorFn,
}

const fn entry(topic: Topic, operation: Operation, generate: GeneratorFn) -> Entry {
    Entry {
        topic,
        operation,
        generate,
    }
}

const REGISTRY: &[Entry] = &[
    entry(Topic::Arrays, Operation::Insert, linear::array_insert),
    entry(Topic::Arrays, Operation::Delete, linear::array_delete),
    entry(Topic::Arrays, Operation::Search, linear::array_search),
    entry(Topic::Arrays, Operation::Update, linear::array_update),
    entry(Topic::Arrays, Operation::Traverse, linear::array_traverse),
    entry(Topic::Stack, Operation::Push, linear::stack_push),
    entry(Topic::Stack, Operation::Pop, linear::stack_pop),
    entry(Topic::Stack, Operation::Peek, linear::stack_peek),
    entry(Topic::Queue, Operation::Enqueue, linear::queue_enqueue),
    entry(Topic::Queue, Operation::Dequeue, linear::queue_dequeue),
    entry(Topic::Queue, Operation::Peek, linear::queue_front),
    entry(Topic::LinkedList, Operation::InsertAtHead, linear::list_insert_head),
    entry(Topic::LinkedList, Operation::InsertAtTail, linear::list_insert_tail),
    entry(Topic::LinkedList, Operation::Delete, linear::list_delete),
    entry(Topic::LinkedList, Operation::Traverse, linear::list_traverse),
    entry(Topic::Tree, Operation::Insert, tree::insert),
    entry(Topic::Tree, Operation::Search, tree::search),
    entry(Topic::Tree, Operation::InorderTraversal, tree::inorder),
    entry(Topic::Tree, Operation::PreorderTraversal, tree::preorder),
    entry(Topic::Tree, Operation::PostorderTraversal, tree::postorder),
    entry(Topic::Graph, Operation::BreadthFirstSearch, graph::bfs),
    entry(Topic::Graph, Operation::DepthFirstSearch, graph::dfs),
    entry(Topic::Sorting, Operation::BubbleSort, sorting::bubble_sort),
    entry(Topic::Sorting, Operation::SelectionSort, sorting::selection_sort),
    entry(Topic::Sorting, Operation::InsertionSort, sorting::insertion_sort),
    entry(Topic::Sorting, Operation::MergeSort, sorting::merge_sort),
    entry(Topic::Sorting, Operation::QuickSort, sorting::quick_sort),
    entry(Topic::Searching, Operation::LinearSearch, searching::linear_search),
    entry(Topic::Searching, Operation::BinarySearch, searching::binary_search),
];

/// Look up the generator registered for a pair.
pub fn lookup(topic: Topic, operation: Operation) -> Option<GeneratorFn> {
    REGISTRY
        .iter()
        .find(|e| e.topic == topic && e.operation == operation)
        .map(|e| e.generate)
}

/// Generate the step sequence for an operation.
///
/// Fails with [`VizError::UnsupportedOperation`] when `operation` is not in
/// `topic`'s operation set, and with [`VizError::InvalidParams`] when the
/// parameters cannot produce a correct visualization. Never returns an
/// empty sequence.
pub fn generate(
    topic: Topic,
    operation: Operation,
    params: &Params,
) -> Result<StepSequence, VizError> {
    let generator = lookup(topic, operation)
        .ok_or(VizError::UnsupportedOperation { topic, operation })?;
    let sequence = generator(params)?;
    debug_assert!(!sequence.is_empty(), "{topic}/{operation} produced no steps");
    debug!(%topic, %operation, steps = sequence.len(), "generated step sequence");
    Ok(sequence)
}

/// Every registered `(topic, operation)` pair, in registration order.
pub fn supported_pairs() -> impl Iterator<Item = (Topic, Operation)> {
    REGISTRY.iter().map(|e| (e.topic, e.operation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::Value;

    fn all_sequences() -> Vec<StepSequence> {
        supported_pairs()
            .map(|(t, op)| generate(t, op, &Params::default()).unwrap())
            .collect()
    }

    #[test]
    fn test_registry_matches_catalog() {
        for topic in Topic::ALL {
            for &op in topic.operations() {
                assert!(lookup(topic, op).is_some(), "{topic}/{op} has no generator");
            }
        }
        for (topic, op) in supported_pairs() {
            assert!(topic.supports(op), "{topic}/{op} registered but not in catalog");
        }
    }

    #[test]
    fn test_every_pair_yields_contiguous_indices() {
        for seq in all_sequences() {
            assert!(!seq.is_empty(), "{}/{} empty", seq.topic(), seq.operation());
            for (i, step) in seq.steps().iter().enumerate() {
                assert_eq!(step.index, i, "{}/{}", seq.topic(), seq.operation());
            }
        }
    }

    #[test]
    fn test_source_lines_point_into_code() {
        for seq in all_sequences() {
            let lines = seq.code().len() as u32;
            for step in seq.steps() {
                assert!(
                    step.source_line >= 1 && step.source_line <= lines,
                    "{}/{} step {} line {} outside 1..={lines}",
                    seq.topic(),
                    seq.operation(),
                    step.index,
                    step.source_line
                );
            }
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let params = Params::new().with_index(1).with_value(7).with_target(9);
        for (topic, op) in supported_pairs() {
            let a = generate(topic, op, &params);
            let b = generate(topic, op, &params);
            assert_eq!(a, b, "{topic}/{op}");
            if let (Ok(a), Ok(b)) = (a, b) {
                assert_eq!(
                    serde_json::to_string(&a).unwrap(),
                    serde_json::to_string(&b).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_unsupported_pair_is_rejected() {
        let err = generate(Topic::Stack, Operation::InorderTraversal, &Params::default())
            .unwrap_err();
        assert_eq!(
            err,
            VizError::UnsupportedOperation {
                topic: Topic::Stack,
                operation: Operation::InorderTraversal,
            }
        );
    }

    #[test]
    fn test_array_insert_scenario() {
        let params = Params::new().with_index(2).with_value(10);
        let seq = generate(Topic::Arrays, Operation::Insert, &params).unwrap();
        let last = seq.last().unwrap();
        assert_eq!(
            last.snapshot.get("array"),
            Some(&Value::ints(&[5, 2, 10, 8, 1, 9, 3]))
        );
        let insertion = seq
            .steps()
            .iter()
            .find(|s| s.description.starts_with("Insert value"))
            .expect("no insertion step");
        assert!(insertion.index >= 2);
        assert!(insertion.description.contains("index 2"), "{}", insertion.description);
        assert!(insertion.description.contains("value 10"), "{}", insertion.description);
    }

    #[test]
    fn test_stack_push_scenario() {
        let seq = generate(Topic::Stack, Operation::Push, &Params::new().with_value(5)).unwrap();
        assert_eq!(
            seq.last().unwrap().snapshot.get("stack"),
            Some(&Value::ints(&[1, 2, 3, 4, 5]))
        );
    }
}
