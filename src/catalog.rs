//! The closed set of visualized topics and their operations.
//!
//! `Operation` is a single flat enumeration shared by every topic, so a
//! mismatched pair such as `stack` + `Inorder Traversal` can be expressed
//! and is rejected by the generator. Each topic declares the operations it
//! supports through [`Topic::operations`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VizError;

/// A data-structure or algorithm family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    Arrays,
    Stack,
    Queue,
    LinkedList,
    Tree,
    Graph,
    Sorting,
    Searching,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Topic::Arrays,
        Topic::Stack,
        Topic::Queue,
        Topic::LinkedList,
        Topic::Tree,
        Topic::Graph,
        Topic::Sorting,
        Topic::Searching,
    ];

    /// Stable lowercase key, also accepted by `FromStr`.
    pub fn key(self) -> &'static str {
        match self {
            Topic::Arrays => "arrays",
            Topic::Stack => "stack",
            Topic::Queue => "queue",
            Topic::LinkedList => "linked-list",
            Topic::Tree => "tree",
            Topic::Graph => "graph",
            Topic::Sorting => "sorting",
            Topic::Searching => "searching",
        }
    }

    /// Human-readable title for menus.
    pub fn title(self) -> &'static str {
        match self {
            Topic::Arrays => "Arrays",
            Topic::Stack => "Stack",
            Topic::Queue => "Queue",
            Topic::LinkedList => "Linked List",
            Topic::Tree => "Binary Search Tree",
            Topic::Graph => "Graph",
            Topic::Sorting => "Sorting",
            Topic::Searching => "Searching",
        }
    }

    /// Operations this topic can visualize, in menu order.
    pub fn operations(self) -> &'static [Operation] {
        use Operation::*;
        match self {
            Topic::Arrays => &[Insert, Delete, Search, Update, Traverse],
            Topic::Stack => &[Push, Pop, Peek],
            Topic::Queue => &[Enqueue, Dequeue, Peek],
            Topic::LinkedList => &[InsertAtHead, InsertAtTail, Delete, Traverse],
            Topic::Tree => &[
                Insert,
                Search,
                InorderTraversal,
                PreorderTraversal,
                PostorderTraversal,
            ],
            Topic::Graph => &[BreadthFirstSearch, DepthFirstSearch],
            Topic::Sorting => &[BubbleSort, SelectionSort, InsertionSort, MergeSort, QuickSort],
            Topic::Searching => &[LinearSearch, BinarySearch],
        }
    }

    pub fn supports(self, operation: Operation) -> bool {
        self.operations().contains(&operation)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Topic {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Topic::ALL
            .into_iter()
            .find(|t| normalize(t.key()) == wanted || normalize(t.title()) == wanted)
            .or(match wanted.as_str() {
                "array" => Some(Topic::Arrays),
                "stacks" => Some(Topic::Stack),
                "queues" => Some(Topic::Queue),
                "list" | "linkedlists" => Some(Topic::LinkedList),
                "bst" | "trees" => Some(Topic::Tree),
                "graphs" => Some(Topic::Graph),
                _ => None,
            })
            .ok_or_else(|| VizError::UnknownTopic(s.to_string()))
    }
}

/// A single visualized operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operation {
    Insert,
    Delete,
    Search,
    Update,
    Traverse,
    Push,
    Pop,
    Peek,
    Enqueue,
    Dequeue,
    InsertAtHead,
    InsertAtTail,
    InorderTraversal,
    PreorderTraversal,
    PostorderTraversal,
    BreadthFirstSearch,
    DepthFirstSearch,
    BubbleSort,
    SelectionSort,
    InsertionSort,
    MergeSort,
    QuickSort,
    LinearSearch,
    BinarySearch,
}

impl Operation {
    pub const ALL: [Operation; 24] = [
        Operation::Insert,
        Operation::Delete,
        Operation::Search,
        Operation::Update,
        Operation::Traverse,
        Operation::Push,
        Operation::Pop,
        Operation::Peek,
        Operation::Enqueue,
        Operation::Dequeue,
        Operation::InsertAtHead,
        Operation::InsertAtTail,
        Operation::InorderTraversal,
        Operation::PreorderTraversal,
        Operation::PostorderTraversal,
        Operation::BreadthFirstSearch,
        Operation::DepthFirstSearch,
        Operation::BubbleSort,
        Operation::SelectionSort,
        Operation::InsertionSort,
        Operation::MergeSort,
        Operation::QuickSort,
        Operation::LinearSearch,
        Operation::BinarySearch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Insert => "Insert",
            Operation::Delete => "Delete",
            Operation::Search => "Search",
            Operation::Update => "Update",
            Operation::Traverse => "Traverse",
            Operation::Push => "Push",
            Operation::Pop => "Pop",
            Operation::Peek => "Peek",
            Operation::Enqueue => "Enqueue",
            Operation::Dequeue => "Dequeue",
            Operation::InsertAtHead => "Insert At Head",
            Operation::InsertAtTail => "Insert At Tail",
            Operation::InorderTraversal => "Inorder Traversal",
            Operation::PreorderTraversal => "Preorder Traversal",
            Operation::PostorderTraversal => "Postorder Traversal",
            Operation::BreadthFirstSearch => "Breadth First Search",
            Operation::DepthFirstSearch => "Depth First Search",
            Operation::BubbleSort => "Bubble Sort",
            Operation::SelectionSort => "Selection Sort",
            Operation::InsertionSort => "Insertion Sort",
            Operation::MergeSort => "Merge Sort",
            Operation::QuickSort => "Quick Sort",
            Operation::LinearSearch => "Linear Search",
            Operation::BinarySearch => "Binary Search",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Operation::ALL
            .into_iter()
            .find(|op| normalize(op.name()) == wanted)
            .or(match wanted.as_str() {
                "bfs" => Some(Operation::BreadthFirstSearch),
                "dfs" => Some(Operation::DepthFirstSearch),
                "inorder" => Some(Operation::InorderTraversal),
                "preorder" => Some(Operation::PreorderTraversal),
                "postorder" => Some(Operation::PostorderTraversal),
                "front" => Some(Operation::Peek),
                _ => None,
            })
            .ok_or_else(|| VizError::UnknownOperation(s.to_string()))
    }
}

impl From<Operation> for String {
    fn from(op: Operation) -> Self {
        op.name().to_string()
    }
}

impl TryFrom<String> for Operation {
    type Error = VizError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Lowercase and drop separators so "Inorder Traversal", "inorder-traversal"
/// and "INORDER_TRAVERSAL" all compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
