//! Step records and step sequences.
//!
//! A [`StepSequence`] is the complete, immutable playback script for one
//! `(topic, operation, params)` invocation. Each [`Step`] is a self-contained
//! snapshot: rendering step `i` never requires replaying steps `0..i`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Operation, Topic};

/// A plain, serializable value shown in a state snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    /// Integer list, the common case for arrays, stacks and queues.
    pub fn ints(items: &[i64]) -> Self {
        Value::List(items.iter().copied().map(Value::Int).collect())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Integer items if this is a list made only of integers.
    pub fn as_ints(&self) -> Option<Vec<i64>> {
        match self {
            Value::List(items) => items.iter().map(Value::as_int).collect(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(n as i64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&[i64]> for Value {
    fn from(items: &[i64]) -> Self {
        Value::ints(items)
    }
}

impl From<&Vec<i64>> for Value {
    fn from(items: &Vec<i64>) -> Self {
        Value::ints(items)
    }
}

impl From<&[usize]> for Value {
    fn from(items: &[usize]) -> Self {
        Value::List(items.iter().map(|&n| Value::from(n)).collect())
    }
}

impl From<&Vec<usize>> for Value {
    fn from(items: &Vec<usize>) -> Self {
        Value::from(items.as_slice())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Every name visible at one instant, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<String, Value>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Kind of control-flow context a step sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    For,
    While,
    Recursion,
}

/// Loop or recursion context, rendered as a badge next to the code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub condition: String,
    /// 1-based loop iteration, or recursion depth for `Recursion`.
    pub iteration: usize,
}

impl Annotation {
    pub fn for_loop(condition: impl Into<String>, iteration: usize) -> Self {
        Self {
            kind: AnnotationKind::For,
            condition: condition.into(),
            iteration,
        }
    }

    pub fn while_loop(condition: impl Into<String>, iteration: usize) -> Self {
        Self {
            kind: AnnotationKind::While,
            condition: condition.into(),
            iteration,
        }
    }

    pub fn recursion(call: impl Into<String>, depth: usize) -> Self {
        Self {
            kind: AnnotationKind::Recursion,
            condition: call.into(),
            iteration: depth,
        }
    }
}

/// One renderable instant of a simulated operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub index: usize,
    /// 1-based line in the sequence's code listing.
    pub source_line: u32,
    pub snapshot: Snapshot,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
}

/// The deterministic, ordered list of steps for one operation invocation.
///
/// Always non-empty, with `steps[i].index == i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepSequence {
    topic: Topic,
    operation: Operation,
    code: &'static [&'static str],
    steps: Vec<Step>,
}

impl StepSequence {
    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Code listing the steps' `source_line` values point into.
    pub fn code(&self) -> &'static [&'static str] {
        self.code
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn first(&self) -> Option<&Step> {
        self.steps.first()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }
}

/// Accumulates steps while a generator walks its algorithm.
///
/// Indices are assigned on push, so they are contiguous by construction.
#[derive(Debug, Default)]
pub(crate) struct StepRecorder {
    steps: Vec<Step>,
}

impl StepRecorder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, line: u32, snapshot: Snapshot, description: impl Into<String>) {
        self.push_step(line, snapshot, description.into(), None);
    }

    pub(crate) fn push_annotated(
        &mut self,
        line: u32,
        snapshot: Snapshot,
        description: impl Into<String>,
        annotation: Annotation,
    ) {
        self.push_step(line, snapshot, description.into(), Some(annotation));
    }

    fn push_step(
        &mut self,
        line: u32,
        snapshot: Snapshot,
        description: String,
        annotation: Option<Annotation>,
    ) {
        let index = self.steps.len();
        self.steps.push(Step {
            index,
            source_line: line,
            snapshot,
            description,
            annotation,
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }

    pub(crate) fn finish(
        self,
        topic: Topic,
        operation: Operation,
        code: &'static [&'static str],
    ) -> StepSequence {
        StepSequence {
            topic,
            operation,
            code,
            steps: self.steps,
        }
    }
}
