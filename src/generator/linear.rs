//! Arrays, stacks, queues and linked lists.
//!
//! Each generator copies a demo collection (or `params.input`), frames the
//! initial state, then mutates in place at step 2 or later.

use crate::catalog::{Operation, Topic};
use crate::error::VizError;
use crate::params::Params;
use crate::step::{Annotation, Snapshot, StepRecorder, StepSequence, Value};

use super::{DEMO_ARRAY, DEMO_LIST, DEMO_QUEUE, DEMO_STACK};

/// Fixed capacity used for stack and queue overflow checks.
pub const CAPACITY: usize = 8;

const ARRAY_INSERT: &[&str] = &[
    "function insert(arr, index, value):",
    "  if index < 0 or index > arr.length: error",
    "  for i = arr.length - 1 down to index:",
    "    arr[i + 1] = arr[i]",
    "  arr[index] = value",
    "  return arr",
];

const ARRAY_DELETE: &[&str] = &[
    "function delete(arr, index):",
    "  if index < 0 or index >= arr.length: error",
    "  removed = arr[index]",
    "  for i = index to arr.length - 2:",
    "    arr[i] = arr[i + 1]",
    "  arr.length = arr.length - 1",
    "  return removed",
];

const ARRAY_SEARCH: &[&str] = &[
    "function search(arr, target):",
    "  for i = 0 to arr.length - 1:",
    "    if arr[i] == target:",
    "      return i",
    "  return -1",
];

const ARRAY_UPDATE: &[&str] = &[
    "function update(arr, index, value):",
    "  if index < 0 or index >= arr.length: error",
    "  old = arr[index]",
    "  arr[index] = value",
    "  return old",
];

const ARRAY_TRAVERSE: &[&str] = &[
    "function traverse(arr):",
    "  for i = 0 to arr.length - 1:",
    "    visit(arr[i])",
    "  done",
];

const STACK_PUSH: &[&str] = &[
    "function push(stack, value):",
    "  if top == capacity - 1: overflow",
    "  top = top + 1",
    "  stack[top] = value",
];

const STACK_POP: &[&str] = &[
    "function pop(stack):",
    "  if top == -1: underflow",
    "  value = stack[top]",
    "  top = top - 1",
    "  return value",
];

const STACK_PEEK: &[&str] = &[
    "function peek(stack):",
    "  if top == -1: return null",
    "  return stack[top]",
];

const QUEUE_ENQUEUE: &[&str] = &[
    "function enqueue(queue, value):",
    "  if size == capacity: overflow",
    "  rear = rear + 1",
    "  queue[rear] = value",
];

const QUEUE_DEQUEUE: &[&str] = &[
    "function dequeue(queue):",
    "  if size == 0: underflow",
    "  value = queue[front]",
    "  front = front + 1",
    "  return value",
];

const QUEUE_FRONT: &[&str] = &[
    "function front(queue):",
    "  if size == 0: return null",
    "  return queue[front]",
];

const LIST_INSERT_HEAD: &[&str] = &[
    "function insertAtHead(head, value):",
    "  node = new Node(value)",
    "  node.next = head",
    "  head = node",
    "  return head",
];

const LIST_INSERT_TAIL: &[&str] = &[
    "function insertAtTail(head, value):",
    "  node = new Node(value)",
    "  if head == null: return node",
    "  current = head",
    "  while current.next != null:",
    "    current = current.next",
    "  current.next = node",
    "  return head",
];

const LIST_DELETE: &[&str] = &[
    "function delete(head, target):",
    "  if head.value == target: return head.next",
    "  current = head",
    "  while current.next != null and current.next.value != target:",
    "    current = current.next",
    "  if current.next != null:",
    "    current.next = current.next.next",
    "  return head",
];

const LIST_TRAVERSE: &[&str] = &[
    "function traverse(head):",
    "  current = head",
    "  while current != null:",
    "    visit(current.value)",
    "    current = current.next",
];

fn array_snap(arr: &[i64]) -> Snapshot {
    Snapshot::new().with("array", arr)
}

fn fmt_list(items: &[i64]) -> String {
    Value::ints(items).to_string()
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

pub fn array_insert(params: &Params) -> Result<StepSequence, VizError> {
    let mut arr = params.input_or(&DEMO_ARRAY);
    let index = params.index_or(2);
    let value = params.value_or(10);
    if index > arr.len() {
        return Err(VizError::invalid(
            Operation::Insert,
            format!("index {index} is past the end (len {})", arr.len()),
        ));
    }

    let mut rec = StepRecorder::new();
    let base = |arr: &[i64]| array_snap(arr).with("index", index).with("value", value);
    rec.push(
        1,
        base(&arr),
        format!("Start: insert {value} at position {index} of {}", fmt_list(&arr)),
    );
    rec.push(
        2,
        base(&arr),
        format!("Position {index} is within bounds 0..={}", arr.len()),
    );

    let len = arr.len();
    for (iteration, i) in (index..len).rev().enumerate() {
        if i + 1 == arr.len() {
            arr.push(arr[i]);
        } else {
            arr[i + 1] = arr[i];
        }
        rec.push_annotated(
            4,
            base(&arr).with("i", i),
            format!("Shift arr[{i}] = {} right to position {}", arr[i], i + 1),
            Annotation::for_loop("i >= index", iteration + 1),
        );
    }

    if index == arr.len() {
        arr.push(value);
    } else {
        arr[index] = value;
    }
    rec.push(
        5,
        base(&arr).with("highlight", index),
        format!("Insert value {value} at index {index}"),
    );
    rec.push(
        6,
        array_snap(&arr),
        format!("Done: array is now {} (length {})", fmt_list(&arr), arr.len()),
    );
    Ok(rec.finish(Topic::Arrays, Operation::Insert, ARRAY_INSERT))
}

pub fn array_delete(params: &Params) -> Result<StepSequence, VizError> {
    let mut arr = params.input_or(&DEMO_ARRAY);
    let index = params.index_or(2);
    if index >= arr.len() {
        return Err(VizError::invalid(
            Operation::Delete,
            format!("index {index} is out of bounds (len {})", arr.len()),
        ));
    }

    let mut rec = StepRecorder::new();
    let base = |arr: &[i64]| array_snap(arr).with("index", index);
    rec.push(
        1,
        base(&arr),
        format!("Start: delete the element at index {index} of {}", fmt_list(&arr)),
    );
    rec.push(
        2,
        base(&arr),
        format!("Index {index} is within bounds 0..{}", arr.len()),
    );
    let removed = arr[index];
    rec.push(
        3,
        base(&arr).with("removed", removed).with("highlight", index),
        format!("Remember removed = arr[{index}] = {removed}"),
    );

    for (iteration, i) in (index..arr.len() - 1).enumerate() {
        arr[i] = arr[i + 1];
        rec.push_annotated(
            5,
            base(&arr).with("removed", removed).with("i", i),
            format!("Shift arr[{}] = {} left to index {i}", i + 1, arr[i]),
            Annotation::for_loop("i <= arr.length - 2", iteration + 1),
        );
    }

    arr.pop();
    rec.push(
        6,
        base(&arr).with("removed", removed),
        format!("Shrink the array to length {}", arr.len()),
    );
    rec.push(
        7,
        array_snap(&arr).with("removed", removed),
        format!("Done: removed {removed}, array is now {}", fmt_list(&arr)),
    );
    Ok(rec.finish(Topic::Arrays, Operation::Delete, ARRAY_DELETE))
}

pub fn array_search(params: &Params) -> Result<StepSequence, VizError> {
    let arr = params.input_or(&DEMO_ARRAY);
    let target = params.target_or(8);
    Ok(scan_for_target(Topic::Arrays, Operation::Search, ARRAY_SEARCH, &arr, target))
}

/// Linear scan shared by the array and searching topics. Both listings put
/// the comparison on line 3, the hit on line 4 and the miss on line 5.
pub(crate) fn scan_for_target(
    topic: Topic,
    operation: Operation,
    code: &'static [&'static str],
    arr: &[i64],
    target: i64,
) -> StepSequence {
    let mut rec = StepRecorder::new();
    let base = || array_snap(arr).with("target", target);
    rec.push(
        1,
        base().with("found", Value::Null),
        format!("Start: look for {target} in {}", fmt_list(arr)),
    );

    for (i, &item) in arr.iter().enumerate() {
        let hit = item == target;
        rec.push_annotated(
            3,
            base().with("i", i).with("highlight", i).with("found", Value::Null),
            format!(
                "Compare arr[{i}] = {item} with {target}: {}",
                if hit { "match" } else { "no match" }
            ),
            Annotation::for_loop("i < arr.length", i + 1),
        );
        if hit {
            rec.push(
                4,
                base().with("i", i).with("highlight", i).with("found", i),
                format!("Found {target} at index {i}"),
            );
            return rec.finish(topic, operation, code);
        }
    }

    rec.push(
        5,
        base().with("found", -1i64),
        format!("{target} is not in the array; return -1"),
    );
    rec.finish(topic, operation, code)
}

pub fn array_update(params: &Params) -> Result<StepSequence, VizError> {
    let mut arr = params.input_or(&DEMO_ARRAY);
    let index = params.index_or(2);
    let value = params.value_or(42);
    if index >= arr.len() {
        return Err(VizError::invalid(
            Operation::Update,
            format!("index {index} is out of bounds (len {})", arr.len()),
        ));
    }

    let mut rec = StepRecorder::new();
    let base = |arr: &[i64]| array_snap(arr).with("index", index).with("value", value);
    rec.push(
        1,
        base(&arr),
        format!("Start: write {value} at index {index} of {}", fmt_list(&arr)),
    );
    rec.push(
        2,
        base(&arr),
        format!("Index {index} is within bounds 0..{}", arr.len()),
    );
    let old = arr[index];
    rec.push(
        3,
        base(&arr).with("old", old).with("highlight", index),
        format!("Read old = arr[{index}] = {old}"),
    );
    arr[index] = value;
    rec.push(
        4,
        base(&arr).with("old", old).with("highlight", index),
        format!("Overwrite arr[{index}] with {value}"),
    );
    rec.push(
        5,
        array_snap(&arr).with("old", old),
        format!("Done: returned {old}, array is now {}", fmt_list(&arr)),
    );
    Ok(rec.finish(Topic::Arrays, Operation::Update, ARRAY_UPDATE))
}

pub fn array_traverse(params: &Params) -> Result<StepSequence, VizError> {
    let arr = params.input_or(&DEMO_ARRAY);
    let mut rec = StepRecorder::new();
    let mut visited: Vec<i64> = Vec::new();
    rec.push(
        1,
        array_snap(&arr).with("visited", &visited),
        format!("Start: visit every element of {}", fmt_list(&arr)),
    );
    for (i, &item) in arr.iter().enumerate() {
        visited.push(item);
        rec.push_annotated(
            3,
            array_snap(&arr)
                .with("i", i)
                .with("highlight", i)
                .with("visited", &visited),
            format!("Visit arr[{i}] = {item}"),
            Annotation::for_loop("i < arr.length", i + 1),
        );
    }
    rec.push(
        4,
        array_snap(&arr).with("visited", &visited),
        format!("Done: visited {} elements", visited.len()),
    );
    Ok(rec.finish(Topic::Arrays, Operation::Traverse, ARRAY_TRAVERSE))
}

// ---------------------------------------------------------------------------
// Stack (top is the last element)
// ---------------------------------------------------------------------------

fn stack_snap(stack: &[i64]) -> Snapshot {
    let top = stack.len() as i64 - 1;
    Snapshot::new().with("stack", stack).with("top", top)
}

pub fn stack_push(params: &Params) -> Result<StepSequence, VizError> {
    let mut stack = params.input_or(&DEMO_STACK);
    let value = params.value_or(5);
    let mut rec = StepRecorder::new();
    rec.push(
        1,
        stack_snap(&stack).with("value", value),
        format!("Start: push {value} onto {}", fmt_list(&stack)),
    );
    if stack.len() >= CAPACITY {
        rec.push(
            2,
            stack_snap(&stack).with("value", value),
            format!("Stack overflow: all {CAPACITY} slots are used, {value} is not pushed"),
        );
        return Ok(rec.finish(Topic::Stack, Operation::Push, STACK_PUSH));
    }
    rec.push(
        2,
        stack_snap(&stack).with("value", value),
        format!("Stack has room ({} of {CAPACITY} slots used)", stack.len()),
    );
    let old_top = stack.len() as i64 - 1;
    rec.push(
        3,
        stack_snap(&stack)
            .with("top", old_top + 1)
            .with("value", value),
        format!("Move top from {old_top} to {}", old_top + 1),
    );
    stack.push(value);
    rec.push(
        4,
        stack_snap(&stack).with("value", value),
        format!("Store {value} at stack[{}]", stack.len() - 1),
    );
    Ok(rec.finish(Topic::Stack, Operation::Push, STACK_PUSH))
}

pub fn stack_pop(params: &Params) -> Result<StepSequence, VizError> {
    let mut stack = params.input_or(&DEMO_STACK);
    let mut rec = StepRecorder::new();
    rec.push(
        1,
        stack_snap(&stack).with("popped", Value::Null),
        format!("Start: pop from {}", fmt_list(&stack)),
    );
    let Some(&value) = stack.last() else {
        rec.push(
            2,
            stack_snap(&stack).with("popped", Value::Null),
            "Stack underflow: the stack is empty",
        );
        return Ok(rec.finish(Topic::Stack, Operation::Pop, STACK_POP));
    };
    rec.push(
        2,
        stack_snap(&stack).with("popped", Value::Null),
        format!("Stack is not empty (top = {})", stack.len() - 1),
    );
    rec.push(
        3,
        stack_snap(&stack).with("popped", value),
        format!("Read value = stack[{}] = {value}", stack.len() - 1),
    );
    stack.pop();
    rec.push(
        4,
        stack_snap(&stack).with("popped", value),
        format!("Move top down to {}", stack.len() as i64 - 1),
    );
    rec.push(
        5,
        stack_snap(&stack).with("popped", value),
        format!("Return {value}; stack is now {}", fmt_list(&stack)),
    );
    Ok(rec.finish(Topic::Stack, Operation::Pop, STACK_POP))
}

pub fn stack_peek(params: &Params) -> Result<StepSequence, VizError> {
    let stack = params.input_or(&DEMO_STACK);
    let mut rec = StepRecorder::new();
    rec.push(
        1,
        stack_snap(&stack).with("peeked", Value::Null),
        format!("Start: peek at {}", fmt_list(&stack)),
    );
    match stack.last() {
        None => rec.push(
            2,
            stack_snap(&stack).with("peeked", Value::Null),
            "Stack is empty; return null",
        ),
        Some(&value) => {
            rec.push(
                2,
                stack_snap(&stack).with("peeked", Value::Null),
                format!("Stack is not empty (top = {})", stack.len() - 1),
            );
            rec.push(
                3,
                stack_snap(&stack).with("peeked", value),
                format!("Return stack[{}] = {value} without removing it", stack.len() - 1),
            );
        }
    }
    Ok(rec.finish(Topic::Stack, Operation::Peek, STACK_PEEK))
}

// ---------------------------------------------------------------------------
// Queue (front is the first element)
// ---------------------------------------------------------------------------

fn queue_snap(queue: &[i64]) -> Snapshot {
    Snapshot::new()
        .with("queue", queue)
        .with("front", 0usize)
        .with("rear", queue.len() as i64 - 1)
}

pub fn queue_enqueue(params: &Params) -> Result<StepSequence, VizError> {
    let mut queue = params.input_or(&DEMO_QUEUE);
    let value = params.value_or(5);
    let mut rec = StepRecorder::new();
    rec.push(
        1,
        queue_snap(&queue).with("value", value),
        format!("Start: enqueue {value} into {}", fmt_list(&queue)),
    );
    if queue.len() >= CAPACITY {
        rec.push(
            2,
            queue_snap(&queue).with("value", value),
            format!("Queue overflow: all {CAPACITY} slots are used, {value} is not enqueued"),
        );
        return Ok(rec.finish(Topic::Queue, Operation::Enqueue, QUEUE_ENQUEUE));
    }
    rec.push(
        2,
        queue_snap(&queue).with("value", value),
        format!("Queue has room ({} of {CAPACITY} slots used)", queue.len()),
    );
    let rear = queue.len() as i64 - 1;
    rec.push(
        3,
        queue_snap(&queue).with("rear", rear + 1).with("value", value),
        format!("Move rear from {rear} to {}", rear + 1),
    );
    queue.push(value);
    rec.push(
        4,
        queue_snap(&queue).with("value", value),
        format!("Store {value} at queue[{}]", queue.len() - 1),
    );
    Ok(rec.finish(Topic::Queue, Operation::Enqueue, QUEUE_ENQUEUE))
}

pub fn queue_dequeue(params: &Params) -> Result<StepSequence, VizError> {
    let mut queue = params.input_or(&DEMO_QUEUE);
    let mut rec = StepRecorder::new();
    rec.push(
        1,
        queue_snap(&queue).with("dequeued", Value::Null),
        format!("Start: dequeue from {}", fmt_list(&queue)),
    );
    let Some(&value) = queue.first() else {
        rec.push(
            2,
            queue_snap(&queue).with("dequeued", Value::Null),
            "Queue underflow: the queue is empty",
        );
        return Ok(rec.finish(Topic::Queue, Operation::Dequeue, QUEUE_DEQUEUE));
    };
    rec.push(
        2,
        queue_snap(&queue).with("dequeued", Value::Null),
        format!("Queue is not empty (size {})", queue.len()),
    );
    rec.push(
        3,
        queue_snap(&queue).with("dequeued", value).with("highlight", 0usize),
        format!("Read value = queue[front] = {value}"),
    );
    queue.remove(0);
    rec.push(
        4,
        queue_snap(&queue).with("dequeued", value),
        "Advance front to the next element",
    );
    rec.push(
        5,
        queue_snap(&queue).with("dequeued", value),
        format!("Return {value}; queue is now {}", fmt_list(&queue)),
    );
    Ok(rec.finish(Topic::Queue, Operation::Dequeue, QUEUE_DEQUEUE))
}

pub fn queue_front(params: &Params) -> Result<StepSequence, VizError> {
    let queue = params.input_or(&DEMO_QUEUE);
    let mut rec = StepRecorder::new();
    rec.push(
        1,
        queue_snap(&queue).with("peeked", Value::Null),
        format!("Start: look at the front of {}", fmt_list(&queue)),
    );
    match queue.first() {
        None => rec.push(
            2,
            queue_snap(&queue).with("peeked", Value::Null),
            "Queue is empty; return null",
        ),
        Some(&value) => {
            rec.push(
                2,
                queue_snap(&queue).with("peeked", Value::Null),
                format!("Queue is not empty (size {})", queue.len()),
            );
            rec.push(
                3,
                queue_snap(&queue).with("peeked", value).with("highlight", 0usize),
                format!("Return queue[front] = {value} without removing it"),
            );
        }
    }
    Ok(rec.finish(Topic::Queue, Operation::Peek, QUEUE_FRONT))
}

// ---------------------------------------------------------------------------
// Singly linked list (values listed head first)
// ---------------------------------------------------------------------------

fn list_snap(list: &[i64]) -> Snapshot {
    Snapshot::new()
        .with("list", list)
        .with("head", list.first().copied())
}

pub fn list_insert_head(params: &Params) -> Result<StepSequence, VizError> {
    let mut list = params.input_or(&DEMO_LIST);
    let value = params.value_or(5);
    let mut rec = StepRecorder::new();
    rec.push(
        1,
        list_snap(&list).with("new_node", Value::Null),
        format!("Start: insert {value} at the head of {}", fmt_list(&list)),
    );
    rec.push(
        2,
        list_snap(&list).with("new_node", value),
        format!("Create a new node holding {value}"),
    );
    let next = match list.first() {
        Some(head) => format!("the old head {head}"),
        None => "null".to_string(),
    };
    rec.push(
        3,
        list_snap(&list).with("new_node", value).with("new_next", list.first().copied()),
        format!("Point the new node's next at {next}"),
    );
    list.insert(0, value);
    rec.push(
        4,
        list_snap(&list).with("highlight", 0usize),
        format!("Make {value} the new head"),
    );
    rec.push(
        5,
        list_snap(&list),
        format!("Done: list is now {}", fmt_list(&list)),
    );
    Ok(rec.finish(Topic::LinkedList, Operation::InsertAtHead, LIST_INSERT_HEAD))
}

pub fn list_insert_tail(params: &Params) -> Result<StepSequence, VizError> {
    let mut list = params.input_or(&DEMO_LIST);
    let value = params.value_or(5);
    let mut rec = StepRecorder::new();
    rec.push(
        1,
        list_snap(&list).with("new_node", Value::Null),
        format!("Start: insert {value} at the tail of {}", fmt_list(&list)),
    );
    rec.push(
        2,
        list_snap(&list).with("new_node", value),
        format!("Create a new node holding {value}"),
    );
    if list.is_empty() {
        list.push(value);
        rec.push(
            3,
            list_snap(&list).with("highlight", 0usize),
            format!("List was empty; {value} becomes the head"),
        );
        return Ok(rec.finish(Topic::LinkedList, Operation::InsertAtTail, LIST_INSERT_TAIL));
    }

    let walk = |current: usize| {
        list_snap(&list)
            .with("new_node", value)
            .with("current", current)
            .with("highlight", current)
    };
    rec.push(4, walk(0), format!("Start at the head ({})", list[0]));
    for current in 1..list.len() {
        rec.push_annotated(
            6,
            walk(current),
            format!("current.next is not null; move to {}", list[current]),
            Annotation::while_loop("current.next != null", current),
        );
    }

    let tail = list[list.len() - 1];
    list.push(value);
    let last = list.len() - 1;
    rec.push(
        7,
        list_snap(&list).with("current", last - 1).with("highlight", last),
        format!("Link {tail}.next to the new node {value}"),
    );
    rec.push(
        8,
        list_snap(&list),
        format!("Done: list is now {}", fmt_list(&list)),
    );
    Ok(rec.finish(Topic::LinkedList, Operation::InsertAtTail, LIST_INSERT_TAIL))
}

pub fn list_delete(params: &Params) -> Result<StepSequence, VizError> {
    let mut list = params.input_or(&DEMO_LIST);
    let target = params.target_or(1);
    let Some(&head) = list.first() else {
        return Err(VizError::invalid(
            Operation::Delete,
            "cannot delete from an empty list",
        ));
    };

    let mut rec = StepRecorder::new();
    let base = |list: &[i64]| list_snap(list).with("target", target);
    rec.push(
        1,
        base(&list),
        format!("Start: delete {target} from {}", fmt_list(&list)),
    );
    if head == target {
        rec.push(
            2,
            base(&list).with("highlight", 0usize),
            format!("Head holds {target}"),
        );
        list.remove(0);
        rec.push(
            2,
            base(&list),
            "Unlink it: the next node becomes the head",
        );
        rec.push(
            8,
            base(&list),
            format!("Done: list is now {}", fmt_list(&list)),
        );
        return Ok(rec.finish(Topic::LinkedList, Operation::Delete, LIST_DELETE));
    }
    rec.push(
        2,
        base(&list),
        format!("Head holds {head}, not {target}"),
    );
    rec.push(
        3,
        base(&list).with("current", 0usize).with("highlight", 0usize),
        format!("Start at the head ({head})"),
    );

    let mut current = 0;
    let mut iteration = 0;
    while current + 1 < list.len() && list[current + 1] != target {
        current += 1;
        iteration += 1;
        rec.push_annotated(
            5,
            base(&list).with("current", current).with("highlight", current),
            format!(
                "Next node holds {}, not {target}; move to it",
                list[current]
            ),
            Annotation::while_loop("current.next.value != target", iteration),
        );
    }

    if current + 1 < list.len() {
        rec.push(
            6,
            base(&list)
                .with("current", current)
                .with("highlight", current + 1),
            format!("Found {target} right after {}", list[current]),
        );
        list.remove(current + 1);
        rec.push(
            7,
            base(&list).with("current", current),
            format!("Unlink it: {}.next now skips {target}", list[current]),
        );
    } else {
        rec.push(
            6,
            base(&list).with("current", current),
            format!("Reached the tail without finding {target}; nothing to delete"),
        );
    }
    rec.push(
        8,
        base(&list),
        format!("Done: list is now {}", fmt_list(&list)),
    );
    Ok(rec.finish(Topic::LinkedList, Operation::Delete, LIST_DELETE))
}

pub fn list_traverse(params: &Params) -> Result<StepSequence, VizError> {
    let list = params.input_or(&DEMO_LIST);
    let mut rec = StepRecorder::new();
    let mut visited: Vec<i64> = Vec::new();
    rec.push(
        2,
        list_snap(&list)
            .with("current", list.first().map(|_| 0usize))
            .with("visited", &visited),
        format!("Start: current = head of {}", fmt_list(&list)),
    );
    for (i, &item) in list.iter().enumerate() {
        visited.push(item);
        rec.push_annotated(
            4,
            list_snap(&list)
                .with("current", i)
                .with("highlight", i)
                .with("visited", &visited),
            format!("Visit {item}"),
            Annotation::while_loop("current != null", i + 1),
        );
    }
    rec.push(
        3,
        list_snap(&list)
            .with("current", Value::Null)
            .with("visited", &visited),
        format!("current is null; visited {} nodes", visited.len()),
    );
    Ok(rec.finish(Topic::LinkedList, Operation::Traverse, LIST_TRAVERSE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn final_ints(seq: &StepSequence, name: &str) -> Vec<i64> {
        seq.last()
            .and_then(|s| s.snapshot.get(name))
            .and_then(Value::as_ints)
            .unwrap_or_else(|| panic!("no '{name}' list in final step"))
    }

    #[test]
    fn test_insert_mutates_at_step_two_or_later() {
        let seq = array_insert(&Params::new().with_index(6).with_value(4)).unwrap();
        assert_eq!(final_ints(&seq, "array"), vec![5, 2, 8, 1, 9, 3, 4]);
        for step in &seq.steps()[..2] {
            assert_eq!(
                step.snapshot.get("array"),
                Some(&Value::ints(&DEMO_ARRAY)),
                "step {} already mutated",
                step.index
            );
        }
    }

    #[test]
    fn test_insert_past_end_is_rejected() {
        let err = array_insert(&Params::new().with_index(7)).unwrap_err();
        assert!(matches!(err, VizError::InvalidParams { .. }));
    }

    #[test]
    fn test_delete_shifts_left() {
        let seq = array_delete(&Params::new().with_index(0)).unwrap();
        assert_eq!(final_ints(&seq, "array"), vec![2, 8, 1, 9, 3]);
        assert_eq!(seq.last().unwrap().snapshot.get("removed"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_search_found_and_missing() {
        let seq = array_search(&Params::new().with_target(1)).unwrap();
        assert_eq!(seq.last().unwrap().snapshot.get("found"), Some(&Value::Int(3)));
        // start + 4 comparisons + found
        assert_eq!(seq.len(), 6);

        let seq = array_search(&Params::new().with_target(100)).unwrap();
        assert_eq!(seq.last().unwrap().snapshot.get("found"), Some(&Value::Int(-1)));
        assert_eq!(seq.len(), 1 + DEMO_ARRAY.len() + 1);
    }

    #[test]
    fn test_update_writes_value() {
        let seq = array_update(&Params::new().with_index(1).with_value(7)).unwrap();
        assert_eq!(final_ints(&seq, "array"), vec![5, 7, 8, 1, 9, 3]);
        assert_eq!(seq.last().unwrap().snapshot.get("old"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_traverse_visits_everything_in_order() {
        let seq = array_traverse(&Params::default()).unwrap();
        assert_eq!(final_ints(&seq, "visited"), DEMO_ARRAY.to_vec());
    }

    #[test]
    fn test_stack_pop_and_underflow() {
        let seq = stack_pop(&Params::default()).unwrap();
        assert_eq!(final_ints(&seq, "stack"), vec![1, 2, 3]);
        assert_eq!(seq.last().unwrap().snapshot.get("popped"), Some(&Value::Int(4)));

        let seq = stack_pop(&Params::new().with_input(vec![])).unwrap();
        assert_eq!(seq.len(), 2);
        assert!(seq.last().unwrap().description.contains("underflow"));
    }

    #[test]
    fn test_stack_push_overflow_keeps_stack() {
        let full: Vec<i64> = (1..=CAPACITY as i64).collect();
        let seq = stack_push(&Params::new().with_input(full.clone()).with_value(99)).unwrap();
        assert_eq!(final_ints(&seq, "stack"), full);
        assert!(seq.last().unwrap().description.contains("overflow"));
    }

    #[test]
    fn test_stack_peek_leaves_stack_alone() {
        let seq = stack_peek(&Params::default()).unwrap();
        assert_eq!(final_ints(&seq, "stack"), DEMO_STACK.to_vec());
        assert_eq!(seq.last().unwrap().snapshot.get("peeked"), Some(&Value::Int(4)));
    }

    #[test]
    fn test_queue_fifo() {
        let seq = queue_enqueue(&Params::new().with_value(50)).unwrap();
        assert_eq!(final_ints(&seq, "queue"), vec![10, 20, 30, 40, 50]);
        let seq = queue_dequeue(&Params::default()).unwrap();
        assert_eq!(final_ints(&seq, "queue"), vec![20, 30, 40]);
        assert_eq!(seq.last().unwrap().snapshot.get("dequeued"), Some(&Value::Int(10)));
        let seq = queue_front(&Params::default()).unwrap();
        assert_eq!(seq.last().unwrap().snapshot.get("peeked"), Some(&Value::Int(10)));
    }

    #[test]
    fn test_list_inserts() {
        let seq = list_insert_head(&Params::new().with_value(5)).unwrap();
        assert_eq!(final_ints(&seq, "list"), vec![5, 3, 7, 1, 9]);
        let seq = list_insert_tail(&Params::new().with_value(5)).unwrap();
        assert_eq!(final_ints(&seq, "list"), vec![3, 7, 1, 9, 5]);
        let seq = list_insert_tail(&Params::new().with_input(vec![]).with_value(5)).unwrap();
        assert_eq!(final_ints(&seq, "list"), vec![5]);
    }

    #[test]
    fn test_list_delete_middle_head_and_missing() {
        let seq = list_delete(&Params::new().with_target(1)).unwrap();
        assert_eq!(final_ints(&seq, "list"), vec![3, 7, 9]);
        let seq = list_delete(&Params::new().with_target(3)).unwrap();
        assert_eq!(final_ints(&seq, "list"), vec![7, 1, 9]);
        let seq = list_delete(&Params::new().with_target(42)).unwrap();
        assert_eq!(final_ints(&seq, "list"), DEMO_LIST.to_vec());
        assert!(list_delete(&Params::new().with_input(vec![])).is_err());
    }

    #[test]
    fn test_mutations_start_at_step_two() {
        type Generator = fn(&Params) -> Result<StepSequence, VizError>;
        let cases: &[(&str, Generator, Params, &[i64])] = &[
            ("array", array_insert, Params::default(), &DEMO_ARRAY),
            ("array", array_insert, Params::new().with_index(6), &DEMO_ARRAY),
            ("array", array_delete, Params::default(), &DEMO_ARRAY),
            ("array", array_update, Params::default(), &DEMO_ARRAY),
            ("stack", stack_push, Params::default(), &DEMO_STACK),
            ("stack", stack_pop, Params::default(), &DEMO_STACK),
            ("queue", queue_enqueue, Params::default(), &DEMO_QUEUE),
            ("queue", queue_dequeue, Params::default(), &DEMO_QUEUE),
            ("list", list_insert_head, Params::default(), &DEMO_LIST),
            ("list", list_insert_tail, Params::default(), &DEMO_LIST),
            ("list", list_delete, Params::default(), &DEMO_LIST),
            ("list", list_delete, Params::new().with_target(3), &DEMO_LIST),
            ("list", list_delete, Params::new().with_target(9), &DEMO_LIST),
        ];
        for (name, generate, params, original) in cases {
            let seq = generate(params).unwrap();
            for step in &seq.steps()[..2] {
                assert_eq!(
                    step.snapshot.get(name),
                    Some(&Value::ints(original)),
                    "{params:?}: step {} already mutated",
                    step.index
                );
            }
            assert_ne!(final_ints(&seq, name), original.to_vec(), "{params:?}");
        }
    }

    #[test]
    fn test_list_traverse_annotates_loop() {
        let seq = list_traverse(&Params::default()).unwrap();
        assert_eq!(final_ints(&seq, "visited"), DEMO_LIST.to_vec());
        let iterations: Vec<usize> = seq
            .steps()
            .iter()
            .filter_map(|s| s.annotation.as_ref().map(|a| a.iteration))
            .collect();
        assert_eq!(iterations, vec![1, 2, 3, 4]);
    }
}
