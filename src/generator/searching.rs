//! Linear and binary search.

use crate::catalog::{Operation, Topic};
use crate::error::VizError;
use crate::params::Params;
use crate::step::{Annotation, Snapshot, StepRecorder, StepSequence, Value};

use super::linear::scan_for_target;
use super::{DEMO_ARRAY, DEMO_SORTED};

const LINEAR: &[&str] = &[
    "function linearSearch(arr, target):",
    "  for i in 0 .. arr.length:",
    "    if arr[i] == target:",
    "      return i",
    "  return -1",
];

const BINARY: &[&str] = &[
    "function binarySearch(arr, target):",
    "  lo = 0; hi = arr.length - 1",
    "  while lo <= hi:",
    "    mid = (lo + hi) / 2",
    "    if arr[mid] == target: return mid",
    "    if arr[mid] < target: lo = mid + 1",
    "    else: hi = mid - 1",
    "  return -1",
];

pub fn linear_search(params: &Params) -> Result<StepSequence, VizError> {
    let arr = params.input_or(&DEMO_ARRAY);
    let target = params.target_or(9);
    Ok(scan_for_target(
        Topic::Searching,
        Operation::LinearSearch,
        LINEAR,
        &arr,
        target,
    ))
}

pub fn binary_search(params: &Params) -> Result<StepSequence, VizError> {
    let arr = params.input_or(&DEMO_SORTED);
    let target = params.target_or(7);
    if let Some(at) = arr.windows(2).position(|w| w[0] > w[1]) {
        return Err(VizError::invalid(
            Operation::BinarySearch,
            format!(
                "input must be sorted ascending; {} > {} at index {at}",
                arr[at],
                arr[at + 1]
            ),
        ));
    }

    let mut rec = StepRecorder::new();
    // `hi` is exclusive internally so the window never underflows; snapshots
    // show the inclusive bound the listing uses.
    let base = |lo: usize, hi: usize| {
        Snapshot::new()
            .with("array", &arr)
            .with("target", target)
            .with("lo", lo)
            .with("hi", hi as i64 - 1)
    };
    let (mut lo, mut hi) = (0usize, arr.len());
    rec.push(
        2,
        base(lo, hi).with("found", Value::Null),
        format!("Start: search {} for {target}", Value::ints(&arr)),
    );

    let mut round = 0;
    while lo < hi {
        round += 1;
        let mid = lo + (hi - 1 - lo) / 2;
        let probe = arr[mid];
        let window = Annotation::while_loop("lo <= hi", round);
        rec.push_annotated(
            4,
            base(lo, hi).with("mid", mid).with("highlight", mid).with("found", Value::Null),
            format!("mid = {mid}; arr[mid] = {probe}"),
            window.clone(),
        );
        if probe == target {
            rec.push_annotated(
                5,
                base(lo, hi).with("mid", mid).with("highlight", mid).with("found", mid),
                format!("Found {target} at index {mid}"),
                window,
            );
            return Ok(rec.finish(Topic::Searching, Operation::BinarySearch, BINARY));
        }
        if probe < target {
            lo = mid + 1;
            rec.push_annotated(
                6,
                base(lo, hi).with("mid", mid).with("found", Value::Null),
                format!("{probe} < {target}: discard the left half, lo = {lo}"),
                window,
            );
        } else {
            hi = mid;
            rec.push_annotated(
                7,
                base(lo, hi).with("mid", mid).with("found", Value::Null),
                format!("{probe} > {target}: discard the right half, hi = {}", hi as i64 - 1),
                window,
            );
        }
    }

    rec.push(
        8,
        base(lo, hi).with("found", -1i64),
        format!("Window is empty: {target} is not in the array; return -1"),
    );
    Ok(rec.finish(Topic::Searching, Operation::BinarySearch, BINARY))
}
