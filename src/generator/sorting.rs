//! Comparison sorts, one step per comparison, swap or merge placement.
//!
//! Every snapshot carries the whole `array`; `compare` holds the indices
//! under comparison (empty between comparisons).

use crate::catalog::{Operation, Topic};
use crate::error::VizError;
use crate::params::Params;
use crate::step::{Annotation, Snapshot, StepRecorder, StepSequence, Value};

use super::DEMO_ARRAY;

const BUBBLE: &[&str] = &[
    "function bubbleSort(arr):",
    "  n = arr.length",
    "  for i in 0 .. n - 1:",
    "    for j in 0 .. n - 1 - i:",
    "      if arr[j] > arr[j + 1]:",
    "        swap(arr[j], arr[j + 1])",
    "  return arr",
];

const SELECTION: &[&str] = &[
    "function selectionSort(arr):",
    "  for i in 0 .. n - 1:",
    "    min = i",
    "    for j in i + 1 .. n:",
    "      if arr[j] < arr[min]: min = j",
    "    swap(arr[i], arr[min])",
    "  return arr",
];

const INSERTION: &[&str] = &[
    "function insertionSort(arr):",
    "  for i in 1 .. n:",
    "    key = arr[i]; j = i - 1",
    "    while j >= 0 and arr[j] > key:",
    "      arr[j + 1] = arr[j]; j = j - 1",
    "    arr[j + 1] = key",
    "  return arr",
];

const MERGE: &[&str] = &[
    "function mergeSort(arr, lo, hi):",
    "  if hi - lo <= 1: return",
    "  mid = (lo + hi) / 2",
    "  mergeSort(arr, lo, mid)",
    "  mergeSort(arr, mid, hi)",
    "  merge(arr, lo, mid, hi)",
    "function merge(arr, lo, mid, hi):",
    "  while both halves have items: take the smaller head",
    "  copy whatever is left of either half",
];

const QUICK: &[&str] = &[
    "function quickSort(arr, lo, hi):",
    "  if lo >= hi: return",
    "  pivot = arr[hi]; i = lo",
    "  for j in lo .. hi:",
    "    if arr[j] < pivot: swap(arr[i], arr[j]); i = i + 1",
    "  swap(arr[i], arr[hi])",
    "  quickSort(arr, lo, i - 1)",
    "  quickSort(arr, i + 1, hi)",
];

fn snap(arr: &[i64], compare: &[usize]) -> Snapshot {
    Snapshot::new().with("array", arr).with("compare", compare)
}

fn start(rec: &mut StepRecorder, line: u32, name: &str, arr: &[i64]) {
    rec.push(
        line,
        snap(arr, &[]),
        format!("Start: {name} {}", Value::ints(arr)),
    );
}

fn done(
    mut rec: StepRecorder,
    line: u32,
    arr: &[i64],
    operation: Operation,
    code: &'static [&'static str],
) -> StepSequence {
    rec.push(
        line,
        snap(arr, &[]).with("sorted", true),
        format!("Done: sorted array is {}", Value::ints(arr)),
    );
    rec.finish(Topic::Sorting, operation, code)
}

pub fn bubble_sort(params: &Params) -> Result<StepSequence, VizError> {
    let mut arr = params.input_or(&DEMO_ARRAY);
    let mut rec = StepRecorder::new();
    start(&mut rec, 2, "bubble sort", &arr);

    let n = arr.len();
    for i in 0..n.saturating_sub(1) {
        for j in 0..n - 1 - i {
            let out_of_order = arr[j] > arr[j + 1];
            rec.push_annotated(
                5,
                snap(&arr, &[j, j + 1]).with("i", i).with("j", j),
                format!(
                    "Compare arr[{j}] = {} with arr[{}] = {}",
                    arr[j],
                    j + 1,
                    arr[j + 1]
                ),
                Annotation::for_loop("j < n - 1 - i", j + 1),
            );
            if out_of_order {
                arr.swap(j, j + 1);
                rec.push(
                    6,
                    snap(&arr, &[j, j + 1]).with("i", i).with("j", j),
                    format!("Swap: {} moves right past {}", arr[j + 1], arr[j]),
                );
            }
        }
    }
    Ok(done(rec, 7, &arr, Operation::BubbleSort, BUBBLE))
}

pub fn selection_sort(params: &Params) -> Result<StepSequence, VizError> {
    let mut arr = params.input_or(&DEMO_ARRAY);
    let mut rec = StepRecorder::new();
    start(&mut rec, 1, "selection sort", &arr);

    let n = arr.len();
    for i in 0..n.saturating_sub(1) {
        let mut min = i;
        rec.push_annotated(
            3,
            snap(&arr, &[]).with("i", i).with("min", min),
            format!("Pass {}: assume the minimum is arr[{i}] = {}", i + 1, arr[i]),
            Annotation::for_loop("i < n - 1", i + 1),
        );
        for j in i + 1..n {
            let smaller = arr[j] < arr[min];
            rec.push_annotated(
                5,
                snap(&arr, &[j, min]).with("i", i).with("min", min),
                format!(
                    "Compare arr[{j}] = {} with current minimum {}: {}",
                    arr[j],
                    arr[min],
                    if smaller { "new minimum" } else { "keep" }
                ),
                Annotation::for_loop("j < n", j - i),
            );
            if smaller {
                min = j;
            }
        }
        let description = if min == i {
            format!("{} is already in place at index {i}", arr[i])
        } else {
            arr.swap(i, min);
            format!("Swap the minimum {} into index {i}", arr[i])
        };
        rec.push(6, snap(&arr, &[i, min]).with("i", i).with("min", min), description);
    }
    Ok(done(rec, 7, &arr, Operation::SelectionSort, SELECTION))
}

pub fn insertion_sort(params: &Params) -> Result<StepSequence, VizError> {
    let mut arr = params.input_or(&DEMO_ARRAY);
    let mut rec = StepRecorder::new();
    start(&mut rec, 1, "insertion sort", &arr);

    for i in 1..arr.len() {
        let key = arr[i];
        rec.push_annotated(
            3,
            snap(&arr, &[i]).with("key", key),
            format!("Pick key = arr[{i}] = {key}"),
            Annotation::for_loop("i < n", i),
        );
        let mut j = i;
        let mut shifts = 0;
        while j > 0 && arr[j - 1] > key {
            shifts += 1;
            arr.swap(j - 1, j);
            rec.push_annotated(
                5,
                snap(&arr, &[j - 1, j]).with("key", key),
                format!("{} > {key}: shift it right to index {j}", arr[j]),
                Annotation::while_loop("j >= 0 and arr[j] > key", shifts),
            );
            j -= 1;
        }
        if j > 0 {
            rec.push(
                4,
                snap(&arr, &[j - 1]).with("key", key),
                format!("{} <= {key}: stop shifting", arr[j - 1]),
            );
        }
        arr[j] = key;
        rec.push(
            6,
            snap(&arr, &[j]).with("key", key),
            format!("Place {key} at index {j}"),
        );
    }
    Ok(done(rec, 7, &arr, Operation::InsertionSort, INSERTION))
}

struct MergeSorter {
    arr: Vec<i64>,
    rec: StepRecorder,
}

impl MergeSorter {
    fn sort(&mut self, lo: usize, hi: usize, depth: usize) {
        if hi - lo <= 1 {
            return;
        }
        let mid = (lo + hi) / 2;
        self.rec.push_annotated(
            3,
            snap(&self.arr, &[]).with("range", &[lo, hi][..]),
            format!("Split [{lo}, {hi}) into [{lo}, {mid}) and [{mid}, {hi})"),
            Annotation::recursion(format!("mergeSort({lo}, {hi})"), depth),
        );
        self.sort(lo, mid, depth + 1);
        self.sort(mid, hi, depth + 1);
        self.merge(lo, mid, hi, depth);
    }

    fn merge(&mut self, lo: usize, mid: usize, hi: usize, depth: usize) {
        let left = self.arr[lo..mid].to_vec();
        let right = self.arr[mid..hi].to_vec();
        let (mut a, mut b, mut k) = (0, 0, lo);
        while a < left.len() && b < right.len() {
            let (taken, side) = if left[a] <= right[b] {
                a += 1;
                (left[a - 1], "left")
            } else {
                b += 1;
                (right[b - 1], "right")
            };
            self.arr[k] = taken;
            self.rec.push(
                8,
                snap(&self.arr, &[k]).with("range", &[lo, hi][..]),
                format!("Take {taken} from the {side} half into index {k}"),
            );
            k += 1;
        }
        let rest: Vec<i64> = left[a..].iter().chain(&right[b..]).copied().collect();
        if !rest.is_empty() {
            let from = k;
            for value in &rest {
                self.arr[k] = *value;
                k += 1;
            }
            self.rec.push(
                9,
                snap(&self.arr, &(from..k).collect::<Vec<_>>()).with("range", &[lo, hi][..]),
                format!("Copy the leftover {} into place", Value::ints(&rest)),
            );
        }
        self.rec.push_annotated(
            6,
            snap(&self.arr, &[]).with("range", &[lo, hi][..]),
            format!("Merged [{lo}, {hi}): {}", Value::ints(&self.arr[lo..hi])),
            Annotation::recursion(format!("mergeSort({lo}, {hi})"), depth),
        );
    }
}

pub fn merge_sort(params: &Params) -> Result<StepSequence, VizError> {
    let arr = params.input_or(&DEMO_ARRAY);
    let mut sorter = MergeSorter {
        arr,
        rec: StepRecorder::new(),
    };
    start(&mut sorter.rec, 1, "merge sort", &sorter.arr);
    let n = sorter.arr.len();
    sorter.sort(0, n, 1);
    Ok(done(sorter.rec, 1, &sorter.arr, Operation::MergeSort, MERGE))
}

struct QuickSorter {
    arr: Vec<i64>,
    rec: StepRecorder,
}

impl QuickSorter {
    /// Sort the inclusive range `lo..=hi`.
    fn sort(&mut self, lo: usize, hi: usize, depth: usize) {
        if lo >= hi {
            return;
        }
        let pivot = self.arr[hi];
        let call = format!("quickSort({lo}, {hi})");
        self.rec.push_annotated(
            3,
            snap(&self.arr, &[hi]).with("range", &[lo, hi][..]).with("pivot", pivot),
            format!("Partition [{lo}, {hi}] around pivot arr[{hi}] = {pivot}"),
            Annotation::recursion(call.clone(), depth),
        );

        let mut i = lo;
        for j in lo..hi {
            let smaller = self.arr[j] < pivot;
            let description = if smaller {
                self.arr.swap(i, j);
                let text = format!(
                    "{} < {pivot}: swap it into the low side at index {i}",
                    self.arr[i]
                );
                i += 1;
                text
            } else {
                format!("{} >= {pivot}: leave it on the high side", self.arr[j])
            };
            self.rec.push_annotated(
                5,
                snap(&self.arr, &[j, hi])
                    .with("range", &[lo, hi][..])
                    .with("pivot", pivot)
                    .with("boundary", i),
                description,
                Annotation::for_loop("j < hi", j - lo + 1),
            );
        }

        self.arr.swap(i, hi);
        self.rec.push_annotated(
            6,
            snap(&self.arr, &[i])
                .with("range", &[lo, hi][..])
                .with("pivot", pivot)
                .with("boundary", i),
            format!("Place pivot {pivot} at its final index {i}"),
            Annotation::recursion(call, depth),
        );

        if i > lo {
            self.sort(lo, i - 1, depth + 1);
        }
        if i < hi {
            self.sort(i + 1, hi, depth + 1);
        }
    }
}

pub fn quick_sort(params: &Params) -> Result<StepSequence, VizError> {
    let arr = params.input_or(&DEMO_ARRAY);
    let mut sorter = QuickSorter {
        arr,
        rec: StepRecorder::new(),
    };
    start(&mut sorter.rec, 1, "quick sort", &sorter.arr);
    if !sorter.arr.is_empty() {
        let hi = sorter.arr.len() - 1;
        sorter.sort(0, hi, 1);
    }
    Ok(done(sorter.rec, 1, &sorter.arr, Operation::QuickSort, QUICK))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [(fn(&Params) -> Result<StepSequence, VizError>, &str); 5] = [
        (bubble_sort, "bubble"),
        (selection_sort, "selection"),
        (insertion_sort, "insertion"),
        (merge_sort, "merge"),
        (quick_sort, "quick"),
    ];

    fn final_array(seq: &StepSequence) -> Vec<i64> {
        seq.last()
            .and_then(|s| s.snapshot.get("array"))
            .and_then(Value::as_ints)
            .unwrap()
    }

    #[test]
    fn test_every_sort_sorts_demo() {
        for (sort, name) in ALL {
            let seq = sort(&Params::default()).unwrap();
            assert_eq!(final_array(&seq), vec![1, 2, 3, 5, 8, 9], "{name}");
            assert_eq!(
                seq.last().unwrap().snapshot.get("sorted"),
                Some(&Value::Bool(true))
            );
        }
    }

    #[test]
    fn test_sorts_handle_duplicates_and_tiny_inputs() {
        for (sort, name) in ALL {
            for input in [vec![], vec![4], vec![3, 1, 3, 2, 1], vec![2, 2, 2]] {
                let mut expected = input.clone();
                expected.sort_unstable();
                let seq = sort(&Params::new().with_input(input.clone())).unwrap();
                assert_eq!(final_array(&seq), expected, "{name} on {input:?}");
            }
        }
    }

    #[test]
    fn test_in_place_sorts_only_permute() {
        let mut expected = DEMO_ARRAY.to_vec();
        expected.sort_unstable();
        // merge writes through a scratch copy, so its frames may repeat a value
        for (sort, name) in ALL.into_iter().filter(|(_, name)| *name != "merge") {
            for step in sort(&Params::default()).unwrap().steps() {
                let mut arr = step.snapshot.get("array").and_then(Value::as_ints).unwrap();
                arr.sort_unstable();
                assert_eq!(arr, expected, "{name} step {}", step.index);
            }
        }
    }

    #[test]
    fn test_bubble_sort_compares_every_adjacent_pair() {
        let seq = bubble_sort(&Params::new().with_input(vec![3, 2, 1])).unwrap();
        let compares = seq.steps().iter().filter(|s| s.source_line == 5).count();
        let swaps = seq.steps().iter().filter(|s| s.source_line == 6).count();
        assert_eq!(compares, 3);
        assert_eq!(swaps, 3);
    }

    #[test]
    fn test_quick_sort_annotates_recursion_depth() {
        let seq = quick_sort(&Params::default()).unwrap();
        let depths: Vec<usize> = seq
            .steps()
            .iter()
            .filter_map(|s| s.annotation.as_ref())
            .filter(|a| a.condition.starts_with("quickSort"))
            .map(|a| a.iteration)
            .collect();
        assert_eq!(depths.first(), Some(&1));
        assert!(depths.iter().all(|&d| d >= 1));
    }
}
