//! Sorting driver
//!
//! Every comparison records a `comparing` step; a comparison that leads to
//! a mutation is followed by a `swapping` step showing the array after the
//! change (merge sort writes one index at a time instead of swapping).
//! Comparisons are strict, so equal elements are never exchanged.
//!
//! Merge sort tags its steps with the `range` being merged, quicksort with
//! the `pivot` and the partition `range`, heap sort with the live heap
//! `range`.

use super::errors::GenerateError;
use super::GenerateOptions;
use crate::snapshot::{Aux, HighlightKind, Highlights, Mark, Recorder, State, StepList};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortAlgorithm {
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
    Heap,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 6] = [
        SortAlgorithm::Bubble,
        SortAlgorithm::Selection,
        SortAlgorithm::Insertion,
        SortAlgorithm::Merge,
        SortAlgorithm::Quick,
        SortAlgorithm::Heap,
    ];
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortAlgorithm::Bubble => "bubble sort",
            SortAlgorithm::Selection => "selection sort",
            SortAlgorithm::Insertion => "insertion sort",
            SortAlgorithm::Merge => "merge sort",
            SortAlgorithm::Quick => "quicksort",
            SortAlgorithm::Heap => "heap sort",
        };
        f.write_str(name)
    }
}

/// Sort `values` ascending with `algorithm`, recording every comparison
/// and mutation
pub fn generate(
    algorithm: SortAlgorithm,
    values: &[i64],
    options: &GenerateOptions,
) -> Result<StepList, GenerateError> {
    if values.is_empty() {
        return Err(GenerateError::EmptyInput);
    }

    let mut run = SortRun {
        values: values.to_vec(),
        recorder: options.recorder(),
        context: Highlights::new(),
    };
    run.record(Highlights::new(), format!("Initial array for {}", algorithm))?;

    match algorithm {
        SortAlgorithm::Bubble => bubble(&mut run)?,
        SortAlgorithm::Selection => selection(&mut run)?,
        SortAlgorithm::Insertion => insertion(&mut run)?,
        SortAlgorithm::Merge => {
            let last = run.values.len() - 1;
            merge_sort(&mut run, 0, last)?
        }
        SortAlgorithm::Quick => {
            let last = run.values.len() - 1;
            quick_sort(&mut run, 0, last)?
        }
        SortAlgorithm::Heap => heap_sort(&mut run)?,
    }

    let SortRun {
        values, recorder, ..
    } = run;
    let count = values.len();
    let steps = recorder.finish(
        State::Array(values),
        Highlights::new(),
        Aux::None,
        format!("Sorted {} values", count),
    )?;
    debug!(%algorithm, len = count, steps = steps.len(), "generated sort trace");
    Ok(steps)
}

/// Working array plus the recorder it is snapshotted into
struct SortRun {
    values: Vec<i64>,
    recorder: Recorder,
    /// Highlights added to every step (active range, pivot)
    context: Highlights,
}

impl SortRun {
    fn record(&mut self, highlights: Highlights, annotation: String) -> Result<(), GenerateError> {
        let mut merged = self.context.clone();
        for (kind, marks) in highlights.iter() {
            merged = merged.with(kind, marks.iter().copied());
        }
        self.recorder
            .record(State::Array(self.values.clone()), merged, Aux::None, annotation)
    }

    fn compare(&mut self, i: usize, j: usize) -> Result<(), GenerateError> {
        let note = format!(
            "Compare a[{}] = {} with a[{}] = {}",
            i, self.values[i], j, self.values[j]
        );
        self.record(
            Highlights::new().with(HighlightKind::Comparing, [Mark::Index(i), Mark::Index(j)]),
            note,
        )
    }

    fn swap(&mut self, i: usize, j: usize) -> Result<(), GenerateError> {
        self.values.swap(i, j);
        let note = format!(
            "Swap indices {} and {}: now {} and {}",
            i, j, self.values[i], self.values[j]
        );
        self.record(
            Highlights::new().with(HighlightKind::Swapping, [Mark::Index(i), Mark::Index(j)]),
            note,
        )
    }

    fn write(&mut self, index: usize, value: i64) -> Result<(), GenerateError> {
        self.values[index] = value;
        self.record(
            Highlights::new().with(HighlightKind::Swapping, [Mark::Index(index)]),
            format!("Write {} at index {}", value, index),
        )
    }

    fn range(lo: usize, hi: usize) -> impl Iterator<Item = Mark> {
        (lo..=hi).map(Mark::Index)
    }
}

fn bubble(run: &mut SortRun) -> Result<(), GenerateError> {
    let n = run.values.len();
    for pass in 0..n.saturating_sub(1) {
        let mut swapped = false;
        for j in 0..n - 1 - pass {
            run.compare(j, j + 1)?;
            if run.values[j] > run.values[j + 1] {
                run.swap(j, j + 1)?;
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
    Ok(())
}

fn selection(run: &mut SortRun) -> Result<(), GenerateError> {
    let n = run.values.len();
    for i in 0..n {
        let mut min = i;
        for j in i + 1..n {
            run.compare(min, j)?;
            if run.values[j] < run.values[min] {
                min = j;
            }
        }
        if min != i {
            run.swap(i, min)?;
        }
    }
    Ok(())
}

fn insertion(run: &mut SortRun) -> Result<(), GenerateError> {
    for i in 1..run.values.len() {
        let mut j = i;
        while j > 0 {
            run.compare(j - 1, j)?;
            if run.values[j - 1] > run.values[j] {
                run.swap(j - 1, j)?;
                j -= 1;
            } else {
                break;
            }
        }
    }
    Ok(())
}

fn merge_sort(run: &mut SortRun, lo: usize, hi: usize) -> Result<(), GenerateError> {
    if lo >= hi {
        return Ok(());
    }
    let mid = lo + (hi - lo) / 2;
    merge_sort(run, lo, mid)?;
    merge_sort(run, mid + 1, hi)?;
    merge(run, lo, mid, hi)
}

fn merge(run: &mut SortRun, lo: usize, mid: usize, hi: usize) -> Result<(), GenerateError> {
    run.context = Highlights::new().with(HighlightKind::Range, SortRun::range(lo, hi));
    run.record(
        Highlights::new(),
        format!("Merge [{}, {}] with [{}, {}]", lo, mid, mid + 1, hi),
    )?;

    let left = run.values[lo..=mid].to_vec();
    let right = run.values[mid + 1..=hi].to_vec();
    let (mut i, mut j, mut k) = (0, 0, lo);

    while i < left.len() && j < right.len() {
        run.record(
            Highlights::new().with(
                HighlightKind::Comparing,
                [Mark::Index(lo + i), Mark::Index(mid + 1 + j)],
            ),
            format!("Compare {} (left) with {} (right)", left[i], right[j]),
        )?;
        // Taking from the left on ties keeps the sort stable
        if right[j] < left[i] {
            run.write(k, right[j])?;
            j += 1;
        } else {
            run.write(k, left[i])?;
            i += 1;
        }
        k += 1;
    }
    for &value in left[i..].iter().chain(&right[j..]) {
        run.write(k, value)?;
        k += 1;
    }

    run.context = Highlights::new();
    Ok(())
}

fn quick_sort(run: &mut SortRun, lo: usize, hi: usize) -> Result<(), GenerateError> {
    if lo >= hi {
        return Ok(());
    }
    let p = partition(run, lo, hi)?;
    if p > lo {
        quick_sort(run, lo, p - 1)?;
    }
    quick_sort(run, p + 1, hi)
}

/// Lomuto partition around `values[hi]`; returns the pivot's final index
fn partition(run: &mut SortRun, lo: usize, hi: usize) -> Result<usize, GenerateError> {
    let pivot = run.values[hi];
    run.context = Highlights::new()
        .with(HighlightKind::Pivot, [Mark::Index(hi)])
        .with(HighlightKind::Range, SortRun::range(lo, hi));
    run.record(
        Highlights::new(),
        format!("Partition [{}, {}] around pivot {}", lo, hi, pivot),
    )?;

    let mut store = lo;
    for j in lo..hi {
        run.compare(j, hi)?;
        if run.values[j] < pivot {
            if store != j {
                run.swap(store, j)?;
            }
            store += 1;
        }
    }
    if store != hi {
        run.compare(store, hi)?;
        if run.values[store] > pivot {
            run.swap(store, hi)?;
        }
    }

    run.context = Highlights::new();
    Ok(store)
}

fn heap_sort(run: &mut SortRun) -> Result<(), GenerateError> {
    let n = run.values.len();
    run.context = Highlights::new().with(HighlightKind::Range, SortRun::range(0, n - 1));
    for root in (0..n / 2).rev() {
        sift_down(run, root, n)?;
    }
    for end in (1..n).rev() {
        run.compare(0, end)?;
        if run.values[0] > run.values[end] {
            run.swap(0, end)?;
        }
        run.context = Highlights::new().with(HighlightKind::Range, SortRun::range(0, end - 1));
        sift_down(run, 0, end)?;
    }
    run.context = Highlights::new();
    Ok(())
}

fn sift_down(run: &mut SortRun, mut root: usize, len: usize) -> Result<(), GenerateError> {
    loop {
        let left = 2 * root + 1;
        if left >= len {
            return Ok(());
        }
        let mut largest = root;
        run.compare(left, largest)?;
        if run.values[left] > run.values[largest] {
            largest = left;
        }
        let right = left + 1;
        if right < len {
            run.compare(right, largest)?;
            if run.values[right] > run.values[largest] {
                largest = right;
            }
        }
        if largest == root {
            return Ok(());
        }
        run.swap(root, largest)?;
        root = largest;
    }
}
