//! Searching driver
//!
//! Linear search records one step per index examined. Binary search records
//! one probe step per midpoint with the live `[left, right]` range; it sorts
//! unsorted input first and hands the sorted array back, since every index
//! in the trace refers to that array.
//!
//! A probe that hits the target is itself the terminal step. A miss ends
//! with a separate `not found` terminal step carrying no `range`.

use super::errors::GenerateError;
use super::GenerateOptions;
use crate::snapshot::{Aux, HighlightKind, Highlights, Mark, SearchOutcome, State, StepList};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SearchAlgorithm {
    Linear,
    Binary,
}

/// Result of a binary search run
#[derive(Debug, Clone, PartialEq)]
pub struct BinarySearch {
    pub steps: StepList,
    /// The array the search ran on (the input, sorted if it was not)
    pub sorted: Vec<i64>,
    /// Whether the input had to be sorted first
    pub resorted: bool,
    pub found: Option<usize>,
}

/// Parse a search target typed by a user
pub fn parse_target(input: &str) -> Result<i64, GenerateError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| GenerateError::NotANumber {
            input: input.to_string(),
        })
}

fn search_aux(target: i64, outcome: SearchOutcome) -> Aux {
    Aux::Search { target, outcome }
}

pub fn linear(
    values: &[i64],
    target: i64,
    options: &GenerateOptions,
) -> Result<StepList, GenerateError> {
    if values.is_empty() {
        return Err(GenerateError::EmptyInput);
    }

    let mut recorder = options.recorder();
    let state = || State::Array(values.to_vec());

    for (i, &value) in values.iter().enumerate() {
        let highlights = Highlights::new()
            .with(HighlightKind::Current, [Mark::Index(i)])
            .with(HighlightKind::Comparing, [Mark::Index(i)]);

        if value == target {
            let steps = recorder.finish(
                state(),
                highlights,
                search_aux(target, SearchOutcome::Found { index: i }),
                format!("a[{}] = {} matches target {}: found", i, value, target),
            )?;
            debug!(target, index = i, steps = steps.len(), "linear search found target");
            return Ok(steps);
        }

        recorder.record(
            state(),
            highlights,
            search_aux(target, SearchOutcome::Searching),
            format!("a[{}] = {} is not {}", i, value, target),
        )?;
    }

    let steps = recorder.finish(
        state(),
        Highlights::new(),
        search_aux(target, SearchOutcome::NotFound),
        format!("{} not found after checking {} values", target, values.len()),
    )?;
    debug!(target, steps = steps.len(), "linear search exhausted input");
    Ok(steps)
}

pub fn binary(
    values: &[i64],
    target: i64,
    options: &GenerateOptions,
) -> Result<BinarySearch, GenerateError> {
    if values.is_empty() {
        return Err(GenerateError::EmptyInput);
    }

    let resorted = !values.windows(2).all(|w| w[0] <= w[1]);
    let mut sorted = values.to_vec();
    if resorted {
        sorted.sort();
    }

    let mut recorder = options.recorder();
    let state = |sorted: &[i64]| State::Array(sorted.to_vec());

    // Signed bounds so `right` can drop below `left` at index 0
    let mut left: isize = 0;
    let mut right: isize = sorted.len() as isize - 1;

    while left <= right {
        let mid = (left + (right - left) / 2) as usize;
        let value = sorted[mid];
        let highlights = Highlights::new()
            .with(HighlightKind::Current, [Mark::Index(mid)])
            .with(
                HighlightKind::Range,
                (left as usize..=right as usize).map(Mark::Index),
            );

        if value == target {
            let steps = recorder.finish(
                state(&sorted),
                highlights,
                search_aux(target, SearchOutcome::Found { index: mid }),
                format!("a[{}] = {} matches target {}: found", mid, value, target),
            )?;
            debug!(
                target,
                index = mid,
                resorted,
                steps = steps.len(),
                "binary search found target"
            );
            return Ok(BinarySearch {
                steps,
                sorted,
                resorted,
                found: Some(mid),
            });
        }

        let note = if value < target {
            format!("a[{}] = {} < {}: search right half", mid, value, target)
        } else {
            format!("a[{}] = {} > {}: search left half", mid, value, target)
        };
        recorder.record(
            state(&sorted),
            highlights,
            search_aux(target, SearchOutcome::Searching),
            note,
        )?;

        if value < target {
            left = mid as isize + 1;
        } else {
            right = mid as isize - 1;
        }
    }

    let steps = recorder.finish(
        state(&sorted),
        Highlights::new(),
        search_aux(target, SearchOutcome::NotFound),
        format!("{} not found: range is empty", target),
    )?;
    debug!(target, resorted, steps = steps.len(), "binary search exhausted range");
    Ok(BinarySearch {
        steps,
        sorted,
        resorted,
        found: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(steps: &StepList) -> SearchOutcome {
        match &steps.last().unwrap().aux {
            Aux::Search { outcome, .. } => *outcome,
            other => panic!("unexpected aux {:?}", other),
        }
    }

    #[test]
    fn test_linear_found_and_missing() {
        let opts = GenerateOptions::default();
        let steps = linear(&[4, 8, 15, 16], 15, &opts).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(outcome(&steps), SearchOutcome::Found { index: 2 });
        assert!(steps.last().unwrap().highlights.contains(HighlightKind::Current, Mark::Index(2)));

        let steps = linear(&[4, 8], 99, &opts).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(outcome(&steps), SearchOutcome::NotFound);
        let last = steps.last().unwrap();
        assert!(last.terminal);
        assert!(last.highlights.get(HighlightKind::Range).is_none());
    }

    #[test]
    fn test_binary_search_probes() {
        let result = binary(&[1, 3, 5, 7, 9, 11, 13], 11, &GenerateOptions::default()).unwrap();
        assert!(!result.resorted);
        assert_eq!(result.found, Some(5));
        let probes: Vec<_> = result
            .steps
            .iter()
            .map(|s| s.highlights.get(HighlightKind::Current).cloned())
            .collect();
        assert_eq!(probes.len(), 2);
        assert!(result
            .steps
            .at(0)
            .unwrap()
            .highlights
            .contains(HighlightKind::Current, Mark::Index(3)));
        assert_eq!(result.steps.at(0).unwrap().highlights.count(HighlightKind::Range), 7);
        assert_eq!(result.steps.at(1).unwrap().highlights.count(HighlightKind::Range), 3);
    }

    #[test]
    fn test_binary_search_sorts_unsorted_input() {
        let result = binary(&[9, 2, 7, 4], 2, &GenerateOptions::default()).unwrap();
        assert!(result.resorted);
        assert_eq!(result.sorted, vec![2, 4, 7, 9]);
        assert_eq!(result.found, Some(0));
        assert_eq!(
            result.steps.last().unwrap().state.as_array(),
            Some(&[2, 4, 7, 9][..])
        );
    }

    #[test]
    fn test_binary_search_miss_below_first() {
        let result = binary(&[5, 6, 7], 1, &GenerateOptions::default()).unwrap();
        assert_eq!(result.found, None);
        assert_eq!(outcome(&result.steps), SearchOutcome::NotFound);
        assert!(result.steps.last().unwrap().highlights.is_empty());
    }

    #[test]
    fn test_validation() {
        let opts = GenerateOptions::default();
        assert_eq!(linear(&[], 1, &opts).unwrap_err(), GenerateError::EmptyInput);
        assert_eq!(binary(&[], 1, &opts).unwrap_err(), GenerateError::EmptyInput);
        assert_eq!(parse_target(" 12 "), Ok(12));
        assert!(matches!(parse_target("twelve"), Err(GenerateError::NotANumber { .. })));
    }
}
