//! Step recording for replay
//!
//! A driver appends one [`Step`] per state transition through a [`Recorder`]
//! and ends with exactly one terminal step, producing a [`StepList`]. Each
//! step owns its data: the driver moves a fresh copy of its working state in,
//! so nothing a step holds can change after it is recorded.
//!
//! The recorder enforces a step cap, the same way an unbounded execution
//! history is bounded by a memory limit.

pub mod highlight;
pub mod state;

pub use highlight::{HighlightKind, Highlights, Mark};
pub use state::{Aux, FrontierKind, SearchOutcome, State};

use crate::drivers::errors::GenerateError;
use serde::{Deserialize, Serialize};

/// One immutable snapshot of an algorithm's execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub index: usize,
    pub state: State,
    #[serde(default)]
    pub highlights: Highlights,
    #[serde(default)]
    pub aux: Aux,
    pub annotation: String,
    pub terminal: bool,
}

/// Errors loading a serialized trace
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("malformed trace: {0}")]
    Json(#[from] serde_json::Error),

    #[error("trace is empty")]
    Empty,

    #[error("step at position {position} has index {index}")]
    OutOfOrder { position: usize, index: usize },

    #[error("trace must end with exactly one terminal step")]
    TerminalMisplaced,
}

/// The complete, ordered trace of one generation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StepList {
    steps: Vec<Step>,
}

impl StepList {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn at(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn annotations(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.annotation.as_str())
    }

    pub fn to_json(&self) -> Result<String, TraceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a trace, checking the index sequence and the terminal flag
    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        let steps: Vec<Step> = serde_json::from_str(json)?;
        Self::from_steps(steps)
    }

    fn from_steps(steps: Vec<Step>) -> Result<Self, TraceError> {
        if steps.is_empty() {
            return Err(TraceError::Empty);
        }
        for (position, step) in steps.iter().enumerate() {
            if step.index != position {
                return Err(TraceError::OutOfOrder {
                    position,
                    index: step.index,
                });
            }
            if step.terminal != (position + 1 == steps.len()) {
                return Err(TraceError::TerminalMisplaced);
            }
        }
        Ok(StepList { steps })
    }
}

impl<'de> Deserialize<'de> for StepList {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let steps = Vec::<Step>::deserialize(deserializer)?;
        StepList::from_steps(steps).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a StepList {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Append-only builder for a [`StepList`]
#[derive(Debug)]
pub struct Recorder {
    steps: Vec<Step>,
    max_steps: usize,
}

impl Recorder {
    pub fn new(max_steps: usize) -> Self {
        Recorder {
            steps: Vec::new(),
            max_steps,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Append a non-terminal step
    pub fn record(
        &mut self,
        state: State,
        highlights: Highlights,
        aux: Aux,
        annotation: impl Into<String>,
    ) -> Result<(), GenerateError> {
        self.push(state, highlights, aux, annotation.into(), false)
    }

    /// Append the terminal step and hand over the finished list
    pub fn finish(
        mut self,
        state: State,
        highlights: Highlights,
        aux: Aux,
        annotation: impl Into<String>,
    ) -> Result<StepList, GenerateError> {
        self.push(state, highlights, aux, annotation.into(), true)?;
        Ok(StepList { steps: self.steps })
    }

    fn push(
        &mut self,
        state: State,
        highlights: Highlights,
        aux: Aux,
        annotation: String,
        terminal: bool,
    ) -> Result<(), GenerateError> {
        if self.steps.len() >= self.max_steps {
            return Err(GenerateError::StepLimitExceeded {
                limit: self.max_steps,
            });
        }
        self.steps.push(Step {
            index: self.steps.len(),
            state,
            highlights,
            aux,
            annotation,
            terminal,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array_step(recorder: &mut Recorder, values: &[i64], note: &str) {
        recorder
            .record(State::Array(values.to_vec()), Highlights::new(), Aux::None, note)
            .unwrap();
    }

    #[test]
    fn test_indices_and_terminal_flag() {
        let mut recorder = Recorder::new(10);
        array_step(&mut recorder, &[2, 1], "start");
        array_step(&mut recorder, &[1, 2], "swap");
        let list = recorder
            .finish(State::Array(vec![1, 2]), Highlights::new(), Aux::None, "done")
            .unwrap();

        assert_eq!(list.len(), 3);
        for (i, step) in list.iter().enumerate() {
            assert_eq!(step.index, i);
            assert_eq!(step.terminal, i == 2);
        }
        assert_eq!(list.annotations().collect::<Vec<_>>(), ["start", "swap", "done"]);
    }

    #[test]
    fn test_step_limit() {
        let mut recorder = Recorder::new(2);
        array_step(&mut recorder, &[1], "a");
        array_step(&mut recorder, &[1], "b");
        let err = recorder
            .finish(State::Array(vec![1]), Highlights::new(), Aux::None, "c")
            .unwrap_err();
        assert!(matches!(err, GenerateError::StepLimitExceeded { limit: 2 }));
    }

    #[test]
    fn test_json_round_trip_and_validation() {
        let mut recorder = Recorder::new(10);
        recorder
            .record(
                State::Array(vec![3, 1]),
                Highlights::new().with(HighlightKind::Comparing, [Mark::Index(0), Mark::Index(1)]),
                Aux::Search {
                    target: 1,
                    outcome: SearchOutcome::Searching,
                },
                "compare",
            )
            .unwrap();
        let list = recorder
            .finish(State::Array(vec![1, 3]), Highlights::new(), Aux::None, "done")
            .unwrap();

        let json = list.to_json().unwrap();
        assert_eq!(StepList::from_json(&json).unwrap(), list);

        let mut steps: Vec<Step> = serde_json::from_str(&json).unwrap();
        steps.swap(0, 1);
        let reordered = serde_json::to_string(&steps).unwrap();
        assert!(matches!(
            StepList::from_json(&reordered),
            Err(TraceError::OutOfOrder { position: 0, index: 1 })
        ));

        assert!(matches!(StepList::from_json("[]"), Err(TraceError::Empty)));
        assert!(matches!(StepList::from_json("{"), Err(TraceError::Json(_))));
    }
}
