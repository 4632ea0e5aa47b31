//! Step-recording algorithm drivers
//!
//! Each driver runs a real algorithm to completion and records a [`Step`]
//! per meaningful state transition:
//!
//! - [`sorting`]: bubble, selection, insertion, merge, quick and heap sort
//! - [`searching`]: linear and binary search
//! - [`traversal`]: breadth-first and depth-first graph traversal
//! - [`dijkstra`]: single-source shortest paths with path reconstruction
//! - [`mst`]: Prim's and Kruskal's minimum spanning trees
//! - [`avl`]: AVL insert/delete with rotations
//! - [`errors`]: input validation errors
//!
//! # Generation Model
//!
//! Generation is synchronous and deterministic: the same input and options
//! always give the same trace. Input is validated before the first step, so
//! a failed call never yields a partial trace.
//!
//! [`Step`]: crate::snapshot::Step

pub mod avl;
pub mod dijkstra;
pub mod errors;
pub mod mst;
pub mod searching;
pub mod sorting;
pub mod traversal;

use crate::snapshot::Recorder;
use errors::GenerateError;
use serde::{Deserialize, Serialize};

/// Default cap on the number of steps a single generation may record
pub const DEFAULT_MAX_STEPS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub max_steps: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl GenerateOptions {
    pub(crate) fn recorder(&self) -> Recorder {
        Recorder::new(self.max_steps)
    }
}

/// Parse a comma- or whitespace-separated list of integers
pub fn parse_values(input: &str) -> Result<Vec<i64>, GenerateError> {
    let values = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| GenerateError::NotANumber {
                input: s.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.is_empty() {
        return Err(GenerateError::EmptyInput);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values() {
        assert_eq!(parse_values("5, 3 4,1  2").unwrap(), vec![5, 3, 4, 1, 2]);
        assert_eq!(parse_values("-7").unwrap(), vec![-7]);
        assert_eq!(parse_values(" , ").unwrap_err(), GenerateError::EmptyInput);
        assert_eq!(
            parse_values("1,x,3").unwrap_err(),
            GenerateError::NotANumber {
                input: "x".to_string()
            }
        );
    }
}
