//! Replay cursor over a finished trace
//!
//! [`Player`] holds a [`StepList`] and a position into it. Moving the
//! position never re-runs a driver: going back to step `k` shows exactly the
//! step recorded at `k`.

use crate::snapshot::{Step, StepList};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    #[error("already at the first step")]
    AtStart,

    #[error("already at the last step")]
    AtEnd,

    #[error("step {index} is out of range (trace has {len} steps)")]
    OutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone)]
pub struct Player {
    steps: StepList,
    position: usize,
}

impl Player {
    /// Start at the first step
    pub fn new(steps: StepList) -> Self {
        Player { steps, position: 0 }
    }

    pub fn steps(&self) -> &StepList {
        &self.steps
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a player built from a valid trace
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The step at the current position
    pub fn current(&self) -> Option<&Step> {
        self.steps.at(self.position)
    }

    pub fn is_at_start(&self) -> bool {
        self.position == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.position + 1 >= self.steps.len()
    }

    /// Move one step forward; the position is unchanged on error
    pub fn step_forward(&mut self) -> Result<&Step, PlaybackError> {
        if self.is_at_end() {
            return Err(PlaybackError::AtEnd);
        }
        self.position += 1;
        self.current().ok_or(PlaybackError::AtEnd)
    }

    /// Move one step back; the position is unchanged on error
    pub fn step_backward(&mut self) -> Result<&Step, PlaybackError> {
        if self.is_at_start() {
            return Err(PlaybackError::AtStart);
        }
        self.position -= 1;
        self.current().ok_or(PlaybackError::AtStart)
    }

    pub fn seek(&mut self, index: usize) -> Result<&Step, PlaybackError> {
        if index >= self.steps.len() {
            return Err(PlaybackError::OutOfRange {
                index,
                len: self.steps.len(),
            });
        }
        self.position = index;
        self.current().ok_or(PlaybackError::OutOfRange {
            index,
            len: self.steps.len(),
        })
    }

    pub fn rewind_to_start(&mut self) {
        self.position = 0;
    }

    pub fn jump_to_end(&mut self) {
        self.position = self.steps.len().saturating_sub(1);
    }

    /// Step forward up to `count` times, stopping at the end.
    /// Returns how many steps were taken.
    pub fn advance(&mut self, count: usize) -> usize {
        let target = self
            .position
            .saturating_add(count)
            .min(self.steps.len().saturating_sub(1));
        let taken = target - self.position;
        self.position = target;
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::sorting::{self, SortAlgorithm};
    use crate::drivers::GenerateOptions;

    fn player() -> Player {
        let steps =
            sorting::generate(SortAlgorithm::Bubble, &[3, 1, 2], &GenerateOptions::default())
                .unwrap();
        Player::new(steps)
    }

    #[test]
    fn test_bounds_leave_position_unchanged() {
        let mut p = player();
        assert!(p.is_at_start());
        assert_eq!(p.step_backward().unwrap_err(), PlaybackError::AtStart);
        assert_eq!(p.position(), 0);

        p.jump_to_end();
        assert!(p.is_at_end());
        let end = p.position();
        assert_eq!(p.step_forward().unwrap_err(), PlaybackError::AtEnd);
        assert_eq!(p.position(), end);
        assert!(p.current().unwrap().terminal);
    }

    #[test]
    fn test_seek_and_advance() {
        let mut p = player();
        let len = p.len();
        assert_eq!(p.seek(2).unwrap().index, 2);
        assert_eq!(
            p.seek(len).unwrap_err(),
            PlaybackError::OutOfRange { index: len, len }
        );
        assert_eq!(p.position(), 2);

        assert_eq!(p.advance(1000), len - 3);
        assert!(p.is_at_end());
        assert_eq!(p.advance(1), 0);

        p.rewind_to_start();
        assert_eq!(p.current().unwrap().index, 0);
    }

    #[test]
    fn test_advance_saturates_at_end() {
        let mut p = player();
        p.step_forward().unwrap();
        let remaining = p.len() - 2;
        assert_eq!(p.advance(usize::MAX), remaining);
        assert!(p.is_at_end());
        assert_eq!(p.advance(usize::MAX), 0);
        assert_eq!(p.position(), p.len() - 1);
    }

    #[test]
    fn test_back_and_forth_shows_same_step() {
        let mut p = player();
        p.step_forward().unwrap();
        p.step_forward().unwrap();
        let there = p.current().unwrap().clone();
        p.step_backward().unwrap();
        p.step_forward().unwrap();
        assert_eq!(p.current().unwrap(), &there);
    }
}
