// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click suppression after a drag.
//!
//! Browsers (and most toolkits that mimic them) emit a `click` when a pointer
//! is released over the element it was pressed on. After a drag, that click is
//! almost never what the user meant: the handle was grabbed to move it, not to
//! activate it.
//!
//! [`ClickSuppression`] models the window during which such a click should be
//! swallowed. It is armed when a drag that actually moved ends, and it
//! consumes at most one click. The window also closes on its own once
//! `duration` milliseconds have passed.
//!
//! ## Usage
//!
//! ```
//! use understory_event_state::click::{ClickResult, ClickSuppression};
//!
//! let mut suppression = ClickSuppression::new(250);
//!
//! // A drag ended at t = 1000ms.
//! suppression.arm(1000);
//!
//! // The click the browser synthesizes right after release is eaten...
//! assert_eq!(suppression.on_click(1010), ClickResult::Suppressed);
//! // ...and only that one.
//! assert_eq!(suppression.on_click(1020), ClickResult::Passed);
//! ```
//!
//! ## Rules
//!
//! 1. **Not armed**: every click passes.
//! 2. **Armed, within the window**: the click is suppressed and the window closes.
//! 3. **Armed, window elapsed**: the click passes and the window closes.
//! 4. **Re-arming** restarts the window from the new timestamp.
//!
//! The window is inclusive: a click exactly `duration` milliseconds after
//! arming is still suppressed.

/// Result of offering a click to a [`ClickSuppression`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickResult {
    /// The click should be cancelled (prevent default, stop propagation).
    Suppressed,
    /// The click should be delivered normally.
    Passed,
}

/// A one-shot click suppression window.
#[derive(Clone, Copy, Debug)]
pub struct ClickSuppression {
    /// Window length in milliseconds.
    pub duration: u64,
    /// Timestamp the window was armed at.
    armed_at: Option<u64>,
}

impl ClickSuppression {
    /// Create a disarmed window of `duration` milliseconds.
    pub const fn new(duration: u64) -> Self {
        Self {
            duration,
            armed_at: None,
        }
    }

    /// Open the window at `now` (milliseconds).
    pub fn arm(&mut self, now: u64) {
        self.armed_at = Some(now);
    }

    /// Close the window without consuming a click.
    ///
    /// Returns `true` if it was open.
    pub fn disarm(&mut self) -> bool {
        self.armed_at.take().is_some()
    }

    /// Offer a click observed at `now`.
    pub fn on_click(&mut self, now: u64) -> ClickResult {
        let Some(armed_at) = self.armed_at.take() else {
            return ClickResult::Passed;
        };
        if now.saturating_sub(armed_at) <= self.duration {
            ClickResult::Suppressed
        } else {
            ClickResult::Passed
        }
    }

    /// `true` if the window is open at `now`.
    pub fn is_armed(&self, now: u64) -> bool {
        self.armed_at
            .is_some_and(|armed_at| now.saturating_sub(armed_at) <= self.duration)
    }

    /// Timestamp of the open window, if any.
    pub fn armed_at(&self) -> Option<u64> {
        self.armed_at
    }
}

impl Default for ClickSuppression {
    /// 250ms window.
    fn default() -> Self {
        Self::new(250)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disarmed_passes_clicks() {
        let mut suppression = ClickSuppression::new(100);
        assert_eq!(suppression.on_click(0), ClickResult::Passed);
        assert!(!suppression.is_armed(0));
    }

    #[test]
    fn armed_suppresses_one_click() {
        let mut suppression = ClickSuppression::new(100);
        suppression.arm(1000);

        assert!(suppression.is_armed(1050));
        assert_eq!(suppression.on_click(1050), ClickResult::Suppressed);
        assert_eq!(suppression.on_click(1060), ClickResult::Passed);
        assert_eq!(suppression.armed_at(), None);
    }

    #[test]
    fn window_is_inclusive() {
        let mut suppression = ClickSuppression::new(100);
        suppression.arm(1000);
        assert_eq!(suppression.on_click(1100), ClickResult::Suppressed);
    }

    #[test]
    fn elapsed_window_passes_and_closes() {
        let mut suppression = ClickSuppression::new(100);
        suppression.arm(1000);

        assert!(!suppression.is_armed(1200));
        assert_eq!(suppression.on_click(1200), ClickResult::Passed);
        assert_eq!(suppression.armed_at(), None);
    }

    #[test]
    fn rearming_restarts_window() {
        let mut suppression = ClickSuppression::new(100);
        suppression.arm(1000);
        suppression.arm(2000);
        assert_eq!(suppression.on_click(2090), ClickResult::Suppressed);
    }

    #[test]
    fn disarm_reports_open_window() {
        let mut suppression = ClickSuppression::default();
        assert!(!suppression.disarm());
        suppression.arm(5);
        assert!(suppression.disarm());
        assert_eq!(suppression.on_click(6), ClickResult::Passed);
    }

    #[test]
    fn clock_going_backwards_counts_as_within_window() {
        let mut suppression = ClickSuppression::new(100);
        suppression.arm(1000);
        assert_eq!(suppression.on_click(900), ClickResult::Suppressed);
    }
}
