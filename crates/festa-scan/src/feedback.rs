//! # Feedback Sink
//!
//! Operator feedback rendered after every scan outcome: visual state, a
//! short tone (distinct pitch for success vs failure), haptics where the
//! hardware supports them, and the input-field reset that returns focus to
//! the capture field.
//!
//! Feedback always renders after the network call resolves, never before -
//! the engine enforces that ordering, this trait just receives the calls.

use festa_core::SubmissionResult;

/// Where scan feedback goes (implemented by the station binary; tests use
/// [`NoOpFeedback`] or a recording sink).
pub trait FeedbackSink: Send {
    /// Renders a submission outcome: color-coded status plus the item
    /// payload on success.
    fn result(&self, result: &SubmissionResult);

    /// Renders a neutral instruction (pending stored, waiter activated,
    /// pending expired/cleared).
    fn neutral(&self, message: &str);

    /// Renders a transient mid-capture hint ("adjust your aim").
    fn hint(&self, message: &str);

    /// Plays the success or failure tone.
    fn tone(&self, ok: bool);

    /// Triggers a haptic pulse where supported.
    fn haptic(&self, ok: bool);

    /// Clears the scan input field and returns focus to it.
    fn input_reset(&self);
}

/// No-op sink for tests and headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpFeedback;

impl FeedbackSink for NoOpFeedback {
    fn result(&self, _result: &SubmissionResult) {}
    fn neutral(&self, _message: &str) {}
    fn hint(&self, _message: &str) {}
    fn tone(&self, _ok: bool) {}
    fn haptic(&self, _ok: bool) {}
    fn input_reset(&self) {}
}
