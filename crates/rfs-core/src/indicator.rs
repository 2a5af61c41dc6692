//! Progress indicator boundary: the presentation layer that shows one entry per attempt.
//!
//! The core only describes state; rendering (terminal, desktop notification,
//! GUI) belongs to the implementor.

use std::fmt;

use crate::subject::SubjectId;

/// Key of one indicator entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndicatorId(pub u64);

impl From<SubjectId> for IndicatorId {
    fn from(id: SubjectId) -> Self {
        IndicatorId(id.0)
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorIcon {
    #[default]
    Downloading,
    Done,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorProgress {
    /// No bar.
    #[default]
    Hidden,
    /// Activity without a known total.
    Indeterminate,
    Determinate { current: u64, max: u64 },
}

/// Follow-up action attached to a terminal indicator (e.g. "install now").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorAction {
    pub label: String,
    /// Opaque command the presentation layer dispatches when the action is chosen.
    pub command: String,
}

impl IndicatorAction {
    pub fn new(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            command: command.into(),
        }
    }
}

/// Full visible state of one indicator entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndicatorState {
    pub title: String,
    pub text: String,
    pub progress: IndicatorProgress,
    pub icon: IndicatorIcon,
    /// Still running; the user cannot dismiss it.
    pub ongoing: bool,
    /// Removed once the user interacts with it.
    pub auto_dismiss: bool,
    pub actions: Vec<IndicatorAction>,
}

impl IndicatorState {
    /// Initial state for a freshly started attempt.
    pub fn started(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            progress: IndicatorProgress::Indeterminate,
            ongoing: true,
            ..Self::default()
        }
    }
}

/// Presentation capability. Every method may be called from a blocking I/O thread.
pub trait ProgressIndicator: Send + Sync {
    fn create(&self, id: IndicatorId, state: IndicatorState);

    /// Mutate the live state of `id` in place.
    fn update(&self, id: IndicatorId, mutate: &dyn Fn(&mut IndicatorState));

    /// Move `id` into a terminal state. Returns the id the terminal entry lives
    /// under, which may differ from `id` if the implementation reposts it.
    fn finalize(&self, id: IndicatorId, state: IndicatorState) -> IndicatorId;
}
