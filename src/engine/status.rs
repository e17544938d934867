//! Success/failure tag returned by graph mutators.
//!
//! Graph wiring operations never abort: a duplicate insert or an already
//! existing connection is reported back to the caller, who is free to ignore
//! it. `Status` carries that outcome explicitly, with an optional diagnostic,
//! instead of collapsing it into a bare `bool`.

use std::fmt;

/// Outcome of a graph mutation.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// The mutation was applied in full.
    Success,
    /// The mutation was rejected or only partially applied.
    Failure { reason: Option<String> },
}

impl Status {
    /// A failure with a diagnostic message.
    pub fn failure(reason: impl Into<String>) -> Self {
        Status::Failure { reason: Some(reason.into()) }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The diagnostic attached to a failure, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Status::Success => None,
            Status::Failure { reason } => reason.as_deref(),
        }
    }

    /// Combines two outcomes: the first failure wins.
    pub fn and(self, other: Status) -> Status {
        match self {
            Status::Success => other,
            failure => failure,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Success
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "success"),
            Status::Failure { reason: Some(r) } => write!(f, "failure: {}", r),
            Status::Failure { reason: None } => write!(f, "failure"),
        }
    }
}
