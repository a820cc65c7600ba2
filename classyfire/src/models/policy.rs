//! Batch behavior policies

use crate::error::ClassyFireError;
use std::fmt;
use std::str::FromStr;

/// What to do when the service returns an empty classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyClassificationPolicy {
    /// Fail with the kind-specific empty error and stop the batch
    Raise,
    /// Defer to a single retry pass after the first pass completes
    #[default]
    RetryLast,
    /// Cache and emit the empty classification as is
    Accept,
}

impl EmptyClassificationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmptyClassificationPolicy::Raise => "raise",
            EmptyClassificationPolicy::RetryLast => "retry-last",
            EmptyClassificationPolicy::Accept => "accept",
        }
    }
}

impl FromStr for EmptyClassificationPolicy {
    type Err = ClassyFireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raise" => Ok(EmptyClassificationPolicy::Raise),
            "retry-last" => Ok(EmptyClassificationPolicy::RetryLast),
            "accept" => Ok(EmptyClassificationPolicy::Accept),
            other => Err(ClassyFireError::Config(format!(
                "Invalid behavior on empty classification '{}'. Allowed values are 'raise', 'retry-last' and 'accept'",
                other
            ))),
        }
    }
}

impl fmt::Display for EmptyClassificationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when a single identifier's request fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Emit the error and end the batch
    #[default]
    Abort,
    /// Emit the error in the identifier's slot and keep going
    Skip,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicy::Abort => "abort",
            FailurePolicy::Skip => "skip",
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = ClassyFireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(ClassyFireError::Config(format!(
                "Invalid behavior on request failure '{}'. Allowed values are 'abort' and 'skip'",
                other
            ))),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
