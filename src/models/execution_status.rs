use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall execution status derived from the states of all nodes.
///
/// Status is represented as a closed enum at every boundary; string forms
/// exist only at serialization and parsing. A caller can never observe a
/// status outside these five members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// No node has produced any state yet
    Idle,
    /// Execution has been prepared upstream but no node has started
    Initializing,
    /// At least one node is actively executing
    Running,
    /// Every node completed successfully
    Completed,
    /// At least one node failed
    Error,
}

impl ExecutionStatus {
    /// Check if this is a terminal status (subsequent calls may still
    /// change it if upstream node data is later mutated)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Check if this is the error status
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Check if the execution is actively being processed
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Initializing => write!(f, "initializing"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "initializing" => Ok(Self::Initializing),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "error" => Ok(Self::Error),
            _ => Err(format!("Invalid execution status: {s}")),
        }
    }
}

/// Default status for executions with no observed node state
impl Default for ExecutionStatus {
    fn default() -> Self {
        Self::Idle
    }
}
