//! Workflow progress types

use serde::{Deserialize, Serialize};

/// Which of the two registry mutations a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    Register,
    Record,
}

/// Step of the registration workflow.
///
/// `Idle -> Validating -> AwaitingSignature(Register) -> Confirming(Register)
/// -> AwaitingSignature(Record) -> Confirming(Record) -> Refreshing -> Idle`,
/// with `Failed` reachable from every step before `Refreshing`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "detail", rename_all = "snake_case")]
pub enum RegistrationStep {
    #[default]
    Idle,
    Validating,
    AwaitingSignature(TxKind),
    Confirming(TxKind),
    Refreshing,
    Failed(String),
}

/// Coarse status exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Idle,
    InProgress,
    Failed,
}

impl RegistrationStep {
    pub fn status(&self) -> WorkflowStatus {
        match self {
            Self::Idle => WorkflowStatus::Idle,
            Self::Failed(_) => WorkflowStatus::Failed,
            _ => WorkflowStatus::InProgress,
        }
    }
}
