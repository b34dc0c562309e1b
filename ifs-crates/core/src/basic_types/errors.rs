use enumset::EnumSet;
use thiserror::Error;

use crate::assignment::ChangeStep;
use crate::model::VariableId;

/// A failure reported by a collaborator of an assignment: a storage backend, a constraint, or a
/// model or variable listener.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The collaborator refuses the change, e.g. a hard constraint which does not allow the value.
    #[error("{name} rejected the change of {variable}: {reason}")]
    Rejected {
        name: String,
        variable: VariableId,
        reason: String,
    },
    /// The storage backend could not read or write the value of the variable.
    #[error("storage of {variable} failed: {reason}")]
    Storage { variable: VariableId, reason: String },
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// A change of a variable which was interrupted by a [`CollaboratorError`].
///
/// No rollback is performed: the steps in `completed` have taken effect (including any storage
/// write among them), the failing `step` may have partially taken effect, and none of the steps
/// after it were executed.
#[derive(Debug, Error)]
#[error("change of {variable} interrupted at step '{step}'")]
pub struct AssignmentError {
    /// The variable which was being changed.
    pub variable: VariableId,
    /// The step during which the collaborator failed.
    pub step: ChangeStep,
    /// The steps which completed before the failure.
    pub completed: EnumSet<ChangeStep>,
    /// The unmodified failure of the collaborator.
    #[source]
    pub source: CollaboratorError,
}
