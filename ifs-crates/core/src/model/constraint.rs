use std::fmt::Debug;

use crate::assignment::Assignment;
use crate::basic_types::CollaboratorError;
use crate::basic_types::Iteration;
use crate::containers::StorageKey;
use crate::model::Value;
#[cfg(doc)]
use crate::model::Model;

/// An identifier to a constraint within a [`Model`].
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConstraintId(u32);

impl std::fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConstraintId({})", self.0)
    }
}

impl StorageKey for ConstraintId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        ConstraintId(index as u32)
    }
}

/// A relation over some of the variables of a [`Model`].
///
/// A constraint is told about every change of a variable in its scope, after the model has been
/// told that the change is about to happen and before the variable itself is told. A global
/// constraint (see [`Model::add_global_constraint`]) implements the same trait and is told about
/// the changes of every variable.
///
/// Constraints are shared by all assignments over the model, hence the notifications take `&self`.
/// State which depends on the assignment belongs in an
/// [`AssignmentContext`](crate::assignment::AssignmentContext), reachable through
/// [`ContextAccess::get_assignment_context`](crate::assignment::ContextAccess::get_assignment_context).
pub trait Constraint<V, T: Value>: Debug + Send + Sync {
    /// Return the name of the constraint.
    ///
    /// This is a convenience method that is used for printing.
    fn name(&self) -> &str;

    /// Called after `value` has been stored in `assignment`.
    fn assigned(
        &self,
        _assignment: &mut dyn Assignment<V, T>,
        _iteration: Iteration,
        _value: &T,
    ) -> Result<(), CollaboratorError> {
        Ok(())
    }

    /// Called after `value` has been removed from `assignment`.
    fn unassigned(
        &self,
        _assignment: &mut dyn Assignment<V, T>,
        _iteration: Iteration,
        _value: &T,
    ) -> Result<(), CollaboratorError> {
        Ok(())
    }
}
