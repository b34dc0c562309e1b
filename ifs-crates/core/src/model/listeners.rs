use std::fmt::Debug;

use crate::assignment::Assignment;
use crate::basic_types::CollaboratorError;
use crate::basic_types::Iteration;
use crate::model::Value;
#[cfg(doc)]
use crate::model::Model;
#[cfg(doc)]
use crate::model::Variable;

/// Receives the lifecycle hooks of a [`Model`].
///
/// The hooks wrap all other notifications of a change: `before_*` is the first thing that happens
/// when a value is added or removed, `after_*` the last. They are typically used for incremental
/// bookkeeping over the whole assignment, such as the value of an objective function.
pub trait ModelListener<V, T: Value>: Debug + Send + Sync {
    fn before_assigned(
        &self,
        _assignment: &mut dyn Assignment<V, T>,
        _iteration: Iteration,
        _value: &T,
    ) -> Result<(), CollaboratorError> {
        Ok(())
    }

    fn after_assigned(
        &self,
        _assignment: &mut dyn Assignment<V, T>,
        _iteration: Iteration,
        _value: &T,
    ) -> Result<(), CollaboratorError> {
        Ok(())
    }

    fn before_unassigned(
        &self,
        _assignment: &mut dyn Assignment<V, T>,
        _iteration: Iteration,
        _value: &T,
    ) -> Result<(), CollaboratorError> {
        Ok(())
    }

    fn after_unassigned(
        &self,
        _assignment: &mut dyn Assignment<V, T>,
        _iteration: Iteration,
        _value: &T,
    ) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// Receives the changes of a single [`Variable`], after all constraints have been notified.
pub trait VariableListener<V, T: Value>: Debug + Send + Sync {
    fn variable_assigned(
        &self,
        _assignment: &mut dyn Assignment<V, T>,
        _iteration: Iteration,
        _value: &T,
    ) -> Result<(), CollaboratorError> {
        Ok(())
    }

    fn variable_unassigned(
        &self,
        _assignment: &mut dyn Assignment<V, T>,
        _iteration: Iteration,
        _value: &T,
    ) -> Result<(), CollaboratorError> {
        Ok(())
    }
}
