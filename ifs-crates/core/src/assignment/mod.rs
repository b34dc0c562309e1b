//! Assignments: independent views of which value is chosen for which variable.
//!
//! The [`Assignment`] trait splits an assignment in two. A storage backend implements the
//! required methods, which do nothing but read and write values. The provided methods implement
//! the semantics which every backend shares: constant variables, the notification protocol of a
//! change (see [`ChangeSequence`]), and the aggregate queries.
//!
//! Any number of assignments can exist over the same [`Model`]; they share the model but never
//! share values or contexts.
mod change;
mod context;
mod parallel;
mod single;

use std::sync::Arc;

pub use change::ChangeSequence;
pub use change::ChangeState;
pub use change::ChangeStep;
pub use context::*;
pub use parallel::DefaultParallelAssignment;
pub use single::DefaultSingleAssignment;

use crate::basic_types::AssignmentError;
use crate::basic_types::CollaboratorError;
use crate::basic_types::Iteration;
use crate::ifs_assert_simple;
use crate::model::Model;
use crate::model::Value;
use crate::model::Variable;
use crate::model::VariableId;

/// A view of the current value of every variable of a [`Model`].
///
/// Assignments are not synchronised: one assignment is used by one search at a time. Distinct
/// assignments over the same model can be used from distinct threads.
pub trait Assignment<V, T: Value> {
    /// The model this assignment is over.
    fn model(&self) -> &Arc<Model<V, T>>;

    /// Returns the stored value of a variable, `None` if it is not assigned.
    ///
    /// This does not take constant variables into account; use [`Assignment::get_value`].
    fn get_value_internal(&self, variable: VariableId) -> Option<&T>;

    /// Stores `value` for `variable`, or removes the stored value if `value` is `None`.
    ///
    /// This is a plain write; no notification logic belongs here.
    fn set_value_internal(
        &mut self,
        iteration: Iteration,
        variable: VariableId,
        value: Option<T>,
    ) -> Result<(), CollaboratorError>;

    /// The variables which have a stored value.
    fn assigned_variables(&self) -> Vec<VariableId>;

    /// The iteration at which the current value of `variable` was stored, `None` if the variable
    /// has no stored value.
    fn get_iteration(&self, variable: VariableId) -> Option<Iteration>;

    fn context_holder(&self) -> &dyn AssignmentContextHolder;

    fn context_holder_mut(&mut self) -> &mut dyn AssignmentContextHolder;

    fn as_dyn(&self) -> &dyn Assignment<V, T>;

    fn as_dyn_mut(&mut self) -> &mut dyn Assignment<V, T>;

    /// The index of this assignment among the assignments over the same model; `-1` for an
    /// assignment without an index (the primary one).
    ///
    /// Context holders use the index to keep the contexts of distinct assignments apart.
    fn get_index(&self) -> i32 {
        -1
    }

    /// The current value of `variable`: the fixed value of a constant variable, otherwise the
    /// stored value.
    fn get_value<'a>(&'a self, variable: VariableId) -> Option<&'a T>
    where
        V: 'a,
    {
        self.model().variable(variable).get_value(self)
    }

    /// Replaces the value of `variable` by `value` (unassigns it if `value` is `None`) and
    /// returns the previous value.
    ///
    /// The old value is fully removed, and everybody is told about it, before the new value is
    /// stored:
    ///
    /// 1. model `before_unassigned`, clear storage, constraints of the variable, global
    ///    constraints, variable listeners, model `after_unassigned` (only if there was a value);
    /// 2. model `before_assigned`, write storage, constraints of the variable, global constraints,
    ///    variable listeners, model `after_assigned` (only if `value` is given).
    ///
    /// # Panics
    /// Before anything is read or written, if `variable` is not part of the model, if it is a
    /// constant variable, or if `value` belongs to another variable.
    ///
    /// # Errors
    /// The first failure of a collaborator ends the change. Nothing is rolled back: the returned
    /// [`AssignmentError`] lists the steps which did take effect.
    fn assign_variable(
        &mut self,
        iteration: Iteration,
        variable: VariableId,
        value: Option<T>,
    ) -> Result<Option<T>, AssignmentError> {
        change::change_value(self, iteration, variable, value)
    }

    /// Assigns `value` to the variable it belongs to; see [`Assignment::assign_variable`].
    fn assign(&mut self, iteration: Iteration, value: T) -> Result<Option<T>, AssignmentError> {
        let variable = value.variable();
        self.assign_variable(iteration, variable, Some(value))
    }

    /// Removes the value of `variable`; see [`Assignment::assign_variable`].
    fn unassign(
        &mut self,
        iteration: Iteration,
        variable: VariableId,
    ) -> Result<Option<T>, AssignmentError> {
        self.assign_variable(iteration, variable, None)
    }

    fn nr_assigned_variables(&self) -> usize {
        self.assigned_variables().len()
    }

    /// The values of the assigned variables, in the order of [`Assignment::assigned_variables`].
    fn assigned_values(&self) -> Vec<&T> {
        self.assigned_variables()
            .into_iter()
            .filter_map(|variable| self.get_value_internal(variable))
            .collect()
    }

    /// The variables of `model` without a value in this assignment. Constant variables always
    /// have a value and are never part of this.
    fn unassigned_variables(&self, model: &Model<V, T>) -> Vec<VariableId> {
        model
            .variables()
            .iter()
            .filter(|variable| variable.get_value(self).is_none())
            .map(Variable::id)
            .collect()
    }

    /// The number of variables of `model` minus the number of assigned variables.
    ///
    /// Every variable of `model` is assumed to be addressable by this assignment; constant
    /// variables count as unassigned here, unlike in [`Assignment::unassigned_variables`].
    fn nr_unassigned_variables(&self, model: &Model<V, T>) -> usize {
        let nr_assigned = self.nr_assigned_variables();
        ifs_assert_simple!(
            nr_assigned <= model.variables().len(),
            "the assignment holds more values than the model has variables"
        );
        model.variables().len() - nr_assigned
    }
}

/// A stored value together with the iteration at which it was stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct StoredValue<T> {
    pub(crate) value: T,
    pub(crate) iteration: Iteration,
}
