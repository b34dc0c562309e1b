//! A change of the value of a variable, executed as a fixed sequence of steps.
//!
//! Every call to [`Assignment::assign_variable`] runs a subset of the same twelve
//! steps in the same order. The unassignment block runs only if the variable had a value, the
//! assignment block only if a new value is given:
//!
//! ```text
//! Idle -> Unassigning -> Unassigned -> Assigning -> Assigned
//!         (6 steps)                    (6 steps)
//! ```
//!
//! Within a block, the model hook wraps everything else: model `before_*`, storage, the
//! constraints of the variable, the global constraints, the variable listeners, model `after_*`.
//! A failing step ends the change right there; see [`AssignmentError`].
use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::Arc;

use convert_case::Case;
use convert_case::Casing;
use enumset::EnumSet;
use enumset::EnumSetType;
use log::trace;
use log::warn;

use crate::assignment::Assignment;
use crate::basic_types::AssignmentError;
use crate::basic_types::CollaboratorError;
use crate::basic_types::Iteration;
use crate::ifs_assert_advanced;
use crate::ifs_assert_simple;
use crate::model::ConstraintId;
use crate::model::Value;
use crate::model::VariableId;

/// One step of a change, in execution order.
#[derive(EnumSetType, Debug, Hash)]
pub enum ChangeStep {
    BeforeUnassigned,
    ClearStorage,
    ConstraintsUnassigned,
    GlobalConstraintsUnassigned,
    VariableUnassigned,
    AfterUnassigned,
    BeforeAssigned,
    WriteStorage,
    ConstraintsAssigned,
    GlobalConstraintsAssigned,
    VariableAssigned,
    AfterAssigned,
}

impl ChangeStep {
    /// The state of the change while this step is executing.
    pub fn state(self) -> ChangeState {
        if Self::unassign_block().contains(self) {
            ChangeState::Unassigning
        } else {
            ChangeState::Assigning
        }
    }

    fn unassign_block() -> EnumSet<ChangeStep> {
        ChangeStep::BeforeUnassigned
            | ChangeStep::ClearStorage
            | ChangeStep::ConstraintsUnassigned
            | ChangeStep::GlobalConstraintsUnassigned
            | ChangeStep::VariableUnassigned
            | ChangeStep::AfterUnassigned
    }

    fn assign_block() -> EnumSet<ChangeStep> {
        EnumSet::all() - Self::unassign_block()
    }
}

impl Display for ChangeStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format!("{self:?}").to_case(Case::Snake))
    }
}

/// The coarse state of a change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeState {
    Idle,
    Unassigning,
    Unassigned,
    Assigning,
    Assigned,
}

/// The steps of a single change which remain to be executed.
///
/// Iterating yields the steps in execution order; a step counts as completed once the next one
/// is requested.
#[derive(Clone, Copy, Debug)]
pub struct ChangeSequence {
    pending: EnumSet<ChangeStep>,
    completed: EnumSet<ChangeStep>,
    current: Option<ChangeStep>,
}

impl ChangeSequence {
    /// The sequence for a variable which currently has a value if `unassign` holds, and which
    /// receives a new value if `assign` holds.
    pub fn new(unassign: bool, assign: bool) -> Self {
        let mut pending = EnumSet::empty();
        if unassign {
            pending |= ChangeStep::unassign_block();
        }
        if assign {
            pending |= ChangeStep::assign_block();
        }
        ChangeSequence {
            pending,
            completed: EnumSet::empty(),
            current: None,
        }
    }

    /// The steps which finished executing.
    pub fn completed(&self) -> EnumSet<ChangeStep> {
        self.completed
    }

    /// The step which is currently executing, if any.
    pub fn current(&self) -> Option<ChangeStep> {
        self.current
    }

    pub fn state(&self) -> ChangeState {
        if let Some(step) = self.current {
            step.state()
        } else if self.completed.contains(ChangeStep::AfterAssigned) {
            ChangeState::Assigned
        } else if self.completed.contains(ChangeStep::AfterUnassigned) {
            ChangeState::Unassigned
        } else {
            ChangeState::Idle
        }
    }
}

impl Iterator for ChangeSequence {
    type Item = ChangeStep;

    fn next(&mut self) -> Option<ChangeStep> {
        if let Some(step) = self.current.take() {
            let _ = self.completed.insert(step);
        }
        let step = self.pending.iter().next()?;
        let _ = self.pending.remove(step);
        self.current = Some(step);
        Some(step)
    }
}

/// Replaces the value of `variable` in `assignment` by `value`, notifying every interested party.
///
/// The preconditions are checked before anything is read or written; a violation is a bug in
/// the caller and panics.
pub(crate) fn change_value<V, T, A>(
    assignment: &mut A,
    iteration: Iteration,
    variable: VariableId,
    value: Option<T>,
) -> Result<Option<T>, AssignmentError>
where
    T: Value,
    A: Assignment<V, T> + ?Sized,
{
    let model = Arc::clone(assignment.model());
    ifs_assert_simple!(
        model.contains_variable(variable),
        "{variable} does not belong to the model of the assignment"
    );
    let target = model.variable(variable);
    ifs_assert_simple!(
        !target.is_constant(),
        "{variable} is constant and cannot be assigned or unassigned"
    );
    if let Some(value) = &value {
        ifs_assert_simple!(
            value.variable() == variable,
            "{value:?} belongs to {} and cannot be assigned to {variable}",
            value.variable()
        );
    }

    let old = assignment.get_value_internal(variable).cloned();
    trace!("iteration {iteration}: {variable} {old:?} -> {value:?}");

    let mut sequence = ChangeSequence::new(old.is_some(), value.is_some());
    while let Some(step) = sequence.next() {
        let result = match (step, old.as_ref(), value.as_ref()) {
            (ChangeStep::BeforeUnassigned, Some(old), _) => {
                model.before_unassigned(assignment.as_dyn_mut(), iteration, old)
            }
            (ChangeStep::ClearStorage, Some(_), _) => {
                assignment.set_value_internal(iteration, variable, None)
            }
            (ChangeStep::ConstraintsUnassigned, Some(old), _) => {
                notify_each(target.constraints(), |constraint| {
                    model
                        .constraint(constraint)
                        .unassigned(assignment.as_dyn_mut(), iteration, old)
                })
            }
            (ChangeStep::GlobalConstraintsUnassigned, Some(old), _) => {
                notify_each(model.global_constraints(), |constraint| {
                    model
                        .constraint(constraint)
                        .unassigned(assignment.as_dyn_mut(), iteration, old)
                })
            }
            (ChangeStep::VariableUnassigned, Some(old), _) => {
                target.variable_unassigned(assignment.as_dyn_mut(), iteration, old)
            }
            (ChangeStep::AfterUnassigned, Some(old), _) => {
                model.after_unassigned(assignment.as_dyn_mut(), iteration, old)
            }
            (ChangeStep::BeforeAssigned, _, Some(new)) => {
                model.before_assigned(assignment.as_dyn_mut(), iteration, new)
            }
            (ChangeStep::WriteStorage, _, Some(new)) => {
                assignment.set_value_internal(iteration, variable, Some(new.clone()))
            }
            (ChangeStep::ConstraintsAssigned, _, Some(new)) => {
                notify_each(target.constraints(), |constraint| {
                    model
                        .constraint(constraint)
                        .assigned(assignment.as_dyn_mut(), iteration, new)
                })
            }
            (ChangeStep::GlobalConstraintsAssigned, _, Some(new)) => {
                notify_each(model.global_constraints(), |constraint| {
                    model
                        .constraint(constraint)
                        .assigned(assignment.as_dyn_mut(), iteration, new)
                })
            }
            (ChangeStep::VariableAssigned, _, Some(new)) => {
                target.variable_assigned(assignment.as_dyn_mut(), iteration, new)
            }
            (ChangeStep::AfterAssigned, _, Some(new)) => {
                model.after_assigned(assignment.as_dyn_mut(), iteration, new)
            }
            _ => unreachable!("the sequence only contains steps for values which are present"),
        };

        if let Err(source) = result {
            warn!(
                "iteration {iteration}: change of {variable} interrupted at step '{step}': {source}"
            );
            return Err(AssignmentError {
                variable,
                step,
                completed: sequence.completed(),
                source,
            });
        }
    }

    ifs_assert_advanced!(
        assignment.get_value_internal(variable) == value.as_ref(),
        "after a change the storage holds exactly the new value of {variable}"
    );
    ifs_assert_advanced!(
        assignment.assigned_variables().len() == assignment.nr_assigned_variables(),
        "the number of assigned variables matches the assigned variables in storage"
    );

    Ok(old)
}

/// Calls `notify` for every constraint in order, stopping at the first failure.
fn notify_each(
    constraints: &[ConstraintId],
    mut notify: impl FnMut(ConstraintId) -> Result<(), CollaboratorError>,
) -> Result<(), CollaboratorError> {
    for &constraint in constraints {
        notify(constraint)?;
    }
    Ok(())
}
