//! The structure of a problem: its variables, constraints and the parties listening to changes.
//!
//! A [`Model`] is built mutably and then frozen behind an [`Arc`](std::sync::Arc); from that point
//! on it is shared, read-only, by any number of [`Assignment`]s, each of which holds its own
//! values and its own contexts.
//!
//! The model is generic over the pair `<V, T>`: `V` is the domain-specific payload of a variable
//! (a lecture, a course request, ...) and `T` the [`Value`] type.
mod constraint;
mod listeners;
mod value;
mod variable;

#[cfg(test)]
pub(crate) mod test_model;

use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

pub use constraint::*;
pub use listeners::*;
pub use value::*;
pub use variable::*;

use crate::assignment::Assignment;
use crate::assignment::AssignmentContext;
use crate::assignment::ContextId;
use crate::assignment::ContextReference;
use crate::basic_types::CollaboratorError;
use crate::basic_types::Iteration;
use crate::containers::KeyGenerator;
use crate::containers::KeyedVec;
use crate::ifs_assert_eq_simple;
use crate::ifs_assert_simple;

static NEXT_MODEL_ID: AtomicU32 = AtomicU32::new(0);

/// Identifies a [`Model`] within the process; context references carry the id of the model which
/// created them.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct ModelId(u32);

impl ModelId {
    fn next() -> Self {
        ModelId(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ModelId({})", self.0)
    }
}

/// The variables and constraints of a problem, together with the global constraints and the
/// model listeners.
#[derive(Debug)]
pub struct Model<V, T: Value> {
    id: ModelId,
    variables: KeyedVec<VariableId, Variable<V, T>>,
    constraints: KeyedVec<ConstraintId, Box<dyn Constraint<V, T>>>,
    /// The scope of every constraint; empty for global constraints.
    scopes: KeyedVec<ConstraintId, Vec<VariableId>>,
    global_constraints: Vec<ConstraintId>,
    listeners: Vec<Box<dyn ModelListener<V, T>>>,
    context_ids: KeyGenerator<ContextId>,
}

impl<V, T: Value> Default for Model<V, T> {
    fn default() -> Self {
        Model {
            id: ModelId::next(),
            variables: KeyedVec::default(),
            constraints: KeyedVec::default(),
            scopes: KeyedVec::default(),
            global_constraints: vec![],
            listeners: vec![],
            context_ids: KeyGenerator::default(),
        }
    }
}

impl<V, T: Value> Model<V, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable whose value is decided by the assignments over this model.
    pub fn add_variable(&mut self, data: V) -> VariableId {
        let slot = self.variables.new_slot();
        let id = slot.key();
        slot.populate(Variable::new(id, VariableKind::Mutable, data))
    }

    /// Adds a variable with a fixed value.
    ///
    /// The value is created from the id of the new variable, since a value has to know the
    /// variable it belongs to.
    pub fn add_constant_variable(
        &mut self,
        data: V,
        create_value: impl FnOnce(VariableId) -> T,
    ) -> VariableId {
        let slot = self.variables.new_slot();
        let id = slot.key();
        let value = create_value(id);
        ifs_assert_eq_simple!(
            value.variable(),
            id,
            "the value of a constant variable has to belong to it"
        );
        slot.populate(Variable::new(id, VariableKind::Constant(value), data))
    }

    /// Adds a constraint over the variables in `scope`.
    ///
    /// The constraint is attached to every variable in its scope; variables which occur more than
    /// once in the scope are only attached once.
    pub fn add_constraint(
        &mut self,
        constraint: impl Constraint<V, T> + 'static,
        scope: &[VariableId],
    ) -> ConstraintId {
        for &variable in scope {
            ifs_assert_simple!(
                self.contains_variable(variable),
                "the scope of '{}' contains {variable} which is not part of the model",
                constraint.name()
            );
        }

        let id = self.constraints.push(Box::new(constraint));
        let _ = self.scopes.push(scope.to_vec());
        for &variable in scope {
            self.variables[variable].attach_constraint(id);
        }
        id
    }

    /// Adds a constraint which is implicitly attached to every variable of the model.
    pub fn add_global_constraint(
        &mut self,
        constraint: impl Constraint<V, T> + 'static,
    ) -> ConstraintId {
        let id = self.constraints.push(Box::new(constraint));
        let _ = self.scopes.push(vec![]);
        self.global_constraints.push(id);
        id
    }

    pub fn add_listener(&mut self, listener: impl ModelListener<V, T> + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn add_variable_listener(
        &mut self,
        variable: VariableId,
        listener: impl VariableListener<V, T> + 'static,
    ) {
        ifs_assert_simple!(
            self.contains_variable(variable),
            "{variable} is not part of the model"
        );
        self.variables[variable].add_listener(Box::new(listener));
    }

    /// Creates a reference to a new kind of [`AssignmentContext`].
    ///
    /// `create` is called at most once per assignment, on the first access to the context in that
    /// assignment; it may inspect the assignment to initialise the context. The reference can only
    /// be used with assignments over this model.
    pub fn create_context_reference<C, F>(&mut self, create: F) -> ContextReference<V, T, C>
    where
        C: AssignmentContext,
        F: Fn(&dyn Assignment<V, T>) -> C + Send + Sync + 'static,
    {
        ContextReference::new(self.id, self.context_ids.next_key(), create)
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    /// All variables of the model, in the order they were added.
    pub fn variables(&self) -> &[Variable<V, T>] {
        self.variables.as_slice()
    }

    pub fn variable(&self, variable: VariableId) -> &Variable<V, T> {
        &self.variables[variable]
    }

    pub fn contains_variable(&self, variable: VariableId) -> bool {
        self.variables.get(variable).is_some()
    }

    pub fn constraint(&self, constraint: ConstraintId) -> &dyn Constraint<V, T> {
        &*self.constraints[constraint]
    }

    /// The variables a constraint was added over; empty for a global constraint.
    pub fn scope(&self, constraint: ConstraintId) -> &[VariableId] {
        &self.scopes[constraint]
    }

    /// The constraints which are implicitly attached to every variable, in the order they were
    /// added.
    pub fn global_constraints(&self) -> &[ConstraintId] {
        &self.global_constraints
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub(crate) fn before_assigned(
        &self,
        assignment: &mut dyn Assignment<V, T>,
        iteration: Iteration,
        value: &T,
    ) -> Result<(), CollaboratorError> {
        for listener in &self.listeners {
            listener.before_assigned(assignment, iteration, value)?;
        }
        Ok(())
    }

    pub(crate) fn after_assigned(
        &self,
        assignment: &mut dyn Assignment<V, T>,
        iteration: Iteration,
        value: &T,
    ) -> Result<(), CollaboratorError> {
        for listener in &self.listeners {
            listener.after_assigned(assignment, iteration, value)?;
        }
        Ok(())
    }

    pub(crate) fn before_unassigned(
        &self,
        assignment: &mut dyn Assignment<V, T>,
        iteration: Iteration,
        value: &T,
    ) -> Result<(), CollaboratorError> {
        for listener in &self.listeners {
            listener.before_unassigned(assignment, iteration, value)?;
        }
        Ok(())
    }

    pub(crate) fn after_unassigned(
        &self,
        assignment: &mut dyn Assignment<V, T>,
        iteration: Iteration,
        value: &T,
    ) -> Result<(), CollaboratorError> {
        for listener in &self.listeners {
            listener.after_unassigned(assignment, iteration, value)?;
        }
        Ok(())
    }
}
