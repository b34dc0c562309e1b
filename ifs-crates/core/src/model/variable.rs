use crate::assignment::Assignment;
use crate::basic_types::CollaboratorError;
use crate::basic_types::Iteration;
use crate::containers::StorageKey;
use crate::model::ConstraintId;
use crate::model::Value;
use crate::model::VariableListener;

/// An identifier to a variable within a [`Model`](crate::model::Model).
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VariableId(u32);

impl VariableId {
    pub const fn new(id: u32) -> Self {
        VariableId(id)
    }

    pub fn id(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl StorageKey for VariableId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        VariableId(index as u32)
    }
}

/// Whether the value of a variable is decided by an assignment or fixed up front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VariableKind<T> {
    /// The value is stored in (and only in) each assignment.
    Mutable,
    /// The variable always reports this value; it never has an entry in any assignment storage.
    Constant(T),
}

/// A decision variable of a [`Model`](crate::model::Model), carrying the domain-specific payload
/// `V`.
#[derive(Debug)]
pub struct Variable<V, T: Value> {
    id: VariableId,
    kind: VariableKind<T>,
    /// The constraints which have this variable in their scope, in the order they were added.
    constraints: Vec<ConstraintId>,
    listeners: Vec<Box<dyn VariableListener<V, T>>>,
    data: V,
}

impl<V, T: Value> Variable<V, T> {
    pub(crate) fn new(id: VariableId, kind: VariableKind<T>, data: V) -> Self {
        Variable {
            id,
            kind,
            constraints: vec![],
            listeners: vec![],
            data,
        }
    }

    pub fn id(&self) -> VariableId {
        self.id
    }

    pub fn kind(&self) -> &VariableKind<T> {
        &self.kind
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, VariableKind::Constant(_))
    }

    /// The domain-specific payload of the variable.
    pub fn data(&self) -> &V {
        &self.data
    }

    /// The constraints which have this variable in their scope; global constraints are not
    /// included.
    pub fn constraints(&self) -> &[ConstraintId] {
        &self.constraints
    }

    /// The value of this variable in `assignment`.
    ///
    /// A constant variable reports its fixed value without looking at the assignment at all, a
    /// mutable variable reports whatever the storage of the assignment holds.
    pub fn get_value<'a, A>(&'a self, assignment: &'a A) -> Option<&'a T>
    where
        A: Assignment<V, T> + ?Sized,
    {
        match &self.kind {
            VariableKind::Constant(value) => Some(value),
            VariableKind::Mutable => assignment.get_value_internal(self.id),
        }
    }

    pub(crate) fn attach_constraint(&mut self, constraint: ConstraintId) {
        if !self.constraints.contains(&constraint) {
            self.constraints.push(constraint);
        }
    }

    pub(crate) fn add_listener(&mut self, listener: Box<dyn VariableListener<V, T>>) {
        self.listeners.push(listener);
    }

    pub(crate) fn variable_assigned(
        &self,
        assignment: &mut dyn Assignment<V, T>,
        iteration: Iteration,
        value: &T,
    ) -> Result<(), CollaboratorError> {
        for listener in &self.listeners {
            listener.variable_assigned(assignment, iteration, value)?;
        }
        Ok(())
    }

    pub(crate) fn variable_unassigned(
        &self,
        assignment: &mut dyn Assignment<V, T>,
        iteration: Iteration,
        value: &T,
    ) -> Result<(), CollaboratorError> {
        for listener in &self.listeners {
            listener.variable_unassigned(assignment, iteration, value)?;
        }
        Ok(())
    }
}
