use std::fmt::Debug;

use crate::model::VariableId;

/// A value which can be assigned to exactly one variable.
///
/// The owning variable is fixed: [`Value::variable`] must return the same [`VariableId`] for the
/// whole lifetime of the value. Assigning a value to any other variable is a contract violation.
pub trait Value: Clone + PartialEq + Debug {
    /// The variable this value belongs to.
    fn variable(&self) -> VariableId;
}
