//! Values, constraints and listeners which record the notifications they receive, used to check
//! the order in which an assignment notifies its collaborators.
use std::sync::Arc;
use std::sync::Mutex;

use crate::assignment::Assignment;
use crate::basic_types::CollaboratorError;
use crate::basic_types::Iteration;
use crate::model::Constraint;
use crate::model::ModelListener;
use crate::model::Value;
use crate::model::VariableId;
use crate::model::VariableListener;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TestValue {
    variable: VariableId,
    name: &'static str,
}

impl TestValue {
    pub(crate) fn new(variable: VariableId, name: &'static str) -> Self {
        TestValue { variable, name }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }
}

impl Value for TestValue {
    fn variable(&self) -> VariableId {
        self.variable
    }
}

/// A shared log of notifications.
#[derive(Clone, Debug, Default)]
pub(crate) struct Trace(Arc<Mutex<Vec<String>>>);

impl Trace {
    pub(crate) fn record(&self, who: &str, event: &str, value: &TestValue) {
        self.0
            .lock()
            .expect("trace lock is not poisoned")
            .push(format!("{who}.{event}({})", value.name()));
    }

    /// Returns the recorded notifications and clears the log.
    pub(crate) fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().expect("trace lock is not poisoned"))
    }
}

#[derive(Debug)]
pub(crate) struct TracingConstraint {
    name: String,
    trace: Trace,
}

impl TracingConstraint {
    pub(crate) fn new(name: &str, trace: &Trace) -> Self {
        TracingConstraint {
            name: name.to_owned(),
            trace: trace.clone(),
        }
    }
}

impl<V> Constraint<V, TestValue> for TracingConstraint {
    fn name(&self) -> &str {
        &self.name
    }

    fn assigned(
        &self,
        _assignment: &mut dyn Assignment<V, TestValue>,
        _iteration: Iteration,
        value: &TestValue,
    ) -> Result<(), CollaboratorError> {
        self.trace.record(&self.name, "assigned", value);
        Ok(())
    }

    fn unassigned(
        &self,
        _assignment: &mut dyn Assignment<V, TestValue>,
        _iteration: Iteration,
        value: &TestValue,
    ) -> Result<(), CollaboratorError> {
        self.trace.record(&self.name, "unassigned", value);
        Ok(())
    }
}

/// Rejects the assignment of the value with the given name.
#[derive(Debug)]
pub(crate) struct RejectingConstraint {
    reject: &'static str,
    trace: Trace,
}

impl RejectingConstraint {
    pub(crate) fn new(reject: &'static str, trace: &Trace) -> Self {
        RejectingConstraint {
            reject,
            trace: trace.clone(),
        }
    }
}

impl<V> Constraint<V, TestValue> for RejectingConstraint {
    fn name(&self) -> &str {
        "R"
    }

    fn assigned(
        &self,
        _assignment: &mut dyn Assignment<V, TestValue>,
        _iteration: Iteration,
        value: &TestValue,
    ) -> Result<(), CollaboratorError> {
        self.trace.record("R", "assigned", value);
        if value.name() == self.reject {
            return Err(CollaboratorError::Rejected {
                name: "R".to_owned(),
                variable: value.variable(),
                reason: format!("{} is not allowed", value.name()),
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
pub(crate) struct TracingModelListener {
    trace: Trace,
}

impl TracingModelListener {
    pub(crate) fn new(trace: &Trace) -> Self {
        TracingModelListener {
            trace: trace.clone(),
        }
    }
}

impl<V> ModelListener<V, TestValue> for TracingModelListener {
    fn before_assigned(
        &self,
        _assignment: &mut dyn Assignment<V, TestValue>,
        _iteration: Iteration,
        value: &TestValue,
    ) -> Result<(), CollaboratorError> {
        self.trace.record("M", "before_assigned", value);
        Ok(())
    }

    fn after_assigned(
        &self,
        _assignment: &mut dyn Assignment<V, TestValue>,
        _iteration: Iteration,
        value: &TestValue,
    ) -> Result<(), CollaboratorError> {
        self.trace.record("M", "after_assigned", value);
        Ok(())
    }

    fn before_unassigned(
        &self,
        _assignment: &mut dyn Assignment<V, TestValue>,
        _iteration: Iteration,
        value: &TestValue,
    ) -> Result<(), CollaboratorError> {
        self.trace.record("M", "before_unassigned", value);
        Ok(())
    }

    fn after_unassigned(
        &self,
        _assignment: &mut dyn Assignment<V, TestValue>,
        _iteration: Iteration,
        value: &TestValue,
    ) -> Result<(), CollaboratorError> {
        self.trace.record("M", "after_unassigned", value);
        Ok(())
    }
}

#[derive(Debug)]
pub(crate) struct TracingVariableListener {
    name: String,
    trace: Trace,
}

impl TracingVariableListener {
    pub(crate) fn new(name: &str, trace: &Trace) -> Self {
        TracingVariableListener {
            name: name.to_owned(),
            trace: trace.clone(),
        }
    }
}

impl<V> VariableListener<V, TestValue> for TracingVariableListener {
    fn variable_assigned(
        &self,
        _assignment: &mut dyn Assignment<V, TestValue>,
        _iteration: Iteration,
        value: &TestValue,
    ) -> Result<(), CollaboratorError> {
        self.trace.record(&self.name, "variable_assigned", value);
        Ok(())
    }

    fn variable_unassigned(
        &self,
        _assignment: &mut dyn Assignment<V, TestValue>,
        _iteration: Iteration,
        value: &TestValue,
    ) -> Result<(), CollaboratorError> {
        self.trace.record(&self.name, "variable_unassigned", value);
        Ok(())
    }
}
