use std::sync::Arc;

use super::Assignment;
use super::AssignmentContextHolder;
use super::DefaultSingleContextHolder;
use super::StoredValue;
use crate::basic_types::CollaboratorError;
use crate::basic_types::Iteration;
use crate::containers::KeyedVec;
use crate::model::Model;
use crate::model::Value;
use crate::model::VariableId;
use crate::statistics::AssignmentStatistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// An array-backed assignment with one slot per variable of the model.
///
/// This is the assignment of a single search: it has no index and, by default, owns a holder with
/// a single context arena.
#[derive(Debug)]
pub struct DefaultSingleAssignment<V, T: Value, H = DefaultSingleContextHolder> {
    model: Arc<Model<V, T>>,
    values: KeyedVec<VariableId, Option<StoredValue<T>>>,
    contexts: H,
    statistics: AssignmentStatistics,
}

impl<V, T: Value> DefaultSingleAssignment<V, T> {
    pub fn new(model: Arc<Model<V, T>>) -> Self {
        Self::with_holder(model, DefaultSingleContextHolder::default())
    }
}

impl<V, T: Value, H: AssignmentContextHolder> DefaultSingleAssignment<V, T, H> {
    pub fn with_holder(model: Arc<Model<V, T>>, contexts: H) -> Self {
        let mut values = KeyedVec::default();
        values.resize_with(model.variables().len(), || None);
        DefaultSingleAssignment {
            model,
            values,
            contexts,
            statistics: AssignmentStatistics::default(),
        }
    }

    pub fn statistics(&self) -> AssignmentStatistics {
        self.statistics
    }

    pub fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger)
    }
}

impl<V, T: Value, H: AssignmentContextHolder> Assignment<V, T>
    for DefaultSingleAssignment<V, T, H>
{
    fn model(&self) -> &Arc<Model<V, T>> {
        &self.model
    }

    fn get_value_internal(&self, variable: VariableId) -> Option<&T> {
        self.values
            .get(variable)
            .and_then(Option::as_ref)
            .map(|stored| &stored.value)
    }

    fn set_value_internal(
        &mut self,
        iteration: Iteration,
        variable: VariableId,
        value: Option<T>,
    ) -> Result<(), CollaboratorError> {
        let Some(slot) = self.values.get_mut(variable) else {
            return Err(CollaboratorError::Storage {
                variable,
                reason: format!(
                    "the assignment only has slots for {} variables",
                    self.values.len()
                ),
            });
        };

        match value {
            Some(value) => {
                *slot = Some(StoredValue { value, iteration });
                self.statistics.num_assignments += 1;
            }
            None => {
                *slot = None;
                self.statistics.num_unassignments += 1;
            }
        }
        Ok(())
    }

    fn assigned_variables(&self) -> Vec<VariableId> {
        self.values
            .keys()
            .filter(|&variable| self.values[variable].is_some())
            .collect()
    }

    fn get_iteration(&self, variable: VariableId) -> Option<Iteration> {
        self.values
            .get(variable)
            .and_then(Option::as_ref)
            .map(|stored| stored.iteration)
    }

    fn context_holder(&self) -> &dyn AssignmentContextHolder {
        &self.contexts
    }

    fn context_holder_mut(&mut self) -> &mut dyn AssignmentContextHolder {
        &mut self.contexts
    }

    fn as_dyn(&self) -> &dyn Assignment<V, T> {
        self
    }

    fn as_dyn_mut(&mut self) -> &mut dyn Assignment<V, T> {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::panic::catch_unwind;
    use std::panic::AssertUnwindSafe;
    use std::sync::Arc;

    use super::DefaultSingleAssignment;
    use crate::assignment::Assignment;
    use crate::assignment::AssignmentContext;
    use crate::assignment::ChangeStep;
    use crate::assignment::ContextAccess;
    use crate::basic_types::CollaboratorError;
    use crate::model::test_model::RejectingConstraint;
    use crate::model::test_model::TestValue;
    use crate::model::test_model::Trace;
    use crate::model::test_model::TracingConstraint;
    use crate::model::test_model::TracingModelListener;
    use crate::model::test_model::TracingVariableListener;
    use crate::model::Model;
    use crate::model::VariableId;

    fn traced_model(trace: &Trace) -> (Model<&'static str, TestValue>, VariableId) {
        let mut model: Model<&str, TestValue> = Model::new();
        let x = model.add_variable("x");
        let _ = model.add_constraint(TracingConstraint::new("C", trace), &[x]);
        model.add_variable_listener(x, TracingVariableListener::new("X", trace));
        model.add_listener(TracingModelListener::new(trace));
        (model, x)
    }

    #[test]
    fn notifications_follow_the_change_protocol() {
        let trace = Trace::default();
        let (model, x) = traced_model(&trace);
        let a = TestValue::new(x, "A");
        let b = TestValue::new(x, "B");
        let mut assignment = DefaultSingleAssignment::new(Arc::new(model));

        let previous = assignment.assign_variable(1, x, Some(a.clone()));
        assert_eq!(previous.ok(), Some(None));
        assert_eq!(
            trace.take(),
            vec![
                "M.before_assigned(A)",
                "C.assigned(A)",
                "X.variable_assigned(A)",
                "M.after_assigned(A)",
            ]
        );

        let previous = assignment.assign_variable(2, x, Some(b.clone()));
        assert_eq!(previous.ok(), Some(Some(a)));
        assert_eq!(
            trace.take(),
            vec![
                "M.before_unassigned(A)",
                "C.unassigned(A)",
                "X.variable_unassigned(A)",
                "M.after_unassigned(A)",
                "M.before_assigned(B)",
                "C.assigned(B)",
                "X.variable_assigned(B)",
                "M.after_assigned(B)",
            ]
        );

        let previous = assignment.unassign(3, x);
        assert_eq!(previous.ok(), Some(Some(b)));
        assert_eq!(
            trace.take(),
            vec![
                "M.before_unassigned(B)",
                "C.unassigned(B)",
                "X.variable_unassigned(B)",
                "M.after_unassigned(B)",
            ]
        );
        assert_eq!(assignment.get_value(x), None);
    }

    #[test]
    fn global_constraints_follow_local_constraints() {
        let trace = Trace::default();
        let mut model: Model<&str, TestValue> = Model::new();
        let x = model.add_variable("x");
        let y = model.add_variable("y");
        let _ = model.add_global_constraint(TracingConstraint::new("G", &trace));
        let _ = model.add_constraint(TracingConstraint::new("C1", &trace), &[x, y]);
        let _ = model.add_constraint(TracingConstraint::new("C2", &trace), &[y]);
        let mut assignment = DefaultSingleAssignment::new(Arc::new(model));

        let _ = assignment.assign(1, TestValue::new(y, "A"));

        assert_eq!(
            trace.take(),
            vec!["C1.assigned(A)", "C2.assigned(A)", "G.assigned(A)"]
        );

        let _ = assignment.assign(2, TestValue::new(x, "B"));

        assert_eq!(trace.take(), vec!["C1.assigned(B)", "G.assigned(B)"]);
    }

    #[test]
    fn unassigning_an_unassigned_variable_does_nothing() {
        let trace = Trace::default();
        let (model, x) = traced_model(&trace);
        let mut assignment = DefaultSingleAssignment::new(Arc::new(model));

        let previous = assignment.unassign(1, x);

        assert_eq!(previous.ok(), Some(None));
        assert!(trace.take().is_empty());
        assert_eq!(assignment.statistics().num_unassignments, 0);
    }

    #[test]
    fn assigning_nothing_is_unassigning() {
        let trace = Trace::default();
        let (model, x) = traced_model(&trace);
        let model = Arc::new(model);

        let mut first = DefaultSingleAssignment::new(Arc::clone(&model));
        let _ = first.assign(1, TestValue::new(x, "A"));
        let _ = trace.take();
        let unassigned = first.unassign(2, x).ok();
        let unassign_trace = trace.take();

        let mut second = DefaultSingleAssignment::new(Arc::clone(&model));
        let _ = second.assign(1, TestValue::new(x, "A"));
        let _ = trace.take();
        let assigned_nothing = second.assign_variable(2, x, None).ok();

        assert_eq!(unassigned, assigned_nothing);
        assert_eq!(unassign_trace, trace.take());
        assert_eq!(first.get_value(x), second.get_value(x));
    }

    #[test]
    fn stored_value_is_read_back_with_its_iteration() {
        let mut model: Model<(), TestValue> = Model::new();
        let x = model.add_variable(());
        let y = model.add_variable(());
        let mut assignment = DefaultSingleAssignment::new(Arc::new(model));

        let _ = assignment.assign(7, TestValue::new(y, "A"));

        assert_eq!(assignment.get_value(y), Some(&TestValue::new(y, "A")));
        assert_eq!(assignment.get_iteration(y), Some(7));
        assert_eq!(assignment.get_iteration(x), None);
        assert_eq!(assignment.assigned_variables(), vec![y]);
        assert_eq!(assignment.assigned_values(), vec![&TestValue::new(y, "A")]);
        assert_eq!(assignment.unassigned_variables(assignment.model()), vec![x]);
    }

    #[test]
    fn constant_variable_never_reaches_storage() {
        let mut model: Model<(), TestValue> = Model::new();
        let x = model.add_variable(());
        let c = model.add_constant_variable((), |id| TestValue::new(id, "K"));
        let model = Arc::new(model);
        let mut assignment = DefaultSingleAssignment::new(Arc::clone(&model));

        assert_eq!(assignment.get_value(c), Some(&TestValue::new(c, "K")));
        assert_eq!(assignment.get_value_internal(c), None);

        let _ = assignment.assign(1, TestValue::new(x, "A"));

        assert_eq!(assignment.get_value(c), Some(&TestValue::new(c, "K")));
        assert_eq!(assignment.assigned_variables(), vec![x]);
        assert!(assignment.unassigned_variables(&model).is_empty());
        assert_eq!(assignment.nr_unassigned_variables(&model), 1);
    }

    #[test]
    #[should_panic]
    fn assigning_a_constant_variable_is_rejected() {
        let mut model: Model<(), TestValue> = Model::new();
        let c = model.add_constant_variable((), |id| TestValue::new(id, "K"));
        let mut assignment = DefaultSingleAssignment::new(Arc::new(model));

        let _ = assignment.assign(1, TestValue::new(c, "L"));
    }

    #[test]
    #[should_panic]
    fn value_of_another_variable_is_rejected() {
        let mut model: Model<(), TestValue> = Model::new();
        let x = model.add_variable(());
        let y = model.add_variable(());
        let mut assignment = DefaultSingleAssignment::new(Arc::new(model));

        let _ = assignment.assign_variable(1, x, Some(TestValue::new(y, "A")));
    }

    #[test]
    fn contract_violation_leaves_the_assignment_untouched() {
        let trace = Trace::default();
        let (mut model, x) = traced_model(&trace);
        let y = model.add_variable("y");
        let c = model.add_constant_variable("c", |id| TestValue::new(id, "K"));
        let mut assignment = DefaultSingleAssignment::new(Arc::new(model));
        let _ = assignment.assign(1, TestValue::new(x, "A"));
        let _ = trace.take();
        let statistics = assignment.statistics();

        let wrong_owner = catch_unwind(AssertUnwindSafe(|| {
            assignment.assign_variable(2, x, Some(TestValue::new(y, "B")))
        }));
        let constant_target = catch_unwind(AssertUnwindSafe(|| assignment.unassign(3, c)));

        assert!(wrong_owner.is_err());
        assert!(constant_target.is_err());
        assert!(trace.take().is_empty());
        assert_eq!(assignment.get_value(x), Some(&TestValue::new(x, "A")));
        assert_eq!(assignment.get_iteration(x), Some(1));
        assert_eq!(assignment.get_value(y), None);
        assert_eq!(assignment.get_value(c), Some(&TestValue::new(c, "K")));
        assert_eq!(assignment.statistics(), statistics);
    }

    #[test]
    fn rejected_value_leaves_a_partial_change() {
        let trace = Trace::default();
        let mut model: Model<&str, TestValue> = Model::new();
        let x = model.add_variable("x");
        let _ = model.add_constraint(RejectingConstraint::new("B", &trace), &[x]);
        let _ = model.add_global_constraint(TracingConstraint::new("G", &trace));
        model.add_variable_listener(x, TracingVariableListener::new("X", &trace));
        model.add_listener(TracingModelListener::new(&trace));
        let mut assignment = DefaultSingleAssignment::new(Arc::new(model));
        let _ = assignment.assign(1, TestValue::new(x, "A"));
        let _ = trace.take();

        let error = assignment
            .assign(2, TestValue::new(x, "B"))
            .expect_err("the constraint rejects B");

        assert_eq!(error.variable, x);
        assert_eq!(error.step, ChangeStep::ConstraintsAssigned);
        assert!(error.completed.contains(ChangeStep::WriteStorage));
        assert!(!error.completed.contains(ChangeStep::GlobalConstraintsAssigned));
        assert!(matches!(
            error.source,
            CollaboratorError::Rejected { ref name, .. } if name == "R"
        ));
        // The value is stored, but only part of the collaborators know about it.
        assert_eq!(assignment.get_value(x), Some(&TestValue::new(x, "B")));
        assert_eq!(
            trace.take(),
            vec![
                "M.before_unassigned(A)",
                "G.unassigned(A)",
                "X.variable_unassigned(A)",
                "M.after_unassigned(A)",
                "M.before_assigned(B)",
                "R.assigned(B)",
            ]
        );
    }

    #[derive(Debug)]
    struct Assigned {
        count: usize,
        initial: usize,
    }

    impl AssignmentContext for Assigned {}

    #[test]
    fn contexts_are_stable_per_assignment() {
        let mut model: Model<(), TestValue> = Model::new();
        let x = model.add_variable(());
        let reference = model.create_context_reference(|assignment| Assigned {
            count: 0,
            initial: assignment.nr_assigned_variables(),
        });
        let model = Arc::new(model);

        let mut first = DefaultSingleAssignment::new(Arc::clone(&model));
        let _ = first.assign(1, TestValue::new(x, "A"));
        let mut second = DefaultSingleAssignment::new(Arc::clone(&model));

        let context = first.get_assignment_context(&reference);
        context.count += 1;
        let address: *const Assigned = &*context;
        assert_eq!(context.initial, 1);

        let context = first.get_assignment_context(&reference);
        assert_eq!(context.count, 1);
        assert!(std::ptr::eq(&*context, address));

        let context = second.get_assignment_context(&reference);
        assert_eq!(context.count, 0);
        assert_eq!(context.initial, 0);
    }

    #[test]
    fn references_of_distinct_models_are_told_apart() {
        let mut model: Model<(), TestValue> = Model::new();
        let own = model.create_context_reference(|_| Assigned {
            count: 0,
            initial: 0,
        });
        let mut other: Model<(), TestValue> = Model::new();
        let foreign = other.create_context_reference(|_| Assigned {
            count: 100,
            initial: 0,
        });

        assert_eq!(own.id(), foreign.id());
        assert_ne!(own.model(), foreign.model());
        assert_eq!(own.model(), model.id());
    }

    #[test]
    #[should_panic]
    fn reference_of_another_model_is_rejected() {
        let mut model: Model<(), TestValue> = Model::new();
        let own = model.create_context_reference(|_| Assigned {
            count: 0,
            initial: 0,
        });
        let mut other: Model<(), TestValue> = Model::new();
        let foreign = other.create_context_reference(|_| Assigned {
            count: 100,
            initial: 0,
        });
        let mut assignment = DefaultSingleAssignment::new(Arc::new(model));
        assignment.get_assignment_context(&own).count += 1;

        let _ = assignment.get_assignment_context(&foreign);
    }
}
