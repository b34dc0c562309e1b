use std::sync::Arc;

use itertools::Itertools;

use super::Assignment;
use super::AssignmentContextHolder;
use super::DefaultParallelContextHolder;
use super::StoredValue;
use crate::basic_types::CollaboratorError;
use crate::basic_types::Iteration;
use crate::containers::HashMap;
use crate::ifs_assert_simple;
use crate::model::Model;
use crate::model::Value;
use crate::model::VariableId;
use crate::statistics::AssignmentStatistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// A map-backed assignment which is one of several assignments over the same model, told apart by
/// their index.
///
/// Only the assigned variables take up space. The index is reported through
/// [`Assignment::get_index`]; the default holder keeps the contexts of this assignment in the
/// arena of that index.
#[derive(Debug)]
pub struct DefaultParallelAssignment<V, T: Value, H = DefaultParallelContextHolder> {
    index: i32,
    model: Arc<Model<V, T>>,
    values: HashMap<VariableId, StoredValue<T>>,
    contexts: H,
    statistics: AssignmentStatistics,
}

impl<V, T: Value> DefaultParallelAssignment<V, T> {
    pub fn new(index: i32, model: Arc<Model<V, T>>) -> Self {
        Self::with_holder(index, model, DefaultParallelContextHolder::default())
    }
}

impl<V, T: Value, H: AssignmentContextHolder> DefaultParallelAssignment<V, T, H> {
    /// # Panics
    /// If `index` is negative; negative indices are reserved for assignments without an index.
    pub fn with_holder(index: i32, model: Arc<Model<V, T>>, contexts: H) -> Self {
        ifs_assert_simple!(
            index >= 0,
            "the index of a parallel assignment is non-negative, got {index}"
        );
        DefaultParallelAssignment {
            index,
            model,
            values: HashMap::default(),
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

    /// Returns the holder of the contexts of this assignment.
    pub fn contexts(&self) -> &H {
        &self.contexts
    }
}

impl<V, T: Value, H: AssignmentContextHolder> Assignment<V, T>
    for DefaultParallelAssignment<V, T, H>
{
    fn model(&self) -> &Arc<Model<V, T>> {
        &self.model
    }

    fn get_index(&self) -> i32 {
        self.index
    }

    fn get_value_internal(&self, variable: VariableId) -> Option<&T> {
        self.values.get(&variable).map(|stored| &stored.value)
    }

    fn set_value_internal(
        &mut self,
        iteration: Iteration,
        variable: VariableId,
        value: Option<T>,
    ) -> Result<(), CollaboratorError> {
        match value {
            Some(value) => {
                let _ = self
                    .values
                    .insert(variable, StoredValue { value, iteration });
                self.statistics.num_assignments += 1;
            }
            None => {
                if self.values.remove(&variable).is_some() {
                    self.statistics.num_unassignments += 1;
                }
            }
        }
        Ok(())
    }

    /// The assigned variables in increasing order of their id.
    fn assigned_variables(&self) -> Vec<VariableId> {
        self.values.keys().copied().sorted().collect()
    }

    fn nr_assigned_variables(&self) -> usize {
        self.values.len()
    }

    fn get_iteration(&self, variable: VariableId) -> Option<Iteration> {
        self.values.get(&variable).map(|stored| stored.iteration)
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
