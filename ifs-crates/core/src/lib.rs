//! # IFS core
//! The assignment core of an iterative forward search solver.
//!
//! A search repeatedly picks a variable, chooses a value for it and stores that value in an
//! assignment, undoing conflicting choices along the way. This crate provides the part of such a
//! solver which is independent of the search itself:
//! - a [`Model`](model::Model) of variables (possibly with a fixed value), constraints over
//!   them, global constraints and listeners;
//! - the [`Assignment`](assignment::Assignment) trait, which every change of a value goes
//!   through, notifying the model, the constraints and the listeners in a fixed order;
//! - two storage backends: [`DefaultSingleAssignment`](assignment::DefaultSingleAssignment),
//!   backed by one slot per variable, and
//!   [`DefaultParallelAssignment`](assignment::DefaultParallelAssignment), backed by a map and
//!   carrying an index so that several of them can search the same model;
//! - per-assignment [`AssignmentContext`](assignment::AssignmentContext)s, through which
//!   constraints keep state for each assignment separately.
//!
//! # Example
//! ```rust
//! # use std::sync::Arc;
//! # use ifs_core::assignment::Assignment;
//! # use ifs_core::assignment::DefaultSingleAssignment;
//! # use ifs_core::model::Model;
//! # use ifs_core::model::Value;
//! # use ifs_core::model::VariableId;
//! #[derive(Clone, Debug, PartialEq)]
//! struct Room {
//!     lecture: VariableId,
//!     number: u32,
//! }
//!
//! impl Value for Room {
//!     fn variable(&self) -> VariableId {
//!         self.lecture
//!     }
//! }
//!
//! let mut model: Model<&str, Room> = Model::new();
//! let algebra = model.add_variable("algebra");
//! let model = Arc::new(model);
//!
//! let mut assignment = DefaultSingleAssignment::new(Arc::clone(&model));
//! let previous = assignment
//!     .assign(1, Room { lecture: algebra, number: 101 })
//!     .expect("nothing listens to the model");
//! assert_eq!(previous, None);
//!
//! let previous = assignment
//!     .assign(2, Room { lecture: algebra, number: 204 })
//!     .expect("nothing listens to the model");
//! assert_eq!(previous.map(|room| room.number), Some(101));
//! assert_eq!(assignment.get_iteration(algebra), Some(2));
//! assert_eq!(assignment.nr_unassigned_variables(&model), 0);
//! ```
#[doc(hidden)]
pub mod asserts;
mod basic_types;

pub mod assignment;
pub mod containers;
pub mod model;
pub mod statistics;

pub use basic_types::*;
