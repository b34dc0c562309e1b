//! Assignment contexts: state which a constraint or variable keeps per assignment.
//!
//! A constraint which maintains, say, the set of conflicting values cannot keep that set in
//! itself, since it is shared by every assignment over the model. Instead it obtains a
//! [`ContextReference`] from [`Model::create_context_reference`] while the model is built, and
//! asks the assignment for the context behind it on every notification:
//!
//! ```
//! # use std::sync::Arc;
//! # use ifs_core::assignment::Assignment;
//! # use ifs_core::assignment::AssignmentContext;
//! # use ifs_core::assignment::ContextAccess;
//! # use ifs_core::assignment::DefaultSingleAssignment;
//! # use ifs_core::model::Model;
//! # use ifs_core::model::Value;
//! # use ifs_core::model::VariableId;
//! #[derive(Clone, Debug, PartialEq)]
//! struct Colour(VariableId, u8);
//!
//! impl Value for Colour {
//!     fn variable(&self) -> VariableId {
//!         self.0
//!     }
//! }
//!
//! #[derive(Debug, Default)]
//! struct Changes(usize);
//!
//! impl AssignmentContext for Changes {}
//!
//! let mut model: Model<(), Colour> = Model::new();
//! let x = model.add_variable(());
//! let changes = model.create_context_reference(|_| Changes::default());
//!
//! let mut assignment = DefaultSingleAssignment::new(Arc::new(model));
//! let _ = assignment.assign(0, Colour(x, 1)).expect("no collaborator fails");
//! assignment.get_assignment_context(&changes).0 += 1;
//!
//! assert_eq!(assignment.get_assignment_context(&changes).0, 1);
//! ```
//!
//! Contexts are created lazily, on first access, and live as long as the assignment. They are
//! kept in a [`ContextArena`] per assignment; an [`AssignmentContextHolder`] decides which arena
//! belongs to which assignment, based on [`Assignment::get_index`].
mod arena;
mod holder;

use std::fmt::Debug;
use std::fmt::Formatter;
use std::marker::PhantomData;
use std::sync::Arc;

pub use arena::ContextArena;
use downcast_rs::impl_downcast;
use downcast_rs::Downcast;
pub use holder::AssignmentContextHolder;
pub use holder::DefaultParallelContextHolder;
pub use holder::DefaultSingleContextHolder;
use log::debug;

use crate::assignment::Assignment;
use crate::containers::StorageKey;
use crate::ifs_assert_simple;
#[cfg(doc)]
use crate::model::Model;
use crate::model::ModelId;
use crate::model::Value;

/// State kept per assignment on behalf of a constraint or variable.
pub trait AssignmentContext: Downcast + Debug + Send {}

// A context is stored as `Box<dyn AssignmentContext>` in the arena and handed out as its concrete
// type.
impl_downcast!(AssignmentContext);

/// An identifier to a kind of [`AssignmentContext`] within a model.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ContextId(u32);

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContextId({})", self.0)
    }
}

impl StorageKey for ContextId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        ContextId(index as u32)
    }
}

type ContextFactory<V, T, C> = dyn Fn(&dyn Assignment<V, T>) -> C + Send + Sync;

/// A typed handle to a kind of [`AssignmentContext`].
///
/// Each reference is created by one model together with exactly one context type `C`. Context ids
/// are only unique within their model, so a reference may only be used with assignments over the
/// model which created it; then the context behind its [`ContextId`] in any arena has type `C`.
pub struct ContextReference<V, T: Value, C> {
    model: ModelId,
    id: ContextId,
    create: Arc<ContextFactory<V, T, C>>,
    context: PhantomData<fn() -> C>,
}

impl<V, T: Value, C: AssignmentContext> ContextReference<V, T, C> {
    pub(crate) fn new(
        model: ModelId,
        id: ContextId,
        create: impl Fn(&dyn Assignment<V, T>) -> C + Send + Sync + 'static,
    ) -> Self {
        ContextReference {
            model,
            id,
            create: Arc::new(create),
            context: PhantomData,
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    /// The model which created this reference.
    pub fn model(&self) -> ModelId {
        self.model
    }

    fn create(&self, assignment: &dyn Assignment<V, T>) -> C {
        (self.create)(assignment)
    }
}

impl<V, T: Value, C> Clone for ContextReference<V, T, C> {
    fn clone(&self) -> Self {
        ContextReference {
            model: self.model,
            id: self.id,
            create: Arc::clone(&self.create),
            context: PhantomData,
        }
    }
}

impl<V, T: Value, C> Debug for ContextReference<V, T, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextReference")
            .field("model", &self.model)
            .field("id", &self.id)
            .field("create", &"<Factory>")
            .finish()
    }
}

/// Access to the [`AssignmentContext`]s of an assignment.
///
/// Implemented for every [`Assignment`], including `dyn Assignment`, which is what constraints and
/// listeners receive in their notifications.
pub trait ContextAccess<V, T: Value> {
    /// Returns the context behind `reference` in this assignment, creating it on first access.
    ///
    /// Two calls with the same reference on the same assignment return the same object; calls on
    /// two different assignments return independent objects.
    ///
    /// # Panics
    /// If `reference` was created by another model than the one of this assignment.
    fn get_assignment_context<C: AssignmentContext>(
        &mut self,
        reference: &ContextReference<V, T, C>,
    ) -> &mut C;
}

impl<V, T, A> ContextAccess<V, T> for A
where
    T: Value,
    A: Assignment<V, T> + ?Sized,
{
    fn get_assignment_context<C: AssignmentContext>(
        &mut self,
        reference: &ContextReference<V, T, C>,
    ) -> &mut C {
        ifs_assert_simple!(
            reference.model() == self.model().id(),
            "{} of {} is used with an assignment over {}",
            reference.id(),
            reference.model(),
            self.model().id()
        );
        let index = self.get_index();
        let exists = self
            .context_holder()
            .arena(index)
            .is_some_and(|arena| arena.contains(reference.id()));
        // The factory may inspect the assignment, so the context is created before the arena is
        // borrowed mutably.
        let created = if exists {
            None
        } else {
            Some(reference.create(self.as_dyn()))
        };

        let arena = self.context_holder_mut().arena_mut(index);
        match created {
            Some(context) => {
                debug!(
                    "created {} for assignment {index}: {context:?}",
                    reference.id()
                );
                arena.insert(reference.id(), context)
            }
            None => arena
                .get_mut(reference.id())
                .expect("the context was found in the arena"),
        }
    }
}
