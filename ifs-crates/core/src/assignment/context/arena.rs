use super::AssignmentContext;
use super::ContextId;
use crate::containers::KeyedVec;
use crate::ifs_assert_moderate;

/// The contexts of a single assignment, indexed by [`ContextId`].
#[derive(Debug, Default)]
pub struct ContextArena {
    contexts: KeyedVec<ContextId, Option<Box<dyn AssignmentContext>>>,
}

impl ContextArena {
    pub fn contains(&self, id: ContextId) -> bool {
        self.contexts.get(id).is_some_and(Option::is_some)
    }

    /// Returns the context behind `id`, if it has been created and has type `C`.
    pub fn get<C: AssignmentContext>(&self, id: ContextId) -> Option<&C> {
        self.contexts
            .get(id)
            .and_then(Option::as_ref)
            .and_then(|context| (**context).downcast_ref::<C>())
    }

    /// Returns the context behind `id` mutably, if it has been created and has type `C`.
    pub fn get_mut<C: AssignmentContext>(&mut self, id: ContextId) -> Option<&mut C> {
        self.contexts
            .get_mut(id)
            .and_then(Option::as_mut)
            .and_then(|context| (**context).downcast_mut::<C>())
    }

    /// Stores `context` behind `id` and returns it.
    pub fn insert<C: AssignmentContext>(&mut self, id: ContextId, context: C) -> &mut C {
        ifs_assert_moderate!(
            !self.contains(id),
            "a context is only created once per assignment"
        );
        self.contexts.accomodate_with(id, || None);
        let slot = &mut self.contexts[id];
        *slot = Some(Box::new(context));
        slot.as_mut()
            .and_then(|context| (**context).downcast_mut::<C>())
            .expect("the context was just stored with this type")
    }

    /// The number of contexts which have been created.
    pub fn len(&self) -> usize {
        self.contexts.iter().filter(|context| context.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all contexts; they are created again on their next access.
    pub fn clear(&mut self) {
        self.contexts.clear();
    }
}
