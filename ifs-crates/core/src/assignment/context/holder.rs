use std::fmt::Debug;

use super::ContextArena;
#[cfg(doc)]
use crate::assignment::Assignment;
use crate::containers::HashMap;

/// Decides in which [`ContextArena`] the contexts of an assignment are kept.
///
/// The arenas are selected by the index of the assignment (see [`Assignment::get_index`]).
pub trait AssignmentContextHolder: Debug + Send {
    /// The arena of the assignment with `index`, if it has been created.
    fn arena(&self, index: i32) -> Option<&ContextArena>;

    /// The arena of the assignment with `index`, created if needed.
    fn arena_mut(&mut self, index: i32) -> &mut ContextArena;
}

/// A holder with a single arena, used for an assignment which owns its holder exclusively.
///
/// The index of the assignment is ignored.
#[derive(Debug, Default)]
pub struct DefaultSingleContextHolder {
    arena: ContextArena,
}

impl AssignmentContextHolder for DefaultSingleContextHolder {
    fn arena(&self, _index: i32) -> Option<&ContextArena> {
        Some(&self.arena)
    }

    fn arena_mut(&mut self, _index: i32) -> &mut ContextArena {
        &mut self.arena
    }
}

/// A holder which keeps the contexts of an assignment in the arena of the index the assignment
/// reports.
///
/// Arenas are created on first use, so only the indices which are actually accessed take up space.
/// Every negative index (an assignment without an index) maps to the primary arena.
#[derive(Debug, Default)]
pub struct DefaultParallelContextHolder {
    primary: ContextArena,
    indexed: HashMap<i32, ContextArena>,
}

impl DefaultParallelContextHolder {
    /// The number of arenas which have been created for non-negative indices.
    pub fn num_arenas(&self) -> usize {
        self.indexed.len()
    }
}

impl AssignmentContextHolder for DefaultParallelContextHolder {
    fn arena(&self, index: i32) -> Option<&ContextArena> {
        if index < 0 {
            Some(&self.primary)
        } else {
            self.indexed.get(&index)
        }
    }

    fn arena_mut(&mut self, index: i32) -> &mut ContextArena {
        if index < 0 {
            &mut self.primary
        } else {
            self.indexed.entry(index).or_default()
        }
    }
}
