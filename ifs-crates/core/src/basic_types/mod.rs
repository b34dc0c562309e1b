mod errors;

pub use errors::*;

/// The logical step number of the search, supplied by the caller with every change.
///
/// It is passed through untouched to all notifications and stored next to each value; it is not
/// checked for monotonicity.
pub type Iteration = u64;
