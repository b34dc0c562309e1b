//! Leveled assertions for contract checks.
//!
//! Simple assertions guard the preconditions of the assignment operations and are always on.
//! Advanced assertions re-check the state of an assignment after every change; they are only
//! enabled with the `debug-checks` feature since they walk the whole storage.

#[cfg(not(feature = "debug-checks"))]
pub const IFS_ASSERT_LEVEL_DEFINITION: u8 = IFS_ASSERT_SIMPLE;

#[cfg(feature = "debug-checks")]
pub const IFS_ASSERT_LEVEL_DEFINITION: u8 = IFS_ASSERT_ADVANCED;

pub const IFS_ASSERT_SIMPLE: u8 = 1;
pub const IFS_ASSERT_MODERATE: u8 = 2;
pub const IFS_ASSERT_ADVANCED: u8 = 3;

#[macro_export]
#[doc(hidden)]
macro_rules! ifs_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::IFS_ASSERT_LEVEL_DEFINITION >= $crate::asserts::IFS_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! ifs_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::IFS_ASSERT_LEVEL_DEFINITION >= $crate::asserts::IFS_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! ifs_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::IFS_ASSERT_LEVEL_DEFINITION >= $crate::asserts::IFS_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! ifs_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::IFS_ASSERT_LEVEL_DEFINITION >= $crate::asserts::IFS_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}
