//! Assertion macros with a configurable level of checking.
//!
//! Simple assertions guard the contract of the public API (e.g. accessing a node which was never
//! created) and are always enabled. Moderate and advanced assertions re-check internal invariants
//! of the search (e.g. that an operator node holds the value of its operator applied to its
//! children) and are only enabled for tests and with the `debug-checks` feature.

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const LS_ASSERT_LEVEL_DEFINITION: u8 = LS_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const LS_ASSERT_LEVEL_DEFINITION: u8 = LS_ASSERT_ADVANCED;

pub const LS_ASSERT_SIMPLE: u8 = 1;
pub const LS_ASSERT_MODERATE: u8 = 2;
pub const LS_ASSERT_ADVANCED: u8 = 3;

#[macro_export]
#[doc(hidden)]
macro_rules! ls_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::LS_ASSERT_LEVEL_DEFINITION >= $crate::asserts::LS_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! ls_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::LS_ASSERT_LEVEL_DEFINITION >= $crate::asserts::LS_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! ls_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::LS_ASSERT_LEVEL_DEFINITION >= $crate::asserts::LS_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! ls_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::LS_ASSERT_LEVEL_DEFINITION >= $crate::asserts::LS_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}
