//! Fail-fast contract checks.
//!
//! Contract violations are programming errors: states the search's invariants
//! guarantee can never occur in correct usage. They are logged and then
//! panic. Expected infeasibility (a failed extension, a dominated candidate)
//! never goes through here.

/// Assert a contract condition in every build profile.
///
/// On failure an error event is emitted with the stringified condition and
/// source location, then the thread panics.
///
/// ```should_panic
/// rcsp_kernel::contract!(1 + 1 == 3);
/// ```
#[macro_export]
macro_rules! contract {
    ($cond:expr $(,)?) => {
        $crate::contract!($cond, "{}", stringify!($cond))
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            let detail = format!($($arg)+);
            $crate::__tracing::error!(
                condition = stringify!($cond),
                file = file!(),
                line = line!(),
                detail = %detail,
                "CONTRACT_VIOLATION: assertion failed"
            );
            panic!(
                "contract violated: [{}] ({})\n\tWhere: {}:{}",
                stringify!($cond),
                detail,
                file!(),
                line!()
            );
        }
    };
}
