//! The `assemble!` and `assemble_sync!` macros.
//!
//! Both macros build an assembly from a list of steps in application order.
//! `assemble!` uses the same bind operator (`=>>`) as the crate's other
//! effectful pipelines to mark a step whose result must be awaited.

/// Builds a [`SyncAssembly`](crate::assemble::SyncAssembly) from synchronous steps.
///
/// `assemble_sync!(f, g, h)` is equivalent to
/// `SyncAssembly::new().then(f).then(g).then(h)`.
///
/// # Syntax
///
/// - `assemble_sync!()` - An assembly with no steps
/// - `assemble_sync!(f)` - An assembly applying `f`
/// - `assemble_sync!(f, g, ...)` - Steps are applied left to right
///
/// # Examples
///
/// ```
/// use assembly::{assemble_sync, props};
/// use assembly::props::Props;
/// use std::convert::Infallible;
///
/// let assembly = assemble_sync!(
///     |_: &Props| props! { "x" => 1 },
///     |_: &Props| props! { "x" => 2 },
/// );
///
/// let result: Result<Props, Infallible> = assembly.run(Props::new());
/// assert_eq!(result.unwrap(), props! { "x" => 2 });
/// ```
#[macro_export]
macro_rules! assemble_sync {
    () => {
        $crate::assemble::SyncAssembly::new()
    };

    ($($step:expr),+ $(,)?) => {
        $crate::assemble::SyncAssembly::new()
            $(.then($step))+
    };
}

/// Builds an [`Assembly`](crate::assemble::Assembly) from mixed steps.
///
/// # Syntax
///
/// - `assemble!()` - An assembly with no steps
/// - `assemble!(f)` - `f` is a synchronous step (`Fn(&Props) -> C`)
/// - `assemble!(=>> f)` - `f` is an asynchronous step (`Fn(Props) -> impl Future`)
/// - `assemble!(f, =>> g, h, ...)` - Steps are applied left to right
///
/// # Examples
///
/// ```
/// use assembly::{assemble, props};
/// use assembly::props::Props;
/// use std::convert::Infallible;
///
/// let assembly = assemble!(
///     =>> |_props: Props| async { props! { "one" => true } },
///     |props: &Props| props! { "two" => !props.contains_key("one") },
/// );
///
/// let result: Result<Props, Infallible> =
///     futures::executor::block_on(assembly.run(Props::new()));
/// assert_eq!(result.unwrap(), props! { "one" => true, "two" => false });
/// ```
#[cfg(feature = "async")]
#[macro_export]
macro_rules! assemble {
    () => {
        $crate::assemble::Assembly::new()
    };

    ($($steps:tt)+) => {
        $crate::__assemble_steps!($crate::assemble::Assembly::new(); $($steps)+)
    };
}

#[cfg(feature = "async")]
#[doc(hidden)]
#[macro_export]
macro_rules! __assemble_steps {
    // Bind operator with optional trailing comma (terminal case)
    ($assembly:expr; =>> $step:expr $(,)?) => {
        $assembly.then_async($step)
    };

    // Bind operator with continuation
    ($assembly:expr; =>> $step:expr, $($rest:tt)+) => {
        $crate::__assemble_steps!($assembly.then_async($step); $($rest)+)
    };

    // Synchronous step with optional trailing comma (terminal case)
    ($assembly:expr; $step:expr $(,)?) => {
        $assembly.then($step)
    };

    // Synchronous step with continuation
    ($assembly:expr; $step:expr, $($rest:tt)+) => {
        $crate::__assemble_steps!($assembly.then($step); $($rest)+)
    };
}
