//! # assembly
//!
//! Compose synchronous and asynchronous step functions over a property bag.
//!
//! ## Overview
//!
//! An *assembly* is an ordered list of steps. Running it threads a property
//! bag through every step, left to right. Each step may contribute new or
//! updated properties, which are shallow-merged onto the bag; a step
//! returning nothing, or anything that is not an object, leaves the bag
//! unchanged. The library includes:
//!
//! - **Property bags**: [`Props`](props::Props), a string-keyed map of JSON values
//! - **Synchronous assemblies**: [`SyncAssembly`](assemble::SyncAssembly), never suspends
//! - **Mixed assemblies**: [`Assembly`](assemble::Assembly), awaits asynchronous steps in order
//! - **Macros**: `props!`, `assemble_sync!`, `assemble!`
//! - **Typed runs**: serde conversion of inputs and outputs at the boundary
//!
//! ## Feature Flags
//!
//! - `async`: Mixed assemblies with asynchronous steps (enabled by default)
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use assembly::prelude::*;
//! use std::convert::Infallible;
//!
//! let assembly = assemble_sync!(
//!     |_: &Props| props! { "a" => true },
//!     |_: &Props| 5,
//! );
//!
//! let result: Result<Props, Infallible> = assembly.run(props! { "pre" => 1 });
//! assert_eq!(result.unwrap(), props! { "pre" => 1, "a" => true });
//! ```
//!
//! ## Logging
//!
//! Runs are instrumented with [`tracing`]: one `assembly` span per run and a
//! `trace` event per step. No subscriber is installed by this crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types, traits and macros.
///
/// # Usage
///
/// ```rust
/// use assembly::prelude::*;
/// ```
pub mod prelude {
    pub use crate::assemble::*;

    pub use crate::error::{PropsError, TypedRunError};

    pub use crate::props;
}

pub mod assemble;
pub mod error;
pub mod props;

#[cfg(test)]
mod tests {
    use crate::assemble::{Contribute, SyncAssembly};
    use crate::props::Props;
    use std::convert::Infallible;

    static_assertions::assert_impl_all!(Props: Send, Sync, Clone);
    static_assertions::assert_impl_all!(SyncAssembly<Infallible>: Send, Sync, Clone);
    static_assertions::assert_impl_all!(SyncAssembly<std::rc::Rc<()>>: Send, Sync);
    static_assertions::assert_not_impl_any!(
        std::future::Ready<Props>: Contribute<Infallible>
    );

    #[cfg(feature = "async")]
    static_assertions::assert_impl_all!(crate::assemble::Assembly<Infallible>: Send, Sync, Clone);
}
