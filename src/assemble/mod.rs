//! Composition of step functions over a property bag.
//!
//! An assembly applies an ordered list of steps to an initial [`Props`]
//! bag. Each step reads the bag as left by the steps before it and may
//! contribute an object of new or updated properties, which is
//! shallow-merged onto the bag.
//!
//! # Overview
//!
//! - [`SyncAssembly`]: synchronous steps only, returns the final bag directly
//! - [`Assembly`]: synchronous and asynchronous steps, always returns a future
//! - [`assemble_sync!`]: builds a [`SyncAssembly`] from a list of steps
//! - [`assemble!`]: builds an [`Assembly`], `=>>` marking asynchronous steps
//! - [`Contribute`]: normalizes a step's return into an optional contribution
//!
//! # Examples
//!
//! ## Synchronous assembly
//!
//! ```
//! use assembly::{assemble_sync, props};
//! use assembly::props::Props;
//! use std::convert::Infallible;
//!
//! let say_hello = assemble_sync!(
//!     |props: &Props| {
//!         let name = props.get("name").and_then(|name| name.as_str()).unwrap_or_default();
//!         props! { "message" => format!("Hello {name}") }
//!     },
//!     |props: &Props| println!("{}", props.get("message").unwrap()),
//! );
//!
//! let result: Result<Props, Infallible> = say_hello.run(props! { "name" => "World" });
//! assert_eq!(result.unwrap().get("message"), Some(&serde_json::json!("Hello World")));
//! ```
//!
//! ## Failing step
//!
//! A step returning `Err` stops the assembly and the error is returned as is.
//!
//! ```
//! use assembly::{assemble_sync, props};
//! use assembly::props::Props;
//!
//! let assembly = assemble_sync!(
//!     |_: &Props| Err::<Props, _>("no name"),
//!     |_: &Props| -> Result<Props, &'static str> { unreachable!("never invoked") },
//! );
//!
//! assert_eq!(assembly.run(Props::new()), Err("no name"));
//! ```
//!
//! # Laws
//!
//! - **Identity**: an assembly without steps returns its input unchanged
//! - **Key preservation**: every key of the input is a key of the output
//! - **Last write wins**: on a key collision, the later step's value is kept
//! - **Ignored returns**: a step returning `()` or a non-object value leaves the bag unchanged

mod assemble_macro;
#[cfg(feature = "async")]
mod async_assembly;
mod step;
mod sync_assembly;

#[cfg(feature = "async")]
pub use async_assembly::Assembly;
#[cfg(feature = "async")]
pub use step::AsyncStep;
pub use step::{Contribute, Step, SyncStep};
pub use sync_assembly::SyncAssembly;

pub use crate::props::Props;

// Re-export macros (they are already at crate root via #[macro_export])
#[cfg(feature = "async")]
pub use crate::assemble;
pub use crate::assemble_sync;
