//! Step functions and their contributions.
//!
//! A step reads the current [`Props`] and returns anything implementing
//! [`Contribute`]. The return is normalized to `Result<Option<Props>, E>`:
//!
//! | Step returns                      | Contribution                  |
//! |-----------------------------------|-------------------------------|
//! | `Props`, `serde_json::Map`        | merged onto the bag           |
//! | `serde_json::Value::Object`       | merged onto the bag           |
//! | `()`, `None`                      | nothing                       |
//! | other JSON values, primitives     | nothing (silently ignored)    |
//! | `Err(error)`                      | the run fails with `error`    |
//!
//! Futures do not implement [`Contribute`], so an asynchronous step can only
//! be added to an [`Assembly`](crate::assemble::Assembly), never to a
//! [`SyncAssembly`](crate::assemble::SyncAssembly).

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "async")]
use futures::future::BoxFuture;
use serde_json::{Map, Value};

use crate::props::Props;

/// Converts a step's return value into an optional contribution.
///
/// `E` is the step error type of the assembly the step belongs to.
///
/// # Examples
///
/// ```
/// use assembly::assemble::Contribute;
/// use assembly::props;
/// use std::convert::Infallible;
///
/// let merged: Result<_, Infallible> = props! { "a" => true }.contribute();
/// assert_eq!(merged.unwrap(), Some(props! { "a" => true }));
///
/// let ignored: Result<_, Infallible> = 5_i32.contribute();
/// assert_eq!(ignored.unwrap(), None);
/// ```
pub trait Contribute<E> {
    /// Normalizes `self` into a contribution.
    ///
    /// # Errors
    ///
    /// Returns the step's error when `self` represents a failed step.
    fn contribute(self) -> Result<Option<Props>, E>;
}

impl<E> Contribute<E> for () {
    #[inline]
    fn contribute(self) -> Result<Option<Props>, E> {
        Ok(None)
    }
}

impl<E> Contribute<E> for Props {
    #[inline]
    fn contribute(self) -> Result<Option<Props>, E> {
        Ok(Some(self))
    }
}

impl<E> Contribute<E> for Map<String, Value> {
    #[inline]
    fn contribute(self) -> Result<Option<Props>, E> {
        Ok(Some(Props::from(self)))
    }
}

/// Only objects contribute. Arrays are ignored like any other non-object
/// value; their elements are never spread as index keys.
impl<E> Contribute<E> for Value {
    fn contribute(self) -> Result<Option<Props>, E> {
        match self {
            Self::Object(entries) => Ok(Some(Props::from(entries))),
            _ => Ok(None),
        }
    }
}

impl<E, T> Contribute<E> for Option<T>
where
    T: Contribute<E>,
{
    fn contribute(self) -> Result<Option<Props>, E> {
        self.map_or(Ok(None), Contribute::contribute)
    }
}

impl<E, T> Contribute<E> for Result<T, E>
where
    T: Contribute<E>,
{
    fn contribute(self) -> Result<Option<Props>, E> {
        self?.contribute()
    }
}

macro_rules! ignored_contribution {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl<E> Contribute<E> for $ty {
                #[inline]
                fn contribute(self) -> Result<Option<Props>, E> {
                    Ok(None)
                }
            }
        )+
    };
}

ignored_contribution!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
);

impl<E> Contribute<E> for &str {
    #[inline]
    fn contribute(self) -> Result<Option<Props>, E> {
        Ok(None)
    }
}

type SyncStepFn<E> = dyn Fn(&Props) -> Result<Option<Props>, E> + Send + Sync;

#[cfg(feature = "async")]
type AsyncStepFn<E> = dyn Fn(Props) -> BoxFuture<'static, Result<Option<Props>, E>> + Send + Sync;

/// A synchronous step: reads the bag by reference and returns immediately.
pub struct SyncStep<E> {
    function: Arc<SyncStepFn<E>>,
}

impl<E: 'static> SyncStep<E> {
    /// Wraps a function as a synchronous step.
    pub fn new<F, C>(function: F) -> Self
    where
        F: Fn(&Props) -> C + Send + Sync + 'static,
        C: Contribute<E> + 'static,
    {
        Self {
            function: Arc::new(move |props: &Props| function(props).contribute()),
        }
    }
}

impl<E> SyncStep<E> {
    /// Invokes the step on the current bag.
    ///
    /// # Errors
    ///
    /// Returns the step's own error unchanged.
    #[inline]
    pub fn apply(&self, props: &Props) -> Result<Option<Props>, E> {
        (self.function)(props)
    }
}

impl<E> Clone for SyncStep<E> {
    fn clone(&self) -> Self {
        Self {
            function: Arc::clone(&self.function),
        }
    }
}

impl<E> fmt::Debug for SyncStep<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("SyncStep(<function>)")
    }
}

/// An asynchronous step: receives a snapshot of the bag and resolves later.
#[cfg(feature = "async")]
pub struct AsyncStep<E> {
    function: Arc<AsyncStepFn<E>>,
}

#[cfg(feature = "async")]
impl<E: Send + 'static> AsyncStep<E> {
    /// Wraps a future-returning function as an asynchronous step.
    pub fn new<F, Fut, C>(function: F) -> Self
    where
        F: Fn(Props) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = C> + Send + 'static,
        C: Contribute<E> + 'static,
    {
        Self {
            function: Arc::new(move |props: Props| {
                let pending = function(props);
                Box::pin(async move { pending.await.contribute() })
                    as BoxFuture<'static, Result<Option<Props>, E>>
            }),
        }
    }
}

#[cfg(feature = "async")]
impl<E> AsyncStep<E> {
    /// Invokes the step on a snapshot of the current bag.
    ///
    /// The returned future resolves to the step's contribution, or to the
    /// step's own error unchanged.
    #[inline]
    pub fn apply(&self, props: Props) -> BoxFuture<'static, Result<Option<Props>, E>> {
        (self.function)(props)
    }
}

#[cfg(feature = "async")]
impl<E> Clone for AsyncStep<E> {
    fn clone(&self) -> Self {
        Self {
            function: Arc::clone(&self.function),
        }
    }
}

#[cfg(feature = "async")]
impl<E> fmt::Debug for AsyncStep<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("AsyncStep(<function>)")
    }
}

/// A step of either kind.
///
/// The mixed [`Assembly`](crate::assemble::Assembly) stores a sequence of
/// these and resolves each one before merging its contribution.
pub enum Step<E> {
    /// A step that returns its contribution immediately.
    Sync(SyncStep<E>),
    /// A step whose contribution must be awaited.
    #[cfg(feature = "async")]
    Async(AsyncStep<E>),
}

impl<E> Step<E> {
    /// Returns `true` if the step must be awaited.
    #[inline]
    pub const fn is_async(&self) -> bool {
        match self {
            Self::Sync(_) => false,
            #[cfg(feature = "async")]
            Self::Async(_) => true,
        }
    }

    /// Returns the kind of the step, as recorded in trace events.
    #[inline]
    pub const fn kind(&self) -> &'static str {
        if self.is_async() { "async" } else { "sync" }
    }
}

impl<E: 'static> Step<E> {
    /// Wraps a function as a synchronous step.
    pub fn sync<F, C>(function: F) -> Self
    where
        F: Fn(&Props) -> C + Send + Sync + 'static,
        C: Contribute<E> + 'static,
    {
        Self::Sync(SyncStep::new(function))
    }
}

#[cfg(feature = "async")]
impl<E: Send + 'static> Step<E> {
    /// Wraps a future-returning function as an asynchronous step.
    pub fn asynchronous<F, Fut, C>(function: F) -> Self
    where
        F: Fn(Props) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = C> + Send + 'static,
        C: Contribute<E> + 'static,
    {
        Self::Async(AsyncStep::new(function))
    }
}

impl<E> From<SyncStep<E>> for Step<E> {
    fn from(step: SyncStep<E>) -> Self {
        Self::Sync(step)
    }
}

#[cfg(feature = "async")]
impl<E> From<AsyncStep<E>> for Step<E> {
    fn from(step: AsyncStep<E>) -> Self {
        Self::Async(step)
    }
}

impl<E> Clone for Step<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Sync(step) => Self::Sync(step.clone()),
            #[cfg(feature = "async")]
            Self::Async(step) => Self::Async(step.clone()),
        }
    }
}

impl<E> fmt::Debug for Step<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(step) => step.fmt(formatter),
            #[cfg(feature = "async")]
            Self::Async(step) => step.fmt(formatter),
        }
    }
}

/// Shallow-merges a resolved contribution onto the accumulator.
pub(crate) fn absorb(
    accumulator: &mut Props,
    index: usize,
    kind: &'static str,
    contribution: Option<Props>,
) {
    match contribution {
        Some(contribution) => {
            tracing::trace!(
                step = index,
                kind,
                keys = contribution.len(),
                "step contributed properties"
            );
            accumulator.merge(contribution);
        }
        None => tracing::trace!(step = index, kind, "step contributed nothing"),
    }
}
