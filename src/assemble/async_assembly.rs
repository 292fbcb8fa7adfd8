//! The mixed composer, tolerating synchronous and asynchronous steps.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::Instrument;

use super::step::{AsyncStep, Contribute, Step, SyncStep, absorb};
use super::sync_assembly::SyncAssembly;
use crate::error::TypedRunError;
use crate::props::Props;

/// An ordered sequence of synchronous and asynchronous steps.
///
/// Running the assembly always yields a future, even when every step is
/// synchronous. Steps are applied strictly one after another: an
/// asynchronous step is awaited before the next step is invoked, so each
/// step observes every earlier contribution.
///
/// Asynchronous steps receive an owned snapshot of the bag, which lets the
/// returned future outlive the borrow of the accumulator.
///
/// # Examples
///
/// ```
/// use assembly::assemble::Assembly;
/// use assembly::props;
/// use assembly::props::Props;
/// use std::convert::Infallible;
///
/// # futures::executor::block_on(async {
/// let assembly = Assembly::<Infallible>::new()
///     .then_async(|_props: Props| async { props! { "one" => true } })
///     .then(|props: &Props| props! { "two" => props.contains_key("one") });
///
/// let result = assembly.run(Props::new()).await.unwrap();
/// assert_eq!(result, props! { "one" => true, "two" => true });
/// # });
/// ```
pub struct Assembly<E> {
    steps: Arc<Vec<Step<E>>>,
}

impl<E> Assembly<E> {
    /// Creates an assembly with no steps.
    #[inline]
    pub fn new() -> Self {
        Self {
            steps: Arc::new(Vec::new()),
        }
    }

    /// Appends an already wrapped step of either kind.
    ///
    /// Clones made before this call keep their own step list.
    #[must_use]
    pub fn then_step(mut self, step: impl Into<Step<E>>) -> Self {
        Arc::make_mut(&mut self.steps).push(step.into());
        self
    }

    /// Appends every step of `other`, after the steps of `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use assembly::assemble::{Assembly, SyncAssembly};
    /// use assembly::props::Props;
    /// use std::convert::Infallible;
    ///
    /// let prepare = SyncAssembly::<Infallible>::new().then(|_: &Props| ());
    /// let assembly = Assembly::new().then(|_: &Props| ()).chain(prepare);
    /// assert_eq!(assembly.len(), 2);
    /// ```
    #[must_use]
    pub fn chain(mut self, other: impl Into<Self>) -> Self {
        let other = other.into();
        Arc::make_mut(&mut self.steps).extend(other.steps.iter().cloned());
        self
    }

    /// Returns the number of steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the assembly has no steps.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the steps in application order.
    #[inline]
    pub fn steps(&self) -> &[Step<E>] {
        &self.steps
    }

    /// Applies every step, in order, to `props`.
    ///
    /// # Errors
    ///
    /// Resolves to the error of the first failing step, unchanged. No later
    /// step is invoked.
    pub async fn run(&self, props: Props) -> Result<Props, E> {
        let span = tracing::debug_span!("assembly", mode = "mixed", steps = self.steps.len());
        self.apply_steps(props).instrument(span).await
    }

    async fn apply_steps(&self, props: Props) -> Result<Props, E> {
        let mut accumulator = props;
        for (index, step) in self.steps.iter().enumerate() {
            let resolved = match step {
                Step::Sync(step) => step.apply(&accumulator),
                Step::Async(step) => step.apply(accumulator.clone()).await,
            };
            let contribution = resolved.inspect_err(|_| {
                tracing::debug!(step = index, kind = step.kind(), "assembly step failed");
            })?;
            absorb(&mut accumulator, index, step.kind(), contribution);
        }
        Ok(accumulator)
    }

    /// Encodes `input` as a bag, runs the assembly and decodes the result.
    ///
    /// # Errors
    ///
    /// Resolves to [`TypedRunError::Step`] if a step fails, or
    /// [`TypedRunError::Props`] if `input` is not object-shaped or the final
    /// bag does not match `O`.
    pub async fn run_typed<I, O>(&self, input: &I) -> Result<O, TypedRunError<E>>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let props = Props::from_serializable(input)?;
        let output = self.run(props).await.map_err(TypedRunError::Step)?;
        Ok(output.deserialize_into()?)
    }
}

impl<E: Send + 'static> Assembly<E> {
    /// Appends a synchronous step.
    #[must_use]
    pub fn then<F, C>(self, step: F) -> Self
    where
        F: Fn(&Props) -> C + Send + Sync + 'static,
        C: Contribute<E> + 'static,
    {
        self.then_step(SyncStep::new(step))
    }

    /// Appends an asynchronous step.
    ///
    /// The step receives a snapshot of the bag and returns a future resolving
    /// to anything implementing [`Contribute`].
    #[must_use]
    pub fn then_async<F, Fut, C>(self, step: F) -> Self
    where
        F: Fn(Props) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = C> + Send + 'static,
        C: Contribute<E> + 'static,
    {
        self.then_step(AsyncStep::new(step))
    }

    /// Turns the assembly into a reusable composed function.
    ///
    /// Every call returns an independent future owning its own bag, so calls
    /// may run concurrently. The step list is shared by every call.
    ///
    /// # Examples
    ///
    /// ```
    /// use assembly::{assemble, props};
    /// use assembly::props::Props;
    /// use std::convert::Infallible;
    ///
    /// let composed = assemble!(=>> |_props: Props| async { props! { "one" => true } })
    ///     .into_fn();
    ///
    /// let result: Result<Props, Infallible> =
    ///     futures::executor::block_on(composed(props! { "pre" => 1 }));
    /// assert_eq!(result.unwrap(), props! { "pre" => 1, "one" => true });
    /// ```
    pub fn into_fn(
        self,
    ) -> impl Fn(Props) -> BoxFuture<'static, Result<Props, E>> + Send + Sync + Clone {
        let assembly = Arc::new(self);
        move |props: Props| -> BoxFuture<'static, Result<Props, E>> {
            let assembly = Arc::clone(&assembly);
            Box::pin(async move { assembly.run(props).await })
        }
    }
}

impl<E> From<SyncAssembly<E>> for Assembly<E> {
    fn from(assembly: SyncAssembly<E>) -> Self {
        assembly.steps().iter().cloned().map(Step::Sync).collect()
    }
}

impl<E> Default for Assembly<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Assembly<E> {
    fn clone(&self) -> Self {
        Self {
            steps: Arc::clone(&self.steps),
        }
    }
}

impl<E> fmt::Debug for Assembly<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let asynchronous = self.steps.iter().filter(|step| step.is_async()).count();
        formatter
            .debug_struct("Assembly")
            .field("steps", &self.steps.len())
            .field("async_steps", &asynchronous)
            .finish()
    }
}

impl<E> FromIterator<Step<E>> for Assembly<E> {
    fn from_iter<I: IntoIterator<Item = Step<E>>>(iter: I) -> Self {
        Self {
            steps: Arc::new(iter.into_iter().collect()),
        }
    }
}
