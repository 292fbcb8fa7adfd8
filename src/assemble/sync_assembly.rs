//! The synchronous composer.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::step::{Contribute, SyncStep, absorb};
use crate::error::TypedRunError;
use crate::props::Props;

/// An ordered sequence of synchronous steps applied to a property bag.
///
/// Running the assembly never suspends: [`SyncAssembly::run`] returns the
/// final bag directly. Steps returning a future are rejected when the
/// assembly is built, because futures do not implement [`Contribute`].
///
/// # Examples
///
/// ```
/// use assembly::assemble::SyncAssembly;
/// use assembly::props;
/// use assembly::props::Props;
/// use std::convert::Infallible;
///
/// let greet = SyncAssembly::<Infallible>::new()
///     .then(|props: &Props| {
///         let name = props.get("name").and_then(|name| name.as_str()).unwrap_or("nobody");
///         props! { "message" => format!("Hello {name}") }
///     })
///     .then(|props: &Props| {
///         assert!(props.contains_key("message"));
///     });
///
/// let result = greet.run(props! { "name" => "World" }).unwrap();
/// assert_eq!(result, props! { "name" => "World", "message" => "Hello World" });
/// ```
pub struct SyncAssembly<E> {
    steps: Arc<Vec<SyncStep<E>>>,
}

impl<E> SyncAssembly<E> {
    /// Creates an assembly with no steps.
    #[inline]
    pub fn new() -> Self {
        Self {
            steps: Arc::new(Vec::new()),
        }
    }

    /// Appends an already wrapped step.
    ///
    /// Clones made before this call keep their own step list.
    #[must_use]
    pub fn then_step(mut self, step: SyncStep<E>) -> Self {
        Arc::make_mut(&mut self.steps).push(step);
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
    pub fn steps(&self) -> &[SyncStep<E>] {
        &self.steps
    }

    /// Applies every step, in order, to `props`.
    ///
    /// Each step receives the bag as left by the previous steps. An object
    /// contribution is shallow-merged onto the bag; any other return leaves it
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step, unchanged. No later step
    /// is invoked.
    pub fn run(&self, props: Props) -> Result<Props, E> {
        let _span = tracing::debug_span!("assembly", mode = "sync", steps = self.steps.len())
            .entered();

        let mut accumulator = props;
        for (index, step) in self.steps.iter().enumerate() {
            let contribution = step.apply(&accumulator).inspect_err(|_| {
                tracing::debug!(step = index, kind = "sync", "assembly step failed");
            })?;
            absorb(&mut accumulator, index, "sync", contribution);
        }
        Ok(accumulator)
    }

    /// Encodes `input` as a bag, runs the assembly and decodes the result.
    ///
    /// # Errors
    ///
    /// Returns [`TypedRunError::Step`] if a step fails, or
    /// [`TypedRunError::Props`] if `input` is not object-shaped or the final
    /// bag does not match `O`.
    pub fn run_typed<I, O>(&self, input: &I) -> Result<O, TypedRunError<E>>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let props = Props::from_serializable(input)?;
        let output = self.run(props).map_err(TypedRunError::Step)?;
        Ok(output.deserialize_into()?)
    }

    /// Turns the assembly into a reusable composed function.
    ///
    /// # Examples
    ///
    /// ```
    /// use assembly::{assemble_sync, props};
    /// use assembly::props::Props;
    ///
    /// let count = assemble_sync!(|_: &Props| props! { "one" => true })
    ///     .into_fn();
    ///
    /// let first: Result<_, std::convert::Infallible> = count(Props::new());
    /// let second = count(props! { "two" => true });
    /// assert_eq!(first.unwrap(), props! { "one" => true });
    /// assert_eq!(second.unwrap(), props! { "one" => true, "two" => true });
    /// ```
    pub fn into_fn(self) -> impl Fn(Props) -> Result<Props, E> + Send + Sync + Clone {
        move |props| self.run(props)
    }
}

impl<E: 'static> SyncAssembly<E> {
    /// Appends a synchronous step.
    ///
    /// The step may return anything implementing [`Contribute`]: a bag, a
    /// JSON object, `()`, an `Option` of those, or a `Result` carrying the
    /// assembly's error type.
    #[must_use]
    pub fn then<F, C>(self, step: F) -> Self
    where
        F: Fn(&Props) -> C + Send + Sync + 'static,
        C: Contribute<E> + 'static,
    {
        self.then_step(SyncStep::new(step))
    }
}

impl<E> Default for SyncAssembly<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for SyncAssembly<E> {
    fn clone(&self) -> Self {
        Self {
            steps: Arc::clone(&self.steps),
        }
    }
}

impl<E> fmt::Debug for SyncAssembly<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SyncAssembly")
            .field("steps", &self.steps.len())
            .finish()
    }
}

impl<E> FromIterator<SyncStep<E>> for SyncAssembly<E> {
    fn from_iter<I: IntoIterator<Item = SyncStep<E>>>(iter: I) -> Self {
        Self {
            steps: Arc::new(iter.into_iter().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props;
    use rstest::rstest;
    use serde_json::json;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[rstest]
    fn test_empty_assembly_returns_input() {
        let assembly = SyncAssembly::<Infallible>::new();
        assert!(assembly.is_empty());
        assert_eq!(assembly.run(props! { "pre" => 1 }).unwrap(), props! { "pre" => 1 });
    }

    #[rstest]
    fn test_last_write_wins() {
        let assembly = SyncAssembly::<Infallible>::new()
            .then(|_: &Props| props! { "x" => 1 })
            .then(|_: &Props| props! { "x" => 2 });
        assert_eq!(assembly.run(Props::new()).unwrap(), props! { "x" => 2 });
    }

    #[rstest]
    fn test_non_object_returns_are_ignored() {
        let assembly = SyncAssembly::<Infallible>::new()
            .then(|_: &Props| 5)
            .then(|_: &Props| json!({ "y": true }));
        assert_eq!(assembly.run(Props::new()).unwrap(), props! { "y" => true });
    }

    #[rstest]
    fn test_steps_see_previous_contributions() {
        let assembly = SyncAssembly::<Infallible>::new()
            .then(|_: &Props| props! { "one" => true })
            .then(|props: &Props| {
                let one = props.get("one").and_then(|one| one.as_bool()).unwrap_or(false);
                props! { "two" => !one }
            });
        assert_eq!(
            assembly.run(Props::new()).unwrap(),
            props! { "one" => true, "two" => false }
        );
    }

    #[rstest]
    fn test_failure_stops_the_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        let assembly = SyncAssembly::<&'static str>::new()
            .then(|_: &Props| Err::<(), _>("boom"))
            .then(move |_: &Props| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
            });

        assert_eq!(assembly.run(Props::new()), Err("boom"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    fn test_clone_shares_steps() {
        let assembly = SyncAssembly::<Infallible>::new().then(|_: &Props| props! { "a" => 1 });
        let cloned = assembly.clone();
        assert_eq!(cloned.len(), 1);
        assert_eq!(cloned.run(Props::new()).unwrap(), assembly.run(Props::new()).unwrap());
        assert_eq!(format!("{assembly:?}"), "SyncAssembly { steps: 1 }");
    }

    #[rstest]
    fn test_clone_does_not_copy_step_list() {
        let assembly: SyncAssembly<Infallible> = (0..1000)
            .map(|_| SyncStep::new(|_: &Props| ()))
            .collect();
        let cloned = assembly.clone();

        assert!(Arc::ptr_eq(&assembly.steps, &cloned.steps));
        assert_eq!(assembly.steps().as_ptr(), cloned.steps().as_ptr());
    }

    #[rstest]
    fn test_then_after_clone_leaves_clone_untouched() {
        let base = SyncAssembly::<Infallible>::new().then(|_: &Props| props! { "a" => 1 });
        let extended = base.clone().then(|_: &Props| props! { "b" => 2 });

        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
        assert!(!Arc::ptr_eq(&base.steps, &extended.steps));
        assert_eq!(base.run(Props::new()).unwrap(), props! { "a" => 1 });
    }

    #[rstest]
    fn test_from_iter_of_steps() {
        let assembly: SyncAssembly<Infallible> = ["a", "b"]
            .into_iter()
            .map(|key| SyncStep::new(move |_: &Props| props! { key => true }))
            .collect();
        assert_eq!(
            assembly.run(Props::new()).unwrap(),
            props! { "a" => true, "b" => true }
        );
    }
}
