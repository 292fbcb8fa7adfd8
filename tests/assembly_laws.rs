//! Property-based tests for assembly and merge laws.
//!
//! ## Merge Laws
//! - **Right precedence**: `a.merged(b)[k] == b[k]` for every key `k` of `b`
//! - **Key preservation**: every key of `a` is a key of `a.merged(b)`
//! - **Identity**: `Props::new().merged(a) == a == a.merged(Props::new())`
//!
//! ## Assembly Laws
//! - **Identity**: an empty assembly returns its input
//! - **Fold equivalence**: running contributing steps equals folding `merged` over their outputs
//! - **Determinism**: running twice on the same input yields the same bag
//! - **Ignored returns**: inserting a step that returns `()` changes nothing
//!
//! Using proptest, we generate random bags to verify these laws across a
//! wide range of keys and values.

use assembly::prelude::*;
use proptest::prelude::*;
use std::convert::Infallible;

fn arbitrary_props() -> impl Strategy<Value = Props> {
    prop::collection::btree_map("[a-e]{1,2}", any::<i32>(), 0..8)
        .prop_map(|entries| entries.into_iter().collect())
}

fn constant_step(contribution: Props) -> impl Fn(&Props) -> Props + Send + Sync + 'static {
    move |_: &Props| contribution.clone()
}

// =============================================================================
// Merge Laws
// =============================================================================

proptest! {
    /// Right precedence: every key of the right bag keeps its value.
    #[test]
    fn prop_merge_right_precedence(left in arbitrary_props(), right in arbitrary_props()) {
        let merged = left.clone().merged(right.clone());

        for (key, value) in &right {
            prop_assert_eq!(merged.get(key), Some(value));
        }
    }

    /// Key preservation: no key of the left bag is lost.
    #[test]
    fn prop_merge_preserves_keys(left in arbitrary_props(), right in arbitrary_props()) {
        let merged = left.clone().merged(right);

        for key in left.keys() {
            prop_assert!(merged.contains_key(key));
        }
    }

    /// Identity: merging with an empty bag changes nothing.
    #[test]
    fn prop_merge_identity(props in arbitrary_props()) {
        prop_assert_eq!(Props::new().merged(props.clone()), props.clone());
        prop_assert_eq!(props.clone().merged(Props::new()), props);
    }
}

// =============================================================================
// Assembly Laws
// =============================================================================

proptest! {
    /// Identity: an empty assembly returns its input.
    #[test]
    fn prop_empty_assembly_identity(props in arbitrary_props()) {
        let assembly = SyncAssembly::<Infallible>::new();

        prop_assert_eq!(assembly.run(props.clone()).unwrap(), props);
    }

    /// Fold equivalence: a run equals folding `merged` over every contribution.
    #[test]
    fn prop_run_equals_merge_fold(
        initial in arbitrary_props(),
        contributions in prop::collection::vec(arbitrary_props(), 0..6),
    ) {
        let assembly: SyncAssembly<Infallible> = contributions
            .iter()
            .cloned()
            .map(|contribution| SyncStep::new(constant_step(contribution)))
            .collect();

        let expected = contributions
            .into_iter()
            .fold(initial.clone(), Props::merged);

        prop_assert_eq!(assembly.run(initial).unwrap(), expected);
    }

    /// Determinism: the same steps and input always yield the same bag.
    #[test]
    fn prop_run_is_deterministic(
        initial in arbitrary_props(),
        first in arbitrary_props(),
        second in arbitrary_props(),
    ) {
        let assembly = SyncAssembly::<Infallible>::new()
            .then(constant_step(first))
            .then(constant_step(second));

        prop_assert_eq!(
            assembly.run(initial.clone()).unwrap(),
            assembly.run(initial).unwrap()
        );
    }

    /// Ignored returns: a unit step between two steps changes nothing.
    #[test]
    fn prop_unit_step_is_neutral(
        initial in arbitrary_props(),
        first in arbitrary_props(),
        second in arbitrary_props(),
    ) {
        let plain = SyncAssembly::<Infallible>::new()
            .then(constant_step(first.clone()))
            .then(constant_step(second.clone()));
        let padded = SyncAssembly::<Infallible>::new()
            .then(constant_step(first))
            .then(|_: &Props| ())
            .then(constant_step(second));

        prop_assert_eq!(
            plain.run(initial.clone()).unwrap(),
            padded.run(initial).unwrap()
        );
    }

    /// Key preservation: every input key survives a run.
    #[test]
    fn prop_run_preserves_input_keys(initial in arbitrary_props(), contribution in arbitrary_props()) {
        let assembly = SyncAssembly::<Infallible>::new().then(constant_step(contribution));
        let result = assembly.run(initial.clone()).unwrap();

        for key in initial.keys() {
            prop_assert!(result.contains_key(key));
        }
    }
}
