//! The `props!` macro for building property bags.

/// Builds a [`Props`](crate::props::Props) from `key => value` pairs.
///
/// Each key must implement `Into<String>` and each value `Into<serde_json::Value>`.
/// Nested structures can be written with [`serde_json::json!`].
///
/// # Syntax
///
/// - `props! {}` - An empty bag
/// - `props! { "a" => 1 }` - A bag with one property
/// - `props! { "a" => 1, "b" => true, ... }` - Later duplicates overwrite earlier ones
///
/// # Examples
///
/// ```
/// use assembly::props;
///
/// let bag = props! {
///     "name" => "World",
///     "count" => 3,
///     "tags" => serde_json::json!(["a", "b"]),
/// };
///
/// assert_eq!(bag.len(), 3);
/// assert_eq!(bag.get("count"), Some(&serde_json::json!(3)));
/// ```
#[macro_export]
macro_rules! props {
    () => {
        $crate::props::Props::new()
    };

    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut __props = $crate::props::Props::new();
        $(
            __props.insert($key, $value);
        )+
        __props
    }};
}
