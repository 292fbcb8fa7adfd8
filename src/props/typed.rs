//! Conversions between [`Props`] and user-defined types.
//!
//! A property bag has no fixed schema. These helpers check a shape at the
//! boundary instead: a struct is encoded into a bag before an assembly runs,
//! and the final bag is decoded back into a struct afterwards.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::Props;
use crate::error::{PropsError, kind_of};

impl Props {
    /// Encodes `value` as a property bag.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::NotAnObject`] if `value` does not serialize to a
    /// JSON object, or [`PropsError::Serialization`] if serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use assembly::props::Props;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Greeting { name: String }
    ///
    /// let props = Props::from_serializable(&Greeting { name: "World".into() }).unwrap();
    /// assert_eq!(props.get("name"), Some(&serde_json::json!("World")));
    /// ```
    pub fn from_serializable<T>(value: &T) -> Result<Self, PropsError>
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_value(value)? {
            Value::Object(entries) => Ok(Self::from(entries)),
            other => Err(PropsError::NotAnObject {
                found: kind_of(&other),
            }),
        }
    }

    /// Decodes the whole bag into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::Serialization`] if the bag does not match the
    /// shape of `T`.
    pub fn deserialize_into<T>(&self) -> Result<T, PropsError>
    where
        T: DeserializeOwned,
    {
        Ok(serde_json::from_value(Value::Object(self.as_map().clone()))?)
    }

    /// Decodes the property at `key` into `T`.
    ///
    /// Returns `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::InvalidProperty`] if the property is present but
    /// cannot be decoded into `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use assembly::props;
    ///
    /// let bag = props! { "count" => 3 };
    /// assert_eq!(bag.get_as::<u32>("count").unwrap(), Some(3));
    /// assert_eq!(bag.get_as::<u32>("missing").unwrap(), None);
    /// assert!(bag.get_as::<String>("count").is_err());
    /// ```
    pub fn get_as<T>(&self, key: &str) -> Result<Option<T>, PropsError>
    where
        T: DeserializeOwned,
    {
        self.get(key)
            .map(|value| {
                T::deserialize(value).map_err(|source| PropsError::InvalidProperty {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }
}
