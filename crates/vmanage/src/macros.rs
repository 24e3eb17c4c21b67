use serde_json::{Map, Value};

/// Access to the raw fields of a record returned by a controller.
pub trait Fields {
    /// Returns the record fields.
    fn fields(&self) -> &Map<String, Value>;

    /// Returns the record fields mutably.
    fn fields_mut(&mut self) -> &mut Map<String, Value>;
}

impl Fields for Map<String, Value> {
    fn fields(&self) -> &Map<String, Value> {
        self
    }

    fn fields_mut(&mut self) -> &mut Map<String, Value> {
        self
    }
}

macro_rules! record {
    (
        $(#[$attr:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(serde_json::Map<String, serde_json::Value>);

        impl $name {
            #[doc = concat!("Creates an empty [`", stringify!($name), "`].")]
            #[must_use]
            #[inline]
            pub fn new() -> Self {
                Self(serde_json::Map::new())
            }

            #[doc = concat!("Adds a field to a [`", stringify!($name), "`].")]
            #[must_use]
            #[inline]
            pub fn field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
                let _ = self.0.insert(key.into(), value.into());
                self
            }

            #[doc = "Returns the value of the given field, if present."]
            #[must_use]
            #[inline]
            pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
                self.0.get(key)
            }

            #[doc = "Returns the value of the given field as a string slice, if it is a string."]
            #[must_use]
            #[inline]
            pub fn get_str(&self, key: &str) -> Option<&str> {
                self.0.get(key).and_then(serde_json::Value::as_str)
            }

            #[doc = "Checks whether the record has no fields."]
            #[must_use]
            #[inline]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            #[doc = "Returns the number of fields."]
            #[must_use]
            #[inline]
            pub fn len(&self) -> usize {
                self.0.len()
            }

            #[doc = "Consumes the record and returns its fields."]
            #[must_use]
            #[inline]
            pub fn into_inner(self) -> serde_json::Map<String, serde_json::Value> {
                self.0
            }
        }

        impl From<serde_json::Map<String, serde_json::Value>> for $name {
            fn from(fields: serde_json::Map<String, serde_json::Value>) -> Self {
                Self(fields)
            }
        }

        impl $crate::macros::Fields for $name {
            fn fields(&self) -> &serde_json::Map<String, serde_json::Value> {
                &self.0
            }

            fn fields_mut(&mut self) -> &mut serde_json::Map<String, serde_json::Value> {
                &mut self.0
            }
        }
    };
}

pub(crate) use record;
