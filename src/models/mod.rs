//! Top-level modules for the models package.

pub mod amount;
pub mod exceptions;
pub mod flag_collection;
pub mod model;
#[allow(clippy::too_many_arguments)]
pub mod transactions;

pub use exceptions::{XRPLModelException, XRPLModelResult};
pub use flag_collection::{FlagCollection, NoFlags};
pub use model::Model;

/// Converts one snake_case identifier into the PascalCase the wire
/// format uses for field names.
pub(crate) fn pascal_case(field: &str) -> String {
    field
        .split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Serializes a typed flag collection into the numeric `Flags` field
/// and back.
pub(crate) mod txn_flags {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use strum::IntoEnumIterator;

    use crate::models::flag_collection::FlagCollection;

    pub fn serialize<S, T>(flags: &FlagCollection<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: IntoEnumIterator + serde::Serialize,
    {
        let flags_as_u32: u32 = u32::try_from(flags).map_err(serde::ser::Error::custom)?;
        serializer.serialize_u32(flags_as_u32)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<FlagCollection<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: IntoEnumIterator + serde::Serialize,
    {
        let flags_as_u32 = u32::deserialize(deserializer)?;
        FlagCollection::try_from(flags_as_u32).map_err(D::Error::custom)
    }
}

/// Wraps a struct's serialization in a single-key object named after
/// the type, with PascalCase field names, the way array members
/// appear on the wire (`{"Memo": {...}}`).
#[macro_export]
macro_rules! serde_with_tag {
    (
        $(#[$attr:meta])*
        pub struct $name:ident {
            $(pub $field:ident: $ty:ty,)*
        }
    ) => {
        $(#[$attr])*
        pub struct $name {
            $(pub $field: $ty,)*
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                let mut inner = serde_json::Map::new();
                $(
                    let value = serde_json::to_value(&self.$field)
                        .map_err(serde::ser::Error::custom)?;
                    if !value.is_null() {
                        inner.insert(
                            $crate::models::pascal_case(stringify!($field)),
                            value,
                        );
                    }
                )*

                let mut outer = serde_json::Map::new();
                outer.insert(
                    stringify!($name).to_string(),
                    serde_json::Value::Object(inner),
                );
                serde::Serialize::serialize(&serde_json::Value::Object(outer), serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<Self, D::Error> {
                use serde::de::Error;

                let value = serde_json::Value::deserialize(deserializer)?;
                let inner = value
                    .get(stringify!($name))
                    .ok_or_else(|| {
                        D::Error::custom(concat!(
                            "expected a `",
                            stringify!($name),
                            "` wrapper object"
                        ))
                    })?;

                Ok($name {
                    $(
                        $field: {
                            let key = $crate::models::pascal_case(stringify!($field));
                            let field_value = inner
                                .get(&key)
                                .cloned()
                                .unwrap_or(serde_json::Value::Null);
                            serde_json::from_value(field_value)
                                .map_err(D::Error::custom)?
                        },
                    )*
                })
            }
        }
    };
}
