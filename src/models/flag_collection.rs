//! A typed set of a transaction kind's flags.

use derive_new::new;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::models::exceptions::XRPLModelException;

/// Represents the type of flags when the model has no flags.
#[derive(
    Debug, Eq, PartialEq, Clone, Serialize, Deserialize, Display, AsRefStr, EnumIter, Copy,
)]
pub enum NoFlags {}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, new)]
pub struct FlagCollection<T>(pub(crate) Vec<T>)
where
    T: IntoEnumIterator;

impl<T> FlagCollection<T>
where
    T: IntoEnumIterator + PartialEq,
{
    pub fn contains(&self, flag: &T) -> bool {
        self.0.contains(flag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Default for FlagCollection<T>
where
    T: IntoEnumIterator,
{
    fn default() -> Self {
        FlagCollection(Vec::new())
    }
}

impl<T> From<Vec<T>> for FlagCollection<T>
where
    T: IntoEnumIterator,
{
    fn from(flags: Vec<T>) -> Self {
        FlagCollection(flags)
    }
}

impl<T> IntoIterator for FlagCollection<T>
where
    T: IntoEnumIterator,
{
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T> TryFrom<u32> for FlagCollection<T>
where
    T: IntoEnumIterator + Serialize,
{
    type Error = XRPLModelException;

    fn try_from(flags: u32) -> Result<Self, Self::Error> {
        let mut flag_collection = Vec::new();
        for flag in T::iter() {
            let flag_as_u32 = flag_to_u32(&flag)?;
            if flags & flag_as_u32 == flag_as_u32 {
                flag_collection.push(flag);
            }
        }
        Ok(FlagCollection::new(flag_collection))
    }
}

impl<T> TryFrom<&FlagCollection<T>> for u32
where
    T: IntoEnumIterator + Serialize,
{
    type Error = XRPLModelException;

    fn try_from(flag_collection: &FlagCollection<T>) -> Result<Self, Self::Error> {
        let mut flags = 0;
        for flag in &flag_collection.0 {
            flags |= flag_to_u32(flag)?;
        }
        Ok(flags)
    }
}

fn flag_to_u32<T: Serialize>(flag: &T) -> Result<u32, XRPLModelException> {
    let value = serde_json::to_value(flag)?;
    value
        .as_u64()
        .map(|v| v as u32)
        .ok_or_else(|| XRPLModelException::FlagsError("flag is not numeric".to_string()))
}
