//! Community and property record types

mod community;
mod derived;
mod property;

pub use community::*;
pub use derived::*;
pub use property::*;

use serde::{Deserialize, Deserializer};

/// A record failed a field constraint
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Deserialize an update field so that an absent key stays `None` and an
/// explicit `null` becomes `Some(None)`. Use together with `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Overwrite `slot` when the update carries the field, null included
pub(crate) fn merge<T>(slot: &mut Option<T>, value: Option<Option<T>>) {
    if let Some(value) = value {
        *slot = value;
    }
}
