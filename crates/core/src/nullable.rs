//! Field deserialisers that read an explicit JSON `null` as an absent value.
//!
//! Blank content is a validation concern, so a `null` where a string or list is expected must
//! reach the validator as blank instead of failing the parse.

use serde::{Deserialize, Deserializer};

/// `null` becomes `T::default()`.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null` becomes an empty list and `null` entries become empty strings.
pub(crate) fn blank_entries<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}
