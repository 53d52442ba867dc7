use serde::{Deserialize, Deserializer};

/// Reads a nullable JSON boolean, treating `null` like an absent field.
pub(crate) fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}
