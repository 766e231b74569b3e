//! Deserialize a missing or `null` string as the empty string.
//!
//! Use together with `#[serde(default)]` so that absent fields are accepted
//! as well.

use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
