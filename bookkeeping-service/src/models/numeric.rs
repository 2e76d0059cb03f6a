//! Tolerant decoding of numeric fields.
//!
//! Stored documents were written by hand-edited forms, so amount fields can be
//! missing, strings, nulls or NaN. Amounts read as zero in that case; override
//! totals read as "not set".

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum MaybeNumber {
    Number(f64),
    Other(IgnoredAny),
}

/// A finite number, or `None` for anything else.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match MaybeNumber::deserialize(deserializer)? {
        MaybeNumber::Number(n) if n.is_finite() => Some(n),
        MaybeNumber::Number(_) | MaybeNumber::Other(_) => None,
    })
}

/// A finite number, or zero for anything else.
pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    number(deserializer).map(|n| n.unwrap_or(0.0))
}
