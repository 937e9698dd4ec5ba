//! Serde helpers for JSON-safe numeric representation.
//!
//! Decimal amounts serialize as integers when whole-valued and as floats
//! otherwise, so `110` stays `110` on the wire instead of becoming
//! `"110"` or `110.0`.

pub mod decimal_number {
    use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
    use rust_decimal::Decimal;
    use serde::de::Error as DeError;
    use serde::ser::Error as SerError;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.fract().is_zero() {
            if let Some(n) = value.to_i64() {
                return serializer.serialize_i64(n);
            }
        }
        match value.to_f64() {
            Some(f) => serializer.serialize_f64(f),
            None => Err(S::Error::custom("decimal not representable as number")),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum JsonNumber {
        Int(i64),
        Float(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        match JsonNumber::deserialize(deserializer)? {
            JsonNumber::Int(n) => Ok(Decimal::from(n)),
            JsonNumber::Float(f) => {
                Decimal::from_f64(f).ok_or_else(|| D::Error::custom("invalid decimal"))
            }
            JsonNumber::Text(s) => s.parse().map_err(D::Error::custom),
        }
    }
}
