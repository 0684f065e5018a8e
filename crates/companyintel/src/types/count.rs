//! Lenient decoding of whole-number fields.
//!
//! The backend types counts and limits as plain JSON numbers, so `15` may
//! arrive as `15.0`. Integral floats are accepted; fractions are not.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};

struct CountVisitor;

impl<'de> Visitor<'de> for CountVisitor {
    type Value = u32;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative whole number")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u32, E> {
        u32::try_from(v).map_err(|_| E::custom(format!("{} is out of range", v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u32, E> {
        u32::try_from(v).map_err(|_| E::custom(format!("{} is out of range", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<u32, E> {
        if v.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&v) {
            Ok(v as u32)
        } else {
            Err(E::invalid_value(de::Unexpected::Float(v), &self))
        }
    }
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(CountVisitor)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(deserialize_with = "super::deserialize")]
        value: u32,
    }

    fn decode(raw: &str) -> Result<u32, serde_json::Error> {
        serde_json::from_str::<Wrapper>(raw).map(|w| w.value)
    }

    #[test]
    fn test_integral_float_is_accepted() {
        assert_eq!(decode(r#"{"value": 15.0}"#).unwrap(), 15);
        assert_eq!(decode(r#"{"value": 15}"#).unwrap(), 15);
    }

    #[test]
    fn test_fraction_and_negative_are_rejected() {
        assert!(decode(r#"{"value": 2.5}"#).is_err());
        assert!(decode(r#"{"value": -1}"#).is_err());
        assert!(decode(r#"{"value": "15"}"#).is_err());
    }
}
