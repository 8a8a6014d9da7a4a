//! Serde helper for `f64` fields that may legitimately hold NaN or ±infinity.
//!
//! JSON has no literal for non-finite numbers and `serde_json` writes them as
//! `null`, which cannot be read back into an `f64`. Finite values stay plain
//! numbers; non-finite ones are written as the strings `"NaN"`, `"inf"` and
//! `"-inf"`. Use with `#[serde(with = "crate::domain::nonfinite")]`.

use serde::{Deserialize, Deserializer, Serializer, de};

pub fn serialize<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        s.serialize_f64(*value)
    } else {
        // `Display` for f64 gives exactly "NaN", "inf" and "-inf".
        s.serialize_str(&value.to_string())
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    match Repr::deserialize(d)? {
        Repr::Number(v) => Ok(v),
        Repr::Text(text) => match text.as_str() {
            "NaN" => Ok(f64::NAN),
            "inf" => Ok(f64::INFINITY),
            "-inf" => Ok(f64::NEG_INFINITY),
            other => Err(de::Error::custom(format!(
                "expected a number, \"NaN\", \"inf\" or \"-inf\", got \"{other}\""
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Holder {
        #[serde(with = "super")]
        v: f64,
    }

    fn write(v: f64) -> String {
        serde_json::to_string(&Holder { v }).unwrap()
    }

    fn read(json: &str) -> Result<f64, serde_json::Error> {
        serde_json::from_str::<Holder>(json).map(|h| h.v)
    }

    #[test]
    fn finite_values_stay_numbers() {
        assert_eq!(write(0.25), r#"{"v":0.25}"#);
        assert_eq!(read(r#"{"v":0.25}"#).unwrap(), 0.25);
        assert_eq!(read(r#"{"v":3}"#).unwrap(), 3.0);
    }

    #[test]
    fn non_finite_values_survive_a_round_trip() {
        assert_eq!(write(f64::INFINITY), r#"{"v":"inf"}"#);
        assert_eq!(write(f64::NEG_INFINITY), r#"{"v":"-inf"}"#);
        assert_eq!(write(f64::NAN), r#"{"v":"NaN"}"#);

        assert_eq!(read(r#"{"v":"inf"}"#).unwrap(), f64::INFINITY);
        assert_eq!(read(r#"{"v":"-inf"}"#).unwrap(), f64::NEG_INFINITY);
        assert!(read(r#"{"v":"NaN"}"#).unwrap().is_nan());
    }

    #[test]
    fn other_strings_and_null_are_rejected() {
        assert!(read(r#"{"v":"1.5"}"#).is_err());
        assert!(read(r#"{"v":null}"#).is_err());
    }
}
