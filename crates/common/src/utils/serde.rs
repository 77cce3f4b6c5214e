//! Serialization utilities for common data types
//!
//! Time-to-live values travel through JSON and TOML config files as integer
//! milliseconds.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// Custom serialization module for Duration as milliseconds
///
/// # Usage
/// ```rust
/// use std::time::Duration;
///
/// use cacheable_common::duration_millis;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Example {
///     #[serde(with = "duration_millis")]
///     ttl: Duration,
/// }
/// ```
pub mod duration_millis {
    use super::*;

    /// Serde serialization result type
    type SerializeResult<S> = Result<<S as Serializer>::Ok, <S as Serializer>::Error>;

    /// Serialize a Duration as milliseconds (u64)
    pub fn serialize<S>(duration: &Duration, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    /// Deserialize milliseconds (u64) into a Duration
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Optional Duration as milliseconds; absent or `null` means "no ttl".
///
/// Pair with `#[serde(default)]` so the field may be omitted entirely.
pub mod option_duration_millis {
    use super::*;

    /// Serialize an optional Duration as milliseconds or `null`
    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(duration) => super::duration_millis::serialize(duration, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize optional milliseconds into an optional Duration
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for serialization utilities
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct TtlSettings {
        #[serde(with = "duration_millis")]
        ttl: Duration,
        #[serde(default, with = "option_duration_millis")]
        fallback_ttl: Option<Duration>,
    }

    /// Tests that Duration serializes to milliseconds as u64
    #[test]
    fn test_duration_millis_serialize() {
        let data = TtlSettings { ttl: Duration::from_millis(1500), fallback_ttl: None };

        let json = serde_json::to_string(&data).expect("Should serialize valid struct");
        assert_eq!(json, r#"{"ttl":1500,"fallback_ttl":null}"#);
    }

    /// Tests that an omitted optional field deserializes to `None`
    #[test]
    fn test_option_duration_millis_missing_field() {
        let data: TtlSettings =
            serde_json::from_str(r#"{"ttl":2500}"#).expect("Should deserialize valid JSON");

        assert_eq!(data.ttl, Duration::from_millis(2500));
        assert_eq!(data.fallback_ttl, None);
    }

    /// Tests that a present optional field deserializes to a Duration
    #[test]
    fn test_option_duration_millis_present() {
        let data: TtlSettings = serde_json::from_str(r#"{"ttl":0,"fallback_ttl":60000}"#)
            .expect("Should deserialize valid JSON");

        assert_eq!(data.ttl, Duration::ZERO);
        assert_eq!(data.fallback_ttl, Some(Duration::from_secs(60)));
    }

    /// Validates the duration millis deserialize invalid json scenario.
    #[test]
    fn test_duration_millis_deserialize_invalid_json() {
        let result: Result<TtlSettings, _> = serde_json::from_str(r#"{"ttl":"soon"}"#);
        assert!(result.is_err());
    }
}
