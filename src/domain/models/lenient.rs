//! Schema-tolerant serde helpers shared by the canonical and raw models.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Decode an optional field, turning values of the wrong shape into `None`.
///
/// Use with `#[serde(default, deserialize_with = "lenient")]`. A missing key,
/// an explicit `null`, and an undecodable value (an unknown enum tag, a
/// malformed timestamp) all come out as `None` instead of failing the whole
/// document.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Decode a field whose `null` should read as the type's default.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on
/// collections and counters, where the API occasionally sends `null`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Record that a key was present, even when its value is `null`.
///
/// Use with `#[serde(default, deserialize_with = "present")]` on an
/// `Option<Option<T>>`: an absent key stays `None`, while `null` or a value
/// of the wrong shape becomes `Some(None)`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(Some(serde_json::from_value(value).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient")]
        when: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "present")]
        body: Option<Option<String>>,
        #[serde(default, deserialize_with = "nullable")]
        tags: Vec<String>,
    }

    #[test]
    fn test_lenient_accepts_valid_timestamp() {
        let sample: Sample = serde_json::from_str(r#"{"when":"2024-01-15T10:30:00Z"}"#).unwrap();
        assert!(sample.when.is_some());
    }

    #[test]
    fn test_lenient_swallows_garbage() {
        let sample: Sample = serde_json::from_str(r#"{"when":"yesterday-ish"}"#).unwrap();
        assert!(sample.when.is_none());

        let sample: Sample = serde_json::from_str(r#"{"when":42}"#).unwrap();
        assert!(sample.when.is_none());
    }

    #[test]
    fn test_nullable_reads_null_as_default() {
        let sample: Sample = serde_json::from_str(r#"{"tags":null}"#).unwrap();
        assert!(sample.tags.is_empty());

        let sample: Sample = serde_json::from_str(r#"{"tags":["a"]}"#).unwrap();
        assert_eq!(sample.tags, vec!["a".to_string()]);
    }

    #[test]
    fn test_present_distinguishes_null_from_absent() {
        let absent: Sample = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.body, None);

        let null: Sample = serde_json::from_str(r#"{"body":null}"#).unwrap();
        assert_eq!(null.body, Some(None));

        let text: Sample = serde_json::from_str(r#"{"body":"hi"}"#).unwrap();
        assert_eq!(text.body, Some(Some("hi".to_string())));

        let odd: Sample = serde_json::from_str(r#"{"body":{"raw":"hi"}}"#).unwrap();
        assert_eq!(odd.body, Some(None));
    }
}
