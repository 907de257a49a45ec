use compact_str::{CompactString, ToCompactString};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Identifier of a single resource, as it appears in a detail URL
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct ResourceId {
    /// Rendered URL segment; numeric ids are kept in their decimal form
    value: CompactString,
}

impl ResourceId {
    pub fn new<S: Into<CompactString>>(id: S) -> Self {
        Self { value: id.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Extract the `id` field of a JSON payload.
    ///
    /// Missing, `null`, `false`, empty-string and zero identifiers are all
    /// treated as absent.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        match payload.get("id")? {
            Value::String(s) if !s.is_empty() => Some(Self::new(s.as_str())),
            Value::Number(n) if n.as_f64().is_some_and(|v| v != 0.0) => {
                Some(Self::new(n.to_compact_string()))
            },
            Value::Bool(true) => Some(Self::new("true")),
            _ => None,
        }
    }

    /// Extract the `id` field of a JSON payload as-is.
    ///
    /// Only a missing or `null` identifier is absent; any other value,
    /// including `0` and `false`, is rendered into the URL segment.
    pub fn from_payload_verbatim(payload: &Value) -> Option<Self> {
        match payload.get("id")? {
            Value::Null => None,
            Value::String(s) => Some(Self::new(s.as_str())),
            other => Some(Self::new(other.to_compact_string())),
        }
    }
}

macro_rules! impl_from_integer {
    ($($int:ty),*) => {
        $(
            impl From<$int> for ResourceId {
                fn from(id: $int) -> Self {
                    Self::new(id.to_compact_string())
                }
            }
        )*
    };
}

impl_from_integer!(u32, u64, i32, i64);

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<CompactString> for ResourceId {
    fn from(id: CompactString) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<ResourceId, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct ResourceIdVisitor;

        impl<'de> Visitor<'de> for ResourceIdVisitor {
            type Value = ResourceId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer representing a resource ID")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ResourceId::new(value))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ResourceId::new(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ResourceId::from(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ResourceId::from(value))
            }
        }

        deserializer.deserialize_any(ResourceIdVisitor)
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_numbers_and_strings() {
        let numeric: ResourceId = serde_json::from_value(json!(42)).unwrap();
        let negative: ResourceId = serde_json::from_value(json!(-3)).unwrap();
        let textual: ResourceId = serde_json::from_value(json!("abc-1")).unwrap();

        assert_eq!(numeric.as_str(), "42");
        assert_eq!(negative.as_str(), "-3");
        assert_eq!(textual.as_str(), "abc-1");
    }

    #[test]
    fn payload_identifier_is_extracted() {
        assert_eq!(
            ResourceId::from_payload(&json!({"id": 7, "name": "x"})),
            Some(ResourceId::from(7u64))
        );
        assert_eq!(
            ResourceId::from_payload(&json!({"id": "slug"})),
            Some(ResourceId::new("slug"))
        );
    }

    #[test]
    fn falsy_payload_identifiers_are_absent() {
        for payload in [
            json!({}),
            json!({"id": null}),
            json!({"id": 0}),
            json!({"id": ""}),
            json!({"id": false}),
            json!({"id": []}),
            json!([1, 2, 3]),
        ] {
            assert_eq!(ResourceId::from_payload(&payload), None, "{payload}");
        }
    }

    #[test]
    fn verbatim_identifier_keeps_falsy_values() {
        let id = |payload: Value| ResourceId::from_payload_verbatim(&payload);

        assert_eq!(id(json!({"id": 0})), Some(ResourceId::new("0")));
        assert_eq!(id(json!({"id": false})), Some(ResourceId::new("false")));
        assert_eq!(id(json!({"id": ""})), Some(ResourceId::new("")));
        assert_eq!(id(json!({"id": "slug"})), Some(ResourceId::new("slug")));
        assert_eq!(id(json!({"id": 12})), Some(ResourceId::from(12u64)));
        assert_eq!(id(json!({"id": null})), None);
        assert_eq!(id(json!({"name": "x"})), None);
    }

    #[test]
    fn integer_conversions_agree() {
        assert_eq!(ResourceId::from(5u32), ResourceId::from(5i64));
        assert_eq!(ResourceId::from(-5i32).as_str(), "-5");
    }
}
