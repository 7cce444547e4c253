use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An item image: attribute name to value.
pub type Item = HashMap<String, AttributeValue>;

/// A single attribute value as it appears in a stream record.
///
/// Serialized in the externally tagged form used on the wire, e.g.
/// `{"S": "ready"}` or `{"M": {"id": {"N": "7"}}}`. Binary values are
/// base64 encoded on the wire and held as raw bytes in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    #[serde(rename = "B", with = "base64_bytes")]
    Binary(Vec<u8>),
    #[serde(rename = "BOOL")]
    Bool(bool),
    #[serde(rename = "BS", with = "base64_set")]
    BinarySet(Vec<Vec<u8>>),
    #[serde(rename = "L")]
    List(Vec<AttributeValue>),
    #[serde(rename = "M")]
    Map(Item),
    #[serde(rename = "N")]
    Number(String),
    #[serde(rename = "NS")]
    NumberSet(Vec<String>),
    #[serde(rename = "NULL")]
    Null(bool),
    #[serde(rename = "S")]
    String(String),
    #[serde(rename = "SS")]
    StringSet(Vec<String>),
}

impl AttributeValue {
    /// Returns the string payload, or `None` for every other variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

mod base64_set {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(set: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(set.len()))?;
        for bytes in set {
            seq.serialize_element(&STANDARD.encode(bytes))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<u8>>, D::Error> {
        let encoded = Vec::<String>::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|s| STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_document_from_wire() {
        let wire = json!({
            "M": {
                "name": {"S": "Joe Public"},
                "age": {"N": "45"},
                "active": {"BOOL": true},
                "father": {"NULL": true},
                "children": {"L": [{"M": {"name": {"S": "Bill"}}}]},
                "tags": {"SS": ["a", "b"]},
                "scores": {"NS": ["1", "2.5"]}
            }
        });

        let value: AttributeValue = serde_json::from_value(wire).unwrap();
        let AttributeValue::Map(person) = value else {
            panic!("expected map");
        };

        assert_eq!(person["name"].as_str(), Some("Joe Public"));
        assert_eq!(person["age"], AttributeValue::Number("45".to_string()));
        assert_eq!(person["active"], AttributeValue::Bool(true));
        assert_eq!(person["father"], AttributeValue::Null(true));
        assert_eq!(person["tags"], AttributeValue::StringSet(vec!["a".into(), "b".into()]));
        match &person["children"] {
            AttributeValue::List(children) => assert_eq!(children.len(), 1),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_binary_is_base64_on_the_wire() {
        let value: AttributeValue = serde_json::from_value(json!({"B": "aGVsbG8="})).unwrap();
        assert_eq!(value, AttributeValue::Binary(b"hello".to_vec()));

        let set = AttributeValue::BinarySet(vec![b"a".to_vec(), b"bc".to_vec()]);
        assert_eq!(serde_json::to_value(&set).unwrap(), json!({"BS": ["YQ==", "YmM="]}));
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let result = serde_json::from_value::<AttributeValue>(json!({"B": "not base64!"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_as_str_only_matches_strings() {
        assert_eq!(AttributeValue::from("A").as_str(), Some("A"));
        assert_eq!(AttributeValue::Number("1".to_string()).as_str(), None);
        assert_eq!(AttributeValue::Null(true).as_str(), None);
    }
}
