//! Values accepted by the typed store facade.

use serde::Serialize;

/// A value that can be written through [`crate::Cache::store`].
///
/// Mirrors what the store itself holds: everything is bytes on the wire,
/// with numbers encoded as their decimal text form so they survive a
/// `get_int` round trip.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bytes(Vec<u8>),
}

impl Value {
    /// Verbatim byte encoding written to the store.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Value::Str(s) => s.into_bytes(),
            Value::Int(n) => n.to_string().into_bytes(),
            Value::Float(x) => x.to_string().into_bytes(),
            Value::Bytes(b) => b,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_encoding() {
        assert_eq!(Value::from("hello").into_bytes(), b"hello".to_vec());
        assert_eq!(Value::from(42i64).into_bytes(), b"42".to_vec());
        assert_eq!(Value::from(vec![0u8, 1, 2]).into_bytes(), vec![0u8, 1, 2]);
    }

    #[test]
    fn test_json_form_is_untagged() {
        assert_eq!(
            serde_json::to_string(&Value::from("hello")).unwrap(),
            "\"hello\""
        );
        assert_eq!(serde_json::to_string(&Value::from(42i64)).unwrap(), "42");
    }
}
