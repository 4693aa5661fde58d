use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A fully evaluated configuration value.
///
/// Equality is structural: two values are equal when they carry the same
/// variant and recursively equal content. Numbers compare numerically, so
/// `1` and `1.0` are the same value. A missing attribute is `Null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    String(String),
    Number(BigDecimal),
    Bool(bool),
    List(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the key/value map if this is an `Object`.
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Render the value as a literal: strings are quoted, containers recurse.
    ///
    /// Used for displayed block contents, where `"80"` and `80` must stay
    /// distinguishable.
    pub fn render_literal(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::String(s) => format!("\"{}\"", s.replace('"', "\\\"")),
            Value::Number(n) => format_number(n),
            Value::Bool(b) => b.to_string(),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Value::render_literal).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Object(map) => {
                let parts: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("{k}: {}", v.render_literal()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
        }
    }
}

/// Integers print without a fractional part; other numbers drop trailing zeros.
fn format_number(n: &BigDecimal) -> String {
    if n.is_integer() {
        n.with_scale(0).to_string()
    } else {
        n.normalized().to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::String(s) => write!(f, "{s}"),
            Value::Number(n) => write!(f, "{}", format_number(n)),
            Value::Bool(b) => write!(f, "{b}"),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Object(map) => {
                let parts: Vec<String> = map.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(BigDecimal::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(BigDecimal::from(n))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Object(map)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => {
                let text = format_number(n);
                if let Ok(i) = text.parse::<i64>() {
                    serializer.serialize_i64(i)
                } else if let Ok(u) = text.parse::<u64>() {
                    serializer.serialize_u64(u)
                } else if let Ok(f) = text.parse::<f64>()
                    && f.is_finite()
                    && f.to_string() == text
                {
                    serializer.serialize_f64(f)
                } else {
                    serializer.serialize_str(&text)
                }
            }
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Map key serde_json uses for numbers under `arbitrary_precision`.
const JSON_NUMBER_TOKEN: &str = "$serde_json::private::Number";

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a configuration value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(BigDecimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(BigDecimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        BigDecimal::from_str(&v.to_string())
            .map(Value::Number)
            .map_err(|_| E::custom(format!("number {v} cannot be represented")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut entries = BTreeMap::new();
        let Some(first) = map.next_key::<String>()? else {
            return Ok(Value::Object(entries));
        };

        // serde_json hands exact numbers over as a single-entry map.
        if first == JSON_NUMBER_TOKEN {
            let raw: String = map.next_value()?;
            return BigDecimal::from_str(&raw)
                .map(Value::Number)
                .map_err(|_| de::Error::custom(format!("invalid number {raw}")));
        }

        entries.insert(first, map.next_value::<Value>()?);
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            entries.insert(key, value);
        }
        Ok(Value::Object(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(s: &str) -> Value {
        Value::Number(BigDecimal::from_str(s).unwrap())
    }

    fn object(pairs: &[(&str, Value)]) -> Value {
        Value::Object(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(num("1"), num("1.0"));
        assert_eq!(num("80"), Value::from(80));
        assert_ne!(num("1.5"), num("1.50001"));
    }

    #[test]
    fn different_variants_are_never_equal() {
        assert_ne!(Value::from("80"), Value::from(80));
        assert_ne!(Value::from("true"), Value::from(true));
        assert_ne!(Value::Null, Value::from(""));
        assert_ne!(Value::List(vec![]), Value::Object(BTreeMap::new()));
    }

    #[test]
    fn containers_compare_structurally() {
        let ports = Value::List(vec![Value::from(80), Value::from(443)]);
        let a = object(&[("Owner", Value::from("a")), ("Ports", ports.clone())]);
        let b = object(&[("Ports", ports), ("Owner", Value::from("a"))]);
        assert_eq!(a, b);

        let reversed = Value::List(vec![Value::from(443), Value::from(80)]);
        let reordered = object(&[("Owner", Value::from("a")), ("Ports", reversed)]);
        assert_ne!(a, reordered);
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(Value::from("t2.micro").to_string(), "t2.micro");
        assert_eq!(num("8080").to_string(), "8080");
        assert_eq!(num("2.50").to_string(), "2.5");
        let list = Value::List(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(list.to_string(), "[a, b]");
        assert_eq!(object(&[("Env", Value::from("x"))]).to_string(), "{Env: x}");
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn render_literal_quotes_strings() {
        let list = Value::List(vec![Value::from("0.0.0.0/0"), Value::from(22)]);
        assert_eq!(list.render_literal(), "[\"0.0.0.0/0\", 22]");
        assert_eq!(Value::from("say \"hi\"").render_literal(), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn deserializes_from_json() {
        let value: Value =
            serde_json::from_str(r#"{"a": 1, "b": [true, null, "x"], "c": 1.25}"#).unwrap();
        let expected = object(&[
            ("a", Value::from(1)),
            (
                "b",
                Value::List(vec![Value::from(true), Value::Null, Value::from("x")]),
            ),
            ("c", num("1.25")),
        ]);
        assert_eq!(value, expected);
    }

    #[test]
    fn deserializes_from_toml() {
        let value: Value = toml::from_str("port = 5432\nname = \"db\"\n").unwrap();
        assert_eq!(
            value,
            object(&[("name", Value::from("db")), ("port", Value::from(5432))])
        );
    }

    #[test]
    fn serializes_numbers_as_json_numbers() {
        let value = object(&[
            ("port", Value::from(80)),
            ("ratio", num("0.5")),
            ("none", Value::Null),
        ]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"none":null,"port":80,"ratio":0.5}"#);
    }
}
