//! Tagged document nodes.
//!
//! Decoded YAML/JSON values are converted once, at the edge, into `Node`, so
//! traversal elsewhere is a single exhaustive match instead of probing
//! whatever shape a decoder produced.

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

/// Ordered map of child nodes. Iteration order is insertion order.
pub type Map = IndexMap<String, Node>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Scalar(Scalar),
    Seq(Vec<Node>),
    Map(Map),
}

/// A decoded value that has no `Node` representation.
#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("unsupported map key {0}")]
    UnsupportedKey(String),

    #[error("duplicate map key `{0}`")]
    DuplicateKey(String),

    #[error("document root must be a map, found {0}")]
    RootNotMap(&'static str),
}

impl Node {
    pub fn empty_map() -> Self {
        Node::Map(Map::new())
    }

    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Null))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Node]> {
        match self {
            Node::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// Human name of the node's shape, used in type mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Scalar(Scalar::Null) => "null",
            Node::Scalar(Scalar::Bool(_)) => "boolean",
            Node::Scalar(Scalar::Int(_)) => "integer",
            Node::Scalar(Scalar::Float(_)) => "float",
            Node::Scalar(Scalar::String(_)) => "string",
            Node::Seq(_) => "sequence",
            Node::Map(_) => "map",
        }
    }

    /// Build a map node from `(key, value)` pairs, keeping their order.
    pub fn map_of<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Scalar(Scalar::String(value.to_string()))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Scalar(Scalar::String(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Scalar(Scalar::Int(value))
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Scalar(Scalar::Float(value))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Scalar(Scalar::Bool(value))
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Seq(value)
    }
}

impl From<Map> for Node {
    fn from(value: Map) -> Self {
        Node::Map(value)
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Node::null(),
            Value::Bool(b) => b.into(),
            Value::Number(n) => match n.as_i64() {
                Some(i) => i.into(),
                None => n.as_f64().unwrap_or(f64::NAN).into(),
            },
            Value::String(s) => s.into(),
            Value::Array(items) => Node::Seq(items.into_iter().map(Node::from).collect()),
            Value::Object(entries) => Node::Map(
                entries.into_iter().map(|(k, v)| (k, Node::from(v))).collect(),
            ),
        }
    }
}

/// Conversion from parsed YAML. Lossy in three places, all of which the
/// proxy's file provider never produces:
/// - `!tag` annotations are dropped and the tagged value is kept
/// - numeric and boolean map keys become string keys, and are written back
///   quoted
/// - integers outside the `i64` range are stored as floats
impl TryFrom<serde_yaml::Value> for Node {
    type Error = ShapeError;

    fn try_from(value: serde_yaml::Value) -> Result<Self, Self::Error> {
        use serde_yaml::Value;
        Ok(match value {
            Value::Null => Node::null(),
            Value::Bool(b) => b.into(),
            Value::Number(n) => match n.as_i64() {
                Some(i) => i.into(),
                None => n.as_f64().unwrap_or(f64::NAN).into(),
            },
            Value::String(s) => s.into(),
            Value::Sequence(items) => Node::Seq(
                items
                    .into_iter()
                    .map(Node::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Mapping(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (k, v) in entries {
                    let key = yaml_key(k)?;
                    if map.contains_key(&key) {
                        return Err(ShapeError::DuplicateKey(key));
                    }
                    map.insert(key, Node::try_from(v)?);
                }
                Node::Map(map)
            }
            Value::Tagged(tagged) => Node::try_from(tagged.value)?,
        })
    }
}

/// YAML allows scalar keys of any type; the document only addresses
/// string keys, so scalars are keyed by their textual form.
fn yaml_key(key: serde_yaml::Value) -> Result<String, ShapeError> {
    use serde_yaml::Value;
    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ShapeError::UnsupportedKey(format!("{other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_conversion_preserves_types_and_order() {
        let yaml: serde_yaml::Value = serde_yaml::from_str(
            "zeta: 1\nalpha: 2.5\nflag: true\nname: web\nlist: [b, a]\nempty:\n",
        )
        .unwrap();
        let node = Node::try_from(yaml).unwrap();
        let map = node.as_map().unwrap();

        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "flag", "name", "list", "empty"]);
        assert_eq!(map["zeta"], Node::from(1_i64));
        assert_eq!(map["alpha"], Node::from(2.5_f64));
        assert_eq!(map["flag"], Node::from(true));
        assert_eq!(map["name"], Node::from("web"));
        assert_eq!(map["list"], Node::Seq(vec!["b".into(), "a".into()]));
        assert!(map["empty"].is_null());
    }

    #[test]
    fn test_yaml_numeric_keys_become_strings() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("80: http\n443: https\n").unwrap();
        let node = Node::try_from(yaml).unwrap();
        assert_eq!(node.as_map().unwrap()["443"], Node::from("https"));
    }

    #[test]
    fn test_yaml_lossy_inputs() {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("tagged: !custom web\nhuge: 18446744073709551615\n").unwrap();
        let node = Node::try_from(yaml).unwrap();
        let map = node.as_map().unwrap();

        assert_eq!(map["tagged"], Node::from("web"));
        assert_eq!(map["huge"], Node::from(18446744073709551615_u64 as f64));
    }

    #[test]
    fn test_json_conversion() {
        let node = Node::from(serde_json::json!({"servers": [{"url": "http://a"}], "weight": 3}));
        let map = node.as_map().unwrap();
        assert_eq!(map["weight"], Node::from(3_i64));
        let servers = map["servers"].as_seq().unwrap();
        assert_eq!(servers[0].as_map().unwrap()["url"].as_str(), Some("http://a"));
    }

    #[test]
    fn test_serialize_untagged() {
        let node = Node::map_of([("rule", Node::from("Host(`a`)")), ("n", Node::from(1_i64))]);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json, serde_json::json!({"rule": "Host(`a`)", "n": 1}));
        assert_eq!(serde_json::to_value(Node::null()).unwrap(), serde_json::Value::Null);
    }
}
