//! Read-only view over decoded TOML documents.
//!
//! Lookups never fail: a missing key and a value of the wrong type both come
//! back as `None`, and callers substitute their defaults.

use crate::Result;

/// A decoded document: the project manifest or a sprite-sheet descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    root: toml::Table,
}

impl Document {
    /// Decodes UTF-8 TOML text. Fails with `DocumentParse` on invalid UTF-8 or
    /// malformed TOML.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        let root = text.parse::<toml::Table>()?;
        Ok(Self { root })
    }

    pub fn root(&self) -> Table<'_> {
        Table { inner: &self.root }
    }

    pub fn get(&self, key: &str) -> Option<Node<'_>> {
        self.root().get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.root().get_str(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.root().get_int(key)
    }

    pub fn get_table(&self, key: &str) -> Option<Table<'_>> {
        self.root().get_table(key)
    }

    pub fn get_array(&self, key: &str) -> Option<Array<'_>> {
        self.root().get_array(key)
    }
}

/// One value inside a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    Str(&'a str),
    Int(i64),
    Float(f64),
    Bool(bool),
    Table(Table<'a>),
    Array(Array<'a>),
    /// Values the engine has no use for (dates and times).
    Other,
}

impl<'a> Node<'a> {
    fn from_value(value: &'a toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Node::Str(s),
            toml::Value::Integer(i) => Node::Int(*i),
            toml::Value::Float(f) => Node::Float(*f),
            toml::Value::Boolean(b) => Node::Bool(*b),
            toml::Value::Table(t) => Node::Table(Table { inner: t }),
            toml::Value::Array(a) => Node::Array(Array { items: a }),
            toml::Value::Datetime(_) => Node::Other,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Node::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Node::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<Table<'a>> {
        match *self {
            Node::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<Array<'a>> {
        match *self {
            Node::Array(a) => Some(a),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Table<'a> {
    inner: &'a toml::Table,
}

impl<'a> Table<'a> {
    pub fn get(&self, key: &str) -> Option<Node<'a>> {
        self.inner.get(key).map(Node::from_value)
    }

    pub fn get_str(&self, key: &str) -> Option<&'a str> {
        self.get(key)?.as_str()
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_int()
    }

    pub fn get_table(&self, key: &str) -> Option<Table<'a>> {
        self.get(key)?.as_table()
    }

    pub fn get_array(&self, key: &str) -> Option<Array<'a>> {
        self.get(key)?.as_array()
    }

    /// Key/value pairs, ordered by key.
    pub fn entries(self) -> impl Iterator<Item = (&'a str, Node<'a>)> + 'a {
        self.inner
            .iter()
            .map(|(k, v)| (k.as_str(), Node::from_value(v)))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Array<'a> {
    items: &'a [toml::Value],
}

impl<'a> Array<'a> {
    /// Items in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Node<'a>> + 'a {
        self.items.iter().map(Node::from_value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;

    #[test]
    fn reads_scalars_tables_and_arrays() {
        let doc = Document::decode(
            br#"
            image_path = "hero.png"
            width = 16
            scale = 1.5
            visible = true

            [states.idle]
            frames = [[0, 0], [16, 0]]
            "#,
        )
        .unwrap();

        assert_eq!(doc.get_str("image_path"), Some("hero.png"));
        assert_eq!(doc.get_int("width"), Some(16));
        assert_eq!(doc.get("scale"), Some(Node::Float(1.5)));
        assert_eq!(doc.get("visible"), Some(Node::Bool(true)));

        let idle = doc.get_table("states").unwrap().get_table("idle").unwrap();
        let frames = idle.get_array("frames").unwrap();
        assert_eq!(frames.len(), 2);
        let second: Vec<_> = frames
            .iter()
            .nth(1)
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|n| n.as_int())
            .collect();
        assert_eq!(second, [16, 0]);
    }

    #[test]
    fn wrong_types_and_missing_keys_are_none() {
        let doc = Document::decode(b"width = \"wide\"\nstates = 3").unwrap();

        assert_eq!(doc.get_int("width"), None);
        assert_eq!(doc.get_str("width"), Some("wide"));
        assert_eq!(doc.get_table("states"), None);
        assert_eq!(doc.get_int("height"), None);
        assert_eq!(doc.get_array("frames"), None);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Document::decode(b"image_path = \"unterminated").unwrap_err();
        assert!(matches!(err, EngineError::DocumentParse(_)));
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let err = Document::decode(&[0x77, 0x3d, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, EngineError::DocumentParse(_)));
    }

    #[test]
    fn empty_input_is_an_empty_document() {
        let doc = Document::decode(b"").unwrap();
        assert!(doc.root().is_empty());
    }
}
