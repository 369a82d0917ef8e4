use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Ordered list of field names declared by a row stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header(Arc<[String]>);

impl Header {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Header(fields.into_iter().map(Into::into).collect())
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|f| f == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Appends the given names, skipping any already declared.
    pub fn extend(&self, extra: &[&str]) -> Header {
        let mut fields = self.0.to_vec();
        for name in extra {
            if !fields.iter().any(|f| f == name) {
                fields.push((*name).to_string());
            }
        }
        Header(fields.into())
    }

    pub fn without(&self, names: &[&str]) -> Header {
        Header(
            self.0
                .iter()
                .filter(|f| !names.contains(&f.as_str()))
                .cloned()
                .collect(),
        )
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

/// One record of a row stream: field name to string value.
///
/// Absent fields read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: HashMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs `values` with the header's names. Surplus values are dropped and
    /// missing ones stay absent.
    pub fn from_values<I, S>(header: &Header, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = header
            .fields()
            .iter()
            .cloned()
            .zip(values.into_iter().map(Into::into))
            .collect();
        Row { fields }
    }

    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn put(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Values in the header's order, empty for fields this row lacks.
    pub fn values_for<'a>(&'a self, header: &'a Header) -> impl Iterator<Item = &'a str> + 'a {
        header.fields().iter().map(|name| self.get(name))
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Row {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
