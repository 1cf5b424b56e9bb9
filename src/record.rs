use serde::ser::{Serialize, SerializeMap, Serializer};

/// One ingested row: column name -> value, kept in header order.
///
/// Starts life as the raw row (normalized header zipped with the fields) and
/// is then enriched in place by the ingester.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRecord {
    fields: Vec<(String, String)>,
}

impl NormalizedRecord {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Zips `headers` with `values`; a repeated header keeps its first
    /// position and its last value.
    pub fn from_row<H, V>(headers: &[H], values: &[V]) -> Self
    where
        H: AsRef<str>,
        V: AsRef<str>,
    {
        let mut rec = Self { fields: Vec::with_capacity(headers.len()) };
        for (h, v) in headers.iter().zip(values.iter()) {
            rec.insert(h.as_ref(), v.as_ref());
        }
        rec
    }

    /// Overwrites in place when `key` exists, appends otherwise.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
