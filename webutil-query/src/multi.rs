use crate::QueryValue;

/// Ordered mapping of keys to lists of values, e.g. a form with repeated fields.
/// Keys keep the order of their first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiValueMap {
    entries: Vec<(String, Vec<String>)>,
}

impl MultiValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the list for `key`, creating the key if needed.
    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        let idx = self.index_or_insert(key);
        self.entries[idx].1.push(value.into());
    }

    /// Replace the whole list for `key`.
    pub fn set_list<V: Into<String>>(&mut self, key: &str, values: impl IntoIterator<Item = V>) {
        let idx = self.index_or_insert(key);
        self.entries[idx].1 = values.into_iter().map(Into::into).collect();
    }

    /// The last value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_list(key).last().map(String::as_str)
    }

    pub fn get_list(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index_or_insert(&mut self, key: &str) -> usize {
        if let Some(i) = self.entries.iter().position(|(k, _)| k == key) {
            return i;
        }
        self.entries.push((key.to_string(), Vec::new()));
        self.entries.len() - 1
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for MultiValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.append(k.as_ref(), v);
        }
        map
    }
}

fn into_pair((key, values): (String, Vec<String>)) -> (String, QueryValue) {
    (key, QueryValue::Seq(values))
}

impl IntoIterator for MultiValueMap {
    type Item = (String, QueryValue);
    type IntoIter =
        std::iter::Map<std::vec::IntoIter<(String, Vec<String>)>, fn((String, Vec<String>)) -> (String, QueryValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter().map(into_pair as fn(_) -> _)
    }
}
