use indexmap::IndexMap;

/// Request headers, keyed by lowercased name, where each name may carry
/// more than one value.  Insertion order is preserved so requests go out
/// the same way every time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(IndexMap<String, Vec<String>>);

impl Headers {
    pub fn new() -> Self {
        Headers::default()
    }

    /// Appends `value` to whatever `name` already holds
    pub fn add(&mut self, name: &str, value: &str) {
        self.0
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.to_owned());
    }

    /// Replaces every value of `name` with `value`
    pub fn set(&mut self, name: &str, value: &str) {
        self.0
            .insert(name.to_ascii_lowercase(), vec![value.to_owned()]);
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0
            .get(&name.to_ascii_lowercase())
            .map(|values| values.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    /// Layers `other` on top of these headers.  A name present in `other`
    /// replaces the same name here.
    pub fn extend(&mut self, other: &Headers) {
        for (name, values) in &other.0 {
            self.0.insert(name.clone(), values.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every `(name, value)` pair, one per value
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|(name, values)| {
            values
                .iter()
                .map(move |value| (name.as_str(), value.as_str()))
        })
    }

    /// Every name with all of its values, in insertion order
    pub fn iter_grouped(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.add(name.as_ref(), value.as_ref());
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use crate::elasticsearch::Headers;

    #[test]
    fn test_add_accumulates() {
        let mut headers = Headers::new();
        headers.add("X-Opaque-Id", "one");
        headers.add("x-opaque-id", "two");

        assert_eq!(
            headers.get("X-OPAQUE-ID"),
            Some(&["one".to_string(), "two".to_string()][..])
        );
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![("x-opaque-id", "one"), ("x-opaque-id", "two")]
        );
    }

    #[test]
    fn test_set_replaces() {
        let mut headers = Headers::new();
        headers.add("accept", "text/plain");
        headers.add("accept", "application/json");
        headers.set("Accept", "application/cbor");

        assert_eq!(headers.get("accept"), Some(&["application/cbor".to_string()][..]));
    }

    #[test]
    fn test_extend_overrides_by_name() {
        let mut defaults: Headers = vec![("user-agent", "zdb"), ("x-a", "1")]
            .into_iter()
            .collect();
        let request: Headers = vec![("x-a", "2"), ("x-a", "3"), ("x-b", "4")]
            .into_iter()
            .collect();

        defaults.extend(&request);
        assert_eq!(
            defaults.iter().collect::<Vec<_>>(),
            vec![
                ("user-agent", "zdb"),
                ("x-a", "2"),
                ("x-a", "3"),
                ("x-b", "4")
            ]
        );
    }
}
