use std::fmt;

/// Ordered cache key, e.g. `["/api/wallet", "1"]`.
///
/// The first element is the request URL for fetchers built by
/// [`make_query_fn`](super::make_query_fn); the remaining elements only
/// distinguish cache entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// URL element of the key.
    pub fn url(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// `true` when `prefix` matches the leading elements of this key.
    /// An empty prefix matches every key.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

impl From<&str> for QueryKey {
    fn from(url: &str) -> Self {
        Self(vec![url.to_string()])
    }
}

impl From<String> for QueryKey {
    fn from(url: String) -> Self {
        Self(vec![url])
    }
}

impl<const N: usize> From<[&str; N]> for QueryKey {
    fn from(parts: [&str; N]) -> Self {
        Self::new(parts)
    }
}

impl From<Vec<String>> for QueryKey {
    fn from(parts: Vec<String>) -> Self {
        Self(parts)
    }
}

impl From<&QueryKey> for QueryKey {
    fn from(key: &QueryKey) -> Self {
        key.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching() {
        let key = QueryKey::from(["/api/wallet", "1"]);
        assert!(key.starts_with(&QueryKey::from("/api/wallet")));
        assert!(key.starts_with(&QueryKey::new(Vec::<String>::new())));
        assert!(!key.starts_with(&QueryKey::from(["/api/wallet", "2"])));
        assert!(!QueryKey::from("/api/wallet").starts_with(&key));
    }

    #[test]
    fn test_url_and_display() {
        let key = QueryKey::from(["/api/wallet", "1"]);
        assert_eq!(key.url(), Some("/api/wallet"));
        assert_eq!(key.to_string(), "[/api/wallet, 1]");
        assert_eq!(QueryKey::new(Vec::<String>::new()).url(), None);
    }
}
