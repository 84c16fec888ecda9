use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Cookie names that carry the logged-in identity on xueqiu.com.
pub const KEY_COOKIES: [&str; 3] = ["xq_a_token", "xq_r_token", "u"];

/// Cookie name -> value for a single site. Later inserts of the same name win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieStore {
    cookies: BTreeMap<String, String>,
}

impl CookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Bulk merge, overwriting by name.
    pub fn merge(&mut self, other: CookieStore) {
        self.cookies.extend(other.cookies);
    }

    /// Which of [`KEY_COOKIES`] are present.
    pub fn key_cookies(&self) -> Vec<&'static str> {
        KEY_COOKIES
            .iter()
            .copied()
            .filter(|name| self.cookies.contains_key(*name))
            .collect()
    }

    /// Parses a browser `Cookie` header string (`a=1; b=2`). Segments without
    /// `=` are ignored and only the first `=` splits name from value.
    pub fn parse_header_string(raw: &str) -> Self {
        let mut store = CookieStore::new();
        for segment in raw.split(';') {
            let segment = segment.trim();
            if let Some((name, value)) = segment.split_once('=') {
                store.insert(name, value);
            }
        }
        store
    }

    /// Renders the store as a `Cookie` request header value.
    pub fn to_header_value(&self) -> String {
        self.cookies
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
