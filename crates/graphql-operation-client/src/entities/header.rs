use serde::{Deserialize, Serialize};

/// A single HTTP header. Headers are kept as an ordered list of pairs,
/// duplicates included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HttpHeader {
    pub name: String,
    pub value: String,
}

impl HttpHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive name comparison
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for HttpHeader {
    fn from((name, value): (N, V)) -> Self {
        HttpHeader::new(name, value)
    }
}
