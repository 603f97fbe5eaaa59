use super::{HttpHeader, HttpMethod, CAN_BE_BATCHED, CAN_BE_BATCHED_VALUE};

/// A transport-ready HTTP request produced by a composer
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<HttpHeader>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(HttpHeader::new(name, value));
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = HttpHeader>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// First header with the given name, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.is(name))
            .map(|h| h.value.as_str())
    }

    /// Every value sent for `name`, in order
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |h| h.is(name))
            .map(|h| h.value.as_str())
    }

    pub fn body_as_str(&self) -> Option<&str> {
        self.body
            .as_deref()
            .and_then(|body| std::str::from_utf8(body).ok())
    }

    pub fn is_batch_eligible(&self) -> bool {
        self.header(CAN_BE_BATCHED)
            .is_some_and(|value| value.eq_ignore_ascii_case(CAN_BE_BATCHED_VALUE))
    }

    /// Remove the batching marker before the request goes on the wire.
    ///
    /// Returns whether the request was marked as batchable.
    pub fn take_batching_marker(&mut self) -> bool {
        let eligible = self.is_batch_eligible();
        self.headers.retain(|h| !h.is(CAN_BE_BATCHED));
        eligible
    }
}
