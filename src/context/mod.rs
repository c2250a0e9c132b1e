//! Per-request context — the request plus the path parameters extracted by
//! the matched route.

use std::fmt;

use crate::Request;

/// A single path parameter value, typed by the converter in the route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Captured by an `<int:name>` segment.
    Int(u64),
    /// Captured by a `<str:name>` (or bare `<name>`) segment.
    Str(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// Path parameters extracted from the matched route, in capture order.
#[derive(Default, Debug, Clone)]
pub struct PathParams {
    values: Vec<(String, ParamValue)>,
}

impl PathParams {
    /// Create a new empty parameter set.
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Append a captured parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.values.push((name.into(), value));
    }

    /// Get a captured value by name.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Get an integer parameter by name.
    ///
    /// Returns `None` if the parameter is absent or was captured as a string.
    pub fn int(&self, name: &str) -> Option<u64> {
        match self.get(name) {
            Some(ParamValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// Get a string parameter by name.
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ParamValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Number of captured parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-request context handed to handlers: the parsed request and the typed
/// path parameters from the route match.
pub struct Context {
    request: Request,
    params: PathParams,
}

impl Context {
    /// Create a context with no path parameters.
    pub fn new(request: Request) -> Self {
        Self {
            request,
            params: PathParams::new(),
        }
    }

    /// Create a context carrying the parameters extracted by the router.
    pub fn with_params(request: Request, params: PathParams) -> Self {
        Self { request, params }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access() {
        let mut params = PathParams::new();
        params.insert("question_id", ParamValue::Int(5));
        params.insert("slug", ParamValue::Str("general".to_owned()));

        assert_eq!(params.int("question_id"), Some(5));
        assert_eq!(params.str("slug"), Some("general"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn type_mismatch_is_none() {
        let mut params = PathParams::new();
        params.insert("question_id", ParamValue::Int(5));

        assert_eq!(params.str("question_id"), None);
        assert_eq!(params.int("missing"), None);
    }

    #[test]
    fn display_renders_verbatim() {
        assert_eq!(ParamValue::Int(42).to_string(), "42");
        assert_eq!(ParamValue::Str("abc".to_owned()).to_string(), "abc");
    }

    #[test]
    fn context_carries_params() {
        let raw = b"GET /polls/5/ HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let (req, _) = Request::parse(raw).unwrap();

        let mut params = PathParams::new();
        params.insert("question_id", ParamValue::Int(5));

        let ctx = Context::with_params(req, params);
        assert_eq!(ctx.request().path(), "/polls/5/");
        assert_eq!(ctx.params().int("question_id"), Some(5));
    }
}
