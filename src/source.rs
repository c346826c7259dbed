//! Locating the raw token in an incoming request
//!
//! The core never sees request objects. Callers implement [`RequestView`]
//! over whatever their framework provides, and a [`TokenSource`] (or a
//! [`TokenLookup`] of several) pulls the token string out of it.

use crate::error::{Error, Result};
use std::str::FromStr;

/// Default header carrying the token
pub const DEFAULT_HEADER: &str = "Authorization";

/// Default authorization scheme
pub const DEFAULT_SCHEME: &str = "Bearer";

/// Read-only access to the parts of a request a token can live in
pub trait RequestView {
    /// Value of the named header, if present
    fn header(&self, name: &str) -> Option<&str>;

    /// Value of the named query parameter, if present
    fn query(&self, name: &str) -> Option<&str>;

    /// Value of the named cookie, if present
    fn cookie(&self, name: &str) -> Option<&str>;

    /// Value of the named path parameter, if the router captured one
    fn param(&self, _name: &str) -> Option<&str> {
        None
    }
}

/// Where to find the token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// `<name>: <scheme> <token>`, or the whole header value if `scheme` is empty
    Header { name: String, scheme: String },
    /// `?<name>=<token>`
    Query(String),
    /// `Cookie: <name>=<token>`
    Cookie(String),
    /// `/<...>/:<name>` path parameter
    Param(String),
}

impl Default for TokenSource {
    fn default() -> Self {
        TokenSource::Header {
            name: DEFAULT_HEADER.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
        }
    }
}

impl TokenSource {
    pub fn header(name: impl Into<String>, scheme: impl Into<String>) -> Self {
        TokenSource::Header {
            name: name.into(),
            scheme: scheme.into(),
        }
    }

    pub fn query(name: impl Into<String>) -> Self {
        TokenSource::Query(name.into())
    }

    pub fn cookie(name: impl Into<String>) -> Self {
        TokenSource::Cookie(name.into())
    }

    pub fn param(name: impl Into<String>) -> Self {
        TokenSource::Param(name.into())
    }

    /// Pull the raw token out of a request
    pub fn extract<'r, R: RequestView + ?Sized>(&self, request: &'r R) -> Result<&'r str> {
        match self {
            TokenSource::Header { name, scheme } => {
                let value = request
                    .header(name)
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| Error::EmptyAuthHeader(name.clone()))?;

                if scheme.is_empty() {
                    return Ok(value);
                }

                // "<scheme> <token>", exact scheme, at least one space
                value
                    .strip_prefix(scheme.as_str())
                    .filter(|rest| rest.starts_with(' '))
                    .map(str::trim)
                    .filter(|token| !token.is_empty() && !token.contains(' '))
                    .ok_or_else(|| Error::InvalidAuthHeader(name.clone()))
            }
            TokenSource::Query(name) => request
                .query(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::EmptyQueryToken(name.clone())),
            TokenSource::Cookie(name) => request
                .cookie(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::EmptyCookieToken(name.clone())),
            TokenSource::Param(name) => request
                .param(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::EmptyParamToken(name.clone())),
        }
    }
}

/// An ordered list of token sources, tried until one yields a token
///
/// Parses from the familiar `"header: Authorization, query: token, cookie: jwt"`
/// form (plus `param: <name>`); header sources parsed this way use the
/// `Bearer` scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLookup {
    sources: Vec<TokenSource>,
}

impl Default for TokenLookup {
    fn default() -> Self {
        Self {
            sources: vec![TokenSource::default()],
        }
    }
}

impl TokenLookup {
    pub fn new(sources: Vec<TokenSource>) -> Result<Self> {
        if sources.is_empty() {
            return Err(Error::ConfigurationInvalid(
                "token lookup needs at least one source".to_string(),
            ));
        }
        Ok(Self { sources })
    }

    pub fn sources(&self) -> &[TokenSource] {
        &self.sources
    }

    /// First token found; if every source fails, the last source's error
    pub fn extract<'r, R: RequestView + ?Sized>(&self, request: &'r R) -> Result<&'r str> {
        let mut last_error = None;
        for source in &self.sources {
            match source.extract(request) {
                Ok(token) => return Ok(token),
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error.unwrap_or_else(|| {
            Error::ConfigurationInvalid("token lookup has no sources".to_string())
        }))
    }
}

impl FromStr for TokenLookup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let sources = s
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (kind, name) = entry.split_once(':').ok_or_else(|| {
                    Error::ConfigurationInvalid(format!("token lookup entry '{entry}' has no ':'"))
                })?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(Error::ConfigurationInvalid(format!(
                        "token lookup entry '{entry}' has no name"
                    )));
                }
                match kind.trim() {
                    "header" => Ok(TokenSource::header(name, DEFAULT_SCHEME)),
                    "query" => Ok(TokenSource::query(name)),
                    "cookie" => Ok(TokenSource::cookie(name)),
                    "param" => Ok(TokenSource::param(name)),
                    other => Err(Error::ConfigurationInvalid(format!(
                        "unknown token lookup kind '{other}'"
                    ))),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeRequest {
        headers: HashMap<String, String>,
        query: HashMap<String, String>,
        cookies: HashMap<String, String>,
        params: HashMap<String, String>,
    }

    impl FakeRequest {
        fn with_header(mut self, name: &str, value: &str) -> Self {
            self.headers.insert(name.to_string(), value.to_string());
            self
        }

        fn with_query(mut self, name: &str, value: &str) -> Self {
            self.query.insert(name.to_string(), value.to_string());
            self
        }

        fn with_cookie(mut self, name: &str, value: &str) -> Self {
            self.cookies.insert(name.to_string(), value.to_string());
            self
        }

        fn with_param(mut self, name: &str, value: &str) -> Self {
            self.params.insert(name.to_string(), value.to_string());
            self
        }
    }

    impl RequestView for FakeRequest {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers.get(name).map(String::as_str)
        }

        fn query(&self, name: &str) -> Option<&str> {
            self.query.get(name).map(String::as_str)
        }

        fn cookie(&self, name: &str) -> Option<&str> {
            self.cookies.get(name).map(String::as_str)
        }

        fn param(&self, name: &str) -> Option<&str> {
            self.params.get(name).map(String::as_str)
        }
    }

    #[test]
    fn test_bearer_header() {
        let request = FakeRequest::default().with_header("Authorization", "Bearer abc.def.ghi");
        assert_eq!(TokenSource::default().extract(&request), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_missing_or_empty_header() {
        let source = TokenSource::default();
        assert_eq!(
            source.extract(&FakeRequest::default()),
            Err(Error::EmptyAuthHeader("Authorization".to_string()))
        );
        let blank = FakeRequest::default().with_header("Authorization", "   ");
        assert_eq!(
            source.extract(&blank),
            Err(Error::EmptyAuthHeader("Authorization".to_string()))
        );
    }

    #[test]
    fn test_invalid_header() {
        let source = TokenSource::default();
        for value in ["Basic abc", "Bearer", "Bearerabc", "bearer abc", "Bearer a b"] {
            let request = FakeRequest::default().with_header("Authorization", value);
            assert_eq!(
                source.extract(&request),
                Err(Error::InvalidAuthHeader("Authorization".to_string())),
                "{value:?}"
            );
        }
    }

    #[test]
    fn test_header_without_scheme() {
        let source = TokenSource::header("X-Session", "");
        let request = FakeRequest::default().with_header("X-Session", "abc.def.ghi");
        assert_eq!(source.extract(&request), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_query_and_cookie() {
        let request = FakeRequest::default()
            .with_query("token", "q.q.q")
            .with_cookie("jwt", "c.c.c");
        assert_eq!(TokenSource::query("token").extract(&request), Ok("q.q.q"));
        assert_eq!(TokenSource::cookie("jwt").extract(&request), Ok("c.c.c"));

        let empty = FakeRequest::default().with_query("token", "").with_cookie("jwt", "");
        assert_eq!(
            TokenSource::query("token").extract(&empty),
            Err(Error::EmptyQueryToken("token".to_string()))
        );
        assert_eq!(
            TokenSource::cookie("jwt").extract(&empty),
            Err(Error::EmptyCookieToken("jwt".to_string()))
        );
    }

    #[test]
    fn test_path_param() {
        let request = FakeRequest::default().with_param("token", "p.p.p");
        assert_eq!(TokenSource::param("token").extract(&request), Ok("p.p.p"));
        assert_eq!(
            TokenSource::param("jwt").extract(&request),
            Err(Error::EmptyParamToken("jwt".to_string()))
        );

        let lookup: TokenLookup = "header: Authorization, param: token".parse().unwrap();
        assert_eq!(lookup.sources()[1], TokenSource::param("token"));
        assert_eq!(lookup.extract(&request), Ok("p.p.p"));
    }

    #[test]
    fn test_lookup_order() {
        let lookup: TokenLookup = "header: Authorization, query: token, cookie: jwt"
            .parse()
            .unwrap();
        assert_eq!(lookup.sources().len(), 3);

        let request = FakeRequest::default()
            .with_query("token", "from-query")
            .with_cookie("jwt", "from-cookie");
        assert_eq!(lookup.extract(&request), Ok("from-query"));

        let cookie_only = FakeRequest::default().with_cookie("jwt", "from-cookie");
        assert_eq!(lookup.extract(&cookie_only), Ok("from-cookie"));

        assert_eq!(
            lookup.extract(&FakeRequest::default()),
            Err(Error::EmptyCookieToken("jwt".to_string()))
        );
    }

    #[test]
    fn test_lookup_parse_errors() {
        for input in ["", "header", "path: id", "query:", "param:"] {
            assert!(
                matches!(input.parse::<TokenLookup>(), Err(Error::ConfigurationInvalid(_))),
                "{input:?}"
            );
        }
    }
}
