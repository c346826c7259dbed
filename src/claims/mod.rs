mod validator;

pub use validator::{current_timestamp, time_status, TimeStatus};

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload keys owned by [`Claims`]; custom payloads may not use them
pub const RESERVED_CLAIMS: [&str; 5] = ["sub", "iat", "nbf", "exp", "iss"];

/// Value of `iat` or `nbf` when the payload omits it
///
/// An absent `nbf` places no lower bound on validity. Absent claims stay
/// absent when the claims are encoded again.
pub const UNSET_TIME: i64 = i64::MIN;

fn unset_time() -> i64 {
    UNSET_TIME
}

fn is_unset_time(timestamp: &i64) -> bool {
    *timestamp == UNSET_TIME
}

/// Identifier of the authenticated principal
///
/// Serialized untagged, so `"sub": 42` and `"sub": "alice"` are both accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubjectId {
    /// Numeric subject (e.g. a database row ID)
    Int(i64),
    /// String subject (e.g. a username or UUID)
    Str(String),
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectId::Int(id) => write!(f, "{id}"),
            SubjectId::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for SubjectId {
    fn from(id: i64) -> Self {
        SubjectId::Int(id)
    }
}

impl From<i32> for SubjectId {
    fn from(id: i32) -> Self {
        SubjectId::Int(id.into())
    }
}

impl From<u32> for SubjectId {
    fn from(id: u32) -> Self {
        SubjectId::Int(id.into())
    }
}

impl From<String> for SubjectId {
    fn from(id: String) -> Self {
        SubjectId::Str(id)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        SubjectId::Str(id.to_string())
    }
}

/// Session token claims
///
/// The registered claims are typed fields; everything else in the payload is
/// kept, in order, in [`extra`](Self::extra) and written back at the top level
/// when the claims are encoded. The codec never looks inside `extra`.
///
/// # Examples
///
/// ```ignore
/// use session_jwt::Claims;
///
/// let claims = Claims::new(42, 1000, 2000)
///     .issuer("svc")
///     .not_before(990)
///     .claim("role", "admin")?;
///
/// assert_eq!(claims.extra["role"], "admin");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub) - the authenticated principal
    #[serde(rename = "sub")]
    pub subject: SubjectId,

    /// Issued At (iat) - seconds since Unix epoch, [`UNSET_TIME`] if absent
    #[serde(
        rename = "iat",
        default = "unset_time",
        skip_serializing_if = "is_unset_time"
    )]
    pub issued_at: i64,

    /// Not Before (nbf) - the token must not be accepted before this time;
    /// [`UNSET_TIME`] if absent
    #[serde(
        rename = "nbf",
        default = "unset_time",
        skip_serializing_if = "is_unset_time"
    )]
    pub not_before: i64,

    /// Expiration Time (exp) - the token is expired from this time on
    #[serde(rename = "exp")]
    pub expires_at: i64,

    /// Issuer (iss) - informational unless an expected issuer is configured
    #[serde(rename = "iss", default, skip_serializing_if = "String::is_empty")]
    pub issuer: String,

    /// Caller-defined fields, carried through encode/decode untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Create claims valid from `issued_at` until `expires_at`
    ///
    /// `not_before` defaults to `issued_at`; the issuer is empty.
    pub fn new(subject: impl Into<SubjectId>, issued_at: i64, expires_at: i64) -> Self {
        Self {
            subject: subject.into(),
            issued_at,
            not_before: issued_at,
            expires_at,
            issuer: String::new(),
            extra: Map::new(),
        }
    }

    /// Set the issuer
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Set the not-before time
    pub fn not_before(mut self, not_before: i64) -> Self {
        self.not_before = not_before;
        self
    }

    /// Add a single custom claim
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let name = name.into();
        ensure_not_reserved(&name)?;
        self.extra.insert(name, value.into());
        Ok(self)
    }

    /// Merge a serializable payload's fields into the custom claims
    ///
    /// The payload must serialize to a JSON object. Existing custom claims with
    /// the same names are replaced.
    pub fn with_payload<T: Serialize>(mut self, payload: &T) -> Result<Self> {
        let value =
            serde_json::to_value(payload).map_err(|e| Error::PayloadInvalid(e.to_string()))?;

        let Value::Object(fields) = value else {
            return Err(Error::PayloadInvalid(
                "custom payload must serialize to a JSON object".to_string(),
            ));
        };

        for name in fields.keys() {
            ensure_not_reserved(name)?;
        }
        self.extra.extend(fields);
        Ok(self)
    }

    /// Deserialize the custom claims into a caller-defined type
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.extra.clone()))
            .map_err(|e| Error::PayloadInvalid(e.to_string()))
    }

    /// Copy of these claims with a new expiry; everything else is unchanged
    pub fn with_expiry(&self, expires_at: i64) -> Self {
        Self {
            expires_at,
            ..self.clone()
        }
    }

    /// Check the creation-time invariant `not_before <= issued_at < expires_at`
    /// and that no custom claim shadows a registered one
    ///
    /// Without an `iat` only the custom claims are checked.
    pub fn check(&self) -> Result<()> {
        if is_unset_time(&self.issued_at) {
            return self.extra.keys().try_for_each(|name| ensure_not_reserved(name));
        }
        if self.not_before > self.issued_at {
            return Err(Error::InvalidClaims(format!(
                "not_before ({}) is after issued_at ({})",
                self.not_before, self.issued_at
            )));
        }
        if self.issued_at >= self.expires_at {
            return Err(Error::InvalidClaims(format!(
                "expires_at ({}) must be after issued_at ({})",
                self.expires_at, self.issued_at
            )));
        }
        for name in self.extra.keys() {
            ensure_not_reserved(name)?;
        }
        Ok(())
    }
}

fn ensure_not_reserved(name: &str) -> Result<()> {
    if RESERVED_CLAIMS.contains(&name) {
        Err(Error::ReservedClaim(name.to_string()))
    } else {
        Ok(())
    }
}
