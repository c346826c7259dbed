use crate::claims::{current_timestamp, Claims, SubjectId};
use crate::codec::TokenCodec;
use crate::config::{SigningConfig, SigningSettings};
use crate::error::{Error, Result};
use crate::limits::DEFAULT_NOT_BEFORE_LEEWAY_SECONDS;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// Issues fresh session tokens for authenticated subjects
///
/// Every token gets `iat = now`, `nbf = now - leeway` (to tolerate small
/// clock differences between services), `exp = now + lifetime` and the
/// issuer's name as `iss`.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    codec: TokenCodec,
    issuer: String,
    lifetime: Duration,
    not_before_leeway: Duration,
}

impl TokenIssuer {
    pub fn new(codec: TokenCodec, issuer: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            codec,
            issuer: issuer.into(),
            lifetime,
            not_before_leeway: Duration::from_secs(DEFAULT_NOT_BEFORE_LEEWAY_SECONDS),
        }
    }

    /// Wire an issuer from loaded settings
    pub fn from_settings(settings: &SigningSettings) -> Result<Self> {
        let config = SigningConfig::from_settings(settings)?;
        Ok(Self::new(
            TokenCodec::new(Arc::new(config)),
            settings.issuer.clone(),
            Duration::from_secs(settings.token_lifetime_secs),
        )
        .with_not_before_leeway(Duration::from_secs(settings.not_before_leeway_secs)))
    }

    pub fn with_not_before_leeway(mut self, leeway: Duration) -> Self {
        self.not_before_leeway = leeway;
        self
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Claims a token issued at `now` would carry, before signing
    pub fn claims(&self, subject: impl Into<SubjectId>, now: i64) -> Result<Claims> {
        let lifetime = seconds(self.lifetime)?;
        let leeway = seconds(self.not_before_leeway)?;

        let expires_at = now.checked_add(lifetime).ok_or(Error::TimestampOverflow)?;
        let not_before = now.checked_sub(leeway).ok_or(Error::TimestampOverflow)?;

        Ok(Claims::new(subject, now, expires_at)
            .not_before(not_before)
            .issuer(self.issuer.clone()))
    }

    /// Issue a token for `subject` at `now`
    pub fn issue(&self, subject: impl Into<SubjectId>, now: i64) -> Result<String> {
        self.codec.encode(&self.claims(subject, now)?)
    }

    /// Issue a token carrying additional custom claims
    pub fn issue_with(
        &self,
        subject: impl Into<SubjectId>,
        extra: Map<String, Value>,
        now: i64,
    ) -> Result<String> {
        let mut claims = self.claims(subject, now)?;
        claims.extra = extra;
        self.codec.encode(&claims)
    }

    /// Issue a token whose custom claims are the fields of `payload`
    pub fn issue_payload<T: Serialize>(
        &self,
        subject: impl Into<SubjectId>,
        payload: &T,
        now: i64,
    ) -> Result<String> {
        let claims = self.claims(subject, now)?.with_payload(payload)?;
        self.codec.encode(&claims)
    }

    /// [`issue`](Self::issue) at the current system time
    pub fn issue_now(&self, subject: impl Into<SubjectId>) -> Result<String> {
        self.issue(subject, current_timestamp())
    }
}

fn seconds(duration: Duration) -> Result<i64> {
    i64::try_from(duration.as_secs()).map_err(|_| Error::TimestampOverflow)
}
