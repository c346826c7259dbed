//! Permission checks for authenticated subjects
//!
//! A [`PermissionGate`] runs on the result of
//! [`SessionValidator::authenticate`](crate::SessionValidator::authenticate).
//! It consults its [`Enforcer`] only for `Valid` tokens and turns every other
//! state into [`Error::Unauthenticated`].

use crate::claims::Claims;
use crate::error::{Error, Result};
use crate::validator::TokenState;
use std::sync::Arc;

/// Permission backend: may `subject` perform `action` on `resource`?
pub trait Enforcer: Send + Sync {
    fn enforce(&self, subject: &str, resource: &str, action: &str) -> Result<bool>;
}

impl<E: Enforcer + ?Sized> Enforcer for Arc<E> {
    fn enforce(&self, subject: &str, resource: &str, action: &str) -> Result<bool> {
        (**self).enforce(subject, resource, action)
    }
}

impl<E: Enforcer + ?Sized> Enforcer for Box<E> {
    fn enforce(&self, subject: &str, resource: &str, action: &str) -> Result<bool> {
        (**self).enforce(subject, resource, action)
    }
}

type SubjectKeyFn = dyn Fn(&Claims) -> Option<String> + Send + Sync;

/// Authorizes requests carrying a valid session token
#[derive(Clone)]
pub struct PermissionGate<E> {
    enforcer: E,
    table_prefix: String,
    subject_key: Option<Arc<SubjectKeyFn>>,
}

impl<E> std::fmt::Debug for PermissionGate<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionGate")
            .field("table_prefix", &self.table_prefix)
            .field("custom_subject_key", &self.subject_key.is_some())
            .finish_non_exhaustive()
    }
}

impl<E: Enforcer> PermissionGate<E> {
    /// Gate whose subject keys are `table_prefix` followed by the token's `sub`
    pub fn new(enforcer: E, table_prefix: impl Into<String>) -> Self {
        Self {
            enforcer,
            table_prefix: table_prefix.into(),
            subject_key: None,
        }
    }

    /// Derive the subject key from the claims instead
    ///
    /// Returning `None` marks the token as unusable for authorization.
    pub fn with_subject_key<F>(mut self, subject_key: F) -> Self
    where
        F: Fn(&Claims) -> Option<String> + Send + Sync + 'static,
    {
        self.subject_key = Some(Arc::new(subject_key));
        self
    }

    pub fn enforcer(&self) -> &E {
        &self.enforcer
    }

    /// Key the enforcer sees for these claims
    pub fn subject_key(&self, claims: &Claims) -> Option<String> {
        match &self.subject_key {
            Some(derive) => derive(claims),
            None => Some(format!("{}{}", self.table_prefix, claims.subject)),
        }
    }

    /// Allow the request only for a `Valid` token whose subject is permitted
    pub fn check(&self, state: &TokenState, resource: &str, action: &str) -> Result<()> {
        let TokenState::Valid(claims) = state else {
            return Err(Error::Unauthenticated(state.name().to_string()));
        };

        let subject = self
            .subject_key(claims)
            .ok_or_else(|| Error::Unauthenticated("no subject key for token".to_string()))?;

        match self.enforcer.enforce(&subject, resource, action) {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::debug!(subject = %subject, resource, action, "permission denied");
                Err(Error::Forbidden {
                    subject,
                    resource: resource.to_string(),
                    action: action.to_string(),
                })
            }
            Err(e) => {
                tracing::warn!(subject = %subject, resource, action, error = %e, "permission backend failed");
                Err(match e {
                    Error::PermissionBackend(_) => e,
                    other => Error::PermissionBackend(other.to_string()),
                })
            }
        }
    }
}

/// In-memory allow-list enforcer
///
/// Each rule is `(subject, resource, action)`. A rule field of `*` matches
/// anything, and a field ending in `*` matches by prefix (`/users/*`).
#[derive(Debug, Clone, Default)]
pub struct StaticPolicy {
    rules: Vec<(String, String, String)>,
}

impl StaticPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(
        mut self,
        subject: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        self.rules
            .push((subject.into(), resource.into(), action.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Enforcer for StaticPolicy {
    fn enforce(&self, subject: &str, resource: &str, action: &str) -> Result<bool> {
        Ok(self.rules.iter().any(|(s, r, a)| {
            pattern_matches(s, subject) && pattern_matches(r, resource) && pattern_matches(a, action)
        }))
    }
}

fn pattern_matches(pattern: &str, value: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => value.starts_with(prefix),
        None => pattern == value,
    }
}
