use crate::claims::Claims;
use std::time::{SystemTime, UNIX_EPOCH};

/// Where `now` falls relative to a token's validity period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStatus {
    /// `now < nbf`
    NotYetValid,
    /// `nbf <= now < exp`
    Active,
    /// `exp <= now <= exp + refresh window`
    InRefreshWindow,
    /// `now > exp + refresh window`
    Lapsed,
}

/// Classify `now` against the claims' validity period and refresh window
///
/// The not-before check is strict, so a token is valid at exactly `nbf`. The
/// refresh window is inclusive at both ends: a token is expired (but
/// refreshable) at exactly `exp` and still refreshable at exactly
/// `exp + refresh_window_seconds`. The upper bound saturates at `i64::MAX`.
pub fn time_status(claims: &Claims, now: i64, refresh_window_seconds: u64) -> TimeStatus {
    if now < claims.not_before {
        return TimeStatus::NotYetValid;
    }

    if now < claims.expires_at {
        return TimeStatus::Active;
    }

    let window = i64::try_from(refresh_window_seconds).unwrap_or(i64::MAX);
    let refresh_deadline = claims.expires_at.saturating_add(window);
    if now <= refresh_deadline {
        TimeStatus::InRefreshWindow
    } else {
        TimeStatus::Lapsed
    }
}

/// Current Unix timestamp in seconds (0 if the clock is before the epoch)
pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
