// crates/provider-testkit-core/src/core/time.rs
// ============================================================================
// Module: Time Model
// Description: Canonical timestamp for callback and trace records.
// Purpose: Stamp received callbacks with a stable, serializable time value.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Records keep unix-millisecond timestamps so traces serialize compactly and
//! compare across hosts. Only record construction reads the wall clock; the
//! engine's own scheduling uses monotonic instants.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp in unix epoch milliseconds.
///
/// # Invariants
/// - Values are non-decreasing only as far as the host clock is; consumers
///   must not assume monotonicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
        Self(i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX))
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }
}
