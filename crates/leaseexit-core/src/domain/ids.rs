//! Record ID generation
//!
//! IDs are prefixed strings (`wf_`, `form_`, `appr_`, `notif_`) followed by a
//! fractional unix timestamp, matching the shape already present in deployed
//! stores. A process-wide monotonic floor keeps them unique even when two
//! records are created within the same microsecond.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_MICROS: AtomicI64 = AtomicI64::new(0);

/// Generate a unique record ID with the given kind prefix
///
/// The suffix is `seconds.microseconds` since the unix epoch. Successive
/// calls always produce strictly increasing suffixes; IDs are never reused.
pub fn prefixed_id(prefix: &str) -> String {
    let now = Utc::now().timestamp_micros();
    let previous = LAST_MICROS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(if now > last { now } else { last + 1 })
        })
        .unwrap_or(now);
    let micros = if now > previous { now } else { previous + 1 };

    format!("{}{}.{:06}", prefix, micros / 1_000_000, micros % 1_000_000)
}
