//! Payment state transitions for invoices

use chrono::{DateTime, Utc};

/// Compute the `paid_date` an invoice should carry after an update.
///
/// - unpaid → paid: stamped with `now`
/// - paid → unpaid: cleared
/// - no transition: the previous `paid_date` is kept
///
/// Keeps `paid_date.is_some() == paid` as long as the prior state held it.
pub fn resolve_paid_date(
    was_paid: bool,
    was_paid_date: Option<DateTime<Utc>>,
    now_paid: bool,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (was_paid, now_paid) {
        (false, true) => Some(now),
        (true, false) => None,
        _ => was_paid_date,
    }
}
