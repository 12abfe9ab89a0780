//! Shared test harness for storage backend testing
//!
//! Provides fixture companies and helpers used by the macro-generated suites:
//!
//! - [`store_tests!`](crate::store_tests): accessor contract for any type
//!   implementing `CompanyService + InvoiceService`
//! - [`rest_api_tests!`](crate::rest_api_tests): HTTP round trips through
//!   the full router
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//!
//! store_tests!(InMemoryStore::new());
//! ```

#![allow(dead_code)]


use biztime::core::model::Company;
use chrono::{DateTime, Duration, Utc};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn apple() -> Company {
    Company::new("apple", "Apple Computer", "Maker of OSX.")
}

pub fn ibm() -> Company {
    Company::new("ibm", "IBM", "Big blue.")
}

/// Whether `stamp` falls inside `[before, after]`, widened by one second to
/// absorb store-side timestamp rounding
pub fn within(stamp: DateTime<Utc>, before: DateTime<Utc>, after: DateTime<Utc>) -> bool {
    let slack = Duration::seconds(1);
    stamp >= before - slack && stamp <= after + slack
}
