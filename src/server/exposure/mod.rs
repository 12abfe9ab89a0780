//! API exposure layer
//!
//! Only REST is exposed; the registry it consumes is transport-agnostic.

pub mod rest;

pub use rest::RestExposure;
