//! Outbound adapters implementing domain ports.
//!
//! Only process-local adapters ship today; see [`memory`]. Database and
//! email-backed adapters would sit alongside it behind the same traits.

pub mod memory;
