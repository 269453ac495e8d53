//! Backend library modules.
//!
//! The [`domain`] holds the todo and magic-link rules and services,
//! [`inbound`] turns submitted page forms into service calls and
//! [`outbound`] provides adapters for the domain ports.

pub mod domain;
pub mod inbound;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
