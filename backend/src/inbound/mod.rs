//! Inbound adapters that translate submitted page forms into domain service
//! calls while keeping transport details at the edge.

pub mod forms;
