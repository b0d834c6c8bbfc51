//! Entity models and the data-store interface for the curio platform.
//!
//! The relational engine itself is an external collaborator: this crate
//! defines the typed CRUD surface ([`store::Store`]) the rest of the
//! workspace consumes, plus an in-memory reference backend
//! ([`store::MemoryStore`]) used by tests and local tooling. Multi-row
//! mutations that must be visible atomically are modelled as single store
//! calls, never as sequences the caller has to keep consistent.

pub mod models;
pub mod store;
