//! hms-audit - schema-validated audit and clinical-record store for a
//! hospital management platform.
//!
//! Seven entity families (medical records, prescriptions, audit trails,
//! system logs, notifications, patient documents, performance metrics)
//! live in one namespace of an existing document-oriented store. This
//! crate is the layer in between: it enforces required fields, field
//! types, and closed enumerations at write time, derives the secondary
//! indexes each family's query patterns need, and keeps the append-only
//! trails immutable by construction.

pub mod collection;
pub mod index;
pub mod schema;
pub mod store;
