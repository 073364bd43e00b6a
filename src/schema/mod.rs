//! Schema subsystem.
//!
//! One declarative table (the registry) drives everything: required
//! fields, field types, closed enumerations, mutability classes, monotone
//! flag transitions, and declared query patterns. The validator and the
//! index planner are generic over that table, so adding an entity family
//! never touches their logic.

mod enums;
mod errors;
mod registry;
mod types;
mod validator;

pub use enums::{
    DeliveryChannel, DocumentType, LogLevel, NotificationPriority, NotificationType,
};
pub use errors::{SchemaError, SchemaResult, Violation};
pub use registry::{
    FamilySpec, MonotoneFlag, Mutability, SchemaRegistry, AUDIT_LOGS, MEDICAL_RECORDS,
    NOTIFICATIONS, PATIENT_DOCUMENTS, PERFORMANCE_METRICS, PRESCRIPTIONS, SYSTEM_LOGS,
};
pub use types::{value_type_name, FieldDef, FieldType, Schema};
pub use validator::Validator;
