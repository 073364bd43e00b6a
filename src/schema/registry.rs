//! Entity family registry.
//!
//! The registry is the single declarative table behind the whole layer:
//! per family it holds the document schema, the mutability class, the
//! monotone flag transitions, and the declared query patterns the index
//! planner derives indexes from. Adding a family means adding one entry
//! here; the validator and planner are generic over the table.
//!
//! The registry is built once and read-only afterwards. It is passed
//! explicitly to the components that need it, never held as ambient global
//! state, so tests can construct registries with reduced family sets.

use std::collections::BTreeMap;

use crate::index::{Direction, QueryPattern};

use super::enums::{
    DeliveryChannel, DocumentType, LogLevel, NotificationPriority, NotificationType,
};
use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldDef, FieldType, Schema};

/// Collection name of the medical record family.
pub const MEDICAL_RECORDS: &str = "medical_records";
/// Collection name of the prescription family.
pub const PRESCRIPTIONS: &str = "prescriptions";
/// Collection name of the audit trail family.
pub const AUDIT_LOGS: &str = "audit_logs";
/// Collection name of the application log family.
pub const SYSTEM_LOGS: &str = "system_logs";
/// Collection name of the notification family.
pub const NOTIFICATIONS: &str = "notifications";
/// Collection name of the patient document family.
pub const PATIENT_DOCUMENTS: &str = "patient_documents";
/// Collection name of the performance metric family.
pub const PERFORMANCE_METRICS: &str = "performance_metrics";

/// Write discipline of an entity family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    /// Documents may be updated after acceptance. Physical deletion is
    /// never offered; retention is a regulatory requirement.
    Mutable,
    /// Documents are written once and never touched again. The write
    /// itself is the record's identity.
    AppendOnly,
}

/// A one-directional boolean transition: once the flag is set it can never
/// be unset, and the companion field records when the transition happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonotoneFlag {
    /// The boolean field, e.g. `isSent`.
    pub flag: &'static str,
    /// The timestamp field stamped exactly once at the transition,
    /// e.g. `sentAt`.
    pub stamp: &'static str,
}

/// Everything the layer knows about one entity family.
#[derive(Debug, Clone)]
pub struct FamilySpec {
    name: String,
    mutability: Mutability,
    schema: Schema,
    patterns: Vec<QueryPattern>,
    transitions: Vec<MonotoneFlag>,
}

impl FamilySpec {
    /// Starts a family declaration.
    pub fn new(name: impl Into<String>, mutability: Mutability) -> Self {
        Self {
            name: name.into(),
            mutability,
            schema: Schema::new(),
            patterns: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Declares a field.
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.schema = self.schema.with_field(name, def);
        self
    }

    /// Declares an anticipated query pattern.
    pub fn pattern(mut self, pattern: QueryPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Declares a monotone flag transition.
    pub fn transition(mut self, flag: &'static str, stamp: &'static str) -> Self {
        self.transitions.push(MonotoneFlag { flag, stamp });
        self
    }

    /// The collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The write discipline.
    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    /// True for families whose documents can never be rewritten.
    pub fn is_append_only(&self) -> bool {
        self.mutability == Mutability::AppendOnly
    }

    /// The document schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The declared query patterns.
    pub fn patterns(&self) -> &[QueryPattern] {
        &self.patterns
    }

    /// The monotone flag transitions.
    pub fn transitions(&self) -> &[MonotoneFlag] {
        &self.transitions
    }
}

/// Read-only map from family name to [`FamilySpec`].
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    families: BTreeMap<String, FamilySpec>,
}

impl SchemaRegistry {
    /// Builds a registry from an explicit family list.
    pub fn new(families: impl IntoIterator<Item = FamilySpec>) -> Self {
        Self {
            families: families
                .into_iter()
                .map(|spec| (spec.name.clone(), spec))
                .collect(),
        }
    }

    /// The seven families of the hospital audit store.
    pub fn hospital() -> Self {
        Self::new([
            medical_records(),
            prescriptions(),
            audit_logs(),
            system_logs(),
            notifications(),
            patient_documents(),
            performance_metrics(),
        ])
    }

    /// Looks up a family.
    pub fn family(&self, name: &str) -> SchemaResult<&FamilySpec> {
        self.families
            .get(name)
            .ok_or_else(|| SchemaError::UnknownEntityFamily(name.to_string()))
    }

    /// Looks up a family's schema.
    pub fn schema_for(&self, name: &str) -> SchemaResult<&Schema> {
        self.family(name).map(FamilySpec::schema)
    }

    /// All registered families in name order.
    pub fn families(&self) -> impl Iterator<Item = &FamilySpec> {
        self.families.values()
    }

    /// Number of registered families.
    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// True when no family is registered.
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

fn medical_records() -> FamilySpec {
    FamilySpec::new(MEDICAL_RECORDS, Mutability::Mutable)
        .field("patientId", FieldDef::required(FieldType::Long))
        .field("doctorId", FieldDef::required(FieldType::Long))
        .field("appointmentId", FieldDef::optional(FieldType::Long))
        .field("diagnosis", FieldDef::optional(FieldType::String))
        .field("symptoms", FieldDef::optional(FieldType::Array))
        .field("treatmentPlan", FieldDef::optional(FieldType::String))
        .field("prescription", FieldDef::optional(FieldType::Object))
        .field("labResults", FieldDef::optional(FieldType::Array))
        .field("images", FieldDef::optional(FieldType::Array))
        .field("recordDate", FieldDef::required(FieldType::Date))
        .field("createdAt", FieldDef::optional(FieldType::Date))
        .field("updatedAt", FieldDef::optional(FieldType::Date))
        .pattern(QueryPattern::point("patientId"))
        .pattern(QueryPattern::point("doctorId"))
        .pattern(QueryPattern::point("appointmentId"))
        .pattern(QueryPattern::scan("recordDate", Direction::Descending))
        .pattern(QueryPattern::point("patientId").then_scan("recordDate", Direction::Descending))
}

fn prescriptions() -> FamilySpec {
    FamilySpec::new(PRESCRIPTIONS, Mutability::Mutable)
        .field("patientId", FieldDef::required(FieldType::Long))
        .field("doctorId", FieldDef::required(FieldType::Long))
        .field("appointmentId", FieldDef::optional(FieldType::Long))
        .field("prescriptionDate", FieldDef::required(FieldType::Date))
        .field("medications", FieldDef::optional(FieldType::Array))
        .field("dosage", FieldDef::optional(FieldType::Object))
        .field("frequency", FieldDef::optional(FieldType::String))
        .field("duration", FieldDef::optional(FieldType::String))
        .field("instructions", FieldDef::optional(FieldType::String))
        .field("sideEffects", FieldDef::optional(FieldType::Array))
        .field("isActive", FieldDef::optional(FieldType::Bool))
        .field("createdAt", FieldDef::optional(FieldType::Date))
        .field("updatedAt", FieldDef::optional(FieldType::Date))
        .pattern(QueryPattern::point("patientId"))
        .pattern(QueryPattern::point("doctorId"))
        .pattern(QueryPattern::scan("prescriptionDate", Direction::Descending))
        .pattern(QueryPattern::point("isActive"))
}

fn audit_logs() -> FamilySpec {
    FamilySpec::new(AUDIT_LOGS, Mutability::AppendOnly)
        .field("userId", FieldDef::optional(FieldType::Long))
        .field("action", FieldDef::required(FieldType::String))
        .field("entityType", FieldDef::required(FieldType::String))
        .field("entityId", FieldDef::optional(FieldType::Long))
        .field("oldValues", FieldDef::optional(FieldType::Object))
        .field("newValues", FieldDef::optional(FieldType::Object))
        .field("ipAddress", FieldDef::optional(FieldType::String))
        .field("userAgent", FieldDef::optional(FieldType::String))
        .field("sessionId", FieldDef::optional(FieldType::String))
        .field("timestamp", FieldDef::required(FieldType::Date))
        .field("metadata", FieldDef::optional(FieldType::Object))
        .field("createdAt", FieldDef::optional(FieldType::Date))
        .pattern(QueryPattern::point("userId"))
        .pattern(QueryPattern::point("action"))
        .pattern(QueryPattern::lookup(&["entityType", "entityId"]))
        .pattern(QueryPattern::scan("timestamp", Direction::Descending))
        .pattern(QueryPattern::point("userId").then_scan("timestamp", Direction::Descending))
}

fn system_logs() -> FamilySpec {
    FamilySpec::new(SYSTEM_LOGS, Mutability::AppendOnly)
        .field("level", FieldDef::required_enum(LogLevel::NAMES))
        .field("message", FieldDef::required(FieldType::String))
        .field("service", FieldDef::optional(FieldType::String))
        .field("className", FieldDef::optional(FieldType::String))
        .field("methodName", FieldDef::optional(FieldType::String))
        .field("lineNumber", FieldDef::optional(FieldType::Int))
        .field("stackTrace", FieldDef::optional(FieldType::String))
        .field("userId", FieldDef::optional(FieldType::Long))
        .field("requestId", FieldDef::optional(FieldType::String))
        .field("timestamp", FieldDef::required(FieldType::Date))
        .field("metadata", FieldDef::optional(FieldType::Object))
        .field("createdAt", FieldDef::optional(FieldType::Date))
        .pattern(QueryPattern::point("level"))
        .pattern(QueryPattern::point("service"))
        .pattern(QueryPattern::scan("timestamp", Direction::Descending))
        .pattern(QueryPattern::point("userId"))
        .pattern(QueryPattern::point("level").then_scan("timestamp", Direction::Descending))
}

fn notifications() -> FamilySpec {
    FamilySpec::new(NOTIFICATIONS, Mutability::Mutable)
        .field("userId", FieldDef::required(FieldType::Long))
        .field("type", FieldDef::required_enum(NotificationType::NAMES))
        .field("title", FieldDef::required(FieldType::String))
        .field("message", FieldDef::required(FieldType::String))
        .field("priority", FieldDef::optional_enum(NotificationPriority::NAMES))
        .field("isRead", FieldDef::optional(FieldType::Bool))
        .field("isSent", FieldDef::optional(FieldType::Bool))
        .field("sentVia", FieldDef::optional_enum(DeliveryChannel::NAMES))
        .field("scheduledAt", FieldDef::optional(FieldType::Date))
        .field("sentAt", FieldDef::optional(FieldType::Date))
        .field("readAt", FieldDef::optional(FieldType::Date))
        .field("metadata", FieldDef::optional(FieldType::Object))
        .field("createdAt", FieldDef::optional(FieldType::Date))
        .field("updatedAt", FieldDef::optional(FieldType::Date))
        .transition("isSent", "sentAt")
        .transition("isRead", "readAt")
        .pattern(QueryPattern::point("userId"))
        .pattern(QueryPattern::point("type"))
        .pattern(QueryPattern::point("isRead"))
        .pattern(QueryPattern::point("isSent"))
        .pattern(QueryPattern::lookup(&["userId", "isRead"]))
        .pattern(QueryPattern::scan("scheduledAt", Direction::Ascending))
}

fn patient_documents() -> FamilySpec {
    FamilySpec::new(PATIENT_DOCUMENTS, Mutability::Mutable)
        .field("patientId", FieldDef::required(FieldType::Long))
        .field("documentType", FieldDef::required_enum(DocumentType::NAMES))
        .field("fileName", FieldDef::required(FieldType::String))
        .field("originalFileName", FieldDef::optional(FieldType::String))
        .field("fileSize", FieldDef::optional(FieldType::Long))
        .field("mimeType", FieldDef::optional(FieldType::String))
        .field("filePath", FieldDef::optional(FieldType::String))
        .field("uploadedBy", FieldDef::optional(FieldType::Long))
        .field("description", FieldDef::optional(FieldType::String))
        .field("tags", FieldDef::optional(FieldType::Array))
        .field("isActive", FieldDef::optional(FieldType::Bool))
        .field("uploadedAt", FieldDef::optional(FieldType::Date))
        .field("createdAt", FieldDef::optional(FieldType::Date))
        .field("updatedAt", FieldDef::optional(FieldType::Date))
        .pattern(QueryPattern::point("patientId"))
        .pattern(QueryPattern::point("documentType"))
        .pattern(QueryPattern::point("uploadedBy"))
        .pattern(QueryPattern::point("isActive"))
        .pattern(QueryPattern::lookup(&["patientId", "documentType"]))
}

fn performance_metrics() -> FamilySpec {
    FamilySpec::new(PERFORMANCE_METRICS, Mutability::AppendOnly)
        .field("service", FieldDef::required(FieldType::String))
        .field("metric", FieldDef::required(FieldType::String))
        .field("value", FieldDef::required(FieldType::Float))
        .field("unit", FieldDef::optional(FieldType::String))
        .field("tags", FieldDef::optional(FieldType::Object))
        .field("timestamp", FieldDef::required(FieldType::Date))
        .field("createdAt", FieldDef::optional(FieldType::Date))
        .pattern(QueryPattern::point("service"))
        .pattern(QueryPattern::point("metric"))
        .pattern(QueryPattern::scan("timestamp", Direction::Descending))
        .pattern(
            QueryPattern::lookup(&["service", "metric"])
                .then_scan("timestamp", Direction::Descending),
        )
}
