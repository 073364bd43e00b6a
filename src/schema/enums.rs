//! Closed value sets for enumerated document fields.
//!
//! Each enum here is the single source of its allowed string set: the
//! registry's schema table references the `NAMES` constant, and the
//! validator checks boundary input against it. Inside the process the
//! variants are ordinary Rust enums, so an out-of-set value is
//! unrepresentable once past the boundary.

use std::fmt;

/// System log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Allowed wire values, in declaration order.
    pub const NAMES: &'static [&'static str] = &["ERROR", "WARN", "INFO", "DEBUG", "TRACE"];

    /// Returns the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Parses a wire value; `None` for anything outside the set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ERROR" => Some(LogLevel::Error),
            "WARN" => Some(LogLevel::Warn),
            "INFO" => Some(LogLevel::Info),
            "DEBUG" => Some(LogLevel::Debug),
            "TRACE" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Notification category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Appointment,
    Bill,
    Reminder,
    System,
    Emergency,
}

impl NotificationType {
    /// Allowed wire values, in declaration order.
    pub const NAMES: &'static [&'static str] =
        &["APPOINTMENT", "BILL", "REMINDER", "SYSTEM", "EMERGENCY"];

    /// Returns the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Appointment => "APPOINTMENT",
            NotificationType::Bill => "BILL",
            NotificationType::Reminder => "REMINDER",
            NotificationType::System => "SYSTEM",
            NotificationType::Emergency => "EMERGENCY",
        }
    }

    /// Parses a wire value; `None` for anything outside the set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "APPOINTMENT" => Some(NotificationType::Appointment),
            "BILL" => Some(NotificationType::Bill),
            "REMINDER" => Some(NotificationType::Reminder),
            "SYSTEM" => Some(NotificationType::System),
            "EMERGENCY" => Some(NotificationType::Emergency),
            _ => None,
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Notification urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NotificationPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl NotificationPriority {
    /// Allowed wire values, in declaration order.
    pub const NAMES: &'static [&'static str] = &["LOW", "MEDIUM", "HIGH", "URGENT"];

    /// Returns the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationPriority::Low => "LOW",
            NotificationPriority::Medium => "MEDIUM",
            NotificationPriority::High => "HIGH",
            NotificationPriority::Urgent => "URGENT",
        }
    }

    /// Parses a wire value; `None` for anything outside the set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LOW" => Some(NotificationPriority::Low),
            "MEDIUM" => Some(NotificationPriority::Medium),
            "HIGH" => Some(NotificationPriority::High),
            "URGENT" => Some(NotificationPriority::Urgent),
            _ => None,
        }
    }
}

impl fmt::Display for NotificationPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Channel a notification was delivered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChannel {
    Email,
    Sms,
    Push,
    InApp,
}

impl DeliveryChannel {
    /// Allowed wire values, in declaration order.
    pub const NAMES: &'static [&'static str] = &["EMAIL", "SMS", "PUSH", "IN_APP"];

    /// Returns the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryChannel::Email => "EMAIL",
            DeliveryChannel::Sms => "SMS",
            DeliveryChannel::Push => "PUSH",
            DeliveryChannel::InApp => "IN_APP",
        }
    }

    /// Parses a wire value; `None` for anything outside the set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "EMAIL" => Some(DeliveryChannel::Email),
            "SMS" => Some(DeliveryChannel::Sms),
            "PUSH" => Some(DeliveryChannel::Push),
            "IN_APP" => Some(DeliveryChannel::InApp),
            _ => None,
        }
    }
}

impl fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of file attached to a patient record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    LabReport,
    Xray,
    Mri,
    Prescription,
    MedicalCertificate,
    Insurance,
    Other,
}

impl DocumentType {
    /// Allowed wire values, in declaration order.
    pub const NAMES: &'static [&'static str] = &[
        "LAB_REPORT",
        "XRAY",
        "MRI",
        "PRESCRIPTION",
        "MEDICAL_CERTIFICATE",
        "INSURANCE",
        "OTHER",
    ];

    /// Returns the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::LabReport => "LAB_REPORT",
            DocumentType::Xray => "XRAY",
            DocumentType::Mri => "MRI",
            DocumentType::Prescription => "PRESCRIPTION",
            DocumentType::MedicalCertificate => "MEDICAL_CERTIFICATE",
            DocumentType::Insurance => "INSURANCE",
            DocumentType::Other => "OTHER",
        }
    }

    /// Parses a wire value; `None` for anything outside the set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LAB_REPORT" => Some(DocumentType::LabReport),
            "XRAY" => Some(DocumentType::Xray),
            "MRI" => Some(DocumentType::Mri),
            "PRESCRIPTION" => Some(DocumentType::Prescription),
            "MEDICAL_CERTIFICATE" => Some(DocumentType::MedicalCertificate),
            "INSURANCE" => Some(DocumentType::Insurance),
            "OTHER" => Some(DocumentType::Other),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for name in LogLevel::NAMES {
            assert_eq!(LogLevel::parse(name).unwrap().as_str(), *name);
        }
        for name in NotificationType::NAMES {
            assert_eq!(NotificationType::parse(name).unwrap().as_str(), *name);
        }
        for name in NotificationPriority::NAMES {
            assert_eq!(NotificationPriority::parse(name).unwrap().as_str(), *name);
        }
        for name in DeliveryChannel::NAMES {
            assert_eq!(DeliveryChannel::parse(name).unwrap().as_str(), *name);
        }
        for name in DocumentType::NAMES {
            assert_eq!(DocumentType::parse(name).unwrap().as_str(), *name);
        }
    }

    #[test]
    fn test_out_of_set_values_rejected() {
        assert!(LogLevel::parse("FATAL").is_none());
        assert!(NotificationType::parse("appointment").is_none());
        assert!(DeliveryChannel::parse("FAX").is_none());
        assert!(DocumentType::parse("CT_SCAN").is_none());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(NotificationPriority::Low < NotificationPriority::Urgent);
        assert!(NotificationPriority::Medium < NotificationPriority::High);
    }
}
