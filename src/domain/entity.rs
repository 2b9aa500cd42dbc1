//! Entity, span, and result data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Closed set of detectable PII/PHI entity types for Canadian clinical text.
///
/// Covers general identifiers plus one health-number type per province and
/// territory. Serialized labels match the pattern-library section names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// Patient names (never provider names)
    PatientName,
    /// Telephone numbers
    Phone,
    /// Email addresses
    Email,
    /// Street addresses
    Address,
    /// Canadian postal codes (A1A 1A1)
    PostalCode,
    /// Dates of birth
    Dob,
    /// Province and territory names
    Province,
    /// Medical record numbers
    MedicalRecordNumber,
    /// Credit card numbers
    CreditCard,
    /// Bank account numbers
    BankAccount,
    /// Financial institution names
    BankName,
    /// Transaction identifiers
    TransactionId,
    /// Ontario health card number (OHIP)
    OnHcn,
    /// British Columbia personal health number
    BcPhn,
    /// Quebec RAMQ number
    QcRamq,
    /// Alberta personal health number
    AbPhn,
    /// Saskatchewan health services number
    SkHsn,
    /// Manitoba personal health identification number
    MbPhin,
    /// Nova Scotia health card number
    NsHcn,
    /// New Brunswick Medicare number
    NbMedicare,
    /// Newfoundland and Labrador MCP number
    NlMcp,
    /// Prince Edward Island health number
    PeHealth,
    /// Northwest Territories health services number
    NtHsn,
    /// Nunavut health number
    NuHealth,
    /// Yukon health care insurance plan number
    YtYhcip,
}

impl EntityType {
    /// All entity types, in declaration order.
    pub const ALL: [EntityType; 25] = [
        Self::PatientName,
        Self::Phone,
        Self::Email,
        Self::Address,
        Self::PostalCode,
        Self::Dob,
        Self::Province,
        Self::MedicalRecordNumber,
        Self::CreditCard,
        Self::BankAccount,
        Self::BankName,
        Self::TransactionId,
        Self::OnHcn,
        Self::BcPhn,
        Self::QcRamq,
        Self::AbPhn,
        Self::SkHsn,
        Self::MbPhin,
        Self::NsHcn,
        Self::NbMedicare,
        Self::NlMcp,
        Self::PeHealth,
        Self::NtHsn,
        Self::NuHealth,
        Self::YtYhcip,
    ];

    /// Provincial health-number types with their two-letter province codes.
    pub const PROVINCIAL: [(EntityType, &'static str); 13] = [
        (Self::OnHcn, "ON"),
        (Self::BcPhn, "BC"),
        (Self::QcRamq, "QC"),
        (Self::AbPhn, "AB"),
        (Self::SkHsn, "SK"),
        (Self::MbPhin, "MB"),
        (Self::NsHcn, "NS"),
        (Self::NbMedicare, "NB"),
        (Self::NlMcp, "NL"),
        (Self::PeHealth, "PE"),
        (Self::NtHsn, "NT"),
        (Self::NuHealth, "NU"),
        (Self::YtYhcip, "YT"),
    ];

    /// Stable label used in the pattern library and placeholders.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PatientName => "PATIENT_NAME",
            Self::Phone => "PHONE",
            Self::Email => "EMAIL",
            Self::Address => "ADDRESS",
            Self::PostalCode => "POSTAL_CODE",
            Self::Dob => "DOB",
            Self::Province => "PROVINCE",
            Self::MedicalRecordNumber => "MEDICAL_RECORD_NUMBER",
            Self::CreditCard => "CREDIT_CARD",
            Self::BankAccount => "BANK_ACCOUNT",
            Self::BankName => "BANK_NAME",
            Self::TransactionId => "TRANSACTION_ID",
            Self::OnHcn => "ON_HCN",
            Self::BcPhn => "BC_PHN",
            Self::QcRamq => "QC_RAMQ",
            Self::AbPhn => "AB_PHN",
            Self::SkHsn => "SK_HSN",
            Self::MbPhin => "MB_PHIN",
            Self::NsHcn => "NS_HCN",
            Self::NbMedicare => "NB_MEDICARE",
            Self::NlMcp => "NL_MCP",
            Self::PeHealth => "PE_HEALTH",
            Self::NtHsn => "NT_HSN",
            Self::NuHealth => "NU_HEALTH",
            Self::YtYhcip => "YT_YHCIP",
        }
    }

    /// Placeholder substituted for this type during anonymization.
    pub fn placeholder(&self) -> String {
        format!("<{}>", self.label())
    }

    /// Parse a pattern-library label back to an entity type.
    pub fn from_label(label: &str) -> Option<EntityType> {
        Self::ALL.iter().copied().find(|e| e.label() == label)
    }

    /// Province code for provincial health-number types, `None` otherwise.
    pub fn province_code(&self) -> Option<&'static str> {
        Self::PROVINCIAL
            .iter()
            .find(|(e, _)| e == self)
            .map(|(_, code)| *code)
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A detected entity occurrence.
///
/// `start` and `end` are a half-open range of **character** (Unicode scalar
/// value) positions in the original text, `0 <= start < end <= len`, where
/// `len` counts characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    /// Entity type of the detection
    pub entity_type: EntityType,
    /// Start character position (inclusive)
    pub start: usize,
    /// End character position (exclusive)
    pub end: usize,
    /// Confidence score (0.0 - 1.0), monotone within a rule
    pub score: f32,
    /// Name of the rule or recognizer that produced this span
    pub rule_name: String,
}

impl Span {
    /// Create a new span, clamping the score to `[0, 1]`.
    pub fn new(
        entity_type: EntityType,
        start: usize,
        end: usize,
        score: f32,
        rule_name: impl Into<String>,
    ) -> Self {
        Self {
            entity_type,
            start,
            end,
            score: score.clamp(0.0, 1.0),
            rule_name: rule_name.into(),
        }
    }

    /// Character length of the span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the span covers no characters.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True when this span intersects `other` on at least one character.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Processing metadata attached to a redaction result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionMetadata {
    /// Number of accepted spans
    pub count: usize,
    /// Distinct entity types present, in first-occurrence order
    pub types: Vec<EntityType>,
    /// Name of the NLP backend that served the request
    pub engine_name: String,
    /// Timestamp of redaction
    pub timestamp: DateTime<Utc>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Result object returned by the redaction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionResult {
    /// Unredacted input text
    pub original: String,
    /// Text with detected entities replaced by placeholders
    pub redacted: String,
    /// Accepted spans, non-overlapping, ascending by start
    pub spans: Vec<Span>,
    /// Additional processing information
    pub metadata: RedactionMetadata,
}

impl RedactionResult {
    /// Assemble a result, deriving metadata from the span set.
    pub fn new(
        original: String,
        redacted: String,
        spans: Vec<Span>,
        engine_name: impl Into<String>,
        processing_time_ms: u64,
    ) -> Self {
        let mut seen = HashMap::new();
        let mut types = Vec::new();
        for span in &spans {
            if seen.insert(span.entity_type, ()).is_none() {
                types.push(span.entity_type);
            }
        }

        let metadata = RedactionMetadata {
            count: spans.len(),
            types,
            engine_name: engine_name.into(),
            timestamp: Utc::now(),
            processing_time_ms,
        };

        Self {
            original,
            redacted,
            spans,
            metadata,
        }
    }

    /// True when at least one entity was detected.
    pub fn has_detections(&self) -> bool {
        !self.spans.is_empty()
    }
}
