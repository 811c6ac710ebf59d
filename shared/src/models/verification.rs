//! Authenticity verification models

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::{non_blank, normalize_part_code, FieldError};

/// Part code recorded when a check arrives without one
pub const UNKNOWN_PART_CODE: &str = "UNKNOWN";

/// Outcome of an authenticity check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    #[serde(rename = "ASLI")]
    Asli,
    #[serde(rename = "TIDAK VALID")]
    TidakValid,
    #[serde(rename = "TIDAK DITEMUKAN")]
    TidakDitemukan,
}

impl VerificationStatus {
    pub const ALL: [VerificationStatus; 3] = [
        VerificationStatus::Asli,
        VerificationStatus::TidakValid,
        VerificationStatus::TidakDitemukan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Asli => "ASLI",
            VerificationStatus::TidakValid => "TIDAK VALID",
            VerificationStatus::TidakDitemukan => "TIDAK DITEMUKAN",
        }
    }

    /// Strict parse (trimmed, case-insensitive)
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_uppercase();
        Self::ALL.into_iter().find(|s| s.as_str() == wanted)
    }

    /// Lenient parse used by the log writer: anything unknown is "not found".
    pub fn normalize(raw: Option<&str>) -> Self {
        raw.and_then(Self::parse)
            .unwrap_or(VerificationStatus::TidakDitemukan)
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a code for the verification log, falling back to the sentinel.
pub fn normalize_logged_code(raw: Option<&str>) -> String {
    let code = raw.map(normalize_part_code).unwrap_or_default();
    if code.is_empty() {
        UNKNOWN_PART_CODE.to_string()
    } else {
        code
    }
}

/// `POST /verification/check` payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerificationCheckInput {
    #[serde(default)]
    pub kode_part: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl VerificationCheckInput {
    pub fn part_code(&self) -> Result<String, FieldError> {
        self.kode_part
            .as_deref()
            .map(normalize_part_code)
            .filter(|code| !code.is_empty())
            .ok_or_else(|| FieldError::required("kode_part"))
    }
}

/// `POST /verification/log` payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManualLogInput {
    #[serde(default)]
    pub kode_part: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sparepart_id: Option<i64>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ManualLogInput {
    /// Manual entries are strict: both code and status must be valid.
    pub fn validated(&self) -> Result<(String, VerificationStatus), FieldError> {
        let code = self
            .kode_part
            .as_deref()
            .map(normalize_part_code)
            .unwrap_or_default();
        let status = self.status.as_deref().and_then(VerificationStatus::parse);

        match (code.is_empty(), status) {
            (false, Some(status)) => Ok((code, status)),
            _ => Err(FieldError::new(
                "kode_part",
                "Part code and log status must be valid",
            )),
        }
    }
}

/// Requester metadata resolved for a log entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requester {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl Requester {
    /// Payload values win over values observed on the request.
    pub fn resolve(
        payload_ip: Option<String>,
        payload_agent: Option<String>,
        observed: &Requester,
    ) -> Self {
        Self {
            ip_address: non_blank(payload_ip).or_else(|| observed.ip_address.clone()),
            user_agent: non_blank(payload_agent).or_else(|| observed.user_agent.clone()),
        }
    }
}

/// A verification log entry ready to append
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVerificationLog {
    pub part_code: String,
    pub status: VerificationStatus,
    pub sparepart_id: Option<i64>,
    pub requester: Requester,
}

impl NewVerificationLog {
    /// Build an entry from loosely-typed values; blank codes become the
    /// sentinel and unknown statuses become "not found".
    pub fn normalized(
        raw_code: Option<&str>,
        raw_status: Option<&str>,
        sparepart_id: Option<i64>,
        requester: Requester,
    ) -> Self {
        Self {
            part_code: normalize_logged_code(raw_code),
            status: VerificationStatus::normalize(raw_status),
            sparepart_id: sparepart_id.filter(|id| *id > 0),
            requester,
        }
    }
}
