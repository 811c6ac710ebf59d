//! Training image models and upload rules

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::validation::FieldError;

/// Image extensions accepted for training uploads
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Default per-file size limit (10 MB)
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Ground-truth label attached to a training image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrainingLabel {
    Asli,
    Palsu,
}

impl TrainingLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingLabel::Asli => "ASLI",
            TrainingLabel::Palsu => "PALSU",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        match raw.trim().to_uppercase().as_str() {
            "ASLI" => Ok(TrainingLabel::Asli),
            "PALSU" => Ok(TrainingLabel::Palsu),
            "" => Err(FieldError::required("label")),
            _ => Err(FieldError::new("label", "Label must be ASLI or PALSU")),
        }
    }
}

impl fmt::Display for TrainingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single uploaded file was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRejection {
    Empty,
    UnsupportedExtension,
    TooLarge,
}

impl fmt::Display for FileRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRejection::Empty => f.write_str("empty file"),
            FileRejection::UnsupportedExtension => f.write_str("unsupported extension"),
            FileRejection::TooLarge => f.write_str("file too large"),
        }
    }
}

/// Check one file; returns its lowercase extension when acceptable.
pub fn check_image(filename: &str, size: usize, max_bytes: usize) -> Result<String, FileRejection> {
    if size == 0 {
        return Err(FileRejection::Empty);
    }

    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| ALLOWED_IMAGE_EXTENSIONS.contains(&e.as_str()))
        .ok_or(FileRejection::UnsupportedExtension)?;

    if size > max_bytes {
        return Err(FileRejection::TooLarge);
    }

    Ok(ext)
}

/// Reduce a part code to characters safe inside a filename.
pub fn filename_safe(code: &str) -> String {
    code.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// `{CODE}_{LABEL}_{YYYYmmdd_HHMMSS}_{suffix}.{ext}`
pub fn training_filename(
    part_code: &str,
    label: TrainingLabel,
    at: NaiveDateTime,
    suffix: &str,
    ext: &str,
) -> String {
    format!(
        "{}_{}_{}_{}.{}",
        filename_safe(part_code),
        label,
        at.format("%Y%m%d_%H%M%S"),
        suffix,
        ext
    )
}

/// Label distribution across stored training images
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingStats {
    pub total: i64,
    pub asli: i64,
    pub palsu: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_label_parse() {
        assert_eq!(TrainingLabel::parse(" palsu ").unwrap(), TrainingLabel::Palsu);
        assert_eq!(TrainingLabel::parse("").unwrap_err().field, "label");
        assert!(TrainingLabel::parse("FAKE").is_err());
    }

    #[test]
    fn test_check_image_extensions() {
        assert_eq!(check_image("label.JPG", 100, 1000).unwrap(), "jpg");
        assert_eq!(check_image("a.b.png", 100, 1000).unwrap(), "png");
        assert_eq!(
            check_image("scan.webp", 100, 1000),
            Err(FileRejection::UnsupportedExtension)
        );
        assert_eq!(check_image("noext", 100, 1000), Err(FileRejection::UnsupportedExtension));
    }

    #[test]
    fn test_check_image_size() {
        assert_eq!(check_image("a.gif", 0, 1000), Err(FileRejection::Empty));
        assert_eq!(check_image("a.gif", 1001, 1000), Err(FileRejection::TooLarge));
        assert!(check_image("a.gif", DEFAULT_MAX_IMAGE_BYTES, DEFAULT_MAX_IMAGE_BYTES).is_ok());
    }

    #[test]
    fn test_filename_safe() {
        assert_eq!(filename_safe("06455-KVB-901"), "06455-KVB-901");
        assert_eq!(filename_safe("../ETC/PASSWD"), "---ETC-PASSWD");
    }

    #[test]
    fn test_training_filename() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap();
        let name = training_filename("06455-KVB 901", TrainingLabel::Asli, at, "a1b2c3", "png");
        assert_eq!(name, "06455-KVB-901_ASLI_20240309_140507_a1b2c3.png");
    }
}
