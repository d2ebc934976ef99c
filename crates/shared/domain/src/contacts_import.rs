//! CSV import settings.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Character encodings accepted for imported files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportEncoding {
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "iso-8859-15")]
    Iso8859_15,
    #[serde(rename = "cp1252")]
    Cp1252,
}

impl ImportEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            ImportEncoding::Utf8 => "utf-8",
            ImportEncoding::Iso8859_15 => "iso-8859-15",
            ImportEncoding::Cp1252 => "cp1252",
        }
    }
}

impl FromStr for ImportEncoding {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(ImportEncoding::Utf8),
            "iso-8859-15" => Ok(ImportEncoding::Iso8859_15),
            "cp1252" | "windows-1252" => Ok(ImportEncoding::Cp1252),
            other => Err(DomainError::validation(format!("Unknown encoding {}", other))),
        }
    }
}

/// An uploaded contacts file and how to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactsImport {
    pub id: Uuid,
    pub name: String,
    pub encoding: ImportEncoding,
    pub separator: String,
    /// Type given to created entities
    pub entity_type_id: Option<Uuid>,
    /// Groups every imported contact joins
    pub group_ids: Vec<Uuid>,
    pub entity_name_from_email: bool,
    pub imported_by: Option<Uuid>,
    pub created: DateTime<Utc>,
}

impl ContactsImport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            encoding: ImportEncoding::Utf8,
            separator: ",".to_string(),
            entity_type_id: None,
            group_ids: Vec::new(),
            entity_name_from_email: true,
            imported_by: None,
            created: Utc::now(),
        }
    }

    /// The separator as a single byte, for the CSV reader.
    pub fn separator_byte(&self) -> Result<u8, DomainError> {
        let invalid = || DomainError::validation(format!("Invalid separator {}", self.separator));
        let mut chars = self.separator.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Ok(c as u8),
            _ => Err(invalid()),
        }
    }
}

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<name>.+)@(?P<cpn>.+)\.(?P<ext>.+)").expect("valid email pattern")
});

/// Local part, domain name and extension of an email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailParts {
    pub name: String,
    pub cpn: String,
    pub ext: String,
}

/// Split an email, `None` when it does not look like `name@company.ext`.
pub fn split_email(email: &str) -> Option<EmailParts> {
    let captures = EMAIL_PATTERN.captures(email)?;
    Some(EmailParts {
        name: captures["name"].to_string(),
        cpn: captures["cpn"].to_string(),
        ext: captures["ext"].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_must_be_one_char() {
        let mut import = ContactsImport::new("test");
        import.separator = ";".to_string();
        assert_eq!(import.separator_byte(), Ok(b';'));
        import.separator = ";;".to_string();
        assert_eq!(
            import.separator_byte(),
            Err(DomainError::Validation("Invalid separator ;;".to_string()))
        );
        import.separator = String::new();
        assert!(import.separator_byte().is_err());
    }

    #[test]
    fn test_split_email() {
        let parts = split_email("john.doe@mail.sanza.fr").unwrap();
        assert_eq!(parts.name, "john.doe");
        assert_eq!(parts.cpn, "mail.sanza");
        assert_eq!(parts.ext, "fr");
        assert!(split_email("john").is_none());
        assert!(split_email("john@localhost").is_none());
    }

    #[test]
    fn test_encoding_labels() {
        assert_eq!("cp1252".parse::<ImportEncoding>(), Ok(ImportEncoding::Cp1252));
        assert_eq!(ImportEncoding::Iso8859_15.label(), "iso-8859-15");
        assert!("latin9".parse::<ImportEncoding>().is_err());
    }
}
