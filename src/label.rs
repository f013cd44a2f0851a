//! Diagnostic class labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScreenError};

/// Closed set of diagnostic classes.
///
/// `Asthma` and `Other` appear during dataset assembly; a trained model is
/// restricted to whatever classes were present in its training table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassLabel {
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "TB")]
    Tb,
    #[serde(rename = "ASTHMA")]
    Asthma,
    #[serde(rename = "OTHER")]
    Other,
}

impl ClassLabel {
    /// Canonical uppercase name as it appears in the training table
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassLabel::Normal => "NORMAL",
            ClassLabel::Tb => "TB",
            ClassLabel::Asthma => "ASTHMA",
            ClassLabel::Other => "OTHER",
        }
    }

    /// All labels in canonical order
    pub fn all() -> [ClassLabel; 4] {
        [
            ClassLabel::Normal,
            ClassLabel::Tb,
            ClassLabel::Asthma,
            ClassLabel::Other,
        ]
    }

    /// Infer a label from a source filename.
    ///
    /// Used when relabeling a table that carries a `filename` column instead
    /// of explicit labels. Matching is case-insensitive on substrings.
    pub fn infer_from_filename(name: &str) -> ClassLabel {
        let name = name.to_lowercase();
        if name.contains("tb") || name.contains("heavy") {
            return ClassLabel::Tb;
        }
        if name.contains("asthma") || name.contains("wheeze") || name.contains("shallow") {
            return ClassLabel::Asthma;
        }
        if name.contains("healthy") || name.contains("normal") || name.contains("v1") {
            return ClassLabel::Normal;
        }
        ClassLabel::Other
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassLabel {
    type Err = ScreenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "NORMAL" => Ok(ClassLabel::Normal),
            "TB" => Ok(ClassLabel::Tb),
            "ASTHMA" => Ok(ClassLabel::Asthma),
            "OTHER" => Ok(ClassLabel::Other),
            other => Err(ScreenError::MalformedTable {
                reason: format!("unknown label '{}'", other),
            }),
        }
    }
}
