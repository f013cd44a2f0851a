//! Training table types and CSV persistence.
//!
//! The on-disk encoding is a plain comma-delimited table: 45 feature columns
//! keyed "0".."44" plus one "label" column. Values never contain commas or
//! quotes, so no quoting rules apply.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::warn;

use crate::config::FEATURE_COUNT;
use crate::error::{Result, ScreenError};
use crate::features::FeatureVector;
use crate::label::ClassLabel;

/// One row of the training table: a feature vector plus its class.
///
/// Immutable once written to the table.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    pub features: FeatureVector,
    pub label: ClassLabel,
}

// ============================================================================
// RawTable: loosely-typed CSV, pre-reconciliation
// ============================================================================

/// A loosely-typed delimited table as read from disk.
///
/// Sources arrive with heterogeneous column sets (extra `filename` columns,
/// missing `label`, integer vs. string header keys). `RawTable` holds them
/// as strings until `TrainingTable::from_raw` reconciles the schema.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Read a CSV file into a raw table
    pub fn read_csv(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ScreenError::MissingSource {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        let mut lines = content.lines();

        let header = lines.next().ok_or_else(|| ScreenError::MalformedTable {
            reason: format!("{}: empty file", path.display()),
        })?;

        // Coerce all column names to trimmed string keys
        let columns: Vec<String> = header.split(',').map(|c| c.trim().to_string()).collect();

        let mut rows = Vec::new();
        for (line_no, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<String> = line.split(',').map(|f| f.trim().to_string()).collect();
            if fields.len() != columns.len() {
                return Err(ScreenError::MalformedTable {
                    reason: format!(
                        "{}: row {} has {} fields, header has {}",
                        path.display(),
                        line_no + 2,
                        fields.len(),
                        columns.len()
                    ),
                });
            }
            rows.push(fields);
        }

        Ok(RawTable { columns, rows })
    }

    /// Write the table back out as CSV, atomically (temp file + rename)
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut content = self.columns.join(",");
        content.push('\n');
        for row in &self.rows {
            content.push_str(&row.join(","));
            content.push('\n');
        }
        write_atomic(path, &content)
    }

    /// Index of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// TrainingTable: reconciled, validated samples
// ============================================================================

/// The uniform training table: every row holds exactly 45 finite features
/// plus a label from the closed set.
#[derive(Debug, Clone, Default)]
pub struct TrainingTable {
    pub samples: Vec<LabeledSample>,
}

impl TrainingTable {
    /// Reconcile a raw table into validated samples.
    ///
    /// Keeps only the 45 feature columns plus `label`, in fixed order. Rows
    /// with a missing feature column value, a non-finite feature, or an
    /// unparseable label are dropped (with a warning). If the raw table has
    /// no `label` column, every row is assigned `default_label`.
    ///
    /// # Errors
    /// `MalformedTable` if a feature column is absent entirely, or the table
    /// has neither a `label` column nor a default label.
    pub fn from_raw(raw: &RawTable, default_label: Option<ClassLabel>) -> Result<Self> {
        let mut feature_idx = Vec::with_capacity(FEATURE_COUNT);
        for i in 0..FEATURE_COUNT {
            let name = i.to_string();
            let idx = raw
                .column_index(&name)
                .ok_or_else(|| ScreenError::MalformedTable {
                    reason: format!("missing feature column '{}'", name),
                })?;
            feature_idx.push(idx);
        }

        let label_idx = raw.column_index("label");
        if label_idx.is_none() && default_label.is_none() {
            return Err(ScreenError::MalformedTable {
                reason: "no 'label' column and no default label".to_string(),
            });
        }

        let mut samples = Vec::with_capacity(raw.len());
        let mut dropped = 0usize;

        'rows: for row in &raw.rows {
            let mut values = Vec::with_capacity(FEATURE_COUNT);
            for &idx in &feature_idx {
                match row[idx].parse::<f32>() {
                    Ok(v) if v.is_finite() => values.push(v),
                    _ => {
                        dropped += 1;
                        continue 'rows;
                    }
                }
            }

            let label = match label_idx {
                Some(idx) => match row[idx].parse::<ClassLabel>() {
                    Ok(label) => label,
                    Err(_) => {
                        dropped += 1;
                        continue 'rows;
                    }
                },
                // Checked above: label_idx.is_none() implies a default exists
                None => default_label.unwrap(),
            };

            // Length and finiteness were just checked, so this cannot fail
            let features = FeatureVector::new(values)?;
            samples.push(LabeledSample { features, label });
        }

        if dropped > 0 {
            warn!("dropped {} rows with missing or invalid values", dropped);
        }

        Ok(TrainingTable { samples })
    }

    /// Read a previously-written training table.
    ///
    /// The header must be exactly `"0".."44" + "label"`; merged sources are
    /// reconciled at build time, not here.
    pub fn read_csv(path: &Path) -> Result<Self> {
        let raw = RawTable::read_csv(path)?;

        let expected = Self::header();
        if raw.columns != expected {
            return Err(ScreenError::MalformedTable {
                reason: format!("{}: unexpected header {:?}", path.display(), raw.columns),
            });
        }

        Self::from_raw(&raw, None)
    }

    /// Write the table as CSV, atomically
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut content = Self::header().join(",");
        content.push('\n');

        for sample in &self.samples {
            for value in sample.features.as_slice() {
                content.push_str(&format!("{},", value));
            }
            content.push_str(sample.label.as_str());
            content.push('\n');
        }

        write_atomic(path, &content)
    }

    /// The fixed column order: "0".."44" then "label"
    pub fn header() -> Vec<String> {
        let mut header: Vec<String> = (0..FEATURE_COUNT).map(|i| i.to_string()).collect();
        header.push("label".to_string());
        header
    }

    /// Append all samples from another table
    pub fn extend(&mut self, other: TrainingTable) {
        self.samples.extend(other.samples);
    }

    pub fn push(&mut self, sample: LabeledSample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Count samples per label, in canonical label order
    pub fn label_counts(&self) -> BTreeMap<ClassLabel, usize> {
        let mut counts = BTreeMap::new();
        for sample in &self.samples {
            *counts.entry(sample.label).or_insert(0) += 1;
        }
        counts
    }

    /// Distinct labels present, sorted
    pub fn distinct_labels(&self) -> Vec<ClassLabel> {
        self.label_counts().into_keys().collect()
    }
}

/// Write a file atomically: temp file in the same directory, then rename
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample(fill: f32, label: ClassLabel) -> LabeledSample {
        LabeledSample {
            features: FeatureVector::new(vec![fill; FEATURE_COUNT]).unwrap(),
            label,
        }
    }

    fn write_csv_text(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    fn csv_with_header(extra_col: Option<&str>, rows: &[String]) -> String {
        let mut header: Vec<String> = (0..FEATURE_COUNT).map(|i| i.to_string()).collect();
        if let Some(col) = extra_col {
            header.push(col.to_string());
        }
        let mut text = header.join(",");
        text.push('\n');
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    fn feature_row(fill: f32, suffix: Option<&str>) -> String {
        let mut fields: Vec<String> = (0..FEATURE_COUNT).map(|_| fill.to_string()).collect();
        if let Some(s) = suffix {
            fields.push(s.to_string());
        }
        fields.join(",")
    }

    #[test]
    fn test_table_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");

        let mut table = TrainingTable::default();
        table.push(sample(0.5, ClassLabel::Tb));
        table.push(sample(-1.25, ClassLabel::Normal));
        table.write_csv(&path).unwrap();

        let back = TrainingTable::read_csv(&path).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back.samples, table.samples);
    }

    #[test]
    fn test_read_missing_file() {
        let result = TrainingTable::read_csv(Path::new("/nonexistent/table.csv"));
        assert!(matches!(result, Err(ScreenError::MissingSource { .. })));
    }

    #[test]
    fn test_read_wrong_header() {
        let dir = tempdir().unwrap();
        let path = write_csv_text(dir.path(), "bad.csv", "a,b,c\n1,2,3\n");
        let result = TrainingTable::read_csv(&path);
        assert!(matches!(result, Err(ScreenError::MalformedTable { .. })));
    }

    #[test]
    fn test_from_raw_default_label() {
        let dir = tempdir().unwrap();
        let text = csv_with_header(None, &[feature_row(1.0, None), feature_row(2.0, None)]);
        let path = write_csv_text(dir.path(), "unlabeled.csv", &text);

        let raw = RawTable::read_csv(&path).unwrap();
        let table = TrainingTable::from_raw(&raw, Some(ClassLabel::Tb)).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.samples.iter().all(|s| s.label == ClassLabel::Tb));
    }

    #[test]
    fn test_from_raw_no_label_no_default() {
        let dir = tempdir().unwrap();
        let text = csv_with_header(None, &[feature_row(1.0, None)]);
        let path = write_csv_text(dir.path(), "unlabeled.csv", &text);

        let raw = RawTable::read_csv(&path).unwrap();
        let result = TrainingTable::from_raw(&raw, None);
        assert!(matches!(result, Err(ScreenError::MalformedTable { .. })));
    }

    #[test]
    fn test_from_raw_drops_bad_rows() {
        let dir = tempdir().unwrap();
        let good = feature_row(1.0, Some("TB"));
        let bad_value = {
            let mut fields: Vec<String> = (0..FEATURE_COUNT).map(|_| "1.0".to_string()).collect();
            fields[10] = "NaN".to_string();
            fields.push("TB".to_string());
            fields.join(",")
        };
        let missing = {
            let mut fields: Vec<String> = (0..FEATURE_COUNT).map(|_| "1.0".to_string()).collect();
            fields[3] = String::new();
            fields.push("NORMAL".to_string());
            fields.join(",")
        };
        let bad_label = feature_row(2.0, Some("COVID"));

        let text = csv_with_header(Some("label"), &[good, bad_value, missing, bad_label]);
        let path = write_csv_text(dir.path(), "dirty.csv", &text);

        let raw = RawTable::read_csv(&path).unwrap();
        let table = TrainingTable::from_raw(&raw, None).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.samples[0].label, ClassLabel::Tb);
    }

    #[test]
    fn test_from_raw_missing_feature_column() {
        let dir = tempdir().unwrap();
        // Only 44 feature columns
        let header: Vec<String> = (0..FEATURE_COUNT - 1).map(|i| i.to_string()).collect();
        let text = format!("{},label\n", header.join(","));
        let path = write_csv_text(dir.path(), "narrow.csv", &text);

        let raw = RawTable::read_csv(&path).unwrap();
        let result = TrainingTable::from_raw(&raw, None);
        assert!(matches!(result, Err(ScreenError::MalformedTable { .. })));
    }

    #[test]
    fn test_from_raw_ignores_extra_columns() {
        let dir = tempdir().unwrap();
        // filename column before the features, like the original train.csv
        let mut header = vec!["filename".to_string()];
        header.extend((0..FEATURE_COUNT).map(|i| i.to_string()));
        header.push("label".to_string());

        let mut row = vec!["cough_01.wav".to_string()];
        row.extend((0..FEATURE_COUNT).map(|_| "0.5".to_string()));
        row.push("NORMAL".to_string());

        let text = format!("{}\n{}\n", header.join(","), row.join(","));
        let path = write_csv_text(dir.path(), "wide.csv", &text);

        let raw = RawTable::read_csv(&path).unwrap();
        let table = TrainingTable::from_raw(&raw, None).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.samples[0].features.as_slice()[0], 0.5);
    }

    #[test]
    fn test_raw_table_ragged_row() {
        let dir = tempdir().unwrap();
        let path = write_csv_text(dir.path(), "ragged.csv", "a,b\n1,2\n1,2,3\n");
        let result = RawTable::read_csv(&path);
        assert!(matches!(result, Err(ScreenError::MalformedTable { .. })));
    }

    #[test]
    fn test_label_counts() {
        let mut table = TrainingTable::default();
        table.push(sample(0.0, ClassLabel::Tb));
        table.push(sample(0.0, ClassLabel::Tb));
        table.push(sample(0.0, ClassLabel::Normal));

        let counts = table.label_counts();
        assert_eq!(counts[&ClassLabel::Tb], 2);
        assert_eq!(counts[&ClassLabel::Normal], 1);
        assert_eq!(
            table.distinct_labels(),
            vec![ClassLabel::Normal, ClassLabel::Tb]
        );
    }

    #[test]
    fn test_atomic_write_leaves_no_tmp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut table = TrainingTable::default();
        table.push(sample(1.0, ClassLabel::Normal));
        table.write_csv(&path).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
