//! Dataset builder: assembles the master training table.
//!
//! Two sources feed the table:
//! - Source A: a raw-audio directory whose class-named subdirectories contain
//!   WAV files; each decodable file is extracted and labeled with its
//!   directory's class.
//! - Source B: a pre-existing feature CSV, possibly unlabeled (every row then
//!   gets a single default label).
//!
//! A missing required source halts the build with no output file; a partially
//! built table would silently corrupt model quality downstream.

use std::path::{Path, PathBuf};

use log::{info, warn};
use walkdir::WalkDir;

use crate::config::PipelineConfig;
use crate::dataset::table::{LabeledSample, RawTable, TrainingTable};
use crate::error::{Result, ScreenError};
use crate::features::MfccExtractor;
use crate::label::ClassLabel;
use crate::pipeline;

/// Assembles labeled feature vectors into one consistent training table.
pub struct DatasetBuilder {
    /// Source A: root of the class-named raw-audio directories (optional)
    audio_dir: Option<PathBuf>,
    /// Source B: pre-existing feature table (required)
    features_csv: PathBuf,
    /// Label assigned to Source B rows when the table has no label column
    default_label: ClassLabel,
}

impl DatasetBuilder {
    pub fn new(audio_dir: Option<PathBuf>, features_csv: PathBuf) -> Self {
        Self {
            audio_dir,
            features_csv,
            // The original feature table is TB cough recordings
            default_label: ClassLabel::Tb,
        }
    }

    /// Build the master table and write it to `output`.
    ///
    /// # Errors
    /// `MissingSource` if a configured source is absent; nothing is written
    /// in that case.
    pub fn build(&self, config: &PipelineConfig, output: &Path) -> Result<TrainingTable> {
        // Validate all sources up front so a missing one produces no output
        if let Some(dir) = &self.audio_dir {
            if !dir.is_dir() {
                return Err(ScreenError::MissingSource {
                    path: dir.display().to_string(),
                });
            }
        }
        if !self.features_csv.exists() {
            return Err(ScreenError::MissingSource {
                path: self.features_csv.display().to_string(),
            });
        }

        let mut table = TrainingTable::default();

        if let Some(dir) = &self.audio_dir {
            let extracted = extract_audio_dir(dir, config)?;
            info!("extracted {} samples from {}", extracted.len(), dir.display());
            table.extend(extracted);
        }

        let raw = RawTable::read_csv(&self.features_csv)?;
        let existing = TrainingTable::from_raw(&raw, Some(self.default_label))?;
        info!(
            "loaded {} samples from {}",
            existing.len(),
            self.features_csv.display()
        );
        table.extend(existing);

        table.write_csv(output)?;
        info!(
            "master dataset written: {} samples, {:?}",
            table.len(),
            table.label_counts()
        );

        Ok(table)
    }
}

/// Extract and label every WAV file under the class-named subdirectories.
///
/// Per-file extraction failures are logged and skipped; the batch keeps
/// going. Unrecognized directory names are skipped with a warning.
fn extract_audio_dir(root: &Path, config: &PipelineConfig) -> Result<TrainingTable> {
    let extractor = MfccExtractor::new(config.sample_rate);
    let mut table = TrainingTable::default();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| ScreenError::Io(e.into()))?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let dir_name = entry.file_name().to_string_lossy().to_string();
        let label = match class_for_dir(&dir_name) {
            Some(label) => label,
            None => {
                warn!("skipping unrecognized class directory '{}'", dir_name);
                continue;
            }
        };

        for file in WalkDir::new(entry.path()).min_depth(1) {
            let file = file.map_err(|e| ScreenError::Io(e.into()))?;
            let path = file.path();
            if !file.file_type().is_file()
                || path.extension().map_or(true, |ext| ext != "wav")
            {
                continue;
            }

            match pipeline::extract_with(&extractor, path, config) {
                Ok(features) => table.push(LabeledSample { features, label }),
                Err(e) => warn!("skipping {}: {}", path.display(), e),
            }
        }
    }

    Ok(table)
}

/// Map a directory name to its class.
///
/// Canonical label names are accepted case-insensitively, along with the
/// spellings used by the exhibition recordings.
fn class_for_dir(name: &str) -> Option<ClassLabel> {
    if let Ok(label) = name.parse::<ClassLabel>() {
        return Some(label);
    }
    match name.to_lowercase().as_str() {
        "healthy" => Some(ClassLabel::Normal),
        "tuberculosis" => Some(ClassLabel::Tb),
        _ => None,
    }
}

/// Relabel a feature table via its `filename` column.
///
/// Rows get labels inferred from filename substrings; rows that land on
/// `OTHER` are dropped. The rewritten table keeps all original columns plus
/// the new `label` column.
pub fn relabel(input: &Path, output: &Path) -> Result<RawTable> {
    let mut raw = RawTable::read_csv(input)?;

    let filename_idx = raw
        .column_index("filename")
        .ok_or_else(|| ScreenError::MalformedTable {
            reason: format!("{}: no 'filename' column to relabel from", input.display()),
        })?;

    let label_idx = match raw.column_index("label") {
        Some(idx) => idx,
        None => {
            raw.columns.push("label".to_string());
            for row in &mut raw.rows {
                row.push(String::new());
            }
            raw.columns.len() - 1
        }
    };

    let before = raw.len();
    for row in &mut raw.rows {
        let label = ClassLabel::infer_from_filename(&row[filename_idx]);
        row[label_idx] = label.as_str().to_string();
    }
    raw.rows
        .retain(|row| row[label_idx] != ClassLabel::Other.as_str());

    info!(
        "relabeled {}: kept {} of {} rows",
        input.display(),
        raw.len(),
        before
    );

    raw.write_csv(output)?;
    Ok(raw)
}

// ============================================================================
// Tests
// ============================================================================
