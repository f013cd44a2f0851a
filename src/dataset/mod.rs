//! Training dataset assembly.
//!
//! Merges labeled feature vectors from heterogeneous sources (a class-named
//! raw-audio directory tree and a pre-existing feature CSV) into one
//! consistent training table.

pub mod builder;
pub mod table;

pub use builder::DatasetBuilder;
pub use table::{LabeledSample, RawTable, TrainingTable};
