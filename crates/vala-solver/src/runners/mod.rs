//! Training and readout.

pub mod measure;
pub mod vqa;

pub use measure::{MeasurementReport, pmeasure, qmeasure};
pub use vqa::{InitStrategy, TrainingResult, TrainingStep, VqaRunner};
