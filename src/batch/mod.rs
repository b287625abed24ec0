//! Batch file processing framework.

pub mod processor;

pub use processor::{
    BatchError, BatchProcessor, BatchReport, BatchStats, FileError, FileJob, FileOutcome,
    FileReport,
};
