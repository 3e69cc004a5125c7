//! Offline recompression of the menu's product photos.
//!
//! Walks a fixed list of asset folders, shrinks every supported image into a bounding
//! box, re-encodes it and reports per-folder and total size savings. A bad file is
//! logged and skipped; only a missing asset root aborts the run.

pub mod backend;
pub mod batch;
pub mod error;
pub mod formats;
pub mod report;

pub use backend::{fit_within, Dimensions, ImageBackend, ImageCrateBackend, TranscodeParams, Transcoded};
pub use batch::{BatchOptimizer, BatchPhase};
pub use error::{OptimizeError, OptimizeResult};
pub use formats::{output_path, OutputFormat, SUPPORTED_EXTENSIONS};
pub use report::{format_bytes, reduction_percent, FileReport, ImageBatchResult, RunSummary};
