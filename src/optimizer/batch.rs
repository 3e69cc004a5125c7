//! Folder-by-folder optimizer run: scan, transcode each file, report, summarize.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, error, info, warn};
use crate::config::OptimizerSettings;
use crate::optimizer::backend::{ImageBackend, ImageCrateBackend, TranscodeParams};
use crate::optimizer::formats::{self, is_optimized_artifact, is_supported};
use crate::optimizer::report::{FileReport, ImageBatchResult, RunSummary};
use crate::optimizer::{OptimizeError, OptimizeResult};

const FOLDER_PAUSE: Duration = Duration::from_millis(100);

/// Where a run currently is. Folders go through scanning, processing and reporting in turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase { Idle, Scanning, Processing, Reporting, Summarizing, Done }

/// Recompresses every image under the configured asset folders, one file at a time.
pub struct BatchOptimizer {
    settings: OptimizerSettings,
    backend: Arc<dyn ImageBackend>,
    pause: Duration,
}

impl BatchOptimizer {
    pub fn new(settings: OptimizerSettings) -> Self { Self::with_backend(settings, Arc::new(ImageCrateBackend)) }

    pub fn with_backend(settings: OptimizerSettings, backend: Arc<dyn ImageBackend>) -> Self {
        Self { settings, backend, pause: FOLDER_PAUSE }
    }

    /// Overrides the delay between folders.
    pub fn with_pause(mut self, pause: Duration) -> Self { self.pause = pause; self }

    pub fn settings(&self) -> &OptimizerSettings { &self.settings }

    fn params(&self) -> TranscodeParams {
        TranscodeParams {
            format: self.settings.output_format,
            quality: self.settings.quality,
            max_width: self.settings.max_width,
            max_height: self.settings.max_height,
        }
    }

    fn folder_path(&self, folder: &str) -> PathBuf { self.settings.assets_dir.join(folder) }

    /// Runs every folder in order. Only a missing asset root fails the run.
    pub async fn run(&self) -> OptimizeResult<RunSummary> {
        debug!(phase = ?BatchPhase::Idle, folders = self.settings.folders.len(), "Run requested");
        let root = &self.settings.assets_dir;
        if !fs::metadata(root).await.map(|m| m.is_dir()).unwrap_or(false) {
            error!("Asset directory not found: {}", root.display());
            return Err(OptimizeError::MissingRoot(root.clone()));
        }

        info!("🚀 Starting image optimization in {}", root.display());
        info!(
            "Supported inputs: {} -> {}",
            formats::SUPPORTED_EXTENSIONS.join(", ").to_uppercase(), self.settings.output_format
        );

        let mut summary = RunSummary::default();
        for (index, folder) in self.settings.folders.iter().enumerate() {
            if index > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
            summary.folders.push(self.optimize_folder(folder).await);
        }

        debug!(phase = ?BatchPhase::Summarizing, "Aggregating folder results");
        info!(
            optimized = summary.total_count(),
            failed = summary.total_failed(),
            reduction = summary.reduction(),
            "Optimization finished"
        );
        debug!(phase = ?BatchPhase::Done, "Run complete");
        Ok(summary)
    }

    /// Scans and processes one folder. Never fails: problems are logged and counted.
    pub async fn optimize_folder(&self, folder: &str) -> ImageBatchResult {
        let path = self.folder_path(folder);
        let mut result = ImageBatchResult::empty(folder);

        debug!(phase = ?BatchPhase::Scanning, folder, "Scanning folder");
        let files = match self.scan_folder(&path).await {
            Ok(files) => files,
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                return result;
            }
        };
        if files.is_empty() {
            warn!("No images found in {}", path.display());
            return result;
        }

        info!(
            "📁 Optimizing {} images in {} (quality {}%, max {}x{}, {})",
            files.len(), folder, self.settings.quality, self.settings.max_width, self.settings.max_height, self.settings.output_format
        );

        debug!(phase = ?BatchPhase::Processing, folder, files = files.len(), "Processing folder");
        for file in &files {
            match self.process_file(file).await {
                Ok(report) => {
                    info!("  ✅ {}", report);
                    result.record(report);
                }
                Err(e) => {
                    error!("  ❌ Failed to optimize {}: {}", file.display(), e);
                    result.failed += 1;
                }
            }
        }

        debug!(phase = ?BatchPhase::Reporting, folder, "Folder done");
        if result.count > 0 {
            info!("{}", result);
        }
        result
    }

    /// Supported image files in `dir`, sorted by name. A missing folder yields nothing.
    pub async fn scan_folder(&self, dir: &Path) -> OptimizeResult<Vec<PathBuf>> {
        if fs::metadata(dir).await.is_err() {
            warn!("⚠️ Folder not found: {}", dir.display());
            return Ok(Vec::new());
        }
        let mut entries = fs::read_dir(dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) || !is_supported(&path) {
                continue;
            }
            if self.settings.preserve_original && is_optimized_artifact(&path) {
                continue;
            }
            files.push(path);
        }
        files.sort();
        Ok(files)
    }

    /// Reads, transcodes and writes a single file. The source is fully read before the
    /// output is written, so an output that lands on the source path is safe.
    pub async fn process_file(&self, input: &Path) -> OptimizeResult<FileReport> {
        let original_bytes = fs::metadata(input).await?.len();
        let bytes = fs::read(input).await?;

        let backend = Arc::clone(&self.backend);
        let params = self.params();
        let transcoded = tokio::task::spawn_blocking(move || backend.transcode(&bytes, &params))
            .await
            .map_err(|e| OptimizeError::processing(format!("Transcode task failed: {}", e)))??;

        let output = formats::output_path(input, self.settings.output_format, self.settings.preserve_original);
        fs::write(&output, &transcoded.bytes).await?;
        let optimized_bytes = fs::metadata(&output).await?.len();

        Ok(FileReport { source: input.to_path_buf(), output, dimensions: transcoded.source, original_bytes, optimized_bytes })
    }

    /// Deletes `_optimized` outputs left by earlier runs. Returns how many were removed.
    pub async fn clean_previous(&self) -> usize {
        info!("🧹 Removing previous optimization outputs");
        let mut removed_total = 0;
        for folder in &self.settings.folders {
            let path = self.folder_path(folder);
            let Ok(mut entries) = fs::read_dir(&path).await else { continue };
            let mut removed = 0;
            while let Ok(Some(entry)) = entries.next_entry().await {
                let file = entry.path();
                if !is_optimized_artifact(&file) { continue; }
                match fs::remove_file(&file).await {
                    Ok(()) => removed += 1,
                    Err(e) => warn!("Could not remove {}: {}", file.display(), e),
                }
            }
            if removed > 0 {
                info!("  🗑️ Removed {} files in {}", removed, folder);
            }
            removed_total += removed;
        }
        removed_total
    }
}
