//! Size statistics for files, folders and whole runs.

use std::fmt;
use std::path::PathBuf;
use crate::optimizer::backend::Dimensions;

/// `1536` -> `"1.5 KB"`. Units stop at MB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 { return "0 B".to_string(); }
    const UNITS: [&str; 3] = ["B", "KB", "MB"];
    let mut value = bytes as f64;
    let mut exp = 0;
    while value >= 1024.0 && exp < UNITS.len() - 1 {
        value /= 1024.0;
        exp += 1;
    }
    let rendered = format!("{:.2}", value);
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", rendered, UNITS[exp])
}

/// Percentage saved, rounded half up. Negative when the output grew.
pub fn reduction_percent(original: u64, optimized: u64) -> i64 {
    if original == 0 { return 0; }
    let ratio = (original as f64 - optimized as f64) / original as f64 * 100.0;
    (ratio + 0.5).floor() as i64
}

fn change_text(percent: i64) -> String {
    if percent > 0 { format!("{}% smaller", percent) } else { format!("{}% larger", percent.abs()) }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub dimensions: Dimensions,
    pub original_bytes: u64,
    pub optimized_bytes: u64,
}

impl FileReport {
    pub fn reduction(&self) -> i64 { reduction_percent(self.original_bytes, self.optimized_bytes) }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |p: &PathBuf| p.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        write!(
            f, "{} -> {} | {} | {} -> {} ({})",
            name(&self.source), name(&self.output), self.dimensions,
            format_bytes(self.original_bytes), format_bytes(self.optimized_bytes), change_text(self.reduction()),
        )
    }
}

/// Outcome of one folder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageBatchResult {
    pub folder: String,
    pub count: usize,
    pub failed: usize,
    pub original_bytes: u64,
    pub optimized_bytes: u64,
    pub files: Vec<FileReport>,
}

impl ImageBatchResult {
    pub fn empty(folder: impl Into<String>) -> Self { Self { folder: folder.into(), ..Default::default() } }

    pub fn record(&mut self, file: FileReport) {
        self.count += 1;
        self.original_bytes += file.original_bytes;
        self.optimized_bytes += file.optimized_bytes;
        self.files.push(file);
    }

    pub fn reduction(&self) -> i64 { reduction_percent(self.original_bytes, self.optimized_bytes) }
}

impl fmt::Display for ImageBatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary for {}:", self.folder)?;
        writeln!(f, "  {} images optimized", self.count)?;
        if self.failed > 0 { writeln!(f, "  {} images failed", self.failed)?; }
        writeln!(f, "  {} -> {}", format_bytes(self.original_bytes), format_bytes(self.optimized_bytes))?;
        write!(f, "  Reduction: {}%", self.reduction())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub folders: Vec<ImageBatchResult>,
}

impl RunSummary {
    pub fn total_count(&self) -> usize { self.folders.iter().map(|f| f.count).sum() }
    pub fn total_failed(&self) -> usize { self.folders.iter().map(|f| f.failed).sum() }
    pub fn original_bytes(&self) -> u64 { self.folders.iter().map(|f| f.original_bytes).sum() }
    pub fn optimized_bytes(&self) -> u64 { self.folders.iter().map(|f| f.optimized_bytes).sum() }
    pub fn reduction(&self) -> i64 { reduction_percent(self.original_bytes(), self.optimized_bytes()) }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(70);
        writeln!(f, "{}", rule)?;
        writeln!(f, "Optimization finished")?;
        writeln!(f, "Images optimized: {}", self.total_count())?;
        if self.total_failed() > 0 {
            writeln!(f, "Images failed: {}", self.total_failed())?;
        }
        if self.total_count() > 0 {
            writeln!(f, "Size: {} -> {}", format_bytes(self.original_bytes()), format_bytes(self.optimized_bytes()))?;
            writeln!(f, "Total reduction: {}%", self.reduction())?;
            writeln!(f)?;
            writeln!(f, "Next steps:")?;
            writeln!(f, "1. Point the catalog image paths at the new files")?;
            writeln!(f, "2. Check that every image still renders correctly")?;
            writeln!(f, "3. Remove the old originals once the new ones are live")?;
        } else {
            writeln!(f)?;
            writeln!(f, "No image was optimized. Check that:")?;
            writeln!(f, "- the asset folders exist")?;
            writeln!(f, "- they contain supported image files")?;
            writeln!(f, "- the process can write to them")?;
        }
        write!(f, "{}", rule)
    }
}
