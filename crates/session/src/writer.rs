//! Append-only writer for per-frame scoring results.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use medfocus_common::error::{MedfocusError, MedfocusResult};
use medfocus_landmark_model::frame::FrameStreamHeader;
use medfocus_scoring::FrameResult;

/// Flush after this many results.
const FLUSH_EVERY: u64 = 300;

/// Writes [`FrameResult`]s to a JSONL file behind a `# ` header line.
pub struct ResultWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    results_written: u64,
}

impl ResultWriter {
    pub fn new(path: impl AsRef<Path>, header: &FrameStreamHeader) -> MedfocusResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);

        let header_json = serde_json::to_string(header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| MedfocusError::session(format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer,
            path,
            results_written: 0,
        })
    }

    pub fn write_result(&mut self, result: &FrameResult) -> MedfocusResult<()> {
        let json = serde_json::to_string(result)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| MedfocusError::session(format!("Failed to write result: {e}")))?;
        self.results_written += 1;

        if self.results_written % FLUSH_EVERY == 0 {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> MedfocusResult<()> {
        self.writer
            .flush()
            .map_err(|e| MedfocusError::session(format!("Failed to flush results: {e}")))
    }

    pub fn results_written(&self) -> u64 {
        self.results_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ResultWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
