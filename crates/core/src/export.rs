//! Writing prepared partitions and the run manifest.
//!
//! Partitions go through a [`DatasetSink`]; the bundled [`JsonlSink`] writes
//! one JSON record per line. Every file is written atomically so a crashed
//! run never leaves a half-written partition behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::PrepConfig;
use crate::corpus::pipeline::{CorpusStats, PreparedCorpus};
use crate::types::{Partition, TrainingRecord};

/// Compute SHA-256 hash of a file's contents.
///
/// Returns a 64-character hex string.
pub fn file_hash(path: &Path) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file for hashing: {}", path.display()))?;
    std::io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Atomically write data to a file via temp file + rename.
fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let tmp_path = target.with_extension("tmp");
    std::fs::write(&tmp_path, data)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, target)
        .with_context(|| format!("Failed to move into place: {}", target.display()))?;
    Ok(())
}

/// Destination for prepared records.
pub trait DatasetSink {
    /// Sink name for logging.
    fn name(&self) -> &str;

    /// Persist one partition. Returns where it was written.
    fn write_partition(
        &mut self,
        partition: Partition,
        records: &[TrainingRecord],
    ) -> Result<PathBuf>;
}

/// Writes `<dir>/<partition>.jsonl`.
pub struct JsonlSink {
    pub dir: PathBuf,
}

impl JsonlSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn partition_path(&self, partition: Partition) -> PathBuf {
        self.dir.join(format!("{}.jsonl", partition.name()))
    }
}

impl DatasetSink for JsonlSink {
    fn name(&self) -> &str {
        "jsonl"
    }

    fn write_partition(
        &mut self,
        partition: Partition,
        records: &[TrainingRecord],
    ) -> Result<PathBuf> {
        let mut buf = Vec::new();
        for record in records {
            serde_json::to_writer(&mut buf, record)?;
            buf.push(b'\n');
        }
        let path = self.partition_path(partition);
        atomic_write(&path, &buf)?;
        log::info!(
            "Wrote {} {} records to {}",
            records.len(),
            partition.name(),
            path.display()
        );
        Ok(path)
    }
}

/// Provenance of a preparation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    pub input_file: PathBuf,
    pub input_sha256: String,
    pub config: PrepConfig,
    pub stats: CorpusStats,
    pub sink: String,
}

impl Manifest {
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        atomic_write(path, json.as_bytes())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        serde_json::from_str(&data).context("Failed to parse manifest")
    }
}

/// Write both partitions through `sink` and a `manifest.json` into `out_dir`.
pub fn export(
    corpus: &PreparedCorpus,
    sink: &mut dyn DatasetSink,
    input_file: &Path,
    config: &PrepConfig,
    out_dir: &Path,
) -> Result<Manifest> {
    sink.write_partition(Partition::Train, &corpus.train)?;
    sink.write_partition(Partition::Dev, &corpus.dev)?;

    let manifest = Manifest {
        input_file: input_file.to_path_buf(),
        input_sha256: file_hash(input_file)?,
        config: config.clone(),
        stats: corpus.stats.clone(),
        sink: sink.name().to_string(),
    };
    manifest.write(&out_dir.join("manifest.json"))?;
    Ok(manifest)
}
