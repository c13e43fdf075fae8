use crate::graph::{ObjectId, SceneGraph};
use crate::reader::{BamReadResult, BamReader};
use crate::writer;
use anyhow::{Context, Result};
use bam_types::config;
use bam_types::version::BamVersion;
use std::fs;
use std::path::Path;
use tracing::info;


/// Reads and writes whole bam files.
pub struct BamFile;

impl BamFile {
    /// Writes `roots` of `graph` to `path` in one session. Nothing is written if the session fails.
    pub fn write(
        path: impl AsRef<Path>,
        graph: &SceneGraph,
        target_version: BamVersion,
        roots: &[ObjectId],
    ) -> Result<()> {
        let path = path.as_ref();
        let bytes = writer::write_session(graph, target_version, roots)?;
        fs::write(path, &bytes).with_context(|| format!("Writing {:?}", path))?;
        info!("Wrote {} bytes of bam {} to {:?}", bytes.len(), target_version, path);
        Ok(())
    }

    /// Writes at the version named by [`config::ENV_VAR_BAM_VERSION`], and returns that version.
    pub fn write_configured(
        path: impl AsRef<Path>,
        graph: &SceneGraph,
        roots: &[ObjectId],
    ) -> Result<BamVersion> {
        let target_version = config::target_version_from_env()?;
        Self::write(path, graph, target_version, roots)?;
        Ok(target_version)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<BamReadResult> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("Reading {:?}", path))?;
        let res = BamReader::read_session(&bytes).with_context(|| format!("Decoding {:?}", path))?;
        info!(
            "Read {} objects of bam {} from {:?}",
            res.graph.len(),
            res.version,
            path
        );
        Ok(res)
    }
}
