//! Artifact and trace persistence.
//!
//! All files of one invocation are staged as hidden temp files first and
//! renamed into place only once every one of them was written.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::artifact::ArtifactType;
use crate::errors::{PipelineError, PipelineResult};

/// File receiving the raw generator texts of one invocation.
pub const TRACE_FILE: &str = "raw_output.txt";

/// Paths produced by [`ArtifactWriter::commit`], artifacts in input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenFiles {
    pub artifacts: Vec<PathBuf>,
    pub trace: PathBuf,
}

/// Writes artifacts into one output directory; last write wins.
#[derive(Clone, Debug)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the given artifact is written to.
    pub fn path_for(&self, artifact: ArtifactType) -> PathBuf {
        self.dir.join(artifact.file_name())
    }

    pub fn trace_path(&self) -> PathBuf {
        self.dir.join(TRACE_FILE)
    }

    /// Overwrites every artifact file and the trace (raw texts joined by a blank line).
    ///
    /// A staging failure leaves all previous files untouched. Only a failing
    /// rename, after every temp file was written, can leave a mix of old and
    /// new files.
    ///
    /// # Errors
    /// [`PipelineError::Write`] naming the file that could not be written.
    pub fn commit(
        &self,
        artifacts: &[(ArtifactType, String)],
        raw_outputs: &[String],
    ) -> PipelineResult<WrittenFiles> {
        fs::create_dir_all(&self.dir).map_err(|source| PipelineError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let trace_text = raw_outputs.join("\n\n");
        let mut targets: Vec<(PathBuf, &str)> = artifacts
            .iter()
            .map(|(artifact, text)| (self.path_for(*artifact), text.as_str()))
            .collect();
        targets.push((self.trace_path(), trace_text.as_str()));

        let mut staged: Vec<PathBuf> = Vec::with_capacity(targets.len());
        for (path, text) in &targets {
            let tmp = staging_path(path);
            if let Err(source) = fs::write(&tmp, text) {
                discard(&staged);
                return Err(PipelineError::Write { path: tmp, source });
            }
            staged.push(tmp);
        }

        for (idx, (tmp, (path, text))) in staged.iter().zip(&targets).enumerate() {
            if let Err(source) = fs::rename(tmp, path) {
                discard(&staged[idx..]);
                return Err(PipelineError::Write {
                    path: path.clone(),
                    source,
                });
            }
            info!(path = %path.display(), bytes = text.len(), "artifact written");
        }

        let mut paths: Vec<PathBuf> = targets.into_iter().map(|(path, _)| path).collect();
        let trace = paths.pop().unwrap_or_else(|| self.trace_path());
        Ok(WrittenFiles {
            artifacts: paths,
            trace,
        })
    }
}

/// `<dir>/.<name>.tmp` next to the target, so the rename stays on one filesystem.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

fn discard(staged: &[PathBuf]) {
    for tmp in staged {
        if let Err(err) = fs::remove_file(tmp) {
            warn!(path = %tmp.display(), "cannot remove staged file: {err}");
        }
    }
}
