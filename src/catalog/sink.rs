// src/catalog/sink.rs
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;

use crate::error::{CatalogError, Result};

/// One output file of a run: its target path and full content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: String,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

pub trait ArtifactSink {
    /// Store all artifacts of one run, or none of them.
    fn store(&self, items: Vec<Artifact>) -> Result<()>;
}

/// Writes artifacts to disk.
///
/// Every artifact is first staged as a synced temp file beside its target.
/// Targets are only replaced once all of them staged cleanly, so a failed
/// write leaves the previous run's files untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSink;

impl FsSink {
    fn stage(item: &Artifact) -> Result<NamedTempFile> {
        let dir = match item.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| CatalogError::io(&dir, e))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| CatalogError::io(&dir, e))?;
        tmp.write_all(item.content.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| CatalogError::io(tmp.path(), e))?;
        Ok(tmp)
    }
}

impl ArtifactSink for FsSink {
    fn store(&self, items: Vec<Artifact>) -> Result<()> {
        let mut staged = Vec::with_capacity(items.len());
        for item in &items {
            staged.push((Self::stage(item)?, item.path.as_path()));
        }
        // dropping `staged` on an early return removes the temp files

        for (tmp, target) in staged {
            persist(tmp, target)?;
            tracing::debug!(target: "catalog", path = %target.display(), "artifact written");
        }
        Ok(())
    }
}

fn persist(tmp: NamedTempFile, target: &Path) -> Result<()> {
    tmp.persist(target)
        .map(|_| ())
        .map_err(|e| CatalogError::io(target, e.error))
}

// --- Test helper ---
pub struct MockSink {
    pub calls: Mutex<Vec<Vec<Artifact>>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(vec![]),
        }
    }
}

impl Default for MockSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactSink for MockSink {
    fn store(&self, items: Vec<Artifact>) -> Result<()> {
        self.calls
            .lock()
            .map_err(|_| CatalogError::Config("mock sink poisoned".into()))?
            .push(items);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn fs_sink_writes_all_targets() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("data.csv");
        let b = dir.path().join("out/tvo.m3u");
        FsSink
            .store(vec![Artifact::new(&a, "one"), Artifact::new(&b, "two")])
            .unwrap();
        assert_eq!(fs::read_to_string(&a).unwrap(), "one");
        assert_eq!(fs::read_to_string(&b).unwrap(), "two");
        // no stray temp files left next to the targets
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn staging_failure_leaves_previous_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("data.csv");
        fs::write(&a, "previous").unwrap();

        // a regular file where a parent directory is expected cannot be staged into
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let b = blocker.join("tvo.m3u");

        let err = FsSink
            .store(vec![Artifact::new(&a, "next"), Artifact::new(&b, "next")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        assert_eq!(fs::read_to_string(&a).unwrap(), "previous");
    }
}
