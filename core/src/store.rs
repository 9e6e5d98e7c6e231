//! Filesystem output layer.
//!
//! RULE: Only store.rs touches the filesystem.
//! Generators and the engine hand records and documents to FileStore.
//! Every file is opened, fully written, flushed and closed before the
//! next one is started.

use crate::{
    doc::{Doc, IntoDoc},
    error::{GenError, GenResult},
};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root and every listed directory if absent.
    pub fn ensure_dirs(&self, dirs: &[PathBuf]) -> GenResult<()> {
        for dir in std::iter::once(&self.root).chain(dirs) {
            fs::create_dir_all(dir).map_err(|source| GenError::OutputRoot {
                path: dir.display().to_string(),
                source,
            })?;
        }
        Ok(())
    }

    /// Header row from `columns`, then one row per record.
    /// Records must serialize their fields in `columns` order.
    pub fn write_csv<R: Serialize>(
        &self,
        path: &Path,
        columns: &[&str],
        rows: &[R],
    ) -> GenResult<usize> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        writer.write_record(columns)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        log::info!("wrote {} rows to {}", rows.len(), path.display());
        Ok(rows.len())
    }

    /// One compact JSON object per line.
    pub fn write_jsonl<R: IntoDoc>(&self, path: &Path, rows: &[R]) -> GenResult<usize> {
        let mut out = BufWriter::new(File::create(path)?);
        for row in rows {
            out.write_all(row.to_doc().to_json_line()?.as_bytes())?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        log::info!("wrote {} lines to {}", rows.len(), path.display());
        Ok(rows.len())
    }

    pub fn write_json(&self, path: &Path, doc: &Doc) -> GenResult<()> {
        self.write_text(path, &doc.to_json_pretty()?)
    }

    pub fn write_yaml(&self, path: &Path, doc: &Doc) -> GenResult<()> {
        self.write_text(path, &doc.to_yaml())
    }

    fn write_text(&self, path: &Path, text: &str) -> GenResult<()> {
        let mut out = BufWriter::new(File::create(path)?);
        out.write_all(text.as_bytes())?;
        out.flush()?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }
}
