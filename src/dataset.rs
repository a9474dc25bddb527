//! Per-plot data file made of indexed dataset blocks.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::format::{banner, data_string, num, MISSING_VALUE};
use crate::session::Session;

/// One column of values handed to a plot.
#[derive(Debug, Clone, Copy)]
pub enum ColumnData<'a> {
    Numbers(&'a [f64]),
    Labels(&'a [String]),
}

impl<'a> ColumnData<'a> {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numbers(v) => v.len(),
            ColumnData::Labels(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_labels(&self) -> bool {
        matches!(self, ColumnData::Labels(_))
    }

    fn cell(&self, row: usize) -> String {
        match self {
            ColumnData::Numbers(v) if v[row].is_finite() => num(v[row]),
            ColumnData::Numbers(_) => MISSING_VALUE.to_string(),
            ColumnData::Labels(v) => data_string(&v[row]),
        }
    }
}

impl<'a> From<&'a [f64]> for ColumnData<'a> {
    fn from(v: &'a [f64]) -> Self {
        ColumnData::Numbers(v)
    }
}

impl<'a> From<&'a Vec<f64>> for ColumnData<'a> {
    fn from(v: &'a Vec<f64>) -> Self {
        ColumnData::Numbers(v.as_slice())
    }
}

impl<'a, const N: usize> From<&'a [f64; N]> for ColumnData<'a> {
    fn from(v: &'a [f64; N]) -> Self {
        ColumnData::Numbers(v.as_slice())
    }
}

impl<'a> From<&'a [String]> for ColumnData<'a> {
    fn from(v: &'a [String]) -> Self {
        ColumnData::Labels(v)
    }
}

impl<'a> From<&'a Vec<String>> for ColumnData<'a> {
    fn from(v: &'a Vec<String>) -> Self {
        ColumnData::Labels(v.as_slice())
    }
}

/// Render one dataset block. Returns the text and the number of rows,
/// which is the length of the shortest column.
pub fn dataset_block(index: usize, columns: &[ColumnData]) -> (String, usize) {
    let rows = columns.iter().map(|c| c.len()).min().unwrap_or(0);
    let mut out = banner(&format!("DATASET #{}", index));
    for row in 0..rows {
        let line: Vec<String> = columns.iter().map(|c| c.cell(row)).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    // Two blank lines end a block
    out.push_str("\n\n");
    (out, rows)
}

/// Append-only data file owned by exactly one plot.
///
/// Blocks are kept in memory and written through as they are appended. The
/// first write truncates the file, later writes append. Cloning allocates a
/// fresh identifier and path; the clone's copy of the contents is written on
/// its next [`DataFile::flush`].
#[derive(Debug)]
pub struct DataFile {
    session: Session,
    id: usize,
    path: PathBuf,
    contents: String,
    persisted: usize,
    blocks: usize,
}

impl DataFile {
    pub fn new(session: &Session) -> Self {
        let id = session.next_id();
        Self {
            session: session.clone(),
            id,
            path: session.data_path(id),
            contents: String::new(),
            persisted: 0,
            blocks: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Number of blocks appended so far. Also the index of the next block.
    pub fn block_count(&self) -> usize {
        self.blocks
    }

    pub fn is_flushed(&self) -> bool {
        self.persisted == self.contents.len()
    }

    /// Append a block and write it out. The returned index is never reused,
    /// even when the write fails.
    pub fn append_block(&mut self, columns: &[ColumnData]) -> Result<usize> {
        let index = self.blocks;
        let (text, rows) = dataset_block(index, columns);
        let longest = columns.iter().map(|c| c.len()).max().unwrap_or(0);
        if longest != rows {
            debug!(
                "dataset {} of {}: columns differ in length, truncated to {} rows",
                index,
                self.path.display(),
                rows
            );
        }
        self.contents.push_str(&text);
        self.blocks += 1;
        debug!("appended dataset {} ({} rows) to {}", index, rows, self.path.display());
        self.flush()?;
        Ok(index)
    }

    /// Write whatever has not reached the disk yet. A file removed since the
    /// last write is written again in full.
    pub fn flush(&mut self) -> Result<()> {
        if self.persisted > 0 && !self.path.exists() {
            debug!("{} was removed, rewriting it", self.path.display());
            self.persisted = 0;
        }
        if self.is_flushed() {
            return Ok(());
        }
        let pending = &self.contents[self.persisted..];
        if self.persisted == 0 {
            fs::write(&self.path, pending)
                .with_context(|| format!("Failed to write data file '{}'", self.path.display()))?;
            self.session.track_file(&self.path);
        } else {
            let mut file = OpenOptions::new()
                .append(true)
                .open(&self.path)
                .with_context(|| format!("Failed to open data file '{}'", self.path.display()))?;
            file.write_all(pending.as_bytes())
                .with_context(|| format!("Failed to append to data file '{}'", self.path.display()))?;
        }
        self.persisted = self.contents.len();
        Ok(())
    }

    /// Delete the file from disk. A missing file is not an error.
    pub fn remove(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl Clone for DataFile {
    fn clone(&self) -> Self {
        let id = self.session.next_id();
        Self {
            session: self.session.clone(),
            id,
            path: self.session.data_path(id),
            contents: self.contents.clone(),
            persisted: 0,
            blocks: self.blocks,
        }
    }
}
