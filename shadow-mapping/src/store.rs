//! CSV backing store for the reference table.
//!
//! The file has a header row with at least `Description` and `Subtask`
//! columns, e.g.:
//!   Project,Phase,Owner,Description,Subtask
//!   ANY,-,-,Verlagsinfo-Vorbereitung & Abstimmung,PUB-104
//!
//! Other columns are ignored on load. Ragged or incomplete rows are skipped.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use shadow_core::{ReferenceRecord, Result, ShadowError};
use tracing::{debug, info};

use crate::reference_table::ReferenceTable;

pub const DESCRIPTION_COLUMN: &str = "Description";
pub const TASK_CODE_COLUMN: &str = "Subtask";

/// Handle on a reference CSV file. Appends keep the header's column layout.
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    path: PathBuf,
    width: usize,
    description_idx: usize,
    task_code_idx: usize,
    filler: String,
}

fn load_error(path: &Path, reason: impl std::fmt::Display) -> ShadowError {
    ShadowError::ReferenceLoad {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn write_error(path: &Path, reason: impl std::fmt::Display) -> ShadowError {
    ShadowError::ReferenceWrite {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}

impl ReferenceStore {
    /// Read a reference CSV. Fails if the file is unreadable, lacks the key
    /// columns, or has no row with both a description and a task code.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, ReferenceTable)> {
        Self::read(path.as_ref(), false)
    }

    /// Open a table that learning will grow: a missing file is created with
    /// just a header, and a header-only file yields an empty table.
    pub fn open_for_learning(path: impl AsRef<Path>) -> Result<(Self, ReferenceTable)> {
        let path = path.as_ref();
        if !path.exists() {
            return Self::create(path);
        }
        Self::read(path, true)
    }

    fn read(path: &Path, allow_empty: bool) -> Result<(Self, ReferenceTable)> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| load_error(path, e))?;

        let headers = rdr.headers().map_err(|e| load_error(path, e))?.clone();
        let description_idx = column(&headers, DESCRIPTION_COLUMN)
            .ok_or_else(|| load_error(path, format!("missing '{DESCRIPTION_COLUMN}' column")))?;
        let task_code_idx = column(&headers, TASK_CODE_COLUMN)
            .ok_or_else(|| load_error(path, format!("missing '{TASK_CODE_COLUMN}' column")))?;

        let mut table = ReferenceTable::new();
        let mut skipped = 0usize;

        for (i, result) in rdr.records().enumerate() {
            let row = match result {
                Ok(r) => r,
                Err(e) => {
                    debug!(row = i + 2, error = %e, "unreadable reference row, skipped");
                    skipped += 1;
                    continue;
                }
            };

            let description = row.get(description_idx).unwrap_or("");
            let task_code = row.get(task_code_idx).unwrap_or("");
            if description.is_empty() || task_code.is_empty() {
                debug!(row = i + 2, fields = row.len(), "incomplete reference row, skipped");
                skipped += 1;
                continue;
            }

            table.push(ReferenceRecord::new(description, task_code));
        }

        if table.is_empty() && !allow_empty {
            return Err(load_error(path, "no usable rows (need Description and Subtask)"));
        }

        info!(path = %path.display(), rows = table.len(), skipped, "loaded reference table");

        let store = Self {
            path: path.to_path_buf(),
            width: headers.len(),
            description_idx,
            task_code_idx,
            filler: "-".to_string(),
        };
        Ok((store, table))
    }

    /// Start a new reference CSV with just a header row.
    pub fn create(path: impl AsRef<Path>) -> Result<(Self, ReferenceTable)> {
        let path = path.as_ref();
        if path.exists() {
            return Err(write_error(path, "file already exists"));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(path, e))?;
        }

        let mut wtr = csv::Writer::from_path(path).map_err(|e| write_error(path, e))?;
        wtr.write_record([DESCRIPTION_COLUMN, TASK_CODE_COLUMN])
            .map_err(|e| write_error(path, e))?;
        wtr.flush().map_err(|e| write_error(path, e))?;

        info!(path = %path.display(), "created empty reference table");

        let store = Self {
            path: path.to_path_buf(),
            width: 2,
            description_idx: 0,
            task_code_idx: 1,
            filler: "-".to_string(),
        };
        Ok((store, ReferenceTable::new()))
    }

    /// Value written into non-key columns on append (default `-`).
    pub fn with_filler(mut self, filler: impl Into<String>) -> Self {
        self.filler = filler.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a new CSV row at the end of the file.
    pub fn append(&self, record: &ReferenceRecord) -> Result<()> {
        let mut row = vec![self.filler.as_str(); self.width];
        row[self.description_idx] = record.description();
        row[self.task_code_idx] = record.task_code();

        let needs_newline = !ends_with_newline(&self.path).map_err(|e| write_error(&self.path, e))?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| write_error(&self.path, e))?;
        if needs_newline {
            file.write_all(b"\n").map_err(|e| write_error(&self.path, e))?;
        }

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        wtr.write_record(&row).map_err(|e| write_error(&self.path, e))?;
        wtr.flush().map_err(|e| write_error(&self.path, e))?;
        Ok(())
    }
}

fn ends_with_newline(path: &Path) -> std::io::Result<bool> {
    let mut f = File::open(path)?;
    if f.metadata()?.len() == 0 {
        return Ok(true);
    }
    f.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    f.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
