//! A directory-backed append stream.
//!
//! Each channel is a JSON-lines file `<name>.jsonl` with its committed offset
//! token in `<name>.offset`. The offset file is replaced atomically after the
//! rows are synced, so a crash between the two leaves at most one
//! uncommitted batch behind the recorded token.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use of_core::retail::CustomerId;
use of_core::Row;

use crate::channel::{IngestBackend, IngestChannel};
use crate::{IngestError, Result};

pub struct FileBackend {
    root: PathBuf,
    customers_channel: String,
}

impl FileBackend {
    pub fn new(root: impl Into<PathBuf>, customers_channel: impl Into<String>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| IngestError::io(&root, e))?;
        Ok(Self {
            root,
            customers_channel: customers_channel.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rows_path(&self, channel: &str) -> PathBuf {
        self.root.join(format!("{channel}.jsonl"))
    }

    pub fn offset_path(&self, channel: &str) -> PathBuf {
        self.root.join(format!("{channel}.offset"))
    }

    /// Reads every row of a channel back, in append order.
    pub fn read_rows(&self, channel: &str) -> Result<Vec<Row>> {
        let path = self.rows_path(channel);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(IngestError::io(&path, e)),
        };
        let mut rows = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| IngestError::io(&path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            rows.push(serde_json::from_str(&line)?);
        }
        Ok(rows)
    }
}

impl IngestBackend for FileBackend {
    fn open_channel(&self, name: &str) -> Result<Box<dyn IngestChannel>> {
        let rows_path = self.rows_path(name);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&rows_path)
            .map_err(|e| IngestError::Open {
                channel: name.to_string(),
                reason: format!("{}: {e}", rows_path.display()),
            })?;
        Ok(Box::new(FileChannel {
            name: name.to_string(),
            rows_path,
            offset_path: self.offset_path(name),
            file: Some(file),
        }))
    }

    fn max_customer_id(&self) -> Result<Option<CustomerId>> {
        let max = self
            .read_rows(&self.customers_channel)?
            .iter()
            .filter_map(|row| row.get("CUSTOMER_ID").and_then(serde_json::Value::as_u64))
            .max();
        Ok(max)
    }
}

struct FileChannel {
    name: String,
    rows_path: PathBuf,
    offset_path: PathBuf,
    file: Option<File>,
}

impl FileChannel {
    fn commit_offset(&self, token: &str) -> Result<()> {
        let tmp = self.offset_path.with_extension("offset.tmp");
        fs::write(&tmp, token).map_err(|e| IngestError::io(&tmp, e))?;
        fs::rename(&tmp, &self.offset_path).map_err(|e| IngestError::io(&self.offset_path, e))
    }
}

impl IngestChannel for FileChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn append_rows(&mut self, rows: Vec<Row>, start_offset: &str, end_offset: &str) -> Result<()> {
        let file = self.file.as_mut().ok_or_else(|| IngestError::Closed(self.name.clone()))?;
        let mut writer = BufWriter::new(&*file);
        for row in &rows {
            serde_json::to_writer(&mut writer, row)?;
            writer.write_all(b"\n").map_err(|e| IngestError::io(&self.rows_path, e))?;
        }
        writer.flush().map_err(|e| IngestError::io(&self.rows_path, e))?;
        drop(writer);
        file.sync_data().map_err(|e| IngestError::io(&self.rows_path, e))?;

        self.commit_offset(end_offset)?;
        debug!(
            channel = %self.name,
            rows = rows.len(),
            start_offset,
            end_offset,
            "committed append"
        );
        Ok(())
    }

    fn latest_committed_offset(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.offset_path) {
            Ok(token) => Ok(Some(token.trim().to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(IngestError::io(&self.offset_path, e)),
        }
    }

    fn close(&mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            file.sync_all().map_err(|e| IngestError::io(&self.rows_path, e))?;
        }
        Ok(())
    }
}
