//! The per-hunt record store.
//!
//! A store is an unindexed sequential array of fixed-width records in a
//! single flat file. Appends go to the end, reads are linear scans, and
//! deletion rewrites the file through a sibling temporary that replaces
//! the original with an atomic rename. Every operation opens, uses, and
//! closes its own file handle; nothing is shared between calls.
//!
//! Cross-process access is not coordinated. Two concurrent invocations
//! against the same hunt can race; the last rename wins.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::hunt::Hunt;
use crate::record::{Treasure, RECORD_SIZE};

/// Id assigned to the first record of a hunt.
pub const FIRST_ID: i32 = 1;

/// Record store for one hunt.
#[derive(Debug)]
pub struct Store<'a> {
    hunt: &'a Hunt,
}

impl<'a> Store<'a> {
    /// Create a store over the given hunt's data file.
    #[must_use]
    pub fn new(hunt: &'a Hunt) -> Self {
        Self { hunt }
    }

    /// Compute the id for the next appended record.
    ///
    /// If the data file is missing or empty the next id is [`FIRST_ID`];
    /// otherwise it is the id of the last record in file order plus one.
    /// Records are appended in id order and deletion preserves relative
    /// order, so the last physical record always carries the highest id.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file cannot be read or its last
    /// record does not decode.
    pub fn next_id(&self) -> Result<i32> {
        let path = self.hunt.data_path();
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(FIRST_ID),
            Err(e) => return Err(e.into()),
        };

        let count = file.metadata()?.len() / RECORD_SIZE as u64;
        if count == 0 {
            return Ok(FIRST_ID);
        }

        file.seek(SeekFrom::Start((count - 1) * RECORD_SIZE as u64))?;
        let mut buf = vec![0u8; RECORD_SIZE];
        file.read_exact(&mut buf)?;
        let last = Treasure::decode(&buf)?;
        Ok(last.id + 1)
    }

    /// Append one record to the end of the data file.
    ///
    /// The record is written as a single block write; the file is created
    /// on first append.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not encode or the write fails.
    pub fn append(&self, treasure: &Treasure) -> Result<()> {
        let encoded = treasure.encode()?;
        let path = self.hunt.data_path();

        let mut file = OpenOptions::new().append(true).create(true).open(&path)?;
        file.write_all(&encoded)?;

        debug!("appended treasure {} to {}", treasure.id, path.display());
        Ok(())
    }

    /// Scan the data file, yielding records lazily in physical order.
    ///
    /// Each call produces a fresh scan from the start of the file. A
    /// missing data file yields an empty scan. A short read mid-scan
    /// yields a single error, after which the scan is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file exists but cannot be opened.
    pub fn scan(&self) -> Result<Scan> {
        let path = self.hunt.data_path();
        match File::open(&path) {
            Ok(file) => {
                let remaining = file.metadata()?.len() / RECORD_SIZE as u64;
                Ok(Scan {
                    reader: Some(BufReader::new(file)),
                    remaining,
                    path,
                })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Scan {
                reader: None,
                remaining: 0,
                path,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a record by id.
    ///
    /// Linear scan returning the first match, or `Ok(None)` if no record
    /// carries the id.
    ///
    /// # Errors
    ///
    /// Returns an error if the scan fails partway.
    pub fn get(&self, id: i32) -> Result<Option<Treasure>> {
        for item in self.scan()? {
            let treasure = item?;
            if treasure.id == id {
                return Ok(Some(treasure));
            }
        }
        Ok(None)
    }

    /// Delete a record by id via filtered rewrite.
    ///
    /// Every other record is copied, in order, into a sibling temporary
    /// file. If the id was found the temporary atomically replaces the
    /// data file (the rename is the commit point); otherwise the
    /// temporary is discarded and `Ok(false)` is returned. Any failure
    /// mid-pass discards the temporary and leaves the original file
    /// untouched.
    ///
    /// No fsync is performed before the rename, so durability across
    /// power loss is not guaranteed.
    ///
    /// # Errors
    ///
    /// Returns an error if the scan, the temporary file, or the rename
    /// fails.
    pub fn remove(&self, id: i32) -> Result<bool> {
        let path = self.hunt.data_path();
        let scan = self.scan()?;
        if scan.reader.is_none() {
            debug!("no data file for hunt {}", self.hunt.id());
            return Ok(false);
        }

        // Dropped without persist, the temp file is unlinked, which makes
        // every early return below leave the original untouched.
        let mut tmp = NamedTempFile::new_in(self.hunt.dir())?;

        let mut found = false;
        for item in scan {
            let treasure = item?;
            if treasure.id == id {
                found = true;
                continue;
            }
            tmp.write_all(&treasure.encode()?)?;
        }

        if !found {
            debug!("treasure {} not present in {}", id, path.display());
            return Ok(false);
        }

        tmp.flush()?;
        tmp.persist(&path).map_err(|e| Error::Io(e.error))?;
        info!("removed treasure {} from hunt {}", id, self.hunt.id());
        Ok(true)
    }

    /// Number of records currently in the data file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file metadata cannot be read.
    pub fn count(&self) -> Result<u64> {
        match std::fs::metadata(self.hunt.data_path()) {
            Ok(meta) => Ok(meta.len() / RECORD_SIZE as u64),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}

/// Lazy iterator over the records of one data file.
///
/// Yields `Result<Treasure>` in physical order. The record count is fixed
/// from the file size when the scan is opened.
#[derive(Debug)]
pub struct Scan {
    reader: Option<BufReader<File>>,
    remaining: u64,
    path: PathBuf,
}

impl Iterator for Scan {
    type Item = Result<Treasure>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let reader = self.reader.as_mut()?;

        let mut buf = vec![0u8; RECORD_SIZE];
        if let Err(e) = reader.read_exact(&mut buf) {
            // Abort the whole scan; a partial block is never a record.
            self.remaining = 0;
            self.reader = None;
            let err = if e.kind() == ErrorKind::UnexpectedEof {
                Error::corrupt(format!(
                    "{}: file shrank below its record count mid-scan",
                    self.path.display()
                ))
            } else {
                e.into()
            };
            return Some(Err(err));
        }

        self.remaining -= 1;
        match Treasure::decode(&buf) {
            Ok(treasure) => Some(Ok(treasure)),
            Err(e) => {
                self.remaining = 0;
                self.reader = None;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}
