use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::pager::{self, Pager};
use super::record::Record;
use crate::config::RECORD_WIDTH;
use crate::error::LeaderboardError;
use crate::log;

/// Inserts `record` after every record with an equal or higher score and
/// shifts the rest of the file down by one slot, in a single forward pass
/// holding at most two records in memory. Returns the zero-based rank the
/// record landed at.
pub fn insert_record<F>(file: &mut F, record: Record) -> Result<u64, LeaderboardError>
where
    F: Read + Write + Seek,
{
    let width = RECORD_WIDTH as u64;
    let mut pending = record;
    let mut rank = None;
    let mut offset = 0u64;
    loop {
        file.seek(SeekFrom::Start(offset))?;
        let Some(current) = Record::read_from(file, offset)? else {
            file.seek(SeekFrom::Start(offset))?;
            file.write_all(&pending.encode())?;
            break;
        };
        if rank.is_some() || pending.score() > current.score() {
            rank.get_or_insert(offset / width);
            file.seek(SeekFrom::Start(offset))?;
            file.write_all(&pending.encode())?;
            pending = current;
        }
        offset += width;
    }
    file.flush()?;
    Ok(rank.unwrap_or(offset / width))
}

pub fn byte_len<F: Seek>(file: &mut F) -> Result<u64, LeaderboardError> {
    Ok(file.seek(SeekFrom::End(0))?)
}

/// The leaderboard backed by one record file. The file is opened and closed
/// around every operation.
#[derive(Clone, Debug)]
pub struct LeaderboardStore {
    path: PathBuf,
}

impl LeaderboardStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<File, LeaderboardError> {
        Ok(OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?)
    }

    pub fn insert(&self, name: &str, score: usize) -> Result<u64, LeaderboardError> {
        let record = Record::new(name, score)?;
        let mut file = self.open()?;
        let rank = insert_record(&mut file, record)?;
        log!("recorded {} at rank {}", record, rank + 1);
        Ok(rank)
    }

    pub fn byte_len(&self) -> Result<u64, LeaderboardError> {
        let mut file = self.open()?;
        byte_len(&mut file)
    }

    pub fn record_count(&self) -> Result<u64, LeaderboardError> {
        Ok(self.byte_len()? / RECORD_WIDTH as u64)
    }

    /// A pager over the current file, positioned on the first page.
    pub fn pager(&self) -> Result<Pager, LeaderboardError> {
        Ok(Pager::new(self.byte_len()?))
    }

    pub fn page(&self, page: usize) -> Result<Vec<Record>, LeaderboardError> {
        let mut file = self.open()?;
        pager::window_for(&mut file, page)
    }
}
