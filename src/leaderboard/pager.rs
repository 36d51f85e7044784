use std::io::{Read, Seek, SeekFrom};

use super::record::Record;
use crate::config::{RECORD_WIDTH, RESULTS_PER_PAGE};
use crate::error::LeaderboardError;

const PAGE_BYTES: u64 = (RESULTS_PER_PAGE * RECORD_WIDTH) as u64;

/// Last page index for a record file of `total_bytes`; an empty trailing
/// page is never counted.
pub fn max_page(total_bytes: u64) -> usize {
    let pages = total_bytes / PAGE_BYTES;
    if total_bytes % PAGE_BYTES == 0 {
        pages.saturating_sub(1) as usize
    } else {
        pages as usize
    }
}

/// Reads up to one page of records starting at `page`, stopping early at
/// end of file.
pub fn window_for<F>(file: &mut F, page: usize) -> Result<Vec<Record>, LeaderboardError>
where
    F: Read + Seek,
{
    let mut offset = page as u64 * PAGE_BYTES;
    file.seek(SeekFrom::Start(offset))?;
    let mut records = Vec::with_capacity(RESULTS_PER_PAGE);
    while records.len() < RESULTS_PER_PAGE {
        match Record::read_from(file, offset)? {
            Some(record) => records.push(record),
            None => break,
        }
        offset += RECORD_WIDTH as u64;
    }
    Ok(records)
}

/// Current page plus its bounds; moves past either end are no-ops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    max_page: usize,
}

impl Pager {
    pub fn new(total_bytes: u64) -> Self {
        Self {
            page: 0,
            max_page: max_page(total_bytes),
        }
    }

    /// Opens on the page holding the record at `rank`.
    pub fn at_rank(total_bytes: u64, rank: u64) -> Self {
        let mut pager = Self::new(total_bytes);
        pager.page = ((rank / RESULTS_PER_PAGE as u64) as usize).min(pager.max_page);
        pager
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn max_page(&self) -> usize {
        self.max_page
    }

    /// Rank of the first record on the current page.
    pub fn first_rank(&self) -> usize {
        self.page * RESULTS_PER_PAGE
    }

    pub fn left(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn right(&mut self) {
        if self.page < self.max_page {
            self.page += 1;
        }
    }
}
