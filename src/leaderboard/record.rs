use std::fmt;
use std::io::Read;

use crate::config::{NAME_LEN, RECORD_TERMINATOR, RECORD_WIDTH, SCORE_DIGITS};
use crate::error::LeaderboardError;
use crate::log;

/// One fixed-width leaderboard entry: `NAME` + `SSS` + terminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record {
    name: [u8; NAME_LEN],
    score: u16,
}

impl Record {
    /// Upper-cases and space-pads `name`. Only ASCII letters, digits and
    /// spaces are accepted; anything past three characters is dropped.
    pub fn new(name: &str, score: usize) -> Result<Self, LeaderboardError> {
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ') {
            return Err(LeaderboardError::InvalidName(name.to_string()));
        }
        let mut padded = [b' '; NAME_LEN];
        for (slot, byte) in padded.iter_mut().zip(name.bytes()) {
            *slot = byte.to_ascii_uppercase();
        }
        if score >= 1000 {
            log!("score {} does not fit three digits, stored as {:03}", score, score % 1000);
        }
        let digits = [score / 100 % 10, score / 10 % 10, score % 10];
        let score = digits.iter().fold(0u16, |acc, &d| acc * 10 + d as u16);
        Ok(Self {
            name: padded,
            score,
        })
    }

    pub fn name(&self) -> &str {
        // Both constructors only admit ASCII.
        std::str::from_utf8(&self.name).unwrap_or("???")
    }

    pub fn score(&self) -> u16 {
        self.score
    }

    pub fn encode(&self) -> [u8; RECORD_WIDTH] {
        let mut buf = [0u8; RECORD_WIDTH];
        buf[..NAME_LEN].copy_from_slice(&self.name);
        buf[NAME_LEN] = b'0' + (self.score / 100 % 10) as u8;
        buf[NAME_LEN + 1] = b'0' + (self.score / 10 % 10) as u8;
        buf[NAME_LEN + 2] = b'0' + (self.score % 10) as u8;
        buf[RECORD_WIDTH - 1] = RECORD_TERMINATOR;
        buf
    }

    /// `offset` is only used to locate the record in error messages.
    pub fn decode(buf: &[u8; RECORD_WIDTH], offset: u64) -> Result<Self, LeaderboardError> {
        let corrupt = |reason: &str| LeaderboardError::Corrupt {
            offset,
            reason: reason.to_string(),
        };
        let mut name = [b' '; NAME_LEN];
        name.copy_from_slice(&buf[..NAME_LEN]);
        if !name.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            return Err(corrupt("name is not printable ASCII"));
        }
        let mut score = 0u16;
        for &digit in &buf[NAME_LEN..NAME_LEN + SCORE_DIGITS] {
            if !digit.is_ascii_digit() {
                return Err(corrupt("score is not three decimal digits"));
            }
            score = score * 10 + (digit - b'0') as u16;
        }
        if buf[RECORD_WIDTH - 1] != RECORD_TERMINATOR {
            return Err(corrupt("missing record terminator"));
        }
        Ok(Self { name, score })
    }

    /// Reads the record at the reader's position. `Ok(None)` at a clean end of
    /// file; a partial trailing record is corrupt.
    pub fn read_from<R: Read>(reader: &mut R, offset: u64) -> Result<Option<Self>, LeaderboardError> {
        let mut buf = [0u8; RECORD_WIDTH];
        let mut filled = 0;
        while filled < RECORD_WIDTH {
            let n = reader.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        match filled {
            0 => Ok(None),
            RECORD_WIDTH => Self::decode(&buf, offset).map(Some),
            _ => Err(LeaderboardError::Corrupt {
                offset,
                reason: format!("truncated record of {} bytes", filled),
            }),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:03}", self.name(), self.score)
    }
}
