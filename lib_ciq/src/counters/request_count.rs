//! # Daily Request Counter
//!
//! The GDS API meters usage per calendar day (the service-level error on
//! exhaustion reads `Daily Request Limit of 10000 Exceeded`). This counter
//! tracks the elementary queries issued so far today across process restarts,
//! persisted as a single `YYYY-MM-DD,count` line. Loading on a later day
//! resets the count to zero and rewrites the file.
//!
//! Consistency under concurrent callers is the embedder's problem; wrap the
//! counter in whatever serialization the embedding system needs.

use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};

use crate::gds::error::CiqError;

/// A day-scoped elementary-query counter backed by a plain file.
#[derive(Debug)]
pub struct RequestCounter {
    path: PathBuf,
    date: NaiveDate,
    count: u64,
}

impl RequestCounter {
    /// Loads the counter from `path`, creating the file at zero when it is
    /// missing, stale (a previous day), or unparseable.
    ///
    /// # Errors
    /// `Counter` when the file cannot be read or written.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CiqError> {
        let path = path.into();
        let today = Local::now().date_naive();

        let count = match fs::read_to_string(&path) {
            Ok(contents) => parse_line(contents.trim(), today),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let mut counter = Self {
            path,
            date: today,
            count: count.unwrap_or(0),
        };
        if count.is_none() {
            counter.persist()?;
        }
        Ok(counter)
    }

    /// The number of elementary queries counted so far today.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Adds `n` elementary queries and persists, rolling the count back to
    /// zero first when the calendar day has changed since the last write.
    ///
    /// # Errors
    /// `Counter` when the file cannot be written.
    pub fn add(&mut self, n: u64) -> Result<(), CiqError> {
        let today = Local::now().date_naive();
        if today != self.date {
            self.date = today;
            self.count = 0;
        }
        self.count += n;
        self.persist()
    }

    fn persist(&self) -> Result<(), CiqError> {
        fs::write(&self.path, format!("{},{}", self.date, self.count))?;
        Ok(())
    }
}

/// Parses a `date,count` line; `Some(count)` only when the date is today.
fn parse_line(line: &str, today: NaiveDate) -> Option<u64> {
    let (date, count) = line.split_once(',')?;
    if date != today.to_string() {
        return None;
    }
    count.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_starts_at_zero_and_creates_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request_count_cache");

        let counter = RequestCounter::load(&path).unwrap();
        assert_eq!(counter.count(), 0);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            format!("{},0", Local::now().date_naive())
        );
    }

    #[test]
    fn same_day_reload_keeps_the_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request_count_cache");

        let mut counter = RequestCounter::load(&path).unwrap();
        counter.add(7).unwrap();
        drop(counter);

        let counter = RequestCounter::load(&path).unwrap();
        assert_eq!(counter.count(), 7);
    }

    #[test]
    fn stale_date_resets_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request_count_cache");
        fs::write(&path, "2017-05-23,9999").unwrap();

        let counter = RequestCounter::load(&path).unwrap();
        assert_eq!(counter.count(), 0);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            format!("{},0", Local::now().date_naive())
        );
    }

    #[test]
    fn garbage_contents_reset_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request_count_cache");
        fs::write(&path, "not a counter line").unwrap();

        let counter = RequestCounter::load(&path).unwrap();
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn add_accumulates_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request_count_cache");

        let mut counter = RequestCounter::load(&path).unwrap();
        counter.add(2).unwrap();
        counter.add(3).unwrap();
        assert_eq!(counter.count(), 5);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            format!("{},5", Local::now().date_naive())
        );
    }
}
