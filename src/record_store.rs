//! Durable per-user transaction storage.
//!
//! Each user owns one record file. Reads reload the whole file every time;
//! nothing is cached between calls.
//!
//! # Concurrency
//!
//! There is no locking. [`RecordStore::delete_record`] is a read-modify-write
//! of the whole file, so a delete racing another delete or an append for the
//! same user can lose the other writer's change.

use crate::codec::{check_storable, line_writer, read_lines, TRANSACTION_DELIMITER};
use crate::config::StoreConfig;
use crate::error::{LedgerError, Result};
use crate::transaction::{Transaction, TransactionRecord};
use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, ErrorKind};
use std::path::Path;
use tempfile::NamedTempFile;

/// File-backed store of each user's transactions.
#[derive(Debug, Clone)]
pub struct RecordStore {
    config: StoreConfig,
}

impl RecordStore {
    pub fn new(config: StoreConfig) -> Self {
        RecordStore { config }
    }

    /// Returns all of `user`'s records in the order they were appended.
    ///
    /// A user without a record file has no records; that is not an error.
    /// Malformed lines are skipped with a warning.
    pub fn list_records(&self, user: &str) -> Result<Vec<Transaction>> {
        let path = self.config.sales_path(user)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        read_lines(
            BufReader::new(file),
            TRANSACTION_DELIMITER,
            TransactionRecord::FIELDS,
            &path,
            |raw: TransactionRecord| raw.parse(),
        )
    }

    /// Next free id for `user`: one past the largest id on file, or 1.
    ///
    /// Fails with [`LedgerError::IdsExhausted`] once `u32::MAX` is taken.
    pub fn next_id(&self, user: &str) -> Result<u32> {
        let records = self.list_records(user)?;
        match records.iter().map(|r| r.id).max() {
            None => Ok(1),
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| LedgerError::IdsExhausted(user.to_string())),
        }
    }

    /// Appends `record` to the end of `user`'s file, creating it if needed.
    ///
    /// A record that could not be read back is refused before the file is
    /// touched: negative amounts, id 0, and text holding `,` or a line break.
    pub fn add_record(&self, user: &str, record: &Transaction) -> Result<()> {
        let path = self.config.sales_path(user)?;
        let fields = record.to_fields();
        check_storable(&fields, TRANSACTION_DELIMITER)?;
        if record.id == 0 || record.amount.is_negative() {
            return Err(LedgerError::InvalidRecord(format!(
                "id {} amount {}",
                record.id, record.amount
            )));
        }
        fs::create_dir_all(self.config.root())?;

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = line_writer(file, TRANSACTION_DELIMITER);
        writer.write_record(fields)?;
        writer.flush()?;

        debug!("Appended transaction {} for user {}", record.id, user);
        Ok(())
    }

    /// Removes every record with `id` and rewrites the user's file.
    ///
    /// Deleting an id that is not present leaves the file untouched. When a
    /// record is removed, the file is rebuilt from the records that parsed, so
    /// malformed lines do not survive the rewrite.
    pub fn delete_record(&self, user: &str, id: u32) -> Result<()> {
        let path = self.config.sales_path(user)?;
        let mut records = self.list_records(user)?;

        let before = records.len();
        records.retain(|r| r.id != id);
        let removed = before - records.len();

        if removed == 0 {
            debug!("No transaction {} for user {}, nothing to delete", id, user);
            return Ok(());
        }

        rewrite(&path, &records)?;

        debug!(
            "Deleted {} record(s) with id {} for user {}",
            removed, id, user
        );
        Ok(())
    }
}

/// Replaces the file at `path` with `records`.
///
/// The new content is written to a sibling temporary file that is then
/// renamed over `path`, so a failure part-way leaves the old file in place.
fn rewrite(path: &Path, records: &[Transaction]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut writer = line_writer(NamedTempFile::new_in(dir)?, TRANSACTION_DELIMITER);

    for record in records {
        let fields = record.to_fields();
        check_storable(&fields, TRANSACTION_DELIMITER)?;
        writer.write_record(fields)?;
    }
    writer.flush()?;

    let tmp = writer.into_inner().map_err(|e| e.into_error())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
