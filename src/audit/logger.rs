//! JSONL writer and reader for `audit.log`

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use crate::error::{ParcelaError, ParcelaResult};
use crate::models::OwnerId;

use super::entry::AuditEntry;

pub struct AuditLogger {
    log_path: PathBuf,
}

fn io_error(action: &str, err: io::Error) -> ParcelaError {
    ParcelaError::Io(format!("audit log {action}: {err}"))
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn log(&self, entry: &AuditEntry) -> ParcelaResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append entries in order; the file is opened and flushed once
    pub fn log_batch(&self, entries: &[AuditEntry]) -> ParcelaResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| io_error("open", e))?;
        let mut out = BufWriter::new(file);

        for entry in entries {
            serde_json::to_writer(&mut out, entry)?;
            out.write_all(b"\n").map_err(|e| io_error("write", e))?;
        }
        out.flush().map_err(|e| io_error("flush", e))
    }

    /// Every entry in file order; a missing log reads as empty
    pub fn read_all(&self) -> ParcelaResult<Vec<AuditEntry>> {
        let file = match File::open(&self.log_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("open", e)),
        };

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| io_error("read", e))?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| {
                ParcelaError::Json(format!("audit log line {}: {}", index + 1, e))
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// The owner's last `count` entries, oldest first
    pub fn read_recent(&self, owner: OwnerId, count: usize) -> ParcelaResult<Vec<AuditEntry>> {
        let mine: Vec<_> = self
            .read_all()?
            .into_iter()
            .filter(|e| e.owner_id == owner)
            .collect();
        let skip = mine.len().saturating_sub(count);
        Ok(mine.into_iter().skip(skip).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use serde_json::json;
    use tempfile::TempDir;

    fn logger() -> (AuditLogger, PathBuf, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("audit.log");
        (AuditLogger::new(path.clone()), path, temp_dir)
    }

    fn account_created(owner: OwnerId, i: usize) -> AuditEntry {
        AuditEntry::create(
            EntityType::Account,
            format!("acc-{}", i),
            owner,
            Some(format!("Conta {}", i)),
            &json!({"index": i}),
        )
    }

    #[test]
    fn test_single_entry_round_trip() {
        let (logger, path, _temp) = logger();
        logger.log(&account_created(OwnerId::new(), 0)).unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap().lines().count(), 1);
        let entries = logger.read_all().unwrap();
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::Account);
    }

    #[test]
    fn test_batch_appends_in_order() {
        let (logger, _path, _temp) = logger();
        let owner = OwnerId::new();
        let batch: Vec<_> = (0..3).map(|i| account_created(owner, i)).collect();

        logger.log_batch(&batch).unwrap();
        logger.log_batch(&[]).unwrap();

        let ids: Vec<_> = logger.read_all().unwrap().into_iter().map(|e| e.entity_id).collect();
        assert_eq!(ids, vec!["acc-0", "acc-1", "acc-2"]);
    }

    #[test]
    fn test_read_recent_is_per_owner() {
        let (logger, _path, _temp) = logger();
        let alice = OwnerId::new();
        let bob = OwnerId::new();

        for i in 0..10 {
            logger.log(&account_created(alice, i)).unwrap();
            logger.log(&account_created(bob, 100 + i)).unwrap();
        }

        let recent = logger.read_recent(alice, 3).unwrap();
        let ids: Vec<_> = recent.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["acc-7", "acc-8", "acc-9"]);
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let (logger, path, _temp) = logger();
        assert!(!path.exists());
        assert!(logger.read_all().unwrap().is_empty());
        assert!(logger.read_recent(OwnerId::new(), 5).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_line_is_reported_by_number() {
        let (logger, path, _temp) = logger();
        logger.log(&account_created(OwnerId::new(), 0)).unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "not json").unwrap();

        let err = logger.read_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
