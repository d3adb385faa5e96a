//! JSON files replaced by temp-file-and-rename
//!
//! A multi-file save happens in two phases. First every document is written
//! to `<name>.json.tmp` and synced. Only when all of them staged cleanly are
//! they renamed over their targets. Each existing target is kept as
//! `<name>.json.bak` until the last rename lands, so a rename failing halfway
//! puts the already replaced files back. Either way every target ends up as
//! it was or as staged, never a mix.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::ParcelaError;

fn storage_error(action: &str, path: &Path, err: impl std::fmt::Display) -> ParcelaError {
    ParcelaError::Storage(format!("{} {}: {}", action, path.display(), err))
}

/// Load a JSON document; a missing file yields `T::default()`
pub fn read_json<T, P>(path: P) -> Result<T, ParcelaError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(storage_error("cannot open", path, e)),
    };
    serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_error("cannot parse", path, e))
}

/// A synced temp file waiting to be renamed over `target`
#[derive(Debug)]
pub struct StagedFile {
    temp_path: PathBuf,
    target: PathBuf,
}

impl StagedFile {
    fn discard(self) {
        let _ = fs::remove_file(&self.temp_path);
    }

    fn commit(&self) -> Result<(), ParcelaError> {
        fs::rename(&self.temp_path, &self.target)
            .map_err(|e| storage_error("cannot replace", &self.target, e))
    }

    /// Keep the current target under `<name>.json.bak`; `None` when there is
    /// no regular file to keep
    fn back_up(&self) -> Result<Option<PathBuf>, ParcelaError> {
        match fs::symlink_metadata(&self.target) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error("cannot inspect", &self.target, e)),
        }

        let backup = self.target.with_extension("json.bak");
        let _ = fs::remove_file(&backup);
        fs::hard_link(&self.target, &backup)
            .or_else(|_| fs::copy(&self.target, &backup).map(|_| ()))
            .map_err(|e| storage_error("cannot back up", &self.target, e))?;
        Ok(Some(backup))
    }

    /// Undo a rename that already replaced the target
    fn roll_back(&self, backup: Option<&Path>) {
        let _ = match backup {
            Some(backup) => fs::rename(backup, &self.target),
            None => fs::remove_file(&self.target),
        };
    }
}

fn remove_backups<'a>(backups: impl IntoIterator<Item = &'a Option<PathBuf>>) {
    for backup in backups.into_iter().flatten() {
        let _ = fs::remove_file(backup);
    }
}

fn write_synced<T: Serialize>(file: File, data: &T) -> io::Result<()> {
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, data)?;
    out.flush()?;
    out.get_ref().sync_all()
}

/// Write `data` next to `path` as `<path>.tmp` without touching `path`
pub fn stage_json<T, P>(path: P, data: &T) -> Result<StagedFile, ParcelaError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let target = path.as_ref().to_path_buf();
    if let Some(dir) = target.parent() {
        fs::create_dir_all(dir).map_err(|e| storage_error("cannot create", dir, e))?;
    }

    // Same directory as the target, so the later rename cannot cross devices
    let temp_path = target.with_extension("json.tmp");
    let file = File::create(&temp_path).map_err(|e| storage_error("cannot create", &temp_path, e))?;
    let staged = StagedFile { temp_path, target };

    match write_synced(file, data) {
        Ok(()) => Ok(staged),
        Err(e) => {
            let err = storage_error("cannot write", &staged.temp_path, e);
            staged.discard();
            Err(err)
        }
    }
}

/// Rename staged files over their targets as one step
///
/// On failure every target that was already replaced is restored and the
/// remaining temp files are dropped.
pub fn commit_staged(staged: Vec<StagedFile>) -> Result<(), ParcelaError> {
    let mut backups = Vec::with_capacity(staged.len());
    for file in &staged {
        match file.back_up() {
            Ok(backup) => backups.push(backup),
            Err(e) => {
                remove_backups(&backups);
                staged.into_iter().for_each(StagedFile::discard);
                return Err(e);
            }
        }
    }

    let failure = staged
        .iter()
        .enumerate()
        .find_map(|(index, file)| file.commit().err().map(|e| (index, e)));

    match failure {
        None => {
            remove_backups(&backups);
            Ok(())
        }
        Some((failed, e)) => {
            for (file, backup) in staged[..failed].iter().zip(&backups) {
                file.roll_back(backup.as_deref());
            }
            remove_backups(&backups[failed..]);
            staged.into_iter().skip(failed).for_each(StagedFile::discard);
            Err(e)
        }
    }
}

/// Commit the batch only if every document staged
pub fn write_all_atomic(staged: Vec<Result<StagedFile, ParcelaError>>) -> Result<(), ParcelaError> {
    let mut ready = Vec::with_capacity(staged.len());
    let mut first_error = None;
    for result in staged {
        match result {
            Ok(file) => ready.push(file),
            Err(e) if first_error.is_none() => first_error = Some(e),
            Err(_) => {}
        }
    }

    match first_error {
        Some(e) => {
            ready.into_iter().for_each(StagedFile::discard);
            Err(e)
        }
        None => commit_staged(ready),
    }
}

pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), ParcelaError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    commit_staged(vec![stage_json(path, data)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Doc {
        value: i32,
    }

    #[test]
    fn test_missing_file_reads_default() {
        let temp_dir = TempDir::new().unwrap();
        let doc: Doc = read_json(temp_dir.path().join("absent.json")).unwrap();
        assert_eq!(doc, Doc::default());
    }

    #[test]
    fn test_write_creates_parents_and_leaves_no_temp() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/doc.json");

        write_json_atomic(&path, &Doc { value: 42 }).unwrap();

        assert_eq!(read_json::<Doc, _>(&path).unwrap().value, 42);
        assert!(!temp_dir.path().join("nested/doc.json.tmp").exists());
    }

    #[test]
    fn test_garbage_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "not json at all").unwrap();

        let err = read_json::<Doc, _>(&path).unwrap_err();
        assert!(matches!(err, ParcelaError::Storage(_)));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.json");
        let second = temp_dir.path().join("second.json");
        write_json_atomic(&first, &Doc { value: 1 }).unwrap();
        write_json_atomic(&second, &Doc { value: 1 }).unwrap();

        // a directory where the temp file should go makes staging fail
        fs::create_dir(temp_dir.path().join("second.json.tmp")).unwrap();

        let result = write_all_atomic(vec![
            stage_json(&first, &Doc { value: 2 }),
            stage_json(&second, &Doc { value: 2 }),
        ]);
        assert!(result.is_err());

        assert_eq!(read_json::<Doc, _>(&first).unwrap().value, 1);
        assert_eq!(read_json::<Doc, _>(&second).unwrap().value, 1);
        assert!(!temp_dir.path().join("first.json.tmp").exists());
    }

    #[test]
    fn test_failed_rename_restores_replaced_targets() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.json");
        let second = temp_dir.path().join("second.json");
        write_json_atomic(&first, &Doc { value: 1 }).unwrap();

        // a non-empty directory in place of the last target cannot be renamed over
        fs::create_dir(&second).unwrap();
        fs::write(second.join("keep"), "x").unwrap();

        let result = write_all_atomic(vec![
            stage_json(&first, &Doc { value: 2 }),
            stage_json(&second, &Doc { value: 2 }),
        ]);
        assert!(matches!(result, Err(ParcelaError::Storage(_))));

        assert_eq!(read_json::<Doc, _>(&first).unwrap().value, 1);
        assert!(second.is_dir());
        for leftover in ["first.json.bak", "first.json.tmp", "second.json.tmp"] {
            assert!(!temp_dir.path().join(leftover).exists(), "{leftover} left behind");
        }
    }

    #[test]
    fn test_successful_commit_removes_backups() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.json");
        write_json_atomic(&path, &Doc { value: 1 }).unwrap();
        write_json_atomic(&path, &Doc { value: 2 }).unwrap();

        assert_eq!(read_json::<Doc, _>(&path).unwrap().value, 2);
        assert!(!temp_dir.path().join("doc.json.bak").exists());
    }
}
