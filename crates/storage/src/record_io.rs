//! Record folders
//!
//! Every record owns the folder `<root>/<key>/` holding `<key>.json` and any
//! attachments such as the PDF.

use bibliophant_core::Record;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// The folder of the record with the given key.
pub fn record_dir(root: &Path, key: &str) -> PathBuf {
    root.join(key)
}

/// The JSON file of the record with the given key.
pub fn record_file(root: &Path, key: &str) -> PathBuf {
    record_dir(root, key).join(format!("{}.json", key))
}

/// Create the record folder and write `<key>.json` into it.
///
/// Fails with `Error::FolderExists` when the folder exists and `overwrite`
/// is not set. Returns the folder.
pub fn write_record_file(root: &Path, record: &Record, overwrite: bool) -> Result<PathBuf> {
    let dir = record_dir(root, &record.key);
    if dir.exists() && !overwrite {
        return Err(Error::FolderExists(dir));
    }
    fs::create_dir_all(&dir)?;
    fs::write(record_file(root, &record.key), record.to_json()?)?;
    Ok(dir)
}

/// Load a record from its folder or directly from its JSON file.
pub fn load_record_file(path: &Path) -> Result<Record> {
    let file = if path.is_dir() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.join(format!("{}.json", name))
    } else {
        path.to_path_buf()
    };
    let text = fs::read_to_string(&file).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::RecordFileNotFound(file.clone()),
        _ => Error::Io(e),
    })?;
    Ok(Record::from_json(&text)?)
}
