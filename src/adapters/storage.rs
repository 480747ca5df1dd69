use crate::domain::ports::Storage;
use crate::utils::error::WriteError;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Local disk storage. Writes go to a sibling temp file first and are renamed
/// into place, so a failed write never leaves a truncated report behind.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> WriteError + '_ {
    move |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), WriteError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }

        let temp_path = temp_path_for(path);
        if let Err(e) = fs::write(&temp_path, data) {
            let _ = fs::remove_file(&temp_path);
            return Err(io_error(path)(e));
        }

        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(io_error(path)(e));
        }

        Ok(())
    }
}
