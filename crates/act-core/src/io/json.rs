//! Thin JSON read/write helpers layered on [`super::atomic`].

use crate::io::atomic::write_atomic;
use crate::io::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let bytes = std::fs::read(path).map_err(|e| StoreError::Io { path: path.to_path_buf(), source: e })?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Json { path: path.to_path_buf(), source: e })
}

pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| StoreError::Json { path: path.to_path_buf(), source: e })?;
    write_atomic(path, &bytes)
}

pub fn write_json_compact<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(value)
        .map_err(|e| StoreError::Json { path: path.to_path_buf(), source: e })?;
    write_atomic(path, &bytes)
}
