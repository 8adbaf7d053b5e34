//! Thin wrapper over a filesystem-backed Zarr array.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;
use zarrs::array::{Array, DataType};
use zarrs::array_subset::ArraySubset;
use zarrs_filesystem::FilesystemStore;

use crate::error::{Result, StoreError};

/// An open array. Dropping it releases the store handle.
pub(crate) struct ZarrArray {
    array: Array<FilesystemStore>,
    name: String,
}

impl ZarrArray {
    /// Open the array rooted at `path`. A missing directory is reported as
    /// `NotFound` with the message produced by `missing`.
    pub fn open<F>(path: &Path, missing: F) -> Result<Self>
    where
        F: FnOnce() -> String,
    {
        if !path.is_dir() {
            return Err(StoreError::not_found(missing()));
        }

        let store = FilesystemStore::new(path)
            .map_err(|e| StoreError::open_failed(format!("{}: {}", path.display(), e)))?;
        let array = Array::open(Arc::new(store), "/")
            .map_err(|e| StoreError::open_failed(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), shape = ?array.shape(), "Opened array");

        Ok(Self {
            array,
            name: path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("array")
                .to_string(),
        })
    }

    pub fn shape(&self) -> &[u64] {
        self.array.shape()
    }

    /// Check the dimensionality before indexing into the shape.
    pub fn expect_rank(&self, rank: usize) -> Result<()> {
        if self.shape().len() != rank {
            return Err(StoreError::invalid_metadata(format!(
                "{} has {} dimensions, expected {}",
                self.name,
                self.shape().len(),
                rank
            )));
        }
        Ok(())
    }

    /// Deserialize a named attribute.
    pub fn attr<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.array.attributes().get(key).ok_or_else(|| {
            StoreError::invalid_metadata(format!("{} is missing the '{}' attribute", self.name, key))
        })?;
        serde_json::from_value(value.clone()).map_err(|e| {
            StoreError::invalid_metadata(format!("{} attribute '{}': {}", self.name, key, e))
        })
    }

    /// Axis labels stored in an attribute; their count must match the axis length.
    pub fn axis_labels<T: DeserializeOwned>(&self, key: &str, axis: usize) -> Result<Vec<T>> {
        let labels: Vec<T> = self.attr(key)?;
        let len = self.shape().get(axis).copied().unwrap_or(0);
        if labels.len() as u64 != len {
            return Err(StoreError::invalid_metadata(format!(
                "{} attribute '{}' has {} labels for an axis of length {}",
                self.name,
                key,
                labels.len(),
                len
            )));
        }
        Ok(labels)
    }

    /// Read a hyper-rectangle as f64, row-major.
    pub fn read(&self, start: Vec<u64>, shape: Vec<u64>) -> Result<Vec<f64>> {
        let subset = ArraySubset::new_with_start_shape(start, shape)
            .map_err(|e| StoreError::read_failed(e.to_string()))?;

        match self.array.data_type() {
            DataType::Float32 => {
                let data: Vec<f32> = self
                    .array
                    .retrieve_array_subset_elements(&subset)
                    .map_err(|e| StoreError::read_failed(e.to_string()))?;
                Ok(data.into_iter().map(f64::from).collect())
            }
            DataType::Float64 => self
                .array
                .retrieve_array_subset_elements::<f64>(&subset)
                .map_err(|e| StoreError::read_failed(e.to_string())),
            other => Err(StoreError::invalid_metadata(format!(
                "{} has unsupported data type {:?}",
                self.name, other
            ))),
        }
    }

    /// Read the whole array.
    pub fn read_all(&self) -> Result<Vec<f64>> {
        let shape = self.shape().to_vec();
        self.read(vec![0; shape.len()], shape)
    }
}
