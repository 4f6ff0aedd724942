use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::{Feature, ImageInfo};

use super::DataIo;

#[derive(Debug, Serialize, Deserialize)]
struct ImageFile {
    info: ImageInfo,
    pixels: Vec<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct VectorFile {
    features: Vec<Feature>,
}

/// One JSON document per path on the local filesystem. Relative paths are
/// resolved against `base_dir` when one is set.
#[derive(Debug, Clone, Default)]
pub struct JsonFileIo {
    base_dir: Option<PathBuf>,
}

impl JsonFileIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        JsonFileIo {
            base_dir: Some(dir.into()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) if Path::new(path).is_relative() => base.join(path),
            _ => PathBuf::from(path),
        }
    }

    fn load<T: for<'de> Deserialize<'de>>(&self, path: &str) -> PipelineResult<T> {
        let text = fs::read_to_string(self.resolve(path)).map_err(|e| PipelineError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| PipelineError::io(path, e))
    }

    fn store<T: Serialize>(&self, path: &str, value: &T) -> PipelineResult<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| PipelineError::io(path, e))?;
            }
        }
        let text = serde_json::to_string(value).map_err(|e| PipelineError::io(path, e))?;
        fs::write(full, text).map_err(|e| PipelineError::io(path, e))
    }
}

impl DataIo for JsonFileIo {
    fn read_image_info(&self, path: &str) -> PipelineResult<ImageInfo> {
        Ok(self.load::<ImageFile>(path)?.info)
    }

    fn read_image(&self, path: &str) -> PipelineResult<Vec<f32>> {
        let file: ImageFile = self.load(path)?;
        if file.pixels.len() != file.info.sample_count() {
            return Err(PipelineError::io(path, "pixel buffer does not match image size"));
        }
        Ok(file.pixels)
    }

    fn write_image(&self, path: &str, info: &ImageInfo, pixels: &[f32]) -> PipelineResult<()> {
        self.store(
            path,
            &ImageFile {
                info: *info,
                pixels: pixels.to_vec(),
            },
        )
    }

    fn read_vector_data(&self, path: &str) -> PipelineResult<Vec<Feature>> {
        Ok(self.load::<VectorFile>(path)?.features)
    }

    fn write_vector_data(&self, path: &str, features: &[Feature]) -> PipelineResult<()> {
        self.store(
            path,
            &VectorFile {
                features: features.to_vec(),
            },
        )
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }
}
