use parking_lot::RwLock;
use std::collections::HashMap;

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::{Feature, ImageInfo};

use super::DataIo;

#[derive(Debug, Clone)]
enum Stored {
    Image { info: ImageInfo, pixels: Vec<f32> },
    Vector(Vec<Feature>),
}

/// In-process storage keyed by path.
#[derive(Debug, Default)]
pub struct MemoryIo {
    entries: RwLock<HashMap<String, Stored>>,
    writes: RwLock<Vec<String>>,
}

impl MemoryIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths in the order they were written, duplicates included.
    pub fn written_paths(&self) -> Vec<String> {
        self.writes.read().clone()
    }

    fn not_found(path: &str) -> PipelineError {
        PipelineError::io(path, "no such entry")
    }

    fn get(&self, path: &str) -> PipelineResult<Stored> {
        self.entries
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found(path))
    }

    fn put(&self, path: &str, value: Stored) {
        self.entries.write().insert(path.to_string(), value);
        self.writes.write().push(path.to_string());
    }
}

impl DataIo for MemoryIo {
    fn read_image_info(&self, path: &str) -> PipelineResult<ImageInfo> {
        match self.get(path)? {
            Stored::Image { info, .. } => Ok(info),
            Stored::Vector(_) => Err(PipelineError::KindMismatch {
                expected: "image",
                actual: "vector",
            }),
        }
    }

    fn read_image(&self, path: &str) -> PipelineResult<Vec<f32>> {
        match self.get(path)? {
            Stored::Image { pixels, .. } => Ok(pixels),
            Stored::Vector(_) => Err(PipelineError::KindMismatch {
                expected: "image",
                actual: "vector",
            }),
        }
    }

    fn write_image(&self, path: &str, info: &ImageInfo, pixels: &[f32]) -> PipelineResult<()> {
        if pixels.len() != info.sample_count() {
            return Err(PipelineError::io(
                path,
                format!("expected {} samples, got {}", info.sample_count(), pixels.len()),
            ));
        }
        self.put(
            path,
            Stored::Image {
                info: *info,
                pixels: pixels.to_vec(),
            },
        );
        Ok(())
    }

    fn read_vector_data(&self, path: &str) -> PipelineResult<Vec<Feature>> {
        match self.get(path)? {
            Stored::Vector(features) => Ok(features),
            Stored::Image { .. } => Err(PipelineError::KindMismatch {
                expected: "vector",
                actual: "image",
            }),
        }
    }

    fn write_vector_data(&self, path: &str, features: &[Feature]) -> PipelineResult<()> {
        self.put(path, Stored::Vector(features.to_vec()));
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.entries.read().contains_key(path)
    }
}
