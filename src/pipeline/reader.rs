use std::sync::Arc;

use crate::error::PipelineResult;
use crate::io::DataIo;

use super::data::{DataContent, DataHandle, DataInfo, DataKind};
use super::process::{Filter, ProcessObject};

/// Source filter reading an image through a [`DataIo`].
pub struct ImageFileReader {
    io: Arc<dyn DataIo>,
    path: String,
}

impl ImageFileReader {
    /// Data object whose content is read from `path` on first update.
    pub fn open(io: Arc<dyn DataIo>, path: impl Into<String>) -> DataHandle {
        let path = path.into();
        let name = format!("read image {}", path);
        ProcessObject::spawn(name, Vec::new(), ImageFileReader { io, path })
    }
}

impl Filter for ImageFileReader {
    fn output_information(&self, _inputs: &[DataHandle]) -> PipelineResult<DataInfo> {
        Ok(DataInfo::Image(self.io.read_image_info(&self.path)?))
    }

    fn generate(&self, _inputs: &[DataHandle], _process: &ProcessObject) -> PipelineResult<DataContent> {
        Ok(DataContent::Pixels(self.io.read_image(&self.path)?))
    }
}

/// Source filter reading vector data through a [`DataIo`].
pub struct VectorFileReader {
    io: Arc<dyn DataIo>,
    path: String,
}

impl VectorFileReader {
    pub fn open(io: Arc<dyn DataIo>, path: impl Into<String>) -> DataHandle {
        let path = path.into();
        let name = format!("read vector {}", path);
        ProcessObject::spawn(name, Vec::new(), VectorFileReader { io, path })
    }
}

impl Filter for VectorFileReader {
    fn output_kind(&self) -> DataKind {
        DataKind::VectorData
    }

    fn output_information(&self, _inputs: &[DataHandle]) -> PipelineResult<DataInfo> {
        let features = self.io.read_vector_data(&self.path)?;
        Ok(DataInfo::VectorData {
            feature_count: features.len(),
        })
    }

    fn generate(&self, _inputs: &[DataHandle], _process: &ProcessObject) -> PipelineResult<DataContent> {
        Ok(DataContent::Features(self.io.read_vector_data(&self.path)?))
    }
}
