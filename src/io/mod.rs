//! Format readers and writers.
//!
//! Applications never touch files directly: every image or vector dataset is
//! read and written through a [`DataIo`]. [`MemoryIo`] keeps everything in a
//! map keyed by path; [`JsonFileIo`] stores one JSON document per path.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileIo;
pub use memory::MemoryIo;

use crate::error::PipelineResult;
use crate::pipeline::{Feature, ImageInfo};

pub trait DataIo: Send + Sync {
    fn read_image_info(&self, path: &str) -> PipelineResult<ImageInfo>;

    fn read_image(&self, path: &str) -> PipelineResult<Vec<f32>>;

    fn write_image(&self, path: &str, info: &ImageInfo, pixels: &[f32]) -> PipelineResult<()>;

    fn read_vector_data(&self, path: &str) -> PipelineResult<Vec<Feature>>;

    fn write_vector_data(&self, path: &str, features: &[Feature]) -> PipelineResult<()>;

    fn exists(&self, path: &str) -> bool;
}
