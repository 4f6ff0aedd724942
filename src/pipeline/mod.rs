pub mod data;
pub mod process;
pub mod reader;
pub mod release;

pub use data::{
    DataContent, DataHandle, DataId, DataInfo, DataKind, DataObject, Feature, ImageInfo, PixelType,
};
pub use process::{Filter, ProcessObject, UnaryFunctor};
pub use reader::{ImageFileReader, VectorFileReader};
pub use release::{collect_upstream, release_upstream};
