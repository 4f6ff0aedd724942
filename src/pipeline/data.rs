use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{PipelineError, PipelineResult};

use super::process::ProcessObject;

static NEXT_DATA_ID: AtomicU64 = AtomicU64::new(1);

pub type DataHandle = Arc<DataObject>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataId(u64);

impl DataId {
    fn next() -> Self {
        DataId(NEXT_DATA_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Image,
    VectorData,
    List,
}

impl DataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Image => "image",
            DataKind::VectorData => "vector",
            DataKind::List => "list",
        }
    }
}

// ================================
// Metadata
// ================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelType {
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    #[default]
    Float32,
    Float64,
}

impl PixelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PixelType::UInt8 => "uint8",
            PixelType::Int16 => "int16",
            PixelType::UInt16 => "uint16",
            PixelType::Int32 => "int32",
            PixelType::UInt32 => "uint32",
            PixelType::Float32 => "float",
            PixelType::Float64 => "double",
        }
    }
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PixelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uint8" => Ok(PixelType::UInt8),
            "int16" => Ok(PixelType::Int16),
            "uint16" => Ok(PixelType::UInt16),
            "int32" => Ok(PixelType::Int32),
            "uint32" => Ok(PixelType::UInt32),
            "float" | "float32" => Ok(PixelType::Float32),
            "double" | "float64" => Ok(PixelType::Float64),
            other => Err(format!("unknown pixel type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: usize,
    pub height: usize,
    pub bands: usize,
    #[serde(default)]
    pub pixel_type: PixelType,
}

impl ImageInfo {
    pub fn new(width: usize, height: usize, bands: usize) -> Self {
        ImageInfo {
            width,
            height,
            bands,
            pixel_type: PixelType::default(),
        }
    }

    pub fn sample_count(&self) -> usize {
        self.width * self.height * self.bands
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: Vec<[f64; 2]>,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataInfo {
    Image(ImageInfo),
    VectorData { feature_count: usize },
    List { len: usize },
}

#[derive(Debug, Clone)]
pub enum DataContent {
    Empty,
    Pixels(Vec<f32>),
    Features(Vec<Feature>),
    Items(Vec<DataHandle>),
}

// ================================
// DataObject
// ================================

/// A buffer flowing through a pipeline. Metadata and content are tracked
/// separately so the content can be released and regenerated by the
/// producer while the metadata stays valid.
pub struct DataObject {
    id: DataId,
    kind: DataKind,
    info: RwLock<Option<DataInfo>>,
    content: RwLock<DataContent>,
    producer: Option<Arc<ProcessObject>>,
    releases: AtomicUsize,
}

impl DataObject {
    fn build(
        kind: DataKind,
        info: Option<DataInfo>,
        content: DataContent,
        producer: Option<Arc<ProcessObject>>,
    ) -> DataHandle {
        Arc::new(DataObject {
            id: DataId::next(),
            kind,
            info: RwLock::new(info),
            content: RwLock::new(content),
            producer,
            releases: AtomicUsize::new(0),
        })
    }

    /// Caller-supplied image with no producer.
    pub fn image(info: ImageInfo, pixels: Vec<f32>) -> DataHandle {
        Self::build(
            DataKind::Image,
            Some(DataInfo::Image(info)),
            DataContent::Pixels(pixels),
            None,
        )
    }

    /// Caller-supplied vector dataset with no producer.
    pub fn vector_data(features: Vec<Feature>) -> DataHandle {
        Self::build(
            DataKind::VectorData,
            Some(DataInfo::VectorData {
                feature_count: features.len(),
            }),
            DataContent::Features(features),
            None,
        )
    }

    /// Homogeneous container of data objects, used as a single filter input.
    pub fn list(items: Vec<DataHandle>) -> DataHandle {
        Self::build(
            DataKind::List,
            Some(DataInfo::List { len: items.len() }),
            DataContent::Items(items),
            None,
        )
    }

    pub(crate) fn produced(kind: DataKind, producer: Arc<ProcessObject>) -> DataHandle {
        Self::build(kind, None, DataContent::Empty, Some(producer))
    }

    pub fn id(&self) -> DataId {
        self.id
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    pub fn producer(&self) -> Option<&Arc<ProcessObject>> {
        self.producer.as_ref()
    }

    pub fn info(&self) -> Option<DataInfo> {
        self.info.read().clone()
    }

    pub fn items(&self) -> Vec<DataHandle> {
        match &*self.content.read() {
            DataContent::Items(items) => items.clone(),
            _ => Vec::new(),
        }
    }

    pub fn has_content(&self) -> bool {
        !matches!(*self.content.read(), DataContent::Empty)
    }

    pub(crate) fn set_info(&self, info: DataInfo) {
        *self.info.write() = Some(info);
    }

    pub(crate) fn set_content(&self, content: DataContent) {
        *self.content.write() = content;
    }

    /// Compute metadata without generating content.
    pub fn update_output_information(&self) -> PipelineResult<DataInfo> {
        if self.kind == DataKind::List {
            for item in self.items() {
                item.update_output_information()?;
            }
        }
        if let Some(info) = self.info() {
            return Ok(info);
        }
        let producer = self.producer.as_ref().ok_or(PipelineError::NoSource(self.id.0))?;
        producer.update_output_information()?;
        self.info().ok_or(PipelineError::NoSource(self.id.0))
    }

    /// Make sure the content is present, regenerating it upstream if needed.
    pub fn update(&self) -> PipelineResult<()> {
        if self.kind == DataKind::List {
            for item in self.items() {
                item.update()?;
            }
            return Ok(());
        }
        if self.has_content() {
            return Ok(());
        }
        let producer = self.producer.as_ref().ok_or(PipelineError::NoSource(self.id.0))?;
        producer.update()
    }

    pub fn image_info(&self) -> PipelineResult<ImageInfo> {
        match self.update_output_information()? {
            DataInfo::Image(info) => Ok(info),
            _ => Err(PipelineError::KindMismatch {
                expected: DataKind::Image.as_str(),
                actual: self.kind.as_str(),
            }),
        }
    }

    pub fn pixels(&self) -> PipelineResult<Vec<f32>> {
        self.update()?;
        match &*self.content.read() {
            DataContent::Pixels(p) => Ok(p.clone()),
            _ => Err(PipelineError::KindMismatch {
                expected: DataKind::Image.as_str(),
                actual: self.kind.as_str(),
            }),
        }
    }

    pub fn features(&self) -> PipelineResult<Vec<Feature>> {
        self.update()?;
        match &*self.content.read() {
            DataContent::Features(f) => Ok(f.clone()),
            _ => Err(PipelineError::KindMismatch {
                expected: DataKind::VectorData.as_str(),
                actual: self.kind.as_str(),
            }),
        }
    }

    /// Drop the buffered content, keeping metadata. Containers are left
    /// untouched. Returns whether anything was dropped.
    pub fn release_data(&self) -> bool {
        let mut content = self.content.write();
        match *content {
            DataContent::Pixels(_) | DataContent::Features(_) => {
                *content = DataContent::Empty;
                self.releases.fetch_add(1, Ordering::Relaxed);
                true
            }
            DataContent::Empty | DataContent::Items(_) => false,
        }
    }

    /// Number of times the content has been released.
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for DataObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataObject")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("has_content", &self.has_content())
            .field("producer", &self.producer.as_ref().map(|p| p.name().to_string()))
            .finish()
    }
}
