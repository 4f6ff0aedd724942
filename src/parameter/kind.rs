use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParameterError;

// ================================
// ParameterType: closed set of parameter kinds
// ================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterType {
    Bool,
    Int,
    Float,
    Radius,
    Ram,
    String,
    StringList,
    InputFilename,
    InputFilenameList,
    OutputFilename,
    Directory,
    Choice,
    ListView,
    Band,
    Field,
    InputImage,
    InputImageList,
    OutputImage,
    InputVectorData,
    InputVectorDataList,
    OutputVectorData,
    InputParameterDocument,
    OutputParameterDocument,
    Group,
    Proxy,
}

impl ParameterType {
    pub const ALL: [ParameterType; 25] = [
        ParameterType::Bool,
        ParameterType::Int,
        ParameterType::Float,
        ParameterType::Radius,
        ParameterType::Ram,
        ParameterType::String,
        ParameterType::StringList,
        ParameterType::InputFilename,
        ParameterType::InputFilenameList,
        ParameterType::OutputFilename,
        ParameterType::Directory,
        ParameterType::Choice,
        ParameterType::ListView,
        ParameterType::Band,
        ParameterType::Field,
        ParameterType::InputImage,
        ParameterType::InputImageList,
        ParameterType::OutputImage,
        ParameterType::InputVectorData,
        ParameterType::InputVectorDataList,
        ParameterType::OutputVectorData,
        ParameterType::InputParameterDocument,
        ParameterType::OutputParameterDocument,
        ParameterType::Group,
        ParameterType::Proxy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::Bool => "Bool",
            ParameterType::Int => "Int",
            ParameterType::Float => "Float",
            ParameterType::Radius => "Radius",
            ParameterType::Ram => "Ram",
            ParameterType::String => "String",
            ParameterType::StringList => "StringList",
            ParameterType::InputFilename => "InputFilename",
            ParameterType::InputFilenameList => "InputFilenameList",
            ParameterType::OutputFilename => "OutputFilename",
            ParameterType::Directory => "Directory",
            ParameterType::Choice => "Choice",
            ParameterType::ListView => "ListView",
            ParameterType::Band => "Band",
            ParameterType::Field => "Field",
            ParameterType::InputImage => "InputImage",
            ParameterType::InputImageList => "InputImageList",
            ParameterType::OutputImage => "OutputImage",
            ParameterType::InputVectorData => "InputVectorData",
            ParameterType::InputVectorDataList => "InputVectorDataList",
            ParameterType::OutputVectorData => "OutputVectorData",
            ParameterType::InputParameterDocument => "InputParameterDocument",
            ParameterType::OutputParameterDocument => "OutputParameterDocument",
            ParameterType::Group => "Group",
            ParameterType::Proxy => "Proxy",
        }
    }

    /// Role a freshly created parameter of this kind starts with.
    pub fn default_role(&self) -> Role {
        match self {
            ParameterType::OutputFilename
            | ParameterType::OutputImage
            | ParameterType::OutputVectorData
            | ParameterType::OutputParameterDocument => Role::Output,
            _ => Role::Input,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ParameterType::Int | ParameterType::Radius | ParameterType::Ram
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            ParameterType::StringList
                | ParameterType::InputFilenameList
                | ParameterType::InputImageList
                | ParameterType::InputVectorDataList
        )
    }

    pub fn is_list_view(&self) -> bool {
        matches!(
            self,
            ParameterType::ListView | ParameterType::Band | ParameterType::Field
        )
    }

    /// Kinds that own children addressable through dotted keys.
    pub fn is_container(&self) -> bool {
        matches!(self, ParameterType::Group | ParameterType::Choice)
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterType {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ParameterType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParameterError::UnsupportedKind(wanted.to_string()))
    }
}

/// Direction of a parameter relative to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserLevel {
    #[default]
    Basic,
    Advanced,
}

/// Who is mutating a parameter.
///
/// `User` marks the parameter as carrying a user-provided value;
/// `Application` leaves the user flag untouched so derived defaults never
/// masquerade as user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationOrigin {
    User,
    Application,
}
