// -- submodules
mod dataset_utils;
mod walker;

pub use dataset_utils::is_image_file;
pub use walker::{DatasetWalker, Samples};

// -- external imports
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum::{Display, EnumString, VariantNames};

use crate::label::Label;

// -- enums

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, Deserialize, VariantNames)]
/// Which files inside a class directory count as samples
pub enum FileFilter {
    /// Only .png/.jpg/.jpeg files (case-insensitive)
    #[strum(serialize = "Images")]
    Images,

    /// Every regular file
    #[strum(serialize = "AnyFile")]
    AnyFile,
}

impl Default for FileFilter {
    fn default() -> Self {
        FileFilter::Images
    }
}

impl FileFilter {
    pub fn accepts(self, path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }
        match self {
            FileFilter::Images => is_image_file(path),
            FileFilter::AnyFile => true,
        }
    }
}

/// Custom deserializer with helpful error message
pub fn deserialize_file_filter<'de, D>(deserializer: D) -> Result<FileFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    FileFilter::from_str(&value).map_err(|_| {
        let variants = FileFilter::VARIANTS;
        serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&value),
            &format!("one of {}", variants.join(", ")).as_str(),
        )
    })
}

// -- structs

/// One image under evaluation together with its ground-truth label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub path: PathBuf,
    pub label: Label,
}

impl Sample {
    /// File name used in log lines and multipart uploads.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetArgs {
    /// Directory containing the `normal/` and `nsfw/` class folders
    pub root: PathBuf,

    /// Maximum number of samples drawn from each class
    pub max_per_class: usize,

    /// Which files count as samples
    #[serde(default, deserialize_with = "deserialize_file_filter")]
    pub file_filter: FileFilter,
}

impl Default for DatasetArgs {
    fn default() -> Self {
        Self {
            root: PathBuf::from("dataset"),
            max_per_class: 1000,
            file_filter: FileFilter::default(),
        }
    }
}
