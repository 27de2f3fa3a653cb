use serde::Deserialize;
use strum::{Display, EnumString, VariantNames};

/// Binary label space shared by the dataset and every endpoint.
///
/// `Nsfw` is the positive class for precision and recall.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, Deserialize, VariantNames,
)]
pub enum Label {
    #[strum(serialize = "normal")]
    #[serde(rename = "normal")]
    Normal,

    #[strum(serialize = "nsfw")]
    #[serde(rename = "nsfw")]
    Nsfw,
}

impl Label {
    /// Class subdirectories in evaluation order.
    pub const ALL: [Label; 2] = [Label::Normal, Label::Nsfw];

    /// Name of the dataset subdirectory holding samples of this class.
    pub fn dir_name(self) -> &'static str {
        match self {
            Label::Normal => "normal",
            Label::Nsfw => "nsfw",
        }
    }

    /// Row/column index inside the confusion matrix.
    pub(crate) fn index(self) -> usize {
        match self {
            Label::Normal => 0,
            Label::Nsfw => 1,
        }
    }
}
