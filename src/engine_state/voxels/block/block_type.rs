//! # Block Label Type
//!
//! Classification of each density sample produced by the stratification pass.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::BlockLabelSize;

/// Enumerates the material classes a density sample can take.
///
/// The discriminants are the persisted representation, so new variants go
/// before `Void`, which is always last and doubles as the label count used by
/// texture blending.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum BlockLabel {
    /// Empty space above the terrain surface.
    #[default]
    Air = 0,

    /// Deep rock below the stone transition.
    Stone = 1,

    /// Topsoil between the stone and dirt transitions.
    Dirt = 2,

    /// The bedrock floor layer at `y == 0`.
    Void = 3,
}

impl BlockLabel {
    /// Returns true when the label contributes solid density.
    pub fn is_solid(self) -> bool {
        !matches!(self, BlockLabel::Air | BlockLabel::Void)
    }

    /// Density sample value for this label: `1.0` for solid labels, `0.0` otherwise.
    pub fn density(self) -> f32 {
        if self.is_solid() {
            1.0
        } else {
            0.0
        }
    }

    /// Converts a stored integer back into a label.
    ///
    /// # Returns
    /// `None` if the value doesn't correspond to a valid `BlockLabel`.
    pub fn from_size(value: BlockLabelSize) -> Option<Self> {
        FromPrimitive::from_u8(value)
    }
}

impl From<BlockLabel> for BlockLabelSize {
    fn from(label: BlockLabel) -> Self {
        label as BlockLabelSize
    }
}

impl TryFrom<BlockLabelSize> for BlockLabel {
    type Error = String;

    fn try_from(value: BlockLabelSize) -> Result<Self, Self::Error> {
        BlockLabel::from_size(value).ok_or_else(|| format!("unknown block label {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_and_void_are_empty() {
        assert_eq!(BlockLabel::Air.density(), 0.0);
        assert_eq!(BlockLabel::Void.density(), 0.0);
        assert_eq!(BlockLabel::Stone.density(), 1.0);
        assert_eq!(BlockLabel::Dirt.density(), 1.0);
    }

    #[test]
    fn test_label_integer_conversion() {
        for label in [
            BlockLabel::Air,
            BlockLabel::Stone,
            BlockLabel::Dirt,
            BlockLabel::Void,
        ] {
            let stored: BlockLabelSize = label.into();
            assert_eq!(BlockLabel::from_size(stored), Some(label));
        }
        assert!(BlockLabel::try_from(42u8).is_err());
    }

    #[test]
    fn test_labels_serialize_as_integers() {
        let json = serde_json::to_string(&vec![BlockLabel::Void, BlockLabel::Dirt]).unwrap();
        assert_eq!(json, "[3,2]");
    }
}
