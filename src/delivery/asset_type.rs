//! Asset-type codes reported by the delivery endpoint.

use serde::{Deserialize, Serialize};

/// Numeric asset-type code carried by the `roblox-assettypeid` header.
///
/// Only the types whose file extension matters for saving are named; anything
/// else is preserved as [`AssetType::Other`] so the code survives a manifest
/// round-trip untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum AssetType {
    /// Bitmap image (code 1).
    Image,
    /// Audio track (code 3).
    Audio,
    /// Triangle mesh (code 4).
    Mesh,
    /// Lua source (code 5).
    Lua,
    /// Place file (code 9).
    Place,
    /// Model file (code 10).
    Model,
    /// Decal (code 13).
    Decal,
    /// Animation (code 24).
    Animation,
    /// Plugin (code 38).
    Plugin,
    /// Mesh part (code 40).
    MeshPart,
    /// Any other code the endpoint may report.
    Other(i32),
}

impl AssetType {
    /// Returns the numeric code as reported by the endpoint.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Image => 1,
            Self::Audio => 3,
            Self::Mesh => 4,
            Self::Lua => 5,
            Self::Place => 9,
            Self::Model => 10,
            Self::Decal => 13,
            Self::Animation => 24,
            Self::Plugin => 38,
            Self::MeshPart => 40,
            Self::Other(code) => code,
        }
    }

    /// Returns the save extension used when the output extension is `Auto`.
    ///
    /// `None` means the file is written without an extension.
    #[must_use]
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Self::Image | Self::Decal => Some("png"),
            Self::Audio => Some("ogg"),
            Self::Mesh | Self::MeshPart => Some("mesh"),
            Self::Lua => Some("lua"),
            Self::Place => Some("rbxl"),
            Self::Model | Self::Animation | Self::Plugin => Some("rbxm"),
            Self::Other(_) => None,
        }
    }
}

impl From<i32> for AssetType {
    fn from(code: i32) -> Self {
        match code {
            1 => Self::Image,
            3 => Self::Audio,
            4 => Self::Mesh,
            5 => Self::Lua,
            9 => Self::Place,
            10 => Self::Model,
            13 => Self::Decal,
            24 => Self::Animation,
            38 => Self::Plugin,
            40 => Self::MeshPart,
            other => Self::Other(other),
        }
    }
}

impl From<AssetType> for i32 {
    fn from(asset_type: AssetType) -> Self {
        asset_type.code()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_roundtrip() {
        for code in [1, 3, 4, 5, 9, 10, 13, 24, 38, 40] {
            let asset_type = AssetType::from(code);
            assert_eq!(asset_type.code(), code);
            assert!(!matches!(asset_type, AssetType::Other(_)));
        }
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        let asset_type = AssetType::from(77);
        assert_eq!(asset_type, AssetType::Other(77));
        assert_eq!(asset_type.code(), 77);
        assert_eq!(asset_type.extension(), None);
    }

    #[test]
    fn test_extensions_for_save() {
        assert_eq!(AssetType::Place.extension(), Some("rbxl"));
        assert_eq!(AssetType::Model.extension(), Some("rbxm"));
        assert_eq!(AssetType::Image.extension(), Some("png"));
        assert_eq!(AssetType::Audio.extension(), Some("ogg"));
    }

    #[test]
    fn test_serde_uses_numeric_code() {
        let json = serde_json::to_string(&AssetType::Place).unwrap();
        assert_eq!(json, "9");
        let parsed: AssetType = serde_json::from_str("10").unwrap();
        assert_eq!(parsed, AssetType::Model);
    }
}
