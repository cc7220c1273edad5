//! Playable catalog items and their feature attributes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Well-known feature attribute keys produced by header parsing.
///
/// The attribute map is open-ended; these are the keys the built-in runners
/// know how to interpret.
pub mod features {
    /// Cartridge mapper / memory bank controller (e.g. `"MBC3"`, `"MMC5"`).
    pub const MAPPER: &str = "Mapper";
    /// Release region (e.g. `"USA"`, `"Japan"`, `"Europe"`).
    pub const REGION: &str = "Region";
    /// Expansion chip on the cartridge board (e.g. `"SuperFX"`, `"SA-1"`).
    pub const EXPANSION_CHIP: &str = "ExpansionChip";
    /// Video standard (`"NTSC"` / `"PAL"`).
    pub const TV_STANDARD: &str = "TvStandard";
    /// Name of a BIOS image the item needs to boot.
    pub const REQUIRED_BIOS: &str = "RequiredBios";
    /// What kind of catalog content this is (`"Application"`, `"Update"`, `"AddOn"`, `"Metadata"`).
    pub const CONTENT_TYPE: &str = "ContentType";
    /// Disc image layout (e.g. `"Multitrack"`, `"Compressed"`).
    pub const DISC_FORMAT: &str = "DiscFormat";
    /// Uncompressed ROM size in bytes.
    pub const ROM_SIZE: &str = "RomSize";
    /// Confirmed match in a shared-hardware emulator's software catalogue.
    pub const SOFTWARE_MATCH: &str = "SoftwareMatch";
    /// Support status recorded in that catalogue (`"yes"`, `"partial"`, `"no"`).
    pub const SOFTWARE_SUPPORT: &str = "SoftwareSupport";
}

/// Physical (or not) medium the item was distributed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MediaType {
    #[default]
    Cartridge,
    Disc,
    Floppy,
    Tape,
    Digital,
    Executable,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Cartridge => "cartridge",
            MediaType::Disc => "disc",
            MediaType::Floppy => "floppy",
            MediaType::Tape => "tape",
            MediaType::Digital => "digital",
            MediaType::Executable => "executable",
        }
    }

}

/// A media type name that is not one of the known kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown media type '{0}'")]
pub struct UnknownMediaType(pub String);

impl FromStr for MediaType {
    type Err = UnknownMediaType;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cartridge" => Ok(MediaType::Cartridge),
            "disc" => Ok(MediaType::Disc),
            "floppy" => Ok(MediaType::Floppy),
            "tape" => Ok(MediaType::Tape),
            "digital" => Ok(MediaType::Digital),
            "executable" => Ok(MediaType::Executable),
            _ => Err(UnknownMediaType(s.to_string())),
        }
    }
}

/// Value of one feature attribute.
///
/// Serialized with an explicit `type` tag so that a path and a plain string
/// stay distinct after a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FeatureValue {
    Flag(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
    Path(PathBuf),
}

impl FeatureValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FeatureValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FeatureValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FeatureValue::List(l) => Some(l),
            _ => None,
        }
    }

    /// The value as a filesystem path. Text values are read as paths too.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            FeatureValue::Path(p) => Some(p),
            FeatureValue::Text(s) => Some(Path::new(s)),
            _ => None,
        }
    }

    /// Parse a value from loose text, as given on a command line.
    ///
    /// `true`/`false` become flags, integers become ints, comma-separated text
    /// becomes a list, anything else stays text.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => return FeatureValue::Flag(true),
            "false" => return FeatureValue::Flag(false),
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return FeatureValue::Int(i);
        }
        if raw.contains(',') {
            return FeatureValue::List(raw.split(',').map(|s| s.trim().to_string()).collect());
        }
        FeatureValue::Text(raw.to_string())
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Flag(b) => write!(f, "{}", b),
            FeatureValue::Int(i) => write!(f, "{}", i),
            FeatureValue::Text(s) => f.write_str(s),
            FeatureValue::List(l) => f.write_str(&l.join(",")),
            FeatureValue::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Archive an item lives inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// Archive format without the dot (e.g. `"zip"`, `"7z"`)
    pub kind: String,
    /// Member file name inside the archive
    pub entry: String,
}

/// One catalog entry that might be launched.
///
/// Built by the scanner and metadata extractors; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayableItem {
    /// Catalog path (the archive itself, for archived items)
    pub path: PathBuf,
    /// Platform identifier the item was catalogued under (e.g. `"nes"`)
    pub platform: String,
    /// Lowercase extension of the playable file, without the dot
    pub extension: String,
    #[serde(default)]
    pub media: MediaType,
    /// Whether the item is a directory (installed game, extracted disc, ...)
    #[serde(default)]
    pub is_folder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,
    #[serde(default)]
    pub features: BTreeMap<String, FeatureValue>,
}

impl PlayableItem {
    /// Create a file item, taking the extension from the path.
    pub fn new(path: impl AsRef<Path>, platform: impl Into<String>) -> Self {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        Self {
            path: path.to_path_buf(),
            platform: platform.into(),
            extension,
            media: MediaType::default(),
            is_folder: false,
            container: None,
            features: BTreeMap::new(),
        }
    }

    /// Create a folder item.
    pub fn folder(path: impl AsRef<Path>, platform: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            platform: platform.into(),
            extension: String::new(),
            media: MediaType::Digital,
            is_folder: true,
            container: None,
            features: BTreeMap::new(),
        }
    }

    /// Set the media type.
    pub fn media(mut self, media: MediaType) -> Self {
        self.media = media;
        self
    }

    /// Mark the item as living inside an archive.
    ///
    /// The extension is re-derived from the archive member.
    pub fn in_container(mut self, kind: impl Into<String>, entry: impl Into<String>) -> Self {
        let entry = entry.into();
        if let Some(ext) = Path::new(&entry).extension().and_then(|e| e.to_str()) {
            self.extension = ext.to_ascii_lowercase();
        }
        self.container = Some(Container {
            kind: kind.into(),
            entry,
        });
        self
    }

    /// Attach a feature attribute.
    pub fn feature(mut self, key: impl Into<String>, value: FeatureValue) -> Self {
        self.features.insert(key.into(), value);
        self
    }

    /// Attach a text feature attribute.
    pub fn text_feature(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.feature(key, FeatureValue::Text(value.into()))
    }

    pub fn get_feature(&self, key: &str) -> Option<&FeatureValue> {
        self.features.get(key)
    }

    /// Text value of a feature, if present and textual.
    pub fn feature_text(&self, key: &str) -> Option<&str> {
        self.features.get(key).and_then(FeatureValue::as_text)
    }

    /// Path value of a feature, given either as a path or as text.
    pub fn feature_path(&self, key: &str) -> Option<&Path> {
        self.features.get(key).and_then(FeatureValue::as_path)
    }

    /// File name used for display and scratch extraction.
    pub fn file_name(&self) -> String {
        match &self.container {
            Some(container) => container.entry.clone(),
            None => self
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_lowercase_extension() {
        let item = PlayableItem::new("/roms/Zelda.NES", "nes");
        assert_eq!(item.extension, "nes");
        assert!(!item.is_folder);
        assert_eq!(item.platform, "nes");
    }

    #[test]
    fn test_new_without_extension() {
        let item = PlayableItem::new("/roms/README", "nes");
        assert_eq!(item.extension, "");
    }

    #[test]
    fn test_folder_item() {
        let item = PlayableItem::folder("/games/doom", "dos");
        assert!(item.is_folder);
        assert_eq!(item.media, MediaType::Digital);
        assert_eq!(item.file_name(), "doom");
    }

    #[test]
    fn test_in_container_takes_member_extension() {
        let item = PlayableItem::new("/roms/pack.zip", "gb").in_container("zip", "Tetris.gb");
        assert_eq!(item.extension, "gb");
        assert_eq!(item.file_name(), "Tetris.gb");
        assert_eq!(item.container.as_ref().unwrap().kind, "zip");
    }

    #[test]
    fn test_feature_lookup() {
        let item = PlayableItem::new("game.gb", "gb")
            .text_feature(features::MAPPER, "MBC3")
            .feature(features::ROM_SIZE, FeatureValue::Int(1 << 20));

        assert_eq!(item.feature_text(features::MAPPER), Some("MBC3"));
        assert_eq!(
            item.get_feature(features::ROM_SIZE).and_then(FeatureValue::as_int),
            Some(1 << 20)
        );
        assert_eq!(item.feature_text(features::REGION), None);
    }

    #[test]
    fn test_feature_value_parse() {
        assert_eq!(FeatureValue::parse("true"), FeatureValue::Flag(true));
        assert_eq!(FeatureValue::parse("42"), FeatureValue::Int(42));
        assert_eq!(
            FeatureValue::parse("a, b"),
            FeatureValue::List(vec!["a".into(), "b".into()])
        );
        assert_eq!(FeatureValue::parse("MBC1"), FeatureValue::Text("MBC1".into()));
    }

    #[test]
    fn test_media_type_str_roundtrip() {
        for media in [
            MediaType::Cartridge,
            MediaType::Disc,
            MediaType::Floppy,
            MediaType::Tape,
            MediaType::Digital,
            MediaType::Executable,
        ] {
            assert_eq!(media.as_str().parse::<MediaType>(), Ok(media));
        }
        assert_eq!("Disc".parse::<MediaType>(), Ok(MediaType::Disc));
        assert_eq!(
            "laserdisc".parse::<MediaType>(),
            Err(UnknownMediaType("laserdisc".into()))
        );
    }

    #[test]
    fn test_feature_path_accepts_text_and_path() {
        let item = PlayableItem::new("ff7.chd", "psx")
            .feature(features::REQUIRED_BIOS, FeatureValue::Path("bios/scph5501.bin".into()))
            .text_feature("Firmware", "fw.bin")
            .feature(features::ROM_SIZE, FeatureValue::Int(4));

        assert_eq!(
            item.feature_path(features::REQUIRED_BIOS),
            Some(Path::new("bios/scph5501.bin"))
        );
        assert_eq!(item.feature_path("Firmware"), Some(Path::new("fw.bin")));
        assert_eq!(item.feature_path(features::ROM_SIZE), None);
        assert_eq!(item.feature_text(features::REQUIRED_BIOS), None);
    }

    #[test]
    fn test_feature_value_serde_keeps_variant() {
        let path = FeatureValue::Path("/bios/scph5501.bin".into());
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json["type"], "path");
        let back: FeatureValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, path);

        let item = PlayableItem::new("/roms/ff7.chd", "psx")
            .feature(features::REQUIRED_BIOS, path)
            .text_feature(features::REGION, "/usa")
            .feature(features::ROM_SIZE, FeatureValue::Int(700))
            .feature("Multi", FeatureValue::List(vec!["a".into(), "b".into()]))
            .feature("Verified", FeatureValue::Flag(true));
        let text = serde_json::to_string(&item).unwrap();
        let back: PlayableItem = serde_json::from_str(&text).unwrap();
        assert_eq!(back, item);
    }
}
