//! Item kind classification
//!
//! Maps filename extensions onto the closed set of kinds used for icons and
//! type filtering.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Kind of a listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Folder,
    Image,
    Video,
    Audio,
    File,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Folder => "folder",
            ItemKind::Image => "image",
            ItemKind::Video => "video",
            ItemKind::Audio => "audio",
            ItemKind::File => "file",
        }
    }

    /// Classifies an entry. Directories are always folders; files go by the
    /// lowercase text after their last dot.
    pub fn classify(name: &str, is_dir: bool) -> Self {
        if is_dir {
            return ItemKind::Folder;
        }

        let lower = name.to_lowercase();
        match lower.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => ItemKind::File,
        }
    }

    /// `ogg` appears in both the video and audio sets; video wins.
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "svg" => ItemKind::Image,
            "mp4" | "webm" | "ogg" | "avi" | "mov" | "mkv" => ItemKind::Video,
            "mp3" | "wav" | "m4a" | "flac" => ItemKind::Audio,
            _ => ItemKind::File,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "folder" => Ok(ItemKind::Folder),
            "image" => Ok(ItemKind::Image),
            "video" => Ok(ItemKind::Video),
            "audio" => Ok(ItemKind::Audio),
            "file" => Ok(ItemKind::File),
            other => Err(format!("unknown item kind: {other}")),
        }
    }
}

/// Kind filter of a catalog query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    All,
    Only(ItemKind),
}

impl KindFilter {
    /// Parses a `type` query value; anything unrecognised means "all".
    pub fn parse(value: &str) -> Self {
        value
            .trim()
            .parse::<ItemKind>()
            .map(KindFilter::Only)
            .unwrap_or(KindFilter::All)
    }

    pub fn matches(self, kind: ItemKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(wanted) => wanted == kind,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KindFilter::All => "all",
            KindFilter::Only(kind) => kind.as_str(),
        }
    }
}
