//! Shared enums for media classification.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Media kind of a fileset.
///
/// The `*Stream` kinds store byte-range segments inside one shared file per
/// chapter; the plain kinds store one discrete file per chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Audio,
    AudioDrama,
    AudioStream,
    AudioDramaStream,
}

impl MediaKind {
    /// Whether this kind carries byte-range stream segments.
    pub fn is_stream(self) -> bool {
        matches!(self, Self::AudioStream | Self::AudioDramaStream)
    }

    /// Top-level storage directory for this kind's files.
    pub fn content_kind(self) -> &'static str {
        "audio"
    }
}

impl FromStr for MediaKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(Self::Audio),
            "audio_drama" => Ok(Self::AudioDrama),
            "audio_stream" => Ok(Self::AudioStream),
            "audio_drama_stream" => Ok(Self::AudioDramaStream),
            other => Err(Error::invalid_input(format!("unknown media kind: {other}"))),
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Audio => "audio",
            Self::AudioDrama => "audio_drama",
            Self::AudioStream => "audio_stream",
            Self::AudioDramaStream => "audio_drama_stream",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_roundtrip() {
        for kind in [
            MediaKind::Audio,
            MediaKind::AudioDrama,
            MediaKind::AudioStream,
            MediaKind::AudioDramaStream,
        ] {
            let parsed: MediaKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_media_kind_is_stream() {
        assert!(!MediaKind::Audio.is_stream());
        assert!(!MediaKind::AudioDrama.is_stream());
        assert!(MediaKind::AudioStream.is_stream());
        assert!(MediaKind::AudioDramaStream.is_stream());
    }

    #[test]
    fn test_media_kind_unknown() {
        assert!("video_stream".parse::<MediaKind>().is_err());
    }
}
