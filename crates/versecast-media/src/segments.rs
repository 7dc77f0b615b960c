//! Uniform segment-list shapes.
//!
//! The catalog stores two incompatible segment representations: discrete
//! per-file segments (plain audio chapters, TS children) and byte-range
//! slices inside one shared file. The source layer resolves each fileset
//! into exactly one of these shapes; downstream code matches on the tagged
//! union once per group.

use versecast_common::paths;

/// A whole referenced file as one playable segment.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteSegment {
    pub duration_secs: f64,
    pub file_name: String,
}

/// A byte slice of one shared file, optionally carrying a verse timestamp.
///
/// `verse_end` of `None` on a timestamped segment means "same as
/// `verse_start`".
#[derive(Debug, Clone, PartialEq)]
pub struct ByteRangeSegment {
    pub duration_secs: f64,
    pub byte_length: u64,
    pub byte_offset: u64,
    pub file_name: String,
    pub verse_start: Option<u32>,
    pub verse_end: Option<u32>,
}

impl ByteRangeSegment {
    /// An empty lead-in placeholder covering the implicit "verse 0" of a
    /// file whose first timestamp starts past zero.
    pub fn placeholder(file_name: &str) -> Self {
        Self {
            duration_secs: 0.0,
            byte_length: 0,
            byte_offset: 0,
            file_name: file_name.to_string(),
            verse_start: Some(0),
            verse_end: None,
        }
    }
}

/// Which of the two segment shapes a group carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Discrete,
    ByteRange,
}

/// One fileset's segments in whichever shape the underlying data provides.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentList {
    Discrete(Vec<DiscreteSegment>),
    ByteRange(Vec<ByteRangeSegment>),
}

impl SegmentList {
    pub fn kind(&self) -> GroupKind {
        match self {
            Self::Discrete(_) => GroupKind::Discrete,
            Self::ByteRange(_) => GroupKind::ByteRange,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Discrete(v) => v.len(),
            Self::ByteRange(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An ordered segment list from one source recording, ready for assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentGroup {
    /// Item identifier rendered into `#EXTINF` titles on multi-item
    /// assemblies.
    pub label: Option<String>,
    /// Logical storage directory of this group's files. `None` when the
    /// fileset has no resolvable asset association; such a group's segments
    /// are dropped from the manifest instead of failing the request.
    pub prefix: Option<String>,
    pub segments: SegmentList,
}

impl SegmentGroup {
    pub fn kind(&self) -> GroupKind {
        self.segments.kind()
    }

    /// Logical path of the group's first segment file.
    pub fn first_source_path(&self) -> Option<String> {
        let prefix = self.prefix.as_deref()?;
        let name = match &self.segments {
            SegmentList::Discrete(v) => v.first().map(|s| s.file_name.as_str()),
            SegmentList::ByteRange(v) => v.first().map(|s| s.file_name.as_str()),
        }?;
        Some(paths::object_path(prefix, name))
    }

    /// Logical path of the group's last segment file.
    pub fn last_source_path(&self) -> Option<String> {
        let prefix = self.prefix.as_deref()?;
        let name = match &self.segments {
            SegmentList::Discrete(v) => v.last().map(|s| s.file_name.as_str()),
            SegmentList::ByteRange(v) => v.last().map(|s| s.file_name.as_str()),
        }?;
        Some(paths::object_path(prefix, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_list_kind() {
        let discrete = SegmentList::Discrete(vec![]);
        let byte_range = SegmentList::ByteRange(vec![]);
        assert_eq!(discrete.kind(), GroupKind::Discrete);
        assert_eq!(byte_range.kind(), GroupKind::ByteRange);
        assert!(discrete.is_empty());
    }

    #[test]
    fn test_placeholder_is_empty_verse_zero() {
        let p = ByteRangeSegment::placeholder("MAT_1.mp3");
        assert_eq!(p.duration_secs, 0.0);
        assert_eq!(p.byte_length, 0);
        assert_eq!(p.verse_start, Some(0));
        assert_eq!(p.verse_end, None);
    }

    #[test]
    fn test_group_source_paths() {
        let group = SegmentGroup {
            label: None,
            prefix: Some("audio/ENGESV/ENGESVN2DA".to_string()),
            segments: SegmentList::Discrete(vec![
                DiscreteSegment {
                    duration_secs: 180.0,
                    file_name: "MAT_1.mp3".to_string(),
                },
                DiscreteSegment {
                    duration_secs: 180.0,
                    file_name: "MAT_2.mp3".to_string(),
                },
            ]),
        };

        assert_eq!(
            group.first_source_path().unwrap(),
            "audio/ENGESV/ENGESVN2DA/MAT_1.mp3"
        );
        assert_eq!(
            group.last_source_path().unwrap(),
            "audio/ENGESV/ENGESVN2DA/MAT_2.mp3"
        );
    }

    #[test]
    fn test_group_without_prefix_has_no_paths() {
        let group = SegmentGroup {
            label: None,
            prefix: None,
            segments: SegmentList::ByteRange(vec![]),
        };
        assert!(group.first_source_path().is_none());
    }
}
