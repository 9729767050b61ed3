/*!
    Track slots and output format descriptors.
*/

use std::fmt;

/**
    Semantic kind of an elementary stream.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Audio,
}

/**
    A logical output track in the multiplexer.

    Each slot is owned by exactly one track transcoder and must have its
    output format declared (present or absent) exactly once.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackSlot {
    Video,
    Audio,
}

impl TrackSlot {
    /// Every slot, in the order formats are declared and tracks are added.
    pub const ALL: [TrackSlot; 2] = [TrackSlot::Video, TrackSlot::Audio];

    /**
        Returns the media kind carried by this slot.
    */
    pub const fn kind(self) -> MediaKind {
        match self {
            Self::Video => MediaKind::Video,
            Self::Audio => MediaKind::Audio,
        }
    }

    /**
        Returns the position of this slot within [`TrackSlot::ALL`].
    */
    pub const fn index(self) -> usize {
        match self {
            Self::Video => 0,
            Self::Audio => 1,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for TrackSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/**
    Compressed codecs a pass-through track may carry.

    The payload is never inspected, so this only needs to be precise enough
    for track selection and for the container writer.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CodecId {
    H264,
    H265,
    Vp8,
    Vp9,
    Av1,
    Aac,
    Opus,
    Mp3,
    Flac,
    Vorbis,
}

impl CodecId {
    /**
        Returns the media kind this codec encodes.
    */
    pub const fn kind(self) -> MediaKind {
        match self {
            Self::H264 | Self::H265 | Self::Vp8 | Self::Vp9 | Self::Av1 => MediaKind::Video,
            Self::Aac | Self::Opus | Self::Mp3 | Self::Flac | Self::Vorbis => MediaKind::Audio,
        }
    }

    pub const fn is_video(self) -> bool {
        matches!(self.kind(), MediaKind::Video)
    }

    pub const fn is_audio(self) -> bool {
        matches!(self.kind(), MediaKind::Audio)
    }
}

/**
    Parameters specific to a video stream.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct VideoParams {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

/**
    Parameters specific to an audio stream.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct AudioParams {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of channels.
    pub channels: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StreamParams {
    Video(VideoParams),
    Audio(AudioParams),
}

/**
    Codec parameters of a source track.

    Pass-through tracks copy this verbatim from the source to the sink; it is
    otherwise opaque to the transcoding layer.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct OutputFormat {
    /// Codec used.
    pub codec_id: CodecId,
    /// Kind-specific stream parameters.
    pub params: StreamParams,
    /// Largest sample the track may contain, in bytes.
    pub max_input_size: Option<usize>,
    /// Track duration in microseconds (may be unavailable).
    pub duration_us: Option<i64>,
}

impl OutputFormat {
    /**
        Create a video format with no optional fields set.
    */
    pub fn video(codec_id: CodecId, width: u32, height: u32) -> Self {
        Self {
            codec_id,
            params: StreamParams::Video(VideoParams { width, height }),
            max_input_size: None,
            duration_us: None,
        }
    }

    /**
        Create an audio format with no optional fields set.
    */
    pub fn audio(codec_id: CodecId, sample_rate: u32, channels: u16) -> Self {
        Self {
            codec_id,
            params: StreamParams::Audio(AudioParams {
                sample_rate,
                channels,
            }),
            max_input_size: None,
            duration_us: None,
        }
    }

    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = Some(size);
        self
    }

    pub fn with_duration_us(mut self, duration_us: i64) -> Self {
        self.duration_us = Some(duration_us);
        self
    }

    /**
        Returns the media kind of this format, taken from its codec.
    */
    pub fn kind(&self) -> MediaKind {
        self.codec_id.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_kind() {
        assert!(CodecId::H264.is_video());
        assert!(CodecId::Av1.is_video());
        assert!(CodecId::Aac.is_audio());
        assert!(!CodecId::Opus.is_video());
    }

    #[test]
    fn slot_order_matches_index() {
        for (i, slot) in TrackSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
        assert_eq!(TrackSlot::Audio.kind(), MediaKind::Audio);
    }

    #[test]
    fn format_builders() {
        let format = OutputFormat::video(CodecId::H264, 1920, 1080)
            .with_max_input_size(65536)
            .with_duration_us(10_000_000);

        assert_eq!(format.kind(), MediaKind::Video);
        assert_eq!(format.max_input_size, Some(65536));
        assert_eq!(format.duration_us, Some(10_000_000));
        assert!(matches!(
            format.params,
            StreamParams::Video(VideoParams { width: 1920, .. })
        ));
    }
}
