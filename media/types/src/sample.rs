/*!
    Per-sample metadata.
*/

use bitflags::bitflags;

bitflags! {
    /**
        Flags attached to a sample.

        Sources report `SYNC` for key frames; sinks additionally receive
        `END_OF_STREAM` on the zero-length marker that closes a track.
    */
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SampleFlags: u32 {
        const SYNC = 1 << 0;
        const END_OF_STREAM = 1 << 2;
    }
}

/**
    Metadata describing the valid region of a sample buffer.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleInfo {
    /// Byte offset of the payload within the buffer.
    pub offset: usize,
    /// Payload size in bytes.
    pub size: usize,
    /// Presentation timestamp in microseconds since track start.
    pub pts_us: i64,
    pub flags: SampleFlags,
}

impl SampleInfo {
    pub const fn new(offset: usize, size: usize, pts_us: i64, flags: SampleFlags) -> Self {
        Self {
            offset,
            size,
            pts_us,
            flags,
        }
    }

    /**
        Metadata for the zero-length end-of-stream marker.
    */
    pub const fn end_of_stream() -> Self {
        Self::new(0, 0, 0, SampleFlags::END_OF_STREAM)
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.flags.contains(SampleFlags::END_OF_STREAM)
    }

    pub fn is_sync(&self) -> bool {
        self.flags.contains(SampleFlags::SYNC)
    }
}
