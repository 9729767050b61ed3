/*!
    Shared types for the pass-through transcoding crates.

    This crate defines the vocabulary that crosses crate boundaries: output
    track slots, codec descriptors, per-sample metadata, the reusable sample
    buffer, and the common error type. Sources, sinks, and transcoders all
    speak in these types, so none of them needs to depend on another.
*/

mod buffer;
mod error;
mod format;
mod sample;

pub use self::buffer::SampleBuffer;
pub use self::error::{Error, Result};
pub use self::format::{
    AudioParams, CodecId, MediaKind, OutputFormat, StreamParams, TrackSlot, VideoParams,
};
pub use self::sample::{SampleFlags, SampleInfo};
