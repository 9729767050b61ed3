/*!
    Sample sinks and queued muxing for the pass-through transcoding crates.

    A [`SampleSink`] accepts one output format declaration per track slot and
    then the samples for those slots. [`QueuedMuxer`] is the sink used by the
    transcoding engine: a container cannot be started until every track is
    known, so it holds samples back until both slots have declared a format
    (or declared themselves absent), then hands everything to a [`MuxWriter`]
    in arrival order.
*/

pub use media_types::{Error, OutputFormat, Result, SampleBuffer, SampleInfo, TrackSlot};

mod queued;
mod sink;
mod writer;

pub use queued::QueuedMuxer;
pub use sink::SampleSink;
pub use writer::{MemoryWriter, MuxWriter, WrittenSample, WrittenTrack};
