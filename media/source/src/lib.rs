/*!
    Demuxed sample sources for the pass-through transcoding crates.

    A [`SampleSource`] exposes one shared read cursor over the interleaved
    samples of a container. Several track transcoders read from it in turn:
    each peeks at the pending track index and only the owner of that track
    reads and advances. [`MemorySource`] is an in-memory implementation, and
    [`TrackSelection`] picks which source tracks feed which output slots.
*/

pub use media_types::{Error, OutputFormat, Result, SampleBuffer, SampleFlags};

mod memory;
mod select;
mod source;

pub use memory::MemorySource;
pub use select::TrackSelection;
pub use source::SampleSource;
