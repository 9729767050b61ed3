/*!
    The sample source contract.
*/

use media_types::{OutputFormat, Result, SampleBuffer, SampleFlags};

/**
    A demultiplexer with a single shared read cursor.

    The cursor always rests on the next sample of a selected track, in decode
    order. Callers inspect it with [`pending_track_index`](Self::pending_track_index),
    [`sample_flags`](Self::sample_flags) and [`sample_time_us`](Self::sample_time_us),
    copy it out with [`read_sample`](Self::read_sample), and move past it with
    [`advance`](Self::advance).

    Implementations are not synchronized. All reads and advances must come
    from one orchestrator thread, serialized between calls, and only the
    transcoder that owns the pending track may advance past its sample.
*/
pub trait SampleSource {
    /**
        Number of tracks in the container.
    */
    fn track_count(&self) -> usize;

    /**
        Codec parameters of a track, copied out of the container.
    */
    fn track_format(&self, track: usize) -> Result<OutputFormat>;

    /**
        Make a track's samples visible through the cursor.

        Samples of unselected tracks are skipped over as if absent.
    */
    fn select_track(&mut self, track: usize) -> Result<()>;

    /**
        Track index of the pending sample, or `None` once every selected
        track is exhausted.
    */
    fn pending_track_index(&self) -> Option<usize>;

    /**
        Copy the pending sample's payload into `buffer`, returning its size.

        Fails with `SampleTooLarge` if the payload does not fit, and with
        `ReadFailed` if the payload cannot be read.
    */
    fn read_sample(&mut self, buffer: &mut SampleBuffer) -> Result<usize>;

    /**
        Flags of the pending sample. Empty if nothing is pending.
    */
    fn sample_flags(&self) -> SampleFlags;

    /**
        Presentation timestamp of the pending sample in microseconds.
    */
    fn sample_time_us(&self) -> Option<i64>;

    /**
        Move past the pending sample. Returns `false` if no sample follows.
    */
    fn advance(&mut self) -> bool;
}
