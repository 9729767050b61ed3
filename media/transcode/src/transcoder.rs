/*!
    The track transcoder contract.
*/

use media_sink::SampleSink;
use media_source::SampleSource;
use media_types::{OutputFormat, Result, TrackSlot};

/**
    Moves the samples of one output slot from a source to a sink.

    Implementations are chosen per slot when the pipeline is built, so a
    pipeline can re-encode one track while passing another through. All of
    them share one source cursor: a step must leave the cursor alone unless
    the pending sample belongs to its own source track.
*/
pub trait TrackTranscoder {
    /**
        Output slot this transcoder writes to.
    */
    fn slot(&self) -> TrackSlot;

    /**
        Source track this transcoder reads, or `None` if the slot is excluded.
    */
    fn source_track(&self) -> Option<usize>;

    /**
        Prepare for stepping. Called once, before the first step.
    */
    fn setup(&mut self) -> Result<()>;

    /**
        Output format declared to the sink, if the slot has one.
    */
    fn determined_format(&self) -> Option<&OutputFormat>;

    /**
        Perform a bounded amount of work.

        Returns `Ok(true)` if a sample was consumed or the end-of-stream
        marker was written, and `Ok(false)` if there was nothing to do for
        this transcoder right now.
    */
    fn step(&mut self, source: &mut dyn SampleSource, sink: &mut dyn SampleSink) -> Result<bool>;

    /**
        Presentation timestamp of the last sample written, in microseconds.
    */
    fn written_presentation_time_us(&self) -> i64;

    fn is_finished(&self) -> bool;

    /**
        Release any resources held. Called once, after the last step.
    */
    fn release(&mut self);
}
