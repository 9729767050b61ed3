/*!
    The sample sink contract.
*/

use media_types::{OutputFormat, Result, SampleBuffer, SampleInfo, TrackSlot};

/**
    Destination for the samples of every output track slot.
*/
pub trait SampleSink {
    /**
        Declare the output format of a slot, or `None` to exclude the slot.

        Called exactly once per slot, before any sample is written to it.
        Container output must not begin until every slot has declared.
    */
    fn set_output_format(&mut self, slot: TrackSlot, format: Option<&OutputFormat>) -> Result<()>;

    /**
        Write the region of `buffer` described by `info` to a slot.

        A zero-length sample flagged `END_OF_STREAM` closes the slot.
    */
    fn write_sample(
        &mut self,
        slot: TrackSlot,
        buffer: &SampleBuffer,
        info: &SampleInfo,
    ) -> Result<()>;
}
