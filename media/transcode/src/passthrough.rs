/*!
    Pass-through track transcoder.
*/

use std::time::Duration;

use tracing::{debug, trace};

use media_sink::SampleSink;
use media_source::SampleSource;
use media_types::{Error, OutputFormat, Result, SampleBuffer, SampleFlags, SampleInfo, TrackSlot};

use crate::transcoder::TrackTranscoder;

struct Input {
    track: usize,
    buffer: SampleBuffer,
}

/**
    Forwards a track's compressed samples to the sink without decoding them.

    Each step copies at most one sample, and only when the source's pending
    sample belongs to this transcoder's track; otherwise the cursor is left
    for a sibling transcoder. Once the source is exhausted, or the track has
    run past the configured maximum duration, a single zero-length
    end-of-stream sample is written and the transcoder is finished for good.

    A transcoder built without a source track declares an absent format for
    its slot and is finished from the start.
*/
pub struct PassThroughTrackTranscoder {
    slot: TrackSlot,
    /// `None` when the slot is excluded.
    input: Option<Input>,
    format: Option<OutputFormat>,
    max_duration_us: Option<i64>,
    has_written_eos: bool,
    is_input_eos: bool,
    written_pts_us: i64,
}

impl PassThroughTrackTranscoder {
    /**
        Create a pass-through transcoder and declare its output format.

        # Arguments

        * `source` - Source whose track is forwarded
        * `track` - Source track to forward, or `None` to exclude the slot
        * `sink` - Sink the slot's format is declared to
        * `slot` - Output slot this transcoder owns
        * `max_duration` - Stop forwarding past this timestamp (`None` or zero disables)
    */
    pub fn new<S, K>(
        source: &S,
        track: Option<usize>,
        sink: &mut K,
        slot: TrackSlot,
        max_duration: Option<Duration>,
    ) -> Result<Self>
    where
        S: SampleSource + ?Sized,
        K: SampleSink + ?Sized,
    {
        let max_duration_us = max_duration
            .filter(|d| !d.is_zero())
            .map(|d| i64::try_from(d.as_micros()).unwrap_or(i64::MAX));

        let Some(track) = track else {
            debug!(%slot, "excluding slot from output");
            sink.set_output_format(slot, None)?;
            return Ok(Self {
                slot,
                input: None,
                format: None,
                max_duration_us,
                has_written_eos: false,
                is_input_eos: true,
                written_pts_us: 0,
            });
        };

        let format = source.track_format(track)?;
        let capacity = format
            .max_input_size
            .ok_or(Error::MissingMaxInputSize(track))?;
        sink.set_output_format(slot, Some(&format))?;
        debug!(%slot, track, capacity, codec = ?format.codec_id, "passing track through");

        Ok(Self {
            slot,
            input: Some(Input {
                track,
                buffer: SampleBuffer::new(capacity),
            }),
            format: Some(format),
            max_duration_us,
            has_written_eos: false,
            is_input_eos: false,
            written_pts_us: 0,
        })
    }
}

impl TrackTranscoder for PassThroughTrackTranscoder {
    fn slot(&self) -> TrackSlot {
        self.slot
    }

    fn source_track(&self) -> Option<usize> {
        self.input.as_ref().map(|input| input.track)
    }

    fn setup(&mut self) -> Result<()> {
        Ok(())
    }

    fn determined_format(&self) -> Option<&OutputFormat> {
        self.format.as_ref()
    }

    fn step(&mut self, source: &mut dyn SampleSource, sink: &mut dyn SampleSink) -> Result<bool> {
        if self.is_finished() {
            return Ok(false);
        }
        let Some(input) = self.input.as_mut() else {
            return Ok(false);
        };

        let pending = source.pending_track_index();
        if pending.is_none() {
            self.is_input_eos = true;
        }
        let owns_pending = pending == Some(input.track);
        let pending_pts_us = if owns_pending {
            source.sample_time_us()
        } else {
            None
        };

        // Checked against the sample about to be forwarded, so the written
        // time never passes the limit.
        let truncated = self
            .max_duration_us
            .zip(pending_pts_us)
            .is_some_and(|(max, pts)| pts > max);

        if truncated || self.is_input_eos {
            input.buffer.clear();
            sink.write_sample(self.slot, &input.buffer, &SampleInfo::end_of_stream())?;
            self.has_written_eos = true;
            debug!(
                slot = %self.slot,
                truncated,
                written_pts_us = self.written_pts_us,
                "wrote end-of-stream marker"
            );
            return Ok(true);
        }

        if !owns_pending {
            return Ok(false);
        }

        let pts_us = pending_pts_us.ok_or(Error::NoPendingSample)?;
        input.buffer.clear();
        let size = source.read_sample(&mut input.buffer)?;
        let flags = source.sample_flags() & SampleFlags::SYNC;
        let info = SampleInfo::new(0, size, pts_us, flags);

        debug_assert!(!self.has_written_eos);
        sink.write_sample(self.slot, &input.buffer, &info)?;
        trace!(slot = %self.slot, size, pts_us, sync = info.is_sync(), "forwarded sample");

        self.written_pts_us = pts_us;
        source.advance();
        Ok(true)
    }

    fn written_presentation_time_us(&self) -> i64 {
        self.written_pts_us
    }

    fn is_finished(&self) -> bool {
        self.is_input_eos || self.has_written_eos
    }

    fn release(&mut self) {}
}

impl std::fmt::Debug for PassThroughTrackTranscoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassThroughTrackTranscoder")
            .field("slot", &self.slot)
            .field("track", &self.source_track())
            .field("written_pts_us", &self.written_pts_us)
            .field("finished", &self.is_finished())
            .finish_non_exhaustive()
    }
}
