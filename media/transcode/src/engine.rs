/*!
    The engine that steps every track transcoder to completion.
*/

use tracing::{debug, info};

use media_sink::SampleSink;
use media_source::{SampleSource, TrackSelection};
use media_types::{Error, Result, TrackSlot};

use crate::config::TranscodeConfig;
use crate::passthrough::PassThroughTrackTranscoder;
use crate::progress::ProgressListener;
use crate::transcoder::TrackTranscoder;

/**
    Outcome of a completed run.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TranscodeSummary {
    /// Rounds of stepping performed.
    pub rounds: u64,
    /// Samples discarded because no active transcoder owned their track.
    pub skipped_samples: u64,
    /// Last timestamp written to the video slot, in microseconds.
    pub video_written_us: i64,
    /// Last timestamp written to the audio slot, in microseconds.
    pub audio_written_us: i64,
}

/**
    Drives one track transcoder per output slot over a shared source.

    Stepping is single-threaded and cooperative: each round steps every
    transcoder once, in slot order, and every step does a bounded amount of
    work. The engine is the sole owner of the source cursor while a run is in
    progress and lends it to one transcoder at a time.
*/
#[derive(Clone, Debug, Default)]
pub struct TranscodeEngine {
    config: TranscodeConfig,
}

impl TranscodeEngine {
    pub fn new(config: TranscodeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranscodeConfig {
        &self.config
    }

    /**
        Pass the first video and first audio track of `source` through to
        `sink`.

        Slots disabled in the configuration, or with no matching source track,
        are declared absent. Selected tracks are checked before any format is
        declared, so a source that cannot be passed through leaves `sink`
        untouched. The sink is not finished; callers finalize it once this
        returns.
    */
    pub fn transcode<S, K>(
        &self,
        source: &mut S,
        sink: &mut K,
        listener: Option<&mut dyn ProgressListener>,
    ) -> Result<TranscodeSummary>
    where
        S: SampleSource,
        K: SampleSink,
    {
        let mut selection = TrackSelection::first_video_and_audio(&*source)?;
        if !self.config.video {
            selection.exclude(TrackSlot::Video);
        }
        if !self.config.audio {
            selection.exclude(TrackSlot::Audio);
        }
        info!(video = ?selection.video, audio = ?selection.audio, "selected source tracks");

        // Every selected track must be usable before any slot is declared to
        // the sink, so a failure leaves the sink untouched.
        for slot in TrackSlot::ALL {
            if let Some(track) = selection.track_for(slot) {
                if source.track_format(track)?.max_input_size.is_none() {
                    return Err(Error::MissingMaxInputSize(track));
                }
                source.select_track(track)?;
            }
        }

        let mut transcoders: Vec<Box<dyn TrackTranscoder>> = Vec::with_capacity(2);
        for slot in TrackSlot::ALL {
            transcoders.push(Box::new(PassThroughTrackTranscoder::new(
                &*source,
                selection.track_for(slot),
                &mut *sink,
                slot,
                self.config.max_duration,
            )?));
        }

        self.run(source, sink, &mut transcoders, listener)
    }

    /**
        Step the given transcoders until all of them are finished.

        Each transcoder must already have declared its slot's format to
        `sink`. When a whole round makes no progress, the pending sample
        belongs to no active transcoder (for example a track that was
        truncated) and is discarded so the remaining tracks can continue. If
        it does belong to an active transcoder, the run fails with
        [`Error::Stalled`].
    */
    pub fn run(
        &self,
        source: &mut dyn SampleSource,
        sink: &mut dyn SampleSink,
        transcoders: &mut [Box<dyn TrackTranscoder>],
        mut listener: Option<&mut dyn ProgressListener>,
    ) -> Result<TranscodeSummary> {
        for transcoder in transcoders.iter_mut() {
            transcoder.setup()?;
        }

        let duration_us = self.progress_duration_us(transcoders);
        let mut summary = TranscodeSummary::default();

        while !transcoders.iter().all(|t| t.is_finished()) {
            let mut stepped = false;
            for transcoder in transcoders.iter_mut() {
                stepped |= transcoder.step(source, sink)?;
            }
            summary.rounds += 1;

            if !stepped {
                discard_orphan(source, transcoders)?;
                summary.skipped_samples += 1;
            }

            let interval = self.config.progress_interval;
            if let (Some(listener), Some(duration_us)) = (listener.as_deref_mut(), duration_us) {
                if interval > 0 && summary.rounds % interval == 0 {
                    listener.on_progress(progress(transcoders, duration_us));
                }
            }
        }

        if let Some(listener) = listener {
            listener.on_progress(1.0);
        }

        for transcoder in transcoders.iter_mut() {
            let written_us = transcoder.written_presentation_time_us();
            match transcoder.slot() {
                TrackSlot::Video => summary.video_written_us = written_us,
                TrackSlot::Audio => summary.audio_written_us = written_us,
            }
            transcoder.release();
        }

        debug!(
            rounds = summary.rounds,
            skipped = summary.skipped_samples,
            "all tracks finished"
        );
        Ok(summary)
    }

    /**
        Length of the output used to scale progress: the longest declared
        track duration, clipped to the truncation threshold.
    */
    fn progress_duration_us(&self, transcoders: &[Box<dyn TrackTranscoder>]) -> Option<i64> {
        let longest = transcoders
            .iter()
            .filter_map(|t| t.determined_format().and_then(|f| f.duration_us))
            .max()?;
        let clipped = match self.config.max_duration.filter(|d| !d.is_zero()) {
            Some(max) => longest.min(i64::try_from(max.as_micros()).unwrap_or(i64::MAX)),
            None => longest,
        };
        (clipped > 0).then_some(clipped)
    }
}

/**
    Skip the pending sample when no unfinished transcoder will ever take it.
*/
fn discard_orphan(
    source: &mut dyn SampleSource,
    transcoders: &[Box<dyn TrackTranscoder>],
) -> Result<()> {
    let pending = source.pending_track_index();
    let Some(track) = pending else {
        return Err(Error::Stalled(None));
    };

    let owned_by_active = transcoders
        .iter()
        .any(|t| !t.is_finished() && t.source_track() == Some(track));
    if owned_by_active {
        return Err(Error::Stalled(pending));
    }

    debug!(
        track,
        pts_us = ?source.sample_time_us(),
        "discarding sample with no active transcoder"
    );
    source.advance();
    Ok(())
}

/**
    Mean completion over all slots; finished slots count as complete.
*/
fn progress(transcoders: &[Box<dyn TrackTranscoder>], duration_us: i64) -> f64 {
    if transcoders.is_empty() {
        return 1.0;
    }
    let total: f64 = transcoders
        .iter()
        .map(|t| {
            if t.is_finished() {
                1.0
            } else {
                (t.written_presentation_time_us() as f64 / duration_us as f64).clamp(0.0, 1.0)
            }
        })
        .sum();
    total / transcoders.len() as f64
}
