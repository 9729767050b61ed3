/*!
    In-memory sample source.
*/

use tracing::{debug, trace};

use media_types::{Error, OutputFormat, Result, SampleBuffer, SampleFlags};

use crate::source::SampleSource;

struct MemorySample {
    track: usize,
    pts_us: i64,
    sync: bool,
    /// `None` marks a sample whose payload cannot be read.
    data: Option<Vec<u8>>,
}

/**
    A sample source backed by samples held in memory.

    Samples are surfaced in the order they were pushed, which stands in for a
    container's decode order. Useful for tests and for feeding samples that
    were demuxed elsewhere.

    # Example

    ```ignore
    let mut source = MemorySource::new();
    let format = OutputFormat::video(CodecId::H264, 1280, 720).with_max_input_size(1 << 16);
    let video = source.add_track(format);
    source.push_sample(video, 0, vec![0; 512], true);
    source.select_track(video)?;
    ```
*/
#[derive(Default)]
pub struct MemorySource {
    tracks: Vec<OutputFormat>,
    selected: Vec<bool>,
    samples: Vec<MemorySample>,
    position: usize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Add a track, returning its index.
    */
    pub fn add_track(&mut self, format: OutputFormat) -> usize {
        self.tracks.push(format);
        self.selected.push(false);
        self.tracks.len() - 1
    }

    /**
        Append a readable sample for `track`.
    */
    pub fn push_sample(
        &mut self,
        track: usize,
        pts_us: i64,
        data: impl Into<Vec<u8>>,
        sync: bool,
    ) -> &mut Self {
        debug_assert!(track < self.tracks.len(), "unknown track {track}");
        self.samples.push(MemorySample {
            track,
            pts_us,
            sync,
            data: Some(data.into()),
        });
        self
    }

    /**
        Append a sample for `track` whose payload fails to read.
    */
    pub fn push_unreadable(&mut self, track: usize, pts_us: i64) -> &mut Self {
        debug_assert!(track < self.tracks.len(), "unknown track {track}");
        self.samples.push(MemorySample {
            track,
            pts_us,
            sync: false,
            data: None,
        });
        self
    }

    fn is_selected(&self, track: usize) -> bool {
        self.selected.get(track).copied().unwrap_or(false)
    }

    fn pending_position(&self) -> Option<usize> {
        self.samples[self.position..]
            .iter()
            .position(|s| self.is_selected(s.track))
            .map(|offset| self.position + offset)
    }

    fn pending(&self) -> Option<&MemorySample> {
        self.pending_position().map(|pos| &self.samples[pos])
    }
}

impl SampleSource for MemorySource {
    fn track_count(&self) -> usize {
        self.tracks.len()
    }

    fn track_format(&self, track: usize) -> Result<OutputFormat> {
        self.tracks.get(track).cloned().ok_or(Error::UnknownTrack(track))
    }

    fn select_track(&mut self, track: usize) -> Result<()> {
        let selected = self
            .selected
            .get_mut(track)
            .ok_or(Error::UnknownTrack(track))?;
        *selected = true;
        debug!(track, "selected source track");
        Ok(())
    }

    fn pending_track_index(&self) -> Option<usize> {
        self.pending().map(|s| s.track)
    }

    fn read_sample(&mut self, buffer: &mut SampleBuffer) -> Result<usize> {
        let sample = self.pending().ok_or(Error::NoPendingSample)?;
        match &sample.data {
            Some(data) => buffer.fill_from(data),
            None => Err(Error::read_failed(sample.track, "sample payload unreadable")),
        }
    }

    fn sample_flags(&self) -> SampleFlags {
        match self.pending() {
            Some(sample) if sample.sync => SampleFlags::SYNC,
            _ => SampleFlags::empty(),
        }
    }

    fn sample_time_us(&self) -> Option<i64> {
        self.pending().map(|s| s.pts_us)
    }

    fn advance(&mut self) -> bool {
        let Some(pos) = self.pending_position() else {
            return false;
        };
        trace!(
            track = self.samples[pos].track,
            pts_us = self.samples[pos].pts_us,
            "advance"
        );
        self.position = pos + 1;
        self.pending_position().is_some()
    }
}

impl std::fmt::Debug for MemorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySource")
            .field("tracks", &self.tracks.len())
            .field("samples", &self.samples.len())
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
