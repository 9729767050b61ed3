/*!
    Container writers behind the queued muxer.
*/

use tracing::debug;

use media_types::{Error, OutputFormat, Result, SampleInfo};

/**
    A container writer.

    Tracks are added before [`start`](Self::start); samples are written
    between `start` and [`stop`](Self::stop).
*/
pub trait MuxWriter {
    /**
        Add a track, returning the writer's index for it.
    */
    fn add_track(&mut self, format: &OutputFormat) -> Result<usize>;

    fn start(&mut self) -> Result<()>;

    fn write_sample(&mut self, track: usize, data: &[u8], info: &SampleInfo) -> Result<()>;

    /**
        Finalize the container.
    */
    fn stop(&mut self) -> Result<()>;
}

/**
    A sample as recorded by [`MemoryWriter`].
*/
#[derive(Clone, Debug, PartialEq)]
pub struct WrittenSample {
    pub data: Vec<u8>,
    /// Metadata as received, with the offset rebased to the start of `data`.
    pub info: SampleInfo,
}

/**
    A track as recorded by [`MemoryWriter`].
*/
#[derive(Clone, Debug, PartialEq)]
pub struct WrittenTrack {
    pub format: OutputFormat,
    pub samples: Vec<WrittenSample>,
}

impl WrittenTrack {
    /**
        Samples carrying payload, excluding end-of-stream markers.
    */
    pub fn data_samples(&self) -> impl Iterator<Item = &WrittenSample> {
        self.samples.iter().filter(|s| !s.info.is_end_of_stream())
    }

    /**
        Returns true if the last sample written is an end-of-stream marker.
    */
    pub fn is_closed(&self) -> bool {
        self.samples
            .last()
            .is_some_and(|s| s.info.is_end_of_stream())
    }
}

/**
    A writer that records everything in memory instead of producing a file.
*/
#[derive(Debug, Default)]
pub struct MemoryWriter {
    tracks: Vec<WrittenTrack>,
    started: bool,
    stopped: bool,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self) -> &[WrittenTrack] {
        &self.tracks
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl MuxWriter for MemoryWriter {
    fn add_track(&mut self, format: &OutputFormat) -> Result<usize> {
        if self.started {
            return Err(Error::mux("cannot add a track after the writer started"));
        }
        self.tracks.push(WrittenTrack {
            format: format.clone(),
            samples: Vec::new(),
        });
        Ok(self.tracks.len() - 1)
    }

    fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(Error::mux("writer already started"));
        }
        self.started = true;
        debug!(tracks = self.tracks.len(), "memory writer started");
        Ok(())
    }

    fn write_sample(&mut self, track: usize, data: &[u8], info: &SampleInfo) -> Result<()> {
        if !self.started || self.stopped {
            return Err(Error::mux("writer is not accepting samples"));
        }
        let written = self
            .tracks
            .get_mut(track)
            .ok_or_else(|| Error::mux(format!("writer has no track {track}")))?;
        written.samples.push(WrittenSample {
            data: data.to_vec(),
            info: SampleInfo { offset: 0, ..*info },
        });
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if !self.started {
            return Err(Error::mux("writer stopped before it started"));
        }
        self.stopped = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use media_types::{CodecId, SampleFlags};

    use super::*;

    #[test]
    fn lifecycle_is_enforced() {
        let mut writer = MemoryWriter::new();
        let info = SampleInfo::new(0, 1, 0, SampleFlags::SYNC);

        assert!(writer.stop().is_err());
        let track = writer
            .add_track(&OutputFormat::video(CodecId::H264, 320, 240))
            .unwrap();
        assert!(writer.write_sample(track, &[1], &info).is_err());

        writer.start().unwrap();
        assert!(writer.add_track(&OutputFormat::audio(CodecId::Aac, 48000, 2)).is_err());
        writer.write_sample(track, &[1], &info).unwrap();
        assert!(writer.write_sample(track + 1, &[1], &info).is_err());

        writer.stop().unwrap();
        assert!(writer.is_stopped());
        assert!(writer.write_sample(track, &[1], &info).is_err());
    }

    #[test]
    fn closed_track() {
        let mut writer = MemoryWriter::new();
        let track = writer
            .add_track(&OutputFormat::audio(CodecId::Opus, 48000, 2))
            .unwrap();
        writer.start().unwrap();
        writer
            .write_sample(track, &[7, 7], &SampleInfo::new(4, 2, 0, SampleFlags::empty()))
            .unwrap();
        assert!(!writer.tracks()[track].is_closed());

        writer
            .write_sample(track, &[], &SampleInfo::end_of_stream())
            .unwrap();
        let written = &writer.tracks()[track];
        assert!(written.is_closed());
        assert_eq!(written.data_samples().count(), 1);
        assert_eq!(written.samples[0].info.offset, 0);
    }
}
