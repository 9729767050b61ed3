/*!
    Muxer that defers writing until every slot has a format.
*/

use std::collections::VecDeque;

use tracing::{debug, trace};

use media_types::{Error, OutputFormat, Result, SampleBuffer, SampleInfo, TrackSlot};

use crate::sink::SampleSink;
use crate::writer::MuxWriter;

#[derive(Clone, Debug, PartialEq)]
enum SlotState {
    Undeclared,
    Excluded,
    Declared(OutputFormat),
}

struct QueuedSample {
    slot: TrackSlot,
    data: Vec<u8>,
    info: SampleInfo,
}

/**
    A sample sink that queues samples until the container can be started.

    The underlying writer needs every track before it can start, but track
    transcoders learn their formats at different times. Samples written to a
    declared slot before the other slot has declared are copied into a queue
    and flushed, in arrival order, as soon as the last slot declares. Writing
    to a slot that has not declared yet is an error.
*/
pub struct QueuedMuxer<W> {
    writer: W,
    slots: [SlotState; 2],
    writer_tracks: [Option<usize>; 2],
    queue: VecDeque<QueuedSample>,
    started: bool,
}

impl<W: MuxWriter> QueuedMuxer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            slots: [SlotState::Undeclared, SlotState::Undeclared],
            writer_tracks: [None, None],
            queue: VecDeque::new(),
            started: false,
        }
    }

    /**
        Returns true once every slot has declared and the writer started.
    */
    pub fn is_started(&self) -> bool {
        self.started
    }

    /**
        Number of samples waiting for the writer to start.
    */
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /**
        Finalize the container.

        Fails if the writer never started, either because some slot never
        declared its format or because flushing the queue failed.
    */
    pub fn finish(&mut self) -> Result<()> {
        if !self.started {
            return Err(Error::mux(format!(
                "finished before the writer started, {} sample(s) still queued",
                self.queue.len()
            )));
        }
        self.writer.stop()
    }

    /**
        Add the declared tracks, start the writer, and flush the queue.

        Samples are popped only once the writer has accepted them, so a
        failed flush leaves the unwritten ones queued and the muxer
        unstarted.
    */
    fn start(&mut self) -> Result<()> {
        for slot in TrackSlot::ALL {
            if let SlotState::Declared(format) = &self.slots[slot.index()] {
                let track = self.writer.add_track(format)?;
                self.writer_tracks[slot.index()] = Some(track);
            }
        }
        self.writer.start()?;

        debug!(
            queued = self.queue.len(),
            "all output formats determined, flushing queued samples"
        );
        while let Some(sample) = self.queue.front() {
            let track = self.writer_tracks[sample.slot.index()]
                .ok_or(Error::NoOutputTrack(sample.slot))?;
            self.writer.write_sample(track, &sample.data, &sample.info)?;
            self.queue.pop_front();
        }
        self.started = true;
        Ok(())
    }

    fn write_through(&mut self, slot: TrackSlot, data: &[u8], info: &SampleInfo) -> Result<()> {
        let track = self.writer_tracks[slot.index()].ok_or(Error::NoOutputTrack(slot))?;
        self.writer.write_sample(track, data, info)
    }
}

impl<W: MuxWriter> SampleSink for QueuedMuxer<W> {
    fn set_output_format(&mut self, slot: TrackSlot, format: Option<&OutputFormat>) -> Result<()> {
        let state = &mut self.slots[slot.index()];
        if *state != SlotState::Undeclared {
            return Err(Error::FormatAlreadyDeclared(slot));
        }
        *state = match format {
            Some(format) => SlotState::Declared(format.clone()),
            None => SlotState::Excluded,
        };
        debug!(%slot, present = format.is_some(), "output format declared");

        if self.slots.iter().all(|s| *s != SlotState::Undeclared) {
            self.start()?;
        }
        Ok(())
    }

    fn write_sample(
        &mut self,
        slot: TrackSlot,
        buffer: &SampleBuffer,
        info: &SampleInfo,
    ) -> Result<()> {
        match self.slots[slot.index()] {
            SlotState::Undeclared => return Err(Error::FormatNotDeclared(slot)),
            SlotState::Excluded => return Err(Error::NoOutputTrack(slot)),
            SlotState::Declared(_) => {}
        }

        let data = buffer.region(info);
        if self.started {
            return self.write_through(slot, data, info);
        }

        trace!(%slot, size = data.len(), pts_us = info.pts_us, "queueing sample");
        self.queue.push_back(QueuedSample {
            slot,
            data: data.to_vec(),
            info: *info,
        });
        Ok(())
    }
}

impl<W: std::fmt::Debug> std::fmt::Debug for QueuedMuxer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedMuxer")
            .field("writer", &self.writer)
            .field("started", &self.started)
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use media_types::{CodecId, SampleFlags};

    use super::*;
    use crate::MemoryWriter;

    fn filled(bytes: &[u8]) -> SampleBuffer {
        let mut buffer = SampleBuffer::new(64);
        buffer.fill_from(bytes).unwrap();
        buffer
    }

    fn info(size: usize, pts_us: i64) -> SampleInfo {
        SampleInfo::new(0, size, pts_us, SampleFlags::empty())
    }

    #[test]
    fn samples_queue_until_every_slot_declares() {
        let video = OutputFormat::video(CodecId::H264, 1280, 720);
        let audio = OutputFormat::audio(CodecId::Aac, 48000, 2);
        let mut muxer = QueuedMuxer::new(MemoryWriter::new());

        muxer.set_output_format(TrackSlot::Video, Some(&video)).unwrap();
        muxer
            .write_sample(TrackSlot::Video, &filled(&[1, 2]), &info(2, 0))
            .unwrap();
        muxer
            .write_sample(TrackSlot::Video, &filled(&[3]), &info(1, 33_000))
            .unwrap();
        assert!(!muxer.is_started());
        assert_eq!(muxer.queued_len(), 2);
        assert!(muxer.writer().tracks().is_empty());

        muxer.set_output_format(TrackSlot::Audio, Some(&audio)).unwrap();
        assert!(muxer.is_started());
        assert_eq!(muxer.queued_len(), 0);

        muxer
            .write_sample(TrackSlot::Audio, &filled(&[9]), &info(1, 0))
            .unwrap();
        muxer.finish().unwrap();

        let writer = muxer.into_writer();
        assert!(writer.is_stopped());
        let tracks = writer.tracks();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].format, video);
        assert_eq!(tracks[0].samples.len(), 2);
        assert_eq!(tracks[0].samples[0].data, vec![1, 2]);
        assert_eq!(tracks[0].samples[1].info.pts_us, 33_000);
        assert_eq!(tracks[1].samples[0].data, vec![9]);
    }

    #[test]
    fn excluded_slot_adds_no_track() {
        let audio = OutputFormat::audio(CodecId::Opus, 48000, 2);
        let mut muxer = QueuedMuxer::new(MemoryWriter::new());

        muxer.set_output_format(TrackSlot::Video, None).unwrap();
        muxer.set_output_format(TrackSlot::Audio, Some(&audio)).unwrap();
        assert!(muxer.is_started());
        assert_eq!(muxer.writer().tracks().len(), 1);

        let err = muxer
            .write_sample(TrackSlot::Video, &filled(&[1]), &info(1, 0))
            .unwrap_err();
        assert!(matches!(err, Error::NoOutputTrack(TrackSlot::Video)));
    }

    #[test]
    fn declaring_twice_fails() {
        let mut muxer = QueuedMuxer::new(MemoryWriter::new());
        muxer.set_output_format(TrackSlot::Audio, None).unwrap();

        let err = muxer.set_output_format(TrackSlot::Audio, None).unwrap_err();
        assert!(matches!(err, Error::FormatAlreadyDeclared(TrackSlot::Audio)));
    }

    #[test]
    fn end_of_stream_markers_are_queued_too() {
        let video = OutputFormat::video(CodecId::Vp9, 640, 360);
        let mut muxer = QueuedMuxer::new(MemoryWriter::new());

        muxer.set_output_format(TrackSlot::Video, Some(&video)).unwrap();
        muxer
            .write_sample(
                TrackSlot::Video,
                &SampleBuffer::new(16),
                &SampleInfo::end_of_stream(),
            )
            .unwrap();
        muxer.set_output_format(TrackSlot::Audio, None).unwrap();

        let tracks = muxer.writer().tracks();
        assert!(tracks[0].is_closed());
        assert!(tracks[0].samples[0].data.is_empty());
    }

    #[test]
    fn finish_before_start_fails() {
        let mut muxer = QueuedMuxer::new(MemoryWriter::new());
        muxer.set_output_format(TrackSlot::Video, None).unwrap();
        assert!(matches!(muxer.finish(), Err(Error::Mux(_))));
    }

    #[test]
    fn sample_for_undeclared_slot_is_rejected() {
        let video = OutputFormat::video(CodecId::H264, 1280, 720);
        let mut muxer = QueuedMuxer::new(MemoryWriter::new());

        let err = muxer
            .write_sample(TrackSlot::Audio, &filled(&[7]), &info(1, 0))
            .unwrap_err();
        assert!(matches!(err, Error::FormatNotDeclared(TrackSlot::Audio)));
        assert_eq!(muxer.queued_len(), 0);

        muxer.set_output_format(TrackSlot::Video, Some(&video)).unwrap();
        muxer
            .write_sample(TrackSlot::Video, &filled(&[1, 2]), &info(2, 0))
            .unwrap();
        muxer.set_output_format(TrackSlot::Audio, None).unwrap();

        assert!(muxer.is_started());
        let tracks = muxer.writer().tracks();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].samples.len(), 1);
        assert_eq!(tracks[0].samples[0].data, vec![1, 2]);
    }

    /// Accepts a fixed number of samples, then fails every write.
    struct LimitedWriter {
        inner: MemoryWriter,
        remaining: usize,
    }

    impl MuxWriter for LimitedWriter {
        fn add_track(&mut self, format: &OutputFormat) -> Result<usize> {
            self.inner.add_track(format)
        }

        fn start(&mut self) -> Result<()> {
            self.inner.start()
        }

        fn write_sample(&mut self, track: usize, data: &[u8], info: &SampleInfo) -> Result<()> {
            if self.remaining == 0 {
                return Err(Error::mux("disk full"));
            }
            self.remaining -= 1;
            self.inner.write_sample(track, data, info)
        }

        fn stop(&mut self) -> Result<()> {
            self.inner.stop()
        }
    }

    #[test]
    fn failed_flush_keeps_unwritten_samples() {
        let video = OutputFormat::video(CodecId::H264, 1280, 720);
        let mut muxer = QueuedMuxer::new(LimitedWriter {
            inner: MemoryWriter::new(),
            remaining: 1,
        });

        muxer.set_output_format(TrackSlot::Video, Some(&video)).unwrap();
        for pts_us in [0, 33_000, 66_000] {
            muxer
                .write_sample(TrackSlot::Video, &filled(&[1]), &info(1, pts_us))
                .unwrap();
        }

        let err = muxer.set_output_format(TrackSlot::Audio, None).unwrap_err();
        assert!(matches!(err, Error::Mux(_)));
        assert!(!muxer.is_started());
        assert_eq!(muxer.queued_len(), 2);
        assert_eq!(muxer.writer().inner.tracks()[0].samples.len(), 1);
        assert!(matches!(muxer.finish(), Err(Error::Mux(_))));
    }
}
