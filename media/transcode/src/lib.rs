/*!
    Track transcoders and the engine that drives them.

    A [`TrackTranscoder`] moves one output slot's samples from a shared
    [`SampleSource`] into a [`SampleSink`], one bounded step at a time.
    [`PassThroughTrackTranscoder`] forwards compressed samples unchanged,
    optionally cutting the track off once a duration threshold is crossed.
    [`TranscodeEngine`] picks tracks, builds a transcoder per slot, and steps
    them in turn until every slot has written its end-of-stream marker.

    # Example

    ```ignore
    use std::time::Duration;

    use media_sink::{MemoryWriter, QueuedMuxer};
    use media_transcode::{TranscodeConfig, TranscodeEngine};

    let config = TranscodeConfig::default().with_max_duration(Duration::from_secs(30));
    let mut muxer = QueuedMuxer::new(MemoryWriter::new());

    let summary = TranscodeEngine::new(config).transcode(&mut source, &mut muxer, None)?;
    muxer.finish()?;
    ```
*/

pub use media_sink::SampleSink;
pub use media_source::SampleSource;
pub use media_types::{Error, OutputFormat, Result, TrackSlot};

mod config;
mod engine;
mod passthrough;
mod progress;
mod transcoder;

pub use config::TranscodeConfig;
pub use engine::{TranscodeEngine, TranscodeSummary};
pub use passthrough::PassThroughTrackTranscoder;
pub use progress::ProgressListener;
pub use transcoder::TrackTranscoder;
