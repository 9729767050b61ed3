use thiserror::Error;

use crate::format::TrackSlot;

/**
    Errors shared by sources, sinks, and track transcoders.
*/
#[derive(Debug, Error)]
pub enum Error {
    #[error("sample of {size} bytes exceeds buffer capacity of {capacity} bytes")]
    SampleTooLarge { size: usize, capacity: usize },

    #[error("failed to read sample from track {track}: {reason}")]
    ReadFailed { track: usize, reason: String },

    #[error("source has no track {0}")]
    UnknownTrack(usize),

    #[error("track {0} does not declare a maximum sample size")]
    MissingMaxInputSize(usize),

    #[error("source has no pending sample")]
    NoPendingSample,

    #[error("output format for the {0} slot was already declared")]
    FormatAlreadyDeclared(TrackSlot),

    #[error("output format for the {0} slot has not been declared")]
    FormatNotDeclared(TrackSlot),

    #[error("the {0} slot has no output track")]
    NoOutputTrack(TrackSlot),

    #[error("muxer error: {0}")]
    Mux(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("pipeline stalled with a sample pending for track {0:?}")]
    Stalled(Option<usize>),
}

impl Error {
    /**
        Create a muxer error from any message.
    */
    pub fn mux(message: impl Into<String>) -> Self {
        Self::Mux(message.into())
    }

    /**
        Create a configuration error from any message.
    */
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /**
        Create a read failure for the given source track.
    */
    pub fn read_failed(track: usize, reason: impl Into<String>) -> Self {
        Self::ReadFailed {
            track,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
