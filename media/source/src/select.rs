/*!
    Choosing which source tracks feed which output slots.
*/

use media_types::{MediaKind, Result, TrackSlot};

use crate::source::SampleSource;

/**
    Source track chosen for each output slot, if any.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackSelection {
    pub video: Option<usize>,
    pub audio: Option<usize>,
}

impl TrackSelection {
    /**
        Pick the first video track and the first audio track of a source.

        Tracks of any other kind, and further tracks of the same kind, are
        left unselected.
    */
    pub fn first_video_and_audio<S: SampleSource + ?Sized>(source: &S) -> Result<Self> {
        let mut selection = Self::default();
        for track in 0..source.track_count() {
            let format = source.track_format(track)?;
            let slot = match format.kind() {
                MediaKind::Video => &mut selection.video,
                MediaKind::Audio => &mut selection.audio,
            };
            if slot.is_none() {
                *slot = Some(track);
            }
        }
        Ok(selection)
    }

    /**
        Source track assigned to a slot.
    */
    pub fn track_for(&self, slot: TrackSlot) -> Option<usize> {
        match slot {
            TrackSlot::Video => self.video,
            TrackSlot::Audio => self.audio,
        }
    }

    /**
        Drop the assignment for a slot, excluding it from the output.
    */
    pub fn exclude(&mut self, slot: TrackSlot) {
        match slot {
            TrackSlot::Video => self.video = None,
            TrackSlot::Audio => self.audio = None,
        }
    }
}
