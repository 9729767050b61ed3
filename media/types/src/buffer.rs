/*!
    Fixed-capacity sample buffer.
*/

use crate::error::{Error, Result};
use crate::sample::SampleInfo;

/**
    A reusable, fixed-capacity byte region for one compressed sample.

    Allocated once at the size a track declares as its largest sample and
    reset between samples instead of reallocated. Payloads that do not fit are
    rejected rather than truncated.
*/
pub struct SampleBuffer {
    data: Box<[u8]>,
    len: usize,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /**
        Replace the contents with `payload`, returning its size.

        Fails with [`Error::SampleTooLarge`] if the payload exceeds the
        buffer's capacity, leaving the buffer empty.
    */
    pub fn fill_from(&mut self, payload: &[u8]) -> Result<usize> {
        self.len = 0;
        if payload.len() > self.capacity() {
            return Err(Error::SampleTooLarge {
                size: payload.len(),
                capacity: self.capacity(),
            });
        }
        self.data[..payload.len()].copy_from_slice(payload);
        self.len = payload.len();
        Ok(self.len)
    }

    /**
        The filled portion of the buffer.
    */
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /**
        The bytes described by `info`, clamped to the filled portion.
    */
    pub fn region(&self, info: &SampleInfo) -> &[u8] {
        let filled = self.as_slice();
        let start = info.offset.min(filled.len());
        let end = info.offset.saturating_add(info.size).min(filled.len());
        &filled[start..end]
    }
}

impl std::fmt::Debug for SampleBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleBuffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleFlags;

    #[test]
    fn fill_and_clear() {
        let mut buffer = SampleBuffer::new(8);
        assert_eq!(buffer.fill_from(&[1, 2, 3]).unwrap(), 3);
        assert_eq!(buffer.as_slice(), &[1, 2, 3]);

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 8);
    }

    #[test]
    fn fill_exactly_capacity() {
        let mut buffer = SampleBuffer::new(4);
        assert_eq!(buffer.fill_from(&[9; 4]).unwrap(), 4);
    }

    #[test]
    fn oversize_payload_is_rejected() {
        let mut buffer = SampleBuffer::new(4);
        buffer.fill_from(&[1, 2]).unwrap();

        let err = buffer.fill_from(&[0; 5]).unwrap_err();
        assert!(matches!(
            err,
            Error::SampleTooLarge {
                size: 5,
                capacity: 4
            }
        ));
        assert!(buffer.is_empty());
    }

    #[test]
    fn region_follows_info() {
        let mut buffer = SampleBuffer::new(8);
        buffer.fill_from(&[1, 2, 3, 4, 5]).unwrap();

        let info = SampleInfo::new(1, 3, 0, SampleFlags::empty());
        assert_eq!(buffer.region(&info), &[2, 3, 4]);

        let past_end = SampleInfo::new(4, 10, 0, SampleFlags::empty());
        assert_eq!(buffer.region(&past_end), &[5]);
    }
}
