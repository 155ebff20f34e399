use crate::frame::GrayFrame;

/// Fixed-capacity ring of the most recent frames, oldest evicted first.
///
/// A write cursor modulo capacity avoids shifting or reallocating per
/// step; readers see the frames in time order via [`FrameBuffer::get`].
#[derive(Debug)]
pub struct FrameBuffer {
    slots: Vec<GrayFrame>,
    capacity: usize,
    cursor: usize,
}

impl FrameBuffer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// Appends a frame, evicting the oldest when already full.
    pub fn push(&mut self, frame: GrayFrame) {
        if self.slots.len() < self.capacity {
            self.slots.push(frame);
        } else {
            self.slots[self.cursor] = frame;
            self.cursor = (self.cursor + 1) % self.capacity;
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// The `t`-th oldest buffered frame, `t` in `0..len()`.
    pub fn get(&self, t: usize) -> &GrayFrame {
        debug_assert!(t < self.slots.len());
        &self.slots[(self.cursor + t) % self.slots.len()]
    }

    /// Buffered pixel planes, oldest first.
    pub fn planes(&self) -> Vec<&[u8]> {
        (0..self.slots.len()).map(|t| self.get(t).data.as_slice()).collect()
    }
}
