//! Label-ID allocation for label rasters.

use crate::trace::trace_warn;

/// Largest label ID representable in a 16-bit label image.
pub const MAX_LABEL_ID: u16 = 65535;

/// Hands out label IDs in `1..=MAX_LABEL_ID`, wrapping around when exhausted.
///
/// One allocator is shared across the frames of a timelapse so IDs continue
/// from frame to frame.
#[derive(Clone, Debug, Default)]
pub struct LabelAllocator {
    offset: u32,
    issued: u64,
    warned: bool,
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns IDs for `count` winners in ranked order.
    pub fn assign(&mut self, count: usize) -> Vec<u16> {
        let max = u32::from(MAX_LABEL_ID);
        let ids = (0..count)
            .map(|k| {
                let slot = (u64::from(self.offset) + k as u64) % u64::from(max);
                (1 + slot) as u16
            })
            .collect();
        self.offset = ((u64::from(self.offset) + count as u64) % u64::from(max)) as u32;
        self.issued += count as u64;
        if self.has_wrapped() && !self.warned {
            self.warned = true;
            trace_warn!(
                "label IDs repeat past the maximum",
                issued = self.issued,
                max_label = MAX_LABEL_ID
            );
        }
        ids
    }

    /// Total number of labels handed out so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// True once more labels were issued than distinct IDs exist.
    pub fn has_wrapped(&self) -> bool {
        self.issued > u64::from(MAX_LABEL_ID)
    }
}
