use std::ops::RangeInclusive;

/// Configuration for the scene extractor.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// How many members a "band of ..." phrase spawns, drawn uniformly.
    /// A reversed or zero-based range is normalized when drawn.
    pub group_size: RangeInclusive<u32>,
    /// Upper bound on the mentions produced by one quantity phrase. Larger
    /// quantities ("10000 rats") are clamped to this many mentions without
    /// a warning. Defaults to 50; 0 is treated as 1.
    pub max_quantity: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            group_size: 3..=5,
            max_quantity: 50,
        }
    }
}

impl ExtractorConfig {
    /// Set the group size range. Bounds are reordered if reversed and the
    /// lower bound is at least 1.
    pub fn with_group_size(mut self, min: u32, max: u32) -> Self {
        let (lo, hi) = normalize(min, max);
        self.group_size = lo..=hi;
        self
    }

    /// The group size bounds actually drawn from, `lo <= hi` and `lo >= 1`.
    pub fn group_bounds(&self) -> (u32, u32) {
        normalize(*self.group_size.start(), *self.group_size.end())
    }

    /// The effective quantity cap.
    pub fn quantity_cap(&self) -> u32 {
        self.max_quantity.max(1)
    }

    /// Set the quantity cap (at least 1).
    pub fn with_max_quantity(mut self, max_quantity: u32) -> Self {
        self.max_quantity = max_quantity.max(1);
        self
    }
}

fn normalize(a: u32, b: u32) -> (u32, u32) {
    let lo = a.min(b).max(1);
    (lo, a.max(b).max(lo))
}
