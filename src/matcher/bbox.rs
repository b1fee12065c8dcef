/// Axis-aligned bounding box of a labeled region in an n-dimensional frame.
///
/// Bounds are inclusive voxel indices: `min[d] <= x[d] <= max[d]` on every axis `d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelBox {
    /// Lowest index on each axis
    pub min: Vec<usize>,
    /// Highest index on each axis
    pub max: Vec<usize>,
}

impl LabelBox {
    /// Box covering a single voxel.
    #[inline]
    pub fn from_point(index: &[usize]) -> Self {
        Self {
            min: index.to_vec(),
            max: index.to_vec(),
        }
    }

    /// Grow the box to include `index`.
    #[inline]
    pub fn extend(&mut self, index: &[usize]) {
        for (d, &x) in index.iter().enumerate() {
            self.min[d] = self.min[d].min(x);
            self.max[d] = self.max[d].max(x);
        }
    }

    pub fn ndim(&self) -> usize {
        self.min.len()
    }

    /// Number of voxels enclosed by the box.
    pub fn volume(&self) -> usize {
        self.min
            .iter()
            .zip(&self.max)
            .map(|(lo, hi)| hi - lo + 1)
            .product()
    }

    /// Intersection of two boxes, `None` if they are disjoint on any axis.
    pub fn intersection(&self, other: &LabelBox) -> Option<LabelBox> {
        let mut min = Vec::with_capacity(self.ndim());
        let mut max = Vec::with_capacity(self.ndim());
        for d in 0..self.ndim() {
            let lo = self.min[d].max(other.min[d]);
            let hi = self.max[d].min(other.max[d]);
            if lo > hi {
                return None;
            }
            min.push(lo);
            max.push(hi);
        }
        Some(LabelBox { min, max })
    }

    /// Intersection over union of the two box volumes.
    pub fn iou(&self, other: &LabelBox) -> f64 {
        let inter = match self.intersection(other) {
            Some(b) => b.volume(),
            None => return 0.0,
        };
        let union = self.volume() + other.volume() - inter;
        if union > 0 {
            inter as f64 / union as f64
        } else {
            0.0
        }
    }
}
