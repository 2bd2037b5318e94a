use crate::grid::PixelPoint;

/// Keeps only the newest pointer move between frames.
///
/// Pointer devices can report far more moves than a frame can lay out. The
/// engine pushes every move here and drains at most one per frame, so layout
/// work is bounded by the frame rate and the last move always wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveCoalescer {
    latest: Option<PixelPoint>,
    dropped: usize,
}

impl MoveCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: PixelPoint) {
        if self.latest.replace(point).is_some() {
            self.dropped = self.dropped.saturating_add(1);
        }
    }

    pub fn take(&mut self) -> Option<PixelPoint> {
        let latest = self.latest.take();
        if latest.is_some() && self.dropped > 0 {
            tracing::trace!(dropped = self.dropped, "coalesced pointer moves");
        }
        self.dropped = 0;
        latest
    }

    pub fn is_pending(&self) -> bool {
        self.latest.is_some()
    }

    pub fn clear(&mut self) {
        self.latest = None;
        self.dropped = 0;
    }
}
