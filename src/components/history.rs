use crate::canvas::{Color, Pixel, PixelBuffer, Point};

// ============================================================================
// TRANSACTION - Ordered log of prior pixel colors
// ============================================================================

/// An ordered record of the buffer state immediately before each write.
///
/// Reverting replays the entries in stored order through [`PixelBuffer::set`].
/// Entries are never deduplicated; callers that write the same position more
/// than once must record every prior color before the first write so that all
/// entries for that position agree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transaction {
    description: &'static str,
    pixels: Vec<Pixel>,
}

impl Transaction {
    pub fn new(description: &'static str) -> Self {
        Self {
            description,
            pixels: Vec::new(),
        }
    }

    /// Append one undo record. `pixel.color` must be the buffer's current
    /// color at `pixel.pos`, captured before it is overwritten.
    pub fn record(&mut self, pixel: Pixel) {
        self.pixels.push(pixel);
    }

    /// Append another transaction's entries after ours.
    pub fn merge(&mut self, other: Transaction) {
        self.pixels.extend(other.pixels);
    }

    /// Write every recorded prior color back, in stored order.
    pub fn revert(&self, buffer: &mut PixelBuffer) {
        for p in &self.pixels {
            buffer.set_point(p.pos, p.color);
        }
    }

    /// Record the prior color of every point, then paint them all with `color`.
    pub fn paint(
        description: &'static str,
        buffer: &mut PixelBuffer,
        points: &[Point],
        color: Color,
    ) -> Self {
        let mut txn = Self::new(description);
        txn.pixels.reserve(points.len());
        for &p in points {
            if buffer.in_bounds(p.x, p.y) {
                txn.record(buffer.pixel_at(p));
            }
        }
        for &p in points {
            buffer.set_point(p, color);
        }
        txn
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn memory_size(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<Pixel>()
    }
}

// ============================================================================
// HISTORY - Append-only stack of committed transactions
// ============================================================================

/// Committed edits, most recent last. Undo pops and reverts; popped
/// transactions are dropped (there is no redo stack).
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Transaction>,
    /// Running total of recorded bytes across the stack.
    total_memory: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Permanently commit a transaction. Empty transactions are kept; undoing
    /// them is a harmless no-op.
    pub fn push(&mut self, txn: Transaction) {
        self.total_memory += txn.memory_size();
        self.undo_stack.push(txn);
    }

    /// Revert and discard the most recent commit. Returns its description,
    /// or `None` when there is nothing to undo.
    pub fn undo(&mut self, buffer: &mut PixelBuffer) -> Option<&'static str> {
        let txn = self.undo_stack.pop()?;
        txn.revert(buffer);
        self.total_memory = self.total_memory.saturating_sub(txn.memory_size());
        Some(txn.description())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&'static str> {
        self.undo_stack.last().map(|t| t.description())
    }

    /// Approximate bytes held by recorded pixels.
    pub fn memory_usage(&self) -> usize {
        self.total_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(i32, i32)]) -> Vec<Point> {
        v.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn paint_then_revert_restores_bytes() {
        let mut buf = PixelBuffer::new(8, 8);
        buf.set(1, 1, Color::new(9, 9, 9));
        let before = buf.clone();

        let red = Color::new(255, 0, 0);
        let txn = Transaction::paint("t", &mut buf, &pts(&[(1, 1), (2, 2), (1, 1), (-3, 4)]), red);
        assert_eq!(buf.get(1, 1), red);
        assert_eq!(buf.get(2, 2), red);
        // Out-of-range point is not recorded.
        assert_eq!(txn.len(), 3);

        txn.revert(&mut buf);
        assert_eq!(buf, before);
    }

    #[test]
    fn later_entries_win_on_revert() {
        let mut buf = PixelBuffer::new(4, 4);
        let mut txn = Transaction::new("t");
        txn.record(Pixel::new(Point::new(0, 0), Color::new(1, 1, 1)));
        txn.record(Pixel::new(Point::new(0, 0), Color::new(2, 2, 2)));
        txn.revert(&mut buf);
        assert_eq!(buf.get(0, 0), Color::new(2, 2, 2));
    }

    #[test]
    fn merge_appends_in_order() {
        let mut a = Transaction::new("a");
        a.record(Pixel::new(Point::new(0, 0), Color::BLACK));
        let mut b = Transaction::new("b");
        b.record(Pixel::new(Point::new(1, 0), Color::WHITE));
        a.merge(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.pixels[1].pos, Point::new(1, 0));
        assert_eq!(a.description(), "a");
    }

    #[test]
    fn three_undos_then_noop() {
        let mut buf = PixelBuffer::new(6, 6);
        let start = buf.clone();
        let mut history = History::new();
        for i in 0..3 {
            let txn = Transaction::paint(
                "stroke",
                &mut buf,
                &pts(&[(i, i), (i + 1, i)]),
                Color::new(10 * i as u8, 0, 0),
            );
            history.push(txn);
        }
        assert_eq!(history.len(), 3);
        assert!(history.memory_usage() > 0);
        for _ in 0..3 {
            assert_eq!(history.undo(&mut buf), Some("stroke"));
        }
        assert_eq!(buf, start);
        assert_eq!(history.undo(&mut buf), None);
        assert_eq!(buf, start);
        assert_eq!(history.memory_usage(), 0);
    }

    #[test]
    fn empty_commit_is_harmless() {
        let mut buf = PixelBuffer::new(3, 3);
        let mut history = History::new();
        history.push(Transaction::new("empty"));
        assert!(history.can_undo());
        assert_eq!(history.undo(&mut buf), Some("empty"));
        assert_eq!(buf, PixelBuffer::new(3, 3));
    }
}
