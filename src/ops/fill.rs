use std::collections::VecDeque;

use crate::canvas::{Color, PixelBuffer, Point};
use crate::components::history::Transaction;

/// Flood fill from `seed` using queue-based (BFS) traversal over 4-connected
/// neighbours, repainting every pixel that exactly matches the seed's color.
///
/// Each repainted pixel's prior color is recorded before it is overwritten.
/// Filling with the seed's own color, or from a seed outside the canvas,
/// returns an empty transaction and leaves the buffer untouched.
pub fn flood_fill(seed: Point, new_color: Color, buffer: &mut PixelBuffer) -> Transaction {
    let mut txn = Transaction::new("Fill");
    if !buffer.in_bounds(seed.x, seed.y) {
        return txn;
    }
    let target = buffer.get_point(seed);
    if target == new_color {
        return txn;
    }

    // Repaint on enqueue: once a pixel holds `new_color` it no longer matches
    // `target`, so it can never be enqueued twice.
    let mut queue = VecDeque::new();
    txn.record(buffer.pixel_at(seed));
    buffer.set_point(seed, new_color);
    queue.push_back(seed);

    while let Some(p) = queue.pop_front() {
        let neighbors = [
            p.offset(0, -1),
            p.offset(0, 1),
            p.offset(-1, 0),
            p.offset(1, 0),
        ];
        for n in neighbors {
            if !buffer.in_bounds(n.x, n.y) || buffer.get_point(n) != target {
                continue;
            }
            txn.record(buffer.pixel_at(n));
            buffer.set_point(n, new_color);
            queue.push_back(n);
        }
    }

    crate::log_info!(
        "Flood fill at ({}, {}): {} pixels",
        seed.x,
        seed.y,
        txn.len()
    );
    txn
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(255, 0, 0);

    #[test]
    fn uniform_buffer_fills_everything() {
        let mut buf = PixelBuffer::new(7, 5);
        let txn = flood_fill(Point::new(3, 2), RED, &mut buf);
        assert_eq!(txn.len(), 35);
        for y in 0..5 {
            for x in 0..7 {
                assert_eq!(buf.get(x, y), RED);
            }
        }
    }

    #[test]
    fn fill_stays_inside_boundary() {
        // 10x10 white with a black square outline from (2,2) to (6,6).
        let mut buf = PixelBuffer::new(10, 10);
        for i in 2..=6 {
            buf.set(i, 2, Color::BLACK);
            buf.set(i, 6, Color::BLACK);
            buf.set(2, i, Color::BLACK);
            buf.set(6, i, Color::BLACK);
        }
        let before = buf.clone();
        let txn = flood_fill(Point::new(4, 4), RED, &mut buf);
        assert_eq!(txn.len(), 9);
        for y in 0..10 {
            for x in 0..10 {
                let inside = (3..=5).contains(&x) && (3..=5).contains(&y);
                let expected = if inside { RED } else { before.get(x, y) };
                assert_eq!(buf.get(x, y), expected, "pixel ({x}, {y})");
            }
        }
        txn.revert(&mut buf);
        assert_eq!(buf, before);
    }

    #[test]
    fn diagonal_neighbours_are_not_connected() {
        let mut buf = PixelBuffer::new(3, 3);
        buf.set(1, 0, Color::BLACK);
        buf.set(0, 1, Color::BLACK);
        let txn = flood_fill(Point::new(0, 0), RED, &mut buf);
        assert_eq!(txn.len(), 1);
        assert_eq!(buf.get(1, 1), Color::WHITE);
    }

    #[test]
    fn same_color_is_a_noop() {
        let mut buf = PixelBuffer::new(4, 4);
        let before = buf.clone();
        let txn = flood_fill(Point::new(1, 1), Color::WHITE, &mut buf);
        assert!(txn.is_empty());
        assert_eq!(buf, before);
    }

    #[test]
    fn seed_outside_canvas_is_a_noop() {
        let mut buf = PixelBuffer::new(4, 4);
        assert!(flood_fill(Point::new(-1, 2), RED, &mut buf).is_empty());
        assert!(flood_fill(Point::new(4, 0), RED, &mut buf).is_empty());
        assert_eq!(buf, PixelBuffer::new(4, 4));
    }
}
