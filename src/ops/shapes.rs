//! Pure geometry generators. Nothing here touches the pixel buffer; every
//! function returns an ordered point list for the caller to paint.
//!
//! Points may fall outside the canvas. They are dropped when painted.

use std::collections::HashSet;
use std::f64::consts::TAU;

use crate::canvas::Point;

/// Dash pattern for selection outlines: keep `DASH_LEN` of every `DASH_PERIOD` points.
pub const DASH_LEN: usize = 5;
pub const DASH_PERIOD: usize = 8;

/// Largest stroke width the generators accept.
pub const MAX_STROKE_WIDTH: u32 = 64;

/// Every pixel on the segment `p0 -> p1` (Bresenham), both endpoints included.
/// Consecutive points are 8-connected; coincident endpoints yield one point.
pub fn interpolate(p0: Point, p1: Point) -> Vec<Point> {
    let dx = (p1.x - p0.x).abs();
    let dy = -(p1.y - p0.y).abs();
    let sx = if p0.x < p1.x { 1 } else { -1 };
    let sy = if p0.y < p1.y { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (p0.x, p0.y);

    let mut points = Vec::with_capacity(dx.max(-dy) as usize + 1);
    loop {
        points.push(Point::new(x, y));
        if x == p1.x && y == p1.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    points
}

/// Expand a centerline to `width` by stamping a `width x width` square at
/// every point. Output keeps first-seen order and contains no duplicates.
/// A single centerline point still yields a full square dot.
pub fn stamp(centerline: &[Point], width: u32) -> Vec<Point> {
    let width = width.clamp(1, MAX_STROKE_WIDTH) as i32;
    if width == 1 {
        let mut seen = HashSet::with_capacity(centerline.len());
        return centerline.iter().copied().filter(|p| seen.insert(*p)).collect();
    }

    let lo = -((width - 1) / 2);
    let hi = lo + width - 1;
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(centerline.len() * width as usize);
    for c in centerline {
        for oy in lo..=hi {
            for ox in lo..=hi {
                let p = c.offset(ox, oy);
                if seen.insert(p) {
                    out.push(p);
                }
            }
        }
    }
    out
}

/// A `width`-thick segment from `p0` to `p1`.
pub fn lerp(p0: Point, p1: Point, width: u32) -> Vec<Point> {
    stamp(&interpolate(p0, p1), width)
}

/// Straight line from the drag anchor to the current point.
pub fn line(anchor: Point, current: Point, width: u32) -> Vec<Point> {
    lerp(anchor, current, width)
}

/// The centerline of an axis-aligned rectangle spanned by two corners,
/// as four edges in a fixed order.
pub fn rectangle_outline(anchor: Point, current: Point) -> Vec<Point> {
    let corner_a = Point::new(anchor.x, current.y);
    let corner_b = Point::new(current.x, anchor.y);
    let mut points = interpolate(anchor, corner_a);
    points.extend(interpolate(current, corner_a));
    points.extend(interpolate(current, corner_b));
    points.extend(interpolate(anchor, corner_b));
    points
}

/// Rectangle border spanned by the anchor and current corners.
pub fn rectangle(anchor: Point, current: Point, width: u32) -> Vec<Point> {
    stamp(&rectangle_outline(anchor, current), width)
}

/// Center and radius of the circle whose diameter runs from `anchor` to `current`.
pub fn circle_params(anchor: Point, current: Point) -> ((f64, f64), f64) {
    let dx = (current.x - anchor.x) as f64;
    let dy = (current.y - anchor.y) as f64;
    let dist = (dx * dx + dy * dy).sqrt();
    let radius = dist / 2.0;
    if dist == 0.0 {
        return ((anchor.x as f64, anchor.y as f64), 0.0);
    }
    let center = (
        anchor.x as f64 + radius * dx / dist,
        anchor.y as f64 + radius * dy / dist,
    );
    (center, radius)
}

/// Closed centerline of a circle: angle samples roughly one pixel of arc
/// apart, joined by interpolation so the ring has no gaps.
pub fn circle_outline(center: (f64, f64), radius: f64) -> Vec<Point> {
    let round = |x: f64, y: f64| Point::new(x.round() as i32, y.round() as i32);
    if radius < 0.5 {
        return vec![round(center.0, center.1)];
    }

    // Arc length between samples is ~1px: step = 2π / (2π·r).
    let step = TAU / (TAU * radius);
    let mut draft: Vec<Point> = Vec::with_capacity((TAU / step) as usize + 1);
    let mut theta = 0.0_f64;
    while theta < TAU {
        let p = round(
            center.0 + radius * theta.cos(),
            center.1 + radius * theta.sin(),
        );
        if draft.last() != Some(&p) {
            draft.push(p);
        }
        theta += step;
    }

    let mut points = Vec::with_capacity(draft.len() * 2);
    for (i, &p) in draft.iter().enumerate() {
        let next = draft[(i + 1) % draft.len()];
        points.extend(interpolate(p, next));
    }
    points
}

/// Circle whose diameter spans the anchor and current points.
pub fn circle(anchor: Point, current: Point, width: u32) -> Vec<Point> {
    let (center, radius) = circle_params(anchor, current);
    stamp(&circle_outline(center, radius), width)
}

/// Freehand stroke through every sample of the trail, in order.
pub fn freehand(trail: &[Point], width: u32) -> Vec<Point> {
    match trail {
        [] => Vec::new(),
        [only] => stamp(&[*only], width),
        _ => {
            let centerline: Vec<Point> = trail
                .windows(2)
                .flat_map(|pair| interpolate(pair[0], pair[1]))
                .collect();
            stamp(&centerline, width)
        }
    }
}

/// Subsample an ordered border into dashes: runs of `DASH_LEN` points every
/// `DASH_PERIOD` points. A run that would overrun the end is dropped.
pub fn dashed(border: &[Point]) -> Vec<Point> {
    let mut out = Vec::with_capacity(border.len() / DASH_PERIOD * DASH_LEN + DASH_LEN);
    let mut i = 0;
    while i + DASH_LEN <= border.len() {
        out.extend_from_slice(&border[i..i + DASH_LEN]);
        i += DASH_PERIOD;
    }
    out
}
