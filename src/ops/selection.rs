// ============================================================================
// SELECTION SYSTEM: shapes, membership, area capture, move
// ============================================================================

use crate::canvas::{Color, Pixel, PixelBuffer, Point};
use crate::components::history::Transaction;
use crate::ops::shapes;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionError {
    /// The shape has no implementation for this operation.
    Unsupported(&'static str),
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::Unsupported(what) => write!(f, "Unsupported selection operation: {}", what),
        }
    }
}

impl std::error::Error for SelectionError {}

/// Inclusive box normalized from two corner clicks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RectangleSelection {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl RectangleSelection {
    pub fn new(p0: Point, p1: Point) -> Self {
        Self {
            min_x: p0.x.min(p1.x),
            min_y: p0.y.min(p1.y),
            max_x: p0.x.max(p1.x),
            max_y: p0.y.max(p1.y),
        }
    }

    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.min_x && pt.x <= self.max_x && pt.y >= self.min_y && pt.y <= self.max_y
    }
}

/// Disc with an integer center and radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircleSelection {
    pub center: Point,
    pub radius: i32,
}

impl CircleSelection {
    pub fn new(center: Point, radius: i32) -> Self {
        Self {
            center,
            radius: radius.max(0),
        }
    }

    /// The circle whose diameter runs between the two interaction points.
    pub fn from_points(p0: Point, p1: Point) -> Self {
        let ((cx, cy), r) = shapes::circle_params(p0, p1);
        Self::new(Point::new(cx.round() as i32, cy.round() as i32), r as i32)
    }

    pub fn contains(&self, pt: Point) -> bool {
        let dx = (pt.x - self.center.x) as i64;
        let dy = (pt.y - self.center.y) as i64;
        let r = self.radius as i64;
        dx * dx + dy * dy <= r * r
    }
}

/// Freeform polygon selection. Membership, area and border have no
/// implementation; every operation reports [`SelectionError::Unsupported`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LassoSelection {
    pub points: Vec<Point>,
}

/// The active selection shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Rectangle(RectangleSelection),
    Circle(CircleSelection),
    Lasso(LassoSelection),
}

impl Selection {
    pub fn label(&self) -> &'static str {
        match self {
            Selection::Rectangle(_) => "rectangle",
            Selection::Circle(_) => "circle",
            Selection::Lasso(_) => "lasso",
        }
    }

    pub fn is_within_bounds(&self, pt: Point) -> Result<bool, SelectionError> {
        match self {
            Selection::Rectangle(r) => Ok(r.contains(pt)),
            Selection::Circle(c) => Ok(c.contains(pt)),
            Selection::Lasso(_) => Err(SelectionError::Unsupported("lasso membership")),
        }
    }

    /// Inclusive bounding box as (min, max) corners.
    pub fn bounding_box(&self) -> Result<(Point, Point), SelectionError> {
        match self {
            Selection::Rectangle(r) => Ok((
                Point::new(r.min_x, r.min_y),
                Point::new(r.max_x, r.max_y),
            )),
            Selection::Circle(c) => Ok((
                c.center.offset(-c.radius, -c.radius),
                c.center.offset(c.radius, c.radius),
            )),
            Selection::Lasso(_) => Err(SelectionError::Unsupported("lasso bounds")),
        }
    }

    /// Every member pixel that lies on the canvas, with its current color.
    pub fn area(&self, buffer: &PixelBuffer) -> Result<Vec<Pixel>, SelectionError> {
        let (min, max) = self.bounding_box()?;
        let min_x = min.x.max(0);
        let min_y = min.y.max(0);
        let max_x = max.x.min(buffer.width() as i32 - 1);
        let max_y = max.y.min(buffer.height() as i32 - 1);

        let mut pixels = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point::new(x, y);
                if self.is_within_bounds(p)? {
                    pixels.push(buffer.pixel_at(p));
                }
            }
        }
        Ok(pixels)
    }

    /// Ordered outline points, used for the dashed overlay.
    pub fn border(&self) -> Result<Vec<Point>, SelectionError> {
        match self {
            Selection::Rectangle(r) => Ok(shapes::rectangle_outline(
                Point::new(r.min_x, r.min_y),
                Point::new(r.max_x, r.max_y),
            )),
            Selection::Circle(c) => Ok(shapes::circle_outline(
                (c.center.x as f64, c.center.y as f64),
                c.radius as f64,
            )),
            Selection::Lasso(_) => Err(SelectionError::Unsupported("lasso border")),
        }
    }
}

/// Move captured pixels by an offset.
///
/// Pass one records and erases every source position to white; pass two
/// writes each captured color at its destination. Colors always come from
/// `area`, never from the (already erased) buffer. A zero offset yields an
/// empty transaction.
pub fn move_area(
    area: &[Pixel],
    x_offset: i32,
    y_offset: i32,
    buffer: &mut PixelBuffer,
) -> Transaction {
    let mut erase = Transaction::new("Move selection");
    if x_offset == 0 && y_offset == 0 {
        return erase;
    }

    // Destination priors are read before erasing, so every entry for a
    // position carries its pre-move color and stored-order revert is exact.
    let dest_priors: Vec<Pixel> = area
        .iter()
        .map(|p| buffer.pixel_at(p.pos.offset(x_offset, y_offset)))
        .collect();

    for p in area {
        if buffer.in_bounds(p.pos.x, p.pos.y) {
            erase.record(buffer.pixel_at(p.pos));
        }
        buffer.set_point(p.pos, Color::WHITE);
    }

    let mut place = Transaction::new("Move selection");
    for (p, prior) in area.iter().zip(dest_priors) {
        if buffer.in_bounds(prior.pos.x, prior.pos.y) {
            place.record(prior);
        }
        buffer.set_point(prior.pos, p.color);
    }

    erase.merge(place);
    erase
}
