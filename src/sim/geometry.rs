//! Segment intersection primitives for trail collision
//!
//! Closed-segment semantics: touching endpoints count as an intersection.
//! Collinearity is an exact test with no epsilon, so collision timing is
//! reproducible for the axis-aligned coordinates cycles travel on.

use glam::Vec2;

/// Turn direction of an ordered point triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

/// A directed line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    #[inline]
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }
}

/// Orientation of `(p, q, r)` from the sign of `(q - p) x (r - q)`
pub fn orientation(p: Vec2, q: Vec2, r: Vec2) -> Orientation {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if val == 0.0 {
        Orientation::Collinear
    } else if val > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// True if `q` lies within the bounding box of `p` and `r`
#[inline]
pub fn on_segment(p: Vec2, q: Vec2, r: Vec2) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Check whether two closed segments share at least one point
pub fn segments_intersect(a: Segment, b: Segment) -> bool {
    let o1 = orientation(a.start, a.end, b.start);
    let o2 = orientation(a.start, a.end, b.end);
    let o3 = orientation(b.start, b.end, a.start);
    let o4 = orientation(b.start, b.end, a.end);

    // General case: each segment straddles the other's line
    if o1 != o2 && o3 != o4 {
        return true;
    }

    // Collinear endpoint lying on the other segment
    (o1 == Orientation::Collinear && on_segment(a.start, b.start, a.end))
        || (o2 == Orientation::Collinear && on_segment(a.start, b.end, a.end))
        || (o3 == Orientation::Collinear && on_segment(b.start, a.start, b.end))
        || (o4 == Orientation::Collinear && on_segment(b.start, a.end, b.end))
}

/// Check `segment` against every consecutive edge of `path`
pub fn path_intersects_segment(segment: Segment, path: &[Vec2]) -> bool {
    let hits = |edge: &[Vec2]| segments_intersect(segment, Segment::new(edge[0], edge[1]));
    path.windows(2).any(hits)
}

/// True if `point` lies inside or on the axis-aligned box `[min, max]`
#[inline]
pub fn point_in_box(point: Vec2, min: Vec2, max: Vec2) -> bool {
    point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
}

/// Check whether a polyline touches an axis-aligned box
///
/// Covers paths crossing an edge as well as paths lying entirely inside.
pub fn path_touches_box(path: &[Vec2], min: Vec2, max: Vec2) -> bool {
    if path.iter().any(|&p| point_in_box(p, min, max)) {
        return true;
    }
    let corners = [
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
        min,
    ];
    corners
        .windows(2)
        .any(|edge| path_intersects_segment(Segment::new(edge[0], edge[1]), path))
}
