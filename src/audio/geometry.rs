//! 2D geometry primitives for line-of-sight tests.
//!
//! All functions are pure and operate on `f64` points. Walls are plain
//! segments; their direction carries no meaning.

use bevy::math::DVec2;
use serde::{Deserialize, Serialize};

/// A wall segment between two points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: DVec2,
    pub end: DVec2,
}

impl Segment {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    pub fn endpoints(&self) -> [DVec2; 2] {
        [self.start, self.end]
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(p0: DVec2, p1: DVec2) -> f64 {
    p0.distance(p1)
}

/// Test whether two segments cross.
///
/// Solves the parametric 2×2 system for both segments. Parallel and
/// collinear segments never intersect, and a crossing only counts when both
/// parameters are strictly inside `(0, 1)`. Segments that merely touch at an
/// endpoint are therefore not intersecting, which lets sight lines graze wall
/// corners.
pub fn segments_intersect(s0: &Segment, s1: &Segment) -> bool {
    let (a, b) = (s0.start, s0.end);
    let (p, q) = (s1.start, s1.end);

    let delta = (b.x - a.x) * (q.y - p.y) - (q.x - p.x) * (b.y - a.y);
    if delta == 0.0 {
        return false;
    }

    let lambda = ((q.y - p.y) * (q.x - a.x) + (p.x - q.x) * (q.y - a.y)) / delta;
    if lambda <= 0.0 || lambda >= 1.0 {
        return false;
    }

    let gamma = ((a.y - b.y) * (q.x - a.x) + (b.x - a.x) * (q.y - a.y)) / delta;
    0.0 < gamma && gamma < 1.0
}

/// Test whether a segment comes within `radius` of `center`.
///
/// True when either endpoint lies within `radius`, or when the perpendicular
/// distance from `center` to the infinite line through the segment is below
/// `radius`. The line test is not clamped to the segment, so a far-away
/// segment whose extension passes near the circle is reported as near.
/// See [`segment_within_circle`] for the exact test.
pub fn segment_near_circle(center: DVec2, radius: f64, segment: &Segment) -> bool {
    if segment.endpoints().iter().any(|p| distance(center, *p) <= radius) {
        return true;
    }

    let direction = segment.end - segment.start;
    let norm = direction.length();
    if norm == 0.0 {
        return false;
    }
    let unit = direction / norm;
    let to_center = center - segment.start;
    unit.perp_dot(to_center).abs() < radius
}

/// Exact version of [`segment_near_circle`]: the closest point is clamped to
/// the segment's finite extent before comparing against `radius`.
pub fn segment_within_circle(center: DVec2, radius: f64, segment: &Segment) -> bool {
    let direction = segment.end - segment.start;
    let len_sq = direction.length_squared();
    if len_sq == 0.0 {
        return distance(center, segment.start) <= radius;
    }
    let t = ((center - segment.start).dot(direction) / len_sq).clamp(0.0, 1.0);
    let closest = segment.start + direction * t;
    distance(center, closest) <= radius
}
