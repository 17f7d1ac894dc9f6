//! Axis-aligned bounding boxes and the small vector/point aliases the rest
//! of the crate builds on. All device-facing arithmetic is IEEE-754
//! binary32, so these are generic only over `BaseNum`/`BaseFloat` the way
//! the reference bounds type is, instantiated at `f32`.

use cgmath::{BaseFloat, BaseNum, Bounded, Point3, Vector3};

#[inline]
fn min<S: BaseNum>(a: S, b: S) -> S { if a < b { a } else { b } }

#[inline]
fn max<S: BaseNum>(a: S, b: S) -> S { if a < b { b } else { a } }

pub type Point3f = Point3<f32>;
pub type Vector3f = Vector3<f32>;
pub type Matrix4f = cgmath::Matrix4<f32>;

/// Axis-aligned bounding box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb<S: BaseNum> {
    pub min: Point3<S>,
    pub max: Point3<S>,
}

impl<S: BaseNum> Aabb<S> {
    #[inline]
    pub fn new(p0: Point3<S>, p1: Point3<S>) -> Aabb<S> {
        Aabb {
            min: Point3::new(min(p0.x, p1.x), min(p0.y, p1.y), min(p0.z, p1.z)),
            max: Point3::new(max(p0.x, p1.x), max(p0.y, p1.y), max(p0.z, p1.z)),
        }
    }

    /// The `i`th corner, `i` in `0..8`, bit `b` of `i` selects max on axis `b`.
    #[inline]
    pub fn corner(&self, i: u32) -> Point3<S> {
        Point3::new(
            if i & 1 > 0 { self.max.x } else { self.min.x },
            if i & 2 > 0 { self.max.y } else { self.min.y },
            if i & 4 > 0 { self.max.z } else { self.min.z },
        )
    }

    #[inline]
    pub fn union(&self, with: &Self) -> Self {
        Aabb::new(
            Point3::new(min(self.min.x, with.min.x), min(self.min.y, with.min.y), min(self.min.z, with.min.z)),
            Point3::new(max(self.max.x, with.max.x), max(self.max.y, with.max.y), max(self.max.z, with.max.z)),
        )
    }

    #[inline]
    pub fn point_union(&self, p: &Point3<S>) -> Self {
        Aabb::new(
            Point3::new(min(self.min.x, p.x), min(self.min.y, p.y), min(self.min.z, p.z)),
            Point3::new(max(self.max.x, p.x), max(self.max.y, p.y), max(self.max.z, p.z)),
        )
    }

    #[inline]
    pub fn contains(&self, p: Point3<S>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y &&
        p.z >= self.min.z && p.z <= self.max.z
    }

    #[inline]
    pub fn diagonal(&self) -> Vector3<S> {
        self.max - self.min
    }

    /// Shortened surface-area form used by the SAH builder: `dx·dy + dy·dz +
    /// dz·dx`, omitting the factor of 2 since only ratios between candidate
    /// splits matter.
    #[inline]
    pub fn surface_area_shortened(&self) -> S {
        let d = self.diagonal();
        d.x * d.y + d.y * d.z + d.z * d.x
    }

    #[inline]
    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z { 0 } else if d.y > d.z { 1 } else { 2 }
    }

    /// Index (0=x,1=y,2=z) into a point's components.
    #[inline]
    pub fn axis(p: &Point3<S>, axis: usize) -> S {
        match axis {
            0 => p.x,
            1 => p.y,
            _ => p.z,
        }
    }
}

impl<S: BaseNum + Bounded> Aabb<S> {
    /// The empty bounding box: `min = +∞, max = -∞` component-wise, so that
    /// unioning it with anything yields that thing unchanged.
    #[inline]
    pub fn none() -> Aabb<S> {
        Aabb { min: Point3::max_value(), max: Point3::min_value() }
    }
}

impl<S: BaseFloat> Aabb<S> {
    #[inline]
    pub fn lerp(&self, t: S) -> Point3<S> {
        Point3::new(
            self.min.x + (self.max.x - self.min.x) * t,
            self.min.y + (self.max.y - self.min.y) * t,
            self.min.z + (self.max.z - self.min.z) * t,
        )
    }
}
