// Copyright 2021 Tristam MacDonald
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use crate::math::{Vec2, Vec3};

/// Data that can be linearly interpolated along a grid edge.
///
/// Per-node attributes passed to the `*_with_data` extraction functions are
/// blended with the same factor used to place the vertex on its edge.
pub trait Interpolate {
    /// Blend `self` towards `other`, where `t == 0.0` yields `self` and
    /// `t == 1.0` yields `other`.
    fn interpolate(&self, other: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    #[inline]
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        (1.0 - t) * *self + t * *other
    }
}

impl Interpolate for [f64; 2] {
    #[inline]
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        [
            self[0].interpolate(&other[0], t),
            self[1].interpolate(&other[1], t),
        ]
    }
}

impl Interpolate for [f64; 3] {
    #[inline]
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        [
            self[0].interpolate(&other[0], t),
            self[1].interpolate(&other[1], t),
            self[2].interpolate(&other[2], t),
        ]
    }
}

impl Interpolate for Vec2 {
    #[inline]
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        self.lerp(*other, t)
    }
}

impl Interpolate for Vec3 {
    #[inline]
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        self.lerp(*other, t)
    }
}

impl Interpolate for () {
    #[inline]
    fn interpolate(&self, _other: &Self, _t: f64) {}
}

impl<A, B> Interpolate for (A, B)
where
    A: Interpolate,
    B: Interpolate,
{
    #[inline]
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        (
            self.0.interpolate(&other.0, t),
            self.1.interpolate(&other.1, t),
        )
    }
}

/// Fraction of the way from `a` to `b` at which a linear function with
/// values `value_a` and `value_b` crosses `level`.
///
/// Only called on crossed edges, where exactly one end is at or above
/// `level`, so the two values always differ.
#[inline]
pub fn crossing_offset(value_a: f64, value_b: f64, level: f64) -> f64 {
    debug_assert!((value_a >= level) != (value_b >= level));
    (level - value_a) / (value_b - value_a)
}

/// Position of the level crossing on the edge from `p_a` to `p_b`.
#[inline]
pub fn find_crossing_point(p_a: Vec3, p_b: Vec3, value_a: f64, value_b: f64, level: f64) -> Vec3 {
    p_a.lerp(p_b, crossing_offset(value_a, value_b, level))
}
