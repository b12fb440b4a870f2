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

//! Double precision vectors for grid positions, gradients and normals.
//!
//! Sample data arrives as `f64`, so positions and normals stay in double
//! precision all the way to the output buffers.

/// A 2 dimensional vector
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// A 3 dimensional vector
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

pub fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

pub fn vec3(x: f64, y: f64, z: f64) -> Vec3 {
    Vec3::new(x, y, z)
}

// Plus and multiply operators can't be used as separators in macro repetition,
// so I use a fold operation instead
macro_rules! fold {
    ($op:tt, $x:expr, $y:expr) => {
        $x $op $y
    };
    ($op:tt, $x:expr, $y:expr, $($rest:expr),+) => {
        fold!($op, ($x $op $y), $($rest),*)
    }
}

macro_rules! impl_arithmetic_op {
    ($name:ident, $op_name:ident, $op_small_name:ident, $op:tt { $($field:ident ),+ }) => {
        impl std::ops::$op_name for $name {
            type Output = $name;
            fn $op_small_name(self, other: $name) -> $name {
                $name::new($(self.$field $op other.$field),*)
            }
        }
        impl std::ops::$op_name<f64> for $name {
            type Output = $name;
            fn $op_small_name(self, other: f64) -> $name {
                $name::new($(self.$field $op other),*)
            }
        }
        impl std::ops::$op_name<$name> for f64 {
            type Output = $name;
            fn $op_small_name(self, other: $name) -> $name {
                $name::new($(self $op other.$field),*)
            }
        }
    };
}

macro_rules! impl_vector {
    ($name:ident { $($field:ident ),+ }) => {
        impl $name {
            /// Create a vector
            pub fn new($($field : f64),*) -> Self {
                Self { $($field),* }
            }

            /// Create a vector with all coordinates set to zero
            pub fn zero() -> Self {
                Self{ $($field: 0.0),*}
            }

            /// Squared Euclidean length of this vector
            pub fn len_sq(&self) -> f64 {
                fold!(+, $(self.$field * self.$field),*)
            }

            /// Euclidean length of this vector
            pub fn len(&self) -> f64 {
                self.len_sq().sqrt()
            }

            /// Normalised copy of this vector, or `None` if the vector is
            /// shorter than `epsilon` or its length is not finite.
            pub fn normalised_within(&self, epsilon: f64) -> Option<Self> {
                let l = self.len();
                if !(l >= epsilon) || !l.is_finite() {
                    None
                } else {
                    Some(Self {
                        $($field: self.$field / l),*
                    })
                }
            }

            /// Normalised copy of this vector
            pub fn normalised(&self) -> Option<Self> {
                self.normalised_within(f64::EPSILON)
            }

            /// Calculate the dot product of this vector and another
            pub fn dot(&self, other: Self) -> f64 {
                fold!(+, $(self.$field * other.$field),*)
            }

            /// Create a vector by linearly interpolating between this vector
            /// and another
            pub fn lerp(&self, other: Self, f: f64) -> Self {
                let of = 1.0 - f;
                Self {
                    $($field: of * self.$field + f * other.$field),*
                }
            }

            /// The components of this vector as an array
            pub fn to_array(&self) -> [f64; count!($($field)*)] {
                [$(self.$field),*]
            }
        }

        impl std::ops::Neg for $name {
            type Output = $name;
            fn neg(self) -> $name {
                $name::new($(-self.$field),*)
            }
        }

        impl_arithmetic_op!($name, Add, add, + { $($field),* });
        impl_arithmetic_op!($name, Sub, sub, - { $($field),* });
        impl_arithmetic_op!($name, Mul, mul, * { $($field),* });
        impl_arithmetic_op!($name, Div, div, / { $($field),* });
    };
}

macro_rules! count {
    () => { 0 };
    ($head:tt $($tail:tt)*) => { 1 + count!($($tail)*) };
}

impl_vector!(Vec2 { x, y });
impl_vector!(Vec3 { x, y, z });

impl Vec3 {
    /// Compute the cross product of this vector and another
    pub fn cross(&self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }
}
