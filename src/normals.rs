// Copyright 2018 Tristam MacDonald
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
use crate::{field::ScalarField, math::Vec3};

/// Estimates surface normals from a sampled field by finite differencing.
///
/// Gradients are taken at grid nodes, using central differences in the
/// interior and one-sided differences on the grid boundary. A vertex on the
/// edge between two nodes gets the blend of their gradients, negated so that
/// normals point from higher towards lower values.
pub struct CentralDifference<'a> {
    field: ScalarField<'a>,
    epsilon: f64,
}

impl<'a> CentralDifference<'a> {
    /// Create an estimator which reports gradients shorter than `epsilon` as
    /// degenerate
    pub fn new_with_epsilon(field: ScalarField<'a>, epsilon: f64) -> Self {
        Self { field, epsilon }
    }

    /// Gradient of the field at the node with the given linear index.
    pub fn gradient_at(&self, index: usize) -> Vec3 {
        let (ni, nj, nk) = self.field.dims();
        let (i, j, k) = self.field.coords(index);
        let [si, sj, sk] = self.field.strides();

        Vec3::new(
            self.difference(index, i, ni, si),
            self.difference(index, j, nj, sj),
            self.difference(index, k, nk, sk),
        ) / self.field.spacing()
    }

    /// Unit normal at the point `t` of the way along the edge from node `a`
    /// to node `b`, or `None` where the blended gradient vanishes.
    pub fn normal_on_edge(&self, a: usize, b: usize, t: f64) -> Option<Vec3> {
        let gradient = self.gradient_at(a).lerp(self.gradient_at(b), t);
        (-gradient).normalised_within(self.epsilon)
    }

    fn difference(&self, index: usize, c: usize, n: usize, stride: usize) -> f64 {
        let u = |index: usize| self.field.value_at(index);

        if n < 2 {
            0.0
        } else if c == 0 {
            u(index + stride) - u(index)
        } else if c == n - 1 {
            u(index) - u(index - stride)
        } else {
            0.5 * (u(index + stride) - u(index - stride))
        }
    }
}
