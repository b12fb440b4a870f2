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
use crate::{
    error::{ExtractionError, Result},
    math::Vec3,
};

/// A read-only view over scalar samples on a regular `ni × nj × nk` grid.
///
/// Samples are stored in C order: the first axis varies slowest and the last
/// fastest, so node `(i, j, k)` lives at `i * nj * nk + j * nk + k`. Node
/// positions default to unit spacing with the origin at `(0, 0, 0)`.
#[derive(Debug, Copy, Clone)]
pub struct ScalarField<'a> {
    values: &'a [f64],
    dims: (usize, usize, usize),
    origin: Vec3,
    spacing: f64,
}

impl<'a> ScalarField<'a> {
    /// Wrap `values` as a grid of the given dimensions.
    ///
    /// Fails if `values.len()` is not `ni * nj * nk`.
    pub fn new(values: &'a [f64], dims: (usize, usize, usize)) -> Result<Self> {
        let (ni, nj, nk) = dims;
        let expected = ni
            .checked_mul(nj)
            .and_then(|n| n.checked_mul(nk))
            .ok_or_else(|| ExtractionError::DimensionOverflow {
                dims: vec![ni, nj, nk],
            })?;

        if values.len() != expected {
            return Err(ExtractionError::LengthMismatch {
                dims: vec![ni, nj, nk],
                expected,
                actual: values.len(),
            });
        }

        Ok(Self {
            values,
            dims,
            origin: Vec3::zero(),
            spacing: 1.0,
        })
    }

    /// Place node `(0, 0, 0)` at `origin` instead of the coordinate origin.
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    /// Use a uniform distance of `spacing` between neighbouring nodes.
    ///
    /// Fails unless `spacing` is positive and finite.
    pub fn with_spacing(mut self, spacing: f64) -> Result<Self> {
        if !(spacing > 0.0) || !spacing.is_finite() {
            return Err(ExtractionError::InvalidSpacing { spacing });
        }
        self.spacing = spacing;
        Ok(self)
    }

    pub fn dims(&self) -> (usize, usize, usize) {
        self.dims
    }

    pub fn values(&self) -> &'a [f64] {
        self.values
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Number of grid nodes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Distance in the backing array between neighbours along each axis.
    pub fn strides(&self) -> [usize; 3] {
        let (_, nj, nk) = self.dims;
        [nj * nk, nk, 1]
    }

    /// Number of unit cells. Zero unless every axis has at least 2 samples.
    pub fn cell_count(&self) -> usize {
        let (ni, nj, nk) = self.dims;
        ni.saturating_sub(1) * nj.saturating_sub(1) * nk.saturating_sub(1)
    }

    /// Linear index of node `(i, j, k)`.
    ///
    /// Panics if the node lies outside the grid.
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        let (ni, nj, nk) = self.dims;
        assert!(
            i < ni && j < nj && k < nk,
            "node ({}, {}, {}) outside grid {:?}",
            i,
            j,
            k,
            self.dims
        );
        i * nj * nk + j * nk + k
    }

    /// Grid coordinates of the node with the given linear index.
    pub fn coords(&self, index: usize) -> (usize, usize, usize) {
        let (_, nj, nk) = self.dims;
        (index / (nj * nk), (index / nk) % nj, index % nk)
    }

    /// Sample value at node `(i, j, k)`.
    pub fn value(&self, i: usize, j: usize, k: usize) -> f64 {
        self.values[self.index(i, j, k)]
    }

    /// Sample value at the node with the given linear index.
    pub fn value_at(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Position of node `(i, j, k)`.
    pub fn position(&self, i: usize, j: usize, k: usize) -> Vec3 {
        let (ni, nj, nk) = self.dims;
        assert!(
            i < ni && j < nj && k < nk,
            "node ({}, {}, {}) outside grid {:?}",
            i,
            j,
            k,
            self.dims
        );
        self.origin + Vec3::new(i as f64, j as f64, k as f64) * self.spacing
    }

    /// Position of the node with the given linear index.
    pub fn position_at(&self, index: usize) -> Vec3 {
        let (i, j, k) = self.coords(index);
        self.position(i, j, k)
    }
}

/// Sample `f` at every node of an `ni × nj × nk` grid with the given origin
/// and spacing, returning the samples in C order.
pub fn sample_grid<F>(dims: (usize, usize, usize), origin: Vec3, spacing: f64, f: F) -> Vec<f64>
where
    F: Fn(Vec3) -> f64,
{
    let (ni, nj, nk) = dims;
    let mut values = Vec::with_capacity(ni * nj * nk);
    for i in 0..ni {
        for j in 0..nj {
            for k in 0..nk {
                values.push(f(origin + Vec3::new(i as f64, j as f64, k as f64) * spacing));
            }
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3;

    #[test]
    fn test_indexing_is_c_order() {
        let values: Vec<f64> = (0..24).map(|v| v as f64).collect();
        let field = ScalarField::new(&values, (2, 3, 4)).unwrap();

        assert_eq!(field.strides(), [12, 4, 1]);
        assert_eq!(field.index(1, 2, 3), 23);
        assert_eq!(field.value(1, 0, 0), 12.0);
        assert_eq!(field.value(0, 1, 0), 4.0);
        assert_eq!(field.value(0, 0, 1), 1.0);
        assert_eq!(field.coords(17), (1, 1, 1));
        assert_eq!(field.cell_count(), 6);
    }

    #[test]
    fn test_positions() {
        let values = [0.0; 8];
        let field = ScalarField::new(&values, (2, 2, 2)).unwrap();
        assert_eq!(field.position(1, 0, 1), vec3(1.0, 0.0, 1.0));

        let field = field
            .with_origin(vec3(-1.0, 2.0, 0.5))
            .with_spacing(0.5)
            .unwrap();
        assert_eq!(field.position(1, 1, 0), vec3(-0.5, 2.5, 0.5));
        assert_eq!(field.position_at(7), vec3(-0.5, 2.5, 1.0));
    }

    #[test]
    fn test_length_mismatch() {
        let values = [0.0; 7];
        assert_eq!(
            ScalarField::new(&values, (2, 2, 2)).unwrap_err(),
            ExtractionError::LengthMismatch {
                dims: vec![2, 2, 2],
                expected: 8,
                actual: 7,
            }
        );
    }

    #[test]
    fn test_dimension_overflow() {
        let values = [0.0; 1];
        assert!(matches!(
            ScalarField::new(&values, (usize::MAX, 2, 1)),
            Err(ExtractionError::DimensionOverflow { .. })
        ));
    }

    #[test]
    fn test_spacing_must_be_positive_and_finite() {
        let values = [0.0; 8];
        let field = ScalarField::new(&values, (2, 2, 2)).unwrap();

        for &spacing in [0.0, -0.0, -1.0, f64::INFINITY].iter() {
            assert_eq!(
                field.with_spacing(spacing).unwrap_err(),
                ExtractionError::InvalidSpacing { spacing }
            );
        }
        assert!(matches!(
            field.with_spacing(f64::NAN),
            Err(ExtractionError::InvalidSpacing { spacing }) if spacing.is_nan()
        ));
        assert_eq!(field.with_spacing(1e-3).unwrap().spacing(), 1e-3);
    }

    #[test]
    fn test_degenerate_grid_has_no_cells() {
        let values = [0.0; 6];
        let field = ScalarField::new(&values, (1, 2, 3)).unwrap();
        assert_eq!(field.cell_count(), 0);

        let field = ScalarField::new(&[], (0, 4, 4)).unwrap();
        assert!(field.is_empty());
        assert_eq!(field.cell_count(), 0);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_lookup_panics() {
        let values = [0.0; 8];
        let field = ScalarField::new(&values, (2, 2, 2)).unwrap();
        field.value(2, 0, 0);
    }

    #[test]
    fn test_sample_grid() {
        let values = sample_grid((2, 1, 3), vec3(1.0, 0.0, 0.0), 2.0, |p| p.x + p.z);
        assert_eq!(values, vec![1.0, 3.0, 5.0, 3.0, 5.0, 7.0]);
    }
}
