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
    error::Result,
    field::ScalarField,
    math::Vec3,
    tables::{CELL_TETRAHEDRA, CORNERS},
};

/// Traverses over cubes in a primal grid (i.e. cubes formed by adjacent sample
/// points).
pub struct PrimalGrid<'a> {
    field: ScalarField<'a>,
}

/// The four corners of one tetrahedron within a cell: linear node indices,
/// positions and sample values, in the order given by
/// [CELL_TETRAHEDRA](crate::tables::CELL_TETRAHEDRA).
#[derive(Debug, Copy, Clone)]
pub struct Tetrahedron {
    pub keys: [usize; 4],
    pub corners: [Vec3; 4],
    pub values: [f64; 4],
}

impl<'a> PrimalGrid<'a> {
    pub fn new(field: ScalarField<'a>) -> Self {
        Self { field }
    }

    /// Traverse the primal grid in C order (first axis slowest). The callback
    /// will be invoked for each 2x2x2 set of neighbouring grid points, and
    /// provided the corner node indices, corner points, and the field values
    /// at those points. Traversal stops at the first error.
    ///
    /// Grids with fewer than 2 samples along any axis have no cells.
    pub fn traverse<C>(&self, mut callback: C) -> Result<()>
    where
        C: FnMut(&[usize; 8], &[Vec3; 8], &[f64; 8]) -> Result<()>,
    {
        let (ni, nj, nk) = self.field.dims();
        if self.field.cell_count() == 0 {
            return Ok(());
        }

        let mut keys = [0usize; 8];
        let mut corners = [Vec3::zero(); 8];
        let mut values = [0f64; 8];

        for i in 0..ni - 1 {
            for j in 0..nj - 1 {
                for k in 0..nk - 1 {
                    for c in 0..8 {
                        let [di, dj, dk] = CORNERS[c];
                        let key = self.field.index(i + di, j + dj, k + dk);
                        keys[c] = key;
                        corners[c] = self.field.position(i + di, j + dj, k + dk);
                        values[c] = self.field.value_at(key);
                    }

                    callback(&keys, &corners, &values)?;
                }
            }
        }

        Ok(())
    }
}

/// Split a cell into its six tetrahedra.
pub fn cell_tetrahedra<'c>(
    keys: &'c [usize; 8],
    corners: &'c [Vec3; 8],
    values: &'c [f64; 8],
) -> impl Iterator<Item = Tetrahedron> + 'c {
    CELL_TETRAHEDRA.iter().map(move |tet| Tetrahedron {
        keys: [keys[tet[0]], keys[tet[1]], keys[tet[2]], keys[tet[3]]],
        corners: [
            corners[tet[0]],
            corners[tet[1]],
            corners[tet[2]],
            corners[tet[3]],
        ],
        values: [
            values[tet[0]],
            values[tet[1]],
            values[tet[2]],
            values[tet[3]],
        ],
    })
}
