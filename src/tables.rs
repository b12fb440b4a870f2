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

//! Lookup tables for marching tetrahedra.
//!
//! Cube corners are numbered `4 * di + 2 * dj + dk`, matching the C order of
//! the sample array:
//!
//! ```text
//!        3-----------7
//!       /|          /|
//!      1-----------5 |        k
//!      | |         | |        |
//!      | 2---------|-6        +-- i
//!      |/          |/        /
//!      0-----------4        j
//! ```

/// Offset of each cube corner from the cell's lowest corner, as `[di, dj, dk]`.
pub const CORNERS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [0, 0, 1],
    [0, 1, 0],
    [0, 1, 1],
    [1, 0, 0],
    [1, 0, 1],
    [1, 1, 0],
    [1, 1, 1],
];

/// The six tetrahedra of a cube, as cube corner indices.
///
/// Every tetrahedron contains the main diagonal 0-7, and pairs it with two
/// consecutive corners of the cycle 4, 6, 2, 3, 1, 5. Each tuple is ordered
/// so that `(p1 - p0) · ((p2 - p0) × (p3 - p0)) > 0`, which lets one case
/// table serve all six with the same winding.
pub const CELL_TETRAHEDRA: [[usize; 4]; 6] = [
    [0, 4, 6, 7],
    [0, 6, 2, 7],
    [0, 2, 3, 7],
    [0, 3, 1, 7],
    [0, 1, 5, 7],
    [0, 5, 4, 7],
];

/// The six edges of a tetrahedron, as pairs of local corner indices.
pub const TETRAHEDRON_EDGES: [[usize; 2]; 6] = [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]];

/// Triangles for each of the 16 corner classifications, as triples of
/// indices into [TETRAHEDRON_EDGES], terminated by -1.
///
/// Bit `n` of the case index is set when corner `n` is at or above the
/// level. Triangles wind counter-clockwise when viewed from the side with
/// lower values.
pub static TRIANGLE_CONNECTION: [[i8; 7]; 16] = [
    [-1, -1, -1, -1, -1, -1, -1],
    [0, 1, 2, -1, -1, -1, -1],
    [0, 4, 3, -1, -1, -1, -1],
    [1, 2, 4, 1, 4, 3, -1],
    [1, 3, 5, -1, -1, -1, -1],
    [2, 0, 3, 2, 3, 5, -1],
    [0, 4, 5, 0, 5, 1, -1],
    [2, 4, 5, -1, -1, -1, -1],
    [2, 5, 4, -1, -1, -1, -1],
    [0, 1, 5, 0, 5, 4, -1],
    [3, 0, 2, 3, 2, 5, -1],
    [1, 5, 3, -1, -1, -1, -1],
    [1, 3, 4, 1, 4, 2, -1],
    [0, 3, 4, -1, -1, -1, -1],
    [0, 2, 1, -1, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1, -1],
];
