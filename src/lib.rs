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

//! Isosurface extraction from sampled scalar fields by marching tetrahedra.
//!
//! Given samples `u` of a function on a regular 3D grid, find the triangle
//! mesh approximating the surface where the function equals a chosen level:
//!
//! ```
//! use marching_tetrahedra::marching_tetrahedra;
//!
//! // two layers of samples along the first axis, 0 below and 1 above
//! let u = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
//! let mesh = marching_tetrahedra(&u, (2, 2, 2), 0.5).unwrap();
//!
//! assert!(mesh.vertices().iter().all(|p| p[0] == 0.5));
//! ```
//!
//! For more control, configure a [MarchingTetrahedra] and feed its output
//! to any [Extractor](extractor::Extractor). The same approach in 2D is
//! available as [marching_triangles].

/// Common math types
pub mod math;

/// Errors reported by extraction.
pub mod error;

/// Read-only views over sampled scalar fields.
pub mod field;

/// Utilities for outputting mesh data in specific formats.
pub mod extractor;

/// Per-node data carried along to extracted vertices.
pub mod interpolate;

/// Algorithms for traversing the cells of a sampled grid.
pub mod traversal;

/// Lookup tables for splitting cells and marching tetrahedra.
pub mod tables;

mod index_cache;
mod isoline;
mod marching_tetrahedra;
mod marching_tetrahedra_impl;
mod mesh;
mod normals;

pub use self::{
    error::{ExtractionError, Result},
    field::ScalarField,
    isoline::*,
    marching_tetrahedra::*,
    marching_tetrahedra_impl::tetrahedron,
    mesh::{Edge, Mesh, MeshAssembler},
};
