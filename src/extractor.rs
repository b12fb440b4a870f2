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
use crate::{error::Result, math::Vec3};

/// Trait for outputting mesh vertices and faces.
///
/// Vertices arrive in index order, each exactly once; faces refer to
/// vertices that have already been extracted. Either call may fail if the
/// output cannot grow, which aborts the extraction.
pub trait Extractor {
    fn extract_vertex(&mut self, vertex: Vec3, normal: Vec3) -> Result<()>;
    fn extract_face(&mut self, face: [u32; 3]) -> Result<()>;
}

fn append<T: Copy>(buffer: &mut Vec<T>, items: &[T]) -> Result<()> {
    buffer.try_reserve(items.len())?;
    buffer.extend_from_slice(items);
    Ok(())
}

/// Output vertices as a tightly packed array of doubles, and faces as a
/// tightly packed array of indices. Normals are discarded.
pub struct IndexedVertices<'a> {
    vertices: &'a mut Vec<f64>,
    indices: &'a mut Vec<u32>,
}

impl<'a> IndexedVertices<'a> {
    pub fn new(vertices: &'a mut Vec<f64>, indices: &'a mut Vec<u32>) -> Self {
        Self { vertices, indices }
    }
}

impl<'a> Extractor for IndexedVertices<'a> {
    fn extract_vertex(&mut self, v: Vec3, _: Vec3) -> Result<()> {
        append(self.vertices, &[v.x, v.y, v.z])
    }

    fn extract_face(&mut self, face: [u32; 3]) -> Result<()> {
        append(self.indices, &face)
    }
}

/// Output each vertex followed by its normal, as a tightly packed array of
/// doubles, and faces as a tightly packed array of indices.
pub struct IndexedInterleavedNormals<'a> {
    vertices: &'a mut Vec<f64>,
    indices: &'a mut Vec<u32>,
}

impl<'a> IndexedInterleavedNormals<'a> {
    pub fn new(vertices: &'a mut Vec<f64>, indices: &'a mut Vec<u32>) -> Self {
        Self { vertices, indices }
    }
}

impl<'a> Extractor for IndexedInterleavedNormals<'a> {
    fn extract_vertex(&mut self, v: Vec3, n: Vec3) -> Result<()> {
        append(self.vertices, &[v.x, v.y, v.z, n.x, n.y, n.z])
    }

    fn extract_face(&mut self, face: [u32; 3]) -> Result<()> {
        append(self.indices, &face)
    }
}
