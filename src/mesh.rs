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
    extractor::Extractor,
    index_cache::{EdgeKey, IndexCache},
    math::Vec3,
};
use std::{collections::HashMap, convert::TryFrom};

/// An edge within a mesh. Edges are bidirectional (i.e. Edge(u,v) and Edge(v,u)
/// represent the same edge)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Edge(u32, u32);

impl Edge {
    /// Construct a new edge from the two vertices it connects.
    /// The edge direction will be normalised during construction.
    pub fn new(a: u32, b: u32) -> Edge {
        if a > b {
            Edge(b, a)
        } else {
            Edge(a, b)
        }
    }

    /// The start of the edge. Note that edge directions are normalised.
    pub fn start(&self) -> u32 {
        self.0
    }

    /// The end of the edge. Note that edge directions are normalised.
    pub fn end(&self) -> u32 {
        self.1
    }
}

/// A triangle mesh extracted from a scalar field.
///
/// `normals` is index-aligned with `vertices`, and every face index is less
/// than the vertex count. A mesh owns its buffers outright and holds no
/// reference to the field it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<[f64; 3]>,
    normals: Vec<[f64; 3]>,
    faces: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn vertices(&self) -> &[[f64; 3]] {
        &self.vertices
    }

    pub fn normals(&self) -> &[[f64; 3]] {
        &self.normals
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.vertices.is_empty()
    }

    /// Vertex positions as a flat `vertex_count × 3` array.
    pub fn vertex_buffer(&self) -> &[f64] {
        self.vertices.as_flattened()
    }

    /// Vertex normals as a flat `vertex_count × 3` array.
    pub fn normal_buffer(&self) -> &[f64] {
        self.normals.as_flattened()
    }

    /// Face indices as a flat `face_count × 3` array.
    pub fn index_buffer(&self) -> &[u32] {
        self.faces.as_flattened()
    }

    /// The number of faces using each edge of the mesh.
    ///
    /// In a closed, manifold mesh every edge is used by exactly 2 faces.
    /// Edges used by a single face lie on the boundary of the surface.
    pub fn edge_valence(&self) -> HashMap<Edge, usize> {
        let mut valence = HashMap::new();
        for &[a, b, c] in &self.faces {
            for &edge in [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)].iter() {
                *valence.entry(edge).or_insert(0) += 1;
            }
        }
        valence
    }

    /// Edges used by exactly one face, in ascending order.
    pub fn boundary_edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .edge_valence()
            .into_iter()
            .filter(|&(_, count)| count == 1)
            .map(|(edge, _)| edge)
            .collect();
        edges.sort();
        edges
    }
}

/// Collects extracted vertices and faces into a [Mesh].
#[derive(Default)]
pub struct MeshAssembler {
    mesh: Mesh,
}

impl MeshAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self) -> Mesh {
        self.mesh
    }
}

impl Extractor for MeshAssembler {
    fn extract_vertex(&mut self, vertex: Vec3, normal: Vec3) -> Result<()> {
        self.mesh.vertices.try_reserve(1)?;
        self.mesh.normals.try_reserve(1)?;
        self.mesh.vertices.push(vertex.to_array());
        self.mesh.normals.push(normal.to_array());
        Ok(())
    }

    fn extract_face(&mut self, face: [u32; 3]) -> Result<()> {
        self.mesh.faces.try_reserve(1)?;
        self.mesh.faces.push(face);
        Ok(())
    }
}

/// Welds vertices by the grid edge they lie on, forwarding each distinct
/// vertex and every face to an [Extractor].
pub struct MeshBuilder<'a, E: Extractor> {
    index_cache: IndexCache<EdgeKey, u32>,
    vertex_count: usize,
    face_count: usize,
    extractor: &'a mut E,
}

impl<'a, E: Extractor> MeshBuilder<'a, E> {
    pub fn new(extractor: &'a mut E) -> Self {
        Self {
            index_cache: IndexCache::new(),
            vertex_count: 0,
            face_count: 0,
            extractor,
        }
    }

    /// Find the vertex on the edge `key`, creating it on first use.
    ///
    /// `vertex` is only invoked for edges not seen before, and returns the
    /// position and normal of the new vertex.
    pub fn add_vertex<F>(&mut self, key: EdgeKey, vertex: F) -> Result<u32>
    where
        F: FnOnce() -> Result<(Vec3, Vec3)>,
    {
        if let Some(index) = self.index_cache.get(key) {
            return Ok(index);
        }

        let index = u32::try_from(self.vertex_count).map_err(|_| {
            ExtractionError::TooManyVertices {
                count: self.vertex_count + 1,
            }
        })?;

        let (position, normal) = vertex()?;
        self.extractor.extract_vertex(position, normal)?;
        self.index_cache.put(key, index)?;
        self.vertex_count += 1;

        Ok(index)
    }

    /// Add a new face, given 3 vertices in counter-clockwise order.
    pub fn add_face(&mut self, a: u32, b: u32, c: u32) -> Result<()> {
        self.extractor.extract_face([a, b, c])?;
        self.face_count += 1;
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn face_count(&self) -> usize {
        self.face_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3;

    #[test]
    fn test_builder_welds_shared_edges() {
        let mut assembler = MeshAssembler::new();
        let mut builder = MeshBuilder::new(&mut assembler);

        let mut created = 0;
        let mut vertex = |key: EdgeKey, p: Vec3| {
            builder
                .add_vertex(key, || {
                    created += 1;
                    Ok((p, vec3(0.0, 0.0, 1.0)))
                })
                .unwrap()
        };

        let a = vertex(EdgeKey::new(0, 1), vec3(0.5, 0.0, 0.0));
        let b = vertex(EdgeKey::new(0, 2), vec3(0.0, 0.5, 0.0));
        let c = vertex(EdgeKey::new(1, 3), vec3(1.0, 0.5, 0.0));
        let b2 = vertex(EdgeKey::new(2, 0), vec3(9.0, 9.0, 9.0));

        assert_eq!((a, b, c, b2), (0, 1, 2, 1));
        assert_eq!(created, 3);

        builder.add_face(a, b, c).unwrap();
        assert_eq!(builder.vertex_count(), 3);
        assert_eq!(builder.face_count(), 1);

        let mesh = assembler.build();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.vertices()[1], [0.0, 0.5, 0.0]);
        assert_eq!(mesh.normals().len(), 3);
        assert_eq!(mesh.faces(), &[[0, 1, 2]]);
        assert_eq!(mesh.vertex_buffer().len(), 9);
        assert_eq!(mesh.index_buffer(), &[0, 1, 2]);
    }

    #[test]
    fn test_edge_valence() {
        let mut assembler = MeshAssembler::new();
        for _ in 0..4 {
            assembler.extract_vertex(Vec3::zero(), Vec3::zero()).unwrap();
        }
        assembler.extract_face([0, 1, 2]).unwrap();
        assembler.extract_face([0, 2, 3]).unwrap();
        let mesh = assembler.build();

        let valence = mesh.edge_valence();
        assert_eq!(valence.len(), 5);
        assert_eq!(valence[&Edge::new(2, 0)], 2);
        assert_eq!(
            mesh.boundary_edges(),
            vec![
                Edge::new(0, 1),
                Edge::new(0, 3),
                Edge::new(1, 2),
                Edge::new(2, 3)
            ]
        );
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = MeshAssembler::new().build();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.face_count(), 0);
        assert!(mesh.boundary_edges().is_empty());
    }
}
