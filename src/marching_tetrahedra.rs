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
    field::ScalarField,
    index_cache::EdgeKey,
    interpolate::{crossing_offset, Interpolate},
    marching_tetrahedra_impl::{classify_corners, edge_corners, march_tetrahedron, tetrahedron},
    math::Vec3,
    mesh::{Mesh, MeshAssembler, MeshBuilder},
    normals::CentralDifference,
    traversal::{cell_tetrahedra, PrimalGrid, Tetrahedron},
};
use tracing::{debug, trace};

/// Extracts meshes from sampled scalar fields using the marching tetrahedra
/// algorithm.
///
/// Each grid cell is split into six tetrahedra around its main diagonal, and
/// the field is treated as linear within each tetrahedron. Samples at or
/// above the level are inside the surface.
///
/// Pros:
///
/// * Only 3 distinct cases, so no ambiguous configurations and no holes.
/// * Vertices are welded by grid edge, so the mesh is watertight.
///
/// Cons:
///
/// * Produces noticeably more triangles than marching cubes.
/// * Triangle shapes follow the tetrahedral split, which can look streaky
///   on flat regions.
#[derive(Debug, Copy, Clone)]
pub struct MarchingTetrahedra {
    level: f64,
    normal_epsilon: f64,
    normals: bool,
}

impl MarchingTetrahedra {
    /// Create a new MarchingTetrahedra extracting the surface where the field
    /// equals `level`.
    pub fn new(level: f64) -> Self {
        Self {
            level,
            normal_epsilon: f64::EPSILON,
            normals: true,
        }
    }

    /// Treat blended gradients shorter than `epsilon` as degenerate, giving
    /// the vertex a zero normal.
    pub fn with_normal_epsilon(mut self, epsilon: f64) -> Self {
        self.normal_epsilon = epsilon;
        self
    }

    /// Enable or disable normal estimation. When disabled every vertex gets
    /// a zero normal.
    pub fn with_normals(mut self, normals: bool) -> Self {
        self.normals = normals;
        self
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Extracts a mesh from the given [ScalarField].
    ///
    /// The resulting vertex and face data will be returned via the provided
    /// Extractor, vertices first seen first. Faces wind counter-clockwise
    /// seen from the side of lower values, which is also where the normals
    /// point.
    pub fn extract<E>(&self, field: &ScalarField, extractor: &mut E) -> Result<()>
    where
        E: Extractor,
    {
        let data = vec![(); field.len()];
        self.extract_impl(field, &data, |_| Ok(()), extractor)
    }

    /// As [extract](Self::extract), but also linearly interpolates the
    /// per-node `data` to every extracted vertex.
    ///
    /// `data` must hold one entry per grid node, in the same order as the
    /// field samples. The returned vector is index-aligned with the
    /// extracted vertices.
    pub fn extract_with_data<T, E>(
        &self,
        field: &ScalarField,
        data: &[T],
        extractor: &mut E,
    ) -> Result<Vec<T>>
    where
        T: Interpolate,
        E: Extractor,
    {
        check_data_len(field, data)?;

        let mut interpolated = Vec::new();
        self.extract_impl(
            field,
            data,
            |datum| {
                interpolated.try_reserve(1)?;
                interpolated.push(datum);
                Ok(())
            },
            extractor,
        )?;

        Ok(interpolated)
    }

    /// Emit every triangle of the surface on its own, with the positions of
    /// its corners and the per-node `data` interpolated to them.
    ///
    /// Nothing is welded: a vertex shared by several triangles is emitted
    /// once per triangle. Triangles arrive in the same order, and with the
    /// same winding, as the faces from [extract](Self::extract).
    pub fn for_each_triangle<T, F>(&self, field: &ScalarField, data: &[T], mut emit: F) -> Result<()>
    where
        T: Interpolate + Clone,
        F: FnMut([Vec3; 3], [T; 3]),
    {
        check_data_len(field, data)?;

        let level = self.level;
        let mut vertices: Vec<(Vec3, T)> = Vec::with_capacity(4);
        let mut faces: Vec<[u32; 3]> = Vec::with_capacity(2);

        PrimalGrid::new(*field).traverse(|keys, corners, values| {
            let case = classify_corners(values, level);
            if case == 0 || case == 255 {
                return Ok(());
            }

            for tet in cell_tetrahedra(keys, corners, values) {
                vertices.clear();
                faces.clear();

                tetrahedron(
                    tet.values.map(|value| value - level),
                    |a, b| {
                        let (a, b) = ordered(&tet, a, b);
                        let t = crossing_offset(tet.values[a], tet.values[b], level);
                        vertices.push((
                            tet.corners[a].lerp(tet.corners[b], t),
                            data[tet.keys[a]].interpolate(&data[tet.keys[b]], t),
                        ));
                    },
                    |face| faces.push(face),
                );

                for face in &faces {
                    let [a, b, c] = face.map(|index| &vertices[index as usize]);
                    emit([a.0, b.0, c.0], [a.1.clone(), b.1.clone(), c.1.clone()]);
                }
            }

            Ok(())
        })
    }

    /// March a single axis-aligned cube with its lowest corner at `corner`
    /// and edges of length `size`.
    ///
    /// `values` are ordered so that corner `4 * di + 2 * dj + dk` is offset
    /// by `(di, dj, dk) * size` from `corner`: the first coordinate changes
    /// slowest. Vertices are welded within the cube and normals come from
    /// one-sided differences across it. Fails unless `size` is positive and
    /// finite.
    pub fn extract_cube<E>(
        &self,
        corner: Vec3,
        size: f64,
        values: &[f64; 8],
        extractor: &mut E,
    ) -> Result<()>
    where
        E: Extractor,
    {
        let field = ScalarField::new(values, (2, 2, 2))?
            .with_origin(corner)
            .with_spacing(size)?;
        self.extract(&field, extractor)
    }

    fn extract_impl<T, D, E>(
        &self,
        field: &ScalarField,
        data: &[T],
        mut on_datum: D,
        extractor: &mut E,
    ) -> Result<()>
    where
        T: Interpolate,
        D: FnMut(T) -> Result<()>,
        E: Extractor,
    {
        let (ni, nj, nk) = field.dims();
        let level = self.level;
        debug!(ni, nj, nk, level, "extracting isosurface");

        if field.cell_count() == 0 {
            debug!(ni, nj, nk, "grid has no cells, isosurface is empty");
            return Ok(());
        }

        let estimator = CentralDifference::new_with_epsilon(*field, self.normal_epsilon);
        let mut builder = MeshBuilder::new(extractor);

        let mut cells = 0usize;
        let mut skipped = 0usize;
        let mut flat_normals = 0usize;

        PrimalGrid::new(*field).traverse(|keys, corners, values| {
            cells += 1;

            let case = classify_corners(values, level);
            if case == 0 || case == 255 {
                skipped += 1;
                return Ok(());
            }

            for tet in cell_tetrahedra(keys, corners, values) {
                let case = classify_corners(&tet.values, level);

                for triangle in march_tetrahedron(case) {
                    let mut face = [0u32; 3];

                    for (slot, &edge) in face.iter_mut().zip(triangle.iter()) {
                        let (a, b) = edge_corners(edge);
                        let (a, b) = ordered(&tet, a, b);
                        let (key_a, key_b) = (tet.keys[a], tet.keys[b]);

                        *slot = builder.add_vertex(EdgeKey::new(key_a, key_b), || {
                            let t = crossing_offset(tet.values[a], tet.values[b], level);
                            let position = tet.corners[a].lerp(tet.corners[b], t);

                            let normal = if self.normals {
                                estimator.normal_on_edge(key_a, key_b, t).unwrap_or_else(|| {
                                    flat_normals += 1;
                                    trace!(?position, "degenerate gradient, using zero normal");
                                    Vec3::zero()
                                })
                            } else {
                                Vec3::zero()
                            };

                            on_datum(data[key_a].interpolate(&data[key_b], t))?;
                            Ok((position, normal))
                        })?;
                    }

                    builder.add_face(face[0], face[1], face[2])?;
                }
            }

            Ok(())
        })?;

        debug!(
            vertices = builder.vertex_count(),
            faces = builder.face_count(),
            cells,
            skipped,
            flat_normals,
            "extracted isosurface"
        );

        Ok(())
    }
}

/// Order the corners of a tetrahedron edge by node index, so that a grid
/// edge shared by several cells is always interpolated in the same direction.
#[inline]
fn ordered(tet: &Tetrahedron, a: usize, b: usize) -> (usize, usize) {
    if tet.keys[a] <= tet.keys[b] {
        (a, b)
    } else {
        (b, a)
    }
}

fn check_data_len<T>(field: &ScalarField, data: &[T]) -> Result<()> {
    if data.len() != field.len() {
        return Err(ExtractionError::DataLengthMismatch {
            expected: field.len(),
            actual: data.len(),
        });
    }
    Ok(())
}

/// Finds the isosurface at `level` of a function given by its values `u` on
/// a regular grid, using the marching tetrahedra algorithm.
///
/// `dims` is the dimension of the array `u`, assumed to be in row-major (C)
/// order. Node `(i, j, k)` sits at position `(i, j, k)`.
pub fn marching_tetrahedra(u: &[f64], dims: (usize, usize, usize), level: f64) -> Result<Mesh> {
    let field = ScalarField::new(u, dims)?;
    let mut assembler = MeshAssembler::new();
    MarchingTetrahedra::new(level).extract(&field, &mut assembler)?;
    Ok(assembler.build())
}

/// As [marching_tetrahedra], but also linearly interpolates the provided
/// per-node `data` to each vertex.
pub fn marching_tetrahedra_with_data<T>(
    u: &[f64],
    dims: (usize, usize, usize),
    level: f64,
    data: &[T],
) -> Result<(Mesh, Vec<T>)>
where
    T: Interpolate,
{
    let field = ScalarField::new(u, dims)?;
    let mut assembler = MeshAssembler::new();
    let interpolated =
        MarchingTetrahedra::new(level).extract_with_data(&field, data, &mut assembler)?;
    Ok((assembler.build(), interpolated))
}
