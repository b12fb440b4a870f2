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
use crate::tables::{TETRAHEDRON_EDGES, TRIANGLE_CONNECTION};

/// Classify the corners of a tetrahedron (or a whole cube) against `level`.
///
/// Bit `n` of the result is set when `values[n] >= level`. A sample exactly
/// on the level therefore counts as inside. For a cube, cases 0 and 255
/// cannot contain any surface.
pub fn classify_corners<const N: usize>(values: &[f64; N], level: f64) -> usize {
    let mut case = 0;
    for (i, &value) in values.iter().enumerate() {
        if value >= level {
            case |= 1 << i;
        }
    }
    case
}

/// March a single tetrahedron, given its corner classification.
///
/// Yields one triple of local edge indices (see
/// [TETRAHEDRON_EDGES](crate::tables::TETRAHEDRON_EDGES)) per output
/// triangle. It would in many ways be simpler to output triangles directly,
/// but callers producing indexed geometry need to deduplicate vertices
/// before forming triangles.
pub fn march_tetrahedron(case: usize) -> impl Iterator<Item = [usize; 3]> {
    TRIANGLE_CONNECTION[case]
        .chunks_exact(3)
        .take_while(|triangle| triangle[0] >= 0)
        .map(|triangle| {
            [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ]
        })
}

/// The pair of local corners joined by the given tetrahedron edge.
#[inline]
pub fn edge_corners(edge: usize) -> (usize, usize) {
    let [a, b] = TETRAHEDRON_EDGES[edge];
    (a, b)
}

/// Find the intersection of the level set of a linear function with a single
/// tetrahedron.
///
/// `values` are the function values at the 4 corners, already offset so that
/// the level of interest is zero. `emit_vertex` is called once per crossed
/// edge with the two local corners of that edge, in the order the vertices
/// are needed; `emit_face` then receives triangles as indices into the
/// emitted vertices.
///
/// Winding follows the crate-wide convention when the tetrahedron corners
/// are positively oriented: triangles are counter-clockwise seen from the
/// side with lower values.
pub fn tetrahedron<FV, FF>(values: [f64; 4], mut emit_vertex: FV, mut emit_face: FF)
where
    FV: FnMut(usize, usize),
    FF: FnMut([u32; 3]),
{
    let case = classify_corners(&values, 0.0);

    // local edge -> emitted vertex
    let mut emitted = [u32::MAX; 6];
    let mut count = 0;

    for triangle in march_tetrahedron(case) {
        let mut face = [0u32; 3];
        for (slot, &edge) in face.iter_mut().zip(triangle.iter()) {
            if emitted[edge] == u32::MAX {
                let (a, b) = edge_corners(edge);
                emit_vertex(a, b);
                emitted[edge] = count;
                count += 1;
            }
            *slot = emitted[edge];
        }
        emit_face(face);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        interpolate::find_crossing_point,
        math::{vec3, Vec3},
        tables::{CELL_TETRAHEDRA, CORNERS},
    };

    fn corner_position(corner: usize) -> Vec3 {
        let [i, j, k] = CORNERS[corner];
        vec3(i as f64, j as f64, k as f64)
    }

    #[test]
    fn test_classify_uses_greater_or_equal() {
        assert_eq!(classify_corners(&[0.0, 0.0, 0.0, 0.0], 0.5), 0);
        assert_eq!(classify_corners(&[1.0, 1.0, 1.0, 1.0], 0.5), 15);
        assert_eq!(classify_corners(&[0.5, 0.0, 0.0, 1.0], 0.5), 0b1001);
        assert_eq!(classify_corners(&[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0], 0.5), 0xf0);
    }

    #[test]
    fn test_empty_cases_emit_nothing() {
        assert_eq!(march_tetrahedron(0).count(), 0);
        assert_eq!(march_tetrahedron(15).count(), 0);
        assert_eq!(march_tetrahedron(0b0001).count(), 1);
        assert_eq!(march_tetrahedron(0b0110).count(), 2);
    }

    #[test]
    fn test_single_tetrahedron_emission() {
        let mut vertices = vec![];
        let mut faces = vec![];
        tetrahedron(
            [1.0, -1.0, -1.0, -1.0],
            |a, b| vertices.push((a, b)),
            |f| faces.push(f),
        );
        assert_eq!(vertices, vec![(0, 1), (0, 2), (0, 3)]);
        assert_eq!(faces, vec![[0, 1, 2]]);

        let mut vertices = vec![];
        let mut faces = vec![];
        tetrahedron(
            [1.0, 1.0, -1.0, -1.0],
            |a, b| vertices.push((a, b)),
            |f| faces.push(f),
        );
        assert_eq!(vertices.len(), 4);
        assert_eq!(faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_winding_faces_lower_values() {
        // Every case in every tetrahedron of the cube, checked against the
        // gradient of the linear function through the corner values.
        for tet in CELL_TETRAHEDRA.iter() {
            let p: Vec<Vec3> = tet.iter().map(|&c| corner_position(c)).collect();

            for case in 1..15usize {
                let values: Vec<f64> = (0..4)
                    .map(|n| {
                        let jitter = 0.1 * n as f64;
                        if case & (1 << n) != 0 {
                            1.0 + jitter
                        } else {
                            -1.0 - jitter
                        }
                    })
                    .collect();

                // solve for the gradient of the linear interpolant
                let e1 = p[1] - p[0];
                let e2 = p[2] - p[0];
                let e3 = p[3] - p[0];
                let volume = e1.dot(e2.cross(e3));
                let d1 = values[1] - values[0];
                let d2 = values[2] - values[0];
                let d3 = values[3] - values[0];
                let gradient =
                    (e2.cross(e3) * d1 + e3.cross(e1) * d2 + e1.cross(e2) * d3) / volume;

                for triangle in march_tetrahedron(case) {
                    let v: Vec<Vec3> = triangle
                        .iter()
                        .map(|&edge| {
                            let (a, b) = edge_corners(edge);
                            find_crossing_point(p[a], p[b], values[a], values[b], 0.0)
                        })
                        .collect();
                    let face_normal = (v[1] - v[0]).cross(v[2] - v[0]);
                    assert!(
                        face_normal.dot(-gradient) > 0.0,
                        "tetrahedron {:?} case {:#06b}",
                        tet,
                        case
                    );
                }
            }
        }
    }
}
