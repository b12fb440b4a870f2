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

//! Isolines of 2D scalar fields, by marching triangles.
//!
//! The planar counterpart of marching tetrahedra: each grid square is split
//! into two triangles along its `(i, j)` to `(i + 1, j + 1)` diagonal, and the
//! field is treated as linear within each triangle. Neighbouring squares
//! agree on every shared edge, so segments chain into continuous polylines.

use crate::{
    error::{ExtractionError, Result},
    index_cache::{EdgeKey, IndexCache},
    interpolate::{crossing_offset, Interpolate},
    marching_tetrahedra_impl::classify_corners,
    math::{vec2, Vec2},
};
use tracing::debug;

/// Offset of each square corner from the square's lowest corner, as
/// `[di, dj]`. Corners are numbered `2 * di + dj`.
const SQUARE_CORNERS: [[usize; 2]; 4] = [[0, 0], [0, 1], [1, 0], [1, 1]];

/// The two triangles of a square, counter-clockwise in the `(i, j)` plane.
const SQUARE_TRIANGLES: [[usize; 3]; 2] = [[0, 2, 3], [0, 3, 1]];

/// One connected piece of an isoline.
///
/// Points are ordered so that values above the level lie to the left when
/// walking the line in the `(i, j)` plane. A closed loop does not repeat its
/// first point at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct Isoline {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

impl Isoline {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Finds the isolines at `level` of a function given by its values `u` on a
/// regular 2D grid.
///
/// `dims` is the dimension of the array `u`, assumed to be in row-major (C)
/// order; node `(i, j)` sits at position `(i, j)`. Open lines, which end on
/// the grid boundary, are returned before closed loops. The order within
/// each group depends only on the input.
pub fn marching_triangles(u: &[f64], dims: (usize, usize), level: f64) -> Result<Vec<Isoline>> {
    check_grid(u.len(), dims)?;
    let (ni, nj) = dims;
    debug!(ni, nj, level, "extracting isolines");

    if ni < 2 || nj < 2 {
        return Ok(vec![]);
    }

    let mut segments = Segments::new();

    march_squares(u, dims, level, |[from, to]| {
        let mut vertex = |crossing: Crossing| {
            segments.vertex(EdgeKey::new(crossing.a, crossing.b), || {
                node_position(crossing.a, nj).lerp(node_position(crossing.b, nj), crossing.t)
            })
        };

        let start = vertex(from)?;
        let end = vertex(to)?;
        segments.link(start, end);
        Ok(())
    })?;

    let isolines = segments.into_isolines()?;
    debug!(count = isolines.len(), "extracted isolines");
    Ok(isolines)
}

/// Emit every isoline segment at `level` on its own, with the positions of
/// its ends and the per-node `data` interpolated to them.
///
/// Nothing is chained or welded, and nothing is allocated. Segments keep
/// values at or above the level on their left, as in [marching_triangles].
/// `data` must hold one entry per grid node, in the same order as `u`.
pub fn marching_triangles_with_data_emit<T, F>(
    u: &[f64],
    data: &[T],
    dims: (usize, usize),
    level: f64,
    mut emit: F,
) -> Result<()>
where
    T: Interpolate,
    F: FnMut([Vec2; 2], [T; 2]),
{
    check_grid(u.len(), dims)?;
    if data.len() != u.len() {
        return Err(ExtractionError::DataLengthMismatch {
            expected: u.len(),
            actual: data.len(),
        });
    }

    let (ni, nj) = dims;
    debug!(ni, nj, level, "emitting isoline segments");

    if ni < 2 || nj < 2 {
        return Ok(());
    }

    let mut count = 0usize;
    march_squares(u, dims, level, |crossings| {
        let points = crossings.map(|crossing| {
            node_position(crossing.a, nj).lerp(node_position(crossing.b, nj), crossing.t)
        });
        let values =
            crossings.map(|crossing| data[crossing.a].interpolate(&data[crossing.b], crossing.t));
        emit(points, values);
        count += 1;
        Ok(())
    })?;

    debug!(count, "emitted isoline segments");
    Ok(())
}

fn check_grid(len: usize, (ni, nj): (usize, usize)) -> Result<()> {
    let expected = ni
        .checked_mul(nj)
        .ok_or_else(|| ExtractionError::DimensionOverflow {
            dims: vec![ni, nj],
        })?;
    if len != expected {
        return Err(ExtractionError::LengthMismatch {
            dims: vec![ni, nj],
            expected,
            actual: len,
        });
    }
    Ok(())
}

fn node_position(index: usize, nj: usize) -> Vec2 {
    vec2((index / nj) as f64, (index % nj) as f64)
}

/// Where a segment meets a grid edge: `t` of the way from node `a` to node
/// `b`, with `a` the lower linear index.
#[derive(Debug, Copy, Clone)]
struct Crossing {
    a: usize,
    b: usize,
    t: f64,
}

/// Walk every square of a grid with at least two nodes along each axis,
/// calling `on_segment` with the start and end crossing of each segment.
fn march_squares<F>(
    u: &[f64],
    (ni, nj): (usize, usize),
    level: f64,
    mut on_segment: F,
) -> Result<()>
where
    F: FnMut([Crossing; 2]) -> Result<()>,
{
    for i in 0..ni - 1 {
        for j in 0..nj - 1 {
            let keys = SQUARE_CORNERS.map(|[di, dj]| (i + di) * nj + j + dj);
            let values = keys.map(|key| u[key]);

            let case = classify_corners(&values, level);
            if case == 0 || case == 15 {
                continue;
            }

            for triangle in SQUARE_TRIANGLES.iter() {
                let case = classify_corners(&triangle.map(|c| values[c]), level);
                let (from, to) = match segment_edges(case) {
                    Some(edges) => edges,
                    None => continue,
                };

                let crossing = |[a, b]: [usize; 2]| {
                    let (a, b) = (triangle[a], triangle[b]);
                    let (a, b) = if keys[a] <= keys[b] { (a, b) } else { (b, a) };
                    Crossing {
                        a: keys[a],
                        b: keys[b],
                        t: crossing_offset(values[a], values[b], level),
                    }
                };

                on_segment([crossing(from), crossing(to)])?;
            }
        }
    }

    Ok(())
}

/// The crossed edges of a triangle, as pairs of local corners, given its
/// corner classification. The segment runs from the first edge to the
/// second, keeping the corners at or above the level on its left.
fn segment_edges(case: usize) -> Option<([usize; 2], [usize; 2])> {
    // the corner on its own side of the level, and whether it is high
    let (odd, high) = match case {
        0b001 => (0, true),
        0b010 => (1, true),
        0b100 => (2, true),
        0b110 => (0, false),
        0b101 => (1, false),
        0b011 => (2, false),
        _ => return None,
    };

    let (prev, next) = ((odd + 2) % 3, (odd + 1) % 3);
    if high {
        Some(([odd, next], [prev, odd]))
    } else {
        Some(([prev, odd], [odd, next]))
    }
}

/// Directed segments between welded edge crossings.
///
/// Each crossing is the end of at most one segment and the start of at most
/// one other, so the segments form disjoint chains and loops.
struct Segments {
    index_cache: IndexCache<EdgeKey, usize>,
    points: Vec<Vec2>,
    next: Vec<Option<usize>>,
    has_prev: Vec<bool>,
}

impl Segments {
    fn new() -> Self {
        Self {
            index_cache: IndexCache::new(),
            points: vec![],
            next: vec![],
            has_prev: vec![],
        }
    }

    fn vertex<F>(&mut self, key: EdgeKey, position: F) -> Result<usize>
    where
        F: FnOnce() -> Vec2,
    {
        if let Some(index) = self.index_cache.get(key) {
            return Ok(index);
        }

        let index = self.points.len();
        self.points.try_reserve(1)?;
        self.next.try_reserve(1)?;
        self.has_prev.try_reserve(1)?;
        self.points.push(position());
        self.next.push(None);
        self.has_prev.push(false);
        self.index_cache.put(key, index)?;

        Ok(index)
    }

    fn link(&mut self, from: usize, to: usize) {
        self.next[from] = Some(to);
        self.has_prev[to] = true;
    }

    fn into_isolines(self) -> Result<Vec<Isoline>> {
        let mut visited = vec![false; self.points.len()];
        let mut isolines = vec![];

        // chains start where no segment ends
        for start in 0..self.points.len() {
            if !self.has_prev[start] && !visited[start] {
                isolines.try_reserve(1)?;
                isolines.push(self.walk(start, false, &mut visited)?);
            }
        }

        // whatever remains lies on a loop
        for start in 0..self.points.len() {
            if !visited[start] {
                isolines.try_reserve(1)?;
                isolines.push(self.walk(start, true, &mut visited)?);
            }
        }

        Ok(isolines)
    }

    fn walk(&self, start: usize, closed: bool, visited: &mut [bool]) -> Result<Isoline> {
        let mut points = vec![];
        let mut current = start;

        loop {
            visited[current] = true;
            points.try_reserve(1)?;
            points.push(self.points[current]);

            match self.next[current] {
                Some(next) if !visited[next] => current = next,
                _ => break,
            }
        }

        Ok(Isoline { points, closed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(dims: (usize, usize), f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
        let mut u = Vec::with_capacity(dims.0 * dims.1);
        for i in 0..dims.0 {
            for j in 0..dims.1 {
                u.push(f(i as f64, j as f64));
            }
        }
        u
    }

    fn signed_area(points: &[Vec2]) -> f64 {
        let mut area = 0.0;
        for n in 0..points.len() {
            let (a, b) = (points[n], points[(n + 1) % points.len()]);
            area += a.x * b.y - b.x * a.y;
        }
        area / 2.0
    }

    #[test]
    fn test_straight_line() {
        let u = sample((3, 3), |i, _| i);
        let isolines = marching_triangles(&u, (3, 3), 0.5).unwrap();

        assert_eq!(
            isolines,
            vec![Isoline {
                points: vec![
                    vec2(0.5, 2.0),
                    vec2(0.5, 1.5),
                    vec2(0.5, 1.0),
                    vec2(0.5, 0.5),
                    vec2(0.5, 0.0),
                ],
                closed: false,
            }]
        );
    }

    #[test]
    fn test_circle_is_a_clockwise_loop() {
        let u = sample((7, 7), |i, j| (i - 3.0).powi(2) + (j - 3.0).powi(2));
        let isolines = marching_triangles(&u, (7, 7), 4.5).unwrap();

        assert_eq!(isolines.len(), 1);
        let circle = &isolines[0];
        assert!(circle.closed);
        assert!(circle.len() >= 8);
        assert_ne!(circle.points.first(), circle.points.last());

        for p in &circle.points {
            let r = (*p - vec2(3.0, 3.0)).len();
            assert!(r > 1.5 && r < 2.2, "{:?}", p);
        }

        // higher values outside, on the left, so the loop runs clockwise
        assert!(signed_area(&circle.points) < 0.0);
    }

    #[test]
    fn test_open_lines_come_first() {
        let u = sample((10, 10), |i, j| {
            (i * i + j * j).min((i - 6.0).powi(2) + (j - 6.0).powi(2))
        });
        let isolines = marching_triangles(&u, (10, 10), 4.5).unwrap();

        assert_eq!(isolines.len(), 2);
        assert!(!isolines[0].closed);
        assert!(isolines[1].closed);

        // the arc around the corner ends on the grid boundary
        let arc = &isolines[0];
        let on_boundary = |p: &Vec2| p.x == 0.0 || p.y == 0.0;
        assert!(on_boundary(&arc.points[0]));
        assert!(on_boundary(&arc.points[arc.len() - 1]));
    }

    #[test]
    fn test_flat_and_degenerate_fields() {
        let u = vec![1.0; 12];
        assert!(marching_triangles(&u, (3, 4), 0.0).unwrap().is_empty());
        assert!(marching_triangles(&u, (1, 12), 0.5).unwrap().is_empty());
        assert!(marching_triangles(&[], (0, 5), 0.5).unwrap().is_empty());
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        assert_eq!(
            marching_triangles(&[0.0; 5], (2, 3), 0.0).unwrap_err(),
            ExtractionError::LengthMismatch {
                dims: vec![2, 3],
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn test_emitted_segments_measure_the_circle() {
        let n = 101;
        let step = 1.0 / (n - 1) as f64;
        let u = sample((n, n), |i, j| {
            let (x, y) = (i * step - 0.5, j * step - 0.5);
            (x * x + y * y).sqrt()
        });
        let data = vec![(); u.len()];

        let mut length = 0.0;
        let mut count = 0;
        marching_triangles_with_data_emit(&u, &data, (n, n), 0.3, |[a, b], _| {
            length += (b - a).len();
            count += 1;
        })
        .unwrap();

        // measured in grid units, so scale back to the unit square
        let length = length * step;
        assert!((length - 2.0 * std::f64::consts::PI * 0.3).abs() < 1e-2, "{}", length);

        // one segment per link of the chained loop
        let isolines = marching_triangles(&u, (n, n), 0.3).unwrap();
        assert_eq!(isolines.len(), 1);
        assert!(isolines[0].closed);
        assert_eq!(count, isolines[0].len());
    }

    #[test]
    fn test_emitted_segments_carry_data() {
        let dims = (6, 5);
        let u = sample(dims, |i, j| (i - 2.5).powi(2) + (j - 2.0).powi(2));
        // carry each node's position as data: it must reproduce the segment
        let data = sample(dims, |i, _| i)
            .into_iter()
            .zip(sample(dims, |_, j| j))
            .map(|(i, j)| [i, j])
            .collect::<Vec<_>>();

        let mut count = 0;
        marching_triangles_with_data_emit(&u, &data, dims, 2.0, |points, values| {
            for (p, value) in points.iter().zip(values.iter()) {
                assert!((p.x - value[0]).abs() < 1e-12);
                assert!((p.y - value[1]).abs() < 1e-12);
            }
            count += 1;
        })
        .unwrap();
        assert!(count > 0);

        // same segments, same direction as the chained isolines
        let mut first = None;
        marching_triangles_with_data_emit(&u, &data, dims, 2.0, |[a, b], _| {
            first.get_or_insert((a, b));
        })
        .unwrap();
        let (a, b) = first.unwrap();
        let isolines = marching_triangles(&u, dims, 2.0).unwrap();
        let linked = isolines.iter().any(|line| {
            let n = line.len();
            (0..n).any(|i| {
                line.points[i] == a && (line.closed || i + 1 < n) && line.points[(i + 1) % n] == b
            })
        });
        assert!(linked);
    }

    #[test]
    fn test_emit_rejects_mismatched_data() {
        let u = [0.0; 6];
        assert_eq!(
            marching_triangles_with_data_emit(&u, &[0.0; 5], (2, 3), 0.0, |_, _| {}).unwrap_err(),
            ExtractionError::DataLengthMismatch {
                expected: 6,
                actual: 5
            }
        );
        assert!(matches!(
            marching_triangles_with_data_emit(&u, &[(); 6], (3, 3), 0.0, |_, _| {}),
            Err(ExtractionError::LengthMismatch { expected: 9, actual: 6, .. })
        ));
        // no cells, nothing to emit
        marching_triangles_with_data_emit(&[0.0, 1.0], &[(); 2], (1, 2), 0.5, |_, _| {
            panic!("segment on a grid without squares")
        })
        .unwrap();
    }

    #[test]
    fn test_segment_edges() {
        assert_eq!(segment_edges(0b000), None);
        assert_eq!(segment_edges(0b111), None);
        assert_eq!(segment_edges(0b001), Some(([0, 1], [2, 0])));
        // complementary cases trace the same edges in reverse
        for case in 1..7 {
            let (a, b) = segment_edges(case).unwrap();
            let (c, d) = segment_edges(7 - case).unwrap();
            assert_eq!((a, b), (d, c));
        }
    }
}
