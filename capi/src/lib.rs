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

//! C bindings for the `marching-tetrahedra` crate, declared for C callers in
//! `include/isosurface.h`.
//!
//! Every entry point catches panics, and reports failure as a null pointer
//! or a zero count. Surfaces are owned by the library until passed to
//! [iso_free].

use ::marching_tetrahedra::{
    marching_tetrahedra as extract, marching_tetrahedra_with_data as extract_with_data, Mesh,
    Result,
};
use std::{
    mem,
    panic::{catch_unwind, AssertUnwindSafe},
    ptr, slice,
};
use tracing::warn;

/// Opaque handle to an extracted surface.
pub struct Isosurface {
    mesh: Mesh,
    data: Option<Vec<f64>>,
}

fn guard<T, F>(fallback: T, f: F) -> T
where
    F: FnOnce() -> T,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            warn!("panic caught at the C boundary");
            fallback
        }
    }
}

/// View `ni * nj * nk` doubles starting at `u`, or `None` if `u` is null or
/// the array would span more than `isize::MAX` bytes.
unsafe fn grid<'a>(u: *const f64, ni: usize, nj: usize, nk: usize) -> Option<&'a [f64]> {
    if u.is_null() {
        return None;
    }
    let len = ni.checked_mul(nj)?.checked_mul(nk)?;
    if len > isize::MAX as usize / mem::size_of::<f64>() {
        return None;
    }
    Some(slice::from_raw_parts(u, len))
}

fn into_handle(result: Result<Isosurface>) -> *mut Isosurface {
    match result {
        Ok(iso) => Box::into_raw(Box::new(iso)),
        Err(err) => {
            warn!(%err, "isosurface extraction failed");
            ptr::null_mut()
        }
    }
}

/// Extract the isosurface at `level` of the `ni × nj × nk` grid of samples
/// at `u`, in C order.
///
/// Returns null if `u` is null or extraction fails.
///
/// # Safety
///
/// `u` must be null or point to `ni * nj * nk` readable doubles.
#[no_mangle]
pub unsafe extern "C" fn marching_tetrahedra(
    u: *const f64,
    ni: usize,
    nj: usize,
    nk: usize,
    level: f64,
) -> *mut Isosurface {
    guard(ptr::null_mut(), || {
        let u = match grid(u, ni, nj, nk) {
            Some(u) => u,
            None => {
                warn!(ni, nj, nk, "invalid scalar field");
                return ptr::null_mut();
            }
        };

        into_handle(extract(u, (ni, nj, nk), level).map(|mesh| Isosurface { mesh, data: None }))
    })
}

/// As [marching_tetrahedra], also interpolating one double per node from
/// `data` to every vertex. See [iso_data].
///
/// # Safety
///
/// `u` and `data` must each be null or point to `ni * nj * nk` readable
/// doubles.
#[no_mangle]
pub unsafe extern "C" fn marching_tetrahedra_with_data(
    u: *const f64,
    data: *const f64,
    ni: usize,
    nj: usize,
    nk: usize,
    level: f64,
) -> *mut Isosurface {
    guard(ptr::null_mut(), || {
        let (u, data) = match (grid(u, ni, nj, nk), grid(data, ni, nj, nk)) {
            (Some(u), Some(data)) => (u, data),
            _ => {
                warn!(ni, nj, nk, "invalid scalar field or node data");
                return ptr::null_mut();
            }
        };

        into_handle(
            extract_with_data(u, (ni, nj, nk), level, data).map(|(mesh, data)| Isosurface {
                mesh,
                data: Some(data),
            }),
        )
    })
}

/// Number of vertices in the surface.
///
/// # Safety
///
/// `iso` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn iso_num_verts(iso: *const Isosurface) -> usize {
    guard(0, || iso.as_ref().map_or(0, |iso| iso.mesh.vertex_count()))
}

/// Number of triangles in the surface.
///
/// # Safety
///
/// `iso` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn iso_num_faces(iso: *const Isosurface) -> usize {
    guard(0, || iso.as_ref().map_or(0, |iso| iso.mesh.face_count()))
}

/// Vertex positions, `iso_num_verts` entries of `double[3]`.
///
/// # Safety
///
/// `iso` must be null or a live handle. The result is valid until the handle
/// is freed.
#[no_mangle]
pub unsafe extern "C" fn iso_verts(iso: *const Isosurface) -> *const [f64; 3] {
    guard(ptr::null(), || {
        iso.as_ref()
            .map_or(ptr::null(), |iso| iso.mesh.vertices().as_ptr())
    })
}

/// Vertex normals, `iso_num_verts` entries of `double[3]`.
///
/// # Safety
///
/// `iso` must be null or a live handle. The result is valid until the handle
/// is freed.
#[no_mangle]
pub unsafe extern "C" fn iso_normals(iso: *const Isosurface) -> *const [f64; 3] {
    guard(ptr::null(), || {
        iso.as_ref()
            .map_or(ptr::null(), |iso| iso.mesh.normals().as_ptr())
    })
}

/// Triangles, `iso_num_faces` entries of `uint32_t[3]` vertex indices.
///
/// # Safety
///
/// `iso` must be null or a live handle. The result is valid until the handle
/// is freed.
#[no_mangle]
pub unsafe extern "C" fn iso_faces(iso: *const Isosurface) -> *const [u32; 3] {
    guard(ptr::null(), || {
        iso.as_ref()
            .map_or(ptr::null(), |iso| iso.mesh.faces().as_ptr())
    })
}

/// Interpolated node data, `iso_num_verts` doubles, or null if the surface
/// was extracted without data.
///
/// # Safety
///
/// `iso` must be null or a live handle. The result is valid until the handle
/// is freed.
#[no_mangle]
pub unsafe extern "C" fn iso_data(iso: *const Isosurface) -> *const f64 {
    guard(ptr::null(), || {
        iso.as_ref()
            .and_then(|iso| iso.data.as_ref())
            .map_or(ptr::null(), |data| data.as_ptr())
    })
}

/// Release a surface. Null is ignored.
///
/// # Safety
///
/// `iso` must be null or a live handle, and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn iso_free(iso: *mut Isosurface) {
    guard((), || {
        if !iso.is_null() {
            drop(Box::from_raw(iso));
        }
    })
}
