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

//! Errors surfaced by the extraction entry points.
//!
//! A grid with fewer than two samples along any axis is not an error: it has
//! no cells, so extraction yields an empty mesh.

use std::collections::TryReserveError;
use thiserror::Error;

/// Result type alias using [`ExtractionError`].
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can occur while extracting an isosurface or isoline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The sample array does not match the grid dimensions.
    #[error("scalar field has {actual} samples but dimensions {dims:?} require {expected}")]
    LengthMismatch {
        /// Grid dimensions, first axis slowest.
        dims: Vec<usize>,
        /// `product(dims)`.
        expected: usize,
        /// Length of the provided array.
        actual: usize,
    },

    /// The per-node data array does not match the grid dimensions.
    #[error("per-node data has {actual} entries but the grid has {expected} nodes")]
    DataLengthMismatch {
        /// Number of grid nodes.
        expected: usize,
        /// Length of the provided data array.
        actual: usize,
    },

    /// The product of the grid dimensions does not fit in `usize`.
    #[error("grid dimensions {dims:?} overflow the addressable sample count")]
    DimensionOverflow {
        /// Grid dimensions, first axis slowest.
        dims: Vec<usize>,
    },

    /// The distance between neighbouring nodes is not a positive finite
    /// number.
    #[error("grid spacing must be positive and finite, got {spacing}")]
    InvalidSpacing {
        /// The rejected spacing.
        spacing: f64,
    },

    /// The mesh needs more vertices than a `u32` face index can address.
    #[error("mesh needs {count} vertices, more than a u32 index can address")]
    TooManyVertices {
        /// Number of vertices requested.
        count: usize,
    },

    /// Growing the vertex cache or a mesh buffer failed.
    #[error("out of memory while building mesh buffers")]
    OutOfMemory,
}

impl From<TryReserveError> for ExtractionError {
    fn from(_: TryReserveError) -> Self {
        ExtractionError::OutOfMemory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExtractionError::LengthMismatch {
            dims: vec![2, 3, 4],
            expected: 24,
            actual: 7,
        };
        assert_eq!(
            err.to_string(),
            "scalar field has 7 samples but dimensions [2, 3, 4] require 24"
        );

        let err = ExtractionError::DataLengthMismatch {
            expected: 8,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "per-node data has 3 entries but the grid has 8 nodes"
        );

        assert_eq!(
            ExtractionError::InvalidSpacing { spacing: -0.5 }.to_string(),
            "grid spacing must be positive and finite, got -0.5"
        );

        assert_eq!(
            ExtractionError::OutOfMemory.to_string(),
            "out of memory while building mesh buffers"
        );
    }

    #[test]
    fn test_try_reserve_maps_to_out_of_memory() {
        let mut v: Vec<u64> = Vec::new();
        let err = v.try_reserve(usize::MAX).unwrap_err();
        assert_eq!(ExtractionError::from(err), ExtractionError::OutOfMemory);
    }
}
