//! Conversion between column-major host arrays and `ndarray` matrices and cubes.
//!
//! A [`HostArray`] is a numerical host environment's native array: a runtime
//! [`ClassId`], a dimension list and a column-major buffer. This crate moves
//! data between it and `ndarray`'s dense 2-D and 3-D containers, either by
//! aliasing the host memory or by copying it.
//!
//! # Core Types
//!
//! - [`HostArray`] / [`HostData`]: owned host arrays and their typed storage
//! - [`ClassId`], [`ElementClass`], [`HostElement`]: element type to class mapping
//! - [`ConvertOptions`] ([`AliasMode`], [`Strictness`]): per-call options
//!
//! # Operations
//!
//! - [`from_host_matrix`], [`from_host_cube`]: host to dense, alias or copy
//! - [`view_matrix`], [`view_matrix_mut`], [`copy_matrix`] and the cube
//!   counterparts: host to dense with an explicit variant
//! - [`to_host_matrix`], [`to_host_cube`]: dense to host for any layout
//! - [`to_host_matrix_contig`], [`to_host_cube_contig`]: unchecked bulk copy
//! - [`to_host_matrix_auto`], [`to_host_cube_auto`]: bulk copy when verified
//!
//! # Example
//!
//! ```rust
//! use mxdense::{from_host_matrix, to_host_matrix, ConvertOptions, HostArray};
//!
//! // [[1, 2], [3, 4]] in host (column-major) order.
//! let x = HostArray::from_col_major(&[2, 2], vec![1i32, 3, 2, 4]).unwrap();
//! let m = from_host_matrix::<i32>(&x, ConvertOptions::alias()).unwrap();
//! let y = to_host_matrix(&(&m + 2)).unwrap();
//!
//! assert_eq!(y.get::<i32>(&[0, 1]).unwrap(), 4);
//! assert_eq!(y.get::<i32>(&[1, 0]).unwrap(), 5);
//! ```

pub mod class;
mod convert;
pub mod host;
pub mod layout;
mod options;

pub use class::{class_id_of, ClassId, ElementClass, HostElement};
pub use convert::{
    copy_cube, copy_matrix, from_host_cube, from_host_matrix, to_host_cube, to_host_cube_auto,
    to_host_cube_contig, to_host_matrix, to_host_matrix_auto, to_host_matrix_contig, view_cube,
    view_cube_mut, view_matrix, view_matrix_mut,
};
pub use host::{HostArray, HostData};
pub use options::{AliasMode, ConvertOptions, Strictness};

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur while creating host arrays or converting them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The class cannot back a host array.
    #[error("unsupported host class: {0}")]
    UnsupportedClass(ClassId),

    /// Strict conversion requested a different class than the array holds.
    #[error("class mismatch: expected {expected}, found {found}")]
    ClassMismatch { expected: ClassId, found: ClassId },

    /// Relaxed reinterpretation needs equal element widths.
    #[error("element size mismatch: expected {expected} bytes, found {found} bytes")]
    ElementSizeMismatch { expected: usize, found: usize },

    /// The host array has more dimensions than the target container allows.
    #[error("rank mismatch: expected {expected}, found {found}")]
    RankMismatch { expected: usize, found: usize },

    /// A buffer length does not match the product of the dimensions.
    #[error("length mismatch: expected {expected} elements, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// A multi-index is out of bounds or has the wrong rank.
    #[error("index {index:?} out of bounds for dims {dims:?}")]
    IndexOutOfBounds { index: Vec<usize>, dims: Vec<usize> },

    /// `ndarray` rejected the shape built from the host dims.
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    /// The host buffer could not be viewed as the requested element type.
    #[error("buffer cast failed: {0:?}")]
    Cast(bytemuck::PodCastError),
}

/// Result type for host array operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_error_carries_pod_cast_error() {
        let err = Error::Cast(bytemuck::PodCastError::TargetAlignmentGreaterAndInputNotAligned);
        assert!(matches!(
            err,
            Error::Cast(bytemuck::PodCastError::TargetAlignmentGreaterAndInputNotAligned)
        ));
        assert!(err.to_string().starts_with("buffer cast failed:"));
    }

    #[test]
    fn test_shape_error_converts() {
        let shape_err = ndarray::Array2::<f64>::from_shape_vec((2, 2), vec![0.0; 3]).unwrap_err();
        let err: Error = shape_err.into();
        assert!(matches!(err, Error::Shape(_)));
    }
}
