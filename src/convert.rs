//! Conversions between [`HostArray`] and `ndarray` matrices and cubes.
//!
//! The host stores data column-major. Host-to-dense conversions either view
//! that buffer in place through a column-major (`.f()`) shape or copy it into
//! an owned column-major array. Dense-to-host conversions walk the source
//! through a reversed-axes view, whose logical order is the source's
//! column-major order, so any source strides are handled.
//!
//! The `*_contig` functions skip the walk and copy the source memory in bulk.

use ndarray::{
    Array2, Array3, ArrayBase, ArrayView2, ArrayView3, ArrayViewMut2, ArrayViewMut3, CowArray,
    Data, Ix2, Ix3, ShapeBuilder,
};

use crate::class::{class_id_of, HostElement};
use crate::host::HostArray;
use crate::layout::is_col_major_contiguous;
use crate::options::{AliasMode, ConvertOptions, Strictness};
use crate::{Error, Result};

// ============================================================================
// Host buffer access
// ============================================================================

fn host_slice<T: HostElement>(host: &HostArray, strictness: Strictness) -> Result<&[T]> {
    let found = host.class_id();
    if found == T::CLASS_ID {
        return host.data::<T>();
    }
    check_reinterpret::<T>(host, strictness)?;
    bytemuck::try_cast_slice(host.as_bytes()).map_err(Error::Cast)
}

fn host_slice_mut<T: HostElement>(
    host: &mut HostArray,
    strictness: Strictness,
) -> Result<&mut [T]> {
    let found = host.class_id();
    if found == T::CLASS_ID {
        return host.data_mut::<T>();
    }
    check_reinterpret::<T>(host, strictness)?;
    bytemuck::try_cast_slice_mut(host.host_data_mut().as_bytes_mut()).map_err(Error::Cast)
}

/// A class mismatch is only tolerated when relaxed and the widths agree.
fn check_reinterpret<T: HostElement>(host: &HostArray, strictness: Strictness) -> Result<()> {
    let found = host.class_id();
    if strictness == Strictness::Strict {
        log::debug!("strict conversion rejects class {found} as {}", T::CLASS_ID);
        return Err(Error::ClassMismatch {
            expected: T::CLASS_ID,
            found,
        });
    }
    let width = std::mem::size_of::<T>();
    if found.element_size() != width {
        log::debug!("cannot reinterpret class {found} as {}", T::CLASS_ID);
        return Err(Error::ElementSizeMismatch {
            expected: width,
            found: found.element_size(),
        });
    }
    log::trace!("reinterpreting class {found} as {}", T::CLASS_ID);
    Ok(())
}

fn matrix_shape(host: &HostArray, strictness: Strictness) -> Result<(usize, usize)> {
    if strictness == Strictness::Strict && host.ndims() != 2 {
        return Err(Error::RankMismatch {
            expected: 2,
            found: host.ndims(),
        });
    }
    Ok((host.nrows(), host.ncols()))
}

/// A 2-D host array becomes a single-slice cube.
fn cube_shape(host: &HostArray, strictness: Strictness) -> Result<(usize, usize, usize)> {
    let dims = host.dims();
    if strictness == Strictness::Strict && dims.len() > 3 {
        return Err(Error::RankMismatch {
            expected: 3,
            found: dims.len(),
        });
    }
    let slices = dims[2..].iter().product();
    Ok((dims[0], dims[1], slices))
}

/// Allocate the destination through the resolver's class tag.
fn alloc_host<T: HostElement>(dims: &[usize]) -> Result<HostArray> {
    HostArray::new_numeric_array(dims, class_id_of::<T>())
}

// ============================================================================
// Host -> dense, explicit variants
// ============================================================================

/// Borrow a host array as a column-major matrix view.
pub fn view_matrix<T: HostElement>(
    host: &HostArray,
    strictness: Strictness,
) -> Result<ArrayView2<'_, T>> {
    let (rows, cols) = matrix_shape(host, strictness)?;
    let data = host_slice::<T>(host, strictness)?;
    log::trace!("view_matrix: {rows}x{cols} {}", host.class_id());
    Ok(ArrayView2::from_shape((rows, cols).f(), data)?)
}

/// Borrow a host array as a mutable column-major matrix view.
///
/// Writes through the view land in the host array.
pub fn view_matrix_mut<T: HostElement>(
    host: &mut HostArray,
    strictness: Strictness,
) -> Result<ArrayViewMut2<'_, T>> {
    let (rows, cols) = matrix_shape(host, strictness)?;
    log::trace!("view_matrix_mut: {rows}x{cols} {}", host.class_id());
    let data = host_slice_mut::<T>(host, strictness)?;
    Ok(ArrayViewMut2::from_shape((rows, cols).f(), data)?)
}

/// Copy a host array into an owned column-major matrix.
pub fn copy_matrix<T: HostElement>(host: &HostArray, strictness: Strictness) -> Result<Array2<T>> {
    let (rows, cols) = matrix_shape(host, strictness)?;
    let data = host_slice::<T>(host, strictness)?;
    log::trace!("copy_matrix: {rows}x{cols} {}", host.class_id());
    Ok(Array2::from_shape_vec((rows, cols).f(), data.to_vec())?)
}

/// Borrow a host array as a column-major cube view.
pub fn view_cube<T: HostElement>(
    host: &HostArray,
    strictness: Strictness,
) -> Result<ArrayView3<'_, T>> {
    let (rows, cols, slices) = cube_shape(host, strictness)?;
    let data = host_slice::<T>(host, strictness)?;
    log::trace!("view_cube: {rows}x{cols}x{slices} {}", host.class_id());
    Ok(ArrayView3::from_shape((rows, cols, slices).f(), data)?)
}

/// Borrow a host array as a mutable column-major cube view.
pub fn view_cube_mut<T: HostElement>(
    host: &mut HostArray,
    strictness: Strictness,
) -> Result<ArrayViewMut3<'_, T>> {
    let (rows, cols, slices) = cube_shape(host, strictness)?;
    log::trace!("view_cube_mut: {rows}x{cols}x{slices} {}", host.class_id());
    let data = host_slice_mut::<T>(host, strictness)?;
    Ok(ArrayViewMut3::from_shape((rows, cols, slices).f(), data)?)
}

/// Copy a host array into an owned column-major cube.
pub fn copy_cube<T: HostElement>(host: &HostArray, strictness: Strictness) -> Result<Array3<T>> {
    let (rows, cols, slices) = cube_shape(host, strictness)?;
    let data = host_slice::<T>(host, strictness)?;
    log::trace!("copy_cube: {rows}x{cols}x{slices} {}", host.class_id());
    Ok(Array3::from_shape_vec(
        (rows, cols, slices).f(),
        data.to_vec(),
    )?)
}

// ============================================================================
// Host -> dense, option-driven
// ============================================================================

/// Convert a host array to a matrix, aliasing or copying per `opts.mode`.
///
/// A `CowArray::View` borrows `host`; a `CowArray::Owned` is independent.
pub fn from_host_matrix<T: HostElement>(
    host: &HostArray,
    opts: ConvertOptions,
) -> Result<CowArray<'_, T, Ix2>> {
    match opts.mode {
        AliasMode::Alias => Ok(CowArray::from(view_matrix(host, opts.strictness)?)),
        AliasMode::Copy => Ok(CowArray::from(copy_matrix(host, opts.strictness)?)),
    }
}

/// Convert a host array to a cube, aliasing or copying per `opts.mode`.
///
/// A 2-D host array yields a cube with one slice.
pub fn from_host_cube<T: HostElement>(
    host: &HostArray,
    opts: ConvertOptions,
) -> Result<CowArray<'_, T, Ix3>> {
    match opts.mode {
        AliasMode::Alias => Ok(CowArray::from(view_cube(host, opts.strictness)?)),
        AliasMode::Copy => Ok(CowArray::from(copy_cube(host, opts.strictness)?)),
    }
}

// ============================================================================
// Dense -> host, general path
// ============================================================================

/// Copy a matrix of any layout into a new `rows x cols` host array.
pub fn to_host_matrix<T, S>(matrix: &ArrayBase<S, Ix2>) -> Result<HostArray>
where
    T: HostElement,
    S: Data<Elem = T>,
{
    let (rows, cols) = matrix.dim();
    log::trace!("to_host_matrix: {rows}x{cols} strides {:?}", matrix.strides());
    let mut host = alloc_host::<T>(&[rows, cols])?;
    let dst = host.data_mut::<T>()?;
    for (d, &s) in dst.iter_mut().zip(matrix.t().iter()) {
        *d = s;
    }
    Ok(host)
}

/// Copy a cube of any layout into a new `rows x cols x slices` host array.
///
/// A single-slice cube produces a 2-D host array.
pub fn to_host_cube<T, S>(cube: &ArrayBase<S, Ix3>) -> Result<HostArray>
where
    T: HostElement,
    S: Data<Elem = T>,
{
    let (rows, cols, slices) = cube.dim();
    log::trace!(
        "to_host_cube: {rows}x{cols}x{slices} strides {:?}",
        cube.strides()
    );
    let mut host = alloc_host::<T>(&[rows, cols, slices])?;
    let dst = host.data_mut::<T>()?;
    for (d, &s) in dst.iter_mut().zip(cube.view().reversed_axes().iter()) {
        *d = s;
    }
    Ok(host)
}

// ============================================================================
// Dense -> host, bulk copy
// ============================================================================

/// Bulk byte copy of `dst.len()` elements starting at `src`.
///
/// # Safety
/// `src` must be valid for reads of `dst.len()` elements.
unsafe fn bulk_copy<T: HostElement>(src: *const T, dst: &mut [T]) {
    if dst.is_empty() {
        return;
    }
    let src = std::slice::from_raw_parts(src, dst.len());
    let dst_bytes: &mut [u8] = bytemuck::cast_slice_mut(dst);
    dst_bytes.copy_from_slice(bytemuck::cast_slice(src));
}

/// Copy a matrix into a new host array with a single bulk copy.
///
/// Debug builds assert the precondition; release builds do not check it.
///
/// # Safety
/// The matrix memory must be contiguous and column-major. A row-major or
/// strided source reads the wrong elements or past the end of its buffer.
pub unsafe fn to_host_matrix_contig<T, S>(matrix: &ArrayBase<S, Ix2>) -> Result<HostArray>
where
    T: HostElement,
    S: Data<Elem = T>,
{
    let (rows, cols) = matrix.dim();
    debug_assert!(
        is_col_major_contiguous(&[rows, cols], matrix.strides()),
        "to_host_matrix_contig: source is not column-major contiguous"
    );
    log::trace!("to_host_matrix_contig: {rows}x{cols}");
    let mut host = alloc_host::<T>(&[rows, cols])?;
    bulk_copy(matrix.as_ptr(), host.data_mut::<T>()?);
    Ok(host)
}

/// Copy a cube into a new host array with a single bulk copy.
///
/// # Safety
/// Same contract as [`to_host_matrix_contig`].
pub unsafe fn to_host_cube_contig<T, S>(cube: &ArrayBase<S, Ix3>) -> Result<HostArray>
where
    T: HostElement,
    S: Data<Elem = T>,
{
    let (rows, cols, slices) = cube.dim();
    debug_assert!(
        is_col_major_contiguous(&[rows, cols, slices], cube.strides()),
        "to_host_cube_contig: source is not column-major contiguous"
    );
    log::trace!("to_host_cube_contig: {rows}x{cols}x{slices}");
    let mut host = alloc_host::<T>(&[rows, cols, slices])?;
    bulk_copy(cube.as_ptr(), host.data_mut::<T>()?);
    Ok(host)
}

/// Bulk copy when the matrix is column-major contiguous, element walk otherwise.
pub fn to_host_matrix_auto<T, S>(matrix: &ArrayBase<S, Ix2>) -> Result<HostArray>
where
    T: HostElement,
    S: Data<Elem = T>,
{
    let (rows, cols) = matrix.dim();
    if is_col_major_contiguous(&[rows, cols], matrix.strides()) {
        // SAFETY: layout checked above.
        unsafe { to_host_matrix_contig(matrix) }
    } else {
        to_host_matrix(matrix)
    }
}

/// Bulk copy when the cube is column-major contiguous, element walk otherwise.
pub fn to_host_cube_auto<T, S>(cube: &ArrayBase<S, Ix3>) -> Result<HostArray>
where
    T: HostElement,
    S: Data<Elem = T>,
{
    let (rows, cols, slices) = cube.dim();
    if is_col_major_contiguous(&[rows, cols, slices], cube.strides()) {
        // SAFETY: layout checked above.
        unsafe { to_host_cube_contig(cube) }
    } else {
        to_host_cube(cube)
    }
}
