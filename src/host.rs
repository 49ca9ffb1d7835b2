//! Host-side typed, shape-tagged, column-major arrays.

use crate::class::{ClassId, HostElement};
use crate::layout::{col_major_offset, col_major_strides, normalize_dims, total_len};
use crate::{Error, Result};

/// Typed column-major storage of a [`HostArray`], one variant per class.
#[derive(Debug, Clone, PartialEq)]
pub enum HostData {
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Single(Vec<f32>),
    Double(Vec<f64>),
}

impl HostData {
    /// Zero-filled storage of `len` elements for a runtime class.
    fn zeros(class_id: ClassId, len: usize) -> Result<Self> {
        Ok(match class_id {
            ClassId::Int8 => HostData::Int8(vec![0; len]),
            ClassId::UInt8 => HostData::UInt8(vec![0; len]),
            ClassId::Int16 => HostData::Int16(vec![0; len]),
            ClassId::UInt16 => HostData::UInt16(vec![0; len]),
            ClassId::Int32 => HostData::Int32(vec![0; len]),
            ClassId::UInt32 => HostData::UInt32(vec![0; len]),
            ClassId::Single => HostData::Single(vec![0.0; len]),
            ClassId::Double => HostData::Double(vec![0.0; len]),
            ClassId::Unknown | ClassId::Int64 | ClassId::UInt64 => {
                return Err(Error::UnsupportedClass(class_id))
            }
        })
    }

    pub fn class_id(&self) -> ClassId {
        match self {
            HostData::Int8(_) => ClassId::Int8,
            HostData::UInt8(_) => ClassId::UInt8,
            HostData::Int16(_) => ClassId::Int16,
            HostData::UInt16(_) => ClassId::UInt16,
            HostData::Int32(_) => ClassId::Int32,
            HostData::UInt32(_) => ClassId::UInt32,
            HostData::Single(_) => ClassId::Single,
            HostData::Double(_) => ClassId::Double,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            HostData::Int8(v) => v.len(),
            HostData::UInt8(v) => v.len(),
            HostData::Int16(v) => v.len(),
            HostData::UInt16(v) => v.len(),
            HostData::Int32(v) => v.len(),
            HostData::UInt32(v) => v.len(),
            HostData::Single(v) => v.len(),
            HostData::Double(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes of the buffer in column-major element order.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            HostData::Int8(v) => bytemuck::cast_slice(v),
            HostData::UInt8(v) => v.as_slice(),
            HostData::Int16(v) => bytemuck::cast_slice(v),
            HostData::UInt16(v) => bytemuck::cast_slice(v),
            HostData::Int32(v) => bytemuck::cast_slice(v),
            HostData::UInt32(v) => bytemuck::cast_slice(v),
            HostData::Single(v) => bytemuck::cast_slice(v),
            HostData::Double(v) => bytemuck::cast_slice(v),
        }
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        match self {
            HostData::Int8(v) => bytemuck::cast_slice_mut(v),
            HostData::UInt8(v) => v.as_mut_slice(),
            HostData::Int16(v) => bytemuck::cast_slice_mut(v),
            HostData::UInt16(v) => bytemuck::cast_slice_mut(v),
            HostData::Int32(v) => bytemuck::cast_slice_mut(v),
            HostData::UInt32(v) => bytemuck::cast_slice_mut(v),
            HostData::Single(v) => bytemuck::cast_slice_mut(v),
            HostData::Double(v) => bytemuck::cast_slice_mut(v),
        }
    }
}

/// A host array: runtime class tag, dimension list and column-major data.
///
/// The dimension list always has at least two entries and never ends in a
/// singleton past the second entry, so `[2, 3, 1]` is stored as `[2, 3]`.
#[derive(Debug, Clone, PartialEq)]
pub struct HostArray {
    dims: Vec<usize>,
    data: HostData,
}

impl HostArray {
    /// Allocate a zero-filled `rows x cols` array of a runtime class.
    ///
    /// # Errors
    /// [`Error::UnsupportedClass`] for [`ClassId::Unknown`] and the disabled
    /// 64-bit integer classes.
    pub fn new_numeric_matrix(rows: usize, cols: usize, class_id: ClassId) -> Result<Self> {
        Self::new_numeric_array(&[rows, cols], class_id)
    }

    /// Allocate a zero-filled N-d array of a runtime class.
    pub fn new_numeric_array(dims: &[usize], class_id: ClassId) -> Result<Self> {
        let dims = normalize_dims(dims);
        let data = HostData::zeros(class_id, total_len(&dims)).map_err(|e| {
            log::debug!("refusing host allocation of class {class_id} with dims {dims:?}");
            e
        })?;
        Ok(Self { dims, data })
    }

    /// Allocate a zero-filled array for element type `T`.
    pub fn zeros<T: HostElement>(dims: &[usize]) -> Result<Self> {
        let len = total_len(&normalize_dims(dims));
        Self::from_col_major(dims, vec![T::zero(); len])
    }

    /// Take ownership of a column-major buffer.
    ///
    /// # Errors
    /// [`Error::LengthMismatch`] if `data.len()` is not the product of `dims`.
    pub fn from_col_major<T: HostElement>(dims: &[usize], data: Vec<T>) -> Result<Self> {
        let dims = normalize_dims(dims);
        let expected = total_len(&dims);
        if data.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            dims,
            data: T::into_host_data(data),
        })
    }

    /// Build an array from a function of the multi-index.
    ///
    /// The function is called in column-major order.
    pub fn from_fn<T: HostElement>(dims: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Self {
        let dims = normalize_dims(dims);
        let total = total_len(&dims);
        let rank = dims.len();
        let mut data = Vec::with_capacity(total);
        let mut idx = vec![0usize; rank];
        for _ in 0..total {
            data.push(f(&idx));
            for d in 0..rank {
                idx[d] += 1;
                if idx[d] < dims[d] {
                    break;
                }
                idx[d] = 0;
            }
        }
        Self {
            dims,
            data: T::into_host_data(data),
        }
    }

    #[inline]
    pub fn class_id(&self) -> ClassId {
        self.data.class_id()
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn ndims(&self) -> usize {
        self.dims.len()
    }

    /// Size of the first dimension.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.dims[0]
    }

    /// Product of every dimension after the first.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.dims[1..].iter().product()
    }

    /// Column-major element strides.
    pub fn strides(&self) -> Vec<isize> {
        col_major_strides(&self.dims)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn element_size(&self) -> usize {
        self.class_id().element_size()
    }

    /// Typed storage.
    #[inline]
    pub fn host_data(&self) -> &HostData {
        &self.data
    }

    #[inline]
    pub(crate) fn host_data_mut(&mut self) -> &mut HostData {
        &mut self.data
    }

    /// Borrow the column-major buffer as `&[T]`.
    ///
    /// # Errors
    /// [`Error::ClassMismatch`] unless the array's class is exactly `T`'s.
    pub fn data<T: HostElement>(&self) -> Result<&[T]> {
        let found = self.class_id();
        T::host_slice(&self.data).ok_or(Error::ClassMismatch {
            expected: T::CLASS_ID,
            found,
        })
    }

    /// Mutable counterpart of [`HostArray::data`].
    pub fn data_mut<T: HostElement>(&mut self) -> Result<&mut [T]> {
        let found = self.class_id();
        T::host_slice_mut(&mut self.data).ok_or(Error::ClassMismatch {
            expected: T::CLASS_ID,
            found,
        })
    }

    /// Raw bytes, `len() * element_size()` long.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }

    fn offset_of(&self, index: &[usize]) -> Result<usize> {
        col_major_offset(&self.dims, index).ok_or_else(|| Error::IndexOutOfBounds {
            index: index.to_vec(),
            dims: self.dims.clone(),
        })
    }

    /// Read the element at a multi-index (one entry per dimension).
    pub fn get<T: HostElement>(&self, index: &[usize]) -> Result<T> {
        let offset = self.offset_of(index)?;
        Ok(self.data::<T>()?[offset])
    }

    /// Write the element at a multi-index.
    pub fn set<T: HostElement>(&mut self, index: &[usize], value: T) -> Result<()> {
        let offset = self.offset_of(index)?;
        self.data_mut::<T>()?[offset] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_numeric_matrix() {
        let a = HostArray::new_numeric_matrix(2, 3, ClassId::Int16).unwrap();
        assert_eq!(a.dims(), &[2, 3]);
        assert_eq!(a.class_id(), ClassId::Int16);
        assert_eq!(a.len(), 6);
        assert_eq!(a.element_size(), 2);
        assert_eq!(a.as_bytes().len(), 12);
        assert!(a.data::<i16>().unwrap().iter().all(|&x| x == 0));
    }

    #[test]
    fn test_unsupported_classes_rejected() {
        for class_id in [ClassId::Unknown, ClassId::Int64, ClassId::UInt64] {
            let err = HostArray::new_numeric_array(&[2, 2], class_id).unwrap_err();
            assert!(matches!(err, Error::UnsupportedClass(c) if c == class_id));
        }
    }

    #[test]
    fn test_trailing_singleton_dropped() {
        let a = HostArray::zeros::<f32>(&[2, 2, 1]).unwrap();
        assert_eq!(a.dims(), &[2, 2]);
        assert_eq!(a.ndims(), 2);

        let b = HostArray::zeros::<f32>(&[2, 2, 3]).unwrap();
        assert_eq!(b.ndims(), 3);
    }

    #[test]
    fn test_nrows_ncols_fold_trailing_dims() {
        let a = HostArray::zeros::<u8>(&[4, 3, 2]).unwrap();
        assert_eq!(a.nrows(), 4);
        assert_eq!(a.ncols(), 6);
        assert_eq!(a.strides(), vec![1, 4, 12]);
    }

    #[test]
    fn test_from_col_major_length_checked() {
        let err = HostArray::from_col_major(&[2, 2], vec![1i32, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                expected: 4,
                found: 3
            }
        ));
    }

    #[test]
    fn test_get_is_column_major() {
        // [[1, 2], [3, 4]] stored column by column.
        let a = HostArray::from_col_major(&[2, 2], vec![1i32, 3, 2, 4]).unwrap();
        assert_eq!(a.get::<i32>(&[0, 0]).unwrap(), 1);
        assert_eq!(a.get::<i32>(&[0, 1]).unwrap(), 2);
        assert_eq!(a.get::<i32>(&[1, 0]).unwrap(), 3);
        assert_eq!(a.get::<i32>(&[1, 1]).unwrap(), 4);
        assert!(matches!(
            a.get::<i32>(&[2, 0]),
            Err(Error::IndexOutOfBounds { .. })
        ));
        assert!(matches!(
            a.get::<f32>(&[0, 0]),
            Err(Error::ClassMismatch { .. })
        ));
    }

    #[test]
    fn test_from_fn_and_set() {
        let mut a = HostArray::from_fn(&[2, 3, 2], |idx| (idx[0] + 10 * idx[1] + 100 * idx[2]) as f64);
        assert_eq!(a.get::<f64>(&[1, 2, 1]).unwrap(), 121.0);
        assert_eq!(a.data::<f64>().unwrap()[1], 1.0);
        a.set(&[0, 1, 0], -5.0f64).unwrap();
        assert_eq!(a.get::<f64>(&[0, 1, 0]).unwrap(), -5.0);
    }
}
