//! Host class IDs and the compile-time element type resolver.
//!
//! Every host array carries a runtime [`ClassId`]. [`ElementClass`] maps a
//! Rust element type to that tag at compile time; [`HostElement`] narrows the
//! set to the types a host array can actually store.

use std::fmt;

use bytemuck::Pod;
use num_traits::Zero;

use crate::host::HostData;

/// Runtime element class of a host array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassId {
    /// Sentinel for element types the host cannot represent here.
    Unknown,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    /// Disabled: the dense library's index type collides with 64-bit integers.
    Int64,
    /// Disabled, see [`ClassId::Int64`].
    UInt64,
    Single,
    Double,
}

impl ClassId {
    /// Host-side class name (`"int8"`, `"single"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            ClassId::Unknown => "unknown",
            ClassId::Int8 => "int8",
            ClassId::UInt8 => "uint8",
            ClassId::Int16 => "int16",
            ClassId::UInt16 => "uint16",
            ClassId::Int32 => "int32",
            ClassId::UInt32 => "uint32",
            ClassId::Int64 => "int64",
            ClassId::UInt64 => "uint64",
            ClassId::Single => "single",
            ClassId::Double => "double",
        }
    }

    /// Size of one element in bytes, `0` for [`ClassId::Unknown`].
    pub fn element_size(self) -> usize {
        match self {
            ClassId::Unknown => 0,
            ClassId::Int8 | ClassId::UInt8 => 1,
            ClassId::Int16 | ClassId::UInt16 => 2,
            ClassId::Int32 | ClassId::UInt32 | ClassId::Single => 4,
            ClassId::Int64 | ClassId::UInt64 | ClassId::Double => 8,
        }
    }

    /// Whether host arrays of this class can be allocated.
    pub fn is_supported(self) -> bool {
        !matches!(self, ClassId::Unknown | ClassId::Int64 | ClassId::UInt64)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compile-time mapping from an element type to its host class.
///
/// Types without a supported host class resolve to [`ClassId::Unknown`]
/// instead of failing to compile; allocating a host array with that tag is
/// what fails.
pub trait ElementClass {
    const CLASS_ID: ClassId = ClassId::Unknown;
}

/// Resolve the host class of `T`.
#[inline]
pub fn class_id_of<T: ElementClass>() -> ClassId {
    T::CLASS_ID
}

/// Element types a [`HostArray`](crate::HostArray) can store and that the
/// converters accept.
pub trait HostElement: ElementClass + Pod + Zero + fmt::Debug + Send + Sync + 'static {
    /// Wrap an owned column-major buffer into typed host storage.
    fn into_host_data(data: Vec<Self>) -> HostData;

    /// Borrow the storage as `&[Self]` if its class matches exactly.
    fn host_slice(data: &HostData) -> Option<&[Self]>;

    /// Mutable counterpart of [`HostElement::host_slice`].
    fn host_slice_mut(data: &mut HostData) -> Option<&mut [Self]>;
}

macro_rules! impl_host_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ElementClass for $ty {
                const CLASS_ID: ClassId = ClassId::$variant;
            }

            impl HostElement for $ty {
                #[inline]
                fn into_host_data(data: Vec<Self>) -> HostData {
                    HostData::$variant(data)
                }

                #[inline]
                fn host_slice(data: &HostData) -> Option<&[Self]> {
                    match data {
                        HostData::$variant(v) => Some(v.as_slice()),
                        _ => None,
                    }
                }

                #[inline]
                fn host_slice_mut(data: &mut HostData) -> Option<&mut [Self]> {
                    match data {
                        HostData::$variant(v) => Some(v.as_mut_slice()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_host_element! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    f32 => Single,
    f64 => Double,
}

// 64-bit integers keep the sentinel tag.
impl ElementClass for i64 {}
impl ElementClass for u64 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_tags() {
        assert_eq!(class_id_of::<i8>(), ClassId::Int8);
        assert_eq!(class_id_of::<u8>(), ClassId::UInt8);
        assert_eq!(class_id_of::<i16>(), ClassId::Int16);
        assert_eq!(class_id_of::<u16>(), ClassId::UInt16);
        assert_eq!(class_id_of::<i32>(), ClassId::Int32);
        assert_eq!(class_id_of::<u32>(), ClassId::UInt32);
        assert_eq!(class_id_of::<f32>(), ClassId::Single);
        assert_eq!(class_id_of::<f64>(), ClassId::Double);
    }

    #[test]
    fn test_64bit_integers_are_unknown() {
        assert_eq!(class_id_of::<i64>(), ClassId::Unknown);
        assert_eq!(class_id_of::<u64>(), ClassId::Unknown);
        assert!(!class_id_of::<i64>().is_supported());
    }

    #[test]
    fn test_element_size_matches_type() {
        assert_eq!(ClassId::Int8.element_size(), std::mem::size_of::<i8>());
        assert_eq!(ClassId::UInt16.element_size(), std::mem::size_of::<u16>());
        assert_eq!(ClassId::Single.element_size(), std::mem::size_of::<f32>());
        assert_eq!(ClassId::Double.element_size(), std::mem::size_of::<f64>());
        assert_eq!(ClassId::Unknown.element_size(), 0);
    }

    #[test]
    fn test_names() {
        assert_eq!(ClassId::Single.to_string(), "single");
        assert_eq!(ClassId::UInt32.name(), "uint32");
        assert!(ClassId::Double.is_supported());
        assert!(!ClassId::UInt64.is_supported());
    }

    #[test]
    fn test_host_slice_requires_exact_class() {
        let data = i32::into_host_data(vec![1, 2, 3]);
        assert_eq!(i32::host_slice(&data), Some(&[1, 2, 3][..]));
        assert!(f32::host_slice(&data).is_none());
        assert!(u32::host_slice(&data).is_none());
    }
}
