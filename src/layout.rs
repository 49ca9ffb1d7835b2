//! Stride and offset helpers for column-major host storage.

/// Compute column-major strides (first index varies fastest).
pub fn col_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in 1..rank {
        strides[i] = strides[i - 1] * dims[i - 1] as isize;
    }
    strides
}

/// Whether `dims`/`strides` describe a dense column-major block.
///
/// Size-1 dimensions are ignored since their stride is never used.
pub fn is_col_major_contiguous(dims: &[usize], strides: &[isize]) -> bool {
    if dims.len() != strides.len() {
        return false;
    }
    // Empty blocks report arbitrary (usually zero) strides.
    if dims.contains(&0) {
        return true;
    }
    let mut expected = 1isize;
    for (&dim, &stride) in dims.iter().zip(strides.iter()) {
        if dim <= 1 {
            continue;
        }
        if stride != expected {
            return false;
        }
        expected = expected.saturating_mul(dim as isize);
    }
    true
}

/// Column-major linear offset of `index`, or `None` if it is out of bounds
/// or has the wrong rank.
pub fn col_major_offset(dims: &[usize], index: &[usize]) -> Option<usize> {
    if index.len() != dims.len() {
        return None;
    }
    let mut offset = 0usize;
    let mut stride = 1usize;
    for (&i, &d) in index.iter().zip(dims.iter()) {
        if i >= d {
            return None;
        }
        offset += i * stride;
        stride *= d;
    }
    Some(offset)
}

/// Host dimension normalisation: pad to two dims, drop trailing singletons
/// past the second.
pub fn normalize_dims(dims: &[usize]) -> Vec<usize> {
    let mut out = dims.to_vec();
    while out.len() < 2 {
        out.push(1);
    }
    while out.len() > 2 && out.last() == Some(&1) {
        out.pop();
    }
    out
}

/// Number of elements.
pub(crate) fn total_len(dims: &[usize]) -> usize {
    dims.iter().product()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_major_strides() {
        assert_eq!(col_major_strides(&[2, 3, 4]), vec![1, 2, 6]);
        assert!(col_major_strides(&[]).is_empty());
    }

    #[test]
    fn test_contiguity() {
        assert!(is_col_major_contiguous(&[2, 3], &[1, 2]));
        assert!(!is_col_major_contiguous(&[2, 3], &[3, 1]));
        // Singleton dims carry arbitrary strides.
        assert!(is_col_major_contiguous(&[1, 3], &[7, 1]));
        assert!(is_col_major_contiguous(&[4, 1], &[1, 0]));
        // Sliced columns leave gaps.
        assert!(!is_col_major_contiguous(&[2, 3], &[1, 4]));
        assert!(is_col_major_contiguous(&[0, 4], &[0, 0]));
    }

    #[test]
    fn test_col_major_offset() {
        assert_eq!(col_major_offset(&[2, 3], &[1, 2]), Some(5));
        assert_eq!(col_major_offset(&[2, 2, 2], &[1, 0, 1]), Some(5));
        assert_eq!(col_major_offset(&[2, 3], &[2, 0]), None);
        assert_eq!(col_major_offset(&[2, 3], &[0]), None);
    }

    #[test]
    fn test_normalize_dims() {
        assert_eq!(normalize_dims(&[]), vec![1, 1]);
        assert_eq!(normalize_dims(&[5]), vec![5, 1]);
        assert_eq!(normalize_dims(&[2, 3, 1]), vec![2, 3]);
        assert_eq!(normalize_dims(&[2, 3, 1, 1]), vec![2, 3]);
        assert_eq!(normalize_dims(&[2, 3, 1, 4]), vec![2, 3, 1, 4]);
        assert_eq!(normalize_dims(&[1, 1]), vec![1, 1]);
    }
}
