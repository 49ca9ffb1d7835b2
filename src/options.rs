//! Per-call conversion options.

/// Whether a host-to-dense conversion borrows or copies the host buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AliasMode {
    /// Zero-copy view over the host array's memory, bounded by its borrow.
    #[default]
    Alias,
    /// Independent owned copy.
    Copy,
}

/// How a host array's shape and class are checked against the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Class must match exactly; a matrix needs 2 dims and a cube 2 or 3.
    Strict,
    /// Trailing dims are folded and same-width classes are reinterpreted.
    #[default]
    Relaxed,
}

/// Options for [`from_host_matrix`](crate::from_host_matrix) and
/// [`from_host_cube`](crate::from_host_cube).
///
/// The default aliases the host memory with relaxed checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvertOptions {
    pub mode: AliasMode,
    pub strictness: Strictness,
}

impl ConvertOptions {
    /// Zero-copy, relaxed.
    pub fn alias() -> Self {
        Self::default()
    }

    /// Owned copy, relaxed.
    pub fn copy() -> Self {
        Self::default().with_mode(AliasMode::Copy)
    }

    pub fn with_mode(mut self, mode: AliasMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn strict(self) -> Self {
        self.with_strictness(Strictness::Strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_alias_relaxed() {
        let opts = ConvertOptions::default();
        assert_eq!(opts.mode, AliasMode::Alias);
        assert_eq!(opts.strictness, Strictness::Relaxed);
        assert_eq!(opts, ConvertOptions::alias());
    }

    #[test]
    fn test_builders() {
        let opts = ConvertOptions::copy().strict();
        assert_eq!(opts.mode, AliasMode::Copy);
        assert_eq!(opts.strictness, Strictness::Strict);
    }
}
