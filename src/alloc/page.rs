//! Page geometry shared by the region allocator.

/// Granularity of anonymous mappings.
pub const PAGE_SIZE: usize = 4096;

/// Regions at least this large are mapped straight from the OS so that
/// untouched pages never become resident.
pub const MAP_THRESHOLD: usize = 16 * PAGE_SIZE;

/// Rounds `value` up to the next multiple of `align` (a power of two).
pub const fn align_up(value: usize, align: usize) -> usize {
    if align == 0 {
        value
    } else {
        (value + (align - 1)) & !(align - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, PAGE_SIZE), 0);
        assert_eq!(align_up(1, PAGE_SIZE), PAGE_SIZE);
        assert_eq!(align_up(PAGE_SIZE, PAGE_SIZE), PAGE_SIZE);
        assert_eq!(align_up(PAGE_SIZE + 1, PAGE_SIZE), 2 * PAGE_SIZE);
        assert_eq!(align_up(17, 0), 17);
    }
}
