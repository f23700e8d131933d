//! Fixed-capacity ring-buffer stack with bottom eviction.

/// A LIFO stack over a circular buffer of fixed capacity.
///
/// Besides the usual top operations it can insert below the bottom entry
/// and discard the oldest entries in bulk with
/// [`drop_front`](Self::drop_front), which is how the DFS engine caps its
/// working memory regardless of path depth.
///
/// Misuse (pushing onto a full stack, popping or peeking an empty one) is a
/// contract violation and panics.
#[derive(Clone, Debug)]
pub struct SpinStack<T> {
    buf: Box<[T]>,
    top: usize,
    bottom: usize,
    empty: bool,
}

impl<T: Copy + Default> SpinStack<T> {
    /// Creates an empty stack holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "spin stack capacity must be positive");
        Self {
            buf: vec![T::default(); capacity].into_boxed_slice(),
            top: 0,
            bottom: 0,
            empty: true,
        }
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        if self.empty {
            0
        } else if self.bottom >= self.top {
            self.top + self.capacity() - self.bottom
        } else {
            self.top - self.bottom
        }
    }

    /// Returns `true` if there are no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Returns `true` if no further entry fits.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    #[inline]
    fn step_back(&self, index: usize) -> usize {
        (index + self.capacity() - 1) % self.capacity()
    }

    /// Pushes onto the top.
    ///
    /// # Panics
    ///
    /// Panics if the stack is full.
    #[inline]
    pub fn push_top(&mut self, value: T) {
        assert!(!self.is_full(), "push onto a full spin stack");
        self.buf[self.top] = value;
        self.top = (self.top + 1) % self.capacity();
        self.empty = false;
    }

    /// Inserts below the bottom entry.
    ///
    /// # Panics
    ///
    /// Panics if the stack is full.
    pub fn push_bottom(&mut self, value: T) {
        assert!(!self.is_full(), "push onto a full spin stack");
        self.bottom = self.step_back(self.bottom);
        self.buf[self.bottom] = value;
        self.empty = false;
    }

    /// Removes and returns the top entry.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    #[inline]
    pub fn pop(&mut self) -> T {
        assert!(!self.empty, "pop from an empty spin stack");
        self.top = self.step_back(self.top);
        if self.top == self.bottom {
            self.empty = true;
        }
        self.buf[self.top]
    }

    /// Returns the top entry without removing it.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    #[inline]
    pub fn peek(&self) -> T {
        assert!(!self.empty, "peek into an empty spin stack");
        self.buf[self.step_back(self.top)]
    }

    /// Discards up to `count` of the oldest entries and returns how many
    /// were dropped.
    pub fn drop_front(&mut self, count: usize) -> usize {
        let len = self.len();
        let count = count.min(len);
        self.bottom = (self.bottom + count) % self.capacity();
        if count == len {
            self.empty = true;
        }
        count
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.top = 0;
        self.bottom = 0;
        self.empty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_two() {
        let mut stack = SpinStack::new(2);
        assert!(stack.is_empty());
        stack.push_top(1u64);
        stack.push_top(2_993_322);
        assert!(stack.is_full());
        assert_eq!(stack.peek(), 2_993_322);
        assert_eq!(stack.pop(), 2_993_322);
        assert_eq!(stack.pop(), 1);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_drop_front_then_refill() {
        let mut stack = SpinStack::new(8);
        assert_eq!(stack.drop_front(10), 0);
        assert!(stack.is_empty());

        for c in 0..8 {
            stack.push_top(c * 100);
        }
        assert!(stack.is_full());
        assert_eq!(stack.drop_front(4), 4);
        assert_eq!(stack.len(), 4);

        for c in 8..12 {
            stack.push_top(c * 100);
        }
        assert!(stack.is_full());
        for c in (4..12).rev() {
            assert_eq!(stack.pop(), c * 100);
            assert_eq!(stack.len(), c - 4);
        }
        assert!(stack.is_empty());
    }

    #[test]
    fn test_push_bottom() {
        let mut stack = SpinStack::new(3);
        stack.push_top((2usize, 1usize));
        stack.push_bottom((1, 1));
        stack.push_top((3, 1));
        assert!(stack.is_full());
        assert_eq!(stack.pop(), (3, 1));
        assert_eq!(stack.pop(), (2, 1));
        assert_eq!(stack.pop(), (1, 1));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_drop_everything() {
        let mut stack = SpinStack::new(4);
        stack.push_top(1u8);
        stack.push_top(2);
        assert_eq!(stack.drop_front(5), 2);
        assert!(stack.is_empty());
        stack.push_top(7);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.pop(), 7);
    }

    #[test]
    fn test_wraparound() {
        let mut stack = SpinStack::new(3);
        for round in 0..10u32 {
            stack.push_top(round);
            stack.push_top(round + 100);
            assert_eq!(stack.drop_front(1), 1);
            assert_eq!(stack.pop(), round + 100);
            assert!(stack.is_empty());
        }
        stack.push_top(1);
        stack.clear();
        assert!(stack.is_empty());
    }

    #[test]
    #[should_panic(expected = "empty")]
    fn test_pop_empty_panics() {
        let mut stack: SpinStack<u8> = SpinStack::new(1);
        stack.pop();
    }

    #[test]
    #[should_panic(expected = "full")]
    fn test_push_full_panics() {
        let mut stack = SpinStack::new(1);
        stack.push_top(1u8);
        stack.push_top(2);
    }
}
