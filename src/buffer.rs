/// Fixed-size storage for machine state. Indexing takes any unsigned type
/// that widens to `usize`, so opcode fields can be used directly.
#[derive(Debug, Clone)]
pub struct Buffer<T: Copy + Default, const N: usize> {
    buffer: [T; N],
}

impl<T: Copy + Default, const N: usize> Buffer<T, N> {
    pub fn new() -> Buffer<T, N> {
        Buffer {
            buffer: [T::default(); N],
        }
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn fill(&mut self, value: T) {
        self.buffer.fill(value);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.buffer
    }

    /// `len` elements starting at `from`, or `None` if any of them is past the end.
    pub fn slice(&self, from: usize, len: usize) -> Option<&[T]> {
        self.buffer.get(from..from.checked_add(len)?)
    }

    pub fn slice_mut(&mut self, from: usize, len: usize) -> Option<&mut [T]> {
        self.buffer.get_mut(from..from.checked_add(len)?)
    }
}

impl<T: Copy + Default, const N: usize> Default for Buffer<T, N> {
    fn default() -> Self {
        Buffer::new()
    }
}

impl<T: Copy + Default, U: Into<usize>, const N: usize> std::ops::Index<U> for Buffer<T, N> {
    type Output = T;

    fn index(&self, index: U) -> &Self::Output {
        &self.buffer[index.into()]
    }
}

impl<T: Copy + Default, U: Into<usize>, const N: usize> std::ops::IndexMut<U> for Buffer<T, N> {
    fn index_mut(&mut self, index: U) -> &mut Self::Output {
        &mut self.buffer[index.into()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let b: Buffer<u8, 16> = Buffer::new();
        assert_eq!(b.len(), 16);
        assert!(b.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_index_by_narrow_types() {
        let mut b: Buffer<u16, 4> = Buffer::new();
        b[2u8] = 0x1234;
        b[3u16] = 0xBEEF;
        assert_eq!(b[2usize], 0x1234);
        assert_eq!(b[3u8], 0xBEEF);
    }

    #[test]
    fn test_slice_in_bounds() {
        let mut b: Buffer<u8, 8> = Buffer::new();
        b.slice_mut(4, 4).unwrap().copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(b.slice(3, 3), Some(&[0, 1, 2][..]));
        assert_eq!(b.slice(8, 0), Some(&[][..]));
    }

    #[test]
    fn test_slice_past_end_is_none() {
        let mut b: Buffer<u8, 8> = Buffer::new();
        assert!(b.slice(5, 4).is_none());
        assert!(b.slice(9, 0).is_none());
        assert!(b.slice_mut(usize::MAX, 2).is_none());
    }

    #[test]
    fn test_fill() {
        let mut b: Buffer<bool, 32> = Buffer::new();
        b.fill(true);
        assert!(b.as_slice().iter().all(|&v| v));
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range_panics() {
        let b: Buffer<u8, 4> = Buffer::new();
        let _ = b[4u8];
    }
}
