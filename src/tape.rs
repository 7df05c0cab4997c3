//! Bounded, bidirectional byte tape.
//!
//! The tape is a single contiguous buffer of `2 * capacity` cells. The origin
//! cell (where the cursor starts) sits in the middle at index `capacity`, so a
//! program can walk `capacity` cells to the left of it and `capacity - 1`
//! cells to the right.
//!
//! Cursor movement is the only fallible operation once the tape exists: moving
//! past either end returns [`TapeError`] and leaves the tape untouched.
//! Capacities that come from user input go through [`Tape::try_with_capacity`].

/// Default number of cells on each side of the origin.
pub const DEFAULT_CAPACITY: usize = 20_000;

/// Largest capacity [`Tape::try_with_capacity`] accepts (256 MiB per side).
pub const MAX_CAPACITY: usize = 1 << 28;

/// The cursor attempted to leave the tape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TapeError {
    /// A move to the right would pass the last cell.
    #[error("tape overflow: cannot move right by {distance} from position {position}")]
    Overflow { position: isize, distance: usize },

    /// A move to the left would pass the first cell.
    #[error("tape underflow: cannot move left by {distance} from position {position}")]
    Underflow { position: isize, distance: usize },

    /// The requested tape could not be allocated.
    #[error("cannot allocate a tape of {capacity} cells per side (maximum {MAX_CAPACITY})")]
    TooLarge { capacity: usize },
}

/// Byte memory with a movable cursor.
#[derive(Debug, Clone)]
pub struct Tape {
    cells: Vec<u8>,
    cursor: usize,
    capacity: usize,
}

impl Tape {
    /// Create a tape with [`DEFAULT_CAPACITY`] cells on each side.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a zeroed tape with `capacity` cells on each side of the origin.
    ///
    /// A capacity of zero is bumped to one so the origin cell always exists.
    ///
    /// # Panics
    ///
    /// Panics if `2 * capacity` cells cannot be allocated. Use
    /// [`Tape::try_with_capacity`] for untrusted sizes.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            cells: vec![0; capacity * 2],
            cursor: capacity,
            capacity,
        }
    }

    /// Like [`Tape::with_capacity`], but fails with [`TapeError::TooLarge`]
    /// instead of panicking when the capacity exceeds [`MAX_CAPACITY`] or the
    /// allocation fails.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TapeError> {
        let capacity = capacity.max(1);
        let too_large = TapeError::TooLarge { capacity };
        if capacity > MAX_CAPACITY {
            return Err(too_large);
        }
        let len = capacity.checked_mul(2).ok_or(too_large)?;
        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| too_large)?;
        cells.resize(len, 0);
        Ok(Self {
            cells,
            cursor: capacity,
            capacity,
        })
    }

    /// Cells available on each side of the origin.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cursor offset from the origin cell; negative values are left of it.
    pub fn position(&self) -> isize {
        self.cursor as isize - self.capacity as isize
    }

    pub fn move_right(&mut self, n: usize) -> Result<(), TapeError> {
        let last = self.cells.len() - 1;
        match self.cursor.checked_add(n) {
            Some(next) if next <= last => {
                self.cursor = next;
                Ok(())
            }
            _ => Err(TapeError::Overflow {
                position: self.position(),
                distance: n,
            }),
        }
    }

    pub fn move_left(&mut self, n: usize) -> Result<(), TapeError> {
        match self.cursor.checked_sub(n) {
            Some(next) => {
                self.cursor = next;
                Ok(())
            }
            None => Err(TapeError::Underflow {
                position: self.position(),
                distance: n,
            }),
        }
    }

    /// Add a signed delta to the current cell, wrapping modulo 256.
    #[inline]
    pub fn add(&mut self, delta: i64) {
        let cell = &mut self.cells[self.cursor];
        // Truncation to the low byte is exactly addition mod 256.
        *cell = cell.wrapping_add(delta as u8);
    }

    /// Overwrite the current cell with the low 8 bits of `value`.
    #[inline]
    pub fn set(&mut self, value: i64) {
        self.cells[self.cursor] = value as u8;
    }

    #[inline]
    pub fn get(&self) -> u8 {
        self.cells[self.cursor]
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_centered_and_zeroed() {
        let tape = Tape::with_capacity(8);
        assert_eq!(tape.position(), 0);
        assert_eq!(tape.get(), 0);
        assert_eq!(tape.capacity(), 8);
    }

    #[test]
    fn wrapping_addition() {
        let mut tape = Tape::with_capacity(1);
        tape.set(255);
        tape.add(1);
        assert_eq!(tape.get(), 0);
    }

    #[test]
    fn wrapping_subtraction() {
        let mut tape = Tape::with_capacity(1);
        tape.add(-1);
        assert_eq!(tape.get(), 255);
    }

    #[test]
    fn large_deltas_wrap() {
        let mut tape = Tape::with_capacity(1);
        tape.add(300);
        assert_eq!(tape.get(), 44);
        tape.add(-300);
        assert_eq!(tape.get(), 0);
    }

    #[test]
    fn set_truncates_to_low_byte() {
        let mut tape = Tape::with_capacity(1);
        tape.set(0x1_41);
        assert_eq!(tape.get(), 0x41);
        tape.set(-1);
        assert_eq!(tape.get(), 255);
    }

    #[test]
    fn cells_are_independent() {
        let mut tape = Tape::with_capacity(4);
        tape.add(7);
        tape.move_right(1).unwrap();
        assert_eq!(tape.get(), 0);
        tape.add(3);
        tape.move_left(2).unwrap();
        assert_eq!(tape.get(), 0);
        tape.move_right(1).unwrap();
        assert_eq!(tape.get(), 7);
    }

    #[test]
    fn move_to_right_boundary_succeeds() {
        let mut tape = Tape::with_capacity(4);
        tape.move_right(3).unwrap();
        assert_eq!(tape.position(), 3);
    }

    #[test]
    fn move_past_right_boundary_overflows_without_moving() {
        let mut tape = Tape::with_capacity(4);
        tape.move_right(3).unwrap();
        let err = tape.move_right(1).unwrap_err();
        assert_eq!(
            err,
            TapeError::Overflow {
                position: 3,
                distance: 1
            }
        );
        assert_eq!(tape.position(), 3);
    }

    #[test]
    fn move_to_left_boundary_succeeds() {
        let mut tape = Tape::with_capacity(4);
        tape.move_left(4).unwrap();
        assert_eq!(tape.position(), -4);
    }

    #[test]
    fn move_past_left_boundary_underflows_without_moving() {
        let mut tape = Tape::with_capacity(4);
        let err = tape.move_left(5).unwrap_err();
        assert!(matches!(err, TapeError::Underflow { position: 0, distance: 5 }));
        assert_eq!(tape.position(), 0);
    }

    #[test]
    fn huge_move_does_not_wrap_the_cursor() {
        let mut tape = Tape::with_capacity(4);
        assert!(tape.move_right(usize::MAX).is_err());
        assert_eq!(tape.position(), 0);
    }

    #[test]
    fn try_with_capacity_matches_with_capacity() {
        let mut tape = Tape::try_with_capacity(4).unwrap();
        assert_eq!(tape.capacity(), 4);
        tape.move_right(3).unwrap();
        assert!(tape.move_right(1).is_err());
        tape.move_left(7).unwrap();
        assert!(tape.move_left(1).is_err());
    }

    #[test]
    fn oversized_capacity_is_an_error() {
        for capacity in [MAX_CAPACITY + 1, usize::MAX / 2, usize::MAX] {
            let err = Tape::try_with_capacity(capacity).unwrap_err();
            assert_eq!(err, TapeError::TooLarge { capacity });
        }
    }

    #[test]
    fn default_capacity_is_twenty_thousand() {
        let mut tape = Tape::default();
        tape.move_left(DEFAULT_CAPACITY).unwrap();
        assert!(tape.move_left(1).is_err());
    }
}
