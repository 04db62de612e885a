use quick_error::quick_error;

quick_error! {
	/// Failure of a buffer operation
	///
	/// Deficits are reported as positive byte counts:
	/// `NoSpace { needed: 7 }` means the destination would have to be 7 bytes larger.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub enum Error {
		/// Write, extend, shift or trim attempted on a read-only view
		ReadOnly {
			display("buffer is read-only")
		}
		/// Extend or trim attempted on a view that isn't backed by growable storage
		NotGrowable {
			display("buffer is not backed by growable storage")
		}
		/// Destination (or buffer capacity) is short by `needed` bytes
		NoSpace { needed: usize } {
			display("insufficient space, {} more bytes required", needed)
		}
		/// Source has `needed` bytes fewer than requested
		Underrun { needed: usize } {
			display("insufficient data, {} more bytes required", needed)
		}
		/// Growth refused because the buffer is already at its configured maximum
		Exhausted { max: usize } {
			display("buffer is at its maximum length of {} bytes", max)
		}
		/// Storage failed to (re)allocate `len` bytes
		Alloc { len: usize } {
			display("failed allocating {} bytes", len)
		}
		/// Cursor position outside of `start..=end`
		OutOfBounds { pos: usize, start: usize, end: usize } {
			display("position {} out of range {}..={}", pos, start, end)
		}
		/// A marker or ancestor cursor would be invalidated by the operation,
		/// nothing was changed
		Constraint {
			display("operation would invalidate a marker or cursor")
		}
		/// Storage grew by `added` bytes, but at least one cursor or marker had to be clamped
		Clamped { added: usize } {
			display("buffer grew by {} bytes, but some positions were clamped", added)
		}
		/// Formatting into the scratch area failed
		Format {
			display("formatting failed")
		}
	}
}

quick_error! {
	/// Why a number couldn't be read from the buffer
	///
	/// Success is represented by `Ok` of the surrounding `Result`.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub enum ParseError {
		/// Nothing left to parse
		NotFound {
			display("token not found")
		}
		/// Input can't be parsed as a number, or has unparsed characters after it
		Trailing {
			display("trailing data")
		}
		/// Value exceeds the maximum of the target type
		Overflow {
			display("integer overflow")
		}
		/// Value is below the minimum of the target type
		Underflow {
			display("integer underflow")
		}
	}
}
