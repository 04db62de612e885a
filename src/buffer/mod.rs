/*!
Backing storage for growable views.

Only the root of a view hierarchy owns a `Storage`;
every child reaches it through its parent chain,
so reallocation happens in exactly one place.

## Example usage

```
use sbuff::{Storage, VecStorage};

# fn foo() -> Result<(), sbuff::Error> {
// 32 bytes of content plus the terminator
let mut buf = VecStorage::alloc(33)?;
buf.as_mut_slice()[..5].copy_from_slice(b"hello");

// grow in place, existing content stays put
buf.realloc(65)?;
assert_eq!(&buf.as_slice()[..5], b"hello");
assert_eq!(buf.len(), 65);

// and shrink back down
buf.realloc(6)?;
assert_eq!(buf.len(), 6);
# Ok(())
# }
# foo().unwrap();
```
*/

use crate::Error;

/**
This trait abstracts the allocator behind a dynamically-backed view

Lengths are physical lengths, terminator byte included.
Freeing happens on drop.
*/
pub trait Storage {
	/// Allocate `len` zeroed bytes.
	fn alloc(len: usize) -> Result<Self, Error>
	where Self: Sized;
	/**
	Resize to exactly `len` bytes, preserving the common prefix.

	Newly added bytes are zeroed. On failure storage is left untouched.
	*/
	fn realloc(&mut self, len: usize) -> Result<(), Error>;
	fn as_slice(&self) -> &[u8];
	fn as_mut_slice(&mut self) -> &mut [u8];
	/// Current physical length of the allocation
	fn len(&self) -> usize;
}

/**
Reallocation policy of a dynamically-backed root view.

`init` is the content length the buffer springs back to
after having been trimmed below it,
`max` is the hard cap on content length (terminator not included).
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Growth {
	pub(crate) init: usize,
	pub(crate) max: Option<usize>,
}

impl Growth {
	/*
	Physical length the allocation should have after a request for `extension` more bytes,
	given current physical length `clen`.

	clen + ext < init  -> back to init (buffer was trimmed)
	ext < clen         -> double the content capacity
	otherwise          -> exactly what was asked for
	and never past max + 1 (terminator)
	*/
	pub(crate) fn next_len(&self, clen: usize, extension: usize) -> Result<usize, Error> {
		let elen = if clen.saturating_add(extension) < self.init {
			(self.init - clen) + 1
		} else if extension < clen {
			// don't double the terminator
			clen - 1
		} else {
			extension
		};

		// saturated lengths are left for the allocator to refuse
		let mut nlen = clen.saturating_add(elen);
		if let Some(max) = self.max {
			nlen = nlen.min(max.saturating_add(1));
			if nlen <= clen {
				return Err(Error::Exhausted { max });
			}
		}
		Ok(nlen)
	}
}

/// Root storage along with its policy
pub(crate) struct Dynamic {
	pub(crate) storage: Box<dyn Storage>,
	pub(crate) growth: Growth,
}

mod vec;
pub use vec::*;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn grow_back_to_init() {
		let g = Growth { init: 32, max: Some(50) };
		// trimmed down to the terminator alone
		assert_eq!(g.next_len(1, 10), Ok(33));
		assert_eq!(g.next_len(11, 10), Ok(33));
	}

	#[test]
	fn grow_by_doubling() {
		let g = Growth { init: 32, max: Some(50) };
		assert_eq!(g.next_len(21, 15), Ok(41));
		// doubling capped at max
		assert_eq!(g.next_len(41, 1), Ok(51));
	}

	#[test]
	fn grow_exact() {
		let g = Growth { init: 0, max: None };
		assert_eq!(g.next_len(1, 1), Ok(2));
		assert_eq!(g.next_len(2, 2), Ok(4));
		assert_eq!(g.next_len(4, 1), Ok(7));
		assert_eq!(g.next_len(4, 100), Ok(104));
	}

	#[test]
	fn exhausted() {
		let g = Growth { init: 32, max: Some(50) };
		assert_eq!(g.next_len(51, 1), Err(Error::Exhausted { max: 50 }));
		// one byte short of max still grows
		assert_eq!(g.next_len(50, 1), Ok(51));
	}

	#[test]
	fn huge_requests() {
		let g = Growth { init: 4, max: Some(50) };
		assert_eq!(g.next_len(5, usize::MAX), Ok(51));
		assert_eq!(g.next_len(51, usize::MAX), Err(Error::Exhausted { max: 50 }));

		let g = Growth { init: 4, max: None };
		assert_eq!(g.next_len(5, usize::MAX), Ok(usize::MAX));

		let g = Growth { init: 4, max: Some(usize::MAX) };
		assert_eq!(g.next_len(5, usize::MAX), Ok(usize::MAX));
		assert_eq!(g.next_len(usize::MAX, 1), Err(Error::Exhausted { max: usize::MAX }));
	}
}
