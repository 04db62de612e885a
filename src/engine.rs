// https://github.com/rust-lang/rust/issues/54236
use copy_in_place::*;
use tracing::{debug, trace};

use crate::{Error, Sbuff, Tree};

impl Sbuff<'_> {
	/**
	Grow the backing storage so that at least `extension` more bytes fit, returns bytes actually added.

	The amount added follows the policy set up in [`SbuffBuilder`](struct.SbuffBuilder.html):
	back to the initial capacity if the buffer was trimmed below it,
	doubling if less than the current capacity was requested,
	and never beyond the configured maximum.

	Every view in the ancestor chain has its `end` moved to the new capacity.
	*/
	pub fn extend(&mut self, extension: usize) -> Result<usize, Error> {
		self.check();
		if self.is_const {
			return Err(Error::ReadOnly);
		}
		if extension == 0 {
			return Ok(0);
		}

		let dynamic = self.dynamic().ok_or(Error::NotGrowable)?;
		let clen = dynamic.storage.len();
		let nlen = match dynamic.growth.next_len(clen, extension) {
			Ok(nlen) => nlen,
			Err(e) => {
				debug!(clen, extension, "failed extending buffer: {}", e);
				return Err(e);
			},
		};
		if let Err(e) = dynamic.storage.realloc(nlen) {
			debug!(clen, nlen, "failed extending buffer: {}", e);
			return Err(e);
		}
		trace!(clen, nlen, "extended buffer");

		let added = nlen - clen;
		if !self.rebase(nlen - 1) {
			return Err(Error::Clamped { added });
		}
		Ok(added)
	}

	/**
	Discard up to `shift` bytes from the front of the view, moving the rest of the content down.
	Returns how many bytes were actually discarded.

	Only bytes no cursor or marker in the ancestor chain still points at may be discarded,
	so the result can be anything from `0` to `shift`.

	```
	use sbuff::Sbuff;

	let mut sbuff = Sbuff::talloc(16, 16).unwrap();
	sbuff.in_str("header:body").unwrap();
	sbuff.set_to_start();
	sbuff.adv_past_str(b"header:");

	assert_eq!(sbuff.shift(100), Ok(7));
	assert_eq!(sbuff.position(), 0);
	assert_eq!(sbuff.shifted(), 7);
	assert_eq!(&sbuff.current()[..4], b"body");
	```
	*/
	pub fn shift(&mut self, shift: usize) -> Result<usize, Error> {
		self.check();
		if self.is_const {
			return Err(Error::ReadOnly);
		}

		let base = self.start;
		let max_shift = self.shift_limit(base, shift);
		if max_shift == 0 {
			trace!(shift, "shift constrained to zero");
			return Ok(0);
		}

		let p = self.p;
		let data = self.data_mut().ok_or(Error::ReadOnly)?;
		// if the content was terminated, keep it that way
		let reterminate = data.get(p) == Some(&0);
		copy_in_place(data, (base + max_shift).., base);

		self.shift_down(base, max_shift);
		if reterminate {
			let p = self.p;
			if let Some(b) = self.data_mut().and_then(|data| data.get_mut(p)) {
				*b = 0;
			}
		}
		trace!(shift, max_shift, "shifted buffer");

		Ok(max_shift)
	}

	/**
	Shrink the backing storage to the content before the cursor plus the terminator.

	Fails without changing anything if a marker or cursor anywhere in the ancestor chain
	points past the cursor, as it would end up past the end of the buffer.
	*/
	pub fn trim(&mut self) -> Result<(), Error> {
		self.check();
		if self.is_const {
			return Err(Error::ReadOnly);
		}

		let nlen = self.p + 1;
		let clen = self.dynamic().ok_or(Error::NotGrowable)?.storage.len();
		if nlen >= clen {
			return Ok(());
		}
		if self.highest() > self.p {
			debug!(clen, nlen, "refusing to trim buffer, positions past the cursor");
			return Err(Error::Constraint);
		}

		let dynamic = self.dynamic().ok_or(Error::NotGrowable)?;
		if let Err(e) = dynamic.storage.realloc(nlen) {
			debug!(clen, nlen, "failed trimming buffer: {}", e);
			return Err(e);
		}
		dynamic.storage.as_mut_slice()[nlen - 1] = 0;
		trace!(clen, nlen, "trimmed buffer");

		// nothing points past p, so nothing gets clamped
		self.rebase(nlen - 1);
		Ok(())
	}
}
