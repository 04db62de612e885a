/*!
Copying out of a view.

Every successful copy advances the cursor by exactly the number of bytes copied.
`len` of `usize::MAX` stands for "everything up to the end of the view".

Fixed-size destinations always get a terminating `\0` after the copied bytes,
so their usable length is one less than their size.
*/

use crate::{CharSet, Error, Sbuff};

impl Sbuff<'_> {
	// callers guarantee len < out.len() and len <= remaining()
	fn copy_out(&mut self, out: &mut [u8], len: usize) -> usize {
		out[..len].copy_from_slice(&self.current()[..len]);
		out[len] = 0;
		self.seek(self.p + len);
		len
	}

	fn take(&mut self, len: usize) -> Vec<u8> {
		let out = self.current()[..len].to_vec();
		self.seek(self.p + len);
		out
	}

	/*
	how much of a copy fits into `out`, accounting for the terminator
	and for data available in the view
	*/
	fn fit(&self, out: &[u8], len: usize) -> Option<usize> {
		let outlen = out.len().checked_sub(1)?;
		Some(len.min(outlen).min(self.remaining()))
	}

	/**
	Copy exactly `len` bytes into `out`.

	If `out` is too small, fails with [`Error::NoSpace`](enum.Error.html#variant.NoSpace)
	telling how much larger it has to be, and doesn't touch it.
	If the view holds fewer than `len` bytes, fails with `Underrun`.

	```
	use sbuff::{Error, Sbuff};

	let mut sbuff = Sbuff::new_in(b"i am a longer test string");
	let mut out = [0u8; 19];
	assert_eq!(sbuff.out_bstrncpy_exact(&mut out, usize::MAX), Err(Error::NoSpace { needed: 7 }));
	assert_eq!(sbuff.position(), 0);

	let mut out = [0u8; 26];
	assert_eq!(sbuff.out_bstrncpy_exact(&mut out, usize::MAX), Ok(25));
	```
	*/
	pub fn out_bstrncpy_exact(&mut self, out: &mut [u8], len: usize) -> Result<usize, Error> {
		self.check();
		let remaining = self.remaining();
		let len = if len == usize::MAX { remaining } else { len };

		let outlen = match out.len().checked_sub(1) {
			Some(outlen) => outlen,
			None => return Err(Error::NoSpace { needed: len.saturating_add(1) }),
		};
		if len > outlen {
			return Err(Error::NoSpace { needed: len - outlen });
		}
		if len > remaining {
			return Err(Error::Underrun { needed: len - remaining });
		}

		Ok(self.copy_out(out, len))
	}

	/// Copy as many of `len` bytes as fit into `out` and are available.
	pub fn out_bstrncpy(&mut self, out: &mut [u8], len: usize) -> usize {
		self.check();
		match self.fit(out, len) {
			Some(len) => self.copy_out(out, len),
			None => 0,
		}
	}

	/// Like [`out_bstrncpy()`](#method.out_bstrncpy), but stops at the first byte not in `allowed`.
	pub fn out_bstrncpy_allowed(&mut self, out: &mut [u8], len: usize, allowed: &CharSet) -> usize {
		self.check();
		match self.fit(out, len) {
			Some(len) => {
				let len = allowed.span(&self.current()[..len]);
				self.copy_out(out, len)
			},
			None => 0,
		}
	}

	/// Like [`out_bstrncpy()`](#method.out_bstrncpy), but stops at the first byte in `until`.
	pub fn out_bstrncpy_until(&mut self, out: &mut [u8], len: usize, until: &CharSet) -> usize {
		self.check();
		match self.fit(out, len) {
			Some(len) => {
				let len = until.cspan(&self.current()[..len]);
				self.copy_out(out, len)
			},
			None => 0,
		}
	}

	/// Copy exactly `len` bytes into a freshly allocated buffer.
	pub fn out_abstrncpy_exact(&mut self, len: usize) -> Result<Vec<u8>, Error> {
		self.check();
		let remaining = self.remaining();
		let len = if len == usize::MAX { remaining } else { len };
		if len > remaining {
			return Err(Error::Underrun { needed: len - remaining });
		}
		Ok(self.take(len))
	}

	/// Copy up to `len` bytes into a freshly allocated buffer.
	pub fn out_abstrncpy(&mut self, len: usize) -> Vec<u8> {
		self.check();
		let len = len.min(self.remaining());
		self.take(len)
	}

	pub fn out_abstrncpy_allowed(&mut self, len: usize, allowed: &CharSet) -> Vec<u8> {
		self.check();
		let len = len.min(self.remaining());
		let len = allowed.span(&self.current()[..len]);
		self.take(len)
	}

	pub fn out_abstrncpy_until(&mut self, len: usize, until: &CharSet) -> Vec<u8> {
		self.check();
		let len = len.min(self.remaining());
		let len = until.cspan(&self.current()[..len]);
		self.take(len)
	}
}

#[cfg(test)]
mod tests {
	use crate::*;

	const IN: &[u8] = b"i am a test string";
	const IN_LONG: &[u8] = b"i am a longer test string";

	fn cstr(out: &[u8]) -> &[u8] {
		let nul = out.iter().position(|&b| b == 0).unwrap();
		&out[..nul]
	}

	#[test]
	fn strncpy_exact() {
		let mut out = [0xffu8; 18 + 1];
		let mut sbuff = Sbuff::new_in(IN);

		assert_eq!(sbuff.out_bstrncpy_exact(&mut out, 5), Ok(5));
		assert_eq!(cstr(&out), b"i am ");
		assert_eq!(sbuff.current(), b"a test string");

		assert_eq!(sbuff.out_bstrncpy_exact(&mut out, 13), Ok(13));
		assert_eq!(cstr(&out), b"a test string");
		assert_eq!(sbuff.current(), b"");
		assert_eq!(sbuff.remaining(), 0);

		// would overrun input
		assert_eq!(sbuff.out_bstrncpy_exact(&mut out, 1), Err(Error::Underrun { needed: 1 }));
		assert_eq!(sbuff.remaining(), 0);

		// would overrun output
		let mut sbuff = Sbuff::new_in(IN_LONG);
		assert_eq!(sbuff.out_bstrncpy_exact(&mut out, usize::MAX), Err(Error::NoSpace { needed: 7 }));
		assert_eq!(sbuff.position(), 0);

		// zero length output buffer
		let mut empty = [];
		assert_eq!(sbuff.out_bstrncpy_exact(&mut empty, usize::MAX), Err(Error::NoSpace { needed: 26 }));
		assert_eq!(sbuff.position(), 0);
	}

	#[test]
	fn strncpy() {
		let mut out = [0xffu8; 18 + 1];
		let mut sbuff = Sbuff::new_in(IN);

		assert_eq!(sbuff.out_bstrncpy(&mut out, 5), 5);
		assert_eq!(cstr(&out), b"i am ");
		assert_eq!(sbuff.current(), b"a test string");

		assert_eq!(sbuff.out_bstrncpy(&mut out, 13), 13);
		assert_eq!(cstr(&out), b"a test string");
		assert_eq!(sbuff.remaining(), 0);

		assert_eq!(sbuff.out_bstrncpy(&mut out, 1), 0);
		assert_eq!(cstr(&out), b"");

		// clamped to the output
		let mut sbuff = Sbuff::new_in(IN_LONG);
		assert_eq!(sbuff.out_bstrncpy(&mut out, usize::MAX), 18);
		assert_eq!(cstr(&out), b"i am a longer test");
		assert_eq!(sbuff.current(), b" string");

		// zero length output buffer must not even be terminated
		sbuff.set_to_start();
		let mut one = [b'a'];
		assert_eq!(sbuff.out_bstrncpy(&mut one[..0], usize::MAX), 0);
		assert_eq!(one[0], b'a');
		assert_eq!(sbuff.position(), 0);
	}

	#[test]
	fn strncpy_allowed() {
		let mut out = [0xffu8; 16];
		let mut sbuff = Sbuff::new_in(b"12345abc");
		assert_eq!(sbuff.out_bstrncpy_allowed(&mut out, usize::MAX, &DIGITS), 5);
		assert_eq!(cstr(&out), b"12345");
		assert_eq!(sbuff.current(), b"abc");

		// nothing allowed at the cursor
		assert_eq!(sbuff.out_bstrncpy_allowed(&mut out, usize::MAX, &DIGITS), 0);
		assert_eq!(cstr(&out), b"");
		assert_eq!(sbuff.current(), b"abc");

		// limited by len
		let mut sbuff = Sbuff::new_in(b"12345");
		assert_eq!(sbuff.out_bstrncpy_allowed(&mut out, 2, &DIGITS), 2);
		assert_eq!(cstr(&out), b"12");
	}

	#[test]
	fn strncpy_until() {
		let mut out = [0xffu8; 4];
		let mut sbuff = Sbuff::new_in(b"key=value");
		let stop = CharSet::new(b"=");
		// limited by output
		assert_eq!(sbuff.out_bstrncpy_until(&mut out, usize::MAX, &stop), 3);
		assert_eq!(cstr(&out), b"key");
		assert!(sbuff.next_if_char(b'='));
		assert_eq!(sbuff.out_bstrncpy_until(&mut out, usize::MAX, &stop), 3);
		assert_eq!(cstr(&out), b"val");
		assert_eq!(sbuff.current(), b"ue");
	}

	#[test]
	fn no_advance() {
		let mut out = [0u8; 18 + 1];
		let mut sbuff = Sbuff::new_in(IN);
		assert_eq!(sbuff.no_advance().out_bstrncpy_exact(&mut out, 5), Ok(5));
		assert_eq!(cstr(&out), b"i am ");
		assert_eq!(sbuff.position(), 0);
	}

	#[test]
	fn abstrncpy() {
		let mut sbuff = Sbuff::new_in(b"hello world");
		assert_eq!(sbuff.out_abstrncpy_exact(20), Err(Error::Underrun { needed: 9 }));
		assert_eq!(sbuff.out_abstrncpy_exact(5), Ok(b"hello".to_vec()));
		assert_eq!(sbuff.out_abstrncpy_until(usize::MAX, &CharSet::new(b"r")), b" wo".to_vec());
		assert_eq!(sbuff.out_abstrncpy_allowed(usize::MAX, &DIGITS), Vec::<u8>::new());
		assert_eq!(sbuff.out_abstrncpy(100), b"rld".to_vec());
		assert_eq!(sbuff.out_abstrncpy(100), Vec::<u8>::new());
		assert_eq!(sbuff.out_abstrncpy_exact(usize::MAX), Ok(vec![]));
	}

	#[test]
	fn abstrncpy_allowed() {
		let mut sbuff = Sbuff::new_in(b"0x1f");
		assert_eq!(sbuff.out_abstrncpy_allowed(usize::MAX, &DIGITS), b"0".to_vec());
		assert!(sbuff.next_if_char(b'x'));
		let hex = CharSet::new(b"0123456789abcdef");
		assert_eq!(sbuff.out_abstrncpy_allowed(1, &hex), b"1".to_vec());
		assert_eq!(sbuff.current(), b"f");
	}

	#[test]
	fn copy_through_child() {
		let mut sbuff = Sbuff::new_in(b"abc def");
		{
			let mut child = sbuff.child();
			assert_eq!(child.out_abstrncpy_until(usize::MAX, &WHITESPACE), b"abc".to_vec());
		}
		assert_eq!(sbuff.position(), 3);
	}
}
