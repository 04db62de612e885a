use memchr::{memchr, memmem};

use crate::{Sbuff, WHITESPACE};

/*
Searching and skipping.

`adv_past_*` and `next_*` only ever look at what's right at the cursor,
`adv_to_*` scan the rest of the view.
*/
impl Sbuff<'_> {
	/**
	Skip `needle` if the view continues with it.

	```
	use sbuff::Sbuff;

	let mut sbuff = Sbuff::new_in(b"foobar");
	assert!(sbuff.adv_past_str(b"foo"));
	assert_eq!(sbuff.current(), b"bar");
	assert!(!sbuff.adv_past_str(b"baz"));
	assert_eq!(sbuff.current(), b"bar");
	```
	*/
	pub fn adv_past_str(&mut self, needle: &[u8]) -> bool {
		self.check();
		if !self.current().starts_with(needle) {
			return false;
		}
		self.seek(self.p + needle.len());
		true
	}

	/// Same as [`adv_past_str()`](#method.adv_past_str), ignoring ASCII case.
	pub fn adv_past_strcase(&mut self, needle: &[u8]) -> bool {
		self.check();
		match self.current().get(..needle.len()) {
			Some(head) if head.eq_ignore_ascii_case(needle) => {
				self.seek(self.p + needle.len());
				true
			},
			_ => false,
		}
	}

	/// Skip a run of whitespace, returns its length.
	pub fn adv_past_whitespace(&mut self) -> usize {
		self.check();
		let n = WHITESPACE.span(self.current());
		self.seek(self.p + n);
		n
	}

	/**
	Move the cursor to the next occurrence of `c`.

	Returns how many bytes were skipped to get there, or `None` if there's no `c`
	in the rest of the view, in which case the cursor stays where it was.
	*/
	pub fn adv_to_chr(&mut self, c: u8) -> Option<usize> {
		self.check();
		let off = memchr(c, self.current())?;
		self.seek(self.p + off);
		Some(off)
	}

	/// Like [`adv_to_chr()`](#method.adv_to_chr), for a character of any length in UTF-8.
	pub fn adv_to_chr_utf8(&mut self, c: char) -> Option<usize> {
		let mut buf = [0u8; 4];
		self.adv_to_str(c.encode_utf8(&mut buf).as_bytes())
	}

	/// Like [`adv_to_chr()`](#method.adv_to_chr), for a substring.
	pub fn adv_to_str(&mut self, needle: &[u8]) -> Option<usize> {
		self.check();
		let off = memmem::find(self.current(), needle)?;
		self.seek(self.p + off);
		Some(off)
	}

	/// Step over the byte at the cursor if it is `c`.
	pub fn next_if_char(&mut self, c: u8) -> bool {
		self.check();
		match self.current().first() {
			Some(&b) if b == c => {
				self.seek(self.p + 1);
				true
			},
			_ => false,
		}
	}

	/// Step over the byte at the cursor unless it is `c`.
	pub fn next_unless_char(&mut self, c: u8) -> bool {
		self.check();
		match self.current().first() {
			Some(&b) if b != c => {
				self.seek(self.p + 1);
				true
			},
			_ => false,
		}
	}
}
