/**
Character class as a 256-entry lookup table

Used both as an allow-list
([`out_bstrncpy_allowed()`](struct.Sbuff.html#method.out_bstrncpy_allowed))
and as a stop-list
([`out_bstrncpy_until()`](struct.Sbuff.html#method.out_bstrncpy_until)).

```
use sbuff::CharSet;

const HEX: CharSet = CharSet::new(b"0123456789abcdefABCDEF");
assert!(HEX.contains(b'e'));
assert!(!HEX.contains(b'g'));
assert_eq!(HEX.span(b"c0ffee!"), 6);
```
*/
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CharSet([bool; 256]);

impl CharSet {
	pub const fn new(bytes: &[u8]) -> Self {
		let mut set = [false; 256];
		let mut i = 0;
		while i < bytes.len() {
			set[bytes[i] as usize] = true;
			i += 1;
		}
		CharSet(set)
	}

	/// Class holding every byte from `from` to `to`, inclusive
	pub const fn range(from: u8, to: u8) -> Self {
		let mut set = [false; 256];
		let mut i = from as usize;
		while i <= to as usize {
			set[i] = true;
			i += 1;
		}
		CharSet(set)
	}

	#[inline]
	pub const fn contains(&self, b: u8) -> bool {
		self.0[b as usize]
	}

	/// Length of the leading run of `bytes` that belongs to this class
	pub fn span(&self, bytes: &[u8]) -> usize {
		bytes.iter()
			.take_while(|&&b| self.contains(b))
			.count()
	}

	/// Length of the leading run of `bytes` that does *not* belong to this class
	pub fn cspan(&self, bytes: &[u8]) -> usize {
		bytes.iter()
			.take_while(|&&b| !self.contains(b))
			.count()
	}
}

impl std::fmt::Debug for CharSet {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_set()
			.entries((0..=255u8).filter(|&b| self.contains(b)).map(std::ascii::escape_default).map(|e| e.to_string()))
			.finish()
	}
}

pub const DIGITS: CharSet = CharSet::range(b'0', b'9');

/// Whatever `isspace()` accepts in the C locale
pub const WHITESPACE: CharSet = CharSet::new(b" \t\n\x0b\x0c\r");

/// Bytes that may appear in a decimal floating point literal
pub const FLOAT: CharSet = CharSet::new(b"0123456789-+eE.");
