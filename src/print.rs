/*!
Writing into a view.

Every write either lands in full or leaves the content alone:
if the view can't be grown to fit, the write fails with
[`Error::NoSpace`](enum.Error.html#variant.NoSpace) telling how many bytes were missing.
Content written is followed by a `\0` that is not counted as part of it.
*/

use std::fmt;

use tracing::trace;

use crate::{Error, Sbuff, Tree};

/**
Reusable area for rendering format strings before they're copied into a view

One per caller (or per thread, or per whatever owns the views being written to).
Keeping it around saves an allocation per
[`in_sprintf()`](struct.Sbuff.html#method.in_sprintf).
*/
#[derive(Debug)]
pub struct Scratch {
	buf: String,
}
impl Scratch {
	pub fn new() -> Self {
		Scratch {
			buf: String::with_capacity(4096),
		}
	}

	/// Render `args`, returning the result, valid until the next call.
	pub fn render(&mut self, args: fmt::Arguments<'_>) -> Result<&[u8], Error> {
		self.buf.clear();
		fmt::write(&mut self.buf, args).map_err(|_| Error::Format)?;
		Ok(self.buf.as_bytes())
	}
}
impl Default for Scratch {
	fn default() -> Self {
		Scratch::new()
	}
}

/**
Quoting and escaping of strings being written into a view

`escaped_len()` must report exactly as much as `escape()` is going to produce for the same input,
as that's how much room is set aside beforehand.
*/
pub trait Escape {
	/// Length of `input` once escaped
	fn escaped_len(&self, input: &[u8], quote: Option<u8>) -> usize;
	/// Write escaped `input` into `out`, returns bytes written.
	/// Stops short rather than leave a partial escape sequence in `out`.
	fn escape(&self, out: &mut [u8], input: &[u8], quote: Option<u8>) -> usize;
}

/**
C-style escaping for quoted strings

With a quote character, escapes that character, backslash, `\r`, `\n`, `\t`,
and writes the rest of control characters as `\ooo` octal.
Everything else, including non-ASCII bytes, is copied as is.
Without a quote character nothing is escaped at all.

```
use sbuff::{Escape, Quoted};

let mut out = [0u8; 16];
let n = Quoted.escape(&mut out, b"a\"b\x01", Some(b'"'));
assert_eq!(&out[..n], b"a\\\"b\\001");
```
*/
#[derive(Debug, Clone, Copy, Default)]
pub struct Quoted;

impl Quoted {
	fn sequence(b: u8, quote: u8) -> ([u8; 4], usize) {
		match b {
			b'\\' => ([b'\\', b'\\', 0, 0], 2),
			_ if b == quote => ([b'\\', b, 0, 0], 2),
			b'\r' => ([b'\\', b'r', 0, 0], 2),
			b'\n' => ([b'\\', b'n', 0, 0], 2),
			b'\t' => ([b'\\', b't', 0, 0], 2),
			0..=0x1f | 0x7f => ([b'\\', b'0' + (b >> 6), b'0' + ((b >> 3) & 7), b'0' + (b & 7)], 4),
			_ => ([b, 0, 0, 0], 1),
		}
	}
}

impl Escape for Quoted {
	fn escaped_len(&self, input: &[u8], quote: Option<u8>) -> usize {
		match quote {
			None => input.len(),
			Some(quote) => input.iter()
				.map(|&b| Quoted::sequence(b, quote).1)
				.sum(),
		}
	}

	fn escape(&self, out: &mut [u8], input: &[u8], quote: Option<u8>) -> usize {
		let quote = match quote {
			None => {
				let len = input.len().min(out.len());
				out[..len].copy_from_slice(&input[..len]);
				return len;
			},
			Some(quote) => quote,
		};
		let mut written = 0;
		for &b in input {
			let (seq, len) = Quoted::sequence(b, quote);
			if written + len > out.len() {
				break;
			}
			out[written..written + len].copy_from_slice(&seq[..len]);
			written += len;
		}
		written
	}
}

impl Sbuff<'_> {
	/// Make sure `len` bytes fit after the cursor, growing the buffer if it has to.
	pub(crate) fn extend_or_return(&mut self, len: usize) -> Result<(), Error> {
		if self.is_const {
			return Err(Error::ReadOnly);
		}
		let remaining = self.remaining();
		if len <= remaining {
			return Ok(());
		}
		match self.extend(len - remaining) {
			// pointers that were clamped don't matter for the space gained
			Ok(_) | Err(Error::Clamped { .. }) => (),
			Err(e) => trace!(len, remaining, "not extending buffer: {}", e),
		}
		let remaining = self.remaining();
		if len > remaining {
			return Err(Error::NoSpace { needed: len - remaining });
		}
		Ok(())
	}

	// terminate at p if there's room for it
	fn terminate(&mut self) {
		let p = self.p;
		if let Some(b) = self.data_mut().and_then(|data| data.get_mut(p)) {
			*b = 0;
		}
	}

	/// Append `bytes`, returns how many were written.
	pub fn in_bytes(&mut self, bytes: &[u8]) -> Result<usize, Error> {
		self.check();
		let len = bytes.len();
		self.extend_or_return(len)?;
		let p = self.p;
		let data = self.data_mut().ok_or(Error::ReadOnly)?;
		data[p..p + len].copy_from_slice(bytes);
		self.seek(p + len);
		self.terminate();
		Ok(len)
	}

	pub fn in_str(&mut self, s: &str) -> Result<usize, Error> {
		self.in_bytes(s.as_bytes())
	}

	/// Append at most `len` bytes of `bytes`.
	pub fn in_bstrncpy(&mut self, bytes: &[u8], len: usize) -> Result<usize, Error> {
		let len = len.min(bytes.len());
		self.in_bytes(&bytes[..len])
	}

	/**
	Append formatted text, rendered in `scratch` first.

	```
	use sbuff::{Sbuff, Scratch};

	let mut scratch = Scratch::new();
	let mut sbuff = Sbuff::talloc(4, 64).unwrap();
	assert_eq!(sbuff.in_sprintf(&mut scratch, format_args!("{}-{:04}", "id", 7)), Ok(7));
	assert_eq!(sbuff.used_bytes(), b"id-0007");
	```
	*/
	pub fn in_sprintf(&mut self, scratch: &mut Scratch, args: fmt::Arguments<'_>) -> Result<usize, Error> {
		self.check();
		let rendered = scratch.render(args)?;
		self.in_bytes(rendered)
	}

	/// Append `input` escaped with [`Quoted`](struct.Quoted.html).
	pub fn in_escaped(&mut self, input: &[u8], quote: Option<u8>) -> Result<usize, Error> {
		self.in_escaped_with(&Quoted, input, quote)
	}

	/// Append `input` escaped with a custom [`Escape`](trait.Escape.html) implementation.
	pub fn in_escaped_with<E: Escape + ?Sized>(&mut self, escaper: &E, input: &[u8], quote: Option<u8>) -> Result<usize, Error> {
		self.check();
		let len = escaper.escaped_len(input, quote);
		self.extend_or_return(len)?;
		let p = self.p;
		let data = self.data_mut().ok_or(Error::ReadOnly)?;
		let written = escaper.escape(&mut data[p..p + len], input, quote).min(len);
		self.seek(p + written);
		self.terminate();
		Ok(written)
	}
}

/**
Allows `write!()` into a view

```
use std::fmt::Write;
use sbuff::Sbuff;

let mut buf = [0u8; 8];
let mut sbuff = Sbuff::new_out(&mut buf);
write!(sbuff, "{}+{}", 1, 2).unwrap();
assert_eq!(sbuff.used_bytes(), b"1+2");
assert!(write!(sbuff, "{}", "overflow").is_err());
```
*/
impl fmt::Write for Sbuff<'_> {
	fn write_str(&mut self, s: &str) -> fmt::Result {
		self.in_str(s)
			.map(|_| ())
			.map_err(|_| fmt::Error)
	}
}

#[cfg(test)]
mod tests {
	use crate::*;

	#[test]
	fn fixed() {
		let mut buf = [0xffu8; 8];
		{
			let mut sbuff = Sbuff::new_out(&mut buf);
			assert_eq!(sbuff.in_str("abc"), Ok(3));
			assert_eq!(sbuff.in_str("defg"), Ok(4));
			assert_eq!(sbuff.in_str("h"), Err(Error::NoSpace { needed: 1 }));
			assert_eq!(sbuff.used_bytes(), b"abcdefg");
		}
		assert_eq!(&buf, b"abcdefg\0");
	}

	#[test]
	fn fixed_short() {
		let mut buf = [0xffu8; 4];
		let mut sbuff = Sbuff::new_out(&mut buf);
		assert_eq!(sbuff.in_str("hello"), Err(Error::NoSpace { needed: 2 }));
		assert_eq!(sbuff.used(), 0);
		assert_eq!(sbuff.current(), b"\0\xff\xff");
	}

	#[test]
	fn read_only() {
		let mut sbuff = Sbuff::new_in(b"abc");
		assert_eq!(sbuff.in_str("x"), Err(Error::ReadOnly));
		assert_eq!(sbuff.child().in_bytes(b"x"), Err(Error::ReadOnly));
		assert_eq!(sbuff.in_escaped(b"x", None), Err(Error::ReadOnly));
	}

	#[test]
	fn bstrncpy() {
		let mut sbuff = Sbuff::talloc(8, 8).unwrap();
		assert_eq!(sbuff.in_bstrncpy(b"abcdef", 2), Ok(2));
		assert_eq!(sbuff.in_bstrncpy(b"xyz", usize::MAX), Ok(3));
		assert_eq!(sbuff.used_bytes(), b"abxyz");
		assert_eq!(sbuff.in_bstrncpy(b"0123", 4), Err(Error::NoSpace { needed: 1 }));
		assert_eq!(sbuff.used_bytes(), b"abxyz");
	}

	#[test]
	fn grows() {
		let mut sbuff = SbuffBuilder::new().capacity(2).create().unwrap();
		let text = "a somewhat longer line of text";
		assert_eq!(sbuff.in_str(text), Ok(text.len()));
		assert_eq!(sbuff.used_bytes(), text.as_bytes());
		assert_eq!(sbuff.remaining(), 0);
	}

	#[test]
	fn child_writes() {
		let mut sbuff = Sbuff::talloc(0, 32).unwrap();
		sbuff.in_str("key=").unwrap();
		{
			let mut child = sbuff.child();
			child.in_str("value").unwrap();
			assert_eq!(child.used_bytes(), b"value");
		}
		{
			// written, but not accounted for in the parent
			let mut child = sbuff.no_advance();
			child.in_str(";junk").unwrap();
		}
		assert_eq!(sbuff.used_bytes(), b"key=value");
		assert_eq!(sbuff.current()[0], b';');
	}

	#[test]
	fn sprintf() {
		let mut scratch = Scratch::default();
		let mut buf = [0u8; 16];
		let mut sbuff = Sbuff::new_out(&mut buf);
		assert_eq!(sbuff.in_sprintf(&mut scratch, format_args!("{:>4}|", 42)), Ok(5));
		assert_eq!(sbuff.in_sprintf(&mut scratch, format_args!("{:x}", 255u8)), Ok(2));
		assert_eq!(sbuff.used_bytes(), b"  42|ff");
		assert_eq!(
			sbuff.in_sprintf(&mut scratch, format_args!("{}", "0123456789")),
			Err(Error::NoSpace { needed: 2 }),
		);
		assert_eq!(sbuff.used_bytes(), b"  42|ff");
	}

	#[test]
	fn escaped() {
		let mut sbuff = Sbuff::talloc(4, 64).unwrap();
		assert_eq!(sbuff.in_escaped(b"say \"hi\"\n", Some(b'"')), Ok(12));
		assert_eq!(sbuff.used_bytes(), b"say \\\"hi\\\"\\n");

		let mut sbuff = Sbuff::talloc(4, 64).unwrap();
		assert_eq!(sbuff.in_escaped(b"\x01\x7f\\\t\r", Some(b'\'')), Ok(14));
		assert_eq!(sbuff.used_bytes(), b"\\001\\177\\\\\\t\\r");

		// other quote character is left alone
		let mut sbuff = Sbuff::talloc(4, 64).unwrap();
		assert_eq!(sbuff.in_escaped(b"it's \"x\"", Some(b'\'')), Ok(9));
		assert_eq!(sbuff.used_bytes(), b"it\\'s \"x\"");

		// no quoting, no escaping
		let mut sbuff = Sbuff::talloc(4, 64).unwrap();
		assert_eq!(sbuff.in_escaped(b"a\"b\n", None), Ok(4));
		assert_eq!(sbuff.used_bytes(), b"a\"b\n");

		// UTF-8 passes through
		let mut sbuff = Sbuff::talloc(4, 64).unwrap();
		assert_eq!(sbuff.in_escaped("né".as_bytes(), Some(b'"')), Ok(3));
	}

	#[test]
	fn escaped_no_space() {
		let mut buf = [0u8; 5];
		let mut sbuff = Sbuff::new_out(&mut buf);
		assert_eq!(sbuff.in_escaped(b"\n\n\n", Some(b'"')), Err(Error::NoSpace { needed: 2 }));
		assert_eq!(sbuff.in_escaped(b"\n\n", Some(b'"')), Ok(4));
		assert_eq!(sbuff.used_bytes(), b"\\n\\n");
	}

	struct Upper;
	impl Escape for Upper {
		fn escaped_len(&self, input: &[u8], _quote: Option<u8>) -> usize {
			input.len()
		}
		fn escape(&self, out: &mut [u8], input: &[u8], _quote: Option<u8>) -> usize {
			for (o, i) in out.iter_mut().zip(input) {
				*o = i.to_ascii_uppercase();
			}
			input.len().min(out.len())
		}
	}

	#[test]
	fn custom_escape() {
		let mut sbuff = Sbuff::talloc(8, 8).unwrap();
		assert_eq!(sbuff.in_escaped_with(&Upper, b"abc", None), Ok(3));
		let escaper: &dyn Escape = &Quoted;
		assert_eq!(sbuff.in_escaped_with(escaper, b"\"", Some(b'"')), Ok(2));
		assert_eq!(sbuff.used_bytes(), b"ABC\\\"");
	}

	#[test]
	fn fmt_write() {
		use std::fmt::Write;

		let mut sbuff = Sbuff::talloc(0, 16).unwrap();
		write!(sbuff, "{}:{}", "port", 8080).unwrap();
		assert_eq!(sbuff.used_bytes(), b"port:8080");
		assert!(write!(sbuff, "{}", "much too long").is_err());
		assert_eq!(sbuff.used_bytes(), b"port:8080");
	}
}
