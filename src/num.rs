use crate::{CharSet, ParseError, Sbuff, DIGITS, FLOAT};

// large enough for any Number::MAX_CHARS plus terminator
const SCRATCH_LEN: usize = 128;

mod sealed {
	pub trait Sealed {}
}

/**
Types [`Sbuff::out_num()`](struct.Sbuff.html#method.out_num) can read

Implemented for all of `i8`..`i64`, `u8`..`u64`, `f32` and `f64`.
*/
pub trait Number: Copy + sealed::Sealed {
	/// Longest textual representation that's still worth looking at
	#[doc(hidden)]
	const MAX_CHARS: usize;
	/// Characters the candidate text is restricted to, `None` for no restriction
	#[doc(hidden)]
	const CHARS: Option<&'static CharSet>;
	/**
	Read the longest numeric prefix of `text`.

	Returns the value, how many bytes of `text` it took (`0` if there's no number at all),
	and whether the value had to be clamped to the range of the type.
	*/
	#[doc(hidden)]
	fn parse_prefix(text: &[u8]) -> (Self, usize, Option<ParseError>);
}

/*
[+-]digits, clamped to min..=max

magnitude is accumulated in i128, which can't overflow
with the digit counts MAX_CHARS allows, but is checked anyway
*/
fn parse_int(text: &[u8], min: i128, max: i128) -> (i128, usize, Option<ParseError>) {
	let (neg, sign) = match text.first() {
		Some(b'-') => (true, 1),
		Some(b'+') => (false, 1),
		_ => (false, 0),
	};
	let digits = DIGITS.span(&text[sign..]);
	if digits == 0 {
		return (0, 0, None);
	}
	let consumed = sign + digits;

	let magnitude = text[sign..consumed].iter()
		.try_fold(0i128, |acc, &d| acc.checked_mul(10)?.checked_add(i128::from(d - b'0')));
	let value = match magnitude {
		Some(m) if neg => -m,
		Some(m) => m,
		None if neg => return (min, consumed, Some(ParseError::Underflow)),
		None => return (max, consumed, Some(ParseError::Overflow)),
	};

	if value > max {
		(max, consumed, Some(ParseError::Overflow))
	} else if value < min {
		(min, consumed, Some(ParseError::Underflow))
	} else {
		(value, consumed, None)
	}
}

/*
Length of the longest prefix of `text` that reads as a decimal float:

	[+-] digits [. digits] [(e|E) [+-] digits]

with at least one digit before or after the point.
The exponent only counts if it has digits.
Second value tells if any mantissa digit is non-zero,
which is how underflow to 0 is told apart from an actual 0.
*/
fn float_len(text: &[u8]) -> (usize, bool) {
	let mut i = match text.first() {
		Some(b'-') | Some(b'+') => 1,
		_ => 0,
	};

	let int = DIGITS.span(&text[i..]);
	let mut nonzero = text[i..i + int].iter().any(|&b| b != b'0');
	i += int;

	let mut frac = 0;
	if text.get(i) == Some(&b'.') {
		frac = DIGITS.span(&text[i + 1..]);
		nonzero |= text[i + 1..i + 1 + frac].iter().any(|&b| b != b'0');
		i += 1 + frac;
	}
	if int + frac == 0 {
		return (0, false);
	}

	if let Some(b'e') | Some(b'E') = text.get(i) {
		let mut j = i + 1;
		if let Some(b'-') | Some(b'+') = text.get(j) {
			j += 1;
		}
		let exp = DIGITS.span(&text[j..]);
		if exp > 0 {
			i = j + exp;
		}
	}

	(i, nonzero)
}

macro_rules! int_number {
	($($ty:ident => $max_chars:expr),*) => {$(
		impl sealed::Sealed for $ty {}
		impl Number for $ty {
			const MAX_CHARS: usize = $max_chars;
			const CHARS: Option<&'static CharSet> = None;
			fn parse_prefix(text: &[u8]) -> (Self, usize, Option<ParseError>) {
				let (value, consumed, err) = parse_int(text, <$ty>::MIN.into(), <$ty>::MAX.into());
				// always within MIN..=MAX
				(value as $ty, consumed, err)
			}
		}
	)*}
}

// sign included
int_number!(
	i8 => 4, i16 => 6, i32 => 11, i64 => 20,
	u8 => 4, u16 => 6, u32 => 11, u64 => 21
);

macro_rules! float_number {
	($($ty:ident),*) => {$(
		impl sealed::Sealed for $ty {}
		impl Number for $ty {
			const MAX_CHARS: usize = 100;
			const CHARS: Option<&'static CharSet> = Some(&FLOAT);
			fn parse_prefix(text: &[u8]) -> (Self, usize, Option<ParseError>) {
				let (len, nonzero) = float_len(text);
				if len == 0 {
					return (0.0, 0, None);
				}
				// float_len only ever accepts ASCII
				let value: $ty = match std::str::from_utf8(&text[..len]).ok().and_then(|s| s.parse().ok()) {
					Some(value) => value,
					None => return (0.0, 0, None),
				};
				if value.is_infinite() {
					(value.signum() * <$ty>::MAX, len, Some(ParseError::Overflow))
				} else if value == 0.0 && nonzero {
					(value, len, Some(ParseError::Underflow))
				} else {
					(value, len, None)
				}
			}
		}
	)*}
}

float_number!(f32, f64);

impl Sbuff<'_> {
	/**
	Read a number at the cursor, returns how many bytes it took.

	Candidate characters are copied out without moving the cursor, parsed,
	and only then is the cursor advanced by exactly what the parser consumed.

	On overflow or underflow `out` is set to the closest value the type can hold,
	and the cursor stays put.
	With `no_trailing`, anything following the number within the candidate characters
	is an error as well; `out` still gets the value.

	```
	use sbuff::{ParseError, Sbuff};

	let mut sbuff = Sbuff::new_in(b"128,-1.5e3");
	let mut byte = 0i8;
	assert_eq!(sbuff.out_num(&mut byte, false), Err(ParseError::Overflow));
	assert_eq!(byte, 127);
	assert_eq!(sbuff.position(), 0);

	let mut word = 0u16;
	assert_eq!(sbuff.out_num(&mut word, false), Ok(3));
	assert_eq!(word, 128);

	assert!(sbuff.next_if_char(b','));
	let mut float = 0f64;
	assert_eq!(sbuff.out_num(&mut float, true), Ok(6));
	assert_eq!(float, -1500.0);
	```
	*/
	pub fn out_num<T: Number>(&mut self, out: &mut T, no_trailing: bool) -> Result<usize, ParseError> {
		self.check();
		let mut buf = [0u8; SCRATCH_LEN];
		let scratch = &mut buf[..T::MAX_CHARS + 1];

		let len = {
			let mut our_in = self.no_advance();
			match T::CHARS {
				Some(chars) => our_in.out_bstrncpy_allowed(scratch, usize::MAX, chars),
				None => our_in.out_bstrncpy(scratch, T::MAX_CHARS),
			}
		};
		if len == 0 {
			return Err(ParseError::NotFound);
		}
		// more number characters than we're willing to look at
		if let Some(chars) = T::CHARS {
			if self.current().get(len).map_or(false, |&b| chars.contains(b)) {
				return Err(ParseError::Trailing);
			}
		}

		let (value, consumed, range) = T::parse_prefix(&scratch[..len]);
		if consumed == 0 {
			return Err(ParseError::Trailing);
		}
		*out = value;
		if let Some(err) = range {
			return Err(err);
		}
		if no_trailing && consumed < len {
			return Err(ParseError::Trailing);
		}

		self.seek(self.p + consumed);
		Ok(consumed)
	}
}
