/*!
Cursor-style views over a single contiguous byte region.

A view ([`Sbuff`](struct.Sbuff.html)) is a window `start..=end` into a buffer
with a movable cursor `p` somewhere in between:

```text
|  xxxxxyyyyyy    |
   |    |     |end
   |    |p
   |start
```

The buffer is either a caller-provided region (read-only or writable),
or a dynamic allocation that grows on demand when writes run out of room.
Views may be nested: a child starts at its parent's cursor and shares the same storage.
Growth, compaction ([`shift()`](struct.Sbuff.html#method.shift)) and trimming
keep every cursor and [`Marker`](struct.Marker.html) of the whole ancestor chain consistent.

All positions are offsets into the backing storage,
so reallocation never leaves anything dangling:
only `end` has to follow the new capacity.

```
use sbuff::Sbuff;

# fn foo() -> Result<(), sbuff::Error> {
let mut out = Sbuff::talloc(8, 64)?;
out.in_str("hello")?;
{
	// writes through the child move the parent's cursor as well
	let mut child = out.child();
	child.in_str(", world")?;
}
assert_eq!(out.used_bytes(), b"hello, world");
# Ok(())
# }
# foo().unwrap();
```
*/

use std::fmt;

mod buffer;
pub use buffer::{Storage, VecStorage};
use buffer::{Dynamic, Growth};

mod chars;
pub use chars::*;

mod error;
pub use error::*;

mod marker;
pub use marker::Marker;
use marker::Markers;

mod engine;
mod copy;

mod num;
pub use num::Number;

mod search;

mod print;
pub use print::{Escape, Quoted, Scratch};

enum Backing<'a> {
	Const(&'a [u8]),
	Fixed(&'a mut [u8]),
	Dynamic(Dynamic),
	Child(&'a mut dyn Tree),
}

/**
Operations that need the whole chain of views, from the one operated on up to the root.

Object-safe, so that a child can hold onto its parent
without having to spell out the parent's own lifetime.
*/
trait Tree {
	/// Whole backing storage
	fn data(&self) -> &[u8];
	/// Whole backing storage, `None` if it's read-only
	fn data_mut(&mut self) -> Option<&mut [u8]>;
	/// Growable storage of the root, if any
	fn dynamic(&mut self) -> Option<&mut Dynamic>;
	/// Reduce `max` so that no cursor or marker at or past `base` would be shifted below `base`
	fn shift_limit(&self, base: usize, max: usize) -> usize;
	/// Move every position at or past `base` down by `n`
	fn shift_down(&mut self, base: usize, n: usize);
	/// Furthest position any cursor or marker points at
	fn highest(&self) -> usize;
	/// Set `end` everywhere; returns `false` if something had to be clamped
	fn rebase(&mut self, end: usize) -> bool;
	/// Child's cursor moved to `p`
	fn follow(&mut self, p: usize);
}

/**
View over a byte region

See [crate documentation](index.html) for an overview.
*/
pub struct Sbuff<'a> {
	backing: Backing<'a>,
	// positions are offsets into the backing storage
	start: usize,
	p: usize,
	end: usize,
	// bytes discarded by shift() so far
	shifted: usize,
	is_const: bool,
	// cursor movements are mirrored to the parent
	adv_parent: bool,
	markers: Markers,
}

/**
Configuration of a dynamically-backed view

```
use sbuff::SbuffBuilder;

let sbuff = SbuffBuilder::new()
	.capacity(32)
	.max(50)
	.create()
	.unwrap();
assert_eq!(sbuff.remaining(), 32);
// content plus terminator
assert_eq!(sbuff.buffer_len(), 33);
```
*/
#[derive(Debug, Clone, Copy)]
pub struct SbuffBuilder {
	init: usize,
	max: Option<usize>,
}
impl SbuffBuilder {
	pub fn new() -> Self {
		SbuffBuilder {
			init: 8192,
			max: None,
		}
	}

	/// Content length to allocate up front, and to spring back to after being trimmed.
	pub fn capacity(mut self, init: usize) -> Self {
		self.init = init;
		self
	}

	/// Hard cap on content length. Unbounded unless set.
	pub fn max(mut self, max: usize) -> Self {
		self.max = Some(max);
		self
	}

	pub fn create(self) -> Result<Sbuff<'static>, Error> {
		self.create_in::<VecStorage>()
	}

	/// Same as [`create()`](#method.create), with a custom [`Storage`](trait.Storage.html).
	pub fn create_in<S: Storage + 'static>(self) -> Result<Sbuff<'static>, Error> {
		if let Some(max) = self.max {
			if self.init > max {
				panic!("initial capacity {} exceeds maximum {}", self.init, max)
			}
		}
		let len = self.init.checked_add(1)
			.ok_or(Error::Alloc { len: usize::MAX })?;
		let storage = S::alloc(len)?;
		let dynamic = Dynamic {
			storage: Box::new(storage),
			growth: Growth {
				init: self.init,
				max: self.max,
			},
		};
		Ok(Sbuff::root(Backing::Dynamic(dynamic), self.init, false))
	}
}
impl Default for SbuffBuilder {
	fn default() -> Self {
		SbuffBuilder::new()
	}
}

impl Sbuff<'static> {
	/// Dynamically-backed view with `init` bytes of room that may grow up to `max`.
	pub fn talloc(init: usize, max: usize) -> Result<Self, Error> {
		SbuffBuilder::new()
			.capacity(init)
			.max(max)
			.create()
	}
}

impl<'a> Sbuff<'a> {
	fn root(backing: Backing<'a>, end: usize, is_const: bool) -> Self {
		Sbuff {
			backing,
			start: 0, p: 0, end,
			shifted: 0,
			is_const,
			adv_parent: false,
			markers: Markers::default(),
		}
	}

	/// Read-only view over `buf`, for parsing.
	pub fn new_in(buf: &'a [u8]) -> Self {
		let end = buf.len();
		Self::root(Backing::Const(buf), end, true)
	}

	/**
	Writable view over `buf`, for printing.

	The last byte is reserved for the terminator.
	*/
	pub fn new_out(buf: &'a mut [u8]) -> Self {
		let end = buf.len().saturating_sub(1);
		if let Some(b) = buf.first_mut() {
			*b = 0;
		}
		Self::root(Backing::Fixed(buf), end, false)
	}
}

impl Sbuff<'_> {
	fn descend(&mut self, adv_parent: bool) -> Sbuff<'_> {
		let (p, end, is_const) = (self.p, self.end, self.is_const);
		Sbuff {
			backing: Backing::Child(self),
			start: p, p, end,
			shifted: 0,
			is_const,
			adv_parent,
			markers: Markers::default(),
		}
	}

	/**
	Child view starting at the current position.

	Moving the child's cursor moves this view's cursor along with it.
	Growth requested by the child is applied to the shared storage.
	*/
	pub fn child(&mut self) -> Sbuff<'_> {
		self.descend(true)
	}

	/// Child view starting at the current position whose cursor moves independently.
	pub fn no_advance(&mut self) -> Sbuff<'_> {
		self.descend(false)
	}

	// debug builds only
	#[inline]
	pub(crate) fn check(&self) {
		debug_assert!(
			self.start <= self.p && self.p <= self.end && self.end <= self.data().len(),
			"inconsistent view {:?}", self,
		);
	}

	/// Absolute offset of the cursor within the backing storage
	pub fn position(&self) -> usize {
		self.p
	}

	/// Bytes between the start of this view and the cursor
	pub fn used(&self) -> usize {
		self.p - self.start
	}

	/// Bytes between the cursor and the end of this view
	pub fn remaining(&self) -> usize {
		self.end - self.p
	}

	/// Total bytes discarded from the front by [`shift()`](#method.shift)
	pub fn shifted(&self) -> usize {
		self.shifted
	}

	/// Physical length of the backing storage, terminator included
	pub fn buffer_len(&self) -> usize {
		self.data().len()
	}

	pub fn is_const(&self) -> bool {
		self.is_const
	}

	/// `start..p`
	pub fn used_bytes(&self) -> &[u8] {
		&self.data()[ self.start .. self.p ]
	}

	/// `p..end`
	pub fn current(&self) -> &[u8] {
		&self.data()[ self.p .. self.end ]
	}

	// unchecked: callers guarantee start <= p <= end
	pub(crate) fn seek(&mut self, p: usize) {
		debug_assert!(self.start <= p && p <= self.end);
		self.p = p;
		if self.adv_parent {
			if let Backing::Child(parent) = &mut self.backing {
				parent.follow(p);
			}
		}
	}

	/// Move the cursor `n` bytes forward, returns `n`.
	pub fn advance(&mut self, n: usize) -> Result<usize, Error> {
		match self.p.checked_add(n) {
			Some(p) if p <= self.end => {
				self.seek(p);
				Ok(n)
			},
			_ => Err(Error::OutOfBounds {
				pos: self.p.saturating_add(n),
				start: self.start,
				end: self.end,
			}),
		}
	}

	/// Move the cursor to absolute offset `pos`, which must be within `start..=end`.
	pub fn set_position(&mut self, pos: usize) -> Result<(), Error> {
		if pos < self.start || pos > self.end {
			return Err(Error::OutOfBounds {
				pos,
				start: self.start,
				end: self.end,
			});
		}
		self.seek(pos);
		Ok(())
	}

	pub fn set_to_start(&mut self) {
		let start = self.start;
		self.seek(start);
	}

	pub fn set_to_end(&mut self) {
		let end = self.end;
		self.seek(end);
	}

	/// Attach a marker at the current position.
	pub fn mark(&mut self) -> Marker {
		self.markers.insert(self.p)
	}

	/// Absolute offset `m` points at, `None` if it's been released.
	pub fn marker(&self, m: Marker) -> Option<usize> {
		self.markers.get(m)
	}

	/// Offset of `m` relative to the start of this view
	pub fn marker_used(&self, m: Marker) -> Option<usize> {
		Some(self.markers.get(m)? - self.start)
	}

	/// Detach `m`, returning where it pointed.
	pub fn release(&mut self, m: Marker) -> Option<usize> {
		self.markers.remove(m)
	}

	/// Rewind (or fast-forward) the cursor to `m`.
	pub fn set_to_marker(&mut self, m: Marker) -> bool {
		match self.markers.get(m) {
			Some(pos) => {
				self.seek(pos);
				true
			},
			None => false,
		}
	}
}

impl Tree for Sbuff<'_> {
	fn data(&self) -> &[u8] {
		match &self.backing {
			Backing::Const(buf) => *buf,
			Backing::Fixed(buf) => &**buf,
			Backing::Dynamic(d) => d.storage.as_slice(),
			Backing::Child(parent) => parent.data(),
		}
	}

	fn data_mut(&mut self) -> Option<&mut [u8]> {
		match &mut self.backing {
			Backing::Const(_) => None,
			Backing::Fixed(buf) => Some(&mut **buf),
			Backing::Dynamic(d) => Some(d.storage.as_mut_slice()),
			Backing::Child(parent) => parent.data_mut(),
		}
	}

	fn dynamic(&mut self) -> Option<&mut Dynamic> {
		match &mut self.backing {
			Backing::Dynamic(d) => Some(d),
			Backing::Child(parent) => parent.dynamic(),
			_ => None,
		}
	}

	/*
	before shift by 3 (max is 3):
	|xxxyyyyy  |
	 |    |p
	 |base
	positions below base+max would end up pointing at different content,
	so max shrinks to p-base (5 here, no change);
	a marker sitting at base+1 would bring it down to 1
	*/
	fn shift_limit(&self, base: usize, max: usize) -> usize {
		let max = self.markers.iter()
			.chain(std::iter::once(self.p))
			.filter(|&pos| pos >= base)
			.fold(max, |max, pos| max.min(pos - base));
		match &self.backing {
			Backing::Child(parent) if max > 0 => parent.shift_limit(base, max),
			_ => max,
		}
	}

	fn shift_down(&mut self, base: usize, n: usize) {
		let down = |pos: usize| if pos < base {
			pos
		} else {
			pos.saturating_sub(n).max(base)
		};
		self.p = down(self.p);
		for m in self.markers.iter_mut() {
			*m = down(*m);
		}
		self.shifted += n;
		if let Backing::Child(parent) = &mut self.backing {
			parent.shift_down(base, n);
		}
	}

	fn highest(&self) -> usize {
		let own = self.markers.iter().fold(self.p, usize::max);
		match &self.backing {
			Backing::Child(parent) => own.max(parent.highest()),
			_ => own,
		}
	}

	fn rebase(&mut self, end: usize) -> bool {
		let mut ok = true;
		self.end = end;
		if self.start > end {
			self.start = end;
			ok = false;
		}
		if self.p > end {
			self.p = end;
			ok = false;
		}
		for m in self.markers.iter_mut() {
			if *m > end {
				*m = end;
				ok = false;
			}
		}
		if let Backing::Child(parent) = &mut self.backing {
			ok &= parent.rebase(end);
		}
		ok
	}

	fn follow(&mut self, p: usize) {
		self.p = p.min(self.end).max(self.start);
		if self.adv_parent {
			if let Backing::Child(parent) = &mut self.backing {
				parent.follow(self.p);
			}
		}
	}
}

impl fmt::Debug for Sbuff<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let kind = match &self.backing {
			Backing::Const(_) => "const",
			Backing::Fixed(_) => "fixed",
			Backing::Dynamic(_) => "dynamic",
			Backing::Child(_) => "child",
		};
		f.debug_struct("Sbuff")
			.field("kind", &kind)
			.field("start", &self.start)
			.field("p", &self.p)
			.field("end", &self.end)
			.field("shifted", &self.shifted)
			.field("is_const", &self.is_const)
			.finish()
	}
}
