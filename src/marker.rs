/// Bookmark into a view, see [`Sbuff::mark()`](struct.Sbuff.html#method.mark)
///
/// A handle is only meaningful to the view that issued it.
/// Once released, its slot may be reused, but the old handle keeps resolving to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Marker {
	slot: u32,
	gen: u32,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
	gen: u32,
	pos: Option<usize>,
}

/// Markers attached to a single view
#[derive(Debug, Default)]
pub(crate) struct Markers {
	slots: Vec<Slot>,
	free: Vec<u32>,
}

impl Markers {
	pub(crate) fn insert(&mut self, pos: usize) -> Marker {
		match self.free.pop() {
			Some(slot) => {
				let s = &mut self.slots[slot as usize];
				s.pos = Some(pos);
				Marker { slot, gen: s.gen }
			},
			None => {
				let slot = self.slots.len() as u32;
				self.slots.push(Slot { gen: 0, pos: Some(pos) });
				Marker { slot, gen: 0 }
			},
		}
	}

	fn slot(&self, m: Marker) -> Option<&Slot> {
		self.slots.get(m.slot as usize)
			.filter(|s| s.gen == m.gen)
	}

	pub(crate) fn get(&self, m: Marker) -> Option<usize> {
		self.slot(m)?.pos
	}

	pub(crate) fn remove(&mut self, m: Marker) -> Option<usize> {
		let s = self.slots.get_mut(m.slot as usize)
			.filter(|s| s.gen == m.gen)?;
		let pos = s.pos.take()?;
		// invalidate outstanding copies of the handle
		s.gen = s.gen.wrapping_add(1);
		self.free.push(m.slot);
		Some(pos)
	}

	/// Positions of live markers
	pub(crate) fn iter(&self) -> impl Iterator<Item = usize> + '_ {
		self.slots.iter().filter_map(|s| s.pos)
	}

	pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut usize> + '_ {
		self.slots.iter_mut().filter_map(|s| s.pos.as_mut())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn insert_get_remove() {
		let mut ms = Markers::default();
		let a = ms.insert(3);
		let b = ms.insert(7);
		assert_eq!(ms.get(a), Some(3));
		assert_eq!(ms.get(b), Some(7));
		assert_eq!(ms.remove(a), Some(3));
		assert_eq!(ms.get(a), None);
		assert_eq!(ms.remove(a), None);
		assert_eq!(ms.iter().collect::<Vec<_>>(), vec![7]);
	}

	#[test]
	fn stale_handle_after_reuse() {
		let mut ms = Markers::default();
		let a = ms.insert(1);
		ms.remove(a);
		let b = ms.insert(5);
		// same slot, new generation
		assert_ne!(a, b);
		assert_eq!(ms.get(a), None);
		assert_eq!(ms.get(b), Some(5));
	}

	#[test]
	fn update_in_place() {
		let mut ms = Markers::default();
		let a = ms.insert(10);
		for p in ms.iter_mut() {
			*p -= 4;
		}
		assert_eq!(ms.get(a), Some(6));
	}
}
