use crate::Error;

/// `Vec`-backed [`Storage`](trait.Storage.html)
#[derive(Debug, Default)]
pub struct VecStorage {
	buf: Vec<u8>,
}
impl super::Storage for VecStorage {
	fn alloc(len: usize) -> Result<Self, Error> {
		let mut buf = Vec::new();
		buf.try_reserve_exact(len)
			.map_err(|_| Error::Alloc { len })?;
		buf.resize(len, 0);
		Ok(VecStorage { buf })
	}
	fn realloc(&mut self, len: usize) -> Result<(), Error> {
		if len > self.buf.len() {
			self.buf.try_reserve_exact(len - self.buf.len())
				.map_err(|_| Error::Alloc { len })?;
			self.buf.resize(len, 0);
		} else {
			self.buf.truncate(len);
			self.buf.shrink_to_fit();
		}
		Ok(())
	}
	fn as_slice(&self) -> &[u8] {
		&self.buf
	}
	fn as_mut_slice(&mut self) -> &mut [u8] {
		&mut self.buf
	}
	fn len(&self) -> usize {
		self.buf.len()
	}
}
