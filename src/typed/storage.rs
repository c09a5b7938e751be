use std::cell::RefCell;
use std::rc::Rc;

use crate::typed::Opaque;

/// Shared backing byte buffer, handed out to raw-buffer views and [`StorageRef`].
pub type SharedBytes = Rc<RefCell<Vec<u8>>>;

/// One backing allocation.
///
/// Always owns a byte buffer; when the type tree rooted here is opaque it
/// additionally owns a parallel slot vector of the same length. Reference
/// scalars have size and alignment 1, so byte offsets double as slot indices.
#[derive(Debug)]
pub struct Storage {
	buffer: SharedBytes,
	slots: Option<RefCell<Vec<Opaque>>>,
}

impl Storage {
	/// Allocate `byte_len` zeroed bytes, with parallel empty slots when `opaque`.
	pub fn alloc(byte_len: usize, opaque: bool) -> Rc<Self> {
		let slots = opaque.then(|| RefCell::new(vec![Opaque::null(); byte_len]));
		Rc::new(Self {
			buffer: Rc::new(RefCell::new(vec![0_u8; byte_len])),
			slots,
		})
	}

	/// Wrap caller-owned bytes as non-opaque storage, sharing the buffer.
	pub fn over(buffer: SharedBytes) -> Rc<Self> {
		Rc::new(Self { buffer, slots: None })
	}

	/// Whether this allocation carries opaque slots.
	pub fn is_opaque(&self) -> bool {
		self.slots.is_some()
	}

	/// Current length of the byte buffer.
	pub fn byte_len(&self) -> usize {
		self.buffer.borrow().len()
	}

	/// Shared handle to the byte buffer.
	pub fn buffer(&self) -> SharedBytes {
		Rc::clone(&self.buffer)
	}

	pub(crate) fn read_slot(&self, index: usize) -> Opaque {
		match &self.slots {
			Some(slots) => slots.borrow()[index].clone(),
			None => Opaque::null(),
		}
	}

	pub(crate) fn write_slot(&self, index: usize, value: Opaque) {
		if let Some(slots) = &self.slots {
			slots.borrow_mut()[index] = value;
		}
	}

	pub(crate) fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
		f(&self.buffer.borrow())
	}

	pub(crate) fn with_bytes_mut<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> R {
		f(&mut self.buffer.borrow_mut())
	}
}

/// External byte-region descriptor for a non-opaque instance.
#[derive(Debug, Clone)]
pub struct StorageRef {
	/// Shared backing buffer.
	pub buffer: SharedBytes,
	/// First byte of the instance region.
	pub byte_offset: usize,
	/// Region length in bytes.
	pub byte_length: usize,
}
