use std::rc::Rc;

use crate::typed::{Result, SharedBytes, Storage, StorageRef, TypeDesc, TypeError, Value, View};

/// Layout shared by every instance of one array descriptor.
#[derive(Debug)]
struct Layout {
	element: TypeDesc,
	/// Element byte footprint, cached from the (always fixed-size) element type.
	elem_size: usize,
	/// Fixed element count, `None` for variable-length descriptors.
	length: Option<usize>,
	opaque: bool,
}

/// Sequence descriptor: homogeneous elements, fixed- or variable-length.
///
/// Fixed-length arrays have a build-time size and may nest inside structs or
/// other fixed arrays; variable-length arrays take their length per instance
/// and are only usable as a top-level type (their size is undefined, so every
/// nesting site rejects them).
#[derive(Debug, Clone)]
pub struct ArrayType {
	layout: Rc<Layout>,
}

impl ArrayType {
	/// Fixed-length sequence of `length` elements.
	pub fn new(element: TypeDesc, length: usize) -> Result<Self> {
		Self::build(element, Some(length))
	}

	/// Variable-length sequence; the length is supplied per instance.
	pub fn variable(element: TypeDesc) -> Result<Self> {
		Self::build(element, None)
	}

	fn build(element: TypeDesc, length: Option<usize>) -> Result<Self> {
		let Some(elem_size) = element.size() else {
			return Err(TypeError::VariableLengthElement);
		};
		Ok(Self {
			layout: Rc::new(Layout {
				opaque: element.is_opaque(),
				element,
				elem_size,
				length,
			}),
		})
	}

	/// Identity of the shared layout, used as the view-deduplication key.
	pub(crate) fn layout_id(&self) -> usize {
		Rc::as_ptr(&self.layout) as usize
	}

	/// Element descriptor.
	pub fn element_type(&self) -> &TypeDesc {
		&self.layout.element
	}

	/// Fixed element count, when declared at build time.
	pub fn length(&self) -> Option<usize> {
		self.layout.length
	}

	/// Whether the length is supplied per instance.
	pub fn is_variable(&self) -> bool {
		self.layout.length.is_none()
	}

	/// Whether elements require indexed, non-byte storage.
	pub fn is_opaque(&self) -> bool {
		self.layout.opaque
	}

	/// Byte footprint, absent for variable-length descriptors.
	pub fn size(&self) -> Option<usize> {
		self.layout.length.map(|length| length * self.layout.elem_size)
	}

	/// Element alignment in bytes.
	pub fn alignment(&self) -> usize {
		self.layout.element.alignment()
	}

	/// Byte footprint; absent for opaque or variable-length descriptors.
	pub fn byte_length(&self) -> Option<usize> {
		if self.layout.opaque { None } else { self.size() }
	}

	/// Element alignment; absent for opaque descriptors.
	pub fn byte_alignment(&self) -> Option<usize> {
		(!self.layout.opaque).then(|| self.alignment())
	}

	/// Fresh zero/default-initialized instance of a fixed-length descriptor.
	pub fn instance(&self) -> Result<ArrayInstance> {
		let Some(length) = self.layout.length else {
			return Err(TypeError::LengthRequired);
		};
		Ok(self.fresh(length))
	}

	/// Fresh zero/default-initialized instance of a variable-length descriptor.
	pub fn of_length(&self, length: usize) -> Result<ArrayInstance> {
		if let Some(fixed) = self.layout.length {
			return Err(TypeError::FixedLength { length: fixed });
		}
		Ok(self.fresh(length))
	}

	/// Fresh instance initialized positionally from `values`.
	///
	/// Fixed arrays copy `min(length, values.len())` elements and leave the
	/// rest at their defaults; variable arrays take their length from `values`.
	pub fn from_values(&self, values: &[Value]) -> Result<ArrayInstance> {
		let instance = match self.layout.length {
			Some(_) => self.instance()?,
			None => self.of_length(values.len())?,
		};
		instance.assign(values)?;
		Ok(instance)
	}

	/// Alias a caller byte buffer at `byte_offset`; fixed-length, non-opaque
	/// descriptors only.
	///
	/// The offset must be a multiple of the element size so elements tile the
	/// buffer from a representable boundary.
	pub fn view_over_bytes(&self, buffer: &SharedBytes, byte_offset: usize) -> Result<ArrayInstance> {
		let Some(length) = self.layout.length else {
			return Err(TypeError::LengthRequired);
		};
		if self.layout.opaque {
			return Err(TypeError::OpaqueOverBytes);
		}
		if self.layout.elem_size > 0 && byte_offset % self.layout.elem_size != 0 {
			return Err(TypeError::UnalignedByteOffset {
				byte_offset,
				element_size: self.layout.elem_size,
			});
		}
		let storage = Storage::over(Rc::clone(buffer));
		self.check_bounds(&storage, byte_offset, length)?;
		Ok(self.bind(&storage, byte_offset, length))
	}

	/// Alias an existing storage at `byte_offset` (nested-view construction
	/// path); opacity rules as for [`StructType::view_over_storage`].
	///
	/// [`StructType::view_over_storage`]: crate::typed::StructType::view_over_storage
	pub fn view_over_storage(&self, storage: &Rc<Storage>, byte_offset: usize) -> Result<ArrayInstance> {
		let Some(length) = self.layout.length else {
			return Err(TypeError::LengthRequired);
		};
		if self.layout.opaque && !storage.is_opaque() {
			return Err(TypeError::StorageOpacityMismatch);
		}
		self.check_bounds(storage, byte_offset, length)?;
		Ok(self.bind(storage, byte_offset, length))
	}

	/// External byte-region descriptor for a non-opaque instance of this type.
	pub fn storage(&self, instance: &ArrayInstance) -> Result<StorageRef> {
		instance.storage()
	}

	fn check_bounds(&self, storage: &Rc<Storage>, byte_offset: usize, length: usize) -> Result<()> {
		let have = storage.byte_len();
		let need = length * self.layout.elem_size;
		if byte_offset.checked_add(need).is_none_or(|end| end > have) {
			return Err(TypeError::BufferTooSmall { byte_offset, need, have });
		}
		Ok(())
	}

	fn fresh(&self, length: usize) -> ArrayInstance {
		let storage = Storage::alloc(length * self.layout.elem_size, self.layout.opaque);
		self.bind(&storage, 0, length)
	}

	fn bind(&self, storage: &Rc<Storage>, byte_offset: usize, length: usize) -> ArrayInstance {
		ArrayInstance {
			opaque: self.layout.opaque || storage.is_opaque(),
			view: View::bind(&self.layout.element, storage, byte_offset),
			ty: self.clone(),
			storage: Rc::clone(storage),
			byte_offset,
			length,
		}
	}
}

/// One materialized sequence bound to a storage region.
///
/// Clones share the same storage and are therefore aliases.
#[derive(Debug, Clone)]
pub struct ArrayInstance {
	ty: ArrayType,
	storage: Rc<Storage>,
	byte_offset: usize,
	length: usize,
	/// The single element view every accessor indexes into.
	view: View,
	/// Descriptor opacity OR storage opacity.
	opaque: bool,
}

impl ArrayInstance {
	/// Descriptor this instance was built from.
	pub fn ty(&self) -> &ArrayType {
		&self.ty
	}

	/// Element count of this instance.
	pub fn len(&self) -> usize {
		self.length
	}

	/// Whether the instance holds no elements.
	pub fn is_empty(&self) -> bool {
		self.length == 0
	}

	/// Whether this instance is byte-inaccessible.
	pub fn is_opaque(&self) -> bool {
		self.opaque
	}

	/// Read element `index`; composite elements alias this instance's storage.
	///
	/// Panics when `index` is out of range.
	pub fn get(&self, index: usize) -> Result<Value> {
		self.view.get_item(self.offset_units(index))
	}

	/// Write element `index`; composite sources are copied element-by-element.
	///
	/// Panics when `index` is out of range.
	pub fn set(&self, index: usize, value: Value) -> Result<()> {
		self.view.set_item(self.offset_units(index), &value)
	}

	/// Assign the first `min(len, values.len())` elements positionally.
	pub fn assign(&self, values: &[Value]) -> Result<()> {
		for (index, value) in values.iter().take(self.length).enumerate() {
			self.view.set_item(self.offset_units(index), value)?;
		}
		Ok(())
	}

	/// Region length in bytes; absent for opaque instances.
	pub fn byte_length(&self) -> Option<usize> {
		(!self.opaque).then_some(self.length * self.ty.layout.elem_size)
	}

	/// First byte of the region; absent for opaque instances.
	pub fn byte_offset(&self) -> Option<usize> {
		(!self.opaque).then_some(self.byte_offset)
	}

	/// External byte-region descriptor; opaque instances have none.
	pub fn storage(&self) -> Result<StorageRef> {
		if self.opaque {
			return Err(TypeError::OpaqueStorageAccess);
		}
		Ok(StorageRef {
			buffer: self.storage.buffer(),
			byte_offset: self.byte_offset,
			byte_length: self.length * self.ty.layout.elem_size,
		})
	}

	/// Copy `min(len, source.len)` elements from `source` into this instance.
	pub(crate) fn copy_from(&self, source: &ArrayInstance) -> Result<()> {
		for index in 0..self.length.min(source.length) {
			let value = source.get(index)?;
			self.set(index, value)?;
		}
		Ok(())
	}

	/// Item index of `index` inside the element view, in element-alignment
	/// units; exact because element size is a multiple of element alignment.
	fn offset_units(&self, index: usize) -> usize {
		assert!(index < self.length, "index {index} out of range for array of {}", self.length);
		index * self.ty.layout.elem_size / self.ty.layout.element.alignment()
	}
}
