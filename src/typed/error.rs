use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, TypeError>;

/// Contract-violation errors raised while building descriptors and binding or accessing instances.
///
/// Every variant reports programmer misuse and is raised synchronously at the
/// point of violation; no partially constructed descriptor or instance is ever
/// returned alongside one.
#[derive(Debug, Error)]
pub enum TypeError {
	/// Struct field declared with a variable-length descriptor.
	#[error("field `{field}` is variable-length, struct fields must be fixed-size")]
	VariableLengthField {
		/// Offending field name.
		field: Box<str>,
	},
	/// Schema declares the same field name twice.
	#[error("field `{field}` declared more than once")]
	DuplicateField {
		/// Repeated field name.
		field: Box<str>,
	},
	/// Array element type is itself variable-length.
	#[error("array element type cannot be variable-length")]
	VariableLengthElement,
	/// Opaque descriptor aliased over a raw byte buffer.
	#[error("cannot alias an opaque type over raw bytes")]
	OpaqueOverBytes,
	/// Opaque descriptor bound to storage that has no opaque slots.
	#[error("storage/type opacity mismatch: opaque type over byte-only storage")]
	StorageOpacityMismatch,
	/// Byte-region descriptor requested from an opaque instance.
	#[error("opaque instance has no storage")]
	OpaqueStorageAccess,
	/// Field name not present in the schema.
	#[error("unknown field `{name}`")]
	UnknownField {
		/// Requested field name.
		name: Box<str>,
	},
	/// Raw-buffer array view placed at an offset that does not tile elements.
	#[error("byte offset {byte_offset} is not a multiple of element size {element_size}")]
	UnalignedByteOffset {
		/// Requested view offset.
		byte_offset: usize,
		/// Element byte footprint.
		element_size: usize,
	},
	/// Aliased region extends past the end of the backing buffer.
	#[error("view at offset {byte_offset} needs {need} bytes, buffer has {have}")]
	BufferTooSmall {
		/// Requested view offset.
		byte_offset: usize,
		/// Bytes required by the descriptor.
		need: usize,
		/// Bytes available in the buffer.
		have: usize,
	},
	/// Variable-length array constructed without an instance length.
	#[error("variable-length array requires an instance length")]
	LengthRequired,
	/// Instance length supplied to a fixed-length array.
	#[error("fixed-length array of {length} elements does not take an instance length")]
	FixedLength {
		/// Length declared at descriptor build time.
		length: usize,
	},
	/// Value payload does not match the target representation.
	#[error("expected {expected} value, got {got}")]
	ValueKindMismatch {
		/// Representation the target requires.
		expected: &'static str,
		/// Payload kind that was supplied.
		got: &'static str,
	},
}
