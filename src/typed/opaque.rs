use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Shared handle to an arbitrary host value held in an opaque storage slot.
///
/// Slots have reference semantics: cloning shares the referent, and a value
/// read back from a slot is the same referent that was written. A
/// default-constructed slot holds no value.
#[derive(Clone, Default)]
pub struct Opaque(Option<Rc<dyn Any>>);

impl Opaque {
	/// Wrap a host value.
	pub fn new<T: Any>(value: T) -> Self {
		Self(Some(Rc::new(value)))
	}

	/// The empty slot value.
	pub fn null() -> Self {
		Self(None)
	}

	/// Whether this handle holds no value.
	pub fn is_null(&self) -> bool {
		self.0.is_none()
	}

	/// Borrow the referent as `T` when the stored type matches.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.0.as_deref().and_then(|any| any.downcast_ref::<T>())
	}

	/// Whether both handles refer to the same stored value.
	///
	/// Two null handles compare equal; a null and a non-null never do.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		match (&self.0, &other.0) {
			(Some(a), Some(b)) => Rc::ptr_eq(a, b),
			(None, None) => true,
			_ => false,
		}
	}
}

impl fmt::Debug for Opaque {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_null() {
			f.write_str("Opaque(null)")
		} else {
			f.write_str("Opaque(..)")
		}
	}
}
