//! Public library API for typed-object layout descriptors and storage views.

/// Type descriptors, backing storage, views, and instance access.
pub mod typed;
