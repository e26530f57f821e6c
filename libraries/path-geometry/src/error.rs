use thiserror::Error;

/// Returned by [`geometry_to_paths`](crate::geometry_to_paths) for a shape that has no path mapping
/// and does not provide its own path encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported shape type {type_name}")]
pub struct UnsupportedGeometryError {
	/// Name of the offending variant or type.
	pub type_name: String,
}

impl UnsupportedGeometryError {
	pub fn new(type_name: impl Into<String>) -> Self {
		Self { type_name: type_name.into() }
	}
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
	#[error("A path needs one code per vertex, but {vertices} vertices were given with {codes} codes")]
	MismatchedLengths { vertices: usize, codes: usize },
}
