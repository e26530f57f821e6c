//! Conversion between flat renderer paths and structured planar geometry.
//!
//! [`geometry_to_paths`] flattens points, line strings, polygons and their collections into [`Path`]s made of vertices tagged
//! with [`PathCode`]s. [`path_to_geometries`] goes the other way, recovering rings, holes and open lines from nothing more
//! than the [`PathCode::MoveTo`] that starts each subpath.

pub mod cleanup;
pub mod error;
pub mod geometry_to_path;
pub mod path;
pub mod path_to_geometry;
pub mod shape;

pub use cleanup::{CleanedPath, CleanupOptions, cleanup_path};
pub use error::{PathError, UnsupportedGeometryError};
pub use geometry_to_path::geometry_to_paths;
pub use path::{Path, PathCode};
pub use path_to_geometry::{ReconstructOptions, path_to_geometries, path_to_geometries_with};
pub use shape::{ForeignShape, Shape};

// Re-export dependencies that users of this crate will need
pub use geo;
pub use glam;
pub use kurbo;
