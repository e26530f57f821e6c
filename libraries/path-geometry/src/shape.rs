use crate::path::Path;
use geo::{Coord, Geometry};
use glam::DVec2;
use std::fmt::Debug;

/// A value from outside the geometry model that can be handed to [`geometry_to_paths`](crate::geometry_to_paths).
///
/// Only consulted when the input is not one of the known [`Geometry`] variants.
pub trait ForeignShape: Debug + Send + Sync {
	/// Name used to report the value when it cannot be converted.
	fn type_name(&self) -> &str {
		std::any::type_name::<Self>()
	}

	/// The value's own path encoding, if it has one.
	fn to_path(&self) -> Option<Path> {
		None
	}
}

impl ForeignShape for Coord<f64> {
	fn type_name(&self) -> &str {
		"Coord"
	}
}

impl ForeignShape for DVec2 {
	fn type_name(&self) -> &str {
		"DVec2"
	}
}

impl ForeignShape for (f64, f64) {
	fn type_name(&self) -> &str {
		"(f64, f64)"
	}
}

impl ForeignShape for Path {
	fn to_path(&self) -> Option<Path> {
		Some(self.clone())
	}
}

/// Input accepted by the forward converter.
#[derive(Debug)]
pub enum Shape {
	Geometry(Geometry<f64>),
	/// Converted element by element, with the results concatenated in order.
	Sequence(Vec<Shape>),
	Foreign(Box<dyn ForeignShape>),
}

impl Shape {
	pub fn foreign(value: impl ForeignShape + 'static) -> Self {
		Self::Foreign(Box::new(value))
	}
}

impl From<Geometry<f64>> for Shape {
	fn from(geometry: Geometry<f64>) -> Self {
		Self::Geometry(geometry)
	}
}

macro_rules! impl_from_geometry {
	($($variant:ident),* $(,)?) => {
		$(
			impl From<geo::$variant<f64>> for Shape {
				fn from(value: geo::$variant<f64>) -> Self {
					Self::Geometry(Geometry::$variant(value))
				}
			}
		)*
	};
}

impl_from_geometry!(Point, Line, LineString, Polygon, MultiPoint, MultiLineString, MultiPolygon, GeometryCollection, Rect, Triangle);

impl<T: Into<Shape>> From<Vec<T>> for Shape {
	fn from(values: Vec<T>) -> Self {
		Self::Sequence(values.into_iter().map(Into::into).collect())
	}
}
