use crate::error::UnsupportedGeometryError;
use crate::path::Path;
use crate::shape::Shape;
use geo::{Coord, Geometry, LineString, Polygon};
use glam::DVec2;

fn coord_to_dvec2(coord: &Coord<f64>) -> DVec2 {
	DVec2::new(coord.x, coord.y)
}

fn line_string_vertices(line_string: &LineString<f64>) -> impl Iterator<Item = DVec2> + '_ {
	line_string.0.iter().map(coord_to_dvec2)
}

/// Flattens a shape, or a sequence of shapes, into renderer paths.
///
/// Points and line strings become one open subpath each. A polygon becomes a single path holding its exterior ring
/// followed by its interior rings, one [`MoveTo`](crate::PathCode::MoveTo) per ring and no explicit close.
/// Collections are converted member by member, keeping their order.
///
/// Fails on any geometry without a path mapping (such as `Rect`) and on foreign values without their own path encoding.
pub fn geometry_to_paths(shape: impl Into<Shape>) -> Result<Vec<Path>, UnsupportedGeometryError> {
	let mut paths = Vec::new();
	append_shape(&shape.into(), &mut paths)?;
	Ok(paths)
}

fn append_shape(shape: &Shape, paths: &mut Vec<Path>) -> Result<(), UnsupportedGeometryError> {
	match shape {
		Shape::Geometry(geometry) => append_geometry(geometry, paths),
		Shape::Sequence(shapes) => shapes.iter().try_for_each(|shape| append_shape(shape, paths)),
		Shape::Foreign(foreign) => {
			let path = foreign.to_path().ok_or_else(|| UnsupportedGeometryError::new(foreign.type_name()))?;
			paths.push(path);
			Ok(())
		}
	}
}

fn append_geometry(geometry: &Geometry<f64>, paths: &mut Vec<Path>) -> Result<(), UnsupportedGeometryError> {
	match geometry {
		Geometry::Point(point) => paths.push(Path::from_polyline([coord_to_dvec2(&point.0)])),
		Geometry::LineString(line_string) => paths.push(Path::from_polyline(line_string_vertices(line_string))),
		Geometry::Polygon(polygon) => paths.push(polygon_to_path(polygon)),
		Geometry::MultiPoint(multi_point) => paths.extend(multi_point.iter().map(|point| Path::from_polyline([coord_to_dvec2(&point.0)]))),
		Geometry::MultiLineString(multi_line_string) => paths.extend(multi_line_string.iter().map(|line_string| Path::from_polyline(line_string_vertices(line_string)))),
		Geometry::MultiPolygon(multi_polygon) => paths.extend(multi_polygon.iter().map(polygon_to_path)),
		Geometry::GeometryCollection(collection) => {
			for member in collection.iter() {
				append_geometry(member, paths)?;
			}
		}
		Geometry::Line(_) => return Err(UnsupportedGeometryError::new("Line")),
		Geometry::Rect(_) => return Err(UnsupportedGeometryError::new("Rect")),
		Geometry::Triangle(_) => return Err(UnsupportedGeometryError::new("Triangle")),
	}
	Ok(())
}

fn polygon_to_path(polygon: &Polygon<f64>) -> Path {
	let mut path = Path::from_polyline(line_string_vertices(polygon.exterior()));
	for interior in polygon.interiors() {
		path.extend_polyline(line_string_vertices(interior));
	}
	path
}
