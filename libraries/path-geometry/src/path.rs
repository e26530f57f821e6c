use crate::error::PathError;
use glam::DVec2;
use kurbo::{BezPath, PathEl};

pub fn point_to_dvec2(point: kurbo::Point) -> DVec2 {
	DVec2::new(point.x, point.y)
}

pub fn dvec2_to_point(value: DVec2) -> kurbo::Point {
	kurbo::Point::new(value.x, value.y)
}

/// The drawing instruction attached to each vertex of a [`Path`].
///
/// The discriminants follow the usual renderer numbering, so codes can be exchanged as plain integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PathCode {
	/// End of the path. Only appears as the sentinel of a cleaned path.
	Stop = 0,
	/// Start a new subpath at this vertex.
	MoveTo = 1,
	/// Draw a straight line to this vertex.
	LineTo = 2,
	/// Quadratic Bézier: a control point followed by an end point, both coded `Curve3`.
	Curve3 = 3,
	/// Cubic Bézier: two control points followed by an end point, all coded `Curve4`.
	Curve4 = 4,
	/// Close the current subpath back to its start. The vertex is ignored.
	ClosePoly = 79,
}

impl PathCode {
	pub fn value(self) -> u8 {
		self as u8
	}

	pub fn from_value(value: u8) -> Option<Self> {
		match value {
			0 => Some(Self::Stop),
			1 => Some(Self::MoveTo),
			2 => Some(Self::LineTo),
			3 => Some(Self::Curve3),
			4 => Some(Self::Curve4),
			79 => Some(Self::ClosePoly),
			_ => None,
		}
	}

	pub fn is_curve(self) -> bool {
		matches!(self, Self::Curve3 | Self::Curve4)
	}

	/// Number of consecutive vertices that make up one segment drawn with this code.
	pub fn segment_len(self) -> usize {
		match self {
			Self::Curve3 => 2,
			Self::Curve4 => 3,
			_ => 1,
		}
	}
}

/// A flat, renderer-oriented path: an ordered list of vertices, each tagged with a [`PathCode`].
///
/// A path may hold many subpaths, each starting at a [`PathCode::MoveTo`]. Nothing else about its structure is encoded.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
	vertices: Vec<DVec2>,
	codes: Vec<PathCode>,
}

impl Path {
	/// Creates a path from parallel vertex and code lists, which must have the same length.
	pub fn new(vertices: Vec<DVec2>, codes: Vec<PathCode>) -> Result<Self, PathError> {
		if vertices.len() != codes.len() {
			return Err(PathError::MismatchedLengths {
				vertices: vertices.len(),
				codes: codes.len(),
			});
		}
		Ok(Self { vertices, codes })
	}

	/// Creates a path from parts that are already known to have the same length.
	pub(crate) fn from_parts_unchecked(vertices: Vec<DVec2>, codes: Vec<PathCode>) -> Self {
		assert_eq!(vertices.len(), codes.len(), "Path vertices and codes must have the same length");
		Self { vertices, codes }
	}

	/// Creates a single open subpath: the first vertex is coded [`PathCode::MoveTo`] and the rest [`PathCode::LineTo`].
	pub fn from_polyline(vertices: impl IntoIterator<Item = DVec2>) -> Self {
		let mut path = Self::default();
		path.extend_polyline(vertices);
		path
	}

	/// Appends a new subpath with the same coding as [`Path::from_polyline`].
	pub fn extend_polyline(&mut self, vertices: impl IntoIterator<Item = DVec2>) {
		let start = self.vertices.len();
		self.vertices.extend(vertices);
		self.codes
			.extend((start..self.vertices.len()).map(|index| if index == start { PathCode::MoveTo } else { PathCode::LineTo }));
	}

	pub fn push(&mut self, vertex: DVec2, code: PathCode) {
		self.vertices.push(vertex);
		self.codes.push(code);
	}

	pub fn vertices(&self) -> &[DVec2] {
		&self.vertices
	}

	pub fn codes(&self) -> &[PathCode] {
		&self.codes
	}

	pub fn len(&self) -> usize {
		self.vertices.len()
	}

	pub fn is_empty(&self) -> bool {
		self.vertices.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (DVec2, PathCode)> + '_ {
		self.vertices.iter().copied().zip(self.codes.iter().copied())
	}

	pub fn has_curves(&self) -> bool {
		self.codes.iter().any(|code| code.is_curve())
	}

	pub fn into_parts(self) -> (Vec<DVec2>, Vec<PathCode>) {
		(self.vertices, self.codes)
	}

	/// Converts to a [`BezPath`].
	///
	/// A segment drawn before any subpath has started begins a new subpath at the segment's end point.
	/// Drawing stops at a [`PathCode::Stop`] or at a curve that is missing vertices.
	pub fn to_bezpath(&self) -> BezPath {
		let mut bezpath = BezPath::new();
		let mut started = false;
		let mut index = 0;

		while index < self.len() {
			let code = self.codes[index];
			let segment_len = code.segment_len();
			let Some(segment) = self.vertices.get(index..index + segment_len) else { break };
			let end = dvec2_to_point(segment[segment_len - 1]);

			match code {
				PathCode::Stop => break,
				PathCode::MoveTo => {
					bezpath.move_to(end);
					started = true;
				}
				PathCode::ClosePoly => {
					if started {
						bezpath.close_path();
					}
				}
				_ if !started => {
					bezpath.move_to(end);
					started = true;
				}
				PathCode::LineTo => bezpath.line_to(end),
				PathCode::Curve3 => bezpath.quad_to(dvec2_to_point(segment[0]), end),
				PathCode::Curve4 => bezpath.curve_to(dvec2_to_point(segment[0]), dvec2_to_point(segment[1]), end),
			}

			index += segment_len;
		}

		bezpath
	}
}

impl From<&BezPath> for Path {
	fn from(bezpath: &BezPath) -> Self {
		let mut path = Path::default();
		let mut subpath_start = DVec2::ZERO;

		for element in bezpath.elements() {
			match *element {
				PathEl::MoveTo(point) => {
					subpath_start = point_to_dvec2(point);
					path.push(subpath_start, PathCode::MoveTo);
				}
				PathEl::LineTo(point) => path.push(point_to_dvec2(point), PathCode::LineTo),
				PathEl::QuadTo(control, point) => {
					path.push(point_to_dvec2(control), PathCode::Curve3);
					path.push(point_to_dvec2(point), PathCode::Curve3);
				}
				PathEl::CurveTo(control1, control2, point) => {
					path.push(point_to_dvec2(control1), PathCode::Curve4);
					path.push(point_to_dvec2(control2), PathCode::Curve4);
					path.push(point_to_dvec2(point), PathCode::Curve4);
				}
				PathEl::ClosePath => path.push(subpath_start, PathCode::ClosePoly),
			}
		}

		path
	}
}

impl From<BezPath> for Path {
	fn from(bezpath: BezPath) -> Self {
		Self::from(&bezpath)
	}
}
