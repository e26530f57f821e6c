use crate::cleanup::{CleanupOptions, cleanup_path};
use crate::path::{Path, PathCode};
use geo::{Area, Contains, Coord, Geometry, LineString, MultiLineString, Polygon};
use glam::{DAffine2, DVec2};

/// Options for [`path_to_geometries_with`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReconstructOptions {
	/// Applied to the path before anything else.
	pub transform: Option<DAffine2>,
	/// Cleanup applied to the path. Curves are always flattened regardless of `curves`.
	pub cleanup: CleanupOptions,
	/// Largest per-axis distance between the first and last vertex of an open subpath for it to still count as a ring.
	/// Zero requires exact equality.
	pub closure_tolerance: f64,
}

/// A subpath after classification.
enum Candidate {
	Ring(Polygon<f64>),
	Line(LineString<f64>),
}

impl Candidate {
	fn into_geometry(self) -> Geometry<f64> {
		match self {
			Self::Ring(polygon) => Geometry::Polygon(polygon),
			Self::Line(line_string) => Geometry::LineString(line_string),
		}
	}
}

/// Interprets a path as geometry. Equivalent to [`path_to_geometries_with`] using the default options.
pub fn path_to_geometries(path: &Path) -> impl Iterator<Item = Geometry<f64>> + use<> {
	path_to_geometries_with(path, &ReconstructOptions::default())
}

/// Interprets a path as a sequence of geometries.
///
/// The cleaned path is split into subpaths at every [`MoveTo`](PathCode::MoveTo), discarding subpaths of a single vertex.
/// A subpath with more than two vertices that ends with [`ClosePoly`](PathCode::ClosePoly), or whose last vertex repeats its
/// first, is a ring. Anything else is a line string.
///
/// A ring becomes a hole of the previous subpath's polygon if that polygon contains it. Only the immediately preceding
/// polygon is tested, so an island inside a hole is taken as another hole of the outer polygon instead of a new polygon.
///
/// If every result is a line string they are merged into a single multi line string. Polygons with zero area are dropped.
pub fn path_to_geometries_with(path: &Path, options: &ReconstructOptions) -> impl Iterator<Item = Geometry<f64>> + use<> {
	let cleanup_options = CleanupOptions { curves: false, ..options.cleanup.clone() };
	let cleaned = cleanup_path(path, options.transform, &cleanup_options);
	let (vertices, codes) = cleaned.without_sentinel();

	// Each entry is an outer candidate and the rings found to be its holes
	let mut collection: Vec<(Candidate, Vec<LineString<f64>>)> = Vec::new();

	for (subpath_vertices, subpath_codes) in split_subpaths(vertices, codes) {
		if subpath_vertices.len() < 2 {
			log::trace!("Discarding single vertex subpath at {:?}", subpath_vertices[0]);
			continue;
		}
		let candidate = classify(subpath_vertices, subpath_codes, options.closure_tolerance);

		if let (Candidate::Ring(ring), Some((Candidate::Ring(outer), holes))) = (&candidate, collection.last_mut()) {
			if outer.contains(ring.exterior()) {
				holes.push(ring.exterior().clone());
				continue;
			}
		}

		collection.push((candidate, Vec::new()));
	}

	let mut geometries = collection
		.into_iter()
		.map(|(candidate, holes)| match candidate {
			Candidate::Ring(outer) if !holes.is_empty() => {
				let (exterior, _) = outer.into_inner();
				Geometry::Polygon(Polygon::new(exterior, holes))
			}
			candidate => candidate.into_geometry(),
		})
		.collect::<Vec<_>>();

	if !geometries.is_empty() && geometries.iter().all(|geometry| matches!(geometry, Geometry::LineString(_))) {
		let line_strings = geometries
			.into_iter()
			.filter_map(|geometry| match geometry {
				Geometry::LineString(line_string) => Some(line_string),
				_ => None,
			})
			.collect();
		geometries = vec![Geometry::MultiLineString(MultiLineString::new(line_strings))];
	}

	geometries.into_iter().filter(|geometry| match geometry {
		Geometry::Polygon(polygon) => {
			let degenerate = polygon.unsigned_area() == 0.;
			if degenerate {
				log::debug!("Dropping zero area polygon with {} exterior coordinates", polygon.exterior().0.len());
			}
			!degenerate
		}
		_ => true,
	})
}

/// Splits the path at every [`PathCode::MoveTo`], discarding empty runs.
fn split_subpaths<'a>(vertices: &'a [DVec2], codes: &'a [PathCode]) -> impl Iterator<Item = (&'a [DVec2], &'a [PathCode])> + 'a {
	let mut starts = codes.iter().enumerate().filter(|&(_, &code)| code == PathCode::MoveTo).map(|(index, _)| index).collect::<Vec<_>>();
	if starts.first() != Some(&0) {
		starts.insert(0, 0);
	}
	let ends = starts.iter().skip(1).copied().chain(std::iter::once(codes.len())).collect::<Vec<_>>();

	starts.into_iter().zip(ends).filter_map(move |(start, end)| {
		if start == end {
			log::trace!("Discarding empty subpath at index {start}");
			return None;
		}
		Some((&vertices[start..end], &codes[start..end]))
	})
}

fn classify(vertices: &[DVec2], codes: &[PathCode], closure_tolerance: f64) -> Candidate {
	let closed_by_code = codes.last() == Some(&PathCode::ClosePoly);
	let closed_by_position = match (vertices.first(), vertices.last()) {
		(Some(first), Some(last)) => first.abs_diff_eq(*last, closure_tolerance),
		_ => false,
	};

	if vertices.len() > 2 && (closed_by_code || closed_by_position) {
		// The vertex of a close code only repeats the subpath start
		let ring = if closed_by_code { &vertices[..vertices.len() - 1] } else { vertices };
		Candidate::Ring(Polygon::new(to_line_string(ring), Vec::new()))
	} else {
		Candidate::Line(to_line_string(vertices))
	}
}

fn to_line_string(vertices: &[DVec2]) -> LineString<f64> {
	LineString::new(vertices.iter().map(|vertex| Coord { x: vertex.x, y: vertex.y }).collect())
}
