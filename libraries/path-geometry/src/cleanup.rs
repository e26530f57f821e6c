//! Path cleanup: the conversions a path goes through before it is interpreted.
//!
//! Stages run in a fixed order: transform, non-finite vertex removal, curve flattening, clipping, quantization,
//! pixel snapping, and simplification. Clipping and simplification only understand straight segments, so they are
//! skipped while curves remain in the path.

use crate::path::{Path, PathCode, point_to_dvec2};
use glam::{DAffine2, DVec2};
use geo::{Coord, LineString, Simplify};
use kurbo::{PathEl, Rect};

/// Options for [`cleanup_path`]. Missing fields take their default when deserialized.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CleanupOptions {
	/// Drop vertices with a NaN or infinite coordinate, breaking the subpath around them.
	pub remove_nans: bool,
	/// Clip straight segments to this rectangle.
	pub clip: Option<Rect>,
	/// Round every vertex to the nearest whole unit.
	pub quantize: bool,
	/// Remove vertices closer than this distance to the simplified polyline.
	pub simplify: Option<f64>,
	/// Keep curve codes. When false, curves are flattened into line segments.
	pub curves: bool,
	/// Maximum distance between a curve and its flattened polyline.
	pub curve_tolerance: f64,
	/// Width of the stroke the path will be drawn with. Odd widths snap to pixel centers.
	pub stroke_width: f64,
	/// Snap every vertex to the pixel grid.
	pub snap: bool,
}

impl Default for CleanupOptions {
	fn default() -> Self {
		Self {
			remove_nans: false,
			clip: None,
			quantize: false,
			simplify: None,
			curves: false,
			curve_tolerance: 0.1,
			stroke_width: 1.,
			snap: false,
		}
	}
}

/// Output of [`cleanup_path`], always terminated by a single [`PathCode::Stop`] sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedPath {
	pub vertices: Vec<DVec2>,
	pub codes: Vec<PathCode>,
}

impl CleanedPath {
	fn terminate(path: Path) -> Self {
		let (mut vertices, mut codes) = path.into_parts();
		vertices.push(DVec2::ZERO);
		codes.push(PathCode::Stop);
		Self { vertices, codes }
	}

	/// The vertices and codes with the trailing sentinel stripped.
	pub fn without_sentinel(&self) -> (&[DVec2], &[PathCode]) {
		let len = self.codes.len().saturating_sub(1);
		(&self.vertices[..len], &self.codes[..len])
	}
}

/// Runs the enabled cleanup stages over `path`, ignoring everything from its first [`PathCode::Stop`] onwards.
///
/// The stages run in order: `transform`, non-finite removal, curve flattening, clipping, quantization, snapping and
/// simplification. The result always ends with one [`PathCode::Stop`] sentinel.
pub fn cleanup_path(path: &Path, transform: Option<DAffine2>, options: &CleanupOptions) -> CleanedPath {
	let end = path.codes().iter().position(|&code| code == PathCode::Stop).unwrap_or(path.len());
	let vertices = path.vertices()[..end].iter().map(|&vertex| match transform {
		Some(transform) => transform.transform_point2(vertex),
		None => vertex,
	});
	let mut cleaned = Path::from_parts_unchecked(vertices.collect(), path.codes()[..end].to_vec());

	if options.remove_nans {
		cleaned = remove_non_finite(&cleaned);
	}

	if !options.curves && cleaned.has_curves() {
		cleaned = flatten_curves(&cleaned, options.curve_tolerance);
	}

	if let Some(rect) = options.clip {
		if cleaned.has_curves() {
			log::debug!("Skipping clipping of a path that still contains curves");
		} else {
			cleaned = clip(&cleaned, rect);
		}
	}

	if options.quantize {
		cleaned = map_vertices(cleaned, DVec2::round);
	}

	if options.snap {
		let offset = if (options.stroke_width.round() as i64) % 2 != 0 { 0.5 } else { 0. };
		cleaned = map_vertices(cleaned, |vertex| (vertex - offset + 0.5).floor() + offset);
	}

	if let Some(tolerance) = options.simplify {
		if cleaned.has_curves() {
			log::debug!("Skipping simplification of a path that still contains curves");
		} else {
			cleaned = simplify(&cleaned, tolerance);
		}
	}

	CleanedPath::terminate(cleaned)
}

fn map_vertices(path: Path, map: impl Fn(DVec2) -> DVec2) -> Path {
	let (vertices, codes) = path.into_parts();
	Path::from_parts_unchecked(vertices.into_iter().map(map).collect(), codes)
}

fn remove_non_finite(path: &Path) -> Path {
	let mut cleaned = Path::default();
	let (vertices, codes) = (path.vertices(), path.codes());
	// Whether the current subpath lost a vertex, and whether the next drawable vertex must start a new subpath
	let mut broken = false;
	let mut needs_move = false;
	let mut index = 0;

	while let Some(&code) = codes.get(index) {
		let Some(segment) = vertices.get(index..index + code.segment_len()) else { break };
		index += segment.len();

		match code {
			PathCode::MoveTo => {
				broken = !segment[0].is_finite();
				needs_move = broken;
				if !broken {
					cleaned.push(segment[0], code);
				}
			}
			PathCode::ClosePoly => {
				if !broken {
					cleaned.push(segment[0], code);
				}
			}
			_ if segment.iter().all(|vertex| vertex.is_finite()) => {
				if needs_move {
					cleaned.push(segment[segment.len() - 1], PathCode::MoveTo);
					needs_move = false;
				} else {
					segment.iter().for_each(|&vertex| cleaned.push(vertex, code));
				}
			}
			_ => {
				broken = true;
				needs_move = true;
			}
		}
	}

	log::trace!("Removed {} vertices while dropping non-finite coordinates", path.len() - cleaned.len());
	cleaned
}

fn flatten_curves(path: &Path, tolerance: f64) -> Path {
	let mut flattened = Path::default();
	let mut subpath_start = DVec2::ZERO;

	let bezpath = path.to_bezpath();
	kurbo::flatten(bezpath.iter(), tolerance, |element| match element {
		PathEl::MoveTo(point) => {
			subpath_start = point_to_dvec2(point);
			flattened.push(subpath_start, PathCode::MoveTo);
		}
		PathEl::LineTo(point) => flattened.push(point_to_dvec2(point), PathCode::LineTo),
		PathEl::ClosePath => flattened.push(subpath_start, PathCode::ClosePoly),
		// Flattening only ever emits moves, lines and closes
		PathEl::QuadTo(_, point) | PathEl::CurveTo(_, _, point) => flattened.push(point_to_dvec2(point), PathCode::LineTo),
	});

	flattened
}

fn clip(path: &Path, rect: Rect) -> Path {
	let rect = rect.abs();
	let mut clipper = LineClipper::new(DVec2::new(rect.x0, rect.y0), DVec2::new(rect.x1, rect.y1));

	for (vertex, code) in path.iter() {
		match code {
			PathCode::MoveTo => clipper.move_to(vertex),
			PathCode::ClosePoly => clipper.close(vertex),
			_ => clipper.line_to(vertex),
		}
	}

	clipper.finish()
}

/// Clips a segment to the box between `min` and `max` (Liang–Barsky). Unclipped endpoints are returned unchanged.
fn clip_segment(start: DVec2, end: DVec2, min: DVec2, max: DVec2) -> Option<(DVec2, DVec2)> {
	let delta = end - start;
	let (mut t0, mut t1) = (0_f64, 1_f64);

	for (p, q) in [(-delta.x, start.x - min.x), (delta.x, max.x - start.x), (-delta.y, start.y - min.y), (delta.y, max.y - start.y)] {
		if p == 0. {
			if q < 0. {
				return None;
			}
			continue;
		}

		let t = q / p;
		if p < 0. {
			if t > t1 {
				return None;
			}
			t0 = t0.max(t);
		} else {
			if t < t0 {
				return None;
			}
			t1 = t1.min(t);
		}
	}

	let clipped_start = if t0 > 0. { start + delta * t0 } else { start };
	let clipped_end = if t1 < 1. { start + delta * t1 } else { end };
	Some((clipped_start, clipped_end))
}

struct LineClipper {
	min: DVec2,
	max: DVec2,
	output: Path,
	subpath_start: DVec2,
	/// Current point of the input path.
	previous: Option<DVec2>,
	/// Current point of the output path.
	pen: Option<DVec2>,
	/// A move that has not been followed by any segment yet.
	lone_move: Option<DVec2>,
	subpath_clipped: bool,
}

impl LineClipper {
	fn new(min: DVec2, max: DVec2) -> Self {
		Self {
			min,
			max,
			output: Path::default(),
			subpath_start: DVec2::ZERO,
			previous: None,
			pen: None,
			lone_move: None,
			subpath_clipped: false,
		}
	}

	fn contains(&self, vertex: DVec2) -> bool {
		vertex.cmpge(self.min).all() && vertex.cmple(self.max).all()
	}

	fn move_to(&mut self, vertex: DVec2) {
		self.flush_lone_move();
		self.subpath_start = vertex;
		self.previous = Some(vertex);
		self.pen = None;
		self.lone_move = Some(vertex);
		self.subpath_clipped = false;
	}

	fn line_to(&mut self, vertex: DVec2) {
		let Some(start) = self.previous.replace(vertex) else {
			self.move_to(vertex);
			return;
		};
		self.lone_move = None;

		let Some((clipped_start, clipped_end)) = clip_segment(start, vertex, self.min, self.max) else {
			self.subpath_clipped = true;
			return;
		};

		if clipped_start != start || clipped_end != vertex {
			self.subpath_clipped = true;
		}
		if self.pen != Some(clipped_start) {
			self.output.push(clipped_start, PathCode::MoveTo);
		}
		self.output.push(clipped_end, PathCode::LineTo);
		self.pen = Some(clipped_end);
	}

	fn close(&mut self, vertex: DVec2) {
		if self.previous.is_none() {
			return;
		}

		if !self.subpath_clipped && self.pen.is_some() {
			self.output.push(vertex, PathCode::ClosePoly);
			self.previous = Some(self.subpath_start);
			self.pen = Some(self.subpath_start);
		} else {
			self.line_to(self.subpath_start);
		}
	}

	fn flush_lone_move(&mut self) {
		if let Some(vertex) = self.lone_move.take() {
			if self.contains(vertex) {
				self.output.push(vertex, PathCode::MoveTo);
			}
		}
	}

	fn finish(mut self) -> Path {
		self.flush_lone_move();
		self.output
	}
}

fn simplify(path: &Path, tolerance: f64) -> Path {
	let mut simplified = Path::default();
	let mut run = Vec::new();

	for (vertex, code) in path.iter() {
		if code == PathCode::LineTo {
			run.push((vertex, code));
			continue;
		}

		flush_simplified_run(&mut run, tolerance, &mut simplified);
		if code == PathCode::ClosePoly {
			simplified.push(vertex, code);
		} else {
			run.push((vertex, code));
		}
	}
	flush_simplified_run(&mut run, tolerance, &mut simplified);

	log::trace!("Simplification removed {} of {} vertices", path.len() - simplified.len(), path.len());
	simplified
}

/// Simplifies one straight run, keeping the code of its first vertex. Every later vertex of a run is a [`PathCode::LineTo`].
fn flush_simplified_run(run: &mut Vec<(DVec2, PathCode)>, tolerance: f64, output: &mut Path) {
	let Some(&(_, first_code)) = run.first() else { return };

	if run.len() < 3 {
		run.drain(..).for_each(|(vertex, code)| output.push(vertex, code));
		return;
	}

	let line_string = run.drain(..).map(|(vertex, _)| Coord { x: vertex.x, y: vertex.y }).collect::<LineString<f64>>();
	for (index, coord) in line_string.simplify(&tolerance).0.into_iter().enumerate() {
		let code = if index == 0 { first_code } else { PathCode::LineTo };
		output.push(DVec2::new(coord.x, coord.y), code);
	}
}
