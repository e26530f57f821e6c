use geo::{Coord, Geometry, Triangle, point, polygon};
use glam::{DAffine2, DVec2};
use kurbo::BezPath;
use path_geometry::PathCode::*;
use path_geometry::{CleanupOptions, ForeignShape, Path, PathCode, ReconstructOptions, Shape, UnsupportedGeometryError, geometry_to_paths, path_to_geometries, path_to_geometries_with};
use pretty_assertions::assert_eq;

fn init_logger() {
	let _ = env_logger::builder().is_test(true).try_init();
}

fn path(vertices: &[(f64, f64)], codes: &[PathCode]) -> Path {
	Path::new(vertices.iter().map(|&(x, y)| DVec2::new(x, y)).collect(), codes.to_vec()).unwrap()
}

#[test]
fn simple_polygon_round_trip() {
	init_logger();
	let square = polygon![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)];

	let paths = geometry_to_paths(square.clone()).unwrap();
	assert_eq!(paths.len(), 1);
	let geometries = path_to_geometries(&paths[0]).collect::<Vec<_>>();

	assert_eq!(geometries, vec![Geometry::Polygon(square)]);
}

#[test]
fn polygon_with_hole_round_trip() {
	init_logger();
	let lake = polygon!(
		exterior: [(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)],
		interiors: [[(x: 2., y: 2.), (x: 8., y: 2.), (x: 8., y: 8.), (x: 2., y: 8.)]],
	);

	let paths = geometry_to_paths(lake.clone()).unwrap();
	let geometries = path_to_geometries(&paths[0]).collect::<Vec<_>>();

	assert_eq!(geometries, vec![Geometry::Polygon(lake)]);
}

#[test]
fn closed_rings_nest_as_a_hole() {
	init_logger();
	let input = path(
		&[(0., 0.), (10., 0.), (10., 10.), (0., 10.), (0., 0.), (2., 2.), (8., 2.), (8., 8.), (2., 8.), (2., 2.)],
		&[MoveTo, LineTo, LineTo, LineTo, ClosePoly, MoveTo, LineTo, LineTo, LineTo, ClosePoly],
	);

	let geometries = path_to_geometries(&input).collect::<Vec<_>>();

	let expected = polygon!(
		exterior: [(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)],
		interiors: [[(x: 2., y: 2.), (x: 8., y: 2.), (x: 8., y: 8.), (x: 2., y: 8.)]],
	);
	assert_eq!(geometries, vec![Geometry::Polygon(expected)]);
}

#[test]
fn disjoint_lines_collapse_into_one_multi_line_string() {
	init_logger();
	let input = path(&[(0., 0.), (1., 1.), (5., 5.), (6., 7.)], &[MoveTo, LineTo, MoveTo, LineTo]);

	let geometries = path_to_geometries(&input).collect::<Vec<_>>();

	assert_eq!(geometries.len(), 1);
	let Geometry::MultiLineString(multi_line_string) = &geometries[0] else { panic!("expected a multi line string") };
	assert_eq!(multi_line_string.0.len(), 2);
	assert_eq!(multi_line_string.0[1].0, vec![Coord { x: 5., y: 5. }, Coord { x: 6., y: 7. }]);
}

#[test]
fn collinear_ring_is_dropped() {
	init_logger();
	let closed_by_code = path(&[(0., 0.), (1., 1.), (2., 2.), (0., 0.)], &[MoveTo, LineTo, LineTo, ClosePoly]);
	let closed_by_position = path(&[(0., 0.), (1., 1.), (0., 0.)], &[MoveTo, LineTo, LineTo]);

	assert_eq!(path_to_geometries(&closed_by_code).count(), 0);
	assert_eq!(path_to_geometries(&closed_by_position).count(), 0);
}

#[test]
fn degenerate_polygons_do_not_affect_their_neighbours() {
	init_logger();
	let input = path(
		&[(0., 0.), (1., 1.), (2., 2.), (0., 0.), (5., 5.), (6., 5.), (6., 6.), (0., 0.)],
		&[MoveTo, LineTo, LineTo, ClosePoly, MoveTo, LineTo, LineTo, ClosePoly],
	);

	let geometries = path_to_geometries(&input).collect::<Vec<_>>();

	assert_eq!(geometries, vec![Geometry::Polygon(polygon![(x: 5., y: 5.), (x: 6., y: 5.), (x: 6., y: 6.)])]);
}

#[test]
fn polygon_with_one_hole_gives_two_moves() {
	let lake = polygon!(
		exterior: [(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)],
		interiors: [[(x: 2., y: 2.), (x: 8., y: 2.), (x: 8., y: 8.)]],
	);
	let expected_len = lake.exterior().0.len() + lake.interiors()[0].0.len();

	let paths = geometry_to_paths(lake).unwrap();

	assert_eq!(paths.len(), 1);
	assert_eq!(paths[0].codes().iter().filter(|&&code| code == MoveTo).count(), 2);
	assert_eq!(paths[0].len(), expected_len);
}

#[test]
fn bare_coordinates_are_unsupported() {
	assert_eq!(geometry_to_paths(Shape::foreign((1., 2.))).unwrap_err(), UnsupportedGeometryError::new("(f64, f64)"));
	assert_eq!(geometry_to_paths(Shape::foreign(DVec2::new(1., 2.))).unwrap_err().type_name, "DVec2");
	assert_eq!(geometry_to_paths(Shape::foreign(Coord { x: 1., y: 2. })).unwrap_err().type_name, "Coord");
}

#[test]
fn triangle_has_no_mapping() {
	let triangle = Triangle::new(Coord { x: 0., y: 0. }, Coord { x: 1., y: 0. }, Coord { x: 0., y: 1. });

	assert_eq!(geometry_to_paths(triangle).unwrap_err().to_string(), "Unsupported shape type Triangle");
}

#[derive(Debug)]
struct Marker {
	at: DVec2,
}

impl ForeignShape for Marker {
	fn to_path(&self) -> Option<Path> {
		let corners = [DVec2::new(-1., -1.), DVec2::new(1., -1.), DVec2::new(1., 1.), DVec2::new(-1., 1.)];
		let mut path = Path::from_polyline(corners.map(|corner| self.at + corner));
		path.push(self.at, ClosePoly);
		Some(path)
	}
}

#[test]
fn foreign_shapes_round_trip_through_their_own_encoding() {
	init_logger();
	let shapes = vec![Shape::from(point!(x: 0., y: 0.)), Shape::foreign(Marker { at: DVec2::new(5., 5.) })];

	let paths = geometry_to_paths(shapes).unwrap();
	assert_eq!(paths.len(), 2);
	assert_eq!(paths[1].codes().last(), Some(&ClosePoly));

	let geometries = path_to_geometries(&paths[1]).collect::<Vec<_>>();
	assert_eq!(geometries, vec![Geometry::Polygon(polygon![(x: 4., y: 4.), (x: 6., y: 4.), (x: 6., y: 6.), (x: 4., y: 6.)])]);
}

#[test]
fn curves_are_flattened_before_reconstruction() {
	init_logger();
	let mut bezpath = BezPath::new();
	bezpath.move_to((0., 0.));
	bezpath.line_to((10., 0.));
	bezpath.quad_to((15., 5.), (10., 10.));
	bezpath.line_to((0., 10.));
	bezpath.close_path();

	let geometries = path_to_geometries(&Path::from(&bezpath)).collect::<Vec<_>>();

	assert_eq!(geometries.len(), 1);
	let Geometry::Polygon(polygon) = &geometries[0] else { panic!("expected a polygon") };
	assert!(polygon.exterior().0.len() > 5);
	assert!(polygon.exterior().0.iter().all(|coord| coord.x <= 12.5 + 1e-9));
}

#[test]
fn reconstruction_uses_the_cleanup_options() {
	init_logger();
	let input = path(
		&[(0., 0.), (10., 0.), (10., 10.), (0., 10.), (0., 0.), (2., 2.), (8., 2.), (8., 8.), (2., 8.), (2., 2.)],
		&[MoveTo, LineTo, LineTo, LineTo, ClosePoly, MoveTo, LineTo, LineTo, LineTo, ClosePoly],
	);
	let options = ReconstructOptions {
		transform: Some(DAffine2::from_translation(DVec2::new(100., 0.))),
		cleanup: CleanupOptions {
			clip: Some(kurbo::Rect::new(100., 0., 105., 10.)),
			..Default::default()
		},
		..Default::default()
	};

	let geometries = path_to_geometries_with(&input, &options).collect::<Vec<_>>();

	// Both rings are cut open by the clip, leaving only open lines
	assert_eq!(geometries.len(), 1);
	assert!(matches!(&geometries[0], Geometry::MultiLineString(lines) if lines.0.len() == 4));
}

#[test]
fn double_move_degrades_gracefully() {
	init_logger();
	let input = path(&[(0., 0.), (1., 1.), (2., 2.)], &[MoveTo, MoveTo, LineTo]);

	let geometries = path_to_geometries(&input).collect::<Vec<_>>();

	assert_eq!(geometries.len(), 1);
	let Geometry::MultiLineString(multi_line_string) = &geometries[0] else { panic!("expected a multi line string") };
	assert_eq!(multi_line_string.0.len(), 1);
	assert_eq!(multi_line_string.0[0].0, vec![Coord { x: 1., y: 1. }, Coord { x: 2., y: 2. }]);
}

#[test]
fn point_leaves_no_geometry() {
	init_logger();
	let paths = geometry_to_paths(point!(x: 1., y: 2.)).unwrap();

	assert_eq!(paths[0].codes(), &[MoveTo]);
	assert_eq!(path_to_geometries(&paths[0]).count(), 0);
}
