#![allow(missing_docs)]

use threedo::codec::{
	BuildMode, ErrorKind, IntType, LayoutBuilder, Object, Primitive, RegionKind, Vertex, analyze, build_model, decode_model, flatten, write_integer,
};
use threedo_testkit::{triangle_model, two_child_model};

fn tank() -> Object {
	let mut hull = Object::new("hull");
	hull.vertices.extend([Vertex::new(0, 0, 0), Vertex::new(10, 0, 0), Vertex::new(10, 0, 10), Vertex::new(0, 0, 10)]);
	hull.primitives.push(Primitive::new("armor", vec![0, 1, 2, 3]));
	hull.primitives.push(Primitive::new("", vec![0, 2]));

	let mut barrel = Object::new("barrel").with_offset(0, 2, 8);
	barrel.vertices.extend([Vertex::new(0, 0, 0), Vertex::new(0, 0, 6)]);
	barrel.primitives.push(Primitive::new("armor", vec![0, 1]));

	let mut turret = Object::new("turret").with_offset(5, 3, 5);
	turret.vertices.extend([Vertex::new(-2, 0, -2), Vertex::new(2, 0, 2)]);
	turret.primitives.push(Primitive::new("glass", vec![1, 0]));
	turret.children.push(barrel);

	let mut track = Object::new("track").with_offset(0, -1, 0);
	track.vertices.push(Vertex::new(0, 0, 0));

	hull.children.push(turret);
	hull.children.push(track);
	hull
}

#[test]
fn built_tree_decodes_back_unchanged() {
	let root = tank();
	let bytes = build_model(&root, BuildMode::Normal).expect("tree builds");
	let parsed = decode_model(&bytes).expect("built file decodes");

	let names: Vec<_> = parsed.root.walk().map(|item| item.name.as_str()).collect();
	assert_eq!(names, vec!["hull", "turret", "barrel", "track"]);
	for (built, decoded) in root.walk().zip(parsed.root.walk()) {
		assert_eq!(built.offset(), decoded.offset());
		assert_eq!(built.vertices, decoded.vertices);
		let lhs: Vec<_> = built.primitives.iter().map(|item| (&item.texture_name, &item.vertex_indices)).collect();
		let rhs: Vec<_> = decoded.primitives.iter().map(|item| (&item.texture_name, &item.vertex_indices)).collect();
		assert_eq!(lhs, rhs);
	}
	assert_eq!(parsed.root.texture_names(), vec!["armor", "glass"]);
}

#[test]
fn built_file_is_fully_attributed() {
	let built = LayoutBuilder::new(BuildMode::Normal).build(&tank()).expect("tree builds");
	let parsed = decode_model(&built.bytes).expect("built file decodes");
	let groups = analyze(&parsed.regions);

	assert_eq!(groups.first().map(|group| group.start()), Some(0));
	assert_eq!(groups.last().map(|group| group.end()), Some(built.bytes.len()));
	assert!(groups.iter().all(|group| group.kind != RegionKind::UnknownGap));
	for pair in groups.windows(2) {
		assert_eq!(pair[0].end(), pair[1].start());
	}
}

#[test]
fn flatten_is_idempotent_and_moves_children_into_root_space() {
	let once = flatten(&tank()).expect("flatten succeeds");
	let twice = flatten(&once).expect("flatten succeeds");
	assert_eq!(once, twice);

	let coords: Vec<_> = once.vertices.iter().map(Vertex::xyz).collect();
	assert!(coords.contains(&(3, 3, 3)));
	assert!(coords.contains(&(5, 5, 13)));
	assert!(coords.contains(&(5, 5, 19)));
	assert!(coords.contains(&(0, -1, 0)));
	assert_eq!(once.primitives.len(), 4);
}

#[test]
fn unifusion_build_round_trips_through_decoder() {
	let parsed = decode_model(&two_child_model()).expect("fixture decodes");
	let bytes = build_model(&parsed.root, BuildMode::Unifusion).expect("flattened build");
	let flat = decode_model(&bytes).expect("flattened file decodes");

	assert_eq!(flat.root.object_count(), 1);
	assert_eq!(flat.root, {
		let again = build_model(&flat.root, BuildMode::Unifusion).expect("second flattened build");
		decode_model(&again).expect("decodes").root
	});
}

#[test]
fn triangle_scenario_rebuilds_to_same_size() {
	let parsed = decode_model(&triangle_model()).expect("fixture decodes");
	let rebuilt = build_model(&parsed.root, BuildMode::Normal).expect("tree builds");
	assert_eq!(rebuilt.len(), triangle_model().len());
}

#[test]
fn i32_field_boundary() {
	let mut buf = [0_u8; 4];
	write_integer(2_147_483_647, &mut buf, 0, IntType::I32, Default::default()).expect("max fits");
	let err = write_integer(2_147_483_648, &mut buf, 0, IntType::I32, Default::default()).expect_err("max + 1 does not fit");
	assert_eq!(err.kind(), ErrorKind::Range);
}
