mod layout {

	use threedo_testkit::{triangle_model, two_child_model};

	use crate::codec::{
		BuildMode, ByteRegion, LayoutBuilder, OBJECT_SCHEMA, Object, PRIMITIVE_SCHEMA, Primitive, RegionKind, Vertex, analyze, build_model, decode_model, field,
		read_record,
	};

	fn triangle() -> Object {
		let mut root = Object::new("root");
		root.vertices.extend([Vertex::new(0, 0, 0), Vertex::new(1, 0, 0), Vertex::new(1, 1, 0)]);
		root.primitives.push(Primitive::new("wall", vec![0, 1, 2]));
		root
	}

	fn region(kind: RegionKind, offset: usize, length: usize) -> ByteRegion {
		ByteRegion { kind, offset, length }
	}

	fn assert_same_shape(left: &Object, right: &Object) {
		assert_eq!(left.name, right.name);
		assert_eq!(left.offset(), right.offset());
		assert_eq!(left.vertices, right.vertices);
		assert_eq!(left.source.data_fields().collect::<Vec<_>>(), right.source.data_fields().collect::<Vec<_>>());

		assert_eq!(left.primitives.len(), right.primitives.len());
		for (lhs, rhs) in left.primitives.iter().zip(&right.primitives) {
			assert_eq!(lhs.texture_name, rhs.texture_name);
			assert_eq!(lhs.vertex_indices, rhs.vertex_indices);
			assert_eq!(lhs.source.data_fields().collect::<Vec<_>>(), rhs.source.data_fields().collect::<Vec<_>>());
		}

		assert_eq!(left.children.len(), right.children.len());
		for (lhs, rhs) in left.children.iter().zip(&right.children) {
			assert_same_shape(lhs, rhs);
		}
	}

	#[test]
	fn triangle_lays_out_in_allocation_order() {
		let built = LayoutBuilder::default().build(&triangle()).expect("triangle builds");

		assert_eq!(built.bytes.len(), 136);
		assert_eq!(
			built.regions,
			vec![
				region(RegionKind::Object, 0, 52),
				region(RegionKind::TextureName, 52, 5),
				region(RegionKind::Vertices, 57, 12),
				region(RegionKind::Vertices, 69, 12),
				region(RegionKind::Vertices, 81, 12),
				region(RegionKind::Primitive, 93, 32),
				region(RegionKind::VertexIndices, 125, 6),
				region(RegionKind::ObjectName, 131, 5),
			]
		);

		let root = read_record(&built.bytes, 0, &OBJECT_SCHEMA).expect("root record");
		assert_eq!(root.get(field::VERSION_SIGNATURE).expect("field exists"), 1);
		assert_eq!(root.get(field::NUMBER_OF_VERTEXES).expect("field exists"), 3);
		assert_eq!(root.get(field::NUMBER_OF_PRIMITIVES).expect("field exists"), 1);
		assert_eq!(root.get(field::OFFSET_TO_OBJECT_NAME).expect("field exists"), 131);
		assert_eq!(root.get(field::OFFSET_TO_VERTEX_ARRAY).expect("field exists"), 57);
		assert_eq!(root.get(field::OFFSET_TO_PRIMITIVE_ARRAY).expect("field exists"), 93);
		assert_eq!(root.get(field::OFFSET_TO_CHILD_OBJECT).expect("field exists"), 0);
		assert_eq!(root.get(field::OFFSET_TO_SIBLING_OBJECT).expect("field exists"), 0);

		let primitive = read_record(&built.bytes, 93, &PRIMITIVE_SCHEMA).expect("primitive record");
		assert_eq!(primitive.get(field::NUMBER_OF_VERTEX_INDEXES).expect("field exists"), 3);
		assert_eq!(primitive.get(field::OFFSET_TO_VERTEX_INDEX_ARRAY).expect("field exists"), 125);
		assert_eq!(primitive.get(field::OFFSET_TO_TEXTURE_NAME).expect("field exists"), 52);
		assert_eq!(&built.bytes[125..131], &[0, 0, 1, 0, 2, 0]);
		assert_eq!(&built.bytes[52..57], b"wall\0");
	}

	#[test]
	fn decoded_files_rebuild_to_the_same_tree() {
		for bytes in [triangle_model(), two_child_model()] {
			let parsed = decode_model(&bytes).expect("fixture decodes");
			let rebuilt = build_model(&parsed.root, BuildMode::Normal).expect("tree builds");
			let reparsed = decode_model(&rebuilt).expect("rebuilt file decodes");
			assert_same_shape(&parsed.root, &reparsed.root);
		}
	}

	#[test]
	fn decoder_regions_of_built_file_leave_no_gaps() {
		let parsed = decode_model(&two_child_model()).expect("fixture decodes");
		let built = LayoutBuilder::default().build(&parsed.root).expect("tree builds");
		let reparsed = decode_model(&built.bytes).expect("rebuilt file decodes");

		let groups = analyze(&reparsed.regions);
		assert!(groups.iter().all(|group| group.kind != RegionKind::UnknownGap));
		assert_eq!(groups.last().map(|group| group.end()), Some(built.bytes.len()));
	}

	#[test]
	fn shared_texture_is_written_once() {
		let parsed = decode_model(&two_child_model()).expect("fixture decodes");
		let built = LayoutBuilder::default().build(&parsed.root).expect("tree builds");

		let textures: Vec<_> = built.regions.iter().filter(|item| item.kind == RegionKind::TextureName).collect();
		assert_eq!(textures, vec![&region(RegionKind::TextureName, 52, 6)]);

		let primitives: Vec<_> = built.regions.iter().filter(|item| item.kind == RegionKind::Primitive).collect();
		assert_eq!(primitives.len(), 2);
		for area in primitives {
			let record = read_record(&built.bytes, area.offset, &PRIMITIVE_SCHEMA).expect("primitive record");
			assert_eq!(record.get(field::OFFSET_TO_TEXTURE_NAME).expect("field exists"), 52);
		}
	}

	#[test]
	fn children_occupy_one_block_linked_by_siblings() {
		let parsed = decode_model(&two_child_model()).expect("fixture decodes");
		let bytes = build_model(&parsed.root, BuildMode::Normal).expect("tree builds");

		let root = read_record(&bytes, 0, &OBJECT_SCHEMA).expect("root record");
		let first_at = root.get(field::OFFSET_TO_CHILD_OBJECT).expect("field exists") as usize;
		let first = read_record(&bytes, first_at, &OBJECT_SCHEMA).expect("first child");
		let second_at = first_at + OBJECT_SCHEMA.size();
		assert_eq!(first.get(field::OFFSET_TO_SIBLING_OBJECT).expect("field exists"), second_at as i64);
		assert_eq!(first.get(field::X_FROM_PARENT).expect("field exists"), 5);

		let second = read_record(&bytes, second_at, &OBJECT_SCHEMA).expect("second child");
		assert_eq!(second.get(field::OFFSET_TO_SIBLING_OBJECT).expect("field exists"), 0);
		assert_eq!(second.get(field::OFFSET_TO_CHILD_OBJECT).expect("field exists"), 0);
	}

	#[test]
	fn empty_name_is_a_single_terminator() {
		let built = LayoutBuilder::default().build(&Object::new("")).expect("unnamed object builds");
		assert_eq!(built.regions, vec![region(RegionKind::Object, 0, 52), region(RegionKind::ObjectName, 52, 1)]);
		assert_eq!(decode_model(&built.bytes).expect("decodes").root.name, "");
	}

	#[test]
	fn stale_counts_in_source_are_overwritten() {
		let mut root = triangle();
		root.source.set(field::NUMBER_OF_VERTEXES, 99).expect("field exists");
		root.primitives[0].source.set(field::NUMBER_OF_VERTEX_INDEXES, 7).expect("field exists");

		let parsed = decode_model(&build_model(&root, BuildMode::Normal).expect("builds")).expect("decodes");
		assert_eq!(parsed.root.vertices.len(), 3);
		assert_eq!(parsed.root.primitives[0].vertex_indices, vec![0, 1, 2]);
	}

	#[test]
	fn unifusion_mode_writes_a_single_object() {
		let parsed = decode_model(&two_child_model()).expect("fixture decodes");
		let bytes = build_model(&parsed.root, BuildMode::Unifusion).expect("flattened tree builds");
		let flat = decode_model(&bytes).expect("decodes").root;

		assert!(flat.children.is_empty());
		let coords: Vec<_> = flat.vertices.iter().map(Vertex::xyz).collect();
		assert_eq!(coords, vec![(6, 5, 5), (1, 0, 0)]);
		assert_eq!(flat.primitives.len(), 2);
	}
}

mod rejections {

	use crate::codec::{BuildMode, ByteRegion, ErrorKind, LayoutBuilder, ModelError, Object, Primitive, RegionKind, Vertex, field};

	fn build(root: &Object) -> crate::codec::Result<Vec<u8>> {
		LayoutBuilder::new(BuildMode::Normal).build(root).map(|built| built.bytes)
	}

	#[test]
	fn name_length_boundary() {
		build(&Object::new("n".repeat(254))).expect("254 bytes fit");

		let err = build(&Object::new("n".repeat(255))).expect_err("255 bytes do not fit");
		assert!(matches!(err, ModelError::NameTooLong { len: 255, max: 254, .. }));
		assert_eq!(err.kind(), ErrorKind::Range);
	}

	#[test]
	fn non_ascii_and_nul_names_are_rejected() {
		let err = build(&Object::new("caf\u{e9}")).expect_err("non-ascii name");
		assert!(matches!(err, ModelError::NameNotAscii { ch: '\u{e9}', pos: 3, .. }));
		assert_eq!(err.kind(), ErrorKind::Range);

		let err = build(&Object::new("a\0b")).expect_err("interior nul");
		assert!(matches!(err, ModelError::NameNotAscii { ch: '\0', pos: 1, .. }));

		let mut root = Object::new("root");
		root.primitives.push(Primitive::new("\u{fc}ber", vec![]));
		let err = build(&root).expect_err("non-ascii texture name");
		assert!(matches!(err, ModelError::NameNotAscii { pos: 0, .. }));
	}

	#[test]
	fn dangling_vertex_index_is_rejected() {
		let mut root = Object::new("root");
		root.vertices.push(Vertex::new(0, 0, 0));
		root.primitives.push(Primitive::new("", vec![0, 1]));

		let err = build(&root).expect_err("index 1 with one vertex");
		assert!(matches!(err, ModelError::VertexIndexOutOfRange { index: 1, count: 1, .. }));
		assert_eq!(err.kind(), ErrorKind::Format);
	}

	#[test]
	fn field_outside_i32_is_rejected() {
		let mut root = Object::new("root");
		root.source.set(field::ALWAYS_0, i64::from(i32::MAX) + 1).expect("field exists");
		let err = build(&root).expect_err("field overflows");
		assert!(matches!(err, ModelError::IntegerRange { .. }));
		assert_eq!(err.kind(), ErrorKind::Range);
	}

	#[test]
	fn tiling_check_reports_gaps_and_short_files() {
		let object = ByteRegion {
			kind: RegionKind::Object,
			offset: 0,
			length: 52,
		};
		let name = ByteRegion {
			kind: RegionKind::ObjectName,
			offset: 60,
			length: 4,
		};

		super::super::verify_tiling(&[object], 52).expect("exact tiling");
		let err = super::super::verify_tiling(&[object, name], 64).expect_err("gap at 52");
		assert!(matches!(err, ModelError::TilingMismatch { expected: 52, found: 60 }));
		assert_eq!(err.kind(), ErrorKind::Internal);

		let err = super::super::verify_tiling(&[object], 56).expect_err("bytes after last region");
		assert!(matches!(err, ModelError::TilingMismatch { expected: 56, found: 52 }));
	}

	#[test]
	fn build_mode_labels_parse() {
		assert_eq!("normal".parse::<BuildMode>().expect("known mode"), BuildMode::Normal);
		assert_eq!("unifusion".parse::<BuildMode>().expect("known mode"), BuildMode::Unifusion);
		assert_eq!(BuildMode::Unifusion.to_string(), "unifusion");

		let err = "fused".parse::<BuildMode>().expect_err("unknown mode");
		assert!(matches!(err, ModelError::UnknownBuildMode { ref mode } if mode == "fused"));
		assert_eq!(err.kind(), ErrorKind::Usage);
	}
}
