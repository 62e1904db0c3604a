use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{debug, trace};

use crate::codec::{IntType, ModelError, Object, Primitive, Result, Vertex, field};

/// Collapse a hierarchy into one object in root space.
///
/// Every vertex is translated by the summed offsets of its ancestors (the
/// root's own offset included) and deduplicated by exact position. The result
/// keeps the root's name, offsets and data fields, has no children, and its
/// pointer fields are left unresolved for the layout builder.
pub fn flatten(root: &Object) -> Result<Object> {
	let mut acc = Accumulator::default();
	let offset = [i64::from(root.x_offset), i64::from(root.y_offset), i64::from(root.z_offset)];
	acc.append(root, offset)?;

	let mut source = root.source.clone();
	source.clear_pointers();
	source.set(field::NUMBER_OF_VERTEXES, acc.vertices.len() as i64)?;
	source.set(field::NUMBER_OF_PRIMITIVES, acc.primitives.len() as i64)?;

	debug!(
		objects = root.object_count(),
		vertices_in = root.vertex_count(),
		vertices_out = acc.vertices.len(),
		primitives = acc.primitives.len(),
		"flattened model"
	);

	Ok(Object {
		name: root.name.clone(),
		x_offset: root.x_offset,
		y_offset: root.y_offset,
		z_offset: root.z_offset,
		vertices: acc.vertices,
		primitives: acc.primitives,
		children: Vec::new(),
		source,
	})
}

#[derive(Default)]
struct Accumulator {
	vertices: Vec<Vertex>,
	primitives: Vec<Primitive>,
	positions: HashMap<(i32, i32, i32), usize>,
}

impl Accumulator {
	fn append(&mut self, object: &Object, offset: [i64; 3]) -> Result<()> {
		let mut remap = Vec::with_capacity(object.vertices.len());
		for vertex in &object.vertices {
			let xyz = (
				translate("x", vertex.x, offset[0])?,
				translate("y", vertex.y, offset[1])?,
				translate("z", vertex.z, offset[2])?,
			);
			let next = self.vertices.len();
			let idx = match self.positions.entry(xyz) {
				Entry::Occupied(entry) => *entry.get(),
				Entry::Vacant(entry) => {
					self.vertices.push(Vertex::new(xyz.0, xyz.1, xyz.2));
					*entry.insert(next)
				}
			};
			remap.push(idx);
		}

		for primitive in &object.primitives {
			let mut vertex_indices = Vec::with_capacity(primitive.vertex_indices.len());
			for &index in &primitive.vertex_indices {
				let Some(&target) = remap.get(usize::from(index)) else {
					return Err(ModelError::VertexIndexOutOfRange {
						object: object.name.clone(),
						index,
						count: object.vertices.len(),
					});
				};
				vertex_indices.push(u16::try_from(target).map_err(|_| ModelError::IntegerRange {
					value: target as i64,
					ty: IntType::U16,
					min: IntType::U16.min(),
					max: IntType::U16.max(),
				})?);
			}

			let mut source = primitive.source.clone();
			source.clear_pointers();
			source.set(field::NUMBER_OF_VERTEX_INDEXES, vertex_indices.len() as i64)?;
			self.primitives.push(Primitive {
				texture_name: primitive.texture_name.clone(),
				vertex_indices,
				source,
			});
		}

		trace!(name = %object.name, x = offset[0], y = offset[1], z = offset[2], "flattened object");

		for child in &object.children {
			let child_offset = [
				offset[0].saturating_add(i64::from(child.x_offset)),
				offset[1].saturating_add(i64::from(child.y_offset)),
				offset[2].saturating_add(i64::from(child.z_offset)),
			];
			self.append(child, child_offset)?;
		}
		Ok(())
	}
}

fn translate(axis: &'static str, value: i32, offset: i64) -> Result<i32> {
	i32::try_from(i64::from(value).saturating_add(offset)).map_err(|_| ModelError::CoordinateOverflow { axis, value, offset })
}
