use std::path::PathBuf;

use serde::Serialize;
use threedo::codec::{
	ByteRegion, Cursor, DecodeOptions, OBJECT_SCHEMA, PRIMITIVE_SCHEMA, RegionGroup, RegionKind, Result, VERTEX_SCHEMA, analyze, read_record, trailing_gap,
};

use crate::cmd::util::{emit_json, load_model};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Show decoded content of every area.
	#[arg(long)]
	pub data: bool,
	/// Skip vertex-index range checks while decoding.
	#[arg(long)]
	pub lenient: bool,
	#[arg(long)]
	pub json: bool,
}

#[derive(Serialize)]
struct MapJson {
	path: String,
	file_size: usize,
	groups: Vec<GroupJson>,
}

#[derive(Serialize)]
struct GroupJson {
	kind: &'static str,
	start: usize,
	end: usize,
	len: usize,
	areas: Vec<AreaJson>,
}

#[derive(Serialize)]
struct AreaJson {
	offset: usize,
	length: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	data: Option<AreaDataJson>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum AreaDataJson {
	Record { fields: Vec<FieldJson> },
	Text { text: String },
	Indices { indices: Vec<u16> },
}

#[derive(Serialize)]
struct FieldJson {
	name: &'static str,
	value: i64,
}

/// Print the analyzed file map: grouped regions plus unattributed gaps.
pub fn run(args: Args) -> Result<()> {
	let Args { path, data, lenient, json } = args;

	let options = if lenient { DecodeOptions::lenient() } else { DecodeOptions::default() };
	let (bytes, parsed) = load_model(&path, &options)?;

	let mut groups = analyze(&parsed.regions);
	if let Some(gap) = trailing_gap(&groups, bytes.len()) {
		groups.push(RegionGroup {
			kind: gap.kind,
			areas: vec![gap],
		});
	}

	let mut rows = Vec::with_capacity(groups.len());
	for group in &groups {
		let mut areas = Vec::with_capacity(group.areas.len());
		for area in &group.areas {
			areas.push(AreaJson {
				offset: area.offset,
				length: area.length,
				data: if data { area_data(&bytes, area)? } else { None },
			});
		}
		rows.push(GroupJson {
			kind: group.kind.as_str(),
			start: group.start(),
			end: group.end(),
			len: group.len(),
			areas,
		});
	}

	if json {
		emit_json(&MapJson {
			path: path.display().to_string(),
			file_size: bytes.len(),
			groups: rows,
		});
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("file_size: {}", bytes.len());
	for group in &rows {
		println!("{} {}..{} ({} bytes)", group.kind, group.start, group.end, group.len);
		for area in &group.areas {
			println!("  {}..{}", area.offset, area.offset + area.length);
			match &area.data {
				Some(AreaDataJson::Record { fields }) => {
					for field in fields {
						println!("    {} = {}", field.name, field.value);
					}
				}
				Some(AreaDataJson::Text { text }) => println!("    {text:?}"),
				Some(AreaDataJson::Indices { indices }) => println!("    {indices:?}"),
				None => {}
			}
		}
	}

	Ok(())
}

fn area_data(bytes: &[u8], area: &ByteRegion) -> Result<Option<AreaDataJson>> {
	let schema = match area.kind {
		RegionKind::Object => &OBJECT_SCHEMA,
		RegionKind::Vertices => &VERTEX_SCHEMA,
		RegionKind::Primitive => &PRIMITIVE_SCHEMA,
		RegionKind::ObjectName | RegionKind::TextureName => {
			let end = area.end().saturating_sub(1).max(area.offset);
			let text = bytes.get(area.offset..end).unwrap_or_default().iter().map(|byte| char::from(*byte)).collect();
			return Ok(Some(AreaDataJson::Text { text }));
		}
		RegionKind::VertexIndices => {
			let mut cursor = Cursor::at(bytes, area.offset);
			let mut indices = Vec::with_capacity(area.length / 2);
			while cursor.pos() < area.end() {
				indices.push(cursor.read_u16_le()?);
			}
			return Ok(Some(AreaDataJson::Indices { indices }));
		}
		RegionKind::UnknownGap => return Ok(None),
	};

	let mut fields = Vec::with_capacity(schema.fields().len());
	let mut offset = area.offset;
	while offset < area.end() {
		let record = read_record(bytes, offset, schema)?;
		fields.extend(record.iter().map(|(def, value)| FieldJson { name: def.name, value }));
		offset += schema.size();
	}
	Ok(Some(AreaDataJson::Record { fields }))
}
