use std::collections::HashSet;

use crate::codec::{ByteRegion, RegionKind};

/// Run of consecutive same-kind regions in offset order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionGroup {
	/// Shared kind of every area.
	pub kind: RegionKind,
	/// Areas in offset order; never empty.
	pub areas: Vec<ByteRegion>,
}

impl RegionGroup {
	fn gap(offset: usize, length: usize) -> Self {
		Self {
			kind: RegionKind::UnknownGap,
			areas: vec![ByteRegion {
				kind: RegionKind::UnknownGap,
				offset,
				length,
			}],
		}
	}

	/// Offset of the first area.
	pub fn start(&self) -> usize {
		self.areas.first().map_or(0, |area| area.offset)
	}

	/// Furthest end offset over all areas.
	pub fn end(&self) -> usize {
		self.areas.iter().map(ByteRegion::end).max().unwrap_or(0)
	}

	/// Bytes spanned from `start` to `end`.
	pub fn len(&self) -> usize {
		self.end().saturating_sub(self.start())
	}

	/// Whether the group spans no bytes.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Group decoder regions into a file map.
///
/// Regions are sorted by offset (stable), exact duplicates dropped, and runs
/// of the same kind coalesced. Unattributed bytes before the first region or
/// between groups become `unknown-gap` groups.
pub fn analyze(regions: &[ByteRegion]) -> Vec<RegionGroup> {
	let mut sorted = regions.to_vec();
	sorted.sort_by_key(|region| region.offset);

	let mut seen = HashSet::with_capacity(sorted.len());
	sorted.retain(|region| seen.insert(*region));

	let mut groups: Vec<RegionGroup> = Vec::new();
	for region in sorted {
		match groups.last_mut() {
			Some(group) if group.kind == region.kind => group.areas.push(region),
			_ => groups.push(RegionGroup {
				kind: region.kind,
				areas: vec![region],
			}),
		}
	}

	let mut out = Vec::with_capacity(groups.len() * 2);
	let mut prev_end = 0;
	for group in groups {
		let start = group.start();
		if start > prev_end {
			out.push(RegionGroup::gap(prev_end, start - prev_end));
		}
		prev_end = prev_end.max(group.end());
		out.push(group);
	}
	out
}

/// Bytes after the last analyzed group, if the file is longer.
pub fn trailing_gap(groups: &[RegionGroup], file_len: usize) -> Option<ByteRegion> {
	let end = groups.iter().map(RegionGroup::end).max().unwrap_or(0);
	(file_len > end).then_some(ByteRegion {
		kind: RegionKind::UnknownGap,
		offset: end,
		length: file_len - end,
	})
}
