//! Grouping of markers by the issue they reference.

use std::collections::BTreeMap;

use crate::marker::Marker;

/// All markers referencing one issue, in rendering order.
///
/// Never empty: an issue without markers has no group at all.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarkerGroup(Vec<Marker>);

impl MarkerGroup {
	/// Ordered by `(source_path, line_number)`, with the line number compared in its string form.
	/// So `a.py:10` comes before `a.py:2`.
	fn sorted(mut markers: Vec<Marker>) -> Self {
		debug_assert!(!markers.is_empty(), "marker group must not be empty");
		markers.sort_by_cached_key(|m| (m.source_path.clone(), m.line_number.to_string()));
		Self(markers)
	}

	pub fn markers(&self) -> &[Marker] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
		self.0.iter()
	}
}

impl<'a> IntoIterator for &'a MarkerGroup {
	type IntoIter = std::slice::Iter<'a, Marker>;
	type Item = &'a Marker;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

/// Markers grouped by issue number, iterated in ascending issue order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MarkerIndex {
	groups: BTreeMap<u64, MarkerGroup>,
}

impl MarkerIndex {
	/// Group markers by issue. Identical markers are kept as-is, so they render twice.
	pub fn from_markers(markers: impl IntoIterator<Item = Marker>) -> Self {
		let mut buckets: BTreeMap<u64, Vec<Marker>> = BTreeMap::new();
		for marker in markers {
			buckets.entry(marker.issue_number).or_default().push(marker);
		}
		let groups = buckets.into_iter().map(|(issue, markers)| (issue, MarkerGroup::sorted(markers))).collect();
		Self { groups }
	}

	pub fn get(&self, issue_number: u64) -> Option<&MarkerGroup> {
		self.groups.get(&issue_number)
	}

	pub fn contains(&self, issue_number: u64) -> bool {
		self.groups.contains_key(&issue_number)
	}

	pub fn issue_numbers(&self) -> impl Iterator<Item = u64> + '_ {
		self.groups.keys().copied()
	}

	pub fn iter(&self) -> impl Iterator<Item = (u64, &MarkerGroup)> {
		self.groups.iter().map(|(number, group)| (*number, group))
	}

	pub fn len(&self) -> usize {
		self.groups.len()
	}

	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}
}

impl FromIterator<Marker> for MarkerIndex {
	fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
		Self::from_markers(iter)
	}
}
