use crate::model::{EntityId, EntityType};
use std::collections::HashMap;

/// External ids seen during one import run and the entities created for them.
///
/// Lives exactly as long as one run. The first row with a given id wins.
#[derive(Debug, Default)]
pub struct DedupContext {
	parties: HashMap<String, EntityId>,
	locations: HashMap<String, EntityId>,
}

impl DedupContext {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	fn table(&self, entity_type: EntityType) -> Option<&HashMap<String, EntityId>> {
		match entity_type {
			EntityType::Party => Some(&self.parties),
			EntityType::Location => Some(&self.locations),
			EntityType::TenureRelationship => None,
		}
	}

	/// The entity created earlier for `external_id`. Empty ids never match and
	/// relationships are never deduplicated.
	#[must_use]
	pub fn lookup(&self, entity_type: EntityType, external_id: &str) -> Option<EntityId> {
		if external_id.is_empty() {
			return None;
		}
		self.table(entity_type)?.get(external_id).copied()
	}

	pub fn record(&mut self, entity_type: EntityType, external_id: &str, id: EntityId) {
		if external_id.is_empty() {
			return;
		}
		let table = match entity_type {
			EntityType::Party => &mut self.parties,
			EntityType::Location => &mut self.locations,
			EntityType::TenureRelationship => return,
		};
		table.entry(external_id.to_string()).or_insert(id);
	}

	#[must_use]
	pub fn len(&self, entity_type: EntityType) -> usize {
		self.table(entity_type).map_or(0, HashMap::len)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn first_seen_wins() {
		let mut dedup = DedupContext::new();
		dedup.record(EntityType::Party, "p1", EntityId(1));
		dedup.record(EntityType::Party, "p1", EntityId(2));
		assert_eq!(dedup.lookup(EntityType::Party, "p1"), Some(EntityId(1)));
		assert_eq!(dedup.lookup(EntityType::Location, "p1"), None);
		assert_eq!(dedup.len(EntityType::Party), 1);
	}

	#[test]
	fn empty_ids_and_relationships_are_ignored() {
		let mut dedup = DedupContext::new();
		dedup.record(EntityType::Location, "", EntityId(1));
		dedup.record(EntityType::TenureRelationship, "r1", EntityId(2));
		assert_eq!(dedup.lookup(EntityType::Location, ""), None);
		assert_eq!(dedup.lookup(EntityType::TenureRelationship, "r1"), None);
		assert_eq!(dedup.len(EntityType::Location), 0);
		assert_eq!(dedup.len(EntityType::TenureRelationship), 0);
	}
}
