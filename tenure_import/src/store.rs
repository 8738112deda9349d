//! Persistence of imported entities.

use crate::model::{Attributes, CoreFields, EntityId, EntityType, MaterializedEntity};
use anyhow::{Result, bail, ensure};
use std::collections::BTreeMap;
use tenure_geometry::Geometry;

/// Transactional entity storage.
///
/// All creates of a run happen between `begin` and either `commit` or
/// `rollback`. Nothing created inside a rolled back transaction may remain.
pub trait EntityStore {
	fn begin(&mut self) -> Result<()>;
	fn commit(&mut self) -> Result<()>;
	fn rollback(&mut self) -> Result<()>;

	fn create_party(&mut self, name: &str, party_type: Option<&str>, attributes: Attributes) -> Result<EntityId>;
	fn create_location(
		&mut self,
		geometry: Option<Geometry>,
		location_type: Option<&str>,
		attributes: Attributes,
	) -> Result<EntityId>;
	fn create_relationship(
		&mut self,
		party: EntityId,
		location: EntityId,
		tenure_type: Option<&str>,
		attributes: Attributes,
	) -> Result<EntityId>;

	/// Looks up an entity, including ones created in the open transaction.
	fn get(&self, entity_type: EntityType, id: EntityId) -> Result<Option<MaterializedEntity>>;
}

/// Entity store kept in memory. Writes are staged until commit.
#[derive(Debug, Default)]
pub struct MemoryStore {
	committed: BTreeMap<EntityId, MaterializedEntity>,
	staged: Option<BTreeMap<EntityId, MaterializedEntity>>,
	next_id: u64,
}

impl MemoryStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of committed entities of a type.
	#[must_use]
	pub fn count(&self, entity_type: EntityType) -> usize {
		self.committed.values().filter(|e| e.entity_type() == entity_type).count()
	}

	/// Committed entities of a type, in creation order.
	pub fn entities(&self, entity_type: EntityType) -> impl Iterator<Item = (EntityId, &MaterializedEntity)> {
		self
			.committed
			.iter()
			.filter(move |(_, e)| e.entity_type() == entity_type)
			.map(|(id, e)| (*id, e))
	}

	#[must_use]
	pub fn in_transaction(&self) -> bool {
		self.staged.is_some()
	}

	fn insert(&mut self, core: CoreFields, attributes: Attributes) -> Result<EntityId> {
		let Some(staged) = self.staged.as_mut() else {
			bail!("no open transaction");
		};
		self.next_id += 1;
		let id = EntityId(self.next_id);
		staged.insert(id, MaterializedEntity { core, attributes });
		Ok(id)
	}
}

impl EntityStore for MemoryStore {
	fn begin(&mut self) -> Result<()> {
		ensure!(self.staged.is_none(), "transaction already open");
		self.staged = Some(BTreeMap::new());
		Ok(())
	}

	fn commit(&mut self) -> Result<()> {
		let Some(staged) = self.staged.take() else {
			bail!("no open transaction");
		};
		self.committed.extend(staged);
		Ok(())
	}

	fn rollback(&mut self) -> Result<()> {
		ensure!(self.staged.take().is_some(), "no open transaction");
		Ok(())
	}

	fn create_party(&mut self, name: &str, party_type: Option<&str>, attributes: Attributes) -> Result<EntityId> {
		self.insert(
			CoreFields::Party {
				name: name.to_string(),
				party_type: party_type.map(String::from),
			},
			attributes,
		)
	}

	fn create_location(
		&mut self,
		geometry: Option<Geometry>,
		location_type: Option<&str>,
		attributes: Attributes,
	) -> Result<EntityId> {
		self.insert(
			CoreFields::Location {
				geometry,
				location_type: location_type.map(String::from),
			},
			attributes,
		)
	}

	fn create_relationship(
		&mut self,
		party: EntityId,
		location: EntityId,
		tenure_type: Option<&str>,
		attributes: Attributes,
	) -> Result<EntityId> {
		ensure!(
			self.get(EntityType::Party, party)?.is_some(),
			"party {party} does not exist"
		);
		ensure!(
			self.get(EntityType::Location, location)?.is_some(),
			"location {location} does not exist"
		);
		self.insert(
			CoreFields::TenureRelationship {
				party,
				location,
				tenure_type: tenure_type.map(String::from),
			},
			attributes,
		)
	}

	fn get(&self, entity_type: EntityType, id: EntityId) -> Result<Option<MaterializedEntity>> {
		let entity = self
			.staged
			.as_ref()
			.and_then(|staged| staged.get(&id))
			.or_else(|| self.committed.get(&id));
		Ok(entity.filter(|e| e.entity_type() == entity_type).cloned())
	}
}
