//! The world: every wall and room in the floorplan, in draw order.

use crate::error::{FloorplanError, FloorplanResult};
use crate::objects::{Entity, EntityId, Room, RoomId, Wall, WallId};
use crate::rooms;
use crate::viewport::Cell;
use std::collections::HashMap;

/// All entities of the floorplan.
///
/// Insertion order is draw order. Wall and room ids come from two
/// independent monotonic counters owned here.
#[derive(Debug, Clone, Default)]
pub struct World {
    /// All entities, keyed by id.
    entities: HashMap<EntityId, Entity>,
    /// Draw order (back to front).
    z_order: Vec<EntityId>,
    next_wall_id: u32,
    next_room_id: u32,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a world from existing entities, in the given order.
    ///
    /// Counters start past the largest id already present.
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut world = Self::new();
        for entity in entities {
            world.insert(entity);
        }
        world
    }

    /// Take the next wall id.
    pub fn allocate_wall_id(&mut self) -> WallId {
        let id = WallId(self.next_wall_id);
        self.next_wall_id = self.next_wall_id.saturating_add(1);
        id
    }

    /// Take the next room id.
    pub fn allocate_room_id(&mut self) -> RoomId {
        let id = RoomId(self.next_room_id);
        self.next_room_id = self.next_room_id.saturating_add(1);
        id
    }

    /// Add an entity on top of the draw order.
    ///
    /// An entity with the same id is replaced and keeps its draw position.
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        match id {
            EntityId::Wall(WallId(n)) => self.next_wall_id = self.next_wall_id.max(n.saturating_add(1)),
            EntityId::Room(RoomId(n)) => self.next_room_id = self.next_room_id.max(n.saturating_add(1)),
        }
        if self.entities.insert(id, entity).is_none() {
            self.z_order.push(id);
        }
        id
    }

    /// Remove an entity without touching the room graph.
    ///
    /// Walls should leave through [`World::remove_wall`] so that the rooms they
    /// bordered are destroyed too.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.z_order.retain(|&entity_id| entity_id != id);
        self.entities.remove(&id)
    }

    /// Remove a wall, destroying every room it bordered first.
    pub fn remove_wall(&mut self, id: WallId) -> FloorplanResult<Wall> {
        self.wall(id)?;
        rooms::wall_destroyed(self, id);
        match self.remove(id.into()) {
            Some(Entity::Wall(wall)) => Ok(wall),
            _ => Err(FloorplanError::UnknownEntity(id.into())),
        }
    }

    /// Get an entity by id.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get a mutable reference to an entity by id.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: impl Into<EntityId>) -> bool {
        self.entities.contains_key(&id.into())
    }

    /// Look up an entity that must be a wall.
    pub fn wall(&self, id: impl Into<EntityId>) -> FloorplanResult<&Wall> {
        let id = id.into();
        let entity = self.get(id).ok_or(FloorplanError::UnknownEntity(id))?;
        entity.as_wall().ok_or_else(|| {
            log::warn!("Wall operation requested on {id}");
            FloorplanError::NotAWall(id)
        })
    }

    /// Mutable variant of [`World::wall`].
    pub fn wall_mut(&mut self, id: impl Into<EntityId>) -> FloorplanResult<&mut Wall> {
        let id = id.into();
        let entity = self.get_mut(id).ok_or(FloorplanError::UnknownEntity(id))?;
        entity.as_wall_mut().ok_or_else(|| {
            log::warn!("Wall operation requested on {id}");
            FloorplanError::NotAWall(id)
        })
    }

    /// Look up an entity that must be a room.
    pub fn room(&self, id: impl Into<EntityId>) -> FloorplanResult<&Room> {
        let id = id.into();
        let entity = self.get(id).ok_or(FloorplanError::UnknownEntity(id))?;
        entity.as_room().ok_or_else(|| {
            log::warn!("Room operation requested on {id}");
            FloorplanError::NotARoom(id)
        })
    }

    /// Mutable variant of [`World::room`].
    pub fn room_mut(&mut self, id: impl Into<EntityId>) -> FloorplanResult<&mut Room> {
        let id = id.into();
        let entity = self.get_mut(id).ok_or(FloorplanError::UnknownEntity(id))?;
        entity.as_room_mut().ok_or_else(|| {
            log::warn!("Room operation requested on {id}");
            FloorplanError::NotARoom(id)
        })
    }

    /// Change the label of a room.
    pub fn rename_room(&mut self, id: RoomId, name: impl Into<String>) -> FloorplanResult<()> {
        let room = self.room_mut(id)?;
        room.name = name.into();
        log::debug!("Renamed {id} to {:?}", room.name);
        Ok(())
    }

    /// Snapshot of the draw order.
    ///
    /// Dispatch iterates this copy so entities may leave the world mid-pass.
    pub fn ids_ordered(&self) -> Vec<EntityId> {
        self.z_order.clone()
    }

    /// Entities in draw order (back to front).
    pub fn entities_ordered(&self) -> impl Iterator<Item = &Entity> {
        self.z_order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Walls in draw order.
    pub fn walls(&self) -> impl Iterator<Item = &Wall> {
        self.entities_ordered().filter_map(Entity::as_wall)
    }

    /// Every wall, in no particular order.
    pub(crate) fn walls_mut(&mut self) -> impl Iterator<Item = &mut Wall> {
        self.entities.values_mut().filter_map(Entity::as_wall_mut)
    }

    /// Rooms in draw order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.entities_ordered().filter_map(Entity::as_room)
    }

    /// Walls with an endpoint on the given cell.
    pub fn walls_at(&self, cell: Cell) -> Vec<WallId> {
        self.walls()
            .filter(|wall| wall.touches(cell))
            .map(Wall::id)
            .collect()
    }

    pub fn wall_count(&self) -> usize {
        self.walls().count()
    }

    pub fn room_count(&self) -> usize {
        self.rooms().count()
    }

    /// Total number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
