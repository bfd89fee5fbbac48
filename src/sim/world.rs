//! Entity registry
//!
//! Insertion-ordered storage with identity-based removal. Update passes
//! iterate over a snapshot of ids ([`World::ids`]) and re-check liveness, so
//! an entity may remove itself (or others) mid-pass.

use rand_pcg::Pcg32;

use super::entity::{Entity, EntityId, EntityTag};
use crate::audio::AudioManager;

#[derive(Debug)]
pub struct World {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Append an entity, assigning it a fresh id
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.assign_id(id);
        self.entities.push(entity);
        id
    }

    /// Remove by identity; `None` if already gone
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id() == id)?;
        Some(self.entities.remove(idx))
    }

    /// Remove every entity with `tag`, keeping the order of the rest
    pub fn remove_all_of_kind(&mut self, tag: EntityTag) -> Vec<Entity> {
        let (removed, kept) = std::mem::take(&mut self.entities)
            .into_iter()
            .partition(|e| e.tag() == tag);
        self.entities = kept;
        removed
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.iter().any(|e| e.id() == id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    /// Snapshot of live ids in insertion order
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(Entity::id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn as_mut_slice(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count_of(&self, tag: EntityTag) -> usize {
        self.entities.iter().filter(|e| e.tag() == tag).count()
    }
}

/// Narrow world handle given to the director.
///
/// Every removal goes through here so each removed entity releases its
/// sounds exactly once.
pub struct Stage<'a> {
    pub world: &'a mut World,
    pub audio: &'a mut AudioManager,
    pub rng: &'a mut Pcg32,
}

impl<'a> Stage<'a> {
    pub fn new(world: &'a mut World, audio: &'a mut AudioManager, rng: &'a mut Pcg32) -> Self {
        Self { world, audio, rng }
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.world.add(entity)
    }

    /// Returns false if the entity was already gone
    pub fn despawn(&mut self, id: EntityId) -> bool {
        match self.world.remove(id) {
            Some(mut entity) => {
                entity.release_sounds(self.audio);
                true
            }
            None => false,
        }
    }

    pub fn despawn_all(&mut self, tag: EntityTag) -> usize {
        let removed = self.world.remove_all_of_kind(tag);
        let count = removed.len();
        for mut entity in removed {
            entity.release_sounds(self.audio);
        }
        count
    }

    pub fn count(&self, tag: EntityTag) -> usize {
        self.world.count_of(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::hud::{HudElement, Message};

    #[test]
    fn test_ids_unique_and_ordered() {
        let mut world = World::new();
        let a = world.add(HudElement::score_counter());
        let b = world.add(HudElement::lives_counter());
        let c = world.add(Message::new("a", "b").into_entity());
        assert!(a < b && b < c);
        assert_eq!(world.ids(), vec![a, b, c]);

        assert!(world.remove(b).is_some());
        assert!(world.remove(b).is_none());
        assert_eq!(world.ids(), vec![a, c]);

        // Ids are never reused
        let d = world.add(HudElement::lives_counter());
        assert!(d > c);
    }

    #[test]
    fn test_remove_all_of_kind_keeps_order() {
        let mut world = World::new();
        let m1 = world.add(Message::new("1", "").into_entity());
        let score = world.add(HudElement::score_counter());
        let m2 = world.add(Message::new("2", "").into_entity());
        let lives = world.add(HudElement::lives_counter());

        let removed = world.remove_all_of_kind(EntityTag::Message);
        let removed_ids: Vec<EntityId> = removed.iter().map(Entity::id).collect();
        assert_eq!(removed_ids, vec![m1, m2]);
        assert_eq!(world.ids(), vec![score, lives]);
        assert_eq!(world.count_of(EntityTag::Message), 0);
    }
}
