//! Entity identifiers

use std::collections::BTreeSet;

use thiserror::Error;

/// Opaque identity a camera (or anything else) can be keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u32);

impl Entity {
    pub fn id(&self) -> u32 {
        self.0
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityError {
    #[error("entity {0} was never allocated")]
    NotAllocated(u32),
    #[error("entity {0} is already discarded")]
    AlreadyDiscarded(u32),
    #[error("entity id space exhausted")]
    Exhausted,
}

/// Monotonic allocator with a discard set.
///
/// Ids are handed out in increasing order; a discarded id is reused (lowest
/// first) before the counter advances.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    next: u32,
    discarded: BTreeSet<u32>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> Result<Entity, EntityError> {
        if let Some(id) = self.discarded.pop_first() {
            return Ok(Entity(id));
        }
        let id = self.next;
        self.next = self.next.checked_add(1).ok_or(EntityError::Exhausted)?;
        Ok(Entity(id))
    }

    pub fn discard(&mut self, entity: Entity) -> Result<(), EntityError> {
        if entity.0 >= self.next {
            return Err(EntityError::NotAllocated(entity.0));
        }
        if !self.discarded.insert(entity.0) {
            return Err(EntityError::AlreadyDiscarded(entity.0));
        }
        log::trace!("Discarded entity {}", entity.0);
        Ok(())
    }

    pub fn is_live(&self, entity: Entity) -> bool {
        entity.0 < self.next && !self.discarded.contains(&entity.0)
    }

    pub fn live_count(&self) -> usize {
        self.next as usize - self.discarded.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_is_monotonic() {
        let mut entities = EntityAllocator::new();
        let ids: Vec<_> = (0..4).map(|_| entities.create().unwrap().id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(entities.live_count(), 4);
    }

    #[test]
    fn test_discarded_ids_are_reused() {
        let mut entities = EntityAllocator::new();
        let a = entities.create().unwrap();
        let b = entities.create().unwrap();
        entities.discard(a).unwrap();
        assert!(!entities.is_live(a));
        assert!(entities.is_live(b));

        let c = entities.create().unwrap();
        assert_eq!(c, a);
        assert!(entities.is_live(c));
        assert_eq!(entities.create().unwrap().id(), 2);
    }

    #[test]
    fn test_discard_errors() {
        let mut entities = EntityAllocator::new();
        let a = entities.create().unwrap();
        assert_eq!(
            entities.discard(Entity(5)),
            Err(EntityError::NotAllocated(5))
        );
        entities.discard(a).unwrap();
        assert_eq!(entities.discard(a), Err(EntityError::AlreadyDiscarded(0)));
    }
}
