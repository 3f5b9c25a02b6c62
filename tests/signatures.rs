use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use strata::{EntityId, EntityType};

fn id(slot: u32) -> EntityId {
    EntityId::new(slot, 0)
}

fn hash_of(kind: &EntityType) -> u64 {
    let mut hasher = DefaultHasher::new();
    kind.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn construction_sorts_ids() {
    let kind = EntityType::new(vec![id(9), id(2), id(5)]);
    let sorted = kind.ids().to_vec();
    let mut expected = sorted.clone();
    expected.sort();
    assert_eq!(sorted, expected);
    assert_eq!(kind.len(), 3);
}

#[test]
fn identity_is_by_content() {
    let a = EntityType::new(vec![id(1), id(2), id(3)]);
    let b = EntityType::new(vec![id(3), id(1), id(2)]);
    let c = EntityType::new(vec![id(1), id(2)]);
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
    assert_ne!(a, c);
}

#[test]
fn has_finds_members_only() {
    let kind = EntityType::new(vec![id(1), id(4)]);
    assert!(kind.has(id(1)));
    assert!(kind.has(id(4)));
    assert!(!kind.has(id(2)));
}

#[test]
fn has_all_accepts_every_subsequence() {
    let ids = [id(1), id(3), id(5), id(8)];
    let kind = EntityType::new(ids.to_vec());

    // Every subset of a signature's ids is contained in it.
    for bits in 0u32..16 {
        let subset: Vec<EntityId> = ids
            .iter()
            .enumerate()
            .filter(|(i, _)| bits & (1 << i) != 0)
            .map(|(_, &component)| component)
            .collect();
        assert!(kind.has_all(&EntityType::new(subset)), "subset {bits:#b}");
    }
}

#[test]
fn has_all_rejects_foreign_ids() {
    let kind = EntityType::new(vec![id(1), id(3), id(5)]);
    assert!(!kind.has_all(&EntityType::new(vec![id(2)])));
    assert!(!kind.has_all(&EntityType::new(vec![id(1), id(2)])));
    assert!(!kind.has_all(&EntityType::new(vec![id(1), id(3), id(5), id(7)])));
}

#[test]
fn empty_signature_is_contained_in_everything() {
    let empty = EntityType::empty();
    let kind = EntityType::new(vec![id(2)]);
    assert!(kind.has_all(&empty));
    assert!(empty.has_all(&empty));
    assert!(!empty.has_all(&kind));
}

#[test]
fn with_and_without_step_between_neighboring_signatures() {
    let kind = EntityType::new(vec![id(2), id(7)]);
    let grown = kind.with(id(4));
    assert_eq!(grown, EntityType::new(vec![id(2), id(4), id(7)]));
    assert!(grown.has_all(&kind));

    let shrunk = grown.without(id(2));
    assert_eq!(shrunk, EntityType::new(vec![id(4), id(7)]));
    assert!(!shrunk.has(id(2)));
}
