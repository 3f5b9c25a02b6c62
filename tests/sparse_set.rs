use strata::engine::sparse::SparseSet;
use strata::engine::types::Row;

#[test]
fn add_then_get_and_has() {
    let mut set: SparseSet<Row, &str> = SparseSet::new();
    set.add(3, "three");
    set.add(7, "seven");

    assert_eq!(set.len(), 2);
    assert!(set.has(3));
    assert!(set.has(7));
    assert!(!set.has(0));
    assert_eq!(set.get(3), Some(&"three"));
    assert_eq!(set.get(7), Some(&"seven"));
    assert_eq!(set.get(5), None);
}

#[test]
fn get_mut_updates_in_place() {
    let mut set: SparseSet<Row, i32> = SparseSet::new();
    set.add(2, 10);
    *set.get_mut(2).unwrap() += 5;
    assert_eq!(set.get(2), Some(&15));
}

#[test]
fn remove_makes_key_absent() {
    let mut set: SparseSet<Row, i32> = SparseSet::new();
    set.add(1, 100);
    set.remove(1);
    assert!(!set.has(1));
    assert_eq!(set.get(1), None);
    assert_eq!(set.len(), 0);
}

#[test]
fn remove_of_absent_key_is_noop() {
    let mut set: SparseSet<Row, i32> = SparseSet::new();
    set.add(1, 100);
    set.remove(9);
    set.remove(10_000);
    assert_eq!(set.len(), 1);
    assert_eq!(set.get(1), Some(&100));
}

#[test]
fn removing_sole_element_triggers_no_relocation() {
    let mut set: SparseSet<Row, i32> = SparseSet::new();
    set.add(4, 40);

    let mut moves = Vec::new();
    set.remove_with(4, |from, to| moves.push((from, to)));

    assert!(moves.is_empty());
    assert_eq!(set.len(), 0);
}

#[test]
fn removing_last_element_triggers_no_relocation() {
    let mut set: SparseSet<Row, i32> = SparseSet::new();
    set.add(0, 0);
    set.add(1, 10);
    set.add(2, 20);

    let mut moves = Vec::new();
    set.remove_with(2, |from, to| moves.push((from, to)));

    assert!(moves.is_empty());
    assert_eq!(set.len(), 2);
    assert_eq!(set.get(0), Some(&0));
    assert_eq!(set.get(1), Some(&10));
}

#[test]
fn removing_non_last_element_relocates_exactly_once() {
    let mut set: SparseSet<Row, i32> = SparseSet::new();
    set.add(0, 0);
    set.add(1, 10);
    set.add(2, 20);

    let mut moves = Vec::new();
    set.remove_with(0, |from, to| moves.push((from, to)));

    // The prior-last dense slot (2) was swapped into the vacated slot (0).
    assert_eq!(moves, vec![(2, 0)]);
    assert!(!set.has(0));
    assert_eq!(set.get(1), Some(&10));
    assert_eq!(set.get(2), Some(&20));
    assert_eq!(set.key_at(0), 2);
}

#[test]
fn values_survive_interleaved_removals() {
    let mut set: SparseSet<Row, i32> = SparseSet::new();
    for key in 0..16 {
        set.add(key, key as i32 * 100);
    }
    for key in (0..16).step_by(2) {
        set.remove(key);
    }
    assert_eq!(set.len(), 8);
    for key in (1..16).step_by(2) {
        assert_eq!(set.get(key), Some(&(key as i32 * 100)), "key {key}");
    }
}

#[test]
fn tables_grow_geometrically_past_initial_capacity() {
    let mut set: SparseSet<Row, usize> = SparseSet::new();
    for key in 0..1000 {
        set.add(key, key as usize);
    }
    assert_eq!(set.len(), 1000);
    assert_eq!(set.get(999), Some(&999));

    // A sparse key far past the dense count only grows the forward table.
    set.add(100_000, 1);
    assert!(set.has(100_000));
    assert_eq!(set.len(), 1001);
}

#[test]
fn dense_order_is_scan_order() {
    let mut set: SparseSet<Row, char> = SparseSet::new();
    set.add(5, 'a');
    set.add(9, 'b');
    set.add(1, 'c');

    let keys: Vec<Row> = (0..set.len()).map(|slot| set.key_at(slot)).collect();
    assert_eq!(keys, vec![5, 9, 1]);
    assert_eq!(*set.value_at(1), 'b');
}

#[test]
fn pair_access_returns_disjoint_views() {
    let mut set: SparseSet<Row, i32> = SparseSet::new();
    set.add(1, 10);
    set.add(2, 20);

    let (a, b) = set.get_pair_mut(1, 2);
    *a.unwrap() += 1;
    *b.unwrap() += 2;
    assert_eq!(set.get(1), Some(&11));
    assert_eq!(set.get(2), Some(&22));

    let (present, absent) = set.get_pair_mut(1, 7);
    assert!(present.is_some());
    assert!(absent.is_none());
}
