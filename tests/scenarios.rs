use threaded_avl::{Cursor, Error, Map};

fn keys<V>(map: &Map<i32, V>) -> Vec<i32> {
    let mut keys = vec![];
    let mut cursor = map.begin();

    while cursor != map.end() {
        keys.push(*cursor.get(map).unwrap().0);
        cursor = cursor.next(map).unwrap();
    }

    keys
}

fn filled(keys: &[i32]) -> Map<i32, String> {
    let mut map = Map::new();
    for &key in keys { map.insert(key, key.to_string()); }
    map
}

#[test]
fn iteration_is_sorted_regardless_of_insertion_order() {
    let map = filled(&[10, 20, 30, 40, 50, 25]);
    assert_eq!(keys(&map), [10, 20, 25, 30, 40, 50]);
    assert!(map.check_invariants().is_ok());
}

#[test]
fn erase_unlinks_found_entry() {
    let mut map = filled(&[10, 20, 30, 40, 50, 25]);

    let cursor = map.find(&20);
    assert_eq!(map.erase(cursor), Ok((20, "20".to_string())));
    assert_eq!(keys(&map), [10, 25, 30, 40, 50]);
    assert_eq!(map.find(&20), map.end());
    assert!(map.check_invariants().is_ok());
}

#[test]
fn inserts_after_erase_stay_balanced() {
    let mut map = filled(&[10, 20, 30, 40, 50, 25]);
    let cursor = map.find(&20);
    map.erase(cursor).unwrap();

    map.insert(5, "5".to_string());
    map.insert(15, "15".to_string());

    assert_eq!(keys(&map), [5, 10, 15, 25, 30, 40, 50]);
    assert!(map.check_invariants().is_ok());
}

#[test]
fn at_missing_key_leaves_map_unchanged() {
    let mut map = filled(&[10, 20, 30, 40, 50, 25]);
    let before = map.clone();

    assert_eq!(map.at(&999), Err(Error::KeyNotFound));
    assert_eq!(map.at_mut(&999), Err(Error::KeyNotFound));
    assert_eq!(map, before);
    assert_eq!(map.len(), 6);
}

#[test]
fn assigned_copy_survives_clearing_source() {
    let mut map2 = filled(&[5, 10, 15, 25, 30, 40, 50]);
    let mut map1 = filled(&[1]);

    map1.clone_from(&map2);
    map2.clear();

    assert!(map2.is_empty());
    assert_eq!(map2.begin(), map2.end());
    assert_eq!(keys(&map1), [5, 10, 15, 25, 30, 40, 50]);
    assert_eq!(map1.iter().rev().map(|e| *e.0).collect::<Vec<_>>(), [50, 40, 30, 25, 15, 10, 5]);
    assert!(map1.check_invariants().is_ok());
}

#[test]
fn copy_survives_clearing_source() {
    let mut source = filled(&[3, 1, 2]);
    let copy = source.clone();
    source.clear();

    assert_eq!(keys(&copy), [1, 2, 3]);
    assert_eq!(copy.at(&2).map(String::as_str), Ok("2"));
}

#[test]
fn subscript_inserts_default_then_updates() {
    let mut map: Map<i32, i32> = Map::new();

    assert_eq!(*map.get_or_insert_default(7), 0);
    *map.get_or_insert_default(7) = 70;
    *map.get_or_insert_default(3) += 1;

    assert_eq!(map.len(), 2);
    assert_eq!(map[&7], 70);
    assert_eq!(map.at(&3), Ok(&1));
}

#[test]
fn empty_map_has_begin_at_end() {
    let mut map: Map<i32, i32> = Map::new();

    assert_eq!(map.len(), 0);
    assert!(map.begin().is_end(&map));
    assert_eq!(map.begin().next(&map), Err(Error::InvalidCursor));
    assert_eq!(map.end().prev(&map), Err(Error::InvalidCursor));
    assert_eq!(map.first(), None);
    assert_eq!(map.pop_last(), None);
    assert_eq!(map.count(&0), 0);

    map.clear();
    assert!(map.check_invariants().is_ok());
}

#[test]
fn stepping_past_either_end_fails() {
    let map = filled(&[1, 2]);

    assert_eq!(map.begin().prev(&map), Err(Error::InvalidCursor));
    assert_eq!(map.end().next(&map), Err(Error::InvalidCursor));
    assert_eq!(map.end().get(&map), Err(Error::InvalidCursor));

    let last = map.end().prev(&map).unwrap();
    assert_eq!(last.get(&map).map(|e| *e.0), Ok(2));
    assert_eq!(last.next(&map), Ok(map.end()));
}

#[test]
fn foreign_cursors_are_rejected() {
    let mut map = filled(&[1, 2, 3]);
    let other = filled(&[1, 2, 3]);
    let foreign: Cursor = other.find(&2);

    assert_ne!(foreign, map.find(&2));
    assert_eq!(foreign.get(&map), Err(Error::InvalidCursor));
    assert_eq!(foreign.next(&map), Err(Error::InvalidCursor));
    assert_eq!(foreign.prev(&map), Err(Error::InvalidCursor));
    assert_eq!(map.erase(foreign), Err(Error::InvalidCursor));
    assert_eq!(keys(&map), [1, 2, 3]);
}

#[test]
fn erasing_end_leaves_map_unchanged() {
    let mut map = filled(&[1, 2, 3]);
    let end = map.end();

    assert_eq!(map.erase(end), Err(Error::InvalidCursor));
    assert_eq!(keys(&map), [1, 2, 3]);
}

#[test]
fn erasing_twice_fails_for_leaf() {
    let mut map = filled(&[2, 1, 3]);
    let leaf = map.find(&3);

    assert!(map.erase(leaf).is_ok());
    assert_eq!(map.erase(leaf), Err(Error::InvalidCursor));
    assert_eq!(keys(&map), [1, 2]);
}

#[test]
fn cursor_mutation_is_visible_through_lookup() {
    let mut map = filled(&[1, 2, 3]);
    let cursor = map.find(&2);

    cursor.get_mut(&mut map).unwrap().1.push('!');
    assert_eq!(map.at(&2).map(String::as_str), Ok("2!"));
}

#[test]
fn ascending_and_descending_runs_stay_balanced() {
    let mut map = Map::new();

    for key in 0..512 { map.insert(key, ()); }
    for key in (512..1024).rev() { map.insert(key, ()); }
    assert!(map.check_invariants().is_ok());
    assert_eq!(map.len(), 1024);

    for key in (0..1024).step_by(3) {
        let cursor = map.find(&key);
        map.erase(cursor).unwrap();
        assert!(map.check_invariants().is_ok());
    }

    assert_eq!(keys(&map), (0..1024).filter(|k| k % 3 != 0).collect::<Vec<_>>());
}
