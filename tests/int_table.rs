// IntTable integration suite.
//
// Each test documents the behavior verified. The core invariants exercised:
// - Round-trip: put(k, v) then get(k) yields v.
// - Insert-if-absent keeps the first value and returns it every time.
// - Size accounting: len == distinct inserts - successful removals.
// - Resize preserves every pair, whatever the number of doublings.
// - export_keys/iter yield each present key exactly once.
use chain_maps::{IntTable, IntTableIter};
use std::collections::BTreeSet;

// Test: the documented growth scenario at default capacity.
// Assumes: 64 buckets, threshold 48.
// Verifies: 48 keys fit without growth; the 49th doubles to 128.
#[test]
fn forty_ninth_key_doubles_default_table() {
    let mut t = IntTable::new();
    assert_eq!(t.capacity(), 64);
    for k in 0..48 {
        t.put(k * 3, k).unwrap();
    }
    assert_eq!(t.len(), 48);
    assert_eq!(t.capacity(), 64);

    t.put(1000, 48).unwrap();
    assert_eq!(t.len(), 49);
    assert_eq!(t.capacity(), 128);
    for k in 0..48 {
        assert_eq!(t.get(k * 3), Some(&k));
    }
    assert_eq!(t.get(1000), Some(&48));
}

// Test: resize preserves contents.
// Verifies: for several sizes, every inserted pair reads back after all
// insertions, and capacity ends as the smallest doubling that fits.
#[test]
fn resize_preserves_contents() {
    for n in [17i32, 100, 1000, 100_000] {
        let mut t = IntTable::new();
        for k in 0..n {
            // Spread keys so chains and high bits both matter.
            let key = k.wrapping_mul(0x9E37_79B1u32 as i32);
            assert_eq!(t.put(key, k).unwrap(), None);
        }
        assert_eq!(t.len(), n as usize);
        assert!(t.len() <= t.capacity() / 4 * 3);
        for k in 0..n {
            let key = k.wrapping_mul(0x9E37_79B1u32 as i32);
            assert_eq!(t.get(key), Some(&k), "n={n} key={key}");
        }
    }
}

// Test: upsert overwrites in place.
// Verifies: the replaced value is returned and len is unchanged.
#[test]
fn put_overwrites_and_returns_previous() {
    let mut t = IntTable::new();
    assert_eq!(t.put(1, "a").unwrap(), None);
    assert_eq!(t.put(1, "b").unwrap(), Some("a"));
    assert_eq!(t.len(), 1);
    assert_eq!(t.get(1), Some(&"b"));
}

// Test: insert-if-absent idempotence.
// Verifies: the second call neither mutates nor replaces; both calls
// return the first value.
#[test]
fn put_if_absent_keeps_first_value() {
    let mut t = IntTable::new();
    assert_eq!(*t.put_if_absent(9, 1).unwrap(), 1);
    assert_eq!(*t.put_if_absent(9, 2).unwrap(), 1);
    assert_eq!(t.get(9), Some(&1));
    assert_eq!(t.len(), 1);

    // The returned reference is the stored value.
    *t.put_if_absent(9, 3).unwrap() += 10;
    assert_eq!(t.get(9), Some(&11));
}

// Test: absent keys are not errors.
// Verifies: remove of a missing key is a no-op; get/contains report absence.
#[test]
fn absent_key_operations() {
    let mut t = IntTable::new();
    t.put(1, 1).unwrap();
    assert_eq!(t.remove(2), None);
    assert_eq!(t.len(), 1);
    assert_eq!(t.get(2), None);
    assert!(!t.contains_key(2));
    assert!(t.contains_key(1));
}

// Test: size accounting across inserts, updates and removals.
#[test]
fn size_tracks_distinct_minus_removed() {
    let mut t = IntTable::new();
    for k in 0..200 {
        t.put(k, ()).unwrap();
    }
    for k in 0..200 {
        t.put(k, ()).unwrap();
    }
    assert_eq!(t.len(), 200);
    for k in (0..200).step_by(2) {
        assert_eq!(t.remove(k), Some(()));
        assert_eq!(t.remove(k), None);
    }
    assert_eq!(t.len(), 100);
    assert!(!t.is_empty());
    for k in (1..200).step_by(2) {
        t.remove(k);
    }
    assert!(t.is_empty());
}

// Test: clear after ten entries.
// Verifies: len is 0 and every previously inserted key is absent.
#[test]
fn clear_forgets_everything() {
    let mut t = IntTable::new();
    for k in 0..10 {
        t.put(k, k).unwrap();
    }
    t.clear();
    assert_eq!(t.len(), 0);
    assert!(t.is_empty());
    for k in 0..10 {
        assert_eq!(t.get(k), None);
    }
    assert!(t.export_keys().is_empty());
}

// Test: export completeness.
// Verifies: exported keys are exactly the present keys, once each.
#[test]
fn export_keys_matches_present_set() {
    let mut t = IntTable::with_capacity(16);
    let mut expected = BTreeSet::new();
    for k in -300..300 {
        if k % 3 != 0 {
            t.put(k * 17, ()).unwrap();
            expected.insert(k * 17);
        }
    }
    for k in (-300..300).filter(|k| k % 7 == 0) {
        if t.remove(k * 17).is_some() {
            expected.remove(&(k * 17));
        }
    }
    let keys = t.export_keys();
    assert_eq!(keys.len(), t.len());
    let unique: BTreeSet<i32> = keys.iter().copied().collect();
    assert_eq!(unique.len(), keys.len(), "duplicate key exported");
    assert_eq!(unique, expected);
}

// Test: iteration agrees with export_keys and with lookups.
#[test]
fn iteration_matches_export_order() {
    let mut t = IntTable::new();
    for k in 0..500 {
        t.put(k * 31, k).unwrap();
    }
    let iter_keys: Vec<i32> = t.iter().map(|(k, _)| k).collect();
    assert_eq!(&iter_keys[..], &*t.export_keys());
    let mut it: IntTableIter<'_, i32> = t.iter();
    assert_eq!(it.len(), 500);
    it.next();
    assert_eq!(it.len(), 499);
    for (k, v) in &t {
        assert_eq!(k, v * 31);
    }
}

// Test: get_mut changes the stored value in place.
#[test]
fn get_mut_updates_in_place() {
    let mut t = IntTable::new();
    t.put(4, vec![1]).unwrap();
    t.get_mut(4).unwrap().push(2);
    assert_eq!(t.get(4), Some(&vec![1, 2]));
    assert!(t.get_mut(5).is_none());
}

// Test: requested capacities round to a power of two, minimum 16.
#[test]
fn capacity_rounding() {
    assert_eq!(IntTable::<()>::with_capacity(0).capacity(), 16);
    assert_eq!(IntTable::<()>::with_capacity(100).capacity(), 128);
    assert_eq!(IntTable::<()>::with_capacity(128).capacity(), 128);
    assert_eq!(IntTable::<()>::default().capacity(), 64);
}
