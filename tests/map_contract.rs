use shardbench::table::ScalableHashTable;
use shardbench::{CoarseLockMap, KeyValueMap, ShardedMap};

const N: u64 = 1 << 14;

fn maps() -> Vec<Box<dyn KeyValueMap<u64, Vec<u8>>>> {
    vec![
        Box::new(CoarseLockMap::new()),
        Box::new(ShardedMap::with_table(ScalableHashTable::with_capacity(N as usize, 2.0, 64))),
    ]
}

#[test]
fn prepopulated_keys_all_hit() {
    for m in maps() {
        for k in 0..N { assert!(m.insert(k, vec![b'a'; 32]), "{} rejected {}", m.name(), k); }
        for k in 0..N { assert!(m.lookup(&k).is_some(), "{} missed {}", m.name(), k); }
    }
}

#[test]
fn erase_before_insert_misses_then_insert_erase_succeeds() {
    for m in maps() {
        for k in N..N + 100 {
            assert!(!m.erase(&k), "{}: {} should be absent", m.name(), k);
            assert!(m.insert(k, vec![1]));
            assert!(m.erase(&k), "{}: {} should be removable", m.name(), k);
            assert!(m.lookup(&k).is_none());
        }
    }
}

#[test]
fn repeated_insert_is_an_upsert() {
    for m in maps() {
        assert!(m.insert(42, b"first".to_vec()));
        assert!(m.insert(42, b"second".to_vec()));
        assert_eq!(m.lookup(&42), Some(b"second".to_vec()), "{}", m.name());
        assert!(m.erase(&42));
        assert!(!m.erase(&42), "{}: upsert must not leave a duplicate behind", m.name());
    }
}

#[test]
fn mixed_concurrent_access_keeps_read_keyspace_intact() {
    for m in maps() {
        for k in 0..N { m.insert(k, vec![b'a'; 8]); }
        let m = &*m;
        std::thread::scope(|s| {
            for t in 0..4u64 {
                s.spawn(move || {
                    for i in 0..5_000u64 {
                        let k = N + t * 5_000 + i;
                        m.insert(k, vec![b'w'; 8]);
                        if i % 2 == 0 { assert!(m.erase(&k)); }
                    }
                });
                s.spawn(move || {
                    for i in 0..20_000u64 {
                        let k = (i * 7 + t) % N;
                        assert_eq!(m.lookup(&k), Some(vec![b'a'; 8]), "{} lost {}", m.name(), k);
                    }
                });
            }
        });
        for t in 0..4u64 {
            assert!(m.lookup(&(N + t * 5_000)).is_none());
            assert!(m.lookup(&(N + t * 5_000 + 1)).is_some());
        }
    }
}

#[test]
fn names_differ() {
    let names: Vec<&str> = maps().iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["coarse-lock map", "sharded hash map"]);
}
