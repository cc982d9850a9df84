#![allow(missing_docs)]

use wiremap::{Wiremap, WireCollection, WireObject};

#[derive(Debug, Clone, PartialEq, Default, WireObject)]
struct Ping {
    #[wire(name = "TOKEN")]
    token: String,
    #[wire(name = "SEQ")]
    sequence: u64,
    #[wire(name = "L_TAG{I}", pattern = r"^L_TAG(?<I>\d+)$", key = "I")]
    tags: Vec<String>,
}

fn ping(sequence: u64) -> Ping {
    Ping {
        token: format!("EC-{sequence}"),
        sequence,
        tags: vec!["alpha".into(), "beta".into()],
    }
}

#[test]
fn conversions_behave_identically_across_cache_clears() {
    let first = Wiremap::save(&ping(1)).expect("save");
    Wiremap::clear_cache();
    let second = Wiremap::save(&ping(1)).expect("save after clear");
    assert_eq!(first, second);

    Wiremap::clear_cache();
    let loaded: Ping = Wiremap::load(&second).expect("load after clear");
    assert_eq!(loaded, ping(1));
}

#[test]
fn concurrent_conversions_share_the_metadata_cache() {
    std::thread::scope(|scope| {
        for worker in 0u64..8 {
            scope.spawn(move || {
                for round in 0..50 {
                    let value = ping(worker * 1000 + round);
                    let wire = Wiremap::save(&value).expect("save");
                    let back: Ping = Wiremap::load(&wire).expect("load");
                    assert_eq!(back, value);
                }
            });
        }
        // Churn the cache while the workers run; in-flight conversions
        // keep the entries they already fetched.
        scope.spawn(|| {
            for _ in 0..100 {
                Wiremap::clear_cache();
                std::thread::yield_now();
            }
        });
    });
}

#[test]
fn distinct_wire_collections_do_not_interfere() {
    let a = ping(7);
    let b = Ping { tags: vec!["solo".into()], ..ping(8) };

    let wire_a = Wiremap::save(&a).expect("save a");
    let wire_b = Wiremap::save(&b).expect("save b");

    let mut loaded_a = Ping::default();
    let mut loaded_b = Ping::default();
    Wiremap::load_into(&wire_a, &mut loaded_a).expect("load a");
    Wiremap::load_into(&wire_b, &mut loaded_b).expect("load b");

    assert_eq!(loaded_a, a);
    assert_eq!(loaded_b, b);
    assert_ne!(wire_a, wire_b);

    let empty = WireCollection::new();
    let untouched: Ping = Wiremap::load(&empty).expect("load empty");
    assert_eq!(untouched, Ping::default());
}
