//! Producers and readers on separate threads

use crate::test_utils::*;
use mirrorcache::{GenericLister, Indexer, Operator, ResourceMeta, Rule, Selector, Store};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn test_readers_never_see_half_applied_updates() {
    init_tracing();
    let cache = Arc::new(resource_cache());
    let done = Arc::new(AtomicBool::new(false));

    // every object always carries exactly one of the two tags
    add_all(
        cache.as_ref(),
        (0..20).map(|i| meta(&format!("svc{}", i), "one").with_tag("blue")),
    );

    let writer = {
        let cache = Arc::clone(&cache);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for round in 0..200 {
                let tag = if round % 2 == 0 { "green" } else { "blue" };
                for i in 0..20 {
                    cache
                        .update(Arc::new(meta(&format!("svc{}", i), "one").with_tag(tag)))
                        .unwrap();
                }
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::SeqCst) {
                    let blue = cache.index_keys("tags", "blue").unwrap().len();
                    let green = cache.index_keys("tags", "green").unwrap().len();
                    // two separate reads; each is consistent on its own
                    assert!(blue <= 20 && green <= 20);
                    assert_eq!(cache.by_index("scope", "one").unwrap().len(), 20);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }

    // last round (199) wrote blue
    assert_eq!(cache.index_keys("tags", "blue").unwrap().len(), 20);
    assert!(cache.index_keys("tags", "green").unwrap().is_empty());
}

#[test]
fn test_concurrent_producers_per_scope() {
    init_tracing();
    let lister = GenericLister::<ResourceMeta>::new(Arc::new(resource_cache()));

    let handles: Vec<_> = (0..6)
        .map(|t| {
            let lister = lister.clone();
            thread::spawn(move || {
                let scope = format!("scope{}", t);
                for i in 0..50 {
                    let parity = if i % 2 == 0 { "even" } else { "odd" };
                    let obj = meta(&format!("svc{}", i), &scope).with_attribute("parity", parity);
                    lister.indexer().add(Arc::new(obj)).unwrap();
                }
                for i in (0..50).step_by(5) {
                    lister
                        .indexer()
                        .delete(&ResourceMeta::new(format!("svc{}", i), scope.clone()))
                        .unwrap();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let even = Selector::new().with(Rule::attr("parity", Operator::DoubleEquals, ["even"]));
    assert_eq!(lister.list(None).unwrap().len(), 6 * 40);
    for t in 0..6 {
        let scoped = lister.by_scope(format!("scope{}", t));
        assert_eq!(scoped.list(None).unwrap().len(), 40);
        // 25 even names, 5 of them deleted
        assert_eq!(scoped.list(Some(&even)).unwrap().len(), 20);
    }
}
