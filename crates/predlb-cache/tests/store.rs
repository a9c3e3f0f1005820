use std::thread;
use std::time::Duration;

use predlb_cache::{CacheStore, MokaStore};

const HOUR: Duration = Duration::from_secs(3600);

#[test]
fn set_get_delete() {
    let store = MokaStore::new(100);
    assert_eq!(store.get("a"), None);

    store.set("a", 12.5, HOUR);
    store.set("b", 0.0, HOUR);
    assert_eq!(store.get("a"), Some(12.5));
    assert_eq!(store.get("b"), Some(0.0));

    store.delete("a");
    assert_eq!(store.get("a"), None);
    store.delete("never-set");
}

#[test]
fn delete_many_removes_every_key() {
    let store = MokaStore::new(100);
    for key in ["x", "y", "z"] {
        store.set(key, 1.0, HOUR);
    }
    store.delete_many(&["x".to_string(), "z".to_string()]);
    assert_eq!(store.get("x"), None);
    assert_eq!(store.get("y"), Some(1.0));
    assert_eq!(store.get("z"), None);
}

#[test]
fn entries_expire_after_their_own_ttl() {
    let store = MokaStore::new(100);
    store.set("short", 1.0, Duration::from_millis(100));
    store.set("long", 2.0, HOUR);

    thread::sleep(Duration::from_millis(300));

    assert_eq!(store.get("short"), None);
    assert_eq!(store.get("long"), Some(2.0));
}

#[test]
fn overwrite_resets_value_and_ttl() {
    let store = MokaStore::new(100);
    store.set("k", 1.0, Duration::from_millis(100));
    store.set("k", 3.0, HOUR);

    thread::sleep(Duration::from_millis(300));

    assert_eq!(store.get("k"), Some(3.0));
}
