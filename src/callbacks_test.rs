use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

fn counter() -> (Arc<AtomicUsize>, impl FnOnce(Option<String>) + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let hits = count.clone();
    (count, move |_| {
        hits.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn tokens_are_unique_uuids() {
    let registry = CallbackRegistry::new();
    let a = registry.register(|_| {});
    let b = registry.register(|_| {});
    assert_ne!(a, b);
    assert!(Uuid::parse_str(&a).is_ok());
    assert_eq!(registry.pending(), 2);
}

#[test]
fn invoke_passes_payload_through() {
    let registry = CallbackRegistry::new();
    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    let token = registry.register(move |payload| *sink.lock().unwrap() = payload);

    assert!(registry.invoke(&token, Some("true".into())));
    assert_eq!(seen.lock().unwrap().as_deref(), Some("true"));
    assert_eq!(registry.pending(), 0);
}

#[test]
fn double_invoke_fires_once() {
    let registry = CallbackRegistry::new();
    let (count, continuation) = counter();
    let token = registry.register(continuation);

    assert!(registry.invoke(&token, None));
    assert!(!registry.invoke(&token, None));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn unknown_token_is_a_no_op() {
    let registry = CallbackRegistry::new();
    let (count, continuation) = counter();
    registry.register(continuation);

    assert!(!registry.invoke("not-a-token", Some("x".into())));
    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(registry.pending(), 1);
}

#[test]
fn cancel_drops_without_running() {
    let registry = CallbackRegistry::new();
    let (count, continuation) = counter();
    let token = registry.register(continuation);

    assert!(registry.cancel(&token));
    assert!(!registry.cancel(&token));
    assert!(!registry.invoke(&token, None));
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn take_hands_back_the_continuation() {
    let registry = CallbackRegistry::new();
    let (count, continuation) = counter();
    let token = registry.register(continuation);

    let taken = registry.take(&token).expect("pending");
    assert_eq!(registry.pending(), 0);
    taken(None);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn continuation_may_register_from_inside_invoke() {
    let registry = CallbackRegistry::new();
    let inner = registry.clone();
    let token = registry.register(move |_| {
        inner.register(|_| {});
    });

    assert!(registry.invoke(&token, None));
    assert_eq!(registry.pending(), 1);
}

#[test]
fn concurrent_register_and_invoke_fire_each_exactly_once() {
    let registry = CallbackRegistry::new();
    let count = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            let count = count.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    let hits = count.clone();
                    let token = registry.register(move |_| {
                        hits.fetch_add(1, Ordering::SeqCst);
                    });
                    registry.invoke(&token, None);
                    registry.invoke(&token, None);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(count.load(Ordering::SeqCst), 400);
    assert_eq!(registry.pending(), 0);
}
