//! Navigator dispatch and event loop.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use webdm_routes::lifecycle::Shutdown;
use webdm_routes::navigation::{Dispatch, NavigationEvent, Navigator};
use webdm_routes::routing::Invocation;

mod common;

#[test]
fn test_repeated_dispatch_is_independent() {
    let fixture = common::Fixture::new();
    let navigator = Navigator::new(fixture.table.clone());

    let first = navigator.dispatch("/snap/42/files").unwrap();
    let second = navigator.dispatch("/snap/42/files").unwrap();
    assert_eq!(first, second);

    let expected = Invocation {
        action: "snap".into(),
        params: vec![Some("42".into()), Some("files".into())],
    };
    assert_eq!(
        fixture.section("snap").invocations(),
        vec![expected.clone(), expected]
    );
}

#[tokio::test]
async fn test_start_dispatches_initial_path_and_events() {
    let fixture = common::Fixture::new();
    let misses = Arc::new(AtomicUsize::new(0));
    let counter = misses.clone();
    let navigator = Navigator::new(fixture.table.clone()).with_fallback(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(NavigationEvent::Navigate("/store".into())).unwrap();
    tx.send(NavigationEvent::Navigate("/search?q=core".into())).unwrap();
    tx.send(NavigationEvent::Navigate("/nowhere".into())).unwrap();
    tx.send(NavigationEvent::Back).unwrap();
    drop(tx);

    let shutdown = Shutdown::new();
    let navigator = navigator.start("/", rx, shutdown.subscribe()).await.unwrap();

    assert_eq!(navigator.history(), ["/", "/store", "/search?q=core"]);
    assert_eq!(misses.load(Ordering::SeqCst), 1);
    assert_eq!(fixture.section("home").invocations().len(), 1);
    assert_eq!(fixture.section("store").invocations().len(), 1);

    let searches = fixture.section("search").invocations();
    assert_eq!(searches.len(), 2);
    assert_eq!(searches[1].params, vec![Some("core".to_string())]);
}

#[tokio::test]
async fn test_shutdown_stops_navigation() {
    let fixture = common::Fixture::new();
    let (tx, rx) = mpsc::unbounded_channel::<NavigationEvent>();
    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();

    let handle = tokio::spawn({
        let navigator = Navigator::new(fixture.table.clone());
        async move { navigator.start("/store", rx, receiver).await }
    });

    shutdown.trigger();
    let navigator = handle.await.unwrap().unwrap();

    assert_eq!(navigator.current(), Some("/store"));
    drop(tx);
}

#[test]
fn test_unmatched_dispatch_returns_path() {
    let fixture = common::Fixture::new();
    let navigator = Navigator::new(fixture.table.clone());

    assert_eq!(
        navigator.dispatch("/does-not-exist").unwrap(),
        Dispatch::Unmatched("/does-not-exist".into())
    );
    assert!(fixture.sections.iter().all(|s| s.invocations().is_empty()));
}
