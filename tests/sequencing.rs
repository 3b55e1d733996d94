use std::time::Duration;

use taplet::{Config, Tap};

fn tap() -> Tap {
    Tap::new(Config::self_test())
}

#[tokio::test]
async fn awaited_blocks_never_interleave() {
    let t = tap();

    t.test_async("slow", |t| async move {
        t.pass("slow 1");
        tokio::time::sleep(Duration::from_millis(20)).await;
        t.pass("slow 2");
        t.plan(2);
    })
    .await;

    t.test_async("fast", |t| async move {
        t.pass("fast 1");
        t.plan(1);
    })
    .await;

    assert_eq!(
        t.body(),
        "# slow\nok 1 - slow 1\nok 2 - slow 2\nok 3 - plan(2)\n# fast\nok 4 - fast 1\nok 5 - plan(1)\n"
    );
    assert_eq!(t.total(), 5);
    assert_eq!(t.failed(), 0);
}

#[tokio::test]
async fn sync_and_async_blocks_share_numbering() {
    let t = tap();

    t.test("sync", |t| {
        t.equal(9 * 3, 27, None);
        t.plan(1);
    });
    let returned = t
        .test_async("async", |t| async move {
            t.equal(async { 84 * 5 }.await, 420, None);
            t.plan(1);
        })
        .await;
    t.test("sync again", |t| t.pass(None));

    assert_eq!(returned.total(), 5);
    assert!(t.body().ends_with("# async\nok 3\nok 4 - plan(1)\n# sync again\nok 5\n"));
}

#[tokio::test]
async fn async_error_is_recorded_once() {
    let t = tap();

    t.test_async("rejects", |t| async move {
        t.pass("first");
        tokio::task::yield_now().await;
        Err::<(), _>("rejected after suspension")
    })
    .await;

    t.test("continues", |t| t.pass(None));

    let body = t.body();
    assert!(body.contains("ok 1 - first\nnot ok 2 - rejected after suspension\n"));
    assert!(body.contains("# continues\nok 3\n"));
    assert_eq!(t.failed(), 1);
    assert_eq!(body.matches("not ok").count(), 1);
}

#[tokio::test]
async fn timers_resolve_inside_a_block() {
    let t = tap();

    t.test_async("Timeout test", |t| async move {
        let start = tokio::time::Instant::now();
        tokio::time::sleep(Duration::from_millis(50)).await;
        t.ok(start.elapsed() >= Duration::from_millis(50), None);
        t.plan(1);
    })
    .await;

    assert_eq!(t.failed(), 0);
    assert_eq!(t.total(), 2);
}
