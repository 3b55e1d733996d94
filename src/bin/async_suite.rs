//! Sequencing demo: synchronous and suspending test blocks share one report.
//!
//! Each suspending block is awaited before the next one starts, so test point
//! numbers stay in call order. The last block checks the accumulated body.
//!
//! ## Usage
//! ```bash
//! cargo run --bin async_suite
//! ```

use std::process::ExitCode;
use std::time::{Duration, Instant};

use taplet::Tap;

const EXPECTED_BODY: &str = "# Sync test first
ok 1 - I passed! 01-01
ok 2 - 01-02
ok 3 - 01-03
ok 4 - plan(3)
# Async test second
ok 5 - 02-01
ok 6 - 02-02
ok 7 - 02-03
ok 8 - plan(3)
# Async test third
ok 9 - 03-01
ok 10 - 03-02
ok 11 - 03-03
ok 12 - plan(3)
# Sync test fourth
ok 13 - 04-01
ok 14 - pass it! 04-02
ok 15 - plan(2)
# Timeout test fifth
ok 16 - 05-01
ok 17 - 05-02
ok 18 - plan(2)
# Testing async code in a different block
ok 19
ok 20 - plan(1)
# Summary
# total  20
# failed 0
# t.body
";

async fn suite(t: Tap) {
    t.test("Sync test first", |t| {
        t.pass("I passed! 01-01");
        t.equal(9 * 3, 27, "01-02");
        t.not_equal(0, -0.0, "01-03");
        t.plan(3);
    });

    t.test_async("Async test second", |t| async move {
        t.throws(
            || -> Result<(), String> { Err("called a method on nothing".to_string()) },
            "02-01",
        );
        t.does_not_throw(|| (), "02-02");
        t.equal(async { 84 * 5 }.await, 420, "02-03");
        t.plan(3);
    })
    .await;

    t.test_async("Async test third", |t| async move {
        t.equal(async { 73 }.await, 73, "03-01");
        t.ok(20 == 5 * 4, "03-02");
        t.not_ok(20 == 5 * 3, "03-03");
        t.plan(3);
    })
    .await;

    t.test("Sync test fourth", |t| {
        t.equal(String::from("a") + "b", "ab", "04-01");
        t.pass("pass it! 04-02");
        t.plan(2);
    });

    t.test_async("Timeout test fifth", |t| async move {
        t.ok(tokio::runtime::Handle::try_current().is_ok(), "05-01");

        let start = Instant::now();
        tokio::time::sleep(Duration::from_millis(100)).await;
        let elapsed = start.elapsed();

        t.ok(
            elapsed >= Duration::from_millis(100) && elapsed < Duration::from_secs(2),
            "05-02",
        );
        t.plan(2);
    })
    .await;

    t.test_async("Testing async code in a different block", |t| async move {
        t.equal(async { "Hello" }.await, "Hello", None);
        t.plan(1);
    })
    .await;

    t.test("Summary", |t| {
        t.comment(&format!("total  {}", t.total()));
        t.comment(&format!("failed {}", t.failed()));
    });

    t.test("t.body", |t| {
        t.equal(t.body(), EXPECTED_BODY, None);
        t.plan(1);
    });
}

fn main() -> miette::Result<ExitCode> {
    taplet::init_tracing();
    Ok(taplet::run(suite)?)
}
