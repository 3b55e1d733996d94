// Regression tests: the demo binaries emit byte-exact TAP on stdout and map
// failures to the exit status.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn bin(name: &str) -> Command {
    let mut cmd = Command::cargo_bin(name).unwrap();
    cmd.env_remove("TAPLET_SELF_TEST")
        .env_remove("TAPLET_BACKTRACE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn async_suite_reports_in_call_order() {
    bin("async_suite")
        .assert()
        .success()
        .stdout(
            predicates::str::starts_with(
                "TAP version 14\n1..22\n# Sync test first\nok 1 - I passed! 01-01\n",
            )
            .and(contains("# Async test second\nok 5 - 02-01\n"))
            .and(contains("# Timeout test fifth\nok 16 - 05-01\nok 17 - 05-02\nok 18 - plan(2)\n"))
            .and(contains("# total  20\n# failed 0\n"))
            .and(predicates::str::ends_with("# t.body\nok 21\nok 22 - plan(1)\n"))
            .and(contains("not ok").not()),
        );
}

#[test]
fn bail_out_terminates_with_report() {
    bin("bail_out")
        .assert()
        .code(1)
        .stdout(
            "TAP version 14\n1..2\n# before the bail\nok 1 - this point is reported\nok 2 - plan(1)\n# bails\nBail out! giving up early\n",
        );
}

#[test]
fn bail_out_raises_under_self_test() {
    bin("bail_out")
        .env("TAPLET_SELF_TEST", "1")
        .env("TAPLET_BACKTRACE", "never")
        .assert()
        .code(1)
        .stdout(
            contains("Bail out! giving up early\nnot ok 3 - BAIL\n")
                .and(contains("  actual:   Throws Due to Test Error\n  expected: Should Not Throw\n"))
                .and(contains("# after the bail\nok 4 - never reported"))
                .and(predicates::str::starts_with("TAP version 14\n1..4\n")),
        );
}

#[test]
fn invalid_configuration_is_a_diagnostic() {
    bin("async_suite")
        .env("TAPLET_BACKTRACE", "sometimes")
        .assert()
        .failure()
        .stdout(predicates::str::is_empty())
        .stderr(contains("taplet::config").or(contains("TAPLET_BACKTRACE")));
}

#[test]
fn panic_outside_a_block_still_emits_the_report() {
    bin("stray_panic")
        .env("TAPLET_BACKTRACE", "never")
        .assert()
        .code(1)
        .stdout(
            predicates::str::starts_with(
                "TAP version 14\n1..2\n# first\nok 1 - reported\nnot ok 2 - index out of bounds",
            )
            .and(contains("  actual:   Throws Due to Test Error\n  expected: Should Not Throw\n"))
            .and(contains("never reached").not()),
        );
}
