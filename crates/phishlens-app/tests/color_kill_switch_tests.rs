//! Integration tests for colour environment switches.

use phishlens_app::color_enabled_from_env;

#[test]
fn color_kill_switch_tests_honours_env_switches() {
    // Safety:
    // - Integration tests mutate process env in a single-threaded test body.
    // - We reset the variables before returning.
    unsafe { std::env::remove_var("NO_COLOR") };
    unsafe { std::env::remove_var("PHISHLENS_COLOR") };
    assert!(color_enabled_from_env());

    // Safety: see rationale above.
    unsafe { std::env::set_var("PHISHLENS_COLOR", "OFF") };
    assert!(!color_enabled_from_env());

    // Safety: see rationale above.
    unsafe { std::env::set_var("PHISHLENS_COLOR", "1") };
    assert!(color_enabled_from_env());

    // Safety: see rationale above.
    unsafe { std::env::set_var("NO_COLOR", "1") };
    assert!(!color_enabled_from_env());

    // Safety: see rationale above.
    unsafe { std::env::set_var("NO_COLOR", "") };
    assert!(color_enabled_from_env());

    // Safety: see rationale above.
    unsafe { std::env::remove_var("NO_COLOR") };
    unsafe { std::env::remove_var("PHISHLENS_COLOR") };
}
