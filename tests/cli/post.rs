//! Tests for the post step.

use crate::support::*;

#[test]
fn test_no_state_is_a_noop() {
    let t = Test::new();

    let output = t.cmd().arg("post").output().unwrap();

    assert_success(&output);
    assert!(t.gpg_calls().is_empty());
}

#[test]
fn test_imported_key_is_deleted() {
    let t = Test::new();

    let output = t.post_step();
    assert_success(&output);

    assert_eq!(
        t.gpg_calls(),
        vec![
            "--with-colons --import-options show-only --import --fingerprint".to_string(),
            format!("--list-secret-keys {}", FINGERPRINT),
            format!("--batch --yes --delete-secret-keys {}", FINGERPRINT),
            format!("--batch --yes --delete-keys {}", FINGERPRINT),
        ]
    );
}

#[test]
fn test_missing_key_is_left_alone() {
    let t = Test::new();

    let output = t
        .cmd()
        .arg("post")
        .env("STATE_GPG_KEY", gpg_key())
        .env("GPG_NO_KEY", "1")
        .output()
        .unwrap();

    assert_success(&output);
    assert_eq!(t.gpg_calls().len(), 2);
}

#[test]
fn test_run_then_post() {
    let t = Test::new();

    assert_success(&t.run_step("json"));
    let key = t.saved_state().remove("GPG_KEY").unwrap();

    let output = t
        .cmd()
        .arg("post")
        .env("STATE_GPG_KEY", key)
        .output()
        .unwrap();

    assert_success(&output);
    assert!(t
        .gpg_calls()
        .iter()
        .any(|call| call.contains("--delete-secret-keys")));
}

#[test]
fn test_deletion_failure_is_reported() {
    let t = Test::new();

    let output = t
        .cmd()
        .arg("post")
        .env("STATE_GPG_KEY", gpg_key())
        .env("GPG_FAIL_DELETE", "1")
        .output()
        .unwrap();

    assert_reported(
        &output,
        "Error while deleting the gpg key: Deleting private GPG key failed: gpg: deleting secret key failed: Permission denied",
    );
    assert_eq!(t.gpg_calls().len(), 3);
}
