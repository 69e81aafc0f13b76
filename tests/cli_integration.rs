//! Integration tests for the PlayerVaults CLI.
//!
//! These run the binary end-to-end against a temporary server root
//! holding a `players.toml` roster.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const ROSTER: &str = r#"
[[player]]
name = "Steve"
id = "steve-1"
grants = ["vault.amount.2"]

[[player]]
name = "Mod"
id = "mod-1"
grants = ["vault.admin"]
"#;

/// Helper: get a Command pointing at the playervaults binary.
fn playervaults() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("playervaults").expect("binary should exist")
}

/// A server root with the test roster and no other state.
fn server_root() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child("players.toml").write_str(ROSTER).unwrap();
    tmp
}

fn at(root: &TempDir) -> Command {
    let mut cmd = playervaults();
    cmd.arg("--root").arg(root.path()).env_remove("PLAYERVAULTS_LOG");
    cmd
}

#[test]
fn help_flag_shows_usage() {
    playervaults()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("player vaults"))
        .stdout(predicate::str::contains("vault"))
        .stdout(predicate::str::contains("pvault"))
        .stdout(predicate::str::contains("limit"))
        .stdout(predicate::str::contains("pages"));
}

#[test]
fn version_flag_shows_version() {
    playervaults()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("playervaults"));
}

#[test]
fn no_args_shows_help() {
    playervaults()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn vault_saves_edits_and_lists_pages() {
    let root = server_root();

    at(&root)
        .args(["vault", "Steve", "2", "--put", "0=diamond_sword", "--put", "53=torch*16"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault - Page 2"))
        .stdout(predicate::str::contains("Saved page 2 of Steve's vault (2/54 slots used)"));

    root.child("playerdata/steve-1.json")
        .assert(predicate::path::exists());

    at(&root)
        .args(["vault", "steve", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("diamond_sword"))
        .stdout(predicate::str::contains("torch"));

    at(&root)
        .args(["pages", "Steve"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2/54"));
}

#[test]
fn vault_above_limit_is_refused() {
    let root = server_root();

    at(&root)
        .args(["vault", "Steve", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("You only have access to 2 vaults."));

    root.child("playerdata/steve-1.json")
        .assert(predicate::path::missing());
}

#[test]
fn vault_rejects_non_numeric_page() {
    let root = server_root();

    at(&root)
        .args(["vault", "Steve", "two"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: /vault [page]"));
}

#[test]
fn pvault_without_admin_grant_is_refused() {
    let root = server_root();

    at(&root)
        .args(["pvault", "Steve", "Mod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("You do not have permission to use /pvault."));
}

#[test]
fn pvault_unknown_player() {
    let root = server_root();

    at(&root)
        .args(["pvault", "Mod", "Herobrine"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Player 'Herobrine' not found."));
}

#[test]
fn pvault_saves_into_target_vault() {
    let root = server_root();

    at(&root)
        .args(["pvault", "Mod", "Steve", "1", "--put", "4=golden_apple*3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved page 1 of Steve's vault"));

    root.child("playerdata/steve-1.json")
        .assert(predicate::path::exists());
    root.child("playerdata/mod-1.json")
        .assert(predicate::path::missing());
}

#[test]
fn limit_reports_grants() {
    let root = server_root();

    at(&root)
        .args(["limit", "Steve"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Steve can open 2 vault pages."));
}

#[test]
fn out_of_range_slot_is_rejected_before_opening() {
    let root = server_root();

    at(&root)
        .args(["vault", "Steve", "--put", "54=dirt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the page"));

    root.child("playerdata/steve-1.json")
        .assert(predicate::path::missing());
}

#[test]
fn invalid_settings_fail_fast() {
    let root = server_root();
    root.child("playervaults.toml")
        .write_str("capacity = 10\n")
        .unwrap();

    at(&root)
        .args(["limit", "Steve"])
        .assert()
        .failure();
}

#[test]
fn pages_flags_unreadable_pages() {
    let root = server_root();
    root.child("playerdata/steve-1.json")
        .write_str(r#"{"playervaults:vault_page_2":"not a vault page"}"#)
        .unwrap();

    at(&root)
        .args(["pages", "Steve"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unreadable"));
}

#[cfg(feature = "audit-log")]
#[test]
fn audit_records_why_a_command_was_refused() {
    let root = server_root();

    at(&root).args(["vault", "Steve", "two"]).assert().failure();
    at(&root).args(["vault", "Steve", "3"]).assert().failure();
    at(&root).args(["pvault", "Mod", "Herobrine"]).assert().failure();

    at(&root)
        .args(["audit", "--last", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("invalid-page"))
        .stdout(predicate::str::contains("denied"))
        .stdout(predicate::str::contains("admin-not-found"));
}
