//! CLI integration tests for tidyboard.
//!
//! Everything store-backed runs in `--demo` mode against the seeded
//! in-memory store, so no network or configuration is needed.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

/// Helper to create a tidyboard Command
fn tidyboard() -> Command {
    cargo_bin_cmd!("tidyboard")
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_help() {
        tidyboard()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("board"))
            .stdout(predicate::str::contains("watch"));
    }

    #[test]
    fn test_version() {
        tidyboard()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("tidyboard"));
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        tidyboard().arg("sweep").assert().failure();
    }

    #[test]
    fn test_columns_lists_all_five_with_colors() {
        tidyboard()
            .arg("columns")
            .assert()
            .success()
            .stdout(predicate::str::contains("Dirty"))
            .stdout(predicate::str::contains("Assigned"))
            .stdout(predicate::str::contains("In Progress"))
            .stdout(predicate::str::contains("Inspection"))
            .stdout(predicate::str::contains("Clean"))
            .stdout(predicate::str::contains("#3b82f6"));
    }

    #[test]
    fn test_list_without_store_config_fails_cleanly() {
        tidyboard()
            .env_remove("TIDYBOARD_URL")
            .env_remove("TIDYBOARD_KEY")
            .arg("list")
            .assert()
            .failure()
            .stderr(predicate::str::contains("TIDYBOARD_URL"));
    }
}

// =============================================================================
// Demo Mode Tests
// =============================================================================

mod demo_mode {
    use super::*;

    #[test]
    fn test_board_renders_seeded_columns() {
        tidyboard()
            .args(["--demo", "board"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Dirty (1)"))
            .stdout(predicate::str::contains("Clean lobby"))
            .stdout(predicate::str::contains("Turn over suite 12"))
            .stdout(predicate::str::contains("Restock cart 2"));
    }

    #[test]
    fn test_list_shows_every_seed() {
        tidyboard()
            .args(["--demo", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("5 task(s)"));
    }

    #[test]
    fn test_list_filters_by_status() {
        tidyboard()
            .args(["--demo", "list", "--status", "assigned"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Turn over suite 12"))
            .stdout(predicate::str::contains("1 task(s)"));
    }

    #[test]
    fn test_list_filters_by_assignee() {
        tidyboard()
            .args(["--demo", "list", "--assignee", "u-jon"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Vacuum conference room"))
            .stdout(predicate::str::contains("1 task(s)"));
    }

    #[test]
    fn test_create_prints_id_and_stamps() {
        tidyboard()
            .args([
                "--demo",
                "create",
                "Polish banister",
                "--priority",
                "high",
                "--by",
                "u-9",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created 'Polish banister'"))
            .stdout(predicate::str::contains("id: "))
            .stdout(predicate::str::contains("created "));
    }

    #[test]
    fn test_create_rejects_blank_title() {
        tidyboard()
            .args(["--demo", "create", "   "])
            .assert()
            .failure()
            .stderr(predicate::str::contains("title"));
    }

    #[test]
    fn test_move_unknown_id_reports_absence() {
        tidyboard()
            .args(["--demo", "move", "ghost-id", "clean"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No task with id"));
    }

    #[test]
    fn test_move_rejects_unknown_status() {
        tidyboard()
            .args(["--demo", "move", "some-id", "sparkling"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid status"));
    }

    #[test]
    fn test_update_requires_a_field_flag() {
        tidyboard()
            .args(["--demo", "update", "some-id"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Nothing to update"));
    }

    #[test]
    fn test_delete_with_force_skips_confirmation() {
        tidyboard()
            .args(["--demo", "delete", "ghost-id", "--force"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Deleted ghost-id"));
    }
}
