//! Integration tests for Shipit

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn shipit() -> Command {
        cargo_bin_cmd!("shipit")
    }

    /// Command isolated from the user's global and local config
    fn shipit_isolated(temp: &TempDir) -> Command {
        let mut cmd = shipit();
        cmd.current_dir(temp.path())
            .env("SHIPIT_CONFIG", temp.path().join("no-such-config.toml"))
            .arg("--no-local");
        cmd
    }

    #[test]
    fn help_displays() {
        shipit()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("curated set of local files"));
    }

    #[test]
    fn version_displays() {
        shipit()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("shipit"));
    }

    #[test]
    fn config_path_displays() {
        shipit()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_prints_defaults() {
        let temp = TempDir::new().unwrap();
        shipit_isolated(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[remote]"))
            .stdout(predicate::str::contains("fallback_branch = \"master\""));
    }

    #[test]
    fn init_creates_local_config() {
        let temp = TempDir::new().unwrap();
        shipit()
            .args(["init", "-p"])
            .arg(temp.path())
            .assert()
            .success();

        let content = std::fs::read_to_string(temp.path().join(".shipit.toml")).unwrap();
        assert!(content.contains("[remote]"));
    }

    #[test]
    fn init_refuses_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".shipit.toml"), "existing").unwrap();

        shipit()
            .args(["init", "-p"])
            .arg(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn config_set_local_writes_project_file() {
        let temp = TempDir::new().unwrap();
        shipit_isolated(&temp)
            .args(["config", "set", "remote.url", "https://x.test/r.git", "--local"])
            .assert()
            .success();

        let content = std::fs::read_to_string(temp.path().join(".shipit.toml")).unwrap();
        assert!(content.contains("https://x.test/r.git"));
    }

    #[test]
    fn config_set_rejects_unknown_key() {
        let temp = TempDir::new().unwrap();
        shipit_isolated(&temp)
            .args(["config", "set", "bogus.key", "x", "--local"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn sync_without_remote_url_fails_with_hint() {
        let temp = TempDir::new().unwrap();
        shipit_isolated(&temp)
            .arg("sync")
            .assert()
            .failure()
            .stderr(predicate::str::contains("No remote URL configured"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn status_reports_json() {
        let temp = TempDir::new().unwrap();
        shipit_isolated(&temp)
            .args(["status", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"remote_name\": \"origin\""));
    }
}

/// End-to-end sync runs against a local bare repository standing in for
/// the hosting service. Skipped when git is unavailable.
mod sync_e2e {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use std::process::Command as StdCommand;
    use tempfile::TempDir;

    fn git_available() -> bool {
        StdCommand::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn shipit_in(project: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("shipit");
        cmd.current_dir(project)
            .env("SHIPIT_CONFIG", project.join("no-such-global.toml"))
            .env("GIT_AUTHOR_NAME", "shipit-e2e")
            .env("GIT_AUTHOR_EMAIL", "shipit-e2e@example.invalid")
            .env("GIT_COMMITTER_NAME", "shipit-e2e")
            .env("GIT_COMMITTER_EMAIL", "shipit-e2e@example.invalid");
        cmd
    }

    /// Create a bare remote and an empty project configured to push to it
    fn setup(temp: &TempDir, extra_config: &str) -> PathBuf {
        let bare = temp.path().join("remote.git");
        let out = StdCommand::new("git")
            .args(["init", "--bare"])
            .arg(&bare)
            .output()
            .expect("git init --bare");
        assert!(out.status.success());

        let project = temp.path().join("project");
        std::fs::create_dir(&project).unwrap();
        std::fs::write(
            project.join(".shipit.toml"),
            format!("[remote]\nurl = \"{}\"\n{}", bare.display(), extra_config),
        )
        .unwrap();
        project
    }

    fn remote_refs(temp: &TempDir) -> String {
        let out = StdCommand::new("git")
            .args(["ls-remote"])
            .arg(temp.path().join("remote.git"))
            .output()
            .expect("git ls-remote");
        String::from_utf8_lossy(&out.stdout).to_string()
    }

    #[test]
    fn fresh_project_pushes_readme() {
        if !git_available() {
            eprintln!("git not available, skipping");
            return;
        }

        let temp = TempDir::new().unwrap();
        let project = setup(&temp, "");
        std::fs::write(project.join("README.md"), "# Pickles\n").unwrap();

        // Bare invocation runs sync with defaults
        shipit_in(&project)
            .assert()
            .success()
            .stdout(predicate::str::contains("Initializing git repository"))
            .stdout(predicate::str::contains("Successfully pushed"));

        assert!(!remote_refs(&temp).is_empty());
    }

    #[test]
    fn second_run_is_idempotent() {
        if !git_available() {
            eprintln!("git not available, skipping");
            return;
        }

        let temp = TempDir::new().unwrap();
        let project = setup(&temp, "");
        std::fs::write(project.join("README.md"), "# Pickles\n").unwrap();

        shipit_in(&project).assert().success();

        shipit_in(&project)
            .assert()
            .success()
            .stdout(predicate::str::contains("No changes to commit"))
            .stdout(predicate::str::contains("Nothing to push"));
    }

    #[test]
    fn asset_cache_skips_unchanged_blob() {
        if !git_available() {
            eprintln!("git not available, skipping");
            return;
        }

        let temp = TempDir::new().unwrap();
        let project = setup(
            &temp,
            "[files]\ntracked = [\"incoming.mp3\"]\nhashed = \"incoming.mp3\"\n",
        );
        std::fs::write(project.join("incoming.mp3"), b"fake mp3 content").unwrap();

        shipit_in(&project)
            .assert()
            .success()
            .stdout(predicate::str::contains("Adding incoming.mp3"))
            .stdout(predicate::str::contains("Successfully pushed"));

        // Cache now holds the staged blob's hash
        let cache = std::fs::read_to_string(project.join(".shipit-cache")).unwrap();
        assert_eq!(cache.trim().len(), 64);

        // Unchanged asset is never re-staged
        shipit_in(&project)
            .assert()
            .success()
            .stdout(predicate::str::contains("incoming.mp3 unchanged, skipping"))
            .stdout(predicate::str::contains("Nothing to push"));

        // A content change stages it exactly once more
        std::fs::write(project.join("incoming.mp3"), b"different mp3 content").unwrap();
        shipit_in(&project)
            .assert()
            .success()
            .stdout(predicate::str::contains("Adding incoming.mp3"))
            .stdout(predicate::str::contains("Successfully pushed"));
    }

    #[test]
    fn commit_message_override_is_used() {
        if !git_available() {
            eprintln!("git not available, skipping");
            return;
        }

        let temp = TempDir::new().unwrap();
        let project = setup(&temp, "");
        std::fs::write(project.join("README.md"), "# Pickles\n").unwrap();

        shipit_in(&project)
            .args(["sync", "-m", "Ship the pickles"])
            .assert()
            .success();

        let out = StdCommand::new("git")
            .args(["log", "-1", "--format=%s"])
            .current_dir(&project)
            .output()
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "Ship the pickles");
    }

    #[test]
    fn push_to_missing_remote_prints_checklist() {
        if !git_available() {
            eprintln!("git not available, skipping");
            return;
        }

        let temp = TempDir::new().unwrap();
        let project = temp.path().join("project");
        std::fs::create_dir(&project).unwrap();
        std::fs::write(
            project.join(".shipit.toml"),
            format!(
                "[remote]\nurl = \"{}\"\n",
                temp.path().join("nonexistent.git").display()
            ),
        )
        .unwrap();
        std::fs::write(project.join("README.md"), "# Pickles\n").unwrap();

        shipit_in(&project)
            .assert()
            .failure()
            .stdout(predicate::str::contains("Failed to push"))
            .stdout(predicate::str::contains("Set up authentication"));
    }
}
