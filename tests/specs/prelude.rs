//! Test helpers for the black-box distq specs.
//!
//! Grounded on `tests/specs/prelude.rs` in the teacher workspace: a
//! `binary_path`/`CliBuilder`/`RunAssert` trio so specs read as
//! "build a project, run the CLI, assert on stdout/exit code" rather than
//! hand-rolling `std::process::Command` in every test.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Resolve a workspace binary, checking the standard debug target dir first
/// and falling back to a path relative to the test binary itself (the test
/// binary lives at `target/debug/deps/specs-<hash>`, so its grandparent is
/// `target/debug/` where `distq`, `distq-worker`, and `distq-discover` land).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }
    standard
}

pub fn distq_binary() -> PathBuf {
    binary_path("distq")
}

pub fn worker_binary() -> PathBuf {
    binary_path("distq-worker")
}

pub fn discover_binary() -> PathBuf {
    binary_path("distq-discover")
}

/// Fluent builder for one `distq` invocation.
pub struct CliBuilder {
    args: Vec<String>,
    dir: Option<PathBuf>,
}

pub fn cli() -> CliBuilder {
    CliBuilder {
        args: Vec::new(),
        dir: None,
    }
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    fn command(self) -> Command {
        let mut cmd = Command::new(distq_binary());
        cmd.args(&self.args);
        cmd.args([
            "--worker-bin",
            worker_binary().to_string_lossy().as_ref(),
            "--discover-bin",
            discover_binary().to_string_lossy().as_ref(),
        ]);
        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    pub fn passes(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("distq should run");
        assert!(
            output.status.success(),
            "expected distq to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    pub fn fails(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("distq should run");
        assert!(
            !output.status.success(),
            "expected distq to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    pub fn run(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("distq should run");
        RunAssert { output }
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn exit_code(&self) -> i32 {
        self.output.status.code().unwrap_or(-1)
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain {expected:?}\nstdout: {stdout}"
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain {expected:?}\nstderr: {stderr}"
        );
        self
    }
}

/// A fake test "runner" binary for the `ShellSuiteAdapter`: candidate files
/// are themselves the suite-name lists (one name per line), and whether a
/// suite passes is controlled by a sibling `<file>.outcomes` file listing
/// failing suite names, one per line. This keeps specs free of any real test
/// framework while exercising the adapter's actual subprocess contract
/// (`--list-suites <path>`, `--run-suite <name> <path>`).
pub const FAKE_RUNNER_SCRIPT: &str = r#"#!/bin/sh
set -e
case "$1" in
  --list-suites)
    cat "$2"
    ;;
  --run-suite)
    name="$2"
    path="$3"
    outcomes="$path.outcomes"
    if [ -f "$outcomes" ] && grep -qxF "$name" "$outcomes"; then
      echo "FAIL $name"
      exit 1
    fi
    echo "PASS $name"
    exit 0
    ;;
  *)
    echo "unknown command: $1" >&2
    exit 2
    ;;
esac
"#;

/// A scratch project directory with a fake runner installed, for driving the
/// whole `distq` binary end to end.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let runner_path = dir.path().join("fake_runner.sh");
        std::fs::write(&runner_path, FAKE_RUNNER_SCRIPT).expect("write runner");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&runner_path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&runner_path, perms).unwrap();
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn runner_path(&self) -> PathBuf {
        self.dir.path().join("fake_runner.sh")
    }

    /// Write a suite file (named `<name>.suite`, matched by the default
    /// `*.suite` glob) containing the given suite names, one per line.
    pub fn suite_file(&self, name: &str, suites: &[&str]) -> PathBuf {
        let path = self.dir.path().join(format!("{name}.suite"));
        std::fs::write(&path, suites.join("\n") + "\n").expect("write suite file");
        path
    }

    /// Mark suites in `path` as failing when run.
    pub fn fail_suites(&self, path: &Path, names: &[&str]) {
        std::fs::write(format!("{}.outcomes", path.display()), names.join("\n")).expect("write outcomes");
    }

    pub fn distq(&self) -> CliBuilder {
        cli().pwd(self.path()).args(&[
            "--runner",
            self.runner_path().to_string_lossy().as_ref(),
            "--scratch-dir",
            ".",
            "--glob-pattern",
            "*.suite",
        ])
    }
}
