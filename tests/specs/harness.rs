//! Shared scaffolding for the workspace-level end-to-end specs (spec.md
//! §8 "Concrete end-to-end scenarios"). These tests drive the actual
//! `graced` and `grace` binaries — every crate already has unit/property
//! tests against its own public API; this file is the one place that
//! proves the assembled binaries talk to each other correctly over the
//! wire protocol.

use std::path::{Path, PathBuf};
use std::process::Child;
use std::time::{Duration, Instant};

use assert_cmd::Command;

/// How long we'll poll for `graced`'s socket to appear before giving up.
pub const BOOT_WAIT: Duration = Duration::from_secs(15);

/// A `graced` instance running against a scratch journal/route manifest,
/// killed on drop so a failing assertion never leaks a process.
pub struct Daemon {
    dir: tempfile::TempDir,
    child: Option<Child>,
    journal_path: PathBuf,
    socket_path: PathBuf,
}

impl Daemon {
    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub fn route_manifest_path(&self) -> PathBuf {
        self.dir.path().join("routes.toml")
    }

    /// Writes a route manifest and a scratch journal/socket path, but does
    /// not start `graced` yet — callers that want to seed the journal
    /// before first boot need the paths first (spec scenario 3).
    pub fn prepare(manifest: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("routes.toml"), manifest).expect("write route manifest");
        let journal_path = dir.path().join("journal.ndjson");
        let socket_path = dir.path().join("grace.sock");
        Self { dir, child: None, journal_path, socket_path }
    }

    /// Spawns `graced` against this scratch environment and waits for its
    /// admin socket to appear.
    pub fn spawn(manifest: &str) -> Self {
        let mut daemon = Self::prepare(manifest);
        daemon.start();
        daemon
    }

    pub fn start(&mut self) {
        assert!(self.child.is_none(), "daemon already started");
        let mut command = Command::cargo_bin("graced").expect("graced binary built by the workspace");
        command
            .env("CORE_JOURNAL_PATH", &self.journal_path)
            .env("CORE_ROUTE_MANIFEST_PATH", self.route_manifest_path())
            .env("CORE_SOCKET_PATH", &self.socket_path)
            .env("CORE_BOOT_TIMEOUT_SECONDS", "10")
            .env_remove("CORE_TCP_PORT")
            .env_remove("CORE_AUTH_TOKEN");
        let child = command.spawn().expect("spawn graced");
        self.child = Some(child);
        self.wait_for_socket();
    }

    fn wait_for_socket(&self) {
        let deadline = Instant::now() + BOOT_WAIT;
        while Instant::now() < deadline {
            if self.socket_path.exists() {
                return;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        panic!("graced did not create its admin socket within {BOOT_WAIT:?}");
    }

    /// Runs `grace` against this daemon's socket and returns the raw
    /// stdout, asserting a zero exit code.
    pub fn grace(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        Command::cargo_bin("grace")
            .expect("grace binary built by the workspace")
            .arg("--socket")
            .arg(&self.socket_path)
            .arg("--json")
            .args(args)
            .assert()
    }

    /// Waits for the spawned process to exit on its own (used when a
    /// scenario expects `graced` to fail boot and exit, rather than
    /// staying up for a `halt`).
    pub fn wait_for_exit(&mut self, within: Duration) -> std::process::ExitStatus {
        let child = self.child.as_mut().expect("daemon was started");
        let deadline = Instant::now() + within;
        loop {
            if let Some(status) = child.try_wait().expect("poll child status") {
                return status;
            }
            if Instant::now() >= deadline {
                panic!("graced did not exit within {within:?}");
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
