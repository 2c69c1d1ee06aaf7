//! Hand-written port mocks shared by the unit tests.

#![allow(clippy::expect_used, dead_code)]

use std::collections::{HashMap, VecDeque};
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::Mutex;

use anyhow::{Context, Result};
use gridbanner_keys::application::ports::{
    AccountDirectory, AccountEntry, AccountLookup, CommandRunner, FileOwnership, JobTable,
    KeySource, LocalFs, PrivilegeProbe,
};
use gridbanner_keys::domain::{FetchError, KeyPayload, ScheduleError};
use gridbanner_keys::infra::fs;

pub fn exit_status(code: i32) -> ExitStatus {
    ExitStatus::from_raw(code << 8)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Host: accounts, privilege, ownership, real files in a temp dir ───────────

/// Host double backed by real files; the user database and privilege are scripted.
#[derive(Default)]
pub struct FakeHost {
    accounts: HashMap<String, AccountEntry>,
    directory_down: bool,
    elevated: bool,
    chown_fails: bool,
    deny_writes: bool,
    pub chowned: Mutex<Vec<(PathBuf, u32, u32)>>,
    pub writes: Mutex<Vec<PathBuf>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, name: &str, home: &Path) -> Self {
        let id = 1000 + u32::try_from(self.accounts.len()).expect("few accounts");
        self.accounts.insert(
            name.to_string(),
            AccountEntry {
                name: name.to_string(),
                home: home.to_path_buf(),
                uid: id,
                gid: id,
            },
        );
        self
    }

    pub fn elevated(mut self) -> Self {
        self.elevated = true;
        self
    }

    /// Every lookup reports the user database as unreachable.
    pub fn directory_down(mut self) -> Self {
        self.directory_down = true;
        self
    }

    pub fn chown_fails(mut self) -> Self {
        self.chown_fails = true;
        self
    }

    /// File writes fail with `EACCES` regardless of the real permissions.
    pub fn deny_writes(mut self) -> Self {
        self.deny_writes = true;
        self
    }

    pub fn chowned(&self) -> Vec<(PathBuf, u32, u32)> {
        self.chowned.lock().expect("lock").clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().expect("lock").len()
    }
}

impl AccountDirectory for FakeHost {
    fn lookup(&self, name: &str) -> AccountLookup {
        if self.directory_down {
            return AccountLookup::Unavailable("nss backend offline".to_string());
        }
        self.accounts
            .get(name)
            .cloned()
            .map_or(AccountLookup::NotFound, AccountLookup::Found)
    }
}

impl PrivilegeProbe for FakeHost {
    fn is_elevated(&self) -> bool {
        self.elevated
    }
}

impl FileOwnership for FakeHost {
    fn chown(&self, path: &Path, uid: u32, gid: u32) -> Result<()> {
        if self.chown_fails {
            anyhow::bail!("chown {}: operation not permitted", path.display());
        }
        self.chowned
            .lock()
            .expect("lock")
            .push((path.to_path_buf(), uid, gid));
        Ok(())
    }
}

impl LocalFs for FakeHost {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.is_symlink()
    }

    fn create_dir(&self, path: &Path, mode: u32) -> Result<()> {
        fs::create_dir(path, mode)
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        fs::copy_preserving(from, to)
    }

    fn replace(&self, path: &Path, content: &[u8], mode: u32) -> Result<()> {
        if self.deny_writes {
            return Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
                .with_context(|| format!("writing {}", path.display()));
        }
        self.writes.lock().expect("lock").push(path.to_path_buf());
        fs::replace_file(path, content, mode)
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()> {
        fs::set_permissions(path, mode)
    }
}

// ── Key source ────────────────────────────────────────────────────────────────

/// Returns the same canned result on every fetch and counts calls.
pub struct StaticKeySource {
    result: Result<KeyPayload, FetchError>,
    pub calls: Mutex<Vec<(String, String, String)>>,
}

impl StaticKeySource {
    pub fn keys(body: &str) -> Self {
        Self {
            result: Ok(KeyPayload::new(body)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: FetchError) -> Self {
        Self {
            result: Err(err),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("lock").len()
    }
}

impl KeySource for StaticKeySource {
    async fn fetch(
        &self,
        server: &str,
        credential: &str,
        group: &str,
    ) -> std::result::Result<KeyPayload, FetchError> {
        self.calls.lock().expect("lock").push((
            server.to_string(),
            credential.to_string(),
            group.to_string(),
        ));
        self.result.clone()
    }
}

// ── Job table ─────────────────────────────────────────────────────────────────

/// In-memory crontab. `None` means the user has no table.
#[derive(Default)]
pub struct MemoryTable {
    content: Mutex<Option<String>>,
    pub reads: Mutex<u32>,
    pub writes: Mutex<u32>,
    pub clears: Mutex<u32>,
}

impl MemoryTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(content: &str) -> Self {
        Self {
            content: Mutex::new(Some(content.to_string())),
            ..Self::default()
        }
    }

    pub fn content(&self) -> Option<String> {
        self.content.lock().expect("lock").clone()
    }

    pub fn reads(&self) -> u32 {
        *self.reads.lock().expect("lock")
    }

    pub fn writes(&self) -> u32 {
        *self.writes.lock().expect("lock")
    }

    pub fn clears(&self) -> u32 {
        *self.clears.lock().expect("lock")
    }
}

impl JobTable for MemoryTable {
    async fn read(&self) -> std::result::Result<Option<String>, ScheduleError> {
        *self.reads.lock().expect("lock") += 1;
        Ok(self.content())
    }

    async fn write(&self, table: &str) -> std::result::Result<(), ScheduleError> {
        *self.writes.lock().expect("lock") += 1;
        *self.content.lock().expect("lock") = Some(table.to_string());
        Ok(())
    }

    async fn clear(&self) -> std::result::Result<(), ScheduleError> {
        *self.clears.lock().expect("lock") += 1;
        *self.content.lock().expect("lock") = None;
        Ok(())
    }
}

// ── Command runner ────────────────────────────────────────────────────────────

/// One recorded process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<Vec<u8>>,
}

/// Replays queued outputs in order and records every call.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: Mutex<VecDeque<Result<Output>>>,
    pub calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn replying(responses: Vec<Result<Output>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().expect("lock").clone()
    }

    fn next(&self, program: &str, args: &[&str], stdin: Option<&[u8]>) -> Result<Output> {
        self.calls.lock().expect("lock").push(Invocation {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            stdin: stdin.map(<[u8]>::to_vec),
        });
        self.responses
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("unexpected call: {program} {args:?}")))
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.next(program, args, None)
    }

    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output> {
        self.next(program, args, Some(stdin))
    }
}

impl CommandRunner for &ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.next(program, args, None)
    }

    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output> {
        self.next(program, args, Some(stdin))
    }
}
