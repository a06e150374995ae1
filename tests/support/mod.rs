#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn cmdhub_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cmdhub"))
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

pub fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

/// Scratch install: an exec directory, one extra PATH directory, and a
/// config location that starts out absent.
pub struct Sandbox {
    root: TempDir,
    pub exec_dir: PathBuf,
    pub path_dir: PathBuf,
    pub config: PathBuf,
}

impl Sandbox {
    pub fn new() -> Result<Self> {
        let root = TempDir::new().context("failed to allocate sandbox")?;
        let exec_dir = fs::canonicalize(root.path())?.join("libexec");
        let path_dir = fs::canonicalize(root.path())?.join("path");
        fs::create_dir(&exec_dir)?;
        fs::create_dir(&path_dir)?;
        let config = root.path().join("config.json");
        Ok(Self {
            root,
            exec_dir,
            path_dir,
            config,
        })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Write an executable `sh` script named `file_name` into `dir`.
    pub fn install_script(&self, dir: &Path, file_name: &str, body: &str) -> Result<PathBuf> {
        let path = dir.join(file_name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n"))
            .with_context(|| format!("failed to write {}", path.display()))?;
        make_executable(&path)?;
        Ok(path)
    }

    /// Install `cmdhub-<name>` in the exec directory; it echoes its name and args.
    pub fn helper(&self, name: &str) -> Result<PathBuf> {
        self.install_script(
            &self.exec_dir,
            &format!("cmdhub-{name}"),
            &format!("echo \"{name} ran: $*\""),
        )
    }

    pub fn write_config(&self, json: &str) -> Result<()> {
        fs::write(&self.config, json).context("failed to write config")
    }

    /// The binary wired to this sandbox and isolated from the caller's env.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(cmdhub_binary());
        cmd.env("CMDHUB_EXEC_PATH", &self.exec_dir)
            .env("PATH", &self.path_dir)
            .env("CMDHUB_CONFIG", &self.config)
            .env_remove("CMDHUB_AUTOCORRECT")
            .env_remove("CMDHUB_LOG");
        cmd
    }
}
