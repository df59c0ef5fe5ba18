//! Compile-check harness: does a generated source actually compile?
//!
//! The check writes the source to a scratch `Main.java`, runs `javac` with
//! the mined jars on the classpath, and reports the combined compiler output.
//! It validates end results and is consumed by nothing else in the core
//! pipeline.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

static SCRATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
pub enum JavacError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("classpath cannot be joined on this platform: {0}")]
    Classpath(#[from] std::env::JoinPathsError),
}

#[derive(Debug, Clone)]
pub struct CompileOutcome {
    /// Zero exit status and an empty error stream.
    pub success: bool,
    /// Combined stdout and stderr, trimmed.
    pub output: String,
}

/// A `javac` invocation wrapper. `program` defaults to `javac` on `PATH`.
#[derive(Debug, Clone)]
pub struct JavacCheck {
    pub program: String,
}

impl Default for JavacCheck {
    fn default() -> Self {
        Self {
            program: "javac".to_string(),
        }
    }
}

impl JavacCheck {
    /// Whether the configured compiler can be spawned at all. Callers use
    /// this to skip compile checks in environments without a JDK.
    pub fn available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Compile `source` as `Main.java` against `classpath`. The scratch
    /// directory is removed afterwards regardless of the outcome.
    pub fn compile(&self, source: &str, classpath: &[PathBuf]) -> Result<CompileOutcome, JavacError> {
        let dir = scratch_dir()?;
        let outcome = self.compile_in(&dir, source, classpath);
        let _ = std::fs::remove_dir_all(&dir);
        outcome
    }

    fn compile_in(
        &self,
        dir: &Path,
        source: &str,
        classpath: &[PathBuf],
    ) -> Result<CompileOutcome, JavacError> {
        let source_file = dir.join("Main.java");
        std::fs::write(&source_file, source)?;

        let mut cmd = Command::new(&self.program);
        cmd.arg("-encoding");
        cmd.arg("UTF-8");
        cmd.arg("-d");
        cmd.arg(dir);
        if !classpath.is_empty() {
            cmd.arg("-cp");
            cmd.arg(std::env::join_paths(classpath)?);
        }
        cmd.arg(&source_file);
        cmd.stdin(Stdio::null());

        let output = cmd.output()?;
        let success = output.status.success() && output.stderr.is_empty();
        tracing::debug!(success, status = ?output.status, "javac finished");

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.stderr.is_empty() {
            if !combined.is_empty() {
                combined.push('\n');
            }
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
        }

        Ok(CompileOutcome {
            success,
            output: combined.trim().to_string(),
        })
    }
}

fn scratch_dir() -> std::io::Result<PathBuf> {
    let base = std::env::temp_dir().join("summon-javac");
    std::fs::create_dir_all(&base)?;
    let id = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = base.join(format!("check-{id}-{}", std::process::id()));
    std::fs::create_dir(&dir)?;
    Ok(dir)
}
