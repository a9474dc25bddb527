//! Running generated scripts through the external renderer.

use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};

use crate::RenderConfig;

/// Consumes a script file, reporting whether rendering succeeded.
pub trait Renderer {
    /// `interactive` is true when the output goes to a window rather than a
    /// file. An `Err` means the renderer could not be run at all.
    fn run(&self, script: &Path, interactive: bool) -> Result<bool>;
}

/// Renders by invoking the gnuplot binary on the script.
#[derive(Debug, Clone)]
pub struct GnuplotRenderer {
    program: String,
    persist: bool,
}

impl GnuplotRenderer {
    pub fn new(program: impl Into<String>, persist: bool) -> Self {
        Self {
            program: program.into(),
            persist,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.gnuplot.clone(), config.persist)
    }

    fn command(&self, script: &Path, interactive: bool) -> Command {
        let mut command = Command::new(&self.program);
        if interactive && self.persist {
            command.arg("-persist");
        }
        command.arg(script).stdin(Stdio::null());
        command
    }
}

impl Renderer for GnuplotRenderer {
    fn run(&self, script: &Path, interactive: bool) -> Result<bool> {
        info!("running {} on {}", self.program, script.display());
        let child = self
            .command(script, interactive)
            .spawn()
            .with_context(|| format!("Failed to start renderer '{}'", self.program))?;
        let status = ChildGuard::new(child).wait()?;
        debug!("{} exited with {}", self.program, status);
        Ok(status.success())
    }
}

/// Owns a spawned process and reaps it on every exit path. A child that is
/// still running when the guard drops is killed first.
struct ChildGuard {
    child: Option<Child>,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self { child: Some(child) }
    }

    fn wait(mut self) -> Result<ExitStatus> {
        let mut child = match self.child.take() {
            Some(child) => child,
            None => bail!("Renderer process was already reaped"),
        };
        let result = child.wait().context("Failed to wait for renderer process");
        if result.is_err() {
            self.child = Some(child);
        }
        result
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                warn!("killing renderer process {}", child.id());
                if let Err(e) = child.kill() {
                    warn!("failed to kill renderer process: {}", e);
                }
            }
            if let Err(e) = child.wait() {
                warn!("failed to reap renderer process: {}", e);
            }
        }
    }
}
