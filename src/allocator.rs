use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::AppError;

/// Captured output of a finished allocator run
#[derive(Debug, Default)]
pub(crate) struct AllocatorOutput {
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

/// Run the external allocator in `workdir` and wait for it.
///
/// The allocator takes no arguments: it reads `budget_params.csv` from its
/// working directory.
pub(crate) fn run_allocator(command: &[String], workdir: &Path) -> Result<AllocatorOutput, AppError> {
    let (program, args) = command.split_first().ok_or(AppError::EmptyAllocatorCommand)?;
    debug!("Running allocator {program} {args:?} in {}", workdir.display());

    let output = Command::new(program)
        .args(args)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::AllocatorNotFound {
                    program: program.clone(),
                }
            } else {
                AppError::AllocatorSpawn(e)
            }
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if output.status.success() {
        info!("Allocator finished: {}", output.status);
        Ok(AllocatorOutput { stdout, stderr })
    } else {
        Err(AppError::AllocatorFailed {
            status: output.status.to_string(),
            stderr: stderr.trim().to_string(),
        })
    }
}
