use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use chrono::Utc;
use tokio::process::Command;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ProvisionError, Result};

/// Placeholder substituted with the submitted prefix when rendering the
/// script template.
pub const PREFIX_PLACEHOLDER: &str = "{{HOSTNAME_PREFIX}}";

/// Result of one script execution.
#[derive(Debug, Clone)]
pub struct ScriptOutcome {
    pub exit_code: i32,
    pub log_file: PathBuf,
    pub stdout: String,
    pub stderr: String,
}

/// Renders the provisioning template, runs it as a child process, and
/// captures the transcript to a log file.
///
/// The rendered script is written to a uniquely named temporary executable
/// that is removed once the run finishes, whether or not it succeeded. The
/// child runs without stdin and with no timeout; a hung script blocks its job
/// indefinitely (known limitation).
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    template_path: PathBuf,
    logs_dir: PathBuf,
}

impl ScriptRunner {
    pub fn new(template_path: impl Into<PathBuf>, logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
            logs_dir: logs_dir.into(),
        }
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    /// Substitute the submitted prefix into the template body.
    pub async fn render(&self, hostname_prefix: &str) -> Result<String> {
        let template = tokio::fs::read_to_string(&self.template_path)
            .await
            .map_err(|err| {
                ProvisionError::Template(format!(
                    "failed to read {}: {err}",
                    self.template_path.display()
                ))
            })?;
        Ok(template.replace(PREFIX_PLACEHOLDER, hostname_prefix))
    }

    /// Run the rendered script for one job, capturing stdout and stderr fully.
    ///
    /// The combined transcript (metadata header, stdout, stderr, exit code) is
    /// persisted to `logs/script_{timestamp}_{job_id}.log` so it can be
    /// retrieved by path later.
    pub async fn run(&self, job_id: Uuid, hostname_prefix: &str) -> Result<ScriptOutcome> {
        let body = self.render(hostname_prefix).await?;
        let started_at = Utc::now();

        let script_path = write_temp_script(&body)?;
        debug!(%job_id, script = %script_path.display(), "rendered provisioning script");

        let output = Command::new(&*script_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|err| ProvisionError::Launch(err.to_string()))?;
        // `script_path` drops at the end of this function, removing the temp
        // file on every exit path.

        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        let log_file = self
            .logs_dir
            .join(format!("script_{}_{job_id}.log", started_at.format("%Y%m%d_%H%M%S")));
        let transcript = format!(
            "=== Provisioning job {job_id} ===\n\
             prefix: {hostname_prefix}\n\
             started: {}\n\n\
             --- stdout ---\n{stdout}\n\
             --- stderr ---\n{stderr}\n\
             exit code: {exit_code}\n",
            started_at.to_rfc3339(),
        );
        tokio::fs::create_dir_all(&self.logs_dir).await?;
        tokio::fs::write(&log_file, transcript).await?;

        info!(%job_id, exit_code, log = %log_file.display(), "provisioning script finished");

        Ok(ScriptOutcome {
            exit_code,
            log_file,
            stdout,
            stderr,
        })
    }
}

/// Write the script body to a uniquely named executable temp file.
///
/// The returned [`tempfile::TempPath`] has its file descriptor closed (the
/// kernel refuses to exec a file that is still open for writing) and deletes
/// the file when dropped.
fn write_temp_script(body: &str) -> Result<tempfile::TempPath> {
    let mut file = tempfile::Builder::new()
        .prefix("provision_")
        .suffix(".sh")
        .tempfile()?;
    file.write_all(body.as_bytes())?;
    file.flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o755))?;
    }

    Ok(file.into_temp_path())
}
