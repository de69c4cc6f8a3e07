use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

/// Issues one ICMP echo probe with a bounded timeout to decide whether a
/// hostname answers.
///
/// "Down", "probe timed out", and "ping binary unavailable" all collapse to
/// unreachable; callers get no distinction.
#[derive(Debug, Clone)]
pub struct HostnameProber {
    timeout: Duration,
}

impl Default for HostnameProber {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

impl HostnameProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn probe(&self, hostname: &str) -> bool {
        let wait_secs = self.timeout.as_secs().max(1);
        let mut ping = Command::new("ping");
        ping.arg("-c")
            .arg("1")
            .arg("-W")
            .arg(wait_secs.to_string())
            .arg(hostname)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // The -W bound covers the echo wait; the outer timeout also covers
        // slow DNS resolution and a wedged ping process.
        let reachable = match tokio::time::timeout(
            self.timeout + Duration::from_secs(2),
            ping.status(),
        )
        .await
        {
            Ok(Ok(status)) => status.success(),
            Ok(Err(_)) | Err(_) => false,
        };

        debug!(hostname, reachable, "hostname probe");
        reachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unresolvable_hostname_is_unreachable() {
        let prober = HostnameProber::new(Duration::from_secs(1));
        assert!(!prober.probe("definitely-not-a-real-host.invalid").await);
    }
}
