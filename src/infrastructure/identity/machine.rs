#[cfg(test)]
#[path = "machine_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;

use crate::domain::models::IdentityProvider;

/// Fingerprints the local machine and user profile from environment signals.
/// A fraud-deterrence heuristic, not a security boundary.
pub struct MachineIdentity {
    machine_id_files: Vec<path::PathBuf>,
}

impl Default for MachineIdentity {
    fn default() -> MachineIdentity {
        return MachineIdentity {
            machine_id_files: vec![
                path::PathBuf::from("/etc/machine-id"),
                path::PathBuf::from("/var/lib/dbus/machine-id"),
                path::PathBuf::from("/etc/hostname"),
            ],
        };
    }
}

impl MachineIdentity {
    pub fn fingerprint(signals: &[String]) -> String {
        let digest = md5::compute(signals.join("|").as_bytes());
        return format!("fhn-{:x}", digest);
    }

    async fn signals(&self) -> Vec<String> {
        let mut signals = vec![
            env::consts::OS.to_string(),
            env::consts::ARCH.to_string(),
        ];

        for key in ["USER", "USERNAME", "HOSTNAME", "COMPUTERNAME"] {
            if let Ok(val) = env::var(key) {
                if !val.trim().is_empty() {
                    signals.push(format!("{key}={}", val.trim()));
                }
            }
        }

        if let Some(home) = dirs::home_dir() {
            signals.push(home.to_string_lossy().to_string());
        }

        for file in self.machine_id_files.iter() {
            if let Ok(payload) = fs::read_to_string(file).await {
                let trimmed = payload.trim();
                if !trimmed.is_empty() {
                    signals.push(trimmed.to_string());
                }
            }
        }

        return signals;
    }
}

#[async_trait]
impl IdentityProvider for MachineIdentity {
    #[allow(clippy::implicit_return)]
    async fn get_id(&self) -> Result<String> {
        let signals = self.signals().await;

        // OS and arch alone would collapse every machine into one id.
        if signals.len() <= 2 {
            bail!("Not enough environment signals to derive a device id");
        }

        tracing::debug!(signals = signals.len(), "Derived device id");
        return Ok(MachineIdentity::fingerprint(&signals));
    }
}
