//! Version check module
//!
//! Compares each emulator's installed version with its latest release.

use crate::core::emulator::{EmulatorDescriptor, Registry};
use crate::core::error::ProbeError;
use crate::core::release::ReleaseFeed;
use futures::future::join_all;
use std::sync::Arc;

/// An emulator whose installed version differs from the latest release
#[derive(Debug, Clone)]
pub struct VersionReport {
    pub installed: String,
    pub latest: String,
    pub emulator: Arc<EmulatorDescriptor>,
}

/// Outcome of checking one emulator
#[derive(Debug)]
pub enum VersionStatus {
    /// Installed version is the latest release
    UpToDate {
        emulator: Arc<EmulatorDescriptor>,
        version: String,
    },
    /// A different release is available
    Outdated(VersionReport),
    /// One of the probes failed; treated as not outdated
    Unknown {
        emulator: Arc<EmulatorDescriptor>,
        reason: String,
    },
}

impl VersionStatus {
    /// Combine the results of both probes
    pub fn from_probes(
        emulator: &Arc<EmulatorDescriptor>,
        installed: Result<String, ProbeError>,
        latest: Result<String, ProbeError>,
    ) -> Self {
        match (installed, latest) {
            (Ok(installed), Ok(latest)) => {
                if same_version(&installed, &latest) {
                    VersionStatus::UpToDate {
                        emulator: Arc::clone(emulator),
                        version: installed,
                    }
                } else {
                    VersionStatus::Outdated(VersionReport {
                        installed,
                        latest,
                        emulator: Arc::clone(emulator),
                    })
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Version check for {} failed: {}", emulator.id(), e);
                VersionStatus::Unknown {
                    emulator: Arc::clone(emulator),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn emulator(&self) -> &Arc<EmulatorDescriptor> {
        match self {
            VersionStatus::UpToDate { emulator, .. }
            | VersionStatus::Unknown { emulator, .. }
            | VersionStatus::Outdated(VersionReport { emulator, .. }) => emulator,
        }
    }

    pub fn emulator_id(&self) -> &str {
        self.emulator().id()
    }
}

/// Release tags may carry a single `v` prefix the binaries do not print
fn same_version(installed: &str, latest: &str) -> bool {
    latest.strip_prefix('v').unwrap_or(latest) == installed
}

/// Probe one emulator
pub async fn check_emulator(emulator: &Arc<EmulatorDescriptor>, feed: &ReleaseFeed) -> VersionStatus {
    let (installed, latest) = tokio::join!(
        emulator.installed_version(feed.timeout()),
        emulator.latest_version(feed)
    );
    VersionStatus::from_probes(emulator, installed, latest)
}

/// Probe every registered emulator concurrently
///
/// Results are in registration order. A failing emulator never aborts the pass.
pub async fn check_all(registry: &Registry, feed: &ReleaseFeed) -> Vec<VersionStatus> {
    join_all(registry.all().iter().map(|e| check_emulator(e, feed))).await
}

/// The outdated emulators out of a check pass
pub fn outdated(statuses: Vec<VersionStatus>) -> Vec<VersionReport> {
    statuses
        .into_iter()
        .filter_map(|status| match status {
            VersionStatus::Outdated(report) => Some(report),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use crate::core::emulator::EmulatorKind;
    use std::path::Path;

    fn mgba() -> Arc<EmulatorDescriptor> {
        Arc::new(EmulatorDescriptor::builtin(EmulatorKind::Mgba, Path::new("/lib")))
    }

    fn feed_failure() -> ProbeError {
        ProbeError::ReleaseFeedUnavailable {
            source_repo: "mgba-emu/mgba".to_string(),
            reason: "request timed out".to_string(),
        }
    }

    #[test]
    fn test_matching_versions_no_report() {
        let status = VersionStatus::from_probes(&mgba(), Ok("0.10.3".into()), Ok("0.10.3".into()));
        assert!(matches!(status, VersionStatus::UpToDate { .. }));
        assert!(outdated(vec![status]).is_empty());
    }

    #[test]
    fn test_mismatch_single_report() {
        let status = VersionStatus::from_probes(&mgba(), Ok("0.10.2".into()), Ok("0.10.3".into()));
        let reports = outdated(vec![status]);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].installed, "0.10.2");
        assert_eq!(reports[0].latest, "0.10.3");
        assert_eq!(reports[0].emulator.id(), "mgba");
    }

    #[test]
    fn test_v_prefix_ignored() {
        let status = VersionStatus::from_probes(&mgba(), Ok("0.10.3".into()), Ok("v0.10.3".into()));
        assert!(matches!(status, VersionStatus::UpToDate { .. }));
    }

    #[test]
    fn test_blank_or_mangled_tag_is_outdated() {
        for (installed, latest) in [("0.10.3", ""), ("v", ""), ("1.0", "vvv1.0"), ("0.10.3", " 0.10.3")] {
            let status = VersionStatus::from_probes(&mgba(), Ok(installed.into()), Ok(latest.into()));
            let reports = outdated(vec![status]);
            assert_eq!(reports.len(), 1, "{:?} vs {:?}", installed, latest);
            assert_eq!(reports[0].installed, installed);
            assert_eq!(reports[0].latest, latest);
        }
    }

    #[test]
    fn test_status_keeps_descriptor() {
        let emulator = mgba();
        let statuses = [
            VersionStatus::from_probes(&emulator, Ok("1".into()), Ok("1".into())),
            VersionStatus::from_probes(&emulator, Ok("1".into()), Ok("2".into())),
            VersionStatus::from_probes(&emulator, Ok("1".into()), Err(feed_failure())),
        ];
        for status in &statuses {
            assert!(Arc::ptr_eq(status.emulator(), &emulator));
            assert_eq!(status.emulator_id(), "mgba");
        }
    }

    #[test]
    fn test_probe_failure_is_unknown() {
        let status = VersionStatus::from_probes(&mgba(), Ok("0.10.3".into()), Err(feed_failure()));
        assert!(matches!(status, VersionStatus::Unknown { ref emulator, .. } if emulator.id() == "mgba"));
        assert_eq!(status.emulator_id(), "mgba");
        assert!(outdated(vec![status]).is_empty());
    }

    #[tokio::test]
    async fn test_check_all_survives_failures() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::builtin(dir.path()).unwrap();
        let network = NetworkConfig {
            timeout_seconds: 1,
            api_base: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let feed = ReleaseFeed::new(crate::util::http_client(&network).unwrap(), &network);

        let statuses = check_all(&registry, &feed).await;
        let ids: Vec<_> = statuses.iter().map(|s| s.emulator_id()).collect();
        assert_eq!(ids, ["mgba", "dolphin", "melonds", "azahar"]);

        // No binaries installed: tracked emulators are unknown, dolphin is untracked
        assert!(matches!(statuses[1], VersionStatus::UpToDate { .. }));
        for i in [0, 2, 3] {
            assert!(matches!(statuses[i], VersionStatus::Unknown { .. }));
        }
        assert!(outdated(statuses).is_empty());
    }
}
