//! Run many probes with bounded concurrency.
//!
//! Each probe is a blocking curl call on tokio's blocking pool; a semaphore
//! caps how many are in flight. Results are keyed by the position of the ad
//! and URL they belong to, so completion order does not matter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::model::AdRecord;

use super::{ProbeConfig, ProbeOutcome, Prober};

/// One URL to probe, with the position it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub ad_index: usize,
    pub url_index: usize,
    pub url: String,
}

impl ProbeTarget {
    /// One target per final URL of every ad, in audit order.
    pub fn from_ads(ads: &[AdRecord]) -> Vec<Self> {
        ads.iter()
            .enumerate()
            .flat_map(|(ad_index, ad)| {
                ad.final_urls
                    .iter()
                    .enumerate()
                    .map(move |(url_index, url)| ProbeTarget {
                        ad_index,
                        url_index,
                        url: url.clone(),
                    })
            })
            .collect()
    }
}

/// Probe outcomes keyed by `(ad_index, url_index)`.
#[derive(Debug, Clone, Default)]
pub struct ProbeResults {
    outcomes: HashMap<(usize, usize), ProbeOutcome>,
}

impl ProbeResults {
    pub fn insert(&mut self, ad_index: usize, url_index: usize, outcome: ProbeOutcome) {
        self.outcomes.insert((ad_index, url_index), outcome);
    }

    pub fn get(&self, ad_index: usize, url_index: usize) -> Option<&ProbeOutcome> {
        self.outcomes.get(&(ad_index, url_index))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Probes every target with at most `cfg.concurrency` requests in flight.
///
/// Once `cancel` is set no new probe is started; probes already running
/// finish or time out normally and their results are kept. Targets that were
/// never started have no entry in the result.
pub async fn probe_all(
    prober: Arc<dyn Prober>,
    targets: Vec<ProbeTarget>,
    cfg: &ProbeConfig,
    cancel: Arc<AtomicBool>,
) -> ProbeResults {
    let total = targets.len();
    let timeout = cfg.timeout();
    let semaphore = Arc::new(Semaphore::new(cfg.concurrency.max(1)));
    let mut join_set = JoinSet::new();
    let mut started = 0usize;

    for target in targets {
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            break;
        };
        if cancel.load(Ordering::Relaxed) {
            tracing::info!(started, total, "probe batch cancelled");
            break;
        }
        let prober = Arc::clone(&prober);
        started += 1;
        join_set.spawn_blocking(move || {
            let _permit = permit;
            let outcome = prober.probe(&target.url, timeout);
            tracing::debug!(url = %target.url, ?outcome, "probe finished");
            (target, outcome)
        });
    }

    let mut results = ProbeResults::default();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((target, outcome)) => results.insert(target.ad_index, target.url_index, outcome),
            Err(e) => tracing::warn!("probe task join: {}", e),
        }
    }
    tracing::info!(probed = results.len(), total, "probe batch complete");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct FixedProber {
        calls: AtomicUsize,
    }

    impl Prober for FixedProber {
        fn probe(&self, url: &str, _timeout: Duration) -> ProbeOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if url.contains("broken") {
                ProbeOutcome::Responded {
                    status: 404,
                    final_url: url.to_string(),
                }
            } else {
                ProbeOutcome::Responded {
                    status: 200,
                    final_url: url.to_string(),
                }
            }
        }
    }

    fn ad(id: &str, urls: &[&str]) -> AdRecord {
        AdRecord {
            ad_id: id.into(),
            final_urls: urls.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn targets_follow_ad_and_url_positions() {
        let ads = vec![ad("1", &["https://a/", "https://b/"]), ad("2", &[]), ad("3", &["https://c/"])];
        let targets = ProbeTarget::from_ads(&ads);
        let pos: Vec<(usize, usize)> = targets.iter().map(|t| (t.ad_index, t.url_index)).collect();
        assert_eq!(pos, vec![(0, 0), (0, 1), (2, 0)]);
    }

    #[tokio::test]
    async fn results_are_attributed_to_their_position() {
        let ads = vec![
            ad("1", &["https://ok.example/", "https://broken.example/"]),
            ad("2", &["https://ok.example/other"]),
        ];
        let prober = Arc::new(FixedProber {
            calls: AtomicUsize::new(0),
        });
        let cfg = ProbeConfig {
            enabled: true,
            timeout_secs: 1,
            concurrency: 2,
        };
        let results = probe_all(
            prober.clone(),
            ProbeTarget::from_ads(&ads),
            &cfg,
            Arc::new(AtomicBool::new(false)),
        )
        .await;
        assert_eq!(results.len(), 3);
        assert_eq!(prober.calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            results.get(0, 1),
            Some(ProbeOutcome::Responded { status: 404, .. })
        ));
        assert!(matches!(
            results.get(1, 0),
            Some(ProbeOutcome::Responded { status: 200, .. })
        ));
    }

    #[tokio::test]
    async fn cancelled_batch_starts_nothing_new() {
        let ads = vec![ad("1", &["https://a/", "https://b/"])];
        let prober = Arc::new(FixedProber {
            calls: AtomicUsize::new(0),
        });
        let results = probe_all(
            prober.clone(),
            ProbeTarget::from_ads(&ads),
            &ProbeConfig::default(),
            Arc::new(AtomicBool::new(true)),
        )
        .await;
        assert!(results.is_empty());
        assert_eq!(prober.calls.load(Ordering::SeqCst), 0);
    }
}
