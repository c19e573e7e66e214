use std::sync::Arc;

use tracing::{debug, warn};

use cy_core::ports::StatsPort;
use cy_core::Metrics;

use crate::lifecycle::Liveness;
use crate::state::StateHandle;

/// Pulls follower and visitor counts into the metrics.
///
/// The two lookups are independent: either may fail and leave its metric at
/// the previous value.
pub struct RefreshMetrics {
    stats: Arc<dyn StatsPort>,
    state: StateHandle,
    liveness: Liveness,
}

impl RefreshMetrics {
    pub fn from_ports(stats: Arc<dyn StatsPort>, state: StateHandle, liveness: Liveness) -> Self {
        Self {
            stats,
            state,
            liveness,
        }
    }

    #[tracing::instrument(name = "usecase.refresh_metrics.execute", skip(self))]
    pub async fn execute(&self) -> Metrics {
        let (followers, visitors) =
            tokio::join!(self.stats.follower_count(), self.stats.visitor_stats());

        if !self.liveness.is_alive() {
            debug!("torn down, discarding metrics");
            return self.state.read(|s| s.metrics);
        }

        self.state.update(|s| {
            match followers {
                Ok(count) => s.metrics.instagram = count,
                Err(err) => warn!(error = %err, "follower count unavailable"),
            }
            match visitors {
                Ok(stats) => {
                    if let Some(total) = stats.total {
                        s.metrics.website = total;
                    }
                    s.metrics.website_weekly = stats.weekly;
                }
                Err(err) => warn!(error = %err, "visitor stats unavailable"),
            }
            s.metrics
        })
    }
}
