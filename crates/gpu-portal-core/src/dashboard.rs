//! Dashboard aggregation: summary counts, allocation cards and the usage chart.

use crate::history::RequestStatus;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Days shown on the usage chart.
pub const CHART_DAYS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ModelAvailability {
    pub name: String,
    pub total: u32,
    pub available: u32,
}

impl ModelAvailability {
    pub fn available_percent(&self) -> u32 {
        percent(self.available, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ClusterAvailability {
    pub total: u32,
    pub in_use: u32,
    pub available: u32,
    pub models: Vec<ModelAvailability>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AllocationStatus {
    Active,
    Pending,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    Normal,
    Warning,
    Critical,
}

impl WarningLevel {
    pub fn for_days_remaining(days: i64) -> Self {
        if days <= 1 {
            WarningLevel::Critical
        } else if days <= 3 {
            WarningLevel::Warning
        } else {
            WarningLevel::Normal
        }
    }
}

/// A GPU currently allocated to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ActiveAllocation {
    pub id: String,
    pub name: String,
    pub memory_gb: u32,
    pub status: AllocationStatus,
    pub expires_at: DateTime<Utc>,
}

impl ActiveAllocation {
    /// Whole days left, rounded up. Negative once expired.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        let millis = (self.expires_at - now).num_milliseconds();
        let day = Duration::days(1).num_milliseconds();
        millis.div_euclid(day) + i64::from(millis.rem_euclid(day) != 0)
    }

    pub fn warning_level(&self, now: DateTime<Utc>) -> WarningLevel {
        WarningLevel::for_days_remaining(self.days_remaining(now))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecentRequest {
    pub id: String,
    pub gpu_type: String,
    pub requested_at: DateTime<Utc>,
    pub status: RequestStatus,
    pub duration_days: u32,
}

/// The four headline numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DashboardSummary {
    pub active_gpus: usize,
    pub available_gpus: u32,
    /// Percent of the cluster in use, rounded
    pub usage_rate: u32,
    pub pending_requests: usize,
}

impl DashboardSummary {
    pub fn compute(
        allocations: &[ActiveAllocation],
        cluster: &ClusterAvailability,
        recent: &[RecentRequest],
    ) -> Self {
        Self {
            active_gpus: allocations.len(),
            available_gpus: cluster.available,
            usage_rate: percent(cluster.in_use, cluster.total),
            pending_requests: recent
                .iter()
                .filter(|r| r.status == RequestStatus::Pending)
                .count(),
        }
    }
}

fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(whole) * 100.0).round() as u32
}

/// Seven-day utilization series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UsageChart {
    pub labels: Vec<String>,
    pub cpu_usage: Vec<i64>,
    pub memory_usage: Vec<i64>,
    pub gpu_utilization: Vec<i64>,
}

impl UsageChart {
    /// Random upward-trending series for the week ending `today`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> Self {
        let labels = (0..CHART_DAYS)
            .map(|i| {
                let back = (CHART_DAYS - 1 - i) as i64;
                (today - Duration::days(back)).format("%a, %b %-d").to_string()
            })
            .collect();

        let mut series = |base: f64, slope: f64, spread: f64| -> Vec<i64> {
            (0..CHART_DAYS)
                .map(|i| {
                    let noise = rng.random_range(-spread..spread);
                    (base + slope * i as f64 + noise).round() as i64
                })
                .collect()
        };

        let cpu_usage = series(50.0, 5.0, 10.0);
        let memory_usage = series(60.0, 4.0, 7.5);
        let gpu_utilization = series(70.0, 3.0, 5.0);

        Self {
            labels,
            cpu_usage,
            memory_usage,
            gpu_utilization,
        }
    }
}

/// Everything the dashboard page renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DashboardSnapshot {
    pub summary: DashboardSummary,
    pub allocations: Vec<ActiveAllocation>,
    pub recent_requests: Vec<RecentRequest>,
    pub availability: ClusterAvailability,
    pub chart: UsageChart,
}

impl DashboardSnapshot {
    pub fn build<R: Rng + ?Sized>(
        allocations: Vec<ActiveAllocation>,
        recent_requests: Vec<RecentRequest>,
        availability: ClusterAvailability,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Self {
        let summary = DashboardSummary::compute(&allocations, &availability, &recent_requests);
        Self {
            summary,
            allocations,
            recent_requests,
            availability,
            chart: UsageChart::generate(rng, now.date_naive()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    #[test]
    fn summary_from_canned_data() {
        let now = Utc::now();
        let summary = DashboardSummary::compute(
            &mock::active_allocations(now),
            &mock::cluster_availability(),
            &mock::recent_requests(now),
        );
        assert_eq!(
            summary,
            DashboardSummary {
                active_gpus: 2,
                available_gpus: 16,
                usage_rate: 67,
                pending_requests: 1,
            }
        );
    }

    #[test]
    fn empty_cluster_has_zero_usage() {
        let cluster = ClusterAvailability {
            total: 0,
            in_use: 0,
            available: 0,
            models: Vec::new(),
        };
        assert_eq!(DashboardSummary::compute(&[], &cluster, &[]).usage_rate, 0);
    }

    #[rstest]
    #[case(Duration::days(5), 5, WarningLevel::Normal)]
    #[case(Duration::days(2), 2, WarningLevel::Warning)]
    #[case(Duration::hours(30), 2, WarningLevel::Warning)]
    #[case(Duration::hours(20), 1, WarningLevel::Critical)]
    #[case(Duration::days(3), 3, WarningLevel::Warning)]
    #[case(Duration::hours(-2), 0, WarningLevel::Critical)]
    fn days_remaining_rounds_up(
        #[case] left: Duration,
        #[case] days: i64,
        #[case] level: WarningLevel,
    ) {
        let now = Utc::now();
        let mut allocation = mock::active_allocations(now).remove(0);
        allocation.expires_at = now + left;
        assert_eq!(allocation.days_remaining(now), days);
        assert_eq!(allocation.warning_level(now), level);
    }

    #[test]
    fn chart_series_stay_within_band() {
        let mut rng = StdRng::seed_from_u64(7);
        let today = NaiveDate::from_ymd_opt(2025, 10, 13).expect("date");

        let chart = UsageChart::generate(&mut rng, today);

        assert_eq!(chart.labels.len(), CHART_DAYS);
        assert_eq!(chart.labels[6], "Mon, Oct 13");
        assert_eq!(chart.labels[0], "Tue, Oct 7");
        for i in 0..CHART_DAYS {
            let i64_i = i as i64;
            assert!((40 + 5 * i64_i..=60 + 5 * i64_i).contains(&chart.cpu_usage[i]));
            assert!((52 + 4 * i64_i..=68 + 4 * i64_i).contains(&chart.memory_usage[i]));
            assert!((65 + 3 * i64_i..=75 + 3 * i64_i).contains(&chart.gpu_utilization[i]));
        }
    }

    #[test]
    fn chart_is_reproducible_with_same_seed() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).expect("date");
        let a = UsageChart::generate(&mut StdRng::seed_from_u64(1), today);
        let b = UsageChart::generate(&mut StdRng::seed_from_u64(1), today);
        assert_eq!(a, b);
    }

    #[test]
    fn model_percent() {
        let cluster = mock::cluster_availability();
        assert_eq!(cluster.models[0].available_percent(), 31);
        assert_eq!(cluster.models[1].available_percent(), 38);
    }
}
