use attendance_core_api::{ApiResult, Weekday};
use attendance_core_db::models::site::{Holiday, OvertimeRules, SitePolicyModel};
use attendance_core_db::repository::SitePolicyRepository;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use heapless::String as HeaplessString;
use moka::future::Cache;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::Database;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::EngineConfig;

/// Policy used for sites without a stored one
pub fn default_site_policy(site_id: Uuid) -> SitePolicyModel {
    SitePolicyModel {
        site_id,
        site_name: HeaplessString::try_from("Default").unwrap_or_default(),
        working_hours_per_day: Decimal::new(8, 0),
        half_day_threshold_hours: Decimal::new(4, 0),
        check_in_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
        check_out_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
        late_threshold_minutes: 15,
        early_leave_threshold_minutes: 15,
        weekend_days: vec![Weekday::Sunday],
        holidays: Vec::new(),
        overtime: OvertimeRules {
            enabled: false,
            threshold_hours: Decimal::new(8, 0),
            multiplier: Decimal::new(15, 1),
        },
        auto_close_enabled: true,
        last_auto_close: None,
    }
}

pub fn is_weekend(policy: &SitePolicyModel, date: NaiveDate) -> bool {
    policy.weekend_days.contains(&Weekday::from(date.weekday()))
}

pub fn holiday_on(policy: &SitePolicyModel, date: NaiveDate) -> Option<&Holiday> {
    policy.holidays.iter().find(|holiday| holiday.date == date)
}

pub fn is_holiday(policy: &SitePolicyModel, date: NaiveDate) -> bool {
    holiday_on(policy, date).is_some()
}

/// Minutes after the scheduled check-in, when beyond the grace period
pub fn late_minutes(policy: &SitePolicyModel, timestamp: NaiveDateTime) -> Option<i64> {
    let scheduled = timestamp.date().and_time(policy.check_in_time);
    let grace = Duration::minutes(policy.late_threshold_minutes.into());
    (timestamp > scheduled + grace).then(|| (timestamp - scheduled).num_minutes())
}

/// Minutes before the scheduled check-out, when beyond the grace period
pub fn early_leave_minutes(policy: &SitePolicyModel, timestamp: NaiveDateTime) -> Option<i64> {
    let scheduled = timestamp.date().and_time(policy.check_out_time);
    let grace = Duration::minutes(policy.early_leave_threshold_minutes.into());
    (timestamp < scheduled - grace).then(|| (scheduled - timestamp).num_minutes())
}

pub fn is_after_hours(config: &EngineConfig, timestamp: NaiveDateTime) -> bool {
    let hour = timestamp.hour();
    hour < config.day_start_hour || hour >= config.day_end_hour
}

/// Length of a full working day
pub fn working_day_duration(policy: &SitePolicyModel) -> Duration {
    let minutes = (policy.working_hours_per_day * Decimal::new(60, 0))
        .round()
        .to_i64()
        .unwrap_or(0);
    Duration::minutes(minutes)
}

pub fn first_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|next| next.pred_opt())
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    last_day_of_month(year, month).map(|last| last.day()).unwrap_or(0)
}

/// Calendar days of the month minus weekend days and minus holidays on
/// non-weekend days. Falls back to the calendar day count when nothing is left.
pub fn month_working_days(policy: &SitePolicyModel, year: i32, month: u32) -> i32 {
    let total = days_in_month(year, month);
    let working = (1..=total)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .filter(|date| !is_weekend(policy, *date) && !is_holiday(policy, *date))
        .count() as i32;
    if working == 0 {
        total as i32
    } else {
        working
    }
}

/// Read-through cache of site policies.
///
/// Missing sites resolve to `default_site_policy`; the fallback is logged
/// and not cached, so a policy stored later is picked up on the next read.
pub struct SitePolicyProvider<DB: Database> {
    repository: Arc<dyn SitePolicyRepository<DB>>,
    cache: Cache<Uuid, Arc<SitePolicyModel>>,
}

impl<DB: Database> SitePolicyProvider<DB> {
    pub fn new(repository: Arc<dyn SitePolicyRepository<DB>>, config: &EngineConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.policy_cache_capacity)
            .time_to_live(config.policy_cache_ttl())
            .build();
        Self { repository, cache }
    }

    pub async fn load(&self, site_id: Uuid) -> ApiResult<Arc<SitePolicyModel>> {
        if let Some(policy) = self.cache.get(&site_id).await {
            return Ok(policy);
        }

        match self.repository.load(site_id).await? {
            Some(policy) => {
                debug!(%site_id, "site policy loaded");
                let policy = Arc::new(policy);
                self.cache.insert(site_id, policy.clone()).await;
                Ok(policy)
            }
            None => {
                warn!(%site_id, "no site policy stored, using default policy");
                Ok(Arc::new(default_site_policy(site_id)))
            }
        }
    }

    /// Like `load`, but a store failure falls back to the default policy
    pub async fn load_or_default(&self, site_id: Uuid) -> Arc<SitePolicyModel> {
        match self.load(site_id).await {
            Ok(policy) => policy,
            Err(err) => {
                warn!(%site_id, error = %err, "site policy unavailable, using default policy");
                Arc::new(default_site_policy(site_id))
            }
        }
    }

    pub async fn invalidate(&self, site_id: Uuid) {
        self.cache.invalidate(&site_id).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::{site_with_policy, MemoryStore};
    use sqlx::Postgres;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn grace_periods_are_exclusive() {
        let policy = default_site_policy(Uuid::new_v4());
        let day = d(2025, 1, 6);
        assert_eq!(late_minutes(&policy, day.and_hms_opt(9, 15, 0).unwrap()), None);
        assert_eq!(late_minutes(&policy, day.and_hms_opt(9, 16, 0).unwrap()), Some(16));
        assert_eq!(early_leave_minutes(&policy, day.and_hms_opt(16, 45, 0).unwrap()), None);
        assert_eq!(early_leave_minutes(&policy, day.and_hms_opt(16, 30, 0).unwrap()), Some(30));
    }

    #[test]
    fn working_days_skip_weekends_and_weekday_holidays() {
        let mut policy = default_site_policy(Uuid::new_v4());
        // March 2025 has five Sundays
        assert_eq!(month_working_days(&policy, 2025, 3), 26);

        policy.holidays.push(Holiday {
            date: d(2025, 3, 14),
            name: HeaplessString::try_from("Holi").unwrap(),
        });
        // A holiday on a Sunday is not subtracted twice
        policy.holidays.push(Holiday {
            date: d(2025, 3, 30),
            name: HeaplessString::try_from("Sunday holiday").unwrap(),
        });
        assert_eq!(month_working_days(&policy, 2025, 3), 25);
    }

    #[test]
    fn working_days_fall_back_to_calendar_days() {
        let mut policy = default_site_policy(Uuid::new_v4());
        policy.weekend_days = vec![
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
            Weekday::Saturday,
            Weekday::Sunday,
        ];
        assert_eq!(month_working_days(&policy, 2024, 2), 29);
    }

    #[test]
    fn full_day_duration_follows_policy() {
        let mut policy = default_site_policy(Uuid::new_v4());
        assert_eq!(working_day_duration(&policy), Duration::hours(8));
        policy.working_hours_per_day = Decimal::new(75, 1);
        assert_eq!(working_day_duration(&policy), Duration::minutes(450));
    }

    #[tokio::test]
    async fn provider_caches_and_falls_back() {
        let store = Arc::new(MemoryStore::new());
        let site_id = Uuid::new_v4();
        let mut stored = site_with_policy(site_id);
        stored.late_threshold_minutes = 5;
        store.put_policy(stored);

        let provider = SitePolicyProvider::<Postgres>::new(store.clone(), &EngineConfig::default());
        assert_eq!(provider.load(site_id).await.unwrap().late_threshold_minutes, 5);

        let mut changed = site_with_policy(site_id);
        changed.late_threshold_minutes = 30;
        store.put_policy(changed);
        assert_eq!(provider.load(site_id).await.unwrap().late_threshold_minutes, 5);

        provider.invalidate(site_id).await;
        assert_eq!(provider.load(site_id).await.unwrap().late_threshold_minutes, 30);

        let unknown = Uuid::new_v4();
        let fallback = provider.load(unknown).await.unwrap();
        assert_eq!(fallback.site_id, unknown);
        assert_eq!(fallback.working_hours_per_day, Decimal::new(8, 0));
    }
}
