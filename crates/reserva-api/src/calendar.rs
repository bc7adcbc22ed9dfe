//! Calendar endpoint and month-level caching
//!
//! The calendar view is fetched a month at a time. [`MonthCache`] is an
//! explicit object owned by the caller — bounded capacity, TTL expiry,
//! and invalidation hooks — rather than a cache hiding at module scope,
//! so screens that mutate reservations can evict exactly the months they
//! touched.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reserva_client::{ApiClient, Error, Result};
use serde::Deserialize;
use tracing::debug;

use crate::reservations::Reservation;

const CALENDAR: &str = "api/reservations/calendar/";

#[derive(Debug, Clone, Deserialize)]
pub struct HoursWindow {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeSlot {
    pub start_time: String,
    pub end_time: String,
    /// `FREE_FOR_ALL` or `PRIMETIME`
    #[serde(rename = "type")]
    pub slot_type: String,
    pub available: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarDay {
    /// yyyy-mm-dd
    pub date: String,
    pub is_primetime: bool,
    pub primetime_hours: Option<HoursWindow>,
    pub business_hours: HoursWindow,
    pub available_slots: Vec<TimeSlot>,
    pub reserved_slots: Vec<Reservation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarResponse {
    pub start_date: String,
    pub end_date: String,
    pub calendar: Vec<CalendarDay>,
}

impl CalendarResponse {
    /// The day entry for a yyyy-mm-dd date, if the range covers it.
    pub fn day_for(&self, date: &str) -> Option<&CalendarDay> {
        self.calendar.iter().find(|day| day.date == date)
    }
}

/// Fetch the calendar for an inclusive date range (yyyy-mm-dd).
pub async fn get_calendar(
    client: &ApiClient,
    start_date: &str,
    end_date: &str,
) -> Result<CalendarResponse> {
    let path = format!("{CALENDAR}?start_date={start_date}&end_date={end_date}");
    client.get_json(&path).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthKey {
    pub year: i32,
    /// 1-based
    pub month: u32,
}

struct CacheEntry {
    fetched_at: Instant,
    response: CalendarResponse,
}

/// Bounded, TTL-expiring cache of month calendars, owned by the caller.
pub struct MonthCache {
    capacity: usize,
    ttl: Duration,
    entries: HashMap<MonthKey, CacheEntry>,
}

impl MonthCache {
    /// A cache holding at most `capacity` months, each valid for `ttl`.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Cached month, dropping it first if the TTL has lapsed.
    pub fn get(&mut self, key: MonthKey) -> Option<&CalendarResponse> {
        let expired = self
            .entries
            .get(&key)
            .is_some_and(|entry| entry.fetched_at.elapsed() >= self.ttl);
        if expired {
            debug!(year = key.year, month = key.month, "month cache entry expired");
            self.entries.remove(&key);
        }
        self.entries.get(&key).map(|entry| &entry.response)
    }

    /// Store a month, evicting the oldest entry when at capacity.
    pub fn insert(&mut self, key: MonthKey, response: CalendarResponse) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.fetched_at)
                .map(|(k, _)| *k)
            {
                debug!(year = oldest.year, month = oldest.month, "evicting oldest cached month");
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                fetched_at: Instant::now(),
                response,
            },
        );
    }

    /// Drop one month, e.g. after creating or cancelling a reservation in it.
    pub fn invalidate(&mut self, key: MonthKey) {
        self.entries.remove(&key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Calendar for a whole month (1-based), from cache or the backend.
    ///
    /// `force` bypasses the cache and refills it with a fresh fetch.
    /// An out-of-range month is rejected before any network call.
    pub async fn fetch_month(
        &mut self,
        client: &ApiClient,
        year: i32,
        month: u32,
        force: bool,
    ) -> Result<CalendarResponse> {
        if !(1..=12).contains(&month) {
            return Err(Error::Config(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        let key = MonthKey { year, month };
        if !force && let Some(cached) = self.get(key) {
            return Ok(cached.clone());
        }

        let (start, end) = month_bounds(year, month);
        let response = get_calendar(client, &start, &end).await?;
        self.insert(key, response.clone());
        Ok(response)
    }

    /// Calendar entry for one yyyy-mm-dd date, via the month cache.
    pub async fn fetch_day(
        &mut self,
        client: &ApiClient,
        date: &str,
        force: bool,
    ) -> Result<Option<CalendarDay>> {
        let Some((year, month)) = parse_year_month(date) else {
            return Ok(None);
        };
        let response = self.fetch_month(client, year, month, force).await?;
        Ok(response.day_for(date).cloned())
    }
}

/// First and last day of a month as yyyy-mm-dd strings.
fn month_bounds(year: i32, month: u32) -> (String, String) {
    let last = days_in_month(year, month);
    (
        format!("{year:04}-{month:02}-01"),
        format!("{year:04}-{month:02}-{last:02}"),
    )
}

/// Callers validate `month` to 1..=12 first; February is the only month
/// left after the explicit arms.
fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap_year(year) => 29,
        _ => 28,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Year and 1-based month from a yyyy-mm-dd string.
fn parse_year_month(date: &str) -> Option<(i32, u32)> {
    let mut parts = date.splitn(3, '-');
    let year = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year, month))
}
