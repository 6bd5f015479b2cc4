//! Pure reductions over brand and task lists. Handlers load the rows once
//! and hand them to these functions, which keeps the aggregation logic
//! testable without a database.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use db::{
    models::{brand::Brand, task::Task},
    types::{BrandStatus, DealStage, TaskStatus},
};
use serde::Serialize;
use ts_rs::TS;

const UNASSIGNED_BUCKET: &str = "Unassigned";
const UNKNOWN_BUCKET: &str = "Unknown";
const COUNTRY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
pub struct BreakdownEntry {
    pub name: String,
    pub count: u64,
    /// Share of the brand total, rounded to one decimal place.
    pub percentage: f64,
}

#[derive(Debug, Serialize, TS)]
pub struct Analytics {
    pub total_brands: u64,
    pub sectors: Vec<BreakdownEntry>,
    pub categories: Vec<BreakdownEntry>,
    pub countries: Vec<BreakdownEntry>,
    pub statuses: Vec<BreakdownEntry>,
    pub deal_stages: Vec<BreakdownEntry>,
}

#[derive(Debug, Serialize, TS)]
pub struct DashboardStats {
    pub total_partners: u64,
    pub active_partners: u64,
    pub in_negotiation: u64,
    pub overdue_followups: u64,
    pub pending_tasks: u64,
    pub by_status: HashMap<String, u64>,
    pub by_stage: HashMap<String, u64>,
}

fn percentage_of(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 1000.0 / total as f64).round() / 10.0
}

fn into_entries(counts: HashMap<String, u64>, total: u64) -> Vec<BreakdownEntry> {
    let mut entries: Vec<BreakdownEntry> = counts
        .into_iter()
        .map(|(name, count)| BreakdownEntry {
            name,
            count,
            percentage: percentage_of(count, total),
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    entries
}

/// Counts each tag once per brand carrying it; brands with no tags land in
/// the "Unassigned" bucket.
fn tag_breakdown(brands: &[Brand], tags_of: impl Fn(&Brand) -> &[String]) -> Vec<BreakdownEntry> {
    let total = brands.len() as u64;
    let mut counts: HashMap<String, u64> = HashMap::new();
    for brand in brands {
        let tags = tags_of(brand);
        if tags.is_empty() {
            *counts.entry(UNASSIGNED_BUCKET.to_string()).or_default() += 1;
        } else {
            for tag in tags {
                *counts.entry(tag.clone()).or_default() += 1;
            }
        }
    }
    into_entries(counts, total)
}

fn country_breakdown(brands: &[Brand]) -> Vec<BreakdownEntry> {
    let total = brands.len() as u64;
    let mut counts: HashMap<String, u64> = HashMap::new();
    for brand in brands {
        let country = brand
            .country_of_origin
            .clone()
            .unwrap_or_else(|| UNKNOWN_BUCKET.to_string());
        *counts.entry(country).or_default() += 1;
    }
    let mut entries = into_entries(counts, total);
    entries.truncate(COUNTRY_LIMIT);
    entries
}

fn status_breakdown(brands: &[Brand]) -> Vec<BreakdownEntry> {
    let total = brands.len() as u64;
    let mut counts: HashMap<String, u64> = HashMap::new();
    for brand in brands {
        *counts.entry(brand.status.to_string()).or_default() += 1;
    }
    into_entries(counts, total)
}

fn stage_breakdown(brands: &[Brand]) -> Vec<BreakdownEntry> {
    let total = brands.len() as u64;
    let mut counts: HashMap<String, u64> = HashMap::new();
    for brand in brands {
        *counts.entry(brand.deal_stage.to_string()).or_default() += 1;
    }
    into_entries(counts, total)
}

pub fn analytics(brands: &[Brand]) -> Analytics {
    Analytics {
        total_brands: brands.len() as u64,
        sectors: tag_breakdown(brands, |b| &b.project_sectors),
        categories: tag_breakdown(brands, |b| &b.design_categories),
        countries: country_breakdown(brands),
        statuses: status_breakdown(brands),
        deal_stages: stage_breakdown(brands),
    }
}

pub fn dashboard_stats(brands: &[Brand], tasks: &[Task], now: DateTime<Utc>) -> DashboardStats {
    let mut by_status: HashMap<String, u64> = HashMap::new();
    let mut by_stage: HashMap<String, u64> = HashMap::new();
    let mut active_partners = 0;
    let mut in_negotiation = 0;
    let mut overdue_followups = 0;
    for brand in brands {
        *by_status.entry(brand.status.to_string()).or_default() += 1;
        *by_stage.entry(brand.deal_stage.to_string()).or_default() += 1;
        if brand.status == BrandStatus::Active {
            active_partners += 1;
        }
        if brand.deal_stage == DealStage::Negotiation {
            in_negotiation += 1;
        }
        if brand.next_followup_date.is_some_and(|date| date < now) {
            overdue_followups += 1;
        }
    }

    let pending_tasks = tasks
        .iter()
        .filter(|task| task.status == TaskStatus::Pending)
        .count() as u64;

    DashboardStats {
        total_partners: brands.len() as u64,
        active_partners,
        in_negotiation,
        overdue_followups,
        pending_tasks,
        by_status,
        by_stage,
    }
}
