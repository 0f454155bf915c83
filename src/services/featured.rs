use std::collections::HashSet;

use chrono::{DateTime, Months, Utc};

use crate::error::{AppError, AppResult};
use crate::models::CatalogItem;

/// Quality bar applied first: well-rated and widely voted
const STRONG_RATING_BAR: f64 = 7.0;
const STRONG_VOTE_BAR: u64 = 1000;

/// Relaxed bar when nothing clears the strong one
const RELAXED_RATING_BAR: f64 = 6.5;
const RELAXED_VOTE_BAR: u64 = 500;

/// Vote counts beyond this stop mattering for the score
const VOTE_SATURATION: f64 = 100_000.0;

/// Merges candidate result pages, dropping duplicate ids.
/// The first occurrence of an id wins.
pub fn merge_candidates<I>(pages: I) -> Vec<CatalogItem>
where
    I: IntoIterator<Item = Vec<CatalogItem>>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for page in pages {
        for item in page {
            if seen.insert(item.id) {
                merged.push(item);
            }
        }
    }
    merged
}

/// Scores a candidate for the featured spot.
///
/// The normalized rating is squared, so a 9.0 contributes far more than
/// a 7.0; the vote count is log-compressed and saturates around 100k
/// votes. Both halves land in [0, 1] and are weighted equally.
pub fn score(vote_average: f64, vote_count: u64) -> f64 {
    let rating = (vote_average / 10.0).clamp(0.0, 1.0);
    let votes = (((vote_count as f64) + 1.0).log10() / (VOTE_SATURATION + 1.0).log10()).min(1.0);
    0.5 * rating * rating + 0.5 * votes
}

fn released_within_months(item: &CatalogItem, now: DateTime<Utc>, months: u32) -> bool {
    let today = now.date_naive();
    let Some(released) = item.released_on() else {
        return false;
    };
    let Some(cutoff) = today.checked_sub_months(Months::new(months)) else {
        return false;
    };
    released >= cutoff && released <= today
}

/// Picks the featured item from a merged candidate pool.
///
/// Candidates are narrowed twice, each narrowing failing open:
/// 1. by recency — released within the last month, widened to three
///    months, falling back to the whole pool;
/// 2. by quality — the strong bar, then the relaxed bar, then everything
///    that survived the date gate.
///
/// The survivor with the highest score wins; equal scores go to the lower
/// id so the choice is stable regardless of upstream ordering. An empty
/// candidate pool is the caller's problem and comes back as an error.
pub fn select_featured(candidates: &[CatalogItem], now: DateTime<Utc>) -> AppResult<CatalogItem> {
    if candidates.is_empty() {
        return Err(AppError::ExternalApi(
            "No featured candidates available".to_string(),
        ));
    }

    let date_gated = narrow(candidates.iter().collect(), |pool| {
        let recent: Vec<&CatalogItem> = pool
            .iter()
            .copied()
            .filter(|i| released_within_months(i, now, 1))
            .collect();
        if !recent.is_empty() {
            return recent;
        }
        pool.iter()
            .copied()
            .filter(|i| released_within_months(i, now, 3))
            .collect()
    });

    let pool = narrow(date_gated, |pool| {
        let strong: Vec<&CatalogItem> = pool
            .iter()
            .copied()
            .filter(|i| i.vote_average >= STRONG_RATING_BAR && i.vote_count >= STRONG_VOTE_BAR)
            .collect();
        if !strong.is_empty() {
            return strong;
        }
        pool.iter()
            .copied()
            .filter(|i| i.vote_average >= RELAXED_RATING_BAR && i.vote_count >= RELAXED_VOTE_BAR)
            .collect()
    });

    let mut best: Option<(&CatalogItem, f64)> = None;
    for item in pool {
        let s = score(item.vote_average, item.vote_count);
        let wins = match best {
            None => true,
            Some((current, current_score)) => {
                s > current_score || (s == current_score && item.id < current.id)
            }
        };
        if wins {
            best = Some((item, s));
        }
    }

    best.map(|(item, _)| item.clone())
        .ok_or_else(|| AppError::Internal("Featured pool unexpectedly empty".to_string()))
}

/// Applies a narrowing filter, keeping the original pool when the filter
/// leaves nothing (fail open, never empty).
fn narrow<'a, F>(pool: Vec<&'a CatalogItem>, filter: F) -> Vec<&'a CatalogItem>
where
    F: Fn(&[&'a CatalogItem]) -> Vec<&'a CatalogItem>,
{
    let narrowed = filter(&pool);
    if narrowed.is_empty() {
        pool
    } else {
        narrowed
    }
}
