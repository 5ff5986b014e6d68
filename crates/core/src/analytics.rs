use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ProgressEntry;

/// Subjects averaging at or above this percentage count as strengths.
pub const STRENGTH_THRESHOLD: u32 = 70;

/// Number of calendar days covered by the weekly trend, today included.
pub const TREND_DAYS: i64 = 7;

//
// ─── SUMMARY TYPES ─────────────────────────────────────────────────────────────
//

/// Mean score for one calendar day of the weekly trend.
///
/// `date` is the 3-letter weekday abbreviation of that day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyScore {
    pub date: String,
    pub score: u32,
}

/// Aggregate statistics over a user's full progress history.
///
/// All averages here are truncated to integers; only the per-quiz
/// percentage (computed at scoring time) is rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub total_completed: u64,
    pub average_score: u32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub weekly_progress: Vec<DailyScore>,
    pub subject_scores: BTreeMap<String, u32>,
}

//
// ─── SUMMARIZE ─────────────────────────────────────────────────────────────────
//

/// Derive the analytics summary from a user's progress entries.
///
/// `today` anchors the weekly trend; pass the service clock's current time.
/// The trend always has exactly [`TREND_DAYS`] buckets, oldest first, the
/// last one being `today` itself. With no entries at all, the summary is
/// zeroed but the trend buckets (and their weekday labels) are still
/// emitted.
///
/// Note the denominator of `average_score`: it is the count of *all*
/// entries, completed or not.
#[must_use]
pub fn summarize(entries: &[ProgressEntry], today: DateTime<Utc>) -> ProgressSummary {
    let weekly_progress = weekly_trend(entries, today);

    if entries.is_empty() {
        return ProgressSummary {
            total_completed: 0,
            average_score: 0,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            weekly_progress,
            subject_scores: BTreeMap::new(),
        };
    }

    let total_completed = entries.iter().filter(|e| e.completed).count() as u64;

    let score_sum: u64 = entries.iter().map(|e| u64::from(e.score)).sum();
    let average_score = truncated_mean(score_sum, entries.len() as u64);

    // Per-subject truncated means. BTreeMap keeps the subject order
    // deterministic, which the strength/weakness lists inherit.
    let mut by_subject: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for entry in entries {
        let slot = by_subject.entry(entry.subject.as_str()).or_insert((0, 0));
        slot.0 += u64::from(entry.score);
        slot.1 += 1;
    }

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut subject_scores = BTreeMap::new();
    for (subject, (sum, count)) in by_subject {
        let mean = truncated_mean(sum, count);
        if mean >= STRENGTH_THRESHOLD {
            strengths.push(subject.to_string());
        } else {
            weaknesses.push(subject.to_string());
        }
        subject_scores.insert(subject.to_string(), mean);
    }

    ProgressSummary {
        total_completed,
        average_score,
        strengths,
        weaknesses,
        weekly_progress,
        subject_scores,
    }
}

/// Mean scores for the [`TREND_DAYS`] calendar days ending at `today`,
/// oldest first. Days without entries score 0.
fn weekly_trend(entries: &[ProgressEntry], today: DateTime<Utc>) -> Vec<DailyScore> {
    let mut trend = Vec::with_capacity(TREND_DAYS as usize);
    for offset in (0..TREND_DAYS).rev() {
        let day = today - Duration::days(offset);
        let day_start = day.date_naive().and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start + Duration::days(1);

        let (mut sum, mut count) = (0u64, 0u64);
        for entry in entries {
            if entry.timestamp >= day_start && entry.timestamp < day_end {
                sum += u64::from(entry.score);
                count += 1;
            }
        }

        trend.push(DailyScore {
            date: day_start.format("%a").to_string(),
            score: if count == 0 {
                0
            } else {
                truncated_mean(sum, count)
            },
        });
    }
    trend
}

/// Integer (truncating) mean. Scores are at most 100, so the result fits u32.
fn truncated_mean(sum: u64, count: u64) -> u32 {
    #[allow(clippy::cast_possible_truncation)]
    let mean = (sum / count) as u32;
    mean
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
