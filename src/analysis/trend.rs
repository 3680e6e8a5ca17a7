//! A term's TF-IDF weight over time.
//!
//! Articles are grouped into periods by their publication date. Each period
//! gets the mean weight of the term over its articles, so busy weeks do not
//! dominate quiet ones, and the series is finally divided by its largest mean
//! to land in `[0, 1]`. Articles without a parseable date are skipped.

use crate::analysis::OutletAnalysis;
use crate::error::PressError;
use crate::models::Outlet;
use crate::utils::parse_article_date;
use chrono::{Datelike, Duration, NaiveDate};
use clap::ValueEnum;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Width of a trend period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Bucket {
    Day,
    Week,
    #[default]
    Month,
}

impl Bucket {
    /// First day of the period containing `date`. Weeks start on Monday.
    pub fn start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Bucket::Day => date,
            Bucket::Week => date - Duration::days(i64::from(date.weekday().num_days_from_monday())),
            Bucket::Month => date.with_day(1).unwrap_or(date),
        }
    }

    pub fn label(&self, start: NaiveDate) -> String {
        match self {
            Bucket::Month => start.format("%Y-%m").to_string(),
            Bucket::Day | Bucket::Week => start.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub period: NaiveDate,
    pub label: String,
    pub articles: usize,
    pub tfidf_sum: f64,
    pub tfidf_mean: f64,
    pub normalized: f64,
}

#[derive(Debug, Clone)]
pub struct TrendSeries {
    pub outlet: Outlet,
    pub points: Vec<TrendPoint>,
}

/// Bucketed series of `term` for one outlet.
///
/// An outlet whose vocabulary lacks the term still gets a series, with every
/// point at zero.
pub fn term_trend(analysis: &OutletAnalysis, term: &str, bucket: Bucket) -> TrendSeries {
    let column = analysis.tfidf.vocabulary.get(term);
    let mut periods: BTreeMap<NaiveDate, (usize, f64)> = BTreeMap::new();
    let mut undated = 0usize;

    for (doc, article) in analysis.articles.iter().enumerate() {
        let Some(date) = article.date.as_deref().and_then(parse_article_date) else {
            undated += 1;
            continue;
        };
        let weight = column.map(|c| analysis.tfidf.weight(doc, c)).unwrap_or(0.0);
        let entry = periods.entry(bucket.start(date)).or_default();
        entry.0 += 1;
        entry.1 += weight;
    }
    if undated > 0 {
        debug!(outlet = analysis.outlet.key(), undated, "Skipped articles without a usable date");
    }

    let mut points: Vec<TrendPoint> = periods
        .into_iter()
        .map(|(period, (articles, tfidf_sum))| TrendPoint {
            period,
            label: bucket.label(period),
            articles,
            tfidf_sum,
            tfidf_mean: tfidf_sum / articles as f64,
            normalized: 0.0,
        })
        .collect();

    let max = points.iter().map(|p| p.tfidf_mean).fold(0.0, f64::max);
    if max > 0.0 {
        for point in &mut points {
            point.normalized = point.tfidf_mean / max;
        }
    }

    TrendSeries {
        outlet: analysis.outlet,
        points,
    }
}

/// Series of `term` for every outlet in `analyses`.
///
/// Fails with [`PressError::EmptyCorpus`] when no outlet could be loaded and
/// with [`PressError::UnknownTerm`] when no outlet has the term.
#[instrument(level = "info", skip(analyses), fields(outlets = analyses.len()))]
pub fn trends(analyses: &[OutletAnalysis], term: &str, bucket: Bucket) -> Result<Vec<TrendSeries>, PressError> {
    if analyses.is_empty() {
        return Err(PressError::EmptyCorpus("the selected outlets".to_string()));
    }
    if !analyses.iter().any(|a| a.tfidf.vocabulary.get(term).is_some()) {
        return Err(PressError::UnknownTerm(term.to_string()));
    }
    let series: Vec<TrendSeries> = analyses.iter().map(|a| term_trend(a, term, bucket)).collect();
    info!(
        points = series.iter().map(|s| s.points.len()).sum::<usize>(),
        "Computed trend series"
    );
    Ok(series)
}
