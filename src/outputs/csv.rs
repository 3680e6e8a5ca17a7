//! CSV exports of the preprocessing and analysis tables.
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── sun.csv              # preprocess --csv
//! ├── sun_dtm.csv
//! ├── sun_tfidf.csv
//! ├── sun_terms.csv
//! ├── trend_boycott.csv
//! ├── overlap.csv
//! └── overlap_shared.txt
//! ```
//!
//! Tables are serialized in memory and written with a single `tokio::fs::write`.

use crate::analysis::OutletAnalysis;
use crate::analysis::overlap::OverlapReport;
use crate::analysis::terms::TermRow;
use crate::analysis::trend::TrendSeries;
use crate::models::{Outlet, ProcessedArticle};
use crate::utils::slugify_title;
use csv::Writer;
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

async fn save(path: PathBuf, wtr: Writer<Vec<u8>>) -> Result<PathBuf, Box<dyn Error>> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    fs::write(&path, bytes).await?;
    info!(path = %path.display(), "Wrote CSV");
    Ok(path)
}

fn serialize_rows<T: Serialize>(rows: &[T]) -> Result<Writer<Vec<u8>>, Box<dyn Error>> {
    let mut wtr = Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    Ok(wtr)
}

/// Write the preprocessed articles to `{outlet}.csv`.
///
/// List columns are stored as JSON arrays.
#[instrument(level = "info", skip(articles), fields(count = articles.len()))]
pub async fn write_processed(
    output_dir: &Path,
    outlet: Outlet,
    articles: &[ProcessedArticle],
) -> Result<PathBuf, Box<dyn Error>> {
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record([
        "title",
        "date",
        "content",
        "sentences",
        "tokens",
        "pos_tags",
        "lemmas",
        "lemmatised_text",
    ])?;
    for article in articles {
        let sentences = serde_json::to_string(&article.sentences)?;
        let tokens = serde_json::to_string(&article.tokens)?;
        let pos_tags = serde_json::to_string(&article.pos_tags)?;
        let lemmas = serde_json::to_string(&article.lemmas)?;
        wtr.write_record([
            article.title.as_deref().unwrap_or_default(),
            article.date.as_deref().unwrap_or_default(),
            article.content.as_str(),
            sentences.as_str(),
            tokens.as_str(),
            pos_tags.as_str(),
            lemmas.as_str(),
            article.lemmatised_text.as_str(),
        ])?;
    }
    save(output_dir.join(format!("{}.csv", outlet.key())), wtr).await
}

/// Write the document-term matrix, one column per term in vocabulary order
/// plus the article `content`.
#[instrument(level = "info", skip_all, fields(outlet = %analysis.outlet))]
pub async fn write_dtm(output_dir: &Path, analysis: &OutletAnalysis) -> Result<PathBuf, Box<dyn Error>> {
    let dtm = &analysis.dtm;
    let mut wtr = Writer::from_writer(vec![]);

    let mut header: Vec<&str> = dtm.vocabulary.terms().iter().map(String::as_str).collect();
    header.push("content");
    wtr.write_record(&header)?;

    for (doc, article) in analysis.articles.iter().enumerate() {
        let mut record: Vec<String> = dtm.dense_row(doc).iter().map(u32::to_string).collect();
        record.push(article.content.clone());
        wtr.write_record(&record)?;
    }
    save(output_dir.join(format!("{}_dtm.csv", analysis.outlet.key())), wtr).await
}

/// Write the TF-IDF matrix with columns ordered by summed weight, plus the
/// article `content`.
#[instrument(level = "info", skip_all, fields(outlet = %analysis.outlet))]
pub async fn write_tfidf(output_dir: &Path, analysis: &OutletAnalysis) -> Result<PathBuf, Box<dyn Error>> {
    let tfidf = &analysis.tfidf;
    let columns = tfidf.ranked_terms();
    let mut wtr = Writer::from_writer(vec![]);

    let mut header: Vec<&str> = columns.iter().map(|&i| tfidf.vocabulary.term(i)).collect();
    header.push("content");
    wtr.write_record(&header)?;

    for (doc, article) in analysis.articles.iter().enumerate() {
        let mut record: Vec<String> = columns.iter().map(|&i| tfidf.weight(doc, i).to_string()).collect();
        record.push(article.content.clone());
        wtr.write_record(&record)?;
    }
    save(output_dir.join(format!("{}_tfidf.csv", analysis.outlet.key())), wtr).await
}

#[instrument(level = "info", skip(rows), fields(count = rows.len()))]
pub async fn write_terms(output_dir: &Path, outlet: Outlet, rows: &[TermRow]) -> Result<PathBuf, Box<dyn Error>> {
    let wtr = serialize_rows(rows)?;
    save(output_dir.join(format!("{}_terms.csv", outlet.key())), wtr).await
}

#[derive(Serialize)]
struct TrendRecord<'a> {
    outlet: Outlet,
    period: &'a str,
    articles: usize,
    tfidf_sum: f64,
    tfidf_mean: f64,
    normalized: f64,
}

/// Write every series point of a term trend to `trend_{term}.csv`.
#[instrument(level = "info", skip(series), fields(outlets = series.len()))]
pub async fn write_trend(output_dir: &Path, term: &str, series: &[TrendSeries]) -> Result<PathBuf, Box<dyn Error>> {
    let records: Vec<TrendRecord> = series
        .iter()
        .flat_map(|s| {
            s.points.iter().map(move |p| TrendRecord {
                outlet: s.outlet,
                period: &p.label,
                articles: p.articles,
                tfidf_sum: p.tfidf_sum,
                tfidf_mean: p.tfidf_mean,
                normalized: p.normalized,
            })
        })
        .collect();
    let wtr = serialize_rows(&records)?;
    save(output_dir.join(format!("trend_{}.csv", slugify_title(term))), wtr).await
}

/// Write the pairwise table to `overlap.csv` and the terms every outlet
/// shares to `overlap_shared.txt`.
#[instrument(level = "info", skip(report), fields(pairs = report.pairs.len(), shared = report.shared_by_all.len()))]
pub async fn write_overlap(output_dir: &Path, report: &OverlapReport) -> Result<PathBuf, Box<dyn Error>> {
    let shared_path = output_dir.join("overlap_shared.txt");
    let mut shared = report.shared_by_all.join("\n");
    if !shared.is_empty() {
        shared.push('\n');
    }
    fs::write(&shared_path, shared).await?;

    let wtr = serialize_rows(&report.pairs)?;
    save(output_dir.join("overlap.csv"), wtr).await
}
