use crate::analysis::OutletAnalysis;
use serde::Serialize;

/// One line of an outlet's term table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermRow {
    pub term: String,
    pub count: u64,
    pub document_frequency: usize,
    pub idf: f64,
    pub tfidf_sum: f64,
}

/// Terms ordered by summed TF-IDF weight, largest first, cut to `top` rows
/// when given.
pub fn term_table(analysis: &OutletAnalysis, top: Option<usize>) -> Vec<TermRow> {
    let totals = analysis.dtm.term_totals();
    let df = analysis.dtm.document_frequencies();
    let sums = analysis.tfidf.column_sums();

    analysis
        .tfidf
        .ranked_terms()
        .into_iter()
        .take(top.unwrap_or(usize::MAX))
        .map(|i| TermRow {
            term: analysis.tfidf.vocabulary.term(i).to_string(),
            count: totals[i],
            document_frequency: df[i],
            idf: analysis.tfidf.idf[i],
            tfidf_sum: sums[i],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::analysis;
    use crate::models::Outlet;

    #[test]
    fn test_term_table_order_and_counts() {
        let a = analysis(
            Outlet::Sun,
            &[
                (None, "stadium stadium worker"),
                (None, "stadium heat"),
                (None, "stadium"),
            ],
        );
        let table = term_table(&a, None);
        assert_eq!(table[0].term, "stadium");
        assert_eq!(table[0].count, 4);
        assert_eq!(table[0].document_frequency, 3);
        assert_eq!(table[0].idf, 1.0);
        assert_eq!(table.len(), 3);
        assert!(table.windows(2).all(|w| w[0].tfidf_sum >= w[1].tfidf_sum));
    }

    #[test]
    fn test_top_limits_rows() {
        let a = analysis(Outlet::Sun, &[(None, "stadium worker heat boycott")]);
        assert_eq!(term_table(&a, Some(2)).len(), 2);
        assert_eq!(term_table(&a, Some(10)).len(), 4);
    }
}
