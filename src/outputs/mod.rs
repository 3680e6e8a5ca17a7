//! Output generation for crawled articles and analysis results.
//!
//! # Submodules
//!
//! - [`json`]: Article lists and raw Guardian API pages
//! - [`csv`]: Preprocessed articles, matrices, term, trend and overlap tables
//! - [`plot`]: SVG trend chart
//!
//! # Output Structure
//!
//! ```text
//! data_dir/                      output_dir/
//! ├── sun_articles.json          ├── sun.csv
//! ├── sun_hrefList.txt           ├── sun_dtm.csv
//! ├── players.txt                ├── sun_tfidf.csv
//! └── guardian_articles/         ├── sun_terms.csv
//!     └── Guardian_page_1.json   ├── trend_boycott.csv
//!                                ├── trend_boycott.svg
//!                                └── overlap.csv
//! ```

pub mod csv;
pub mod json;
pub mod plot;
