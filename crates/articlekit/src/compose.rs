//! Merges analyzer output with the resolved main image

use crate::error::AnalysisError;
use crate::types::{ArticleFields, ErrorResult, Extraction, ExtractionResult};

/// Prefix of the error body returned when the analyzer fails
pub const ANALYSIS_ERROR_PREFIX: &str = "Error extracting article";

/// Build the response for one document
///
/// An analyzer failure wins over everything, including a resolved image.
/// On success `main_image` is always set, even when it is empty.
pub fn compose(analysis: Result<ArticleFields, AnalysisError>, main_image: String) -> Extraction {
    match analysis {
        Ok(article) => Extraction::Article(Box::new(ExtractionResult {
            article,
            main_image,
        })),
        Err(e) => Extraction::Failed(ErrorResult::new(format!("{ANALYSIS_ERROR_PREFIX}: {e}"))),
    }
}
