use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::entities::movies;

/// A parsed, not-yet-persisted movie row from an uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMovie {
    pub title: String,
    pub description: String,
    pub poster: String,
    pub video_url: String,
    pub video_type: movies::VideoType,
    pub category: Vec<String>,
    pub batch_no: String,
    pub duration: String,
    pub featured: bool,
    pub is_premium: bool,
}

/// Outcome of a bulk ingestion: what was inserted and, when relevant,
/// which titles were skipped as duplicates.
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestReport {
    pub success: bool,
    pub count: usize,
    pub movies: Vec<movies::Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<Vec<String>>,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV parsing error: {0}")]
    Parse(#[from] csv::Error),

    #[error(
        "No valid movies found in CSV. Make sure the file has a \"title\" column and at least one row with data."
    )]
    NoValidRows,

    #[error("All videos are duplicates. No new videos were added.")]
    AllDuplicates(Vec<String>),

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}
