use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;
use uuid::Uuid;

pub mod parser;
pub mod types;

pub use types::{CandidateMovie, IngestError, IngestReport};

use crate::entities::{StringList, movies, prelude::Movies};

/// Parse → reconcile → insert pipeline behind the admin bulk upload.
///
/// Candidates are deduplicated against titles already in the store only;
/// two identical titles inside one upload both survive, and single-record
/// creation elsewhere never consults this check.
pub struct IngestService {
    db: DatabaseConnection,
}

impl IngestService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Runs the full pipeline on a raw CSV payload. Nothing is persisted
    /// unless at least one candidate survives reconciliation.
    pub async fn ingest_csv(&self, data: &[u8]) -> Result<IngestReport, IngestError> {
        let candidates = parser::parse_catalog_csv(data)?;
        if candidates.is_empty() {
            return Err(IngestError::NoValidRows);
        }
        self.insert_candidates(candidates).await
    }

    async fn insert_candidates(
        &self,
        candidates: Vec<CandidateMovie>,
    ) -> Result<IngestReport, IngestError> {
        let titles: Vec<String> = candidates.iter().map(|c| c.title.clone()).collect();
        let existing_titles: HashSet<String> = Movies::find()
            .filter(movies::Column::Title.is_in(titles))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| m.title)
            .collect();

        let (accepted, rejected): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|c| !existing_titles.contains(&c.title));

        let duplicates: Vec<String> = rejected.into_iter().map(|c| c.title).collect();
        if accepted.is_empty() {
            return Err(IngestError::AllDuplicates(duplicates));
        }

        let created: Vec<movies::Model> = accepted.into_iter().map(Self::to_model).collect();
        Movies::insert_many(created.iter().map(Self::to_active))
            .exec(&self.db)
            .await?;

        info!(
            "🎬 Bulk ingest: {} inserted, {} duplicate(s) skipped",
            created.len(),
            duplicates.len()
        );

        let warning = (!duplicates.is_empty()).then(|| {
            format!(
                "{} duplicate(s) skipped: {}",
                duplicates.len(),
                duplicates.join(", ")
            )
        });

        Ok(IngestReport {
            success: true,
            count: created.len(),
            movies: created,
            warning,
            duplicates: (!duplicates.is_empty()).then_some(duplicates),
        })
    }

    fn to_model(candidate: CandidateMovie) -> movies::Model {
        movies::Model {
            id: Uuid::new_v4().to_string(),
            title: candidate.title,
            description: candidate.description,
            poster: candidate.poster,
            video_url: candidate.video_url,
            video_type: candidate.video_type,
            category: StringList(candidate.category),
            batch_no: candidate.batch_no,
            duration: candidate.duration,
            featured: candidate.featured,
            is_premium: candidate.is_premium,
            created_at: Utc::now(),
        }
    }

    fn to_active(model: &movies::Model) -> movies::ActiveModel {
        movies::ActiveModel {
            id: Set(model.id.clone()),
            title: Set(model.title.clone()),
            description: Set(model.description.clone()),
            poster: Set(model.poster.clone()),
            video_url: Set(model.video_url.clone()),
            video_type: Set(model.video_type),
            category: Set(model.category.clone()),
            batch_no: Set(model.batch_no.clone()),
            duration: Set(model.duration.clone()),
            featured: Set(model.featured),
            is_premium: Set(model.is_premium),
            created_at: Set(model.created_at),
        }
    }
}
