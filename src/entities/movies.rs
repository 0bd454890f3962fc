use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::StringList;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    #[sea_orm(string_value = "youtube")]
    Youtube,
    #[sea_orm(string_value = "direct")]
    Direct,
}

impl Default for VideoType {
    fn default() -> Self {
        Self::Direct
    }
}

impl VideoType {
    /// CSV cells are free-form; anything that is not exactly "youtube"
    /// plays as a direct URL.
    pub fn from_csv(raw: &str) -> Self {
        if raw == "youtube" {
            Self::Youtube
        } else {
            Self::Direct
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "movies")]
#[schema(as = Movie)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub poster: String,
    pub video_url: String,
    pub video_type: VideoType,
    #[sea_orm(column_type = "Json")]
    pub category: StringList,
    pub batch_no: String,
    pub duration: String,
    pub featured: bool,
    pub is_premium: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_type_from_csv_is_exact_on_youtube() {
        assert_eq!(VideoType::from_csv("youtube"), VideoType::Youtube);
        assert_eq!(VideoType::from_csv(""), VideoType::Direct);
        assert_eq!(VideoType::from_csv("direct"), VideoType::Direct);
        assert_eq!(VideoType::from_csv("YouTube"), VideoType::Direct);
        assert_eq!(VideoType::from_csv("vimeo"), VideoType::Direct);
    }
}
