//! The `pages` table (§3 DATA MODEL).

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// The live column count for the `pages` table with `id`, `position`, and
/// the two timestamps excluded — the columns Duplicate copies verbatim
/// from source to copy (`position` is allocated fresh, §4.3.4 step 2/5).
///
/// `DUPLICATED_PAGE_COLUMNS` in `modules/pages` lists those columns by
/// name; this const exists only so a unit test can assert the two never
/// drift apart (§8 property 8).
pub const DUPLICABLE_COLUMN_COUNT: usize = 6;

// `position` is `f64`, which has no `Eq` impl, so `Model` derives `PartialEq`
// only (unlike `pages_closures::Model`, whose fields are all `Eq`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "pages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_by: i64,
    pub position: f64,
    pub is_top_level: bool,
    pub text_title: Option<String>,
    pub text_content: Option<String>,
    pub title: Option<Json>,
    pub content: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    /// The columns Duplicate must copy are every column except the primary
    /// key, `position`, and the two timestamps (§4.3.4 step 2/5, §8
    /// property 8).
    #[test]
    fn duplicable_column_count_matches_schema_minus_id_position_and_timestamps() {
        let total = Column::iter().count();
        assert_eq!(total - 4, DUPLICABLE_COLUMN_COUNT);
    }
}
