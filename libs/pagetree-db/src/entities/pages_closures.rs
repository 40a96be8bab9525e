//! The `pages_closures` table: the closure table itself (§3, §4.3, §9).
//!
//! Composite primary key `(ancestor_id, descendant_id)`. No self-edges and
//! no edge where `ancestor_id == descendant_id` are ever inserted; the
//! engine in `modules/pages` is the sole writer and is responsible for that
//! invariant, not a database constraint.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pages_closures")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub ancestor_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub descendant_id: Uuid,
    pub is_parent: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
