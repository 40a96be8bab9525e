//! Position allocation (§4.3.5, §9 Open Question).
//!
//! Positions are `f64` rather than an integer so a later implementation of
//! mid-point inserts (rational or float subdivision) remains possible,
//! even though no current operation exploits it.

use pagetree_db::entities::pages;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect};

/// The step between a newly allocated position and the current maximum
/// for that owner. Positive; 10 in tests, 1000 in production.
pub type Spacing = f64;

/// Reads `max(position)` for `owner` inside the current transaction and
/// returns `max + spacing`.
///
/// Two concurrent callers for the same owner may read the same max under
/// read-committed isolation; this is tolerated (§5) since `position` is
/// append-monotone, not globally unique.
pub async fn next_position<C: ConnectionTrait>(
    conn: &C,
    owner: i64,
    spacing: Spacing,
) -> Result<f64, sea_orm::DbErr> {
    let max = pages::Entity::find()
        .filter(pages::Column::CreatedBy.eq(owner))
        .order_by(pages::Column::Position, Order::Desc)
        .limit(1)
        .one(conn)
        .await?
        .map_or(0.0_f64, |row| row.position);
    Ok(max + spacing)
}
