use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use waypoint_core::db::DbPool;
use waypoint_core::errors::Result;
use waypoint_core::streaks::{StreakInfo, StreakKey, StreakRepositoryTrait};

use super::model::StreakInfoDB;
use crate::db::get_connection;
use crate::errors::StorageError;
use crate::schema::streaks;

pub struct StreakRepository {
    pool: Arc<DbPool>,
}

impl StreakRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        StreakRepository { pool }
    }

    fn find_by_key(
        conn: &mut SqliteConnection,
        key: &StreakKey,
    ) -> Result<Option<StreakInfo>> {
        let mut query = streaks::table
            .into_boxed::<diesel::sqlite::Sqlite>()
            .filter(streaks::account_id.eq(&key.account_id));
        query = match &key.goal_id {
            Some(goal_id) => query.filter(streaks::goal_id.eq(goal_id)),
            None => query.filter(streaks::goal_id.is_null()),
        };
        query = match &key.task_id {
            Some(task_id) => query.filter(streaks::task_id.eq(task_id)),
            None => query.filter(streaks::task_id.is_null()),
        };
        let row = query
            .first::<StreakInfoDB>(conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(StreakInfo::from))
    }
}

impl StreakRepositoryTrait for StreakRepository {
    fn find_streak(&self, key: &StreakKey) -> Result<Option<StreakInfo>> {
        let mut conn = get_connection(&self.pool)?;
        Self::find_by_key(&mut conn, key)
    }

    fn find_streak_in_tx(
        &self,
        conn: &mut SqliteConnection,
        key: &StreakKey,
    ) -> Result<Option<StreakInfo>> {
        Self::find_by_key(conn, key)
    }

    fn upsert_streak_in_tx(&self, conn: &mut SqliteConnection, info: &StreakInfo) -> Result<()> {
        // Writes serialize through immediate transactions, so find-then-write
        // cannot race another writer for the same key.
        let row = StreakInfoDB::from(info);
        match Self::find_by_key(conn, &info.key())? {
            Some(existing) => {
                diesel::update(streaks::table.find(&existing.id))
                    .set((
                        streaks::current_maintained_streak.eq(row.current_maintained_streak),
                        streaks::best_maintained_streak.eq(row.best_maintained_streak),
                        streaks::current_perfect_streak.eq(row.current_perfect_streak),
                        streaks::best_perfect_streak.eq(row.best_perfect_streak),
                        streaks::last_updated_at.eq(row.last_updated_at),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
            }
            None => {
                diesel::insert_into(streaks::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
            }
        }
        Ok(())
    }
}
