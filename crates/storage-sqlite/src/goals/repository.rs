use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use waypoint_core::db::DbPool;
use waypoint_core::errors::{Error, Result};
use waypoint_core::goals::{Goal, GoalRepositoryTrait, GoalStatus, GoalUpdate, NewGoal};

use super::model::GoalDB;
use crate::db::get_connection;
use crate::errors::StorageError;
use crate::schema::goals;

pub struct GoalRepository {
    pool: Arc<DbPool>,
}

impl GoalRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        GoalRepository { pool }
    }

    fn fetch_scoped(
        conn: &mut SqliteConnection,
        account_id: &str,
        goal_id: &str,
    ) -> Result<Goal> {
        let row = goals::table
            .filter(goals::id.eq(goal_id))
            .filter(goals::account_id.eq(account_id))
            .first::<GoalDB>(conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(Goal::from)
            .ok_or_else(|| Error::NotFound(format!("Goal {goal_id}")))
    }
}

impl GoalRepositoryTrait for GoalRepository {
    fn get_goal(&self, account_id: &str, goal_id: &str) -> Result<Goal> {
        let mut conn = get_connection(&self.pool)?;
        Self::fetch_scoped(&mut conn, account_id, goal_id)
    }

    fn list_goals(&self, account_id: &str) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goals::table
            .filter(goals::account_id.eq(account_id))
            .order(goals::created_at.asc())
            .load::<GoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    fn goals_by_status(&self, account_id: &str, status: GoalStatus) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goals::table
            .filter(goals::account_id.eq(account_id))
            .filter(goals::status.eq(status.as_str()))
            .order(goals::created_at.asc())
            .load::<GoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    fn count_by_status(&self, account_id: &str, status: GoalStatus) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        Ok(goals::table
            .filter(goals::account_id.eq(account_id))
            .filter(goals::status.eq(status.as_str()))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?)
    }

    fn get_lockable_goals(&self, account_id: &str) -> Result<Vec<Goal>> {
        // Stand-in for the billing collaborator's eligibility predicate:
        // every ACTIVE goal qualifies, newest first. See DESIGN.md.
        let mut conn = get_connection(&self.pool)?;
        let rows = goals::table
            .filter(goals::account_id.eq(account_id))
            .filter(goals::status.eq(GoalStatus::Active.as_str()))
            .order(goals::created_at.desc())
            .load::<GoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    fn get_goal_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        goal_id: &str,
    ) -> Result<Goal> {
        Self::fetch_scoped(conn, account_id, goal_id)
    }

    fn insert_goal_in_tx(&self, conn: &mut SqliteConnection, new_goal: NewGoal) -> Result<Goal> {
        let now = Utc::now().naive_utc();
        let row = GoalDB {
            id: new_goal.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            account_id: new_goal.account_id,
            title: new_goal.title,
            description: new_goal.description,
            target_value: new_goal.target_value,
            unit: new_goal.unit,
            current_progress: "0".to_string(),
            status: GoalStatus::Active.as_str().to_string(),
            previous_status: None,
            start_date: new_goal.start_date,
            target_date: new_goal.target_date,
            created_at: now,
            updated_at: now,
        };
        diesel::insert_into(goals::table)
            .values(&row)
            .execute(conn)
            .map_err(StorageError::from)?;
        Ok(Goal::from(row))
    }

    fn update_goal_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        update: GoalUpdate,
    ) -> Result<Goal> {
        let goal_id = update.id.clone();
        let updated = diesel::update(
            goals::table
                .filter(goals::id.eq(&goal_id))
                .filter(goals::account_id.eq(account_id)),
        )
        .set((
            goals::title.eq(update.title),
            goals::description.eq(update.description),
            goals::target_value.eq(update.target_value),
            goals::unit.eq(update.unit),
            goals::status.eq(update.status.as_str()),
            goals::start_date.eq(update.start_date),
            goals::target_date.eq(update.target_date),
            goals::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(conn)
        .map_err(StorageError::from)?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Goal {goal_id}")));
        }
        Self::fetch_scoped(conn, account_id, &goal_id)
    }

    fn save_progress_state_in_tx(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
        current_progress: Decimal,
        status: GoalStatus,
    ) -> Result<()> {
        let updated = diesel::update(goals::table.find(goal_id))
            .set((
                goals::current_progress.eq(current_progress.to_string()),
                goals::status.eq(status.as_str()),
                goals::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)
            .map_err(StorageError::from)?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Goal {goal_id}")));
        }
        Ok(())
    }

    fn set_lock_state_in_tx(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
        status: GoalStatus,
        previous_status: Option<GoalStatus>,
    ) -> Result<()> {
        let updated = diesel::update(goals::table.find(goal_id))
            .set((
                goals::status.eq(status.as_str()),
                goals::previous_status.eq(previous_status.map(|s| s.as_str().to_string())),
                goals::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)
            .map_err(StorageError::from)?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Goal {goal_id}")));
        }
        Ok(())
    }

    fn delete_goal_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        goal_id: &str,
    ) -> Result<usize> {
        // Entries, milestones, and streak rows go with the goal through
        // ON DELETE CASCADE.
        Ok(diesel::delete(
            goals::table
                .filter(goals::id.eq(goal_id))
                .filter(goals::account_id.eq(account_id)),
        )
        .execute(conn)
        .map_err(StorageError::from)?)
    }
}
