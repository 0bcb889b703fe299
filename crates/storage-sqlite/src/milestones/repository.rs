use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use waypoint_core::db::DbPool;
use waypoint_core::errors::Result;
use waypoint_core::milestones::{Milestone, MilestoneRepositoryTrait, NewMilestone};

use super::model::MilestoneDB;
use crate::db::get_connection;
use crate::errors::StorageError;
use crate::schema::milestones;

pub struct MilestoneRepository {
    pool: Arc<DbPool>,
}

impl MilestoneRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        MilestoneRepository { pool }
    }

    fn load_for_goal(conn: &mut SqliteConnection, goal_id: &str) -> Result<Vec<Milestone>> {
        let rows = milestones::table
            .filter(milestones::goal_id.eq(goal_id))
            .order(milestones::percentage.asc())
            .load::<MilestoneDB>(conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Milestone::from).collect())
    }
}

impl MilestoneRepositoryTrait for MilestoneRepository {
    fn list_milestones(&self, goal_id: &str) -> Result<Vec<Milestone>> {
        let mut conn = get_connection(&self.pool)?;
        Self::load_for_goal(&mut conn, goal_id)
    }

    fn milestones_for_goal_in_tx(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
    ) -> Result<Vec<Milestone>> {
        Self::load_for_goal(conn, goal_id)
    }

    fn insert_milestone_in_tx(
        &self,
        conn: &mut SqliteConnection,
        new_milestone: NewMilestone,
        achieved: bool,
        achieved_at: Option<NaiveDateTime>,
    ) -> Result<Milestone> {
        let description = new_milestone.description_or_default();
        let row = MilestoneDB {
            id: new_milestone
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            goal_id: new_milestone.goal_id,
            percentage: new_milestone.percentage,
            description,
            achieved,
            achieved_at,
            created_at: Utc::now().naive_utc(),
        };
        diesel::insert_into(milestones::table)
            .values(&row)
            .execute(conn)
            .map_err(StorageError::from)?;
        Ok(Milestone::from(row))
    }

    fn save_milestone_in_tx(
        &self,
        conn: &mut SqliteConnection,
        milestone: &Milestone,
    ) -> Result<()> {
        diesel::update(milestones::table.find(&milestone.id))
            .set((
                milestones::achieved.eq(milestone.achieved),
                milestones::achieved_at.eq(milestone.achieved_at),
            ))
            .execute(conn)
            .map_err(StorageError::from)?;
        Ok(())
    }

    fn delete_milestone_in_tx(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
        milestone_id: &str,
    ) -> Result<usize> {
        Ok(diesel::delete(
            milestones::table
                .filter(milestones::id.eq(milestone_id))
                .filter(milestones::goal_id.eq(goal_id)),
        )
        .execute(conn)
        .map_err(StorageError::from)?)
    }
}
