use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use waypoint_core::accounts::{Account, AccountRepositoryTrait, NewAccount};
use waypoint_core::db::DbPool;
use waypoint_core::errors::{Error, Result};

use super::model::AccountDB;
use crate::db::get_connection;
use crate::errors::StorageError;
use crate::schema::accounts;

pub struct AccountRepository {
    pool: Arc<DbPool>,
}

impl AccountRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        AccountRepository { pool }
    }

    fn fetch(conn: &mut SqliteConnection, account_id: &str) -> Result<Account> {
        let row = accounts::table
            .find(account_id)
            .first::<AccountDB>(conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(Account::from)
            .ok_or_else(|| Error::NotFound(format!("Account {account_id}")))
    }
}

impl AccountRepositoryTrait for AccountRepository {
    fn get_account(&self, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;
        Self::fetch(&mut conn, account_id)
    }

    fn get_account_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
    ) -> Result<Account> {
        Self::fetch(conn, account_id)
    }

    fn insert_account_in_tx(
        &self,
        conn: &mut SqliteConnection,
        new_account: NewAccount,
    ) -> Result<Account> {
        let now = Utc::now().naive_utc();
        let row = AccountDB {
            id: new_account.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: new_account.name,
            shield_count: 0,
            last_activity_on: None,
            created_at: now,
            updated_at: now,
        };
        diesel::insert_into(accounts::table)
            .values(&row)
            .execute(conn)
            .map_err(StorageError::from)?;
        Ok(Account::from(row))
    }

    fn set_shield_count_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        shield_count: i32,
    ) -> Result<()> {
        let updated = diesel::update(accounts::table.find(account_id))
            .set((
                accounts::shield_count.eq(shield_count),
                accounts::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)
            .map_err(StorageError::from)?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Account {account_id}")));
        }
        Ok(())
    }

    fn set_last_activity_on_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        last_activity_on: chrono::NaiveDate,
    ) -> Result<()> {
        let updated = diesel::update(accounts::table.find(account_id))
            .set((
                accounts::last_activity_on.eq(Some(last_activity_on)),
                accounts::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)
            .map_err(StorageError::from)?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Account {account_id}")));
        }
        Ok(())
    }
}
