use chrono::NaiveDate;
use diesel::sqlite::SqliteConnection;

use super::accounts_model::{Account, NewAccount};
use crate::errors::Result;

/// Trait defining the contract for account repository operations.
///
/// The `_in_tx` variants run on a connection owned by an enclosing
/// transaction; shield and anchor updates always commit together with the
/// mutation that caused them.
pub trait AccountRepositoryTrait: Send + Sync {
    fn get_account(&self, account_id: &str) -> Result<Account>;
    fn get_account_in_tx(&self, conn: &mut SqliteConnection, account_id: &str)
        -> Result<Account>;
    fn insert_account_in_tx(
        &self,
        conn: &mut SqliteConnection,
        new_account: NewAccount,
    ) -> Result<Account>;
    fn set_shield_count_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        shield_count: i32,
    ) -> Result<()>;
    fn set_last_activity_on_in_tx(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        last_activity_on: NaiveDate,
    ) -> Result<()>;
}
