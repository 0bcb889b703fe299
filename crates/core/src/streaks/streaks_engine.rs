//! In-transaction building blocks of the streak engine.
//!
//! These functions run on a connection owned by an enclosing transaction, so
//! sibling services (progress ledger, task completion, journaling) can fold
//! streak and shield effects into their own atomic units.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::sqlite::SqliteConnection;
use log::debug;

use super::streaks_model::{apply_status, CompletionStatus, StreakInfo, StreakKey};
use super::streaks_traits::StreakRepositoryTrait;
use crate::accounts::AccountRepositoryTrait;
use crate::constants::{SHIELD_INVENTORY_CAP, SHIELD_WEEKLY_QUOTA};
use crate::errors::Result;
use crate::journal::JournalRepositoryTrait;
use crate::utils::time_utils::week_bounds;

/// Applies one completion event to every level it touches.
///
/// All keys transition identically and independently; records missing from
/// storage start from zero.
pub fn apply_completion_in_tx(
    repository: &dyn StreakRepositoryTrait,
    conn: &mut SqliteConnection,
    keys: &[StreakKey],
    status: CompletionStatus,
    now: NaiveDateTime,
) -> Result<Vec<StreakInfo>> {
    let mut updated = Vec::with_capacity(keys.len());
    for key in keys {
        let mut info = repository
            .find_streak_in_tx(conn, key)?
            .unwrap_or_else(|| StreakInfo::zero(key, now));
        apply_status(&mut info, status, now);
        repository.upsert_streak_in_tx(conn, &info)?;
        updated.push(info);
    }
    Ok(updated)
}

/// Adds shields to the account inventory, clamped at the cap.
///
/// Used for milestone awards, which ignore the weekly journal quota. Returns
/// `(previous, new)` balance when the inventory changed.
pub fn award_shields_in_tx(
    account_repository: &dyn AccountRepositoryTrait,
    conn: &mut SqliteConnection,
    account_id: &str,
    count: i32,
) -> Result<Option<(i32, i32)>> {
    if count <= 0 {
        return Ok(None);
    }
    let account = account_repository.get_account_in_tx(conn, account_id)?;
    let new_count = (account.shield_count + count).min(SHIELD_INVENTORY_CAP);
    if new_count == account.shield_count {
        debug!(
            "Shield award for account {} dropped: inventory already at cap",
            account_id
        );
        return Ok(None);
    }
    account_repository.set_shield_count_in_tx(conn, account_id, new_count)?;
    Ok(Some((account.shield_count, new_count)))
}

/// Awards one shield for journaling on `date`, if the weekly quota and the
/// inventory cap allow it. Returns the new balance when awarded.
///
/// The weekly quota is tracked through shield-protected journal entries in
/// the same Monday-Sunday window as `date`.
pub fn try_award_journal_shield_in_tx(
    account_repository: &dyn AccountRepositoryTrait,
    journal_repository: &dyn JournalRepositoryTrait,
    conn: &mut SqliteConnection,
    account_id: &str,
    date: NaiveDate,
) -> Result<Option<i32>> {
    let account = account_repository.get_account_in_tx(conn, account_id)?;
    if account.shield_count >= SHIELD_INVENTORY_CAP {
        debug!(
            "No journal shield for account {}: inventory at cap",
            account_id
        );
        return Ok(None);
    }
    let (week_start, week_end) = week_bounds(date);
    let used_this_week =
        journal_repository.protected_count_in_week_in_tx(conn, account_id, week_start, week_end)?;
    if used_this_week >= SHIELD_WEEKLY_QUOTA {
        debug!(
            "No journal shield for account {}: weekly quota already used",
            account_id
        );
        return Ok(None);
    }
    let new_count = account.shield_count + 1;
    account_repository.set_shield_count_in_tx(conn, account_id, new_count)?;
    Ok(Some(new_count))
}
