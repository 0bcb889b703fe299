//! Round-trip tests for the SQLite repositories against a real database.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tempfile::TempDir;

use waypoint_core::accounts::{AccountRepositoryTrait, NewAccount};
use waypoint_core::db::{DbPool, DbTransactionExecutor};
use waypoint_core::errors::Error;
use waypoint_core::goals::{GoalRepositoryTrait, GoalStatus, NewGoal};
use waypoint_core::journal::{JournalRepositoryTrait, NewJournalEntry};
use waypoint_core::milestones::{MilestoneRepositoryTrait, NewMilestone};
use waypoint_core::progress::{NewProgressEntry, ProgressRepositoryTrait};
use waypoint_core::streaks::{CompletionStatus, StreakInfo, StreakKey, StreakRepositoryTrait};
use waypoint_core::tasks::{NewTask, NewTaskCompletion, TaskRepositoryTrait};

use waypoint_storage_sqlite::accounts::AccountRepository;
use waypoint_storage_sqlite::goals::GoalRepository;
use waypoint_storage_sqlite::journal::JournalRepository;
use waypoint_storage_sqlite::milestones::MilestoneRepository;
use waypoint_storage_sqlite::progress::ProgressRepository;
use waypoint_storage_sqlite::streaks::StreakRepository;
use waypoint_storage_sqlite::tasks::TaskRepository;
use waypoint_storage_sqlite::{create_pool, run_migrations};

fn setup() -> (TempDir, Arc<DbPool>) {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("test.db");
    let pool = create_pool(db_path.to_str().unwrap()).expect("pool");
    run_migrations(&pool).expect("migrations");
    (dir, pool)
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn create_account(pool: &Arc<DbPool>, name: &str) -> String {
    let repository = AccountRepository::new(pool.clone());
    pool.execute(|conn| {
        repository.insert_account_in_tx(
            conn,
            NewAccount {
                id: None,
                name: name.to_string(),
            },
        )
    })
    .expect("account")
    .id
}

fn create_goal(pool: &Arc<DbPool>, account_id: &str, title: &str) -> String {
    let repository = GoalRepository::new(pool.clone());
    pool.execute(|conn| {
        repository.insert_goal_in_tx(
            conn,
            NewGoal {
                id: None,
                account_id: account_id.to_string(),
                title: title.to_string(),
                description: None,
                target_value: "10".to_string(),
                unit: "km".to_string(),
                start_date: None,
                target_date: None,
            },
        )
    })
    .expect("goal")
    .id
}

#[test]
fn test_account_round_trip() {
    let (_dir, pool) = setup();
    let repository = AccountRepository::new(pool.clone());
    let account_id = create_account(&pool, "Ada");

    let account = repository.get_account(&account_id).unwrap();
    assert_eq!(account.name, "Ada");
    assert_eq!(account.shield_count, 0);
    assert_eq!(account.last_activity_on, None);

    pool.execute(|conn| {
        repository.set_shield_count_in_tx(conn, &account_id, 2)?;
        repository.set_last_activity_on_in_tx(conn, &account_id, d(2026, 8, 5))
    })
    .unwrap();

    let account = repository.get_account(&account_id).unwrap();
    assert_eq!(account.shield_count, 2);
    assert_eq!(account.last_activity_on, Some(d(2026, 8, 5)));

    assert!(matches!(
        repository.get_account("missing"),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_goal_scoping_and_lock_state() {
    let (_dir, pool) = setup();
    let repository = GoalRepository::new(pool.clone());
    let account_id = create_account(&pool, "Ada");
    let other_id = create_account(&pool, "Eve");
    let goal_id = create_goal(&pool, &account_id, "Run 10k");

    // Owner-scoped lookups.
    assert!(repository.get_goal(&account_id, &goal_id).is_ok());
    assert!(matches!(
        repository.get_goal(&other_id, &goal_id),
        Err(Error::NotFound(_))
    ));

    // Lock pairing round trip.
    pool.execute(|conn| {
        repository.set_lock_state_in_tx(
            conn,
            &goal_id,
            GoalStatus::Locked,
            Some(GoalStatus::Active),
        )
    })
    .unwrap();
    let goal = repository.get_goal(&account_id, &goal_id).unwrap();
    assert_eq!(goal.status, GoalStatus::Locked);
    assert_eq!(goal.previous_status, Some(GoalStatus::Active));

    let locked = repository
        .goals_by_status(&account_id, GoalStatus::Locked)
        .unwrap();
    assert_eq!(locked.len(), 1);
    assert_eq!(
        repository
            .count_by_status(&account_id, GoalStatus::Active)
            .unwrap(),
        0
    );
}

#[test]
fn test_lockable_goals_are_newest_first() {
    let (_dir, pool) = setup();
    let repository = GoalRepository::new(pool.clone());
    let account_id = create_account(&pool, "Ada");
    let first = create_goal(&pool, &account_id, "first");
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = create_goal(&pool, &account_id, "second");

    let lockable = repository.get_lockable_goals(&account_id).unwrap();
    assert_eq!(lockable.len(), 2);
    assert_eq!(lockable[0].id, second);
    assert_eq!(lockable[1].id, first);
}

#[test]
fn test_progress_entries_and_date_queries() {
    let (_dir, pool) = setup();
    let repository = ProgressRepository::new(pool.clone());
    let account_id = create_account(&pool, "Ada");
    let goal_id = create_goal(&pool, &account_id, "Run 10k");

    let entry = pool
        .execute(|conn| {
            repository.insert_entry_in_tx(
                conn,
                NewProgressEntry {
                    id: None,
                    goal_id: goal_id.clone(),
                    value: dec!(3.5),
                    note: Some("morning run".to_string()),
                },
            )
        })
        .unwrap();

    let listed = repository.list_entries(&goal_id).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].value, dec!(3.5));

    // Scoped fetch through the owning goal.
    assert!(repository.get_entry(&account_id, &entry.id).is_ok());
    assert!(matches!(
        repository.get_entry("someone-else", &entry.id),
        Err(Error::NotFound(_))
    ));

    let today = entry.created_at.date();
    assert!(repository.has_entry_on(&account_id, today).unwrap());
    assert!(!repository
        .has_entry_on(&account_id, today.pred_opt().unwrap())
        .unwrap());
    assert_eq!(
        repository
            .entry_dates_since(&account_id, today)
            .unwrap(),
        vec![today]
    );
}

#[test]
fn test_milestone_uniqueness_is_enforced() {
    let (_dir, pool) = setup();
    let repository = MilestoneRepository::new(pool.clone());
    let account_id = create_account(&pool, "Ada");
    let goal_id = create_goal(&pool, &account_id, "Run 10k");

    let insert = |goal: String| {
        pool.execute(|conn| {
            repository.insert_milestone_in_tx(
                conn,
                NewMilestone {
                    id: None,
                    goal_id: goal,
                    percentage: 50,
                    description: None,
                },
                false,
                None,
            )
        })
    };

    insert(goal_id.clone()).unwrap();
    let duplicate = insert(goal_id.clone());
    assert!(duplicate.is_err());

    let milestones = repository.list_milestones(&goal_id).unwrap();
    assert_eq!(milestones.len(), 1);
    assert!(!milestones[0].achieved);
}

#[test]
fn test_streak_upsert_by_key() {
    let (_dir, pool) = setup();
    let repository = StreakRepository::new(pool.clone());
    let account_id = create_account(&pool, "Ada");
    let key = StreakKey::account(account_id.as_str());

    assert!(repository.find_streak(&key).unwrap().is_none());

    let mut info = StreakInfo::zero(&key, chrono::Utc::now().naive_utc());
    info.current_maintained_streak = 3;
    info.best_maintained_streak = 3;
    pool.execute(|conn| repository.upsert_streak_in_tx(conn, &info))
        .unwrap();

    let stored = repository.find_streak(&key).unwrap().unwrap();
    assert_eq!(stored.current_maintained_streak, 3);

    // Second upsert updates the same row.
    let mut advanced = stored.clone();
    advanced.current_maintained_streak = 4;
    pool.execute(|conn| repository.upsert_streak_in_tx(conn, &advanced))
        .unwrap();
    let stored = repository.find_streak(&key).unwrap().unwrap();
    assert_eq!(stored.current_maintained_streak, 4);

    // Goal-level records do not shadow the account-level one.
    let goal_key = StreakKey::goal(account_id.as_str(), "goal-x");
    assert!(repository.find_streak(&goal_key).unwrap().is_none());
}

#[test]
fn test_journal_week_queries() {
    let (_dir, pool) = setup();
    let repository = JournalRepository::new(pool.clone());
    let account_id = create_account(&pool, "Ada");

    let entry = pool
        .execute(|conn| {
            repository.insert_entry_in_tx(
                conn,
                NewJournalEntry {
                    id: None,
                    account_id: account_id.clone(),
                    entry_date: d(2026, 8, 5),
                    content: "dear diary".to_string(),
                },
            )
        })
        .unwrap();

    assert!(repository.exists_on(&account_id, d(2026, 8, 5)).unwrap());
    assert!(!repository.exists_on(&account_id, d(2026, 8, 6)).unwrap());

    let week = pool
        .execute(|conn| {
            repository.protected_count_in_week_in_tx(conn, &account_id, d(2026, 8, 3), d(2026, 8, 9))
        })
        .unwrap();
    assert_eq!(week, 0);

    pool.execute(|conn| repository.mark_shield_protected_in_tx(conn, &entry.id))
        .unwrap();
    let week = pool
        .execute(|conn| {
            repository.protected_count_in_week_in_tx(conn, &account_id, d(2026, 8, 3), d(2026, 8, 9))
        })
        .unwrap();
    assert_eq!(week, 1);
    assert_eq!(
        repository
            .protected_dates_since(&account_id, d(2026, 8, 1))
            .unwrap(),
        vec![d(2026, 8, 5)]
    );
}

#[test]
fn test_task_completion_activity_queries() {
    let (_dir, pool) = setup();
    let repository = TaskRepository::new(pool.clone());
    let account_id = create_account(&pool, "Ada");

    let task = pool
        .execute(|conn| {
            repository.insert_task_in_tx(
                conn,
                NewTask {
                    id: None,
                    account_id: account_id.clone(),
                    goal_id: None,
                    title: "Morning run".to_string(),
                },
            )
        })
        .unwrap();

    let record = |status: CompletionStatus, date: NaiveDate| {
        pool.execute(|conn| {
            repository.insert_completion_in_tx(
                conn,
                NewTaskCompletion {
                    task_id: task.id.clone(),
                    account_id: account_id.clone(),
                    goal_id: None,
                    status,
                    completed_on: date,
                },
            )
        })
        .unwrap()
    };

    record(CompletionStatus::Completed, d(2026, 8, 4));
    record(CompletionStatus::Missed, d(2026, 8, 5));

    // MISSED is not activity.
    assert!(repository
        .has_activity_completion_on(&account_id, d(2026, 8, 4))
        .unwrap());
    assert!(!repository
        .has_activity_completion_on(&account_id, d(2026, 8, 5))
        .unwrap());
    assert_eq!(
        repository
            .completion_dates_since(&account_id, d(2026, 8, 1))
            .unwrap(),
        vec![d(2026, 8, 4)]
    );
}

#[test]
fn test_executor_rolls_back_on_error() {
    let (_dir, pool) = setup();
    let repository = AccountRepository::new(pool.clone());

    let result: Result<(), Error> = pool.execute(|conn| {
        repository.insert_account_in_tx(
            conn,
            NewAccount {
                id: Some("doomed".to_string()),
                name: "Rolled back".to_string(),
            },
        )?;
        Err(Error::Unexpected("abort".to_string()))
    });
    assert!(result.is_err());

    // The insert vanished with the transaction.
    assert!(matches!(
        repository.get_account("doomed"),
        Err(Error::NotFound(_))
    ));
}
