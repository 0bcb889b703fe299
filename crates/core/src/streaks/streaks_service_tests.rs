#[cfg(test)]
mod tests {
    use crate::accounts::{Account, AccountRepositoryTrait, NewAccount};
    use crate::db::DbTransactionExecutor;
    use crate::errors::{Error, Result};
    use crate::events::{DomainEvent, MockDomainEventSink};
    use crate::journal::{JournalEntry, JournalRepositoryTrait, NewJournalEntry};
    use crate::progress::{
        NewProgressEntry, ProgressEntry, ProgressEntryUpdate, ProgressRepositoryTrait,
    };
    use crate::streaks::{
        EndOfDayOutcome, StreakInfo, StreakKey, StreakLevel, StreakRepositoryTrait, StreakService,
        StreakServiceTrait,
    };
    use crate::tasks::{NewTask, NewTaskCompletion, Task, TaskCompletion, TaskRepositoryTrait};
    use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
    use diesel::sqlite::SqliteConnection;
    use diesel::Connection;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // Wednesday, so the Monday-Sunday week around it is 03..=09.
    const TODAY: (i32, u32, u32) = (2026, 8, 5);

    fn today() -> NaiveDate {
        d(TODAY.0, TODAY.1, TODAY.2)
    }

    #[derive(Clone)]
    struct MockExecutor;

    impl DbTransactionExecutor for MockExecutor {
        fn execute<F, T, E>(&self, f: F) -> Result<T>
        where
            F: FnOnce(&mut SqliteConnection) -> std::result::Result<T, E>,
            E: Into<Error>,
        {
            let mut conn =
                SqliteConnection::establish(":memory:").expect("in-memory connection");
            f(&mut conn).map_err(Into::into)
        }
    }

    #[derive(Default)]
    struct MockStreakRepository {
        streaks: Mutex<Vec<StreakInfo>>,
    }

    impl MockStreakRepository {
        fn get(&self, key: &StreakKey) -> Option<StreakInfo> {
            self.streaks
                .lock()
                .unwrap()
                .iter()
                .find(|s| &s.key() == key)
                .cloned()
        }

        fn seed(&self, info: StreakInfo) {
            self.streaks.lock().unwrap().push(info);
        }
    }

    impl StreakRepositoryTrait for MockStreakRepository {
        fn find_streak(&self, key: &StreakKey) -> Result<Option<StreakInfo>> {
            Ok(self.get(key))
        }

        fn find_streak_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            key: &StreakKey,
        ) -> Result<Option<StreakInfo>> {
            Ok(self.get(key))
        }

        fn upsert_streak_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            info: &StreakInfo,
        ) -> Result<()> {
            let mut streaks = self.streaks.lock().unwrap();
            match streaks.iter_mut().find(|s| s.key() == info.key()) {
                Some(existing) => *existing = info.clone(),
                None => streaks.push(info.clone()),
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockAccountRepository {
        accounts: Mutex<Vec<Account>>,
    }

    impl MockAccountRepository {
        fn add(&self, account: Account) {
            self.accounts.lock().unwrap().push(account);
        }

        fn get(&self, account_id: &str) -> Account {
            self.accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.id == account_id)
                .cloned()
                .unwrap()
        }
    }

    impl AccountRepositoryTrait for MockAccountRepository {
        fn get_account(&self, account_id: &str) -> Result<Account> {
            self.accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.id == account_id)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("Account {account_id}")))
        }

        fn get_account_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            account_id: &str,
        ) -> Result<Account> {
            self.get_account(account_id)
        }

        fn insert_account_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            _new_account: NewAccount,
        ) -> Result<Account> {
            unimplemented!()
        }

        fn set_shield_count_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            account_id: &str,
            shield_count: i32,
        ) -> Result<()> {
            let mut accounts = self.accounts.lock().unwrap();
            accounts
                .iter_mut()
                .find(|a| a.id == account_id)
                .unwrap()
                .shield_count = shield_count;
            Ok(())
        }

        fn set_last_activity_on_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            account_id: &str,
            last_activity_on: NaiveDate,
        ) -> Result<()> {
            let mut accounts = self.accounts.lock().unwrap();
            accounts
                .iter_mut()
                .find(|a| a.id == account_id)
                .unwrap()
                .last_activity_on = Some(last_activity_on);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockJournalRepository {
        entries: Mutex<Vec<JournalEntry>>,
    }

    impl MockJournalRepository {
        fn seed(&self, account_id: &str, date: NaiveDate, shield_protected: bool) -> String {
            let id = Uuid::new_v4().to_string();
            self.entries.lock().unwrap().push(JournalEntry {
                id: id.clone(),
                account_id: account_id.to_string(),
                entry_date: date,
                content: "dear diary".to_string(),
                shield_protected,
                created_at: now(),
            });
            id
        }

        fn get(&self, entry_id: &str) -> JournalEntry {
            self.entries
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.id == entry_id)
                .cloned()
                .unwrap()
        }
    }

    impl JournalRepositoryTrait for MockJournalRepository {
        fn get_entry(&self, _account_id: &str, entry_id: &str) -> Result<JournalEntry> {
            Ok(self.get(entry_id))
        }

        fn list_entries(
            &self,
            _account_id: &str,
            _from: NaiveDate,
            _to: NaiveDate,
        ) -> Result<Vec<JournalEntry>> {
            unimplemented!()
        }

        fn exists_on(&self, account_id: &str, date: NaiveDate) -> Result<bool> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .any(|e| e.account_id == account_id && e.entry_date == date))
        }

        fn protected_dates_since(
            &self,
            account_id: &str,
            from: NaiveDate,
        ) -> Result<Vec<NaiveDate>> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|e| {
                    e.account_id == account_id && e.shield_protected && e.entry_date >= from
                })
                .map(|e| e.entry_date)
                .collect())
        }

        fn insert_entry_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            _new_entry: NewJournalEntry,
        ) -> Result<JournalEntry> {
            unimplemented!()
        }

        fn delete_entry_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            _account_id: &str,
            _entry_id: &str,
        ) -> Result<usize> {
            unimplemented!()
        }

        fn first_entry_on_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            account_id: &str,
            date: NaiveDate,
        ) -> Result<Option<JournalEntry>> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.account_id == account_id && e.entry_date == date)
                .min_by_key(|e| e.created_at)
                .cloned())
        }

        fn mark_shield_protected_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            entry_id: &str,
        ) -> Result<()> {
            let mut entries = self.entries.lock().unwrap();
            entries
                .iter_mut()
                .find(|e| e.id == entry_id)
                .unwrap()
                .shield_protected = true;
            Ok(())
        }

        fn protected_count_in_week_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            account_id: &str,
            week_start: NaiveDate,
            week_end: NaiveDate,
        ) -> Result<i64> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|e| {
                    e.account_id == account_id
                        && e.shield_protected
                        && e.entry_date >= week_start
                        && e.entry_date <= week_end
                })
                .count() as i64)
        }
    }

    #[derive(Default)]
    struct MockProgressRepository {
        entry_dates: Mutex<Vec<NaiveDate>>,
    }

    impl ProgressRepositoryTrait for MockProgressRepository {
        fn get_entry(&self, _account_id: &str, _entry_id: &str) -> Result<ProgressEntry> {
            unimplemented!()
        }

        fn list_entries(&self, _goal_id: &str) -> Result<Vec<ProgressEntry>> {
            unimplemented!()
        }

        fn has_entry_on(&self, _account_id: &str, date: NaiveDate) -> Result<bool> {
            Ok(self.entry_dates.lock().unwrap().contains(&date))
        }

        fn entry_dates_since(&self, _account_id: &str, from: NaiveDate) -> Result<Vec<NaiveDate>> {
            Ok(self
                .entry_dates
                .lock()
                .unwrap()
                .iter()
                .copied()
                .filter(|date| *date >= from)
                .collect())
        }

        fn get_entry_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            _account_id: &str,
            _entry_id: &str,
        ) -> Result<ProgressEntry> {
            unimplemented!()
        }

        fn entries_for_goal_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            _goal_id: &str,
        ) -> Result<Vec<ProgressEntry>> {
            unimplemented!()
        }

        fn insert_entry_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            _new_entry: NewProgressEntry,
        ) -> Result<ProgressEntry> {
            unimplemented!()
        }

        fn update_entry_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            _update: ProgressEntryUpdate,
        ) -> Result<ProgressEntry> {
            unimplemented!()
        }

        fn delete_entry_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            _entry_id: &str,
        ) -> Result<usize> {
            unimplemented!()
        }
    }

    #[derive(Default)]
    struct MockTaskRepository {
        completion_dates: Mutex<Vec<NaiveDate>>,
    }

    impl TaskRepositoryTrait for MockTaskRepository {
        fn get_task(&self, _account_id: &str, _task_id: &str) -> Result<Task> {
            unimplemented!()
        }

        fn list_tasks(&self, _account_id: &str) -> Result<Vec<Task>> {
            unimplemented!()
        }

        fn has_activity_completion_on(&self, _account_id: &str, date: NaiveDate) -> Result<bool> {
            Ok(self.completion_dates.lock().unwrap().contains(&date))
        }

        fn completion_dates_since(
            &self,
            _account_id: &str,
            from: NaiveDate,
        ) -> Result<Vec<NaiveDate>> {
            Ok(self
                .completion_dates
                .lock()
                .unwrap()
                .iter()
                .copied()
                .filter(|date| *date >= from)
                .collect())
        }

        fn insert_task_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            _new_task: NewTask,
        ) -> Result<Task> {
            unimplemented!()
        }

        fn delete_task_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            _account_id: &str,
            _task_id: &str,
        ) -> Result<usize> {
            unimplemented!()
        }

        fn insert_completion_in_tx(
            &self,
            _conn: &mut SqliteConnection,
            _new_completion: NewTaskCompletion,
        ) -> Result<TaskCompletion> {
            unimplemented!()
        }
    }

    const ACCOUNT_ID: &str = "acct-1";

    fn account(shield_count: i32, last_activity_on: Option<NaiveDate>) -> Account {
        Account {
            id: ACCOUNT_ID.to_string(),
            name: "Test".to_string(),
            shield_count,
            last_activity_on,
            created_at: now(),
            updated_at: now(),
        }
    }

    struct Harness {
        service: StreakService<MockExecutor>,
        streaks: Arc<MockStreakRepository>,
        accounts: Arc<MockAccountRepository>,
        journal: Arc<MockJournalRepository>,
        progress: Arc<MockProgressRepository>,
        tasks: Arc<MockTaskRepository>,
        sink: MockDomainEventSink,
    }

    fn harness(shield_count: i32, last_activity_on: Option<NaiveDate>) -> Harness {
        let streaks = Arc::new(MockStreakRepository::default());
        let accounts = Arc::new(MockAccountRepository::default());
        accounts.add(account(shield_count, last_activity_on));
        let journal = Arc::new(MockJournalRepository::default());
        let progress = Arc::new(MockProgressRepository::default());
        let tasks = Arc::new(MockTaskRepository::default());
        let sink = MockDomainEventSink::new();

        let service = StreakService::new(
            streaks.clone(),
            accounts.clone(),
            journal.clone(),
            progress.clone(),
            tasks.clone(),
            Arc::new(sink.clone()),
            MockExecutor,
        );
        Harness {
            service,
            streaks,
            accounts,
            journal,
            progress,
            tasks,
            sink,
        }
    }

    fn seeded_account_streak(h: &Harness, maintained: i32, best: i32) {
        let mut info = StreakInfo::zero(&StreakKey::account(ACCOUNT_ID), now());
        info.current_maintained_streak = maintained;
        info.best_maintained_streak = best;
        h.streaks.seed(info);
    }

    fn account_streak(h: &Harness) -> StreakInfo {
        h.streaks.get(&StreakKey::account(ACCOUNT_ID)).unwrap()
    }

    // --- End-of-day processing ---

    #[tokio::test]
    async fn test_end_of_day_advances_on_real_activity() {
        let h = harness(0, None);
        h.tasks.completion_dates.lock().unwrap().push(today());
        seeded_account_streak(&h, 3, 3);

        let outcome = h
            .service
            .process_end_of_day(ACCOUNT_ID, today())
            .await
            .unwrap();

        assert_eq!(outcome, EndOfDayOutcome::Advanced);
        let streak = account_streak(&h);
        assert_eq!(streak.current_maintained_streak, 4);
        assert_eq!(streak.best_maintained_streak, 4);
    }

    #[tokio::test]
    async fn test_end_of_day_counts_progress_entries_as_activity() {
        let h = harness(0, None);
        h.progress.entry_dates.lock().unwrap().push(today());

        let outcome = h
            .service
            .process_end_of_day(ACCOUNT_ID, today())
            .await
            .unwrap();
        assert_eq!(outcome, EndOfDayOutcome::Advanced);
    }

    #[tokio::test]
    async fn test_end_of_day_consumes_shield_on_journaled_day() {
        let h = harness(1, None);
        let entry_id = h.journal.seed(ACCOUNT_ID, today(), false);
        seeded_account_streak(&h, 5, 5);

        let outcome = h
            .service
            .process_end_of_day(ACCOUNT_ID, today())
            .await
            .unwrap();

        assert_eq!(outcome, EndOfDayOutcome::ShieldConsumed);
        // Inventory decremented, entry flagged, streak untouched.
        assert_eq!(h.accounts.get(ACCOUNT_ID).shield_count, 0);
        assert!(h.journal.get(&entry_id).shield_protected);
        assert_eq!(account_streak(&h).current_maintained_streak, 5);
        assert!(h
            .sink
            .events()
            .contains(&DomainEvent::shield_consumed(ACCOUNT_ID, today(), 0)));
    }

    #[tokio::test]
    async fn test_end_of_day_resets_without_shield() {
        let h = harness(0, None);
        h.journal.seed(ACCOUNT_ID, today(), false);
        seeded_account_streak(&h, 5, 7);

        let outcome = h
            .service
            .process_end_of_day(ACCOUNT_ID, today())
            .await
            .unwrap();

        assert_eq!(outcome, EndOfDayOutcome::StreakReset);
        let streak = account_streak(&h);
        assert_eq!(streak.current_maintained_streak, 0);
        assert_eq!(streak.best_maintained_streak, 7);
        assert!(h.sink.events().contains(&DomainEvent::streak_reset(ACCOUNT_ID)));
    }

    #[tokio::test]
    async fn test_end_of_day_respects_weekly_shield_quota() {
        let h = harness(2, None);
        // A shield was already spent this week (Monday of the same week).
        h.journal.seed(ACCOUNT_ID, d(2026, 8, 3), true);
        h.journal.seed(ACCOUNT_ID, today(), false);
        seeded_account_streak(&h, 5, 5);

        let outcome = h
            .service
            .process_end_of_day(ACCOUNT_ID, today())
            .await
            .unwrap();

        assert_eq!(outcome, EndOfDayOutcome::StreakReset);
        assert_eq!(h.accounts.get(ACCOUNT_ID).shield_count, 2);
        assert_eq!(account_streak(&h).current_maintained_streak, 0);
    }

    #[tokio::test]
    async fn test_end_of_day_without_journal_or_streak_is_unchanged() {
        let h = harness(2, None);
        let outcome = h
            .service
            .process_end_of_day(ACCOUNT_ID, today())
            .await
            .unwrap();
        assert_eq!(outcome, EndOfDayOutcome::Unchanged);
        assert_eq!(h.accounts.get(ACCOUNT_ID).shield_count, 2);
    }

    // --- Replay recalculation ---

    #[tokio::test]
    async fn test_recalculate_counts_consecutive_days() {
        let h = harness(0, None);
        h.tasks
            .completion_dates
            .lock()
            .unwrap()
            .extend([today(), today() - Duration::days(1)]);
        h.progress
            .entry_dates
            .lock()
            .unwrap()
            .push(today() - Duration::days(2));
        // Gap at -3; -4 must not count.
        h.tasks
            .completion_dates
            .lock()
            .unwrap()
            .push(today() - Duration::days(4));

        let info = h
            .service
            .recalculate_streak(ACCOUNT_ID, today())
            .await
            .unwrap();
        assert_eq!(info.current_maintained_streak, 3);
        assert_eq!(info.best_maintained_streak, 3);
    }

    #[tokio::test]
    async fn test_recalculate_counts_shield_protected_days() {
        let h = harness(0, None);
        h.tasks.completion_dates.lock().unwrap().push(today());
        h.journal.seed(ACCOUNT_ID, today() - Duration::days(1), true);
        h.tasks
            .completion_dates
            .lock()
            .unwrap()
            .push(today() - Duration::days(2));

        let info = h
            .service
            .recalculate_streak(ACCOUNT_ID, today())
            .await
            .unwrap();
        assert_eq!(info.current_maintained_streak, 3);
    }

    #[tokio::test]
    async fn test_recalculate_tolerates_unflagged_journal_today_only() {
        let h = harness(0, None);
        // Journaled today (not yet flagged) and yesterday (also unflagged).
        h.journal.seed(ACCOUNT_ID, today(), false);
        h.journal.seed(ACCOUNT_ID, today() - Duration::days(1), false);

        let info = h
            .service
            .recalculate_streak(ACCOUNT_ID, today())
            .await
            .unwrap();
        // Only today's journal keeps the chain alive before end-of-day runs.
        assert_eq!(info.current_maintained_streak, 1);
    }

    #[tokio::test]
    async fn test_recalculate_preserves_best() {
        let h = harness(0, None);
        seeded_account_streak(&h, 9, 9);
        // No activity at all: replay finds nothing.
        let info = h
            .service
            .recalculate_streak(ACCOUNT_ID, today())
            .await
            .unwrap();
        assert_eq!(info.current_maintained_streak, 0);
        assert_eq!(info.best_maintained_streak, 9);
    }

    // --- Incremental activity path ---

    #[tokio::test]
    async fn test_on_activity_yesterday_increments() {
        let h = harness(0, Some(today() - Duration::days(1)));
        seeded_account_streak(&h, 4, 4);

        h.service
            .on_activity_recorded(ACCOUNT_ID, today())
            .await
            .unwrap();

        assert_eq!(account_streak(&h).current_maintained_streak, 5);
        assert_eq!(h.accounts.get(ACCOUNT_ID).last_activity_on, Some(today()));
    }

    #[tokio::test]
    async fn test_on_activity_same_day_is_idempotent() {
        let h = harness(0, Some(today()));
        seeded_account_streak(&h, 4, 4);

        h.service
            .on_activity_recorded(ACCOUNT_ID, today())
            .await
            .unwrap();

        assert_eq!(account_streak(&h).current_maintained_streak, 4);
    }

    #[tokio::test]
    async fn test_on_activity_stale_anchor_replays() {
        let h = harness(0, Some(today() - Duration::days(3)));
        seeded_account_streak(&h, 9, 9);
        // Real history: only today has activity.
        h.tasks.completion_dates.lock().unwrap().push(today());

        h.service
            .on_activity_recorded(ACCOUNT_ID, today())
            .await
            .unwrap();

        let streak = account_streak(&h);
        assert_eq!(streak.current_maintained_streak, 1);
        assert_eq!(streak.best_maintained_streak, 9);
        assert_eq!(h.accounts.get(ACCOUNT_ID).last_activity_on, Some(today()));
    }

    #[tokio::test]
    async fn test_on_activity_first_ever_replays() {
        let h = harness(0, None);
        h.tasks.completion_dates.lock().unwrap().push(today());

        h.service
            .on_activity_recorded(ACCOUNT_ID, today())
            .await
            .unwrap();

        assert_eq!(account_streak(&h).current_maintained_streak, 1);
        assert_eq!(h.accounts.get(ACCOUNT_ID).last_activity_on, Some(today()));
    }

    // --- Shields ---

    #[tokio::test]
    async fn test_award_journal_shield_respects_cap() {
        let h = harness(2, None);
        let awarded = h
            .service
            .award_journal_shield(ACCOUNT_ID, today())
            .await
            .unwrap();
        assert!(!awarded);
        assert_eq!(h.accounts.get(ACCOUNT_ID).shield_count, 2);
    }

    #[tokio::test]
    async fn test_award_journal_shield_respects_weekly_quota() {
        let h = harness(0, None);
        // A protected entry earlier in the same week tracks the quota.
        h.journal.seed(ACCOUNT_ID, d(2026, 8, 4), true);

        let awarded = h
            .service
            .award_journal_shield(ACCOUNT_ID, today())
            .await
            .unwrap();
        assert!(!awarded);
    }

    #[tokio::test]
    async fn test_award_journal_shield_ignores_last_week() {
        let h = harness(0, None);
        // Protected entry in the previous Monday-Sunday window.
        h.journal.seed(ACCOUNT_ID, d(2026, 8, 2), true);

        let awarded = h
            .service
            .award_journal_shield(ACCOUNT_ID, today())
            .await
            .unwrap();
        assert!(awarded);
        assert_eq!(h.accounts.get(ACCOUNT_ID).shield_count, 1);
    }

    // --- Queries ---

    #[tokio::test]
    async fn test_get_streak_returns_zero_default() {
        let h = harness(0, None);
        let info = h
            .service
            .get_streak(ACCOUNT_ID, StreakLevel::Goal, Some("goal-1"), None)
            .unwrap();
        assert_eq!(info.current_maintained_streak, 0);
        assert_eq!(info.best_perfect_streak, 0);
        assert_eq!(info.goal_id.as_deref(), Some("goal-1"));
    }

    #[tokio::test]
    async fn test_get_streak_requires_discriminator() {
        let h = harness(0, None);
        assert!(h
            .service
            .get_streak(ACCOUNT_ID, StreakLevel::Task, None, None)
            .is_err());
    }
}
