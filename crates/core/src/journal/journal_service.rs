use chrono::NaiveDate;
use log::info;
use std::sync::Arc;

use super::journal_model::{JournalEntry, NewJournalEntry};
use super::journal_traits::{JournalRepositoryTrait, JournalServiceTrait};
use crate::accounts::AccountRepositoryTrait;
use crate::db::DbTransactionExecutor;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink, ShieldSource};
use crate::streaks::try_award_journal_shield_in_tx;
use async_trait::async_trait;

/// Service for managing journal entries.
///
/// Journaling is the one activity that earns shields directly: creating an
/// entry attempts a shield award in the same transaction, and the attempt is
/// silently absorbed when the weekly quota or the inventory cap blocks it.
pub struct JournalService<E: DbTransactionExecutor + Send + Sync + Clone> {
    journal_repository: Arc<dyn JournalRepositoryTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    transaction_executor: E,
}

impl<E: DbTransactionExecutor + Send + Sync + Clone> JournalService<E> {
    pub fn new(
        journal_repository: Arc<dyn JournalRepositoryTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
        transaction_executor: E,
    ) -> Self {
        Self {
            journal_repository,
            account_repository,
            event_sink,
            transaction_executor,
        }
    }
}

#[async_trait]
impl<E: DbTransactionExecutor + Send + Sync + Clone> JournalServiceTrait for JournalService<E> {
    fn get_entry(&self, account_id: &str, entry_id: &str) -> Result<JournalEntry> {
        self.journal_repository.get_entry(account_id, entry_id)
    }

    fn list_entries(
        &self,
        account_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<JournalEntry>> {
        self.journal_repository.list_entries(account_id, from, to)
    }

    async fn create_entry(&self, new_entry: NewJournalEntry) -> Result<JournalEntry> {
        new_entry.validate()?;
        let account_id = new_entry.account_id.clone();
        let entry_date = new_entry.entry_date;

        let (entry, shield_balance) = self.transaction_executor.execute(|conn| {
            let entry = self.journal_repository.insert_entry_in_tx(conn, new_entry)?;
            let shield_balance = try_award_journal_shield_in_tx(
                self.account_repository.as_ref(),
                self.journal_repository.as_ref(),
                conn,
                &account_id,
                entry_date,
            )?;
            Ok::<_, Error>((entry, shield_balance))
        })?;

        if let Some(balance) = shield_balance {
            info!(
                "Awarded a journal shield to account {} (balance: {})",
                account_id, balance
            );
            self.event_sink.emit(DomainEvent::shield_awarded(
                account_id.as_str(),
                ShieldSource::Journal,
                balance,
            ));
        }

        Ok(entry)
    }

    async fn delete_entry(&self, account_id: &str, entry_id: &str) -> Result<()> {
        // Deleting a shield-protected entry does not refund the shield.
        let deleted = self.transaction_executor.execute(|conn| {
            self.journal_repository
                .delete_entry_in_tx(conn, account_id, entry_id)
        })?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Journal entry {entry_id}")));
        }
        Ok(())
    }
}
