//! The goal ledger: owns every goal and its deposits, keeps them consistent and
//! writes them through to a flat key-value store after each change.

use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error, ErrorKind,
    dashboard::{DashboardStats, GoalCard, aggregate_stats, recent_goals},
    goal::{Goal, GoalId, NewGoal},
    snapshot::{ExportDocument, decode_goals, encode_goals},
    stores::KeyValueStore,
    transaction::{
        Amount, GoalFilter, MANUAL_ADDITION_NOTE, Transaction, TransactionEntry,
        list_transactions,
    },
};

type Clock = Box<dyn Fn() -> OffsetDateTime>;

/// Owns the goal collection and the store it is persisted to.
///
/// Every mutating method either succeeds and persists the new state, or fails
/// and leaves both the in-memory goals and the store as they were.
pub struct Ledger<S: KeyValueStore> {
    store: S,
    storage_key: String,
    goals: Vec<Goal>,
    /// The lowest goal ID that has never been handed out.
    next_goal_id: GoalId,
    clock: Clock,
    local_offset: UtcOffset,
}

impl<S: KeyValueStore> Ledger<S> {
    /// Load the ledger saved under `storage_key`, or start an empty one if
    /// nothing has been saved yet.
    ///
    /// `local_offset` is the timezone transaction dates are shown in.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidFormat] if the saved data cannot be read as goals,
    /// - or a storage error if the store cannot be read.
    pub fn load(store: S, storage_key: &str, local_offset: UtcOffset) -> Result<Self, Error> {
        let goals = match store.get(storage_key)? {
            Some(blob) => decode_goals(&blob, local_offset)?,
            None => {
                tracing::info!("No saved goals found under {storage_key:?}, starting empty");
                Vec::new()
            }
        };

        tracing::debug!("Loaded {} goals from {storage_key:?}", goals.len());

        Ok(Self::new(store, storage_key, goals, local_offset))
    }

    /// Load the ledger saved under `storage_key` like [Ledger::load], but
    /// start an empty one if the saved data cannot be read as goals.
    ///
    /// The unreadable data stays in the store until the ledger is next saved.
    ///
    /// # Errors
    /// Returns a storage error if the store cannot be read.
    pub fn load_or_discard(
        store: S,
        storage_key: &str,
        local_offset: UtcOffset,
    ) -> Result<Self, Error> {
        let goals = match store.get(storage_key)? {
            Some(blob) => match decode_goals(&blob, local_offset) {
                Ok(goals) => goals,
                Err(error) if error.kind() == ErrorKind::Format => {
                    tracing::warn!("Discarding unreadable goals under {storage_key:?}: {error}");
                    Vec::new()
                }
                Err(error) => return Err(error),
            },
            None => Vec::new(),
        };

        Ok(Self::new(store, storage_key, goals, local_offset))
    }

    fn new(store: S, storage_key: &str, goals: Vec<Goal>, local_offset: UtcOffset) -> Self {
        Self {
            store,
            storage_key: storage_key.to_owned(),
            next_goal_id: next_id_after(&goals),
            goals,
            clock: Box::new(OffsetDateTime::now_utc),
            local_offset,
        }
    }

    /// Replace the clock used to timestamp goals and transactions.
    pub fn with_clock(mut self, clock: impl Fn() -> OffsetDateTime + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// The timezone transaction dates are shown in.
    pub fn local_offset(&self) -> UtcOffset {
        self.local_offset
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Create a goal from `new_goal` and give it the next goal ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyGoalName] if the name is empty,
    /// - [Error::InvalidTargetAmount] if the target is not greater than zero,
    /// - or a storage error if the ledger could not be saved.
    pub fn create_goal(&mut self, new_goal: NewGoal) -> Result<Goal, Error> {
        let goal = new_goal.finalize(self.next_goal_id, (self.clock)())?;

        self.goals.push(goal.clone());

        if let Err(error) = self.persist() {
            self.goals.pop();
            return Err(error);
        }

        self.next_goal_id = goal.id + 1;
        tracing::info!("Created goal {} {:?}", goal.id, goal.name.as_ref());

        Ok(goal)
    }

    /// Delete the goal with `id` together with its transactions.
    ///
    /// Returns the deleted goal.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::GoalNotFound] if there is no goal with `id`,
    /// - or a storage error if the ledger could not be saved.
    pub fn delete_goal(&mut self, id: GoalId) -> Result<Goal, Error> {
        let index = self.index_of(id)?;
        let goal = self.goals.remove(index);

        if let Err(error) = self.persist() {
            self.goals.insert(index, goal);
            return Err(error);
        }

        tracing::info!(
            "Deleted goal {id} and its {} transactions",
            goal.transactions.len()
        );

        Ok(goal)
    }

    /// Deposit `amount` into the goal with `id`.
    ///
    /// A missing or blank `note` is replaced by
    /// [DEFAULT_NOTE](crate::transaction::DEFAULT_NOTE).
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::GoalNotFound] if there is no goal with `id`,
    /// - [Error::InvalidAmount] if `amount` is not greater than zero,
    /// - [Error::AmountTooLarge] if the saved amount would overflow,
    /// - or a storage error if the ledger could not be saved.
    pub fn add_transaction(
        &mut self,
        id: GoalId,
        amount: Amount,
        note: Option<&str>,
    ) -> Result<Transaction, Error> {
        let index = self.index_of(id)?;
        let now = (self.clock)();

        let goal = &self.goals[index];
        let transaction = Transaction::new(
            goal.next_transaction_id(),
            amount,
            note,
            now,
            self.local_offset,
        )?;
        let previous_amount = goal.current_amount;
        let previous_updated_at = goal.updated_at;
        let current_amount = previous_amount
            .checked_add(transaction.amount)
            .ok_or(Error::AmountTooLarge {
                current: previous_amount,
                amount: transaction.amount,
            })?;

        let goal = &mut self.goals[index];
        goal.transactions.insert(0, transaction.clone());
        goal.current_amount = current_amount;
        goal.updated_at = now;

        if let Err(error) = self.persist() {
            let goal = &mut self.goals[index];
            goal.transactions.remove(0);
            goal.current_amount = previous_amount;
            goal.updated_at = previous_updated_at;
            return Err(error);
        }

        tracing::info!(
            "Added transaction {} of {} to goal {id}",
            transaction.id,
            transaction.amount
        );

        Ok(transaction)
    }

    /// Deposit `amount` into the goal with `id` with the note "Manual addition".
    ///
    /// # Errors
    /// Fails the same way as [Ledger::add_transaction].
    pub fn quick_add(&mut self, id: GoalId, amount: Amount) -> Result<Transaction, Error> {
        self.add_transaction(id, amount, Some(MANUAL_ADDITION_NOTE))
    }

    /// Replace every goal with `goals`, e.g. from an imported backup.
    ///
    /// # Errors
    /// Returns a storage error if the ledger could not be saved, in which case
    /// the previous goals are kept.
    pub fn import(&mut self, goals: Vec<Goal>) -> Result<(), Error> {
        let previous = std::mem::replace(&mut self.goals, goals);

        if let Err(error) = self.persist() {
            self.goals = previous;
            return Err(error);
        }

        self.next_goal_id = self.next_goal_id.max(next_id_after(&self.goals));
        tracing::info!("Imported {} goals", self.goals.len());

        Ok(())
    }

    /// Delete every goal and remove the saved data from the store.
    ///
    /// # Errors
    /// Returns a storage error if the saved data could not be removed, in
    /// which case nothing is deleted.
    pub fn clear_all(&mut self) -> Result<(), Error> {
        self.store.remove(&self.storage_key)?;
        self.goals.clear();

        tracing::info!("Cleared all goals");

        Ok(())
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// All goals in the order they were created.
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// The goal with `id`.
    ///
    /// # Errors
    /// Returns an [Error::GoalNotFound] if there is no goal with `id`.
    pub fn goal(&self, id: GoalId) -> Result<&Goal, Error> {
        self.goals
            .iter()
            .find(|goal| goal.id == id)
            .ok_or(Error::GoalNotFound(id))
    }

    /// Every transaction matching `filter`, newest first.
    pub fn list_transactions(&self, filter: GoalFilter) -> Vec<TransactionEntry<'_>> {
        list_transactions(&self.goals, filter)
    }

    /// The totals shown on the dashboard.
    pub fn stats(&self) -> DashboardStats {
        aggregate_stats(&self.goals)
    }

    /// The goals shown on the dashboard.
    pub fn recent_goals(&self) -> Vec<GoalCard> {
        recent_goals(&self.goals)
    }

    /// A backup of every goal stamped with the current time.
    pub fn export_document(&self) -> ExportDocument<'_> {
        ExportDocument::new(&self.goals, (self.clock)())
    }

    fn index_of(&self, id: GoalId) -> Result<usize, Error> {
        self.goals
            .iter()
            .position(|goal| goal.id == id)
            .ok_or(Error::GoalNotFound(id))
    }

    fn persist(&mut self) -> Result<(), Error> {
        let blob = encode_goals(&self.goals)?;

        self.store.set(&self.storage_key, &blob).inspect_err(|error| {
            tracing::error!("Could not save goals: {error}");
        })
    }
}

fn next_id_after(goals: &[Goal]) -> GoalId {
    goals.iter().map(|goal| goal.id).max().map_or(1, |id| id + 1)
}

#[cfg(test)]
pub(crate) mod test_utils {
    use time::{OffsetDateTime, UtcOffset, macros::datetime};

    use crate::{
        ledger::Ledger,
        stores::{DEFAULT_STORAGE_KEY, MemoryStore},
    };

    pub const NOW: OffsetDateTime = datetime!(2025-06-01 9:00 UTC);

    pub fn get_test_ledger() -> Ledger<MemoryStore> {
        Ledger::load(MemoryStore::new(), DEFAULT_STORAGE_KEY, UtcOffset::UTC)
            .unwrap()
            .with_clock(|| NOW)
    }

    pub fn get_test_ledger_with_quota(quota: usize) -> Ledger<MemoryStore> {
        Ledger::load(
            MemoryStore::with_quota(quota),
            DEFAULT_STORAGE_KEY,
            UtcOffset::UTC,
        )
        .unwrap()
        .with_clock(|| NOW)
    }
}


#[cfg(test)]
mod add_transaction_tests {
    use crate::{
        Error,
        goal::Goal,
        ledger::test_utils::{NOW, get_test_ledger},
        transaction::{DEFAULT_NOTE, MANUAL_ADDITION_NOTE},
    };

    #[test]
    fn laptop_scenario() {
        let mut ledger = get_test_ledger();
        let goal = ledger.create_goal(Goal::build("Laptop", 1000)).unwrap();
        assert_eq!((goal.id, goal.current_amount), (1, 0));

        ledger.add_transaction(goal.id, 300, None).unwrap();
        let goal = ledger.goal(1).unwrap();
        assert_eq!(goal.current_amount, 300);
        assert_eq!(goal.progress(), 30);

        ledger.add_transaction(1, 800, None).unwrap();
        let goal = ledger.goal(1).unwrap();
        assert_eq!(goal.current_amount, 1100);
        assert_eq!(goal.progress(), 100);
        assert_eq!(goal.remaining(), 0);
        assert_eq!(goal.over_funded(), 100);
    }

    #[test]
    fn prepends_transaction_and_updates_goal() {
        let mut ledger = get_test_ledger();
        let goal = ledger.create_goal(Goal::build("Laptop", 1000)).unwrap();

        let first = ledger.add_transaction(goal.id, 100, Some("Pocket money")).unwrap();
        let second = ledger.add_transaction(goal.id, 200, None).unwrap();

        let goal = ledger.goal(goal.id).unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(goal.transactions, [second.clone(), first]);
        assert_eq!(second.note, DEFAULT_NOTE);
        assert_eq!(goal.updated_at, NOW);
    }

    #[test]
    fn current_amount_matches_transactions() {
        let mut ledger = get_test_ledger();
        let goal = ledger.create_goal(Goal::build("Laptop", 1000)).unwrap();

        for amount in [5, 120, 999, 1] {
            ledger.add_transaction(goal.id, amount, None).unwrap();
        }

        let goal = ledger.goal(goal.id).unwrap();
        assert_eq!(goal.current_amount, 1125);
        assert_eq!(Some(goal.current_amount), goal.transaction_total());
    }

    #[test]
    fn progress_never_decreases() {
        let mut ledger = get_test_ledger();
        let goal = ledger.create_goal(Goal::build("Laptop", 1000)).unwrap();
        let mut last_progress = 0;

        for amount in [100, 250, 1, 400, 700, 20] {
            ledger.add_transaction(goal.id, amount, None).unwrap();
            let progress = ledger.goal(goal.id).unwrap().progress();

            assert!(progress >= last_progress);
            assert!(progress <= 100);
            last_progress = progress;
        }
    }

    #[test]
    fn fails_on_non_positive_amount_without_changes() {
        let mut ledger = get_test_ledger();
        let goal = ledger.create_goal(Goal::build("Laptop", 1000)).unwrap();
        ledger.add_transaction(goal.id, 100, None).unwrap();

        for amount in [0, -50] {
            let result = ledger.add_transaction(goal.id, amount, None);

            assert_eq!(result, Err(Error::InvalidAmount(amount)));
        }

        let goal = ledger.goal(goal.id).unwrap();
        assert_eq!(goal.current_amount, 100);
        assert_eq!(goal.transactions.len(), 1);
    }

    #[test]
    fn fails_on_missing_goal() {
        let mut ledger = get_test_ledger();

        assert_eq!(
            ledger.add_transaction(7, 100, None),
            Err(Error::GoalNotFound(7))
        );
    }

    #[test]
    fn fails_when_saved_amount_would_overflow_without_changes() {
        let mut ledger = get_test_ledger();
        let goal = ledger.create_goal(Goal::build("Laptop", 1000)).unwrap();
        ledger.add_transaction(goal.id, i64::MAX, None).unwrap();

        let result = ledger.add_transaction(goal.id, 1, None);

        assert_eq!(
            result,
            Err(Error::AmountTooLarge {
                current: i64::MAX,
                amount: 1
            })
        );
        let goal = ledger.goal(goal.id).unwrap();
        assert_eq!(goal.current_amount, i64::MAX);
        assert_eq!(goal.transactions.len(), 1);
    }

    #[test]
    fn quick_add_uses_manual_note() {
        let mut ledger = get_test_ledger();
        let goal = ledger.create_goal(Goal::build("Laptop", 1000)).unwrap();

        let transaction = ledger.quick_add(goal.id, 50).unwrap();

        assert_eq!(transaction.note, MANUAL_ADDITION_NOTE);
    }
}

#[cfg(test)]
mod delete_goal_tests {
    use crate::{Error, goal::Goal, ledger::test_utils::get_test_ledger, transaction::GoalFilter};

    #[test]
    fn fails_on_unknown_id() {
        let mut ledger = get_test_ledger();
        ledger.create_goal(Goal::build("Laptop", 1000)).unwrap();

        assert_eq!(ledger.delete_goal(42), Err(Error::GoalNotFound(42)));
        assert_eq!(ledger.goals().len(), 1);
    }

    #[test]
    fn removes_goal_and_transactions() {
        let mut ledger = get_test_ledger();
        let laptop = ledger.create_goal(Goal::build("Laptop", 1000)).unwrap();
        let trip = ledger.create_goal(Goal::build("Trip", 500)).unwrap();
        ledger.add_transaction(laptop.id, 300, None).unwrap();
        ledger.add_transaction(laptop.id, 200, None).unwrap();
        ledger.add_transaction(trip.id, 100, None).unwrap();

        let deleted = ledger.delete_goal(laptop.id).unwrap();

        assert_eq!(deleted.transactions.len(), 2);
        assert_eq!(ledger.goals().len(), 1);
        assert_eq!(ledger.goals()[0].id, trip.id);
        assert_eq!(ledger.list_transactions(GoalFilter::All).len(), 1);

        let stats = ledger.stats();
        assert_eq!(stats.total_goals, 1);
        assert_eq!(stats.total_saved, 100);
        assert_eq!(stats.total_target, 500);
    }
}
