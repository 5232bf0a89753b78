use super::*;

use tokio::sync::OwnedMutexGuard;

#[derive(Debug, PartialEq)]
pub(super) enum DoneOutcome {
    /// No task list, or the number is outside `1..=len`.
    Ignored,
    Remaining(TaskListState),
    /// The list is gone; the message id (if any) still needs retiring.
    Emptied(Option<MessageId>),
}

/// Per-channel journals and task lists, held in memory only.
///
/// Every handler takes the channel's guard from [`ChannelStore::lock_channel`]
/// before touching either map and keeps it until the new message id is
/// written back, so commands on one channel never interleave.
pub(super) struct ChannelStore {
    journals: Mutex<HashMap<ChannelId, JournalState>>,
    tasks: Mutex<HashMap<ChannelId, TaskListState>>,
    channel_locks: Mutex<HashMap<ChannelId, Arc<Mutex<()>>>>,
}

impl ChannelStore {
    pub(super) fn new() -> Self {
        ChannelStore {
            journals: Mutex::new(HashMap::new()),
            tasks: Mutex::new(HashMap::new()),
            channel_locks: Mutex::new(HashMap::new()),
        }
    }

    pub(super) async fn lock_channel(&self, channel_id: ChannelId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.channel_locks.lock().await;
            // Unheld and unawaited locks are only referenced by the map.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(channel_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    pub(super) async fn channel_lock_count(&self) -> usize {
        self.channel_locks.lock().await.len()
    }

    /// Appends an entry, resetting the journal first when `date` differs from
    /// the stored day. Returns the journal as it should now be rendered.
    pub(super) async fn append_journal(
        &self,
        channel_id: ChannelId,
        date: &str,
        entry: String,
    ) -> JournalState {
        let mut journals = self.journals.lock().await;
        let journal = journals.entry(channel_id).or_insert_with(|| JournalState {
            date: date.to_string(),
            entries: Vec::new(),
            last_message_id: None,
        });
        if journal.date != date {
            debug!(
                "journal rollover in channel {}: {} -> {}",
                channel_id, journal.date, date
            );
            journal.date = date.to_string();
            journal.entries.clear();
            journal.last_message_id = None;
        }
        journal.entries.push(entry);
        journal.clone()
    }

    pub(super) async fn set_journal_message(&self, channel_id: ChannelId, message_id: MessageId) {
        if let Some(journal) = self.journals.lock().await.get_mut(&channel_id) {
            journal.last_message_id = Some(message_id);
        }
    }

    #[cfg(test)]
    pub(super) async fn journal(&self, channel_id: ChannelId) -> Option<JournalState> {
        self.journals.lock().await.get(&channel_id).cloned()
    }

    /// Appends `items` in order, creating the list if needed. An empty slice
    /// still creates the list so it can be redisplayed.
    pub(super) async fn append_tasks(&self, channel_id: ChannelId, items: Vec<String>) -> TaskListState {
        let mut tasks = self.tasks.lock().await;
        let list = tasks.entry(channel_id).or_default();
        list.tasks.extend(items);
        list.clone()
    }

    pub(super) async fn complete_task(&self, channel_id: ChannelId, number: i64) -> DoneOutcome {
        let mut tasks = self.tasks.lock().await;
        let Some(list) = tasks.get_mut(&channel_id) else {
            return DoneOutcome::Ignored;
        };
        let index = match usize::try_from(number) {
            Ok(n) if n >= 1 && n <= list.tasks.len() => n - 1,
            _ => return DoneOutcome::Ignored,
        };
        list.tasks.remove(index);
        if list.tasks.is_empty() {
            let last_message_id = list.last_message_id;
            tasks.remove(&channel_id);
            DoneOutcome::Emptied(last_message_id)
        } else {
            DoneOutcome::Remaining(list.clone())
        }
    }

    pub(super) async fn set_task_message(&self, channel_id: ChannelId, message_id: MessageId) {
        if let Some(list) = self.tasks.lock().await.get_mut(&channel_id) {
            list.last_message_id = Some(message_id);
        }
    }

    #[cfg(test)]
    pub(super) async fn task_list(&self, channel_id: ChannelId) -> Option<TaskListState> {
        self.tasks.lock().await.get(&channel_id).cloned()
    }
}
