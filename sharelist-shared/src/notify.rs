/// In-process change notification hub
///
/// Mutations publish a [`ListChange`] for the affected list; live
/// subscriptions (SSE streams, the list aggregator's watchers) subscribe and
/// re-query the list's task set on every delivery, re-delivering the full
/// result set to their consumers — the delivery model of a store-side live
/// query.
///
/// Publishing never blocks and never fails: with no subscribers the event is
/// dropped, and a subscriber that falls behind skips the missed events and
/// re-queries on the next one it sees (each event only means "something
/// changed", so skipping is lossless).

use tokio::sync::broadcast;
use uuid::Uuid;

/// Default broadcast capacity per hub
const DEFAULT_CAPACITY: usize = 256;

/// What happened to a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A task under the list was created, updated, or toggled
    TasksChanged,

    /// The list document itself was deleted
    ListDeleted,
}

/// A change notification for one list
#[derive(Debug, Clone, Copy)]
pub struct ListChange {
    /// The affected list
    pub list_id: Uuid,

    /// What changed
    pub kind: ChangeKind,
}

/// Process-wide broadcast channel of list changes
///
/// Cheap to clone; all clones share the same channel.
#[derive(Debug, Clone)]
pub struct ChangeHub {
    tx: broadcast::Sender<ListChange>,
}

impl ChangeHub {
    /// Creates a hub with the given buffered capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publishes a change; subscribers filter by list id themselves
    pub fn publish(&self, list_id: Uuid, kind: ChangeKind) {
        // Send only fails when there are no subscribers, which is fine.
        let _ = self.tx.send(ListChange { list_id, kind });
    }

    /// Opens a new subscription receiving every change published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<ListChange> {
        self.tx.subscribe()
    }

    /// Number of currently open subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let hub = ChangeHub::default();
        hub.publish(Uuid::new_v4(), ChangeKind::TasksChanged);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscribers_receive_published_changes() {
        let hub = ChangeHub::default();
        let mut rx = hub.subscribe();

        let list_id = Uuid::new_v4();
        hub.publish(list_id, ChangeKind::TasksChanged);

        let change = rx.recv().await.unwrap();
        assert_eq!(change.list_id, list_id);
        assert_eq!(change.kind, ChangeKind::TasksChanged);
    }

    #[tokio::test]
    async fn test_all_clones_share_one_channel() {
        let hub = ChangeHub::default();
        let clone = hub.clone();
        let mut rx = hub.subscribe();

        let list_id = Uuid::new_v4();
        clone.publish(list_id, ChangeKind::ListDeleted);

        let change = rx.recv().await.unwrap();
        assert_eq!(change.kind, ChangeKind::ListDeleted);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_each_get_every_change() {
        let hub = ChangeHub::default();
        let mut rx1 = hub.subscribe();
        let mut rx2 = hub.subscribe();

        let list_id = Uuid::new_v4();
        hub.publish(list_id, ChangeKind::TasksChanged);

        assert_eq!(rx1.recv().await.unwrap().list_id, list_id);
        assert_eq!(rx2.recv().await.unwrap().list_id, list_id);
    }
}
