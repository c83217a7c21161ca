use tracing::debug;

use super::storage::ListSnapshot;

/// Receives a signal after every applied mutation so views can refresh.
pub trait Notifier {
    fn state_changed(&self, list_id: &str, snapshot: &ListSnapshot);
}

/// Default notifier: records the change in the log and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn state_changed(&self, list_id: &str, snapshot: &ListSnapshot) {
        debug!(
            list_id,
            tasks = snapshot.tasks.len(),
            rules = snapshot.recurrence.len(),
            "list state changed"
        );
    }
}
