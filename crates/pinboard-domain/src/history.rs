//! Undo/redo history management.
//!
//! The manager only sequences [`Command::apply`] and [`Command::revert`] and
//! bookkeeps the two stacks. It knows nothing about rendering; interested
//! parties subscribe with [`HistoryManager::subscribe`].

use std::collections::VecDeque;

use pinboard_core::{config::DEFAULT_HISTORY_CAPACITY, PinboardResult};

use crate::{commands::Command, repository::Repositories};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStatus {
    pub undo_depth: usize,
    pub redo_depth: usize,
}

impl HistoryStatus {
    pub fn can_undo(&self) -> bool {
        self.undo_depth > 0
    }

    pub fn can_redo(&self) -> bool {
        self.redo_depth > 0
    }
}

pub type HistoryListener = Box<dyn Fn(HistoryStatus) + Send + Sync>;

/// Two bounded command stacks. When the undo stack grows past `capacity`
/// the oldest command is discarded for good.
pub struct HistoryManager {
    /// Most recent = back of deque.
    undo_stack: VecDeque<Box<dyn Command>>,
    /// Most recent = back of deque.
    redo_stack: VecDeque<Box<dyn Command>>,
    capacity: usize,
    listeners: Vec<HistoryListener>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            capacity: capacity.max(1),
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: HistoryListener) {
        self.listeners.push(listener);
    }

    /// Apply `command` and record it. A failed apply records nothing and
    /// leaves the redo stack alone.
    pub async fn execute(
        &mut self,
        command: Box<dyn Command>,
        repos: &Repositories,
    ) -> PinboardResult<()> {
        tracing::debug!(command = %command.description(), "executing command");
        command.apply(repos).await?;
        self.push_undo(command);
        self.redo_stack.clear();
        self.notify();
        Ok(())
    }

    /// Revert the most recent command. Returns `false` when there was nothing
    /// to undo. If the revert fails the command stays on the undo stack.
    pub async fn undo(&mut self, repos: &Repositories) -> PinboardResult<bool> {
        let Some(command) = self.undo_stack.pop_back() else {
            return Ok(false);
        };
        tracing::debug!(command = %command.description(), "undo");
        if let Err(err) = command.revert(repos).await {
            self.undo_stack.push_back(command);
            return Err(err);
        }
        self.redo_stack.push_back(command);
        self.notify();
        Ok(true)
    }

    /// Re-apply the most recently undone command.
    pub async fn redo(&mut self, repos: &Repositories) -> PinboardResult<bool> {
        let Some(command) = self.redo_stack.pop_back() else {
            return Ok(false);
        };
        tracing::debug!(command = %command.description(), "redo");
        if let Err(err) = command.apply(repos).await {
            self.redo_stack.push_back(command);
            return Err(err);
        }
        self.push_undo(command);
        self.notify();
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn next_undo(&self) -> Option<String> {
        self.undo_stack.back().map(|c| c.description())
    }

    pub fn next_redo(&self) -> Option<String> {
        self.redo_stack.back().map(|c| c.description())
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            undo_depth: self.undo_stack.len(),
            redo_depth: self.redo_stack.len(),
        }
    }

    /// Forget everything (board switch, import).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.notify();
    }

    fn push_undo(&mut self, command: Box<dyn Command>) {
        self.undo_stack.push_back(command);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
    }

    fn notify(&self) {
        let status = self.status();
        for listener in &self.listeners {
            listener(status);
        }
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("capacity", &self.capacity)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pinboard_core::PinboardError;
    use pinboard_persistence::MemoryStore;
    use std::sync::{
        atomic::{AtomicI64, AtomicUsize, Ordering},
        Arc,
    };

    /// Adds `amount` to a shared counter; revert subtracts it.
    struct AddCommand {
        counter: Arc<AtomicI64>,
        amount: i64,
    }

    #[async_trait]
    impl Command for AddCommand {
        async fn apply(&self, _repos: &Repositories) -> PinboardResult<()> {
            self.counter.fetch_add(self.amount, Ordering::SeqCst);
            Ok(())
        }

        async fn revert(&self, _repos: &Repositories) -> PinboardResult<()> {
            self.counter.fetch_sub(self.amount, Ordering::SeqCst);
            Ok(())
        }

        fn description(&self) -> String {
            format!("Add {}", self.amount)
        }
    }

    struct FailingCommand;

    #[async_trait]
    impl Command for FailingCommand {
        async fn apply(&self, _repos: &Repositories) -> PinboardResult<()> {
            Err(PinboardError::StorageFull("quota".into()))
        }

        async fn revert(&self, _repos: &Repositories) -> PinboardResult<()> {
            Ok(())
        }

        fn description(&self) -> String {
            "Fail".to_string()
        }
    }

    fn repos() -> Repositories {
        Repositories::new(Arc::new(MemoryStore::new()))
    }

    fn add(counter: &Arc<AtomicI64>, amount: i64) -> Box<dyn Command> {
        Box::new(AddCommand {
            counter: Arc::clone(counter),
            amount,
        })
    }

    #[tokio::test]
    async fn test_execute_undo_redo() {
        let repos = repos();
        let counter = Arc::new(AtomicI64::new(0));
        let mut history = HistoryManager::new();

        history.execute(add(&counter, 5), &repos).await.unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 5);
        assert!(history.can_undo());
        assert!(!history.can_redo());

        assert!(history.undo(&repos).await.unwrap());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(history.can_redo());

        assert!(history.redo(&repos).await.unwrap());
        assert_eq!(counter.load(Ordering::SeqCst), 5);
        assert_eq!(history.next_undo().as_deref(), Some("Add 5"));
    }

    #[tokio::test]
    async fn test_undo_on_empty_is_noop() {
        let repos = repos();
        let mut history = HistoryManager::new();
        assert!(!history.undo(&repos).await.unwrap());
        assert!(!history.redo(&repos).await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_execute_is_not_recorded() {
        let repos = repos();
        let counter = Arc::new(AtomicI64::new(0));
        let mut history = HistoryManager::new();

        history.execute(add(&counter, 1), &repos).await.unwrap();
        history.undo(&repos).await.unwrap();

        let result = history.execute(Box::new(FailingCommand), &repos).await;
        assert!(matches!(result, Err(PinboardError::StorageFull(_))));
        assert_eq!(history.undo_depth(), 0);
        // The redo stack survives a failed execute.
        assert_eq!(history.redo_depth(), 1);
    }

    #[tokio::test]
    async fn test_new_command_clears_redo() {
        let repos = repos();
        let counter = Arc::new(AtomicI64::new(0));
        let mut history = HistoryManager::new();

        history.execute(add(&counter, 1), &repos).await.unwrap();
        history.execute(add(&counter, 2), &repos).await.unwrap();
        history.undo(&repos).await.unwrap();
        assert!(history.can_redo());

        history.execute(add(&counter, 3), &repos).await.unwrap();
        assert!(!history.can_redo());
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_capacity_discards_oldest() {
        let repos = repos();
        let counter = Arc::new(AtomicI64::new(0));
        let mut history = HistoryManager::with_capacity(3);

        for amount in 1..=5 {
            history.execute(add(&counter, amount), &repos).await.unwrap();
            assert!(history.undo_depth() <= 3);
        }

        while history.undo(&repos).await.unwrap() {}
        // Only 3, 4 and 5 were reachable.
        assert_eq!(counter.load(Ordering::SeqCst), 1 + 2);
    }

    #[tokio::test]
    async fn test_listeners_are_notified() {
        let repos = repos();
        let counter = Arc::new(AtomicI64::new(0));
        let calls = Arc::new(AtomicUsize::new(0));
        let mut history = HistoryManager::new();

        let seen = Arc::clone(&calls);
        history.subscribe(Box::new(move |_status| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        history.execute(add(&counter, 1), &repos).await.unwrap();
        history.undo(&repos).await.unwrap();
        history.redo(&repos).await.unwrap();
        history.undo(&repos).await.unwrap();
        history.undo(&repos).await.unwrap(); // empty: no notification
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
