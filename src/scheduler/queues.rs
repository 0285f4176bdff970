/*!
 * Queue Bank
 * Three FIFO ready queues of process identifiers, one per level
 */

use crate::core::types::Pid;
use crate::process::QueueLevel;
use std::collections::VecDeque;

/// Ready queues for levels 1-3
///
/// Holds identifiers only; the records live in the dispatcher's arena.
/// An identifier is in at most one queue at a time.
#[derive(Debug, Clone, Default)]
pub struct QueueBank {
    queues: [VecDeque<Pid>; 3],
}

impl QueueBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `pid` at the tail of `level`
    pub fn push_back(&mut self, level: QueueLevel, pid: Pid) {
        debug_assert!(!self.contains(pid), "pid {} already queued", pid);
        self.queues[level.index()].push_back(pid);
    }

    /// Take the head of the highest-priority non-empty queue
    pub fn pop_next(&mut self) -> Option<(QueueLevel, Pid)> {
        QueueLevel::ALL
            .into_iter()
            .find_map(|level| self.queues[level.index()].pop_front().map(|pid| (level, pid)))
    }

    /// Head of the highest-priority non-empty queue, without removing it
    pub fn peek_next(&self) -> Option<(QueueLevel, Pid)> {
        QueueLevel::ALL
            .into_iter()
            .find_map(|level| self.queues[level.index()].front().map(|&pid| (level, pid)))
    }

    /// Identifiers queued at `level`, head first
    pub fn iter(&self, level: QueueLevel) -> impl Iterator<Item = Pid> + '_ {
        self.queues[level.index()].iter().copied()
    }

    pub fn len_at(&self, level: QueueLevel) -> usize {
        self.queues[level.index()].len()
    }

    pub fn len(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(VecDeque::is_empty)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.queues.iter().any(|queue| queue.contains(&pid))
    }
}
