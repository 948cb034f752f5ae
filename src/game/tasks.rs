//! Cancellable one-shot task queue, processed once per tick.
//!
//! Deferred effects (target respawns, laser/effect expiry, recoil return)
//! go through this queue instead of ad-hoc timer callbacks, so they fire
//! only at tick boundaries and can be cancelled on a world reset.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;

use crate::scene::SceneId;

/// Cancellation token for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    RespawnTarget,
    HideLaser(SceneId),
    RemoveEffect(SceneId),
    EndRecoil,
}

struct Scheduled {
    fire_tick: u64,
    id: TaskId,
    task: Task,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.fire_tick == other.fire_tick && self.id == other.id
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for a min-heap; ties fire in schedule order.
        other
            .fire_tick
            .cmp(&self.fire_tick)
            .then(other.id.0.cmp(&self.id.0))
    }
}

#[derive(Default)]
pub struct TaskQueue {
    heap: BinaryHeap<Scheduled>,
    cancelled: FxHashSet<TaskId>,
    next_id: u64,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to fire at `fire_tick`.
    pub fn schedule(&mut self, fire_tick: u64, task: Task) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.heap.push(Scheduled {
            fire_tick,
            id,
            task,
        });
        id
    }

    pub fn cancel(&mut self, id: TaskId) {
        self.cancelled.insert(id);
    }

    /// Pop every task due at or before `now`, in fire order. Cancelled
    /// entries are dropped here.
    pub fn drain_due(&mut self, now: u64) -> Vec<Task> {
        let mut due = Vec::new();
        while self
            .heap
            .peek()
            .is_some_and(|entry| entry.fire_tick <= now)
        {
            let Some(entry) = self.heap.pop() else { break };
            if self.cancelled.remove(&entry.id) {
                continue;
            }
            due.push(entry.task);
        }
        due
    }

    /// Drop all pending tasks and cancellations.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.cancelled.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_fire_in_order() {
        let mut queue = TaskQueue::new();
        queue.schedule(30, Task::EndRecoil);
        queue.schedule(10, Task::RespawnTarget);
        queue.schedule(20, Task::RespawnTarget);

        assert!(queue.drain_due(5).is_empty());
        assert_eq!(
            queue.drain_due(30),
            vec![Task::RespawnTarget, Task::RespawnTarget, Task::EndRecoil]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut queue = TaskQueue::new();
        queue.schedule(10, Task::EndRecoil);
        queue.schedule(10, Task::RespawnTarget);
        assert_eq!(queue.drain_due(10), vec![Task::EndRecoil, Task::RespawnTarget]);
    }

    #[test]
    fn test_cancelled_tasks_never_fire() {
        let mut queue = TaskQueue::new();
        let keep = queue.schedule(10, Task::RespawnTarget);
        let drop = queue.schedule(10, Task::EndRecoil);
        queue.cancel(drop);

        assert_eq!(queue.drain_due(100), vec![Task::RespawnTarget]);
        let _ = keep;
        assert!(queue.is_empty());
    }

    #[test]
    fn test_not_yet_due_tasks_stay_queued() {
        let mut queue = TaskQueue::new();
        queue.schedule(600, Task::RespawnTarget);
        assert!(queue.drain_due(599).is_empty());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.drain_due(600), vec![Task::RespawnTarget]);
    }
}
