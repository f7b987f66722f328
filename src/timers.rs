use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeferredAction {
    FinishSubmission { form: NodeId },
    HideNotification { banner: NodeId },
}

#[derive(Debug, Clone)]
pub(crate) struct ScheduledTask {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    pub(crate) action: DeferredAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
}

#[derive(Debug, Default)]
pub(crate) struct TaskQueue {
    tasks: Vec<ScheduledTask>,
    next_id: i64,
    next_order: i64,
}

impl TaskQueue {
    pub(crate) fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            next_order: 0,
        }
    }

    pub(crate) fn schedule(&mut self, now_ms: i64, delay_ms: i64, action: DeferredAction) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        let order = self.next_order;
        self.next_order += 1;
        self.tasks.push(ScheduledTask {
            id,
            due_at: now_ms + delay_ms.max(0),
            order,
            action,
        });
        id
    }

    pub(crate) fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.map(|limit| task.due_at <= limit).unwrap_or(true))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }

    pub(crate) fn remove(&mut self, idx: usize) -> ScheduledTask {
        self.tasks.remove(idx)
    }

    pub(crate) fn cancel(&mut self, id: i64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    pub(crate) fn clear(&mut self) -> usize {
        let cleared = self.tasks.len();
        self.tasks.clear();
        cleared
    }

    pub(crate) fn snapshot(&self) -> Vec<PendingTimer> {
        let mut pending: Vec<PendingTimer> = self
            .tasks
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
            })
            .collect();
        pending.sort_by_key(|timer| (timer.due_at, timer.order));
        pending
    }
}
