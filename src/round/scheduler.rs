//! Cooperative task queue that drives all timed behavior.
//!
//! One-shot tasks cover the enemy-turn delay and the pause between rounds;
//! recurring tasks cover mana regen and status ticks. The controller pumps
//! the queue with [`Scheduler::poll`], so exactly one task resolves at a
//! time and a task can cancel or re-arm others before the next one fires.

/// The timed jobs the controller schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    EnemyTurn,
    RoundTransition,
    ManaRegen,
    StatusTick,
}

#[derive(Debug, Clone)]
struct Task {
    kind: TaskKind,
    due: f64,
    period: Option<f64>,
    seq: u64,
}

/// Single-threaded timer queue. Time only moves when the owner advances it.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: f64,
    next_seq: u64,
    tasks: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedules a one-shot task, replacing any pending task of the same kind.
    pub fn schedule_once(&mut self, kind: TaskKind, delay: f64) {
        self.cancel(kind);
        self.push(kind, self.now + delay, None);
    }

    /// Schedules a recurring task, replacing any pending task of the same
    /// kind. First fire is one full period from now.
    pub fn schedule_every(&mut self, kind: TaskKind, period: f64) {
        self.cancel(kind);
        self.push(kind, self.now + period, Some(period));
    }

    pub fn cancel(&mut self, kind: TaskKind) {
        self.tasks.retain(|t| t.kind != kind);
    }

    /// Drops every recurring task. One-shots stay queued.
    pub fn cancel_recurring(&mut self) {
        self.tasks.retain(|t| t.period.is_none());
    }

    /// Drops everything, one-shots included.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Releases the next task due at or before `deadline`, advancing the
    /// clock to its due time. Ties resolve in scheduling order. When
    /// nothing further is due, the clock moves to the deadline and `None`
    /// is returned.
    pub fn poll(&mut self, deadline: f64) -> Option<TaskKind> {
        let idx = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= deadline)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i);

        match idx {
            Some(i) => {
                let due = self.tasks[i].due;
                self.now = self.now.max(due);
                let kind = self.tasks[i].kind;
                match self.tasks[i].period {
                    Some(period) => {
                        let seq = self.next_seq;
                        self.next_seq += 1;
                        self.tasks[i].due = due + period;
                        self.tasks[i].seq = seq;
                    }
                    None => {
                        self.tasks.remove(i);
                    }
                }
                Some(kind)
            }
            None => {
                self.now = self.now.max(deadline);
                None
            }
        }
    }

    fn push(&mut self, kind: TaskKind, due: f64, period: Option<f64>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(Task {
            kind,
            due,
            period,
            seq,
        });
    }
}
