//! Named, cancellable deferred tasks and load sequencing, driven by an external clock.
//!
//! The queue never reads the time itself; the owner passes the current
//! millisecond clock on every call, which keeps it usable from an animation
//! frame loop and trivially testable.

#[derive(Clone, Debug)]
struct Scheduled<T> {
	name: &'static str,
	due_ms: f64,
	seq: u64,
	task: T,
}

#[derive(Clone, Debug)]
pub struct TaskQueue<T> {
	tasks: Vec<Scheduled<T>>,
	seq: u64,
}

impl<T> Default for TaskQueue<T> {
	fn default() -> Self {
		Self {
			tasks: Vec::new(),
			seq: 0,
		}
	}
}

impl<T> TaskQueue<T> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Schedules `task` to run `delay_ms` after `now_ms`, replacing any
	/// pending task with the same name.
	pub fn schedule(&mut self, name: &'static str, now_ms: f64, delay_ms: u32, task: T) {
		self.cancel(name);
		self.seq += 1;
		self.tasks.push(Scheduled {
			name,
			due_ms: now_ms + delay_ms as f64,
			seq: self.seq,
			task,
		});
	}

	pub fn cancel(&mut self, name: &str) -> bool {
		let before = self.tasks.len();
		self.tasks.retain(|t| t.name != name);
		before != self.tasks.len()
	}

	pub fn clear(&mut self) {
		if !self.tasks.is_empty() {
			log::debug!("dropping {} pending camera task(s)", self.tasks.len());
		}
		self.tasks.clear();
	}

	pub fn is_pending(&self, name: &str) -> bool {
		self.tasks.iter().any(|t| t.name == name)
	}

	pub fn len(&self) -> usize {
		self.tasks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tasks.is_empty()
	}

	/// Removes and returns every task due at `now_ms`, earliest first; ties
	/// run in scheduling order.
	pub fn drain_due(&mut self, now_ms: f64) -> Vec<(&'static str, T)> {
		let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
			.into_iter()
			.partition(|t| t.due_ms <= now_ms);
		self.tasks = pending;
		due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
		due.into_iter().map(|t| (t.name, t.task)).collect()
	}
}

/// Numbers overlapping loads so a response can tell whether a newer load
/// started after it was requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadGeneration {
	current: u64,
}

impl LoadGeneration {
	/// Starts a load and returns its generation; older ones become stale.
	pub fn begin(&mut self) -> u64 {
		self.current += 1;
		self.current
	}

	pub fn is_current(&self, generation: u64) -> bool {
		generation == self.current
	}
}
