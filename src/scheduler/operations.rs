/*!
 * Dispatcher Operations
 * Dispatch, unit execution, preemption, retirement, and the driving loop
 */

use super::types::{Slice, SliceOutcome, TickOutcome, TimelineEntry};
use super::{Dispatcher, Running, SimulationOutcome};
use tracing::{debug, info};

impl Dispatcher {
    /// Advance the clock by one unit
    ///
    /// Starts a new slice when the CPU is free, otherwise continues the
    /// current one. Arrivals are admitted after every unit but never preempt
    /// a running slice. Returns `None` once every process has completed.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if self.is_finished() {
            return None;
        }

        let span = self.span.clone();
        let _enter = span.enter();

        let running = match self.current.take().or_else(|| self.dispatch_next()) {
            Some(running) => running,
            None => {
                self.idle_advance();
                return Some(TickOutcome::Idle);
            }
        };

        self.time += 1;
        self.records[running.pid].run_unit();
        self.stats.busy_ticks += 1;
        self.arrivals
            .admit_arrivals(self.time, &self.records, &mut self.bank);

        let running = Running {
            used: running.used + 1,
            ..running
        };
        let quantum = self.config.quantum(running.level);

        let finished = if self.records[running.pid].remaining_time() == 0 {
            Some(self.retire(running))
        } else if quantum.is_exhausted(running.used) {
            Some(self.preempt(running))
        } else {
            self.current = Some(running);
            None
        };

        Some(TickOutcome::Ran {
            pid: running.pid,
            finished,
        })
    }

    /// Run until the next dispatch decision point
    ///
    /// Returns the finished slice, or a one-unit idle entry when nothing was
    /// queued. Returns `None` once every process has completed.
    pub fn step(&mut self) -> Option<TimelineEntry> {
        loop {
            match self.tick()? {
                TickOutcome::Idle => {
                    return Some(TimelineEntry::Idle {
                        start: self.time - 1,
                        end: self.time,
                    })
                }
                TickOutcome::Ran {
                    finished: Some(slice),
                    ..
                } => return Some(TimelineEntry::Slice(slice)),
                TickOutcome::Ran { finished: None, .. } => {}
            }
        }
    }

    /// Drive the simulation until every process has completed
    pub fn run_to_completion(&mut self) {
        while self.step().is_some() {}

        let _enter = self.span.enter();
        info!(
            final_time = self.time,
            dispatches = self.stats.dispatches,
            preemptions = self.stats.preemptions,
            idle_ticks = self.stats.idle_ticks,
            "Simulation complete"
        );
    }

    /// Run to completion and hand back the finished records
    pub fn run(mut self) -> SimulationOutcome {
        self.run_to_completion();
        self.into_outcome()
    }

    /// Consume the dispatcher, returning what it has produced so far
    pub fn into_outcome(self) -> SimulationOutcome {
        SimulationOutcome {
            run_id: self.run_id,
            config: self.config,
            final_time: self.time,
            records: self.records,
            timeline: self.timeline,
            stats: self.stats,
        }
    }

    /// Pop the head of the highest-priority non-empty queue and start a slice
    fn dispatch_next(&mut self) -> Option<Running> {
        let (level, pid) = self.bank.pop_next()?;
        let record = &mut self.records[pid];

        if !record.is_started() {
            record.mark_started(self.time);
        }

        self.stats.dispatches += 1;
        debug!(
            pid,
            label = %record.label,
            level = %level,
            time = self.time,
            remaining = record.remaining_time(),
            "Dispatching process"
        );

        Some(Running {
            pid,
            level,
            start: self.time,
            used: 0,
        })
    }

    /// Nothing queued: advance one unit and look for arrivals
    fn idle_advance(&mut self) {
        let start = self.time;
        self.time += 1;
        self.stats.idle_ticks += 1;

        match self.timeline.last_mut() {
            Some(TimelineEntry::Idle { end, .. }) if *end == start => *end = self.time,
            _ => self.timeline.push(TimelineEntry::Idle {
                start,
                end: self.time,
            }),
        }

        self.arrivals
            .admit_arrivals(self.time, &self.records, &mut self.bank);
    }

    /// Burst exhausted: freeze metrics and drop the process for good
    fn retire(&mut self, running: Running) -> Slice {
        let record = &mut self.records[running.pid];
        record.finalize(self.time);
        self.completed += 1;
        self.stats.completed += 1;

        debug!(
            pid = running.pid,
            label = %record.label,
            time = self.time,
            waiting = record.waiting_time(),
            turnaround = record.turnaround_time(),
            "Process completed"
        );

        self.close_slice(running, SliceOutcome::Completed)
    }

    /// Quantum exhausted with work left: back to the tail of the same queue
    fn preempt(&mut self, running: Running) -> Slice {
        self.bank.push_back(running.level, running.pid);
        self.stats.preemptions += 1;

        debug!(
            pid = running.pid,
            level = %running.level,
            time = self.time,
            remaining = self.records[running.pid].remaining_time(),
            "Process preempted"
        );

        self.close_slice(running, SliceOutcome::Preempted)
    }

    fn close_slice(&mut self, running: Running, outcome: SliceOutcome) -> Slice {
        let slice = Slice {
            pid: running.pid,
            level: running.level,
            start: running.start,
            end: self.time,
            outcome,
        };
        self.timeline.push(TimelineEntry::Slice(slice));
        slice
    }
}
