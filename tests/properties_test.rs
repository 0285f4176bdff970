/*!
 * Scheduling Property Tests
 * Timing invariants over randomly generated process batches
 */

use mlq_sim::report::render_text;
use mlq_sim::scheduler::{SliceOutcome, TimelineEntry};
use mlq_sim::{Dispatcher, ProcessRecord, QueueLevel, SchedulerConfig};
use proptest::prelude::*;

fn arb_record() -> impl Strategy<Value = (u64, u64, u8)> {
    (1u64..=12, 0u64..=40, 1u8..=3)
}

fn build(specs: &[(u64, u64, u8)]) -> Vec<ProcessRecord> {
    let mut records: Vec<ProcessRecord> = specs
        .iter()
        .enumerate()
        .map(|(i, &(burst, arrival, level))| {
            let level = QueueLevel::try_from(level as i64).unwrap();
            ProcessRecord::new(format!("p{}", i), burst, arrival, level, 0).unwrap()
        })
        .collect();
    records.sort_by_key(|r| r.arrival_time);
    records
}

proptest! {
    #[test]
    fn prop_timing_identities(specs in prop::collection::vec(arb_record(), 1..25)) {
        let outcome = Dispatcher::with_defaults(build(&specs)).run();

        for record in &outcome.records {
            let start = record.start_time().unwrap();
            let completion = record.completion_time().unwrap();
            prop_assert!(start >= record.arrival_time);
            prop_assert!(completion >= start + 1);
            prop_assert_eq!(record.response_time().unwrap(), start - record.arrival_time);
            prop_assert_eq!(
                record.turnaround_time().unwrap(),
                completion - record.arrival_time
            );
            prop_assert_eq!(
                record.waiting_time().unwrap() + record.burst_time,
                record.turnaround_time().unwrap()
            );
            prop_assert_eq!(record.remaining_time(), 0);
        }
    }

    #[test]
    fn prop_clock_accounting(specs in prop::collection::vec(arb_record(), 1..25)) {
        let records = build(&specs);
        let total_burst: u64 = records.iter().map(|r| r.burst_time).sum();
        let outcome = Dispatcher::with_defaults(records).run();

        prop_assert!(outcome.final_time >= total_burst);
        prop_assert_eq!(outcome.stats.busy_ticks, total_burst);
        prop_assert_eq!(outcome.final_time, total_burst + outcome.stats.idle_ticks);
        if outcome.stats.idle_ticks == 0 {
            prop_assert_eq!(outcome.final_time, total_burst);
        }
        prop_assert_eq!(outcome.stats.completed, outcome.records.len());
    }

    #[test]
    fn prop_slices_respect_quanta(specs in prop::collection::vec(arb_record(), 1..25)) {
        let config = SchedulerConfig::default();
        let outcome = Dispatcher::new(build(&specs), config).run();

        let mut last_end = 0;
        for entry in &outcome.timeline {
            let (start, end) = match entry {
                TimelineEntry::Slice(slice) => {
                    if let Some(limit) = config.quantum(slice.level).limit() {
                        prop_assert!(slice.len() <= limit);
                        if slice.outcome == SliceOutcome::Preempted {
                            prop_assert_eq!(slice.len(), limit);
                        }
                    } else {
                        // FCFS slices always run the burst out
                        prop_assert_eq!(slice.outcome, SliceOutcome::Completed);
                    }
                    (slice.start, slice.end)
                }
                TimelineEntry::Idle { start, end } => (*start, *end),
            };
            prop_assert_eq!(start, last_end);
            prop_assert!(end > start);
            last_end = end;
        }
        prop_assert_eq!(last_end, outcome.final_time);
    }

    #[test]
    fn prop_level_one_never_waits_behind_lower_levels(
        specs in prop::collection::vec(arb_record(), 1..25)
    ) {
        let outcome = Dispatcher::with_defaults(build(&specs)).run();
        let slices: Vec<_> = outcome
            .timeline
            .iter()
            .filter_map(|e| match e {
                TimelineEntry::Slice(s) => Some(*s),
                TimelineEntry::Idle { .. } => None,
            })
            .collect();

        // A lower-level slice may only begin when no level-1 process is ready
        for slice in slices.iter().filter(|s| s.level != QueueLevel::L1) {
            for record in outcome.records.iter().filter(|r| r.queue_level == QueueLevel::L1) {
                let arrived = record.arrival_time <= slice.start;
                let unfinished = record.completion_time().unwrap() > slice.start;
                prop_assert!(!(arrived && unfinished));
            }
        }
    }

    #[test]
    fn prop_deterministic_output(specs in prop::collection::vec(arb_record(), 1..25)) {
        let first = Dispatcher::with_defaults(build(&specs)).run();
        let second = Dispatcher::with_defaults(build(&specs)).run();

        prop_assert_eq!(
            render_text(&first.records).unwrap(),
            render_text(&second.records).unwrap()
        );
        prop_assert_eq!(first.timeline, second.timeline);
    }
}
