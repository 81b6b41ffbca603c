//! Review scheduler.
//!
//! Moves cards through the cascade under two policies:
//!
//! - **Intake** (box 0): while the box holds more than the resting size,
//!   review all of it; remembered cards move to box 1, forgotten ones stay.
//! - **Overflow** (boxes 1 to n-2): sweep the intermediate boxes in
//!   ascending order and review a bounded FIFO prefix of every full one;
//!   remembered cards move one box forward, forgotten ones go back to box 0.
//!   Sweeps repeat until one finds no full box.
//!
//! The full cascade is saved after every intake pass, after every overflow
//! batch, and at the end of the session. Failed saves are reported and the
//! session carries on.

use anyhow::Result;

use crate::error::StoreError;
use crate::model::{BoxCascade, Capacity, Card};
use crate::store::CascadeSnapshot;
use crate::traits::{CascadeStore, Decision, Entry, SessionDriver};

/// Configuration for the review scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Box 0 is reviewed until it holds at most this many cards.
    pub intake_resting_size: usize,
    /// Most cards reviewed from one full box in a single batch.
    pub review_batch_limit: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            intake_resting_size: 3,
            review_batch_limit: 150,
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter {
    fn on_card_added(&self, card: &Card, intake_len: usize, capacity: Capacity);
    fn on_intake_pass_complete(&self, pass: usize, remaining: usize);
    fn on_box_start(&self, index: usize, review_count: usize);
    fn on_box_complete(&self, index: usize, remaining: usize);
    fn on_card_moved(&self, card: &Card, from: usize, to: usize);
    fn on_saved(&self, location: &str);
    fn on_save_failed(&self, error: &StoreError);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_card_added(&self, _: &Card, _: usize, _: Capacity) {}
    fn on_intake_pass_complete(&self, _: usize, _: usize) {}
    fn on_box_start(&self, _: usize, _: usize) {}
    fn on_box_complete(&self, _: usize, _: usize) {}
    fn on_card_moved(&self, _: &Card, _: usize, _: usize) {}
    fn on_saved(&self, _: &str) {}
    fn on_save_failed(&self, _: &StoreError) {}
}

/// Outcome of draining the intake box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeSummary {
    pub passes: usize,
    pub promoted: usize,
}

/// Outcome of the overflow sweeps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverflowSummary {
    /// Sweeps run, including the final one that found nothing to do.
    pub sweeps: usize,
    pub batches: usize,
    pub reviewed: usize,
}

/// Outcome of a whole session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub entries_added: usize,
    pub intake: IntakeSummary,
    pub overflow: OverflowSummary,
    pub save_failures: usize,
}

/// Drives cards through a [`BoxCascade`] and persists it along the way.
pub struct ReviewScheduler<'a> {
    store: &'a dyn CascadeStore,
    config: SchedulerConfig,
}

impl<'a> ReviewScheduler<'a> {
    pub fn new(store: &'a dyn CascadeStore, config: SchedulerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Read entries into box 0 until the driver signals the start of review,
    /// then review. Returns once every policy has settled.
    pub fn run_session(
        &self,
        cascade: &mut BoxCascade,
        driver: &mut dyn SessionDriver,
        progress: &dyn ProgressReporter,
    ) -> Result<SessionSummary> {
        let entries_added = self.collect_entries(cascade, driver, progress)?;
        let mut summary = self.review(cascade, driver, progress)?;
        summary.entries_added = entries_added;
        Ok(summary)
    }

    /// Append driver entries to box 0 until [`Entry::ReviewStart`].
    pub fn collect_entries(
        &self,
        cascade: &mut BoxCascade,
        driver: &mut dyn SessionDriver,
        progress: &dyn ProgressReporter,
    ) -> Result<usize> {
        let mut added = 0;
        loop {
            match driver.read_entry()? {
                Entry::ReviewStart => break,
                Entry::Card(card) => {
                    let intake = cascade.intake_mut();
                    intake.append(card.clone());
                    added += 1;
                    progress.on_card_added(&card, intake.len(), intake.capacity());
                }
            }
        }
        tracing::info!("{added} new card(s) entered");
        Ok(added)
    }

    /// Run the intake policy, then overflow sweeps, then a final save.
    ///
    /// The final save also runs when the driver fails part way, after the
    /// interrupted pass has been undone.
    pub fn review(
        &self,
        cascade: &mut BoxCascade,
        driver: &mut dyn SessionDriver,
        progress: &dyn ProgressReporter,
    ) -> Result<SessionSummary> {
        let before = cascade.total_cards();
        let mut save_failures = 0;

        let outcome = self.settle(cascade, driver, progress, &mut save_failures);
        // Saved on error too; the interrupted pass has already been undone.
        if !self.persist(cascade, progress) {
            save_failures += 1;
        }
        let (intake, overflow) = outcome?;

        debug_assert_eq!(before, cascade.total_cards(), "cards lost during review");

        Ok(SessionSummary {
            entries_added: 0,
            intake,
            overflow,
            save_failures,
        })
    }

    fn settle(
        &self,
        cascade: &mut BoxCascade,
        driver: &mut dyn SessionDriver,
        progress: &dyn ProgressReporter,
        save_failures: &mut usize,
    ) -> Result<(IntakeSummary, OverflowSummary)> {
        let intake = self.drain_intake(cascade, driver, progress, save_failures)?;
        let overflow = self.sweep_overflow(cascade, driver, progress, save_failures)?;
        Ok((intake, overflow))
    }

    /// Intake policy: review box 0 in full passes until it is at rest.
    ///
    /// Every pass snapshots and clears box 0, asks for a decision on each
    /// card in order, puts the forgotten cards back in box 0 and appends the
    /// remembered ones to box 1, both in their original order.
    pub fn drain_intake(
        &self,
        cascade: &mut BoxCascade,
        driver: &mut dyn SessionDriver,
        progress: &dyn ProgressReporter,
        save_failures: &mut usize,
    ) -> Result<IntakeSummary> {
        let mut summary = IntakeSummary::default();

        while cascade.intake().len() > self.config.intake_resting_size {
            let snapshot = cascade.intake_mut().drain_all();

            let decisions: Result<Vec<Decision>> = snapshot
                .iter()
                .map(|card| driver.ask_decision(card))
                .collect();
            let decisions = match decisions {
                Ok(decisions) => decisions,
                Err(e) => {
                    // Undo the pass so no card is lost.
                    cascade.intake_mut().extend(snapshot);
                    return Err(e);
                }
            };

            let mut forget = Vec::new();
            let mut remember = Vec::new();
            for (card, decision) in snapshot.into_iter().zip(decisions) {
                match decision {
                    Decision::Remember => {
                        record_move(progress, &card, 0, 1);
                        remember.push(card);
                    }
                    Decision::Forget => {
                        record_move(progress, &card, 0, 0);
                        forget.push(card);
                    }
                }
            }

            summary.passes += 1;
            summary.promoted += remember.len();
            tracing::debug!(
                "intake pass {}: {} remembered, {} forgotten",
                summary.passes,
                remember.len(),
                forget.len()
            );

            cascade.intake_mut().extend(forget);
            cascade[1].extend(remember);

            progress.on_intake_pass_complete(summary.passes, cascade.intake().len());
            if !self.persist(cascade, progress) {
                *save_failures += 1;
            }
        }

        Ok(summary)
    }

    /// Overflow policy: sweep boxes 1..terminal until no box is full.
    ///
    /// Boxes are checked in ascending order within a sweep, so promotions
    /// out of box `i` are visible when box `i + 1` is checked in the same
    /// sweep.
    pub fn sweep_overflow(
        &self,
        cascade: &mut BoxCascade,
        driver: &mut dyn SessionDriver,
        progress: &dyn ProgressReporter,
        save_failures: &mut usize,
    ) -> Result<OverflowSummary> {
        let mut summary = OverflowSummary::default();
        let terminal = cascade.terminal_index();

        loop {
            summary.sweeps += 1;
            let mut processed = false;

            for index in 1..terminal {
                if !cascade[index].is_full() {
                    continue;
                }
                processed = true;
                summary.batches += 1;
                summary.reviewed += self.review_batch(cascade, index, driver, progress)?;

                progress.on_box_complete(index, cascade[index].len());
                if !self.persist(cascade, progress) {
                    *save_failures += 1;
                }
            }

            if !processed {
                break;
            }
        }

        Ok(summary)
    }

    /// Review up to `review_batch_limit` cards from the head of box `index`.
    /// Returns the number of cards reviewed.
    fn review_batch(
        &self,
        cascade: &mut BoxCascade,
        index: usize,
        driver: &mut dyn SessionDriver,
        progress: &dyn ProgressReporter,
    ) -> Result<usize> {
        let review_count = self.config.review_batch_limit.min(cascade[index].len());
        progress.on_box_start(index, review_count);
        tracing::debug!("box {index} is full, reviewing {review_count} card(s)");

        let mut reviewed = 0;
        for _ in 0..review_count {
            if cascade[index].is_empty() {
                break;
            }
            let card = cascade[index].pop_front(index)?;

            let decision = match driver.ask_decision(&card) {
                Ok(decision) => decision,
                Err(e) => {
                    cascade[index].push_front(card);
                    return Err(e);
                }
            };

            let to = match decision {
                Decision::Remember => index + 1,
                Decision::Forget => 0,
            };
            record_move(progress, &card, index, to);
            cascade[to].append(card);
            reviewed += 1;
        }

        Ok(reviewed)
    }

    /// Save the full cascade. Returns `false` if the save failed.
    fn persist(&self, cascade: &BoxCascade, progress: &dyn ProgressReporter) -> bool {
        match self.store.save(&CascadeSnapshot::capture(cascade)) {
            Ok(()) => {
                progress.on_saved(&self.store.location());
                true
            }
            Err(e) => {
                tracing::warn!("save failed, keeping in-memory state: {e}");
                progress.on_save_failed(&e);
                false
            }
        }
    }
}

fn record_move(progress: &dyn ProgressReporter, card: &Card, from: usize, to: usize) {
    tracing::debug!("'{}': box {from} -> box {to}", card.front());
    progress.on_card_moved(card, from, to);
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;

    use super::*;
    use crate::mock::ScriptedDriver;
    use crate::store::MemoryStore;

    use crate::traits::Decision::{Forget, Remember};
    use crate::traits::LoadOutcome;

    /// Records every card transition.
    #[derive(Default)]
    struct RecordingReporter {
        moves: RefCell<Vec<(String, usize, usize)>>,
        batches: RefCell<Vec<(usize, usize)>>,
        save_failures: RefCell<usize>,
    }

    impl ProgressReporter for RecordingReporter {
        fn on_card_added(&self, _: &Card, _: usize, _: Capacity) {}
        fn on_intake_pass_complete(&self, _: usize, _: usize) {}
        fn on_box_start(&self, index: usize, review_count: usize) {
            self.batches.borrow_mut().push((index, review_count));
        }
        fn on_box_complete(&self, _: usize, _: usize) {}
        fn on_card_moved(&self, card: &Card, from: usize, to: usize) {
            self.moves
                .borrow_mut()
                .push((card.front().to_string(), from, to));
        }
        fn on_saved(&self, _: &str) {}
        fn on_save_failed(&self, _: &StoreError) {
            *self.save_failures.borrow_mut() += 1;
        }
    }

    /// Keeps the card total of every saved snapshot.
    #[derive(Default)]
    struct TotalsStore {
        totals: RefCell<Vec<usize>>,
    }

    impl CascadeStore for TotalsStore {
        fn location(&self) -> String {
            "totals".to_string()
        }

        fn load(&self) -> std::result::Result<LoadOutcome, StoreError> {
            Ok(LoadOutcome::NotFound)
        }

        fn save(&self, snapshot: &CascadeSnapshot) -> std::result::Result<(), StoreError> {
            self.totals.borrow_mut().push(snapshot.total_cards());
            Ok(())
        }
    }

    fn card(word: &str) -> Card {
        Card::new(word, format!("{word}-meaning"))
    }

    fn fronts(cascade: &BoxCascade, index: usize) -> Vec<String> {
        cascade[index].cards().map(|c| c.front().to_string()).collect()
    }

    fn fill(cascade: &mut BoxCascade, index: usize, words: &[&str]) {
        for w in words {
            cascade[index].append(card(w));
        }
    }

    #[test]
    fn intake_pass_partitions_in_order() {
        let store = MemoryStore::new();
        let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
        let mut cascade = BoxCascade::standard();
        let mut driver = ScriptedDriver::new()
            .with_entries(["a:1", "b:2", "c:3", "d:4"])
            .with_decisions([Remember, Remember, Forget, Forget]);

        let summary = scheduler
            .run_session(&mut cascade, &mut driver, &NoopReporter)
            .unwrap();

        assert_eq!(summary.entries_added, 4);
        assert_eq!(summary.intake.passes, 1);
        assert_eq!(summary.intake.promoted, 2);
        assert_eq!(fronts(&cascade, 0), vec!["c", "d"]);
        assert_eq!(fronts(&cascade, 1), vec!["a", "b"]);
        assert_eq!(driver.asked(), vec!["a", "b", "c", "d"]);
        // one save for the intake pass, one at the end
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.last_saved().unwrap().total_cards(), 4);
    }

    #[test]
    fn intake_at_rest_is_not_reviewed() {
        let store = MemoryStore::new();
        let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
        let mut cascade = BoxCascade::standard();
        fill(&mut cascade, 0, &["a", "b", "c"]);
        let mut driver = ScriptedDriver::new();

        let summary = scheduler
            .review(&mut cascade, &mut driver, &NoopReporter)
            .unwrap();

        assert_eq!(summary.intake.passes, 0);
        assert!(driver.asked().is_empty());
        assert_eq!(cascade[0].len(), 3);
    }

    #[test]
    fn intake_repeats_until_at_rest() {
        let store = MemoryStore::new();
        let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
        let mut cascade = BoxCascade::standard();
        fill(&mut cascade, 0, &["a", "b", "c", "d", "e", "f"]);
        // Pass 1 forgets everything, pass 2 remembers the first three.
        let mut driver = ScriptedDriver::new().with_decisions([
            Forget, Forget, Forget, Forget, Forget, Forget, Remember, Remember, Remember, Forget,
            Forget, Forget,
        ]);

        let mut failures = 0;
        let summary = scheduler
            .drain_intake(&mut cascade, &mut driver, &NoopReporter, &mut failures)
            .unwrap();

        assert_eq!(summary.passes, 2);
        assert_eq!(fronts(&cascade, 0), vec!["d", "e", "f"]);
        assert_eq!(fronts(&cascade, 1), vec!["a", "b", "c"]);
        assert_eq!(failures, 0);
    }

    #[test]
    fn intake_terminates_for_any_size() {
        for n in 0..40 {
            for period in 1..4 {
                let store = MemoryStore::new();
                let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
                let mut cascade = BoxCascade::standard();
                for i in 0..n {
                    cascade.add_card(card(&format!("w{i}")));
                }
                // Remember every `period`-th question, forget the rest.
                let mut asked = 0usize;
                let mut driver = ScriptedDriver::with_rule(move |_| {
                    asked += 1;
                    if asked % period == 0 {
                        Remember
                    } else {
                        Forget
                    }
                });

                let mut failures = 0;
                scheduler
                    .drain_intake(&mut cascade, &mut driver, &NoopReporter, &mut failures)
                    .unwrap();

                assert!(cascade[0].len() <= 3, "n={n} period={period}");
                assert_eq!(cascade.total_cards(), n);
            }
        }
    }

    #[test]
    fn overflow_promotes_full_batch_in_fifo_order() {
        let store = MemoryStore::new();
        let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
        let mut cascade = BoxCascade::standard();
        fill(&mut cascade, 1, &["a", "b", "c", "d", "e"]);
        let mut driver = ScriptedDriver::new().with_fallback(Remember);

        let mut failures = 0;
        let summary = scheduler
            .sweep_overflow(&mut cascade, &mut driver, &NoopReporter, &mut failures)
            .unwrap();

        assert!(cascade[1].is_empty());
        assert_eq!(fronts(&cascade, 2), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(driver.asked(), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(summary.batches, 1);
        assert_eq!(summary.reviewed, 5);
        assert_eq!(summary.sweeps, 2);
    }

    #[test]
    fn overflow_forget_demotes_to_intake() {
        let store = MemoryStore::new();
        let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
        let mut cascade = BoxCascade::standard();
        fill(&mut cascade, 0, &["x"]);
        fill(&mut cascade, 3, &["a", "b", "c", "d", "e", "f", "g"]);
        let mut driver = ScriptedDriver::new()
            .with_decisions([Forget, Remember, Forget, Remember, Remember, Forget, Remember]);

        let mut failures = 0;
        scheduler
            .sweep_overflow(&mut cascade, &mut driver, &NoopReporter, &mut failures)
            .unwrap();

        assert_eq!(fronts(&cascade, 0), vec!["x", "a", "c", "f"]);
        assert_eq!(fronts(&cascade, 4), vec!["b", "d", "e", "g"]);
        assert!(cascade[3].is_empty());
    }

    #[test]
    fn promotion_within_a_sweep_is_seen_by_next_box() {
        let store = MemoryStore::new();
        let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
        let mut cascade = BoxCascade::standard();
        // Box 2 (capacity 6) holds 1; box 1 promotes 5 into it.
        fill(&mut cascade, 2, &["z"]);
        fill(&mut cascade, 1, &["a", "b", "c", "d", "e"]);
        let reporter = RecordingReporter::default();
        let mut driver = ScriptedDriver::new().with_fallback(Remember);

        let mut failures = 0;
        let summary = scheduler
            .sweep_overflow(&mut cascade, &mut driver, &reporter, &mut failures)
            .unwrap();

        // box 1 then box 2 in the same sweep, then a clean sweep
        assert_eq!(*reporter.batches.borrow(), vec![(1, 5), (2, 6)]);
        assert_eq!(summary.sweeps, 2);
        assert_eq!(fronts(&cascade, 3), vec!["z", "a", "b", "c", "d", "e"]);
    }

    #[test]
    fn capped_remainder_is_picked_up_by_later_sweeps() {
        let store = MemoryStore::new();
        let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
        let mut cascade = BoxCascade::standard();
        for i in 0..320 {
            cascade[1].append(card(&format!("w{i}")));
        }
        let reporter = RecordingReporter::default();
        let mut driver = ScriptedDriver::new().with_fallback(Forget);

        let mut failures = 0;
        let summary = scheduler
            .sweep_overflow(&mut cascade, &mut driver, &reporter, &mut failures)
            .unwrap();

        assert_eq!(
            *reporter.batches.borrow(),
            vec![(1, 150), (1, 150), (1, 20)]
        );
        assert_eq!(summary.sweeps, 4);
        assert_eq!(summary.reviewed, 320);
        assert_eq!(cascade[0].len(), 320);
        // demoted cards keep their review order
        assert_eq!(cascade[0].cards().next().unwrap().front(), "w0");
    }

    #[test]
    fn overflow_batch_is_capped() {
        let store = MemoryStore::new();
        let config = SchedulerConfig {
            intake_resting_size: 3,
            review_batch_limit: 4,
        };
        let scheduler = ReviewScheduler::new(&store, config);
        let mut cascade = BoxCascade::standard();
        fill(&mut cascade, 1, &["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]);
        let reporter = RecordingReporter::default();
        let mut driver = ScriptedDriver::new().with_fallback(Remember);

        let mut failures = 0;
        scheduler
            .sweep_overflow(&mut cascade, &mut driver, &reporter, &mut failures)
            .unwrap();

        let batches = reporter.batches.borrow();
        // 10 -> 6 -> 2 in box 1; box 2 fills along the way
        assert!(batches.iter().all(|&(_, count)| count <= 4));
        assert_eq!(batches[0], (1, 4));
        assert_eq!(fronts(&cascade, 1), vec!["i", "j"]);
    }

    #[test]
    fn default_batch_limit_caps_at_150() {
        let store = MemoryStore::new();
        let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
        let mut cascade = BoxCascade::standard();
        for i in 0..200 {
            cascade[1].append(card(&format!("w{i}")));
        }
        let reporter = RecordingReporter::default();
        let mut driver = ScriptedDriver::new().with_fallback(Forget);

        let mut failures = 0;
        scheduler
            .sweep_overflow(&mut cascade, &mut driver, &reporter, &mut failures)
            .unwrap();

        let batches = reporter.batches.borrow();
        assert_eq!(batches[0], (1, 150));
        assert_eq!(cascade[1].len(), 0);
        assert_eq!(cascade[0].len(), 200);
    }

    #[test]
    fn transitions_never_skip_a_box() {
        let store = MemoryStore::new();
        let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
        let mut cascade = BoxCascade::standard();
        for i in 0..60 {
            cascade.add_card(card(&format!("w{i}")));
        }
        let reporter = RecordingReporter::default();
        let mut asked = 0usize;
        let mut driver = ScriptedDriver::with_rule(move |_| {
            asked += 1;
            if asked % 3 == 0 {
                Forget
            } else {
                Remember
            }
        });

        scheduler
            .review(&mut cascade, &mut driver, &reporter)
            .unwrap();

        let moves = reporter.moves.borrow();
        assert!(!moves.is_empty());
        for (word, from, to) in moves.iter() {
            assert!(
                *to == 0 || *to == from + 1,
                "{word} moved from box {from} to box {to}"
            );
        }
        assert_eq!(cascade.total_cards(), 60);
        for index in 1..5 {
            assert!(!cascade[index].is_full(), "box {index} left full");
        }
    }

    #[test]
    fn conservation_across_a_full_session() {
        let store = MemoryStore::new();
        let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
        let mut cascade = BoxCascade::standard();
        let entries: Vec<String> = (0..30).map(|i| format!("w{i}:m{i}")).collect();
        let mut asked = 0usize;
        let mut driver = ScriptedDriver::with_rule(move |_| {
            asked += 1;
            if asked % 4 == 0 {
                Forget
            } else {
                Remember
            }
        })
        .with_entries(entries);

        scheduler
            .run_session(&mut cascade, &mut driver, &NoopReporter)
            .unwrap();

        assert_eq!(cascade.total_cards(), 30);
        let unique: HashSet<&Card> = cascade.boxes().iter().flat_map(|b| b.cards()).collect();
        assert_eq!(unique.len(), 30);
        assert_eq!(store.last_saved().unwrap().total_cards(), 30);
    }

    #[test]
    fn save_failure_does_not_abort_session() {
        let store = MemoryStore::failing();
        let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
        let mut cascade = BoxCascade::standard();
        let reporter = RecordingReporter::default();
        let mut driver = ScriptedDriver::new()
            .with_entries(["a:1", "b:2", "c:3", "d:4"])
            .with_fallback(Remember);

        let summary = scheduler
            .run_session(&mut cascade, &mut driver, &reporter)
            .unwrap();

        assert_eq!(summary.save_failures, 2);
        assert_eq!(*reporter.save_failures.borrow(), 2);
        assert_eq!(cascade[1].len(), 4);
    }

    #[test]
    fn driver_error_mid_intake_keeps_every_card() {
        let store = MemoryStore::new();
        let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
        let mut cascade = BoxCascade::standard();
        fill(&mut cascade, 0, &["a", "b", "c", "d", "e"]);
        // two answers, then the script runs dry
        let mut driver = ScriptedDriver::new().with_decisions([Remember, Forget]);

        let mut failures = 0;
        let err = scheduler
            .drain_intake(&mut cascade, &mut driver, &NoopReporter, &mut failures)
            .unwrap_err();

        assert!(err.to_string().contains("no scripted decision"));
        assert_eq!(fronts(&cascade, 0), vec!["a", "b", "c", "d", "e"]);
        assert!(cascade[1].is_empty());
    }

    #[test]
    fn driver_error_mid_batch_keeps_every_card() {
        let store = MemoryStore::new();
        let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
        let mut cascade = BoxCascade::standard();
        fill(&mut cascade, 1, &["a", "b", "c", "d", "e"]);
        let mut driver = ScriptedDriver::new().with_decisions([Remember, Forget]);

        let mut failures = 0;
        assert!(scheduler
            .sweep_overflow(&mut cascade, &mut driver, &NoopReporter, &mut failures)
            .is_err());

        assert_eq!(fronts(&cascade, 1), vec!["c", "d", "e"]);
        assert_eq!(fronts(&cascade, 2), vec!["a"]);
        assert_eq!(fronts(&cascade, 0), vec!["b"]);
        assert_eq!(cascade.total_cards(), 5);
    }

    #[test]
    fn driver_error_still_saves_entered_cards() {
        let store = MemoryStore::new();
        let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
        let mut cascade = BoxCascade::standard();
        fill(&mut cascade, 0, &["old"]);
        let mut driver = ScriptedDriver::new()
            .with_entries(["a:1", "b:2", "c:3", "d:4"])
            .with_decisions([Remember]);

        let err = scheduler
            .run_session(&mut cascade, &mut driver, &NoopReporter)
            .unwrap_err();

        assert!(err.to_string().contains("no scripted decision"));
        assert_eq!(store.save_count(), 1);
        let saved = store.last_saved().unwrap();
        assert_eq!(saved.total_cards(), 5);
        let mut reloaded = BoxCascade::standard();
        saved.apply_to(&mut reloaded);
        assert_eq!(fronts(&reloaded, 0), vec!["old", "a", "b", "c", "d"]);
    }

    #[test]
    fn every_saved_state_holds_every_card() {
        let store = TotalsStore::default();
        let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
        let mut cascade = BoxCascade::standard();
        for i in 0..80 {
            cascade.add_card(card(&format!("w{i}")));
        }
        let mut asked = 0usize;
        let mut driver = ScriptedDriver::with_rule(move |_| {
            asked += 1;
            if asked % 5 == 0 {
                Forget
            } else {
                Remember
            }
        });

        let summary = scheduler
            .review(&mut cascade, &mut driver, &NoopReporter)
            .unwrap();

        // one save per intake pass and per overflow batch, plus the last one
        let totals = store.totals.borrow();
        assert_eq!(
            totals.len(),
            summary.intake.passes + summary.overflow.batches + 1
        );
        assert!(summary.overflow.batches > 0);
        assert!(totals.iter().all(|&total| total == 80), "{totals:?}");
    }

    #[test]
    fn terminal_box_never_triggers_review() {
        let store = MemoryStore::new();
        let scheduler = ReviewScheduler::new(&store, SchedulerConfig::default());
        let mut cascade = BoxCascade::standard();
        for i in 0..500 {
            cascade[5].append(card(&format!("w{i}")));
        }
        let mut driver = ScriptedDriver::new();

        let summary = scheduler
            .review(&mut cascade, &mut driver, &NoopReporter)
            .unwrap();

        assert_eq!(summary.overflow.batches, 0);
        assert_eq!(summary.overflow.sweeps, 1);
        assert!(driver.asked().is_empty());
    }
}
