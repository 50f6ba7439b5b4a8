use crate::console::{Console, Event};
use crate::error::ProgressError;
use crate::progress::SourceProgress;
use crate::translation::Translation;
use rand::seq::SliceRandom;
use rand::Rng;
use std::io;
use tracing::{debug, info, warn};

/// Where the engine persists its state after each round
pub trait Checkpoint {
    fn checkpoint(&mut self, translations: &[Translation]) -> Result<(), ProgressError>;
}

impl Checkpoint for SourceProgress<'_> {
    fn checkpoint(&mut self, translations: &[Translation]) -> Result<(), ProgressError> {
        self.save(translations)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Nothing was pending; no question was asked
    Complete,
    Played { round: usize, asked: usize },
}

/// Round-based retry loop over an exclusively owned list of translations.
#[derive(Debug)]
pub struct Quiz<R: Rng> {
    translations: Vec<Translation>,
    round: usize,
    rng: R,
}

impl<R: Rng> Quiz<R> {
    pub fn new(translations: Vec<Translation>, rng: R) -> Self {
        Self {
            translations,
            round: 1,
            rng,
        }
    }

    pub fn translations(&self) -> &[Translation] {
        &self.translations
    }

    pub fn pending(&self) -> usize {
        self.translations.iter().filter(|t| t.is_pending()).count()
    }

    /// Shuffle, ask every pending translation once, then checkpoint the whole list.
    /// An input error aborts the round before it is persisted.
    pub fn play_round<C, K>(&mut self, console: &mut C, checkpoint: &mut K) -> io::Result<RoundOutcome>
    where
        C: Console + ?Sized,
        K: Checkpoint + ?Sized,
    {
        self.translations.shuffle(&mut self.rng);

        let pending = self.pending();
        if pending == 0 {
            return Ok(RoundOutcome::Complete);
        }

        let round = self.round;
        console.emit(Event::RoundStarted { round, pending });

        for translation in self.translations.iter_mut().filter(|t| t.is_pending()) {
            ask(translation, &mut self.rng, console)?;
        }

        if let Err(e) = checkpoint.checkpoint(&self.translations) {
            warn!(round, "progress not saved: {e}");
            console.emit(Event::SaveFailed {
                reason: e.to_string(),
            });
        }

        debug!(round, asked = pending, left = self.pending(), "round finished");
        self.round += 1;
        Ok(RoundOutcome::Played {
            round,
            asked: pending,
        })
    }

    /// Play rounds until every translation is correct and hand the list back.
    pub fn run<C, K>(mut self, console: &mut C, checkpoint: &mut K) -> io::Result<Vec<Translation>>
    where
        C: Console + ?Sized,
        K: Checkpoint + ?Sized,
    {
        while let RoundOutcome::Played { .. } = self.play_round(console, checkpoint)? {}

        info!(
            rounds = self.round - 1,
            entries = self.translations.len(),
            "quiz complete"
        );
        console.emit(Event::Completed);
        Ok(self.translations)
    }
}

fn ask<R, C>(translation: &mut Translation, rng: &mut R, console: &mut C) -> io::Result<()>
where
    R: Rng,
    C: Console + ?Sized,
{
    let pick = rng.gen_range(0..translation.prompt.words.len().max(1));
    let text = translation.narrow_prompt(pick).text().to_string();
    console.emit(Event::Prompt {
        category: translation.prompt.category.clone(),
        text,
    });

    let mut inputs = Vec::with_capacity(translation.answers.len());
    for group in &translation.answers {
        inputs.push(console.answer(&group.category)?);
    }

    let grade = translation.grade(&inputs);
    translation.record(&grade);

    if grade.is_correct() {
        console.emit(Event::Correct);
    } else {
        let missed = grade
            .missed
            .iter()
            .map(|&idx| translation.answers[idx].clone())
            .collect();
        console.emit(Event::Incorrect { missed });
    }
    Ok(())
}
