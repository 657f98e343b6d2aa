//! Per-letter guess evaluation.
//!
//! Letters of the target are never consumed: a guess that repeats a letter the target holds
//! once marks every repeat as present. Present letters color the first occurrence of that
//! letter in the guess rather than their own position, so a repeated present letter can
//! overwrite an earlier color and leave its own box uncolored. This is the game's defined
//! coloring and differs from canonical Wordle on purpose.

use crate::word::Word;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LetterClass {
    CorrectPosition,
    PresentElsewhere,
    Absent,
}

impl LetterClass {
    /// Single character marker used by the line-mode interface.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::CorrectPosition => 'G',
            Self::PresentElsewhere => 'Y',
            Self::Absent => 'X',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessResult {
    letters: Vec<char>,
    classes: Vec<LetterClass>,
    color_targets: Vec<usize>,
    banned: BTreeSet<char>,
}

impl GuessResult {
    /// The guessed letters, in order.
    #[must_use]
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    /// One classification per guess position.
    #[must_use]
    pub fn classes(&self) -> &[LetterClass] {
        &self.classes
    }

    /// For each position, the box its classification is painted on.
    #[must_use]
    pub fn color_targets(&self) -> &[usize] {
        &self.color_targets
    }

    /// Letters found absent from the target by this guess.
    #[must_use]
    pub fn banned(&self) -> &BTreeSet<char> {
        &self.banned
    }

    #[must_use]
    pub fn is_win(&self) -> bool {
        self.classes
            .iter()
            .all(|class| *class == LetterClass::CorrectPosition)
    }

    /// Box colors after painting every classification in order onto its target box.
    ///
    /// Later paints overwrite earlier ones; boxes that are never painted stay `None`.
    #[must_use]
    pub fn colors(&self) -> Vec<Option<LetterClass>> {
        let mut colors = vec![None; self.classes.len()];
        for (class, &target) in self.classes.iter().zip(&self.color_targets) {
            colors[target] = Some(*class);
        }
        colors
    }

    #[must_use]
    pub fn count(&self, class: LetterClass) -> usize {
        self.classes.iter().filter(|c| **c == class).count()
    }
}

/// Evaluate `guess` against `target`.
///
/// # Panics
/// Panics if the two words differ in length; callers must check lengths first.
#[must_use]
pub fn evaluate(target: &Word, guess: &Word) -> GuessResult {
    assert_eq!(
        target.len(),
        guess.len(),
        "guess length must match target length"
    );

    let target_letters = target.letters();
    let letters = guess.letters();
    let mut classes = Vec::with_capacity(letters.len());
    let mut color_targets = Vec::with_capacity(letters.len());
    let mut banned = BTreeSet::new();

    for (i, &letter) in letters.iter().enumerate() {
        if letter == target_letters[i] {
            classes.push(LetterClass::CorrectPosition);
            color_targets.push(i);
        } else if target.contains(letter) {
            classes.push(LetterClass::PresentElsewhere);
            let first = letters.iter().position(|&c| c == letter).unwrap_or(i);
            color_targets.push(first);
        } else {
            classes.push(LetterClass::Absent);
            color_targets.push(i);
            banned.insert(letter);
        }
    }

    GuessResult {
        letters,
        classes,
        color_targets,
        banned,
    }
}
