//! Randomised hypothesis checks.
//!
//! Some properties of a model cannot be decided by one deterministic
//! assertion. The [`Oracle`] turns them into bounded searches for a single
//! counterexample against a stated null hypothesis. Every search is capped
//! at `simulated_infinity` trials, and reaching the cap means the null
//! hypothesis stands.
//!
//! Searches that only *build inputs* for a check (finding an adaptable
//! pattern) return [`Error::SearchExhausted`] when they come up empty, so a
//! caller can tell a broken setup apart from a rejected hypothesis.

use crate::config::{TestbedConfig, DEFAULT_CORTEX_STRENGTH};
use crate::cortex::{Adapter, Cortex};
use crate::error::{Error, Result};
use crate::generator::SequenceGenerator;
use crate::input::Input;
use crate::sequence::Sequence;
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Runs randomised trials against blank and pre-seeded instances of `C`.
#[derive(Debug)]
pub struct Oracle<C, R = StdRng> {
    generator: SequenceGenerator<R>,
    simulated_infinity: usize,
    cortex_strength: usize,
    _cortex: PhantomData<fn() -> C>,
}

impl<C: Cortex> Oracle<C, StdRng> {
    /// An oracle with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64, simulated_infinity: usize) -> Self {
        Self::new(SequenceGenerator::seeded(seed), simulated_infinity)
    }

    /// An oracle using the configured cap, strength and seed.
    #[must_use]
    pub fn from_config(config: &TestbedConfig) -> Self {
        let generator = config
            .seed
            .map_or_else(SequenceGenerator::from_entropy, SequenceGenerator::seeded);
        Self::new(generator, config.simulated_infinity).with_cortex_strength(config.cortex_strength)
    }
}

impl<C: Cortex, R: Rng> Oracle<C, R> {
    /// Wraps a generator with the given search cap.
    pub fn new(generator: SequenceGenerator<R>, simulated_infinity: usize) -> Self {
        Self {
            generator,
            simulated_infinity,
            cortex_strength: DEFAULT_CORTEX_STRENGTH,
            _cortex: PhantomData,
        }
    }

    /// Sets how many random inputs pre-seed a random model.
    #[must_use]
    pub fn with_cortex_strength(mut self, strength: usize) -> Self {
        self.cortex_strength = strength;
        self
    }

    /// The search cap.
    pub const fn simulated_infinity(&self) -> usize {
        self.simulated_infinity
    }

    /// The generator shared by every trial.
    pub fn generator(&mut self) -> &mut SequenceGenerator<R> {
        &mut self.generator
    }

    /// A model that has already seen `cortex_strength` random inputs.
    pub fn random_cortex(&mut self) -> Adapter<C> {
        let mut cortex = Adapter::new();
        cortex.feed_all(&self.generator.random::<C::Input>(self.cortex_strength));
        cortex
    }

    /// A non-trivial circular pattern whose exact period is `period` and to
    /// which a blank model adapts.
    ///
    /// Not every circular pattern is learnable, so candidates are drawn
    /// until one is.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPatternPeriod`] for periods below two and
    /// [`Error::SearchExhausted`] when no candidate qualifies within the cap.
    pub fn adaptable_random_pattern(&mut self, period: usize) -> Result<Sequence<C::Input>> {
        if period < 2 {
            return Err(Error::InvalidPatternPeriod(period));
        }
        let mut attempts = 0;
        while attempts < self.simulated_infinity {
            attempts += 1;
            let Some(candidate) = self.generator.nontrivial_circular_random::<C::Input>(period)
            else {
                break;
            };
            if candidate.period() != period {
                continue;
            }
            if Adapter::<C>::new().adapt(&candidate, self.simulated_infinity) {
                debug!(period, attempts, "found adaptable pattern");
                return Ok(candidate);
            }
        }
        warn!(period, attempts, "no adaptable pattern found");
        Err(Error::SearchExhausted {
            what: "adaptable random pattern",
            attempts,
        })
    }

    /// Rejects the hypothesis that adaptation time is independent of the
    /// pattern's content.
    ///
    /// Measures a blank model on one circular pattern, then tries fresh
    /// patterns of the same length on fresh blank models. Candidates equal to
    /// the baseline are skipped. Returns true on the first differing time.
    pub fn adaptation_time_depends_on_content(&mut self, period: usize) -> bool {
        let cap = self.simulated_infinity;
        let baseline = self.generator.circular_random::<C::Input>(period);
        let base_time = Adapter::<C>::new().time_to_repeat(&baseline, cap);
        for trial in 0..cap {
            let another = self.generator.circular_random::<C::Input>(period);
            if another == baseline {
                continue;
            }
            let time = Adapter::<C>::new().time_to_repeat(&another, cap);
            if time != base_time {
                debug!(trial, base_time, time, "content changes adaptation time");
                return true;
            }
        }
        debug!(base_time, "adaptation time independent of content");
        false
    }

    /// Rejects the hypothesis that adaptation time is independent of the
    /// model's prior state.
    ///
    /// Measures a blank model on an adaptable pattern, then measures random
    /// models on the same pattern.
    ///
    /// # Errors
    ///
    /// Fails if no adaptable target pattern can be found.
    pub fn adaptation_time_depends_on_state(&mut self, period: usize) -> Result<bool> {
        let cap = self.simulated_infinity;
        let target = self.adaptable_random_pattern(period)?;
        let base_time = Adapter::<C>::new().time_to_repeat(&target, cap);
        for trial in 0..cap {
            let time = self.random_cortex().time_to_repeat(&target, cap);
            if time != base_time {
                debug!(trial, base_time, time, "state changes adaptation time");
                return Ok(true);
            }
        }
        debug!(base_time, "adaptation time independent of state");
        Ok(false)
    }

    /// True if `dog` adapts to `simulated_infinity` fresh patterns in a row.
    ///
    /// `dog` keeps everything it learned along the way.
    ///
    /// # Errors
    ///
    /// Fails if a fresh adaptable pattern cannot be found.
    pub fn is_indefinitely_adaptable(
        &mut self,
        dog: &mut Adapter<C>,
        period: usize,
    ) -> Result<bool> {
        let cap = self.simulated_infinity;
        for trick in 0..cap {
            let new_trick = self.adaptable_random_pattern(period)?;
            if !dog.adapt(&new_trick, cap) {
                debug!(trick, "failed to adapt to a new pattern");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Searches for two unequal models with identical observable behaviour.
    ///
    /// Each trial adapts a blank and a random model to the smallest trivial
    /// pattern and compares their closed-loop rollouts over
    /// `simulated_infinity` steps.
    pub fn unobservability_witness(&mut self) -> Option<UnobservabilityWitness<C>> {
        let cap = self.simulated_infinity;
        let trivial = self.generator.trivial::<C::Input>(2);
        for trial in 0..cap {
            let mut blank = Adapter::<C>::new();
            let mut seeded = self.random_cortex();
            blank.adapt(&trivial, cap);
            seeded.adapt(&trivial, cap);
            if blank != seeded && identical_behaviour(&blank, &seeded, cap) {
                debug!(trial, "found unequal models with identical behaviour");
                return Some(UnobservabilityWitness {
                    first: blank,
                    second: seeded,
                    trial,
                });
            }
        }
        None
    }

    /// Scores how well adapted and unadapted models recover a pattern after a
    /// random disruption.
    ///
    /// Each trial draws an adaptable pattern and a disruption. One model
    /// adapts to the pattern first, the other does not; both are then fed
    /// the disruption followed by the pattern, and their next prediction is
    /// scored by matching channels against the pattern's first input.
    ///
    /// # Errors
    ///
    /// Fails if an adaptable pattern cannot be found.
    pub fn generalisation_score(&mut self, period: usize) -> Result<GeneralisationScore> {
        let cap = self.simulated_infinity;
        let mut score = GeneralisationScore::new(cap, C::Input::WIDTH);
        for _ in 0..cap {
            let facts = self.adaptable_random_pattern(period)?;
            let disruption = self.generator.random_input::<C::Input>(&[]);
            let expectation = &facts[0];

            let mut adapted = Adapter::<C>::new();
            adapted.adapt(&facts, cap);
            adapted.feed(&disruption).feed_all(&facts);
            score.adapted += adapted.predict().count_matches(expectation);

            let mut unadapted = Adapter::<C>::new();
            unadapted.feed(&disruption).feed_all(&facts);
            score.unadapted += unadapted.predict().count_matches(expectation);
        }
        debug!(
            adapted = score.adapted,
            unadapted = score.unadapted,
            chance = score.chance,
            "generalisation scored"
        );
        Ok(score)
    }

    /// Longest circular pattern length a blank model adapts to.
    ///
    /// Grows the length from two and returns the last length that was
    /// learned, so a model that cannot learn even two inputs yields `1`.
    /// Returns `simulated_infinity` if every length up to and including the
    /// cap is learned.
    pub fn estimate_pattern_period(&mut self) -> usize {
        let cap = self.simulated_infinity;
        for length in 2..=cap {
            let pattern = self.generator.circular_random::<C::Input>(length);
            if !Adapter::<C>::new().adapt(&pattern, cap) {
                debug!(period = length - 1, "estimated pattern period");
                return length - 1;
            }
        }
        cap
    }
}

/// Two unequal models whose closed-loop behaviour is the same.
#[derive(Debug, Clone)]
pub struct UnobservabilityWitness<C> {
    /// The blank-started model.
    pub first: Adapter<C>,
    /// The randomly pre-seeded model.
    pub second: Adapter<C>,
    /// Trial on which the pair was found.
    pub trial: usize,
}

/// Channel-match totals from [`Oracle::generalisation_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GeneralisationScore {
    /// Number of trials.
    pub trials: usize,
    /// Total matches for adapted models.
    pub adapted: usize,
    /// Total matches for unadapted models.
    pub unadapted: usize,
    /// Expected matches of a fair-coin guess.
    pub chance: usize,
}

impl GeneralisationScore {
    /// An empty score for `trials` trials of `width`-channel inputs.
    #[must_use]
    pub const fn new(trials: usize, width: usize) -> Self {
        Self {
            trials,
            adapted: 0,
            unadapted: 0,
            chance: trials * width / 2,
        }
    }

    /// True when adapted models beat both unadapted models and chance.
    #[must_use]
    pub const fn adapted_wins(&self) -> bool {
        self.adapted > self.unadapted && self.adapted > self.chance
    }
}

/// True if `a` and `b`, fed their own predictions, predict the same input at
/// each of `timeframe` steps.
///
/// Works on clones. Stops at the first divergence.
pub fn identical_behaviour<C: Cortex>(a: &Adapter<C>, b: &Adapter<C>, timeframe: usize) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    for _ in 0..timeframe {
        let next = a.predict();
        if next != b.predict() {
            return false;
        }
        a.feed(&next);
        b.feed(&next);
    }
    true
}
