//! Reference models for exercising the testbed itself.
//!
//! These are calibration fixtures, not candidate models: they have just
//! enough behaviour to drive every primitive down both its passing and its
//! failing branch. [`Bounded`] is the one that passes the whole battery.

use crate::cortex::Cortex;
use crate::input::Input;

/// Remembers everything and predicts by recalling what followed the most
/// recent earlier occurrence of the current input.
///
/// Predictions are masked by the refractory rule, so channels that just
/// spiked are never predicted to spike again. A blank model predicts
/// silence. It learns any circular pattern whose inputs are distinct within
/// two passes and never stops learning, which makes it a useful model that
/// passes most invariants and fails the stagnation check.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMemory<I> {
    history: Vec<I>,
}

impl<I> Default for TransitionMemory<I> {
    fn default() -> Self {
        Self {
            history: Vec::new(),
        }
    }
}

impl<I: Input> TransitionMemory<I> {
    /// Number of inputs seen so far.
    pub fn experience(&self) -> usize {
        self.history.len()
    }
}

impl<I: Input> Cortex for TransitionMemory<I> {
    type Input = I;

    fn feed(&mut self, input: &I) {
        self.history.push(input.clone());
    }

    fn predict(&self) -> I {
        let Some((last, earlier)) = self.history.split_last() else {
            return I::default();
        };
        let Some(position) = earlier.iter().rposition(|input| input == last) else {
            return I::default();
        };
        refractory_mask(self.history[position + 1].clone(), last)
    }
}

/// Masks every channel that spikes in `last` out of `predicted`.
fn refractory_mask<I: Input>(mut predicted: I, last: &I) -> I {
    for channel in 0..I::WIDTH {
        if last.spike(channel) {
            predicted.set_spike(channel, false);
        }
    }
    predicted
}

/// Inputs a [`Patient`] must see before it starts recalling.
pub const PATIENCE: usize = 30;

/// A transition memory that predicts silence until it has seen
/// [`PATIENCE`] inputs. Prior experience shortens adaptation, so its
/// adaptation time always depends on its state.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient<I> {
    memory: TransitionMemory<I>,
}

impl<I> Default for Patient<I> {
    fn default() -> Self {
        Self {
            memory: TransitionMemory::default(),
        }
    }
}

impl<I: Input> Cortex for Patient<I> {
    type Input = I;

    fn feed(&mut self, input: &I) {
        self.memory.feed(input);
    }

    fn predict(&self) -> I {
        if self.memory.experience() < PATIENCE {
            I::default()
        } else {
            self.memory.predict()
        }
    }
}

/// Predicts the most frequent successor of the current input, ties going
/// to the one seen first. One disruption cannot outvote a learned habit.
/// Channels spiking in the current input are never predicted.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally<I> {
    history: Vec<I>,
}

impl<I> Default for Tally<I> {
    fn default() -> Self {
        Self {
            history: Vec::new(),
        }
    }
}

impl<I: Input> Cortex for Tally<I> {
    type Input = I;

    fn feed(&mut self, input: &I) {
        self.history.push(input.clone());
    }

    fn predict(&self) -> I {
        let Some(last) = self.history.last() else {
            return I::default();
        };
        // Successors in first-seen order.
        let mut counts: Vec<(&I, usize)> = Vec::new();
        for pair in self.history.windows(2) {
            if &pair[0] != last {
                continue;
            }
            match counts.iter_mut().find(|(seen, _)| *seen == &pair[1]) {
                Some((_, count)) => *count += 1,
                None => counts.push((&pair[1], 1)),
            }
        }
        let predicted = counts
            .iter()
            .rev()
            .max_by_key(|(_, count)| *count)
            .map_or_else(I::default, |(successor, _)| (*successor).clone());
        refractory_mask(predicted, last)
    }
}

/// A transition memory with room for `CAPACITY` inputs.
///
/// Transitions are stored only while fewer than `CAPACITY` inputs have been
/// seen; afterwards the model keeps counting inputs and keeps recalling,
/// but learns nothing new. A blank model learns one circular pattern of
/// up to `CAPACITY - 1` inputs and is then frozen, so it stagnates.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounded<I, const CAPACITY: usize> {
    transitions: Vec<(I, I)>,
    last: Option<I>,
    seen: usize,
}

impl<I, const CAPACITY: usize> Default for Bounded<I, CAPACITY> {
    fn default() -> Self {
        Self {
            transitions: Vec::new(),
            last: None,
            seen: 0,
        }
    }
}

impl<I: Input, const CAPACITY: usize> Bounded<I, CAPACITY> {
    /// Number of inputs seen so far, learned from or not.
    pub const fn experience(&self) -> usize {
        self.seen
    }

    /// True once the model stopped learning.
    pub const fn is_full(&self) -> bool {
        self.seen >= CAPACITY
    }
}

impl<I: Input, const CAPACITY: usize> Cortex for Bounded<I, CAPACITY> {
    type Input = I;

    fn feed(&mut self, input: &I) {
        if let Some(last) = self.last.take() {
            if self.seen < CAPACITY {
                self.transitions.push((last, input.clone()));
            }
        }
        self.last = Some(input.clone());
        self.seen += 1;
    }

    fn predict(&self) -> I {
        let Some(last) = &self.last else {
            return I::default();
        };
        self.transitions
            .iter()
            .rev()
            .find(|(from, _)| from == last)
            .map_or_else(I::default, |(_, to)| refractory_mask(to.clone(), last))
    }
}

/// Never learns anything: counts its inputs and always predicts silence.
#[derive(Debug, Clone, PartialEq)]
pub struct Amnesiac<I> {
    seen: u64,
    _input: std::marker::PhantomData<I>,
}

impl<I> Default for Amnesiac<I> {
    fn default() -> Self {
        Self {
            seen: 0,
            _input: std::marker::PhantomData,
        }
    }
}

impl<I: Input> Cortex for Amnesiac<I> {
    type Input = I;

    fn feed(&mut self, _input: &I) {
        self.seen += 1;
    }

    fn predict(&self) -> I {
        I::default()
    }
}
