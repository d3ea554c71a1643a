//! The model contract and the adapter that drives it.
//!
//! A model under test is anything implementing [`Cortex`]. The testbed never
//! inspects its state: it only feeds inputs, asks for predictions, compares
//! instances with the model's own `PartialEq`, and clones them. [`Adapter`]
//! layers the adaptation primitives on top of that surface without adding
//! any state of its own.

use crate::input::Input;
use crate::sequence::Sequence;

/// A stateful next-input predictor.
///
/// `Default` must produce a blank model, and `PartialEq` is the only
/// introspection the testbed performs.
pub trait Cortex: Default + Clone + PartialEq {
    /// The input type consumed and predicted.
    type Input: Input;

    /// Consumes one input, updating internal state.
    fn feed(&mut self, input: &Self::Input);

    /// The model's belief about the next input. Must not change state.
    fn predict(&self) -> Self::Input;
}

/// Transparent wrapper exposing the adaptation primitives for a [`Cortex`].
///
/// Equality, cloning and default construction are exactly those of the
/// wrapped model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Adapter<C> {
    cortex: C,
}

impl<C: Cortex> Adapter<C> {
    /// A blank model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing model.
    pub const fn from_inner(cortex: C) -> Self {
        Self { cortex }
    }

    /// The wrapped model.
    pub const fn inner(&self) -> &C {
        &self.cortex
    }

    /// Unwraps the model.
    pub fn into_inner(self) -> C {
        self.cortex
    }

    /// The model's current prediction.
    pub fn predict(&self) -> C::Input {
        self.cortex.predict()
    }

    /// Feeds a single input.
    pub fn feed(&mut self, input: &C::Input) -> &mut Self {
        self.cortex.feed(input);
        self
    }

    /// Feeds every input in order, left to right.
    pub fn feed_all<'a, T>(&mut self, inputs: T) -> &mut Self
    where
        T: IntoIterator<Item = &'a C::Input>,
        C::Input: 'a,
    {
        for input in inputs {
            self.cortex.feed(input);
        }
        self
    }

    /// Feeds `inputs` and returns, for each one, the prediction made just
    /// before it was fed.
    pub fn predict_while_feeding(&mut self, inputs: &Sequence<C::Input>) -> Sequence<C::Input> {
        let mut predictions = Sequence::with_capacity(inputs.len());
        for input in inputs {
            predictions.push(self.cortex.predict());
            self.cortex.feed(input);
        }
        predictions
    }

    /// Replays `inputs` from the start until one full pass is predicted
    /// perfectly.
    ///
    /// Time advances by `inputs.len()` per pass. Returns the time at which the
    /// perfect pass started, or `max_time` if no pass starting before
    /// `max_time` was perfect.
    pub fn time_to_repeat(&mut self, inputs: &Sequence<C::Input>, max_time: usize) -> usize {
        if inputs.is_empty() {
            return 0;
        }
        let mut time = 0;
        while time < max_time {
            if self.predict_while_feeding(inputs) == *inputs {
                return time;
            }
            time += inputs.len();
        }
        max_time
    }

    /// True if `inputs` is learned before `max_time`.
    pub fn adapt(&mut self, inputs: &Sequence<C::Input>, max_time: usize) -> bool {
        self.time_to_repeat(inputs, max_time) < max_time
    }

    /// Rolls the model forward on its own predictions for `timeframe` steps
    /// and returns them.
    pub fn behaviour(&mut self, timeframe: usize) -> Sequence<C::Input> {
        let mut predictions = Sequence::with_capacity(timeframe);
        for _ in 0..timeframe {
            let prediction = self.cortex.predict();
            self.cortex.feed(&prediction);
            predictions.push(prediction);
        }
        predictions
    }
}

impl<C: Cortex> From<C> for Adapter<C> {
    fn from(cortex: C) -> Self {
        Self::from_inner(cortex)
    }
}
