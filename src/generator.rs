//! Random input and sequence construction under the refractory rule.
//!
//! The generator owns its randomness source, so a run seeded with the same
//! value replays the same sequences.

use crate::input::Input;
use crate::sequence::Sequence;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Builds random inputs and sequences that respect the refractory rule.
#[derive(Debug, Clone)]
pub struct SequenceGenerator<R = StdRng> {
    rng: R,
}

impl SequenceGenerator<StdRng> {
    /// Creates a generator with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Creates a generator seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> SequenceGenerator<R> {
    /// Wraps an existing randomness source.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns an input whose channels spike with probability one half,
    /// except channels that spike in any of `off`, which stay silent.
    pub fn random_input<I: Input>(&mut self, off: &[&I]) -> I {
        let mut input = I::default();
        for channel in 0..I::WIDTH {
            if off.iter().any(|blocker| blocker.spike(channel)) {
                continue;
            }
            input.set_spike(channel, self.rng.gen_bool(0.5));
        }
        input
    }

    /// Returns an input with exactly one spiking channel.
    pub fn random_spike<I: Input>(&mut self) -> I {
        let mut input = I::default();
        if I::WIDTH > 0 {
            input.set_spike(self.rng.gen_range(0..I::WIDTH), true);
        }
        input
    }

    /// A random sequence of `len` inputs.
    ///
    /// The first input is unconstrained; every later input is silent on the
    /// channels its predecessor spiked on.
    pub fn random<I: Input>(&mut self, len: usize) -> Sequence<I> {
        let mut sequence = Sequence::with_capacity(len);
        if len == 0 {
            return sequence;
        }
        sequence.push(self.random_input::<I>(&[]));
        while sequence.len() < len {
            let next = self.random_input(&[&sequence[sequence.len() - 1]]);
            sequence.push(next);
        }
        sequence
    }

    /// A random sequence whose refractory rule also holds from the last
    /// input back to the first, so it can be replayed back to back.
    ///
    /// Lengths below two yield `len` empty inputs.
    pub fn circular_random<I: Input>(&mut self, len: usize) -> Sequence<I> {
        if len < 2 {
            return Sequence::silent(len);
        }
        let mut sequence = self.random::<I>(len);
        sequence.pop();
        let closing = self.random_input(&[&sequence[sequence.len() - 1], &sequence[0]]);
        sequence.push(closing);
        sequence
    }

    /// A circular random sequence with at least one spike.
    ///
    /// Returns `None` for lengths below two, where the circular construction
    /// only ever produces silence.
    pub fn nontrivial_circular_random<I: Input>(&mut self, len: usize) -> Option<Sequence<I>> {
        if len < 2 || I::WIDTH == 0 {
            return None;
        }
        loop {
            let sequence = self.circular_random::<I>(len);
            if !sequence.is_trivial() {
                return Some(sequence);
            }
        }
    }

    /// Silence followed by a single input in which every channel spikes.
    ///
    /// The smallest pattern that is still worth predicting.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn trivial<I: Input>(&self, len: usize) -> Sequence<I> {
        let mut sequence = Sequence::silent(len);
        if let Some(last) = sequence.last_mut() {
            *last = I::default().complement();
        }
        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{respects_refractory, CanonicalInput, Spikes};

    #[test]
    fn seeded_generators_agree() {
        let mut a = SequenceGenerator::seeded(7);
        let mut b = SequenceGenerator::seeded(7);
        assert_eq!(
            a.random::<CanonicalInput>(32),
            b.random::<CanonicalInput>(32)
        );
    }

    #[test]
    fn random_input_respects_blockers() {
        let mut gen = SequenceGenerator::seeded(1);
        let blocker: Spikes<8> = "10101010".parse().unwrap();
        for _ in 0..200 {
            let input: Spikes<8> = gen.random_input(&[&blocker]);
            assert!(respects_refractory(&blocker, &input));
        }
    }

    #[test]
    fn random_spike_sets_one_channel() {
        let mut gen = SequenceGenerator::seeded(3);
        for _ in 0..50 {
            let spike: CanonicalInput = gen.random_spike();
            assert_eq!(spike.spike_count(), 1);
        }
    }

    #[test]
    fn lengths_are_exact() {
        let mut gen = SequenceGenerator::seeded(11);
        for len in 0..12 {
            assert_eq!(gen.random::<CanonicalInput>(len).len(), len);
            assert_eq!(gen.circular_random::<CanonicalInput>(len).len(), len);
            assert_eq!(gen.trivial::<CanonicalInput>(len).len(), len);
        }
    }

    #[test]
    fn short_circular_sequences_are_silent() {
        let mut gen = SequenceGenerator::seeded(5);
        assert!(gen.circular_random::<CanonicalInput>(0).is_empty());
        let one = gen.circular_random::<CanonicalInput>(1);
        assert_eq!(one.len(), 1);
        assert!(one.is_trivial());
        assert!(gen.nontrivial_circular_random::<CanonicalInput>(1).is_none());
    }

    #[test]
    fn trivial_ends_with_every_channel_spiking() {
        let gen = SequenceGenerator::seeded(0);
        let seq = gen.trivial::<Spikes<3>>(3);
        assert_eq!(seq[0], Spikes::empty());
        assert_eq!(seq[1], Spikes::empty());
        assert_eq!(seq[2], Spikes::full());
        assert!(seq.is_circular_refractory());
    }

    #[test]
    fn nontrivial_circular_sequences_spike() {
        let mut gen = SequenceGenerator::seeded(9);
        for _ in 0..20 {
            let seq = gen
                .nontrivial_circular_random::<Spikes<2>>(2)
                .expect("length two is supported");
            assert!(!seq.is_trivial());
            assert!(seq.is_circular_refractory());
        }
    }
}
