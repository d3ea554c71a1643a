//! The observation contract.
//!
//! An input is one time step of a multi-channel spiking signal: a fixed-width
//! vector of boolean flags. The testbed never looks inside a model, but it
//! does build and compare inputs, so every input type must expose its
//! channels through the [`Input`] trait.
//!
//! # Refractory rule
//!
//! A channel that spikes at time `t` must be silent at time `t + 1`. All
//! generated sequences obey this rule; see [`respects_refractory`].

use std::fmt;
use std::ops::Not;
use std::str::FromStr;

/// Fixed-width binary input consumed and produced by a model.
///
/// `Default` must yield the empty input (no spikes).
pub trait Input: Clone + Default + PartialEq + fmt::Debug {
    /// Number of channels. Constant for the type.
    const WIDTH: usize;

    /// Returns whether `channel` spikes.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `channel >= Self::WIDTH`.
    fn spike(&self, channel: usize) -> bool;

    /// Sets or clears the spike on `channel`.
    fn set_spike(&mut self, channel: usize, spike: bool);

    /// Returns the input with every channel flipped.
    #[must_use]
    fn complement(&self) -> Self {
        let mut flipped = Self::default();
        for channel in 0..Self::WIDTH {
            flipped.set_spike(channel, !self.spike(channel));
        }
        flipped
    }

    /// Returns true when no channel spikes.
    fn is_empty(&self) -> bool {
        (0..Self::WIDTH).all(|channel| !self.spike(channel))
    }

    /// Number of spiking channels.
    fn spike_count(&self) -> usize {
        (0..Self::WIDTH).filter(|&channel| self.spike(channel)).count()
    }

    /// Number of channels on which `self` and `other` agree.
    fn count_matches(&self, other: &Self) -> usize {
        (0..Self::WIDTH)
            .filter(|&channel| self.spike(channel) == other.spike(channel))
            .count()
    }
}

/// Returns true if `next` may directly follow `prev`.
pub fn respects_refractory<I: Input>(prev: &I, next: &I) -> bool {
    (0..I::WIDTH).all(|channel| !(prev.spike(channel) && next.spike(channel)))
}

/// Width used by the reference configuration.
pub const CANONICAL_WIDTH: usize = 10;

/// Input of the canonical width.
pub type CanonicalInput = Spikes<CANONICAL_WIDTH>;

/// A plain array-backed [`Input`].
///
/// Renders and parses as a bit string with channel 0 first, so
/// `"100".parse::<Spikes<3>>()` spikes on channel 0 only.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spikes<const W: usize> {
    channels: [bool; W],
}

impl<const W: usize> Spikes<W> {
    /// The empty input.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            channels: [false; W],
        }
    }

    /// Every channel spikes.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            channels: [true; W],
        }
    }

    /// Builds an input from explicit channel flags.
    #[must_use]
    pub const fn from_channels(channels: [bool; W]) -> Self {
        Self { channels }
    }

    /// Channel flags in order.
    #[must_use]
    pub const fn channels(&self) -> &[bool; W] {
        &self.channels
    }
}

impl<const W: usize> Default for Spikes<W> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const W: usize> Input for Spikes<W> {
    const WIDTH: usize = W;

    fn spike(&self, channel: usize) -> bool {
        self.channels[channel]
    }

    fn set_spike(&mut self, channel: usize, spike: bool) {
        self.channels[channel] = spike;
    }

    fn complement(&self) -> Self {
        let mut channels = self.channels;
        for flag in &mut channels {
            *flag = !*flag;
        }
        Self { channels }
    }
}

impl<const W: usize> Not for Spikes<W> {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.complement()
    }
}

impl<const W: usize> fmt::Display for Spikes<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &flag in &self.channels {
            f.write_str(if flag { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl<const W: usize> fmt::Debug for Spikes<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Spikes({self})")
    }
}

/// Error returned when parsing a [`Spikes`] bit string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseSpikesError {
    /// The string does not have exactly `expected` characters.
    Width {
        /// Required width.
        expected: usize,
        /// Characters found.
        found: usize,
    },
    /// A character other than `0` or `1`.
    InvalidChar(char),
}

impl fmt::Display for ParseSpikesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width { expected, found } => {
                write!(f, "expected {expected} channels, found {found}")
            }
            Self::InvalidChar(c) => write!(f, "invalid channel flag {c:?}"),
        }
    }
}

impl std::error::Error for ParseSpikesError {}

impl<const W: usize> FromStr for Spikes<W> {
    type Err = ParseSpikesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let found = s.chars().count();
        if found != W {
            return Err(ParseSpikesError::Width { expected: W, found });
        }
        let mut channels = [false; W];
        for (flag, c) in channels.iter_mut().zip(s.chars()) {
            *flag = match c {
                '0' => false,
                '1' => true,
                other => return Err(ParseSpikesError::InvalidChar(other)),
            };
        }
        Ok(Self { channels })
    }
}
