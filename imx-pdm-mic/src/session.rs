//! Per-device capture stream state.

use fugit::HertzU64;

use crate::clock::Decimation;
use crate::dai::CpuDai;

/// Lifecycle state of a [`StreamSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamState {
    /// No stream open.
    #[default]
    Closed,
    /// Constraints installed; waiting for hw_params.
    Started,
    /// Format, bit-clock ratio and mclk programmed.
    Configured,
}

/// One capture stream between the SAI controller and the PDM microphone.
///
/// Owns the controller for the lifetime of the binding. The mclk frequency
/// is only set while the stream is [`Configured`](StreamState::Configured).
pub struct StreamSession<D> {
    dai: D,
    decimation: Decimation,
    mclk: Option<HertzU64>,
    state: StreamState,
}

impl<D: CpuDai> StreamSession<D> {
    /// Create a closed session driving `dai`.
    pub fn new(dai: D, decimation: Decimation) -> Self {
        Self {
            dai,
            decimation,
            mclk: None,
            state: StreamState::Closed,
        }
    }

    /// Microphone decimation factor (also the bit-clock ratio).
    pub fn decimation(&self) -> Decimation {
        self.decimation
    }

    /// Mclk programmed by the last successful hw_params.
    pub fn mclk(&self) -> Option<HertzU64> {
        self.mclk
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Always `true`: the PDM link has no playback direction.
    pub const fn capture_only(&self) -> bool {
        true
    }

    /// Borrow the controller.
    pub fn dai(&self) -> &D {
        &self.dai
    }

    /// Consume the session and return the controller.
    pub fn release(self) -> D {
        self.dai
    }

    pub(crate) fn dai_mut(&mut self) -> &mut D {
        &mut self.dai
    }

    pub(crate) fn set_state(&mut self, state: StreamState) {
        if state != StreamState::Configured {
            self.mclk = None;
        }
        self.state = state;
    }

    pub(crate) fn set_configured(&mut self, mclk: HertzU64) {
        self.mclk = Some(mclk);
        self.state = StreamState::Configured;
    }
}
