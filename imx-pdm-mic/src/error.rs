//! Error types.
//!
//! Each operation has its own error enum, generic over the collaborator
//! error it can wrap. Nothing here is fatal beyond the single probe, startup
//! or hw_params call that produced it; no operation retries on its own.

use crate::constraint::HwParam;

/// Probe-time configuration errors. The card is never created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError<E> {
    /// `decimation` property absent or unreadable.
    #[error("missing decimation property")]
    MissingDecimation,
    /// `decimation` property is zero.
    #[error("decimation must be non-zero")]
    InvalidDecimation,
    /// `audio-cpu` phandle absent or invalid.
    #[error("cpu dai phandle missing or invalid")]
    MissingController,
    /// No controller device is bound to the `audio-cpu` node.
    #[error("fail to find SAI platform device")]
    ControllerNotFound,
    /// `model` property present but malformed.
    #[error("fail to find card model name")]
    InvalidCardName,
    /// The sound card could not be registered.
    #[error("snd soc register card failed: {0:?}")]
    Register(E),
}

/// Failure while publishing constraints at stream startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupError<E> {
    /// The negotiation layer rejected the constraint on `param`.
    #[error("fail to set pcm hw {} constraint: {cause:?}", .param.name())]
    Constraint { param: HwParam, cause: E },
}

impl<E> StartupError<E> {
    /// Parameter whose constraint failed.
    pub fn param(&self) -> HwParam {
        match self {
            StartupError::Constraint { param, .. } => *param,
        }
    }
}

/// Step of hw_params that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    /// The stream was not started.
    State,
    /// Programming the DAI format.
    Format,
    /// Programming the bit-clock ratio.
    BclkRatio,
    /// Resolving the mclk frequency.
    MclkResolve,
    /// Programming the mclk output.
    Mclk,
}

/// Failure while committing hw_params.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HwParamsError<E> {
    /// hw_params called before startup.
    #[error("stream not started")]
    NotStarted,
    /// The controller rejected the PDM format.
    #[error("fail to set cpu dai fmt: {0:?}")]
    Format(E),
    /// The controller rejected the bit-clock ratio.
    #[error("fail to set cpu bclk ratio: {0:?}")]
    BclkRatio(E),
    /// No mclk band covers the negotiated rate.
    #[error("unsupported sample rate: {0} Hz")]
    UnsupportedSampleRate(u32),
    /// The controller rejected the mclk frequency.
    #[error("fail to set cpu mclk1 rate {mclk_hz} Hz: {cause:?}")]
    Sysclk { mclk_hz: u64, cause: E },
}

impl<E> HwParamsError<E> {
    /// The step that failed.
    pub fn stage(&self) -> Stage {
        match self {
            HwParamsError::NotStarted => Stage::State,
            HwParamsError::Format(_) => Stage::Format,
            HwParamsError::BclkRatio(_) => Stage::BclkRatio,
            HwParamsError::UnsupportedSampleRate(_) => Stage::MclkResolve,
            HwParamsError::Sysclk { .. } => Stage::Mclk,
        }
    }
}
