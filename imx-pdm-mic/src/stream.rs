//! Stream lifecycle: startup, hw_params, shutdown.
//!
//! ```text
//!            startup            hw_params
//!  Closed ──────────► Started ───────────► Configured
//!    ▲                  ▲  │  ◄─────────────  │  │
//!    │                  │  │  hw_params fails │  │ hw_params (new rate)
//!    └──── shutdown ────┴──┴──────────────────┘  └──►
//! ```
//!
//! The audio subsystem serializes these calls per stream and always calls
//! [`startup`] before [`hw_params`]. The session is passed in explicitly.

use crate::clock::mclk_freq;
use crate::constraint::{
    install_channel_constraint, install_format_constraint, install_rate_constraint,
    HwConstraints, HwParam,
};
use crate::dai::{ClockDirection, ClockId, CpuDai, DaiFormat};
use crate::error::{HwParamsError, StartupError};
use crate::hw_params::HwParams;
use crate::session::{StreamSession, StreamState};

/// Open the stream: publish rate, channel and format constraints in that
/// order.
///
/// Stops at the first rejected constraint and leaves the session
/// [`Closed`](StreamState::Closed). Re-running startup on an open stream
/// re-installs the constraints and discards any previous configuration.
pub fn startup<D, R>(
    session: &mut StreamSession<D>,
    runtime: &mut R,
) -> Result<(), StartupError<R::Error>>
where
    D: CpuDai,
    R: HwConstraints,
{
    session.set_state(StreamState::Closed);

    install_rate_constraint(runtime).map_err(|cause| constraint_failed(HwParam::Rate, cause))?;
    install_channel_constraint(runtime)
        .map_err(|cause| constraint_failed(HwParam::Channels, cause))?;
    install_format_constraint(runtime)
        .map_err(|cause| constraint_failed(HwParam::Format, cause))?;

    session.set_state(StreamState::Started);
    Ok(())
}

fn constraint_failed<E>(param: HwParam, cause: E) -> StartupError<E> {
    error!("fail to set pcm hw {} constraint", param.name());
    StartupError::Constraint { param, cause }
}

/// Commit negotiated parameters to the controller.
///
/// Only the rate matters for the clocks; channel count and format are
/// handled by the controller's own hw_params.
pub fn hw_params<D: CpuDai>(
    session: &mut StreamSession<D>,
    params: &HwParams,
) -> Result<(), HwParamsError<D::Error>> {
    commit_rate(session, params.rate)
}

/// Program the controller for `rate`.
///
/// 1. DAI format: PDM, normal polarity, controller provides both clocks.
/// 2. Bit-clock ratio: the decimation factor.
/// 3. Resolve mclk for `rate`.
/// 4. Drive the resolved mclk out on MCLK1.
///
/// The first failing step aborts the rest. On failure the session drops back
/// to [`Started`](StreamState::Started) and its mclk is cleared.
pub fn commit_rate<D: CpuDai>(
    session: &mut StreamSession<D>,
    rate: u32,
) -> Result<(), HwParamsError<D::Error>> {
    if session.state() == StreamState::Closed {
        error!("hw_params on a stream that was not started");
        return Err(HwParamsError::NotStarted);
    }
    // Any failure below must not leave a stale mclk behind.
    session.set_state(StreamState::Started);

    let decimation = session.decimation();
    let dai = session.dai_mut();

    dai.set_fmt(DaiFormat::PDM_CAPTURE).map_err(|e| {
        error!("fail to set cpu dai fmt");
        HwParamsError::Format(e)
    })?;

    dai.set_bclk_ratio(decimation.get()).map_err(|e| {
        error!("fail to set cpu bclk ratio {}", decimation.get());
        HwParamsError::BclkRatio(e)
    })?;

    let mclk = mclk_freq(decimation, rate).ok_or_else(|| {
        error!("no mclk band for {} Hz", rate);
        HwParamsError::UnsupportedSampleRate(rate)
    })?;

    dai.set_sysclk(ClockId::Mclk1, mclk, ClockDirection::Out)
        .map_err(|e| {
            error!("fail to set cpu mclk1 rate: {}", mclk.raw());
            HwParamsError::Sysclk { mclk_hz: mclk.raw(), cause: e }
        })?;

    debug!("pdm stream at {} Hz, mclk {} Hz", rate, mclk.raw());
    session.set_configured(mclk);
    Ok(())
}

/// Close the stream. The microphone is passive, so only session state is
/// released.
pub fn shutdown<D: CpuDai>(session: &mut StreamSession<D>) {
    session.set_state(StreamState::Closed);
}
