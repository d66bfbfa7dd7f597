//! # imx-pdm-mic
//!
//! A `no_std`, allocation-free capture path for a PDM microphone wired to an
//! i.MX SAI controller. The microphone is a passive sigma-delta device with
//! no control bus; everything that has to be configured lives on the SAI.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Clock | [`clock`] | Decimation → mclk frequency per sample-rate band |
//! | Capability | [`constraint`] | Legal rates, channel counts and DSD formats |
//! | Negotiation | [`hw_params`] | Software refine step over installed constraints |
//! | Controller | [`dai`] | [`CpuDai`] trait the SAI driver implements |
//! | Stream | [`session`] / [`stream`] | Session state and startup/hw_params/shutdown |
//! | Binding | [`config`] / [`card`] / [`binding`] | Board properties, card registration, probe/remove |
//!
//! ## Quick start
//!
//! ```ignore
//! use imx_pdm_mic::{binding, stream, HwParamSpace, HwParams, SampleFormat};
//!
//! // Bind: reads `audio-cpu`, `decimation`, `model` and registers the card.
//! let mut card = binding::probe(&node, &mut platform, &mut registry)?;
//!
//! // Open: publish constraints, negotiate, commit.
//! let mut space = HwParamSpace::new();
//! stream::startup(card.session_mut(), &mut space)?;
//! let params = space.refine(HwParams { rate: 16_000, channels: 2, format: SampleFormat::DsdU32Le })?;
//! stream::hw_params(card.session_mut(), &params)?;   // mclk = 16000 × decimation × 16
//!
//! // Close and unbind.
//! stream::shutdown(card.session_mut());
//! let sai = binding::remove(card, &mut registry);
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `defmt` | no | `defmt` logging and `defmt::Format` on public types |
//!
//! ## Clock bands
//!
//! | Rates (Hz) | mclk |
//! |------------|------|
//! | 8000..=11025 | rate × decimation × 8 |
//! | 16000..=64000 | rate × decimation × 16 |
//!
//! Every negotiable rate falls in a band. A rate outside both (e.g. 12 kHz,
//! reachable only through [`stream::commit_rate`]) is rejected with
//! [`HwParamsError::UnsupportedSampleRate`].

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod constants;
pub mod clock;
pub mod constraint;
pub mod hw_params;
pub mod dai;
pub mod error;
pub mod session;
pub mod stream;
pub mod config;
pub mod card;
pub mod binding;

pub use clock::{mclk_freq, Decimation};
pub use constraint::{FormatMask, HwConstraints, HwParam, SampleFormat};
pub use dai::{ClockDirection, ClockId, CpuDai, DaiFormat};
pub use error::{ConfigError, HwParamsError, Stage, StartupError};
pub use hw_params::{HwParamSpace, HwParams};
pub use session::{StreamSession, StreamState};
