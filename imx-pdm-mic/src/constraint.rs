//! Hardware capability constraints.
//!
//! The PDM path can only produce a handful of rates, channel counts and
//! sample containers. These tables are published into the stream's
//! negotiation layer at startup, before any hw_params are chosen.
//!
//! | Parameter | Legal values |
//! |-----------|--------------|
//! | Rate (Hz) | 8000, 11025, 16000, 22050, 32000, 44100, 48000, 64000 |
//! | Channels  | 1, 2, 4, 6, 8 |
//! | Format    | `DSD_U8`, `DSD_U16_LE`, `DSD_U32_LE` |

/// Sample rates the PDM front-end can be negotiated to.
///
/// Every entry lies in one of the mclk bands of [`crate::clock`].
pub static RATES: [u32; 8] = [8_000, 11_025, 16_000, 22_050, 32_000, 44_100, 48_000, 64_000];

/// Channel counts the SAI can capture in PDM mode.
pub static CHANNELS: [u32; 5] = [1, 2, 4, 6, 8];

/// Sample formats carrying raw 1-bit PDM data.
pub static FORMATS: FormatMask = FormatMask::EMPTY
    .with(SampleFormat::DsdU8)
    .with(SampleFormat::DsdU16Le)
    .with(SampleFormat::DsdU32Le);

/// A negotiable hardware parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HwParam {
    Rate,
    Channels,
    Format,
}

impl HwParam {
    /// Lower-case name used in log and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            HwParam::Rate => "rate",
            HwParam::Channels => "channels",
            HwParam::Format => "format",
        }
    }
}

/// DSD sample containers, numbered as in ALSA's `snd_pcm_format_t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleFormat {
    /// 8 one-bit samples per byte.
    DsdU8 = 48,
    /// 16 one-bit samples, little-endian.
    DsdU16Le = 49,
    /// 32 one-bit samples, little-endian.
    DsdU32Le = 50,
}

impl SampleFormat {
    /// All formats in ascending index order.
    pub const ALL: [SampleFormat; 3] =
        [SampleFormat::DsdU8, SampleFormat::DsdU16Le, SampleFormat::DsdU32Le];

    /// Format index (bit position in a [`FormatMask`]).
    pub const fn index(self) -> u32 {
        self as u32
    }

    /// Container width in bits.
    pub const fn width(self) -> u32 {
        match self {
            SampleFormat::DsdU8 => 8,
            SampleFormat::DsdU16Le => 16,
            SampleFormat::DsdU32Le => 32,
        }
    }
}

/// 64-bit format mask, one bit per format index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FormatMask(u64);

impl FormatMask {
    /// No formats allowed.
    pub const EMPTY: FormatMask = FormatMask(0);

    /// Every format allowed.
    pub const ANY: FormatMask = FormatMask(u64::MAX);

    /// Build a mask from raw bits.
    pub const fn from_bits(bits: u64) -> Self {
        FormatMask(bits)
    }

    /// Raw mask bits.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// This mask with `format` added.
    pub const fn with(self, format: SampleFormat) -> Self {
        FormatMask(self.0 | (1 << format.index()))
    }

    /// Whether `format` is allowed.
    pub const fn contains(self, format: SampleFormat) -> bool {
        self.0 & (1 << format.index()) != 0
    }

    /// Intersection of two masks.
    pub const fn intersect(self, other: FormatMask) -> Self {
        FormatMask(self.0 & other.0)
    }

    /// Whether no format is allowed.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// The stream runtime's constraint-installation interface.
///
/// Implemented by whatever owns hw_params negotiation for a stream (the
/// audio subsystem, or [`HwParamSpace`](crate::hw_params::HwParamSpace) in
/// software). Lists are `'static` so they can be retained without copying.
pub trait HwConstraints {
    /// Error type for constraint installation.
    type Error;

    /// Restrict `param` to the values in `list`.
    fn constrain_list(&mut self, param: HwParam, list: &'static [u32]) -> Result<(), Self::Error>;

    /// Restrict the format parameter to the formats set in `mask`.
    fn constrain_mask64(&mut self, param: HwParam, mask: FormatMask) -> Result<(), Self::Error>;
}

/// Install the legal rate list.
pub fn install_rate_constraint<R: HwConstraints>(runtime: &mut R) -> Result<(), R::Error> {
    runtime.constrain_list(HwParam::Rate, &RATES)
}

/// Install the legal channel-count list.
pub fn install_channel_constraint<R: HwConstraints>(runtime: &mut R) -> Result<(), R::Error> {
    runtime.constrain_list(HwParam::Channels, &CHANNELS)
}

/// Install the DSD format mask.
pub fn install_format_constraint<R: HwConstraints>(runtime: &mut R) -> Result<(), R::Error> {
    runtime.constrain_mask64(HwParam::Format, FORMATS)
}
