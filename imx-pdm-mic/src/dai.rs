//! CPU-side digital audio interface (the SAI controller).
//!
//! The PDM capture path only needs three things from the controller: a frame
//! format, a bit-clock ratio, and an mclk output at a given frequency.
//! [`CpuDai`] is the seam a SAI driver implements to provide them.

use fugit::HertzU64;

/// Serial frame format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameFormat {
    I2s = 1,
    RightJ = 2,
    LeftJ = 3,
    DspA = 4,
    DspB = 5,
    Ac97 = 6,
    Pdm = 7,
}

/// Bit-clock / frame-clock polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockInversion {
    /// Normal bit clock, normal frame.
    NormalBitNormalFrame = 0,
    /// Normal bit clock, inverted frame.
    NormalBitInvertedFrame = 2,
    /// Inverted bit clock, normal frame.
    InvertedBitNormalFrame = 3,
    /// Inverted bit clock, inverted frame.
    InvertedBitInvertedFrame = 4,
}

/// Which side provides bit clock and frame sync, seen from the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockProvider {
    /// Codec provides both clocks.
    CodecBoth = 1,
    /// Codec provides frame sync only.
    CodecFrame = 2,
    /// Codec provides bit clock only.
    CodecBit = 3,
    /// Controller (CPU DAI) provides both clocks.
    CpuBoth = 4,
}

/// Complete DAI format word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DaiFormat {
    pub frame: FrameFormat,
    pub inversion: ClockInversion,
    pub provider: ClockProvider,
}

impl DaiFormat {
    /// PDM, normal polarity, controller clocks the microphone.
    pub const PDM_CAPTURE: DaiFormat = DaiFormat {
        frame: FrameFormat::Pdm,
        inversion: ClockInversion::NormalBitNormalFrame,
        provider: ClockProvider::CpuBoth,
    };

    /// Packed ALSA `SND_SOC_DAIFMT_*` encoding.
    /// - Bits 3:0: frame format
    /// - Bits 11:8: clock inversion
    /// - Bits 15:12: clock provider
    pub const fn bits(self) -> u32 {
        (self.frame as u32) | ((self.inversion as u32) << 8) | ((self.provider as u32) << 12)
    }
}

/// SAI clock lines selectable through `set_sysclk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockId {
    /// Bus clock.
    Bus = 0,
    /// Master clock 1 (the line routed to the microphone).
    Mclk1 = 1,
    Mclk2 = 2,
    Mclk3 = 3,
}

/// Direction of a sysclk relative to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDirection {
    In,
    Out,
}

/// Controller operations used by the PDM stream.
pub trait CpuDai {
    /// Error type for controller programming.
    type Error;

    /// Device name of the controller; used as the cpu DAI name in the link.
    fn name(&self) -> &str;

    /// Program the frame format, clock polarity and clock provider.
    fn set_fmt(&mut self, fmt: DaiFormat) -> Result<(), Self::Error>;

    /// Set the bit-clock to sample-rate ratio.
    fn set_bclk_ratio(&mut self, ratio: u32) -> Result<(), Self::Error>;

    /// Configure clock line `clk_id` at `freq`.
    fn set_sysclk(
        &mut self,
        clk_id: ClockId,
        freq: HertzU64,
        dir: ClockDirection,
    ) -> Result<(), Self::Error>;
}

impl<T: CpuDai + ?Sized> CpuDai for &mut T {
    type Error = T::Error;

    fn name(&self) -> &str {
        T::name(self)
    }

    fn set_fmt(&mut self, fmt: DaiFormat) -> Result<(), Self::Error> {
        T::set_fmt(self, fmt)
    }

    fn set_bclk_ratio(&mut self, ratio: u32) -> Result<(), Self::Error> {
        T::set_bclk_ratio(self, ratio)
    }

    fn set_sysclk(
        &mut self,
        clk_id: ClockId,
        freq: HertzU64,
        dir: ClockDirection,
    ) -> Result<(), Self::Error> {
        T::set_sysclk(self, clk_id, freq, dir)
    }
}
