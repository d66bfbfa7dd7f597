//! Master clock derivation.
//!
//! The PDM front-end runs its modulator at `rate × decimation`, and the SAI
//! needs an mclk that is a further multiple of that: ×8 in the low-power
//! band, ×16 in the performance band. Rates outside both bands have no
//! mclk mapping.
//!
//! ```
//! use imx_pdm_mic::clock::{mclk_freq, Decimation};
//!
//! let d = Decimation::new(64).unwrap();
//! assert_eq!(mclk_freq(d, 16_000).unwrap().raw(), 16_384_000);
//! assert_eq!(mclk_freq(d, 22_050).unwrap().raw(), 22_050 * 64 * 16);
//! assert!(mclk_freq(d, 12_000).is_none());
//! ```

use core::num::NonZeroU32;

use fugit::HertzU64;

/// Oversampling ratio of the microphone's sigma-delta modulator.
///
/// Fixed by the board design; zero is not a valid decimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Decimation(NonZeroU32);

impl Decimation {
    /// Wrap a raw decimation value. Returns `None` for zero.
    pub const fn new(value: u32) -> Option<Self> {
        match NonZeroU32::new(value) {
            Some(v) => Some(Decimation(v)),
            None => None,
        }
    }

    /// The raw factor.
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

/// A closed sample-rate interval paired with its mclk oversampling multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FsBand {
    /// Lowest rate in the band (Hz, inclusive).
    pub min: u32,
    /// Highest rate in the band (Hz, inclusive).
    pub max: u32,
    /// Multiplier applied on top of `rate × decimation`.
    pub mul: u32,
}

impl FsBand {
    /// Whether `rate` lies inside `[min, max]`.
    pub const fn contains(&self, rate: u32) -> bool {
        rate >= self.min && rate <= self.max
    }
}

/// Low-power band: 8 kHz to 11.025 kHz, ×8.
pub const LOW_POWER: FsBand = FsBand { min: 8_000, max: 11_025, mul: 8 };

/// Performance band: 16 kHz to 64 kHz, ×16.
pub const PERFORMANCE: FsBand = FsBand { min: 16_000, max: 64_000, mul: 16 };

/// Bands in lookup order.
pub static FS_BANDS: [FsBand; 2] = [LOW_POWER, PERFORMANCE];

/// Find the band serving `rate`, if any.
pub fn band_for(rate: u32) -> Option<&'static FsBand> {
    FS_BANDS.iter().find(|band| band.contains(rate))
}

/// Compute the mclk frequency for `rate` at the given decimation.
///
/// Returns `None` when `rate` falls outside every band. The product is
/// formed in 64 bits: `u32::MAX × u32::MAX × 16` would overflow, but a rate
/// inside a band is at most 64 000, which leaves ample headroom for any
/// `u32` decimation.
pub fn mclk_freq(decimation: Decimation, rate: u32) -> Option<HertzU64> {
    let band = band_for(rate)?;
    let hz = u64::from(rate) * u64::from(decimation.get()) * u64::from(band.mul);
    Some(HertzU64::from_raw(hz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(v: u32) -> Decimation {
        Decimation::new(v).unwrap()
    }

    #[test]
    fn decimation_rejects_zero() {
        assert!(Decimation::new(0).is_none());
        assert_eq!(Decimation::new(64).map(Decimation::get), Some(64));
    }

    #[test]
    fn performance_band_16k() {
        // 16000 × 64 × 16
        assert_eq!(mclk_freq(dec(64), 16_000).unwrap().raw(), 16_384_000);
    }

    #[test]
    fn low_power_band_8k() {
        // 8000 × 64 × 8
        assert_eq!(mclk_freq(dec(64), 8_000).unwrap().raw(), 4_096_000);
    }

    #[test]
    fn rate_22050_uses_performance_band() {
        assert_eq!(band_for(22_050), Some(&PERFORMANCE));
        assert_eq!(mclk_freq(dec(32), 22_050).unwrap().raw(), 11_289_600);
    }

    #[test]
    fn gap_between_bands_is_unsupported() {
        assert!(band_for(12_000).is_none());
        assert!(mclk_freq(dec(32), 12_000).is_none());
        assert!(mclk_freq(dec(32), 96_000).is_none());
    }

    #[test]
    fn band_edges_are_inclusive() {
        assert_eq!(band_for(8_000), Some(&LOW_POWER));
        assert_eq!(band_for(11_025), Some(&LOW_POWER));
        assert_eq!(band_for(16_000), Some(&PERFORMANCE));
        assert_eq!(band_for(64_000), Some(&PERFORMANCE));

        assert!(band_for(7_999).is_none());
        assert!(band_for(11_026).is_none());
        assert!(band_for(15_999).is_none());
        assert!(band_for(64_001).is_none());
    }

    #[test]
    fn bands_do_not_overlap() {
        assert!(LOW_POWER.max < PERFORMANCE.min);
    }

    #[test]
    fn large_decimation_does_not_overflow() {
        let f = mclk_freq(dec(u32::MAX), 64_000).unwrap();
        assert_eq!(f.raw(), 64_000u64 * u32::MAX as u64 * 16);
    }

    proptest! {
        #[test]
        fn low_power_rates_use_x8(d in 1u32.., r in prop::sample::select(vec![8_000u32, 11_025])) {
            let f = mclk_freq(dec(d), r).unwrap();
            prop_assert_eq!(f.raw(), r as u64 * d as u64 * 8);
        }

        #[test]
        fn performance_rates_use_x16(
            d in 1u32..,
            r in prop::sample::select(vec![16_000u32, 22_050, 32_000, 44_100, 48_000, 64_000]),
        ) {
            let f = mclk_freq(dec(d), r).unwrap();
            prop_assert_eq!(f.raw(), r as u64 * d as u64 * 16);
        }

        #[test]
        fn mclk_is_deterministic(d in 1u32.., r in any::<u32>()) {
            let raw = |f: HertzU64| f.raw();
            prop_assert_eq!(mclk_freq(dec(d), r).map(raw), mclk_freq(dec(d), r).map(raw));
        }

        #[test]
        fn out_of_band_is_unsupported(d in 1u32.., r in any::<u32>()) {
            let inside = (8_000..=11_025).contains(&r) || (16_000..=64_000).contains(&r);
            prop_assert_eq!(mclk_freq(dec(d), r).is_some(), inside);
        }
    }
}
