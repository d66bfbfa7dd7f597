//! Software hw_params negotiation.
//!
//! [`HwParamSpace`] is an in-memory [`HwConstraints`] implementation that
//! refines a requested configuration against whatever constraints were
//! installed, the same way the audio subsystem narrows a stream's parameter
//! space before calling hw_params:
//!
//! - A requested rate or channel count that is legal is kept as-is.
//! - Otherwise the nearest legal value wins; on a tie the lower one.
//! - A requested format outside the mask falls back to the lowest-index
//!   format in the mask.
//!
//! Repeated installs narrow the space. A rate or channel count is legal only
//! if every installed list contains it, and format masks are intersected.
//! An install that would leave nothing legal is rejected and changes nothing.

use crate::constraint::{FormatMask, HwConstraints, HwParam, SampleFormat};

/// A fully negotiated stream configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HwParams {
    /// Sample rate in Hz.
    pub rate: u32,
    /// Interleaved channel count.
    pub channels: u32,
    /// Sample container.
    pub format: SampleFormat,
}

/// Errors from [`HwParamSpace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NegotiationError {
    /// A list constraint was installed on the format parameter, or a mask
    /// constraint on rate/channels.
    #[error("constraint kind does not apply to {}", .0.name())]
    WrongKind(HwParam),
    /// An installed list was empty.
    #[error("empty {} constraint", .0.name())]
    Empty(HwParam),
    /// Installed constraints leave no legal value.
    #[error("no legal {} remains", .0.name())]
    NoMatch(HwParam),
    /// More list constraints than a parameter can hold.
    #[error("too many {} constraints", .0.name())]
    Full(HwParam),
}

/// List constraints a single parameter can accumulate.
pub const MAX_LISTS: usize = 4;

/// The lists installed on one parameter. A value is legal only if every
/// list contains it.
#[derive(Debug, Clone, Copy, Default)]
struct ListConstraint {
    lists: [&'static [u32]; MAX_LISTS],
    len: usize,
}

impl ListConstraint {
    const fn new() -> Self {
        ListConstraint { lists: [&[]; MAX_LISTS], len: 0 }
    }

    fn installed(&self) -> &[&'static [u32]] {
        &self.lists[..self.len]
    }

    fn allows(&self, value: u32) -> bool {
        self.installed().iter().all(|list| list.contains(&value))
    }

    /// Values of the first list that survive every later one.
    fn legal(&self) -> impl Iterator<Item = u32> + '_ {
        self.installed()
            .first()
            .copied()
            .into_iter()
            .flat_map(|list| list.iter().copied())
            .filter(move |&v| self.allows(v))
    }

    fn push(&mut self, param: HwParam, list: &'static [u32]) -> Result<(), NegotiationError> {
        if self.len == MAX_LISTS {
            return Err(NegotiationError::Full(param));
        }
        if self.len > 0 && !list.iter().any(|&v| self.allows(v)) {
            return Err(NegotiationError::NoMatch(param));
        }
        self.lists[self.len] = list;
        self.len += 1;
        Ok(())
    }

    fn refine(&self, param: HwParam, requested: u32) -> Result<u32, NegotiationError> {
        if self.len == 0 {
            return Ok(requested);
        }
        nearest(self.legal(), requested).ok_or(NegotiationError::NoMatch(param))
    }
}

/// Negotiation state for one stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct HwParamSpace {
    rates: ListConstraint,
    channels: ListConstraint,
    formats: Option<FormatMask>,
}

impl HwParamSpace {
    /// An unconstrained parameter space.
    pub const fn new() -> Self {
        HwParamSpace {
            rates: ListConstraint::new(),
            channels: ListConstraint::new(),
            formats: None,
        }
    }

    /// Rate lists installed so far, in order.
    pub fn rates(&self) -> &[&'static [u32]] {
        self.rates.installed()
    }

    /// Channel lists installed so far, in order.
    pub fn channels(&self) -> &[&'static [u32]] {
        self.channels.installed()
    }

    /// Intersection of the installed format masks, if any.
    pub fn formats(&self) -> Option<FormatMask> {
        self.formats
    }

    /// Drop every installed constraint.
    pub fn reset(&mut self) {
        *self = HwParamSpace::new();
    }

    /// Refine `request` to the closest configuration the constraints allow.
    pub fn refine(&self, request: HwParams) -> Result<HwParams, NegotiationError> {
        let rate = self.rates.refine(HwParam::Rate, request.rate)?;
        let channels = self.channels.refine(HwParam::Channels, request.channels)?;
        let format = match self.formats {
            Some(mask) if mask.contains(request.format) => request.format,
            Some(mask) => SampleFormat::ALL
                .into_iter()
                .find(|f| mask.contains(*f))
                .ok_or(NegotiationError::NoMatch(HwParam::Format))?,
            None => request.format,
        };

        Ok(HwParams { rate, channels, format })
    }
}

impl HwConstraints for HwParamSpace {
    type Error = NegotiationError;

    fn constrain_list(&mut self, param: HwParam, list: &'static [u32]) -> Result<(), Self::Error> {
        if list.is_empty() {
            return Err(NegotiationError::Empty(param));
        }
        match param {
            HwParam::Rate => self.rates.push(param, list),
            HwParam::Channels => self.channels.push(param, list),
            HwParam::Format => Err(NegotiationError::WrongKind(param)),
        }
    }

    fn constrain_mask64(&mut self, param: HwParam, mask: FormatMask) -> Result<(), Self::Error> {
        if param != HwParam::Format {
            return Err(NegotiationError::WrongKind(param));
        }
        let narrowed = match self.formats {
            Some(current) => current.intersect(mask),
            None => mask,
        };
        if narrowed.is_empty() {
            return Err(NegotiationError::NoMatch(param));
        }
        self.formats = Some(narrowed);
        Ok(())
    }
}

/// Closest value to `target`; ties resolve to the lower value.
fn nearest(values: impl Iterator<Item = u32>, target: u32) -> Option<u32> {
    values.min_by_key(|&v| (v.abs_diff(target), v))
}
