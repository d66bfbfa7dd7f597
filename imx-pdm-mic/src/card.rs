//! Sound card and DAI link description.
//!
//! The card has exactly one link: SAI controller (cpu) → firmware-less
//! codec, capture only. The microphone has no control bus, so the codec side
//! is the generic dummy component and never gets programmed.

use crate::constants::{DAI_LINK_NAME, DUMMY_CODEC_DAI_NAME, DUMMY_CODEC_NAME};
use crate::dai::CpuDai;
use crate::session::StreamSession;

/// One end of a DAI link, named by component and DAI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DaiLinkComponent<'a> {
    /// Component (device) name.
    pub name: &'a str,
    /// DAI name within the component.
    pub dai_name: &'a str,
}

/// The dummy codec used on the codec side of the link.
pub const DUMMY_CODEC: DaiLinkComponent<'static> = DaiLinkComponent {
    name: DUMMY_CODEC_NAME,
    dai_name: DUMMY_CODEC_DAI_NAME,
};

/// Description of the single PDM DAI link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DaiLink<'a> {
    pub name: &'a str,
    pub stream_name: &'a str,
    /// DAI name of the controller; the controller's device name.
    pub cpu_dai_name: &'a str,
    pub codec: DaiLinkComponent<'a>,
    pub capture_only: bool,
}

/// What gets handed to the card registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CardInfo<'a> {
    /// Display name from the `model` property.
    pub name: Option<&'a str>,
    pub link: DaiLink<'a>,
}

/// Registration interface of the audio subsystem.
pub trait CardRegistry {
    /// Error type for registration.
    type Error;

    /// Register a sound card.
    fn register_card(&mut self, card: &CardInfo<'_>) -> Result<(), Self::Error>;

    /// Unregister a previously registered card.
    fn unregister_card(&mut self, card: &CardInfo<'_>);
}

/// A bound PDM microphone card: registration data plus its stream session.
pub struct PdmMicCard<'a, D> {
    name: Option<&'a str>,
    session: StreamSession<D>,
}

impl<'a, D: CpuDai> PdmMicCard<'a, D> {
    /// Assemble a card around an existing session.
    pub fn new(name: Option<&'a str>, session: StreamSession<D>) -> Self {
        Self { name, session }
    }

    /// Card display name.
    pub fn name(&self) -> Option<&'a str> {
        self.name
    }

    /// The DAI link this card registers.
    pub fn dai_link(&self) -> DaiLink<'_> {
        DaiLink {
            name: DAI_LINK_NAME,
            stream_name: DAI_LINK_NAME,
            cpu_dai_name: self.session.dai().name(),
            codec: DUMMY_CODEC,
            capture_only: self.session.capture_only(),
        }
    }

    /// Registration data for this card.
    pub fn info(&self) -> CardInfo<'_> {
        CardInfo {
            name: self.name,
            link: self.dai_link(),
        }
    }

    /// The capture stream.
    pub fn session(&self) -> &StreamSession<D> {
        &self.session
    }

    /// The capture stream, for lifecycle calls.
    pub fn session_mut(&mut self) -> &mut StreamSession<D> {
        &mut self.session
    }

    /// Consume the card and return its session.
    pub fn into_session(self) -> StreamSession<D> {
        self.session
    }
}
