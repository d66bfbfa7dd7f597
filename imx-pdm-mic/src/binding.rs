//! Driver binding: probe and remove.
//!
//! Probe sequence for a `fsl,imx-pdm-mic` node:
//!
//! 1. Resolve the `audio-cpu` phandle (takes a node reference).
//! 2. Find the SAI device bound to that node.
//! 3. Read `decimation` (required, non-zero).
//! 4. Read `model` (optional card name).
//! 5. Build the card around a new [`StreamSession`] and register it.
//!
//! The node reference from step 1 is held by a [`NodeGuard`] and given back
//! on every return path, success included.

use core::ops::{Deref, DerefMut};

use crate::card::{CardRegistry, PdmMicCard};
use crate::config::{DeviceNode, OfNode, PdmMicConfig};
use crate::constants::{COMPATIBLE, DRIVER_NAME, PROP_AUDIO_CPU};
use crate::dai::CpuDai;
use crate::error::ConfigError;
use crate::session::StreamSession;

/// Lookup of controller devices by board-description node.
pub trait Platform<N> {
    /// Controller driver type.
    type Dai: CpuDai;

    /// Find the device bound to `node`, if its driver has probed.
    fn find_device_by_node(&mut self, node: &N) -> Option<Self::Dai>;
}

/// Holds a node reference and puts it when dropped.
pub struct NodeGuard<N: OfNode>(N);

impl<N: OfNode> NodeGuard<N> {
    pub fn new(node: N) -> Self {
        NodeGuard(node)
    }
}

impl<N: OfNode> Deref for NodeGuard<N> {
    type Target = N;

    fn deref(&self) -> &N {
        &self.0
    }
}

impl<N: OfNode> DerefMut for NodeGuard<N> {
    fn deref_mut(&mut self) -> &mut N {
        &mut self.0
    }
}

impl<N: OfNode> Drop for NodeGuard<N> {
    fn drop(&mut self) {
        self.0.put();
    }
}

/// Whether a node with this `compatible` entry is handled by this driver.
pub fn is_compatible(compatible: &str) -> bool {
    compatible == COMPATIBLE
}

/// Bind to `node`: build the PDM card and register it with `registry`.
pub fn probe<'a, N, P, R>(
    node: &'a N,
    platform: &mut P,
    registry: &mut R,
) -> Result<PdmMicCard<'a, P::Dai>, ConfigError<R::Error>>
where
    N: DeviceNode,
    P: Platform<N::Node>,
    R: CardRegistry,
{
    let cpu_node = node.parse_phandle(PROP_AUDIO_CPU, 0).map(NodeGuard::new).ok_or_else(|| {
        error!("cpu dai phandle missing or invalid");
        ConfigError::MissingController
    })?;

    let dai = platform.find_device_by_node(&cpu_node).ok_or_else(|| {
        error!("fail to find SAI platform device");
        ConfigError::ControllerNotFound
    })?;

    let PdmMicConfig { decimation, card_name } = PdmMicConfig::from_node::<_, R::Error>(node)?;

    let card = PdmMicCard::new(card_name, StreamSession::new(dai, decimation));

    registry.register_card(&card.info()).map_err(|e| {
        error!("snd soc register card failed");
        ConfigError::Register(e)
    })?;

    info!("{}: card registered, decimation {}", DRIVER_NAME, decimation.get());
    Ok(card)
}

/// Unbind: unregister the card and hand back the controller.
pub fn remove<D, R>(card: PdmMicCard<'_, D>, registry: &mut R) -> D
where
    D: CpuDai,
    R: CardRegistry,
{
    registry.unregister_card(&card.info());
    card.into_session().release()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardInfo, DUMMY_CODEC};
    use crate::config::mock::{MockNode, MockRef};
    use crate::config::PropertyError;
    use crate::dai::{ClockDirection, ClockId, DaiFormat};
    use crate::session::StreamState;
    use core::cell::Cell;
    use fugit::HertzU64;

    struct NullDai;

    impl CpuDai for NullDai {
        type Error = ();

        fn name(&self) -> &str {
            "30c30000.sai"
        }

        fn set_fmt(&mut self, _fmt: DaiFormat) -> Result<(), ()> {
            Ok(())
        }

        fn set_bclk_ratio(&mut self, _ratio: u32) -> Result<(), ()> {
            Ok(())
        }

        fn set_sysclk(&mut self, _id: ClockId, _f: HertzU64, _d: ClockDirection) -> Result<(), ()> {
            Ok(())
        }
    }

    struct MockPlatform {
        present: bool,
    }

    impl<'c> Platform<MockRef<'c>> for MockPlatform {
        type Dai = NullDai;

        fn find_device_by_node(&mut self, _node: &MockRef<'c>) -> Option<NullDai> {
            self.present.then_some(NullDai)
        }
    }

    struct MockRegistry {
        registered: u32,
        unregistered: u32,
        capture_only: bool,
        reject: bool,
        expect_name: Option<&'static str>,
    }

    impl Default for MockRegistry {
        fn default() -> Self {
            Self {
                registered: 0,
                unregistered: 0,
                capture_only: false,
                reject: false,
                expect_name: Some("imx-pdm-audio"),
            }
        }
    }

    impl CardRegistry for MockRegistry {
        type Error = i32;

        fn register_card(&mut self, card: &CardInfo<'_>) -> Result<(), i32> {
            if self.reject {
                return Err(-517);
            }
            assert_eq!(card.link.name, "pdm hifi");
            assert_eq!(card.link.stream_name, "pdm hifi");
            assert_eq!(card.link.cpu_dai_name, "30c30000.sai");
            assert_eq!(card.link.codec, DUMMY_CODEC);
            self.capture_only = card.link.capture_only;
            assert_eq!(card.name, self.expect_name);
            self.registered += 1;
            Ok(())
        }

        fn unregister_card(&mut self, _card: &CardInfo<'_>) {
            self.unregistered += 1;
        }
    }

    #[test]
    fn matches_only_pdm_mic_nodes() {
        assert!(is_compatible("fsl,imx-pdm-mic"));
        assert!(!is_compatible("fsl,imx-audio-sgtl5000"));
        assert!(!is_compatible("fsl,imx-pdm-mic2"));
    }

    #[test]
    fn probe_registers_capture_only_card() {
        let (gets, puts) = (Cell::new(0), Cell::new(0));
        let node = MockNode::new(&gets, &puts);
        let mut platform = MockPlatform { present: true };
        let mut registry = MockRegistry::default();

        let card = probe(&node, &mut platform, &mut registry).unwrap();

        assert_eq!(registry.registered, 1);
        assert!(registry.capture_only);
        assert_eq!(card.name(), Some("imx-pdm-audio"));
        assert_eq!(card.session().decimation().get(), 64);
        assert_eq!(card.session().state(), StreamState::Closed);
        // Reference released even on success.
        assert_eq!((gets.get(), puts.get()), (1, 1));
    }

    #[test]
    fn missing_phandle() {
        let (gets, puts) = (Cell::new(0), Cell::new(0));
        let mut node = MockNode::new(&gets, &puts);
        node.has_cpu = false;
        let mut registry = MockRegistry::default();

        let err = probe(&node, &mut MockPlatform { present: true }, &mut registry).err();
        assert_eq!(err, Some(ConfigError::MissingController));
        assert_eq!((gets.get(), puts.get()), (0, 0));
        assert_eq!(registry.registered, 0);
    }

    #[test]
    fn missing_controller_device_releases_node() {
        let (gets, puts) = (Cell::new(0), Cell::new(0));
        let node = MockNode::new(&gets, &puts);
        let mut registry = MockRegistry::default();

        let err = probe(&node, &mut MockPlatform { present: false }, &mut registry).err();
        assert_eq!(err, Some(ConfigError::ControllerNotFound));
        assert_eq!((gets.get(), puts.get()), (1, 1));
    }

    #[test]
    fn missing_decimation_releases_node() {
        let (gets, puts) = (Cell::new(0), Cell::new(0));
        let mut node = MockNode::new(&gets, &puts);
        node.decimation = Err(PropertyError::Missing);
        let mut registry = MockRegistry::default();

        let err = probe(&node, &mut MockPlatform { present: true }, &mut registry).err();
        assert_eq!(err, Some(ConfigError::MissingDecimation));
        assert_eq!((gets.get(), puts.get()), (1, 1));
        assert_eq!(registry.registered, 0);
    }

    #[test]
    fn zero_decimation_is_rejected() {
        let (gets, puts) = (Cell::new(0), Cell::new(0));
        let mut node = MockNode::new(&gets, &puts);
        node.decimation = Ok(0);
        let mut registry = MockRegistry::default();

        let err = probe(&node, &mut MockPlatform { present: true }, &mut registry).err();
        assert_eq!(err, Some(ConfigError::InvalidDecimation));
    }

    #[test]
    fn malformed_model_releases_node() {
        let (gets, puts) = (Cell::new(0), Cell::new(0));
        let mut node = MockNode::new(&gets, &puts);
        node.model = Err(PropertyError::Malformed);
        let mut registry = MockRegistry::default();

        let err = probe(&node, &mut MockPlatform { present: true }, &mut registry).err();
        assert_eq!(err, Some(ConfigError::InvalidCardName));
        assert_eq!((gets.get(), puts.get()), (1, 1));
        assert_eq!(registry.registered, 0);
    }

    #[test]
    fn unnamed_card_registers() {
        let (gets, puts) = (Cell::new(0), Cell::new(0));
        let mut node = MockNode::new(&gets, &puts);
        node.model = Err(PropertyError::Missing);
        let mut registry = MockRegistry { expect_name: None, ..Default::default() };

        let card = probe(&node, &mut MockPlatform { present: true }, &mut registry).unwrap();
        assert_eq!(card.name(), None);
        assert_eq!(registry.registered, 1);
    }

    #[test]
    fn registration_failure_is_reported() {
        let (gets, puts) = (Cell::new(0), Cell::new(0));
        let node = MockNode::new(&gets, &puts);
        let mut registry = MockRegistry { reject: true, ..Default::default() };

        let err = probe(&node, &mut MockPlatform { present: true }, &mut registry).err();
        assert_eq!(err, Some(ConfigError::Register(-517)));
        assert_eq!((gets.get(), puts.get()), (1, 1));
    }

    #[test]
    fn remove_unregisters_and_returns_controller() {
        let (gets, puts) = (Cell::new(0), Cell::new(0));
        let node = MockNode::new(&gets, &puts);
        let mut registry = MockRegistry::default();
        let card = probe(&node, &mut MockPlatform { present: true }, &mut registry).unwrap();

        let dai = remove(card, &mut registry);
        assert_eq!(dai.name(), "30c30000.sai");
        assert_eq!(registry.unregistered, 1);
    }
}
