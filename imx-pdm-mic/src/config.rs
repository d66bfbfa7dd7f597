//! Board-description configuration.
//!
//! | Property | Type | Required | Meaning |
//! |----------|------|----------|---------|
//! | `decimation` | u32 | yes | Microphone oversampling ratio, > 0 |
//! | `audio-cpu` | phandle | yes | SAI controller node |
//! | `model` | string | no | Card display name |
//!
//! `audio-cpu` is resolved by [`probe`](crate::binding::probe); this module
//! reads the plain properties.

use crate::clock::Decimation;
use crate::constants::{PROP_DECIMATION, PROP_MODEL};
use crate::error::ConfigError;

/// Why a property could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PropertyError {
    /// Property not present on the node.
    Missing,
    /// Present but of the wrong size or encoding.
    Malformed,
}

/// Result of a property read.
pub type PropertyResult<T> = Result<T, PropertyError>;

/// Read access to one board-description node.
pub trait DeviceNode {
    /// Node reference returned by phandle lookups.
    type Node: OfNode;

    /// Read a single `u32` cell.
    fn read_u32(&self, name: &str) -> PropertyResult<u32>;

    /// Read a NUL-terminated string.
    fn read_string(&self, name: &str) -> PropertyResult<&str>;

    /// Resolve entry `index` of phandle list `name`, taking a reference on
    /// the target node.
    fn parse_phandle(&self, name: &str, index: usize) -> Option<Self::Node>;
}

/// A counted reference on a node that must be given back.
pub trait OfNode {
    /// Drop the reference taken by the lookup.
    fn put(&mut self);
}

/// Validated PDM mic properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PdmMicConfig<'a> {
    /// Microphone decimation factor.
    pub decimation: Decimation,
    /// Card display name, if the board names one.
    pub card_name: Option<&'a str>,
}

impl<'a> PdmMicConfig<'a> {
    /// Read and validate `decimation` and `model` from `node`.
    pub fn from_node<N, E>(node: &'a N) -> Result<Self, ConfigError<E>>
    where
        N: DeviceNode,
    {
        let decimation = read_decimation(node)?;
        let card_name = read_card_name(node)?;
        Ok(PdmMicConfig { decimation, card_name })
    }
}

fn read_decimation<N: DeviceNode, E>(node: &N) -> Result<Decimation, ConfigError<E>> {
    let raw = node.read_u32(PROP_DECIMATION).map_err(|_| {
        error!("missing or malformed decimation property");
        ConfigError::MissingDecimation
    })?;
    Decimation::new(raw).ok_or_else(|| {
        error!("decimation must be non-zero");
        ConfigError::InvalidDecimation
    })
}

fn read_card_name<'a, N: DeviceNode, E>(
    node: &'a N,
) -> Result<Option<&'a str>, ConfigError<E>> {
    match node.read_string(PROP_MODEL) {
        Ok(name) => Ok(Some(name)),
        Err(PropertyError::Missing) => Ok(None),
        Err(PropertyError::Malformed) => {
            error!("fail to find card model name");
            Err(ConfigError::InvalidCardName)
        }
    }
}
