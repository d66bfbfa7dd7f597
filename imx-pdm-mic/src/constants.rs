/// Board-description compatible string matched by the driver.
pub const COMPATIBLE: &str = "fsl,imx-pdm-mic";

/// Driver name (also the platform alias `platform:imx-pdm-mic`).
pub const DRIVER_NAME: &str = "imx-pdm-mic";

// ── Board-description properties ───────────────────────────────────────────

/// Decimation factor of the microphone modulator (u32, required).
pub const PROP_DECIMATION: &str = "decimation";

/// Phandle to the SAI controller node (required).
pub const PROP_AUDIO_CPU: &str = "audio-cpu";

/// Card display name (string, optional).
pub const PROP_MODEL: &str = "model";

// ── DAI link ───────────────────────────────────────────────────────────────

/// DAI link name and stream name.
pub const DAI_LINK_NAME: &str = "pdm hifi";

/// Component name of the firmware-less codec.
pub const DUMMY_CODEC_NAME: &str = "snd-soc-dummy";

/// DAI name of the firmware-less codec.
pub const DUMMY_CODEC_DAI_NAME: &str = "snd-soc-dummy-dai";
