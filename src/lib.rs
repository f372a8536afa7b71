//! ffnorm - conversion-config normalization for FFmpeg transcode jobs.
//!
//! The core entry point is [`normalize_conversion_config`]: given a
//! user-edited [`ConversionConfig`] and optional probed [`SourceMetadata`],
//! it returns a new configuration in which every field is compatible with
//! every other field (container vs codec, codec vs preset, hardware flags vs
//! encoder family). It is pure and total; invalid combinations are repaired
//! with deterministic fallbacks, never reported as errors.
//!
//! [`settings`] holds the durable user preferences that surround a
//! conversion run (currently the max-concurrency setting).

pub mod media;
pub mod normalize;
pub mod settings;

pub use media::{
    AUDIO_ONLY_CONTAINERS, AudioCodec, Container, MlUpscale, Preset, Resolution, VideoCodec,
    default_audio_codec, is_audio_codec_allowed,
};
pub use normalize::{ConversionConfig, CropRect, SourceMetadata, normalize_conversion_config};
pub use settings::{ConcurrencyBackend, DEFAULT_MAX_CONCURRENCY, SettingsError, SettingsStore};
