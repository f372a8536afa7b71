//! Conversion-config normalization.
//!
//! `normalize_conversion_config` rewrites a user-edited configuration into one
//! where every field is compatible with every other field and with the
//! encoder/container pairing. It is total: every incompatible combination has
//! a deterministic fallback, so it never returns an error. Rules are applied
//! in a fixed order because later rules read values rewritten by earlier ones
//! (the container decides the video codec, the video codec decides the preset
//! and the hardware flags).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::media::{
    AudioCodec, Container, MlUpscale, Preset, Resolution, VideoCodec, default_audio_codec,
    is_audio_codec_allowed,
};

/// Crop rectangle in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A conversion job configuration as edited by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionConfig {
    pub container: Container,
    pub video_codec: VideoCodec,
    pub audio_codec: AudioCodec,
    pub preset: Preset,

    #[serde(default)]
    pub resolution: Resolution,

    #[serde(default)]
    pub ml_upscale: MlUpscale,

    // NVENC adaptive quantization; only meaningful for NVENC encoders
    #[serde(default)]
    pub nvenc_spatial_aq: bool,
    #[serde(default)]
    pub nvenc_temporal_aq: bool,

    /// Allow VideoToolbox to fall back to its software path.
    #[serde(default)]
    pub videotoolbox_allow_sw: bool,

    /// Decode on the GPU too; only meaningful for hardware encoders.
    #[serde(default)]
    pub hw_decode: bool,

    #[serde(default)]
    pub selected_audio_tracks: Vec<u32>,
    #[serde(default)]
    pub selected_subtitle_tracks: Vec<u32>,

    /// Subtitle file to hard-burn into the video stream.
    #[serde(default)]
    pub subtitle_burn_path: Option<PathBuf>,

    #[serde(default)]
    pub crop: Option<CropRect>,

    /// Opaque tags carried through to the output file, not interpreted here.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            container: Container::Mp4,
            video_codec: VideoCodec::Libx264,
            audio_codec: AudioCodec::Aac,
            preset: Preset::Medium,
            resolution: Resolution::Original,
            ml_upscale: MlUpscale::None,
            nvenc_spatial_aq: false,
            nvenc_temporal_aq: false,
            videotoolbox_allow_sw: false,
            hw_decode: false,
            selected_audio_tracks: Vec::new(),
            selected_subtitle_tracks: Vec::new(),
            subtitle_burn_path: None,
            crop: None,
            metadata: HashMap::new(),
        }
    }
}

/// Probed source-file metadata. The normalizer only consults whether a video
/// stream exists; the rest is carried for the UI and execution layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration_s: Option<f64>,
}

impl SourceMetadata {
    pub fn has_video(&self) -> bool {
        self.video_codec.is_some()
    }
}

/// Which video encoders each container accepts. Unlisted containers permit
/// everything, so a container this table has not enumerated yet keeps
/// whatever codec the user picked.
const CONTAINER_VIDEO_CODECS: &[(Container, &[VideoCodec])] = &[
    (
        Container::Mp4,
        &[
            VideoCodec::Libx264,
            VideoCodec::Libx265,
            VideoCodec::Vp9,
            VideoCodec::Libsvtav1,
            VideoCodec::H264Videotoolbox,
            VideoCodec::H264Nvenc,
            VideoCodec::HevcVideotoolbox,
            VideoCodec::HevcNvenc,
            VideoCodec::Av1Nvenc,
        ],
    ),
    (
        Container::Mkv,
        &[
            VideoCodec::Libx264,
            VideoCodec::Libx265,
            VideoCodec::Vp9,
            VideoCodec::Prores,
            VideoCodec::Libsvtav1,
            VideoCodec::H264Videotoolbox,
            VideoCodec::H264Nvenc,
            VideoCodec::HevcVideotoolbox,
            VideoCodec::HevcNvenc,
            VideoCodec::Av1Nvenc,
        ],
    ),
    (Container::Webm, &[VideoCodec::Vp9]),
    (
        Container::Mov,
        &[
            VideoCodec::Libx264,
            VideoCodec::Libx265,
            VideoCodec::Prores,
            VideoCodec::H264Videotoolbox,
            VideoCodec::H264Nvenc,
            VideoCodec::HevcVideotoolbox,
            VideoCodec::HevcNvenc,
        ],
    ),
];

/// Replacement priority when the selected codec is illegal for the container.
/// Ordered; general-purpose software encoders first.
const FALLBACK_VIDEO_CODECS: &[VideoCodec] = &[
    VideoCodec::Libx264,
    VideoCodec::Libx265,
    VideoCodec::Vp9,
    VideoCodec::Prores,
    VideoCodec::Libsvtav1,
];

/// Presets NVENC actually implements; everything else is x264-only.
const NVENC_ALLOWED_PRESETS: &[Preset] = &[Preset::Fast, Preset::Medium, Preset::Slow];

/// Video codecs the container accepts, in table order. `None` means the
/// container is unlisted and permits everything.
pub fn allowed_video_codecs(container: Container) -> Option<&'static [VideoCodec]> {
    CONTAINER_VIDEO_CODECS
        .iter()
        .find(|(c, _)| *c == container)
        .map(|(_, codecs)| *codecs)
}

/// Whether `codec` may be muxed into `container`.
pub fn is_video_codec_allowed(container: Container, codec: VideoCodec) -> bool {
    match allowed_video_codecs(container) {
        Some(allowed) => allowed.contains(&codec),
        None => true,
    }
}

/// First codec from the priority list the container accepts; if none of the
/// priority codecs is in the allow-set, an arbitrary allow-set member; if the
/// allow-set is empty, the head of the priority list.
fn first_allowed_video_codec(container: Container) -> VideoCodec {
    let Some(allowed) = allowed_video_codecs(container) else {
        return FALLBACK_VIDEO_CODECS[0];
    };
    if allowed.is_empty() {
        return FALLBACK_VIDEO_CODECS[0];
    }

    FALLBACK_VIDEO_CODECS
        .iter()
        .find(|codec| allowed.contains(codec))
        .copied()
        .unwrap_or(allowed[0])
}

/// Whether `codec` implements `preset`. VideoToolbox encoders accept no
/// preset at all; NVENC accepts a three-preset subset.
pub fn is_preset_allowed(codec: VideoCodec, preset: Preset) -> bool {
    // VideoToolbox has no preset concept at all
    if codec.is_videotoolbox() {
        return false;
    }
    if codec.is_nvenc() {
        return NVENC_ALLOWED_PRESETS.contains(&preset);
    }
    Preset::ALL.contains(&preset)
}

/// Fastest preset the codec accepts; `medium` if it accepts none.
fn first_allowed_preset(codec: VideoCodec) -> Preset {
    Preset::ALL
        .iter()
        .find(|preset| is_preset_allowed(codec, **preset))
        .copied()
        .unwrap_or(Preset::Medium)
}

/// Rewrite `config` so every cross-field compatibility invariant holds.
///
/// Returns a new, independently owned configuration; the caller's value and
/// its track lists / metadata / crop are never touched. Total over its input
/// domain: there is no combination of fields this cannot repair.
pub fn normalize_conversion_config(
    config: &ConversionConfig,
    metadata: Option<&SourceMetadata>,
) -> ConversionConfig {
    let mut next = config.clone();

    // An audio-only source cannot fill a video container
    let source_audio_only = metadata.is_some_and(|m| !m.has_video());
    if source_audio_only && !next.container.is_audio_only() {
        next.container = Container::Mp3;
    }

    if !is_audio_codec_allowed(next.audio_codec, next.container) {
        next.audio_codec = default_audio_codec(next.container);
    }

    // Video-only fields have no meaning in an audio container
    let audio_container = next.container.is_audio_only();
    if audio_container {
        next.ml_upscale = MlUpscale::None;
        next.selected_subtitle_tracks.clear();
        next.subtitle_burn_path = None;
    }

    if !audio_container && !is_video_codec_allowed(next.container, next.video_codec) {
        next.video_codec = first_allowed_video_codec(next.container);
    }

    // The upscaler decides the output size itself
    if next.ml_upscale.is_enabled() && !next.resolution.is_original() {
        next.resolution = Resolution::Original;
    }

    if !is_preset_allowed(next.video_codec, next.preset) {
        next.preset = first_allowed_preset(next.video_codec);
    }

    if !next.video_codec.is_nvenc() {
        next.nvenc_spatial_aq = false;
        next.nvenc_temporal_aq = false;
    }

    if !next.video_codec.is_videotoolbox() {
        next.videotoolbox_allow_sw = false;
    }

    if !next.video_codec.is_hardware() {
        next.hw_decode = false;
    }

    next
}
