/// Core enumerations for conversion jobs.
///
/// Serde spellings match the strings FFmpeg expects on the command line
/// (`-c:v hevc_nvenc`, `-preset veryslow`, ...), so a serialized config can
/// be handed to the execution layer without remapping.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    Mp4,
    Mkv,
    Webm,
    Mov,
    // Audio-only containers
    Mp3,
    M4a,
    Flac,
    Wav,
    Ogg,
}

impl Container {
    pub const ALL: &'static [Container] = &[
        Container::Mp4,
        Container::Mkv,
        Container::Webm,
        Container::Mov,
        Container::Mp3,
        Container::M4a,
        Container::Flac,
        Container::Wav,
        Container::Ogg,
    ];

    /// Whether this container carries audio streams only.
    pub fn is_audio_only(self) -> bool {
        super::audio::AUDIO_ONLY_CONTAINERS.contains(&self)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Container::Mp4 => "mp4",
            Container::Mkv => "mkv",
            Container::Webm => "webm",
            Container::Mov => "mov",
            Container::Mp3 => "mp3",
            Container::M4a => "m4a",
            Container::Flac => "flac",
            Container::Wav => "wav",
            Container::Ogg => "ogg",
        };
        write!(f, "{}", s)
    }
}

/// Video encoder.
///
/// Software encoders plus two hardware families (NVENC, VideoToolbox).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCodec {
    Libx264,
    Libx265,
    Vp9,
    Prores,
    Libsvtav1,
    H264Nvenc,
    HevcNvenc,
    Av1Nvenc,
    H264Videotoolbox,
    HevcVideotoolbox,
}

impl VideoCodec {
    pub const ALL: &'static [VideoCodec] = &[
        VideoCodec::Libx264,
        VideoCodec::Libx265,
        VideoCodec::Vp9,
        VideoCodec::Prores,
        VideoCodec::Libsvtav1,
        VideoCodec::H264Nvenc,
        VideoCodec::HevcNvenc,
        VideoCodec::Av1Nvenc,
        VideoCodec::H264Videotoolbox,
        VideoCodec::HevcVideotoolbox,
    ];

    /// NVIDIA NVENC family.
    pub fn is_nvenc(self) -> bool {
        matches!(
            self,
            VideoCodec::H264Nvenc | VideoCodec::HevcNvenc | VideoCodec::Av1Nvenc
        )
    }

    /// Apple VideoToolbox family.
    pub fn is_videotoolbox(self) -> bool {
        matches!(
            self,
            VideoCodec::H264Videotoolbox | VideoCodec::HevcVideotoolbox
        )
    }

    /// Any hardware-accelerated encoder (either family).
    pub fn is_hardware(self) -> bool {
        self.is_nvenc() || self.is_videotoolbox()
    }
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VideoCodec::Libx264 => "libx264",
            VideoCodec::Libx265 => "libx265",
            VideoCodec::Vp9 => "vp9",
            VideoCodec::Prores => "prores",
            VideoCodec::Libsvtav1 => "libsvtav1",
            VideoCodec::H264Nvenc => "h264_nvenc",
            VideoCodec::HevcNvenc => "hevc_nvenc",
            VideoCodec::Av1Nvenc => "av1_nvenc",
            VideoCodec::H264Videotoolbox => "h264_videotoolbox",
            VideoCodec::HevcVideotoolbox => "hevc_videotoolbox",
        };
        write!(f, "{}", s)
    }
}

/// Audio encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCodec {
    Aac,
    Alac,
    Ac3,
    Libmp3lame,
    Libopus,
    Libvorbis,
    Flac,
    PcmS16le,
}

impl AudioCodec {
    pub const ALL: &'static [AudioCodec] = &[
        AudioCodec::Aac,
        AudioCodec::Alac,
        AudioCodec::Ac3,
        AudioCodec::Libmp3lame,
        AudioCodec::Libopus,
        AudioCodec::Libvorbis,
        AudioCodec::Flac,
        AudioCodec::PcmS16le,
    ];
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AudioCodec::Aac => "aac",
            AudioCodec::Alac => "alac",
            AudioCodec::Ac3 => "ac3",
            AudioCodec::Libmp3lame => "libmp3lame",
            AudioCodec::Libopus => "libopus",
            AudioCodec::Libvorbis => "libvorbis",
            AudioCodec::Flac => "flac",
            AudioCodec::PcmS16le => "pcm_s16le",
        };
        write!(f, "{}", s)
    }
}

/// Encoder speed/quality preset, fastest to slowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Ultrafast,
    Superfast,
    Veryfast,
    Faster,
    Fast,
    Medium,
    Slow,
    Slower,
    Veryslow,
}

impl Preset {
    /// All presets in fastest-to-slowest order. Fallback selection walks
    /// this slice in order, so it must stay sorted by speed.
    pub const ALL: &'static [Preset] = &[
        Preset::Ultrafast,
        Preset::Superfast,
        Preset::Veryfast,
        Preset::Faster,
        Preset::Fast,
        Preset::Medium,
        Preset::Slow,
        Preset::Slower,
        Preset::Veryslow,
    ];
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Preset::Ultrafast => "ultrafast",
            Preset::Superfast => "superfast",
            Preset::Veryfast => "veryfast",
            Preset::Faster => "faster",
            Preset::Fast => "fast",
            Preset::Medium => "medium",
            Preset::Slow => "slow",
            Preset::Slower => "slower",
            Preset::Veryslow => "veryslow",
        };
        write!(f, "{}", s)
    }
}

/// Output resolution: keep the source size or scale to an explicit target.
///
/// Serialized as a plain string, `"original"` being the sentinel (any other
/// value is a target such as `"1920x1080"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Resolution {
    Original,
    Target(String),
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::Original
    }
}

impl Resolution {
    pub fn is_original(&self) -> bool {
        matches!(self, Resolution::Original)
    }
}

impl From<String> for Resolution {
    fn from(s: String) -> Self {
        if s == "original" {
            Resolution::Original
        } else {
            Resolution::Target(s)
        }
    }
}

impl From<Resolution> for String {
    fn from(r: Resolution) -> Self {
        match r {
            Resolution::Original => "original".to_string(),
            Resolution::Target(s) => s,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Original => write!(f, "original"),
            Resolution::Target(s) => write!(f, "{}", s),
        }
    }
}

/// ML upscale mode. Anything other than `None` implies the upscaler decides
/// the output size, so an explicit target resolution is meaningless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MlUpscale {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "2x")]
    X2,
    #[serde(rename = "4x")]
    X4,
}

impl Default for MlUpscale {
    fn default() -> Self {
        MlUpscale::None
    }
}

impl MlUpscale {
    pub const ALL: &'static [MlUpscale] = &[MlUpscale::None, MlUpscale::X2, MlUpscale::X4];

    pub fn is_enabled(self) -> bool {
        self != MlUpscale::None
    }
}

impl fmt::Display for MlUpscale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MlUpscale::None => "none",
            MlUpscale::X2 => "2x",
            MlUpscale::X4 => "4x",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_families_are_disjoint() {
        for codec in VideoCodec::ALL {
            assert!(
                !(codec.is_nvenc() && codec.is_videotoolbox()),
                "{} claims both hardware families",
                codec
            );
        }
    }

    #[test]
    fn test_hardware_membership() {
        assert!(VideoCodec::H264Nvenc.is_hardware());
        assert!(VideoCodec::HevcVideotoolbox.is_hardware());
        assert!(!VideoCodec::Libx264.is_hardware());
        assert!(!VideoCodec::Prores.is_hardware());
    }

    #[test]
    fn test_preset_order_is_fastest_first() {
        assert_eq!(Preset::ALL.first(), Some(&Preset::Ultrafast));
        assert_eq!(Preset::ALL.last(), Some(&Preset::Veryslow));
        assert_eq!(Preset::ALL.len(), 9);
        assert!(Preset::Ultrafast < Preset::Veryslow);
    }

    #[test]
    fn test_serde_spellings_match_ffmpeg() {
        assert_eq!(
            toml::to_string(&std::collections::BTreeMap::from([(
                "c",
                VideoCodec::H264Videotoolbox
            )]))
            .unwrap()
            .trim(),
            "c = \"h264_videotoolbox\""
        );
        assert_eq!(
            toml::to_string(&std::collections::BTreeMap::from([("a", AudioCodec::PcmS16le)]))
                .unwrap()
                .trim(),
            "a = \"pcm_s16le\""
        );
    }

    #[test]
    fn test_resolution_roundtrip() {
        assert_eq!(Resolution::from("original".to_string()), Resolution::Original);
        assert_eq!(
            Resolution::from("1920x1080".to_string()),
            Resolution::Target("1920x1080".to_string())
        );
        assert_eq!(String::from(Resolution::Original), "original");
    }
}
