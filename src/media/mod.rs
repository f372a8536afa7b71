// Shared media-domain vocabulary - containers, codecs, presets

pub mod audio;
pub mod types;

pub use audio::{AUDIO_ONLY_CONTAINERS, default_audio_codec, is_audio_codec_allowed};
pub use types::{AudioCodec, Container, MlUpscale, Preset, Resolution, VideoCodec};
