//! Audio-codec policy: which audio encoders each container accepts, and the
//! default encoder per container.
//!
//! Absence of a container from the table means "all codecs allowed" (mkv is
//! the one container that muxes everything, so it has no row).

use super::types::{AudioCodec, Container};

/// Containers that carry audio streams only. Ordered; the first entry is the
/// coercion target for audio-only sources.
pub const AUDIO_ONLY_CONTAINERS: &[Container] = &[
    Container::Mp3,
    Container::M4a,
    Container::Flac,
    Container::Wav,
    Container::Ogg,
];

/// Per-container audio allow-set and default, following ffmpeg muxer support.
const CONTAINER_AUDIO_CODECS: &[(Container, &[AudioCodec], AudioCodec)] = &[
    (
        Container::Mp4,
        &[AudioCodec::Aac, AudioCodec::Ac3, AudioCodec::Alac],
        AudioCodec::Aac,
    ),
    (
        Container::Mov,
        &[
            AudioCodec::Aac,
            AudioCodec::Ac3,
            AudioCodec::Alac,
            AudioCodec::PcmS16le,
        ],
        AudioCodec::Aac,
    ),
    (
        Container::Webm,
        &[AudioCodec::Libopus, AudioCodec::Libvorbis],
        AudioCodec::Libopus,
    ),
    (Container::Mp3, &[AudioCodec::Libmp3lame], AudioCodec::Libmp3lame),
    (
        Container::M4a,
        &[AudioCodec::Aac, AudioCodec::Alac],
        AudioCodec::Aac,
    ),
    (Container::Flac, &[AudioCodec::Flac], AudioCodec::Flac),
    (Container::Wav, &[AudioCodec::PcmS16le], AudioCodec::PcmS16le),
    (
        Container::Ogg,
        &[AudioCodec::Libvorbis, AudioCodec::Libopus],
        AudioCodec::Libvorbis,
    ),
];

fn container_entry(container: Container) -> Option<&'static (Container, &'static [AudioCodec], AudioCodec)> {
    CONTAINER_AUDIO_CODECS.iter().find(|(c, _, _)| *c == container)
}

/// Whether `codec` may be muxed into `container`. Unlisted containers permit
/// every codec.
pub fn is_audio_codec_allowed(codec: AudioCodec, container: Container) -> bool {
    match container_entry(container) {
        Some((_, allowed, _)) => allowed.contains(&codec),
        None => true,
    }
}

/// Default audio encoder for `container`, derived from the container alone.
pub fn default_audio_codec(container: Container) -> AudioCodec {
    match container_entry(container) {
        Some((_, _, default)) => *default,
        None => AudioCodec::Aac,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_codec_is_always_allowed() {
        for container in Container::ALL {
            let default = default_audio_codec(*container);
            assert!(
                is_audio_codec_allowed(default, *container),
                "default {} not allowed in {}",
                default,
                container
            );
        }
    }

    #[test]
    fn test_mkv_allows_everything() {
        for codec in AudioCodec::ALL {
            assert!(is_audio_codec_allowed(*codec, Container::Mkv));
        }
    }

    #[test]
    fn test_mp3_container_restricts_to_lame() {
        assert!(is_audio_codec_allowed(
            AudioCodec::Libmp3lame,
            Container::Mp3
        ));
        assert!(!is_audio_codec_allowed(AudioCodec::Aac, Container::Mp3));
        assert_eq!(default_audio_codec(Container::Mp3), AudioCodec::Libmp3lame);
    }

    #[test]
    fn test_audio_only_containers_are_flagged() {
        for container in AUDIO_ONLY_CONTAINERS {
            assert!(container.is_audio_only());
        }
        assert!(!Container::Mp4.is_audio_only());
        assert!(!Container::Mkv.is_audio_only());
    }
}
