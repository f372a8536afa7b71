/// Property-based tests for config normalization.
///
/// Generates random configurations and source metadata and verifies that
/// normalization is total, idempotent, and always lands on a configuration
/// satisfying the cross-field invariants.
use proptest::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;

use ffnorm::normalize::{is_preset_allowed, is_video_codec_allowed};
use ffnorm::{
    AudioCodec, Container, ConversionConfig, CropRect, MlUpscale, Preset, Resolution,
    SourceMetadata, VideoCodec, is_audio_codec_allowed, normalize_conversion_config,
};

fn container_strategy() -> impl Strategy<Value = Container> {
    proptest::sample::select(Container::ALL)
}

fn video_codec_strategy() -> impl Strategy<Value = VideoCodec> {
    proptest::sample::select(VideoCodec::ALL)
}

fn audio_codec_strategy() -> impl Strategy<Value = AudioCodec> {
    proptest::sample::select(AudioCodec::ALL)
}

fn preset_strategy() -> impl Strategy<Value = Preset> {
    proptest::sample::select(Preset::ALL)
}

fn ml_upscale_strategy() -> impl Strategy<Value = MlUpscale> {
    proptest::sample::select(MlUpscale::ALL)
}

fn resolution_strategy() -> impl Strategy<Value = Resolution> {
    prop_oneof![
        Just(Resolution::Original),
        Just(Resolution::Target("1280x720".to_string())),
        Just(Resolution::Target("1920x1080".to_string())),
        Just(Resolution::Target("3840x2160".to_string())),
    ]
}

fn crop_strategy() -> impl Strategy<Value = Option<CropRect>> {
    proptest::option::of((0u32..100, 0u32..100, 16u32..4096, 16u32..2160).prop_map(
        |(x, y, width, height)| CropRect {
            x,
            y,
            width,
            height,
        },
    ))
}

fn metadata_map_strategy() -> impl Strategy<Value = HashMap<String, String>> {
    proptest::collection::hash_map("[a-z]{1,8}", "[a-zA-Z0-9 ]{0,16}", 0..4)
}

fn config_strategy() -> impl Strategy<Value = ConversionConfig> {
    let codecs = (
        container_strategy(),
        video_codec_strategy(),
        audio_codec_strategy(),
        preset_strategy(),
        resolution_strategy(),
        ml_upscale_strategy(),
    );
    let extras = (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        proptest::collection::vec(0u32..8, 0..3),
        proptest::collection::vec(0u32..8, 0..3),
        any::<bool>(),
        crop_strategy(),
        metadata_map_strategy(),
    );

    (codecs, extras).prop_map(
        |(
            (container, video_codec, audio_codec, preset, resolution, ml_upscale),
            (
                nvenc_spatial_aq,
                nvenc_temporal_aq,
                videotoolbox_allow_sw,
                hw_decode,
                selected_audio_tracks,
                selected_subtitle_tracks,
                burn_subs,
                crop,
                metadata,
            ),
        )| ConversionConfig {
            container,
            video_codec,
            audio_codec,
            preset,
            resolution,
            ml_upscale,
            nvenc_spatial_aq,
            nvenc_temporal_aq,
            videotoolbox_allow_sw,
            hw_decode,
            selected_audio_tracks,
            selected_subtitle_tracks,
            subtitle_burn_path: burn_subs.then(|| PathBuf::from("embedded.srt")),
            crop,
            metadata,
        },
    )
}

fn source_strategy() -> impl Strategy<Value = Option<SourceMetadata>> {
    prop_oneof![
        Just(None),
        Just(Some(SourceMetadata {
            video_codec: Some("h264".to_string()),
            audio_codec: Some("aac".to_string()),
            width: Some(1920),
            height: Some(1080),
            duration_s: Some(120.0),
        })),
        Just(Some(SourceMetadata {
            video_codec: None,
            audio_codec: Some("flac".to_string()),
            ..SourceMetadata::default()
        })),
    ]
}

fn holds_invariants(out: &ConversionConfig, metadata: Option<&SourceMetadata>) -> bool {
    let audio_only = out.container.is_audio_only();

    let source_coerced = match metadata {
        Some(m) if m.video_codec.is_none() => audio_only,
        _ => true,
    };

    let audio_fields_ok = !audio_only
        || (out.ml_upscale == MlUpscale::None
            && out.selected_subtitle_tracks.is_empty()
            && out.subtitle_burn_path.is_none());

    let video_codec_ok = audio_only || is_video_codec_allowed(out.container, out.video_codec);

    let preset_ok = if out.video_codec.is_videotoolbox() {
        out.preset == Preset::Medium
    } else {
        is_preset_allowed(out.video_codec, out.preset)
    };

    let flags_ok = (out.video_codec.is_nvenc() || (!out.nvenc_spatial_aq && !out.nvenc_temporal_aq))
        && (out.video_codec.is_videotoolbox() || !out.videotoolbox_allow_sw)
        && (out.video_codec.is_hardware() || !out.hw_decode);

    source_coerced
        && audio_fields_ok
        && is_audio_codec_allowed(out.audio_codec, out.container)
        && video_codec_ok
        && preset_ok
        && (!out.ml_upscale.is_enabled() || out.resolution.is_original())
        && flags_ok
}

proptest! {
    #[test]
    fn prop_normalize_satisfies_invariants(
        config in config_strategy(),
        metadata in source_strategy(),
    ) {
        let out = normalize_conversion_config(&config, metadata.as_ref());
        prop_assert!(holds_invariants(&out, metadata.as_ref()), "violated by {:?}", out);
    }

    #[test]
    fn prop_normalize_is_idempotent(
        config in config_strategy(),
        metadata in source_strategy(),
    ) {
        let once = normalize_conversion_config(&config, metadata.as_ref());
        let twice = normalize_conversion_config(&once, metadata.as_ref());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_normalize_never_mutates_input(
        config in config_strategy(),
        metadata in source_strategy(),
    ) {
        let before = config.clone();
        let _ = normalize_conversion_config(&config, metadata.as_ref());
        prop_assert_eq!(before, config);
    }

    #[test]
    fn prop_already_valid_config_passes_through(
        preset in proptest::sample::select(vec![Preset::Fast, Preset::Medium, Preset::Slow]),
        codec in proptest::sample::select(
            vec![VideoCodec::Libx264, VideoCodec::Libx265, VideoCodec::Vp9]
        ),
    ) {
        // mkv takes every video codec and every audio codec, so a config with
        // no hardware flags set is already normal
        let config = ConversionConfig {
            container: Container::Mkv,
            video_codec: codec,
            audio_codec: AudioCodec::Aac,
            preset,
            ..ConversionConfig::default()
        };
        let out = normalize_conversion_config(&config, None);
        prop_assert_eq!(out, config);
    }
}
