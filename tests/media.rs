mod common;

use zai::Error;
use zai::media::{self, MAX_AUDIO_BYTES};

fn write_temp(label: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = common::unique_temp_path(label);
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn local_image_round_trips_through_data_url() {
    let bytes: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    let path = write_temp("photo.png", &bytes);

    let url = media::load_image(path.to_str().unwrap()).expect("encode");
    std::fs::remove_file(&path).ok();

    assert!(url.starts_with("data:image/png;base64,"));
    let (mime, decoded) = media::decode_data_url(&url).expect("decode");
    assert_eq!(mime, "image/png");
    assert_eq!(decoded, bytes);
}

#[test]
fn ten_kilobyte_jpeg_expands_to_base64_length() {
    let bytes = vec![0xFFu8; 10 * 1024];
    let path = write_temp("sample.jpg", &bytes);

    let url = media::load_image_as_data_url(&path).expect("encode");
    std::fs::remove_file(&path).ok();

    let payload = url
        .strip_prefix("data:image/jpeg;base64,")
        .expect("jpeg data url");
    assert_eq!(payload.len(), (10 * 1024usize).div_ceil(3) * 4);
    assert_eq!(payload.len(), 13_656);
}

#[test]
fn extension_matching_is_case_insensitive() {
    let path = write_temp("SHOUT.JPEG", b"jpeg");
    let url = media::load_image_as_data_url(&path).expect("encode");
    std::fs::remove_file(&path).ok();
    assert!(url.starts_with("data:image/jpeg;base64,"));
}

#[test]
fn remote_and_data_urls_pass_through() {
    let remote = "https://example.test/cat.png";
    assert_eq!(media::load_image(remote).unwrap(), remote);

    let inline = media::data_url("image/gif", b"GIF89a");
    assert_eq!(media::load_image(&inline).unwrap(), inline);

    let video = "http://example.test/clip.mp4";
    assert_eq!(media::load_video(video).unwrap(), video);
}

#[test]
fn missing_image_is_asset_not_found() {
    let path = common::unique_temp_path("missing.png");
    match media::load_image(path.to_str().unwrap()).unwrap_err() {
        Error::AssetNotFound(missing) => assert_eq!(missing, path),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn unknown_image_extension_is_unsupported() {
    let path = write_temp("notes.txt", b"hello");
    let err = media::load_image_as_data_url(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, Error::UnsupportedInput(_)));
}

#[test]
fn local_video_is_rejected_even_if_it_exists() {
    let path = write_temp("clip.mp4", b"not really a video");
    let err = media::load_video(path.to_str().unwrap()).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, Error::UnsupportedInput(_)));

    let err = media::load_video("videos/does-not-exist.mp4").unwrap_err();
    assert!(matches!(err, Error::UnsupportedInput(_)));
}

#[test]
fn audio_is_loaded_with_its_mime_type() {
    let path = write_temp("speech.wav", b"RIFF....WAVE");
    let audio = media::load_audio(&path).expect("audio");
    std::fs::remove_file(&path).ok();

    assert_eq!(audio.mime_type(), "audio/wav");
    assert!(audio.file_name().ends_with("speech.wav"));
    assert_eq!(audio.len(), 12);
    assert!(!format!("{:?}", audio).contains("RIFF"));
}

#[test]
fn oversized_audio_is_unsupported() {
    let path = common::unique_temp_path("huge.mp3");
    let file = std::fs::File::create(&path).unwrap();
    file.set_len(MAX_AUDIO_BYTES + 1).unwrap();
    drop(file);

    let err = media::load_audio(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, Error::UnsupportedInput(ref m) if m.contains("too large")));
}

#[test]
fn missing_audio_is_asset_not_found() {
    let path = common::unique_temp_path("missing.mp3");
    assert!(matches!(
        media::load_audio(&path).unwrap_err(),
        Error::AssetNotFound(_)
    ));
}
