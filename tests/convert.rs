mod common;

use aiff2pcm8_lib::prelude::*;
use common::{AiffBuilder, Chunk};

fn plain() -> ConvertOptions {
    ConvertOptions::default()
}

fn dithered(seed: u64) -> ConvertOptions {
    ConvertOptions {
        dither: DitherMode::Triangular,
        seed: Some(seed),
    }
}

#[test]
fn test_mono_8bit_scenario() {
    let data = AiffBuilder::new(1, 8)
        .frames_u8(&[&[10], &[200], &[0]])
        .build();
    let conversion = convert_bytes(&data, &plain()).unwrap();
    assert_eq!(conversion.samples, vec![10, 200, 0]);
    assert_eq!(
        conversion.to_array("blip", ArrayStyle::Plain),
        "blip[] = { 10, 200, 0 };\n"
    );
}

#[test]
fn test_mono_16bit_scenario() {
    let data = AiffBuilder::new(1, 16).mono_i16(&[0, -32768]).build();
    let conversion = convert_bytes(&data, &plain()).unwrap();
    assert_eq!(conversion.samples, vec![128, 0]);
}

#[test]
fn test_stereo_16bit_scenario() {
    let data = AiffBuilder::new(2, 16)
        .frames_i16(&[&[256, 32767], &[-256, -32768]])
        .build();
    let conversion = convert_bytes(&data, &plain()).unwrap();
    assert_eq!(conversion.samples, vec![129, 127]);
    assert_eq!(conversion.info.channels, 2);
}

#[test]
fn test_8bit_is_identity_even_with_dither() {
    let bytes: Vec<u8> = (0..=255).collect();
    let frames: Vec<&[u8]> = bytes.chunks(1).collect();
    let data = AiffBuilder::new(1, 8).frames_u8(&frames).build();

    for options in [plain(), dithered(5)] {
        let conversion = convert_bytes(&data, &options).unwrap();
        assert_eq!(conversion.samples, bytes);
    }
}

#[test]
fn test_16bit_without_dither_follows_rounding_formula() {
    let samples: Vec<i16> = (-32768..=32767).step_by(97).map(|s| s as i16).collect();
    let data = AiffBuilder::new(1, 16).mono_i16(&samples).build();
    let conversion = convert_bytes(&data, &plain()).unwrap();

    assert_eq!(conversion.samples.len(), samples.len());
    for (s, out) in samples.iter().zip(&conversion.samples) {
        let expected = (*s as f64 / 256.0 + 128.0 + 0.5).floor().clamp(0.0, 255.0) as u8;
        assert_eq!(*out, expected, "sample {}", s);
    }
}

#[test]
fn test_output_length_is_frame_count_for_any_channel_count() {
    for channels in 1..=6i16 {
        let frame: Vec<i16> = (0..channels).map(|c| c * 1000).collect();
        let frames: Vec<&[i16]> = (0..7).map(|_| frame.as_slice()).collect();
        let data = AiffBuilder::new(channels, 16).frames_i16(&frames).build();
        let conversion = convert_bytes(&data, &plain()).unwrap();
        assert_eq!(conversion.samples, vec![128; 7], "{} channels", channels);
    }
}

#[test]
fn test_dither_is_reproducible_with_seed() {
    let samples: Vec<i16> = (0..2000)
        .map(|i| ((i as f64 * 0.01).sin() * 3000.0) as i16)
        .collect();
    let data = AiffBuilder::new(1, 16).mono_i16(&samples).build();

    let a = convert_bytes(&data, &dithered(11)).unwrap();
    let b = convert_bytes(&data, &dithered(11)).unwrap();
    assert_eq!(a.samples, b.samples);
    assert_eq!(a.samples.len(), samples.len());
}

#[test]
fn test_dither_stays_close_to_nominal() {
    let samples: Vec<i16> = (0..2000)
        .map(|i| ((i as f64 * 0.02).sin() * 16000.0) as i16)
        .collect();
    let data = AiffBuilder::new(1, 16).mono_i16(&samples).build();

    let nominal = convert_bytes(&data, &plain()).unwrap();
    let dithered = convert_bytes(&data, &dithered(3)).unwrap();
    let mean_abs_diff = nominal
        .samples
        .iter()
        .zip(&dithered.samples)
        .map(|(a, b)| (*a as f64 - *b as f64).abs())
        .sum::<f64>()
        / samples.len() as f64;
    // Shaped noise moves samples by a few steps at most
    assert!(mean_abs_diff < 8.0, "mean difference {}", mean_abs_diff);
}

#[test]
fn test_skips_unrelated_chunks_including_odd_sizes() {
    let mut builder = AiffBuilder::new(1, 8).frames_u8(&[&[1], &[2]]);
    builder.before_comm.push(Chunk::new(b"NAME", b"beep!"));
    builder.before_ssnd.push(Chunk::new(b"MARK", &[0, 0, 1]));
    builder.before_ssnd.push(Chunk::new(b"ANNO", b"hello"));

    let conversion = convert_bytes(&builder.build(), &plain()).unwrap();
    assert_eq!(conversion.samples, vec![1, 2]);
}

#[test]
fn test_reports_header_fields() {
    let mut builder = AiffBuilder::new(2, 16).frames_i16(&[&[0, 0]]);
    builder.sample_rate = 44100.0;
    let conversion = convert_bytes(&builder.build(), &plain()).unwrap();
    assert_eq!(conversion.info.sample_rate, 44100.0);
    assert_eq!(conversion.info.sample_size(), 16);
    assert_eq!(conversion.info.frames, 1);
    assert_eq!(conversion.info.channels, 2);
}

#[test]
fn test_not_form_fails_with_format_error() {
    let mut data = AiffBuilder::new(1, 8).frames_u8(&[&[1]]).build();
    data[0..4].copy_from_slice(b"RIFF");
    let err = convert_bytes(&data, &plain()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_aifc_compression() {
    let raw = AiffBuilder::new(1, 16)
        .aifc(b"raw ", "")
        .mono_i16(&[256, -256])
        .build();
    assert_eq!(convert_bytes(&raw, &plain()).unwrap().samples, vec![129, 127]);

    let none = AiffBuilder::new(1, 16)
        .aifc(b"NONE", "not compressed")
        .mono_i16(&[256, -256])
        .build();
    assert_eq!(convert_bytes(&none, &plain()).unwrap().samples, vec![129, 127]);

    let ulaw = AiffBuilder::new(1, 16)
        .aifc(b"ulaw", "\u{b5}Law 2:1")
        .mono_i16(&[256, -256])
        .build();
    let err = convert_bytes(&ulaw, &plain()).unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedCompression(_)));
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

#[test]
fn test_unsupported_headers() {
    let data = AiffBuilder::new(1, 12).frames_u8(&[&[0, 0]]).build();
    let err = convert_bytes(&data, &plain()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);

    let mut builder = AiffBuilder::new(1, 8).frames_u8(&[&[0]]);
    builder.ssnd_block_size = 4096;
    let err = convert_bytes(&builder.build(), &plain()).unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedBlockAlignment { .. }));
}

#[test]
fn test_truncated_sample_data_is_io_error() {
    let mut builder = AiffBuilder::new(1, 16).mono_i16(&[1, 2, 3]);
    builder.frames = 10;
    let err = convert_bytes(&builder.build(), &plain()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_converter_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chirp.aiff");
    std::fs::write(&path, AiffBuilder::new(1, 8).frames_u8(&[&[7], &[8]]).build()).unwrap();

    let converter = Converter::new(&path);
    let conversion = converter.run().unwrap();
    assert_eq!(converter.array_name(), "chirp");
    assert_eq!(
        conversion.to_array(&converter.array_name(), ArrayStyle::Progmem),
        "prog_uchar chirp[] PROGMEM = { 7, 8 };\n"
    );
}
