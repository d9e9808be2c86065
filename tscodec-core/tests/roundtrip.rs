use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tscodec_core::compression::{Codec, DeltaOfDeltaCodec, XorFloatCodec};
use tscodec_core::config::{CodecConfig, CodecKind, PostCompression};
use tscodec_core::{
    float_bits_to_bytes, floats_to_bytes, timestamps_from_bytes, timestamps_to_bytes, CodecError,
    ElementType,
};

/// A random column each codec accepts.
fn random_column(kind: CodecKind, rng: &mut StdRng, n: usize) -> Vec<u8> {
    match kind {
        CodecKind::GolombRice => {
            let values: Vec<i64> = (0..n).map(|_| rng.gen_range(0..=2047)).collect();
            timestamps_to_bytes(&values)
        }
        CodecKind::BitPacking => {
            let values: Vec<i64> = (0..n).map(|_| rng.gen_range(0..=i64::MAX)).collect();
            timestamps_to_bytes(&values)
        }
        _ => match kind.element_type() {
            Some(ElementType::Float32) => {
                let bits: Vec<u32> = (0..n).map(|_| rng.gen()).collect();
                float_bits_to_bytes(&bits)
            }
            Some(ElementType::Int64) => {
                let values: Vec<i64> = (0..n).map(|_| rng.gen()).collect();
                timestamps_to_bytes(&values)
            }
            None => (0..n).map(|_| rng.gen()).collect(),
        },
    }
}

/// A column shaped like real sensor output: regular timestamps or slowly
/// drifting readings.
fn sensor_column(kind: CodecKind, n: usize) -> Vec<u8> {
    match kind.element_type() {
        Some(ElementType::Float32) => {
            let readings: Vec<f32> = (0..n)
                .map(|i| 20.0 + ((i / 10) as f32) * 0.25)
                .collect();
            floats_to_bytes(&readings)
        }
        _ if kind == CodecKind::GolombRice => {
            let values: Vec<i64> = (0..n as i64).map(|i| (i % 40) + 3).collect();
            timestamps_to_bytes(&values)
        }
        _ => {
            let values: Vec<i64> = (0..n as i64)
                .map(|i| 1697040000000 + i * 1000 + (i % 7 == 0) as i64)
                .collect();
            timestamps_to_bytes(&values)
        }
    }
}

fn assert_roundtrip(codec: &dyn Codec, input: &[u8]) {
    let encoded = codec
        .encode(input)
        .unwrap_or_else(|e| panic!("{} encode failed: {}", codec.name(), e));
    let decoded = codec
        .decode(&encoded)
        .unwrap_or_else(|e| panic!("{} decode failed: {}", codec.name(), e));
    assert_eq!(decoded, input, "{} did not round-trip", codec.name());

    let again = codec.encode(&decoded).unwrap();
    assert_eq!(again, encoded, "{} is not deterministic", codec.name());
}

#[test]
fn test_random_columns_roundtrip() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for kind in CodecKind::ALL {
        let codec = kind.build();
        for n in [1, 2, 3, 17, 256, 1000] {
            let input = random_column(kind, &mut rng, n);
            assert_roundtrip(codec.as_ref(), &input);
        }
    }
}

#[test]
fn test_sensor_columns_roundtrip() {
    for kind in CodecKind::ALL {
        let codec = kind.build();
        assert_roundtrip(codec.as_ref(), &sensor_column(kind, 2000));
    }
}

#[test]
fn test_sensor_columns_roundtrip_with_lz4() {
    for kind in CodecKind::ALL {
        let codec = CodecConfig::new(kind).with_lz4().build();
        assert!(codec.name().ends_with("+LZ4"));
        assert_roundtrip(codec.as_ref(), &sensor_column(kind, 2000));
    }
}

#[test]
fn test_sensor_columns_roundtrip_with_every_post_compression() {
    for post in PostCompression::ALL {
        for kind in [CodecKind::Chimp, CodecKind::Rake, CodecKind::Huffman] {
            let codec = CodecConfig::new(kind).with_post_compression(post).build();
            assert_roundtrip(codec.as_ref(), &sensor_column(kind, 2000));
        }
    }
}

#[test]
fn test_empty_column_everywhere() {
    for kind in CodecKind::ALL {
        for post in PostCompression::ALL {
            let codec = CodecConfig::new(kind).with_post_compression(post).build();
            assert!(codec.encode(&[]).unwrap().is_empty(), "{}", codec.name());
            assert!(codec.decode(&[]).unwrap().is_empty(), "{}", codec.name());
        }
    }
}

#[test]
fn test_constant_columns() {
    for kind in CodecKind::ALL {
        let codec = kind.build();
        let input = match kind.element_type() {
            Some(ElementType::Float32) => floats_to_bytes(&[18.5; 300]),
            _ => timestamps_to_bytes(&[42; 300]),
        };
        assert_roundtrip(codec.as_ref(), &input);
    }
}

#[test]
fn test_regular_timestamps_compress() {
    let input = sensor_column(CodecKind::DeltaOfDelta, 5000);
    for kind in [
        CodecKind::DeltaVarint,
        CodecKind::DeltaOfDelta,
        CodecKind::Sprintz,
        CodecKind::Rlbe,
        CodecKind::Rake,
    ] {
        let encoded = kind.build().encode(&input).unwrap();
        assert!(
            encoded.len() * 2 < input.len(),
            "{} produced {} bytes from {}",
            kind,
            encoded.len(),
            input.len()
        );
    }
}

#[test]
fn test_delta_of_delta_scenario() {
    let input = timestamps_to_bytes(&[1697040000000, 1697040000010, 1697040000020]);
    let encoded = DeltaOfDeltaCodec.encode(&input).unwrap();

    let mut expected = 1697040000000i64.to_be_bytes().to_vec();
    expected.extend([0x14, 0x00]);
    assert_eq!(encoded, expected);
    assert_eq!(DeltaOfDeltaCodec.decode(&encoded).unwrap(), input);
}

#[test]
fn test_gorilla_scenario() {
    let input = float_bits_to_bytes(&[0x41C00000, 0x41C00000, 0x41C08000]);
    let encoded = XorFloatCodec.encode(&input).unwrap();
    assert_eq!(encoded, vec![0, 0, 0, 3, 0x41, 0xC0, 0, 0, 0x70, 0x06]);
    assert_eq!(XorFloatCodec.decode(&encoded).unwrap(), input);
}

#[test]
fn test_single_symbol_huffman() {
    let codec = CodecKind::Huffman.build();
    assert_roundtrip(codec.as_ref(), &[0xAB]);
    assert_roundtrip(codec.as_ref(), &[0xAB; 64]);
}

#[test]
fn test_typed_codecs_reject_ragged_columns() {
    for kind in CodecKind::ALL {
        let Some(element) = kind.element_type() else {
            continue;
        };
        let ragged = vec![0u8; element.width() + 1];
        let err = kind.build().encode(&ragged).unwrap_err();
        assert!(err.is_input_error(), "{}: {}", kind, err);
        assert!(matches!(err, CodecError::MalformedInput { .. }));
    }
}

#[test]
fn test_truncated_streams_are_errors() {
    let mut rng = StdRng::seed_from_u64(7);
    for kind in CodecKind::ALL {
        if kind == CodecKind::Identity {
            continue;
        }
        let codec = kind.build();
        let encoded = codec.encode(&random_column(kind, &mut rng, 64)).unwrap();
        // A single leading byte cannot hold any codec's header.
        let result = codec.decode(&encoded[..1]);
        assert!(result.is_err(), "{} decoded a one-byte stream", kind);
    }
}

#[test]
fn test_golomb_range_enforced() {
    let codec = CodecKind::GolombRice.build();
    let input = timestamps_to_bytes(&[0, 2047, 2048]);
    assert!(matches!(
        codec.encode(&input),
        Err(CodecError::UnsupportedValue(_))
    ));
    let ok = timestamps_to_bytes(&[0, 2047]);
    let decoded = codec.decode(&codec.encode(&ok).unwrap()).unwrap();
    assert_eq!(timestamps_from_bytes(&decoded).unwrap(), vec![0, 2047]);
}
