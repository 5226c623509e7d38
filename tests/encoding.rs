use argon2id::{DecodedHash, Error, Params, Version, decode, encode, encoded_len};
use assert_matches::assert_matches;

#[test]
fn encode_uses_unpadded_standard_base64() {
    let params = Params::new(3, 4096, 2, 5);
    let encoded = encode(&params, &[0xfb, 0xff], &[0xff; 5]).unwrap();
    assert_eq!(encoded, "$argon2id$v=19$m=4096,t=3,p=2$+/8$//////8");
}

#[test]
fn encode_then_decode_restores_everything() {
    let params = Params::new(7, 1024, 3, 48);
    let salt = b"0123456789abcdef".to_vec();
    let digest: Vec<u8> = (0..48).collect();

    let encoded = encode(&params, &salt, &digest).unwrap();
    assert_eq!(Some(encoded.len()), encoded_len(&params, salt.len(), digest.len()));

    let decoded = decode(&encoded).unwrap();
    assert_eq!(
        decoded,
        DecodedHash {
            version: Version::V0x13,
            memory_cost_kib: 1024,
            time_cost: 7,
            parallelism: 3,
            salt,
            digest,
        }
    );
    assert_eq!(decoded.params(), params);
}

#[test]
fn legacy_version_is_written_explicitly() {
    let params = Params::new(1, 8, 1, 4).with_version(Version::V0x10);
    let encoded = encode(&params, b"salt", b"dig!").unwrap();
    assert!(encoded.starts_with("$argon2id$v=16$m=8,t=1,p=1$"));
    assert_eq!(decode(&encoded).unwrap().version, Version::V0x10);
}

#[test]
fn decode_is_strict_about_field_order_and_keys() {
    for encoded in [
        "$argon2id$v=19$t=2,m=256,p=1$c29tZXNhbHQ$nf65EOgLrQMR/uIPnA4rEsF5h7TKyQwu9U1bMCHGi/4",
        "$argon2id$v=19$m=256,t=2$c29tZXNhbHQ$nf65EOgLrQMR/uIPnA4rEsF5h7TKyQwu9U1bMCHGi/4",
        "$argon2id$v=19$m=256, t=2,p=1$c29tZXNhbHQ$nf65EOgLrQMR/uIPnA4rEsF5h7TKyQwu9U1bMCHGi/4",
        "$argon2id$V=19$m=256,t=2,p=1$c29tZXNhbHQ$nf65EOgLrQMR/uIPnA4rEsF5h7TKyQwu9U1bMCHGi/4",
        "argon2id$v=19$m=256,t=2,p=1$c29tZXNhbHQ$nf65EOgLrQMR/uIPnA4rEsF5h7TKyQwu9U1bMCHGi/4",
        "$argon2id$v=19$m=256,t=2,p=1$c29tZXNhbHQ$nf65EOgLrQMR/uIPnA4rEsF5h7TKyQwu9U1bMCHGi/4 ",
        "$argon2id$v=19$m=,t=2,p=1$c29tZXNhbHQ$nf65EOgLrQMR/uIPnA4rEsF5h7TKyQwu9U1bMCHGi/4",
    ] {
        assert_matches!(decode(encoded), Err(Error::MalformedEncoding(_)), "{encoded:?}");
    }
}

#[test]
fn decode_reports_lengths_separately() {
    assert_matches!(
        decode("$argon2id$v=19$m=256,t=2,p=1$c29tZXNhbHQ$AAAA"),
        Err(Error::InvalidLength(_))
    );
    assert_matches!(
        decode("$argon2id$v=19$m=256,t=2,p=1$c$nf65EOgLrQMR/uIPnA4rEsF5h7TKyQwu9U1bMCHGi/4"),
        Err(Error::InvalidLength(_))
    );
}

#[test]
fn decoded_hash_parses_via_from_str() {
    let decoded: DecodedHash =
        "$argon2id$v=19$m=256,t=2,p=1$c29tZXNhbHQ$nf65EOgLrQMR/uIPnA4rEsF5h7TKyQwu9U1bMCHGi/4"
            .parse()
            .unwrap();
    assert_eq!(decoded.params(), Params::new(2, 256, 1, 32));
}
