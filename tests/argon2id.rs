use argon2id::{Error, ParamError, Params, Version, argon2id};
use assert_matches::assert_matches;
use hex_literal::hex;

#[test]
fn argon2id_is_deterministic() {
    let params = Params::new(3, 32, 4, 32);
    let a = argon2id(b"password", b"saltsalt", &params).unwrap();
    let b = argon2id(b"password", b"saltsalt", &params).unwrap();
    assert_eq!(a, b);
}

#[test]
fn argon2id_changes_with_salt() {
    let params = Params::new(3, 32, 4, 32);
    let a = argon2id(b"password", b"saltAAAA", &params).unwrap();
    let b = argon2id(b"password", b"saltBBBB", &params).unwrap();
    assert_ne!(a, b);
}

#[test]
fn argon2id_simple_vectors() {
    let params1 = Params::new(1, 32, 1, 32);
    let result1 = argon2id(b"password", b"saltsalt", &params1).unwrap();
    assert_eq!(result1.len(), 32);

    let params2 = Params::new(2, 64, 2, 32);
    let result2 = argon2id(b"password", b"saltsalt", &params2).unwrap();
    assert_ne!(result1, result2);

    let result3 = argon2id(b"different", b"saltsalt", &params1).unwrap();
    assert_ne!(result1, result3);
}

/// RFC 9106 test vector for Argon2id
/// Section 5.3 - Argon2id Test Vectors
///
/// Input:
///   password: 32 bytes of 0x01
///   salt: 16 bytes of 0x02
///   secret: 8 bytes of 0x03
///   associated data: 12 bytes of 0x04
///   parallelism: 4
///   tag length: 32
///   memory: 32 (KiB)
///   iterations: 3
///   version: 0x13
///   type: Argon2id (2)
#[test]
fn argon2id_rfc9106_test_vector() {
    let password = [0x01u8; 32];
    let salt = [0x02u8; 16];

    let params = Params::new(3, 32, 4, 32)
        .with_secret([0x03u8; 8])
        .with_associated_data([0x04u8; 12]);

    let result = argon2id(&password, &salt, &params).unwrap();

    assert_eq!(
        result,
        hex!("0d640df58d78766c08c037a34a8b53c9d01ef0452d75b65eb52520e96b01e659"),
        "Argon2id output does not match RFC 9106 test vector"
    );
}

/// The RFC vector without secret and associated data must differ: both are
/// bound into H0.
#[test]
fn argon2id_secret_and_associated_data_are_bound() {
    let password = [0x01u8; 32];
    let salt = [0x02u8; 16];
    let bare = argon2id(&password, &salt, &Params::new(3, 32, 4, 32)).unwrap();

    assert_ne!(
        bare,
        hex!("0d640df58d78766c08c037a34a8b53c9d01ef0452d75b65eb52520e96b01e659")
    );
}

/// Test with minimum parameters
#[test]
fn argon2id_minimum_params() {
    let result = argon2id(b"pass", b"s", &Params::new(1, 8, 1, 4)).unwrap();
    assert_eq!(result.len(), 4);
}

#[test]
fn argon2id_accepts_empty_password() {
    let result = argon2id(b"", b"saltsalt", &Params::new(1, 8, 1, 32)).unwrap();
    assert_eq!(result.len(), 32);
}

/// Test different tag lengths, on both sides of the 64-byte H' boundary
#[test]
fn argon2id_various_tag_lengths() {
    for tag_len in [4, 16, 32, 64, 65, 128, 1024] {
        let out = argon2id(b"password", b"saltsalt", &Params::new(1, 32, 1, tag_len)).unwrap();
        assert_eq!(out.len(), tag_len);
    }
}

/// Memory costs that are not a multiple of 4 x lanes are rounded down, but
/// the requested value still enters H0.
#[test]
fn argon2id_rounded_memory_still_binds_requested_cost() {
    let a = argon2id(b"password", b"saltsalt", &Params::new(1, 32, 4, 32)).unwrap();
    let b = argon2id(b"password", b"saltsalt", &Params::new(1, 33, 4, 32)).unwrap();
    assert_ne!(a, b);
}

#[test]
fn argon2id_legacy_version_differs_on_later_passes() {
    let params = Params::new(2, 32, 1, 32);
    let v13 = argon2id(b"password", b"saltsalt", &params).unwrap();
    let v10 = argon2id(b"password", b"saltsalt", &params.with_version(Version::V0x10)).unwrap();
    assert_ne!(v13, v10);
}

#[test]
fn argon2id_rejects_invalid_parameters() {
    let cases = [
        (Params::new(0, 32, 1, 32), ParamError::TimeTooSmall),
        (Params::new(1, 7, 1, 32), ParamError::MemoryTooLittle),
        (Params::new(1, 32, 0, 32), ParamError::TooFewLanes),
        (Params::new(1, u32::MAX, 1 << 24, 32), ParamError::TooManyLanes),
        (Params::new(1, 32, 1, 3), ParamError::OutputTooShort),
    ];

    for (params, expected) in cases {
        assert_eq!(
            argon2id(b"password", b"saltsalt", &params),
            Err(Error::InvalidParameters(expected))
        );
    }

    assert_matches!(
        argon2id(b"password", b"", &Params::new(1, 32, 1, 32)),
        Err(Error::InvalidParameters(ParamError::SaltTooShort))
    );
}

/// Test with recommended OWASP parameters
#[test]
fn argon2id_recommended_params() {
    let params = Params::new(2, 19456, 1, 32);
    let result = argon2id(b"my_secure_password", b"random_salt_16_b", &params).unwrap();
    assert_eq!(result.len(), 32);
}
