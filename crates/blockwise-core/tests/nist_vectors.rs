//! Known-answer tests: FIPS-197, SP 800-38A, SP 800-38C and the GCM
//! reference vectors.

use blockwise_core::{
    Aes, BlockCipher, Cbc, Ccm, Cfb, Cipher, CipherError, Cryptor, Ctr, Ecb, Gcm, Ofb, Padding,
    SegmentSize, TagPlacement,
};
use hex_literal::hex;

const KEY_38A: [u8; 16] = hex!("2b7e151628aed2a6abf7158809cf4f3c");
const IV_38A: [u8; 16] = hex!("000102030405060708090a0b0c0d0e0f");
const PT_38A: [u8; 64] = hex!(
    "6bc1bee22e409f96e93d7e117393172a"
    "ae2d8a571e03ac9c9eb76fac45af8e51"
    "30c81c46a35ce411e5fbc1191a0a52ef"
    "f69f2445df4f9b17ad2b417be66c3710"
);

fn assert_roundtrip(cipher: &Cipher, plaintext: &[u8], expected: &[u8]) {
    let ct = cipher.encrypt(plaintext).unwrap();
    assert_eq!(ct, expected);
    assert_eq!(cipher.decrypt(&ct).unwrap(), plaintext);
}

// ═══════════════════════════════════════════════════════════════════════════
// FIPS-197
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_fips197_aes128_zero() {
    let cipher = Cipher::aes(&[0u8; 16], Ecb, Padding::NoPadding).unwrap();
    assert_roundtrip(&cipher, &[0u8; 16], &hex!("66e94bd4ef8a2c3b884cfa59ca342b2e"));
}

#[test]
fn test_fips197_appendix_c() {
    let pt = hex!("00112233445566778899aabbccddeeff");
    let cases: [(&[u8], [u8; 16]); 3] = [
        (
            &hex!("000102030405060708090a0b0c0d0e0f"),
            hex!("69c4e0d86a7b0430d8cdb78070b4c55a"),
        ),
        (
            &hex!("000102030405060708090a0b0c0d0e0f1011121314151617"),
            hex!("dda97ca4864cdfe06eaf70a0ec0d7191"),
        ),
        (
            &hex!("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f"),
            hex!("8ea2b7ca516745bfeafc49904b496089"),
        ),
    ];
    for (key, expected) in cases {
        let aes = Aes::new(key).unwrap();
        let mut block = pt;
        aes.encrypt_block(&mut block);
        assert_eq!(block, expected);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SP 800-38A (AES-128)
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_sp800_38a_ecb() {
    let cipher = Cipher::aes(&KEY_38A, Ecb, Padding::NoPadding).unwrap();
    assert_roundtrip(
        &cipher,
        &PT_38A,
        &hex!(
            "3ad77bb40d7a3660a89ecaf32466ef97"
            "f5d3d58503b9699de785895a96fdbaaf"
            "43b1cd7f598ece23881b00e3ed030688"
            "7b0c785e27e8ad3f8223207104725dd4"
        ),
    );
}

#[test]
fn test_sp800_38a_cbc() {
    let cipher = Cipher::aes(&KEY_38A, Cbc::new(IV_38A), Padding::NoPadding).unwrap();
    assert_roundtrip(
        &cipher,
        &PT_38A,
        &hex!(
            "7649abac8119b246cee98e9b12e9197d"
            "5086cb9b507219ee95db113a917678b2"
            "73bed6b8e3c1743b7116e69e22229516"
            "3ff1caa1681fac09120eca307586e1a7"
        ),
    );
}

#[test]
fn test_sp800_38a_cbc_single_block() {
    let cipher = Cipher::aes(&KEY_38A, Cbc::new(IV_38A), Padding::NoPadding).unwrap();
    assert_roundtrip(
        &cipher,
        &PT_38A[..16],
        &hex!("7649abac8119b246cee98e9b12e9197d"),
    );
}

#[test]
fn test_sp800_38a_cfb128() {
    let cipher = Cipher::aes(&KEY_38A, Cfb::new(IV_38A), Padding::NoPadding).unwrap();
    assert_roundtrip(
        &cipher,
        &PT_38A,
        &hex!(
            "3b3fd92eb72dad20333449f8e83cfb4a"
            "c8a64537a0b3a93fcde3cdad9f1ce58b"
            "26751f67a3cbb140b1808cf187a4f4df"
            "c04b05357c5d1c0eeac4c66f9ff7f2e6"
        ),
    );
}

#[test]
fn test_sp800_38a_cfb8() {
    let mode = Cfb::with_segment_size(IV_38A, SegmentSize::Cfb8);
    let cipher = Cipher::aes(&KEY_38A, mode, Padding::NoPadding).unwrap();
    assert_roundtrip(
        &cipher,
        &hex!("6bc1bee22e409f96e93d7e117393172aae2d"),
        &hex!("3b79424c9c0dd436bace9e0ed4586a4f32b9"),
    );
}

#[test]
fn test_sp800_38a_ofb() {
    let cipher = Cipher::aes(&KEY_38A, Ofb::new(IV_38A), Padding::NoPadding).unwrap();
    assert_roundtrip(
        &cipher,
        &PT_38A,
        &hex!(
            "3b3fd92eb72dad20333449f8e83cfb4a"
            "7789508d16918f03f53c52dac54ed825"
            "9740051e9c5fecf64344f7a82260edcc"
            "304c6528f659c77866a510d9c1d6ae5e"
        ),
    );
}

#[test]
fn test_sp800_38a_ctr() {
    let counter = hex!("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff");
    let cipher = Cipher::aes(&KEY_38A, Ctr::new(counter), Padding::NoPadding).unwrap();
    assert_roundtrip(
        &cipher,
        &PT_38A,
        &hex!(
            "874d6191b620e3261bef6864990db6ce"
            "9806f66b7970fdff8617187bb9fffdff"
            "5ae4df3edbd5d35e5b4f09020db03eab"
            "1e031dda2fbe03d1792170a0f3009cee"
        ),
    );
}

#[test]
fn test_sp800_38a_ctr_seek_third_block() {
    let counter = hex!("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff");
    let cipher = Cipher::aes(&KEY_38A, Ctr::new(counter), Padding::NoPadding).unwrap();
    let mut enc = cipher.make_encryptor().unwrap();
    enc.seek(32).unwrap();
    assert_eq!(
        enc.finish_with(&PT_38A[32..48]).unwrap(),
        hex!("5ae4df3edbd5d35e5b4f09020db03eab")
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// GCM
// ═══════════════════════════════════════════════════════════════════════════

const GCM_KEY: [u8; 16] = hex!("feffe9928665731c6d6a8f9467308308");
const GCM_PT: [u8; 60] = hex!(
    "d9313225f88406e5a55909c5aff5269a"
    "86a7a9531534f7da2e4c303d8a318a72"
    "1c3c0c95956809532fcf0e2449a6b525"
    "b16aedf5aa0de657ba637b39"
);
const GCM_AAD: [u8; 20] = hex!("feedfacedeadbeeffeedfacedeadbeefabaddad2");

#[test]
fn test_gcm_zero_key_empty_plaintext() {
    let cipher = Cipher::aes(&[0u8; 16], Gcm::new([0u8; 12]), Padding::NoPadding).unwrap();
    assert_roundtrip(&cipher, &[], &hex!("58e2fccefa7e3061367f1d57a4e7455a"));
}

#[test]
fn test_gcm_zero_key_one_block() {
    let cipher = Cipher::aes(&[0u8; 16], Gcm::new([0u8; 12]), Padding::NoPadding).unwrap();
    assert_roundtrip(
        &cipher,
        &[0u8; 16],
        &hex!("0388dace60b6a392f328c2b971b2fe78" "ab6e47d42cec13bdf53a67b21257bddf"),
    );
}

#[test]
fn test_gcm_with_aad() {
    let mode = Gcm::new(hex!("cafebabefacedbaddecaf888")).with_aad(GCM_AAD);
    let cipher = Cipher::aes(&GCM_KEY, mode, Padding::NoPadding).unwrap();
    assert_roundtrip(
        &cipher,
        &GCM_PT,
        &hex!(
            "42831ec2217774244b7221b784d0d49c"
            "e3aa212f2c02a4e035c17e2329aca12e"
            "21d514b25466931c7d8f6a5aac84aa05"
            "1ba30b396a0aac973d58e091"
            "5bc94fbc3221a5db94fae95ae7121a47"
        ),
    );
}

#[test]
fn test_gcm_60_byte_iv() {
    let iv = hex!(
        "9313225df88406e555909c5aff5269aa"
        "6a7a9538534f7da1e4c303d2a318a728"
        "c3c0c95156809539fcf0e2429a6b5254"
        "16aedbf5a0de6a57a637b39b"
    );
    let cipher = Cipher::aes(&GCM_KEY, Gcm::new(iv).with_aad(GCM_AAD), Padding::NoPadding).unwrap();
    assert_roundtrip(
        &cipher,
        &GCM_PT,
        &hex!(
            "8ce24998625615b603a033aca13fb894"
            "be9112a5c3a211a8ba262a3cca7e2ca7"
            "01e4a9a4fba43c90ccdcb281d48c7c6f"
            "d62875d2aca417034c34aee5"
            "619cc5aefffe0bfa462af43c1699d050"
        ),
    );
}

#[test]
fn test_gcm_truncated_tag() {
    let mode = Gcm::new(hex!("cafebabefacedbaddecaf888"))
        .with_aad(GCM_AAD)
        .with_tag_length(12);
    let cipher = Cipher::aes(&GCM_KEY, mode, Padding::NoPadding).unwrap();
    let ct = cipher.encrypt(&GCM_PT).unwrap();
    assert_eq!(&ct[60..], &hex!("5bc94fbc3221a5db94fae95a"));
    assert_eq!(cipher.decrypt(&ct).unwrap(), GCM_PT);
}

#[test]
fn test_gcm_detached_vector() {
    let iv = hex!("cafebabefacedbaddecaf888");
    let mode = Gcm::new(iv)
        .with_aad(GCM_AAD)
        .with_placement(TagPlacement::Detached);
    let cipher = Cipher::aes(&GCM_KEY, mode, Padding::NoPadding).unwrap();
    let (ct, tag) = cipher.encrypt_detached(&GCM_PT).unwrap();
    assert_eq!(tag, hex!("5bc94fbc3221a5db94fae95ae7121a47"));

    let verify = Gcm::new(iv).with_aad(GCM_AAD).with_authentication_tag(tag);
    let decipher = Cipher::aes(&GCM_KEY, verify, Padding::NoPadding).unwrap();
    assert_eq!(decipher.decrypt(&ct).unwrap(), GCM_PT);

    let wrong = Gcm::new(iv).with_aad(GCM_AAD).with_authentication_tag([0u8; 16]);
    let decipher = Cipher::aes(&GCM_KEY, wrong, Padding::NoPadding).unwrap();
    assert_eq!(decipher.decrypt(&ct), Err(CipherError::AuthenticationFailed));
}

#[test]
fn test_gcm_detached_decrypt_needs_tag() {
    let mode = Gcm::new([0u8; 12]).with_placement(TagPlacement::Detached);
    let cipher = Cipher::aes(&[0u8; 16], mode, Padding::NoPadding).unwrap();
    assert!(cipher.make_encryptor().is_ok());
    assert_eq!(
        cipher.make_decryptor().err(),
        Some(CipherError::MissingAuthenticationTag)
    );
}

#[test]
fn test_gcm_short_input_missing_tag() {
    let cipher = Cipher::aes(&[0u8; 16], Gcm::new([0u8; 12]), Padding::NoPadding).unwrap();
    assert_eq!(
        cipher.decrypt(&[0u8; 15]),
        Err(CipherError::MissingAuthenticationTag)
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// SP 800-38C (CCM)
// ═══════════════════════════════════════════════════════════════════════════

const CCM_KEY: [u8; 16] = hex!("404142434445464748494a4b4c4d4e4f");

#[test]
fn test_sp800_38c_example_1() {
    let mode = Ccm::new(hex!("10111213141516"), 4)
        .with_aad(hex!("0001020304050607"))
        .with_message_length(4);
    let cipher = Cipher::aes(&CCM_KEY, mode, Padding::NoPadding).unwrap();
    assert_roundtrip(&cipher, &hex!("20212223"), &hex!("7162015b4dac255d"));
}

#[test]
fn test_sp800_38c_example_2() {
    let mode = Ccm::new(hex!("1011121314151617"), 6)
        .with_aad(hex!("000102030405060708090a0b0c0d0e0f"))
        .with_message_length(16);
    let cipher = Cipher::aes(&CCM_KEY, mode, Padding::NoPadding).unwrap();
    assert_roundtrip(
        &cipher,
        &hex!("202122232425262728292a2b2c2d2e2f"),
        &hex!("d2a1f0e051ea5f62081a7792073d593d" "1fc64fbfaccd"),
    );
}

#[test]
fn test_sp800_38c_example_3() {
    let mode = Ccm::new(hex!("101112131415161718191a1b"), 8)
        .with_aad(hex!("000102030405060708090a0b0c0d0e0f10111213"))
        .with_message_length(24);
    let cipher = Cipher::aes(&CCM_KEY, mode, Padding::NoPadding).unwrap();
    assert_roundtrip(
        &cipher,
        &hex!("202122232425262728292a2b2c2d2e2f3031323334353637"),
        &hex!(
            "e3b201a9f5b71a7a9b1ceaeccd97e70b"
            "6176aad9a4428aa5"
            "484392fbc1b09951"
        ),
    );
}

#[test]
fn test_ccm_declared_length_enforced() {
    let mode = Ccm::new(hex!("10111213141516"), 4)
        .with_aad(hex!("0001020304050607"))
        .with_message_length(5);
    let cipher = Cipher::aes(&CCM_KEY, mode, Padding::NoPadding).unwrap();
    assert_eq!(
        cipher.encrypt(&hex!("20212223")),
        Err(CipherError::InvalidMessageLength {
            expected: 5,
            got: 4
        })
    );
}

#[test]
fn test_ccm_detached_tag() {
    let nonce = hex!("10111213141516");
    let mode = Ccm::new(nonce, 4)
        .with_aad(hex!("0001020304050607"))
        .with_message_length(4)
        .with_placement(TagPlacement::Detached);
    let cipher = Cipher::aes(&CCM_KEY, mode, Padding::NoPadding).unwrap();
    let (ct, tag) = cipher.encrypt_detached(&hex!("20212223")).unwrap();
    assert_eq!(ct, hex!("7162015b"));
    assert_eq!(tag, hex!("4dac255d"));

    let verify = Ccm::new(nonce, 4)
        .with_aad(hex!("0001020304050607"))
        .with_message_length(4)
        .with_authentication_tag(tag);
    let decipher = Cipher::aes(&CCM_KEY, verify, Padding::NoPadding).unwrap();
    assert_eq!(decipher.decrypt(&ct).unwrap(), hex!("20212223"));
}
