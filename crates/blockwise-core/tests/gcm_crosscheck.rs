//! GCM output checked against RustCrypto's `aes-gcm`.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm, Nonce};
use blockwise_core::{Cipher, Cryptor, Gcm, Padding};
use proptest::prelude::*;

fn reference(key: &[u8], nonce: &[u8; 12], msg: &[u8], aad: &[u8]) -> Vec<u8> {
    let payload = Payload { msg, aad };
    let nonce = Nonce::from_slice(nonce);
    let sealed = match key.len() {
        16 => Aes128Gcm::new_from_slice(key).unwrap().encrypt(nonce, payload),
        32 => Aes256Gcm::new_from_slice(key).unwrap().encrypt(nonce, payload),
        other => panic!("no reference for {} byte keys", other),
    };
    sealed.unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn matches_aes_gcm(
        wide_key in any::<bool>(),
        key in prop::array::uniform32(any::<u8>()),
        nonce in prop::array::uniform12(any::<u8>()),
        msg in prop::collection::vec(any::<u8>(), 0..100),
        aad in prop::collection::vec(any::<u8>(), 0..40),
    ) {
        let key = if wide_key { &key[..] } else { &key[..16] };
        let expected = reference(key, &nonce, &msg, &aad);

        let cipher = Cipher::aes(key, Gcm::new(nonce).with_aad(aad.clone()), Padding::NoPadding).unwrap();
        prop_assert_eq!(&cipher.encrypt(&msg).unwrap(), &expected);
        prop_assert_eq!(cipher.decrypt(&expected).unwrap(), msg);
    }

    /// Streamed in odd-sized pieces, the reference ciphertext still verifies.
    #[test]
    fn streamed_decrypt_of_reference(
        key in prop::array::uniform16(any::<u8>()),
        nonce in prop::array::uniform12(any::<u8>()),
        msg in prop::collection::vec(any::<u8>(), 0..100),
        piece in 1usize..20,
    ) {
        let expected = reference(&key, &nonce, &msg, b"");
        let cipher = Cipher::aes(&key, Gcm::new(nonce), Padding::NoPadding).unwrap();

        let mut dec = cipher.make_decryptor().unwrap();
        let mut out = Vec::new();
        for chunk in expected.chunks(piece) {
            out.extend(dec.update(chunk, false).unwrap());
        }
        out.extend(dec.finish().unwrap());
        prop_assert_eq!(out, msg);
    }
}
