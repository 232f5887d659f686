//! Property-based tests for the password cipher round trip.
//!
//! Key derivation runs 100000 PBKDF2 iterations per call, so the case count
//! is kept low.

use proptest::prelude::*;
use widechat_session::services::crypto_service::{PasswordCipher, PasswordCipherTrait};

fn arb_email() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9.]{0,12}", "[a-z]{2,10}").prop_map(|(user, host)| format!("{}@{}.com", user, host))
}

// **Property: Encryption round-trip**
//
// *For any* password and email, encrypting with the email as passphrase and
// decrypting with the same email SHALL return the original password.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn encrypt_then_decrypt_returns_password(
        password in "\\PC{0,40}",
        email in arb_email(),
    ) {
        let cipher = PasswordCipher::new();
        let blob = cipher.encrypt(&password, &email).expect("encryption should succeed");
        let decrypted = cipher.decrypt(&blob, &email).expect("decryption should succeed");
        prop_assert_eq!(decrypted.as_str(), password.as_str());
    }

    #[test]
    fn decrypt_with_other_email_fails(
        password in "[a-zA-Z0-9]{1,20}",
        email in arb_email(),
        other in arb_email(),
    ) {
        prop_assume!(email != other);
        let cipher = PasswordCipher::new();
        let blob = cipher.encrypt(&password, &email).expect("encryption should succeed");
        prop_assert!(cipher.decrypt(&blob, &other).is_none());
    }
}
