//! Containers produced by an independent PBKDF2 + AES-GCM implementation
//! (Python `hashlib` and `cryptography`, compact JSON, strict base64).

use ideavault::container::Container;
use ideavault::session::{UnlockFailed, UnlockSession};
use ideavault::{decrypt, Error, Idea, Ideas, Password};

const INDEPENDENT: &str = include_str!("fixtures/independent_container.txt");
const NOT_A_LIST: &str = include_str!("fixtures/independent_not_a_list.txt");
const PASSWORD: &str = "correcthorsebattery";

#[test]
fn test_decrypts_independent_container() {
    let ideas = decrypt(INDEPENDENT, &Password::from(PASSWORD)).unwrap();
    assert_eq!(ideas, Ideas::new(vec![Idea::new("A").with_tags(["x"])]));
}

#[test]
fn test_independent_container_layout() {
    let container = Container::decode(INDEPENDENT).unwrap();
    let salt: [u8; 16] = core::array::from_fn(|i| i as u8);
    let iv: [u8; 12] = core::array::from_fn(|i| 100 + i as u8);
    assert_eq!(container.salt, salt);
    assert_eq!(container.iv, iv);
    // 28-byte plaintext plus a 16-byte tag.
    assert_eq!(container.ciphertext.len(), 28 + 16);
}

#[test]
fn test_authentic_non_list_payload_is_a_parse_error() {
    let result = decrypt(NOT_A_LIST, &Password::from(PASSWORD));
    assert!(matches!(result, Err(Error::PayloadParse)));
}

#[test]
fn test_viewer_sees_parse_error_as_wrong_password() {
    let mut session = UnlockSession::new(NOT_A_LIST).unwrap();
    let err = session.attempt_unlock(Password::from(PASSWORD)).unwrap_err();
    assert_eq!(err, UnlockFailed);
    assert!(session.ideas().is_none());
}
