//! SASL initial-response encoders for AUTHENTICATE.
//!
//! Only single-shot mechanisms are supported: the credential goes out as the
//! initial response on the AUTHENTICATE line, and no challenge round-trips
//! are required.

use weft_mime::encoding::encode_base64;

/// Builds the PLAIN initial response (RFC 4616):
/// `base64(authzid NUL authcid NUL password)` with an empty authzid.
#[must_use]
pub fn plain_initial_response(authcid: &str, password: &str) -> String {
    encode_base64(format!("\0{authcid}\0{password}").as_bytes())
}

/// Builds the XOAUTH2 initial response:
/// `base64("user=" user \x01 "auth=Bearer " token \x01\x01)`.
#[must_use]
pub fn xoauth2_initial_response(user: &str, access_token: &str) -> String {
    encode_base64(format!("user={user}\x01auth=Bearer {access_token}\x01\x01").as_bytes())
}
