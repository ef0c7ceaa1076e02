//! Cloudflare email-protection decoding.
//!
//! Cloudflare hides addresses behind a hex payload (`data-cfemail="..."` or a
//! `/cdn-cgi/l/email-protection#...` link). The first byte is an XOR key and
//! every following byte is one plaintext character XOR'd with that key.

/// Link marker used by Cloudflare-protected `mailto` anchors.
pub const EMAIL_PROTECTION_MARKER: &str = "/cdn-cgi/l/email-protection#";

/// Attribute carrying an obfuscated address on arbitrary elements.
pub const CFEMAIL_ATTR: &str = "data-cfemail";

/// Decode a Cloudflare-obfuscated email payload.
///
/// Returns an empty string for anything that is not an even-length run of
/// hex digits, so callers can treat the result as "no email found".
///
/// ```
/// use contact_scraper::obfuscation::decode_cloudflare_email;
///
/// assert_eq!(decode_cloudflare_email("422302206c2127"), "a@b.ce");
/// assert_eq!(decode_cloudflare_email("zz"), "");
/// ```
pub fn decode_cloudflare_email(cf: &str) -> String {
    try_decode(cf).unwrap_or_default()
}

fn try_decode(cf: &str) -> Option<String> {
    let bytes = hex::decode(cf).ok()?;
    let (key, rest) = bytes.split_first()?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.iter().map(|b| char::from(b ^ key)).collect())
}

/// Encode an address the way Cloudflare does. Mostly useful for fixtures.
pub fn encode_cloudflare_email(email: &str, key: u8) -> String {
    let payload: Vec<u8> = std::iter::once(key)
        .chain(email.bytes().map(|b| b ^ key))
        .collect();
    hex::encode(payload)
}
