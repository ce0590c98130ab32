//! Minimal AWS Signature Version 4 request signing.
//!
//! Covers exactly what the S3 variant needs: single-shot HEAD/PUT requests
//! with no query string. See the AWS "Signature Version 4 signing process"
//! reference for the canonical-request and key-derivation layout.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Static signing inputs for one request.
pub(crate) struct SigningParams<'a> {
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub region: &'a str,
    pub service: &'a str,
}

/// Headers the caller must attach to the outgoing request.
pub(crate) struct SignedHeaders {
    pub authorization: String,
    pub amz_date: String,
    pub content_sha256: String,
}

/// Hex-encoded SHA-256 of `data`.
pub(crate) fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Derives the SigV4 signing key for `date` (YYYYMMDD).
pub(crate) fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let key = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes());
    let key = hmac_sha256(&key, region.as_bytes());
    let key = hmac_sha256(&key, service.as_bytes());
    hmac_sha256(&key, b"aws4_request")
}

/// URI-encodes a path per AWS rules: unreserved characters stay literal,
/// `/` separates segments, everything else becomes uppercase `%XX`.
pub(crate) fn uri_encode_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(byte as char);
            }
            _ => {
                out.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    out
}

/// Signs a request with no query string.
///
/// `canonical_path` must be the already-encoded absolute path that will be
/// sent on the wire. `extra_headers` are additional signed headers with
/// lowercase names; `host`, `x-amz-content-sha256` and `x-amz-date` are
/// always included.
pub(crate) fn sign_request(
    params: &SigningParams<'_>,
    method: &str,
    host: &str,
    canonical_path: &str,
    extra_headers: &[(&str, &str)],
    payload_hash: &str,
    now: DateTime<Utc>,
) -> SignedHeaders {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();

    let mut headers: Vec<(&str, &str)> = vec![
        ("host", host),
        ("x-amz-content-sha256", payload_hash),
        ("x-amz-date", amz_date.as_str()),
    ];
    headers.extend_from_slice(extra_headers);
    headers.sort_unstable_by_key(|(name, _)| *name);

    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{}\n", value.trim()))
        .collect();
    let signed_header_names = headers
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(";");

    let canonical_request = format!(
        "{method}\n{canonical_path}\n\n{canonical_headers}\n{signed_header_names}\n{payload_hash}"
    );

    let scope = format!(
        "{date}/{}/{}/aws4_request",
        params.region, params.service
    );
    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    );

    let key = signing_key(params.secret_access_key, &date, params.region, params.service);
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

    let authorization = format!(
        "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_header_names}, \
         Signature={signature}",
        params.access_key_id
    );

    SignedHeaders {
        authorization,
        amz_date,
        content_sha256: payload_hash.to_string(),
    }
}
