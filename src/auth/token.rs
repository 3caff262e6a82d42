//! Session token encoding

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::SessionUser;

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    pub name: String,
    pub email: String,
    /// Issued at, unix seconds
    pub iat: i64,
    /// Expires at, unix seconds
    pub exp: i64,
}

impl Claims {
    pub fn user(&self) -> SessionUser {
        SessionUser {
            id: self.sub.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Encode and sign claims
pub fn sign(claims: &Claims, key: &[u8; 32]) -> String {
    // Serializing plain strings and integers cannot fail.
    let payload = serde_json::to_vec(claims).unwrap_or_default();
    let encoded = URL_SAFE_NO_PAD.encode(payload);
    let mac = blake3::keyed_hash(key, encoded.as_bytes());
    format!("{}.{}", encoded, mac.to_hex())
}

/// Check the signature and decode the claims; `None` for anything malformed
pub fn open(token: &str, key: &[u8; 32]) -> Option<Claims> {
    let (encoded, signature) = token.split_once('.')?;

    let bytes: [u8; 32] = hex::decode(signature).ok()?.try_into().ok()?;
    // blake3::Hash equality is constant time.
    if blake3::keyed_hash(key, encoded.as_bytes()) != blake3::Hash::from(bytes) {
        return None;
    }

    let payload = URL_SAFE_NO_PAD.decode(encoded).ok()?;
    serde_json::from_slice(&payload).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> Claims {
        Claims {
            sub: "1".into(),
            name: "Admin".into(),
            email: "admin@example.com".into(),
            iat: 100,
            exp: 200,
        }
    }

    #[test]
    fn test_sign_and_open() {
        let key = blake3::derive_key("test", b"secret");
        let token = sign(&claims(), &key);
        assert_eq!(open(&token, &key), Some(claims()));
    }

    #[test]
    fn test_tampering_is_detected() {
        let key = blake3::derive_key("test", b"secret");
        let token = sign(&claims(), &key);
        let (_, signature) = token.split_once('.').unwrap();

        let mut forged = claims();
        forged.exp = i64::MAX;
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
        assert_eq!(open(&format!("{}.{}", forged_payload, signature), &key), None);

        assert_eq!(open("garbage", &key), None);
        assert_eq!(open("abc.zz", &key), None);
    }
}
