use core::fmt;

use serde::{Deserialize, Serialize};

use super::IdentityError;

/// The at-rest form of a [`KeyIdentity`](super::KeyIdentity).
///
/// `private_key` is a password-encrypted PKCS#8 PEM document, `public_key`
/// a SubjectPublicKeyInfo PEM document. Neither contains the password or the
/// plaintext private key, so this value may be handed to an external store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerializedIdentity {
    pub private_key: String,
    pub public_key: String,
}

impl SerializedIdentity {
    pub fn to_json(&self) -> Result<String, IdentityError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, IdentityError> {
        serde_json::from_str(json).map_err(|err| IdentityError::MalformedKey(err.to_string()))
    }
}

impl fmt::Debug for SerializedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializedIdentity")
            .field("private_key", &"<encrypted>")
            .field("public_key", &self.public_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_field_names() {
        let serialized = SerializedIdentity {
            private_key: "private".to_string(),
            public_key: "public".to_string(),
        };

        let json = serialized.to_json().unwrap();
        assert_eq!(json, r#"{"private_key":"private","public_key":"public"}"#);
        assert_eq!(SerializedIdentity::from_json(&json).unwrap(), serialized);
    }

    #[test]
    fn invalid_json_is_malformed() {
        for json in ["", "{}", r#"{"private_key":"a"}"#, r#"{"private_key":1,"public_key":"b"}"#] {
            assert!(matches!(
                SerializedIdentity::from_json(json),
                Err(IdentityError::MalformedKey(_))
            ));
        }
    }
}
