//! `xid keygen`: fresh key material for operators.

use {anyhow::Result, xid_crypto::KeyMaterial};

pub fn keygen(id: Option<u8>) -> Result<()> {
    println!("{}", render_keygen(id)?);
    Ok(())
}

/// Either a bare hex key or a one-key key-set document ready for `--keys`.
fn render_keygen(id: Option<u8>) -> Result<String> {
    let key = KeyMaterial::generate_hex()?;
    let Some(id) = id else {
        return Ok(key);
    };

    if id > xid_token::MAX_KEY_ID {
        tracing::warn!(
            key_id = id,
            max = xid_token::MAX_KEY_ID,
            "key id cannot be carried in tokens"
        );
    }

    let doc = serde_json::json!({
        "encryption": { "id": id, "value": key },
        "decryption": { id.to_string(): key },
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, xid_crypto::CryptoService};

    #[test]
    fn bare_key_is_64_hex_chars() {
        let key = render_keygen(None).unwrap();
        assert_eq!(key.len(), 64);
        assert!(KeyMaterial::from_hex(&key).is_ok());
    }

    #[test]
    fn key_set_document_can_be_rotated_in() {
        let doc = render_keygen(Some(3)).unwrap();
        let keys = xid_config::parse_key_set(&doc, std::path::Path::new("keygen")).unwrap();
        assert_eq!(keys.encryption.id, 3);

        let service = CryptoService::new();
        service.rotate_keys(&keys).unwrap();
        assert_eq!(service.keys().current_encryption_key().unwrap().0, 3);
    }
}
