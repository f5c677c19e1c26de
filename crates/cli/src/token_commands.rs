//! `xid seal`, `xid open` and `xid inspect`.

use std::path::Path;

use {
    anyhow::{Context, Result},
    xid_config::FileKeySource,
    xid_crypto::{CryptoService, NONCE_LEN, TAG_LEN, refresh_once},
    xid_token::{Token, issue_token, redeem_token},
};

/// Build a service loaded with the key set at `path`.
pub async fn load_service(path: &Path) -> Result<CryptoService> {
    let service = CryptoService::new();
    refresh_once(&service, &FileKeySource::new(path))
        .await
        .with_context(|| format!("loading key set {}", path.display()))?;
    Ok(service)
}

pub async fn seal(keys: &Path, plaintext: &str) -> Result<()> {
    let service = load_service(keys).await?;
    let token = issue_token(&service, plaintext.as_bytes())?;
    println!("{token}");
    Ok(())
}

pub async fn open(keys: &Path, token: &str, as_hex: bool) -> Result<()> {
    let service = load_service(keys).await?;
    let plaintext = redeem_token(&service, token.trim())?;
    println!("{}", render_plaintext(&plaintext, as_hex));
    Ok(())
}

pub fn inspect(token: &str) -> Result<()> {
    println!("{}", render_inspect(token)?);
    Ok(())
}

/// Text when the bytes are UTF-8, hex otherwise.
fn render_plaintext(plaintext: &[u8], as_hex: bool) -> String {
    match std::str::from_utf8(plaintext) {
        Ok(text) if !as_hex => text.to_string(),
        _ => hex::encode(plaintext),
    }
}

fn render_inspect(token: &str) -> Result<String> {
    let token: Token = token.trim().parse()?;
    let (key_id, ciphertext) = token.parts()?;

    let mut out = format!(
        "key id:      {key_id}\nciphertext:  {} bytes\n",
        ciphertext.len()
    );
    if ciphertext.len() >= NONCE_LEN + TAG_LEN {
        out.push_str(&format!(
            "nonce:       {}\nsealed data: {} bytes",
            hex::encode(&ciphertext[..NONCE_LEN]),
            ciphertext.len() - NONCE_LEN - TAG_LEN,
        ));
    } else {
        out.push_str("warning:     too short to hold a nonce and tag");
    }
    Ok(out)
}
