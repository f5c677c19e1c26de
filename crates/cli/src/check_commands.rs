//! `xid check`: validate a key-set file before it reaches production.
//!
//! Parses the file, rotates it into a throwaway service and round-trips a
//! probe token, printing `[ok]`, `[warn]`, `[fail]` or `[info]` per item.

use std::path::Path;

use {
    anyhow::Result,
    xid_crypto::CryptoService,
    xid_token::{MAX_KEY_ID, TokenError, issue_token, redeem_token},
};

// ── ANSI helpers ────────────────────────────────────────────────────────────

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const PROBE: &[u8] = b"xid-check-probe";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Warn,
    Fail,
    Info,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warn => "warn",
            Self::Fail => "fail",
            Self::Info => "info",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Self::Ok => GREEN,
            Self::Warn => YELLOW,
            Self::Fail => RED,
            Self::Info => CYAN,
        }
    }
}

struct Section {
    title: String,
    items: Vec<(Status, String)>,
}

impl Section {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }

    fn push(&mut self, status: Status, message: impl Into<String>) {
        self.items.push((status, message.into()));
    }

    fn count(&self, status: Status) -> usize {
        self.items.iter().filter(|(s, _)| *s == status).count()
    }
}

fn print_report(section: &Section) {
    eprintln!("{BOLD}{}{RESET}", section.title);
    for (status, message) in &section.items {
        eprintln!("  [{}{}{RESET}]  {message}", status.color(), status.label());
    }
    eprintln!();
}

// ── Entry point ─────────────────────────────────────────────────────────────

pub fn check(path: &Path) -> Result<()> {
    let section = check_key_set(path);
    print_report(&section);

    let errors = section.count(Status::Fail);
    let warnings = section.count(Status::Warn);
    eprintln!("{BOLD}Summary:{RESET} {errors} error(s), {warnings} warning(s)");

    if errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn check_key_set(path: &Path) -> Section {
    let mut section = Section::new(format!("Key set ({})", path.display()));

    let keys = match xid_config::load_key_set(path) {
        Ok(keys) => {
            section.push(Status::Ok, "file parses");
            keys
        },
        Err(e) => {
            section.push(Status::Fail, e.to_string());
            return section;
        },
    };

    let enc_id = keys.encryption.id;
    if enc_id > MAX_KEY_ID {
        section.push(
            Status::Warn,
            format!("encryption key id {enc_id} exceeds {MAX_KEY_ID}; tokens cannot carry it"),
        );
    } else {
        section.push(Status::Info, format!("encryption key id {enc_id}"));
    }

    let service = CryptoService::new();
    if let Err(e) = service.rotate_keys(&keys) {
        section.push(Status::Fail, format!("rotation rejected ({}): {e}", e.kind()));
        return section;
    }

    if let Some(snapshot) = service.keys().snapshot() {
        let ids: Vec<String> = snapshot
            .decryption_ids()
            .iter()
            .map(ToString::to_string)
            .collect();
        section.push(
            Status::Info,
            format!("decryption key ids: {}", ids.join(", ")),
        );
    }
    if !keys.decryption.contains_key(&enc_id) {
        section.push(
            Status::Warn,
            format!("encryption key {enc_id} missing from decryption set; added automatically"),
        );
    }

    match issue_token(&service, PROBE).and_then(|token| redeem_token(&service, token.as_str())) {
        Ok(plaintext) if plaintext == PROBE => {
            section.push(Status::Ok, "probe token round-trips");
        },
        Ok(_) => section.push(Status::Fail, "probe token opened to different bytes"),
        Err(e @ TokenError::KeyIdOutOfRange(_)) => {
            section.push(Status::Warn, format!("probe token: {e}"));
        },
        Err(e) => section.push(Status::Fail, format!("probe token: {e}")),
    }

    section
}
