use argon2::password_hash::Output;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordVerifier;
use argon2::Argon2;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use pbkdf2::Pbkdf2;
use sha2::Sha256;

const MODULAR_PBKDF2_SHA256_PREFIX: &str = "$pbkdf2-sha256$";

/// Hash formats accepted by [`PasswordHasher::verify`](super::PasswordHasher::verify).
///
/// Only [`HashScheme::Pbkdf2`] is ever produced; the others are accepted so
/// credentials stored under an earlier scheme keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    /// PHC string, `$pbkdf2-sha256$i=<rounds>,l=<len>$<salt>$<hash>`
    Pbkdf2,
    /// PHC string produced by Argon2 (`$argon2id$...`)
    Argon2,
    /// Modular crypt bcrypt (`$2b$12$...`)
    Bcrypt,
    /// Modular crypt PBKDF2, `$pbkdf2-sha256$<rounds>$<salt>$<checksum>`
    /// with the adapted base64 alphabet (`.` instead of `+`, no padding)
    ModularPbkdf2Sha256,
    Unknown,
}

impl HashScheme {
    /// Identify the scheme a stored hash was written with.
    pub fn detect(hash: &str) -> Self {
        if ["$2a$", "$2b$", "$2x$", "$2y$"]
            .iter()
            .any(|prefix| hash.starts_with(prefix))
        {
            HashScheme::Bcrypt
        } else if hash.starts_with("$argon2") {
            HashScheme::Argon2
        } else if hash.starts_with("$pbkdf2-sha256$i=")
            || hash.starts_with("$pbkdf2-sha512$i=")
            || hash.starts_with("$pbkdf2$i=")
        {
            HashScheme::Pbkdf2
        } else if hash
            .strip_prefix(MODULAR_PBKDF2_SHA256_PREFIX)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_digit())
        {
            HashScheme::ModularPbkdf2Sha256
        } else {
            HashScheme::Unknown
        }
    }

    /// Check `password` against `hash` using this scheme.
    ///
    /// Malformed hashes never error, they simply do not match.
    pub fn verify(self, password: &str, hash: &str) -> bool {
        match self {
            HashScheme::Pbkdf2 => verify_phc(&Pbkdf2, password, hash),
            HashScheme::Argon2 => verify_phc(&Argon2::default(), password, hash),
            HashScheme::Bcrypt => bcrypt::verify(password, hash).unwrap_or(false),
            HashScheme::ModularPbkdf2Sha256 => verify_modular_pbkdf2(password, hash),
            HashScheme::Unknown => false,
        }
    }
}

fn verify_phc(verifier: &dyn PasswordVerifier, password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| verifier.verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}

fn verify_modular_pbkdf2(password: &str, hash: &str) -> bool {
    let Some(rest) = hash.strip_prefix(MODULAR_PBKDF2_SHA256_PREFIX) else {
        return false;
    };

    let mut fields = rest.splitn(3, '$');
    let (Some(rounds), Some(salt), Some(checksum)) = (fields.next(), fields.next(), fields.next())
    else {
        return false;
    };

    let Ok(rounds) = rounds.parse::<u32>() else {
        return false;
    };
    if rounds == 0 {
        return false;
    }

    let (Some(salt), Some(expected)) = (decode_adapted_base64(salt), decode_adapted_base64(checksum))
    else {
        return false;
    };

    let mut derived = vec![0u8; expected.len()];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, rounds, &mut derived);

    // Output equality is constant-time.
    match (Output::new(&derived), Output::new(&expected)) {
        (Ok(derived), Ok(expected)) => derived == expected,
        _ => false,
    }
}

fn decode_adapted_base64(encoded: &str) -> Option<Vec<u8>> {
    STANDARD_NO_PAD.decode(encoded.replace('.', "+")).ok()
}
