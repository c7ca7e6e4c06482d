use portal_core::{AppError, AppResult};
use portal_domain::AccessCode;

/// Generates a cryptographically random bearer token (64 hex characters).
pub(super) fn generate_token() -> AppResult<String> {
    use std::fmt::Write;

    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes)
        .map_err(|error| AppError::Internal(format!("failed to generate access token: {error}")))?;

    let token = bytes
        .iter()
        .fold(String::with_capacity(64), |mut acc, byte| {
            let _ = write!(acc, "{byte:02x}");
            acc
        });

    Ok(token)
}

/// Mints an access code of the form `WRD-{unix-seconds}-{7 random chars}`.
pub(super) fn generate_code(now: chrono::DateTime<chrono::Utc>) -> AppResult<AccessCode> {
    const SUFFIX_LENGTH: usize = 7;
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    let mut bytes = [0u8; SUFFIX_LENGTH];
    getrandom::fill(&mut bytes)
        .map_err(|error| AppError::Internal(format!("failed to generate access code: {error}")))?;

    let suffix: String = bytes
        .iter()
        .map(|byte| char::from(ALPHABET[usize::from(*byte) % ALPHABET.len()]))
        .collect();

    AccessCode::new(format!("WRD-{}-{suffix}", now.timestamp()))
}

#[cfg(test)]
mod tests {
    use super::{generate_code, generate_token};

    #[test]
    fn tokens_are_long_and_unique() {
        let first = generate_token().unwrap_or_default();
        let second = generate_token().unwrap_or_default();

        assert_eq!(first.len(), 64);
        assert_ne!(first, second);
    }

    #[test]
    fn minted_codes_validate_and_carry_the_mint_time() {
        let now = chrono::Utc::now();
        let code = generate_code(now).map(|code| code.to_string()).unwrap_or_default();

        assert!(code.starts_with(&format!("WRD-{}-", now.timestamp())));
    }
}
