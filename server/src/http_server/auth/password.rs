use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use color_eyre::eyre::eyre;

pub(crate) fn hash_password(password: &str) -> crate::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// `Ok(false)` for a wrong password; `Err` only when the stored hash is
/// unreadable.
pub(crate) fn verify_password(password: &str, stored_hash: &str) -> crate::Result<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| eyre!("Invalid stored hash: {e}"))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(eyre!("Failed to verify password: {e}")),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip() {
        let hash = hash_password("correct horse").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn plaintext_in_the_hash_column_is_an_error() {
        assert!(verify_password("secret", "secret").is_err());
    }
}
