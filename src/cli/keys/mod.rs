//! Key commands - local signing key helpers, no server involved

use crate::domain::SigningKey;

/// Print a fresh key and the identity it controls
pub fn keygen() -> anyhow::Result<()> {
    let key = SigningKey::generate();

    println!("private_key: {}", key.expose_hex());
    println!("identity:    {}", key.identity());

    Ok(())
}

/// Print the identity controlled by `private_key`
pub fn identity(private_key: &str) -> anyhow::Result<()> {
    let key = SigningKey::parse(private_key)?;
    println!("{}", key.identity());

    Ok(())
}
