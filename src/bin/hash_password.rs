//! Prints an argon2 PHC string for `APP_ADMIN_PASSWORD_HASH`.
//!
//! Usage: `hash_password <password>` or pipe the password on stdin.

use std::io::{self, BufRead};

use anyhow::{bail, Context, Result};
use voltage_backend::auth::password::{hash_password, verify_password};

fn read_password() -> Result<String> {
    if let Some(arg) = std::env::args().nth(1) {
        return Ok(arg);
    }
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn main() -> Result<()> {
    let password = read_password()?;
    if password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }

    let hash = hash_password(&password).context("Failed to hash password")?;
    if !verify_password(&password, &hash).context("Failed to verify generated hash")? {
        bail!("Generated hash failed verification");
    }

    println!("{}", hash);
    Ok(())
}
