//! Encryption commands.
//!
//! Provides `keycrypt encrypt|decrypt|check`. Values may be passed as an
//! argument or piped on stdin; a single trailing newline is stripped from
//! piped input.

use keycrypt_crypto::{is_encrypted, Crypto, CryptoOptions};
use tokio::io::AsyncReadExt;

/// Encrypt `text` (or stdin) and print the envelope.
pub async fn encrypt(options: CryptoOptions, text: Option<String>) -> anyhow::Result<()> {
    let text = input(text).await?;
    let envelope = Crypto::scoped(options, |crypto| crypto.encrypt(Some(&text))).await?;
    if let Some(envelope) = envelope {
        println!("{envelope}");
    }
    Ok(())
}

/// Decrypt `envelope` (or stdin) and print the value.
pub async fn decrypt(options: CryptoOptions, envelope: Option<String>) -> anyhow::Result<()> {
    let envelope = input(envelope).await?;
    let value = Crypto::scoped(options, |crypto| crypto.decrypt(Some(&envelope))).await?;
    if let Some(value) = value {
        println!("{value}");
    }
    Ok(())
}

/// Print whether `text` is shaped like an envelope.
pub fn check(text: &str) {
    if is_encrypted(text) {
        println!("encrypted");
    } else {
        println!("plain");
    }
}

async fn input(arg: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = arg {
        return Ok(value);
    }

    let mut buf = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buf)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    Ok(strip_newline(buf))
}

fn strip_newline(mut value: String) -> String {
    if value.ends_with('\n') {
        value.pop();
        if value.ends_with('\r') {
            value.pop();
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_newline() {
        assert_eq!(strip_newline("token\n".to_string()), "token");
        assert_eq!(strip_newline("token\r\n".to_string()), "token");
        assert_eq!(strip_newline("token\n\n".to_string()), "token\n");
        assert_eq!(strip_newline("token".to_string()), "token");
    }

    #[tokio::test]
    async fn test_argument_wins_over_stdin() {
        let value = input(Some("given".to_string())).await.unwrap();
        assert_eq!(value, "given");
    }
}
