use std::io;

use contact_relay::RecaptchaVerifier;
use contact_relay::domain::{ChallengeToken, RecaptchaSecret};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let secret = std::env::var("REACT_APP_RECAPTCHA_SECRET_KEY").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "REACT_APP_RECAPTCHA_SECRET_KEY environment variable is required",
        )
    })?;
    let token = std::env::var("RECAPTCHA_TOKEN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "RECAPTCHA_TOKEN environment variable is required",
        )
    })?;

    let verifier = RecaptchaVerifier::new(RecaptchaSecret::new(secret)?);
    let verification = verifier.verify(&ChallengeToken::new(token)?, None).await?;
    println!(
        "success: {}, score: {:?}, action: {:?}, hostname: {:?}",
        verification.success, verification.score, verification.action, verification.hostname
    );

    Ok(())
}
