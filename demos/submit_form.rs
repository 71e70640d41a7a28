use std::io;

use contact_relay::{ClientConfig, ContactFormState, Field, HttpRelayBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let email = std::env::var("CONTACT_EMAIL_FROM").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "CONTACT_EMAIL_FROM environment variable is required",
        )
    })?;
    let phone = std::env::var("CONTACT_PHONE").unwrap_or_else(|_| "+12015550123".to_owned());
    let idea = std::env::var("CONTACT_PROJECT_IDEA")
        .unwrap_or_else(|_| "Hello from the contact-relay demo.".to_owned());

    let config = ClientConfig::from_env()?;
    let relay_url = config.relay_url.clone().unwrap_or(url::Url::parse(
        "http://127.0.0.1:8888/.netlify/functions/send-email",
    )?);
    println!("submission mode: {:?}", config.submission_mode());

    let backend = HttpRelayBackend::new(relay_url);
    let mut form = ContactFormState::new(config);
    form.on_change(Field::Email, email);
    form.on_change(Field::Phone, phone);
    form.on_change(Field::ProjectIdea, idea);
    form.on_change(Field::PrivacyConsent, true);
    if let Ok(token) = std::env::var("RECAPTCHA_TOKEN") {
        form.on_challenge_response(Some(token));
    }

    let phase = form.on_submit(&backend).await;
    println!("phase: {phase:?}, message: {:?}", form.submit_message());
    for (field, message) in form.errors().iter() {
        println!("  {field}: {message}");
    }

    Ok(())
}
