//! Fixed user-facing message set (French).

use std::time::Duration;

pub const FIELD_VALID: &str = "Valide";
pub const EMAIL_VALID: &str = "Adresse email valide";
pub const EMAIL_INVALID: &str = "Veuillez entrer une adresse email valide";
pub const EMAIL_FORMAT_HINT: &str = "Format email incorrect (exemple: nom@domaine.com)";

pub const CONTACT_FORM_ID: &str = "contact";
pub const QUOTE_FORM_ID: &str = "quote";

const DEMO_NOTE: &str = "Note: Ceci est un formulaire de démonstration sécurisé.";

/// Inline message for a required field that failed validation.
pub fn field_rejected(field_name: &str) -> String {
    format!("{} invalide ou requis", field_name)
}

/// Blocking alert shown when the rate limit is hit.
pub fn rate_limited(window: Duration) -> String {
    let minutes = window.as_secs().div_ceil(60).max(1);
    let unit = if minutes == 1 { "minute" } else { "minutes" };
    format!(
        "Trop de tentatives. Veuillez attendre {} {} avant de réessayer.",
        minutes, unit
    )
}

/// Busy label for the submit button while a submission is in flight.
pub fn progress_label(form_id: &str) -> &'static str {
    match form_id {
        QUOTE_FORM_ID => "Traitement...",
        _ => "Envoi en cours...",
    }
}

/// Confirmation shown once the simulated submission completes.
pub fn acknowledgement(form_id: &str) -> String {
    let lead = match form_id {
        CONTACT_FORM_ID => "Merci pour votre message ! Nous vous contacterons bientôt.",
        QUOTE_FORM_ID => {
            "Votre demande de devis a été reçue ! Nous vous contacterons dans les 24h."
        }
        _ => "Votre formulaire a bien été envoyé.",
    };
    format!("{}\n\n{}", lead, DEMO_NOTE)
}
