//! Transport layer: provider wire formats (serialization/deserialization).

mod recaptcha;
mod resend;

pub use recaptcha::{TransportError, decode_siteverify_json_response, encode_siteverify_form};
pub use resend::{decode_error_message, decode_send_email_json_response, encode_send_email_json};
