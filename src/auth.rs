//! Sign-in, registration and password-reset flows.
//!
//! All flows are local: forms are validated and codes are generated, but
//! nothing is checked against a backend — there is none. Verification
//! accepts any well-formed 4-digit code, matching the mock flow the app
//! ships with.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Local numbers ("0…") or the +84 country-code form, 9 digits after the
/// prefix.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+84|0)\d{9}$").expect("valid regex"));

const MIN_PASSWORD_LEN: usize = 6;
const OTP_LEN: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("phone number is required")]
    PhoneRequired,

    #[error("phone number is not valid: {0}")]
    PhoneInvalid(String),

    #[error("password is required")]
    PasswordRequired,

    #[error("password must be at least 6 characters")]
    PasswordTooShort,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("verification code must be 4 digits")]
    CodeInvalid,
}

// ─── Forms ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordForm {
    pub phone: String,
}

fn validate_phone(phone: &str) -> Result<(), AuthError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(AuthError::PhoneRequired);
    }
    if !PHONE_RE.is_match(phone) {
        return Err(AuthError::PhoneInvalid(phone.to_string()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::PasswordRequired);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort);
    }
    Ok(())
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), AuthError> {
        validate_phone(&self.phone)?;
        validate_password(&self.password)
    }
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), AuthError> {
        validate_phone(&self.phone)?;
        validate_password(&self.password)?;
        if self.password != self.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        Ok(())
    }
}

impl ForgotPasswordForm {
    pub fn validate(&self) -> Result<(), AuthError> {
        validate_phone(&self.phone)
    }
}

// ─── OTP ──────────────────────────────────────────────────────────────────────

/// A pending verification code "sent" to a phone.
///
/// The generated code only reaches the debug log; `verify` accepts any
/// well-formed 4-digit input.
#[derive(Debug, Clone)]
pub struct OtpChallenge {
    phone: String,
    code: String,
    issued_at: DateTime<Utc>,
}

impl OtpChallenge {
    fn new(phone: &str) -> Self {
        let code = format!("{:04}", rand::thread_rng().gen_range(0..10_000));
        tracing::debug!("OTP for {}: {code}", mask_phone(phone));
        Self {
            phone: phone.trim().to_string(),
            code,
            issued_at: Utc::now(),
        }
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// The generated code. Display-only: `verify` does not compare
    /// against it.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Masked label shown on the verification screen ("******4128").
    pub fn masked_phone(&self) -> String {
        mask_phone(&self.phone)
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn verify(&self, input: &str) -> Result<(), AuthError> {
        let well_formed =
            input.chars().count() == OTP_LEN && input.chars().all(|c| c.is_ascii_digit());
        if !well_formed {
            return Err(AuthError::CodeInvalid);
        }
        Ok(())
    }
}

fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().collect();
    if digits.len() <= 4 {
        return "*".repeat(digits.len());
    }
    let tail: String = digits[digits.len() - 4..].iter().collect();
    format!("{}{tail}", "*".repeat(6))
}

// ─── Session ──────────────────────────────────────────────────────────────────

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub phone: String,
    pub signed_in_at: DateTime<Utc>,
}

/// Tracks the signed-in session and issues OTP challenges.
#[derive(Debug, Default)]
pub struct Authenticator {
    session: Option<Session>,
}

impl Authenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the form and open a session. No credential check — any
    /// valid form signs in.
    pub fn login(&mut self, form: &LoginForm) -> Result<Session, AuthError> {
        form.validate()?;
        let session = Session {
            phone: form.phone.trim().to_string(),
            signed_in_at: Utc::now(),
        };
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Validate registration and issue the verification challenge.
    /// The user signs in afterwards; registration does not open a session.
    pub fn register(&self, form: &RegisterForm) -> Result<OtpChallenge, AuthError> {
        form.validate()?;
        Ok(OtpChallenge::new(&form.phone))
    }

    pub fn request_password_reset(
        &self,
        form: &ForgotPasswordForm,
    ) -> Result<OtpChallenge, AuthError> {
        form.validate()?;
        Ok(OtpChallenge::new(&form.phone))
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn logout(&mut self) {
        self.session = None;
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_validation_accepts_local_and_country_code_forms() {
        assert!(validate_phone("0912345678").is_ok());
        assert!(validate_phone("+84912345678").is_ok());
        assert!(validate_phone("  0912345678  ").is_ok());
    }

    #[test]
    fn phone_validation_rejects_malformed_numbers() {
        assert_eq!(validate_phone(""), Err(AuthError::PhoneRequired));
        assert_eq!(validate_phone("   "), Err(AuthError::PhoneRequired));
        assert!(matches!(
            validate_phone("12345"),
            Err(AuthError::PhoneInvalid(_))
        ));
        assert!(matches!(
            validate_phone("09123456789"), // one digit too many
            Err(AuthError::PhoneInvalid(_))
        ));
        assert!(matches!(
            validate_phone("091234567a"),
            Err(AuthError::PhoneInvalid(_))
        ));
    }

    #[test]
    fn register_requires_matching_passwords() {
        let form = RegisterForm {
            phone: "0912345678".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
        };
        assert_eq!(form.validate(), Err(AuthError::PasswordMismatch));
    }

    #[test]
    fn short_password_is_rejected() {
        let form = LoginForm {
            phone: "0912345678".into(),
            password: "abc".into(),
        };
        assert_eq!(form.validate(), Err(AuthError::PasswordTooShort));
    }

    #[test]
    fn otp_accepts_any_four_digit_code() {
        let challenge = OtpChallenge::new("0912344128");
        assert!(challenge.verify("0000").is_ok());
        assert!(challenge.verify("9999").is_ok());
        assert_eq!(challenge.verify("123"), Err(AuthError::CodeInvalid));
        assert_eq!(challenge.verify("12345"), Err(AuthError::CodeInvalid));
        assert_eq!(challenge.verify("12a4"), Err(AuthError::CodeInvalid));
    }

    #[test]
    fn generated_code_is_four_digits() {
        for _ in 0..20 {
            let challenge = OtpChallenge::new("0912345678");
            assert_eq!(challenge.code.len(), 4);
            assert!(challenge.code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn masked_phone_keeps_last_four_digits() {
        let challenge = OtpChallenge::new("0912344128");
        assert_eq!(challenge.masked_phone(), "******4128");
    }

    #[test]
    fn login_opens_session_and_logout_clears_it() {
        let mut auth = Authenticator::new();
        assert!(!auth.is_signed_in());

        let session = auth
            .login(&LoginForm {
                phone: "0912345678".into(),
                password: "secret1".into(),
            })
            .unwrap();
        assert_eq!(session.phone, "0912345678");
        assert!(auth.is_signed_in());

        auth.logout();
        assert!(auth.session().is_none());
    }

    #[test]
    fn register_issues_challenge_without_signing_in() {
        let auth = Authenticator::new();
        let challenge = auth
            .register(&RegisterForm {
                phone: "0912345678".into(),
                password: "secret1".into(),
                confirm_password: "secret1".into(),
            })
            .unwrap();
        assert_eq!(challenge.phone(), "0912345678");
        assert!(!auth.is_signed_in());
    }

    #[test]
    fn password_reset_requires_valid_phone() {
        let auth = Authenticator::new();
        let err = auth
            .request_password_reset(&ForgotPasswordForm { phone: "".into() })
            .unwrap_err();
        assert_eq!(err, AuthError::PhoneRequired);
    }
}
