use super::*;

pub const MSG_CAPTCHA_EMPTY: &str = "Please answer the CAPTCHA.";
pub const MSG_CAPTCHA_MISMATCH: &str = "Incorrect CAPTCHA answer.";
pub const MSG_USERNAME_REQUIRED: &str = "Please enter a username.";
pub const MSG_USERNAME_TOO_SHORT: &str = "Username must be at least 3 characters.";
pub const MSG_EMAIL_REQUIRED: &str = "Please enter your email address.";
pub const MSG_EMAIL_INVALID: &str = "Enter a valid email address (e.g., you@example.com).";
pub const MSG_LOGIN_PASSWORD_REQUIRED: &str = "Please enter your password.";
pub const MSG_LOGIN_PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters.";
pub const MSG_REG_PASSWORD_WEAK: &str =
    "Password must be at least 8 chars with UPPER, lower, number, special.";
pub const MSG_ROLE_REQUIRED: &str = "Please select a role.";
pub const MSG_ROLE_RESTRICTED: &str = "Admin role is restricted. Please choose User.";

/// One per-field gate in the submission pipeline. Each is an independent,
/// pure predicate over the field's live value; `None` means the gate passed.
pub type FieldCheck = fn(&str) -> Option<&'static str>;

pub fn check_username(value: &str) -> Option<&'static str> {
    let value = value.trim();
    if value.is_empty() {
        Some(MSG_USERNAME_REQUIRED)
    } else if value.chars().count() < 3 {
        Some(MSG_USERNAME_TOO_SHORT)
    } else {
        None
    }
}

pub fn check_email(value: &str) -> Option<&'static str> {
    let value = value.trim();
    if value.is_empty() {
        Some(MSG_EMAIL_REQUIRED)
    } else if !email_is_valid(value) {
        Some(MSG_EMAIL_INVALID)
    } else {
        None
    }
}

// Login minimum is 6, independent of the registration rule set.
pub fn check_login_password(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some(MSG_LOGIN_PASSWORD_REQUIRED)
    } else if value.chars().count() < 6 {
        Some(MSG_LOGIN_PASSWORD_TOO_SHORT)
    } else {
        None
    }
}

pub fn check_registration_password(value: &str) -> Option<&'static str> {
    if PasswordRules::evaluate(value).all_satisfied() {
        None
    } else {
        Some(MSG_REG_PASSWORD_WEAK)
    }
}

// Client-side policy only, not an access-control boundary.
pub fn check_role(value: &str) -> Option<&'static str> {
    let value = value.trim();
    if value.is_empty() {
        Some(MSG_ROLE_REQUIRED)
    } else if value == "Admin" {
        Some(MSG_ROLE_RESTRICTED)
    } else {
        None
    }
}
