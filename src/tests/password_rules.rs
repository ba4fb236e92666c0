use super::*;

#[test]
fn each_rule_is_independent() {
    let rules = PasswordRules::evaluate("abcdefgh");
    assert!(rules.length);
    assert!(!rules.upper);
    assert!(rules.lower);
    assert!(!rules.digit);
    assert!(!rules.special);
    assert_eq!(rules.score(), 2);

    let rules = PasswordRules::evaluate("A1!");
    assert!(!rules.length);
    assert!(rules.upper);
    assert!(!rules.lower);
    assert!(rules.digit);
    assert!(rules.special);
    assert_eq!(rules.score(), 3);
}

#[test]
fn strong_password_satisfies_all_rules() {
    let rules = PasswordRules::evaluate("Abcdef1!");
    assert!(rules.all_satisfied());
    assert_eq!(rules.score(), 5);
}

#[test]
fn empty_password_satisfies_nothing() {
    let rules = PasswordRules::evaluate("");
    assert!(!rules.all_satisfied());
    assert_eq!(rules.score(), 0);
}

#[test]
fn special_rule_uses_the_fixed_punctuation_set() {
    assert!(PasswordRules::evaluate("a?").special);
    assert!(PasswordRules::evaluate("a\"b").special);
    assert!(PasswordRules::evaluate("a|b").special);
    assert!(!PasswordRules::evaluate("a-b").special);
    assert!(!PasswordRules::evaluate("a_b").special);
}

#[test]
fn email_pattern_accepts_and_rejects_known_shapes() {
    assert!(email_is_valid("a@b.co"));
    assert!(email_is_valid("you@example.com"));
    assert!(!email_is_valid("a@b"));
    assert!(!email_is_valid("a@b."));
    assert!(!email_is_valid("a"));
    assert!(!email_is_valid(""));
    assert!(!email_is_valid("a b@c.de"));
    assert!(!email_is_valid("a@b.c"));
}

#[test]
fn field_checks_map_to_single_messages() {
    assert_eq!(check_username(""), Some(MSG_USERNAME_REQUIRED));
    assert_eq!(check_username("  "), Some(MSG_USERNAME_REQUIRED));
    assert_eq!(check_username("ab"), Some(MSG_USERNAME_TOO_SHORT));
    assert_eq!(check_username("abc"), None);

    assert_eq!(check_email(""), Some(MSG_EMAIL_REQUIRED));
    assert_eq!(check_email("nope"), Some(MSG_EMAIL_INVALID));
    assert_eq!(check_email("a@b.co"), None);

    assert_eq!(check_login_password(""), Some(MSG_LOGIN_PASSWORD_REQUIRED));
    assert_eq!(
        check_login_password("12345"),
        Some(MSG_LOGIN_PASSWORD_TOO_SHORT)
    );
    assert_eq!(check_login_password("123456"), None);

    assert_eq!(
        check_registration_password("abcdefgh"),
        Some(MSG_REG_PASSWORD_WEAK)
    );
    assert_eq!(check_registration_password("Abcdef1!"), None);

    assert_eq!(check_role(""), Some(MSG_ROLE_REQUIRED));
    assert_eq!(check_role("Admin"), Some(MSG_ROLE_RESTRICTED));
    assert_eq!(check_role("admin"), None);
    assert_eq!(check_role("User"), None);
}
