use super::*;

#[test]
fn restored_captcha_value_is_cleared_on_load() -> Result<()> {
    let h = Harness::from_html(REGISTRATION_PAGE)?;
    h.assert_value("#reg-captcha", "")?;
    Ok(())
}

#[test]
fn empty_answer_blocks_with_the_answer_message() -> Result<()> {
    let mut h = Harness::from_html(REGISTRATION_PAGE)?;
    fill_valid_registration(&mut h)?;
    h.type_text("#reg-captcha", "")?;

    assert_eq!(h.submit("#register-form")?, SubmitOutcome::Blocked);
    h.assert_validation_message("#reg-captcha", MSG_CAPTCHA_EMPTY)?;
    h.assert_text("#err-captcha", MSG_CAPTCHA_EMPTY)?;
    h.assert_focused("#reg-captcha")?;
    Ok(())
}

#[test]
fn wrong_answer_blocks_with_the_mismatch_message() -> Result<()> {
    let mut h = Harness::from_html(REGISTRATION_PAGE)?;
    fill_valid_registration(&mut h)?;
    h.type_text("#reg-captcha", "8")?;

    assert_eq!(h.submit("#register-form")?, SubmitOutcome::Blocked);
    h.assert_validation_message("#reg-captcha", MSG_CAPTCHA_MISMATCH)?;
    Ok(())
}

#[test]
fn comparison_ignores_surrounding_whitespace() -> Result<()> {
    let mut h = Harness::from_html(REGISTRATION_PAGE)?;
    fill_valid_registration(&mut h)?;
    h.type_text("#reg-captcha", " 7 ")?;

    assert_eq!(h.submit("#register-form")?, SubmitOutcome::Submitted);
    h.assert_validation_message("#reg-captcha", "")?;
    Ok(())
}

#[test]
fn captcha_failure_short_circuits_field_checks() -> Result<()> {
    let mut h = Harness::from_html(REGISTRATION_PAGE)?;
    // Every other field is invalid too, but none of them gets annotated.
    h.type_text("#reg-captcha", "8")?;

    assert_eq!(h.submit("#register-form")?, SubmitOutcome::Blocked);
    h.assert_validation_message("#reg-captcha", MSG_CAPTCHA_MISMATCH)?;
    h.assert_validation_message("#reg-username", "")?;
    h.assert_validation_message("#reg-email", "")?;
    h.assert_validation_message("#reg-password", "")?;
    h.assert_text("#err-username", "")?;
    Ok(())
}

#[test]
fn form_without_captcha_pair_skips_the_gate() -> Result<()> {
    let mut h = Harness::from_html(LOGIN_PAGE)?;
    h.type_text("#login-username", "taro")?;
    h.type_text("#login-password", "123456")?;

    assert_eq!(h.submit("#login-form")?, SubmitOutcome::Submitted);
    Ok(())
}

#[test]
fn passing_captcha_clears_a_previous_captcha_error() -> Result<()> {
    let mut h = Harness::from_html(REGISTRATION_PAGE)?;
    fill_valid_registration(&mut h)?;

    h.type_text("#reg-captcha", "8")?;
    assert_eq!(h.submit("#register-form")?, SubmitOutcome::Blocked);

    h.type_text("#reg-captcha", "7")?;
    assert_eq!(h.submit("#register-form")?, SubmitOutcome::Submitted);
    h.assert_validation_message("#reg-captcha", "")?;
    h.assert_text("#err-captcha", "")?;
    Ok(())
}
