use super::*;

#[test]
fn meter_width_tracks_the_rule_score() -> Result<()> {
    let mut h = Harness::from_html(REGISTRATION_PAGE)?;

    h.type_text("#reg-password", "a")?;
    h.assert_style("#pw-meter-bar", "width", "20%")?;

    h.type_text("#reg-password", "aB")?;
    h.assert_style("#pw-meter-bar", "width", "40%")?;

    h.type_text("#reg-password", "aB1")?;
    h.assert_style("#pw-meter-bar", "width", "60%")?;

    h.type_text("#reg-password", "aB1!")?;
    h.assert_style("#pw-meter-bar", "width", "80%")?;

    h.type_text("#reg-password", "aB1!efgh")?;
    h.assert_style("#pw-meter-bar", "width", "100%")?;

    h.type_text("#reg-password", "")?;
    h.assert_style("#pw-meter-bar", "width", "0%")?;
    Ok(())
}

#[test]
fn rule_indicators_toggle_individually() -> Result<()> {
    let mut h = Harness::from_html(REGISTRATION_PAGE)?;

    h.type_text("#reg-password", "abcdefgh")?;
    h.assert_class("#rule-length", "valid", true)?;
    h.assert_class("#rule-lower", "valid", true)?;
    h.assert_class("#rule-upper", "valid", false)?;
    h.assert_class("#rule-digit", "valid", false)?;
    h.assert_class("#rule-special", "valid", false)?;

    h.type_text("#reg-password", "Abcdef1!")?;
    for slot in [
        "#rule-length",
        "#rule-upper",
        "#rule-lower",
        "#rule-digit",
        "#rule-special",
    ] {
        h.assert_class(slot, "valid", true)?;
    }
    Ok(())
}

#[test]
fn previously_satisfied_rules_turn_back_off() -> Result<()> {
    let mut h = Harness::from_html(REGISTRATION_PAGE)?;

    h.type_text("#reg-password", "Abcdef1!")?;
    h.assert_class("#rule-upper", "valid", true)?;

    h.type_text("#reg-password", "abcdef1!")?;
    h.assert_class("#rule-upper", "valid", false)?;
    Ok(())
}

#[test]
fn typing_clears_the_submit_time_error() -> Result<()> {
    let mut h = Harness::from_html(REGISTRATION_PAGE)?;
    fill_valid_registration(&mut h)?;
    h.type_text("#reg-password", "weak")?;

    assert_eq!(h.submit("#register-form")?, SubmitOutcome::Blocked);
    h.assert_validation_message("#reg-password", MSG_REG_PASSWORD_WEAK)?;
    h.assert_text("#err-password", MSG_REG_PASSWORD_WEAK)?;

    h.type_text("#reg-password", "weak2")?;
    h.assert_validation_message("#reg-password", "")?;
    h.assert_text("#err-password", "")?;
    Ok(())
}

#[test]
fn meter_without_rule_slots_still_updates_the_bar() -> Result<()> {
    let mut h = Harness::from_html(
        r#"
        <input id='reg-password' type='password'>
        <div id='pw-meter-bar'></div>
        "#,
    )?;
    h.type_text("#reg-password", "Abcdef1!")?;
    h.assert_style("#pw-meter-bar", "width", "100%")?;
    Ok(())
}
