use super::*;

#[test]
fn empty_query_shows_every_row() -> Result<()> {
    let mut h = Harness::from_html(ADMIN_USERS_PAGE)?;
    h.type_text("#userSearch", "")?;
    h.assert_displayed("#usersTable tbody tr", &[true, true, true])?;
    Ok(())
}

#[test]
fn query_hides_rows_without_a_match() -> Result<()> {
    let mut h = Harness::from_html(ADMIN_USERS_PAGE)?;
    h.type_text("#userSearch", "bob")?;
    h.assert_displayed("#usersTable tbody tr", &[false, true, false])?;
    Ok(())
}

#[test]
fn matching_is_case_insensitive() -> Result<()> {
    let mut h = Harness::from_html(ADMIN_USERS_PAGE)?;
    h.type_text("#userSearch", "ALICE")?;
    h.assert_displayed("#usersTable tbody tr", &[true, false, false])?;
    Ok(())
}

#[test]
fn query_matches_any_cell_of_the_row() -> Result<()> {
    let mut h = Harness::from_html(ADMIN_USERS_PAGE)?;
    h.type_text("#userSearch", "admin")?;
    h.assert_displayed("#usersTable tbody tr", &[false, false, true])?;
    Ok(())
}

#[test]
fn no_match_hides_all_rows() -> Result<()> {
    let mut h = Harness::from_html(ADMIN_USERS_PAGE)?;
    h.type_text("#userSearch", "zzz")?;
    h.assert_displayed("#usersTable tbody tr", &[false, false, false])?;
    Ok(())
}

#[test]
fn each_keystroke_reevaluates_without_stale_matches() -> Result<()> {
    let mut h = Harness::from_html(ADMIN_USERS_PAGE)?;

    h.type_text("#userSearch", "carol")?;
    h.assert_displayed("#usersTable tbody tr", &[false, false, true])?;

    h.type_text("#userSearch", "alice")?;
    h.assert_displayed("#usersTable tbody tr", &[true, false, false])?;

    h.type_text("#userSearch", "")?;
    h.assert_displayed("#usersTable tbody tr", &[true, true, true])?;
    Ok(())
}

#[test]
fn header_rows_are_not_filtered() -> Result<()> {
    let mut h = Harness::from_html(ADMIN_USERS_PAGE)?;
    h.type_text("#userSearch", "zzz")?;
    h.assert_displayed("#usersTable thead tr", &[true])?;
    Ok(())
}

#[test]
fn table_without_explicit_tbody_still_filters() -> Result<()> {
    let mut h = Harness::from_html(
        r#"
        <input id='userSearch'>
        <table id='usersTable'>
          <tr><td>Dave</td></tr>
          <tr><td>Erin</td></tr>
        </table>
        "#,
    )?;
    h.type_text("#userSearch", "erin")?;
    h.assert_displayed("#usersTable tbody tr", &[false, true])?;
    Ok(())
}

#[test]
fn search_box_without_table_binds_nothing() -> Result<()> {
    let mut h = Harness::from_html(r#"<input id='userSearch'>"#)?;
    h.type_text("#userSearch", "anything")?;
    Ok(())
}
