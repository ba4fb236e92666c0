use super::*;

#[test]
fn character_references_decode_in_text() -> Result<()> {
    let h = Harness::from_html(
        r#"<p id='msg'>Fish &amp; chips &lt;3 &#65;&#x42;&nbsp;&quot;ok&quot;</p>"#,
    )?;
    h.assert_text("#msg", "Fish & chips <3 AB\u{a0}\"ok\"")?;
    Ok(())
}

#[test]
fn comments_and_doctype_are_skipped() -> Result<()> {
    let h = Harness::from_html(
        r#"<!DOCTYPE html><!-- header --><div id='a'>one<!-- inline -->two</div>"#,
    )?;
    h.assert_text("#a", "onetwo")?;
    Ok(())
}

#[test]
fn void_elements_do_not_swallow_siblings() -> Result<()> {
    let h = Harness::from_html(r#"<div id='wrap'><input id='x'><br><span id='y'>after</span></div>"#)?;
    h.assert_exists("#wrap #x")?;
    h.assert_text("#wrap > #y", "after")?;
    Ok(())
}

#[test]
fn script_and_style_bodies_are_raw_text() -> Result<()> {
    let h = Harness::from_html(
        r#"
        <script>if (a < b) { document.write("<div id='ghost'>"); }</script>
        <style>p > em { color: red; }</style>
        <p id='real'>visible</p>
        "#,
    )?;
    h.assert_text("#real", "visible")?;
    assert!(matches!(h.text("#ghost"), Err(Error::SelectorNotFound(_))));
    Ok(())
}

#[test]
fn stray_table_rows_gain_an_implied_tbody() -> Result<()> {
    let h = Harness::from_html(
        r#"
        <table id='t'>
          <tr><td>a</td></tr>
          <tr><td>b</td></tr>
        </table>
        "#,
    )?;
    h.assert_displayed("#t tbody tr", &[true, true])?;
    Ok(())
}

#[test]
fn unclosed_list_items_and_paragraphs_close_implicitly() -> Result<()> {
    let h = Harness::from_html(
        r#"
        <ul id='l'>
          <li id='first'>one
          <li id='second'>two
        </ul>
        <p id='p1'>alpha
        <p id='p2'>beta
        "#,
    )?;
    h.assert_text("#l > #first", "one")?;
    h.assert_text("#l > #second", "two")?;
    h.assert_text("#p1", "alpha")?;
    h.assert_text("#p2", "beta")?;
    Ok(())
}

#[test]
fn unquoted_and_single_quoted_attributes_parse() -> Result<()> {
    let h = Harness::from_html(r#"<input id=plain type='text' data-kind="mixed">"#)?;
    h.assert_attr("#plain", "type", "text")?;
    h.assert_attr("#plain", "data-kind", "mixed")?;
    Ok(())
}

#[test]
fn textarea_and_select_values_initialize_from_markup() -> Result<()> {
    let h = Harness::from_html(
        r#"
        <textarea id='bio'>hello there</textarea>
        <select id='picked'>
          <option value='a'>A</option>
          <option value='b' selected>B</option>
        </select>
        <select id='defaulted'>
          <option value='x'>X</option>
          <option value='y'>Y</option>
        </select>
        "#,
    )?;
    h.assert_value("#bio", "hello there")?;
    h.assert_value("#picked", "b")?;
    h.assert_value("#defaulted", "x")?;
    Ok(())
}

#[test]
fn option_without_value_attr_uses_its_text() -> Result<()> {
    let mut h = Harness::from_html(
        r#"
        <select id='s'>
          <option></option>
          <option> User </option>
        </select>
        "#,
    )?;
    h.select_option("#s", "User")?;
    h.assert_value("#s", "User")?;
    Ok(())
}

#[test]
fn attribute_selectors_match_existence_and_equality() -> Result<()> {
    let h = Harness::from_html(
        r#"
        <input name='captcha' id='c1'>
        <input name='captcha_answer' id='c2'>
        <button data-toggle='#pw' id='b1'>Show</button>
        "#,
    )?;
    h.assert_exists("input[name='captcha']")?;
    h.assert_exists("[data-toggle]")?;
    h.assert_attr("button[data-toggle='#pw']", "id", "b1")?;
    // `[name='captcha']` must not match the answer field.
    h.assert_attr("input[name=captcha]", "id", "c1")?;
    Ok(())
}

#[test]
fn child_combinator_is_stricter_than_descendant() -> Result<()> {
    let h = Harness::from_html(
        r#"
        <div id='outer'>
          <section>
            <span id='deep' class='note'>nested</span>
          </section>
          <span id='shallow' class='note'>direct</span>
        </div>
        "#,
    )?;
    h.assert_text("#outer .note", "nested")?;
    h.assert_text("#outer > .note", "direct")?;
    Ok(())
}

#[test]
fn selector_groups_match_in_document_order() -> Result<()> {
    let h = Harness::from_html(
        r#"
        <p id='a' class='x'>first</p>
        <p id='b' class='y'>second</p>
        "#,
    )?;
    h.assert_displayed(".y, .x", &[true, true])?;
    Ok(())
}

#[test]
fn unsupported_selector_syntax_is_reported() -> Result<()> {
    let h = Harness::from_html("<p>x</p>")?;
    for selector in ["h1 ~ p", "p:hover", "div >", "[unclosed", ""] {
        assert!(
            matches!(h.text(selector), Err(Error::UnsupportedSelector(_))),
            "{selector:?} should be rejected"
        );
    }
    Ok(())
}

#[test]
fn missing_match_is_a_selector_not_found_error() -> Result<()> {
    let h = Harness::from_html("<p id='only'>x</p>")?;
    let err = h.text("#absent").unwrap_err();
    assert!(matches!(err, Error::SelectorNotFound(_)));
    assert!(err.to_string().contains("#absent"));
    Ok(())
}

#[test]
fn assertion_failures_carry_a_dom_snippet() -> Result<()> {
    let h = Harness::from_html(r#"<p id='who' class='greeting'>hello</p>"#)?;
    let err = h.assert_text("#who", "goodbye").unwrap_err();
    match err {
        Error::AssertionFailed {
            expected,
            actual,
            dom_snippet,
            ..
        } => {
            assert_eq!(expected, "goodbye");
            assert_eq!(actual, "hello");
            assert!(dom_snippet.contains("p"), "snippet was {dom_snippet}");
            assert!(dom_snippet.contains("greeting"));
        }
        other => panic!("expected AssertionFailed, got {other:?}"),
    }
    Ok(())
}

#[test]
fn disabled_and_readonly_fields_ignore_typing() -> Result<()> {
    let mut h = Harness::from_html(
        r#"
        <input id='locked' disabled value='keep'>
        <input id='frozen' readonly value='hold'>
        "#,
    )?;
    h.type_text("#locked", "nope")?;
    h.type_text("#frozen", "nope")?;
    h.assert_value("#locked", "keep")?;
    h.assert_value("#frozen", "hold")?;
    Ok(())
}

#[test]
fn typing_into_a_div_is_a_type_mismatch() -> Result<()> {
    let mut h = Harness::from_html(r#"<div id='not-a-field'>x</div>"#)?;
    assert!(matches!(
        h.type_text("#not-a-field", "y"),
        Err(Error::TypeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn trace_captures_events_when_enabled() -> Result<()> {
    let mut h = Harness::from_html(LOGIN_PAGE)?;
    h.enable_trace(true);
    h.type_text("#login-username", "taro")?;
    let logs = h.take_trace_logs();
    assert!(logs.iter().any(|line| line.starts_with("[event] input")));
    assert!(h.take_trace_logs().is_empty());
    Ok(())
}

#[test]
fn trace_log_limit_rejects_zero() -> Result<()> {
    let mut h = Harness::from_html("<p>x</p>")?;
    assert!(h.set_trace_log_limit(0).is_err());
    h.set_trace_log_limit(16)?;
    Ok(())
}
