use super::*;

pub(crate) fn parse_html(html: &str) -> Result<Dom> {
    let mut dom = Dom::new();
    let mut stack = vec![dom.root];
    let bytes = html.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] == b'<' {
            if html[i..].starts_with("<!--") {
                let close = html[i + 4..]
                    .find("-->")
                    .ok_or_else(|| Error::HtmlParse("unclosed comment".into()))?;
                i += 4 + close + 3;
                continue;
            }

            if html[i..].starts_with("<!") {
                let close = html[i..]
                    .find('>')
                    .ok_or_else(|| Error::HtmlParse("unclosed declaration".into()))?;
                i += close + 1;
                continue;
            }

            if html[i..].starts_with("</") {
                let (tag, after) = parse_end_tag(html, i)?;
                close_open_tag(&dom, &mut stack, &tag);
                i = after;
                continue;
            }

            let (tag, attrs, self_closing, after) = parse_start_tag(html, i)?;
            i = after;

            close_optional_tags_before(&dom, &mut stack, &tag);

            let parent = *stack
                .last()
                .ok_or_else(|| Error::HtmlParse("missing parent element".into()))?;
            let node = dom.create_element(parent, tag.to_ascii_lowercase(), attrs);

            // Raw text containers: content is skipped, not parsed as markup.
            if (tag.eq_ignore_ascii_case("script") || tag.eq_ignore_ascii_case("style"))
                && !self_closing
            {
                let close = find_raw_end_tag(html, i, &tag)
                    .ok_or_else(|| Error::HtmlParse(format!("unclosed <{tag}>")))?;
                i = close;
                let (_, after_end) = parse_end_tag(html, i)?;
                i = after_end;
                continue;
            }

            if !self_closing && !is_void_tag(&tag) {
                stack.push(node);
            }
            continue;
        }

        let text_start = i;
        while i < bytes.len() && bytes[i] != b'<' {
            i += 1;
        }
        let text = &html[text_start..i];
        if !text.is_empty() {
            let decoded = decode_character_references(text);
            if !decoded.is_empty() {
                let parent = *stack
                    .last()
                    .ok_or_else(|| Error::HtmlParse("missing parent element".into()))?;
                dom.create_text(parent, decoded);
            }
        }
    }

    dom.normalize_implied_table_bodies();
    dom.initialize_form_control_values()?;
    Ok(dom)
}

fn parse_start_tag(
    html: &str,
    start: usize,
) -> Result<(String, HashMap<String, String>, bool, usize)> {
    let bytes = html.as_bytes();
    let mut i = start + 1;

    let tag_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    if tag_start == i {
        return Err(Error::HtmlParse(format!("malformed tag at byte {start}")));
    }
    let tag = html[tag_start..i].to_string();

    let mut attrs = HashMap::new();
    let mut self_closing = false;

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            return Err(Error::HtmlParse(format!("unclosed <{tag}>")));
        }
        if bytes[i] == b'>' {
            i += 1;
            break;
        }
        if bytes[i] == b'/' {
            self_closing = true;
            i += 1;
            continue;
        }

        let name_start = i;
        while i < bytes.len() && is_attr_name_byte(bytes[i]) {
            i += 1;
        }
        if name_start == i {
            return Err(Error::HtmlParse(format!("malformed attribute in <{tag}>")));
        }
        let name = html[name_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= bytes.len() {
                return Err(Error::HtmlParse(format!("unclosed <{tag}>")));
            }
            let value = if bytes[i] == b'"' || bytes[i] == b'\'' {
                let quote = bytes[i];
                i += 1;
                let value_start = i;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err(Error::HtmlParse(format!(
                        "unterminated attribute value in <{tag}>"
                    )));
                }
                let value = &html[value_start..i];
                i += 1;
                value
            } else {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                &html[value_start..i]
            };
            attrs.insert(name, decode_character_references(value));
        } else {
            attrs.insert(name, String::new());
        }
    }

    Ok((tag, attrs, self_closing, i))
}

fn parse_end_tag(html: &str, start: usize) -> Result<(String, usize)> {
    let bytes = html.as_bytes();
    let mut i = start + 2;
    let tag_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    let tag = html[tag_start..i].to_string();
    while i < bytes.len() && bytes[i] != b'>' {
        i += 1;
    }
    if i >= bytes.len() {
        return Err(Error::HtmlParse(format!("unclosed </{tag}>")));
    }
    Ok((tag, i + 1))
}

fn close_open_tag(dom: &Dom, stack: &mut Vec<NodeId>, tag: &str) {
    for index in (1..stack.len()).rev() {
        if dom
            .tag_name(stack[index])
            .map(|open| open.eq_ignore_ascii_case(tag))
            .unwrap_or(false)
        {
            stack.truncate(index);
            return;
        }
    }
}

// Optional end tags: a new sibling implies closing the open one.
fn close_optional_tags_before(dom: &Dom, stack: &mut Vec<NodeId>, tag: &str) {
    let (closes, boundary): (&[&str], &[&str]) = if tag.eq_ignore_ascii_case("li") {
        (&["li"], &["ol", "ul", "menu"])
    } else if tag.eq_ignore_ascii_case("option") {
        (&["option"], &["select", "datalist"])
    } else if tag.eq_ignore_ascii_case("tr") {
        (&["tr", "td", "th"], &["table", "thead", "tbody", "tfoot"])
    } else if tag.eq_ignore_ascii_case("td") || tag.eq_ignore_ascii_case("th") {
        (&["td", "th"], &["tr", "table"])
    } else if tag.eq_ignore_ascii_case("p") {
        (&["p"], &[])
    } else {
        return;
    };

    let mut close_index = None;
    for index in (1..stack.len()).rev() {
        let Some(open_tag) = dom.tag_name(stack[index]) else {
            continue;
        };
        if closes
            .iter()
            .any(|close| open_tag.eq_ignore_ascii_case(close))
        {
            close_index = Some(index);
            continue;
        }
        if boundary
            .iter()
            .any(|bound| open_tag.eq_ignore_ascii_case(bound))
        {
            break;
        }
        break;
    }

    if let Some(index) = close_index {
        stack.truncate(index);
    }
}

fn find_raw_end_tag(html: &str, from: usize, tag: &str) -> Option<usize> {
    let needle = format!("</{}", tag.to_ascii_lowercase());
    let lowered = html[from..].to_ascii_lowercase();
    lowered.find(&needle).map(|pos| from + pos)
}

fn is_attr_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

pub(crate) fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

fn decode_character_references(src: &str) -> String {
    if !src.contains('&') {
        return src.to_string();
    }

    fn decode_named(name: &str) -> Option<char> {
        match name {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{00A0}'),
            _ => None,
        }
    }

    fn decode_numeric(body: &str) -> Option<char> {
        let codepoint = if let Some(hex) = body.strip_prefix('x').or_else(|| body.strip_prefix('X'))
        {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            body.parse::<u32>().ok()?
        };
        char::from_u32(codepoint)
    }

    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let Some(semicolon) = rest[1..].find(';').map(|pos| pos + 1) else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let body = &rest[1..semicolon];
        let decoded = if let Some(numeric) = body.strip_prefix('#') {
            decode_numeric(numeric)
        } else {
            decode_named(body)
        };
        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &rest[semicolon + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
