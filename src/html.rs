use super::*;
use std::collections::HashMap;

pub(crate) fn parse_html(html: &str) -> Result<Dom> {
    let mut dom = Dom::new();
    let bytes = html.as_bytes();
    let mut stack: Vec<NodeId> = vec![dom.root];
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] == b'<' {
            if html[i..].starts_with("<!--") {
                let end = html[i + 4..]
                    .find("-->")
                    .map(|pos| i + 4 + pos + 3)
                    .unwrap_or(bytes.len());
                i = end;
                continue;
            }
            if html[i..].starts_with("<!") {
                let end = html[i..]
                    .find('>')
                    .map(|pos| i + pos + 1)
                    .unwrap_or(bytes.len());
                i = end;
                continue;
            }
            if html[i..].starts_with("</") {
                let end = html[i..]
                    .find('>')
                    .map(|pos| i + pos + 1)
                    .ok_or_else(|| Error::HtmlParse("unterminated end tag".into()))?;
                let tag_name = html[i + 2..end - 1].trim().to_ascii_lowercase();
                // The document root never matches a tag, so the stack keeps its base entry.
                if let Some(pos) = stack.iter().rposition(|node| {
                    dom.tag_name(*node)
                        .map(|tag| tag == tag_name)
                        .unwrap_or(false)
                }) {
                    stack.truncate(pos);
                }
                i = end;
                continue;
            }

            let (tag_name, attrs, self_closing, next) = parse_start_tag(html, i)?;
            let parent = *stack
                .last()
                .ok_or_else(|| Error::HtmlParse("empty open-element stack".into()))?;
            let node_id = dom.create_element(parent, tag_name.clone(), attrs);
            i = next;

            if self_closing || is_void_tag(&tag_name) {
                continue;
            }

            if is_raw_text_tag(&tag_name) {
                let close = format!("</{tag_name}");
                let rest = &html[i..];
                let lower = rest.to_ascii_lowercase();
                let end = lower.find(&close).unwrap_or(rest.len());
                let raw = &rest[..end];
                if !raw.is_empty() && tag_name != "script" && tag_name != "style" {
                    let text = decode_entities(raw);
                    dom.create_text(node_id, text);
                }
                i += end;
                if end < rest.len() {
                    let after = html[i..]
                        .find('>')
                        .map(|pos| i + pos + 1)
                        .unwrap_or(bytes.len());
                    i = after;
                }
                continue;
            }

            stack.push(node_id);
            continue;
        }

        let end = html[i..]
            .find('<')
            .map(|pos| i + pos)
            .unwrap_or(bytes.len());
        let raw = &html[i..end];
        if !raw.trim().is_empty() {
            let parent = *stack
                .last()
                .ok_or_else(|| Error::HtmlParse("empty open-element stack".into()))?;
            dom.create_text(parent, decode_entities(raw));
        }
        i = end;
    }

    dom.initialize_form_control_values();
    Ok(dom)
}

fn parse_start_tag(
    html: &str,
    start: usize,
) -> Result<(String, HashMap<String, String>, bool, usize)> {
    let bytes = html.as_bytes();
    let mut i = start + 1;

    let name_start = i;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' && bytes[i] != b'/'
    {
        i += 1;
    }
    if i == name_start {
        return Err(Error::HtmlParse(format!(
            "malformed tag at byte {start}"
        )));
    }
    let tag_name = html[name_start..i].to_ascii_lowercase();

    let mut attrs = HashMap::new();
    let mut self_closing = false;

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            return Err(Error::HtmlParse(format!(
                "unterminated tag <{tag_name}>"
            )));
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

        let attr_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'='
            && bytes[i] != b'>'
            && bytes[i] != b'/'
        {
            i += 1;
        }
        let attr_name = html[attr_start..i].to_ascii_lowercase();
        if attr_name.is_empty() {
            i += 1;
            continue;
        }

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                i += 1;
                let value_start = i;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err(Error::HtmlParse(format!(
                        "unterminated attribute value in <{tag_name}>"
                    )));
                }
                let value = decode_entities(&html[value_start..i]);
                i += 1;
                attrs.insert(attr_name, value);
            } else {
                let value_start = i;
                while i < bytes.len()
                    && !bytes[i].is_ascii_whitespace()
                    && bytes[i] != b'>'
                {
                    i += 1;
                }
                let value = decode_entities(&html[value_start..i]);
                attrs.insert(attr_name, value);
            }
        } else {
            attrs.insert(attr_name, "true".to_string());
        }
    }

    Ok((tag_name, attrs, self_closing, i))
}

fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
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
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_raw_text_tag(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea")
}

pub(crate) fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let Some(end) = rest.find(';') else {
            out.push_str(rest);
            return out;
        };
        if end > 32 {
            out.push('&');
            rest = &rest[1..];
            continue;
        }
        let entity = &rest[1..end];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            "copy" => Some('\u{a9}'),
            "hellip" => Some('\u{2026}'),
            "mdash" => Some('\u{2014}'),
            "ndash" => Some('\u{2013}'),
            _ => decode_numeric_entity(entity),
        };
        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &rest[end + 1..];
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

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    char::from_u32(code)
}
