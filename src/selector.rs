use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists(String),
    Eq(String, String),
    StartsWith(String, String),
    EndsWith(String, String),
    Contains(String, String),
}

impl SelectorAttrCondition {
    pub(crate) fn matches(&self, element: &Element) -> bool {
        match self {
            SelectorAttrCondition::Exists(name) => element.attrs.contains_key(name),
            SelectorAttrCondition::Eq(name, expected) => {
                element.attrs.get(name).map(String::as_str) == Some(expected.as_str())
            }
            SelectorAttrCondition::StartsWith(name, prefix) => element
                .attrs
                .get(name)
                .map(|value| value.starts_with(prefix))
                .unwrap_or(false),
            SelectorAttrCondition::EndsWith(name, suffix) => element
                .attrs
                .get(name)
                .map(|value| value.ends_with(suffix))
                .unwrap_or(false),
            SelectorAttrCondition::Contains(name, needle) => element
                .attrs
                .get(name)
                .map(|value| value.contains(needle))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<SelectorAttrCondition>,
}

impl SelectorStep {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && !self.universal
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
    }

    pub(crate) fn id_only(&self) -> Option<&str> {
        if self.tag.is_none() && !self.universal && self.classes.is_empty() && self.attrs.is_empty()
        {
            self.id.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    // Combinator between this step and the previous one; None on the first step.
    pub(crate) combinator: Option<SelectorCombinator>,
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    let mut groups = Vec::new();
    for group in split_selector_groups(selector) {
        let trimmed = group.trim();
        if trimmed.is_empty() {
            return Err(Error::UnsupportedSelector(selector.to_string()));
        }
        groups.push(parse_selector_chain(trimmed)?);
    }
    if groups.is_empty() {
        return Err(Error::UnsupportedSelector(selector.to_string()));
    }
    Ok(groups)
}

fn split_selector_groups(selector: &str) -> Vec<String> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut in_brackets = false;
    for ch in selector.chars() {
        match ch {
            '[' => {
                in_brackets = true;
                current.push(ch);
            }
            ']' => {
                in_brackets = false;
                current.push(ch);
            }
            ',' if !in_brackets => {
                groups.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    groups.push(current);
    groups
}

fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let tokens = tokenize_selector(selector)?;
    let mut parts = Vec::new();
    let mut pending: Option<SelectorCombinator> = None;

    for token in tokens {
        match token {
            SelectorToken::Combinator(combinator) => {
                if parts.is_empty() || pending.is_some() {
                    return Err(Error::UnsupportedSelector(selector.to_string()));
                }
                pending = Some(combinator);
            }
            SelectorToken::Step(raw) => {
                let step = parse_selector_step(&raw, selector)?;
                let combinator = if parts.is_empty() {
                    None
                } else {
                    Some(pending.take().unwrap_or(SelectorCombinator::Descendant))
                };
                parts.push(SelectorPart { step, combinator });
            }
        }
    }

    if parts.is_empty() || pending.is_some() {
        return Err(Error::UnsupportedSelector(selector.to_string()));
    }
    Ok(parts)
}

enum SelectorToken {
    Step(String),
    Combinator(SelectorCombinator),
}

fn tokenize_selector(selector: &str) -> Result<Vec<SelectorToken>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_brackets = false;

    let flush = |current: &mut String, tokens: &mut Vec<SelectorToken>| {
        if !current.is_empty() {
            tokens.push(SelectorToken::Step(std::mem::take(current)));
        }
    };

    for ch in selector.chars() {
        match ch {
            '[' => {
                in_brackets = true;
                current.push(ch);
            }
            ']' => {
                in_brackets = false;
                current.push(ch);
            }
            c if c.is_whitespace() && !in_brackets => {
                flush(&mut current, &mut tokens);
            }
            '>' if !in_brackets => {
                flush(&mut current, &mut tokens);
                tokens.push(SelectorToken::Combinator(SelectorCombinator::Child));
            }
            '+' | '~' if !in_brackets => {
                return Err(Error::UnsupportedSelector(selector.to_string()));
            }
            _ => current.push(ch),
        }
    }
    flush(&mut current, &mut tokens);

    Ok(tokens)
}

fn parse_selector_step(raw: &str, full_selector: &str) -> Result<SelectorStep> {
    let mut step = SelectorStep::default();
    let chars: Vec<char> = raw.chars().collect();
    let mut i = 0usize;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                step.universal = true;
                i += 1;
            }
            '#' => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && is_name_char(chars[end]) {
                    end += 1;
                }
                if end == start {
                    return Err(Error::UnsupportedSelector(full_selector.to_string()));
                }
                step.id = Some(chars[start..end].iter().collect());
                i = end;
            }
            '.' => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && is_name_char(chars[end]) {
                    end += 1;
                }
                if end == start {
                    return Err(Error::UnsupportedSelector(full_selector.to_string()));
                }
                step.classes.push(chars[start..end].iter().collect());
                i = end;
            }
            '[' => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && chars[end] != ']' {
                    end += 1;
                }
                if end >= chars.len() {
                    return Err(Error::UnsupportedSelector(full_selector.to_string()));
                }
                let inner: String = chars[start..end].iter().collect();
                step.attrs
                    .push(parse_attr_condition(&inner, full_selector)?);
                i = end + 1;
            }
            ':' | '(' | ')' => {
                return Err(Error::UnsupportedSelector(full_selector.to_string()));
            }
            _ => {
                let start = i;
                let mut end = start;
                while end < chars.len() && is_name_char(chars[end]) {
                    end += 1;
                }
                if end == start {
                    return Err(Error::UnsupportedSelector(full_selector.to_string()));
                }
                if step.tag.is_some() || start != 0 {
                    return Err(Error::UnsupportedSelector(full_selector.to_string()));
                }
                let tag: String = chars[start..end].iter().collect();
                step.tag = Some(tag.to_ascii_lowercase());
                i = end;
            }
        }
    }

    if step.is_empty() {
        return Err(Error::UnsupportedSelector(full_selector.to_string()));
    }
    Ok(step)
}

fn parse_attr_condition(inner: &str, full_selector: &str) -> Result<SelectorAttrCondition> {
    let inner = inner.trim();
    let operators: [(&str, fn(String, String) -> SelectorAttrCondition); 4] = [
        ("^=", SelectorAttrCondition::StartsWith),
        ("$=", SelectorAttrCondition::EndsWith),
        ("*=", SelectorAttrCondition::Contains),
        ("=", SelectorAttrCondition::Eq),
    ];

    for (op, build) in operators {
        if let Some(pos) = inner.find(op) {
            let name = inner[..pos].trim().to_ascii_lowercase();
            if name.is_empty() {
                return Err(Error::UnsupportedSelector(full_selector.to_string()));
            }
            let raw_value = inner[pos + op.len()..].trim();
            let value = strip_attr_quotes(raw_value).to_string();
            return Ok(build(name, value));
        }
    }

    if inner.is_empty() {
        return Err(Error::UnsupportedSelector(full_selector.to_string()));
    }
    Ok(SelectorAttrCondition::Exists(inner.to_ascii_lowercase()))
}

fn strip_attr_quotes(raw: &str) -> &str {
    if raw.len() >= 2 {
        let bytes = raw.as_bytes();
        if (bytes[0] == b'"' && bytes[raw.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[raw.len() - 1] == b'\'')
        {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}
