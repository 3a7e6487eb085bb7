use serde_json::Value;

/// Collapse whitespace runs (including NBSP, tabs and newlines) to single
/// spaces and trim the ends.
pub fn normalize_string(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render a scalar JSON value as text. Objects, arrays, booleans and null
/// have no sensible textual form here and yield `None`.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a schema.org time value into whole minutes.
///
/// Accepts JSON numbers (taken as minutes), bare-integer strings, ISO-8601
/// durations ("PT1H30M", "P0DT2H", decimal seconds like "PT5400.0S") and
/// spelled-out text ("1 hour 30 mins"). Plain-text ranges such as
/// "15-20 minutes" resolve to the upper bound. Returns `None` for anything
/// unparseable or absent.
pub fn get_minutes(value: Option<&Value>) -> Option<u32> {
    let value = value?;
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    // "15-20 minutes" style ranges: keep the upper bound. ISO durations are
    // left alone, a '-' inside one makes it unparseable anyway.
    let text = match text.split_once('-') {
        Some((_, upper)) if !text.starts_with('P') && !text.starts_with('p') => upper.trim(),
        _ => text,
    };
    if let Ok(n) = text.parse::<u32>() {
        return Some(n);
    }
    if text.starts_with('P') || text.starts_with('p') {
        return parse_iso_duration(&text[1..]);
    }
    parse_spelled_duration(text)
}

// Scanner over the designator letters after the leading 'P'. The 'T' date/time
// separator only resets the pending digits, so "P0DT1H30M" and "PT90M" both
// work.
fn parse_iso_duration(body: &str) -> Option<u32> {
    let mut minutes = 0f64;
    let mut digits = String::new();
    let mut matched = false;
    for c in body.chars() {
        match c {
            '0'..='9' | '.' => digits.push(c),
            'T' | 't' => digits.clear(),
            'D' | 'd' => {
                minutes += digits.parse::<f64>().ok()? * 24.0 * 60.0;
                digits.clear();
                matched = true;
            }
            'W' | 'w' => {
                minutes += digits.parse::<f64>().ok()? * 7.0 * 24.0 * 60.0;
                digits.clear();
                matched = true;
            }
            'H' | 'h' => {
                minutes += digits.parse::<f64>().ok()? * 60.0;
                digits.clear();
                matched = true;
            }
            'M' | 'm' => {
                minutes += digits.parse::<f64>().ok()?;
                digits.clear();
                matched = true;
            }
            'S' | 's' => {
                minutes += digits.parse::<f64>().ok()? / 60.0;
                digits.clear();
                matched = true;
            }
            _ => return None,
        }
    }
    if !matched || !digits.is_empty() {
        return None;
    }
    Some(minutes.round() as u32)
}

fn parse_spelled_duration(text: &str) -> Option<u32> {
    let mut minutes = 0u32;
    let mut pending: Option<u32> = None;
    let mut matched = false;
    for token in text.split_whitespace() {
        let token = token.trim_matches(|c: char| !c.is_ascii_alphanumeric());
        if let Ok(n) = token.parse::<u32>() {
            pending = Some(n);
            continue;
        }
        let unit = token.to_ascii_lowercase();
        if let Some(n) = pending.take() {
            if unit.starts_with("hour") || unit.starts_with("hr") || unit == "h" {
                minutes += n * 60;
                matched = true;
            } else if unit.starts_with("min") || unit == "m" {
                minutes += n;
                matched = true;
            }
        }
    }
    matched.then_some(minutes)
}
