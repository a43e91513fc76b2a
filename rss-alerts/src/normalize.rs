/// Canonical form used for phrase matching.
///
/// Uppercases, turns every ASCII punctuation character into a space, collapses
/// whitespace runs and terminates the result with exactly one space. The trailing
/// space is the word-boundary sentinel phrase matching relies on, so an empty
/// input normalizes to `" "`.
pub fn normalize_text(text: &str) -> String {
    let depunctuated: String = text
        .to_uppercase()
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();

    let mut normalized = depunctuated.split_whitespace().collect::<Vec<_>>().join(" ");
    normalized.push(' ');
    normalized
}

/// True when `normalized_phrase` occurs in `normalized_text` starting on a word
/// boundary. Both arguments must already be in `normalize_text` form.
pub fn contains_phrase(normalized_text: &str, normalized_phrase: &str) -> bool {
    normalized_text
        .match_indices(normalized_phrase)
        .any(|(start, _)| start == 0 || normalized_text[..start].ends_with(' '))
}

/// Reduce feed HTML to plain text: tags dropped, common entities decoded.
pub fn strip_html(html: &str) -> String {
    let text = html
        .chars()
        .fold((String::new(), false), |(mut text, in_tag), c| match c {
            '<' => (text, true),
            '>' => {
                // Tags separate words ("a<br>b" reads as two words).
                text.push(' ');
                (text, false)
            }
            _ if !in_tag => {
                text.push(c);
                (text, in_tag)
            }
            _ => (text, in_tag),
        })
        .0;

    decode_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}
