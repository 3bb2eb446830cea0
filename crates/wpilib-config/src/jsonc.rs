//! ---
//! wpi_section: "04-configuration"
//! wpi_subsection: "module"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "Layered configuration service and settings tiers."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
//! JSON with comments.
//!
//! Accepts `//` and `/* */` comments and trailing commas before `}` or `]`.
//! Everything else must be strict JSON.

use serde::de::DeserializeOwned;

/// Remove comments and trailing commas outside string literals.
///
/// Comments are replaced by whitespace so parser positions stay meaningful.
/// An unterminated block comment is left in place for the JSON parser to reject.
pub fn strip_comments_and_trailing_commas(raw: &str) -> String {
    let without_comments = strip_comments(raw);
    strip_trailing_commas(&without_comments)
}

/// Parse JSON-with-comments into `T`.
pub fn from_str<T: DeserializeOwned>(raw: &str) -> serde_json::Result<T> {
    serde_json::from_str(&strip_comments_and_trailing_commas(raw))
}

fn strip_comments(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    let mut in_string = false;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            match c {
                '\\' if i + 1 < chars.len() => {
                    out.push(chars[i + 1]);
                    i += 1;
                }
                '"' => in_string = false,
                _ => {}
            }
            i += 1;
            continue;
        }
        match (c, chars.get(i + 1)) {
            ('"', _) => {
                in_string = true;
                out.push(c);
                i += 1;
            }
            ('/', Some('/')) => {
                while i < chars.len() && chars[i] != '\n' {
                    out.push(' ');
                    i += 1;
                }
            }
            ('/', Some('*')) => {
                let close = (i + 2..chars.len().saturating_sub(1))
                    .find(|&j| chars[j] == '*' && chars[j + 1] == '/');
                match close {
                    Some(end) => {
                        for &skipped in &chars[i..end + 2] {
                            out.push(if skipped == '\n' { '\n' } else { ' ' });
                        }
                        i = end + 2;
                    }
                    None => {
                        out.extend(&chars[i..]);
                        i = chars.len();
                    }
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

fn strip_trailing_commas(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            match c {
                '\\' if i + 1 < chars.len() => {
                    out.push(chars[i + 1]);
                    i += 1;
                }
                '"' => in_string = false,
                _ => {}
            }
            i += 1;
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
                let previous = out.trim_end().chars().last();
                // Only a comma that follows a value can trail.
                let follows_value = !matches!(previous, None | Some('[') | Some('{') | Some(','));
                if follows_value && matches!(next, Some('}') | Some(']')) {
                    out.push(' ');
                } else {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn accepts_comments_and_trailing_commas() {
        let raw = "{\n  // line\n  \"a\": 1, /* block\n spanning */ \"b\": [1, 2,],\n}";
        let value: Value = from_str(raw).unwrap();
        assert_eq!(value, json!({"a": 1, "b": [1, 2]}));
    }

    #[test]
    fn comment_markers_inside_strings_are_kept() {
        let raw = r#"{"url": "http://first.wpi.edu/*x*/", "path": "C:\\dir\\", "s": "a,}"}"#;
        let value: Value = from_str(raw).unwrap();
        assert_eq!(value["url"], json!("http://first.wpi.edu/*x*/"));
        assert_eq!(value["path"], json!("C:\\dir\\"));
        assert_eq!(value["s"], json!("a,}"));
    }

    #[test]
    fn rejects_non_json_syntax() {
        assert!(from_str::<Value>("{currentLanguage: \"java\"}").is_err());
        assert!(from_str::<Value>("{\"currentLanguage\": 'java'}").is_err());
        assert!(from_str::<Value>("{\"n\": 0x1F}").is_err());
        assert!(from_str::<Value>("{\"n\": NaN}").is_err());
        assert!(from_str::<Value>("{\"a\": 1 /* open").is_err());
        assert!(from_str::<Value>("[,]").is_err());
    }

    #[test]
    fn integers_stay_integers() {
        let value: Value = from_str("{\"wpilib.teamNumber\": 254}").unwrap();
        assert_eq!(value["wpilib.teamNumber"].as_i64(), Some(254));
    }
}
