//! Backslash handling for the different shell quoting styles

use crate::errors::{CurlconvError, Result};

/// Unquoted words: `\x` becomes `x` and an escaped newline disappears
pub fn remove_backslashes(s: &str) -> String {
    unescape_with(s, |_| true)
}

/// Double quotes only treat `\\ \$ \` \" \<newline>` as escapes
pub fn remove_double_quote_backslashes(s: &str) -> String {
    unescape_with(s, |c| matches!(c, '\\' | '$' | '`' | '"' | '\n'))
}

fn unescape_with<F: Fn(char) -> bool>(s: &str, escapable: F) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some(next) if escapable(next) => {
                chars.next();
                if next != '\n' {
                    out.push(next);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Expand the escapes of an ANSI-C quoted string (`$'...'`).
///
/// Unknown escapes are kept as written. A `\c` control escape applied to a
/// non-ASCII character cannot be represented and is an error.
pub fn remove_ansi_c_backslashes(s: &str) -> Result<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c != '\\' || i + 1 >= chars.len() {
            out.push(c);
            i += 1;
            continue;
        }
        let e = chars[i + 1];
        i += 2;
        let simple = match e {
            '\\' => Some('\\'),
            'a' => Some('\x07'),
            'b' => Some('\x08'),
            'e' | 'E' => Some('\x1B'),
            'f' => Some('\x0C'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\x0B'),
            '\'' => Some('\''),
            '"' => Some('"'),
            '?' => Some('?'),
            _ => None,
        };
        if let Some(ch) = simple {
            out.push(ch);
            continue;
        }

        match e {
            '0'..='7' => {
                let mut digits = String::from(e);
                while digits.len() < 3 && i < chars.len() && chars[i].is_digit(8) {
                    digits.push(chars[i]);
                    i += 1;
                }
                let value = u32::from_str_radix(&digits, 8).unwrap_or(0) % 256;
                out.push(char::from_u32(value).unwrap_or('\0'));
            }
            'x' | 'u' | 'U' => {
                let max = match e {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let mut digits = String::new();
                while digits.len() < max && i < chars.len() && chars[i].is_ascii_hexdigit() {
                    digits.push(chars[i]);
                    i += 1;
                }
                if digits.is_empty() {
                    out.push('\\');
                    out.push(e);
                    continue;
                }
                let value = u32::from_str_radix(&digits, 16).unwrap_or(0);
                let ch = char::from_u32(value).ok_or_else(|| {
                    CurlconvError::parse(format!(
                        "invalid code point in ANSI-C quoted string: \\{}{}",
                        e, digits
                    ))
                })?;
                out.push(ch);
            }
            'c' if i < chars.len() => {
                let target = chars[i];
                i += 1;
                if !target.is_ascii() {
                    return Err(CurlconvError::parse(format!(
                        "non-ASCII control character in ANSI-C quoted string: \"\\u{{{:x}}}\"",
                        target as u32
                    )));
                }
                if target == '?' {
                    out.push('\x7F');
                } else {
                    let code = (target.to_ascii_uppercase() as u8) & 0b0001_1111;
                    out.push(char::from(code));
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_backslashes() {
        assert_eq!(remove_backslashes(r"a\ b"), "a b");
        assert_eq!(remove_backslashes("a\\\nb"), "ab");
        assert_eq!(remove_backslashes(r"\\"), "\\");
        assert_eq!(remove_backslashes("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_double_quote_backslashes() {
        assert_eq!(remove_double_quote_backslashes(r#"\"q\" \$x \n"#), r#""q" $x \n"#);
        assert_eq!(remove_double_quote_backslashes("a\\\nb"), "ab");
    }

    #[test]
    fn test_ansi_c_simple_escapes() {
        assert_eq!(remove_ansi_c_backslashes(r"a\nb\tc").unwrap(), "a\nb\tc");
        assert_eq!(remove_ansi_c_backslashes(r"\'\\\e").unwrap(), "'\\\x1B");
    }

    #[test]
    fn test_ansi_c_numeric_escapes() {
        assert_eq!(remove_ansi_c_backslashes(r"\101\x41\u0041\U00000041").unwrap(), "AAAA");
        assert_eq!(remove_ansi_c_backslashes(r"\u20ac").unwrap(), "€");
        // octal wraps at one byte
        assert_eq!(remove_ansi_c_backslashes(r"\501").unwrap(), "A");
        assert_eq!(remove_ansi_c_backslashes(r"\xZ").unwrap(), r"\xZ");
    }

    #[test]
    fn test_ansi_c_control_escapes() {
        assert_eq!(remove_ansi_c_backslashes(r"\ca").unwrap(), "\x01");
        assert_eq!(remove_ansi_c_backslashes(r"\c?").unwrap(), "\x7F");
        assert!(remove_ansi_c_backslashes("\\cé").is_err());
    }

    #[test]
    fn test_ansi_c_unknown_escape_kept() {
        assert_eq!(remove_ansi_c_backslashes(r"\q").unwrap(), r"\q");
    }
}
