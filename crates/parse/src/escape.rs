//! CSS selector escaping for class-names.

/// Characters that get a preceding backslash inside a class selector.
pub const ESCAPED_CHARS: &[char] = &[
    ' ', '#', '{', '}', '.', ':', ';', '?', '%', '&', ',', '@', '+', '*', '~', '\'', '"', '!',
    '^', '$', '[', ']', '(', ')', '=', '>', '|', '/',
];

/// Escapes a class-name so it can be used after a `.` in a selector.
///
/// A leading digit is written as a code point escape with its mandatory
/// trailing space (`1` → `\31 `).
///
/// ```
/// use gale_parse::escape;
///
/// assert_eq!(escape("md:bg-blue"), r"md\:bg-blue");
/// assert_eq!(escape("2xl:p-4"), r"\32 xl\:p-4");
/// ```
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);

    for (i, ch) in text.chars().enumerate() {
        if i == 0 && ch.is_ascii_digit() {
            out.push_str(&format!("\\{:x} ", ch as u32));
        } else if ESCAPED_CHARS.contains(&ch) {
            out.push('\\');
            out.push(ch);
        } else {
            out.push(ch);
        }
    }

    out
}

/// Exact inverse of [`escape`].
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        // `\XX ` code point escape
        let mut lookahead = chars.clone();
        let mut hex = String::new();
        while hex.len() < 6 {
            match lookahead.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(*c);
                    lookahead.next();
                }
                _ => break,
            }
        }
        if !hex.is_empty() && lookahead.peek() == Some(&' ') {
            if let Some(decoded) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                lookahead.next();
                chars = lookahead;
                out.push(decoded);
                continue;
            }
        }

        match chars.next() {
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_punctuation() {
        assert_eq!(escape("hover:bg-red"), r"hover\:bg-red");
        assert_eq!(escape("w-[10px]"), r"w-\[10px\]");
        assert_eq!(escape("bg-red/40"), r"bg-red\/40");
        assert_eq!(escape("p-1.5"), r"p-1\.5");
    }

    #[test]
    fn test_escape_leading_digit() {
        assert_eq!(escape("1/2"), r"\31 \/2");
        assert_eq!(escape("a1"), "a1");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"hover\:bg-red"), "hover:bg-red");
        assert_eq!(unescape(r"\32 xl\:p-4"), "2xl:p-4");
    }

    #[test]
    fn test_round_trip() {
        let samples = [
            "bg-red-500/40",
            "md:bg-blue",
            "3d-[rotate(45deg)]",
            "(&:hover):p-4",
            "a b#c{d}e.f:g;h?i%j&k,l@m+n*o~p'q\"r!s^t$u[v]w(x)y=z>0|1/2",
            "9",
            "",
        ];
        for s in samples {
            assert_eq!(unescape(&escape(s)), s, "round trip failed for {:?}", s);
        }
    }

    #[test]
    fn test_round_trip_every_leading_character() {
        for first in ('0'..='9').chain('a'..='z').chain('A'..='Z').chain(ESCAPED_CHARS.iter().copied()) {
            let s = format!("{first}a1");
            assert_eq!(unescape(&escape(&s)), s);
        }
    }
}
