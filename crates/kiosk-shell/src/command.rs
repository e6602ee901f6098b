//! Runtime command protocol
//!
//! One command per line. Keywords and URL schemes match case-insensitively;
//! URLs themselves are passed on verbatim.

/// A parsed runtime command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Load a network URL (`http://` or `https://`)
    Navigate(String),
    /// Load a local file from a `file://` URL
    LoadLocalFile(String),
    SetPosition { x: f64, y: f64 },
    SetSize { width: f64, height: f64 },
    Exit,
    /// A non-empty line that is not a well-formed command
    Invalid(String),
}

/// Parse one line of input.
///
/// Returns `None` for empty or whitespace-only lines. Every other line maps to
/// exactly one [`Command`]; malformed input becomes [`Command::Invalid`].
pub fn parse(line: &str) -> Option<Command> {
    let text = line.trim();
    if text.is_empty() {
        return None;
    }

    if text.eq_ignore_ascii_case("exit") {
        return Some(Command::Exit);
    }

    if has_prefix(text, "http://") || has_prefix(text, "https://") {
        return Some(Command::Navigate(text.to_string()));
    }

    if has_prefix(text, "file://") {
        return Some(Command::LoadLocalFile(text.to_string()));
    }

    let mut tokens = text.split_whitespace();
    let command = match tokens.next() {
        Some(keyword) if keyword.eq_ignore_ascii_case("setpos") => {
            parse_pair(tokens).map(|(x, y)| Command::SetPosition { x, y })
        }
        Some(keyword) if keyword.eq_ignore_ascii_case("setsize") => {
            parse_pair(tokens).map(|(width, height)| Command::SetSize { width, height })
        }
        _ => None,
    };

    Some(command.unwrap_or_else(|| Command::Invalid(text.to_string())))
}

fn has_prefix(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
}

/// Exactly two finite numbers, nothing more.
fn parse_pair<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<(f64, f64)> {
    let first = parse_number(tokens.next()?)?;
    let second = parse_number(tokens.next()?)?;
    if tokens.next().is_some() {
        return None;
    }
    Some((first, second))
}

fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_produce_nothing() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("\t\r\n"), None);
    }

    #[test]
    fn test_exit_any_case() {
        assert_eq!(parse("exit"), Some(Command::Exit));
        assert_eq!(parse("  EXIT \n"), Some(Command::Exit));
        assert_eq!(parse("Exit"), Some(Command::Exit));
    }

    #[test]
    fn test_exit_with_arguments_is_invalid() {
        assert_eq!(
            parse("exit now"),
            Some(Command::Invalid("exit now".to_string()))
        );
    }

    #[test]
    fn test_navigate_keeps_url_verbatim() {
        assert_eq!(
            parse("https://example.com"),
            Some(Command::Navigate("https://example.com".to_string()))
        );
        assert_eq!(
            parse("  http://Example.com/Path?q=A B \n"),
            Some(Command::Navigate("http://Example.com/Path?q=A B".to_string()))
        );
        assert_eq!(
            parse("HTTPS://EXAMPLE.COM"),
            Some(Command::Navigate("HTTPS://EXAMPLE.COM".to_string()))
        );
    }

    #[test]
    fn test_file_url() {
        assert_eq!(
            parse("file:///tmp/page.html"),
            Some(Command::LoadLocalFile("file:///tmp/page.html".to_string()))
        );
    }

    #[test]
    fn test_setpos_and_setsize() {
        assert_eq!(parse("SETPOS 10 20"), Some(Command::SetPosition { x: 10.0, y: 20.0 }));
        assert_eq!(
            parse("  setpos   -5.5\t3e2  "),
            Some(Command::SetPosition { x: -5.5, y: 300.0 })
        );
        assert_eq!(
            parse("SetSize 1024 768"),
            Some(Command::SetSize { width: 1024.0, height: 768.0 })
        );
    }

    #[test]
    fn test_malformed_geometry_is_invalid() {
        for line in [
            "setsize abc 100",
            "setpos 10",
            "setpos 1 2 3",
            "setpos",
            "setsize 1 inf",
            "setsize NaN 2",
            "setposition 1 2",
        ] {
            assert_eq!(
                parse(line),
                Some(Command::Invalid(line.to_string())),
                "line: {line}"
            );
        }
    }

    #[test]
    fn test_unrecognized_text_is_invalid_not_navigation() {
        assert_eq!(
            parse(" example.com "),
            Some(Command::Invalid("example.com".to_string()))
        );
        assert_eq!(
            parse("ftp://example.com"),
            Some(Command::Invalid("ftp://example.com".to_string()))
        );
        assert_eq!(parse("http:/"), Some(Command::Invalid("http:/".to_string())));
    }

    #[test]
    fn test_prefix_check_handles_multibyte_text() {
        assert_eq!(parse("héllo"), Some(Command::Invalid("héllo".to_string())));
        assert_eq!(parse("日本語のテキスト"), Some(Command::Invalid("日本語のテキスト".to_string())));
    }
}
