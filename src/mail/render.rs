use anyhow::{Result, bail};
use std::process::Command;

use super::types::Message;

/// Body shown in the detail view: rendered HTML when present, else plain text
pub fn body_text(message: &Message, cols: u16) -> String {
    match message.html.as_deref().filter(|h| !h.trim().is_empty()) {
        Some(html) => render_html(html, cols).unwrap_or_else(|e| {
            log::debug!("w3m unavailable ({}), stripping tags", e);
            strip_tags(html)
        }),
        None => message.text.clone(),
    }
}

fn render_html(html: &str, cols: u16) -> Result<String> {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = Command::new("w3m")
        .args(["-dump", "-T", "text/html", "-cols", &cols.max(20).to_string()])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(html.as_bytes())?;
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        bail!("w3m exited with {}", output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Crude HTML to text: drops tags, script and style content, breaks lines
/// on block elements and decodes the common entities.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        let Some(end) = after.find('>') else {
            rest = "";
            break;
        };
        let tag = after[1..end].trim().to_ascii_lowercase();
        rest = &after[end + 1..];

        let closing = tag.starts_with('/');
        let name: String = tag
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();

        match name.as_str() {
            "script" | "style" if !closing => {
                // Lowercasing ASCII keeps byte offsets intact
                let close = format!("</{}", name);
                rest = match rest.to_ascii_lowercase().find(&close) {
                    Some(i) => &rest[i..],
                    None => "",
                };
            }
            "br" => out.push('\n'),
            "li" if !closing => out.push_str("- "),
            "p" | "div" | "tr" | "li" | "table" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
                if closing =>
            {
                out.push('\n')
            }
            _ => {}
        }
    }
    out.push_str(rest);

    let decoded = out
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&");

    collapse_blank_lines(&decoded)
}

fn collapse_blank_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim_end) {
        if line.is_empty() && lines.last().is_some_and(|l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        let html = "<p>Hello&nbsp;<b>World</b></p><br><style>p { color: red }</style>a &amp; b";
        assert_eq!(strip_tags(html), "Hello World\n\na & b");
    }

    #[test]
    fn test_strip_tags_list_and_script() {
        let html = "<ul><li>one</li><li>two</li></ul><SCRIPT>alert('x')</SCRIPT>end";
        assert_eq!(strip_tags(html), "- one\n- two\nend");
    }

    #[test]
    fn test_unterminated_tag_is_dropped() {
        assert_eq!(strip_tags("text <a href"), "text");
    }

    #[test]
    fn test_plain_text_without_html() {
        let m = Message {
            text: "plain body".into(),
            html: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(body_text(&m, 80), "plain body");
    }
}
