//! Telegram MarkdownV2 helpers.
//!
//! Every function taking `text` escapes it; functions taking `lines` or a `title` expect
//! already-formatted markup.

const RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }

    out
}

pub fn bold(text: &str) -> String {
    format!("*{}*", escape(text))
}

pub fn italic(text: &str) -> String {
    format!("_{}_", escape(text))
}

/// Title followed by each line as-is
pub fn section<I>(title: &str, lines: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut out = title.to_string();
    for line in lines {
        out.push('\n');
        out.push_str(&line);
    }

    out
}

/// Title followed by a bulleted list
pub fn marked_section<I>(title: &str, lines: I) -> String
where
    I: IntoIterator<Item = String>,
{
    section(title, lines.into_iter().map(|line| format!("\\- {line}")))
}

/// Title followed by a `1.`, `2.`, ... list
pub fn numbered_section<I>(title: &str, lines: I) -> String
where
    I: IntoIterator<Item = String>,
{
    section(
        title,
        lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| format!("{}\\. {line}", i + 1)),
    )
}
