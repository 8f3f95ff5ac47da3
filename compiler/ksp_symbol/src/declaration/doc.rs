//! Doc comment text.

/// Strip the comment markers from a `/** ... */` block.
///
/// The leading `*` of each line and the whitespace before it are removed;
/// everything else, including blank lines, is kept.
pub(crate) fn parse_doc(raw: &str) -> Option<String> {
    let inner = raw.trim().strip_prefix("/**")?.strip_suffix("*/")?;
    let lines: Vec<&str> = inner
        .lines()
        .map(|line| {
            let line = line.trim_start();
            line.strip_prefix('*').unwrap_or(line)
        })
        .collect();
    Some(lines.join("\n"))
}
