/// Longest segment a player is asked to type in one go.
pub const SEGMENT_CAP: usize = 50;

/// Splits one line into segments of at most `cap` chars.
///
/// Every non-final segment holds `cap - 1` chars followed by a hyphen, so a
/// split word reads as a continuation. Blank lines yield nothing.
pub fn chunk_line(line: &str, cap: usize) -> Vec<String> {
    let line = line.trim();
    if line.is_empty() || cap < 2 {
        return Vec::new();
    }

    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= cap {
        return vec![line.to_string()];
    }

    let mut segments = Vec::new();
    let mut rest = &chars[..];
    while rest.len() > cap {
        let (head, tail) = rest.split_at(cap - 1);
        let mut segment: String = head.iter().collect();
        segment.push('-');
        segments.push(segment);
        rest = tail;
    }
    segments.push(rest.iter().collect());
    segments
}

/// Chunks every non-blank line of `text`, preserving order.
pub fn chunk_text(text: &str, cap: usize) -> Vec<String> {
    text.lines().flat_map(|line| chunk_line(line, cap)).collect()
}
