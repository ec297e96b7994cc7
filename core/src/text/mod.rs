//! String- and comment-aware line scrubbing used by the structure checks
//! and the formatter.


/// End (exclusive char index) of the string literal opening at `start`, or
/// `None` when the quote is never closed on this line.
fn literal_end(chars: &[char], start: usize) -> Option<usize> {
    let quote = chars[start];
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

fn scrub(line: &str, blank_literals: bool) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut i = 0usize;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            '"' | '\'' => match literal_end(&chars, i) {
                Some(end) => {
                    out.push(c);
                    for &inner in &chars[i + 1..end - 1] {
                        out.push(if blank_literals { ' ' } else { inner });
                    }
                    out.push(c);
                    i = end;
                }
                None => {
                    out.push(c);
                    i += 1;
                }
            },
            '/' if next == Some('/') => break,
            '/' if next == Some('*') => {
                let close = (i + 2..chars.len().saturating_sub(1)).find(|&j| chars[j] == '*' && chars[j + 1] == '/');
                match close {
                    Some(j) => i = j + 2,
                    None => {
                        out.extend(&chars[i..]);
                        break;
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

/// `line` without `//` and same-line `/* */` comments. String literals are
/// kept verbatim, so comment markers inside them survive.
pub fn strip_comments(line: &str) -> String {
    scrub(line, false)
}

/// Like [`strip_comments`], with string literal contents replaced by spaces
/// so brackets inside strings are not counted.
pub fn code_skeleton(line: &str) -> String {
    scrub(line, true)
}

/// Net bracket depth change of a skeleton line: openers minus closers.
pub fn bracket_delta(skeleton: &str) -> isize {
    skeleton.chars().fold(0isize, |acc, c| match c {
        '{' | '(' | '[' => acc + 1,
        '}' | ')' | ']' => acc - 1,
        _ => acc,
    })
}
