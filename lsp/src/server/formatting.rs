use slim_core::text::{bracket_delta, code_skeleton};
use tower_lsp::lsp_types::FormattingOptions;

fn leading_closers(line: &str) -> isize {
    line.chars()
        .take_while(|c| c.is_whitespace() || matches!(c, '}' | ')' | ']'))
        .filter(|c| matches!(c, '}' | ')' | ']'))
        .count() as isize
}

/// Re-indent `input` by bracket depth. Brackets inside strings and comments
/// do not count.
pub(crate) fn format_slim(input: &str, options: &FormattingOptions) -> String {
    let unit = if options.insert_spaces {
        " ".repeat(options.tab_size.clamp(1, 8) as usize)
    } else {
        "\t".to_string()
    };
    let mut out = String::with_capacity(input.len() + 16);
    let mut depth = 0isize;

    for chunk in input.split_inclusive('\n') {
        let body = chunk.trim_end_matches(['\r', '\n']);
        let line = body.trim();
        let skeleton = code_skeleton(line);
        let own_depth = (depth - leading_closers(&skeleton)).max(0);
        if !line.is_empty() {
            out.push_str(&unit.repeat(own_depth as usize));
            out.push_str(line);
        }
        // Keep the line ending as written, LF or CRLF.
        out.push_str(&chunk[body.len()..]);
        depth = (depth + bracket_delta(&skeleton)).max(0);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spaces(n: u32) -> FormattingOptions {
        FormattingOptions {
            tab_size: n,
            insert_spaces: true,
            ..Default::default()
        }
    }

    #[test]
    fn indents_blocks() {
        let input = "1 early() {\nif (x) {\ny = 1;\n}\n}\n";
        let expected = "1 early() {\n    if (x) {\n        y = 1;\n    }\n}\n";
        assert_eq!(format_slim(input, &spaces(4)), expected);
    }

    #[test]
    fn else_line_keeps_block_depth() {
        let input = "if (a) {\nx = 1;\n} else {\nx = 2;\n}";
        let expected = "if (a) {\n  x = 1;\n} else {\n  x = 2;\n}";
        assert_eq!(format_slim(input, &spaces(2)), expected);
    }

    #[test]
    fn tabs_and_blank_lines() {
        let options = FormattingOptions {
            tab_size: 4,
            insert_spaces: false,
            ..Default::default()
        };
        assert_eq!(format_slim("f() {\n   \nx;\n}", &options), "f() {\n\n\tx;\n}");
    }

    #[test]
    fn brackets_in_strings_and_comments_are_ignored() {
        let input = "catn(\"{\");\n// {\nx = 1;";
        assert_eq!(format_slim(input, &spaces(4)), input);
    }

    #[test]
    fn crlf_line_endings_are_kept() {
        let input = "f() {\r\nx = 1;\r\n}\r\n";
        assert_eq!(format_slim(input, &spaces(2)), "f() {\r\n  x = 1;\r\n}\r\n");
        let formatted = "f() {\r\n  x = 1;\r\n}";
        assert_eq!(format_slim(formatted, &spaces(2)), formatted);
    }

    #[test]
    fn tab_size_is_clamped() {
        assert_eq!(format_slim("{\nx;\n}", &spaces(20)), "{\n        x;\n}");
    }
}
