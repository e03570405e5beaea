/// Line-oriented output buffer with indentation tracking.
///
/// This is *not* an IR. It is a structured printer shared by every backend.
#[derive(Debug, Default)]
pub struct SourceEmitter {
    /// Output buffer
    out: String,

    /// Current indentation depth
    indent: usize,
}

const INDENT_UNIT: &str = "    ";

impl SourceEmitter {
    pub fn new() -> Self {
        SourceEmitter::default()
    }

    /// Emits a string directly to the output buffer
    pub fn emit(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// Emits one indented line. Empty lines never get trailing whitespace.
    pub fn emit_line(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.indent {
                self.out.push_str(INDENT_UNIT);
            }
            self.out.push_str(line);
        }
        self.out.push('\n');
    }

    /// Emits multi-line text, indenting every non-empty line at the current depth.
    pub fn emit_lines(&mut self, text: &str) {
        for line in text.lines() {
            self.emit_line(line);
        }
    }

    pub fn blank_line(&mut self) {
        self.out.push('\n');
    }

    /// Increases indentation depth
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decreases indentation depth
    pub fn dedent(&mut self) {
        if self.indent > 0 {
            self.indent -= 1;
        }
    }

    pub fn finish(self) -> String {
        self.out
    }
}
