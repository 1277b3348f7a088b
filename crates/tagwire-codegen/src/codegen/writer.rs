//! Indentation-aware text output.

use std::fmt::{self, Write as FmtWrite};

/// Writes lines at the current nesting depth.
///
/// Blank lines carry no indentation, and items within one scope are kept
/// one blank line apart by [`begin_item`](Self::begin_item).
pub(crate) struct CodeWriter<'a, W: FmtWrite> {
    writer: &'a mut W,
    indent_str: &'a str,
    indent_level: usize,
    /// Whether the next item in the current scope needs a separating blank line
    needs_separator: bool,
}

impl<'a, W: FmtWrite> CodeWriter<'a, W> {
    pub(crate) fn new(writer: &'a mut W, indent_str: &'a str) -> Self {
        Self {
            writer,
            indent_str,
            indent_level: 0,
            needs_separator: false,
        }
    }

    pub(crate) fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub(crate) fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_indent(&mut self) -> fmt::Result {
        for _ in 0..self.indent_level {
            self.writer.write_str(self.indent_str)?;
        }
        Ok(())
    }

    /// Writes one indented line
    pub(crate) fn writeln(&mut self, s: &str) -> fmt::Result {
        self.write_indent()?;
        writeln!(self.writer, "{s}")
    }

    /// Writes one indented line from format arguments
    pub(crate) fn line(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        self.write_indent()?;
        self.writer.write_fmt(args)?;
        self.writer.write_char('\n')
    }

    pub(crate) fn blank(&mut self) -> fmt::Result {
        self.writer.write_char('\n')
    }

    /// Starts a top-level item of the current scope
    pub(crate) fn begin_item(&mut self) -> fmt::Result {
        if self.needs_separator {
            self.blank()?;
        }
        self.needs_separator = true;
        Ok(())
    }

    /// Writes `open`, then indents and starts a fresh item scope
    pub(crate) fn open(&mut self, open: fmt::Arguments<'_>) -> fmt::Result {
        self.line(open)?;
        self.indent();
        self.needs_separator = false;
        Ok(())
    }

    /// Dedents and writes `close`
    pub(crate) fn close(&mut self, close: &str) -> fmt::Result {
        self.dedent();
        self.needs_separator = true;
        self.writeln(close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_items() {
        let mut out = String::new();
        let mut w = CodeWriter::new(&mut out, "  ");
        w.begin_item().unwrap();
        w.writeln("struct A;").unwrap();
        w.begin_item().unwrap();
        w.open(format_args!("mod b {{")).unwrap();
        w.begin_item().unwrap();
        w.writeln("struct C;").unwrap();
        w.begin_item().unwrap();
        w.writeln("struct D;").unwrap();
        w.close("}").unwrap();

        assert_eq!(out, "struct A;\n\nmod b {\n  struct C;\n\n  struct D;\n}\n");
    }
}
