//! Append-only command stream

use crate::command::GcodeLine;
use std::fmt;

/// Ordered sequence of emitted lines
///
/// Only the motion emitter appends; readers get the lines in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptBuffer {
    lines: Vec<GcodeLine>,
}

impl ScriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[GcodeLine] {
        &self.lines
    }

    pub fn iter(&self) -> impl Iterator<Item = &GcodeLine> {
        self.lines.iter()
    }

    /// Each line rendered to text
    pub fn line_texts(&self) -> Vec<String> {
        self.lines.iter().map(ToString::to_string).collect()
    }

    /// Whole script as newline-terminated text
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub(crate) fn append(&mut self, lines: Vec<GcodeLine>) {
        self.lines.extend(lines);
    }
}

impl fmt::Display for ScriptBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ScriptBuffer {
    type Item = &'a GcodeLine;
    type IntoIter = std::slice::Iter<'a, GcodeLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
