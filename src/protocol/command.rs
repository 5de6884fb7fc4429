//! Structured command building.
//!
//! Stim commands are space-separated ASCII words. The builder replaces
//! ad-hoc format strings so arguments are appended explicitly and typed.

use std::fmt;

/// A command message under construction.
///
/// ```
/// use stimsock::Command;
///
/// let cmd = Command::new("stimulate").arg(3).arg("left");
/// assert_eq!(cmd.to_string(), "stimulate 3 left");
/// ```
#[derive(Debug, Clone)]
pub struct Command {
    verb: String,
    args: Vec<String>,
}

impl Command {
    /// Start a command with the given verb.
    pub fn new(verb: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument (builder pattern).
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.args.push(value.to_string());
        self
    }

    /// Render to the wire text (unframed).
    pub fn render(&self) -> String {
        if self.args.is_empty() {
            return self.verb.clone();
        }
        let mut out = self.verb.clone();
        for arg in &self.args {
            out.push(' ');
            out.push_str(arg);
        }
        out
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_verb() {
        assert_eq!(Command::new("PING").render(), "PING");
    }

    #[test]
    fn test_mixed_argument_types() {
        let cmd = Command::new("setspot").arg(12).arg(-4.5).arg("red");
        assert_eq!(cmd.render(), "setspot 12 -4.5 red");
    }
}
