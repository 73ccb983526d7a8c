use std::fmt;
use std::io::Write;

/// A command line that can be pasted into a POSIX shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandDelimiter {
    Newline,
    /// ASCII NUL, for `xargs -0` style consumers
    Nul,
}

impl ShellCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            args: vec![program.into()],
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn write_to(&self, out: &mut impl Write, delimiter: CommandDelimiter) -> std::io::Result<()> {
        match delimiter {
            CommandDelimiter::Newline => writeln!(out, "{self}"),
            CommandDelimiter::Nul => write!(out, "{self}\0"),
        }
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&quote_arg(arg))?;
        }
        Ok(())
    }
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | ',' | '+' | '=' | '@' | '%')
}

/// Quotes one argument; embedded single quotes become `'\''`.
pub fn quote_arg(arg: &str) -> String {
    if !arg.is_empty() && arg.chars().all(is_shell_safe) {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_arg() {
        assert_eq!(quote_arg("plain/path-1.mkv"), "plain/path-1.mkv");
        assert_eq!(quote_arg("with space.mkv"), "'with space.mkv'");
        assert_eq!(quote_arg("it's"), r"'it'\''s'");
        assert_eq!(quote_arg("$HOME [1]?#"), "'$HOME [1]?#'");
        assert_eq!(quote_arg(""), "''");
    }

    #[test]
    fn test_url_query_is_quoted() {
        let command = ShellCommand::new("wget")
            .arg("--output-document")
            .arg("Show/e 01.mkv")
            .arg("https://cdn.example/dl?token=a&file=1");

        assert_eq!(
            command.to_string(),
            "wget --output-document 'Show/e 01.mkv' 'https://cdn.example/dl?token=a&file=1'"
        );
    }

    #[test]
    fn test_delimiters() {
        let command = ShellCommand::new("echo").arg("a b");
        let mut out = Vec::new();
        command.write_to(&mut out, CommandDelimiter::Nul).unwrap();
        command.write_to(&mut out, CommandDelimiter::Newline).unwrap();
        assert_eq!(out, b"echo 'a b'\0echo 'a b'\n");
    }
}
