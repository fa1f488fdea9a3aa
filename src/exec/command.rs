use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

use super::lexer;

/// A tokenized command line.
///
/// Holds the text it was parsed from alongside the argument vector, so
/// traces can echo the exact command while spawning uses the tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    text: String,
    argv: Vec<String>,
}

impl CommandLine {
    /// Split `text` into words. Fails before anything is spawned if the
    /// quoting is unbalanced or there is no program to run.
    pub fn parse(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let argv = lexer::split(&text).map_err(|e| Error::MalformedCommand {
            command: text.clone(),
            reason: e.to_string(),
        })?;
        if argv.is_empty() {
            return Err(Error::MalformedCommand {
                command: text,
                reason: "no program given".to_string(),
            });
        }
        Ok(Self { text, argv })
    }

    /// Build from already-separated arguments. The text form is quoted so
    /// that parsing it again yields the same arguments.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = args.into_iter().map(Into::into).collect();
        if argv.is_empty() {
            return Err(Error::MalformedCommand {
                command: String::new(),
                reason: "no program given".to_string(),
            });
        }
        Ok(Self {
            text: join(&argv),
            argv,
        })
    }

    /// Prepend a wrapper invocation, e.g. a container manager and its flags.
    pub fn wrapped<I, S>(&self, prefix: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv: Vec<String> = prefix.into_iter().map(Into::into).collect();
        argv.extend(self.argv.iter().cloned());
        Self {
            text: join(&argv),
            argv,
        }
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Quote words for display so [`lexer::split`] gives them back unchanged.
///
/// `shell_words` leaves `\r` unquoted, but it separates words here.
fn join(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.contains('\r') {
                Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
            } else {
                shell_words::quote(arg)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for CommandLine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_text_and_tokens() {
        let cmd = CommandLine::parse(r#"echo "a b""#).unwrap();
        assert_eq!(cmd.as_str(), r#"echo "a b""#);
        assert_eq!(cmd.program(), "echo");
        assert_eq!(cmd.args(), ["a b"]);
    }

    #[test]
    fn unbalanced_quotes_are_malformed() {
        let err = CommandLine::parse("echo 'unterminated").unwrap_err();
        match err {
            Error::MalformedCommand { command, reason } => {
                assert_eq!(command, "echo 'unterminated");
                assert!(reason.contains("quote"), "unexpected reason: {reason}");
            }
            other => panic!("expected MalformedCommand, got: {other:?}"),
        }
    }

    #[test]
    fn empty_command_is_malformed() {
        assert!(matches!(
            CommandLine::parse("  \t"),
            Err(Error::MalformedCommand { .. })
        ));
        assert!(matches!(
            CommandLine::from_args(Vec::<String>::new()),
            Err(Error::MalformedCommand { .. })
        ));
    }

    #[test]
    fn from_args_text_reparses_to_same_argv() {
        let cmd = CommandLine::from_args(["printf", "%s\n", "it's here"]).unwrap();
        let again: CommandLine = cmd.as_str().parse().unwrap();
        assert_eq!(again.argv(), cmd.argv());
    }

    #[test]
    fn carriage_return_argument_survives_reparse() {
        let cmd = CommandLine::from_args(["printf", "a\rb", "it's\r"]).unwrap();
        let again = CommandLine::parse(cmd.as_str()).unwrap();
        assert_eq!(again.argv(), ["printf", "a\rb", "it's\r"]);
    }

    #[test]
    fn wrapped_prepends_prefix() {
        let cmd = CommandLine::parse("uname -a").unwrap();
        let wrapped = cmd.wrapped(["sudo", "-n"]);
        assert_eq!(wrapped.argv(), ["sudo", "-n", "uname", "-a"]);
        assert_eq!(wrapped.to_string(), "sudo -n uname -a");
    }
}
