//! Yes/no confirmation before installing a missing dependency.

use std::io::{self, BufRead, Write};

/// Asks a yes/no question.
#[cfg_attr(test, mockall::automock)]
pub trait Confirm: Send + Sync {
    /// Returns `true` when the answer is yes.
    fn confirm(&self, question: &str) -> bool;
}

/// Asks on the terminal, reading the answer from stdin.
///
/// An empty answer, end of input or a read error count as "no".
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    /// Asks `question` on `output` and reads answers from `input` until one is recognised.
    pub fn ask<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> bool {
        loop {
            if write!(output, "{question} [y/N]: ")
                .and_then(|()| output.flush())
                .is_err()
            {
                return false;
            }

            let mut line = String::new();
            match input.read_line(&mut line) {
                Ok(0) | Err(_) => return false,
                Ok(_) => {}
            }

            match line.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return true,
                "" | "n" | "no" => return false,
                _ => {
                    if writeln!(output, "Please answer 'y' or 'n'.").is_err() {
                        return false;
                    }
                }
            }
        }
    }
}

impl Confirm for ConsolePrompt {
    fn confirm(&self, question: &str) -> bool {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stderr();
        Self::ask(question, &mut input, &mut output)
    }
}

/// Always answers yes. For unattended environments that allow installs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _question: &str) -> bool {
        true
    }
}

/// Always answers no.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&self, _question: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(answers: &str) -> (bool, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let answer = ConsolePrompt::ask("Install it?", &mut input, &mut output);
        (answer, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_yes_answers() {
        assert!(ask("y\n").0);
        assert!(ask("YES\n").0);
        assert!(ask("  yes  \n").0);
    }

    #[test]
    fn test_no_answers() {
        assert!(!ask("n\n").0);
        assert!(!ask("no\n").0);
        assert!(!ask("\n").0);
    }

    #[test]
    fn test_end_of_input_is_no() {
        assert!(!ask("").0);
    }

    #[test]
    fn test_unrecognised_answer_reprompts() {
        let (answer, output) = ask("maybe\ny\n");

        assert!(answer);
        assert_eq!(output.matches("Install it? [y/N]: ").count(), 2);
        assert!(output.contains("Please answer 'y' or 'n'."));
    }

    struct RejectsHint(Vec<u8>);

    impl Write for RejectsHint {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf.starts_with(b"Please") {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_hint_write_is_no() {
        let mut input = Cursor::new(b"maybe\ny\n".to_vec());
        let mut output = RejectsHint(Vec::new());

        assert!(!ConsolePrompt::ask("Install it?", &mut input, &mut output));
        assert_eq!(
            String::from_utf8(output.0).unwrap().matches("[y/N]").count(),
            1
        );
    }

    #[test]
    fn test_fixed_answers() {
        assert!(AlwaysConfirm.confirm("anything"));
        assert!(!NeverConfirm.confirm("anything"));
    }
}
