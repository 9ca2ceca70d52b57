// Terminal overwrite confirmation

use std::io::{self, BufRead, Write};

use scratch_import::{ConflictDecision, ImportTarget, OverwritePrompt};

/// Asks on stdout and reads the answer from `input`. Anything other than a
/// yes, including EOF or a read error, cancels.
pub struct TerminalPrompt<I> {
    input: I,
}

impl TerminalPrompt<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<I: BufRead> TerminalPrompt<I> {
    pub fn new(input: I) -> Self {
        Self { input }
    }
}

impl<I: BufRead> OverwritePrompt for TerminalPrompt<I> {
    fn confirm(&mut self, target: &ImportTarget) -> ConflictDecision {
        print!("{} already exists. Overwrite? [y/N] ", target.display_name);
        if let Err(e) = io::stdout().flush() {
            tracing::warn!("Failed to flush prompt: {}", e);
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(_) => parse_answer(&line),
            Err(e) => {
                tracing::warn!("Failed to read answer: {}", e);
                ConflictDecision::Cancel
            }
        }
    }
}

fn parse_answer(line: &str) -> ConflictDecision {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => ConflictDecision::Overwrite,
        _ => ConflictDecision::Cancel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn target() -> ImportTarget {
        ImportTarget {
            display_name: "proj.sb3".into(),
            destination: PathBuf::from("/tmp/proj.sb3"),
        }
    }

    #[test]
    fn answers() {
        assert_eq!(parse_answer("y\n"), ConflictDecision::Overwrite);
        assert_eq!(parse_answer(" YES \n"), ConflictDecision::Overwrite);
        assert_eq!(parse_answer("n\n"), ConflictDecision::Cancel);
        assert_eq!(parse_answer("\n"), ConflictDecision::Cancel);
        assert_eq!(parse_answer("maybe"), ConflictDecision::Cancel);
    }

    #[test]
    fn reads_one_answer_per_prompt() {
        let mut prompt = TerminalPrompt::new(Cursor::new("y\nn\n"));
        assert_eq!(prompt.confirm(&target()), ConflictDecision::Overwrite);
        assert_eq!(prompt.confirm(&target()), ConflictDecision::Cancel);
        // EOF
        assert_eq!(prompt.confirm(&target()), ConflictDecision::Cancel);
    }
}
