// src/console.rs
// =============================================================================
// Where the human-readable progress lines go.
//
// Normally that's stdout, like every println! in this tool. With --json,
// stdout carries exactly one JSON document, so progress moves to stderr.
// Tests capture the lines instead to check what a user would have seen.
// =============================================================================

#[cfg(test)]
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub enum Console {
    #[default]
    Stdout,
    Stderr,
    #[cfg(test)]
    Captured(Arc<Mutex<Vec<String>>>),
}

impl Console {
    /// Progress goes to stderr when stdout is reserved for JSON.
    pub fn for_output(json: bool) -> Self {
        if json {
            Console::Stderr
        } else {
            Console::Stdout
        }
    }

    pub fn line(&self, line: impl AsRef<str>) {
        match self {
            Console::Stdout => println!("{}", line.as_ref()),
            Console::Stderr => eprintln!("{}", line.as_ref()),
            #[cfg(test)]
            Console::Captured(lines) => lines.lock().unwrap().push(line.as_ref().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_output_moves_progress_to_stderr() {
        assert!(matches!(Console::for_output(true), Console::Stderr));
        assert!(matches!(Console::for_output(false), Console::Stdout));
    }

    #[test]
    fn test_captured_lines() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let console = Console::Captured(lines.clone());
        console.line("Checking: x");
        console.line(format!("Found {} links", 2));

        assert_eq!(*lines.lock().unwrap(), vec!["Checking: x", "Found 2 links"]);
    }
}
