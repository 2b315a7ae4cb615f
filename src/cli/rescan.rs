//! Interactive "scan again?" loop.

use crate::cli::ScanRequest;
use crate::output::print_error;
use console::Term;
use std::io;

/// Prompts on the terminal for follow-up scans.
pub struct RescanPrompt {
    term: Term,
}

impl RescanPrompt {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Ask whether to scan again and, if so, for the new target.
    ///
    /// Invalid answers are reported and the question is asked again.
    /// Returns `None` once the operator declines.
    pub fn next_request(&self, previous: &ScanRequest) -> io::Result<Option<ScanRequest>> {
        loop {
            let again = self.ask("Do you want to run another scan? (y/n): ")?;
            if !again.trim().eq_ignore_ascii_case("y") {
                return Ok(None);
            }

            let host = self.ask("Enter new host/IP: ")?;
            let start = self.ask("Enter new start port: ")?;
            let end = self.ask("Enter new end port: ")?;

            match ScanRequest::from_answers(previous, &host, &start, &end) {
                Ok(request) => return Ok(Some(request)),
                Err(e) => print_error(&e.to_string()),
            }
        }
    }

    fn ask(&self, question: &str) -> io::Result<String> {
        self.term.write_str(question)?;
        self.term.flush()?;
        self.term.read_line()
    }
}

impl Default for RescanPrompt {
    fn default() -> Self {
        Self::new()
    }
}
