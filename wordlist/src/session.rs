use dictionary::{LookupError, Word};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupState {
    Idle,
    Searching,
    Success,
    Failed,
}

/// Issued when a lookup starts; hand it back with the outcome.
#[derive(Debug)]
pub struct LookupTicket {
    sequence: u64,
    term: String,
}

impl LookupTicket {
    pub fn term(&self) -> &str {
        &self.term
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer lookup was started after this one, its result was dropped.
    Stale,
}

/// What the screen shows for the current search: the loading state, the
/// result and the inline error.
///
/// Every lookup gets a sequence number and only the most recently started
/// one may write its outcome, so a slow response can never replace the
/// result of a newer search.
#[derive(Debug)]
pub struct LookupSession {
    state: LookupState,
    issued: u64,
    word: Option<Word>,
    error: Option<String>,
}

impl LookupSession {
    pub fn new() -> Self {
        Self {
            state: LookupState::Idle,
            issued: 0,
            word: None,
            error: None,
        }
    }

    /// Starts a lookup for `term`. A blank term changes nothing.
    pub fn begin(&mut self, term: &str) -> Option<LookupTicket> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        self.issued += 1;
        self.state = LookupState::Searching;
        self.word = None;
        self.error = None;
        Some(LookupTicket {
            sequence: self.issued,
            term: term.to_owned(),
        })
    }

    pub fn complete(
        &mut self,
        ticket: LookupTicket,
        result: Result<Option<Word>, LookupError>,
    ) -> Completion {
        if ticket.sequence != self.issued || self.state != LookupState::Searching {
            tracing::debug!(term = %ticket.term, "dropping result of a superseded lookup");
            return Completion::Stale;
        }
        self.state = match result {
            Ok(Some(word)) => {
                self.word = Some(word);
                LookupState::Success
            }
            Ok(None) => LookupState::Idle,
            Err(error) => {
                tracing::info!(term = %ticket.term, %error, "lookup failed");
                self.error = Some(error.user_message());
                LookupState::Failed
            }
        };
        Completion::Applied
    }

    /// Ends a finished cycle. The result and error stay visible.
    pub fn acknowledge(&mut self) {
        if matches!(self.state, LookupState::Success | LookupState::Failed) {
            self.state = LookupState::Idle;
        }
    }

    pub fn state(&self) -> LookupState {
        self.state
    }

    pub fn is_searching(&self) -> bool {
        self.state == LookupState::Searching
    }

    pub fn word(&self) -> Option<&Word> {
        self.word.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Default for LookupSession {
    fn default() -> Self {
        Self::new()
    }
}
