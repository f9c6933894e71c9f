use dictionary::Dictionary;
use realtime_db::StoreResult;

use crate::session::{Completion, LookupSession, LookupState};
use crate::storage::Storage;

/// How one search ended. The word or the inline error is read from the session.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Nothing to look up.
    Blank,
    /// A newer search was started, this result was dropped.
    Stale,
    /// The word was found. `history` is the outcome of recording the search.
    Found { history: StoreResult<String> },
    Failed,
}

/// Looks `term` up and, when a word comes back, appends the searched term
/// to the history. Failed lookups leave the history alone.
pub async fn search(
    dict: &Dictionary,
    storage: &Storage,
    session: &mut LookupSession,
    term: &str,
) -> SearchOutcome {
    let Some(ticket) = session.begin(term) else {
        return SearchOutcome::Blank;
    };
    debug_assert!(session.is_searching());
    let searched = ticket.term().to_owned();
    let result = dict.lookup(&searched).await;
    if session.complete(ticket, result) == Completion::Stale {
        return SearchOutcome::Stale;
    }

    match session.state() {
        LookupState::Success => {
            let history = storage.record_history(&searched).await;
            if let Err(error) = &history {
                tracing::warn!(term = %searched, %error, "search not recorded in history");
            }
            SearchOutcome::Found { history }
        }
        LookupState::Failed => SearchOutcome::Failed,
        LookupState::Idle | LookupState::Searching => SearchOutcome::Blank,
    }
}
