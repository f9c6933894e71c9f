use std::io::{self, BufRead};
use std::sync::{Arc, Mutex, PoisonError};

use clap::Parser;
use config::Config;
use dictionary::{Dictionary, Word};
use realtime_db::{FirebaseStore, MemoryStore, RealtimeStore};
use search::{search, SearchOutcome};
use session::LookupSession;
use storage::Storage;
use toast::Toast;
use utilities::{closest_command, input, str_to_bool};

mod config;
mod search;
mod session;
mod storage;
#[cfg(test)]
mod testing;
mod toast;
mod utilities;

const COMMANDS: [&str; 10] = [
    "define", "find", "favorite", "history", "help", "exit", "leave", "quit", "e", "q",
];

/// Look up English words, keep a history of searches and save favorites.
#[derive(Parser, Debug)]
#[command(name = "wordlist", version)]
struct Args {
    /// Keep history and favorites in memory instead of the Firebase database
    #[arg(long)]
    memory_store: bool,
    /// Base url of the dictionary API, the word is appended as the last path segment
    #[arg(long)]
    dictionary_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,wordlist=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = Config::load(args.memory_store)?;

    let db: Arc<dyn RealtimeStore> = match &config.firebase {
        Some(firebase) => {
            tracing::debug!(config = ?firebase, "loaded firebase settings");
            tracing::info!(
                project = firebase.project_id.as_deref().unwrap_or("unknown"),
                database = %firebase.database_url,
                "using firebase database"
            );
            Arc::new(FirebaseStore::new(
                &firebase.database_url,
                firebase.auth_token.clone(),
            )?)
        }
        None => {
            tracing::info!("keeping history and favorites in memory");
            Arc::new(MemoryStore::new())
        }
    };
    let dict = match args.dictionary_url.or(config.dictionary_url) {
        Some(url) => Dictionary::with_base_url(url),
        None => Dictionary::new(),
    };
    let storage = Storage::new(Arc::clone(&db));

    let history = Arc::new(Mutex::new(Vec::new()));
    let subscription = {
        let history = Arc::clone(&history);
        storage
            .subscribe_history(move |entries| {
                *history.lock().unwrap_or_else(PoisonError::into_inner) = entries;
            })
            .await
    };
    let subscription = match subscription {
        Ok(subscription) => Some(subscription),
        Err(error) => {
            Toast::error("History unavailable", error.to_string()).show();
            None
        }
    };

    let result = run(&mut io::stdin().lock(), &dict, &storage, &history).await;

    if let Some(subscription) = subscription {
        subscription.release();
    }
    db.shutdown().await;
    result
}

/// Reads commands until `quit` or the end of the input.
async fn run<R: BufRead>(
    lines: &mut R,
    dict: &Dictionary,
    storage: &Storage,
    history: &Mutex<Vec<String>>,
) -> anyhow::Result<()> {
    let mut session = LookupSession::new();
    while let Some(line) = input(lines, ">> ")? {
        let line = line.trim();
        let mut command_parts = line.split_ascii_whitespace();
        if let Some(command) = command_parts.next() {
            match command {
                "exit" | "leave" | "quit" | "e" | "q" | "l" => {
                    break;
                }
                "define" | "find" => {
                    define_word(
                        lines,
                        dict,
                        storage,
                        &mut session,
                        &command_parts.collect::<Vec<&str>>().join(" "),
                    )
                    .await?;
                }
                "favorite" => match session.word() {
                    Some(word) => add_favorite(storage, word).await,
                    None => println!("Look up a word first."),
                },
                "history" => {
                    let history = history.lock().unwrap_or_else(PoisonError::into_inner);
                    print_history(&history);
                }
                "help" => print_help(),
                other => match closest_command(other, &COMMANDS) {
                    Some(suggestion) => println!("Unknown command {other}, did you mean {suggestion}?"),
                    None => println!("Unknown command {other}. Type help for a list of commands."),
                },
            }
        }
    }
    Ok(())
}

async fn define_word<R: BufRead>(
    lines: &mut R,
    dict: &Dictionary,
    storage: &Storage,
    session: &mut LookupSession,
    term: &str,
) -> anyhow::Result<()> {
    if !term.trim().is_empty() {
        println!("Searching for '{}'...", term.trim());
    }
    match search(dict, storage, session, term).await {
        SearchOutcome::Found { history } => {
            if let Some(word) = session.word() {
                print_definition(word);
                if let Err(error) = history {
                    Toast::error("Could not save the search", error.to_string()).show();
                }
                // a closed input declines
                let answer = input(lines, "Save to favorites? (y/N): ")?.unwrap_or_default();
                if str_to_bool(answer).unwrap_or(false) {
                    add_favorite(storage, word).await;
                }
            }
        }
        SearchOutcome::Failed => {
            if let Some(message) = session.error() {
                println!("{message}");
            }
        }
        SearchOutcome::Blank | SearchOutcome::Stale => {}
    }
    session.acknowledge();
    Ok(())
}

async fn add_favorite(storage: &Storage, word: &Word) {
    match storage.add_favorite(word).await {
        Ok(()) => Toast::success("Saved to favorites", word.word()).show(),
        Err(error) => Toast::error("Could not save favorite", error.to_string()).show(),
    }
}

fn print_definition(word: &Word) {
    println!("Showing definition for '{}':", word.word());
    println!("    {}", word.phonetic());
    for line in word.definition().lines().filter(|line| !line.is_empty()) {
        println!("        {line}");
    }
    if let Some(synonyms) = word.synonyms() {
        println!("      synonyms: {}", synonyms.join(", "));
    }
    if let Some(audio_url) = word.audio_url() {
        println!("      audio: {audio_url}");
    }
}

fn print_history(history: &[String]) {
    if history.is_empty() {
        println!("No searches yet.");
        return;
    }
    for (index, word) in history.iter().enumerate() {
        println!("[{}]: {word}", index + 1);
    }
}

fn print_help() {
    println!("define <word>   look up a word (alias: find)");
    println!("favorite        save the last word to favorites");
    println!("history         list previous searches");
    println!("quit            leave (aliases: exit, leave, q, e, l)");
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use realtime_db::MemoryStore;
    use serde_json::Value;

    use super::*;
    use crate::testing::{entry, serve_once};

    #[tokio::test]
    async fn stops_when_input_ends() {
        let store = MemoryStore::new();
        let storage = Storage::new(Arc::new(store));
        let dict = Dictionary::with_base_url("http://127.0.0.1:9");
        let history = Mutex::new(Vec::new());
        let mut lines = Cursor::new("help\nhistory\nhelpp\n");

        run(&mut lines, &dict, &storage, &history).await.unwrap();
    }

    #[tokio::test]
    async fn closed_input_declines_the_favorite() {
        let (base_url, server) = serve_once("200 OK", entry("hello")).await;
        let store = MemoryStore::new();
        let storage = Storage::new(Arc::new(store.clone()));
        let history = Mutex::new(Vec::new());
        let mut lines = Cursor::new("define hello\n");

        run(&mut lines, &Dictionary::with_base_url(base_url), &storage, &history)
            .await
            .unwrap();
        server.await.unwrap();

        assert_eq!(store.snapshot("favorites").unwrap(), Value::Null);
        let recorded = store.snapshot("history").unwrap();
        assert_eq!(recorded.as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn yes_saves_the_favorite() {
        let (base_url, server) = serve_once("200 OK", entry("hello")).await;
        let store = MemoryStore::new();
        let storage = Storage::new(Arc::new(store.clone()));
        let history = Mutex::new(Vec::new());
        let mut lines = Cursor::new("define hello\ny\nquit\n");

        run(&mut lines, &Dictionary::with_base_url(base_url), &storage, &history)
            .await
            .unwrap();
        server.await.unwrap();

        assert_eq!(store.snapshot("favorites/hello/word").unwrap(), "hello");
    }
}
