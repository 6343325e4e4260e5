//! Line-driven interactive browsing.
//!
//! Each input line is one user intent. The session applies it and the current
//! view is drawn again, so this loop is a small rendering layer over the
//! navigation state machine.

use std::{
    io::{self, BufRead, Write},
    path::Path,
};

use clap::Parser;
use hazards::{CategoryFilter, FileStore, HazardId, Session, View};
use tracing::instrument;

use super::{open_session, print_table, show, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Browse the hazard database interactively")]
pub struct Browse {}

/// One user intent entered at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Help,
    Quit,
    Category(CategoryFilter),
    Search(String),
    Open(HazardId),
    Toggle(Option<HazardId>),
    Bookmarks,
    Recent,
    ClearRecent,
    Back,
}

const HELP: &str = "\
Commands:
  cat <id|all>     filter the list by category
  / <text>         search
  open <id>        show a hazard
  star [id]        toggle a bookmark (defaults to the open hazard)
  bookmarks        show bookmarks
  recent           show recent searches
  clear-recent     forget recent searches
  back             close the search, bookmarks or detail view
  help             show this message
  quit             exit";

fn parse_action(line: &str) -> Result<Action, String> {
    let line = line.trim();
    if let Some(query) = line.strip_prefix('/') {
        return Ok(Action::Search(query.trim().to_string()));
    }

    let (command, argument) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(c, a)| (c, a.trim()));

    let id = |argument: &str| {
        argument
            .parse::<HazardId>()
            .map_err(|_| format!("'{command}' needs a hazard id"))
    };

    match command {
        "help" | "?" => Ok(Action::Help),
        "quit" | "exit" | "q" => Ok(Action::Quit),
        "cat" | "category" => argument
            .parse()
            .map(Action::Category)
            .map_err(|e| format!("{e}")),
        "search" => Ok(Action::Search(argument.to_string())),
        "open" | "show" => id(argument).map(Action::Open),
        "star" | "bookmark" if argument.is_empty() => Ok(Action::Toggle(None)),
        "star" | "bookmark" => id(argument).map(|id| Action::Toggle(Some(id))),
        "bookmarks" => Ok(Action::Bookmarks),
        "recent" => Ok(Action::Recent),
        "clear-recent" => Ok(Action::ClearRecent),
        "back" | "close" => Ok(Action::Back),
        other => Err(format!("Unknown command '{other}'. Type 'help' for a list.")),
    }
}

impl Browse {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut session = open_session(root)?;
        println!("{}", HELP.dim());
        render(&session);

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            print!("{} ", prompt(&session));
            io::stdout().flush()?;

            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match parse_action(&line) {
                Ok(Action::Quit) => break,
                Ok(action) => {
                    if let Err(e) = apply(&mut session, action) {
                        eprintln!("{}", e.warning());
                    }
                }
                Err(e) => eprintln!("{}", e.warning()),
            }
        }
        Ok(())
    }
}

fn prompt(session: &Session<FileStore>) -> String {
    match session.view() {
        View::Browsing => format!("[{}]>", session.active_category()),
        View::Searching => "[search]>".to_string(),
        View::ViewingBookmarks => "[bookmarks]>".to_string(),
        View::ViewingDetail(id) => format!("[{id}]>"),
    }
}

fn apply(session: &mut Session<FileStore>, action: Action) -> Result<(), String> {
    match action {
        Action::Help => {
            println!("{HELP}");
            return Ok(());
        }
        Action::Quit => return Ok(()),
        Action::Category(filter) => {
            if !session.categories().iter().any(|c| c.id == filter) {
                return Err(format!("Unknown category '{filter}'"));
            }
            session.set_active_category(filter);
        }
        Action::Search(query) => {
            session.open_search();
            session.set_search_query(query);
        }
        Action::Open(id) => {
            let result = if *session.view() == View::Searching {
                session.select_search_result(&id)
            } else {
                session.select_hazard(&id)
            };
            result.map_err(|e| e.to_string())?;
        }
        Action::Toggle(id) => {
            let id = id
                .or_else(|| session.selected_hazard().map(|r| r.id.clone()))
                .ok_or_else(|| "No hazard open. Use 'star <id>'.".to_string())?;
            let state = if session.toggle_bookmark(&id) {
                "bookmarked"
            } else {
                "removed"
            };
            println!("{id} {state}");
            return Ok(());
        }
        Action::Bookmarks => session.open_bookmarks(),
        Action::Recent => {
            for term in session.recent_searches() {
                println!("  {term}");
            }
            return Ok(());
        }
        Action::ClearRecent => {
            session.clear_recent_searches();
            return Ok(());
        }
        Action::Back => match session.view().clone() {
            View::Searching => session.close_search(),
            View::ViewingBookmarks => session.close_bookmarks(),
            View::ViewingDetail(_) => session.close_detail(),
            View::Browsing => {}
        },
    }
    render(session);
    Ok(())
}

fn render(session: &Session<FileStore>) {
    match session.view() {
        View::Browsing => {
            let name = session.active_category().display_name();
            println!("\n{}", name.info());
            print_table(session.visible_records(), |id| session.is_bookmarked(id));
        }
        View::Searching => {
            let results = session.search_results();
            if session.selection().search_query.trim().is_empty() {
                let recent = session.recent_searches();
                if !recent.is_empty() {
                    println!("Recent: {}", recent.join(", ").dim());
                }
            } else if results.is_empty() {
                println!("No hazards match.");
            } else {
                print_table(results, |id| session.is_bookmarked(id));
            }
        }
        View::ViewingBookmarks => {
            let mut bookmarked = session.bookmarked_records().peekable();
            if bookmarked.peek().is_none() {
                println!("No bookmarks yet.");
            } else {
                print_table(bookmarked, |_| true);
            }
        }
        View::ViewingDetail(_) => {
            if let Some(record) = session.selected_hazard() {
                show::print_detail(record, session.is_bookmarked(&record.id));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn id(s: &str) -> HazardId {
        HazardId::new(s).unwrap()
    }

    #[test_case("help", Action::Help)]
    #[test_case("q", Action::Quit)]
    #[test_case("cat all", Action::Category(CategoryFilter::All))]
    #[test_case("/ arc flash ", Action::Search("arc flash".to_string()))]
    #[test_case("search ladder", Action::Search("ladder".to_string()))]
    #[test_case("open h1", Action::Open(id("h1")))]
    #[test_case("star", Action::Toggle(None))]
    #[test_case("star h2", Action::Toggle(Some(id("h2"))))]
    #[test_case("  back  ", Action::Back)]
    fn parses_actions(line: &str, expected: Action) {
        assert_eq!(parse_action(line), Ok(expected));
    }

    #[test_case("open"; "missing id")]
    #[test_case("cat"; "missing category")]
    #[test_case("dance"; "unknown command")]
    fn rejects_bad_input(line: &str) {
        assert!(parse_action(line).is_err());
    }
}
