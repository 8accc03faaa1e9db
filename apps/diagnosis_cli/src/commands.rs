//! Line commands typed into the terminal view.

use shared::domain::FilterSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    /// Re-enter the screen, which starts a fresh fetch.
    Refresh,
    Filter(FilterSelection),
    ToggleLocale,
    Show,
    Help,
    Quit,
}

impl ViewCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = words.next()?.to_ascii_lowercase();
        let argument = words.next();

        let parsed = match command.as_str() {
            "refresh" | "r" | "appear" => Self::Refresh,
            "filter" | "f" => Self::Filter(parse_filter(argument?)),
            "lang" | "l" | "toggle" => Self::ToggleLocale,
            "show" | "s" => Self::Show,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => return None,
        };
        Some(parsed)
    }
}

/// Accepts a segment index or a category name; anything else means All.
fn parse_filter(argument: &str) -> FilterSelection {
    if let Ok(index) = argument.parse::<i64>() {
        return FilterSelection::from_index(index);
    }
    match argument.to_ascii_lowercase().as_str() {
        "basic" => FilterSelection::Basic,
        "premium" => FilterSelection::Premium,
        _ => FilterSelection::All,
    }
}

pub const HELP: &str = "\
commands:
  refresh            re-enter the screen and fetch again
  filter <0|1|2>     0 = all, 1 = basic, 2 = premium (names work too)
  lang               toggle display language
  show               print the current view
  quit               exit";
