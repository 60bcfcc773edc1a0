use dockdash_common::ResourceKind;
use std::str::FromStr;

/// One line typed at the console prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tab(ResourceKind),
    /// Empty text clears the filter.
    Search(String),
    Sort(String),
    /// Row number (1-based, as shown) or key prefix.
    Select(String),
    SelectAll,
    Delete,
    Refresh,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_lowercase().as_str() {
            "" | "show" | "ls" => Ok(Command::Show),
            "tab" => rest.parse().map(Command::Tab).map_err(|e| format!("{e}")),
            "search" | "/" => Ok(Command::Search(rest.to_string())),
            "sort" if !rest.is_empty() => Ok(Command::Sort(rest.to_string())),
            "sort" => Err("usage: sort <column>".to_string()),
            "select" | "s" if !rest.is_empty() => Ok(Command::Select(rest.to_string())),
            "select" | "s" => Err("usage: select <row|id>".to_string()),
            "all" => Ok(Command::SelectAll),
            "delete" | "rm" => Ok(Command::Delete),
            "refresh" | "r" => Ok(Command::Refresh),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            // A bare kind name switches tabs.
            other => other
                .parse()
                .map(Command::Tab)
                .map_err(|_| format!("unknown command: {other} (try `help`)")),
        }
    }
}

pub const HELP: &str = "\
commands:
  tab <containers|images|volumes|networks>   switch tab (resets search, sort, selection)
  search <text>                              filter rows; `search` alone clears
  sort <column>                              sort by column; repeat to reverse
  select <row|id>                            toggle one row
  all                                        toggle all visible rows
  delete                                     delete the selection (asks first)
  refresh                                    reload everything
  show                                       redraw the table
  quit";

/// Resolve a `select` argument against the visible keys: a row number as
/// printed, else the unique key with that prefix.
pub fn resolve_row(visible: &[String], token: &str) -> Option<String> {
    if let Ok(n) = token.parse::<usize>() {
        if n >= 1 && n <= visible.len() {
            return Some(visible[n - 1].clone());
        }
    }
    let mut matches = visible.iter().filter(|key| {
        key.starts_with(token) || key.strip_prefix("sha256:").is_some_and(|k| k.starts_with(token))
    });
    match (matches.next(), matches.next()) {
        (Some(key), None) => Some(key.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("tab images".parse(), Ok(Command::Tab(ResourceKind::Images)));
        assert_eq!("volumes".parse(), Ok(Command::Tab(ResourceKind::Volumes)));
        assert_eq!("search  redis ".parse(), Ok(Command::Search("redis".to_string())));
        assert_eq!("search".parse(), Ok(Command::Search(String::new())));
        assert_eq!("sort size".parse(), Ok(Command::Sort("size".to_string())));
        assert_eq!("s 2".parse(), Ok(Command::Select("2".to_string())));
        assert_eq!("ALL".parse(), Ok(Command::SelectAll));
        assert_eq!("".parse(), Ok(Command::Show));
        assert_eq!("q".parse(), Ok(Command::Quit));
        assert!("sort".parse::<Command>().is_err());
        assert!("tab pods".parse::<Command>().is_err());
        assert!("frobnicate".parse::<Command>().is_err());
    }

    #[test]
    fn test_resolve_row() {
        let visible = vec![
            "sha256:abc123".to_string(),
            "sha256:abd456".to_string(),
            "c0ffee".to_string(),
        ];

        assert_eq!(resolve_row(&visible, "3"), Some("c0ffee".to_string()));
        assert_eq!(resolve_row(&visible, "abc"), Some("sha256:abc123".to_string()));
        assert_eq!(resolve_row(&visible, "c0f"), Some("c0ffee".to_string()));
        // Ambiguous and unknown prefixes resolve to nothing.
        assert_eq!(resolve_row(&visible, "ab"), None);
        assert_eq!(resolve_row(&visible, "zzz"), None);
        assert_eq!(resolve_row(&visible, "0"), None);
    }
}
