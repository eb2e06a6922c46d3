/// Command palette: available commands, autocomplete, and parsing

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "home",
    aliases: &["h", "index"],
    description: "Series index",
  },
  Command {
    name: "open",
    aliases: &["o", "go"],
    description: "Open a location, e.g. open /series/1/0",
  },
  Command {
    name: "back",
    aliases: &["b", "prev"],
    description: "Previous history entry",
  },
  Command {
    name: "forward",
    aliases: &["f", "fwd"],
    description: "Next history entry",
  },
  Command {
    name: "toc",
    aliases: &["t", "chapters"],
    description: "Table of contents",
  },
  Command {
    name: "refresh",
    aliases: &["r", "reload"],
    description: "Reload the current page",
  },
  Command {
    name: "clear-cache",
    aliases: &["cc", "purge"],
    description: "Drop every cached resource",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit ranobe",
  },
];

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
  Home,
  Open(String),
  Back,
  Forward,
  Toc,
  Refresh,
  ClearCache,
  Quit,
}

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  // Locations and arguments are not completed.
  if input_lower.starts_with('/') || input_lower.contains(char::is_whitespace) {
    return Vec::new();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    // Exact match on name
    if cmd.name == input_lower {
      matches.push((cmd, 0)); // Highest priority
      continue;
    }

    // Exact match on alias
    if cmd.aliases.contains(&input_lower.as_str()) {
      matches.push((cmd, 1));
      continue;
    }

    // Prefix match on name
    if cmd.name.starts_with(&input_lower) {
      matches.push((cmd, 2));
      continue;
    }

    // Prefix match on alias
    if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      matches.push((cmd, 3));
      continue;
    }

    // Fuzzy match (contains)
    if cmd.name.contains(&input_lower) {
      matches.push((cmd, 4));
      continue;
    }

    // Fuzzy match on alias
    if cmd.aliases.iter().any(|a| a.contains(&input_lower)) {
      matches.push((cmd, 5));
    }
  }

  // Sort by priority
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

fn lookup(word: &str) -> Option<&'static Command> {
  let word = word.to_lowercase();
  COMMANDS
    .iter()
    .find(|cmd| cmd.name == word || cmd.aliases.contains(&word.as_str()))
}

/// Parse a command line. Input starting with `/` opens that location.
pub fn parse(input: &str) -> Result<Invocation, String> {
  let input = input.trim();
  if input.starts_with('/') {
    return Ok(Invocation::Open(input.to_string()));
  }

  let (word, rest) = match input.split_once(char::is_whitespace) {
    Some((word, rest)) => (word, rest.trim()),
    None => (input, ""),
  };
  if word.is_empty() {
    return Err("no command given".to_string());
  }

  let cmd = lookup(word).ok_or_else(|| format!("unknown command: {}", word))?;

  if cmd.name == "open" {
    if rest.is_empty() {
      return Err("open needs a location".to_string());
    }
    return Ok(Invocation::Open(rest.to_string()));
  }
  if !rest.is_empty() {
    return Err(format!("{} takes no arguments", cmd.name));
  }

  Ok(match cmd.name {
    "home" => Invocation::Home,
    "back" => Invocation::Back,
    "forward" => Invocation::Forward,
    "toc" => Invocation::Toc,
    "refresh" => Invocation::Refresh,
    "clear-cache" => Invocation::ClearCache,
    _ => Invocation::Quit,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    let suggestions = get_suggestions("");
    assert_eq!(suggestions.len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match() {
    let suggestions = get_suggestions("refresh");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "refresh");
  }

  #[test]
  fn test_alias_match() {
    let suggestions = get_suggestions("cc");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "clear-cache");
  }

  #[test]
  fn test_prefix_match() {
    let suggestions = get_suggestions("fo");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "forward");
  }

  #[test]
  fn test_fuzzy_match() {
    let suggestions = get_suggestions("cache");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "clear-cache");
  }

  #[test]
  fn test_locations_are_not_completed() {
    assert!(get_suggestions("/demo").is_empty());
    assert!(get_suggestions("open /demo").is_empty());
  }

  #[test]
  fn test_parse_commands() {
    assert_eq!(parse("home"), Ok(Invocation::Home));
    assert_eq!(parse(" q "), Ok(Invocation::Quit));
    assert_eq!(parse("clear-cache"), Ok(Invocation::ClearCache));
    assert_eq!(parse("TOC"), Ok(Invocation::Toc));
  }

  #[test]
  fn test_parse_open() {
    assert_eq!(parse("open /demo/1"), Ok(Invocation::Open("/demo/1".to_string())));
    assert_eq!(parse("/demo/1/2"), Ok(Invocation::Open("/demo/1/2".to_string())));
    assert_eq!(parse("o  demo"), Ok(Invocation::Open("demo".to_string())));
    assert!(parse("open").is_err());
  }

  #[test]
  fn test_parse_rejects_unknown_and_extra_arguments() {
    assert_eq!(parse("launch"), Err("unknown command: launch".to_string()));
    assert!(parse("back twice").is_err());
    assert!(parse("").is_err());
  }
}
