/// Command palette entries and autocomplete logic

/// Actions reachable from the `:` palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Add,
  Edit,
  Delete,
  Reload,
  Quit,
}

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
  pub action: Action,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "add",
    aliases: &["a", "new", "create"],
    description: "Add a user",
    action: Action::Add,
  },
  Command {
    name: "edit",
    aliases: &["e", "update"],
    description: "Edit the selected user",
    action: Action::Edit,
  },
  Command {
    name: "delete",
    aliases: &["d", "rm", "remove"],
    description: "Delete the selected user",
    action: Action::Delete,
  },
  Command {
    name: "reload",
    aliases: &["r", "refresh"],
    description: "Reload users from the server",
    action: Action::Reload,
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit u9s",
    action: Action::Quit,
  },
];

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.trim().to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = COMMANDS
    .iter()
    .filter_map(|cmd| match_priority(cmd, &input_lower).map(|p| (cmd, p)))
    .collect();

  // Stable sort keeps declaration order within a priority
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

/// Lower is better; None means no match
fn match_priority(cmd: &Command, input: &str) -> Option<u32> {
  if cmd.name == input {
    Some(0)
  } else if cmd.aliases.contains(&input) {
    Some(1)
  } else if cmd.name.starts_with(input) {
    Some(2)
  } else if cmd.aliases.iter().any(|a| a.starts_with(input)) {
    Some(3)
  } else if cmd.name.contains(input) {
    Some(4)
  } else if cmd.aliases.iter().any(|a| a.contains(input)) {
    Some(5)
  } else {
    None
  }
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
    let suggestions = get_suggestions("delete");
    assert_eq!(suggestions[0].action, Action::Delete);
  }

  #[test]
  fn test_alias_match_beats_prefix() {
    // "e" is an alias of edit and a prefix of exit
    let suggestions = get_suggestions("e");
    assert_eq!(suggestions[0].action, Action::Edit);
  }

  #[test]
  fn test_prefix_match() {
    let suggestions = get_suggestions("rel");
    assert_eq!(suggestions[0].action, Action::Reload);
  }

  #[test]
  fn test_fuzzy_match() {
    let suggestions = get_suggestions("loa");
    assert_eq!(suggestions[0].action, Action::Reload);
  }

  #[test]
  fn test_no_match() {
    assert!(get_suggestions("zzz").is_empty());
  }
}
