//! Reward and location label normalization.
//!
//! Pure, table-driven functions mapping upstream tokens to display strings.
//! Location codes resolve through an exact Sol-node table first, then a
//! numeric-suffix range table deriving the planet; reward tokens resolve
//! through a synonym table with a title-case fallback.

/// Exact node-code entries. Takes precedence over the range fallback.
const SOL_NODES: &[(&str, &str)] = &[
  ("SolNode10", "Apollodorus (Mercury)"),
  ("SolNode27", "Tolstoj (Mercury)"),
  ("SolNode102", "Kiliken (Venus)"),
  ("SolNode107", "Fossa (Venus)"),
  ("SolNode128", "V Prime (Venus)"),
  ("SolNode224", "Cervantes (Earth)"),
  ("SolNode226", "Cambria (Earth)"),
  ("SolNode302", "Olympus (Mars)"),
  ("SolNode319", "Spear (Mars)"),
  ("SolNode403", "Themisto (Jupiter)"),
  ("SolNode419", "Io (Jupiter)"),
  ("SolNode509", "Helene (Saturn)"),
  ("SolNode518", "Cassini (Saturn)"),
  ("SolNode605", "Ophelia (Uranus)"),
  ("SolNode612", "Ur (Uranus)"),
  ("SolNode704", "Salacia (Neptune)"),
  ("SolNode718", "Galatea (Neptune)"),
  ("SolNode801", "Hieracon (Pluto)"),
  ("SolNode842", "Sechura (Pluto)"),
];

/// Planet derivation by node-number allocation block. Nodes outside every
/// block get the "Unknown Planet" label.
const PLANET_RANGES: &[(u32, u32, &str)] = &[
  (1, 99, "Mercury"),
  (100, 199, "Venus"),
  (200, 299, "Earth"),
  (300, 399, "Mars"),
  (400, 499, "Jupiter"),
  (500, 599, "Saturn"),
  (600, 699, "Uranus"),
  (700, 799, "Neptune"),
  (800, 899, "Pluto"),
];

/// Synonym table for abbreviated or incomplete reward tokens.
const REWARD_SYNONYMS: &[(&str, &str)] = &[
  ("nitain", "Nitain Extract"),
  ("nitain extract", "Nitain Extract"),
  ("catalyst", "Orokin Catalyst Blueprint"),
  ("catalyst bp", "Orokin Catalyst Blueprint"),
  ("orokin catalyst", "Orokin Catalyst Blueprint"),
  ("reactor", "Orokin Reactor Blueprint"),
  ("reactor bp", "Orokin Reactor Blueprint"),
  ("orokin reactor", "Orokin Reactor Blueprint"),
  ("exilus", "Exilus Adapter Blueprint"),
  ("forma", "Forma Blueprint"),
  ("forma bp", "Forma Blueprint"),
  ("riven", "Riven Sliver"),
  ("kuva", "Kuva"),
  ("aura", "Aura Mod"),
  ("cred", "Nightwave Cred"),
];

/// Normalize a location token to a display name.
///
/// Resolution order:
/// 1. exact `SOL_NODES` entry
/// 2. `SolNode<n>` with `n` inside a `PLANET_RANGES` block ->
///    `"SolNode<n> (<Planet>)"`
/// 3. `SolNode<n>` outside every block -> `"SolNode<n> (Unknown Planet)"`
/// 4. anything else is assumed to already be a display name and is passed
///    through capitalized
pub fn node_label(raw: &str) -> String {
  let raw = raw.trim();
  if raw.is_empty() {
    return "Unknown".to_string();
  }

  if let Some((_, label)) = SOL_NODES.iter().find(|(code, _)| *code == raw) {
    return (*label).to_string();
  }

  if let Some(number) = raw.strip_prefix("SolNode").and_then(|n| n.parse::<u32>().ok()) {
    let planet = PLANET_RANGES
      .iter()
      .find(|(lo, hi, _)| (*lo..=*hi).contains(&number))
      .map(|(_, _, planet)| *planet)
      .unwrap_or("Unknown Planet");
    return format!("{} ({})", raw, planet);
  }

  title_case(raw)
}

/// Normalize a reward token to a canonical item name.
///
/// Exact synonym-table hit first (case-insensitive, trimmed); unknown
/// tokens fall back to title-case capitalization.
pub fn reward_label(raw: &str) -> String {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return "Unknown".to_string();
  }

  let key = trimmed.to_lowercase();
  if let Some((_, canonical)) = REWARD_SYNONYMS.iter().find(|(token, _)| *token == key) {
    return (*canonical).to_string();
  }

  title_case(trimmed)
}

/// Capitalize the first letter of every whitespace-separated word.
fn title_case(s: &str) -> String {
  s.split_whitespace()
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_exact_node_entry_wins() {
    assert_eq!(node_label("SolNode10"), "Apollodorus (Mercury)");
    assert_eq!(node_label("SolNode842"), "Sechura (Pluto)");
  }

  #[test]
  fn test_node_planet_derived_from_suffix_range() {
    assert_eq!(node_label("SolNode57"), "SolNode57 (Mercury)");
    assert_eq!(node_label("SolNode250"), "SolNode250 (Earth)");
    assert_eq!(node_label("SolNode899"), "SolNode899 (Pluto)");
  }

  #[test]
  fn test_node_suffix_outside_known_ranges() {
    assert_eq!(node_label("SolNode999"), "SolNode999 (Unknown Planet)");
    assert_eq!(node_label("SolNode0"), "SolNode0 (Unknown Planet)");
  }

  #[test]
  fn test_non_node_tokens_pass_through_capitalized() {
    assert_eq!(node_label("cetus wisp farm"), "Cetus Wisp Farm");
    assert_eq!(node_label("Helene (Saturn)"), "Helene (Saturn)");
  }

  #[test]
  fn test_empty_node_is_unknown() {
    assert_eq!(node_label(""), "Unknown");
    assert_eq!(node_label("   "), "Unknown");
  }

  #[test]
  fn test_reward_synonyms() {
    assert_eq!(reward_label("nitain"), "Nitain Extract");
    assert_eq!(reward_label("Catalyst BP"), "Orokin Catalyst Blueprint");
    assert_eq!(reward_label("reactor"), "Orokin Reactor Blueprint");
    assert_eq!(reward_label("  forma  "), "Forma Blueprint");
  }

  #[test]
  fn test_reward_fallback_capitalizes() {
    assert_eq!(reward_label("vapor specter blueprint"), "Vapor Specter Blueprint");
    assert_eq!(reward_label("kavat genetic code"), "Kavat Genetic Code");
  }

  #[test]
  fn test_empty_reward_is_unknown() {
    assert_eq!(reward_label(""), "Unknown");
  }
}
