use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub market: MarketConfig,
  #[serde(default)]
  pub worldstate: WorldstateConfig,
  /// Platform segment of the world-state URL and the market Platform header
  #[serde(default = "default_platform")]
  pub platform: String,
  /// Custom title for header (defaults to the market domain if not set)
  pub title: Option<String>,
  #[serde(default)]
  pub tuning: Tuning,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
  #[serde(default = "default_market_url")]
  pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorldstateConfig {
  #[serde(default = "default_worldstate_url")]
  pub url: String,
}

/// Polling and reconciliation knobs.
///
/// The defaults match the upstream app's behavior; they are exposed here
/// rather than hardcoded so each one can be overridden and tested on its
/// own.
#[derive(Debug, Clone, Deserialize)]
pub struct Tuning {
  /// Cache validity for market catalog and order-book responses
  #[serde(default = "default_market_ttl")]
  pub market_ttl_secs: u64,
  /// Cache validity for the world-state document
  #[serde(default = "default_worldstate_ttl")]
  pub worldstate_ttl_secs: u64,
  /// A refreshed remaining-seconds value within this distance of the
  /// locally ticked one is ignored
  #[serde(default = "default_reconcile_tolerance")]
  pub reconcile_tolerance_secs: u64,
  /// Timers at or beyond this horizon don't count as "actively counting
  /// down" for the refresh policy
  #[serde(default = "default_active_timer_horizon")]
  pub active_timer_horizon_secs: u64,
  /// Re-poll the world state after this much time regardless of timers
  #[serde(default = "default_refresh_after")]
  pub refresh_after_secs: u64,
  /// Delay between a timer expiring and the corrective re-poll
  #[serde(default = "default_expiry_debounce")]
  pub expiry_debounce_secs: u64,
}

fn default_platform() -> String {
  "pc".to_string()
}

fn default_market_url() -> String {
  "https://api.warframe.market/v1".to_string()
}

fn default_worldstate_url() -> String {
  "https://api.warframestat.es".to_string()
}

fn default_market_ttl() -> u64 {
  300
}

fn default_worldstate_ttl() -> u64 {
  60
}

fn default_reconcile_tolerance() -> u64 {
  120
}

fn default_active_timer_horizon() -> u64 {
  7200
}

fn default_refresh_after() -> u64 {
  120
}

fn default_expiry_debounce() -> u64 {
  15
}

impl Default for Config {
  fn default() -> Self {
    Self {
      market: MarketConfig::default(),
      worldstate: WorldstateConfig::default(),
      platform: default_platform(),
      title: None,
      tuning: Tuning::default(),
    }
  }
}

impl Default for MarketConfig {
  fn default() -> Self {
    Self {
      url: default_market_url(),
    }
  }
}

impl Default for WorldstateConfig {
  fn default() -> Self {
    Self {
      url: default_worldstate_url(),
    }
  }
}

impl Default for Tuning {
  fn default() -> Self {
    Self {
      market_ttl_secs: default_market_ttl(),
      worldstate_ttl_secs: default_worldstate_ttl(),
      reconcile_tolerance_secs: default_reconcile_tolerance(),
      active_timer_horizon_secs: default_active_timer_horizon(),
      refresh_after_secs: default_refresh_after(),
      expiry_debounce_secs: default_expiry_debounce(),
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./wf9s.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/wf9s/config.yaml
  ///
  /// Both APIs are public and unauthenticated, so wf9s runs fine without
  /// any config file at all: no file means defaults.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Config::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("wf9s.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("wf9s").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.platform, "pc");
    assert_eq!(config.tuning.market_ttl_secs, 300);
    assert_eq!(config.tuning.worldstate_ttl_secs, 60);
    assert_eq!(config.tuning.reconcile_tolerance_secs, 120);
    assert_eq!(config.tuning.active_timer_horizon_secs, 7200);
    assert_eq!(config.tuning.refresh_after_secs, 120);
    assert_eq!(config.tuning.expiry_debounce_secs, 15);
  }

  #[test]
  fn test_partial_yaml_keeps_defaults() {
    let config: Config =
      serde_yaml::from_str("platform: ps4\ntuning:\n  worldstate_ttl_secs: 30\n").unwrap();
    assert_eq!(config.platform, "ps4");
    assert_eq!(config.tuning.worldstate_ttl_secs, 30);
    assert_eq!(config.tuning.market_ttl_secs, 300);
    assert_eq!(config.market.url, "https://api.warframe.market/v1");
  }

  #[test]
  fn test_empty_mapping_parses() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.worldstate.url, "https://api.warframestat.es");
  }
}
