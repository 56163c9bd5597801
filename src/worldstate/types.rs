/// A recurring day/night-like world state with a fixed-format expiry
#[derive(Debug, Clone)]
pub struct Cycle {
  /// Fixed key, e.g. "earth", "cetus"
  pub name: String,
  /// Current phase, e.g. "day", "night", "warm"
  pub state: String,
  pub remaining_secs: u64,
}

/// A time-limited alert mission
#[derive(Debug, Clone)]
pub struct Alert {
  pub id: String,
  pub node: String,
  pub mission_type: String,
  pub reward: String,
  pub remaining_secs: u64,
}

/// A time-limited void fissure mission
#[derive(Debug, Clone)]
pub struct Fissure {
  pub id: String,
  pub node: String,
  pub tier: String,
  pub mission_type: String,
  /// Steel Path variant
  pub hard: bool,
  /// Railjack Void Storm variant
  pub storm: bool,
  pub remaining_secs: u64,
}

/// A two-faction competing event tracked by completion percentage
#[derive(Debug, Clone)]
pub struct Invasion {
  pub id: String,
  pub node: String,
  pub attacker: String,
  pub defender: String,
  /// 0-100, attacker side
  pub completion: f64,
  /// Upstream ETA when it provides one; invasions have no fixed expiry
  pub eta_secs: Option<u64>,
}

/// The daily 3-mission challenge set
#[derive(Debug, Clone)]
pub struct Sortie {
  pub boss: String,
  pub faction: String,
  pub missions: Vec<SortieMission>,
  pub remaining_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SortieMission {
  pub node: String,
  pub mission_type: String,
  pub modifier: String,
}

/// One parsed world-state document
#[derive(Debug, Clone, Default)]
pub struct WorldSnapshot {
  pub cycles: Vec<Cycle>,
  pub alerts: Vec<Alert>,
  pub fissures: Vec<Fissure>,
  pub invasions: Vec<Invasion>,
  pub sortie: Option<Sortie>,
}
