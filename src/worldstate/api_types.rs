//! Permissive parsing of the upstream world-state document.
//!
//! The document is treated as opaque JSON. Each entity type is normalized by
//! exactly one function here, which lists every accepted field alias once;
//! the upstream has shipped the same field under several casings over time.
//! Missing or malformed fields resolve to fallback values ("Unknown", 0
//! seconds); a bad entity never fails the whole refresh.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::labels;
use super::types::{
  Alert, Cycle, Fissure, Invasion, Sortie, SortieMission, WorldSnapshot,
};

/// Fixed cycle names and the document keys they are read from.
const CYCLE_KEYS: &[(&str, &[&str])] = &[
  ("earth", &["earthCycle", "EarthCycle", "earth_cycle"]),
  ("cetus", &["cetusCycle", "CetusCycle", "cetus_cycle"]),
  ("vallis", &["vallisCycle", "VallisCycle", "vallis_cycle"]),
  ("cambion", &["cambionCycle", "CambionCycle", "cambion_cycle"]),
];

/// Parse a whole world-state document into a snapshot.
pub fn parse_snapshot(doc: &Value, now: DateTime<Utc>) -> WorldSnapshot {
  let cycles = CYCLE_KEYS
    .iter()
    .filter_map(|(name, keys)| pick(doc, keys).map(|v| parse_cycle(name, v, now)))
    .collect();

  let alerts = list(doc, &["alerts", "Alerts"])
    .iter()
    .enumerate()
    .map(|(i, v)| parse_alert(v, i, now))
    .collect();

  let fissures = list(doc, &["fissures", "Fissures", "activeMissions", "ActiveMissions"])
    .iter()
    .enumerate()
    .map(|(i, v)| parse_fissure(v, i, now))
    .collect();

  let invasions = list(doc, &["invasions", "Invasions"])
    .iter()
    .enumerate()
    .map(|(i, v)| parse_invasion(v, i, now))
    .collect();

  let sortie = pick(doc, &["sortie", "Sortie", "sorties"])
    .filter(|v| v.is_object())
    .map(|v| parse_sortie(v, now));

  WorldSnapshot {
    cycles,
    alerts,
    fissures,
    invasions,
    sortie,
  }
}

/// Aliases: state `state`/`State`, else derived from `isDay`, `isWarm` or
/// `active`; expiry via [`remaining_secs`].
fn parse_cycle(name: &str, value: &Value, now: DateTime<Utc>) -> Cycle {
  let state = str_field(value, &["state", "State"])
    .or_else(|| {
      pick(value, &["isDay"])
        .and_then(Value::as_bool)
        .map(|day| if day { "day" } else { "night" }.to_string())
    })
    .or_else(|| {
      pick(value, &["isWarm"])
        .and_then(Value::as_bool)
        .map(|warm| if warm { "warm" } else { "cold" }.to_string())
    })
    .or_else(|| str_field(value, &["active", "Active"]))
    .unwrap_or_else(|| "unknown".to_string());

  Cycle {
    name: name.to_string(),
    state,
    remaining_secs: remaining_secs(value, now),
  }
}

/// Aliases: mission container `mission`/`Mission`/`MissionInfo`; node
/// `node`/`Node`/`location`/`Location`; mission type `type`/`Type`/
/// `missionType`/`mission_type`; reward `reward`/`Reward` as a string, an
/// object with `itemString`/`asString`/`item`, or an object with an `items`
/// array.
fn parse_alert(value: &Value, index: usize, now: DateTime<Utc>) -> Alert {
  let mission = pick(value, &["mission", "Mission", "MissionInfo"]).unwrap_or(value);

  Alert {
    id: entity_id(value, "alert", index),
    node: labels::node_label(&str_field_or(mission, &["node", "Node", "location", "Location"], "")),
    mission_type: str_field_or(
      mission,
      &["type", "Type", "missionType", "mission_type"],
      "Unknown",
    ),
    reward: labels::reward_label(&raw_reward(mission)),
    remaining_secs: remaining_secs(value, now),
  }
}

/// Aliases: node as for alerts; tier `tier`/`Tier`/`TIER`/`Modifier`;
/// mission type as for alerts; Steel Path `isHard`/`hard`; Void Storm
/// `isStorm`/`storm`.
fn parse_fissure(value: &Value, index: usize, now: DateTime<Utc>) -> Fissure {
  Fissure {
    id: entity_id(value, "fissure", index),
    node: labels::node_label(&str_field_or(value, &["node", "Node", "location", "Location"], "")),
    tier: str_field_or(value, &["tier", "Tier", "TIER", "Modifier"], "Unknown"),
    mission_type: str_field_or(
      value,
      &["missionType", "mission_type", "type", "Type"],
      "Unknown",
    ),
    hard: bool_field(value, &["isHard", "hard"]),
    storm: bool_field(value, &["isStorm", "storm"]),
    remaining_secs: remaining_secs(value, now),
  }
}

/// Aliases: factions either nested (`attacker`/`defender` objects carrying
/// `faction`/`Faction`) or flat (`attackingFaction`/`defendingFaction`);
/// completion `completion`/`Completion`, clamped to 0..=100. Invasions only
/// get an ETA when the document carries an expiry-like field.
fn parse_invasion(value: &Value, index: usize, now: DateTime<Utc>) -> Invasion {
  let faction = |nested: &[&str], flat: &[&str]| -> String {
    pick(value, nested)
      .and_then(|side| str_field(side, &["faction", "Faction"]))
      .or_else(|| str_field(value, flat))
      .unwrap_or_else(|| "Unknown".to_string())
  };

  let completion = pick(value, &["completion", "Completion"])
    .and_then(Value::as_f64)
    .unwrap_or(0.0)
    .clamp(0.0, 100.0);

  let eta_secs = pick(value, &["expiry", "Expiry", "expiryTime", "expires"])
    .and_then(expiry_instant)
    .map(|expiry| clamp_remaining(expiry, now));

  Invasion {
    id: entity_id(value, "invasion", index),
    node: labels::node_label(&str_field_or(value, &["node", "Node", "location", "Location"], "")),
    attacker: faction(&["attacker", "Attacker"], &["attackingFaction", "attacking_faction"]),
    defender: faction(&["defender", "Defender"], &["defendingFaction", "defending_faction"]),
    completion,
    eta_secs,
  }
}

/// Aliases: boss `boss`/`Boss`; faction `faction`/`Faction`; mission list
/// `variants`/`Variants`/`missions`; per mission, node as elsewhere,
/// mission type as elsewhere, modifier `modifier`/`modifierType`.
fn parse_sortie(value: &Value, now: DateTime<Utc>) -> Sortie {
  let missions = list(value, &["variants", "Variants", "missions"])
    .iter()
    .map(|m| SortieMission {
      node: labels::node_label(&str_field_or(m, &["node", "Node", "location", "Location"], "")),
      mission_type: str_field_or(m, &["missionType", "mission_type", "type", "Type"], "Unknown"),
      modifier: str_field_or(m, &["modifier", "modifierType"], "Unknown"),
    })
    .collect();

  Sortie {
    boss: str_field_or(value, &["boss", "Boss"], "Unknown"),
    faction: str_field_or(value, &["faction", "Faction"], "Unknown"),
    missions,
    remaining_secs: remaining_secs(value, now),
  }
}

// ============================================================================
// Helpers
// ============================================================================

/// First alias present on the object, if any.
fn pick<'a>(value: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
  aliases.iter().find_map(|key| value.get(key))
}

/// Borrow the first present alias as a list; absent or non-array -> empty.
fn list<'a>(value: &'a Value, aliases: &[&str]) -> &'a [Value] {
  pick(value, aliases)
    .and_then(Value::as_array)
    .map(Vec::as_slice)
    .unwrap_or(&[])
}

fn str_field(value: &Value, aliases: &[&str]) -> Option<String> {
  pick(value, aliases)
    .and_then(Value::as_str)
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(String::from)
}

fn str_field_or(value: &Value, aliases: &[&str], fallback: &str) -> String {
  str_field(value, aliases).unwrap_or_else(|| fallback.to_string())
}

fn bool_field(value: &Value, aliases: &[&str]) -> bool {
  pick(value, aliases).and_then(Value::as_bool).unwrap_or(false)
}

/// Entity id: `id`, `_id` (string or mongo `{"$oid": ...}`), `uniqueName`,
/// falling back to the list position.
fn entity_id(value: &Value, kind: &str, index: usize) -> String {
  str_field(value, &["id", "uniqueName"])
    .or_else(|| {
      pick(value, &["_id"]).and_then(|v| {
        v.as_str()
          .map(String::from)
          .or_else(|| v.get("$oid").and_then(Value::as_str).map(String::from))
      })
    })
    .unwrap_or_else(|| format!("{}-{}", kind, index))
}

/// Reward token: `reward`/`Reward` as a plain string, an object carrying
/// `itemString`/`asString`/`item`, or an object with a non-empty `items`
/// array whose first element is used.
fn raw_reward(mission: &Value) -> String {
  let Some(reward) = pick(mission, &["reward", "Reward"]) else {
    return String::new();
  };

  if let Some(s) = reward.as_str() {
    return s.to_string();
  }

  if let Some(s) = str_field(reward, &["itemString", "asString", "item"]) {
    return s;
  }

  reward
    .get("items")
    .and_then(Value::as_array)
    .and_then(|items| items.first())
    .and_then(Value::as_str)
    .map(String::from)
    .unwrap_or_default()
}

/// Seconds from `now` until the entity's expiry, 0 when absent or past.
///
/// Expiry aliases: `expiry`/`Expiry`/`expiryTime`/`expires`. Accepted forms:
/// an RFC 3339 string, a numeric epoch (milliseconds when the magnitude says
/// so), or the mongo-style `{"$date": {"$numberLong": "<millis>"}}` object.
fn remaining_secs(value: &Value, now: DateTime<Utc>) -> u64 {
  pick(value, &["expiry", "Expiry", "expiryTime", "expires"])
    .and_then(expiry_instant)
    .map(|expiry| clamp_remaining(expiry, now))
    .unwrap_or(0)
}

fn clamp_remaining(expiry: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
  (expiry - now).num_seconds().max(0) as u64
}

fn expiry_instant(value: &Value) -> Option<DateTime<Utc>> {
  if let Some(s) = value.as_str() {
    return DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.with_timezone(&Utc));
  }

  if let Some(n) = value.as_i64() {
    return epoch_to_instant(n);
  }

  // {"$date": {"$numberLong": "1650000000000"}}
  value
    .get("$date")
    .and_then(|d| d.get("$numberLong"))
    .and_then(|n| n.as_str().and_then(|s| s.parse::<i64>().ok()).or_else(|| n.as_i64()))
    .and_then(epoch_to_instant)
}

/// Epochs above this are milliseconds, not seconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

fn epoch_to_instant(epoch: i64) -> Option<DateTime<Utc>> {
  if epoch > EPOCH_MILLIS_THRESHOLD {
    DateTime::from_timestamp_millis(epoch)
  } else {
    DateTime::from_timestamp(epoch, 0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
      .unwrap()
      .with_timezone(&Utc)
  }

  #[test]
  fn test_parses_full_document() {
    let doc = json!({
      "earthCycle": {"state": "day", "expiry": "2024-05-01T13:30:00Z"},
      "cetusCycle": {"isDay": false, "expiry": "2024-05-01T12:20:00Z"},
      "alerts": [{
        "id": "abc123",
        "expiry": "2024-05-01T12:10:00Z",
        "mission": {"node": "SolNode226", "type": "Exterminate", "reward": {"itemString": "nitain"}}
      }],
      "fissures": [{
        "id": "f1", "node": "SolNode102", "tier": "Meso", "missionType": "Capture",
        "isHard": true, "expiry": "2024-05-01T12:45:00Z"
      }],
      "invasions": [{
        "id": "inv1", "node": "SolNode319",
        "attacker": {"faction": "Grineer"}, "defender": {"faction": "Corpus"},
        "completion": 42.5
      }],
      "sortie": {
        "boss": "Kela De Thaym", "faction": "Grineer",
        "expiry": "2024-05-01T18:00:00Z",
        "variants": [{"node": "SolNode509", "missionType": "Assault", "modifier": "Augmented Armor"}]
      }
    });

    let snapshot = parse_snapshot(&doc, now());

    assert_eq!(snapshot.cycles.len(), 2);
    assert_eq!(snapshot.cycles[0].name, "earth");
    assert_eq!(snapshot.cycles[0].state, "day");
    assert_eq!(snapshot.cycles[0].remaining_secs, 5400);
    assert_eq!(snapshot.cycles[1].state, "night");

    let alert = &snapshot.alerts[0];
    assert_eq!(alert.id, "abc123");
    assert_eq!(alert.node, "Cambria (Earth)");
    assert_eq!(alert.reward, "Nitain Extract");
    assert_eq!(alert.remaining_secs, 600);

    let fissure = &snapshot.fissures[0];
    assert_eq!(fissure.tier, "Meso");
    assert!(fissure.hard);
    assert!(!fissure.storm);

    let invasion = &snapshot.invasions[0];
    assert_eq!(invasion.attacker, "Grineer");
    assert_eq!(invasion.completion, 42.5);
    assert_eq!(invasion.eta_secs, None);

    let sortie = snapshot.sortie.unwrap();
    assert_eq!(sortie.boss, "Kela De Thaym");
    assert_eq!(sortie.missions.len(), 1);
    assert_eq!(sortie.missions[0].node, "Helene (Saturn)");
  }

  #[test]
  fn test_casing_variants_parse_identically() {
    let lower = json!({"node": "SolNode102", "tier": "Lith", "missionType": "Capture",
      "expiry": "2024-05-01T12:30:00Z"});
    let upper = json!({"Node": "SolNode102", "Tier": "Lith", "Type": "Capture",
      "Expiry": "2024-05-01T12:30:00Z"});

    let a = parse_fissure(&lower, 0, now());
    let b = parse_fissure(&upper, 0, now());
    assert_eq!(a.node, b.node);
    assert_eq!(a.tier, b.tier);
    assert_eq!(a.mission_type, b.mission_type);
    assert_eq!(a.remaining_secs, b.remaining_secs);
  }

  #[test]
  fn test_mongo_style_expiry() {
    // 2024-05-01T12:00:10Z in epoch millis
    let value = json!({"Expiry": {"$date": {"$numberLong": "1714564810000"}}});
    assert_eq!(remaining_secs(&value, now()), 10);
  }

  #[test]
  fn test_numeric_epoch_seconds_and_millis() {
    let secs = json!({"expiry": 1_714_564_820i64});
    assert_eq!(remaining_secs(&secs, now()), 20);

    let millis = json!({"expiry": 1_714_564_830_000i64});
    assert_eq!(remaining_secs(&millis, now()), 30);
  }

  #[test]
  fn test_missing_fields_resolve_to_fallbacks() {
    let alert = parse_alert(&json!({}), 3, now());
    assert_eq!(alert.id, "alert-3");
    assert_eq!(alert.node, "Unknown");
    assert_eq!(alert.mission_type, "Unknown");
    assert_eq!(alert.reward, "Unknown");
    assert_eq!(alert.remaining_secs, 0);
  }

  #[test]
  fn test_past_expiry_clamps_to_zero() {
    let value = json!({"expiry": "2024-05-01T11:00:00Z"});
    assert_eq!(remaining_secs(&value, now()), 0);
  }

  #[test]
  fn test_reward_items_array_fallback() {
    let mission = json!({"reward": {"items": ["forma"]}});
    assert_eq!(raw_reward(&mission), "forma");
  }

  #[test]
  fn test_cambion_cycle_reads_active_state() {
    let doc = json!({"cambionCycle": {"active": "fass", "expiry": "2024-05-01T12:05:00Z"}});
    let snapshot = parse_snapshot(&doc, now());
    assert_eq!(snapshot.cycles[0].name, "cambion");
    assert_eq!(snapshot.cycles[0].state, "fass");
  }
}
