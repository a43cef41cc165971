//! Competition catalog materialization.
//!
//! Turns the raw `episodes` and `items` arrays returned by the hub into typed,
//! de-duplicated maps:
//!
//! - [`parse_episodes`] - episode number -> [`Episode`] (with its [`Phase`]s)
//! - [`parse_items`] - item code -> [`Item`]
//!
//! Both are pure functions over already-decoded JSON; they do no I/O.

use serde_json::Value;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{HubError, Result};

/// A phase of an episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    episode_number: u32,
    number: u32,
    name: String,
}

impl Phase {
    /// Creates a phase belonging to episode `episode_number`.
    pub fn new(episode_number: u32, number: u32, name: impl Into<String>) -> Self {
        Self {
            episode_number,
            number,
            name: name.into(),
        }
    }

    /// Number of the owning episode.
    pub fn episode_number(&self) -> u32 {
        self.episode_number
    }

    /// Phase number, unique within its episode.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ep {}, phase {}: {}",
            self.episode_number, self.number, self.name
        )
    }
}

/// A competition episode and its phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    number: u32,
    name: String,
    phases: BTreeMap<u32, Phase>,
}

impl Episode {
    /// Creates an episode with no phases.
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            phases: BTreeMap::new(),
        }
    }

    /// Episode number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Phases keyed by phase number.
    pub fn phases(&self) -> &BTreeMap<u32, Phase> {
        &self.phases
    }

    /// Looks up a phase by number.
    pub fn phase(&self, number: u32) -> Option<&Phase> {
        self.phases.get(&number)
    }

    fn add_phase(&mut self, phase: Phase) -> Result<()> {
        match self.phases.entry(phase.number) {
            Entry::Occupied(_) => Err(HubError::DuplicatePhase {
                episode: self.number,
                phase: phase.number,
                name: phase.name,
            }),
            Entry::Vacant(slot) => {
                slot.insert(phase);
                Ok(())
            }
        }
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "episode {}: {} ({} phases)",
            self.number,
            self.name,
            self.phases.len()
        )
    }
}

/// An item available in a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    code: String,
    name: String,
    location: String,
}

impl Item {
    /// Creates an item.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            location: location.into(),
        }
    }

    /// Unique item code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the item can be found.
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

fn field<'a>(data: &'a Value, entity: &'static str, key: &'static str) -> Result<&'a Value> {
    data.get(key).ok_or_else(|| HubError::missing(entity, key))
}

fn number_field(data: &Value, entity: &'static str, key: &'static str) -> Result<u32> {
    field(data, entity, key)?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| HubError::wrong_type(entity, key))
}

fn string_field(data: &Value, entity: &'static str, key: &'static str) -> Result<String> {
    field(data, entity, key)?
        .as_str()
        .map(String::from)
        .ok_or_else(|| HubError::wrong_type(entity, key))
}

/// Builds the episode catalog from the hub's raw `episodes` array.
///
/// # Errors
///
/// - [`HubError::MalformedData`] if an episode lacks `number`, `name` or
///   `phases`, or a phase lacks `number` or `name`.
/// - [`HubError::DuplicatePhase`] if an episode lists the same phase twice.
/// - [`HubError::DuplicateEpisode`] if two entries share an episode number.
pub fn parse_episodes(episodes_data: &[Value]) -> Result<BTreeMap<u32, Episode>> {
    let mut episodes = BTreeMap::new();

    for ep_data in episodes_data {
        let number = number_field(ep_data, "episode", "number")?;
        let name = string_field(ep_data, "episode", "name")?;
        let phases_data = field(ep_data, "episode", "phases")?
            .as_array()
            .ok_or_else(|| HubError::wrong_type("episode", "phases"))?;

        let mut episode = Episode::new(number, name);
        for phase_data in phases_data {
            let phase_number = number_field(phase_data, "phase", "number")?;
            let phase_name = string_field(phase_data, "phase", "name")?;
            episode.add_phase(Phase::new(number, phase_number, phase_name))?;
        }

        match episodes.entry(number) {
            Entry::Occupied(_) => return Err(HubError::DuplicateEpisode(number)),
            Entry::Vacant(slot) => {
                slot.insert(episode);
            }
        }
    }

    log::debug!("parsed {} episodes", episodes.len());
    Ok(episodes)
}

/// Builds the item catalog from the hub's raw `items` array.
///
/// # Errors
///
/// - [`HubError::MalformedData`] if an item lacks `code`, `name` or `location`.
/// - [`HubError::DuplicateItem`] if two items share a code.
pub fn parse_items(items_data: &[Value]) -> Result<BTreeMap<String, Item>> {
    let mut items = BTreeMap::new();

    for it_data in items_data {
        let code = string_field(it_data, "item", "code")?;
        let name = string_field(it_data, "item", "name")?;
        let location = string_field(it_data, "item", "location")?;

        match items.entry(code) {
            Entry::Occupied(slot) => return Err(HubError::DuplicateItem(slot.key().clone())),
            Entry::Vacant(slot) => {
                let item = Item::new(slot.key().clone(), name, location);
                slot.insert(item);
            }
        }
    }

    log::debug!("parsed {} items", items.len());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list(value: Value) -> Vec<Value> {
        value.as_array().unwrap().clone()
    }

    #[test]
    fn test_parse_single_episode() {
        let data = list(json!([
            { "number": 4, "name": "Nav", "phases": [{ "number": 1, "name": "Search" }] }
        ]));
        let episodes = parse_episodes(&data).unwrap();

        let mut expected = Episode::new(4, "Nav");
        expected.add_phase(Phase::new(4, 1, "Search")).unwrap();
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[&4], expected);
        assert_eq!(episodes[&4].phase(1).unwrap().episode_number(), 4);
    }

    #[test]
    fn test_duplicate_phase_rejected() {
        let data = list(json!([
            {
                "number": 4,
                "name": "Nav",
                "phases": [{ "number": 1, "name": "Search" }, { "number": 1, "name": "Dup" }]
            }
        ]));
        let err = parse_episodes(&data).unwrap_err();
        match err {
            HubError::DuplicatePhase { episode, phase, name } => {
                assert_eq!((episode, phase), (4, 1));
                assert_eq!(name, "Dup");
            }
            other => panic!("expected duplicate phase, got {other:?}"),
        }
    }

    #[test]
    fn test_same_phase_number_in_different_episodes() {
        let data = list(json!([
            { "number": 1, "name": "A", "phases": [{ "number": 1, "name": "x" }] },
            { "number": 2, "name": "B", "phases": [{ "number": 1, "name": "y" }] }
        ]));
        let episodes = parse_episodes(&data).unwrap();
        assert_eq!(episodes[&2].phases()[&1].name(), "y");
        assert_eq!(episodes[&2].phases()[&1].episode_number(), 2);
    }

    #[test]
    fn test_duplicate_episode_rejected() {
        let data = list(json!([
            { "number": 4, "name": "Nav", "phases": [] },
            { "number": 4, "name": "Again", "phases": [] }
        ]));
        assert!(matches!(
            parse_episodes(&data),
            Err(HubError::DuplicateEpisode(4))
        ));
    }

    fn assert_malformed(err: &HubError, entity: &str, field: &str, problem: &str) {
        assert!(
            matches!(
                err,
                HubError::MalformedData { entity: e, field: f, problem: p }
                    if *e == entity && *f == field && *p == problem
            ),
            "expected {entity}.{field} to be reported as '{problem}', got {err:?}"
        );
    }

    const MISSING: &str = "missing required key";
    const WRONG_TYPE: &str = "has invalid value for key";

    #[test]
    fn test_missing_episode_fields() {
        for (data, missing) in [
            (json!([{ "name": "Nav", "phases": [] }]), "number"),
            (json!([{ "number": 4, "phases": [] }]), "name"),
            (json!([{ "number": 4, "name": "Nav" }]), "phases"),
        ] {
            let err = parse_episodes(&list(data)).unwrap_err();
            assert_malformed(&err, "episode", missing, MISSING);
        }
    }

    #[test]
    fn test_missing_phase_fields() {
        for (phase, missing) in [
            (json!({ "name": "Search" }), "number"),
            (json!({ "number": 1 }), "name"),
            (json!({}), "number"),
        ] {
            let data = list(json!([{ "number": 4, "name": "Nav", "phases": [phase] }]));
            let err = parse_episodes(&data).unwrap_err();
            assert_malformed(&err, "phase", missing, MISSING);
        }

        let data = list(json!([{ "number": 4, "name": "Nav", "phases": [{ "number": 1 }] }]));
        let err = parse_episodes(&data).unwrap_err();
        assert_eq!(err.to_string(), "phase data missing required key 'name'");
    }

    #[test]
    fn test_wrong_episode_types() {
        for (episode, field) in [
            (json!({ "number": -1, "name": "Nav", "phases": [] }), "number"),
            (json!({ "number": 4.5, "name": "Nav", "phases": [] }), "number"),
            (json!({ "number": 4_294_967_296_u64, "name": "Nav", "phases": [] }), "number"),
            (json!({ "number": "4", "name": "Nav", "phases": [] }), "number"),
            (json!({ "number": 4, "name": null, "phases": [] }), "name"),
            (json!({ "number": 4, "name": "Nav", "phases": "none" }), "phases"),
        ] {
            let err = parse_episodes(&[episode]).unwrap_err();
            assert_malformed(&err, "episode", field, WRONG_TYPE);
        }
    }

    #[test]
    fn test_wrong_phase_types() {
        for (phase, field) in [
            (json!({ "number": "1", "name": "Search" }), "number"),
            (json!({ "number": -1, "name": "Search" }), "number"),
            (json!({ "number": 1, "name": 2 }), "name"),
        ] {
            let data = list(json!([{ "number": 4, "name": "Nav", "phases": [phase] }]));
            let err = parse_episodes(&data).unwrap_err();
            assert_malformed(&err, "phase", field, WRONG_TYPE);
        }
    }

    #[test]
    fn test_parse_items() {
        let data = list(json!([
            { "code": "A1", "name": "Cube", "location": "shelf" },
            { "code": "B2", "name": "Ball", "location": "floor" }
        ]));
        let items = parse_items(&data).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items["A1"], Item::new("A1", "Cube", "shelf"));
    }

    #[test]
    fn test_duplicate_item_rejected() {
        let data = list(json!([
            { "code": "A1", "name": "Cube", "location": "shelf" },
            { "code": "A1", "name": "Dup", "location": "floor" }
        ]));
        let err = parse_items(&data).unwrap_err();
        assert!(matches!(err, HubError::DuplicateItem(ref code) if code == "A1"));
    }

    #[test]
    fn test_missing_item_fields() {
        for (data, missing) in [
            (json!([{ "name": "Cube", "location": "shelf" }]), "code"),
            (json!([{ "code": "A1", "location": "shelf" }]), "name"),
            (json!([{ "code": "A1", "name": "Cube" }]), "location"),
        ] {
            let err = parse_items(&list(data)).unwrap_err();
            assert_malformed(&err, "item", missing, MISSING);
        }

        let data = list(json!([{ "code": "A1", "name": "Cube" }]));
        let err = parse_items(&data).unwrap_err();
        assert_eq!(err.to_string(), "item data missing required key 'location'");
    }

    #[test]
    fn test_wrong_item_types() {
        for (data, field) in [
            (json!([{ "code": 5, "name": "Cube", "location": "shelf" }]), "code"),
            (json!([{ "code": "A1", "name": null, "location": "shelf" }]), "name"),
            (json!([{ "code": "A1", "name": "Cube", "location": [] }]), "location"),
        ] {
            let err = parse_items(&list(data)).unwrap_err();
            assert_malformed(&err, "item", field, WRONG_TYPE);
        }
    }

    #[test]
    fn test_empty_lists() {
        assert!(parse_episodes(&[]).unwrap().is_empty());
        assert!(parse_items(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_display_formats() {
        let mut episode = Episode::new(4, "Nav");
        episode.add_phase(Phase::new(4, 1, "Search")).unwrap();
        assert_eq!(episode.to_string(), "episode 4: Nav (1 phases)");
        assert_eq!(episode.phases()[&1].to_string(), "ep 4, phase 1: Search");
        assert_eq!(Item::new("A1", "Cube", "shelf").to_string(), "Cube (A1)");
    }
}
