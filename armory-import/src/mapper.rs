//! Character profile → [`Character`] mapping
//!
//! A profile document nests its display names as locale-keyed maps, e.g.
//! `{"race": {"name": {"en_US": "Orc", "de_DE": "Orc"}}}`. The mapper picks
//! the configured locale out of each. Pure, no I/O.

use armory_common::Character;
use serde_json::Value;
use thiserror::Error;

/// Mapping failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field {path} is not {expected}")]
    InvalidType { path: String, expected: &'static str },
}

/// Map one raw character profile document
///
/// `active_spec` is optional: absent or null maps to `None`. Every other field
/// is required.
pub fn map_character(document: &Value, locale: &str) -> Result<Character, MappingError> {
    let active_spec = match document.get("active_spec") {
        None | Some(Value::Null) => None,
        Some(_) => Some(localized_name(document, "active_spec", locale)?),
    };

    Ok(Character {
        id: integer(document, &["id"])?,
        name: string(document, &["name"])?,
        race: localized_name(document, "race", locale)?,
        gender: localized_name(document, "gender", locale)?,
        character_class: localized_name(document, "character_class", locale)?,
        faction: localized_name(document, "faction", locale)?,
        level: integer(document, &["level"])?,
        active_spec,
        realm: localized_name(document, "realm", locale)?,
        guild: string(document, &["guild", "name"])?,
        achievement_points: integer(document, &["achievement_points"])?,
        equipped_item_level: integer(document, &["equipped_item_level"])?,
        average_item_level: integer(document, &["average_item_level"])?,
    })
}

/// `<field>.name.<locale>` as a string
fn localized_name(document: &Value, field: &str, locale: &str) -> Result<String, MappingError> {
    string(document, &[field, "name", locale])
}

fn lookup<'a>(document: &'a Value, path: &[&str]) -> Result<&'a Value, MappingError> {
    let mut current = document;
    for (depth, key) in path.iter().enumerate() {
        current = current
            .get(key)
            .filter(|v| !v.is_null())
            .ok_or_else(|| MappingError::MissingField(path[..=depth].join(".")))?;
    }
    Ok(current)
}

fn string(document: &Value, path: &[&str]) -> Result<String, MappingError> {
    lookup(document, path)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| MappingError::InvalidType {
            path: path.join("."),
            expected: "a string",
        })
}

fn integer(document: &Value, path: &[&str]) -> Result<i64, MappingError> {
    lookup(document, path)?
        .as_i64()
        .ok_or_else(|| MappingError::InvalidType {
            path: path.join("."),
            expected: "an integer",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn localized(en: &str) -> Value {
        json!({ "name": { "en_US": en, "de_DE": format!("{} (de)", en) } })
    }

    fn profile() -> Value {
        json!({
            "id": 204_857_331,
            "name": "Thrall",
            "race": localized("Orc"),
            "gender": localized("Male"),
            "character_class": localized("Shaman"),
            "faction": localized("Horde"),
            "level": 70,
            "active_spec": localized("Enhancement"),
            "realm": localized("Durotan"),
            "guild": { "name": "Earthen Ring", "id": 77 },
            "achievement_points": 12345,
            "equipped_item_level": 480,
            "average_item_level": 483
        })
    }

    #[test]
    fn test_maps_full_document() {
        let character = map_character(&profile(), "en_US").expect("should map");

        assert_eq!(
            character,
            Character {
                id: 204_857_331,
                name: "Thrall".to_string(),
                race: "Orc".to_string(),
                gender: "Male".to_string(),
                character_class: "Shaman".to_string(),
                faction: "Horde".to_string(),
                level: 70,
                active_spec: Some("Enhancement".to_string()),
                realm: "Durotan".to_string(),
                guild: "Earthen Ring".to_string(),
                achievement_points: 12345,
                equipped_item_level: 480,
                average_item_level: 483,
            }
        );
    }

    #[test]
    fn test_other_locale() {
        let character = map_character(&profile(), "de_DE").unwrap();
        assert_eq!(character.race, "Orc (de)");
        assert_eq!(character.active_spec.as_deref(), Some("Enhancement (de)"));
        // guild and name are not localized
        assert_eq!(character.guild, "Earthen Ring");
        assert_eq!(character.name, "Thrall");
    }

    #[test]
    fn test_absent_active_spec_maps_to_none() {
        let mut doc = profile();
        doc.as_object_mut().unwrap().remove("active_spec");

        let character = map_character(&doc, "en_US").expect("absent spec is not an error");
        assert_eq!(character.active_spec, None);
    }

    #[test]
    fn test_null_active_spec_maps_to_none() {
        let mut doc = profile();
        doc["active_spec"] = Value::Null;

        assert_eq!(map_character(&doc, "en_US").unwrap().active_spec, None);
    }

    #[test]
    fn test_active_spec_missing_locale_is_error() {
        let mut doc = profile();
        doc["active_spec"] = json!({ "name": { "fr_FR": "Amélioration" } });

        assert_eq!(
            map_character(&doc, "en_US"),
            Err(MappingError::MissingField("active_spec.name.en_US".to_string()))
        );
    }

    #[test]
    fn test_missing_required_fields_propagate() {
        for field in [
            "id",
            "name",
            "race",
            "gender",
            "character_class",
            "faction",
            "level",
            "realm",
            "guild",
            "achievement_points",
            "equipped_item_level",
            "average_item_level",
        ] {
            let mut doc = profile();
            doc.as_object_mut().unwrap().remove(field);

            assert_eq!(
                map_character(&doc, "en_US"),
                Err(MappingError::MissingField(field.to_string())),
                "removing {} should fail",
                field
            );
        }
    }

    #[test]
    fn test_missing_nested_path_reports_full_path() {
        let mut doc = profile();
        doc["guild"] = json!({ "id": 77 });
        assert_eq!(
            map_character(&doc, "en_US"),
            Err(MappingError::MissingField("guild.name".to_string()))
        );

        let mut doc = profile();
        doc["realm"] = json!({ "name": { "de_DE": "Durotan" } });
        assert_eq!(
            map_character(&doc, "en_US"),
            Err(MappingError::MissingField("realm.name.en_US".to_string()))
        );
    }

    #[test]
    fn test_wrong_type_is_invalid_type() {
        let mut doc = profile();
        doc["level"] = json!("seventy");

        assert_eq!(
            map_character(&doc, "en_US"),
            Err(MappingError::InvalidType {
                path: "level".to_string(),
                expected: "an integer",
            })
        );
    }
}
