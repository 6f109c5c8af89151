//! Persisted configuration
//!
//! The settings document is a single JSON file in the platform data
//! directory. Every field falls back to its default independently, so a
//! corrupt or partially-written document never blocks startup.

use crate::geometry::{Point, Size, SizePreset};
use crate::{DockpaneError, DockpaneResult};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// An ordered view-key → URL mapping
///
/// Insertion order is display and navigation order, and survives a JSON
/// round trip (serialized as an object, deserialized preserving document
/// order). Setting an existing key replaces the URL in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMap(Vec<(String, String)>);

impl UrlMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, url)| url.as_str())
    }

    pub fn insert(&mut self, key: String, url: String) {
        if let Some(entry) = self.0.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = url;
        } else {
            self.0.push((key, url));
        }
    }

    /// Key at ordinal position (0-based), used for view-switch shortcuts
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|(k, _)| k.as_str())
    }

    pub fn first_key(&self) -> Option<&str> {
        self.key_at(0)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for UrlMap {
    fn default() -> Self {
        let mut map = Self::new();
        map.insert("url1".to_string(), "https://chatgpt.com/".to_string());
        map.insert("url2".to_string(), "https://claude.ai/".to_string());
        map.insert("url3".to_string(), "https://tidbit.ai/".to_string());
        map.insert(
            "url4".to_string(),
            "https://aistudio.google.com/".to_string(),
        );
        map.insert("url5".to_string(), "https://notion.so/".to_string());
        map
    }
}

impl FromIterator<(String, String)> for UrlMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, url) in iter {
            map.insert(key, url);
        }
        map
    }
}

impl Serialize for UrlMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, url) in &self.0 {
            map.serialize_entry(key, url)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for UrlMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct UrlMapVisitor;

        impl<'de> Visitor<'de> for UrlMapVisitor {
            type Value = UrlMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of view keys to URL strings")
            }

            fn visit_map<A>(self, mut access: A) -> Result<UrlMap, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = UrlMap::new();
                while let Some((key, url)) = access.next_entry::<String, String>()? {
                    map.insert(key, url);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(UrlMapVisitor)
    }
}

/// The persisted settings document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Global toggle shortcut, platform accelerator grammar (e.g. "Cmd+E")
    pub default_key_combination: String,

    /// View key → URL, in display order
    pub urls: UrlMap,

    /// Selected size preset
    pub window_size_key: SizePreset,

    /// Concrete size the preset last resolved to
    pub window_size: Size,

    /// Last window position; None means center on next show
    pub window_position: Option<Point>,

    /// Center on the monitor under the cursor on every show, ignoring the
    /// saved position
    pub always_show_on_current_screen: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_key_combination: "Cmd+E".to_string(),
            urls: UrlMap::default(),
            window_size_key: SizePreset::Medium,
            window_size: Size::new(1250, 750),
            window_position: None,
            always_show_on_current_screen: false,
        }
    }
}

impl Settings {
    /// Build settings from a parsed JSON document with per-field fallback
    ///
    /// Any field that is missing or fails to deserialize takes its default;
    /// the remaining fields are unaffected.
    pub fn from_value(value: serde_json::Value) -> Self {
        let defaults = Self::default();
        let mut doc = match value {
            serde_json::Value::Object(map) => map,
            _ => return defaults,
        };

        fn field<T: serde::de::DeserializeOwned>(
            doc: &mut serde_json::Map<String, serde_json::Value>,
            key: &str,
            default: T,
        ) -> T {
            match doc.remove(key) {
                Some(raw) => serde_json::from_value(raw).unwrap_or_else(|err| {
                    log::warn!("Ignoring invalid settings field '{}': {}", key, err);
                    default
                }),
                None => default,
            }
        }

        Self {
            default_key_combination: field(
                &mut doc,
                "defaultKeyCombination",
                defaults.default_key_combination,
            ),
            urls: field(&mut doc, "urls", defaults.urls),
            window_size_key: field(&mut doc, "windowSizeKey", defaults.window_size_key),
            window_size: field(&mut doc, "windowSize", defaults.window_size),
            window_position: field(&mut doc, "windowPosition", defaults.window_position),
            always_show_on_current_screen: field(
                &mut doc,
                "alwaysShowOnCurrentScreen",
                defaults.always_show_on_current_screen,
            ),
        }
    }

    /// Load settings from the given path, falling back field by field
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<serde_json::Value>(&contents) {
                Ok(value) => Self::from_value(value),
                Err(err) => {
                    log::warn!("Settings file is not valid JSON, using defaults: {}", err);
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Failed to read settings file, using defaults: {}", err);
                Self::default()
            }
        }
    }

    /// Save settings to the given path
    pub fn save(&self, path: &Path) -> DockpaneResult<()> {
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| DockpaneError::Config(format!("Failed to serialize settings: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, data)?;
        Ok(())
    }
}

/// Data directory for persistent storage, with fallback
pub fn data_dir() -> PathBuf {
    if let Some(dir) = dirs::data_local_dir() {
        return dir.join("dockpane");
    }
    PathBuf::from(".dockpane")
}

/// Default path of the settings document
pub fn settings_path() -> PathBuf {
    data_dir().join("settings.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_map_preserves_insertion_order() {
        let mut map = UrlMap::new();
        map.insert("url3".to_string(), "https://c.example".to_string());
        map.insert("url1".to_string(), "https://a.example".to_string());
        map.insert("url2".to_string(), "https://b.example".to_string());

        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["url3", "url1", "url2"]);
        assert_eq!(map.key_at(1), Some("url1"));
    }

    #[test]
    fn test_url_map_insert_replaces_in_place() {
        let mut map = UrlMap::new();
        map.insert("url1".to_string(), "https://old.example".to_string());
        map.insert("url2".to_string(), "https://b.example".to_string());
        map.insert("url1".to_string(), "https://new.example".to_string());

        assert_eq!(map.len(), 2);
        assert_eq!(map.key_at(0), Some("url1"));
        assert_eq!(map.get("url1"), Some("https://new.example"));
    }

    #[test]
    fn test_url_map_json_round_trip_keeps_order() {
        let mut map = UrlMap::new();
        map.insert("zeta".to_string(), "https://z.example".to_string());
        map.insert("alpha".to_string(), "https://a.example".to_string());

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"zeta":"https://z.example","alpha":"https://a.example"}"#);

        let restored: UrlMap = serde_json::from_str(&json).unwrap();
        let keys: Vec<&str> = restored.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_key_combination, "Cmd+E");
        assert_eq!(settings.urls.len(), 5);
        assert_eq!(settings.window_size_key, SizePreset::Medium);
        assert_eq!(settings.window_size, Size::new(1250, 750));
        assert!(settings.window_position.is_none());
        assert!(!settings.always_show_on_current_screen);
    }

    #[test]
    fn test_settings_round_trip() {
        let mut settings = Settings::default();
        settings.window_position = Some(Point::new(120, 40));
        settings.window_size_key = SizePreset::Sidebar;

        let json = serde_json::to_string(&settings).unwrap();
        let restored: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, settings);
    }

    #[test]
    fn test_from_value_falls_back_per_field() {
        let doc = serde_json::json!({
            "defaultKeyCombination": "Ctrl+Space",
            "windowSizeKey": "enormous",
            "windowSize": { "width": "wide", "height": 10 },
            "windowPosition": { "x": 5, "y": 7 }
        });

        let settings = Settings::from_value(doc);
        // Valid fields survive
        assert_eq!(settings.default_key_combination, "Ctrl+Space");
        assert_eq!(settings.window_position, Some(Point::new(5, 7)));
        // Invalid fields fall back without poisoning the rest
        assert_eq!(settings.window_size_key, SizePreset::Medium);
        assert_eq!(settings.window_size, Size::new(1250, 750));
        assert_eq!(settings.urls.len(), 5);
    }

    #[test]
    fn test_from_value_non_object_uses_defaults() {
        let settings = Settings::from_value(serde_json::json!([1, 2, 3]));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_camel_case_keys_on_disk() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains("\"defaultKeyCombination\""));
        assert!(json.contains("\"windowSizeKey\""));
        assert!(json.contains("\"alwaysShowOnCurrentScreen\""));
    }
}
