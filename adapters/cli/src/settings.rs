use std::{fs, path::Path};

use anyhow::{Context, Result as AnyResult};
use force_field_core::WorldConfig;
use force_field_system_raycast::ViewConfig;
use serde::Deserialize;

/// Balance and view settings read from the `--config` file.
///
/// The world sections (`[player]`, `[bots]`, `[weapons.pistol]`, ...) sit at
/// the top level next to `[view]`. Missing keys keep their defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    #[serde(flatten)]
    pub(crate) world: WorldConfig,
    pub(crate) view: ViewConfig,
}

impl Settings {
    /// Parses settings from TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Reads and parses the settings stored at `path`.
    pub(crate) fn load(path: &Path) -> AnyResult<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use force_field_core::WeaponKind;

    #[test]
    fn empty_document_keeps_defaults() {
        let settings = Settings::parse("").expect("empty config parses");

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_sections_override_only_named_keys() {
        let settings = Settings::parse(
            r#"
            [player]
            max_health = 150

            [decay]
            settle_ticks = 30

            [view]
            columns = 64
            "#,
        )
        .expect("partial config parses");

        assert_eq!(settings.world.player.max_health, 150);
        assert_eq!(
            settings.world.player.move_speed,
            WorldConfig::default().player.move_speed
        );
        assert_eq!(settings.world.decay.settle_ticks, 30);
        assert_eq!(settings.view.columns, 64);
        assert_eq!(settings.view.screen_height, ViewConfig::default().screen_height);
        assert_eq!(
            settings.world.weapons.get(WeaponKind::Shotgun),
            WorldConfig::default().weapons.get(WeaponKind::Shotgun)
        );
    }

    #[test]
    fn malformed_values_are_reported() {
        assert!(Settings::parse("[view]\ncolumns = \"many\"\n").is_err());
        assert!(Settings::parse("[player\nmax_health = 1\n").is_err());
    }
}
