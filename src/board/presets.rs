//! Built-in template presets selectable from the web panel.

use std::sync::LazyLock;

use super::template::PanelTemplate;

/// A named ready-made template.
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub template: PanelTemplate,
}

fn preset(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    update_interval: u64,
    title_frames: &[&str],
    lines: &[&str],
) -> Preset {
    Preset {
        id,
        name,
        description,
        template: PanelTemplate {
            enabled: true,
            update_interval,
            title_frames: title_frames.iter().map(|s| s.to_string()).collect(),
            lines: lines.iter().map(|s| s.to_string()).collect(),
        },
    }
}

static PRESETS: LazyLock<Vec<Preset>> = LazyLock::new(|| {
    vec![
        preset(
            "classic",
            "Classic",
            "A simple and sleek panel",
            10,
            &["&6&l✦ &e&lServer &6&l✦", "&e&l✦ &6&lServer &e&l✦"],
            &[
                "&7&m----------------",
                "&f",
                "&e☀ &fPlayer: &a%player%",
                "&e☀ &fOnline: &a%online%&7/&a%max%",
                "&f",
                "&e☀ &fWorld: &b%world%",
                "&e☀ &fLocation: &b%x%, %y%, %z%",
                "&f",
                "&7&m----------------",
            ],
        ),
        preset(
            "survival",
            "Survival",
            "Ideal for survival servers",
            5,
            &[
                "&2&l⚔ &a&lSURVIVAL &2&l⚔",
                "&a&l⚔ &2&lSURVIVAL &a&l⚔",
                "&2&l⚔ &a&lS&2&lURVIVAL &2&l⚔",
                "&2&l⚔ &a&lSU&2&lRVIVAL &2&l⚔",
                "&2&l⚔ &a&lSUR&2&lVIVAL &2&l⚔",
                "&2&l⚔ &a&lSURV&2&lIVAL &2&l⚔",
                "&2&l⚔ &a&lSURVI&2&lVAL &2&l⚔",
                "&2&l⚔ &a&lSURVIV&2&lAL &2&l⚔",
                "&2&l⚔ &a&lSURVIVA&2&lL &2&l⚔",
                "&2&l⚔ &a&lSURVIVAL &2&l⚔",
            ],
            &[
                "&8▪▪▪▪▪▪▪▪▪▪▪▪▪▪▪▪▪▪▪",
                "",
                "&a❤ &fHealth: &c%health%",
                "&a🍖 &fFood: &6%food%",
                "&a⭐ &fLevel: &e%level%",
                "",
                "&a👤 &fPlayer: &b%player%",
                "&a🌍 &fWorld: &b%world%",
                "",
                "&8▪▪▪▪▪▪▪▪▪▪▪▪▪▪▪▪▪▪▪",
            ],
        ),
        preset(
            "pvp",
            "PvP Arena",
            "Aggressive design for PvP servers",
            3,
            &[
                "&4&l⚔ &c&lPVP ARENA &4&l⚔",
                "&c&l⚔ &4&lPVP ARENA &c&l⚔",
                "&4&l✖ &c&lPVP ARENA &4&l✖",
                "&c&l✖ &4&lPVP ARENA &c&l✖",
            ],
            &[
                "&4&l▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬",
                "",
                "&c⚔ &fWarrior: &e%player%",
                "&c❤ &fHealth: &c%health%",
                "",
                "&c👥 &fArena: &a%online% &7players",
                "&c📍 &fLocation: &7%x%, %y%, %z%",
                "",
                "&4&l▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬",
            ],
        ),
        preset(
            "skyblock",
            "Skyblock",
            "For skyblock servers",
            10,
            &[
                "&b&l☁ &f&lSKYBLOCK &b&l☁",
                "&f&l☁ &b&lSKYBLOCK &f&l☁",
                "&b&l✦ &f&lSKYBLOCK &b&l✦",
            ],
            &[
                "&b&m⏤⏤⏤⏤⏤⏤⏤⏤⏤⏤⏤⏤",
                "",
                "&f☁ &bIsland Owner:",
                "&f  &e%player%",
                "",
                "&f☁ &bOnline: &f%online%",
                "&f☁ &bLevel: &f%level%",
                "",
                "&b&m⏤⏤⏤⏤⏤⏤⏤⏤⏤⏤⏤⏤",
            ],
        ),
        preset(
            "rainbow",
            "Rainbow",
            "Colorful animated title",
            2,
            &[
                "&cL&6i&ev&ae&bB&do&5a&cr&6d",
                "&6L&ei&av&be&dB&5o&ca&6r&ed",
                "&eL&ai&bv&de&5B&co&6a&er&ad",
                "&aL&bi&dv&5e&cB&6o&ea&ar&bd",
                "&bL&di&5v&ce&6B&eo&aa&br&dd",
                "&dL&5i&cv&6e&eB&ao&ba&dr&5d",
                "&5L&ci&6v&ee&aB&bo&da&5r&cd",
            ],
            &[
                "&7✦✦✦✦✦✦✦✦✦✦✦✦✦✦✦",
                "",
                "&c♦ &fPlayer: &b%player%",
                "&6♦ &fOnline: &a%online%&7/&a%max%",
                "&e♦ &fWorld: &d%world%",
                "",
                "&a♦ &fLocation:",
                "&b  &7X: &f%x% &7Y: &f%y% &7Z: &f%z%",
                "",
                "&7✦✦✦✦✦✦✦✦✦✦✦✦✦✦✦",
            ],
        ),
        preset(
            "minimal",
            "Minimalist",
            "Plain and clean design",
            20,
            &["&f&lSERVER"],
            &[
                "&8─────────────",
                "",
                "&7• &f%player%",
                "&7• &f%online% online",
                "",
                "&8─────────────",
            ],
        ),
    ]
});

/// All built-in presets, in panel display order.
pub fn presets() -> &'static [Preset] {
    &PRESETS
}

/// Look up a preset by its id.
pub fn find_preset(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_presets() {
        assert_eq!(presets().len(), 6);
    }

    #[test]
    fn test_preset_ids() {
        for id in ["classic", "survival", "pvp", "skyblock", "rainbow", "minimal"] {
            assert!(find_preset(id).is_some(), "missing preset {id}");
        }
    }

    #[test]
    fn test_unknown_preset() {
        assert!(find_preset("nope").is_none());
    }

    #[test]
    fn test_preset_intervals() {
        assert_eq!(find_preset("classic").unwrap().template.update_interval, 10);
        assert_eq!(find_preset("survival").unwrap().template.update_interval, 5);
        assert_eq!(find_preset("pvp").unwrap().template.update_interval, 3);
        assert_eq!(find_preset("rainbow").unwrap().template.update_interval, 2);
        assert_eq!(find_preset("minimal").unwrap().template.update_interval, 20);
    }

    #[test]
    fn test_presets_have_content() {
        for preset in presets() {
            assert!(!preset.template.title_frames.is_empty());
            assert!(!preset.template.lines.is_empty());
            assert!(preset.template.enabled);
            // Title frames must survive the 40-char display limit intact
            for frame in &preset.template.title_frames {
                assert!(frame.chars().count() <= 40, "{} frame too long", preset.id);
            }
        }
    }

    #[test]
    fn test_preset_content_structure() {
        let classic = &find_preset("classic").unwrap().template;
        assert_eq!(classic.title_frames.len(), 2);
        assert_eq!(classic.lines.len(), 9);
        // Bordered layout: first and last line are the same divider
        assert_eq!(classic.lines[0], classic.lines[8]);
        assert!(classic.lines.iter().any(|l| l.contains("%x%, %y%, %z%")));

        // Animated title sweeps
        let survival = &find_preset("survival").unwrap().template;
        assert_eq!(survival.title_frames.len(), 10);
        let rainbow = &find_preset("rainbow").unwrap().template;
        assert_eq!(rainbow.title_frames.len(), 7);
    }
}
