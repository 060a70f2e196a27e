//! Scheme role names and the palettes that color them
//!
//! A scheme only stores `role -> color`; which palette a role came from is
//! recovered from its name. `onPrimaryContainer`, `on-primary-container` and
//! `on_primary_container` all reduce to the words `[on, primary, container]`,
//! lose their `on`/`container` affixes, and are then looked up in a
//! [`PaletteRoleMap`] that redirects names like `surface-container-high` to
//! the palette that actually colors them.

use std::collections::BTreeMap;

use heck::ToKebabCase;

/// Where a scheme role's color comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleSource {
    /// Drawn from the palette with this canonical name
    Palette(String),
    /// A constant that never comes from a palette (`scrim`, `shadow`)
    FixedValue,
    /// A `*Fixed` / `*FixedDim` role, derived with blending rules we do not model
    FixedVariant,
}

/// Target of a role-map entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleTarget {
    Palette(String),
    Fixed,
}

impl RoleTarget {
    /// Parse a config value: `"fixed"` or a palette name.
    pub fn parse(value: &str) -> Self {
        let name = canonical_name(value);
        if name == "fixed" {
            RoleTarget::Fixed
        } else {
            RoleTarget::Palette(name)
        }
    }
}

/// Split a role or palette name into lowercase words.
///
/// Handles camelCase, PascalCase, kebab-case, snake_case and spaces.
///
/// ```
/// use huelock::roles::role_words;
///
/// assert_eq!(role_words("onPrimaryContainer"), vec!["on", "primary", "container"]);
/// assert_eq!(role_words("surface-container_high"), vec!["surface", "container", "high"]);
/// ```
pub fn role_words(name: &str) -> Vec<String> {
    canonical_name(name).split('-').filter(|w| !w.is_empty()).map(str::to_string).collect()
}

/// Canonical kebab-case form used to compare palette and role names.
///
/// ```
/// use huelock::roles::canonical_name;
///
/// assert_eq!(canonical_name("neutralVariant"), "neutral-variant");
/// assert_eq!(canonical_name("neutral_variant"), "neutral-variant");
/// ```
pub fn canonical_name(name: &str) -> String {
    name.to_kebab_case()
}

/// Drop a leading `on` and a trailing `container`, keeping at least one word.
fn strip_affixes(words: &[String]) -> &[String] {
    let mut words = words;
    if words.len() > 1 && words[0] == "on" {
        words = &words[1..];
    }
    if words.len() > 1 && words[words.len() - 1] == "container" {
        words = &words[..words.len() - 1];
    }
    words
}

/// Table from stripped role names to their source palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteRoleMap {
    entries: BTreeMap<String, RoleTarget>,
}

impl Default for PaletteRoleMap {
    fn default() -> Self {
        Self::material()
    }
}

impl PaletteRoleMap {
    /// A map with no redirects: every stripped role name is its own palette.
    pub fn empty() -> Self {
        Self { entries: BTreeMap::new() }
    }

    /// The Material Design 3 role table.
    pub fn material() -> Self {
        let mut map = Self::empty();

        for role in [
            "background",
            "surface",
            "surface-dim",
            "surface-bright",
            "surface-container-lowest",
            "surface-container-low",
            "surface-container-high",
            "surface-container-highest",
            "inverse-surface",
            "inverse-on-surface",
            "neutral-palette-key-color",
        ] {
            map.insert(role, RoleTarget::Palette("neutral".to_string()));
        }
        for role in ["surface-variant", "outline", "outline-variant", "neutral-variant-palette-key-color"]
        {
            map.insert(role, RoleTarget::Palette("neutral-variant".to_string()));
        }
        for palette in ["primary", "secondary", "tertiary", "error"] {
            map.insert(&format!("{}-dim", palette), RoleTarget::Palette(palette.to_string()));
            map.insert(
                &format!("{}-palette-key-color", palette),
                RoleTarget::Palette(palette.to_string()),
            );
        }
        map.insert("inverse-primary", RoleTarget::Palette("primary".to_string()));
        map.insert("surface-tint", RoleTarget::Palette("primary".to_string()));
        map.insert("scrim", RoleTarget::Fixed);
        map.insert("shadow", RoleTarget::Fixed);

        map
    }

    /// Add or replace an entry. `role` is canonicalized, so `surfaceTint`
    /// and `surface-tint` name the same entry.
    pub fn insert(&mut self, role: &str, target: RoleTarget) {
        self.entries.insert(canonical_name(role), target);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decide which palette, if any, colors `role`.
    pub fn classify(&self, role: &str) -> RoleSource {
        let words = role_words(role);
        if words.iter().any(|w| w == "fixed") {
            return RoleSource::FixedVariant;
        }

        let stripped = strip_affixes(&words).join("-");
        match self.entries.get(&stripped) {
            Some(RoleTarget::Fixed) => RoleSource::FixedValue,
            Some(RoleTarget::Palette(palette)) => RoleSource::Palette(palette.clone()),
            None => RoleSource::Palette(stripped),
        }
    }
}
