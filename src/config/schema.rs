//! Configuration schema types for `huelock.toml`
//!
//! Defines the structure and validation rules for corrector configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::corrector::{CorrectionConfig, CorrectionOptions, HueCorrector, DEFAULT_PALETTES};
use crate::roles::{canonical_name, PaletteRoleMap, RoleTarget};

/// `[correction]` section: which palettes to correct and the policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionSection {
    /// Run the corrector at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Palettes to correct
    #[serde(default = "default_palettes")]
    pub palettes: Vec<String>,
    /// Deviation bounds, thresholds and tone preference
    #[serde(flatten)]
    pub policy: CorrectionConfig,
}

fn default_true() -> bool {
    true
}

fn default_palettes() -> Vec<String> {
    DEFAULT_PALETTES.iter().map(|p| p.to_string()).collect()
}

impl Default for CorrectionSection {
    fn default() -> Self {
        Self { enabled: true, palettes: default_palettes(), policy: CorrectionConfig::default() }
    }
}

/// `[output]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Complete `huelock.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HuelockConfig {
    #[serde(default)]
    pub correction: CorrectionSection,
    /// Extra role-to-palette entries: role name -> palette name or `"fixed"`
    #[serde(default)]
    pub roles: BTreeMap<String, String>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "correction.hue_step")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "huelock.toml: '{}' {}", self.field, self.message)
    }
}

impl HuelockConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors: Vec<ConfigValidationError> = self
            .correction
            .policy
            .validate()
            .into_iter()
            .map(|(field, message)| ConfigValidationError {
                field: format!("correction.{}", field),
                message: message.to_string(),
            })
            .collect();

        if self.correction.palettes.iter().any(|p| canonical_name(p).is_empty()) {
            errors.push(ConfigValidationError {
                field: "correction.palettes".to_string(),
                message: "must not contain empty palette names".to_string(),
            });
        }

        for (role, target) in &self.roles {
            if canonical_name(role).is_empty() {
                errors.push(ConfigValidationError {
                    field: format!("roles.{}", role),
                    message: "is not a valid role name".to_string(),
                });
            }
            if canonical_name(target).is_empty() {
                errors.push(ConfigValidationError {
                    field: format!("roles.{}", role),
                    message: "must be a palette name or \"fixed\"".to_string(),
                });
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    pub fn correction_options(&self) -> CorrectionOptions {
        CorrectionOptions {
            enabled: self.correction.enabled,
            affected_palettes: self.correction.palettes.clone(),
        }
    }

    /// The Material role table with the `[roles]` entries applied.
    pub fn role_map(&self) -> PaletteRoleMap {
        let mut map = PaletteRoleMap::material();
        for (role, target) in &self.roles {
            map.insert(role, RoleTarget::parse(target));
        }
        map
    }

    pub fn corrector(&self) -> HueCorrector {
        HueCorrector::new(self.correction.policy.clone()).with_roles(self.role_map())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::RoleSource;

    #[test]
    fn test_empty_config_parse() {
        let config: HuelockConfig = toml::from_str("").unwrap();
        assert_eq!(config, HuelockConfig::default());
        assert!(config.correction.enabled);
        assert_eq!(config.correction.palettes, vec!["primary", "secondary", "tertiary", "error"]);
        assert!(config.output.pretty);
        assert!(config.is_valid());
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[correction]
enabled = false
palettes = ["primary", "neutralVariant"]
mid_tone_range = [30, 70]
mid_tone_max_deviation = 4
max_deviation = 10.5
hue_step = 0.5
usable_chroma = 0.03
achromatic_chroma = 0.002
correct_achromatic_tones = true
tone_preference = ["40", "50"]

[roles]
"surface-tint" = "secondary"
brand = "fixed"

[output]
pretty = false
"#;
        let config: HuelockConfig = toml::from_str(toml).unwrap();
        assert!(!config.correction.enabled);
        assert_eq!(config.correction.palettes, vec!["primary", "neutralVariant"]);
        let policy = &config.correction.policy;
        assert_eq!(policy.mid_tone_range, [30.0, 70.0]);
        assert_eq!(policy.mid_tone_max_deviation, 4.0);
        assert_eq!(policy.max_deviation, 10.5);
        assert_eq!(policy.hue_step, 0.5);
        assert_eq!(policy.usable_chroma, 0.03);
        assert_eq!(policy.achromatic_chroma, 0.002);
        assert!(policy.correct_achromatic_tones);
        assert_eq!(policy.tone_preference, vec!["40", "50"]);
        assert!(!config.output.pretty);
        assert!(config.is_valid());

        let roles = config.role_map();
        assert_eq!(roles.classify("surfaceTint"), RoleSource::Palette("secondary".to_string()));
        assert_eq!(roles.classify("onBrand"), RoleSource::FixedValue);
    }

    #[test]
    fn test_partial_correction_section_keeps_defaults() {
        let config: HuelockConfig = toml::from_str("[correction]\nmax_deviation = 6.0\n").unwrap();
        assert_eq!(config.correction.policy.max_deviation, 6.0);
        assert_eq!(config.correction.policy.mid_tone_max_deviation, 5.0);
        assert_eq!(config.correction.policy.hue_step, 1.0);
        assert!(config.correction.enabled);
        assert_eq!(config.correction.palettes.len(), 4);
    }

    #[test]
    fn test_validation_errors() {
        let toml = r#"
[correction]
palettes = ["primary", "--"]
hue_step = 0
mid_tone_range = [60, 40]

[roles]
outline = ""
"#;
        let config: HuelockConfig = toml::from_str(toml).unwrap();
        let errors = config.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "correction.hue_step",
                "correction.mid_tone_range",
                "correction.palettes",
                "roles.outline"
            ]
        );
        assert_eq!(
            errors[0].to_string(),
            "huelock.toml: 'correction.hue_step' must be a number of at least 0.01 degrees"
        );
    }

    #[test]
    fn test_correction_options() {
        let mut config = HuelockConfig::default();
        config.correction.palettes = vec!["tertiary".to_string()];
        let options = config.correction_options();
        assert!(options.enabled);
        assert_eq!(options.affected_palettes, vec!["tertiary"]);
    }

    #[test]
    fn test_config_serializes_to_toml() {
        let config = HuelockConfig::default();
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("[correction]"));
        assert!(text.contains("max_deviation = 8.0"));
        let reparsed: HuelockConfig = toml::from_str(&text).unwrap();
        assert_eq!(reparsed, config);
    }
}
