use crate::core::error::{MeshError, MeshResult};
use crate::core::math::quantize::MAX_QUANTIZATION_BITS;
use crate::io::obj_writer::WriteOptions;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PipelineConfig {
    #[serde(default = "default_quantization_bits")]
    pub quantization_bits: u32,
    #[serde(default)]
    pub augment: AugmentConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub decode: DecodeConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            quantization_bits: default_quantization_bits(),
            augment: AugmentConfig::default(),
            export: ExportConfig::default(),
            decode: DecodeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AugmentConfig {
    #[serde(default = "default_false")]
    pub apply_random_shift: bool,
    #[serde(default = "default_shift_factor")]
    pub shift_factor: f32,
    /// Fixed seed for reproducible shifts; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            apply_random_shift: false,
            shift_factor: default_shift_factor(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ExportConfig {
    #[serde(default = "default_true")]
    pub transpose: bool,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            transpose: true,
            scale: default_scale(),
        }
    }
}

impl ExportConfig {
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            transpose: self.transpose,
            scale: self.scale,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DecodeConfig {
    #[serde(default = "default_false")]
    pub add_noise: bool,
    /// Seed for the dequantization noise; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_quantization_bits() -> u32 {
    8
}
fn default_shift_factor() -> f32 {
    0.25
}
fn default_scale() -> f32 {
    1.0
}
fn default_false() -> bool {
    false
}
fn default_true() -> bool {
    true
}

impl PipelineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> MeshResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> MeshResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MeshResult<()> {
        if !(1..=MAX_QUANTIZATION_BITS).contains(&self.quantization_bits) {
            return Err(MeshError::InvalidQuantizationBits(self.quantization_bits));
        }
        if !(self.augment.shift_factor.is_finite() && self.augment.shift_factor >= 0.0) {
            return Err(MeshError::Config(format!(
                "shift_factor must be a non-negative number, got {}",
                self.augment.shift_factor
            )));
        }
        if !self.export.scale.is_finite() {
            return Err(MeshError::Config("export scale must be finite".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = PipelineConfig::from_toml("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.quantization_bits, 8);
        assert!(config.export.transpose);
    }

    #[test]
    fn partial_sections_fill_in() {
        let config = PipelineConfig::from_toml(
            r#"
quantization_bits = 6

[augment]
apply_random_shift = true
seed = 42

[export]
scale = 2.5
"#,
        )
        .unwrap();
        assert_eq!(config.quantization_bits, 6);
        assert!(config.augment.apply_random_shift);
        assert_eq!(config.augment.shift_factor, 0.25);
        assert_eq!(config.augment.seed, Some(42));
        assert_eq!(config.export.scale, 2.5);
        assert!(config.export.transpose);
        assert!(!config.decode.add_noise);
    }

    #[test]
    fn zero_bits_is_rejected() {
        assert!(matches!(
            PipelineConfig::from_toml("quantization_bits = 0"),
            Err(MeshError::InvalidQuantizationBits(0))
        ));
    }

    #[test]
    fn negative_shift_factor_is_rejected() {
        let toml = "[augment]\nshift_factor = -1.0\n";
        assert!(matches!(
            PipelineConfig::from_toml(toml),
            Err(MeshError::Config(_))
        ));
    }

    #[test]
    fn bad_toml_is_reported() {
        assert!(matches!(
            PipelineConfig::from_toml("quantization_bits = \"eight\""),
            Err(MeshError::Toml(_))
        ));
    }

    #[test]
    fn decode_seed_is_independent_of_augment_seed() {
        let config = PipelineConfig::from_toml(
            "[augment]\nseed = 1\n\n[decode]\nadd_noise = true\nseed = 9\n",
        )
        .unwrap();
        assert_eq!(config.augment.seed, Some(1));
        assert_eq!(config.decode.seed, Some(9));
        assert_eq!(PipelineConfig::default().decode.seed, None);
    }
}
