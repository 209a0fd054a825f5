use cubestudy_common::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Selector of the container every lesson renders into.
pub const DEFAULT_CONTAINER: &str = "#webgl-container";

/// Errors from loading or validating a lesson configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Perspective camera setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            position: [0.0, 0.0, 2.0],
        }
    }
}

/// Directional light setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub color: Color,
    pub intensity: f32,
    pub position: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            position: [-1.0, 1.0, 4.0],
        }
    }
}

/// Model colors and box dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Box width, height, depth.
    pub size: [f32; 3],
    /// Spinning cube color (basic lesson).
    pub cube_color: Color,
    /// Solid fill color (geometry lesson).
    pub fill_color: Color,
    /// Wireframe color (geometry lesson).
    pub line_color: Color,
    /// Segments per axis for the geometry lesson's box.
    pub segments: [u32; 3],
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            size: [1.0, 1.0, 1.0],
            cube_color: Color(0x044a88),
            fill_color: Color(0x515151),
            line_color: Color(0xffff00),
            segments: [2, 2, 2],
        }
    }
}

/// Everything a lesson reads at startup. Every field has a default, so a
/// config file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonConfig {
    pub container_selector: String,
    pub antialias: bool,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub model: ModelConfig,
}

impl Default for LessonConfig {
    fn default() -> Self {
        Self {
            container_selector: DEFAULT_CONTAINER.to_string(),
            antialias: true,
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

impl LessonConfig {
    /// Load from a `.json` file, or YAML for any other extension, then validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_yaml_str(&text)?
        };
        tracing::info!(path = %path.display(), "loaded lesson config");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                cam.fov_degrees
            )));
        }
        if !(cam.near > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.near must be positive, got {}",
                cam.near
            )));
        }
        if !(cam.far > cam.near) {
            return Err(ConfigError::Invalid(format!(
                "camera.far ({}) must exceed camera.near ({})",
                cam.far, cam.near
            )));
        }
        if !(self.light.intensity >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "light.intensity must not be negative, got {}",
                self.light.intensity
            )));
        }
        if self.model.size.iter().any(|s| !(*s > 0.0)) {
            return Err(ConfigError::Invalid(format!(
                "model.size must be positive, got {:?}",
                self.model.size
            )));
        }
        if self.container_selector.is_empty() {
            return Err(ConfigError::Invalid("container_selector is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_lesson_constants() {
        let config = LessonConfig::default();
        assert_eq!(config.container_selector, "#webgl-container");
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.camera.near, 0.1);
        assert_eq!(config.camera.far, 100.0);
        assert_eq!(config.camera.position, [0.0, 0.0, 2.0]);
        assert_eq!(config.light.color, Color(0xffffff));
        assert_eq!(config.light.intensity, 1.0);
        assert_eq!(config.light.position, [-1.0, 1.0, 4.0]);
        assert_eq!(config.model.cube_color, Color(0x044a88));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = LessonConfig::from_yaml_str("camera:\n  fov_degrees: 60\n").unwrap();
        assert_eq!(config.camera.fov_degrees, 60.0);
        assert_eq!(config.camera.far, 100.0);
        assert_eq!(config.model, ModelConfig::default());
    }

    #[test]
    fn yaml_roundtrip_of_defaults() {
        let yaml = LessonConfig::default().to_yaml().unwrap();
        assert_eq!(LessonConfig::from_yaml_str(&yaml).unwrap(), LessonConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_fov = LessonConfig::from_yaml_str("camera:\n  fov_degrees: 180\n");
        assert!(matches!(bad_fov, Err(ConfigError::Invalid(_))));
        let bad_clip = LessonConfig::from_json_str(r#"{"camera": {"near": 5.0, "far": 1.0}}"#);
        assert!(matches!(bad_clip, Err(ConfigError::Invalid(_))));
        let bad_size = LessonConfig::from_json_str(r#"{"model": {"size": [1.0, 0.0, 1.0]}}"#);
        assert!(matches!(bad_size, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("lesson.json");
        let mut f = std::fs::File::create(&json_path).unwrap();
        write!(f, r#"{{"light": {{"intensity": 0.5, "color": 16711680}}}}"#).unwrap();
        let config = LessonConfig::load(&json_path).unwrap();
        assert_eq!(config.light.intensity, 0.5);
        assert_eq!(config.light.color, Color(0xff0000));

        let yaml_path = dir.path().join("lesson.yaml");
        std::fs::write(&yaml_path, "antialias: false\nmodel:\n  segments: [3, 3, 3]\n").unwrap();
        let config = LessonConfig::load(&yaml_path).unwrap();
        assert!(!config.antialias);
        assert_eq!(config.model.segments, [3, 3, 3]);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LessonConfig::load(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
