use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Render quality. Names match exactly; anything else renders at `Best`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Fast,
    Good,
    #[default]
    Best,
}

impl Quality {
    pub fn from_name(value: Option<&str>) -> Self {
        match value {
            Some("fast") => Quality::Fast,
            Some("good") => Quality::Good,
            _ => Quality::Best,
        }
    }

    pub fn manim_flag(&self) -> &'static str {
        match self {
            Quality::Fast => "-pql",
            Quality::Good => "-pqm",
            Quality::Best => "-pqh",
        }
    }

    /// Folder manim writes into under `videos/<scene file>/`.
    pub fn resolution_folder(&self) -> &'static str {
        match self {
            Quality::Fast => "480p15",
            Quality::Good => "720p30",
            Quality::Best => "1080p60",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Fast => "fast",
            Quality::Good => "good",
            Quality::Best => "best",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_ASPECT_RATIO: &str = "landscape";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(rename = "aspectRatio", default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: None,
            quality: None,
        }
    }

    pub fn aspect_ratio(&self) -> &str {
        self.aspect_ratio.as_deref().unwrap_or(DEFAULT_ASPECT_RATIO)
    }

    pub fn quality(&self) -> Quality {
        Quality::from_name(self.quality.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub video_path: String,
    pub code: String,
    pub meta: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct RenderedVideo {
    pub scene_name: String,
    pub file_path: PathBuf,
    /// Forward-slash path the HTTP surface serves the file under.
    pub public_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_mapping() {
        assert_eq!(Quality::Fast.manim_flag(), "-pql");
        assert_eq!(Quality::Good.resolution_folder(), "720p30");
        assert_eq!(Quality::Best.resolution_folder(), "1080p60");
    }

    #[test]
    fn test_unknown_quality_falls_back_to_best() {
        assert_eq!(Quality::from_name(Some("ultra")), Quality::Best);
        assert_eq!(Quality::from_name(None), Quality::Best);
        assert_eq!(Quality::from_name(Some("fast")), Quality::Fast);
    }

    #[test]
    fn test_quality_names_are_case_sensitive() {
        assert_eq!(Quality::from_name(Some(" FAST ")), Quality::Best);
        assert_eq!(Quality::from_name(Some("Good")), Quality::Best);
    }

    #[test]
    fn test_generate_request_defaults() {
        let request: GenerateRequest =
            serde_json::from_value(serde_json::json!({"prompt": "a circle"})).unwrap();
        assert_eq!(request.aspect_ratio(), "landscape");
        assert_eq!(request.quality(), Quality::Best);

        let request: GenerateRequest = serde_json::from_value(
            serde_json::json!({"prompt": "a circle", "aspectRatio": "portrait", "quality": "good"}),
        )
        .unwrap();
        assert_eq!(request.aspect_ratio(), "portrait");
        assert_eq!(request.quality(), Quality::Good);
    }
}
