//! Renders scenes by running the `manim` CLI.
//!
//! Each render writes its source to a uniquely named file, so concurrent
//! requests never overwrite each other's scene. Manim then lays its output
//! out as `<media_dir>/videos/<file stem>/<resolution>/<Scene>.mp4`.

use crate::config::RenderConfig;
use crate::domain::model::{Quality, RenderedVideo};
use crate::domain::ports::SceneRenderer;
use crate::utils::error::{Result, StudioError};
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tokio::process::Command;
use tokio::sync::Semaphore;

static SCENE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"class (\w+)\(Scene\):").expect("scene class pattern"));

/// Name of the first class deriving directly from `Scene`.
pub fn find_scene_name(code: &str) -> Result<String> {
    SCENE_CLASS
        .captures(code)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| StudioError::RenderError {
            message: "Could not find a Scene class in the generated code.".to_string(),
        })
}

pub struct ManimRenderer {
    command: String,
    static_dir: PathBuf,
    scenes_dir: PathBuf,
    public_prefix: String,
    keep_sources: bool,
    permits: Arc<Semaphore>,
}

impl ManimRenderer {
    pub fn new(config: &RenderConfig, max_concurrent: usize) -> Self {
        Self {
            command: config.command.clone(),
            static_dir: PathBuf::from(&config.static_dir),
            scenes_dir: PathBuf::from(&config.scenes_dir),
            public_prefix: "static".to_string(),
            keep_sources: config.keep_sources,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    fn new_source_path(&self) -> PathBuf {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.scenes_dir.join(format!("scene_{}.py", &id[..12]))
    }

    /// Finds the rendered mp4 for `scene_name` and builds its public path.
    pub async fn locate_video(
        &self,
        source_path: &Path,
        scene_name: &str,
        quality: Quality,
    ) -> Result<RenderedVideo> {
        let stem = source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let res_folder = quality.resolution_folder();
        let search_dir = self.static_dir.join("videos").join(stem).join(res_folder);

        let not_found = || StudioError::VideoNotFound {
            search_dir: search_dir.display().to_string(),
        };

        let mut entries = tokio::fs::read_dir(&search_dir)
            .await
            .map_err(|_| not_found())?;
        let mut candidates = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            if let Ok(name) = entry.file_name().into_string() {
                if name.ends_with(".mp4") && name.contains(scene_name) {
                    candidates.push(name);
                }
            }
        }
        candidates.sort();

        let file_name = candidates.into_iter().next().ok_or_else(not_found)?;

        Ok(RenderedVideo {
            scene_name: scene_name.to_string(),
            file_path: search_dir.join(&file_name),
            public_path: format!(
                "{}/videos/{}/{}/{}",
                self.public_prefix, stem, res_folder, file_name
            ),
        })
    }
}

#[async_trait]
impl SceneRenderer for ManimRenderer {
    async fn render(&self, code: &str, quality: Quality) -> Result<RenderedVideo> {
        let scene_name = find_scene_name(code)?;

        tokio::fs::create_dir_all(&self.scenes_dir).await?;
        tokio::fs::create_dir_all(&self.static_dir).await?;
        let source_path = self.new_source_path();
        tokio::fs::write(&source_path, code).await?;

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| StudioError::RenderError {
                message: format!("render queue closed: {}", e),
            })?;

        tracing::debug!(
            "Running {} {} {} {} --media_dir {}",
            self.command,
            quality.manim_flag(),
            source_path.display(),
            scene_name,
            self.static_dir.display()
        );

        let output = Command::new(&self.command)
            .arg(quality.manim_flag())
            .arg(&source_path)
            .arg(&scene_name)
            .arg("--media_dir")
            .arg(&self.static_dir)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| StudioError::RenderError {
                message: format!("Failed to start {}: {}", self.command, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!("--- MANIM ERROR ---\n{}\n--- END MANIM ERROR ---", stderr.trim());
            return Err(StudioError::RenderError {
                message: "Manim rendering failed. Check console for details.".to_string(),
            });
        }

        let rendered = self
            .locate_video(&source_path, &scene_name, quality)
            .await?;

        if !self.keep_sources {
            if let Err(e) = tokio::fs::remove_file(&source_path).await {
                tracing::warn!("Could not remove {}: {}", source_path.display(), e);
            }
        }

        Ok(rendered)
    }
}
