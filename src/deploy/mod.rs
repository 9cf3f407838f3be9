//! Container build recipe for the service.
//!
//! The runtime image needs the Python `manim` package plus FFmpeg, LaTeX and
//! the Cairo/Pango stack, since renders shell out to the `manim` CLI. Two
//! base variants exist: a full Debian image with a complete TeX install, and
//! a slim image with only the TeX packages Manim's `Tex`/`MathTex` use.

use crate::config::StudioConfig;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ImageVariant {
    Full,
    Slim,
}

impl ImageVariant {
    pub fn base_image(&self) -> &'static str {
        match self {
            ImageVariant::Full => "python:3.10-bullseye",
            ImageVariant::Slim => "python:3.10-slim",
        }
    }

    /// Builder with the same Debian release as the base, so the binary's
    /// glibc requirement is met at runtime.
    pub fn builder_image(&self) -> &'static str {
        match self {
            ImageVariant::Full => "rust:1-bullseye",
            ImageVariant::Slim => "rust:1-slim-bookworm",
        }
    }

    pub fn latex_packages(&self) -> &'static [&'static str] {
        match self {
            ImageVariant::Full => &["texlive-full"],
            ImageVariant::Slim => &[
                "texlive-latex-base",
                "texlive-latex-extra",
                "texlive-fonts-recommended",
                "texlive-science",
                "tipa",
                "dvisvgm",
                "cm-super",
            ],
        }
    }

    fn graphics_packages(&self) -> &'static [&'static str] {
        match self {
            ImageVariant::Full => &[
                "libcairo2-dev",
                "libjpeg-dev",
                "libgif-dev",
                "libpango1.0-dev",
                "libgl1-mesa-glx",
            ],
            // Slim has no compiler for pycairo/manimpango wheels that need one.
            ImageVariant::Slim => &[
                "build-essential",
                "pkg-config",
                "libcairo2-dev",
                "libjpeg-dev",
                "libgif-dev",
                "libpango1.0-dev",
                "libgl1",
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerRecipe {
    pub variant: ImageVariant,
    pub port: u16,
    pub workers: usize,
    pub timeout_seconds: u64,
    pub python_packages: Vec<String>,
    pub binary_name: String,
}

impl ContainerRecipe {
    pub fn from_config(variant: ImageVariant, config: &StudioConfig) -> Self {
        Self {
            variant,
            port: config.server.port,
            workers: config.server.workers,
            timeout_seconds: config.server.timeout_seconds,
            python_packages: vec!["manim".to_string()],
            binary_name: env!("CARGO_PKG_NAME").to_string(),
        }
    }

    pub fn system_packages(&self) -> Vec<&'static str> {
        let mut packages = vec!["ffmpeg"];
        packages.extend_from_slice(self.variant.latex_packages());
        packages.extend_from_slice(self.variant.graphics_packages());
        packages
    }

    /// Process entry point, as exec-form arguments.
    pub fn entrypoint(&self) -> Vec<String> {
        vec![
            self.binary_name.clone(),
            "serve".to_string(),
            "--host".to_string(),
            "0.0.0.0".to_string(),
            "--port".to_string(),
            self.port.to_string(),
            "--workers".to_string(),
            self.workers.to_string(),
            "--timeout".to_string(),
            self.timeout_seconds.to_string(),
        ]
    }

    pub fn render_dockerfile(&self) -> String {
        let mut out = String::new();
        let bin = &self.binary_name;

        // Writing to a String cannot fail.
        let _ = writeln!(out, "FROM {} AS builder", self.variant.builder_image());
        let _ = writeln!(out, "WORKDIR /build");
        let _ = writeln!(out, "COPY Cargo.toml Cargo.lock ./");
        let _ = writeln!(out, "COPY src ./src");
        let _ = writeln!(out, "COPY templates ./templates");
        let _ = writeln!(out, "RUN cargo build --release --bin {}", bin);
        let _ = writeln!(out);
        let _ = writeln!(out, "FROM {}", self.variant.base_image());
        let _ = writeln!(out, "ENV PYTHONDONTWRITEBYTECODE=1 PYTHONUNBUFFERED=1");
        let _ = writeln!(out, "RUN apt-get update && apt-get install -y --no-install-recommends \\");
        for package in self.system_packages() {
            let _ = writeln!(out, "    {} \\", package);
        }
        let _ = writeln!(out, " && rm -rf /var/lib/apt/lists/*");
        let _ = writeln!(
            out,
            "RUN pip install --no-cache-dir {}",
            self.python_packages.join(" ")
        );
        let _ = writeln!(out, "WORKDIR /app");
        let _ = writeln!(
            out,
            "COPY --from=builder /build/target/release/{bin} /usr/local/bin/{bin}"
        );
        let _ = writeln!(out, "COPY templates ./templates");
        let _ = writeln!(out, "EXPOSE {}", self.port);

        let cmd = self
            .entrypoint()
            .iter()
            .map(|arg| format!("\"{}\"", arg))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "CMD [{}]", cmd);
        out
    }
}
