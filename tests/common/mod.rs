#![allow(dead_code)]

use httpmock::prelude::*;
use manim_studio::config::StudioConfig;
use manim_studio::{GeminiClient, ManimRenderer, Studio, StudioServer};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const SCENE_CODE: &str =
    "from manim import *\n\nclass Sunrise(Scene):\n    def construct(self):\n        self.play(Create(Circle()))\n";

/// Stands in for the manim CLI: writes `<Scene>.mp4` where manim would.
/// Arguments: <flag> <file> <Scene> --media_dir <dir>
const FAKE_MANIM: &str = r#"#!/bin/sh
stem=$(basename "$2" .py)
case "$1" in
  -pql) res=480p15 ;;
  -pqm) res=720p30 ;;
  *) res=1080p60 ;;
esac
mkdir -p "$5/videos/$stem/$res"
echo "$1 $3" > "$5/videos/$stem/$res/$3.mp4"
"#;

const FAILING_MANIM: &str = "#!/bin/sh\necho 'NameError: Circel is not defined' >&2\nexit 1\n";

const SLOW_MANIM: &str = "#!/bin/sh\nsleep 5\n";

fn write_script(dir: &Path, name: &str, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

#[derive(Clone, Copy)]
pub enum ManimBehaviour {
    Succeeds,
    Fails,
    Hangs,
}

pub fn studio_config(dir: &TempDir, gemini: &MockServer, manim: ManimBehaviour) -> StudioConfig {
    let script = match manim {
        ManimBehaviour::Succeeds => FAKE_MANIM,
        ManimBehaviour::Fails => FAILING_MANIM,
        ManimBehaviour::Hangs => SLOW_MANIM,
    };

    let mut config = StudioConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.server.templates_dir = dir.path().join("templates").to_string_lossy().into_owned();
    config.gemini.base_url = gemini.url("/v1beta/models");
    config.render.command = write_script(dir.path(), "manim", script);
    config.render.static_dir = dir.path().join("static").to_string_lossy().into_owned();
    config.render.scenes_dir = dir.path().join("scenes").to_string_lossy().into_owned();
    config
}

pub fn configured_studio(config: &StudioConfig) -> Studio {
    let client = GeminiClient::new(&config.gemini, "test-key".to_string()).unwrap();
    let renderer = ManimRenderer::new(&config.render, config.max_concurrent_renders());
    Studio::new(Some(Arc::new(client)), Arc::new(renderer))
}

pub fn unconfigured_studio(config: &StudioConfig) -> Studio {
    let renderer = ManimRenderer::new(&config.render, 1);
    Studio::new(None, Arc::new(renderer))
}

pub struct RunningServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<manim_studio::Result<()>>,
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}

pub async fn spawn_server(studio: Studio, config: &StudioConfig) -> RunningServer {
    let listener = TcpListener::bind(config.bind_address()).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    let server = StudioServer::new(Arc::new(studio), config);
    let handle = tokio::spawn(server.serve(listener, async move {
        let _ = rx.await;
    }));

    RunningServer {
        addr,
        shutdown: Some(tx),
        handle,
    }
}

fn gemini_answer(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }]
    })
}

/// Mocks every prompt stage, keyed on a phrase unique to each template.
pub async fn mock_all_stages(server: &MockServer) {
    let answers = [
        ("creative director", "A small circle rises over a dark horizon and becomes a sun."),
        (
            "visual designer",
            "Here is the theme:\n{\"palette\": [\"#ffb703\", \"#fb8500\"], \"background_color\": \"#023047\", \"font\": \"Inter\", \"animation_style\": \"Smooth\"}",
        ),
        (
            "copywriter",
            "```json\n{\"title\": \"Sunrise\", \"description\": \"A circle becomes a star.\"}\n```",
        ),
        ("lead Manim developer", SCENE_CODE),
        ("Brainstorm", "[\"Fourier epicycles\", \"Sorting bars\", \"Lorenz attractor\"]"),
        ("teaching assistant", "### Setup\nA circle is drawn."),
    ];

    for (marker, answer) in answers {
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-1.5-flash:generateContent")
                    .query_param("key", "test-key")
                    .body_contains(marker);
                then.status(200).json_body(gemini_answer(answer));
            })
            .await;
    }
}
