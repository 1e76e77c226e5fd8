use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use skycube::DEFAULT_FACE_SIZE;
use skycube::SkyCube;
use skycube::cubemap::FACES;
use skycube::params::{LiveParams, ParamsUpdate, SkyParams};
use skycube::scene::Scene;
use skycube::scheduler::Regenerator;

/// How long a texture poll may park before answering with the current state.
const LONG_POLL: Duration = Duration::from_secs(25);

#[derive(Clone)]
struct AppState {
    params: Arc<LiveParams>,
    scene: Arc<Scene>,
    regen: Regenerator,
}

#[derive(Serialize)]
struct StatusResponse {
    params: SkyParams,
    busy: bool,
}

#[derive(Deserialize)]
struct TextureQuery {
    since: Option<u64>,
}

#[derive(Serialize)]
struct TextureResponse {
    revision: u64,
    size: usize,
    params: SkyParams,
    faces: Vec<Layer>,
}

#[derive(Serialize)]
struct Layer {
    name: String,
    data_url: String,
}

fn encode_png(rgba: &[u8], w: usize, h: usize) -> String {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder
        .write_image(rgba, w as u32, h as u32, image::ExtendedColorType::Rgba8)
        .expect("PNG encode failed");
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    format!("data:image/png;base64,{}", b64)
}

fn texture_response(revision: u64, cube: Option<Arc<SkyCube>>) -> TextureResponse {
    let Some(cube) = cube else {
        return TextureResponse {
            revision,
            size: 0,
            params: SkyParams::default(),
            faces: Vec::new(),
        };
    };
    let faces = FACES
        .iter()
        .zip(&cube.faces)
        .map(|(face, rgba)| Layer {
            name: face.name().to_string(),
            data_url: encode_png(rgba, cube.size, cube.size),
        })
        .collect();
    TextureResponse {
        revision,
        size: cube.size,
        params: cube.params,
        faces,
    }
}

/// The slider edge: apply the partial update, poke the scheduler, return at
/// once. Regeneration happens behind the 204.
async fn update_params(
    State(state): State<AppState>,
    Json(update): Json<ParamsUpdate>,
) -> StatusCode {
    state.params.apply(update);
    state.regen.notify_change();
    StatusCode::NO_CONTENT
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        params: state.params.snapshot(),
        busy: state.regen.is_busy(),
    })
}

/// Long poll for the next published texture after `since`. Answers right
/// away when a newer revision already exists, otherwise parks on the scene's
/// watch channel until a publish or the window elapses.
async fn texture(
    State(state): State<AppState>,
    Query(q): Query<TextureQuery>,
) -> Json<TextureResponse> {
    let since = q.since.unwrap_or(0);

    // Subscribe before reading so a publish between the two is not missed.
    let mut rx = state.scene.subscribe();
    let deadline = tokio::time::sleep(LONG_POLL);
    tokio::pin!(deadline);

    loop {
        let (rev, cube) = state.scene.current();
        if let Some(cube) = cube.filter(|_| rev > since) {
            let resp = tokio::task::spawn_blocking(move || texture_response(rev, Some(cube)))
                .await
                .unwrap();
            return Json(resp);
        }
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = &mut deadline => break,
        }
    }

    // Window elapsed with nothing newer; report the current state so the
    // client can poll again.
    let (rev, cube) = state.scene.current();
    let resp = tokio::task::spawn_blocking(move || texture_response(rev, cube))
        .await
        .unwrap();
    Json(resp)
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let size = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FACE_SIZE);

    let params = Arc::new(LiveParams::default());
    let scene = Arc::new(Scene::new());
    let regen = Regenerator::new(Arc::clone(&params), Arc::clone(&scene), size);

    // Render the initial texture so the first page load has a sky.
    regen.notify_change();

    let state = AppState {
        params,
        scene,
        regen,
    };

    let app = Router::new()
        .route("/api/params", post(update_params).get(status))
        .route("/api/texture", get(texture))
        .layer(CorsLayer::permissive())
        .with_state(state)
        .fallback_service(ServeDir::new("frontend"));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    eprintln!("skycube server at http://{} ({}x{} faces)", addr, size, size);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
