//! End-to-end tests for `POST /transcribe` against a stub engine.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use scribe_server::{ScribeServer, ServerConfig};
use scribe_transcription::{Transcriber, TranscriptionError, TranscriptionResult};
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "scribe-test-boundary";
const TONE_WAV: &[u8] = include_bytes!("fixtures/tone.wav");

// ─── Stub engine ───

#[derive(Clone, Copy)]
enum Reply {
    Text(&'static str),
    Fail(fn() -> TranscriptionError),
}

/// What the engine observed during one call.
#[derive(Debug, Clone)]
struct Seen {
    path: PathBuf,
    existed: bool,
    bytes: u64,
}

struct StubTranscriber {
    reply: Reply,
    seen: Mutex<Vec<Seen>>,
}

impl StubTranscriber {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcriber for StubTranscriber {
    fn name(&self) -> &str {
        "stub engine"
    }

    async fn transcribe(
        &self,
        audio_path: &Path,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let meta = std::fs::metadata(audio_path).ok();
        self.seen.lock().unwrap().push(Seen {
            path: audio_path.to_path_buf(),
            existed: meta.is_some(),
            bytes: meta.map_or(0, |m| m.len()),
        });
        match self.reply {
            Reply::Text(text) => Ok(TranscriptionResult {
                text: text.into(),
                language: Some("vi".into()),
            }),
            Reply::Fail(make) => Err(make()),
        }
    }
}

// ─── Helpers ───

struct Part<'a> {
    name: &'a str,
    file_name: Option<&'a str>,
    content_type: Option<&'a str>,
    data: &'a [u8],
}

impl<'a> Part<'a> {
    fn audio(file_name: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name: "audio",
            file_name: Some(file_name),
            content_type: Some(content_type),
            data,
        }
    }
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(file_name) = part.file_name {
            disposition.push_str(&format!("; filename=\"{file_name}\""));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(ct) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn config_in(dir: &Path) -> ServerConfig {
    ServerConfig {
        port: 0,
        upload_dir: Some(dir.to_path_buf()),
        ..ServerConfig::default()
    }
}

fn app(config: ServerConfig, engine: &Arc<StubTranscriber>) -> Router {
    let engine: Arc<dyn Transcriber> = engine.clone();
    ScribeServer::new(config, engine).router()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 1_000_000)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

// ─── Success ───

#[tokio::test]
async fn transcribes_wav_upload() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Text("  xin chào thế giới \n"));

    let req = upload_request(
        "/transcribe/",
        &[Part::audio("hello.wav", "audio/wav", TONE_WAV)],
    );
    let (status, body) = send(app(config_in(dir.path()), &engine), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["transcription"], "xin chào thế giới");
    assert_eq!(body["method"], "stub engine");
    assert!(body.get("error").is_none());

    let seen = engine.seen();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].existed);
    assert_eq!(seen[0].bytes, TONE_WAV.len() as u64);
    assert!(seen[0].path.starts_with(dir.path()));
    assert!(!seen[0].path.exists(), "temp file must be removed");
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn route_without_trailing_slash() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Text("ok"));

    let req = upload_request(
        "/transcribe",
        &[Part::audio("hello.wav", "audio/wav", TONE_WAV)],
    );
    let (status, body) = send(app(config_in(dir.path()), &engine), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transcription"], "ok");
}

#[tokio::test]
async fn temp_suffix_follows_declared_metadata() {
    let cases = [
        ("recording.webm", "audio/webm", "webm"),
        ("blob", "audio/mpeg", "mp3"),
        ("memo.M4A", "application/octet-stream", "m4a"),
        ("blob", "application/octet-stream", "wav"),
    ];
    for (file_name, content_type, expected) in cases {
        let dir = tempfile::tempdir().unwrap();
        let engine = StubTranscriber::new(Reply::Text("ok"));
        let req = upload_request(
            "/transcribe/",
            &[Part::audio(file_name, content_type, TONE_WAV)],
        );
        let (status, _) = send(app(config_in(dir.path()), &engine), req).await;
        assert_eq!(status, StatusCode::OK, "{file_name}");

        let seen = engine.seen();
        let ext = seen[0].path.extension().unwrap().to_str().unwrap();
        assert_eq!(ext, expected, "{file_name} / {content_type}");
    }
}

#[tokio::test]
async fn other_fields_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Text("ok"));

    let req = upload_request(
        "/transcribe/",
        &[
            Part {
                name: "csrfmiddlewaretoken",
                file_name: None,
                content_type: None,
                data: b"token",
            },
            Part::audio("recording.webm", "audio/webm", TONE_WAV),
        ],
    );
    let (status, _) = send(app(config_in(dir.path()), &engine), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(engine.seen().len(), 1);
}

#[tokio::test]
async fn concurrent_requests_use_distinct_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Text("ok"));
    let router = app(config_in(dir.path()), &engine);

    let a = send(
        router.clone(),
        upload_request("/transcribe/", &[Part::audio("a.wav", "audio/wav", TONE_WAV)]),
    );
    let b = send(
        router,
        upload_request("/transcribe/", &[Part::audio("b.wav", "audio/wav", TONE_WAV)]),
    );
    let ((sa, _), (sb, _)) = tokio::join!(a, b);
    assert_eq!(sa, StatusCode::OK);
    assert_eq!(sb, StatusCode::OK);

    let seen = engine.seen();
    assert_eq!(seen.len(), 2);
    assert_ne!(seen[0].path, seen[1].path);
    assert!(dir_is_empty(dir.path()));
}

// ─── Rejections ───

#[tokio::test]
async fn missing_file_field_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Text("unused"));

    let req = upload_request(
        "/transcribe/",
        &[Part {
            name: "note",
            file_name: None,
            content_type: None,
            data: b"hello",
        }],
    );
    let (status, body) = send(app(config_in(dir.path()), &engine), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No audio file provided");
    assert!(engine.seen().is_empty());
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn audio_text_field_without_filename_is_not_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Text("unused"));

    let req = upload_request(
        "/transcribe/",
        &[Part {
            name: "audio",
            file_name: None,
            content_type: None,
            data: b"not a file",
        }],
    );
    let (status, body) = send(app(config_in(dir.path()), &engine), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No audio file provided");
}

#[tokio::test]
async fn empty_file_input_is_missing_file() {
    // Browsers submit an untouched <input type="file"> with filename="".
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Text("unused"));

    let req = upload_request(
        "/transcribe/",
        &[Part {
            name: "audio",
            file_name: Some(""),
            content_type: Some("application/octet-stream"),
            data: b"",
        }],
    );
    let (status, body) = send(app(config_in(dir.path()), &engine), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No audio file provided");
    assert!(engine.seen().is_empty());
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn non_multipart_body_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Text("unused"));

    let req = Request::builder()
        .method("POST")
        .uri("/transcribe/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(app(config_in(dir.path()), &engine), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No audio file provided");
}

#[tokio::test]
async fn empty_file_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Text("unused"));

    let req = upload_request("/transcribe/", &[Part::audio("empty.wav", "audio/wav", b"")]);
    let (status, body) = send(app(config_in(dir.path()), &engine), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(engine.seen().is_empty());
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn oversized_upload_is_413() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Text("unused"));
    let config = ServerConfig {
        max_upload_bytes: 1024,
        ..config_in(dir.path())
    };

    let req = upload_request("/transcribe/", &[Part::audio("big.wav", "audio/wav", TONE_WAV)]);
    let (status, body) = send(app(config, &engine), req).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
    assert!(engine.seen().is_empty());
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn strict_mode_rejects_unknown_container() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Text("unused"));
    let config = ServerConfig {
        strict_formats: true,
        ..config_in(dir.path())
    };

    let req = upload_request(
        "/transcribe/",
        &[Part::audio("notes.txt", "text/plain", b"hello")],
    );
    let (status, body) = send(app(config, &engine), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Unsupported audio format")
    );
    assert_eq!(body["received_type"], "text/plain");
    assert_eq!(body["received_name"], "notes.txt");
    assert!(engine.seen().is_empty());
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn strict_mode_accepts_wav() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Text("ok"));
    let config = ServerConfig {
        strict_formats: true,
        ..config_in(dir.path())
    };

    let req = upload_request("/transcribe/", &[Part::audio("blob", "audio/x-wav", TONE_WAV)]);
    let (status, _) = send(app(config, &engine), req).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn lenient_mode_accepts_any_container() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Text("ok"));

    let req = upload_request(
        "/transcribe/",
        &[Part::audio("clip.opus", "audio/opus", TONE_WAV)],
    );
    let (status, _) = send(app(config_in(dir.path()), &engine), req).await;
    assert_eq!(status, StatusCode::OK);
}

// ─── Engine failures ───

#[tokio::test]
async fn missing_decoder_is_500_with_hint() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Fail(|| TranscriptionError::DecoderMissing {
        binary: "ffmpeg".into(),
    }));

    let req = upload_request(
        "/transcribe/",
        &[Part::audio("recording.webm", "audio/webm", TONE_WAV)],
    );
    let (status, body) = send(app(config_in(dir.path()), &engine), req).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("ffmpeg"));
    assert!(error.contains("install"));

    let seen = engine.seen();
    assert!(seen[0].existed);
    assert!(!seen[0].path.exists(), "temp file must be removed on failure");
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn unintelligible_audio_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Fail(|| TranscriptionError::Unintelligible));

    let req = upload_request("/transcribe/", &[Part::audio("hello.wav", "audio/wav", TONE_WAV)]);
    let (status, body) = send(app(config_in(dir.path()), &engine), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Could not understand the audio");
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn blank_transcript_is_unintelligible() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Text("   "));

    let req = upload_request("/transcribe/", &[Part::audio("hello.wav", "audio/wav", TONE_WAV)]);
    let (status, body) = send(app(config_in(dir.path()), &engine), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Could not understand the audio");
}

#[tokio::test]
async fn engine_error_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Fail(|| {
        TranscriptionError::AudioDecode("invalid data found when processing input".into())
    }));

    let req = upload_request("/transcribe/", &[Part::audio("bad.wav", "audio/wav", b"garbage")]);
    let (status, body) = send(app(config_in(dir.path()), &engine), req).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Transcription failed: ")
    );
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn get_is_method_not_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubTranscriber::new(Reply::Text("unused"));

    let req = Request::builder()
        .uri("/transcribe/")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(config_in(dir.path()), &engine), req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(engine.seen().is_empty());
}
