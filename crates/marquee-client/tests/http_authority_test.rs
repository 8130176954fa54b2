//! HTTP authority tests.
//!
//! Runs the client against a mock authority speaking the JSON API, checking
//! request shapes, status mapping, and the full start-create-toggle flow
//! through the sequential controller.

use marquee_client::{Authority, ClientConfig, Controller, HttpAuthority, OverlayError};
use marquee_core::ValidationError;
use marquee_proto::{NewOverlay, OverlayId, OverlayPatch, Position, Size, StreamId};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

fn authority(server: &MockServer) -> HttpAuthority {
    HttpAuthority::new(ClientConfig::new(&server.uri()).unwrap()).unwrap()
}

async fn mount_stream_start(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/start-stream"))
        .and(body_json(json!({"rtsp_url": "rtsp://cam1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Stream started", "stream_id": "s1"})),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/overlays/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn start_stream_posts_source_url() {
    let server = MockServer::start().await;
    mount_stream_start(&server).await;

    let stream_id = authority(&server).start_stream("rtsp://cam1").await.unwrap();
    assert_eq!(stream_id, StreamId::new("s1"));
}

#[tokio::test]
async fn create_sends_full_descriptor() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/overlays"))
        .and(body_json(json!({
            "stream_id": "s1",
            "text": "ALERT",
            "position": {"top": 10, "left": 10},
            "size": {"width": 100, "height": 50}
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"message": "Overlay created", "overlay_id": "o1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let overlay = NewOverlay {
        stream_id: StreamId::new("s1"),
        text: "ALERT".into(),
        position: Position::new(10, 10),
        size: Size::new(100, 50),
    };
    let id = authority(&server).create_overlay(&overlay).await.unwrap();
    assert_eq!(id, OverlayId::new("o1"));
}

#[tokio::test]
async fn update_sends_only_present_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/overlays/o1"))
        .and(body_json(json!({"visible": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Overlay updated"})))
        .expect(1)
        .mount(&server)
        .await;

    authority(&server)
        .update_overlay(&OverlayId::new("o1"), &OverlayPatch::visibility(false))
        .await
        .unwrap();
}

#[tokio::test]
async fn error_body_becomes_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/overlays/o9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Overlay not found"})))
        .mount(&server)
        .await;

    let err = authority(&server).delete_overlay(&OverlayId::new("o9")).await.unwrap_err();
    assert_eq!(err, OverlayError::Remote { status: 404, message: "Overlay not found".into() });
}

#[tokio::test]
async fn bodiless_failure_uses_status_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start-stream"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = authority(&server).start_stream("rtsp://cam1").await.unwrap_err();
    assert_eq!(
        err,
        OverlayError::Remote { status: 500, message: "Internal Server Error".into() }
    );
}

#[tokio::test]
async fn malformed_success_body_is_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/overlays/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = authority(&server).list_overlays(&StreamId::new("s1")).await.unwrap_err();
    assert!(matches!(err, OverlayError::Remote { status: 200, .. }), "got {err:?}");
}

#[tokio::test]
async fn unreachable_authority_is_network_error() {
    // Port 9 (discard) on loopback has no listener in the test environment.
    let config = ClientConfig::new("http://127.0.0.1:9").unwrap();
    let err = HttpAuthority::new(config).unwrap().start_stream("rtsp://cam1").await.unwrap_err();
    assert!(matches!(err, OverlayError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn controller_runs_alert_flow() {
    let server = MockServer::start().await;
    mount_stream_start(&server).await;
    Mock::given(method("POST"))
        .and(path("/overlays"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"message": "Overlay created", "overlay_id": "o1"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/overlays/o1"))
        .and(body_json(json!({"visible": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Overlay updated"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = Controller::new(authority(&server));
    let stream_id = controller.start_stream("rtsp://cam1").await.unwrap();
    assert_eq!(stream_id, StreamId::new("s1"));
    assert_eq!(controller.playback(), Some(&StreamId::new("s1")));
    assert!(controller.console().store().is_empty());

    let id = controller.create("ALERT", Position::new(10, 10), Size::new(100, 50)).await.unwrap();
    assert_eq!(id, OverlayId::new("o1"));
    assert_eq!(controller.render().len(), 1);

    let visible = controller.toggle_visibility(&id).await.unwrap();
    assert!(!visible);
    assert!(controller.render().is_empty());
    assert!(!controller.console().store().overlays()[0].visible);
}

#[tokio::test]
async fn validation_failure_makes_no_request() {
    let server = MockServer::start().await;
    mount_stream_start(&server).await;

    let mut controller = Controller::new(authority(&server));
    controller.start_stream("rtsp://cam1").await.unwrap();
    let before = server.received_requests().await.unwrap().len();

    let err = controller.create("", Position::new(0, 0), Size::new(10, 10)).await.unwrap_err();
    assert_eq!(err, OverlayError::Validation(ValidationError::EmptyText));

    let err = controller.start_stream("").await.unwrap_err();
    assert_eq!(err, OverlayError::Validation(ValidationError::EmptyUrl));

    assert_eq!(server.received_requests().await.unwrap().len(), before);
    assert!(controller.console().store().is_empty());
}

#[tokio::test]
async fn ids_are_sent_as_one_escaped_segment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/overlays/o1%23x"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Overlay not found"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/overlays/o1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Overlay deleted"})))
        .expect(0)
        .mount(&server)
        .await;

    let authority = authority(&server);
    let err = authority.delete_overlay(&OverlayId::new("o1#x")).await.unwrap_err();
    assert_eq!(err, OverlayError::Remote { status: 404, message: "Overlay not found".into() });

    let err = authority.delete_overlay(&OverlayId::new("../start-stream")).await.unwrap_err();
    assert_eq!(err.kind(), "remote");

    let paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect();
    assert_eq!(paths, ["/overlays/o1%23x", "/overlays/..%2Fstart-stream"]);
}

#[tokio::test]
async fn dot_ids_are_rejected_without_a_request() {
    let server = MockServer::start().await;
    let authority = authority(&server);

    let err = authority.delete_overlay(&OverlayId::new("..")).await.unwrap_err();
    assert_eq!(err, OverlayError::Validation(ValidationError::InvalidId("..".into())));
    let err = authority.list_overlays(&StreamId::new(".")).await.unwrap_err();
    assert_eq!(err, OverlayError::Validation(ValidationError::InvalidId(".".into())));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn mistyped_id_leaves_held_overlay_in_place() {
    let server = MockServer::start().await;
    mount_stream_start(&server).await;
    Mock::given(method("POST"))
        .and(path("/overlays"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"message": "Overlay created", "overlay_id": "o1"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/overlays/o1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Overlay deleted"})))
        .expect(0)
        .mount(&server)
        .await;

    let mut controller = Controller::new(authority(&server));
    controller.start_stream("rtsp://cam1").await.unwrap();
    controller.create("ALERT", Position::new(10, 10), Size::new(100, 50)).await.unwrap();

    let err = controller.delete(&OverlayId::new("o1#x")).await.unwrap_err();
    assert_eq!(err.kind(), "remote");
    assert!(controller.console().store().contains(&OverlayId::new("o1")));
    assert_eq!(controller.render().len(), 1);
}
