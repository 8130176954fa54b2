//! Request and response bodies exchanged with the authority.
//!
//! Every non-success response carries an [`ErrorBody`]; success responses for
//! mutations carry a human-readable [`MessageBody`] that the console ignores.

use serde::{Deserialize, Serialize};

use crate::ids::{OverlayId, StreamId};

/// MIME type a native media surface must accept to play the manifest without
/// an adaptive-streaming client.
pub const HLS_MIME_TYPE: &str = "application/vnd.apple.mpegurl";

/// Body of `POST /start-stream`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartStreamRequest {
    /// Source feed handed to the ingestion pipeline.
    pub rtsp_url: String,
}

/// Success body of `POST /start-stream`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartStreamResponse {
    /// Identifier of the freshly started stream.
    pub stream_id: StreamId,
    /// Informational message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Success body of `POST /overlays`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOverlayResponse {
    /// Identifier assigned to the new overlay.
    pub overlay_id: OverlayId,
    /// Informational message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Success body of update and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// Informational message.
    pub message: String,
}

/// Failure body of every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Reason reported by the authority.
    pub error: String,
}

/// Endpoint path segments, relative to the authority's base URL.
///
/// Ids are never formatted into these; clients append them as separately
/// escaped path segments.
pub mod routes {
    use crate::ids::StreamId;

    /// Start a stream.
    pub const START_STREAM: &str = "start-stream";

    /// Overlay collection. A single overlay, or a stream's listing, is one
    /// segment below it.
    pub const OVERLAYS: &str = "overlays";

    /// Directory of adaptive-streaming manifests.
    pub const HLS: &str = "hls";

    /// File name of a stream's manifest inside [`HLS`].
    pub fn manifest_file(stream_id: &StreamId) -> String {
        format!("{stream_id}.m3u8")
    }
}
