//! Voice-letter handlers: ingestion, queries, file delivery, AI proxying.

use crate::ai::{TextPrompt, TitlePrompt};
use crate::error::{ApiError, ApiResult};
use crate::handlers::members::MemberResponse;
use crate::handlers::parse_id;
use crate::state::AppState;
use axum::Json;
use axum::body::Body;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use murmur_db::models::{AudioRecord, NewAudio};
use murmur_db::repos::AudioRepo;
use murmur_storage::BlobStore;
use serde::Serialize;
use time::OffsetDateTime;

/// One voice letter as returned to clients.
#[derive(Debug, Serialize)]
pub struct AudioResponse {
    pub id: i64,
    pub title: String,
    pub owner: MemberResponse,
    pub receiver: MemberResponse,
    /// Opaque stored file name, resolvable through the file endpoint.
    pub audio: String,
    pub text: String,
    #[serde(rename = "processText")]
    pub process_text: String,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<AudioRecord> for AudioResponse {
    fn from(record: AudioRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            owner: record.owner.into(),
            receiver: record.receiver.into(),
            audio: record.file_name,
            text: record.text,
            process_text: record.process_text,
            created_at: record.created_at,
        }
    }
}

fn bad_multipart(e: MultipartError) -> ApiError {
    ApiError::BadRequest(format!("invalid multipart request: {e}"))
}

/// Text fields captured from the upload form.
#[derive(Default)]
struct LetterFields {
    owner_id: Option<i64>,
    receiver_id: Option<i64>,
    title: String,
    text: String,
    process_text: String,
}

/// Extension of the client-supplied filename, empty when absent.
fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_string())
        .unwrap_or_default()
}

/// Best-effort removal of a blob whose metadata row never materialized.
async fn discard_blob(state: &AppState, name: &str) {
    if let Err(e) = state.blobs.delete(name).await {
        tracing::warn!(name = %name, error = %e, "failed to remove blob after aborted ingestion");
    }
}

/// POST /audio - Ingest one voice letter.
///
/// Parts are consumed in arrival order; the file part is streamed to blob
/// storage as it is encountered, and the database row is only written after
/// the blob is durably in place.
pub async fn create_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<AudioResponse>> {
    let mut fields = LetterFields::default();
    let mut stored_name: Option<String> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(bad_multipart)? {
        let client_file_name = field.file_name().map(str::to_string);
        let field_name = field.name().map(str::to_string);

        if let Some(client_file_name) = client_file_name {
            let extension = file_extension(&client_file_name);
            let mut upload = state.blobs.put_stream(&extension).await?;
            loop {
                match field.chunk().await {
                    Ok(Some(chunk)) => {
                        if let Err(e) = upload.write(chunk).await {
                            let _ = upload.abort().await;
                            return Err(e.into());
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        // Client went away or the body is malformed: drop the
                        // partial write, nothing must reference it.
                        let _ = upload.abort().await;
                        return Err(bad_multipart(e));
                    }
                }
            }
            stored_name = Some(upload.finish().await?);
        } else if let Some(name) = field_name {
            let value = field.text().await.map_err(bad_multipart)?;
            match name.as_str() {
                "id" => fields.owner_id = value.parse().ok(),
                "receiverId" => fields.receiver_id = value.parse().ok(),
                "title" => fields.title = value,
                "text" => fields.text = value,
                "processText" => fields.process_text = value,
                _ => {}
            }
        }
    }

    let Some(file_name) = stored_name else {
        return Err(ApiError::BadRequest("file part is required".to_string()));
    };

    let (owner_id, receiver_id) = match (fields.owner_id, fields.receiver_id) {
        (Some(owner_id), Some(receiver_id)) => (owner_id, receiver_id),
        _ => {
            discard_blob(&state, &file_name).await;
            return Err(ApiError::BadRequest(
                "id and receiverId form fields are required and must be numeric".to_string(),
            ));
        }
    };

    if fields.title.chars().count() > murmur_core::MAX_NAME_LEN {
        discard_blob(&state, &file_name).await;
        return Err(ApiError::BadRequest(format!(
            "title exceeds {} characters",
            murmur_core::MAX_NAME_LEN
        )));
    }

    let new_audio = NewAudio {
        owner_id,
        receiver_id,
        title: fields.title,
        file_name: file_name.clone(),
        text: fields.text,
        process_text: fields.process_text,
    };

    match state.db.create_audio(&new_audio).await {
        Ok(record) => {
            tracing::info!(audio_id = record.id, owner_id, receiver_id, "voice letter stored");
            Ok(Json(record.into()))
        }
        Err(e) => {
            discard_blob(&state, &file_name).await;
            Err(e.into())
        }
    }
}

/// GET /audio/{id} - Voice-letter metadata.
pub async fn get_audio(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<AudioResponse>> {
    let id = parse_id(&raw_id)?;
    let record = state
        .db
        .get_audio(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("audio {id} not found")))?;
    Ok(Json(record.into()))
}

/// GET /audio/file/{id} - Stream the stored audio file.
pub async fn download_audio(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id(&raw_id)?;
    let record = state
        .db
        .get_audio(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("audio {id} not found")))?;

    // A row whose backing file was removed surfaces as NotFound here
    let stream = state.blobs.open(&record.file_name).await?;

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "audio/m4a".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", record.file_name),
            ),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

/// GET /audio/owner/{id} - Voice letters sent by a member.
pub async fn audios_by_owner(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Vec<AudioResponse>>> {
    let id = parse_id(&raw_id)?;
    let records = state.db.audios_by_owner(id).await?;
    Ok(Json(records.into_iter().map(AudioResponse::from).collect()))
}

/// GET /audio/receiver/{id} - Voice letters received by a member.
///
/// An empty result is a not-found condition, matching the contract clients
/// already rely on.
pub async fn audios_by_receiver(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Vec<AudioResponse>>> {
    let id = parse_id(&raw_id)?;
    let records = state.db.audios_by_receiver(id).await?;
    if records.is_empty() {
        return Err(ApiError::NotFound(format!(
            "no received voice letters for member {id}"
        )));
    }
    Ok(Json(records.into_iter().map(AudioResponse::from).collect()))
}

/// POST /audio/recommend/title - Proxy a title recommendation request.
pub async fn recommend_title(
    State(state): State<AppState>,
    Json(prompt): Json<TitlePrompt>,
) -> ApiResult<impl IntoResponse> {
    let suggestion = state.ai.recommend_title(&prompt).await?;
    Ok(Json(suggestion))
}

/// POST /audio/recommend/text - Proxy a content rewrite request.
pub async fn recommend_text(
    State(state): State<AppState>,
    Json(prompt): Json<TextPrompt>,
) -> ApiResult<impl IntoResponse> {
    let suggestion = state.ai.recommend_text(&prompt).await?;
    Ok(Json(suggestion))
}

/// POST /audio/text - Transcribe an uploaded audio file via the AI service.
pub async fn transcribe_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut audio: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let file_name = field.file_name().map(str::to_string);
        if field.name() == Some("file") {
            if let Some(file_name) = file_name {
                let data = field.bytes().await.map_err(bad_multipart)?;
                audio = Some((file_name, data.to_vec()));
            }
        }
    }

    let (file_name, data) =
        audio.ok_or_else(|| ApiError::NotFound("no audio file in request".to_string()))?;

    let transcription = state.ai.transcribe(&file_name, data).await?;
    Ok(Json(transcription))
}
