//! Member handlers: lookup, login, follow-graph management.

use crate::error::{ApiError, ApiResult};
use crate::handlers::parse_id;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use murmur_db::models::{MemberRow, MemberSummary, MemberWithFollows};
use murmur_db::repos::{FollowRepo, MemberRepo};
use serde::{Deserialize, Serialize};

/// Public identity snippet of a member.
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: i64,
    pub username: String,
}

impl From<MemberSummary> for MemberResponse {
    fn from(summary: MemberSummary) -> Self {
        Self {
            id: summary.id,
            username: summary.username,
        }
    }
}

impl From<MemberRow> for MemberResponse {
    fn from(row: MemberRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
        }
    }
}

/// Login response: the member plus its resolved follow lists.
#[derive(Debug, Serialize)]
pub struct MemberWithFollowsResponse {
    pub id: i64,
    pub username: String,
    pub following: Vec<MemberResponse>,
    pub followers: Vec<MemberResponse>,
}

impl From<MemberWithFollows> for MemberWithFollowsResponse {
    fn from(member: MemberWithFollows) -> Self {
        Self {
            id: member.id,
            username: member.username,
            following: member.following.into_iter().map(Into::into).collect(),
            followers: member.followers.into_iter().map(Into::into).collect(),
        }
    }
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub id: i64,
    pub password: String,
}

/// Follow creation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFollowRequest {
    pub follower_id: i64,
    pub followee_id: i64,
}

/// GET /member/{id} - Member identity lookup.
pub async fn get_member(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<MemberResponse>> {
    let id = parse_id(&raw_id)?;
    let member = state
        .db
        .get_member(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("member {id} not found")))?;
    Ok(Json(member.into()))
}

/// POST /member - Login by id and password.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<MemberWithFollowsResponse>> {
    let member = state.db.login(req.id, &req.password).await?;
    Ok(Json(member.into()))
}

/// POST /member/follow - Create a follow relationship.
///
/// The store inserts both directions of the edge; this handler only
/// validates the ids before delegating.
pub async fn create_follow(
    State(state): State<AppState>,
    Json(req): Json<CreateFollowRequest>,
) -> ApiResult<StatusCode> {
    if req.follower_id <= 0 || req.followee_id <= 0 {
        return Err(ApiError::BadRequest(
            "followerId and followeeId must be positive member ids".to_string(),
        ));
    }

    state
        .db
        .create_follow(req.follower_id, req.followee_id)
        .await?;

    tracing::info!(
        follower_id = req.follower_id,
        followee_id = req.followee_id,
        "follow relationship created"
    );

    Ok(StatusCode::CREATED)
}
