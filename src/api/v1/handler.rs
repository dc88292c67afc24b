use super::error::*;
use crate::application_port::*;
use crate::domain_model::{ChirpId, SortOrder, UserId, UserView};
use crate::logger::*;
use crate::server::HitCounter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{self, reject};

const USER_UPGRADED_EVENT: &str = "user.upgraded";

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

fn json_with_status<T: Serialize>(data: T, status: StatusCode) -> impl warp::Reply {
    warp::reply::with_status(warp::reply::json(&ApiResponse::ok(data)), status)
}

fn no_content() -> impl warp::Reply {
    warp::reply::with_status(warp::reply(), StatusCode::NO_CONTENT)
}

pub async fn healthz() -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::with_header(
        "OK",
        "content-type",
        "text/plain; charset=utf-8",
    ))
}

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

impl From<CredentialsRequest> for CredentialsInput {
    fn from(request: CredentialsRequest) -> Self {
        CredentialsInput {
            email: request.email,
            password: request.password,
        }
    }
}

pub async fn create_user(
    request: CredentialsRequest,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = user_service
        .create_user(request.into())
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(json_with_status(UserView::from(&user), StatusCode::CREATED))
}

pub async fn update_user(
    principal: UserId,
    request: CredentialsRequest,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = user_service
        .update_user(principal, request.into())
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(json_with_status(UserView::from(&user), StatusCode::OK))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    #[serde(flatten)]
    user: UserView,
    token: AccessToken,
    refresh_token: RefreshToken,
}

pub async fn login(
    request: LoginRequest,
    session_service: Arc<dyn SessionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = session_service
        .login(LoginInput {
            email: request.email,
            password: request.password,
        })
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let response = LoginResponse {
        user: result.principal,
        token: result.access_token,
        refresh_token: result.refresh_token,
    };
    Ok(json_with_status(response, StatusCode::OK))
}

#[derive(Debug, Serialize)]
struct RefreshResponse {
    token: AccessToken,
}

pub async fn refresh(
    authorization: Option<String>,
    session_service: Arc<dyn SessionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let refresh_token = bearer_token(authorization.as_deref())
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let token = session_service
        .refresh(refresh_token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(json_with_status(RefreshResponse { token }, StatusCode::OK))
}

pub async fn revoke(
    authorization: Option<String>,
    session_service: Arc<dyn SessionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let refresh_token = bearer_token(authorization.as_deref())
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    session_service
        .revoke(refresh_token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(no_content())
}

#[derive(Debug, Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

pub async fn create_chirp(
    principal: UserId,
    request: CreateChirpRequest,
    chirp_service: Arc<dyn ChirpService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let chirp = chirp_service
        .create(principal, &request.body)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(json_with_status(chirp, StatusCode::CREATED))
}

#[derive(Debug, Deserialize)]
pub struct ChirpListQuery {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

pub async fn list_chirps(
    query: ChirpListQuery,
    chirp_service: Arc<dyn ChirpService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let author = query
        .author_id
        .as_deref()
        .map(str::parse::<UserId>)
        .transpose()
        .map_err(|_| reject::custom(ApiErrorCode::InvalidInput))?;
    let sort = query
        .sort
        .as_deref()
        .map(str::parse::<SortOrder>)
        .transpose()
        .map_err(|_| reject::custom(ApiErrorCode::InvalidInput))?
        .unwrap_or_default();

    let chirps = chirp_service
        .list(author, sort)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(json_with_status(chirps, StatusCode::OK))
}

pub async fn get_chirp(
    chirp_id: ChirpId,
    chirp_service: Arc<dyn ChirpService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let chirp = chirp_service
        .get(chirp_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(json_with_status(chirp, StatusCode::OK))
}

/// The caller is already authenticated; the chirp must exist and belong to them.
pub async fn delete_chirp(
    chirp_id: ChirpId,
    principal: UserId,
    chirp_service: Arc<dyn ChirpService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let chirp = chirp_service
        .get(chirp_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    require_owner(principal, chirp.user_id)
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    chirp_service
        .delete(chirp_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(no_content())
}

#[derive(Debug, Deserialize)]
pub struct PolkaWebhookRequest {
    pub event: String,
    pub data: PolkaWebhookData,
}

#[derive(Debug, Deserialize)]
pub struct PolkaWebhookData {
    pub user_id: UserId,
}

pub async fn polka_webhook(
    request: PolkaWebhookRequest,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if request.event != USER_UPGRADED_EVENT {
        debug!(event = %request.event, "ignoring webhook event");
        return Ok(no_content());
    }

    user_service
        .upgrade(request.data.user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(no_content())
}

pub async fn metrics(hit_counter: Arc<HitCounter>) -> Result<impl warp::Reply, warp::Rejection> {
    let page = format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>\n",
        hit_counter.count()
    );
    Ok(warp::reply::html(page))
}

pub async fn reset(
    is_dev: bool,
    hit_counter: Arc<HitCounter>,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if !is_dev {
        warn!("reset refused outside the dev platform");
        return Err(reject::custom(ApiErrorCode::Forbidden));
    }

    hit_counter.reset();
    user_service
        .reset()
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    info!("hit counter and users reset");
    Ok(warp::reply::with_header(
        "Hits reset to 0 and database reset to initial state.",
        "content-type",
        "text/plain; charset=utf-8",
    ))
}
