use super::error::*;
use super::handler;
use crate::application_port::AuthorizationGate;
use crate::domain_model::{ChirpId, UserId};
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, http, reject};

const JSON_BODY_LIMIT: u64 = 16 * 1024;

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let healthz = warp::get()
        .and(warp::path!("api" / "healthz"))
        .and_then(handler::healthz);

    let create_user = warp::post()
        .and(warp::path!("api" / "users"))
        .and(json_body())
        .and(with(server.user_service.clone()))
        .and_then(handler::create_user);

    let update_user = warp::put()
        .and(warp::path!("api" / "users"))
        .and(with_principal(server.authorization_gate.clone()))
        .and(json_body())
        .and(with(server.user_service.clone()))
        .and_then(handler::update_user);

    let login = warp::post()
        .and(warp::path!("api" / "login"))
        .and(json_body())
        .and(with(server.session_service.clone()))
        .and_then(handler::login);

    let refresh = warp::post()
        .and(warp::path!("api" / "refresh"))
        .and(with_authorization())
        .and(with(server.session_service.clone()))
        .and_then(handler::refresh);

    let revoke = warp::post()
        .and(warp::path!("api" / "revoke"))
        .and(with_authorization())
        .and(with(server.session_service.clone()))
        .and_then(handler::revoke);

    let create_chirp = warp::post()
        .and(warp::path!("api" / "chirps"))
        .and(with_principal(server.authorization_gate.clone()))
        .and(json_body())
        .and(with(server.chirp_service.clone()))
        .and_then(handler::create_chirp);

    let list_chirps = warp::get()
        .and(warp::path!("api" / "chirps"))
        .and(warp::query::<handler::ChirpListQuery>())
        .and(with(server.chirp_service.clone()))
        .and_then(handler::list_chirps);

    let get_chirp = warp::get()
        .and(warp::path!("api" / "chirps" / ChirpId))
        .and(with(server.chirp_service.clone()))
        .and_then(handler::get_chirp);

    let delete_chirp = warp::delete()
        .and(warp::path!("api" / "chirps" / ChirpId))
        .and(with_principal(server.authorization_gate.clone()))
        .and(with(server.chirp_service.clone()))
        .and_then(handler::delete_chirp);

    let polka_webhook = warp::post()
        .and(warp::path!("api" / "polka" / "webhooks"))
        .and(json_body())
        .and(with(server.user_service.clone()))
        .and_then(handler::polka_webhook);

    let app = warp::get()
        .and(warp::path("app"))
        .and(with_hit(server.hit_counter.clone()))
        .and(warp::fs::dir(server.static_dir.clone()));

    let metrics = warp::get()
        .and(warp::path!("admin" / "metrics"))
        .and(with(server.hit_counter.clone()))
        .and_then(handler::metrics);

    let is_dev = server.is_dev;
    let reset = warp::post()
        .and(warp::path!("admin" / "reset"))
        .and(warp::any().map(move || is_dev))
        .and(with(server.hit_counter.clone()))
        .and(with(server.user_service.clone()))
        .and_then(handler::reset);

    let api = healthz
        .or(create_user)
        .or(update_user)
        .or(login)
        .or(refresh)
        .or(revoke)
        .or(create_chirp)
        .or(list_chirps)
        .or(get_chirp)
        .or(delete_chirp)
        .or(polka_webhook);

    api.or(app).or(metrics).or(reset)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(JSON_BODY_LIMIT).and(warp::body::json())
}

fn with_authorization() -> impl Filter<Extract = (Option<String>,), Error = warp::Rejection> + Clone
{
    warp::header::optional::<String>(http::header::AUTHORIZATION.as_str())
}

fn with_principal(
    authorization_gate: Arc<dyn AuthorizationGate>,
) -> impl Filter<Extract = (UserId,), Error = warp::Rejection> + Clone {
    with_authorization().and_then(move |authorization: Option<String>| {
        let authorization_gate = authorization_gate.clone();
        async move {
            authorization_gate
                .authenticate(authorization.as_deref())
                .map_err(ApiErrorCode::from)
                .map_err(reject::custom)
        }
    })
}

fn with_hit(hit_counter: Arc<HitCounter>) -> impl Filter<Extract = (), Error = Infallible> + Clone {
    warp::any()
        .map(move || hit_counter.hit())
        .untuple_one()
}
