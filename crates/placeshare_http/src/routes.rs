//! Route table and handlers for `/api/places`.

use crate::dto::{
    parse_id, CreatePlaceRequest, PlaceEnvelope, PlacesEnvelope, UpdatePlaceRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use actix_web::{web, HttpResponse};

const PLACE_NOT_FOUND: &str = "Could not find a place for the provided pid.";
const USER_NOT_FOUND: &str = "Could not find a user for the provided uid.";

/// Registers the place routes and the JSON body error handler.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::unprocessable(format!("Invalid request body: {err}")).into()
    }))
    .service(
        web::scope("/api/places")
            .route("", web::post().to(create_place))
            .route("/owner/{uid}", web::get().to(list_places_by_owner))
            .route("/{pid}", web::get().to(get_place))
            .route("/{pid}", web::patch().to(update_place))
            .route("/{pid}", web::delete().to(delete_place)),
    );
}

async fn get_place(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let place_id = parse_id(&path).ok_or_else(|| ApiError::not_found(PLACE_NOT_FOUND))?;

    let place = state.run(move |service| service.get_place(place_id)).await?;
    Ok(HttpResponse::Ok().json(PlaceEnvelope { place }))
}

async fn list_places_by_owner(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = parse_id(&path).ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    let places = state
        .run(move |service| service.list_places_by_owner(user_id))
        .await?;
    Ok(HttpResponse::Ok().json(PlacesEnvelope { places }))
}

async fn create_place(
    state: web::Data<AppState>,
    body: web::Json<CreatePlaceRequest>,
) -> ApiResult<HttpResponse> {
    let draft = body.into_inner().into_new_place()?;

    let place = state
        .run(move |service| service.create_place(&draft))
        .await?;
    Ok(HttpResponse::Created().json(PlaceEnvelope { place }))
}

async fn update_place(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePlaceRequest>,
) -> ApiResult<HttpResponse> {
    let update = body.into_inner().into_update()?;
    let place_id = parse_id(&path).ok_or_else(|| ApiError::not_found(PLACE_NOT_FOUND))?;

    let place = state
        .run(move |service| service.update_place(place_id, &update))
        .await?;
    Ok(HttpResponse::Ok().json(PlaceEnvelope { place }))
}

async fn delete_place(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let place_id = parse_id(&path).ok_or_else(|| ApiError::not_found(PLACE_NOT_FOUND))?;

    state.run(move |service| service.delete_place(place_id)).await?;
    Ok(HttpResponse::Ok().finish())
}
