use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{debug, info};

use crate::{
    AppState,
    error::AppResult,
    flash,
    models::{AddForm, EditForm, FieldError},
    ranking, templates,
};

pub async fn index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> AppResult<(SignedCookieJar, Html<String>)> {
    let movies = state.store.list_all().await?;
    let ranked = ranking::rank(movies);
    let (jar, notice) = flash::take(jar);
    Ok((jar, Html(templates::index_page(&ranked, notice.as_deref()))))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let movie = state.store.get(id).await?;
    Ok(Html(templates::edit_page(&movie, &EditForm::from_movie(&movie), None)))
}

pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    jar: SignedCookieJar,
    Form(form): Form<EditForm>,
) -> AppResult<Response> {
    let movie = state.store.get(id).await?;

    let update = match form.validate() {
        Ok(update) => update,
        Err(err) => {
            debug!(id, rating = %form.rating, "rejected rating input");
            let body = templates::edit_page(&movie, &form, Some(&err));
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response());
        },
    };

    let movie = state.store.update(id, update).await?;
    info!(id, title = %movie.title, rating = ?movie.rating, "rating saved");

    let jar = flash::set(jar, format!("Updated {}", movie.title));
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    jar: SignedCookieJar,
) -> AppResult<(SignedCookieJar, Redirect)> {
    let movie = state.store.delete(id).await?;
    info!(id, title = %movie.title, "movie removed");

    let jar = flash::set(jar, format!("Removed {}", movie.title));
    Ok((jar, Redirect::to("/")))
}

pub async fn add_form() -> Html<String> {
    Html(templates::add_page(&AddForm::default(), None))
}

pub async fn add(State(state): State<AppState>, Form(form): Form<AddForm>) -> AppResult<Response> {
    let title = form.title.trim();
    if title.is_empty() {
        let err = FieldError { field: "title", message: "Movie title is required".to_string() };
        let body = templates::add_page(&form, Some(&err));
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response());
    }

    let results = state.tmdb.search(title).await?;
    let body = templates::select_page(title, &results, state.tmdb.image_base_url());
    Ok(Html(body).into_response())
}

pub async fn save(State(state): State<AppState>, Path(tmdb_id): Path<i32>) -> AppResult<Redirect> {
    let new_movie = state.tmdb.fetch_new_movie(tmdb_id).await?;
    let movie = state.store.create(new_movie).await?;
    info!(id = movie.id, tmdb_id, title = %movie.title, "movie added");
    Ok(Redirect::to(&format!("/edit/{}", movie.id)))
}
