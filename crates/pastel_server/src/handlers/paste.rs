//! Paste HTTP handlers.

use crate::{error::HttpError, views, AppState};
use axum::{
    extract::{ConnectInfo, Host, Multipart, Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use pastel_core::highlight;
use pastel_core::models::paste::{self, Access, NewPaste, Paste};
use pastel_core::AppError;
use serde::Deserialize;
use std::net::SocketAddr;

/// Password fields submitted to gated routes.
#[derive(Debug, Default, Deserialize)]
pub struct AuthForm {
    pub password: Option<String>,
    pub is_encrypted: Option<String>,
}

/// Query parameters for the highlighted view.
#[derive(Debug, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

/// Checkbox-style form values: present means true unless explicitly falsy.
fn form_flag(value: &str) -> bool {
    pastel_core::config::parse_env_flag(value).unwrap_or(true)
}

fn parse_id(raw: &str) -> Result<u64, HttpError> {
    raw.trim()
        .parse()
        .map_err(|_| HttpError::from(AppError::NotFound))
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> HttpError {
    AppError::BadRequest(format!("Invalid form data: {}", err)).into()
}

fn base_url(host: Option<&Host>, headers: &HeaderMap, state: &AppState) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .filter(|v| *v == "https" || *v == "http")
        .unwrap_or("http");
    match host {
        Some(Host(host)) => format!("{}://{}", scheme, host),
        None => format!("http://{}:{}", state.config.bind, state.config.port),
    }
}

fn source_ip(headers: &HeaderMap, connect_info: Option<&ConnectInfo<SocketAddr>>) -> Option<String> {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
    {
        let forwarded = forwarded.trim();
        if !forwarded.is_empty() {
            return Some(forwarded.to_string());
        }
    }
    connect_info.map(|info| info.0.ip().to_string())
}

fn paste_title(paste: &Paste) -> String {
    let created = paste.created.format("%Y-%m-%d %H:%M:%S UTC");
    match &paste.filename {
        Some(filename) => format!("{} {}, created on {}", paste.mimetype, filename, created),
        None => format!("{} created on {}", paste.mimetype, created),
    }
}

/// Metadata response headers attached to authorized views.
fn metadata_headers(paste: &Paste) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let mut set = |name: &'static str, value: String| {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(HeaderName::from_static(name), value);
        }
    };
    set("x-pastel-creation-date", paste.created.to_rfc3339());
    set("x-pastel-protected", paste.protected().to_string());
    set("x-pastel-mime-type", paste.mimetype.clone());
    if let Some(lexer) = &paste.lexer {
        set("x-pastel-lexer", lexer.clone());
    }
    if let Some(filename) = &paste.filename {
        set("x-pastel-filename", filename.clone());
    }
    if let Some(ip) = paste.ip.as_deref().and_then(paste::format_ip) {
        set("x-pastel-source-ip", ip);
    }
    headers
}

enum Gate {
    Allowed,
    Prompt,
}

/// Apply the password gate: `Allowed`, a 200 prompt, or a 401 error.
fn gate(paste: &Paste, auth: Option<&AuthForm>) -> Result<Gate, HttpError> {
    let supplied = auth.and_then(|form| form.password.as_deref());
    let supplied_is_hashed = auth
        .and_then(|form| form.is_encrypted.as_deref())
        .map(form_flag)
        .unwrap_or(false);
    match paste.authorize(supplied, supplied_is_hashed) {
        Access::Granted => Ok(Gate::Allowed),
        Access::NeedsPassword => Ok(Gate::Prompt),
        Access::WrongPassword => Err(AppError::Unauthorized.into()),
    }
}

fn prompt_response(state: &AppState) -> Response {
    Html(views::password_prompt(&state.config.title)).into_response()
}

fn get_paste(state: &AppState, id: u64) -> Result<Paste, HttpError> {
    state.db.pastes.get(id)?.ok_or_else(|| AppError::NotFound.into())
}

/// `GET /` — landing page.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(views::index_page(&state.config.title))
}

/// `GET /recent` — most recent pastes.
pub async fn recent(State(state): State<AppState>) -> Result<Html<String>, HttpError> {
    let items = state.db.pastes.recent(state.config.recent_items)?;
    Ok(Html(views::recent_page(&state.config.title, &items)))
}

/// `GET /post` — empty upload form.
pub async fn upload_form() -> Html<String> {
    Html(views::post_page("Paste New", &views::PostPrefill::default()))
}

/// `POST /post` — create a paste from multipart form fields.
///
/// Fields: `upload` (required), `filename`, `syntax` (`-` means absent),
/// `password`, `is_encrypted`, `parent`, `redirect`, `as_html`.
///
/// # Errors
/// 400 when `upload` is missing/empty or exceeds the configured size cap.
pub async fn create(
    State(state): State<AppState>,
    host: Option<Host>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, HttpError> {
    let mut new = NewPaste::default();
    let mut redirect = false;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field.text().await.map_err(bad_multipart)?;
        match name.as_str() {
            "upload" => new.content = value,
            "filename" => new.filename = Some(value),
            "syntax" => new.syntax = Some(value),
            "password" => new.password = Some(value),
            "is_encrypted" => new.password_is_hashed = form_flag(&value),
            "as_html" => new.as_html = form_flag(&value),
            "redirect" => redirect = form_flag(&value),
            "parent" => match value.trim().parse::<u64>() {
                Ok(parent) => new.parent = Some(parent),
                Err(err) => {
                    if !value.trim().is_empty() {
                        tracing::warn!("Parent value does not seem like an id: {}", err);
                    }
                }
            },
            other => tracing::debug!("Ignoring unknown form field '{}'", other),
        }
    }

    if new.content.len() > state.config.max_paste_size {
        return Err(AppError::BadRequest(format!(
            "Paste size exceeds maximum of {} bytes",
            state.config.max_paste_size
        ))
        .into());
    }

    new.source_ip = source_ip(&headers, connect_info.as_ref());

    let paste = Paste::build(new)?;
    let stored = state.db.pastes.insert(paste)?;
    let url = format!("{}/{}", base_url(host.as_ref(), &headers, &state), stored.id);

    if redirect {
        Ok(Redirect::to(&url).into_response())
    } else {
        Ok((StatusCode::OK, format!("{}\n", url)).into_response())
    }
}

/// `GET|POST /{id}` — highlighted view behind the password gate.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LangQuery>,
    form: Option<Form<AuthForm>>,
) -> Result<Response, HttpError> {
    let id = parse_id(&id)?;
    let paste = get_paste(&state, id)?;

    match gate(&paste, form.as_deref())? {
        Gate::Prompt => return Ok(prompt_response(&state)),
        Gate::Allowed => {}
    }

    let lang = paste::normalize_field(query.lang);
    let entry =
        highlight::resolve_for_display(lang.as_deref(), paste.lexer.as_deref(), &paste.mimetype);
    let fragment = highlight::render_html(&paste.content, entry, &state.config.theme);
    let page = views::highlight_page(&paste_title(&paste), paste.id, paste.parent, &fragment);

    let mut response = Html(page).into_response();
    response.headers_mut().extend(metadata_headers(&paste));
    Ok(response)
}

/// `GET|POST /raw/{id}` — stored bytes with the stored mimetype.
pub async fn show_raw(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Option<Form<AuthForm>>,
) -> Result<Response, HttpError> {
    let id = parse_id(&id)?;
    let paste = get_paste(&state, id)?;

    match gate(&paste, form.as_deref())? {
        Gate::Prompt => return Ok(prompt_response(&state)),
        Gate::Allowed => {}
    }

    let mut response = (StatusCode::OK, paste.content.clone().into_bytes()).into_response();
    response.headers_mut().insert(
        axum::http::header::CONTENT_TYPE,
        HeaderValue::from_str(&paste.mimetype)
            .unwrap_or_else(|_| HeaderValue::from_static("text/plain")),
    );
    response.headers_mut().extend(metadata_headers(&paste));
    Ok(response)
}

/// `GET|POST /edit/{id}` — pre-filled creation form referencing the original
/// as `parent`. The password field carries the stored hash with the
/// pre-hashed box checked, so resubmitting silently preserves protection.
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Option<Form<AuthForm>>,
) -> Result<Response, HttpError> {
    let id = parse_id(&id)?;
    let paste = get_paste(&state, id)?;

    match gate(&paste, form.as_deref())? {
        Gate::Prompt => return Ok(prompt_response(&state)),
        Gate::Allowed => {}
    }

    let syntax =
        highlight::resolve_for_display(None, paste.lexer.as_deref(), &paste.mimetype).token();
    let prefill = views::PostPrefill {
        content: &paste.content,
        password: paste.password.as_deref().unwrap_or(""),
        checked: paste.protected(),
        syntax,
        parent: Some(paste.id),
    };
    let title = format!("Create new entry based on #{}", paste.id);
    Ok(Html(views::post_page(&title, &prefill)).into_response())
}

fn parse_diff_pair(pair: &str) -> Option<(u64, u64)> {
    let (parent, child) = pair.split_once("..")?;
    Some((parent.trim().parse().ok()?, child.trim().parse().ok()?))
}

/// `GET /diff/{parent}..{id}` — unified diff between two unprotected pastes.
///
/// # Errors
/// 404 when either id is malformed or missing; 403 when either paste is
/// password protected (this route performs no authentication of its own).
pub async fn diff(
    State(state): State<AppState>,
    Path(pair): Path<String>,
) -> Result<Response, HttpError> {
    let (parent_id, child_id) = parse_diff_pair(&pair).ok_or(AppError::NotFound)?;
    let child = get_paste(&state, child_id)?;
    let parent = get_paste(&state, parent_id)?;

    if child.protected() || parent.protected() {
        return Err(AppError::Forbidden(
            "Can only show differences between unprotected entries".to_string(),
        )
        .into());
    }

    let diff_text = pastel_core::diff::unified(&parent, &child);
    let entry = highlight::registry::by_token("diff").unwrap_or_else(highlight::plain_text);
    let fragment = highlight::render_html(&diff_text, entry, &state.config.theme);
    let title = format!(
        "Showing differences between #{} and #{}",
        parent_id, child_id
    );
    let page = views::highlight_page(&title, child_id, Some(parent_id), &fragment);
    Ok(Html(page).into_response())
}
