//! Session-cookie web UI handlers.
//!
//! A small human-facing surface for endpoint management:
//! - GET / - login page
//! - POST /web/login - form login, sets the session cookie
//! - GET /dashboard - endpoint list and creation form
//! - POST /web/endpoints - create an endpoint from the dashboard form
//! - POST /web/admin/update - admin-only self-update
//!
//! The cookie carries the same signed session token as the bearer scheme.
//! Unlike the JSON API, failures here degrade gracefully: unauthenticated
//! requests redirect to the login page, and invalid form input re-renders
//! the current view with an inline message instead of an error page.

use axum::{
    Form,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use html_escape::encode_text;
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::process::Command;

use crate::error::AppError;
use crate::middleware::auth::{AuthContext, SESSION_COOKIE, resolve_cookie};
use crate::models::endpoint::DataEndpoint;
use crate::services::{endpoint_service, provider_gateway, token, user_service};
use crate::state::AppState;

/// Form body for `POST /web/login`.
#[derive(Debug, Deserialize)]
pub struct WebLoginForm {
    pub username: String,
    pub password: String,
}

/// Form body for `POST /web/endpoints`.
#[derive(Debug, Deserialize)]
pub struct WebEndpointForm {
    pub name: String,
    pub provider: String,
    /// Raw JSON object typed into the dashboard textarea
    #[serde(default)]
    pub config_json: String,
}

/// Render the login page.
///
/// `GET /`
pub async fn login_page() -> Html<String> {
    login_page_html(None)
}

/// Handle the login form.
///
/// `POST /web/login`
///
/// On success, sets the `token` session cookie (HttpOnly) and redirects to
/// the dashboard. On bad credentials, re-renders the login page with an
/// inline message -- no error page, no detail about what was wrong.
pub async fn web_login(
    State(state): State<AppState>,
    Form(form): Form<WebLoginForm>,
) -> Result<Response, AppError> {
    let user = match user_service::authenticate(&state.pool, &form.username, &form.password).await {
        Ok(user) => user,
        Err(AppError::Unauthenticated) => {
            return Ok(login_page_html(Some("Login failed")).into_response());
        }
        Err(err) => return Err(err),
    };

    let session_token = token::issue(&user.username, &state.config)?;

    let mut response = Redirect::to("/dashboard").into_response();
    let cookie = format!("{SESSION_COOKIE}={session_token}; Path=/; HttpOnly; SameSite=Lax");
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|err| AppError::Internal(format!("invalid session cookie value: {err}")))?,
    );

    Ok(response)
}

/// Render the dashboard: the user's endpoints plus a creation form.
///
/// `GET /dashboard`
///
/// Redirects to the login page when the session cookie is missing or
/// invalid.
pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(auth) = session_user(&state, &headers).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    let page = render_dashboard(&state, &auth, None).await?;
    Ok(page.into_response())
}

/// Handle the endpoint creation form.
///
/// `POST /web/endpoints`
///
/// Produces the same invariant-satisfying row as the JSON API path.
/// Malformed configuration JSON re-renders the dashboard with an inline
/// message; success redirects back to the dashboard.
pub async fn create_endpoint_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<WebEndpointForm>,
) -> Result<Response, AppError> {
    let Some(auth) = session_user(&state, &headers).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    let raw = if form.config_json.trim().is_empty() {
        "{}"
    } else {
        form.config_json.as_str()
    };

    let config: Map<String, Value> = match serde_json::from_str(raw) {
        Ok(config) => config,
        Err(_) => {
            // InvalidInput degraded to an inline message on the form path
            let page =
                render_dashboard(&state, &auth, Some("Error: config is not a valid JSON object"))
                    .await?;
            return Ok(page.into_response());
        }
    };

    endpoint_service::create_endpoint(&state.pool, auth.user_id, &form.name, &form.provider, &config)
        .await?;

    Ok(Redirect::to("/dashboard").into_response())
}

/// Admin-only self-update: pull the latest code from the origin repository.
///
/// `POST /web/admin/update`
///
/// Runs `git pull origin main` in the working directory and reports the
/// outcome inline on the dashboard. Non-admin users get 403.
pub async fn admin_update(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(auth) = session_user(&state, &headers).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    if !auth.is_admin {
        return Err(AppError::Forbidden);
    }

    let output = Command::new("git")
        .args(["pull", "origin", "main"])
        .output()
        .await
        .map_err(|err| AppError::Internal(format!("failed to run git pull: {err}")))?;

    let detail = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        String::from_utf8_lossy(&output.stdout).into_owned()
    };
    let message = format!(
        "Update exit code {}: {}",
        output.status.code().unwrap_or(-1),
        detail.trim()
    );

    let page = render_dashboard(&state, &auth, Some(&message)).await?;
    Ok(page.into_response())
}

/// Resolve the web session cookie, distinguishing "not logged in" (caller
/// redirects to the login page) from real errors (propagated).
async fn session_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<AuthContext>, AppError> {
    match resolve_cookie(state, headers).await {
        Ok(auth) => Ok(Some(auth)),
        Err(AppError::Unauthenticated) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Fetch the caller's endpoints and render the dashboard page.
async fn render_dashboard(
    state: &AppState,
    auth: &AuthContext,
    message: Option<&str>,
) -> Result<Html<String>, AppError> {
    let endpoints = endpoint_service::list_endpoints(&state.pool, auth.user_id).await?;
    Ok(dashboard_html(auth, &endpoints, message))
}

/// Build the login page HTML.
fn login_page_html(message: Option<&str>) -> Html<String> {
    let notice = message
        .map(|m| format!("<p class=\"notice\">{}</p>", encode_text(m)))
        .unwrap_or_default();

    Html(format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>Universal Data API</title></head>\n\
         <body>\n\
         <h1>Universal Data API</h1>\n\
         {notice}\
         <form method=\"post\" action=\"/web/login\">\n\
         <label>Username <input type=\"text\" name=\"username\" required></label><br>\n\
         <label>Password <input type=\"password\" name=\"password\" required></label><br>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>\n\
         </body>\n\
         </html>\n"
    ))
}

/// Build the dashboard page HTML.
///
/// All user-controlled values are escaped before interpolation.
fn dashboard_html(
    auth: &AuthContext,
    endpoints: &[DataEndpoint],
    message: Option<&str>,
) -> Html<String> {
    let notice = message
        .map(|m| format!("<p class=\"notice\">{}</p>", encode_text(m)))
        .unwrap_or_default();

    let provider_options: String = provider_gateway::SUPPORTED_PROVIDERS
        .iter()
        .map(|(name, description)| {
            format!("<option value=\"{name}\">{name} &mdash; {description}</option>\n")
        })
        .collect();

    let rows: String = endpoints
        .iter()
        .map(|endpoint| {
            format!(
                "<tr><td>{}</td><td>{}</td><td><code>/api/universal/{}</code></td><td>{}</td></tr>\n",
                encode_text(&endpoint.name),
                encode_text(&endpoint.provider),
                endpoint.id,
                endpoint.created_at.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();

    let admin_section = if auth.is_admin {
        "<h2>Admin</h2>\n\
         <form method=\"post\" action=\"/web/admin/update\">\n\
         <button type=\"submit\">Update application</button>\n\
         </form>\n"
    } else {
        ""
    };

    Html(format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>Dashboard</title></head>\n\
         <body>\n\
         <h1>Dashboard</h1>\n\
         <p>Logged in as <strong>{username}</strong></p>\n\
         {notice}\
         <h2>Your endpoints</h2>\n\
         <table border=\"1\">\n\
         <tr><th>Name</th><th>Provider</th><th>Data URL</th><th>Created</th></tr>\n\
         {rows}\
         </table>\n\
         <h2>New endpoint</h2>\n\
         <form method=\"post\" action=\"/web/endpoints\">\n\
         <label>Name <input type=\"text\" name=\"name\" required></label><br>\n\
         <label>Provider <select name=\"provider\">\n{provider_options}</select></label><br>\n\
         <label>Config (JSON) <textarea name=\"config_json\" rows=\"4\" cols=\"40\">{{}}</textarea></label><br>\n\
         <button type=\"submit\">Create</button>\n\
         </form>\n\
         {admin_section}\
         </body>\n\
         </html>\n",
        username = encode_text(&auth.username),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn test_auth(is_admin: bool) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            username: "alice<script>".to_string(),
            is_admin,
        }
    }

    fn test_endpoint(name: &str) -> DataEndpoint {
        DataEndpoint {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: name.to_string(),
            provider: "weather".to_string(),
            config_json: "{}".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn login_page_shows_inline_message() {
        let Html(page) = login_page_html(Some("Login failed"));
        assert!(page.contains("Login failed"));
        assert!(page.contains("action=\"/web/login\""));
    }

    #[test]
    fn dashboard_escapes_user_controlled_values() {
        let auth = test_auth(false);
        let endpoint = test_endpoint("<img src=x>");

        let Html(page) = dashboard_html(&auth, &[endpoint], None);

        assert!(!page.contains("<script>"));
        assert!(!page.contains("<img src=x>"));
        assert!(page.contains("&lt;img src=x&gt;"));
    }

    #[test]
    fn admin_section_only_renders_for_admins() {
        let Html(member_page) = dashboard_html(&test_auth(false), &[], None);
        assert!(!member_page.contains("/web/admin/update"));

        let Html(admin_page) = dashboard_html(&test_auth(true), &[], None);
        assert!(admin_page.contains("/web/admin/update"));
    }
}
