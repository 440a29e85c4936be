use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;

use favly_core::domain::client::{ClientId, NewClient, Role};
use favly_core::password::hash_password;
use favly_db::repositories::ClientRepository;

use crate::auth::{AdminUser, CurrentUser};
use crate::error::ApiError;
use crate::state::AppState;

use super::auth::{
    normalize_email, validate_email, validate_name, validate_password, ClientResponse,
    RegisterRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route("/clients/me", patch(update_me))
        .route("/clients/{id}", get(get_client).patch(update_client).delete(delete_client))
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateClientQuery {
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
}

pub async fn list_clients(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<ClientResponse>>, ApiError> {
    let clients = state.clients.list().await?;
    Ok(Json(clients.into_iter().map(ClientResponse::from).collect()))
}

pub async fn get_client(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<ClientResponse>, ApiError> {
    let client = state
        .clients
        .find_by_id(ClientId(id))
        .await?
        .ok_or_else(|| ApiError::NotFound("client not found".to_string()))?;
    Ok(Json(client.into()))
}

/// Admin-only creation; unlike `/auth/register` the role is selectable.
pub async fn create_client(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<CreateClientQuery>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ClientResponse>), ApiError> {
    validate_name(&request.name)?;
    validate_email(&request.email)?;
    validate_password(&request.password)?;
    let role: Role = query.role.as_deref().unwrap_or("user").parse()?;

    let email = normalize_email(&request.email);
    if state.clients.find_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("email already registered".to_string()));
    }

    let client = state
        .clients
        .create(NewClient {
            name: request.name.trim().to_string(),
            email,
            password_hash: hash_password(&request.password)?,
            role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(client.into())))
}

pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<ClientResponse>, ApiError> {
    let Some(name) = request.name else {
        return Ok(Json(current.into()));
    };
    validate_name(&name)?;

    let updated = state
        .clients
        .update_name(current.id, name.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("client not found".to_string()))?;
    Ok(Json(updated.into()))
}

pub async fn update_client(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<ClientResponse>, ApiError> {
    let existing = state
        .clients
        .find_by_id(ClientId(id))
        .await?
        .ok_or_else(|| ApiError::NotFound("client not found".to_string()))?;

    let Some(name) = request.name else {
        return Ok(Json(existing.into()));
    };
    validate_name(&name)?;

    let updated = state
        .clients
        .update_name(ClientId(id), name.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("client not found".to_string()))?;
    Ok(Json(updated.into()))
}

pub async fn delete_client(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.clients.delete(ClientId(id)).await? {
        return Err(ApiError::NotFound("client not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode;
    use axum::Json;

    use favly_core::domain::client::Role;

    use crate::auth::{AdminUser, CurrentUser};
    use crate::error::ApiError;
    use crate::routes::auth::RegisterRequest;
    use crate::routes::testing::{register_client, test_state};

    use super::{
        create_client, delete_client, get_client, list_clients, update_client, update_me,
        CreateClientQuery, UpdateClientRequest,
    };

    fn request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "New Client".to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
        }
    }

    #[tokio::test]
    async fn admin_creates_clients_with_a_selectable_role() {
        let state = test_state(None).await;
        let admin = register_client(&state, "root@example.com", Role::Admin).await;

        let (status, Json(created)) = create_client(
            State(state.clone()),
            AdminUser(admin.clone()),
            Query(CreateClientQuery { role: Some("admin".to_string()) }),
            Json(request("second-admin@example.com")),
        )
        .await
        .expect("create admin");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.role, "admin");

        let (_, Json(user)) = create_client(
            State(state),
            AdminUser(admin),
            Query(CreateClientQuery::default()),
            Json(request("plain@example.com")),
        )
        .await
        .expect("create default-role client");
        assert_eq!(user.role, "user");
    }

    #[tokio::test]
    async fn invalid_role_is_a_bad_request() {
        let state = test_state(None).await;
        let admin = register_client(&state, "root@example.com", Role::Admin).await;

        let result = create_client(
            State(state),
            AdminUser(admin),
            Query(CreateClientQuery { role: Some("superuser".to_string()) }),
            Json(request("x@example.com")),
        )
        .await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn list_and_get_cover_existing_clients() {
        let state = test_state(None).await;
        let admin = register_client(&state, "root@example.com", Role::Admin).await;
        let user = register_client(&state, "ada@example.com", Role::User).await;

        let Json(all) =
            list_clients(State(state.clone()), AdminUser(admin.clone())).await.expect("list");
        assert_eq!(all.len(), 2);

        let Json(found) = get_client(State(state.clone()), AdminUser(admin.clone()), Path(user.id.0))
            .await
            .expect("get");
        assert_eq!(found.email, "ada@example.com");

        let missing = get_client(State(state), AdminUser(admin), Path(9999)).await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_me_renames_only_the_caller() {
        let state = test_state(None).await;
        let user = register_client(&state, "ada@example.com", Role::User).await;

        let Json(updated) = update_me(
            State(state.clone()),
            CurrentUser(user.clone()),
            Json(UpdateClientRequest { name: Some("Ada L.".to_string()) }),
        )
        .await
        .expect("update");
        assert_eq!(updated.name, "Ada L.");

        // omitting the name leaves the row unchanged
        let Json(unchanged) = update_me(
            State(state),
            CurrentUser(user),
            Json(UpdateClientRequest { name: None }),
        )
        .await
        .expect("no-op update");
        assert_eq!(unchanged.name, "Test Client", "handler echoes the loaded client");
    }

    #[tokio::test]
    async fn admin_update_and_delete_handle_missing_rows() {
        let state = test_state(None).await;
        let admin = register_client(&state, "root@example.com", Role::Admin).await;
        let user = register_client(&state, "ada@example.com", Role::User).await;

        let Json(updated) = update_client(
            State(state.clone()),
            AdminUser(admin.clone()),
            Path(user.id.0),
            Json(UpdateClientRequest { name: Some("Renamed".to_string()) }),
        )
        .await
        .expect("update");
        assert_eq!(updated.name, "Renamed");

        let missing = update_client(
            State(state.clone()),
            AdminUser(admin.clone()),
            Path(9999),
            Json(UpdateClientRequest { name: Some("Ghost".to_string()) }),
        )
        .await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));

        let status = delete_client(State(state.clone()), AdminUser(admin.clone()), Path(user.id.0))
            .await
            .expect("delete");
        assert_eq!(status, StatusCode::NO_CONTENT);

        let gone = delete_client(State(state), AdminUser(admin), Path(user.id.0)).await;
        assert!(matches!(gone, Err(ApiError::NotFound(_))));
    }
}
