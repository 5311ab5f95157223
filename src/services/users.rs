// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User directory service.
//!
//! Input is validated before any request is made; validation failures come
//! back as failed envelopes with a `null` status code. Every endpoint may
//! answer with an extra `{ success, data }` level, which is unwrapped.

use crate::api::{endpoints, ApiRequests, ApiResponse};
use crate::models::{CreateUserRequest, UpdateUserRequest, User, UserFilters, UsersResponse};

pub const REQUIRED_FIELDS_ERROR: &str = "Email, nombre y apellido son requeridos";
pub const INVALID_EMAIL_ERROR: &str = "Formato de email inválido";
pub const USER_ID_REQUIRED_ERROR: &str = "ID de usuario requerido";
pub const SEARCH_TERM_REQUIRED_ERROR: &str = "Término de búsqueda requerido";

/// Page size assumed when recomputing pagination for search results.
const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Clone)]
pub struct UsersService {
    api: ApiRequests,
}

impl UsersService {
    pub fn new(api: ApiRequests) -> Self {
        Self { api }
    }

    pub async fn get_all_users(&self, filters: &UserFilters) -> ApiResponse<UsersResponse> {
        let path = format!("{}{}", endpoints::USERS, filters.query_string());
        self.api.get(&path).await.unwrap_envelope().decode()
    }

    pub async fn get_user_by_id(&self, id: &str) -> ApiResponse<User> {
        if id.trim().is_empty() {
            return ApiResponse::failure(USER_ID_REQUIRED_ERROR, None);
        }
        self.api
            .get(&endpoints::user(id))
            .await
            .unwrap_envelope()
            .decode()
    }

    pub async fn create_user(&self, request: &CreateUserRequest) -> ApiResponse<User> {
        if [&request.email, &request.first_name, &request.last_name]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return ApiResponse::failure(REQUIRED_FIELDS_ERROR, None);
        }
        if !is_valid_email(&request.email) {
            return ApiResponse::failure(INVALID_EMAIL_ERROR, None);
        }

        self.api
            .post(endpoints::USERS, request)
            .await
            .unwrap_envelope()
            .decode()
    }

    pub async fn update_user(&self, id: &str, request: &UpdateUserRequest) -> ApiResponse<User> {
        if id.trim().is_empty() {
            return ApiResponse::failure(USER_ID_REQUIRED_ERROR, None);
        }
        if request.email.as_deref().is_some_and(|email| !is_valid_email(email)) {
            return ApiResponse::failure(INVALID_EMAIL_ERROR, None);
        }

        self.api
            .put(&endpoints::user(id), request)
            .await
            .unwrap_envelope()
            .decode()
    }

    pub async fn delete_user(&self, id: &str) -> ApiResponse<()> {
        if id.trim().is_empty() {
            return ApiResponse::failure(USER_ID_REQUIRED_ERROR, None);
        }
        self.api.delete(&endpoints::user(id)).await.map(|_| ())
    }

    /// Profile of the signed-in user.
    pub async fn get_profile(&self) -> ApiResponse<User> {
        self.api
            .get(endpoints::PROFILE)
            .await
            .unwrap_envelope()
            .decode()
    }

    /// Fetch a page with `filters` and keep users whose email or name
    /// contains `query`. Pagination totals describe the filtered list.
    pub async fn search_users(&self, query: &str, filters: &UserFilters) -> ApiResponse<UsersResponse> {
        if query.trim().is_empty() {
            return ApiResponse::failure(SEARCH_TERM_REQUIRED_ERROR, None);
        }

        let page_size = filters.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_SIZE);
        self.get_all_users(filters).await.map(|mut page| {
            page.users.retain(|user| user.matches(query));
            let total = u32::try_from(page.users.len()).unwrap_or(u32::MAX);
            page.pagination.total = total;
            page.pagination.pages = total.div_ceil(page_size);
            page
        })
    }
}

/// Same acceptance as `^[^\s@]+@[^\s@]+\.[^\s@]+$`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{facade, spawn_backend};
    use crate::api::NOT_FOUND_MESSAGE;
    use crate::models::UserRole;
    use axum::extract::{Path, RawQuery};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn user(id: &str, email: &str, first: &str, last: &str, role: &str) -> Value {
        json!({
            "id": id,
            "email": email,
            "firstName": first,
            "lastName": last,
            "role": role,
            "createdAt": "2025-03-01T12:00:00Z",
            "updatedAt": "2025-03-01T12:00:00Z"
        })
    }

    fn directory() -> Vec<Value> {
        vec![
            user("u1", "ana.garcia@medical.com", "Ana", "García", "PATIENT"),
            user("u2", "juan.perez@medical.com", "Juan", "Pérez", "DOCTOR"),
            user("u3", "admin@medical.com", "Root", "Admin", "ADMIN"),
            user("u4", "anabel@clinic.org", "Anabel", "Ruiz", "PATIENT"),
        ]
    }

    fn backend(queries: Arc<Mutex<Vec<Option<String>>>>) -> Router {
        Router::new()
            .route(
                "/api/users",
                get(move |RawQuery(query): RawQuery| {
                    let queries = queries.clone();
                    async move {
                        queries.lock().unwrap().push(query);
                        Json(json!({
                            "success": true,
                            "message": "Usuarios obtenidos",
                            "data": {
                                "users": directory(),
                                "pagination": { "page": 1, "limit": 10, "total": 4, "pages": 1 }
                            }
                        }))
                    }
                })
                .post(|Json(body): Json<Value>| async move {
                    let mut created = user("u9", "", "", "", "PATIENT");
                    for key in ["email", "firstName", "lastName", "role"] {
                        if let Some(value) = body.get(key) {
                            created[key] = value.clone();
                        }
                    }
                    (
                        StatusCode::CREATED,
                        Json(json!({ "success": true, "data": created })),
                    )
                }),
            )
            .route(
                "/api/users/{id}",
                get(|Path(id): Path<String>| async move {
                    match directory().into_iter().find(|u| u["id"] == id.as_str()) {
                        Some(found) => (StatusCode::OK, Json(json!({ "success": true, "data": found }))),
                        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "Usuario no encontrado" }))),
                    }
                })
                .put(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                    let mut updated = user(&id, "ana.garcia@medical.com", "Ana", "García", "PATIENT");
                    if let Some(first) = body.get("firstName") {
                        updated["firstName"] = first.clone();
                    }
                    Json(updated)
                })
                .delete(|| async { Json(json!({ "success": true, "message": "Usuario eliminado" })) }),
            )
            .route(
                "/users/profile",
                get(|| async { Json(user("u2", "juan.perez@medical.com", "Juan", "Pérez", "DOCTOR")) }),
            )
    }

    async fn service() -> (UsersService, Arc<Mutex<Vec<Option<String>>>>) {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let url = spawn_backend(backend(queries.clone())).await;
        let (api, _) = facade(&url, None);
        (UsersService::new(api), queries)
    }

    #[test]
    fn email_validation_matches_pattern() {
        for valid in ["a@b.co", "juan.perez@medical.com", "x@sub.domain.org", "a@b..c"] {
            assert!(is_valid_email(valid), "{valid}");
        }
        for invalid in ["", "plain", "@b.co", "a@.co", "a@b.", "a@bco", "a b@c.de", "a@b@c.de"] {
            assert!(!is_valid_email(invalid), "{invalid}");
        }
    }

    #[tokio::test]
    async fn lists_users_with_query_filters() {
        let (users, queries) = service().await;

        let page = users
            .get_all_users(&UserFilters {
                page: Some(1),
                limit: Some(10),
                role: Some(UserRole::Patient),
            })
            .await
            .into_data()
            .unwrap();
        assert_eq!(page.users.len(), 4);
        assert_eq!(page.pagination.total, 4);

        users.get_all_users(&UserFilters::default()).await;
        assert_eq!(
            *queries.lock().unwrap(),
            vec![Some("page=1&limit=10&role=PATIENT".to_string()), None]
        );
    }

    #[tokio::test]
    async fn gets_single_user() {
        let (users, _) = service().await;

        let found = users.get_user_by_id("u2").await.into_data().unwrap();
        assert_eq!(found.email, "juan.perez@medical.com");
        assert_eq!(found.role, UserRole::Doctor);

        let missing = users.get_user_by_id("nope").await;
        assert_eq!(missing, ApiResponse::failure(NOT_FOUND_MESSAGE, Some(404)));

        let blank = users.get_user_by_id("  ").await;
        assert_eq!(blank, ApiResponse::failure(USER_ID_REQUIRED_ERROR, None));
    }

    #[tokio::test]
    async fn create_validates_before_sending() {
        let (users, _) = service().await;

        let missing = users
            .create_user(&CreateUserRequest {
                email: "nuevo@medical.com".to_string(),
                first_name: "Nuevo".to_string(),
                ..Default::default()
            })
            .await;
        assert_eq!(missing, ApiResponse::failure(REQUIRED_FIELDS_ERROR, None));

        let bad_email = users
            .create_user(&CreateUserRequest {
                email: "nuevo-at-medical".to_string(),
                first_name: "Nuevo".to_string(),
                last_name: "Usuario".to_string(),
                role: None,
            })
            .await;
        assert_eq!(bad_email, ApiResponse::failure(INVALID_EMAIL_ERROR, None));
    }

    #[tokio::test]
    async fn creates_user_and_unwraps_envelope() {
        let (users, _) = service().await;

        let created = users
            .create_user(&CreateUserRequest {
                email: "nuevo@medical.com".to_string(),
                first_name: "Nuevo".to_string(),
                last_name: "Usuario".to_string(),
                role: Some(UserRole::Doctor),
            })
            .await
            .into_data()
            .unwrap();
        assert_eq!(created.id, "u9");
        assert_eq!(created.email, "nuevo@medical.com");
        assert_eq!(created.role, UserRole::Doctor);
    }

    #[tokio::test]
    async fn updates_and_deletes() {
        let (users, _) = service().await;

        let bad = users
            .update_user(
                "u1",
                &UpdateUserRequest {
                    email: Some("broken".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert_eq!(bad, ApiResponse::failure(INVALID_EMAIL_ERROR, None));

        let updated = users
            .update_user(
                "u1",
                &UpdateUserRequest {
                    first_name: Some("Anita".to_string()),
                    ..Default::default()
                },
            )
            .await
            .into_data()
            .unwrap();
        assert_eq!(updated.first_name, "Anita");

        assert_eq!(users.delete_user("u1").await, ApiResponse::ok(()));
        assert_eq!(
            users.delete_user("").await,
            ApiResponse::failure(USER_ID_REQUIRED_ERROR, None)
        );
    }

    #[tokio::test]
    async fn profile_is_decoded() {
        let (users, _) = service().await;
        let profile = users.get_profile().await.into_data().unwrap();
        assert_eq!(profile.full_name(), "Juan Pérez");
    }

    #[tokio::test]
    async fn search_filters_locally_and_recomputes_pagination() {
        let (users, _) = service().await;

        let result = users
            .search_users("ANA", &UserFilters::default())
            .await
            .into_data()
            .unwrap();
        let ids: Vec<_> = result.users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u4"]);
        assert_eq!(result.pagination.total, 2);
        assert_eq!(result.pagination.pages, 1);

        let with_small_pages = users
            .search_users(
                "medical.com",
                &UserFilters {
                    limit: Some(2),
                    ..Default::default()
                },
            )
            .await
            .into_data()
            .unwrap();
        assert_eq!(with_small_pages.pagination.total, 3);
        assert_eq!(with_small_pages.pagination.pages, 2);

        let padded = users
            .search_users("ana ", &UserFilters::default())
            .await
            .into_data()
            .unwrap();
        assert!(padded.users.is_empty());
        assert_eq!(padded.pagination.total, 0);
        assert_eq!(padded.pagination.pages, 0);

        let empty = users.search_users("   ", &UserFilters::default()).await;
        assert_eq!(empty, ApiResponse::failure(SEARCH_TERM_REQUIRED_ERROR, None));
    }
}
