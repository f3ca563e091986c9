#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use office_client::{ApiReply, ApiRequest, ClientError, Method, Transport};
use office_types::{Brand, BrandDraft, BrandPatch};
use serde_json::{json, Value};

pub const NOW: i64 = 1_700_000_000;

pub fn jwt(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}

#[derive(Default)]
struct State {
    brands: Vec<Brand>,
    next_id: i64,
    fail_next: Option<u16>,
    delays: HashMap<String, Duration>,
    token_lifetime: i64,
}

/// In-memory stand-in for the brands collection and the login endpoint.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeBackend {
    pub fn with_brands(names: &[&str]) -> Self {
        let backend = FakeBackend::default();
        {
            let mut state = backend.state.lock().unwrap();
            state.token_lifetime = 3600;
            for name in names {
                state.next_id += 1;
                let id = state.next_id;
                state.brands.push(Brand {
                    id,
                    name: name.to_string(),
                    is_active: true,
                });
            }
        }
        backend
    }

    pub fn fail_next(&self, status: u16) {
        self.state.lock().unwrap().fail_next = Some(status);
    }

    /// Delays list responses for a given search term.
    pub fn delay_search(&self, term: &str, delay: Duration) {
        self.state
            .lock()
            .unwrap()
            .delays
            .insert(term.to_string(), delay);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn route(&self, request: &ApiRequest) -> (u16, Value) {
        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.fail_next.take() {
            return (status, json!({ "status": status, "message": "falha simulada" }));
        }

        let segments: Vec<&str> = request.path.split('/').collect();
        match (request.method, segments.as_slice()) {
            (Method::Post, ["api", "auth", "login"]) => {
                let body = request.body.clone().unwrap_or(Value::Null);
                if body["password"] != "secret" {
                    return (401, json!({ "status": 401, "message": "Credenciais inválidas" }));
                }
                let token = jwt(json!({ "exp": NOW + state.token_lifetime, "sub": body["username"] }));
                (
                    200,
                    json!({
                        "status": 200,
                        "message": "ok",
                        "token": token,
                        "data": { "username": body["username"], "role": "ADMIN" }
                    }),
                )
            }
            (Method::Get, ["api", "brands"]) => {
                let page: usize = request.query_value("page").and_then(|v| v.parse().ok()).unwrap_or(0);
                let size: usize = request.query_value("size").and_then(|v| v.parse().ok()).unwrap_or(5);
                let search = request.query_value("search").unwrap_or("").to_lowercase();
                let matching: Vec<&Brand> = state
                    .brands
                    .iter()
                    .filter(|b| b.name.to_lowercase().contains(&search))
                    .collect();
                let content: Vec<&Brand> = matching.iter().skip(page * size).take(size).copied().collect();
                let totalPages = matching.len().div_ceil(size.max(1));
                (
                    200,
                    json!({
                        "status": 200,
                        "message": "ok",
                        "data": {
                            "currentPage": page,
                            "totalPages": totalPages,
                            "totalElements": matching.len(),
                            "content": content
                        }
                    }),
                )
            }
            (Method::Get, ["api", "brands", id]) => match find(&state.brands, id) {
                Some(brand) => (200, json!({ "status": 200, "message": "ok", "data": brand })),
                None => (404, json!({ "status": 404, "message": "Marca não encontrada" })),
            },
            (Method::Post, ["api", "brands"]) => {
                let draft: BrandDraft = match serde_json::from_value(request.body.clone().unwrap_or(Value::Null)) {
                    Ok(draft) => draft,
                    Err(e) => return (400, json!({ "status": 400, "message": e.to_string() })),
                };
                state.next_id += 1;
                let brand = Brand {
                    id: state.next_id,
                    name: draft.name,
                    is_active: draft.is_active,
                };
                state.brands.push(brand.clone());
                (201, json!({ "status": 201, "message": "criada", "data": brand }))
            }
            (Method::Put, ["api", "brands", id]) => {
                let patch: BrandPatch =
                    serde_json::from_value(request.body.clone().unwrap_or(Value::Null)).unwrap_or_default();
                let Some(brand) = find_mut(&mut state.brands, id) else {
                    return (404, json!({ "status": 404, "message": "Marca não encontrada" }));
                };
                if let Some(name) = patch.name {
                    brand.name = name;
                }
                if let Some(isActive) = patch.is_active {
                    brand.is_active = isActive;
                }
                (200, json!({ "status": 200, "message": "atualizada", "data": brand.clone() }))
            }
            (Method::Delete, ["api", "brands", id]) => {
                let Some(brand) = find(&state.brands, id).cloned() else {
                    return (404, json!({ "status": 404, "message": "Marca não encontrada" }));
                };
                state.brands.retain(|b| b.id != brand.id);
                (200, json!({ "status": 200, "message": "excluída", "data": { "result": brand } }))
            }
            _ => (404, json!({ "status": 404, "message": "rota desconhecida" })),
        }
    }
}

fn find<'a>(brands: &'a [Brand], id: &str) -> Option<&'a Brand> {
    let id: i64 = id.parse().ok()?;
    brands.iter().find(|b| b.id == id)
}

fn find_mut<'a>(brands: &'a mut [Brand], id: &str) -> Option<&'a mut Brand> {
    let id: i64 = id.parse().ok()?;
    brands.iter_mut().find(|b| b.id == id)
}

impl Transport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiReply, ClientError> {
        self.requests.lock().unwrap().push(request.clone());

        let delay = request
            .query_value("search")
            .and_then(|term| self.state.lock().unwrap().delays.get(term).copied());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let (status, body) = self.route(&request);
        Ok(ApiReply {
            status,
            body: body.to_string(),
        })
    }
}
