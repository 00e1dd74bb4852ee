//! Integration tests for Atelier.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p atelier-integration-tests
//! ```
//!
//! No external services are needed. Each test starts a [`MockBackend`]: an
//! in-process `axum` server on `127.0.0.1:0` that speaks the marketplace
//! REST contract, keeps its records in memory, and records every request it
//! receives along with its `Authorization` header.
//!
//! # Test Categories
//!
//! - `session` - Credential persistence and header attachment
//! - `workflows` - Order and custom request status transitions
//! - `admin_gate` - Login, logout, and view gating
//! - `catalog` - Products, content, and uploads

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use atelier_client::{ApiClient, ClientConfig, SessionStore};
use atelier_core::{CustomRequest, CustomRequestStatus, Order, OrderStatus, PageContent, Product};
use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

/// The only admin the mock backend knows.
pub const ADMIN_EMAIL: &str = "admin@atelier.test";
/// That admin's password.
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";
/// Token issued on successful login and accepted afterwards.
pub const VALID_TOKEN: &str = "mock-token-7f3a";

const TIMESTAMP: &str = "2024-03-01T10:00:00";

type Failure = (StatusCode, Json<Value>);
type Shared = Arc<Mutex<BackendState>>;

/// A request as the mock backend saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Debug, Default)]
struct BackendState {
    products: Vec<Product>,
    orders: Vec<Order>,
    /// Records listed as stored, after the typed ones.
    raw_products: Vec<Value>,
    raw_orders: Vec<Value>,
    requests: Vec<CustomRequest>,
    content: Vec<PageContent>,
    uploads: Vec<String>,
    recorded: Vec<RecordedRequest>,
    next_id: i64,
    fail_updates: bool,
}

impl BackendState {
    const fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process stand-in for the marketplace backend.
#[derive(Debug, Clone)]
pub struct MockBackend {
    state: Shared,
    addr: SocketAddr,
}

impl MockBackend {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = Shared::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = router(Arc::clone(&state));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(Self { state, addr })
    }

    /// Base URL of the running server.
    ///
    /// # Panics
    ///
    /// Never in practice: a socket address always forms a valid URL.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("socket address forms a URL")
    }

    /// An API client pointed at this backend, sharing `session`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client(&self, session: SessionStore) -> ApiClient {
        ApiClient::new(&ClientConfig::new(self.url()), session).expect("client builds")
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).recorded.clone()
    }

    /// Requests received for `path`, e.g. `/api/orders`.
    #[must_use]
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Make every subsequent update fail with a 500.
    pub fn fail_updates(&self, fail: bool) {
        lock(&self.state).fail_updates = fail;
    }

    /// Add a product.
    ///
    /// # Panics
    ///
    /// Panics if the fields do not form a valid product.
    pub fn seed_product(&self, title: &str, price: f64, features: &[&str]) -> Product {
        let mut state = lock(&self.state);
        let id = state.next_id();
        let product: Product = materialize(with_fields(
            product_record(id),
            json!({
                "title": title,
                "price": price,
                "features": serde_json::to_string(features).unwrap_or_default(),
            }),
        ))
        .expect("seeded product is valid");
        state.products.push(product.clone());
        product
    }

    /// Add an order in `status`.
    ///
    /// # Panics
    ///
    /// Panics if the fields do not form a valid order.
    pub fn seed_order(&self, status: OrderStatus) -> Order {
        let mut state = lock(&self.state);
        let id = state.next_id();
        let order: Order = materialize(with_fields(order_record(id), json!({ "status": status })))
            .expect("seeded order is valid");
        state.orders.push(order.clone());
        order
    }

    /// Add a product stored exactly as given, such as one whose list
    /// columns hold free text. `fields` override a valid product's.
    /// Returns its id.
    pub fn seed_raw_product(&self, fields: Value) -> i64 {
        let mut state = lock(&self.state);
        let id = state.next_id();
        let record = with_fields(product_record(id), fields);
        state.raw_products.push(record);
        id
    }

    /// Add an order stored exactly as given, such as one in a status the
    /// client does not know. `fields` override a valid order's. Returns its
    /// id.
    pub fn seed_raw_order(&self, fields: Value) -> i64 {
        let mut state = lock(&self.state);
        let id = state.next_id();
        let record = with_fields(order_record(id), fields);
        state.raw_orders.push(record);
        id
    }

    /// Add a custom request in `status`.
    ///
    /// # Panics
    ///
    /// Panics if the fields do not form a valid request.
    pub fn seed_request(&self, status: CustomRequestStatus) -> CustomRequest {
        let mut state = lock(&self.state);
        let id = state.next_id();
        let request: CustomRequest = materialize(json!({
            "id": id,
            "customer_name": "Grace Hopper",
            "customer_email": "grace@example.com",
            "project_title": "Studio site",
            "project_scope": "Five page portfolio",
            "budget_range": "$1k-$5k",
            "status": status,
            "created_at": TIMESTAMP,
        }))
        .expect("seeded request is valid");
        state.requests.push(request.clone());
        request
    }

    /// Change an order's status behind the client's back, as another admin
    /// would.
    pub fn set_order_status(&self, id: i64, status: OrderStatus) {
        let mut state = lock(&self.state);
        if let Some(order) = state.orders.iter_mut().find(|o| o.id.as_i64() == id) {
            order.status = status;
        }
    }

    /// Current backend-side status of an order.
    #[must_use]
    pub fn order_status(&self, id: i64) -> Option<OrderStatus> {
        lock(&self.state)
            .orders
            .iter()
            .find(|o| o.id.as_i64() == id)
            .map(|o| o.status)
    }

    /// Names of files currently stored.
    #[must_use]
    pub fn uploads(&self) -> Vec<String> {
        lock(&self.state).uploads.clone()
    }
}

/// A session file path under the system temp dir that no other test uses.
#[must_use]
pub fn temp_session_path(label: &str) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir()
        .join(format!("atelier-it-{}-{label}-{n}", std::process::id()))
        .join("session.json")
}

fn lock(state: &Shared) -> MutexGuard<'_, BackendState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Routes
// =============================================================================

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/{id}", get(get_order).put(update_order))
        .route(
            "/api/custom-requests",
            get(list_requests).post(create_request),
        )
        .route("/api/custom-requests/{id}", put(update_request))
        .route("/api/content", get(list_content).post(create_content))
        .route("/api/content/{key}", get(get_content).put(update_content))
        .route("/api/upload", post(upload))
        .route("/api/upload/{filename}", delete(delete_upload))
        .layer(middleware::from_fn_with_state(Arc::clone(&state), record))
        .with_state(state)
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let recorded = RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_owned(),
        query: request.uri().query().map(str::to_owned),
        authorization: request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    };
    lock(&state).recorded.push(recorded);
    next.run(request).await
}

fn detail(status: StatusCode, message: &str) -> Failure {
    (status, Json(json!({ "detail": message })))
}

fn authorize(headers: &HeaderMap) -> Result<(), Failure> {
    let expected = format!("Bearer {VALID_TOKEN}");
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        Some(_) => Err(detail(
            StatusCode::UNAUTHORIZED,
            "Could not validate credentials",
        )),
        None => Err(detail(StatusCode::UNAUTHORIZED, "Not authenticated")),
    }
}

fn check_writable(state: &BackendState) -> Result<(), Failure> {
    if state.fail_updates {
        return Err(detail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Database unavailable",
        ));
    }
    Ok(())
}

fn product_record(id: i64) -> Value {
    json!({
        "id": id,
        "title": "Landing Page",
        "price": 99.0,
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    })
}

fn order_record(id: i64) -> Value {
    json!({
        "id": id,
        "customer_name": "Ada Lovelace",
        "customer_email": "ada@example.com",
        "order_type": "purchase",
        "total_amount": 120.0,
        "status": "pending",
        "created_at": TIMESTAMP,
    })
}

/// Typed records followed by raw ones, as one listing.
fn listing<T: serde::Serialize>(typed: &[T], raw: &[Value]) -> Result<Json<Vec<Value>>, Failure> {
    let mut listed = typed
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| detail(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;
    listed.extend_from_slice(raw);
    Ok(Json(listed))
}

fn materialize<T: DeserializeOwned>(value: Value) -> Result<T, Failure> {
    serde_json::from_value(value)
        .map_err(|e| detail(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()))
}

/// `body` with the server-assigned fields added.
fn with_fields(mut body: Value, fields: Value) -> Value {
    if let (Some(body), Value::Object(fields)) = (body.as_object_mut(), fields) {
        body.extend(fields);
    }
    body
}

/// `record` with the fields of `patch` that are set overwritten.
fn patched<T: serde::Serialize + DeserializeOwned>(record: &T, patch: Value) -> Result<T, Failure> {
    let mut current = serde_json::to_value(record)
        .map_err(|e| detail(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;
    if let (Some(current), Value::Object(patch)) = (current.as_object_mut(), patch) {
        current.extend(patch.into_iter().filter(|(_, v)| !v.is_null()));
    }
    materialize(current)
}

// =============================================================================
// Auth
// =============================================================================

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "message": "Mock backend is running" }))
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(Json(body): Json<LoginBody>) -> Result<Json<Value>, Failure> {
    if body.email == ADMIN_EMAIL && body.password == ADMIN_PASSWORD {
        Ok(Json(json!({ "access_token": VALID_TOKEN, "token_type": "bearer" })))
    } else {
        Err(detail(
            StatusCode::UNAUTHORIZED,
            "Incorrect email or password",
        ))
    }
}

async fn me(headers: HeaderMap) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    Ok(Json(json!({ "id": 1, "email": ADMIN_EMAIL, "created_at": TIMESTAMP })))
}

// =============================================================================
// Products
// =============================================================================

#[derive(Deserialize)]
struct ProductFilter {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_limit")]
    limit: usize,
    category: Option<String>,
    featured: Option<bool>,
}

const fn default_limit() -> usize {
    100
}

async fn list_products(
    State(state): State<Shared>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Value>>, Failure> {
    let state = lock(&state);
    let products: Vec<Product> = state
        .products
        .iter()
        .filter(|p| {
            filter
                .category
                .as_ref()
                .is_none_or(|c| p.category.as_ref() == Some(c))
        })
        .filter(|p| filter.featured.is_none_or(|f| p.is_featured == f))
        .skip(filter.skip)
        .take(filter.limit)
        .cloned()
        .collect();
    listing(&products, &state.raw_products)
}

async fn get_product(
    State(state): State<Shared>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, Failure> {
    lock(&state)
        .products
        .iter()
        .find(|p| p.id.as_i64() == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Product not found"))
}

async fn create_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Product>, Failure> {
    authorize(&headers)?;
    let mut state = lock(&state);
    check_writable(&state)?;
    let id = state.next_id();
    let product: Product = materialize(with_fields(
        body,
        json!({ "id": id, "created_at": TIMESTAMP, "updated_at": TIMESTAMP }),
    ))?;
    state.products.push(product.clone());
    Ok(Json(product))
}

async fn update_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Product>, Failure> {
    authorize(&headers)?;
    let mut state = lock(&state);
    check_writable(&state)?;
    let product = state
        .products
        .iter_mut()
        .find(|p| p.id.as_i64() == id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Product not found"))?;
    *product = patched(&*product, body)?;
    Ok(Json(product.clone()))
}

async fn delete_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    let mut state = lock(&state);
    check_writable(&state)?;
    let before = state.products.len();
    state.products.retain(|p| p.id.as_i64() != id);
    if state.products.len() == before {
        return Err(detail(StatusCode::NOT_FOUND, "Product not found"));
    }
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

// =============================================================================
// Orders
// =============================================================================

async fn list_orders(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Vec<Value>>, Failure> {
    authorize(&headers)?;
    let state = lock(&state);
    listing(&state.orders, &state.raw_orders)
}

async fn get_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Order>, Failure> {
    authorize(&headers)?;
    lock(&state)
        .orders
        .iter()
        .find(|o| o.id.as_i64() == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Order not found"))
}

async fn create_order(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> Result<Json<Order>, Failure> {
    let mut state = lock(&state);
    let id = state.next_id();
    let order: Order = materialize(with_fields(
        body,
        json!({ "id": id, "status": "pending", "created_at": TIMESTAMP }),
    ))?;
    state.orders.push(order.clone());
    Ok(Json(order))
}

async fn update_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Order>, Failure> {
    authorize(&headers)?;
    let mut state = lock(&state);
    check_writable(&state)?;
    let order = state
        .orders
        .iter_mut()
        .find(|o| o.id.as_i64() == id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Order not found"))?;
    *order = patched(&*order, with_fields(body, json!({ "updated_at": TIMESTAMP })))?;
    Ok(Json(order.clone()))
}

// =============================================================================
// Custom requests
// =============================================================================

async fn list_requests(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Vec<CustomRequest>>, Failure> {
    authorize(&headers)?;
    Ok(Json(lock(&state).requests.clone()))
}

async fn create_request(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> Result<Json<CustomRequest>, Failure> {
    let mut state = lock(&state);
    let id = state.next_id();
    let request: CustomRequest = materialize(with_fields(
        body,
        json!({ "id": id, "status": "pending", "created_at": TIMESTAMP }),
    ))?;
    state.requests.push(request.clone());
    Ok(Json(request))
}

async fn update_request(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<CustomRequest>, Failure> {
    authorize(&headers)?;
    let mut state = lock(&state);
    check_writable(&state)?;
    let request = state
        .requests
        .iter_mut()
        .find(|r| r.id.as_i64() == id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Custom request not found"))?;
    *request = patched(&*request, with_fields(body, json!({ "updated_at": TIMESTAMP })))?;
    Ok(Json(request.clone()))
}

// =============================================================================
// Content
// =============================================================================

async fn list_content(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Vec<PageContent>>, Failure> {
    authorize(&headers)?;
    Ok(Json(lock(&state).content.clone()))
}

async fn get_content(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Result<Json<PageContent>, Failure> {
    authorize(&headers)?;
    lock(&state)
        .content
        .iter()
        .find(|c| c.page_key == key)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Content not found"))
}

async fn create_content(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<PageContent>, Failure> {
    authorize(&headers)?;
    let mut state = lock(&state);
    let id = state.next_id();
    let content: PageContent = materialize(with_fields(
        body,
        json!({ "id": id, "created_at": TIMESTAMP, "updated_at": TIMESTAMP }),
    ))?;
    if state.content.iter().any(|c| c.page_key == content.page_key) {
        return Err(detail(
            StatusCode::BAD_REQUEST,
            "Content with this key already exists",
        ));
    }
    state.content.push(content.clone());
    Ok(Json(content))
}

async fn update_content(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<PageContent>, Failure> {
    authorize(&headers)?;
    let mut state = lock(&state);
    check_writable(&state)?;
    let content = state
        .content
        .iter_mut()
        .find(|c| c.page_key == key)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Content not found"))?;
    *content = patched(&*content, body)?;
    Ok(Json(content.clone()))
}

// =============================================================================
// Uploads
// =============================================================================

async fn upload(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| detail(StatusCode::BAD_REQUEST, &e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original = field.file_name().unwrap_or("upload.bin").to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| detail(StatusCode::BAD_REQUEST, &e.to_string()))?;

        let mut state = lock(&state);
        let stored = format!("{}_{original}", state.next_id());
        state.uploads.push(stored.clone());
        return Ok(Json(json!({
            "filename": stored,
            "url": format!("/uploads/{stored}"),
            "size": bytes.len(),
        })));
    }
    Err(detail(StatusCode::BAD_REQUEST, "No file provided"))
}

async fn delete_upload(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(filename): Path<String>,
) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    let mut state = lock(&state);
    let before = state.uploads.len();
    state.uploads.retain(|name| *name != filename);
    if state.uploads.len() == before {
        return Err(detail(StatusCode::NOT_FOUND, "File not found"));
    }
    Ok(Json(json!({ "message": "File deleted successfully" })))
}
