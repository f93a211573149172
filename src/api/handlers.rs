//! HTTP request handlers for the back-office API.
//!
//! Every handler resolves the caller from the `x-user-id` header, performs
//! at most one read-modify-write against the store, and answers with JSON.
//! Failures are logged with the request's correlation id and returned as
//! [`ApiError`] bodies.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::access::{self, Identity};
use crate::attendance::{self, AttendanceSheet, AttendanceSummary, ManualEdit};
use crate::error::{BackofficeError, BackofficeResult};
use crate::listing::{self, BillDraft, CustomerDraft, KeepDraft, ProductDraft, Registration};
use crate::models::{AttendanceRecord, Customer, Role, User};
use crate::repository::{Entity, Repository};

use super::request::{
    AttendanceQuery, CustomerQuery, PunchRequest, ScheduleRequest, SearchQuery, UserQuery,
};
use super::response::{ApiError, ApiErrorResponse, BillView, HealthResponse, MonthlyTotalResponse};
use super::state::AppState;

/// Header carrying the acting user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

type ApiResult<T> = Result<T, ApiErrorResponse>;

type PunchAction =
    fn(&[AttendanceRecord], &str, NaiveDate, DateTime<Utc>) -> BackofficeResult<AttendanceRecord>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/users", get(list_users_handler).post(register_user_handler))
        .route("/casts", get(list_casts_handler))
        .route(
            "/customers",
            get(list_customers_handler).post(create_customer_handler),
        )
        .route("/customers/:id", put(update_customer_handler))
        .route("/customers/:id/visits", post(add_visit_handler))
        .route(
            "/products",
            get(list_products_handler).post(save_product_handler),
        )
        .route("/products/:id", delete(delete_product_handler))
        .route("/keeps", get(list_keeps_handler).post(save_keep_handler))
        .route("/keeps/:id", delete(delete_keep_handler))
        .route("/bills", get(list_bills_handler).post(save_bill_handler))
        .route("/bills/monthly-total", get(monthly_total_handler))
        .route("/bills/:id", delete(delete_bill_handler))
        .route("/attendance", get(attendance_handler))
        .route("/attendance/clock-in", post(clock_in_handler))
        .route("/attendance/break-start", post(break_start_handler))
        .route("/attendance/break-end", post(break_end_handler))
        .route("/attendance/clock-out", post(clock_out_handler))
        .route("/attendance/schedule", post(schedule_handler))
        .route("/attendance/:id/manual", put(manual_edit_handler))
        .with_state(state)
}

// =============================================================================
// Request plumbing
// =============================================================================

/// Logs a rejected request and turns the result into a response.
fn finish(correlation_id: Uuid, action: &'static str, result: ApiResult<Response>) -> Response {
    match result {
        Ok(response) => response,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                action = action,
                status = err.status.as_u16(),
                code = %err.error.code,
                error = %err.error.message,
                "Request rejected"
            );
            err.into_response()
        }
    }
}

/// Unwraps a JSON body, mapping rejections to API errors.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's description of the problem
            let body_text = err.body_text();
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            ApiError::malformed_json(format!("Invalid JSON syntax: {err}"))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| {
            ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
        })
}

fn path_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    path.map(|Path(id)| id).map_err(|rejection| {
        ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
    })
}

/// Looks up the user named by the identity header, if any.
async fn current_user(state: &AppState, headers: &HeaderMap) -> ApiResult<Option<User>> {
    let Some(value) = headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    let user_id = value
        .to_str()
        .map_err(|_| BackofficeError::Unauthenticated)?
        .trim()
        .to_string();
    if user_id.is_empty() {
        return Ok(None);
    }
    Ok(state.store().users.get(&user_id).await?)
}

async fn require_user(state: &AppState, headers: &HeaderMap) -> ApiResult<User> {
    let user = current_user(state, headers).await?;
    let identity = user.as_ref().map(Identity::from);
    access::require_identity(identity.as_ref())?;
    user.ok_or_else(|| BackofficeError::Unauthenticated.into())
}

fn not_found<T: Entity>(id: impl ToString) -> BackofficeError {
    BackofficeError::NotFound {
        collection: T::COLLECTION.to_string(),
        id: id.to_string(),
    }
}

fn local_today(state: &AppState, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&state.offset()).date_naive()
}

// =============================================================================
// Health
// =============================================================================

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        venue: state.config().venue().name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Users
// =============================================================================

/// Handler for GET /users.
async fn list_users_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Listing users");
    finish(correlation_id, "list_users", list_users(&state, &headers, query).await)
}

async fn list_users(
    state: &AppState,
    headers: &HeaderMap,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let caller = require_user(state, headers).await?;
    access::require_manager(&Identity::from(&caller))?;
    let query = query_params(query)?;

    let users = listing::filter_by_role(state.store().users.list().await?, query.role);
    Ok(Json(users).into_response())
}

/// Handler for POST /users.
///
/// While no user exists, a single owner may be registered without an identity.
async fn register_user_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Registration>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing registration");
    finish(
        correlation_id,
        "register_user",
        register_user(&state, &headers, payload, correlation_id).await,
    )
}

async fn register_user(
    state: &AppState,
    headers: &HeaderMap,
    payload: Result<Json<Registration>, JsonRejection>,
    correlation_id: Uuid,
) -> ApiResult<Response> {
    let registration = json_body(payload)?;
    let users = state.store().users.list().await?;

    if users.is_empty() {
        if registration.role != Role::Owner {
            return Err(BackofficeError::forbidden("the first registered user must be an owner").into());
        }
    } else {
        let caller = current_user(state, headers).await?;
        let identity = caller.as_ref().map(Identity::from);
        access::authorize_registration(identity.as_ref(), registration.role)?;
    }
    listing::ensure_unique_email(&users, &registration.email)?;

    let user = registration.into_user(Uuid::new_v4().to_string(), Utc::now())?;
    state.store().users.save(user.clone()).await?;
    info!(
        correlation_id = %correlation_id,
        user_id = %user.id,
        role = %user.role,
        "User registered"
    );
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

/// Handler for GET /casts.
async fn list_casts_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Listing casts");
    finish(correlation_id, "list_casts", list_casts(&state, &headers).await)
}

async fn list_casts(state: &AppState, headers: &HeaderMap) -> ApiResult<Response> {
    require_user(state, headers).await?;
    let users = state.store().users.list().await?;
    Ok(Json(listing::casts(&users)).into_response())
}

// =============================================================================
// Customers
// =============================================================================

/// Handler for GET /customers.
async fn list_customers_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<CustomerQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Listing customers");
    finish(
        correlation_id,
        "list_customers",
        list_customers(&state, &headers, query).await,
    )
}

async fn list_customers(
    state: &AppState,
    headers: &HeaderMap,
    query: Result<Query<CustomerQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let caller = require_user(state, headers).await?;
    let query = query_params(query)?;

    let visible = access::visible_customers(
        &Identity::from(&caller),
        state.store().customers.list().await?,
    );
    let mut customers = listing::search_customers(visible, query.search.as_deref());
    listing::sort_customers(&mut customers, query.sort);
    Ok(Json(customers).into_response())
}

/// Handler for POST /customers.
async fn create_customer_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CustomerDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Creating customer");
    finish(
        correlation_id,
        "create_customer",
        create_customer(&state, &headers, payload, correlation_id).await,
    )
}

async fn create_customer(
    state: &AppState,
    headers: &HeaderMap,
    payload: Result<Json<CustomerDraft>, JsonRejection>,
    correlation_id: Uuid,
) -> ApiResult<Response> {
    let caller = require_user(state, headers).await?;
    let draft = json_body(payload)?;

    let customer = draft.create(Utc::now().timestamp_millis(), &Identity::from(&caller))?;
    state.store().customers.save(customer.clone()).await?;
    info!(
        correlation_id = %correlation_id,
        customer_id = customer.id,
        cast_id = %customer.cast_id,
        "Customer created"
    );
    Ok((StatusCode::CREATED, Json(customer)).into_response())
}

/// Loads a customer the caller is allowed to see.
async fn visible_customer(state: &AppState, caller: &User, id: i64) -> ApiResult<Customer> {
    let customer = state
        .store()
        .customers
        .get(&id)
        .await?
        .ok_or_else(|| not_found::<Customer>(id))?;
    if !access::can_view_customer(&Identity::from(caller), &customer) {
        return Err(BackofficeError::forbidden(format!(
            "customer {id} is assigned to another cast"
        ))
        .into());
    }
    Ok(customer)
}

/// Handler for PUT /customers/:id.
async fn update_customer_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CustomerDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Updating customer");
    finish(
        correlation_id,
        "update_customer",
        update_customer(&state, &headers, path, payload, correlation_id).await,
    )
}

async fn update_customer(
    state: &AppState,
    headers: &HeaderMap,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CustomerDraft>, JsonRejection>,
    correlation_id: Uuid,
) -> ApiResult<Response> {
    let caller = require_user(state, headers).await?;
    let id = path_id(path)?;
    let draft = json_body(payload)?;

    let existing = visible_customer(state, &caller, id).await?;
    let customer = draft.update(&existing, &Identity::from(&caller))?;
    state.store().customers.save(customer.clone()).await?;
    info!(correlation_id = %correlation_id, customer_id = id, "Customer updated");
    Ok(Json(customer).into_response())
}

/// Handler for POST /customers/:id/visits.
async fn add_visit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Recording visit");
    finish(
        correlation_id,
        "add_visit",
        add_visit(&state, &headers, path, correlation_id).await,
    )
}

async fn add_visit(
    state: &AppState,
    headers: &HeaderMap,
    path: Result<Path<i64>, PathRejection>,
    correlation_id: Uuid,
) -> ApiResult<Response> {
    let caller = require_user(state, headers).await?;
    let id = path_id(path)?;

    let mut customer = visible_customer(state, &caller, id).await?;
    let today = local_today(state, Utc::now());
    listing::add_visit(&mut customer, today);
    state.store().customers.save(customer.clone()).await?;
    info!(correlation_id = %correlation_id, customer_id = id, date = %today, "Visit recorded");
    Ok(Json(customer).into_response())
}

// =============================================================================
// Products and keeps
// =============================================================================

/// Handler for GET /products.
async fn list_products_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Listing products");
    finish(
        correlation_id,
        "list_products",
        list_products(&state, &headers, query).await,
    )
}

async fn list_products(
    state: &AppState,
    headers: &HeaderMap,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Response> {
    require_user(state, headers).await?;
    let query = query_params(query)?;
    let products = state.store().products.list().await?;
    Ok(Json(listing::search_products(products, query.search.as_deref())).into_response())
}

/// Handler for POST /products.
async fn save_product_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ProductDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Saving product");
    finish(
        correlation_id,
        "save_product",
        save_product(&state, &headers, payload, correlation_id).await,
    )
}

async fn save_product(
    state: &AppState,
    headers: &HeaderMap,
    payload: Result<Json<ProductDraft>, JsonRejection>,
    correlation_id: Uuid,
) -> ApiResult<Response> {
    require_user(state, headers).await?;
    let product = json_body(payload)?.into_product(Utc::now())?;
    state.store().products.save(product.clone()).await?;
    info!(
        correlation_id = %correlation_id,
        product_id = product.id,
        price = %product.price,
        "Product saved"
    );
    Ok(Json(product).into_response())
}

/// Handler for DELETE /products/:id.
async fn delete_product_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Deleting product");
    let result = async {
        require_user(&state, &headers).await?;
        let id = path_id(path)?;
        state.store().products.delete(&id).await?;
        info!(correlation_id = %correlation_id, product_id = id, "Product deleted");
        Ok::<_, ApiErrorResponse>(StatusCode::NO_CONTENT.into_response())
    }
    .await;
    finish(correlation_id, "delete_product", result)
}

/// Handler for GET /keeps.
async fn list_keeps_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Listing keeps");
    finish(correlation_id, "list_keeps", list_keeps(&state, &headers, query).await)
}

async fn list_keeps(
    state: &AppState,
    headers: &HeaderMap,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Response> {
    require_user(state, headers).await?;
    let query = query_params(query)?;

    let store = state.store();
    let keeps = store.keeps.list().await?;
    let customers = store.customers.list().await?;
    let products = store.products.list().await?;
    let found = listing::search_keeps(keeps, &customers, &products, query.search.as_deref());
    Ok(Json(found).into_response())
}

/// Handler for POST /keeps.
async fn save_keep_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<KeepDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Saving keep");
    finish(
        correlation_id,
        "save_keep",
        save_keep(&state, &headers, payload, correlation_id).await,
    )
}

async fn save_keep(
    state: &AppState,
    headers: &HeaderMap,
    payload: Result<Json<KeepDraft>, JsonRejection>,
    correlation_id: Uuid,
) -> ApiResult<Response> {
    require_user(state, headers).await?;
    let keep = json_body(payload)?.into_keep(Utc::now());

    let store = state.store();
    if store.customers.get(&keep.customer_id).await?.is_none() {
        return Err(BackofficeError::validation("customerId", "unknown customer").into());
    }
    if store.products.get(&keep.product_id).await?.is_none() {
        return Err(BackofficeError::validation("productId", "unknown product").into());
    }

    store.keeps.save(keep.clone()).await?;
    info!(
        correlation_id = %correlation_id,
        keep_id = keep.id,
        customer_id = keep.customer_id,
        product_id = keep.product_id,
        "Keep saved"
    );
    Ok(Json(keep).into_response())
}

/// Handler for DELETE /keeps/:id.
async fn delete_keep_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Deleting keep");
    let result = async {
        require_user(&state, &headers).await?;
        let id = path_id(path)?;
        state.store().keeps.delete(&id).await?;
        info!(correlation_id = %correlation_id, keep_id = id, "Keep deleted");
        Ok::<_, ApiErrorResponse>(StatusCode::NO_CONTENT.into_response())
    }
    .await;
    finish(correlation_id, "delete_keep", result)
}

// =============================================================================
// Bills
// =============================================================================

/// Handler for GET /bills.
async fn list_bills_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Listing bills");
    finish(correlation_id, "list_bills", list_bills(&state, &headers, query).await)
}

async fn list_bills(
    state: &AppState,
    headers: &HeaderMap,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Response> {
    require_user(state, headers).await?;
    let query = query_params(query)?;

    let customers = state.store().customers.list().await?;
    let mut bills = state.store().bills.list().await?;
    listing::sort_newest_first(&mut bills);
    let views: Vec<BillView> = listing::search_bills(bills, &customers, query.search.as_deref())
        .into_iter()
        .map(|bill| BillView {
            customer: listing::customer_label(&customers, bill.customer_id),
            total: bill.total(),
            bill,
        })
        .collect();
    Ok(Json(views).into_response())
}

/// Handler for POST /bills.
async fn save_bill_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<BillDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Saving bill");
    finish(
        correlation_id,
        "save_bill",
        save_bill(&state, &headers, payload, correlation_id).await,
    )
}

async fn save_bill(
    state: &AppState,
    headers: &HeaderMap,
    payload: Result<Json<BillDraft>, JsonRejection>,
    correlation_id: Uuid,
) -> ApiResult<Response> {
    require_user(state, headers).await?;
    let draft = json_body(payload)?;

    let users = state.store().users.list().await?;
    let cast = draft.resolve_cast(&users)?;
    let bill = draft.into_bill(&cast, Utc::now())?;
    state.store().bills.save(bill.clone()).await?;
    info!(
        correlation_id = %correlation_id,
        bill_id = bill.id,
        cast = %bill.cast,
        total = %bill.total(),
        "Bill saved"
    );
    Ok((StatusCode::CREATED, Json(bill)).into_response())
}

/// Handler for DELETE /bills/:id.
async fn delete_bill_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Deleting bill");
    let result = async {
        require_user(&state, &headers).await?;
        let id = path_id(path)?;
        state.store().bills.delete(&id).await?;
        info!(correlation_id = %correlation_id, bill_id = id, "Bill deleted");
        Ok::<_, ApiErrorResponse>(StatusCode::NO_CONTENT.into_response())
    }
    .await;
    finish(correlation_id, "delete_bill", result)
}

/// Handler for GET /bills/monthly-total.
async fn monthly_total_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Computing monthly total");
    let result = async {
        let caller = require_user(&state, &headers).await?;
        let bills = state.store().bills.list().await?;
        let now = Utc::now();
        let offset = state.offset();
        Ok::<_, ApiErrorResponse>(
            Json(MonthlyTotalResponse {
                total: listing::monthly_total(&bills, &caller.name, now, offset),
                month: now.with_timezone(&offset).format("%Y-%m").to_string(),
                cast: caller.name,
            })
            .into_response(),
        )
    }
    .await;
    finish(correlation_id, "monthly_total", result)
}

// =============================================================================
// Attendance
// =============================================================================

/// Resolves whose attendance a request is about.
///
/// Anyone may address their own records. Addressing another user requires a
/// managerial role, and the target must be a cast or staff member.
async fn attendance_target(
    state: &AppState,
    caller: &User,
    requested: Option<&str>,
) -> ApiResult<String> {
    let requested = requested.map(str::trim).filter(|id| !id.is_empty());
    let Some(target) = requested.filter(|id| *id != caller.id) else {
        return Ok(caller.id.clone());
    };

    access::authorize_attendance_view(&Identity::from(caller), target)?;
    let users = state.store().users.list().await?;
    if access::attendance_candidates(&users)
        .iter()
        .any(|u| u.id == target)
    {
        Ok(target.to_string())
    } else {
        Err(not_found::<User>(target).into())
    }
}

/// Handler for GET /attendance.
async fn attendance_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<AttendanceQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Loading attendance");
    finish(
        correlation_id,
        "attendance",
        attendance_sheet(&state, &headers, query).await,
    )
}

async fn attendance_sheet(
    state: &AppState,
    headers: &HeaderMap,
    query: Result<Query<AttendanceQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let caller = require_user(state, headers).await?;
    let query = query_params(query)?;
    let target = attendance_target(state, &caller, query.user_id.as_deref()).await?;

    let records = state.store().attendance.list().await?;
    let sheet = AttendanceSheet::build(&records, &target, state.offset());
    Ok(Json(sheet).into_response())
}

async fn punch(
    state: &AppState,
    headers: &HeaderMap,
    payload: Result<Json<PunchRequest>, JsonRejection>,
    action: PunchAction,
    correlation_id: Uuid,
) -> ApiResult<Response> {
    let caller = require_user(state, headers).await?;
    let request = json_body(payload)?;
    if let Some(user_id) = request.user_id.as_deref() {
        access::authorize_punch(&Identity::from(&caller), user_id)?;
    }

    let now = Utc::now();
    let date = request.date.unwrap_or_else(|| local_today(state, now));
    let records = state.store().attendance.list().await?;
    let record = action(&records, &caller.id, date, now)?;
    state.store().attendance.save(record.clone()).await?;
    info!(
        correlation_id = %correlation_id,
        user_id = %caller.id,
        record_id = record.id,
        date = %date,
        "Attendance punched"
    );
    Ok(Json(AttendanceSummary::from_record(&record, state.offset())).into_response())
}

/// Handler for POST /attendance/clock-in.
async fn clock_in_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing clock-in");
    let result = punch(&state, &headers, payload, attendance::clock_in, correlation_id).await;
    finish(correlation_id, "clock_in", result)
}

/// Handler for POST /attendance/break-start.
async fn break_start_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing break start");
    let result = punch(&state, &headers, payload, attendance::start_break, correlation_id).await;
    finish(correlation_id, "break_start", result)
}

/// Handler for POST /attendance/break-end.
async fn break_end_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing break end");
    let result = punch(&state, &headers, payload, attendance::end_break, correlation_id).await;
    finish(correlation_id, "break_end", result)
}

/// Handler for POST /attendance/clock-out.
async fn clock_out_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing clock-out");
    let result = punch(&state, &headers, payload, attendance::clock_out, correlation_id).await;
    finish(correlation_id, "clock_out", result)
}

/// Handler for POST /attendance/schedule.
async fn schedule_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing schedule");
    finish(
        correlation_id,
        "schedule",
        schedule(&state, &headers, payload, correlation_id).await,
    )
}

async fn schedule(
    state: &AppState,
    headers: &HeaderMap,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
    correlation_id: Uuid,
) -> ApiResult<Response> {
    let caller = require_user(state, headers).await?;
    let request = json_body(payload)?;
    let target = attendance_target(state, &caller, request.user_id.as_deref()).await?;

    let venue = state.config().venue();
    let planned_start = request
        .planned_start
        .as_deref()
        .unwrap_or(&venue.default_schedule_start);
    let planned_end = request
        .planned_end
        .as_deref()
        .unwrap_or(&venue.default_schedule_end);

    let records = state.store().attendance.list().await?;
    let record = attendance::add_schedule(
        &records,
        &target,
        request.date,
        planned_start,
        planned_end,
        Utc::now(),
    )?;
    state.store().attendance.save(record.clone()).await?;
    info!(
        correlation_id = %correlation_id,
        user_id = %target,
        record_id = record.id,
        date = %request.date,
        "Schedule saved"
    );
    Ok(Json(AttendanceSummary::from_record(&record, state.offset())).into_response())
}

/// Handler for PUT /attendance/:id/manual.
async fn manual_edit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ManualEdit>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing manual edit");
    finish(
        correlation_id,
        "manual_edit",
        manual_edit(&state, &headers, path, payload, correlation_id).await,
    )
}

async fn manual_edit(
    state: &AppState,
    headers: &HeaderMap,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ManualEdit>, JsonRejection>,
    correlation_id: Uuid,
) -> ApiResult<Response> {
    let caller = require_user(state, headers).await?;
    let id = path_id(path)?;
    let edit = json_body(payload)?;

    let mut record = state
        .store()
        .attendance
        .get(&id)
        .await?
        .ok_or_else(|| not_found::<AttendanceRecord>(id))?;
    attendance_target(state, &caller, Some(&record.user_id)).await?;

    attendance::apply_manual_edit(&mut record, &edit, state.offset())?;
    state.store().attendance.save(record.clone()).await?;
    info!(
        correlation_id = %correlation_id,
        record_id = record.id,
        user_id = %record.user_id,
        editor = %caller.id,
        "Attendance corrected"
    );
    Ok(Json(AttendanceSummary::from_record(&record, state.offset())).into_response())
}
