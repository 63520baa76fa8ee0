// crates/civiserve-api/src/routes/db_tools.rs
// ============================================================================
// Module: Engine Bridge Endpoints
// Description: Sequence allocation, procedure, function, and view access.
// Purpose: Expose the registered routine bridge and the key allocator.
// Dependencies: axum, civiserve-core
// ============================================================================

//! ## Overview
//! Routine arguments arrive as query parameters keyed by the registry's
//! declared parameter names (or as a JSON object for POSTed procedures) and
//! are bound positionally in declaration order. Mutating procedures are
//! refused on GET so idempotent verbs stay idempotent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::routing::get;
use civiserve_core::EntityTable;
use civiserve_core::GatewayError;
use civiserve_core::ProcedureResult;
use civiserve_core::RoutineArg;
use civiserve_core::RoutineKind;
use civiserve_core::RoutineSpec;
use civiserve_core::RowMap;

use crate::error::ApiError;
use crate::error::run_blocking;
use crate::state::AppState;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Engine bridge endpoint group.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/db/next-id/{table}", get(next_id))
        .route("/db/procedures/{name}", get(call_procedure).post(call_procedure_json))
        .route("/db/functions/{name}", get(call_function))
        .route("/db/views/{view_name}", get(select_view))
}

// ============================================================================
// SECTION: Argument Binding
// ============================================================================

/// Resolves the table segment against the entity catalog.
fn resolve_table(segment: &str) -> Result<EntityTable, ApiError> {
    EntityTable::ALL
        .into_iter()
        .find(|table| table.table_name().eq_ignore_ascii_case(segment))
        .ok_or_else(|| {
            ApiError::from(GatewayError::NotFound(format!("table {segment}")))
        })
}

/// Binds query-string values to the routine's declared parameters.
///
/// Values parse as integers when they look like integers, otherwise they
/// bind as text. A declared parameter missing from the query string is a
/// caller error.
fn bind_query_args(
    spec: &RoutineSpec,
    query: &HashMap<String, String>,
) -> Result<Vec<RoutineArg>, ApiError> {
    let mut args = Vec::with_capacity(spec.params.len());
    for param in spec.params {
        let raw = query.get(*param).ok_or_else(|| {
            ApiError::from(GatewayError::InvalidInput(format!(
                "missing argument: {param}"
            )))
        })?;
        args.push(raw.parse::<i64>().map_or_else(
            |_| RoutineArg::Text(raw.clone()),
            RoutineArg::Int,
        ));
    }
    Ok(args)
}

/// Binds a JSON body object to the routine's declared parameters.
fn bind_json_args(
    spec: &RoutineSpec,
    body: &serde_json::Map<String, serde_json::Value>,
) -> Result<Vec<RoutineArg>, ApiError> {
    let mut args = Vec::with_capacity(spec.params.len());
    for param in spec.params {
        let value = body.get(*param).ok_or_else(|| {
            ApiError::from(GatewayError::InvalidInput(format!(
                "missing argument: {param}"
            )))
        })?;
        let arg = match value {
            serde_json::Value::Number(n) => n.as_i64().map(RoutineArg::Int).ok_or_else(|| {
                ApiError::from(GatewayError::InvalidInput(format!(
                    "argument {param} must be an integer or a string"
                )))
            })?,
            serde_json::Value::String(s) => RoutineArg::Text(s.clone()),
            _ => {
                return Err(ApiError::from(GatewayError::InvalidInput(format!(
                    "argument {param} must be an integer or a string"
                ))));
            }
        };
        args.push(arg);
    }
    Ok(args)
}

/// Looks up a registered routine of the given family.
fn lookup(state: &AppState, kind: RoutineKind, name: &str) -> Result<RoutineSpec, ApiError> {
    state
        .routines
        .get(kind, name)
        .copied()
        .ok_or_else(|| ApiError::from(GatewayError::UnknownRoutine(name.to_string())))
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Reserves and returns the next primary key for a table.
pub(crate) async fn next_id(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let entity = resolve_table(&table)?;
    let gateway = Arc::clone(&state.gateway);
    let id = run_blocking(move || gateway.allocate(entity)).await?;
    Ok(Json(serde_json::json!({
        "table": entity.table_name(),
        "next_id": id,
    })))
}

/// Invokes a read-only registered procedure and returns its bare row set.
pub(crate) async fn call_procedure(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<ProcedureResult>, ApiError> {
    let spec = lookup(&state, RoutineKind::Procedure, &name)?;
    if spec.mutating {
        return Err(ApiError::from(GatewayError::InvalidInput(format!(
            "procedure {name} mutates state and requires POST"
        ))));
    }
    let args = bind_query_args(&spec, &query)?;
    let gateway = Arc::clone(&state.gateway);
    let result = run_blocking(move || gateway.call_procedure(&name, &args)).await?;
    Ok(Json(result))
}

/// Invokes a registered procedure with a JSON argument object.
///
/// Mutating procedures answer with a confirmation object; row-producing
/// ones answer with their rows, same as the GET form.
pub(crate) async fn call_procedure_json(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<serde_json::Map<String, serde_json::Value>>,
) -> Result<Json<ProcedureResult>, ApiError> {
    let spec = lookup(&state, RoutineKind::Procedure, &name)?;
    let args = bind_json_args(&spec, &body)?;
    let gateway = Arc::clone(&state.gateway);
    let result = run_blocking(move || gateway.call_procedure(&name, &args)).await?;
    Ok(Json(result))
}

/// Evaluates a registered scalar function.
pub(crate) async fn call_function(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<RowMap>, ApiError> {
    let spec = lookup(&state, RoutineKind::Function, &name)?;
    let args = bind_query_args(&spec, &query)?;
    let gateway = Arc::clone(&state.gateway);
    let row = run_blocking(move || gateway.call_function(&name, &args)).await?;
    Ok(Json(row))
}

/// Reads every row of a whitelisted view.
pub(crate) async fn select_view(
    State(state): State<AppState>,
    Path(view_name): Path<String>,
) -> Result<Json<Vec<RowMap>>, ApiError> {
    let gateway = Arc::clone(&state.gateway);
    let rows = run_blocking(move || gateway.select_view(&view_name)).await?;
    Ok(Json(rows))
}
