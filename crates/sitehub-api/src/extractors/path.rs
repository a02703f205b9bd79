//! Typed path parameter extractors.
//!
//! Phase routes carry `{project_id}` and `{phase}`; item routes add `{id}`.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use sitehub_core::types::ProjectId;
use sitehub_core::{AppError, PhaseScope};

use crate::error::ApiError;

/// The phase a request addresses.
#[derive(Debug, Clone)]
pub struct PhasePath(pub PhaseScope);

/// One record inside the addressed phase.
#[derive(Debug, Clone)]
pub struct ItemPath<I> {
    /// The phase.
    pub scope: PhaseScope,
    /// The record ID.
    pub id: I,
}

async fn params<S: Send + Sync>(parts: &mut Parts, state: &S) -> Result<HashMap<String, String>, AppError> {
    let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
        .await
        .map_err(|e| AppError::validation(e.body_text()))?;
    Ok(params)
}

/// Parses a typed value from a named path segment.
pub fn parse_param<T: FromStr>(params: &HashMap<String, String>, name: &str) -> Result<T, AppError> {
    let raw = params
        .get(name)
        .ok_or_else(|| AppError::validation(format!("Missing path parameter: {name}")))?;
    raw.parse()
        .map_err(|_| AppError::validation(format!("Invalid {name}: {raw}")))
}

fn scope_from(params: &HashMap<String, String>) -> Result<PhaseScope, AppError> {
    let project_id: ProjectId = parse_param(params, "project_id")?;
    let phase: String = parse_param(params, "phase")?;
    PhaseScope::new(project_id, phase)
}

impl<S> FromRequestParts<S> for PhasePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = params(parts, state).await?;
        Ok(Self(scope_from(&params)?))
    }
}

impl<S, I> FromRequestParts<S> for ItemPath<I>
where
    S: Send + Sync,
    I: FromStr + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = params(parts, state).await?;
        Ok(Self {
            scope: scope_from(&params)?,
            id: parse_param(&params, "id")?,
        })
    }
}
