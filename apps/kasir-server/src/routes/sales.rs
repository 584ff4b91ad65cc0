//! Sales report endpoint.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use tracing::debug;

use kasir_core::{SaleReport, SalesFilter};

use crate::error::ApiError;
use crate::AppState;

/// `?from=&to=` query string. Values are parsed leniently.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl ReportParams {
    /// Picks `from` and `to` out of raw query pairs. The first occurrence of
    /// a repeated key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = ReportParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "from" => &mut params.from,
                "to" => &mut params.to,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// GET /api/sales
pub async fn sales_report(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<SaleReport>>, ApiError> {
    let params = match query {
        Ok(Query(pairs)) => ReportParams::from_pairs(pairs),
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Ignoring unreadable report query");
            ReportParams::default()
        }
    };

    let filter = SalesFilter::from_query(params.from.as_deref(), params.to.as_deref());
    Ok(Json(state.db.sales().report(&filter).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_repeated_key_wins() {
        let params = ReportParams::from_pairs(pairs(&[
            ("from", "2024-01-01"),
            ("from", "2024-02-01"),
            ("page", "3"),
            ("to", "2024-01-31"),
        ]));

        assert_eq!(params.from.as_deref(), Some("2024-01-01"));
        assert_eq!(params.to.as_deref(), Some("2024-01-31"));
    }

    #[test]
    fn test_no_pairs_is_open_range() {
        assert_eq!(ReportParams::from_pairs(Vec::new()), ReportParams::default());
    }
}
