// src/common/query.rs

use serde::Deserialize;

use crate::{
    common::error::AppError,
    models::{billing::RecordFilter, period::Period},
};

// ---
// Parâmetros numéricos da query string.
// Chegam como texto cru para que a mensagem de erro seja nossa, não a do axum.
// ---
fn parse_int<T: TryFrom<i64>>(name: &'static str, raw: &str) -> Result<T, AppError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidParameter(name))?;

    // Precisa ser finito e inteiro ("2024" e "2024.0" valem, "NaN" e "1.5" não)
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
        return Err(AppError::InvalidParameter(name));
    }

    T::try_from(value as i64).map_err(|_| AppError::InvalidParameter(name))
}

pub fn required<T: TryFrom<i64>>(name: &'static str, raw: Option<&str>) -> Result<T, AppError> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => parse_int(name, raw),
        _ => Err(AppError::MissingParameter(name)),
    }
}

pub fn optional<T: TryFrom<i64>>(name: &'static str, raw: Option<&str>) -> Result<Option<T>, AppError> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => parse_int(name, raw).map(Some),
        _ => Ok(None),
    }
}

// ?tenantId=&year=&month= (todos obrigatórios)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantPeriodQuery {
    pub tenant_id: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

impl TenantPeriodQuery {
    pub fn resolve(&self) -> Result<(i64, Period), AppError> {
        let tenant_id = required("tenantId", self.tenant_id.as_deref())?;
        let year = required("year", self.year.as_deref())?;
        let month = required("month", self.month.as_deref())?;
        Ok((tenant_id, Period::new(year, month)?))
    }
}

// ?tenantId=&year=&month= (todos opcionais)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilterQuery {
    pub tenant_id: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

impl RecordFilterQuery {
    pub fn resolve(&self) -> Result<RecordFilter, AppError> {
        Ok(RecordFilter {
            tenant_id: optional("tenantId", self.tenant_id.as_deref())?,
            year: optional("year", self.year.as_deref())?,
            month: optional("month", self.month.as_deref())?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_integral_numbers() {
        assert_eq!(required::<i32>("year", Some("2024")).unwrap(), 2024);
        assert_eq!(required::<i32>("year", Some(" 2024.0 ")).unwrap(), 2024);
    }

    #[test]
    fn rejects_non_finite_and_fractional_values() {
        for raw in ["NaN", "inf", "abc", "1.5", "1e400"] {
            assert!(
                matches!(required::<i64>("tenantId", Some(raw)), Err(AppError::InvalidParameter("tenantId"))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn missing_required_parameter_is_reported_by_name() {
        let query = TenantPeriodQuery {
            tenant_id: Some("1".into()),
            year: None,
            month: Some("3".into()),
        };
        assert!(matches!(query.resolve(), Err(AppError::MissingParameter("year"))));
    }

    #[test]
    fn out_of_range_month_is_an_invalid_period() {
        let query = TenantPeriodQuery {
            tenant_id: Some("1".into()),
            year: Some("2024".into()),
            month: Some("13".into()),
        };
        assert!(matches!(query.resolve(), Err(AppError::InvalidPeriod { month: 13, .. })));
    }

    #[test]
    fn extreme_years_are_an_invalid_period() {
        for year in ["-2147483648", "2147483647", "1969", "3001"] {
            let query = TenantPeriodQuery {
                tenant_id: Some("1".into()),
                year: Some(year.into()),
                month: Some("1".into()),
            };
            assert!(
                matches!(query.resolve(), Err(AppError::InvalidPeriod { month: 1, .. })),
                "{year} should be rejected"
            );
        }
    }

    #[test]
    fn record_filters_are_optional() {
        let filter = RecordFilterQuery {
            tenant_id: None,
            year: Some("2024".into()),
            month: Some("".into()),
        }
        .resolve()
        .unwrap();
        assert_eq!(filter, RecordFilter { tenant_id: None, year: Some(2024), month: None });
    }

    #[test]
    fn value_that_does_not_fit_the_target_type_is_invalid() {
        assert!(matches!(
            required::<i32>("year", Some("99999999999")),
            Err(AppError::InvalidParameter("year"))
        ));
    }
}
