//! Polars column helpers.
//!
//! Converts dataset columns into plain vectors for the numeric code and maps
//! polars failures onto [`ScorecardError`].

use polars::prelude::{Column, DataFrame, DataType, PolarsError};
use scorecard_model::{Result, ScorecardError};

/// How a feature column enters a design matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Integer or float; passed through as one column.
    Numeric,
    /// Boolean; passed through as 0/1.
    Boolean,
    /// String or categorical; expanded into indicator columns.
    Categorical,
}

pub(crate) fn frame_error(error: PolarsError) -> ScorecardError {
    ScorecardError::Frame(error.to_string())
}

/// Look up a column, reporting a missing name as [`ScorecardError::MissingColumn`].
pub fn column<'a>(data: &'a DataFrame, name: &str) -> Result<&'a Column> {
    data.column(name)
        .map_err(|_| ScorecardError::MissingColumn {
            column: name.to_string(),
        })
}

pub fn column_kind(column: &Column) -> Result<ColumnKind> {
    let dtype = column.dtype();
    if dtype.is_bool() {
        Ok(ColumnKind::Boolean)
    } else if dtype.is_numeric() {
        Ok(ColumnKind::Numeric)
    } else if dtype.is_string() || dtype.is_categorical() {
        Ok(ColumnKind::Categorical)
    } else {
        Err(ScorecardError::UnsupportedColumnType {
            column: column.name().to_string(),
            dtype: dtype.to_string(),
        })
    }
}

/// Numeric column as `f64`, rejecting nulls.
pub fn numeric_values(column: &Column) -> Result<Vec<f64>> {
    let cast = column.cast(&DataType::Float64).map_err(frame_error)?;
    let values = cast.f64().map_err(frame_error)?;
    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| value.ok_or_else(|| null_value(column, row)))
        .collect()
}

/// Boolean column as 0/1, rejecting nulls.
pub fn boolean_values(column: &Column) -> Result<Vec<f64>> {
    let values = column.bool().map_err(frame_error)?;
    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(flag) => Ok(if flag { 1.0 } else { 0.0 }),
            None => Err(null_value(column, row)),
        })
        .collect()
}

/// String or categorical column as text; nulls stay `None`.
pub fn category_values(column: &Column) -> Result<Vec<Option<String>>> {
    let cast = column.cast(&DataType::String).map_err(frame_error)?;
    let values = cast.str().map_err(frame_error)?;
    Ok(values
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Derive a focal indicator by comparing every value of `column_name` to `focal_value`.
///
/// Numeric columns compare numerically (so `"3"` matches `3.0`), boolean
/// columns compare against `"true"`/`"false"`, and text columns compare
/// exactly. Null cells are never focal.
pub fn focal_indicator_from_column(
    data: &DataFrame,
    column_name: &str,
    focal_value: &str,
) -> Result<Vec<bool>> {
    let column = column(data, column_name)?;
    match column_kind(column)? {
        ColumnKind::Numeric => {
            let target: f64 =
                focal_value
                    .trim()
                    .parse()
                    .map_err(|_| ScorecardError::InvalidParameter {
                        name: "focal_value",
                        value: focal_value.to_string(),
                    })?;
            let cast = column.cast(&DataType::Float64).map_err(frame_error)?;
            let values = cast.f64().map_err(frame_error)?;
            Ok(values
                .into_iter()
                .map(|value| value.is_some_and(|v| v == target))
                .collect())
        }
        ColumnKind::Boolean => {
            let target = match focal_value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "y" | "yes" => true,
                "false" | "0" | "n" | "no" => false,
                _ => {
                    return Err(ScorecardError::InvalidParameter {
                        name: "focal_value",
                        value: focal_value.to_string(),
                    });
                }
            };
            let values = column.bool().map_err(frame_error)?;
            Ok(values
                .into_iter()
                .map(|value| value == Some(target))
                .collect())
        }
        ColumnKind::Categorical => Ok(category_values(column)?
            .into_iter()
            .map(|value| value.as_deref() == Some(focal_value))
            .collect()),
    }
}

fn null_value(column: &Column, row: usize) -> ScorecardError {
    ScorecardError::NullValue {
        column: column.name().to_string(),
        row,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("provider".into(), vec!["H1", "H2", "H1"]).into_column(),
            Series::new("site".into(), vec![3i64, 4, 3]).into_column(),
            Series::new("teaching".into(), vec![true, false, false]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn focal_from_text_column() {
        let focal = focal_indicator_from_column(&frame(), "provider", "H1").unwrap();
        assert_eq!(focal, vec![true, false, true]);
    }

    #[test]
    fn focal_from_numeric_column() {
        let focal = focal_indicator_from_column(&frame(), "site", "3").unwrap();
        assert_eq!(focal, vec![true, false, true]);
        assert!(focal_indicator_from_column(&frame(), "site", "three").is_err());
    }

    #[test]
    fn focal_from_boolean_column() {
        let focal = focal_indicator_from_column(&frame(), "teaching", "true").unwrap();
        assert_eq!(focal, vec![true, false, false]);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let err = focal_indicator_from_column(&frame(), "hospital", "H1").unwrap_err();
        assert!(matches!(err, ScorecardError::MissingColumn { column } if column == "hospital"));
    }

    #[test]
    fn numeric_nulls_are_rejected() {
        let data = DataFrame::new(vec![
            Series::new("age".into(), vec![Some(40.0), None]).into_column(),
        ])
        .unwrap();
        let err = numeric_values(column(&data, "age").unwrap()).unwrap_err();
        assert!(matches!(err, ScorecardError::NullValue { row: 1, .. }));
    }
}
