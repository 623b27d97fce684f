//! Column processor artifact
//!
//! Maps the raw record onto the model's feature space. Steps run in order
//! and their outputs are concatenated.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{FeatureRow, RecordTransformer, StageError};
use crate::record::{CustomerRecord, FieldValue, FIELD_NAMES};

/// What a one-hot step does with a value outside its category list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Error,
    /// Emit all zeros
    Ignore,
}

/// One encoding step over record columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStep {
    OneHot {
        column: String,
        categories: Vec<String>,
        #[serde(default)]
        drop_first: bool,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
    Ordinal {
        column: String,
        categories: Vec<String>,
    },
    Passthrough {
        columns: Vec<String>,
    },
}

impl ColumnStep {
    fn width(&self) -> usize {
        match self {
            ColumnStep::OneHot {
                categories,
                drop_first,
                ..
            } => categories.len().saturating_sub(usize::from(*drop_first)),
            ColumnStep::Ordinal { .. } => 1,
            ColumnStep::Passthrough { columns } => columns.len(),
        }
    }

    fn columns(&self) -> Vec<&str> {
        match self {
            ColumnStep::OneHot { column, .. } | ColumnStep::Ordinal { column, .. } => {
                vec![column.as_str()]
            }
            ColumnStep::Passthrough { columns } => columns.iter().map(String::as_str).collect(),
        }
    }

    fn apply(&self, record: &CustomerRecord, out: &mut FeatureRow) -> Result<(), StageError> {
        let lookup = |column: &str| {
            record.value(column).ok_or_else(|| StageError::UnknownColumn {
                column: column.to_string(),
            })
        };

        match self {
            ColumnStep::OneHot {
                column,
                categories,
                drop_first,
                handle_unknown,
            } => {
                let key = lookup(column)?.category_key();
                let position = categories.iter().position(|c| *c == key);
                if position.is_none() && *handle_unknown == HandleUnknown::Error {
                    return Err(StageError::UnknownCategory {
                        column: column.clone(),
                        value: key,
                    });
                }
                let skip = usize::from(*drop_first);
                out.extend((skip..categories.len()).map(|i| {
                    if Some(i) == position {
                        1.0
                    } else {
                        0.0
                    }
                }));
            }
            ColumnStep::Ordinal { column, categories } => {
                let key = lookup(column)?.category_key();
                let index = categories.iter().position(|c| *c == key).ok_or_else(|| {
                    StageError::UnknownCategory {
                        column: column.clone(),
                        value: key.clone(),
                    }
                })?;
                out.push(index as f64);
            }
            ColumnStep::Passthrough { columns } => {
                for column in columns {
                    match lookup(column)? {
                        FieldValue::Number(n) => out.push(n),
                        FieldValue::Category(_) => {
                            return Err(StageError::NotNumeric {
                                column: column.clone(),
                            })
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Fitted column processor, deserialized from `telco_churn_processing.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProcessor {
    pub format_version: u32,
    pub steps: Vec<ColumnStep>,
}

impl ColumnProcessor {
    /// Structural checks that do not need a record
    pub fn validate(&self) -> Result<(), String> {
        if self.steps.is_empty() {
            return Err("processor has no steps".to_string());
        }
        for step in &self.steps {
            for column in step.columns() {
                if !FIELD_NAMES.contains(&column) {
                    return Err(format!("processor references unknown column '{}'", column));
                }
            }
            match step {
                ColumnStep::OneHot {
                    column,
                    categories,
                    drop_first,
                    ..
                } => {
                    let unique: HashSet<&String> = categories.iter().collect();
                    if unique.len() != categories.len() {
                        return Err(format!("duplicate categories for column '{}'", column));
                    }
                    if categories.len() < 1 + usize::from(*drop_first) {
                        return Err(format!("too few categories for column '{}'", column));
                    }
                }
                ColumnStep::Ordinal { column, categories } if categories.is_empty() => {
                    return Err(format!("no categories for column '{}'", column));
                }
                ColumnStep::Passthrough { columns } if columns.is_empty() => {
                    return Err("passthrough step lists no columns".to_string());
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl RecordTransformer for ColumnProcessor {
    fn output_width(&self) -> usize {
        self.steps.iter().map(ColumnStep::width).sum()
    }

    fn transform_record(&self, record: &CustomerRecord) -> Result<FeatureRow, StageError> {
        let mut out = Vec::with_capacity(self.output_width());
        for step in &self.steps {
            step.apply(record, &mut out)?;
        }
        Ok(out)
    }
}
