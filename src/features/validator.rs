//! Boundary validation: raw text records → [`FeatureRecord`], field-level errors otherwise.
//! Pure: no I/O, no classifier access.

use super::record::Category;
use super::{ContractLength, FeatureRecord, Gender, RawRecord, SubscriptionTier};
use crate::config::ValidationConfig;
use crate::error::{RowError, ValidationError};

/// Inclusive numeric domain for one column.
struct NumericField {
    column: &'static str,
    min: f64,
    max: f64,
    integral: bool,
}

impl NumericField {
    fn expected(&self) -> String {
        if self.integral {
            format!("an integer between {} and {}", self.min, self.max)
        } else {
            format!("a number between {:.1} and {:.1}", self.min, self.max)
        }
    }

    fn parse(&self, raw: &RawRecord) -> Result<f64, ValidationError> {
        let text = raw.get(self.column).ok_or(ValidationError::MissingField {
            field: self.column,
        })?;
        let domain_err = || ValidationError::FieldDomain {
            field: self.column,
            value: text.to_string(),
            expected: self.expected(),
        };
        let v: f64 = text.trim().parse().map_err(|_| domain_err())?;
        if !v.is_finite() || (self.integral && v.fract() != 0.0) {
            return Err(domain_err());
        }
        if v < self.min || v > self.max {
            return Err(domain_err());
        }
        Ok(v)
    }

    fn parse_u32(&self, raw: &RawRecord) -> Result<u32, ValidationError> {
        // integral and bounded well inside u32
        self.parse(raw).map(|v| v as u32)
    }
}

const AGE: NumericField = NumericField {
    column: "Age",
    min: 18.0,
    max: 100.0,
    integral: true,
};
const TENURE: NumericField = NumericField {
    column: "Tenure",
    min: 0.0,
    max: 100.0,
    integral: true,
};
const USAGE_FREQUENCY: NumericField = NumericField {
    column: "Usage Frequency",
    min: 0.0,
    max: 100.0,
    integral: true,
};
const SUPPORT_CALLS: NumericField = NumericField {
    column: "Support Calls",
    min: 0.0,
    max: 50.0,
    integral: true,
};
const PAYMENT_DELAY: NumericField = NumericField {
    column: "Payment Delay",
    min: 0.0,
    max: 100.0,
    integral: true,
};
const TOTAL_SPEND: NumericField = NumericField {
    column: "Total Spend",
    min: 0.0,
    max: 10000.0,
    integral: false,
};
const LAST_INTERACTION: NumericField = NumericField {
    column: "Last Interaction",
    min: 0.0,
    max: 365.0,
    integral: true,
};

/// A record that passed validation, tagged with its input position.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow {
    pub row: usize,
    pub record: FeatureRecord,
}

/// Outcome of validating a batch; both lists keep input order.
#[derive(Debug, Clone, Default)]
pub struct ValidatedBatch {
    pub records: Vec<ValidatedRow>,
    pub errors: Vec<RowError>,
}

#[derive(Debug, Clone, Default)]
pub struct FeatureValidator {
    config: ValidationConfig,
}

impl FeatureValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate one record. Fields are checked in training column order; the first
    /// failing field is reported.
    pub fn validate(&self, raw: &RawRecord) -> Result<FeatureRecord, ValidationError> {
        Ok(FeatureRecord {
            age: AGE.parse_u32(raw)?,
            gender: self.category::<Gender>(raw, "Gender")?,
            tenure: TENURE.parse_u32(raw)?,
            usage_frequency: USAGE_FREQUENCY.parse_u32(raw)?,
            support_calls: SUPPORT_CALLS.parse_u32(raw)?,
            payment_delay: PAYMENT_DELAY.parse_u32(raw)?,
            subscription: self.category::<SubscriptionTier>(raw, "Subscription Type")?,
            contract: self.category::<ContractLength>(raw, "Contract Length")?,
            total_spend: TOTAL_SPEND.parse(raw)?,
            last_interaction: LAST_INTERACTION.parse_u32(raw)?,
        })
    }

    /// Validate every row independently; a bad row never hides the others.
    pub fn validate_batch(&self, rows: &[RawRecord]) -> ValidatedBatch {
        self.validate_rows(rows.iter().enumerate())
    }

    /// Like [`validate_batch`](Self::validate_batch), for rows that carry their own index
    /// (table rows with unreadable neighbours already removed).
    pub fn validate_rows<'a, I>(&self, rows: I) -> ValidatedBatch
    where
        I: IntoIterator<Item = (usize, &'a RawRecord)>,
    {
        let mut out = ValidatedBatch::default();
        for (row, raw) in rows {
            match self.validate(raw) {
                Ok(record) => out.records.push(ValidatedRow { row, record }),
                Err(e) => {
                    tracing::debug!(row, field = e.field(), error = %e, "row rejected");
                    out.errors.push(RowError {
                        row,
                        reason: e.into(),
                    });
                }
            }
        }
        out
    }

    fn category<C: Category>(
        &self,
        raw: &RawRecord,
        field: &'static str,
    ) -> Result<C, ValidationError> {
        let text = raw.get(field).ok_or(ValidationError::MissingField { field })?;
        C::parse(text, self.config.case_sensitive).ok_or_else(|| ValidationError::FieldDomain {
            field,
            value: text.to_string(),
            expected: C::expected(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_fields_accept_float_spelling() {
        let raw = RawRecord::new().with("Age", "45.0");
        assert_eq!(AGE.parse_u32(&raw).unwrap(), 45);
    }

    #[test]
    fn integral_fields_reject_fractions() {
        let raw = RawRecord::new().with("Age", "45.5");
        assert!(matches!(
            AGE.parse_u32(&raw),
            Err(ValidationError::FieldDomain { field: "Age", .. })
        ));
    }

    #[test]
    fn non_finite_is_a_domain_error() {
        let raw = RawRecord::new().with("Total Spend", "NaN");
        assert!(TOTAL_SPEND.parse(&raw).is_err());
        let raw = RawRecord::new().with("Total Spend", "inf");
        assert!(TOTAL_SPEND.parse(&raw).is_err());
    }

    #[test]
    fn bounds_are_inclusive() {
        let raw = RawRecord::new().with("Last Interaction", "365");
        assert_eq!(LAST_INTERACTION.parse_u32(&raw).unwrap(), 365);
        let raw = RawRecord::new().with("Last Interaction", "366");
        assert!(LAST_INTERACTION.parse_u32(&raw).is_err());
        let raw = RawRecord::new().with("Total Spend", "10000");
        assert_eq!(TOTAL_SPEND.parse(&raw).unwrap(), 10000.0);
    }

    #[test]
    fn blank_cell_is_missing() {
        let raw = RawRecord::new().with("Tenure", "  ");
        assert_eq!(
            TENURE.parse_u32(&raw),
            Err(ValidationError::MissingField { field: "Tenure" })
        );
    }
}
