//! Feature record validation: domains, categorical policy, missing fields, batch isolation.

mod common;

use churn_scorer::config::ValidationConfig;
use churn_scorer::error::{RowFailure, ValidationError};
use churn_scorer::features::{
    ContractLength, FeatureRecord, FeatureValidator, Gender, SubscriptionTier,
};
use common::{raw_with, raw_without, sample_raw};

fn validator() -> FeatureValidator {
    FeatureValidator::new(ValidationConfig::default())
}

#[test]
fn reference_customer_validates() {
    let record = validator().validate(&sample_raw()).unwrap();
    assert_eq!(
        record,
        FeatureRecord {
            age: 45,
            gender: Gender::Male,
            tenure: 2,
            usage_frequency: 5,
            support_calls: 8,
            payment_delay: 30,
            subscription: SubscriptionTier::Basic,
            contract: ContractLength::Monthly,
            total_spend: 120.0,
            last_interaction: 60,
        }
    );
}

#[test]
fn encoded_row_follows_training_column_order() {
    let record = validator().validate(&sample_raw()).unwrap();
    assert_eq!(
        record.to_row().values,
        vec![45.0, 0.0, 2.0, 5.0, 8.0, 30.0, 0.0, 0.0, 120.0, 60.0]
    );
}

#[test]
fn categories_match_case_insensitively_by_default() {
    let v = validator();
    let record = v.validate(&raw_with("Subscription Type", " premium ")).unwrap();
    assert_eq!(record.subscription, SubscriptionTier::Premium);
    let record = v.validate(&raw_with("Contract Length", "ANNUAL")).unwrap();
    assert_eq!(record.contract, ContractLength::Annual);
    let record = v.validate(&raw_with("Gender", "female")).unwrap();
    assert_eq!(record.gender, Gender::Female);
}

#[test]
fn strict_case_policy_rejects_other_spellings() {
    let v = FeatureValidator::new(ValidationConfig {
        case_sensitive: true,
    });
    let err = v.validate(&raw_with("Gender", "male")).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::FieldDomain { field: "Gender", ref value, .. } if value == "male"
    ));
}

#[test]
fn unknown_category_names_allowed_values() {
    let err = validator()
        .validate(&raw_with("Subscription Type", "Gold"))
        .unwrap_err();
    match err {
        ValidationError::FieldDomain {
            field,
            value,
            expected,
        } => {
            assert_eq!(field, "Subscription Type");
            assert_eq!(value, "Gold");
            assert!(expected.contains("Basic, Standard, Premium"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn out_of_range_numeric_names_field_and_value() {
    let err = validator().validate(&raw_with("Age", "17")).unwrap_err();
    assert_eq!(err.field(), "Age");
    let msg = err.to_string();
    assert!(msg.contains("Age"));
    assert!(msg.contains("17"));

    let err = validator()
        .validate(&raw_with("Total Spend", "10000.5"))
        .unwrap_err();
    assert_eq!(err.field(), "Total Spend");
}

#[test]
fn non_numeric_is_a_domain_error() {
    let err = validator()
        .validate(&raw_with("Support Calls", "many"))
        .unwrap_err();
    assert!(matches!(
        err,
        ValidationError::FieldDomain { field: "Support Calls", .. }
    ));
}

#[test]
fn negative_values_are_rejected() {
    let err = validator()
        .validate(&raw_with("Payment Delay", "-1"))
        .unwrap_err();
    assert_eq!(err.field(), "Payment Delay");
}

#[test]
fn missing_field_is_not_defaulted() {
    let err = validator().validate(&raw_without("Tenure")).unwrap_err();
    assert_eq!(err, ValidationError::MissingField { field: "Tenure" });

    let err = validator().validate(&raw_with("Contract Length", "")).unwrap_err();
    assert_eq!(
        err,
        ValidationError::MissingField {
            field: "Contract Length"
        }
    );
}

#[test]
fn first_failing_column_is_reported() {
    let mut raw = raw_with("Age", "500");
    raw.insert("Contract Length", "Weekly");
    let err = validator().validate(&raw).unwrap_err();
    assert_eq!(err.field(), "Age");
}

#[test]
fn batch_keeps_good_rows_and_indexes_bad_ones() {
    let rows = vec![
        sample_raw(),
        raw_with("Usage Frequency", "101"),
        raw_with("Tenure", "12"),
        raw_without("Gender"),
    ];
    let batch = validator().validate_batch(&rows);

    let good: Vec<usize> = batch.records.iter().map(|r| r.row).collect();
    assert_eq!(good, vec![0, 2]);
    assert_eq!(batch.records[1].record.tenure, 12);

    assert_eq!(batch.errors.len(), 2);
    assert_eq!(batch.errors[0].row, 1);
    assert_eq!(batch.errors[1].row, 3);
    assert_eq!(
        batch.errors[1].reason,
        RowFailure::Validation(ValidationError::MissingField { field: "Gender" })
    );
}

#[test]
fn empty_batch_validates_to_nothing() {
    let batch = validator().validate_batch(&[]);
    assert!(batch.records.is_empty());
    assert!(batch.errors.is_empty());
}
