//! Typed customer record in the exact column order the classifier was trained on.

use super::FeatureRow;
use serde::{Deserialize, Serialize};

pub const FEATURE_COLUMNS: [&str; 10] = [
    "Age",
    "Gender",
    "Tenure",
    "Usage Frequency",
    "Support Calls",
    "Payment Delay",
    "Subscription Type",
    "Contract Length",
    "Total Spend",
    "Last Interaction",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionTier {
    Basic,
    Standard,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractLength {
    Monthly,
    Quarterly,
    Annual,
}

/// Closed categorical domain: canonical spellings and the ordinal code fed to the model.
pub(crate) trait Category: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn code(self) -> f32;

    fn parse(text: &str, case_sensitive: bool) -> Option<Self> {
        let text = text.trim();
        Self::ALL.iter().copied().find(|c| {
            if case_sensitive {
                c.as_str() == text
            } else {
                c.as_str().eq_ignore_ascii_case(text)
            }
        })
    }

    fn expected() -> String {
        let names: Vec<&str> = Self::ALL.iter().map(|c| c.as_str()).collect();
        format!("one of {}", names.join(", "))
    }
}

impl Category for Gender {
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female];

    fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    fn code(self) -> f32 {
        match self {
            Gender::Male => 0.0,
            Gender::Female => 1.0,
        }
    }
}

impl Category for SubscriptionTier {
    const ALL: &'static [Self] = &[
        SubscriptionTier::Basic,
        SubscriptionTier::Standard,
        SubscriptionTier::Premium,
    ];

    fn as_str(self) -> &'static str {
        match self {
            SubscriptionTier::Basic => "Basic",
            SubscriptionTier::Standard => "Standard",
            SubscriptionTier::Premium => "Premium",
        }
    }

    fn code(self) -> f32 {
        match self {
            SubscriptionTier::Basic => 0.0,
            SubscriptionTier::Standard => 1.0,
            SubscriptionTier::Premium => 2.0,
        }
    }
}

impl Category for ContractLength {
    const ALL: &'static [Self] = &[
        ContractLength::Monthly,
        ContractLength::Quarterly,
        ContractLength::Annual,
    ];

    fn as_str(self) -> &'static str {
        match self {
            ContractLength::Monthly => "Monthly",
            ContractLength::Quarterly => "Quarterly",
            ContractLength::Annual => "Annual",
        }
    }

    fn code(self) -> f32 {
        match self {
            ContractLength::Monthly => 0.0,
            ContractLength::Quarterly => 1.0,
            ContractLength::Annual => 2.0,
        }
    }
}

macro_rules! category_display {
    ($($t:ty),*) => {
        $(impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(Category::as_str(*self))
            }
        })*
    };
}

category_display!(Gender, SubscriptionTier, ContractLength);

/// One customer's attributes. Only [`crate::features::FeatureValidator`] should build these
/// from untrusted input; fields are public so callers holding typed data can skip the text path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    /// Months
    #[serde(rename = "Tenure")]
    pub tenure: u32,
    #[serde(rename = "Usage Frequency")]
    pub usage_frequency: u32,
    #[serde(rename = "Support Calls")]
    pub support_calls: u32,
    /// Days
    #[serde(rename = "Payment Delay")]
    pub payment_delay: u32,
    #[serde(rename = "Subscription Type")]
    pub subscription: SubscriptionTier,
    #[serde(rename = "Contract Length")]
    pub contract: ContractLength,
    #[serde(rename = "Total Spend")]
    pub total_spend: f64,
    /// Days since last interaction
    #[serde(rename = "Last Interaction")]
    pub last_interaction: u32,
}

impl FeatureRecord {
    /// Encode for the classifier, values in [`FEATURE_COLUMNS`] order.
    pub fn to_row(&self) -> FeatureRow {
        FeatureRow {
            values: vec![
                self.age as f32,
                self.gender.code(),
                self.tenure as f32,
                self.usage_frequency as f32,
                self.support_calls as f32,
                self.payment_delay as f32,
                self.subscription.code(),
                self.contract.code(),
                self.total_spend as f32,
                self.last_interaction as f32,
            ],
        }
    }

    /// Canonical text cells, [`FEATURE_COLUMNS`] order (used when exporting typed input).
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.age.to_string(),
            self.gender.to_string(),
            self.tenure.to_string(),
            self.usage_frequency.to_string(),
            self.support_calls.to_string(),
            self.payment_delay.to_string(),
            self.subscription.to_string(),
            self.contract.to_string(),
            self.total_spend.to_string(),
            self.last_interaction.to_string(),
        ]
    }
}
