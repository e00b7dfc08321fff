use chrono::{Months, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::super::domain::{Applicant, Benefit, DisbursementFrequency};
use super::StrategyError;

/// Income band used for tiered benefit amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTier {
    /// Exclusive upper bound on monthly household income.
    pub max_household_income: u64,
    pub amount: u32,
}

/// One row of a scheme's benefit table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitItem {
    pub description: String,
    #[serde(alias = "disbursment_amount")]
    pub disbursement_amount: u32,
    #[serde(alias = "disbursment_frequency")]
    pub disbursement_frequency: DisbursementFrequency,
    #[serde(default, alias = "disbursment_duration_months")]
    pub disbursement_duration_months: Option<u32>,
    #[serde(default)]
    pub income_tiers: Vec<IncomeTier>,
    /// Added once per household member on top of the base or tier amount.
    #[serde(default)]
    pub household_member_top_up: u32,
}

impl BenefitItem {
    /// Base or tiered amount plus the household-size top-up.
    pub fn amount_for(&self, applicant: &Applicant) -> u32 {
        let income = applicant.household_income();
        let mut tiers: Vec<&IncomeTier> = self.income_tiers.iter().collect();
        tiers.sort_by_key(|tier| tier.max_household_income);

        let base = tiers
            .into_iter()
            .find(|tier| income < tier.max_household_income)
            .map(|tier| tier.amount)
            .unwrap_or(self.disbursement_amount);

        let members = u32::try_from(applicant.household_members.len()).unwrap_or(u32::MAX);
        base.saturating_add(self.household_member_top_up.saturating_mul(members))
    }

    pub fn award(&self, name: &str, beneficiary: &str, amount: u32) -> Benefit {
        Benefit {
            name: name.to_string(),
            description: self.description.clone(),
            beneficiary: beneficiary.to_string(),
            amount,
            frequency: self.disbursement_frequency,
            duration_months: self.disbursement_duration_months,
        }
    }
}

/// Deserialize a configuration document; `null` reads as an empty object so defaults apply.
pub(crate) fn parse_section<T: DeserializeOwned>(
    document: &Value,
    section: &str,
) -> Result<T, StrategyError> {
    let document = match document {
        Value::Null => Value::Object(Map::new()),
        other => other.clone(),
    };
    serde_json::from_value(document)
        .map_err(|err| StrategyError::InvalidConfiguration(format!("{section}: {err}")))
}

/// Look up a required entry of the benefit table.
pub(crate) fn benefit_item(benefits: &Value, key: &str) -> Result<BenefitItem, StrategyError> {
    let entry = benefits.get(key).ok_or_else(|| {
        StrategyError::InvalidConfiguration(format!("benefit table has no '{key}' entry"))
    })?;
    serde_json::from_value(entry.clone())
        .map_err(|err| StrategyError::InvalidConfiguration(format!("benefits.{key}: {err}")))
}

/// Every entry of the benefit table, in key order.
pub(crate) fn benefit_items(benefits: &Value) -> Result<Vec<(String, BenefitItem)>, StrategyError> {
    let table = benefits.as_object().ok_or_else(|| {
        StrategyError::InvalidConfiguration("benefit table must be an object".to_string())
    })?;
    table
        .keys()
        .map(|key| benefit_item(benefits, key).map(|item| (key.clone(), item)))
        .collect()
}

/// True when `date` falls in the `months` months up to and including `as_of`.
pub(crate) fn within_last_months(date: NaiveDate, months: u32, as_of: NaiveDate) -> bool {
    let cutoff = as_of
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN);
    cutoff <= date && date <= as_of
}
