//! Declarative eligibility criteria as they appear in the strategy catalog.
//!
//! A catalog entry names its criteria as a JSON object, e.g.
//!
//! ```json
//! { "userType": "business_owner", "hasPartners": true, "businessProfitMin": 500000 }
//! ```
//!
//! Each key/value pair becomes one [`Criterion`]. Keys are kept in source
//! order. A key that is not recognised, or whose value has the wrong shape,
//! becomes [`Criterion::Unknown`] instead of failing the whole catalog: it
//! evaluates to false at match time.

use std::fmt;

use rust_decimal::Decimal;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::profile::EntityStructure;

/// The two user types a criterion can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    BusinessOwner,
    W2Employee,
}

impl UserType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "business_owner" => Some(Self::BusinessOwner),
            "w2_employee" => Some(Self::W2Employee),
            _ => None,
        }
    }
}

/// A single named predicate over a profile and its derived facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    UserType(UserType),
    HasPartners(bool),
    BusinessProfitMin(Decimal),
    BusinessProfitMax(Decimal),
    HasCcorp(bool),
    RetainedEarningsMin(Decimal),
    HasCapGains(bool),
    IsAccredited(bool),
    HasRental(bool),
    IsQualifiedPurchaser(bool),
    EntityStructure(EntityStructure),
    RequiresCcorpStatus(bool),
    QsbsClockStarted(bool),
    CapitalAvailableMin(Decimal),
    RestructurePercentMin(Decimal),
    /// Holds when any of the nested sets holds.
    Any(Vec<CriteriaSet>),
    /// Holds when every nested set holds.
    All(Vec<CriteriaSet>),
    /// Holds when the nested set does *not* hold.
    Exclude(CriteriaSet),
    /// Unrecognised key, or a recognised key with a malformed value.
    Unknown { name: String },
}

impl Criterion {
    /// Builds a criterion from one catalog entry.
    pub fn from_entry(
        name: &str,
        value: &Value,
    ) -> Self {
        Self::parse_entry(name, value).unwrap_or_else(|| Self::Unknown {
            name: name.to_string(),
        })
    }

    fn parse_entry(
        name: &str,
        value: &Value,
    ) -> Option<Self> {
        let criterion = match name {
            "userType" => Self::UserType(UserType::parse(value.as_str()?)?),
            "hasPartners" => Self::HasPartners(value.as_bool()?),
            "businessProfitMin" => Self::BusinessProfitMin(decimal(value)?),
            "businessProfitMax" => Self::BusinessProfitMax(decimal(value)?),
            "hasCcorp" => Self::HasCcorp(value.as_bool()?),
            "retainedEarningsMin" => Self::RetainedEarningsMin(decimal(value)?),
            "hasCapGains" => Self::HasCapGains(value.as_bool()?),
            "isAccredited" => Self::IsAccredited(value.as_bool()?),
            "hasRental" => Self::HasRental(value.as_bool()?),
            "isQP" => Self::IsQualifiedPurchaser(value.as_bool()?),
            "entityStructure" => Self::EntityStructure(EntityStructure::parse(value.as_str()?)?),
            "requiresCcorpStatus" => Self::RequiresCcorpStatus(value.as_bool()?),
            "qsbsClockStarted" => Self::QsbsClockStarted(value.as_bool()?),
            "capitalAvailableMin" => Self::CapitalAvailableMin(decimal(value)?),
            "restructurePercentMin" => Self::RestructurePercentMin(decimal(value)?),
            "or" => Self::Any(criteria_sets(value)?),
            "and" => Self::All(criteria_sets(value)?),
            "excludeCondition" => Self::Exclude(CriteriaSet::from_value(value)?),
            _ => return None,
        };
        Some(criterion)
    }

    /// Catalog key this criterion was read from.
    pub fn name(&self) -> &str {
        match self {
            Self::UserType(_) => "userType",
            Self::HasPartners(_) => "hasPartners",
            Self::BusinessProfitMin(_) => "businessProfitMin",
            Self::BusinessProfitMax(_) => "businessProfitMax",
            Self::HasCcorp(_) => "hasCcorp",
            Self::RetainedEarningsMin(_) => "retainedEarningsMin",
            Self::HasCapGains(_) => "hasCapGains",
            Self::IsAccredited(_) => "isAccredited",
            Self::HasRental(_) => "hasRental",
            Self::IsQualifiedPurchaser(_) => "isQP",
            Self::EntityStructure(_) => "entityStructure",
            Self::RequiresCcorpStatus(_) => "requiresCcorpStatus",
            Self::QsbsClockStarted(_) => "qsbsClockStarted",
            Self::CapitalAvailableMin(_) => "capitalAvailableMin",
            Self::RestructurePercentMin(_) => "restructurePercentMin",
            Self::Any(_) => "or",
            Self::All(_) => "and",
            Self::Exclude(_) => "excludeCondition",
            Self::Unknown { name } => name,
        }
    }
}

fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn criteria_sets(value: &Value) -> Option<Vec<CriteriaSet>> {
    value
        .as_array()?
        .iter()
        .map(CriteriaSet::from_value)
        .collect()
}

/// Ordered list of criteria read from one catalog object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaSet(Vec<Criterion>);

impl CriteriaSet {
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self(criteria)
    }

    /// Reads a JSON object; `None` when the value is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self(
            object
                .iter()
                .map(|(name, value)| Criterion::from_entry(name, value))
                .collect(),
        ))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Criterion>> for CriteriaSet {
    fn from(criteria: Vec<Criterion>) -> Self {
        Self(criteria)
    }
}

impl<'a> IntoIterator for &'a CriteriaSet {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

struct CriteriaSetVisitor;

impl<'de> Visitor<'de> for CriteriaSetVisitor {
    type Value = CriteriaSet;

    fn expecting(
        &self,
        formatter: &mut fmt::Formatter,
    ) -> fmt::Result {
        formatter.write_str("a map of criterion names to expected values")
    }

    // Entries are read one at a time so the catalog's key order survives.
    fn visit_map<A>(
        self,
        mut map: A,
    ) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut criteria = Vec::new();
        while let Some((name, value)) = map.next_entry::<String, Value>()? {
            criteria.push(Criterion::from_entry(&name, &value));
        }
        Ok(CriteriaSet(criteria))
    }
}

impl<'de> Deserialize<'de> for CriteriaSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CriteriaSetVisitor)
    }
}

/// Overriding rule checked before normal criteria.
///
/// Flat criteria use OR semantics: any one holding suppresses the strategy.
/// An optional `condition` object is evaluated with AND semantics and also
/// suppresses when it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppressionRule {
    pub criteria: CriteriaSet,
    pub condition: Option<CriteriaSet>,
    pub message: String,
}

struct SuppressionRuleVisitor;

impl<'de> Visitor<'de> for SuppressionRuleVisitor {
    type Value = SuppressionRule;

    fn expecting(
        &self,
        formatter: &mut fmt::Formatter,
    ) -> fmt::Result {
        formatter.write_str("a suppression rule with a message")
    }

    fn visit_map<A>(
        self,
        mut map: A,
    ) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut criteria = Vec::new();
        let mut condition = None;
        let mut message = None;

        while let Some(name) = map.next_key::<String>()? {
            match name.as_str() {
                "message" => message = Some(map.next_value::<String>()?),
                "condition" => condition = Some(map.next_value::<CriteriaSet>()?),
                _ => {
                    let value = map.next_value::<Value>()?;
                    criteria.push(Criterion::from_entry(&name, &value));
                }
            }
        }

        Ok(SuppressionRule {
            criteria: CriteriaSet(criteria),
            condition,
            message: message.ok_or_else(|| de::Error::missing_field("message"))?,
        })
    }
}

impl<'de> Deserialize<'de> for SuppressionRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SuppressionRuleVisitor)
    }
}

/// Secondary cross-sell guidance attached to an eligible strategy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalCtaRule {
    pub trigger_criteria: CriteriaSet,
    #[serde(default)]
    pub suppress_if_criteria_matches: Option<CriteriaSet>,
    pub message: String,
    pub action_label: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn criteria_keep_source_order() {
        let json = r#"{"hasPartners": true, "userType": "business_owner", "businessProfitMin": 500000}"#;

        let set: CriteriaSet = serde_json::from_str(json).unwrap();

        assert_eq!(
            set,
            CriteriaSet::new(vec![
                Criterion::HasPartners(true),
                Criterion::UserType(UserType::BusinessOwner),
                Criterion::BusinessProfitMin(dec!(500000)),
            ])
        );
    }

    #[test]
    fn unknown_key_becomes_unknown_criterion() {
        let set: CriteriaSet = serde_json::from_str(r#"{"ownsYacht": true}"#).unwrap();

        assert_eq!(
            set,
            CriteriaSet::new(vec![Criterion::Unknown {
                name: "ownsYacht".to_string()
            }])
        );
    }

    #[test]
    fn malformed_value_becomes_unknown_criterion() {
        let set: CriteriaSet = serde_json::from_str(r#"{"hasPartners": "yes"}"#).unwrap();

        assert_eq!(set.iter().next().map(Criterion::name), Some("hasPartners"));
        assert!(matches!(
            set.iter().next(),
            Some(Criterion::Unknown { .. })
        ));
    }

    #[test]
    fn composite_criteria_parse_nested_sets() {
        let json = r#"{
            "or": [{"entityStructure": "None"}, {"entityStructure": "Not sure"}],
            "excludeCondition": {"hasCcorp": true}
        }"#;

        let set: CriteriaSet = serde_json::from_str(json).unwrap();

        assert_eq!(
            set,
            CriteriaSet::new(vec![
                Criterion::Any(vec![
                    CriteriaSet::new(vec![Criterion::EntityStructure(EntityStructure::None)]),
                    CriteriaSet::new(vec![Criterion::EntityStructure(EntityStructure::NotSure)]),
                ]),
                Criterion::Exclude(CriteriaSet::new(vec![Criterion::HasCcorp(true)])),
            ])
        );
    }

    #[test]
    fn threshold_accepts_string_amount() {
        let set: CriteriaSet = serde_json::from_str(r#"{"businessProfitMax": "250000"}"#).unwrap();

        assert_eq!(
            set,
            CriteriaSet::new(vec![Criterion::BusinessProfitMax(dec!(250000))])
        );
    }

    #[test]
    fn suppression_rule_splits_message_from_criteria() {
        let json = r#"{"entityStructure": "LLC", "message": "Elect C-corp status instead."}"#;

        let rule: SuppressionRule = serde_json::from_str(json).unwrap();

        assert_eq!(rule.message, "Elect C-corp status instead.");
        assert_eq!(
            rule.criteria,
            CriteriaSet::new(vec![Criterion::EntityStructure(EntityStructure::Llc)])
        );
        assert_eq!(rule.condition, None);
    }

    #[test]
    fn suppression_rule_requires_message() {
        let result = serde_json::from_str::<SuppressionRule>(r#"{"hasCcorp": true}"#);

        assert!(result.is_err());
    }
}
