use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// How the household earns its income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeType {
    #[serde(rename = "w2-employee")]
    W2Employee,
    #[serde(rename = "1099-contractor")]
    Contractor1099,
    #[serde(rename = "business-owner")]
    BusinessOwner,
    #[serde(rename = "blended")]
    Blended,
}

impl IncomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::W2Employee => "w2-employee",
            Self::Contractor1099 => "1099-contractor",
            Self::BusinessOwner => "business-owner",
            Self::Blended => "blended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "w2-employee" => Some(Self::W2Employee),
            "1099-contractor" => Some(Self::Contractor1099),
            "business-owner" => Some(Self::BusinessOwner),
            "blended" => Some(Self::Blended),
            _ => None,
        }
    }
}

/// Questionnaire income bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeRange {
    #[serde(rename = "<$200K")]
    Under200K,
    #[serde(rename = "$200K–$500K", alias = "$200K-$500K")]
    From200KTo500K,
    #[serde(rename = "$500K–$1M", alias = "$500K-$1M")]
    From500KTo1M,
    #[serde(rename = "$1M–$5M", alias = "$1M-$5M")]
    From1MTo5M,
    #[serde(rename = "$5M+")]
    Over5M,
}

impl IncomeRange {
    /// Representative annual income used wherever a single dollar figure
    /// stands in for the bucket.
    pub fn representative_value(&self) -> Decimal {
        match self {
            Self::Under200K => dec!(150000),
            Self::From200KTo500K => dec!(350000),
            Self::From500KTo1M => dec!(750000),
            Self::From1MTo5M => dec!(2500000),
            Self::Over5M => dec!(7500000),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Under200K => "<$200K",
            Self::From200KTo500K => "$200K–$500K",
            Self::From500KTo1M => "$500K–$1M",
            Self::From1MTo5M => "$1M–$5M",
            Self::Over5M => "$5M+",
        }
    }

    /// Accepts both the en-dash labels and their ASCII-hyphen spellings.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().replace('-', "–").as_str() {
            "<$200K" => Some(Self::Under200K),
            "$200K–$500K" => Some(Self::From200KTo500K),
            "$500K–$1M" => Some(Self::From500KTo1M),
            "$1M–$5M" => Some(Self::From1MTo5M),
            "$5M+" => Some(Self::Over5M),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityStructure {
    #[default]
    None,
    #[serde(rename = "LLC")]
    Llc,
    #[serde(rename = "S-corp")]
    SCorp,
    #[serde(rename = "C-corp")]
    CCorp,
    Trust,
    #[serde(rename = "Not sure")]
    NotSure,
}

impl EntityStructure {
    /// `None` and `Not sure` both mean no structure has been chosen yet.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::None | Self::NotSure)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Llc => "LLC",
            Self::SCorp => "S-corp",
            Self::CCorp => "C-corp",
            Self::Trust => "Trust",
            Self::NotSure => "Not sure",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "" | "None" => Some(Self::None),
            "LLC" => Some(Self::Llc),
            "S-corp" => Some(Self::SCorp),
            "C-corp" => Some(Self::CCorp),
            "Trust" => Some(Self::Trust),
            "Not sure" => Some(Self::NotSure),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyGoal {
    #[serde(rename = "Reduce tax liability")]
    ReduceTaxLiability,
    #[serde(rename = "Build long-term passive income")]
    PassiveIncome,
    #[serde(rename = "Asset protection")]
    AssetProtection,
    #[serde(rename = "Exit planning", alias = "Exit & liquidity planning")]
    ExitPlanning,
    #[serde(rename = "Real estate investments")]
    RealEstate,
    #[serde(rename = "All of the above")]
    AllOfTheAbove,
    #[serde(other)]
    Other,
}

impl StrategyGoal {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "Reduce tax liability" => Self::ReduceTaxLiability,
            "Build long-term passive income" => Self::PassiveIncome,
            "Asset protection" => Self::AssetProtection,
            "Exit planning" | "Exit & liquidity planning" => Self::ExitPlanning,
            "Real estate investments" => Self::RealEstate,
            "All of the above" => Self::AllOfTheAbove,
            _ => Self::Other,
        }
    }
}

/// Questionnaire answers for one household. Owned by the caller and never
/// mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub income_type: IncomeType,
    #[serde(default)]
    pub income_range: Option<IncomeRange>,
    #[serde(default)]
    pub entity_structure: EntityStructure,
    #[serde(default)]
    pub strategy_goals: Vec<StrategyGoal>,
    /// `None` when the user has not answered.
    #[serde(default)]
    pub has_business_partners: Option<bool>,
    #[serde(default)]
    pub receives_stock_comp: bool,
    #[serde(default)]
    pub rsu_income_percent: Option<Decimal>,
    /// Business share of a blended income, 0–100.
    #[serde(default)]
    pub business_income_percent: Option<Decimal>,
    /// W-2 share of a blended income, 0–100.
    #[serde(default)]
    pub w2_income_percent: Option<Decimal>,
    /// Set once the user has selected the LLC C-corp election strategy.
    #[serde(default)]
    pub ccorp_election: bool,
}

impl Profile {
    pub fn new(income_type: IncomeType, income_range: Option<IncomeRange>) -> Self {
        Self {
            income_type,
            income_range,
            entity_structure: EntityStructure::None,
            strategy_goals: Vec::new(),
            has_business_partners: None,
            receives_stock_comp: false,
            rsu_income_percent: None,
            business_income_percent: None,
            w2_income_percent: None,
            ccorp_election: false,
        }
    }

    /// Representative income of the income bucket, zero when unanswered.
    pub fn representative_income(&self) -> Decimal {
        self.income_range
            .map(|range| range.representative_value())
            .unwrap_or(Decimal::ZERO)
    }

    pub fn has_goal(
        &self,
        goal: StrategyGoal,
    ) -> bool {
        self.strategy_goals.contains(&goal)
    }

    pub fn wants_exit_planning(&self) -> bool {
        self.has_goal(StrategyGoal::ExitPlanning) || self.has_goal(StrategyGoal::AllOfTheAbove)
    }

    pub fn wants_real_estate(&self) -> bool {
        self.has_goal(StrategyGoal::RealEstate) || self.has_goal(StrategyGoal::AllOfTheAbove)
    }

    /// Existing C-corp, or an LLC that elected C-corp taxation.
    pub fn has_ccorp_tax_status(&self) -> bool {
        self.entity_structure == EntityStructure::CCorp || self.ccorp_election
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn income_range_parse_accepts_ascii_hyphen() {
        assert_eq!(IncomeRange::parse("$1M-$5M"), Some(IncomeRange::From1MTo5M));
        assert_eq!(IncomeRange::parse("$1M–$5M"), Some(IncomeRange::From1MTo5M));
        assert_eq!(IncomeRange::parse("$9M"), None);
    }

    #[test]
    fn representative_income_is_zero_without_range() {
        let profile = Profile::new(IncomeType::W2Employee, None);

        assert_eq!(profile.representative_income(), Decimal::ZERO);
    }

    #[test]
    fn profile_deserializes_from_form_values() {
        let json = r#"{
            "incomeType": "business-owner",
            "incomeRange": "$1M–$5M",
            "entityStructure": "Not sure",
            "strategyGoals": ["Exit planning", "Something new"],
            "hasBusinessPartners": false
        }"#;

        let profile: Profile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.income_type, IncomeType::BusinessOwner);
        assert_eq!(profile.income_range, Some(IncomeRange::From1MTo5M));
        assert!(profile.entity_structure.is_unset());
        assert_eq!(
            profile.strategy_goals,
            vec![StrategyGoal::ExitPlanning, StrategyGoal::Other]
        );
        assert_eq!(profile.has_business_partners, Some(false));
        assert!(profile.wants_exit_planning());
    }
}
