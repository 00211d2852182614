use serde::{Deserialize, Serialize};

use super::FilingStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
    pub age: u32,
}

/// Who is filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub filing_status: FilingStatus,
    pub age: u32,
    #[serde(default)]
    pub blind: bool,
    /// Married statuses only.
    #[serde(default)]
    pub spouse_age: Option<u32>,
    #[serde(default)]
    pub spouse_blind: bool,
    /// Two-letter state code.
    pub state: String,
    #[serde(default)]
    pub dependents: Vec<Dependent>,
    /// K-12 educator, eligible for the educator expense deduction.
    #[serde(default)]
    pub educator: bool,
    /// Covered by a workplace retirement plan (triggers the IRA phaseout).
    #[serde(default)]
    pub employer_plan: bool,
    /// HSA family coverage rather than self-only.
    #[serde(default)]
    pub hsa_family_coverage: bool,
}

impl PersonalInfo {
    pub fn new(
        filing_status: FilingStatus,
        age: u32,
        state: impl Into<String>,
    ) -> Self {
        Self {
            filing_status,
            age,
            blind: false,
            spouse_age: None,
            spouse_blind: false,
            state: state.into(),
            dependents: Vec::new(),
            educator: false,
            employer_plan: false,
            hsa_family_coverage: false,
        }
    }

    pub fn dependents_at_most(
        &self,
        max_age: u32,
    ) -> usize {
        self.dependents.iter().filter(|d| d.age <= max_age).count()
    }

    /// Number of 65+/blind conditions across filer and spouse.
    ///
    /// Each condition counts once per person, so a filer who is both 65+ and
    /// blind counts twice. Spouse conditions only count on married returns.
    pub fn additional_deduction_count(&self) -> u32 {
        let mut count = u32::from(self.age >= 65) + u32::from(self.blind);
        if self.filing_status.is_married() {
            count += u32::from(self.spouse_age.is_some_and(|age| age >= 65));
            count += u32::from(self.spouse_blind);
        }
        count
    }
}
