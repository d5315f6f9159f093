pub mod derive;
pub mod eligibility;
