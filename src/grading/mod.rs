pub mod aggregate;
pub mod classification;
pub mod component;
pub mod engine;
pub mod gate;
pub mod policy;
pub mod solver;
pub mod validation;

pub use aggregate::{aggregate, Aggregate};
pub use classification::{classify_grade, Classification};
pub use component::{AssessmentComponent, Mark};
pub use engine::{classify, evaluate, required_for, CalculationResult, ModuleResult, Projection, Scenario};
pub use gate::{final_gate, formative_gate, ComponentRoles, FinalGate, SubMinimumCheck};
pub use policy::*;
pub use solver::{solve_required, RequiredScore};
pub use validation::{validate_policies, validate_policy};
