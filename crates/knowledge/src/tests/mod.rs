//! Pipeline scenario tests with mock collaborators.

mod pipeline_scenarios;
