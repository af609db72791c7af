//! Well-known reference keys in the knowledge store.

/// Boolean flag whose truth mean reports whether the last planning pass succeeded.
pub const PLAN_SUCCESS: &str = "plan_success";
pub const PLAN_SELECTED_DEMAND_GOAL: &str = "plan_selected_demand_goal";
pub const PLAN_RULE_LIST: &str = "plan_rule_list";
pub const PLAN_CONTEXT_LIST: &str = "plan_context_list";
pub const PLAN_ACTION_LIST: &str = "plan_action_list";

/// Sentences produced by speech-act schemas and waiting to be said.
pub const UTTERANCE_SENTENCES: &str = "utterance_sentences";

pub const DEMAND_GOAL_LIST: &str = "psi_demand_goal_list";
pub const CURRENT_DEMAND_GOAL: &str = "psi_current_demand_goal";
pub const PREVIOUS_DEMAND_GOAL: &str = "psi_previous_demand_goal";

/// Suffix appended to a configured demand name to form its goal predicate.
pub const DEMAND_GOAL_SUFFIX: &str = "DemandGoal";

/// Prefix marking a grounded schema as a scripted function.
pub const SCRIPTED_PREFIX: &str = "scm:";
