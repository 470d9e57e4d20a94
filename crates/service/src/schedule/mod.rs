//! Schedule service: stop plans on tracks, ride executions expanded from a
//! recurring pattern, and the train availability query.

pub mod pattern;
pub mod ride_execution;
pub mod stopplan;
