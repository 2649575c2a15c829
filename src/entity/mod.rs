pub mod agent;

pub use agent::{Agent, AgentKind, AgentRecords, Condition, LifeStage, WieldedWeapon};
