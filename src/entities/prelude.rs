pub use super::incident::{Entity as Incident, IncidentStatus, IncidentType, Severity};
pub use super::officer::{Entity as Officer, OfficerStatus};
pub use super::patrol::{Entity as Patrol, PatrolStatus};
pub use super::patrol_location::Entity as PatrolLocation;
pub use super::sos::{Entity as Sos, SosPriority, SosStatus};
