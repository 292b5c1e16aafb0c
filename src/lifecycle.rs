//! Status state machines for incidents, patrols and SOS alerts.
//!
//! Every status is stored as a string column but handled in code as a tagged
//! enum. Writes go through [`Lifecycle::transition`], which accepts the current
//! state again as a no-op and rejects any move the machine does not allow.

use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{entity} cannot move from {from} to {to}")]
pub struct InvalidTransition {
    pub entity: &'static str,
    pub from: &'static str,
    pub to: &'static str,
}

pub trait Lifecycle: Copy + PartialEq + Sized {
    const ENTITY: &'static str;

    fn as_str(self) -> &'static str;

    /// Whether `next` is a legal successor of `self`. Staying put is handled
    /// by [`Lifecycle::transition`] and need not be listed here.
    fn allows(self, next: Self) -> bool;

    fn transition(self, next: Self) -> Result<Self, InvalidTransition> {
        if self == next || self.allows(next) {
            Ok(next)
        } else {
            Err(InvalidTransition {
                entity: Self::ENTITY,
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "kebab-case")]
pub enum IncidentStatus {
    #[default]
    #[sea_orm(string_value = "reported")]
    Reported,
    #[sea_orm(string_value = "investigating")]
    Investigating,
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "false-alarm")]
    FalseAlarm,
}

impl Lifecycle for IncidentStatus {
    const ENTITY: &'static str = "incident";

    fn as_str(self) -> &'static str {
        match self {
            Self::Reported => "reported",
            Self::Investigating => "investigating",
            Self::Resolved => "resolved",
            Self::FalseAlarm => "false-alarm",
        }
    }

    fn allows(self, next: Self) -> bool {
        use IncidentStatus::*;
        matches!(
            (self, next),
            (Reported, Investigating | Resolved | FalseAlarm) | (Investigating, Resolved | FalseAlarm)
        )
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "kebab-case")]
pub enum PatrolStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "paused")]
    Paused,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl Lifecycle for PatrolStatus {
    const ENTITY: &'static str = "patrol";

    fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    fn allows(self, next: Self) -> bool {
        use PatrolStatus::*;
        matches!((self, next), (Active, Paused | Completed) | (Paused, Active | Completed))
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "kebab-case")]
pub enum SosStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "acknowledged")]
    Acknowledged,
    #[sea_orm(string_value = "resolved")]
    Resolved,
}

impl Lifecycle for SosStatus {
    const ENTITY: &'static str = "sos";

    fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Acknowledged => "acknowledged",
            Self::Resolved => "resolved",
        }
    }

    fn allows(self, next: Self) -> bool {
        use SosStatus::*;
        matches!((self, next), (Active, Acknowledged) | (Acknowledged, Resolved))
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PatrolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SosStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incident_moves_forward_only() {
        use IncidentStatus::*;
        assert_eq!(Reported.transition(Investigating), Ok(Investigating));
        assert_eq!(Reported.transition(Resolved), Ok(Resolved));
        assert_eq!(Investigating.transition(FalseAlarm), Ok(FalseAlarm));

        let err = Resolved.transition(Reported).unwrap_err();
        assert_eq!(err.entity, "incident");
        assert_eq!(err.from, "resolved");
        assert_eq!(err.to, "reported");
        assert!(FalseAlarm.transition(Investigating).is_err());
        assert!(Investigating.transition(Reported).is_err());
    }

    #[test]
    fn repeating_the_current_state_is_accepted() {
        assert_eq!(IncidentStatus::Resolved.transition(IncidentStatus::Resolved), Ok(IncidentStatus::Resolved));
        assert_eq!(PatrolStatus::Completed.transition(PatrolStatus::Completed), Ok(PatrolStatus::Completed));
        assert_eq!(SosStatus::Active.transition(SosStatus::Active), Ok(SosStatus::Active));
    }

    #[test]
    fn patrol_can_pause_and_resume_until_completed() {
        use PatrolStatus::*;
        assert!(Active.allows(Paused));
        assert!(Paused.allows(Active));
        assert!(Paused.allows(Completed));
        assert!(Active.allows(Completed));
        assert!(!Completed.allows(Active));
        assert!(!Completed.allows(Paused));
    }

    #[test]
    fn sos_must_be_acknowledged_before_resolution() {
        use SosStatus::*;
        assert!(Active.allows(Acknowledged));
        assert!(Acknowledged.allows(Resolved));
        assert!(!Active.allows(Resolved));
        assert!(!Resolved.allows(Active));
        assert!(!Acknowledged.allows(Active));
    }

    #[test]
    fn statuses_use_kebab_case_on_the_wire() {
        assert_eq!(serde_json::to_string(&IncidentStatus::FalseAlarm).unwrap(), "\"false-alarm\"");
        let parsed: SosStatus = serde_json::from_str("\"acknowledged\"").unwrap();
        assert_eq!(parsed, SosStatus::Acknowledged);
        assert!(serde_json::from_str::<PatrolStatus>("\"finished\"").is_err());
    }
}
