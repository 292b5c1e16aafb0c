pub mod incident;
pub mod officer;
pub mod patrol;
pub mod patrol_location;
pub mod sos;

pub use incident::Entity as Incident;
pub use officer::Entity as Officer;
pub use patrol::Entity as Patrol;
pub use patrol_location::Entity as PatrolLocation;
pub use sos::Entity as Sos;

pub mod prelude;
