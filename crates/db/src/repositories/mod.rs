//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Multi-statement writes run inside explicit transactions;
//! reads are transaction-free.

pub mod building;
pub mod dues;
pub mod maintenance;
pub mod member;
pub mod notice;
pub mod penalty;
pub mod poll;
pub mod society;
pub mod unit;

pub use building::{BuildingError, BuildingRepository, CreateBuildingInput, UpdateBuildingInput};
pub use dues::{CreateDueInput, DueWithContext, DuesError, DuesRepository};
pub use maintenance::{MaintenanceError, MaintenancePlanRows, MaintenanceRepository};
pub use member::{AssignMemberInput, MemberError, MemberRepository, MemberWithUser};
pub use notice::{CreateNoticeInput, NoticeError, NoticeRepository, UpdateNoticeInput};
pub use penalty::{AddPenaltyInput, Penalty, PenaltyError, PenaltyRepository, PenaltyWithUnit};
pub use poll::{CreatePollInput, PollError, PollRepository, PollWithResults};
pub use society::{CreateSocietyInput, SocietyError, SocietyRepository, UpdateSocietyInput};
pub use unit::{
    CreateFlatInput, CreateHousingUnitInput, UnitError, UnitRef, UnitRepository, UpdateFlatInput,
    UpdateHousingUnitInput,
};
