pub mod conflict;
pub mod queue;
pub mod scheduling;

pub use conflict::ConflictService;
pub use queue::QueueService;
pub use scheduling::AppointmentService;
