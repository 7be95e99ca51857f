pub mod config;
pub mod directory;
pub mod reclaim;

pub use config::Config;
pub use directory::{
    DirectoryApi, DirectoryClient, DirectoryError, GroupId, GroupPage, HttpDirectory,
    RawSessionDetail, Session, SessionDetail, SessionId, SessionRecord,
};
pub use reclaim::{
    run_reclamation, FatalError, ReclamationActuator, ReclamationOutcome, RunOrchestrator,
    RunReport, RunResponse, SessionInspector, SessionResult,
};
