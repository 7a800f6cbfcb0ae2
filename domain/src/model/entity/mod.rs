pub mod plan;
pub mod remote;
pub mod resource;
pub mod supervisor;

#[rustfmt::skip]
pub use self::{
    plan::{CodeInfo, CodeRunMode, ExecutionPlan, RemoteCopy, SupervisorSpecFile},
    remote::{join_relpath, RemoteFileEntry, RemoteListing},
    resource::{ResourceDescriptor, ResourceRequest, ResourceValue},
    supervisor::{HandlerConfig, SupervisorSettings, SupervisorTuning},
};
