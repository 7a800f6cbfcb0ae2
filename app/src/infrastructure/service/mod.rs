pub mod calculation;
pub mod computer;
pub mod remote_folder;
pub mod staging;

#[rustfmt::skip]
pub use self::{
    calculation::VaspCalculation,
    computer::ConfiguredComputer,
    remote_folder::{LocalRemoteFolder, ShellRemoteFolder},
    staging::LocalStagingFolder,
};
