mod boilerplate;
mod container;

use std::collections::HashSet;

use service::prelude::*;

use crate::{config::PlannerConfig, infrastructure::service::ConfiguredComputer};

pub use self::container::Container;

impl Container {
    pub fn new(config: &PlannerConfig) -> anyhow::Result<Self> {
        let mut labels = HashSet::new();
        for computer in &config.computers {
            if !labels.insert(computer.label.as_str()) {
                anyhow::bail!("Computer `{}` is configured twice", computer.label);
            }
        }
        let computers = config.computers.iter().map(ConfiguredComputer::new).collect();

        let container = Container::builder()
            .plan(ExecutionPlanState::new(config.defaults.clone()))
            .computers(computers)
            .build();

        Ok(container)
    }
}
