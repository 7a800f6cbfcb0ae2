use domain::model::{
    entity::{HandlerConfig, SupervisorSettings},
    vo::{CommandVector, PlanDefaults, SupervisorInput},
};
use serde::Serialize;
use serde_json::{Map, Value};

const SINGLE_JOB: &str = "custodian.vasp.jobs.VaspJob";
const MULTI_IMAGE_JOB: &str = "custodian.vasp.jobs.VaspNEBJob";
const HANDLER_MODULE: &str = "custodian.vasp.handlers";

pub fn build_settings(
    command: CommandVector,
    defaults: &PlanDefaults,
    input: &SupervisorInput,
    multi_image: bool,
) -> SupervisorSettings {
    let tuning = &input.settings;
    SupervisorSettings {
        command,
        stdout_name: defaults.stdout_name.clone(),
        stderr_name: defaults.stderr_name.clone(),
        max_errors: tuning.max_errors,
        polling_time_step: tuning.polling_time_step,
        monitor_freq: tuning.monitor_freq,
        skip_over_errors: tuning.skip_over_errors,
        handlers: input.handlers.clone(),
        multi_image,
    }
}

/// The document the supervisor reads on `run <spec>`.
#[derive(Debug, Serialize)]
pub struct SupervisorSpec<'a> {
    pub jobs: Vec<SpecJob<'a>>,
    pub handlers: Vec<Value>,
    pub custodian_params: SpecParams,
}

#[derive(Debug, Serialize)]
pub struct SpecJob<'a> {
    pub jb: &'static str,
    pub params: SpecJobParams<'a>,
}

#[derive(Debug, Serialize)]
pub struct SpecJobParams<'a> {
    pub vasp_cmd: &'a [String],
    pub output_file: &'a str,
    pub stderr_file: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SpecParams {
    pub max_errors: u32,
    pub polling_time_step: u32,
    pub monitor_freq: u32,
    pub skip_over_errors: bool,
}

impl<'a> From<&'a SupervisorSettings> for SupervisorSpec<'a> {
    fn from(settings: &'a SupervisorSettings) -> Self {
        Self {
            jobs: vec![SpecJob {
                jb: if settings.multi_image {
                    MULTI_IMAGE_JOB
                } else {
                    SINGLE_JOB
                },
                params: SpecJobParams {
                    vasp_cmd: &settings.command,
                    output_file: &settings.stdout_name,
                    stderr_file: &settings.stderr_name,
                },
            }],
            handlers: handler_entries(&settings.handlers),
            custodian_params: SpecParams {
                max_errors: settings.max_errors,
                polling_time_step: settings.polling_time_step,
                monitor_freq: settings.monitor_freq,
                skip_over_errors: settings.skip_over_errors,
            },
        }
    }
}

pub fn render_spec(settings: &SupervisorSettings) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&SupervisorSpec::from(settings))
}

/// A `{name: params}` mapping becomes one `{hdlr, params}` entry per handler.
/// A list is already in that shape and passes through, as does anything else.
fn handler_entries(handlers: &HandlerConfig) -> Vec<Value> {
    match &handlers.0 {
        Value::Object(map) => map
            .iter()
            .map(|(name, params)| {
                let hdlr = if name.contains('.') {
                    name.clone()
                } else {
                    format!("{HANDLER_MODULE}.{name}")
                };
                let params = match params {
                    Value::Null => Value::Object(Map::new()),
                    other => other.clone(),
                };
                let mut entry = Map::new();
                entry.insert("hdlr".to_owned(), Value::String(hdlr));
                entry.insert("params".to_owned(), params);
                Value::Object(entry)
            })
            .collect(),
        Value::Array(list) => list.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

#[cfg(test)]
mod tests {
    use domain::model::{
        entity::SupervisorTuning,
        vo::{Code, SupervisorInput},
    };
    use indoc::indoc;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;

    fn input(handlers: Value) -> SupervisorInput {
        SupervisorInput {
            code: Code {
                uuid: Uuid::nil(),
                exec_name: "cstdn".to_owned(),
                computer: "cluster".to_owned(),
            },
            handlers: HandlerConfig(handlers),
            settings: SupervisorTuning {
                max_errors: 5,
                ..Default::default()
            },
        }
    }

    #[test]
    fn settings_pass_through() {
        let handlers = json!({"VaspErrorHandler": {"output_filename": "aiida.out"}});
        let settings = build_settings(
            ["mpirun", "-np", "4", "vasp_std"].into_iter().collect(),
            &PlanDefaults::default(),
            &input(handlers.clone()),
            false,
        );
        assert_eq!(&*settings.command, ["mpirun", "-np", "4", "vasp_std"]);
        assert_eq!(settings.stdout_name, "aiida.out");
        assert_eq!(settings.stderr_name, "aiida.err");
        assert_eq!(settings.max_errors, 5);
        assert_eq!(settings.polling_time_step, 10);
        assert_eq!(settings.monitor_freq, 30);
        assert!(!settings.skip_over_errors);
        assert_eq!(settings.handlers.0, handlers);
    }

    #[test]
    fn render_single_job() {
        let settings = build_settings(
            ["vasp_std"].into_iter().collect(),
            &PlanDefaults::default(),
            &input(json!({"UnconvergedErrorHandler": null})),
            false,
        );
        let expected = indoc! {r#"
            jobs:
            - jb: custodian.vasp.jobs.VaspJob
              params:
                vasp_cmd:
                - vasp_std
                output_file: aiida.out
                stderr_file: aiida.err
            handlers:
            - hdlr: custodian.vasp.handlers.UnconvergedErrorHandler
              params: {}
            custodian_params:
              max_errors: 5
              polling_time_step: 10
              monitor_freq: 30
              skip_over_errors: false
        "#};
        assert_eq!(render_spec(&settings).unwrap(), expected);
    }

    #[test]
    fn render_multi_image_with_handler_list() {
        let handlers = json!([{"hdlr": "my.module.Handler", "params": {"a": 1}}]);
        let settings = build_settings(
            ["vasp_std"].into_iter().collect(),
            &PlanDefaults::default(),
            &input(handlers.clone()),
            true,
        );
        let spec: serde_yaml::Value = serde_yaml::from_str(&render_spec(&settings).unwrap()).unwrap();
        assert_eq!(spec["jobs"][0]["jb"].as_str(), Some(MULTI_IMAGE_JOB));
        assert_eq!(spec["handlers"][0]["hdlr"].as_str(), Some("my.module.Handler"));
        assert_eq!(spec["handlers"][0]["params"]["a"].as_u64(), Some(1));
    }
}
