use dep_inj::DepInj;
use domain::{
    model::{
        entity::{CodeInfo, ExecutionPlan, SupervisorSpecFile},
        vo::{PlanDefaults, Submission},
    },
    service::{
        Computer, ExecutionPlanService, InputContext, OpenRemoteFolder, SelectCalculationKind,
        SelectComputer, StagingFolder,
    },
    ConfigurationError, PlanError,
};

use crate::{
    restart::{ExclusionSet, RemoteTreeSynchronizer, RenameRule},
    run_line::RunLine,
    supervisor::{build_settings, render_spec},
};

#[derive(DepInj, Default)]
#[target(ExecutionPlanServiceImpl)]
pub struct ExecutionPlanState {
    defaults: PlanDefaults,
}

impl ExecutionPlanState {
    pub fn new(defaults: PlanDefaults) -> Self {
        Self { defaults }
    }
}

#[async_trait::async_trait]
impl<Deps> ExecutionPlanService for ExecutionPlanServiceImpl<Deps>
where
    Deps: AsRef<ExecutionPlanState>
        + SelectComputer
        + SelectCalculationKind
        + OpenRemoteFolder
        + Send
        + Sync,
{
    async fn prepare(
        &self,
        submission: &Submission,
        staging: &(dyn StagingFolder + Send + Sync),
    ) -> Result<ExecutionPlan, PlanError> {
        let kind = self.prj_ref().select(submission.kind);
        if submission.restart.is_some() && !kind.supports_restart() {
            return Err(PlanError::UnsupportedOperation {
                kind: submission.kind.to_string(),
                operation: "restart",
            });
        }

        let computer = self.computer(&submission.code.computer)?;
        let run_line = RunLine::compose(computer, &submission.options, &submission.code.exec_name)?;

        let mut spec_document = None;
        let mut plan = match &submission.supervisor {
            None => {
                tracing::debug!(calc = %submission.uuid, "Running the code directly");
                ExecutionPlan::new(
                    submission.uuid,
                    CodeInfo {
                        code_uuid: submission.code.uuid,
                        launcher: run_line.launcher,
                        executable: run_line.executable,
                        cmdline_params: Vec::new(),
                        stdout_name: Some(self.defaults.stdout_name.clone()),
                        stderr_name: Some(self.defaults.stderr_name.clone()),
                        with_mpi: submission.options.with_mpi,
                    },
                )
            }
            Some(supervisor) => {
                tracing::debug!(calc = %submission.uuid, "Running the code supervised");
                let spec_name = self.defaults.supervisor_spec_name.clone();
                // The supervisor launches the code in parallel itself.
                let mut plan = ExecutionPlan::new(
                    submission.uuid,
                    CodeInfo {
                        code_uuid: supervisor.code.uuid,
                        launcher: Vec::new(),
                        executable: supervisor.code.exec_name.clone(),
                        cmdline_params: vec!["run".to_owned(), spec_name.clone()],
                        stdout_name: None,
                        stderr_name: None,
                        with_mpi: false,
                    },
                );
                let settings = build_settings(
                    run_line.command(),
                    &self.defaults,
                    supervisor,
                    kind.multi_image(),
                );
                let spec = render_spec(&settings)
                    .map_err(|e| PlanError::staging(&spec_name, e.into()))?;
                spec_document = Some(spec);
                plan.supervisor = Some(SupervisorSpecFile {
                    filename: spec_name,
                    settings,
                });
                plan
            }
        };

        // Nothing is written to staging before the restart folder is listed.
        if let Some(restart) = &submission.restart {
            let folder = self.prj_ref().open_remote_folder(&restart.folder)?;
            let synchronizer = RemoteTreeSynchronizer {
                exclusions: self.exclusions(submission),
                rename: RenameRule {
                    from: self.defaults.continuation_output_name.clone(),
                    to: self.defaults.initial_input_name.clone(),
                    enabled: restart.contcar_to_poscar,
                },
            };
            plan.remote_copy_list = synchronizer.synchronize(folder.as_ref(), staging).await?;
        }

        if let (Some(spec), Some(file)) = (&spec_document, &plan.supervisor) {
            staging
                .write_file(&file.filename, spec.as_bytes())
                .await
                .map_err(|e| PlanError::staging(&file.filename, e))?;
        }

        let ctx = InputContext {
            submission,
            staging,
            defaults: &self.defaults,
        };
        match &submission.restart {
            Some(_) => kind.build_restart_inputs(&ctx, &mut plan).await?,
            None => kind.build_fresh_inputs(&ctx, &mut plan).await?,
        }

        tracing::info!(
            calc = %plan.uuid,
            supervised = plan.is_supervised(),
            restart = submission.restart.is_some(),
            local_files = plan.local_copy_list.len(),
            remote_copies = plan.remote_copy_list.len(),
            "Execution plan prepared"
        );
        Ok(plan)
    }
}

impl<Deps> ExecutionPlanServiceImpl<Deps>
where
    Deps: AsRef<ExecutionPlanState> + SelectComputer,
{
    fn computer(&self, label: &str) -> Result<&(dyn Computer + Send + Sync), PlanError> {
        self.prj_ref()
            .computer(label)
            .ok_or_else(|| ConfigurationError::UnknownComputer(label.to_owned()).into())
    }

    fn exclusions(&self, submission: &Submission) -> ExclusionSet {
        let submit_script = submission
            .options
            .submit_script_filename
            .as_ref()
            .unwrap_or(&self.defaults.submit_script_name);
        [
            submit_script,
            &self.defaults.supervisor_spec_name,
            &self.defaults.job_template_name,
            &self.defaults.calc_info_name,
        ]
        .into_iter()
        .cloned()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use domain::{
        model::{
            entity::{CodeRunMode, HandlerConfig, ResourceValue, SupervisorTuning},
            vo::{
                CalculationKindType, Code, RemoteFolderRef, RestartInput, SubmissionOptions,
                SupervisorInput,
            },
        },
        service::{CalculationKind, RemoteFolder},
    };
    use uuid::Uuid;

    use super::*;
    use crate::resource::tests::TestComputer;
    use crate::restart::tests::{FakeFolder, RecordingStaging};

    struct TestKind {
        restart: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    #[async_trait::async_trait]
    impl CalculationKind for TestKind {
        fn multi_image(&self) -> bool {
            false
        }

        fn supports_restart(&self) -> bool {
            self.restart
        }

        async fn build_fresh_inputs(
            &self,
            ctx: &InputContext<'_>,
            plan: &mut ExecutionPlan,
        ) -> Result<(), PlanError> {
            self.calls.lock().unwrap().push("fresh");
            ctx.staging.write_file("INCAR", b"ISTART = 0").await.unwrap();
            plan.local_copy_list.push("INCAR".to_owned());
            Ok(())
        }

        async fn build_restart_inputs(
            &self,
            _ctx: &InputContext<'_>,
            _plan: &mut ExecutionPlan,
        ) -> Result<(), PlanError> {
            self.calls.lock().unwrap().push("restart");
            Ok(())
        }
    }

    struct TestContainer {
        plan: ExecutionPlanState,
        computer: TestComputer,
        kind: TestKind,
        remote_files: Vec<&'static str>,
        broken_listing: Option<&'static str>,
        opened: AtomicUsize,
    }

    impl AsRef<ExecutionPlanState> for TestContainer {
        fn as_ref(&self) -> &ExecutionPlanState {
            &self.plan
        }
    }

    impl SelectComputer for TestContainer {
        fn computer(&self, label: &str) -> Option<&(dyn Computer + Send + Sync)> {
            (label == "cluster").then_some(&self.computer as &(dyn Computer + Send + Sync))
        }
    }

    impl SelectCalculationKind for TestContainer {
        fn select(&self, _kind: CalculationKindType) -> &(dyn CalculationKind + Send + Sync) {
            &self.kind
        }
    }

    impl OpenRemoteFolder for TestContainer {
        fn open_remote_folder(
            &self,
            folder: &RemoteFolderRef,
        ) -> Result<Box<dyn RemoteFolder + Send + Sync>, PlanError> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            let mut remote = FakeFolder::new(&folder.path, &self.remote_files);
            remote.broken = self.broken_listing.map(str::to_owned);
            Ok(Box::new(remote))
        }
    }

    fn container() -> TestContainer {
        TestContainer {
            plan: ExecutionPlanState::default(),
            computer: TestComputer::slurm(Some(8)),
            kind: TestKind {
                restart: true,
                calls: Mutex::new(Vec::new()),
            },
            remote_files: vec!["a/CONTCAR", "a/OUTCAR", "b/job_tmpl.json", "run.sh"],
            broken_listing: None,
            opened: AtomicUsize::new(0),
        }
    }

    fn code(exec_name: &str) -> Code {
        Code {
            uuid: Uuid::new_v4(),
            exec_name: exec_name.to_owned(),
            computer: "cluster".to_owned(),
        }
    }

    fn submission(with_mpi: bool) -> Submission {
        Submission {
            uuid: Uuid::new_v4(),
            kind: CalculationKindType::Vasp,
            code: code("vasp_std"),
            options: SubmissionOptions {
                resources: [("num_machines", ResourceValue::Int(2))].into_iter().collect(),
                with_mpi,
                mpirun_extra_params: vec!["-x".to_owned(), "OMP_NUM_THREADS".to_owned()],
                submit_script_filename: None,
            },
            supervisor: None,
            restart: None,
            inputs: Default::default(),
        }
    }

    fn supervised(with_mpi: bool) -> Submission {
        Submission {
            supervisor: Some(SupervisorInput {
                code: code("cstdn"),
                handlers: HandlerConfig::default(),
                settings: SupervisorTuning::default(),
            }),
            ..submission(with_mpi)
        }
    }

    fn restarted(mut submission: Submission) -> Submission {
        submission.restart = Some(RestartInput {
            folder: RemoteFolderRef {
                computer: "cluster".to_owned(),
                path: "/scratch/old".to_owned(),
            },
            contcar_to_poscar: true,
        });
        submission
    }

    #[tokio::test]
    async fn direct_keeps_caller_parallel_flag() {
        let container = container();
        let staging = RecordingStaging::default();
        for with_mpi in [true, false] {
            let submission = submission(with_mpi);
            let plan = ExecutionPlanServiceImpl::inj_ref(&container)
                .prepare(&submission, &staging)
                .await
                .unwrap();

            assert_eq!(plan.codes_info.len(), 1);
            assert_eq!(plan.codes_run_mode, CodeRunMode::Serial);
            assert!(plan.supervisor.is_none());
            let info = &plan.codes_info[0];
            assert_eq!(info.code_uuid, submission.code.uuid);
            assert_eq!(info.with_mpi, with_mpi);
            assert_eq!(info.stdout_name.as_deref(), Some("aiida.out"));
            assert_eq!(info.stderr_name.as_deref(), Some("aiida.err"));
            let expected: &[&str] = if with_mpi {
                &["mpirun", "-np", "16", "-x", "OMP_NUM_THREADS", "vasp_std"]
            } else {
                &["vasp_std"]
            };
            assert_eq!(info.run_line(), expected);
            assert_eq!(plan.local_copy_list, ["INCAR"]);
        }
        assert_eq!(*container.kind.calls.lock().unwrap(), ["fresh", "fresh"]);
    }

    #[tokio::test]
    async fn supervised_never_launches_supervisor_in_parallel() {
        let container = container();
        let staging = RecordingStaging::default();
        let submission = supervised(true);
        let plan = ExecutionPlanServiceImpl::inj_ref(&container)
            .prepare(&submission, &staging)
            .await
            .unwrap();

        assert_eq!(plan.codes_info.len(), 1);
        let info = &plan.codes_info[0];
        assert_eq!(info.code_uuid, submission.supervisor.as_ref().unwrap().code.uuid);
        assert!(!info.with_mpi);
        assert!(info.launcher.is_empty());
        assert_eq!(info.cmdline_params, ["run", "cstdn_spec.yaml"]);
        assert_eq!(info.run_line(), ["cstdn", "run", "cstdn_spec.yaml"]);

        let spec = plan.supervisor.as_ref().unwrap();
        assert_eq!(spec.filename, "cstdn_spec.yaml");
        assert_eq!(
            &*spec.settings.command,
            ["mpirun", "-np", "16", "-x", "OMP_NUM_THREADS", "vasp_std"]
        );
        let written = staging.files.lock().unwrap()["cstdn_spec.yaml"].clone();
        let written: serde_yaml::Value = serde_yaml::from_slice(&written).unwrap();
        assert_eq!(written["jobs"][0]["params"]["vasp_cmd"][5].as_str(), Some("vasp_std"));
    }

    #[tokio::test]
    async fn supervised_serial_command_is_binary_only() {
        let container = container();
        let staging = RecordingStaging::default();
        let plan = ExecutionPlanServiceImpl::inj_ref(&container)
            .prepare(&supervised(false), &staging)
            .await
            .unwrap();
        assert_eq!(&*plan.supervisor.unwrap().settings.command, ["vasp_std"]);
    }

    #[tokio::test]
    async fn restart_attaches_manifest() {
        let container = container();
        let staging = RecordingStaging::default();
        let mut submission = restarted(submission(true));
        submission.options.submit_script_filename = Some("run.sh".to_owned());
        let plan = ExecutionPlanServiceImpl::inj_ref(&container)
            .prepare(&submission, &staging)
            .await
            .unwrap();

        let targets: Vec<_> = plan
            .remote_copy_list
            .iter()
            .map(|copy| (copy.source.as_str(), copy.target.as_str()))
            .collect();
        assert_eq!(
            targets,
            [
                ("/scratch/old/a/CONTCAR", "a/POSCAR"),
                ("/scratch/old/a/OUTCAR", "a/OUTCAR"),
            ]
        );
        assert_eq!(*staging.dirs.lock().unwrap(), ["a"]);
        assert_eq!(*container.kind.calls.lock().unwrap(), ["restart"]);
    }

    #[tokio::test]
    async fn failed_restart_listing_leaves_staging_untouched() {
        let mut container = container();
        container.broken_listing = Some("a");
        let staging = RecordingStaging::default();
        let err = ExecutionPlanServiceImpl::inj_ref(&container)
            .prepare(&restarted(supervised(true)), &staging)
            .await
            .unwrap_err();

        assert!(matches!(err, PlanError::RemoteAccess { ref path, .. } if path == "/scratch/old/a"));
        assert!(staging.files.lock().unwrap().is_empty());
        assert!(staging.dirs.lock().unwrap().is_empty());
        assert!(container.kind.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unsupported_restart_fails_before_listing() {
        let mut container = container();
        container.kind.restart = false;
        let staging = RecordingStaging::default();
        let err = ExecutionPlanServiceImpl::inj_ref(&container)
            .prepare(&restarted(submission(true)), &staging)
            .await
            .unwrap_err();

        assert!(matches!(err, PlanError::UnsupportedOperation { operation: "restart", .. }));
        assert_eq!(container.opened.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn configuration_errors_precede_remote_access() {
        let mut container = container();
        container.computer.mpirun.push("{num_cores_per_machine}".to_owned());
        let staging = RecordingStaging::default();
        let err = ExecutionPlanServiceImpl::inj_ref(&container)
            .prepare(&restarted(supervised(true)), &staging)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PlanError::Configuration(ConfigurationError::MissingTemplateField(ref field))
                if field == "num_cores_per_machine"
        ));
        assert_eq!(container.opened.load(Ordering::SeqCst), 0);
        assert!(staging.files.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_computer() {
        let container = container();
        let staging = RecordingStaging::default();
        let mut submission = submission(false);
        submission.code.computer = "elsewhere".to_owned();
        let err = ExecutionPlanServiceImpl::inj_ref(&container)
            .prepare(&submission, &staging)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlanError::Configuration(ConfigurationError::UnknownComputer(_))
        ));
    }
}
