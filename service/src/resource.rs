use std::collections::BTreeMap;
use std::sync::OnceLock;

use domain::{
    model::entity::{resource::DEFAULT_MPIPROCS_KEY, ResourceDescriptor, ResourceRequest, ResourceValue},
    service::Computer,
    ConfigurationError,
};
use regex::Regex;

/// Resources allocated for a job and the launcher tokens matching them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    pub resource: ResourceDescriptor,
    /// The computer's launcher template with every placeholder substituted.
    pub base: Vec<String>,
}

/// Builds the job resource through the computer's scheduler and fills in the
/// computer's launcher template from it.
pub fn negotiate(
    computer: &dyn Computer,
    request: &ResourceRequest,
) -> Result<Launcher, ConfigurationError> {
    let mut request = request.clone();
    if let Some(default) = computer.default_mpiprocs_per_machine() {
        if !request.contains(DEFAULT_MPIPROCS_KEY) {
            request.insert(DEFAULT_MPIPROCS_KEY, ResourceValue::Int(default));
        }
    }
    let resource = computer.scheduler().create_job_resource(&request)?;

    let mut fields = resource.fields();
    fields.insert("tot_num_mpiprocs", resource.tot_num_mpiprocs().to_string());

    let base = computer
        .mpirun_command()
        .iter()
        .map(|token| interpolate(token, &fields))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(computer = computer.label(), ?resource, ?base, "Negotiated launcher");

    Ok(Launcher { resource, base })
}

/// Substitutes `{field}` placeholders. `{{` and `}}` stand for literal braces.
pub fn interpolate(
    token: &str,
    fields: &BTreeMap<&'static str, String>,
) -> Result<String, ConfigurationError> {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let placeholder = PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").expect("valid regex"));

    let mut out = String::with_capacity(token.len());
    let mut last = 0;
    for caps in placeholder.captures_iter(token) {
        let whole = caps.get(0).expect("group 0 always matches");
        out.push_str(&token[last..whole.start()]);
        last = whole.end();
        match (whole.as_str(), caps.get(1)) {
            ("{{", _) => out.push('{'),
            ("}}", _) => out.push('}'),
            (_, Some(name)) => {
                let name = name.as_str().trim();
                let value = fields
                    .get(name)
                    .ok_or_else(|| ConfigurationError::MissingTemplateField(name.to_owned()))?;
                out.push_str(value);
            }
            _ => return Err(ConfigurationError::MalformedTemplate(token.to_owned())),
        }
    }
    out.push_str(&token[last..]);
    Ok(out)
}
