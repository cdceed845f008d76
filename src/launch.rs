//! Hand-off to the external docker publish tool.

use log::debug;
use std::process::Command;

use crate::errors::*;
use crate::resolve::{Credentials, RegistryTarget};

/// Publish executable invoked after resolution, looked up on `PATH`.
pub const PUBLISH_TOOL: &str = "drone-docker";

/// Build the environment mapping consumed by the publish tool.
///
/// The mapping is overlaid on the inherited environment of the child; the
/// current process environment is left untouched.
pub fn child_env(creds: &Credentials, target: &RegistryTarget) -> Vec<(&'static str, String)> {
    vec![
        ("PLUGIN_REPO", target.repository.clone()),
        ("PLUGIN_REGISTRY", target.registry.clone()),
        ("DOCKER_USERNAME", creds.username.clone()),
        ("DOCKER_PASSWORD", creds.password.clone()),
    ]
}

/// Run the publish tool with the given extra environment and wait for it.
///
/// Stdout and stderr pass straight through to the parent's streams.
pub fn run(program: &str, vars: &[(&'static str, String)]) -> Result<()> {
    debug!("handing off to {}", program);
    let status = Command::new(program)
        .envs(vars.iter().map(|(key, val)| (*key, val.as_str())))
        .status()?;
    if !status.success() {
        return Err(Error::Exited(status));
    }
    Ok(())
}
