//! `brokerctl config` subcommands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use brokerctl_config::{
    BootstrapDefaults, BootstrapFlags, InterfaceSource, RedpandaYaml, bootstrap, loader,
};
use tracing::debug;

use crate::theme::Theme;

/// Resolve which configuration file to edit.
pub(crate) fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("unable to determine the working directory")?;
    let path = loader::locate(explicit, &cwd);
    debug!(path = %path.display(), "using config file");
    Ok(path)
}

fn load(path: &Path) -> Result<RedpandaYaml> {
    loader::load(path).with_context(|| format!("unable to load config from {}", path.display()))
}

fn write(path: &Path, doc: &RedpandaYaml) -> Result<()> {
    loader::write(path, doc).context("error writing config file")
}

/// Set a single field and write the file back.
pub(crate) fn run_set(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut doc = load(path)?;
    doc.set(key, value)
        .with_context(|| format!("unable to set {key}"))?;
    write(path, &doc)?;

    println!("{}", Theme::success(&format!("Set {key} in {}", path.display())));
    Ok(())
}

/// Point the listeners at this node, set seeds and node ID, and write the file.
pub(crate) fn run_bootstrap<I>(path: &Path, flags: &BootstrapFlags, interfaces: &I) -> Result<()>
where
    I: InterfaceSource + ?Sized,
{
    let mut doc = load(path)?;
    bootstrap(&mut doc, flags, &BootstrapDefaults::default(), interfaces)
        .context("unable to bootstrap config")?;
    write(path, &doc)?;

    let node = &doc.redpanda;
    println!("{}", Theme::success(&format!("Bootstrapped {}", path.display())));
    println!("{}", Theme::detail("rpc_server", &node.rpc_server.address));
    if let Some(id) = node.node_id {
        println!("{}", Theme::detail("node_id", &id.to_string()));
    }
    let seeds: Vec<String> = node
        .seed_servers
        .iter()
        .map(|s| format!("{}:{}", s.host.address, s.host.port))
        .collect();
    if !seeds.is_empty() {
        println!("{}", Theme::detail("seed_servers", &seeds.join(", ")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::net::{IpAddr, Ipv4Addr};

    use super::*;

    struct OnePrivate;

    impl InterfaceSource for OnePrivate {
        fn addresses(&self) -> io::Result<Vec<IpAddr>> {
            Ok(vec![IpAddr::V4(Ipv4Addr::new(172, 16, 4, 2))])
        }
    }

    #[test]
    fn test_run_set_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("redpanda.yaml");

        run_set(&path, "redpanda.rpc_server.port", "9999").unwrap();
        let doc = loader::load(&path).unwrap();
        assert_eq!(doc.redpanda.rpc_server.port, 9999);
    }

    #[test]
    fn test_run_set_error_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("redpanda.yaml");

        let err = run_set(&path, "redpanda.rpc_server.port", "abc").unwrap_err();
        assert!(err.to_string().contains("unable to set redpanda.rpc_server.port"));
        assert!(!path.exists());
    }

    #[test]
    fn test_run_bootstrap_uses_interfaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("redpanda.yaml");
        let flags = BootstrapFlags {
            seeds: vec!["172.16.4.2".to_owned()],
            ..Default::default()
        };

        run_bootstrap(&path, &flags, &OnePrivate).unwrap();
        let doc = loader::load(&path).unwrap();
        assert_eq!(doc.redpanda.rpc_server.address, "172.16.4.2");
        assert_eq!(doc.redpanda.seed_servers.len(), 1);
    }
}
