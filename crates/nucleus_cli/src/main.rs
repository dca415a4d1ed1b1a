//! Chain startup runner.
//!
//! # Responsibility
//! - Wire the nucleus registry the way a host does at process start.
//! - Load one chain manifest and list, call, or validate against its nucleus.
//!
//! # Exit codes
//! - `0` success, `1` runtime failure, `2` fatal registry wiring error,
//!   `64` usage error.

use log::info;
use nucleus_core::{
    call_encoded, core_version, init_logging, load_chain_manifest, CallValue, ChainManifest,
    EntryDef, InterfaceSchemaType, LoggingConfig, NucleusRegistry,
};
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

const USAGE: &str = "usage: nucleus_cli --version\n       \
                     nucleus_cli <chain-manifest.json> [function [params]]\n       \
                     nucleus_cli <chain-manifest.json> --validate <entry> <string|json> <value>";

fn main() -> ExitCode {
    match LoggingConfig::from_env() {
        Ok(Some(config)) => {
            if let Err(err) = init_logging(&config) {
                eprintln!("warning: logging disabled: {err}");
            }
        }
        Ok(None) => {}
        Err(err) => eprintln!("warning: logging disabled: {err}"),
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(first) = args.first() else {
        eprintln!("{USAGE}");
        return ExitCode::from(64);
    };
    if first == "--version" {
        println!("{}", version_line());
        return ExitCode::SUCCESS;
    }

    let mut registry = NucleusRegistry::<ChainManifest>::new();
    if let Err(err) = registry.register_builtin_nucleii() {
        eprintln!("fatal: {err}");
        return ExitCode::from(2);
    }

    match run(&registry, Path::new(first), &args[1..]) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn version_line() -> String {
    format!("nucleus_core version={}", core_version())
}

fn run(
    registry: &NucleusRegistry<ChainManifest>,
    manifest_path: &Path,
    rest: &[String],
) -> Result<Vec<String>, Box<dyn Error>> {
    let manifest = load_chain_manifest(manifest_path)?;
    let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let code = manifest.source_code(base_dir)?;
    let mut nucleus = registry.create(&manifest, &manifest.nucleus.nucleus_type, &code)?;
    info!(
        "event=chain_start module=cli status=ok chain={} type={}",
        manifest.name,
        nucleus.nucleus_type()
    );

    match rest {
        [] => {
            let mut lines = vec![format!("nucleus={}", nucleus.nucleus_type())];
            lines.extend(nucleus.interfaces().iter().map(|interface| {
                format!("interface={} schema={}", interface.name, interface.schema)
            }));
            Ok(lines)
        }
        [flag, entry, format, value] if flag == "--validate" => {
            let format: InterfaceSchemaType = format.parse()?;
            let candidate = CallValue::decode(format, value)?;
            nucleus.validate_entry(&EntryDef::new(entry.as_str(), format), &candidate)?;
            Ok(vec![format!("valid entry={entry} schema={format}")])
        }
        [flag, ..] if flag == "--validate" => Err(USAGE.into()),
        [function] => Ok(vec![call_encoded(&mut nucleus, function, "")?]),
        [function, params, ..] => Ok(vec![call_encoded(&mut nucleus, function, params)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::{run, version_line};
    use nucleus_core::{ChainManifest, NucleusRegistry};
    use std::fs;
    use std::path::{Path, PathBuf};

    const APP_SOURCE: &str = r#"{
        "functions": [
            {"name": "greet", "schema": "string", "returns": "hello"},
            {"name": "echo", "schema": "json"}
        ],
        "entries": {
            "tag": {"pattern": "^#[a-z]+$"}
        }
    }"#;

    fn registry() -> NucleusRegistry<ChainManifest> {
        let mut registry = NucleusRegistry::new();
        registry
            .register_builtin_nucleii()
            .expect("builtin registration");
        registry
    }

    fn write_chain(dir: &Path) -> PathBuf {
        fs::write(dir.join("app.json"), APP_SOURCE).expect("write code file");
        let manifest_path = dir.join("chain.json");
        fs::write(
            &manifest_path,
            r#"{"name": "clutter", "nucleus": {"type": "static", "code_file": "app.json"}}"#,
        )
        .expect("write manifest");
        manifest_path
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn lists_nucleus_type_and_interfaces_in_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let manifest_path = write_chain(dir.path());

        let lines = run(&registry(), &manifest_path, &[]).expect("listing succeeds");
        assert_eq!(
            lines,
            vec![
                "nucleus=static".to_string(),
                "interface=greet schema=string".to_string(),
                "interface=echo schema=json".to_string(),
            ]
        );
    }

    #[test]
    fn call_without_params_sends_empty_payload() {
        let dir = tempfile::tempdir().expect("temp dir");
        let manifest_path = write_chain(dir.path());

        let lines = run(&registry(), &manifest_path, &args(&["greet"])).expect("call succeeds");
        assert_eq!(lines, vec!["hello".to_string()]);

        let err = run(&registry(), &manifest_path, &args(&["echo"]))
            .expect_err("empty payload is not valid json");
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn call_with_params_returns_encoded_result() {
        let dir = tempfile::tempdir().expect("temp dir");
        let manifest_path = write_chain(dir.path());

        let lines = run(&registry(), &manifest_path, &args(&["echo", r#"{ "a" : [1, 2] }"#]))
            .expect("echo succeeds");
        assert_eq!(lines, vec![r#"{"a":[1,2]}"#.to_string()]);
    }

    #[test]
    fn reports_missing_manifest_and_unknown_function() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = run(&registry(), &dir.path().join("absent.json"), &[])
            .expect_err("missing manifest must fail");
        assert!(err.to_string().contains("absent.json"));

        let manifest_path = write_chain(dir.path());
        let err = run(&registry(), &manifest_path, &args(&["missing"]))
            .expect_err("unknown function must fail");
        assert_eq!(err.to_string(), "function not found: missing");
    }

    #[test]
    fn validates_entries_against_declared_rules() {
        let dir = tempfile::tempdir().expect("temp dir");
        let manifest_path = write_chain(dir.path());

        let lines = run(
            &registry(),
            &manifest_path,
            &args(&["--validate", "tag", "string", "#rust"]),
        )
        .expect("matching tag is valid");
        assert_eq!(lines, vec!["valid entry=tag schema=string".to_string()]);

        let err = run(
            &registry(),
            &manifest_path,
            &args(&["--validate", "tag", "string", "Rust"]),
        )
        .expect_err("pattern violation must fail");
        assert!(err.to_string().contains("pattern"));

        let err = run(
            &registry(),
            &manifest_path,
            &args(&["--validate", "tag", "xml", "<tag/>"]),
        )
        .expect_err("unsupported format must fail");
        assert!(err.to_string().contains("unsupported"));

        let err = run(&registry(), &manifest_path, &args(&["--validate", "tag"]))
            .expect_err("incomplete validate args must fail");
        assert!(err.to_string().contains("usage"));
    }

    #[test]
    fn version_line_names_core_crate() {
        assert!(version_line().starts_with("nucleus_core version="));
    }
}
