use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use regex_lite::Regex;
use serde::Deserialize;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

#[derive(Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Deserialize)]
struct Package {
    name: String,
    manifest_path: PathBuf,
    dependencies: Vec<Dependency>,
}

#[derive(Deserialize)]
struct Dependency {
    name: String,
    kind: Option<String>,
}

/// Internal crates each layer may depend on: domain <- shared <- player.
const ALLOWED: [(&str, &[&str]); 3] = [
    ("theatre-domain", &[]),
    ("theatre-shared", &["theatre-domain"]),
    ("theatre-player", &["theatre-domain", "theatre-shared", "theatre-player"]),
];

/// Crates whose source must stay free of I/O.
const PURE_CRATES: [&str; 2] = ["theatre-domain", "theatre-shared"];

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;
    let allowed: BTreeMap<&str, &[&str]> = ALLOWED.into_iter().collect();

    let mut violations = Vec::new();
    for package in &metadata.packages {
        let Some(permitted) = allowed.get(package.name.as_str()) else {
            continue;
        };
        for dep in &package.dependencies {
            let internal = allowed.contains_key(dep.name.as_str());
            let dev_self = dep.kind.as_deref() == Some("dev") && dep.name == package.name;
            if internal && !dev_self && !permitted.contains(&dep.name.as_str()) {
                violations.push(format!("{} depends on {}", package.name, dep.name));
            }
        }

        if PURE_CRATES.contains(&package.name.as_str()) {
            let src = package
                .manifest_path
                .parent()
                .map(|dir| dir.join("src"))
                .context("manifest path has no parent")?;
            violations.extend(io_uses(&package.name, &src)?);
        }
    }

    if violations.is_empty() {
        println!("arch-check: ok ({} packages)", metadata.packages.len());
        Ok(())
    } else {
        for violation in &violations {
            eprintln!("arch-check: {violation}");
        }
        anyhow::bail!("{} architecture violation(s)", violations.len())
    }
}

fn io_uses(package: &str, dir: &Path) -> anyhow::Result<Vec<String>> {
    let io = Regex::new(r"\b(tokio|reqwest|std::fs|std::net)\b").context("building I/O regex")?;
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            found.extend(io_uses(package, &path)?);
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
            continue;
        }
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        for (number, line) in source.lines().enumerate() {
            if io.is_match(line) && !line.trim_start().starts_with("//") {
                found.push(format!("{package}: I/O in {}:{}", path.display(), number + 1));
            }
        }
    }
    Ok(found)
}
