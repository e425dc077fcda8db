use std::process::Command;

/// Output of a git subcommand, or `None` outside a checkout or without git.
fn git(args: &[&str]) -> Option<String> {
    let out = Command::new("git").args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");
    println!("cargo:rerun-if-changed=.git/index");

    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".into());

    // "<hash>[-dirty] <profile>", or just the profile from a source tarball
    let info = match git(&["describe", "--always", "--dirty", "--abbrev=10"]) {
        Some(rev) => format!("{rev} {profile}"),
        None => profile,
    };

    println!("cargo:rustc-env=QIITAZ_BUILD_INFO={info}");
}
