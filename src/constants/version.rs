use semver::Version;

pub fn get_version() -> String {
    let semver = env!("CARGO_PKG_VERSION").parse::<Version>();

    if let Ok(semver) = semver {
        match env!("VERGEN_GIT_SHA") {
            // vergen falls back to a placeholder when the build has no git
            // history to read, e.g. from a source tarball
            "VERGEN_IDEMPOTENT_OUTPUT" | "unknown" => semver.to_string(),
            sha => format!("{} [{}]", semver, sha),
        }
    } else {
        tracing::warn!("couldn't parse a semver out of Cargo.toml? defaulting to 0.0.0-unknown.");
        String::from("0.0.0-unknown")
    }
}
