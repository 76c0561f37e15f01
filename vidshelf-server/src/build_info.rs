/// Build information compiled into the vidshelf-server binary
#[derive(Debug, serde::Serialize, PartialEq, Clone)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub git_hash: Option<String>,
    pub profile: &'static str,
    pub rustc_version: &'static str,
    pub features: &'static str,
}

std::include!(std::concat!(std::env!("OUT_DIR"), "/built.rs"));

#[cfg(feature = "git2")]
fn git_hash() -> Option<String> {
    let dirty = GIT_DIRTY.is_some_and(|v| v);
    GIT_COMMIT_HASH.map(|hash| if dirty { format!("{hash}-dirty") } else { hash.to_string() })
}

#[cfg(not(feature = "git2"))]
fn git_hash() -> Option<String> {
    std::option_env!("VIDSHELF_GIT_REVISION").map(str::to_string)
}

pub fn get() -> BuildInfo {
    BuildInfo {
        name: PKG_NAME,
        version: PKG_VERSION,
        git_hash: git_hash(),
        profile: PROFILE,
        rustc_version: RUSTC_VERSION,
        features: FEATURES_STR,
    }
}
