use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

const SEED_SCHEMA_VERSION: u32 = 1;
const FILE_LOCATIONS: [&str; 4] = ["desktop", "floppy", "c-drive", "recycle-bin"];
const FILE_KINDS: [&str; 4] = ["image", "text", "system", "executable"];
const APP_TOKENS: [&str; 14] = [
    "PIXEL_ART",
    "TRIVIA",
    "WEB_BROWSER",
    "REGISTER",
    "ABOUT",
    "FLOPPY_DRIVE",
    "FILE_TRANSFER",
    "MINESWEEPER",
    "TEXTCRAFT",
    "MEDIA_PLAYER",
    "MY_COMPUTER",
    "RECYCLE_BIN",
    "IMAGE_VIEWER",
    "JURASSIC_TERMINAL",
];

#[derive(Debug, Deserialize)]
struct WindowRow {
    app_id: String,
}

#[derive(Debug, Deserialize)]
struct FileRow {
    id: String,
    kind: String,
    location: String,
}

#[derive(Debug, Deserialize)]
struct ShortcutRow {
    app_id: String,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    schema_version: u32,
    #[serde(default)]
    windows: Vec<WindowRow>,
    #[serde(default)]
    files: Vec<FileRow>,
    #[serde(default)]
    desktop_icons: Vec<ShortcutRow>,
}

fn check_app_token(path: &str, token: &str) {
    if !APP_TOKENS.contains(&token) {
        panic!("unknown app id `{token}` in {path}");
    }
}

fn validate(path: &str, seed: &SeedFile) {
    if seed.schema_version != SEED_SCHEMA_VERSION {
        panic!(
            "seed schema mismatch in {path}: expected {SEED_SCHEMA_VERSION} found {}",
            seed.schema_version
        );
    }

    let mut window_ids = BTreeSet::new();
    for row in &seed.windows {
        check_app_token(path, &row.app_id);
        if !window_ids.insert(row.app_id.as_str()) {
            panic!("duplicate window row `{}` in {path}", row.app_id);
        }
    }

    let mut file_ids = BTreeSet::new();
    for row in &seed.files {
        if !file_ids.insert(row.id.as_str()) {
            panic!("duplicate file id `{}` in {path}", row.id);
        }
        if !FILE_LOCATIONS.contains(&row.location.as_str()) {
            panic!("file `{}` has unknown location `{}`", row.id, row.location);
        }
        if !FILE_KINDS.contains(&row.kind.as_str()) {
            panic!("file `{}` has unknown kind `{}`", row.id, row.kind);
        }
    }

    for row in &seed.desktop_icons {
        check_app_token(path, &row.app_id);
    }
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let path = crate_root.join("seed").join("desktop.toml");
    println!("cargo:rerun-if-changed={}", path.display());

    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    let seed: SeedFile = toml::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
    validate(&path.display().to_string(), &seed);

    let table: toml::Value = toml::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
    let json = serde_json::to_string_pretty(&table).expect("serialize desktop seed catalog");
    let generated = format!(
        "/// Build-time generated desktop seed catalog JSON.\n\
pub const DESKTOP_SEED_JSON: &str = r##\"{}\"##;\n\
/// App tokens the build script accepts in seed rows.\n\
pub const SEED_APP_TOKENS: &[&str] = &{:?};\n",
        json, APP_TOKENS
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("desktop_seed_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
