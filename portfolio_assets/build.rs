use std::{
    fmt::Write as _,
    io,
    path::{Path, PathBuf},
};

fn main() -> io::Result<()> {
    println!("cargo::rerun-if-changed=assets");

    let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
    let out_path = PathBuf::from(std::env::var_os("OUT_DIR").ok_or(io::ErrorKind::NotFound)?)
        .join("assets.rs");

    let mut out = String::new();
    emit_dir(&mut out, &assets)?;
    std::fs::write(&out_path, out)?;

    println!("cargo::rustc-env=ASSETS={}", out_path.display());
    Ok(())
}

/// Emit one `include_str!` constant per file and one module per directory.
fn emit_dir(out: &mut String, dir: &Path) -> io::Result<()> {
    let mut entries = dir.read_dir()?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str().filter(|n| !n.starts_with('.')) else {
            continue;
        };
        let name = identifier(file_name);
        let path = entry.path();

        if entry.file_type()?.is_dir() {
            let _ = writeln!(out, "pub mod {name} {{");
            emit_dir(out, &path)?;
            let _ = writeln!(out, "}}");
        } else {
            let _ = writeln!(
                out,
                "pub const {}: &str = ::core::include_str!({:?});",
                name.to_uppercase(),
                path,
            );
        }
    }

    Ok(())
}

/// `contact_message.html` -> `contact_message_html`
fn identifier(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
