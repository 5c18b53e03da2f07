use std::env;
use std::fs;
use std::io::{Error, ErrorKind, Result};
use std::path::PathBuf;

const PROTO: &str = "src/proto/pisum.proto";

fn main() {
    println!("cargo:rerun-if-changed={PROTO}");

    // The generated code is checked in, so a missing `protoc` is not fatal.
    if let Err(e) = regenerate() {
        println!("cargo:warning=Keeping the checked-in src/proto/generated.rs: {e}");
    }
}

fn regenerate() -> Result<()> {
    let proto_dir = PathBuf::from("src/proto");

    // Create a temporary directory for prost output
    let out_dir = env::var("OUT_DIR").map_err(|e| Error::new(ErrorKind::NotFound, e))?;
    let temp_dir = PathBuf::from(out_dir).join("proto_temp");
    fs::create_dir_all(&temp_dir)?;

    // Compile the .proto file
    prost_build::Config::new()
        .out_dir(&temp_dir)
        .compile_protos(&[PROTO], &["src/proto"])?;

    // Copy the generated file next to the schema and prepend #![allow(missing_docs)]
    let generated = temp_dir.join("pisum.rs");
    let contents = fs::read_to_string(generated)?;
    let new_contents = format!("#![allow(missing_docs)]\n{contents}");
    let target_path = proto_dir.join("generated.rs");
    if fs::read_to_string(&target_path).ok().as_deref() != Some(new_contents.as_str()) {
        fs::write(&target_path, new_contents)?;
    }
    Ok(())
}
