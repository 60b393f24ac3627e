use std::env;
use std::path::PathBuf;
use wrapper_value_object_codegen::{CargoWarnings, CodeGenerator};

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let mut codegen = CodeGenerator::new();

    codegen.set_header(
        "Generated members for wrapper-value-object-example\n\
         These implementations match the annotated structs in src/",
    );

    // Every #[wrapper_value_object] struct under src/ gets an artifact
    codegen
        .add_source_dir(manifest_dir.join("src"))
        .expect("Failed to parse source files");

    // Rejected declarations show up as cargo warnings
    codegen
        .write_to_dir(&out_dir, &mut CargoWarnings)
        .expect("Failed to write implementations");

    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=build.rs");
}
