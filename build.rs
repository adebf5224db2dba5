fn main() {
    use vergen::{BuildBuilder, CargoBuilder, Emitter};

    let mut emitter = Emitter::default();
    let mut have_timestamp = false;

    if let Ok(build) = BuildBuilder::all_build() {
        have_timestamp = emitter.add_instructions(&build).is_ok();
    }
    if let Ok(cargo) = CargoBuilder::all_cargo() {
        let _ = emitter.add_instructions(&cargo);
    }

    if let Err(e) = emitter.emit() {
        eprintln!("vergen emit skipped: {e}");
        have_timestamp = false;
    }

    // `--version` always embeds a build timestamp.
    if !have_timestamp {
        println!("cargo:rustc-env=VERGEN_BUILD_TIMESTAMP=unknown");
    }
}
